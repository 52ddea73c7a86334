//! Integration tests for the classlens binary. None of these reach the network.

use std::path::Path;
use std::process::{Command, Output};

use assert_fs::prelude::*;
use predicates::prelude::*;

const DOCUMENT: &str = r#"{
  "classes": [
    {
      "name": "AccountController",
      "methods": [
        {
          "name": "showAccount",
          "parameters": ["Id accountId"],
          "return_type": "PageReference",
          "calls": ["AccountService.load", "AccountService.audit", "Logger.info"],
          "expects": []
        }
      ]
    },
    {
      "name": "AccountService",
      "methods": [
        {
          "name": "load",
          "parameters": ["Id accountId"],
          "return_type": "Account",
          "calls": ["AccountSelector.byId"],
          "expects": ["accountId must not be null"]
        }
      ]
    },
    { "name": "UtilHelper", "methods": [] },
    { "name": "TestFoo", "methods": [] },
    { "name": "Test_Bar", "methods": [] }
  ]
}"#;

fn run_classlens(dir: &Path, args: &[&str]) -> Output {
    let bin = env!("CARGO_BIN_EXE_classlens");
    Command::new(bin)
        .current_dir(dir)
        .env_remove("RUST_LOG")
        .env_remove("GEMINI_API_KEY")
        .env_remove("OPENAI_API_KEY")
        .args(args)
        .output()
        .expect("failed to run classlens binary")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn with_document() -> assert_fs::TempDir {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("codebase.json").write_str(DOCUMENT).unwrap();
    temp
}

#[test]
fn help_lists_subcommands() {
    let temp = assert_fs::TempDir::new().unwrap();
    let output = run_classlens(temp.path(), &["--help"]);
    let text = stdout(&output);

    assert!(output.status.success());
    for command in ["process", "stats", "search", "deps", "show", "report"] {
        assert!(predicate::str::contains(command).eval(&text), "missing {command}");
    }
}

#[test]
fn stats_reports_totals_and_rankings() {
    let temp = with_document();
    let output = run_classlens(temp.path(), &["stats", "codebase.json", "--json"]);
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(value["analysis"]["total_classes"], 5);
    assert_eq!(value["analysis"]["total_methods"], 2);
    assert_eq!(value["analysis"]["most_connected"][0]["name"], "AccountController");
    assert_eq!(value["analysis"]["most_connected"][0]["connections"], 3);
    assert_eq!(value["analysis"]["classes_with_rules"][0], "AccountService");
    assert_eq!(value["unresolved"], serde_json::json!(["Logger", "AccountSelector"]));
}

#[test]
fn search_applies_naming_filters() {
    let temp = with_document();
    let output = run_classlens(temp.path(), &["search", "codebase.json", "--filter", "tests"]);
    let text = stdout(&output);

    assert!(output.status.success());
    assert!(predicate::str::contains("Test_Bar").eval(&text));
    assert!(predicate::str::contains("TestFoo").not().eval(&text));
    assert!(predicate::str::contains("1 classes found").eval(&text));
}

#[test]
fn search_matches_method_names() {
    let temp = with_document();
    let output = run_classlens(temp.path(), &["search", "codebase.json", "--term", "SHOWACC"]);
    let text = stdout(&output);

    assert!(predicate::str::contains("AccountController").eval(&text));
    assert!(predicate::str::contains("1 classes found").eval(&text));
}

#[test]
fn deps_lists_both_directions() {
    let temp = with_document();
    let output = run_classlens(temp.path(), &["deps", "codebase.json", "AccountService"]);
    let text = stdout(&output);

    assert!(output.status.success());
    assert!(predicate::str::contains("→ AccountSelector (unresolved)").eval(&text));
    assert!(predicate::str::contains("← AccountController").eval(&text));
}

#[test]
fn deps_for_unknown_class_is_empty_not_an_error() {
    let temp = with_document();
    let output = run_classlens(temp.path(), &["deps", "codebase.json", "Ghost"]);
    let text = stdout(&output);

    assert!(output.status.success());
    assert!(predicate::str::contains("Outgoing (0)").eval(&text));
    assert!(predicate::str::contains("Incoming (0)").eval(&text));
}

#[test]
fn report_writes_markdown() {
    let temp = with_document();
    let output = run_classlens(temp.path(), &["report", "codebase.json", "--output", "overview.md"]);
    assert!(output.status.success());

    temp.child("overview.md").assert(predicate::str::contains("## Most complex classes"));
}

#[test]
fn process_without_source_files_fails_before_export() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("src/README.md").write_str("no classes here").unwrap();

    let output = run_classlens(temp.path(), &["process", "src", "--api-key", "unused"]);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(!output.status.success());
    assert!(predicate::str::contains("No source files").eval(&stderr));
    assert!(std::fs::read_dir(temp.path()).unwrap().all(|entry| {
        !entry.unwrap().file_name().to_string_lossy().ends_with(".json")
    }));
}

#[test]
fn process_without_api_key_fails() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("src/AccountService.cls").write_str("public class AccountService {}").unwrap();

    let output = run_classlens(temp.path(), &["process", "src"]);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(!output.status.success());
    assert!(predicate::str::contains("API key required").eval(&stderr));
}
