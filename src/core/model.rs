// src/core/model.rs
use std::fmt;
use serde::{Deserialize, Deserializer, Serialize};

/// Return type recorded when a summary omits one
pub const DEFAULT_RETURN_TYPE: &str = "void";

/// Opaque `"TargetClass.methodName"` reference, parsed once at ingestion
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct CallRef {
    raw: String,
    target: Option<(String, String)>,
}

impl CallRef {
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let target = raw
            .split_once('.')
            .filter(|(class, method)| !class.is_empty() && !method.is_empty())
            .map(|(class, method)| (class.to_string(), method.to_string()));

        Self { raw, target }
    }

    /// The reference exactly as it was summarized
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Class segment before the first `.`; `None` for malformed references
    pub fn target_class(&self) -> Option<&str> {
        self.target.as_ref().map(|(class, _)| class.as_str())
    }

    /// Target class, unless the reference is malformed or points back at `caller`
    pub fn external_target(&self, caller: &str) -> Option<&str> {
        self.target_class().filter(|class| *class != caller)
    }
}

impl From<String> for CallRef {
    fn from(raw: String) -> Self {
        Self::new(raw)
    }
}

impl From<&str> for CallRef {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<CallRef> for String {
    fn from(call: CallRef) -> Self {
        call.raw
    }
}

impl fmt::Display for CallRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.raw())
    }
}

/// One method's extracted signature, outgoing calls and inferred expectations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodRecord {
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub parameters: Vec<String>,
    #[serde(default = "default_return_type", deserialize_with = "null_as_void")]
    pub return_type: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub calls: Vec<CallRef>,
    /// Business-rule and validation descriptions; empty means none were extracted
    #[serde(default, deserialize_with = "null_as_default")]
    pub expects: Vec<String>,
}

impl MethodRecord {
    pub fn new(
        name: impl Into<String>,
        parameters: Vec<String>,
        return_type: impl Into<String>,
        calls: Vec<CallRef>,
        expects: Vec<String>,
    ) -> Self {
        Self {
            name: name.into(),
            parameters,
            return_type: return_type.into(),
            calls,
            expects,
        }
    }

    pub fn has_rules(&self) -> bool {
        !self.expects.is_empty()
    }
}

/// A named unit bundling method records for one analyzed source class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassRecord {
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub methods: Vec<MethodRecord>,
}

impl ClassRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            methods: Vec::new(),
        }
    }

    pub fn method_count(&self) -> usize {
        self.methods.len()
    }

    pub fn has_rules(&self) -> bool {
        self.methods.iter().any(MethodRecord::has_rules)
    }

    /// Every call reference across all methods, in method order
    pub fn calls(&self) -> impl Iterator<Item = &CallRef> {
        self.methods.iter().flat_map(|method| method.calls.iter())
    }
}

/// The persisted/exported snapshot of the store
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CodebaseDocument {
    #[serde(default, deserialize_with = "null_as_default")]
    pub classes: Vec<ClassRecord>,
}

pub(crate) fn default_return_type() -> String {
    DEFAULT_RETURN_TYPE.to_string()
}

/// Treat an explicit `null` the same as a missing field
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

pub(crate) fn null_as_void<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_else(default_return_type))
}
