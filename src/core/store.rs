// src/core/store.rs
use std::collections::HashMap;
use tracing::debug;

use super::model::{ClassRecord, CodebaseDocument, MethodRecord};
use super::llm::ClassSummary;

/// In-memory class store; insertion order is preserved for every derived view
#[derive(Debug, Clone, Default)]
pub struct ClassStore {
    classes: Vec<ClassRecord>,
    /// Name -> position of the first record with that name
    index: HashMap<String, usize>,
}

impl ClassStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a class, or keep the existing record when the name is already stored.
    ///
    /// Returns `true` when a new record was appended.
    pub fn add_class(&mut self, name: impl Into<String>) -> bool {
        let name = name.into();
        if self.index.contains_key(&name) {
            debug!("Class {} already stored, merging", name);
            return false;
        }

        self.index.insert(name.clone(), self.classes.len());
        self.classes.push(ClassRecord::new(name));
        true
    }

    /// Append a method to the first class named `class_name`.
    ///
    /// Unknown classes are a silent no-op; returns whether the method was stored.
    pub fn add_method(&mut self, class_name: &str, method: MethodRecord) -> bool {
        match self.index.get(class_name) {
            Some(&position) => {
                self.classes[position].methods.push(method);
                true
            }
            None => {
                debug!("Dropping method {} for unknown class {}", method.name, class_name);
                false
            }
        }
    }

    /// Ingest a full class summary. The summary is already validated, so the
    /// class and all of its methods land together.
    pub fn ingest(&mut self, summary: ClassSummary) {
        let record = summary.into_record();
        self.add_class(record.name.clone());
        for method in record.methods {
            self.add_method(&record.name, method);
        }
    }

    pub fn clear(&mut self) {
        self.classes.clear();
        self.index.clear();
    }

    pub fn classes(&self) -> &[ClassRecord] {
        &self.classes
    }

    pub fn get(&self, name: &str) -> Option<&ClassRecord> {
        self.index.get(name).map(|&position| &self.classes[position])
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn to_document(&self) -> CodebaseDocument {
        CodebaseDocument {
            classes: self.classes.clone(),
        }
    }

    /// Replace the entire contents with `document` (not a merge).
    ///
    /// Records are kept verbatim, duplicates included, so that a loaded
    /// document exports back unchanged.
    pub fn load_document(&mut self, document: CodebaseDocument) {
        self.classes = document.classes;
        self.index = HashMap::with_capacity(self.classes.len());
        for (position, class) in self.classes.iter().enumerate() {
            self.index.entry(class.name.clone()).or_insert(position);
        }
    }
}

impl From<CodebaseDocument> for ClassStore {
    fn from(document: CodebaseDocument) -> Self {
        let mut store = Self::new();
        store.load_document(document);
        store
    }
}
