//! Named template snapshots.
//!
//! Operators can save the current segment trio under a name and recall it
//! later in the same process. The registry is in-memory only.

use super::TemplateSet;
use std::collections::HashMap;

/// Registry of named template snapshots with a current selection.
#[derive(Debug, Default)]
pub struct TemplateRegistry {
    templates: HashMap<String, TemplateSet>,
    current: Option<String>,
}

impl TemplateRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Save a snapshot under a name, replacing any previous snapshot with
    /// the same name, and select it.
    pub fn add(&mut self, name: impl Into<String>, templates: TemplateSet) {
        let name = name.into();
        self.templates.insert(name.clone(), templates);
        self.current = Some(name);
    }

    /// Select a previously saved snapshot.
    pub fn select(&mut self, name: &str) -> Result<(), TemplateError> {
        if !self.templates.contains_key(name) {
            return Err(TemplateError::NotFound(name.to_string()));
        }
        self.current = Some(name.to_string());
        Ok(())
    }

    /// Get a snapshot by name.
    pub fn get(&self, name: &str) -> Option<&TemplateSet> {
        self.templates.get(name)
    }

    /// Get the currently selected snapshot, if any.
    pub fn current(&self) -> Option<&TemplateSet> {
        self.current.as_deref().and_then(|name| self.templates.get(name))
    }

    /// Name of the current selection.
    pub fn current_name(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// List saved snapshots, sorted by name.
    pub fn list(&self) -> Vec<TemplateInfo> {
        let mut entries: Vec<_> = self
            .templates
            .keys()
            .map(|name| TemplateInfo {
                name: name.clone(),
                selected: self.current.as_deref() == Some(name),
            })
            .collect();
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        entries
    }

    /// Check whether a snapshot exists.
    pub fn exists(&self, name: &str) -> bool {
        self.templates.contains_key(name)
    }
}

/// Summary of a saved snapshot.
#[derive(Debug, Clone)]
pub struct TemplateInfo {
    pub name: String,
    pub selected: bool,
}

/// Template registry errors.
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    #[error("Template not found: {0}")]
    NotFound(String),
}
