//! In-memory part store.

use super::{PartLookup, PartStore, Result};
use crate::model::{Attachment, Parameter, ParameterRow, Part, PartId, Template, TemplateId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Serialized form of a [`MemoryStore`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreSnapshot {
    #[serde(default)]
    pub parts: Vec<Part>,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
    #[serde(default)]
    pub templates: Vec<Template>,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    parts: BTreeMap<PartId, Part>,
    attachments: BTreeMap<i64, Attachment>,
    templates: BTreeMap<TemplateId, Template>,
    parameters: BTreeMap<i64, Parameter>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_part(mut self, part: Part) -> Self {
        self.parts.insert(part.id, part);
        self
    }

    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachments.insert(attachment.id, attachment);
        self
    }

    pub fn with_template(mut self, template: Template) -> Self {
        self.templates.insert(template.id, template);
        self
    }

    pub fn with_parameter(mut self, parameter: Parameter) -> Self {
        self.parameters.insert(parameter.id, parameter);
        self
    }

    pub fn from_snapshot(snapshot: StoreSnapshot) -> Self {
        let mut store = Self::new();
        for part in snapshot.parts {
            store = store.with_part(part);
        }
        for attachment in snapshot.attachments {
            store = store.with_attachment(attachment);
        }
        for template in snapshot.templates {
            store = store.with_template(template);
        }
        for parameter in snapshot.parameters {
            store = store.with_parameter(parameter);
        }
        store
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        let snapshot: StoreSnapshot = serde_json::from_str(content)?;
        Ok(Self::from_snapshot(snapshot))
    }

    /// Load a snapshot file written as JSON.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let store = Self::from_json_str(&content)?;
        tracing::info!(
            "Loaded {} parts, {} attachments, {} parameters from {:?}",
            store.parts.len(),
            store.attachments.len(),
            store.parameters.len(),
            path
        );
        Ok(store)
    }

    pub fn part_count(&self) -> usize {
        self.parts.len()
    }
}

impl PartStore for MemoryStore {
    fn find_part(&self, id: PartId) -> Result<PartLookup> {
        Ok(self.parts.get(&id).cloned().into())
    }

    fn attachments(&self, part: PartId) -> Result<Vec<Attachment>> {
        Ok(self
            .attachments
            .values()
            .filter(|a| a.part == part)
            .cloned()
            .collect())
    }

    fn parameters(&self, part: PartId) -> Result<Vec<ParameterRow>> {
        Ok(self
            .parameters
            .values()
            .filter(|p| p.part == part)
            .map(|p| ParameterRow {
                template: p.template.and_then(|id| self.templates.get(&id).cloned()),
                parameter: p.clone(),
            })
            .collect())
    }
}
