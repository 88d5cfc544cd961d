//! Store-side records: parts, attachments, parameters and templates.
//!
//! These are owned by the backing store and are never mutated here.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Primary key of a part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PartId(pub i64);

impl PartId {
    /// Interpret a renderer-supplied target identifier.
    ///
    /// Accepts a JSON integer or a string holding one. Zero, empty strings,
    /// `null` and `false` count as "no identifier"; anything else that is not
    /// an integer is malformed. Both cases return `None`.
    pub fn from_target(value: &serde_json::Value) -> Option<Self> {
        let id = match value {
            serde_json::Value::Number(n) => n.as_i64()?,
            serde_json::Value::String(s) => s.trim().parse::<i64>().ok()?,
            _ => return None,
        };
        (id != 0).then_some(PartId(id))
    }
}

impl fmt::Display for PartId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Primary key of a parameter template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TemplateId(pub i64);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Part {
    pub id: PartId,
    pub name: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_active")]
    pub active: bool,
    /// Canonical page URL, when the host can derive one.
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<String>,
}

fn default_active() -> bool {
    true
}

/// A file uploaded into the host's media store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredFile {
    /// Storage path relative to the media root, e.g. `attachments/part/12/lm1117.pdf`.
    pub name: String,
    /// URL the host serves the file under. May be relative.
    #[serde(default)]
    pub url: Option<String>,
}

impl StoredFile {
    /// Last path segment of the stored name.
    pub fn file_name(&self) -> Option<&str> {
        self.name
            .rsplit(['/', '\\'])
            .next()
            .filter(|segment| !segment.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
    pub id: i64,
    pub part: PartId,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub file: Option<StoredFile>,
}

impl Attachment {
    /// Filename of the uploaded file, if this attachment carries one.
    pub fn file_name(&self) -> Option<&str> {
        self.file.as_ref().and_then(StoredFile::file_name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    pub id: TemplateId,
    pub name: String,
    #[serde(default)]
    pub units: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub id: i64,
    pub part: PartId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub units: Option<String>,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub template: Option<TemplateId>,
}

/// A parameter joined with the template it references.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterRow {
    pub parameter: Parameter,
    pub template: Option<Template>,
}

impl ParameterRow {
    /// Sort key: template name (absent sorts as empty) then parameter id.
    pub fn sort_key(&self) -> (&str, i64) {
        let template_name = self.template.as_ref().map(|t| t.name.as_str()).unwrap_or("");
        (template_name, self.parameter.id)
    }
}
