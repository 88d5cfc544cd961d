//! Payload handed to the panel renderer.

use crate::model::{Part, PartId};
use serde::{Deserialize, Serialize};

pub const PANEL_KEY: &str = "part-detailed-view-panel";
pub const PANEL_TITLE: &str = "Datasheet & Parameters";
pub const PANEL_DESCRIPTION: &str = "Show datasheet links and key parameters for the selected part";
pub const PANEL_ICON: &str = "ti:file-description";
pub const PANEL_SOURCE: &str = "Panel.js:renderPartDetailedViewPanel";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasheetDescriptor {
    pub id: i64,
    pub label: String,
    pub url: String,
    pub comment: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterDescriptor {
    pub id: i64,
    pub name: String,
    pub value: String,
    pub units: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartSummary {
    pub id: PartId,
    pub name: String,
    pub description: String,
    pub active: bool,
    pub url: Option<String>,
    pub thumbnail: Option<String>,
}

impl From<&Part> for PartSummary {
    fn from(part: &Part) -> Self {
        let name =
            crate::fallback::first_non_empty([part.full_name.as_deref(), Some(part.name.as_str())])
                .unwrap_or_default()
                .to_string();

        Self {
            id: part.id,
            name,
            description: part.description.clone(),
            active: part.active,
            url: part.url.clone(),
            thumbnail: part.thumbnail.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelMeta {
    pub host_version: String,
    pub plugin_version: String,
}

/// Everything the renderer needs for one part.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanelContext {
    pub part: PartSummary,
    pub datasheets: Vec<DatasheetDescriptor>,
    pub parameters: Vec<ParameterDescriptor>,
    pub meta: PanelMeta,
}

/// A panel registration as the host UI expects it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanelDescriptor {
    pub key: String,
    pub title: String,
    pub description: String,
    pub icon: String,
    pub source: String,
    pub context: PanelContext,
}

impl PanelDescriptor {
    pub fn new(context: PanelContext) -> Self {
        Self {
            key: PANEL_KEY.to_string(),
            title: PANEL_TITLE.to_string(),
            description: PANEL_DESCRIPTION.to_string(),
            icon: PANEL_ICON.to_string(),
            source: PANEL_SOURCE.to_string(),
            context,
        }
    }
}
