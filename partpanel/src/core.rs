//! Panel assembly shared by the host integration and the CLI.
//! No host, transport or renderer dependencies.

use serde::{Deserialize, Serialize};

use crate::config::{self, ConfigProvider};
use crate::datasheets::{DatasheetSelector, UrlResolver};
use crate::model::{Part, PartId};
use crate::parameters::ParameterCollector;
use crate::payload::{PanelContext, PanelDescriptor, PanelMeta, PartSummary};
use crate::store::{PartLookup, PartStore};

pub const PLUGIN_NAME: &str = "PartDetailedView";
pub const PLUGIN_SLUG: &str = "part-detailed-view";
pub const PLUGIN_TITLE: &str = "Part Detailed View";
pub const PLUGIN_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Identity the host registers the plugin under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PluginIdentity {
    pub name: &'static str,
    pub slug: &'static str,
    pub title: &'static str,
    pub version: &'static str,
}

pub const PLUGIN: PluginIdentity = PluginIdentity {
    name: PLUGIN_NAME,
    slug: PLUGIN_SLUG,
    title: PLUGIN_TITLE,
    version: PLUGIN_VERSION,
};

/// Discriminator the renderer sends for part detail pages.
pub const PART_TARGET_MODEL: &str = "part";

/// Setup-time failures. Panel building itself never returns an error.
#[derive(Debug, thiserror::Error)]
pub enum PartPanelError {
    #[error("Store error: {0}")]
    Store(#[from] crate::store::StoreError),
    #[error("Config error: {0}")]
    Config(#[from] crate::config::ConfigError),
}

/// What the renderer asked a panel for.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PanelTarget {
    #[serde(default)]
    pub target_model: Option<String>,
    #[serde(default)]
    pub target_id: serde_json::Value,
}

impl PanelTarget {
    pub fn part(id: impl Into<serde_json::Value>) -> Self {
        Self {
            target_model: Some(PART_TARGET_MODEL.to_string()),
            target_id: id.into(),
        }
    }
}

/// Why no panel was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Suppressed {
    Disabled,
    NotApplicable,
    NotFound,
}

/// Outcome of the enable, target and lookup checks: a part to render or a reason not to.
#[derive(Debug, Clone, PartialEq)]
pub enum TargetResolution {
    Ready(Part),
    Suppressed(Suppressed),
}

pub struct PanelContextBuilder<'a> {
    store: &'a dyn PartStore,
    config: &'a dyn ConfigProvider,
    host_version: String,
}

impl<'a> PanelContextBuilder<'a> {
    pub fn new(
        store: &'a dyn PartStore,
        config: &'a dyn ConfigProvider,
        host_version: impl Into<String>,
    ) -> Self {
        Self {
            store,
            config,
            host_version: host_version.into(),
        }
    }

    /// Build the panel payload for `target`, or `None` when there is nothing to show.
    pub fn build(
        &self,
        request: Option<&dyn UrlResolver>,
        target: &PanelTarget,
    ) -> Option<PanelContext> {
        match self.resolve_target(target) {
            TargetResolution::Ready(part) => Some(self.build_for_part(request, &part)),
            TargetResolution::Suppressed(reason) => {
                tracing::debug!("No part panel for {:?}: {:?}", target, reason);
                None
            }
        }
    }

    /// Zero or one panel registrations, in the shape the host UI consumes.
    pub fn panels(
        &self,
        request: Option<&dyn UrlResolver>,
        target: &PanelTarget,
    ) -> Vec<PanelDescriptor> {
        self.build(request, target)
            .map(PanelDescriptor::new)
            .into_iter()
            .collect()
    }

    pub fn resolve_target(&self, target: &PanelTarget) -> TargetResolution {
        if !config::panel_enabled(self.config) {
            return TargetResolution::Suppressed(Suppressed::Disabled);
        }

        if target.target_model.as_deref() != Some(PART_TARGET_MODEL) {
            return TargetResolution::Suppressed(Suppressed::NotApplicable);
        }

        // Missing and malformed identifiers are not told apart from unknown parts.
        let Some(id) = PartId::from_target(&target.target_id) else {
            return TargetResolution::Suppressed(Suppressed::NotApplicable);
        };

        match self.store.find_part(id) {
            Ok(PartLookup::Found(part)) => TargetResolution::Ready(part),
            Ok(PartLookup::NotFound) => TargetResolution::Suppressed(Suppressed::NotFound),
            Err(e) => {
                tracing::warn!("Part lookup for {} failed: {}", id, e);
                TargetResolution::Suppressed(Suppressed::NotFound)
            }
        }
    }

    /// Collect datasheets and parameters for an already resolved part and assemble the payload.
    pub fn build_for_part(&self, request: Option<&dyn UrlResolver>, part: &Part) -> PanelContext {
        let keyword = config::datasheet_keyword(self.config);
        let limit = config::parameter_limit(self.config);

        let datasheets = DatasheetSelector::new(self.store).select(part.id, &keyword, request);
        let parameters = ParameterCollector::new(self.store).collect(part.id, limit);

        tracing::debug!(
            "Built panel for part {}: {} datasheets, {} parameters",
            part.id,
            datasheets.len(),
            parameters.len()
        );

        PanelContext {
            part: PartSummary::from(part),
            datasheets,
            parameters,
            meta: PanelMeta {
                host_version: self.host_version.clone(),
                plugin_version: PLUGIN_VERSION.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{PanelSettings, SettingsMap, ENABLE_PART_PANEL};
    use crate::model::{Attachment, ParameterRow};
    use crate::store::{self, MemoryStore, StoreError};
    use serde_json::json;

    struct BrokenStore;

    impl PartStore for BrokenStore {
        fn find_part(&self, _id: PartId) -> store::Result<PartLookup> {
            Err(StoreError::Lock("poisoned".to_string()))
        }

        fn attachments(&self, _part: PartId) -> store::Result<Vec<Attachment>> {
            Err(StoreError::Lock("poisoned".to_string()))
        }

        fn parameters(&self, _part: PartId) -> store::Result<Vec<ParameterRow>> {
            Err(StoreError::Lock("poisoned".to_string()))
        }
    }

    fn store() -> MemoryStore {
        MemoryStore::new().with_part(Part {
            id: PartId(1),
            name: "NE555".to_string(),
            full_name: None,
            description: "Timer".to_string(),
            active: true,
            url: None,
            thumbnail: None,
        })
    }

    #[test]
    fn test_resolution_reasons() {
        let store = store();
        let settings = PanelSettings::default();
        let builder = PanelContextBuilder::new(&store, &settings, "test");

        assert!(matches!(
            builder.resolve_target(&PanelTarget::part(1)),
            TargetResolution::Ready(_)
        ));
        assert_eq!(
            builder.resolve_target(&PanelTarget::part(2)),
            TargetResolution::Suppressed(Suppressed::NotFound)
        );
        assert_eq!(
            builder.resolve_target(&PanelTarget::part("abc")),
            TargetResolution::Suppressed(Suppressed::NotApplicable)
        );
        assert_eq!(
            builder.resolve_target(&PanelTarget {
                target_model: Some("stockitem".to_string()),
                target_id: json!(1),
            }),
            TargetResolution::Suppressed(Suppressed::NotApplicable)
        );
        assert_eq!(
            builder.resolve_target(&PanelTarget::default()),
            TargetResolution::Suppressed(Suppressed::NotApplicable)
        );
    }

    #[test]
    fn test_disabled_checked_first() {
        let settings = SettingsMap::new().with(ENABLE_PART_PANEL, "false");
        let builder = PanelContextBuilder::new(&BrokenStore, &settings, "test");
        assert_eq!(
            builder.resolve_target(&PanelTarget::part(1)),
            TargetResolution::Suppressed(Suppressed::Disabled)
        );
    }

    #[test]
    fn test_store_failure_suppresses_panel() {
        let settings = PanelSettings::default();
        let builder = PanelContextBuilder::new(&BrokenStore, &settings, "test");
        assert!(builder.build(None, &PanelTarget::part(1)).is_none());
        assert!(builder.panels(None, &PanelTarget::part(1)).is_empty());
    }

    #[test]
    fn test_collector_failures_degrade_to_empty() {
        let part = store().find_part(PartId(1)).unwrap().into_option().unwrap();
        let settings = PanelSettings::default();
        let builder = PanelContextBuilder::new(&BrokenStore, &settings, "0.16.0");

        let context = builder.build_for_part(None, &part);
        assert!(context.datasheets.is_empty());
        assert!(context.parameters.is_empty());
        assert_eq!(context.part.name, "NE555");
        assert_eq!(context.meta.host_version, "0.16.0");
        assert_eq!(context.meta.plugin_version, PLUGIN_VERSION);
    }

    #[test]
    fn test_plugin_identity() {
        let json = serde_json::to_value(PLUGIN).unwrap();
        assert_eq!(json["name"], "PartDetailedView");
        assert_eq!(json["slug"], "part-detailed-view");
        assert_eq!(json["title"], "Part Detailed View");
        assert_eq!(json["version"], PLUGIN_VERSION);
    }

    #[test]
    fn test_panel_descriptor_wraps_context() {
        let store = store();
        let settings = PanelSettings::default();
        let builder = PanelContextBuilder::new(&store, &settings, "test");

        let panels = builder.panels(None, &PanelTarget::part("1"));
        assert_eq!(panels.len(), 1);
        assert_eq!(panels[0].key, "part-detailed-view-panel");
        assert_eq!(panels[0].context.part.id, PartId(1));
    }
}
