//! PartPanel - datasheet and parameter panels for inventory parts
//!
//! Assembles the read-only payload a part detail page renders: the part's
//! datasheet links (attachments whose comment mentions a keyword) and its
//! parameters (ordered by template name and bounded by a limit).
//!
//! # Quick Start
//!
//! ```no_run
//! use partpanel::prelude::*;
//! use std::path::Path;
//!
//! let store = partpanel::open_database(Path::new("inventory.db")).unwrap();
//! let settings = PanelSettings::default();
//! let resolver = BaseUrlResolver::new("https://inventory.example.com/").unwrap();
//!
//! let builder = PanelContextBuilder::new(&store, &settings, "0.16.0");
//! if let Some(panel) = builder.build(Some(&resolver), &PanelTarget::part(12)) {
//!     for datasheet in &panel.datasheets {
//!         println!("{}: {}", datasheet.label, datasheet.url);
//!     }
//! }
//! ```
//!
//! # Features
//!
//! - **Datasheet selection**: keyword match, link/file URL fallback, absolute URLs
//! - **Parameter collection**: name/units fallback through templates, bounded output
//! - **Fail-soft**: missing parts, bad identifiers and store failures yield no panel
//! - **Stores**: SQLite (read-only) and in-memory/JSON snapshot

pub mod config;
pub mod core;
pub mod datasheets;
pub mod fallback;
pub mod model;
pub mod parameters;
pub mod payload;
pub mod store;

// Re-export main types
pub use config::{ConfigProvider, PanelSettings, ParameterLimit, SettingsMap};
pub use crate::core::{
    PanelContextBuilder, PanelTarget, PartPanelError, PluginIdentity, Suppressed,
    TargetResolution, PLUGIN, PLUGIN_VERSION,
};
pub use datasheets::{BaseUrlResolver, DatasheetSelector, UrlResolver};
pub use model::{Attachment, Parameter, Part, PartId, StoredFile, Template, TemplateId};
pub use parameters::ParameterCollector;
pub use payload::{
    DatasheetDescriptor, PanelContext, PanelDescriptor, ParameterDescriptor, PartSummary,
};
pub use store::{MemoryStore, PartLookup, PartStore, SqliteStore};

/// Open an inventory database read-only (convenience wrapper).
pub fn open_database(path: &std::path::Path) -> Result<SqliteStore, PartPanelError> {
    Ok(SqliteStore::open(path)?)
}

/// Load a JSON store snapshot (convenience wrapper).
pub fn load_snapshot(path: &std::path::Path) -> Result<MemoryStore, PartPanelError> {
    Ok(MemoryStore::load(path)?)
}

/// Load a JSON settings file (convenience wrapper).
pub fn load_settings(path: &std::path::Path) -> Result<SettingsMap, PartPanelError> {
    Ok(SettingsMap::from_json_file(path)?)
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{
        BaseUrlResolver, ConfigProvider, MemoryStore, PanelContext, PanelContextBuilder,
        PanelSettings, PanelTarget, ParameterLimit, PartId, PartPanelError, PartStore,
        SettingsMap, SqliteStore, UrlResolver,
    };
}
