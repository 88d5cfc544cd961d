//! Datasheet links for a part.
//!
//! An attachment counts as a datasheet when its comment contains the
//! configured keyword. Each match is resolved to a single URL:
//!
//! ```text
//! attachment.link ──(empty)──▶ attachment.file.url ──(empty)──▶ dropped
//!        │                             │
//!        └──────────────┬──────────────┘
//!                       ▼
//!            absolute already? ──no──▶ UrlResolver
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use partpanel::datasheets::{BaseUrlResolver, DatasheetSelector};
//!
//! let resolver = BaseUrlResolver::new("https://inventory.example.com/")?;
//! let datasheets = DatasheetSelector::new(&store).select(part_id, "datasheet", Some(&resolver));
//! ```

pub mod resolver;
pub mod selector;

pub use resolver::{absolutize, is_absolute, BaseUrlResolver, UrlResolver};
pub use selector::{normalize_keyword, DatasheetSelector};
