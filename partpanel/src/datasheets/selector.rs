//! Datasheet selection
//!
//! Picks the attachments of a part whose comment mentions the datasheet
//! keyword and resolves a link and label for each.

use super::resolver::{absolutize, UrlResolver};
use crate::config::DEFAULT_KEYWORD;
use crate::fallback::{first_non_empty, non_empty};
use crate::model::{Attachment, PartId};
use crate::payload::DatasheetDescriptor;
use crate::store::{self, PartStore};

const DEFAULT_LABEL: &str = "Datasheet";

/// Trim and lower-case a configured keyword; blank means the default.
pub fn normalize_keyword(raw: &str) -> String {
    let keyword = raw.trim().to_lowercase();
    if keyword.is_empty() {
        DEFAULT_KEYWORD.to_string()
    } else {
        keyword
    }
}

/// Case-insensitive substring match. `keyword` must already be normalized.
pub fn comment_matches(comment: &str, keyword: &str) -> bool {
    comment.to_lowercase().contains(keyword)
}

/// Direct link first, then the stored file's URL.
pub fn resolve_url(attachment: &Attachment) -> Option<&str> {
    first_non_empty([
        attachment.link.as_deref(),
        attachment.file.as_ref().and_then(|f| non_empty(f.url.as_deref())),
    ])
}

pub fn resolve_label(attachment: &Attachment) -> &str {
    first_non_empty([attachment.file_name(), Some(attachment.comment.as_str())])
        .unwrap_or(DEFAULT_LABEL)
}

pub struct DatasheetSelector<'a> {
    store: &'a dyn PartStore,
}

impl<'a> DatasheetSelector<'a> {
    pub fn new(store: &'a dyn PartStore) -> Self {
        Self { store }
    }

    /// Datasheets for `part`, ordered by attachment id.
    ///
    /// A store failure yields an empty list.
    pub fn select(
        &self,
        part: PartId,
        keyword: &str,
        resolver: Option<&dyn UrlResolver>,
    ) -> Vec<DatasheetDescriptor> {
        match self.try_select(part, keyword, resolver) {
            Ok(datasheets) => datasheets,
            Err(e) => {
                tracing::warn!("Failed to load attachments for part {}: {}", part, e);
                Vec::new()
            }
        }
    }

    pub fn try_select(
        &self,
        part: PartId,
        keyword: &str,
        resolver: Option<&dyn UrlResolver>,
    ) -> store::Result<Vec<DatasheetDescriptor>> {
        let keyword = normalize_keyword(keyword);

        let mut attachments = self.store.attachments(part)?;
        attachments.retain(|a| comment_matches(&a.comment, &keyword));
        attachments.sort_by_key(|a| a.id);

        let datasheets = attachments
            .iter()
            .filter_map(|attachment| {
                let Some(url) = resolve_url(attachment) else {
                    tracing::debug!(
                        "Skipping attachment {} of part {}: no usable URL",
                        attachment.id,
                        part
                    );
                    return None;
                };

                Some(DatasheetDescriptor {
                    id: attachment.id,
                    label: resolve_label(attachment).to_string(),
                    url: absolutize(url, resolver),
                    comment: attachment.comment.clone(),
                })
            })
            .collect();

        Ok(datasheets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::StoredFile;

    fn attachment(id: i64, comment: &str) -> Attachment {
        Attachment {
            id,
            part: PartId(1),
            comment: comment.to_string(),
            link: None,
            file: None,
        }
    }

    #[test]
    fn test_normalize_keyword() {
        assert_eq!(normalize_keyword("  DataSheet "), "datasheet");
        assert_eq!(normalize_keyword("Spec"), "spec");
        assert_eq!(normalize_keyword("   "), "datasheet");
        assert_eq!(normalize_keyword(""), "datasheet");
    }

    #[test]
    fn test_comment_matches_case_insensitive() {
        assert!(comment_matches("DataSheet rev2", "datasheet"));
        assert!(comment_matches("Main DATASHEET", "datasheet"));
        assert!(!comment_matches("spec sheet", "datasheet"));
        assert!(!comment_matches("", "datasheet"));
    }

    #[test]
    fn test_resolve_url_prefers_link() {
        let mut a = attachment(1, "datasheet");
        a.link = Some("https://x/a.pdf".to_string());
        a.file = Some(StoredFile {
            name: "a.pdf".to_string(),
            url: Some("/media/a.pdf".to_string()),
        });
        assert_eq!(resolve_url(&a), Some("https://x/a.pdf"));

        a.link = Some(String::new());
        assert_eq!(resolve_url(&a), Some("/media/a.pdf"));

        a.file.as_mut().unwrap().url = Some(String::new());
        assert_eq!(resolve_url(&a), None);

        a.file = None;
        assert_eq!(resolve_url(&a), None);
    }

    #[test]
    fn test_resolve_label_fallbacks() {
        let mut a = attachment(1, "DataSheet rev2");
        assert_eq!(resolve_label(&a), "DataSheet rev2");

        a.file = Some(StoredFile {
            name: "attachments/lm1117.pdf".to_string(),
            url: None,
        });
        assert_eq!(resolve_label(&a), "lm1117.pdf");

        let empty = attachment(2, "");
        assert_eq!(resolve_label(&empty), "Datasheet");
    }
}
