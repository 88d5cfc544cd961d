//! Absolute URL resolution against the current request.

use url::Url;

/// Turns a host-relative URL into an absolute one for the current request.
pub trait UrlResolver: Send + Sync {
    fn absolute(&self, url: &str) -> String;
}

/// True when `url` already carries an `http://` or `https://` scheme.
pub fn is_absolute(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

/// Resolves URLs relative to the base address the request arrived on.
#[derive(Debug, Clone)]
pub struct BaseUrlResolver {
    base: Url,
}

impl BaseUrlResolver {
    pub fn new(base: &str) -> Result<Self, url::ParseError> {
        Ok(Self {
            base: Url::parse(base)?,
        })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }
}

impl UrlResolver for BaseUrlResolver {
    fn absolute(&self, url: &str) -> String {
        match self.base.join(url) {
            Ok(joined) => joined.to_string(),
            Err(e) => {
                tracing::warn!("Could not resolve {:?} against {}: {}", url, self.base, e);
                url.to_string()
            }
        }
    }
}

/// Apply `resolver` to `url` unless it is already absolute.
pub fn absolutize(url: &str, resolver: Option<&dyn UrlResolver>) -> String {
    match resolver {
        Some(resolver) if !is_absolute(url) => resolver.absolute(url),
        _ => url.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_absolute() {
        assert!(is_absolute("https://x/a.pdf"));
        assert!(is_absolute("http://x/a.pdf"));
        assert!(!is_absolute("/media/a.pdf"));
        assert!(!is_absolute("ftp://x/a.pdf"));
        assert!(!is_absolute("media/a.pdf"));
    }

    #[test]
    fn test_base_resolver_joins_relative_paths() {
        let resolver = BaseUrlResolver::new("https://inventory.example.com/part/12/").unwrap();
        assert_eq!(resolver.base().host_str(), Some("inventory.example.com"));
        assert_eq!(
            resolver.absolute("/media/attachments/a.pdf"),
            "https://inventory.example.com/media/attachments/a.pdf"
        );
        assert_eq!(
            resolver.absolute("a.pdf"),
            "https://inventory.example.com/part/12/a.pdf"
        );
    }

    #[test]
    fn test_absolutize_passthrough() {
        let resolver = BaseUrlResolver::new("https://inventory.example.com/").unwrap();
        assert_eq!(absolutize("https://x/a.pdf", Some(&resolver)), "https://x/a.pdf");
        assert_eq!(absolutize("/media/a.pdf", None), "/media/a.pdf");
        assert_eq!(
            absolutize("/media/a.pdf", Some(&resolver)),
            "https://inventory.example.com/media/a.pdf"
        );
    }

    #[test]
    fn test_invalid_base_rejected() {
        assert!(BaseUrlResolver::new("not a url").is_err());
    }
}
