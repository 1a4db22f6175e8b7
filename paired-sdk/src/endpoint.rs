// ABOUTME: Derives the image and metadata URLs for a resource id from one base URL
// ABOUTME: Validates the base once so per-fetch URL construction cannot fail

use url::Url;

use crate::constants::urls;
use crate::error::ConfigError;
use crate::model::ResourceId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceEndpoints {
    base: Url,
}

impl ResourceEndpoints {
    pub fn new(base: &str) -> Result<Self, ConfigError> {
        let base = Url::parse(base)
            .map_err(|e| ConfigError::Invalid(format!("Invalid base URL '{}': {}", base, e)))?;

        match base.scheme() {
            "http" | "https" => {}
            scheme => {
                return Err(ConfigError::Invalid(format!(
                    "Unsupported URL scheme '{}': only http and https are allowed",
                    scheme
                )));
            }
        }

        if base.cannot_be_a_base() {
            return Err(ConfigError::Invalid(format!(
                "Base URL cannot carry a path: {}",
                base
            )));
        }

        if base.query().is_some() || base.fragment().is_some() {
            return Err(ConfigError::Invalid(format!(
                "Base URL must not contain a query or fragment: {}",
                base
            )));
        }

        Ok(Self { base })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    /// `<base>/<id>.png`
    pub fn image_url(&self, id: ResourceId) -> Url {
        self.resource_url(id, urls::IMAGE_EXTENSION)
    }

    /// `<base>/<id>.json`
    pub fn metadata_url(&self, id: ResourceId) -> Url {
        self.resource_url(id, urls::METADATA_EXTENSION)
    }

    fn resource_url(&self, id: ResourceId, extension: &str) -> Url {
        let mut url = self.base.clone();
        // Checked in `new`: the base always accepts path segments.
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(&format!("{}.{}", id, extension));
        }
        url
    }
}
