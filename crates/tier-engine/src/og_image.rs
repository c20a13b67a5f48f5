//! OG Image Normalizer
//!
//! Link-preview renderers want an absolute URL to a format they can
//! rasterize, so `.webp` is swapped for the `.png` sibling.

use url::Url;

use crate::error::EngineResult;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OgImageNormalizer {
    base: Url,
}

impl OgImageNormalizer {
    pub fn new(base_origin: &str) -> EngineResult<Self> {
        Ok(Self {
            base: Url::parse(base_origin)?,
        })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Renderer-safe absolute URL
    pub fn normalize(&self, url: &str) -> String {
        let url = match url.strip_suffix(".webp") {
            Some(stem) => format!("{}.png", stem),
            None => url.to_string(),
        };
        self.absolutize(&url)
    }

    /// Resolve against the base origin unless already absolute
    pub fn absolutize(&self, url: &str) -> String {
        if Url::parse(url).is_ok() {
            return url.to_string();
        }
        match self.base.join(url) {
            Ok(joined) => joined.to_string(),
            Err(e) => {
                log::warn!("cannot resolve {:?} against {}: {}", url, self.base, e);
                url.to_string()
            }
        }
    }
}
