use tracing::warn;

/// Configuration for the upload pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadConfig {
    /// Run the configured media transform before uploading files.
    /// When false the pipeline behaves as if no transform was configured.
    pub transform_media: bool,

    /// Upload preview thumbnails next to files.
    /// When false every file is sent without a thumbnail.
    pub upload_thumbnails: bool,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            transform_media: true,
            upload_thumbnails: true,
        }
    }
}

impl UploadConfig {
    /// Create a new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_transform_media(mut self, enabled: bool) -> Self {
        self.transform_media = enabled;
        self
    }

    pub fn with_thumbnails(mut self, enabled: bool) -> Self {
        self.upload_thumbnails = enabled;
        self
    }

    /// Defaults overridden by `{prefix}TRANSFORM_MEDIA` / `{prefix}UPLOAD_THUMBNAILS`
    ///
    /// ```bash
    /// export COURIER__UPLOAD_THUMBNAILS=false
    /// ```
    pub fn from_env(prefix: &str) -> Self {
        Self::from_vars(prefix, std::env::vars())
    }

    /// Same as [`UploadConfig::from_env`] over an explicit variable set
    pub fn from_vars<I, K, V>(prefix: &str, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut config = Self::default();
        for (key, value) in vars {
            let Some(name) = key.as_ref().strip_prefix(prefix) else {
                continue;
            };
            let slot = match name.to_ascii_lowercase().as_str() {
                "transform_media" => &mut config.transform_media,
                "upload_thumbnails" => &mut config.upload_thumbnails,
                _ => continue,
            };
            match value.as_ref().trim().parse::<bool>() {
                Ok(parsed) => *slot = parsed,
                Err(_) => warn!(
                    "Ignoring {}{}: expected true or false, got {:?}",
                    prefix,
                    name,
                    value.as_ref()
                ),
            }
        }
        config
    }
}
