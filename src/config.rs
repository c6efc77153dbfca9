use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Configuration for a capture run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureConfig {
    /// Directory that documents, sidecars, and asset folders are written into
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Whether to report current-vs-last metadata for each page
    #[serde(default)]
    pub print_metadata: bool,

    /// Whether to download and localize all images on each page
    #[serde(default)]
    pub deep_fetch: bool,

    /// Request timeout in seconds, applied to page and image fetches
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// User agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl CaptureConfig {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn Error>> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        let config: Self = serde_json::from_str(&contents)?;
        Ok(config)
    }
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            print_metadata: false,
            deep_fetch: false,
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

/// Default value for output_dir (the working directory)
fn default_output_dir() -> String {
    ".".to_string()
}

/// Default value for timeout_secs
fn default_timeout_secs() -> u64 {
    30
}

/// Default value for user_agent
fn default_user_agent() -> String {
    format!("keep-page/{}", env!("CARGO_PKG_VERSION"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_apply_to_sparse_config() {
        let config: CaptureConfig = serde_json::from_str("{\"deep_fetch\": true}").unwrap();
        assert!(config.deep_fetch);
        assert!(!config.print_metadata);
        assert_eq!(config.output_dir, ".");
        assert_eq!(config.timeout_secs, 30);
    }
}
