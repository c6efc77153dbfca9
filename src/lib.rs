// Re-export modules
pub mod capture;
pub mod config;
pub mod fetcher;
pub mod images;
pub mod metadata;
pub mod naming;
pub mod results;

// Re-export commonly used types for convenience
pub use results::{CaptureOutcome, CaptureReport, CaptureStatus};

use config::CaptureConfig;
use std::error::Error;
use std::path::Path;

/// Builder for configuring and running a page capture batch
pub struct Captures {
    urls: Vec<String>,
    config: CaptureConfig,
}

impl Captures {
    /// Create a new Captures builder for the given URLs
    pub fn new(urls: Vec<String>) -> Self {
        Self {
            urls,
            config: CaptureConfig::default(),
        }
    }

    /// Apply a configuration
    pub fn with_config(mut self, config: CaptureConfig) -> Self {
        self.config = config;
        self
    }

    /// Load configuration from a JSON file
    pub fn with_config_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self, Box<dyn Error>> {
        self.config = CaptureConfig::from_file(path)?;
        Ok(self)
    }

    /// Enable or disable metadata reporting
    pub fn with_metadata(mut self, enabled: bool) -> Self {
        self.config.print_metadata = enabled;
        self
    }

    /// Enable or disable image localization (deep fetch)
    pub fn with_deep_fetch(mut self, enabled: bool) -> Self {
        self.config.deep_fetch = enabled;
        self
    }

    /// Set the directory captures are written into
    pub fn with_output_dir(mut self, dir: impl Into<String>) -> Self {
        self.config.output_dir = dir.into();
        self
    }

    /// Set the request timeout in seconds
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.config.timeout_secs = seconds;
        self
    }

    /// Capture every URL and return the per-URL outcomes in input order
    pub async fn run(self) -> Result<Vec<CaptureOutcome>, Box<dyn Error>> {
        capture::run_batch(&self.urls, &self.config).await
    }
}
