use std::fs;
use std::net::SocketAddr;
use std::path::Path;

use anyhow::{bail, Context, Result};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_CHUNK_SIZE, DEFAULT_LISTEN_ADDRESS, DEFAULT_PART_ATTEMPTS, ENV_AWS_PROFILE,
    ENV_AWS_REGION, ENV_BUCKET_NAME, ENV_S3_ENDPOINT, MULTIPART_THRESHOLD, S3_MAX_PARTS,
    S3_MIN_PART_SIZE, VIDEO_CONTENT_TYPE,
};
use crate::upload::{RetryPolicy, UploadSettings};

/// Runtime configuration for the archiver.
///
/// Every field has a default, so a YAML file only needs the keys it changes.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ArchiverConfig {
    /// Destination bucket; the archiver refuses every request without one
    pub bucket_name: Option<String>,
    pub region: Option<String>,
    /// Named AWS credentials profile
    pub profile: Option<String>,
    /// Custom endpoint for S3-compatible stores
    pub endpoint: Option<String>,
    pub multipart_threshold: u64,
    pub max_parts: u32,
    pub chunk_size: usize,
    pub part_attempts: u32,
    pub listen_address: String,
}

impl Default for ArchiverConfig {
    fn default() -> Self {
        ArchiverConfig {
            bucket_name: None,
            region: None,
            profile: None,
            endpoint: None,
            multipart_threshold: MULTIPART_THRESHOLD,
            max_parts: S3_MAX_PARTS,
            chunk_size: DEFAULT_CHUNK_SIZE,
            part_attempts: DEFAULT_PART_ATTEMPTS,
            listen_address: DEFAULT_LISTEN_ADDRESS.to_string(),
        }
    }
}

/// Values given on the command line. They win over file and environment.
#[derive(Debug, Default, Clone)]
pub struct ConfigOverrides {
    pub bucket_name: Option<String>,
    pub region: Option<String>,
    pub profile: Option<String>,
    pub endpoint: Option<String>,
}

impl ArchiverConfig {
    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .context(format!("Failed to read config file: {}", path.display()))?;

        let config: ArchiverConfig =
            serde_yaml::from_str(&content).context("Failed to parse YAML config")?;

        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn save_to_yaml_file(&self, path: &Path) -> Result<()> {
        let yaml = serde_yaml::to_string(self).context("Failed to serialize config to YAML")?;

        fs::write(path, yaml)
            .context(format!("Failed to write config to {}", path.display()))?;

        info!("Saved configuration to {}", path.display());
        Ok(())
    }

    pub fn create_default_config_file(path: &Path) -> Result<()> {
        ArchiverConfig::default().save_to_yaml_file(path)
    }

    /// Apply environment overrides, reading variables through `lookup`.
    /// Blank values are ignored.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        if let Some(bucket) = read(ENV_BUCKET_NAME) {
            debug!("Using bucket from {}", ENV_BUCKET_NAME);
            self.bucket_name = Some(bucket);
        }
        if let Some(region) = read(ENV_AWS_REGION) {
            self.region = Some(region);
        }
        if let Some(profile) = read(ENV_AWS_PROFILE) {
            self.profile = Some(profile);
        }
        if let Some(endpoint) = read(ENV_S3_ENDPOINT) {
            self.endpoint = Some(endpoint);
        }
    }

    pub fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if overrides.bucket_name.is_some() {
            self.bucket_name = overrides.bucket_name;
        }
        if overrides.region.is_some() {
            self.region = overrides.region;
        }
        if overrides.profile.is_some() {
            self.profile = overrides.profile;
        }
        if overrides.endpoint.is_some() {
            self.endpoint = overrides.endpoint;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_parts == 0 || self.max_parts > S3_MAX_PARTS {
            bail!("max_parts must be between 1 and {}", S3_MAX_PARTS);
        }
        if self.chunk_size == 0 {
            bail!("chunk_size must be greater than zero");
        }
        if self.part_attempts == 0 {
            bail!("part_attempts must be at least 1");
        }
        if self.chunk_size < S3_MIN_PART_SIZE {
            warn!(
                "chunk_size {} is below the S3 minimum part size of {} bytes",
                self.chunk_size, S3_MIN_PART_SIZE
            );
        }
        self.listen_socket_addr()?;
        Ok(())
    }

    pub fn listen_socket_addr(&self) -> Result<SocketAddr> {
        self.listen_address
            .parse()
            .context(format!("Invalid listen address: {}", self.listen_address))
    }

    pub fn upload_settings(&self) -> UploadSettings {
        UploadSettings {
            multipart_threshold: self.multipart_threshold,
            max_parts: self.max_parts,
            chunk_size: self.chunk_size,
            content_type: VIDEO_CONTENT_TYPE.to_string(),
            retry: RetryPolicy::with_attempts(self.part_attempts),
        }
    }
}

/// Load the configuration: YAML file (if any), then environment, then CLI.
pub fn load_config(path: Option<&Path>, overrides: ConfigOverrides) -> Result<ArchiverConfig> {
    let mut config = match path {
        Some(path) => ArchiverConfig::from_yaml_file(path)?,
        None => {
            debug!("No config path provided, using defaults");
            ArchiverConfig::default()
        }
    };

    config.apply_env(|name| std::env::var(name).ok());
    config.apply_overrides(overrides);
    config.validate()?;

    if config.bucket_name.is_none() {
        warn!("No bucket configured, every upload will be refused");
    }

    Ok(config)
}
