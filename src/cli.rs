use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::ConfigOverrides;
use crate::constants::DEFAULT_CONFIG_NAME;

/// Command-line arguments for video-vault.
///
/// Connection options given here override both the config file and the
/// environment.
#[derive(Parser, Debug)]
#[clap(name = "video-vault", about = "Archive videos into S3-compatible object storage")]
pub struct Args {
    /// S3 bucket to archive into (overrides BUCKET_NAME)
    #[clap(short, long, global = true)]
    pub bucket: Option<String>,

    /// AWS region
    #[clap(long, global = true)]
    pub region: Option<String>,

    /// AWS profile to use for credentials
    #[clap(long, global = true)]
    pub profile: Option<String>,

    /// Custom S3 endpoint (MinIO, R2, ...)
    #[clap(long, global = true)]
    pub endpoint: Option<String>,

    /// Verbose logging
    #[clap(short, long, global = true)]
    pub verbose: bool,

    /// Path to configuration YAML file
    #[clap(short = 'c', long, global = true)]
    pub config: Option<PathBuf>,

    #[clap(subcommand)]
    pub command: Commands,
}

impl Args {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            bucket_name: self.bucket.clone(),
            region: self.region.clone(),
            profile: self.profile.clone(),
            endpoint: self.endpoint.clone(),
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Archive a single video link and print the report
    Upload {
        /// Link to the video
        link: String,
    },

    /// Serve the upload form and endpoint over HTTP
    Serve {
        /// Address to listen on (default from config)
        #[clap(short, long)]
        address: Option<String>,
    },

    /// Create a default configuration file
    InitConfig {
        /// Path to output configuration file
        #[clap(default_value = DEFAULT_CONFIG_NAME)]
        path: PathBuf,
    },
}
