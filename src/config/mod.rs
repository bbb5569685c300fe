mod archiver_config;

pub use archiver_config::{load_config, ArchiverConfig, ConfigOverrides};
