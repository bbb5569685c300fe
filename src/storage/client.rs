use std::sync::Arc;

use anyhow::{Context, Result};
use log::{debug, warn};
use rusoto_core::Region;
use rusoto_s3::S3Client;

/// Resolve the region to sign requests for.
///
/// A custom endpoint (MinIO, R2, ...) turns the region into
/// `Region::Custom` so requests go to that host instead of AWS.
pub fn resolve_region(region_name: Option<&str>, endpoint: Option<&str>) -> Region {
    let region = match region_name {
        Some(name) => match name.parse::<Region>() {
            Ok(r) => r,
            Err(_) => {
                warn!("Invalid region '{}', using default", name);
                Region::default()
            }
        },
        None => Region::default(),
    };

    match endpoint {
        Some(endpoint) => Region::Custom {
            name: region_name.unwrap_or_else(|| region.name()).to_string(),
            endpoint: endpoint.trim_end_matches('/').to_string(),
        },
        None => region,
    }
}

/// Create an S3 client with the specified region, profile and endpoint
pub fn create_s3_client(
    region_name: Option<&str>,
    profile: Option<&str>,
    endpoint: Option<&str>,
) -> Result<Arc<S3Client>> {
    let region = resolve_region(region_name, endpoint);
    debug!("Creating S3 client for region {}", region.name());

    let s3_client = if let Some(profile_name) = profile {
        match rusoto_credential::ProfileProvider::new() {
            Ok(mut provider) => {
                provider.set_profile(profile_name);
                let http_client =
                    rusoto_core::HttpClient::new().context("Failed to create HTTP client")?;
                Arc::new(S3Client::new_with(http_client, provider, region))
            }
            Err(e) => {
                warn!("Failed to create AWS profile provider: {}, using default", e);
                Arc::new(S3Client::new(region))
            }
        }
    } else {
        Arc::new(S3Client::new(region))
    };

    Ok(s3_client)
}
