use aws_sdk_s3::Client;
use log::debug;

use super::types::sdk_error_message;
use crate::error::RegionError;
use crate::providers::s3_client::DEFAULT_REGION;

/// Look up the region a bucket lives in
pub async fn bucket_region(client: &Client, bucket: &str) -> Result<String, RegionError> {
    let response = client
        .get_bucket_location()
        .bucket(bucket)
        .send()
        .await
        .map_err(|e| RegionError::Lookup {
            bucket: bucket.to_string(),
            message: sdk_error_message(&e),
        })?;

    let constraint = response.location_constraint().map(|c| c.as_str());
    debug!("bucket_location: {} constraint={:?}", bucket, constraint);
    Ok(region_from_constraint(constraint))
}

/// Buckets in US Standard report no constraint; legacy `EU` means eu-west-1.
pub fn region_from_constraint(constraint: Option<&str>) -> String {
    match constraint.map(str::trim) {
        None | Some("") => DEFAULT_REGION.to_string(),
        Some("EU") => "eu-west-1".to_string(),
        Some(region) => region.to_string(),
    }
}
