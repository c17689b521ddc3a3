use aws_config::{BehaviorVersion, Region};
use aws_credential_types::Credentials;
use aws_sdk_s3::config::Builder as S3ConfigBuilder;
use aws_sdk_s3::Client;

/// Region used when neither the caller nor the environment names one.
/// Any bucket's location can be queried from here.
pub const DEFAULT_REGION: &str = "us-east-1";

#[derive(Debug, Clone, Copy)]
pub struct StaticCredentials<'a> {
    pub access_key_id: &'a str,
    pub secret_access_key: &'a str,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct S3ClientConfig<'a> {
    pub region: Option<&'a str>,
    pub endpoint_url: Option<&'a str>,
    pub force_path_style: bool,
    /// Skip the default credential chain and sign with these keys
    pub credentials: Option<StaticCredentials<'a>>,
}

pub async fn create_s3_client(config: &S3ClientConfig<'_>) -> Client {
    let (mut builder, ambient_region) = match config.credentials {
        Some(keys) => {
            let credentials = Credentials::new(
                keys.access_key_id,
                keys.secret_access_key,
                None,
                None,
                "s3-mirror",
            );
            let builder = S3ConfigBuilder::new()
                .behavior_version(BehaviorVersion::latest())
                .credentials_provider(credentials);
            (builder, None)
        }
        None => {
            let shared = aws_config::defaults(BehaviorVersion::latest()).load().await;
            let region = shared.region().cloned();
            (S3ConfigBuilder::from(&shared), region)
        }
    };

    let region = config
        .region
        .map(|r| Region::new(r.to_string()))
        .or(ambient_region)
        .unwrap_or_else(|| Region::new(DEFAULT_REGION));
    builder = builder.region(region);

    if let Some(endpoint_url) = config.endpoint_url {
        builder = builder.endpoint_url(endpoint_url);
    }

    if config.force_path_style {
        builder = builder.force_path_style(true);
    }

    Client::from_conf(builder.build())
}
