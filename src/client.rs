//! DynamoDB client construction.
//!
//! Supports multiple credential sources:
//! - Environment variables
//! - Hardcoded credentials
//! - AWS profiles

use aws_config::BehaviorVersion;
use aws_config::meta::region::RegionProviderChain;
use aws_config::profile::ProfileFileCredentialsProvider;
use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::config::{Credentials, Region};

/// Connection settings for the production DynamoDB client.
///
/// Credential priority:
/// 1. Hardcoded credentials (`access_key`, `secret_key`, `session_token`)
/// 2. AWS profile from ~/.aws/credentials
/// 3. Default credential chain (env vars, instance profile, etc.)
///
/// Region priority: explicit `region` > `AWS_REGION` env var > us-east-1.
/// `endpoint_url` points the client at a local stack (localstack, moto).
///
/// # Examples
///
/// ```no_run
/// use dynotable::ClientConfig;
///
/// let config = ClientConfig {
///     region: Some("eu-west-1".to_string()),
///     endpoint_url: Some("http://localhost:4566".to_string()),
///     ..ClientConfig::default()
/// };
/// ```
#[derive(Debug, Clone, Default)]
pub struct ClientConfig {
    pub region: Option<String>,
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
    pub session_token: Option<String>,
    pub profile: Option<String>,
    pub endpoint_url: Option<String>,
}

/// Build an AWS SDK DynamoDB client from the given configuration.
pub async fn build_client(config: ClientConfig) -> Client {
    let region_provider = RegionProviderChain::first_try(config.region.map(Region::new))
        .or_default_provider()
        .or_else("us-east-1");

    let mut config_loader = aws_config::defaults(BehaviorVersion::latest()).region(region_provider);

    // Credentials priority: hardcoded > profile > env/default chain
    if let (Some(ak), Some(sk)) = (config.access_key, config.secret_key) {
        let creds = Credentials::new(ak, sk, config.session_token, None, "dynotable-hardcoded");
        config_loader = config_loader.credentials_provider(creds);
    } else if let Some(profile_name) = config.profile {
        let profile_provider = ProfileFileCredentialsProvider::builder()
            .profile_name(&profile_name)
            .build();
        config_loader = config_loader.credentials_provider(profile_provider);
    }
    // else: uses default credential chain (env vars, instance profile, etc)

    let sdk_config = config_loader.load().await;

    let mut dynamo_config = aws_sdk_dynamodb::config::Builder::from(&sdk_config);

    if let Some(url) = config.endpoint_url {
        dynamo_config = dynamo_config.endpoint_url(url);
    }

    Client::from_conf(dynamo_config.build())
}
