//! Process-wide AWS clients
//!
//! Built once from a single `SdkConfig` and shared by every invocation.

use aws_config::{BehaviorVersion, Region, SdkConfig};
use tokio::sync::OnceCell;

static CLIENTS: OnceCell<AwsClients> = OnceCell::const_new();

/// Explicit construction parameters for the AWS clients
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AwsSettings {
    pub region: String,
    /// Alternate endpoint (LocalStack and friends)
    pub endpoint_url: Option<String>,
}

/// Store, queue and blob-store clients sharing one SDK config
#[derive(Debug, Clone)]
pub struct AwsClients {
    pub dynamodb: aws_sdk_dynamodb::Client,
    pub sqs: aws_sdk_sqs::Client,
    pub s3: aws_sdk_s3::Client,
}

impl AwsClients {
    /// Build a fresh set of clients
    pub async fn connect(settings: &AwsSettings) -> Self {
        let sdk_config = load_sdk_config(settings).await;

        let mut s3_config = aws_sdk_s3::config::Builder::from(&sdk_config);
        if settings.endpoint_url.is_some() {
            // Emulators don't resolve virtual-hosted bucket names
            s3_config = s3_config.force_path_style(true);
        }

        tracing::info!(
            region = %settings.region,
            endpoint = settings.endpoint_url.as_deref().unwrap_or("default"),
            "AWS clients initialized"
        );

        Self {
            dynamodb: aws_sdk_dynamodb::Client::new(&sdk_config),
            sqs: aws_sdk_sqs::Client::new(&sdk_config),
            s3: aws_sdk_s3::Client::from_conf(s3_config.build()),
        }
    }

    /// Process-wide clients, built on first use
    ///
    /// Settings passed after the first call are ignored.
    pub async fn shared(settings: &AwsSettings) -> &'static AwsClients {
        CLIENTS
            .get_or_init(|| async { Self::connect(settings).await })
            .await
    }
}

async fn load_sdk_config(settings: &AwsSettings) -> SdkConfig {
    let mut loader = aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(settings.region.clone()));
    if let Some(url) = &settings.endpoint_url {
        loader = loader.endpoint_url(url);
    }
    loader.load().await
}
