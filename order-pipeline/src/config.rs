//! Pipeline configuration

use crate::BoxError;
use crate::clients::AwsSettings;

const DEFAULT_REGION: &str = "us-east-1";
const DEFAULT_TABLE: &str = "Pedidos";
const DEFAULT_BUCKET: &str = "comprovantes";

/// Pipeline configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// AWS region (env: AWS_REGION, then AWS_DEFAULT_REGION)
    pub region: String,
    /// Alternate AWS endpoint, e.g. LocalStack (env: AWS_ENDPOINT_URL)
    pub endpoint_url: Option<String>,
    /// Order table (env: DYNAMO_TABLE)
    pub table_name: String,
    /// Processing queue; ingress fails every submission without it
    pub queue_url: Option<String>,
    /// Receipt bucket (env: S3_BUCKET)
    pub bucket_name: String,
    /// HTTP ingress port
    pub http_port: u16,
    /// Poller batch size, 1..=10
    pub poll_max_messages: i32,
    /// Poller long-poll wait, 0..=20 seconds
    pub poll_wait_seconds: i32,
    /// Environment: development | staging | production
    pub environment: String,
    /// Log output format (env: LOG_FORMAT=json for JSON lines)
    pub log_json: bool,
    /// Directory for daily rolling log files (env: LOG_DIR)
    pub log_dir: Option<String>,
}

impl Config {
    /// Load configuration from environment variables, reading `.env` first
    pub fn from_env() -> Result<Self, BoxError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, BoxError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let region = var("AWS_REGION")
            .or_else(|| var("AWS_DEFAULT_REGION"))
            .unwrap_or_else(|| DEFAULT_REGION.into());

        Ok(Self {
            region,
            endpoint_url: var("AWS_ENDPOINT_URL"),
            table_name: var("DYNAMO_TABLE").unwrap_or_else(|| DEFAULT_TABLE.into()),
            queue_url: var("SQS_QUEUE_URL"),
            bucket_name: var("S3_BUCKET").unwrap_or_else(|| DEFAULT_BUCKET.into()),
            http_port: parse_or("HTTP_PORT", var("HTTP_PORT"), 3000)?,
            poll_max_messages: parse_or::<i32>("SQS_MAX_MESSAGES", var("SQS_MAX_MESSAGES"), 10)?
                .clamp(1, 10),
            poll_wait_seconds: parse_or::<i32>("SQS_WAIT_SECONDS", var("SQS_WAIT_SECONDS"), 20)?
                .clamp(0, 20),
            environment: var("ENVIRONMENT").unwrap_or_else(|| "development".into()),
            log_json: var("LOG_FORMAT").is_some_and(|f| f.eq_ignore_ascii_case("json")),
            log_dir: var("LOG_DIR"),
        })
    }

    pub fn aws_settings(&self) -> AwsSettings {
        AwsSettings {
            region: self.region.clone(),
            endpoint_url: self.endpoint_url.clone(),
        }
    }
}

fn parse_or<T>(name: &str, raw: Option<String>, default: T) -> Result<T, BoxError>
where
    T: std::str::FromStr,
{
    match raw {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| format!("{name} must be a number, got '{value}'").into()),
    }
}
