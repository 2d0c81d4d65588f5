//! Amazon Bedrock Converse client
//!
//! One request per call with fixed inference parameters. No retries, no
//! backoff: any transport, auth or API failure propagates to the caller.

use crate::config::BedrockConfig;
use async_trait::async_trait;
use aws_config::{retry::RetryConfig, BehaviorVersion, Region, SdkConfig};
use aws_credential_types::provider::ProvideCredentials;
use aws_sdk_bedrockruntime::{
    config::http::HttpResponse,
    error::{BuildError, DisplayErrorContext, ProvideErrorMetadata, SdkError},
    operation::{converse::ConverseError, RequestId},
    types as bedrock, Client,
};
use tracing::{debug, info, instrument, Span};

/// Upper bound on generated tokens
pub const MAX_TOKENS: i32 = 4000;
pub const TEMPERATURE: f32 = 0.1;
pub const TOP_P: f32 = 0.9;

#[derive(thiserror::Error, Debug)]
pub enum BedrockError {
    #[error("no AWS credentials provider configured")]
    MissingCredentials,
    #[error("failed to resolve AWS credentials: {0}")]
    Credentials(String),
    #[error("invalid Bedrock request: {0}")]
    Build(#[from] BuildError),
    #[error("Bedrock returned {status}: {message}")]
    Api { status: u16, message: String },
    #[error("failed to call Bedrock: {0}")]
    Transport(String),
}

impl From<SdkError<ConverseError, HttpResponse>> for BedrockError {
    fn from(err: SdkError<ConverseError, HttpResponse>) -> Self {
        match &err {
            SdkError::ServiceError(service) => BedrockError::Api {
                status: service.raw().status().as_u16(),
                message: service
                    .err()
                    .message()
                    .map(str::to_string)
                    .unwrap_or_else(|| DisplayErrorContext(service.err()).to_string()),
            },
            _ => BedrockError::Transport(DisplayErrorContext(&err).to_string()),
        }
    }
}

/// A hosted chat-completion capability
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Send one system instruction and one user message, get the raw reply
    async fn converse(&self, system: &str, user_message: &str) -> Result<ConverseResponse, BedrockError>;
}

// ==================== Reply Model ====================

/// Converse API reply. Every level is optional; the translator decides what
/// counts as usable.
#[derive(Debug, Clone, Default)]
pub struct ConverseResponse {
    pub output: Option<ConverseOutput>,
    pub stop_reason: Option<String>,
    pub usage: Option<TokenUsage>,
}

#[derive(Debug, Clone, Default)]
pub struct ConverseOutput {
    pub message: Option<Message>,
}

#[derive(Debug, Clone, Default)]
pub struct Message {
    pub role: String,
    pub content: Vec<ContentBlock>,
}

/// One content block. Non-text blocks (tool use, images) carry `text: None`.
#[derive(Debug, Clone, Default)]
pub struct ContentBlock {
    pub text: Option<String>,
}

impl ContentBlock {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct TokenUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}

impl From<&aws_sdk_bedrockruntime::operation::converse::ConverseOutput> for ConverseResponse {
    fn from(reply: &aws_sdk_bedrockruntime::operation::converse::ConverseOutput) -> Self {
        let output = reply.output().map(|output| ConverseOutput {
            message: output.as_message().ok().map(|message| Message {
                role: message.role().as_str().to_string(),
                content: message
                    .content()
                    .iter()
                    .map(|block| ContentBlock {
                        text: block.as_text().ok().cloned(),
                    })
                    .collect(),
            }),
        });

        Self {
            output,
            stop_reason: Some(reply.stop_reason().as_str().to_string()),
            usage: reply.usage().map(|usage| TokenUsage {
                input_tokens: u64::try_from(usage.input_tokens()).unwrap_or_default(),
                output_tokens: u64::try_from(usage.output_tokens()).unwrap_or_default(),
            }),
        }
    }
}

// ==================== Client ====================

/// Shared AWS config: default credential chain, configured region, optional
/// endpoint override, SDK retries off
pub async fn load_aws_config(config: &BedrockConfig) -> SdkConfig {
    let mut loader = aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(config.region.clone()))
        .retry_config(RetryConfig::disabled());
    if let Some(endpoint) = &config.endpoint_url {
        loader = loader.endpoint_url(endpoint.trim_end_matches('/'));
    }
    loader.load().await
}

/// Bedrock runtime client, built once at startup and shared across requests
pub struct BedrockClient {
    client: Client,
    region: String,
    model_id: String,
}

impl BedrockClient {
    /// Create a client from an already loaded AWS config
    pub fn new(sdk_config: &SdkConfig, model_id: impl Into<String>) -> Self {
        let region = sdk_config
            .region()
            .map(|r| r.to_string())
            .unwrap_or_default();
        let model_id = model_id.into();

        info!("Initialized BedrockClient: model={}, region={}", model_id, region);

        Self {
            client: Client::new(sdk_config),
            region,
            model_id,
        }
    }

    /// Create a client whose credentials come from the AWS default provider
    /// chain: environment, shared profile files, SSO, web identity, container
    /// and instance roles. Fails if the chain cannot resolve anything.
    pub async fn from_env(config: &BedrockConfig) -> Result<Self, BedrockError> {
        let sdk_config = load_aws_config(config).await;

        let provider = sdk_config
            .credentials_provider()
            .ok_or(BedrockError::MissingCredentials)?;
        let credentials = provider
            .provide_credentials()
            .await
            .map_err(|e| BedrockError::Credentials(DisplayErrorContext(&e).to_string()))?;
        debug!(
            temporary = credentials.session_token().is_some(),
            "Resolved AWS credentials"
        );

        if let Some(endpoint) = &config.endpoint_url {
            info!("Using Bedrock endpoint override: {}", endpoint);
        }

        Ok(Self::new(&sdk_config, config.model_id.clone()))
    }
}

#[async_trait]
impl CompletionClient for BedrockClient {
    #[instrument(
        name = "bedrock_converse",
        skip_all,
        fields(
            aws.bedrock_model = %self.model_id,
            aws.region = %self.region,
            aws.bedrock_request_id = tracing::field::Empty,
        )
    )]
    async fn converse(&self, system: &str, user_message: &str) -> Result<ConverseResponse, BedrockError> {
        let message = bedrock::Message::builder()
            .role(bedrock::ConversationRole::User)
            .content(bedrock::ContentBlock::Text(user_message.to_string()))
            .build()?;

        let inference = bedrock::InferenceConfiguration::builder()
            .max_tokens(MAX_TOKENS)
            .temperature(TEMPERATURE)
            .top_p(TOP_P)
            .build();

        debug!("Calling Bedrock converse: {}", self.model_id);

        let reply = self
            .client
            .converse()
            .model_id(&self.model_id)
            .messages(message)
            .system(bedrock::SystemContentBlock::Text(system.to_string()))
            .inference_config(inference)
            .send()
            .await?;

        if let Some(request_id) = reply.request_id() {
            Span::current().record("aws.bedrock_request_id", request_id);
        }

        let parsed = ConverseResponse::from(&reply);

        if let Some(usage) = &parsed.usage {
            debug!(
                input_tokens = usage.input_tokens,
                output_tokens = usage.output_tokens,
                stop_reason = parsed.stop_reason.as_deref().unwrap_or("unknown"),
                "Bedrock converse completed"
            );
        }

        Ok(parsed)
    }
}
