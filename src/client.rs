//! AiTools client
//!
//! Entry point for every operation. Each public method takes one session
//! snapshot at entry and threads it through all of its provider calls, so a
//! concurrent setter is observed either completely or not at all.

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{instrument, warn, Instrument};

use crate::api::{ChatCompletion, Message};
use crate::builder::{build_chat_request, ChatRequest};
use crate::config::Config;
use crate::error::{ToolsError, ToolsResult};
use crate::extract::{extract_object, formatting_prompt, ExtractStrategy};
use crate::normalize::{normalize_bytes, normalize_json};
use crate::session::{Session, SharedSession};
use crate::storage::{HttpBlobStore, ObjectStore};
use crate::telemetry;
use crate::transport::headers::{build_default_headers, ACCEPT_JSON};
use crate::transport::{
    HttpTransport, RequestContext, Transport, TransportError, TransportRequest, TransportResponse,
};

/// Default number of asset downloads in flight at once
pub const DEFAULT_DOWNLOAD_CONCURRENCY: usize = 4;

/// Client for chat, image, analysis and speech endpoints
pub struct AiTools {
    pub(crate) transport: Arc<dyn Transport>,
    pub(crate) store: Option<Arc<dyn ObjectStore>>,
    session: SharedSession,
    pub(crate) download_concurrency: usize,
    extract_strategy: ExtractStrategy,
}

impl AiTools {
    pub fn new(session: Session, transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            store: None,
            session: SharedSession::new(session),
            download_concurrency: DEFAULT_DOWNLOAD_CONCURRENCY,
            extract_strategy: ExtractStrategy::default(),
        }
    }

    /// Build a client with an HTTP transport (and blob store, if configured)
    pub fn from_config(config: &Config) -> ToolsResult<Self> {
        let transport =
            HttpTransport::with_timeout(Duration::from_secs(config.http_timeout_seconds))?;

        let store = config.blob_service_url.as_ref().map(|url| {
            let store = HttpBlobStore::new(transport.client().clone(), url.clone());
            let store = match &config.blob_sas_token {
                Some(token) => store.with_sas_token(token.clone()),
                None => store,
            };
            Arc::new(store) as Arc<dyn ObjectStore>
        });

        let mut tools = Self::new(Session::from(config), Arc::new(transport))
            .with_download_concurrency(config.download_concurrency);
        tools.store = store;
        Ok(tools)
    }

    pub fn with_object_store(mut self, store: Arc<dyn ObjectStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Bound on concurrent asset downloads (at least 1)
    pub fn with_download_concurrency(mut self, limit: usize) -> Self {
        self.download_concurrency = limit.max(1);
        self
    }

    pub fn with_extract_strategy(mut self, strategy: ExtractStrategy) -> Self {
        self.extract_strategy = strategy;
        self
    }

    /// Snapshot of the current session
    pub fn session(&self) -> Arc<Session> {
        self.session.snapshot()
    }

    pub fn set_api_key(&self, api_key: impl Into<String>) {
        let api_key = api_key.into();
        self.session.update(|s| s.api_key = api_key);
    }

    pub fn set_chat_endpoint(&self, endpoint: impl Into<String>) {
        let endpoint = endpoint.into();
        self.session.update(|s| s.chat_endpoint = endpoint);
    }

    pub fn set_image_endpoint(&self, endpoint: impl Into<String>) {
        let endpoint = endpoint.into();
        self.session.update(|s| s.image_endpoint = endpoint);
    }

    pub fn set_speech_endpoint(&self, endpoint: impl Into<String>) {
        let endpoint = endpoint.into();
        self.session.update(|s| s.speech_endpoint = endpoint);
    }

    pub fn set_chat_model(&self, model: impl Into<String>) {
        let model = model.into();
        self.session.update(|s| s.chat_model = model);
    }

    pub fn set_image_model(&self, model: impl Into<String>) {
        let model = model.into();
        self.session.update(|s| s.image_model = model);
    }

    pub fn set_default_max_tokens(&self, max_tokens: u32) {
        self.session.update(|s| s.default_max_tokens = max_tokens);
    }

    /// Width and height are published together
    pub fn set_default_image_dimensions(&self, width: u32, height: u32) {
        self.session.update(|s| {
            s.default_image_width = width;
            s.default_image_height = height;
        });
    }

    pub fn set_voice(&self, voice: impl Into<String>) {
        let voice = voice.into();
        self.session.update(|s| s.voice = voice);
    }

    /// Send a chat request
    #[instrument(skip(self, request), fields(turns = request.turns.len(), images = request.image_urls.len()))]
    pub async fn chat(&self, request: &ChatRequest) -> ToolsResult<ChatCompletion> {
        let session = self.session();
        self.chat_with(&session, request).await
    }

    /// Single prompt, full completion
    pub async fn chat_prompt(&self, prompt: &str) -> ToolsResult<ChatCompletion> {
        self.chat(&ChatRequest::prompt(prompt)).await
    }

    /// Text of the first choice
    pub async fn chat_text(&self, prompt: &str) -> ToolsResult<String> {
        self.chat_text_choice(prompt, 0).await
    }

    /// Text of the choice at `choice`
    pub async fn chat_text_choice(&self, prompt: &str, choice: usize) -> ToolsResult<String> {
        let completion = self.chat_prompt(prompt).await?;
        completion.choice_text(choice).map(str::to_string)
    }

    /// Text of the first choice for a prompt with attached images
    ///
    /// Image references equal to the not-available marker are skipped.
    pub async fn chat_text_with_images<I, S>(&self, prompt: &str, image_urls: I) -> ToolsResult<String>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let request = ChatRequest::prompt(prompt).with_images(image_urls);
        let completion = self.chat(&request).await?;
        completion.first_text().map(str::to_string)
    }

    /// Ask for a `T` and extract it from the reply
    ///
    /// The prompt is suffixed with a JSON example of `T::default()` and sent
    /// in JSON mode.
    #[instrument(skip(self, prompt), fields(shape = std::any::type_name::<T>()))]
    pub async fn chat_object<T>(&self, prompt: &str) -> ToolsResult<T>
    where
        T: Serialize + DeserializeOwned + Default,
    {
        let request = ChatRequest::prompt(formatting_prompt::<T>(prompt)?).json();
        let completion = self.chat(&request).await?;
        extract_object(completion.first_text()?, self.extract_strategy)
    }

    /// Continue a conversation
    ///
    /// A leading system turn replaces the default system role.
    pub async fn continue_conversation(&self, turns: Vec<Message>) -> ToolsResult<ChatCompletion> {
        self.chat(&ChatRequest::conversation(turns)).await
    }

    /// Up to `count` independent replies, one call at a time
    ///
    /// Failed calls are logged and skipped, so the result may be shorter
    /// than `count`.
    #[instrument(skip(self, prompt))]
    pub async fn multiple_chat_responses(&self, prompt: &str, count: usize) -> Vec<String> {
        let session = self.session();
        let request = ChatRequest::prompt(prompt);
        let mut responses = Vec::with_capacity(count);

        for attempt in 0..count {
            let text = self
                .chat_with(&session, &request)
                .await
                .and_then(|c| c.first_text().map(str::to_string));
            match text {
                Ok(text) => responses.push(text),
                Err(e) => warn!(attempt, error = %e, "Skipping failed chat response"),
            }
        }

        responses
    }

    /// GET `{chat_endpoint}/health`, returning the body text
    #[instrument(skip(self))]
    pub async fn check_api_health(&self) -> ToolsResult<String> {
        let session = self.session();
        let ctx = RequestContext::new("health");
        let url = format!("{}/health", session.chat_endpoint.trim_end_matches('/'));

        let result = match build_default_headers(&session.api_key, ACCEPT_JSON) {
            Ok(headers) => {
                let request = TransportRequest::get(url).with_headers(headers);
                normalize_bytes(self.dispatch(&ctx, request).await)
                    .map(|body| String::from_utf8_lossy(&body).into_owned())
            }
            Err(e) => Err(e),
        };

        finish(&ctx, &result, None);
        result
    }

    /// Chat round-trip against an explicit snapshot
    pub(crate) async fn chat_with(
        &self,
        session: &Session,
        request: &ChatRequest,
    ) -> ToolsResult<ChatCompletion> {
        let ctx = RequestContext::new("chat").with_model(&session.chat_model);
        let payload = build_chat_request(session, request);

        let result: ToolsResult<ChatCompletion> = self
            .post_json(&ctx, session, &session.chat_endpoint, &payload)
            .await;

        if let Ok(completion) = &result {
            if let Some(usage) = &completion.usage {
                telemetry::record_usage(usage, &completion.model);
            }
        }
        finish(
            &ctx,
            &result,
            result.as_ref().ok().and_then(ChatCompletion::total_tokens),
        );
        result
    }

    /// POST a JSON payload with the session credential and normalize the reply
    pub(crate) async fn post_json<B, T>(
        &self,
        ctx: &RequestContext,
        session: &Session,
        url: &str,
        payload: &B,
    ) -> ToolsResult<T>
    where
        B: Serialize,
        T: DeserializeOwned,
    {
        let headers = build_default_headers(&session.api_key, ACCEPT_JSON)?;
        let request = TransportRequest::post_json(url, headers, serde_json::to_vec(payload)?);
        normalize_json(self.dispatch(ctx, request).await)
    }

    /// Send through the transport with request/response logging
    pub(crate) async fn dispatch(
        &self,
        ctx: &RequestContext,
        request: TransportRequest,
    ) -> Result<TransportResponse, TransportError> {
        ctx.log_upstream_request(&request.url, request.body_len());

        let outcome = self
            .transport
            .send(request)
            .instrument(ctx.create_span())
            .await;

        if let Ok(response) = &outcome {
            ctx.log_upstream_response(response.status.as_u16(), response.body.len());
        }
        outcome
    }

    pub(crate) fn object_store(&self) -> ToolsResult<&Arc<dyn ObjectStore>> {
        self.store
            .as_ref()
            .ok_or_else(|| ToolsError::Storage("no object store configured".to_string()))
    }
}

/// Log and count the outcome of one logical call
pub(crate) fn finish<T>(ctx: &RequestContext, result: &ToolsResult<T>, tokens: Option<u32>) {
    match result {
        Ok(_) => {
            ctx.log_request_complete(tokens);
            telemetry::record_call(&ctx.endpoint, "success", ctx.elapsed_secs());
        }
        Err(e) => {
            ctx.log_failure(e);
            telemetry::record_call(&ctx.endpoint, e.kind(), ctx.elapsed_secs());
        }
    }
}
