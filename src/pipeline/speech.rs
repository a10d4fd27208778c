//! Speech synthesis pipeline
//!
//! One synthesis call, then the audio goes to the job's target: returned
//! as bytes, written to a file, or uploaded to the object store.

use std::path::{Path, PathBuf};

use bytes::Bytes;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, instrument};

use crate::builder::build_speech_request;
use crate::client::{finish, AiTools};
use crate::error::ToolsResult;
use crate::normalize::normalize_bytes;
use crate::session::Session;
use crate::storage::{sanitize_object_name, validate_container_name};
use crate::telemetry;
use crate::transport::headers::{build_default_headers, ACCEPT_AUDIO};
use crate::transport::{RequestContext, TransportRequest};

/// Content type of synthesized audio
pub const AUDIO_CONTENT_TYPE: &str = "audio/mpeg";

/// Where synthesized audio ends up
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SpeechTarget {
    /// Hand the audio back to the caller
    #[default]
    Bytes,
    /// Create or truncate the file and write the audio to it
    File(PathBuf),
    /// Upload to `container` under the sanitized `name`
    Blob { container: String, name: String },
}

/// A speech synthesis job
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeechJob {
    pub input: String,
    /// Falls back to the session voice
    pub voice: Option<String>,
    pub target: SpeechTarget,
}

impl SpeechJob {
    pub fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            voice: None,
            target: SpeechTarget::Bytes,
        }
    }

    pub fn with_voice(mut self, voice: impl Into<String>) -> Self {
        self.voice = Some(voice.into());
        self
    }

    pub fn to_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.target = SpeechTarget::File(path.into());
        self
    }

    pub fn to_blob(mut self, container: impl Into<String>, name: impl Into<String>) -> Self {
        self.target = SpeechTarget::Blob {
            container: container.into(),
            name: name.into(),
        };
        self
    }
}

/// Result of a speech job, matching its target
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpeechOutput {
    Bytes(Bytes),
    File(PathBuf),
    /// Public URL of the uploaded object
    Blob(String),
}

impl AiTools {
    /// Run a speech job
    #[instrument(skip(self, job), fields(input_len = job.input.len(), destination = ?job.target))]
    pub async fn synthesize(&self, job: SpeechJob) -> ToolsResult<SpeechOutput> {
        let session = self.session();
        let voice = job.voice.as_deref();

        match job.target {
            SpeechTarget::Bytes => self
                .speak(&session, &job.input, voice)
                .await
                .map(SpeechOutput::Bytes),
            SpeechTarget::File(path) => {
                self.speak_to_file(&session, &job.input, voice, &path).await?;
                Ok(SpeechOutput::File(path))
            }
            SpeechTarget::Blob { container, name } => self
                .speak_to_blob(&session, &job.input, voice, &container, &name)
                .await
                .map(SpeechOutput::Blob),
        }
    }

    /// Synthesize `text` with the session voice
    pub async fn text_to_speech(&self, text: &str) -> ToolsResult<Bytes> {
        let session = self.session();
        self.speak(&session, text, None).await
    }

    /// Synthesize `text` into the file at `path`, replacing any existing content
    pub async fn speech_to_file(
        &self,
        text: &str,
        path: impl AsRef<Path>,
        voice: Option<&str>,
    ) -> ToolsResult<()> {
        let session = self.session();
        self.speak_to_file(&session, text, voice, path.as_ref()).await
    }

    /// Synthesize `text` and upload it, returning the object URL
    pub async fn speech_to_blob(
        &self,
        text: &str,
        container: &str,
        name: &str,
        voice: Option<&str>,
    ) -> ToolsResult<String> {
        let session = self.session();
        self.speak_to_blob(&session, text, voice, container, name).await
    }

    async fn speak_to_file(
        &self,
        session: &Session,
        text: &str,
        voice: Option<&str>,
        path: &Path,
    ) -> ToolsResult<()> {
        let audio = self.speak(session, text, voice).await?;
        let mut file = tokio::fs::File::create(path).await?;
        file.write_all(&audio).await?;
        file.flush().await?;
        debug!(path = %path.display(), size = audio.len(), "Speech written to file");
        Ok(())
    }

    async fn speak_to_blob(
        &self,
        session: &Session,
        text: &str,
        voice: Option<&str>,
        container: &str,
        name: &str,
    ) -> ToolsResult<String> {
        // Resolve everything that can fail locally before paying for synthesis
        let store = self.object_store()?.clone();
        validate_container_name(container)?;
        let object_name = sanitize_object_name(name)?;

        let audio = self.speak(session, text, voice).await?;

        store.ensure_container(container).await?;
        let uploaded = store
            .upload(container, &object_name, audio, AUDIO_CONTENT_TYPE)
            .await;
        telemetry::record_upload(store.name(), if uploaded.is_ok() { "ok" } else { "failed" });

        let url = uploaded?;
        info!(container = %container, object_name = %object_name, "Speech uploaded");
        Ok(url)
    }

    async fn speak(&self, session: &Session, text: &str, voice: Option<&str>) -> ToolsResult<Bytes> {
        let ctx = RequestContext::new("speech");
        let payload = build_speech_request(session, text, voice);

        let result: ToolsResult<Bytes> = async {
            let headers = build_default_headers(&session.api_key, ACCEPT_AUDIO)?;
            let request = TransportRequest::post_json(
                &session.speech_endpoint,
                headers,
                serde_json::to_vec(&payload)?,
            );
            normalize_bytes(self.dispatch(&ctx, request).await)
        }
        .await;

        if let Ok(audio) = &result {
            debug!(trace_id = %ctx.trace_id, voice = %payload.voice, size = audio.len(), "Speech synthesized");
        }
        finish(&ctx, &result, None);
        result
    }
}
