//! Image generation pipeline
//!
//! `Start -> (prompt improvement) -> generate -> urls -> (downloads)`.
//! A failed improvement call ends the job before anything is generated.

use bytes::Bytes;
use tracing::{debug, instrument, warn};

use super::download::download_all;
use crate::api::{ImageGeneration, ImageGenerationResponse, NOT_AVAILABLE_URL};
use crate::builder::{build_image_request, ChatRequest, ImageJob, PromptMode};
use crate::client::{finish, AiTools};
use crate::error::ToolsResult;
use crate::session::Session;
use crate::transport::RequestContext;

/// Instruction sent to the chat model when a job asks for prompt improvement
pub fn improvement_prompt(image_model: &str, prompt: &str) -> String {
    format!(
        "Please generate an improved image prompt for {} from this information. \
         This will not be read by a human, reply with the prompt only.\n{}",
        image_model, prompt
    )
}

fn single(job: &ImageJob) -> ImageJob {
    job.clone().with_count(1)
}

impl AiTools {
    /// Generate images, returning URLs and revised prompts in provider order
    #[instrument(skip(self, job), fields(count = job.count, improve = ?job.prompt_mode))]
    pub async fn image_response(&self, job: &ImageJob) -> ToolsResult<ImageGeneration> {
        let session = self.session();
        self.generate_images(&session, job).await
    }

    /// Generate a single image and return its URL
    ///
    /// The job's count is ignored; exactly one image is requested.
    pub async fn image_url(&self, job: &ImageJob) -> ToolsResult<String> {
        let generation = self.image_response(&single(job)).await?;
        generation.url(0).map(str::to_string)
    }

    /// URLs of all generated images; entries without a URL hold the marker
    pub async fn image_urls(&self, job: &ImageJob) -> ToolsResult<Vec<String>> {
        Ok(self.image_response(job).await?.urls)
    }

    /// Like [`AiTools::image_urls`] but a failed job yields `["Error"]`
    pub async fn image_urls_or_marker(&self, job: &ImageJob) -> Vec<String> {
        match self.image_urls(job).await {
            Ok(urls) => urls,
            Err(e) => {
                warn!(error = %e, "Image generation failed, returning marker");
                vec![NOT_AVAILABLE_URL.to_string()]
            }
        }
    }

    /// Generate one image and download it
    ///
    /// The job's count is ignored. An unavailable or undownloadable image
    /// yields an empty buffer.
    #[instrument(skip(self, job))]
    pub async fn download_image(&self, job: &ImageJob) -> ToolsResult<Bytes> {
        let session = self.session();
        let generation = self.generate_images(&session, &single(job)).await?;
        let first = &generation.urls[..generation.urls.len().min(1)];
        let mut slots = download_all(self.transport.as_ref(), first, 1).await;
        Ok(slots.pop().unwrap_or_default())
    }

    /// Generate images and download all of them concurrently
    ///
    /// Slot `i` holds the image at URL `i`; a failed download leaves its slot
    /// empty without affecting the others.
    #[instrument(skip(self, job), fields(count = job.count))]
    pub async fn download_images(&self, job: &ImageJob) -> ToolsResult<Vec<Bytes>> {
        let session = self.session();
        let generation = self.generate_images(&session, job).await?;
        Ok(download_all(
            self.transport.as_ref(),
            &generation.urls,
            self.download_concurrency,
        )
        .await)
    }

    pub(crate) async fn generate_images(
        &self,
        session: &Session,
        job: &ImageJob,
    ) -> ToolsResult<ImageGeneration> {
        job.validate()?;

        let prompt = match job.prompt_mode {
            PromptMode::AsIs => job.prompt.clone(),
            PromptMode::Improve => self.improve_prompt(session, &job.prompt).await?,
        };

        let ctx = RequestContext::new("images").with_model(&session.image_model);
        let result = match build_image_request(session, job, &prompt) {
            Ok(payload) => {
                debug!(trace_id = %ctx.trace_id, size = %payload.size, n = payload.n, "Built image request");
                self.post_json::<_, ImageGenerationResponse>(
                    &ctx,
                    session,
                    &session.image_endpoint,
                    &payload,
                )
                .await
                .map(ImageGeneration::from)
            }
            Err(e) => Err(e),
        };

        finish(&ctx, &result, None);
        result
    }

    async fn improve_prompt(&self, session: &Session, prompt: &str) -> ToolsResult<String> {
        let request = ChatRequest::prompt(improvement_prompt(&session.image_model, prompt));
        let completion = self.chat_with(session, &request).await?;
        let improved = completion.first_text()?.trim().to_string();
        debug!(original_len = prompt.len(), improved_len = improved.len(), "Prompt improved");
        Ok(improved)
    }
}
