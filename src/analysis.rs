//! Image analysis
//!
//! POSTs to `{image_endpoint}/analyze`, either a JSON reference to a remote
//! image or the raw bytes of a local one, and returns the label names in the
//! order the provider listed them.

use bytes::Bytes;
use reqwest::header::{HeaderValue, CONTENT_TYPE};
use reqwest::Method;
use tracing::instrument;

use crate::api::ImageAnalysisResponse;
use crate::builder::build_analysis_request;
use crate::client::{finish, AiTools};
use crate::error::ToolsResult;
use crate::normalize::normalize_json;
use crate::session::Session;
use crate::transport::headers::{build_default_headers, ACCEPT_JSON};
use crate::transport::{RequestContext, TransportRequest};

/// Content type sent with local image bytes
pub const LOCAL_IMAGE_CONTENT_TYPE: &str = "image/jpeg";

fn analyze_url(session: &Session) -> String {
    format!("{}/analyze", session.image_endpoint.trim_end_matches('/'))
}

impl AiTools {
    /// Labels for a remote image
    pub async fn analyze_image(&self, image_url: &str) -> ToolsResult<Vec<String>> {
        self.analyze_remote(image_url, None).await
    }

    /// Labels for a remote image, with free-form instructions
    pub async fn analyze_image_with(
        &self,
        image_url: &str,
        instructions: &str,
    ) -> ToolsResult<Vec<String>> {
        self.analyze_remote(image_url, Some(instructions)).await
    }

    /// Labels for image bytes uploaded directly
    #[instrument(skip(self, image), fields(size = image.len()))]
    pub async fn analyze_local_image(&self, image: Bytes) -> ToolsResult<Vec<String>> {
        let session = self.session();
        let ctx = RequestContext::new("analyze").with_model(&session.image_model);

        let result = match build_default_headers(&session.api_key, ACCEPT_JSON) {
            Ok(mut headers) => {
                headers.insert(
                    CONTENT_TYPE,
                    HeaderValue::from_static(LOCAL_IMAGE_CONTENT_TYPE),
                );
                let request = TransportRequest {
                    method: Method::POST,
                    url: analyze_url(&session),
                    headers,
                    body: Some(image),
                };
                normalize_json::<ImageAnalysisResponse>(self.dispatch(&ctx, request).await)
                    .map(ImageAnalysisResponse::label_names)
            }
            Err(e) => Err(e),
        };

        finish(&ctx, &result, None);
        result
    }

    #[instrument(skip(self))]
    async fn analyze_remote(
        &self,
        image_url: &str,
        instructions: Option<&str>,
    ) -> ToolsResult<Vec<String>> {
        let session = self.session();
        let ctx = RequestContext::new("analyze").with_model(&session.image_model);
        let payload = build_analysis_request(&session, image_url, instructions);

        let result = self
            .post_json::<_, ImageAnalysisResponse>(&ctx, &session, &analyze_url(&session), &payload)
            .await
            .map(ImageAnalysisResponse::label_names);

        finish(&ctx, &result, None);
        result
    }
}
