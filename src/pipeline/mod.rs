//! Multi-step generation flows
//!
//! Each flow composes builder, transport and normalizer calls against one
//! session snapshot and tolerates partial failure where a partial result
//! makes sense (download slots), short-circuiting where it does not.

pub mod download;
pub mod image;
pub mod speech;

pub use download::download_all;
pub use image::improvement_prompt;
pub use speech::{SpeechJob, SpeechOutput, SpeechTarget, AUDIO_CONTENT_TYPE};
