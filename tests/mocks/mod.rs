//! Mock infrastructure for external services
//!
//! - Provider API (chat, images, speech, analysis, generated assets)
//! - Blob service (containers and block blob uploads)

pub mod blob;

pub use blob::*;
pub use provider::*;
