//! Session configuration snapshots
//!
//! A [`Session`] is an immutable value holding endpoints, model ids, the
//! credential and the request defaults. [`SharedSession`] wraps the current
//! session behind a lock and hands out `Arc` snapshots: every operation takes
//! one snapshot at entry and uses it for all of its provider calls, so a
//! concurrent setter is observed either completely or not at all.

use std::sync::{Arc, RwLock};

use crate::config::{
    Config, DEFAULT_CHAT_ENDPOINT, DEFAULT_CHAT_MODEL, DEFAULT_IMAGE_ENDPOINT,
    DEFAULT_IMAGE_MODEL, DEFAULT_IMAGE_SIZE, DEFAULT_MAX_TOKENS, DEFAULT_SPEECH_ENDPOINT,
    DEFAULT_VOICE,
};

/// Endpoint, model, credential and default settings used by one operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub chat_endpoint: String,
    pub image_endpoint: String,
    pub speech_endpoint: String,
    pub chat_model: String,
    pub image_model: String,
    pub api_key: String,
    /// Floor for every chat token budget
    pub default_max_tokens: u32,
    /// Floor for every requested image width
    pub default_image_width: u32,
    /// Floor for every requested image height
    pub default_image_height: u32,
    /// Voice used when a speech job does not name one
    pub voice: String,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            chat_endpoint: DEFAULT_CHAT_ENDPOINT.to_string(),
            image_endpoint: DEFAULT_IMAGE_ENDPOINT.to_string(),
            speech_endpoint: DEFAULT_SPEECH_ENDPOINT.to_string(),
            chat_model: DEFAULT_CHAT_MODEL.to_string(),
            image_model: DEFAULT_IMAGE_MODEL.to_string(),
            api_key: String::new(),
            default_max_tokens: DEFAULT_MAX_TOKENS,
            default_image_width: DEFAULT_IMAGE_SIZE,
            default_image_height: DEFAULT_IMAGE_SIZE,
            voice: DEFAULT_VOICE.to_string(),
        }
    }
}

impl From<&Config> for Session {
    fn from(config: &Config) -> Self {
        Self {
            chat_endpoint: config.chat_endpoint.clone(),
            image_endpoint: config.image_endpoint.clone(),
            speech_endpoint: config.speech_endpoint.clone(),
            chat_model: config.chat_model.clone(),
            image_model: config.image_model.clone(),
            api_key: config.api_key.clone(),
            default_max_tokens: config.default_max_tokens,
            default_image_width: config.default_image_width,
            default_image_height: config.default_image_height,
            voice: config.voice.clone(),
        }
    }
}

/// Shared, last-write-wins holder of the current [`Session`]
#[derive(Debug, Default)]
pub struct SharedSession {
    current: RwLock<Arc<Session>>,
}

impl SharedSession {
    pub fn new(session: Session) -> Self {
        Self {
            current: RwLock::new(Arc::new(session)),
        }
    }

    /// Take a consistent snapshot of the current settings
    pub fn snapshot(&self) -> Arc<Session> {
        let guard = self.current.read().unwrap_or_else(|e| e.into_inner());
        Arc::clone(&guard)
    }

    /// Apply a mutation and publish the result as the new current session
    ///
    /// Snapshots taken before the call keep seeing the old values.
    pub fn update<F>(&self, mutate: F)
    where
        F: FnOnce(&mut Session),
    {
        let mut guard = self.current.write().unwrap_or_else(|e| e.into_inner());
        let mut next = Session::clone(&guard);
        mutate(&mut next);
        *guard = Arc::new(next);
    }
}
