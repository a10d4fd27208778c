//! Integration test modules for AiTools

mod analysis;
mod chat;
mod speech;
