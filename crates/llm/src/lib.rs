//! Unified chat types for the pelican multi-provider LLM interface.
//!
//! This crate provides the shared types used across all providers:
//! `Message`, `Role`, `Content`, `Response`, `StreamChunk`, and the
//! message-history normalization pass that rewrites application-level
//! roles (`ai-<model>`) into plain provider roles before a request is
//! built.

pub use message::{Content, Message, MessageBuilder, Part, Role, estimate_tokens};
pub use normalize::{
    AttachmentStore, REFERENCE_MARKER, inject_attachments, normalize_history, normalize_roles,
};
pub use response::{Choice, CompletionMeta, Delta, FinishReason, Response, Usage};
pub use stream::{ChunkChoice, StreamChunk};

mod message;
mod normalize;
mod response;
mod stream;
