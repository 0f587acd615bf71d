//! OpenAI-compatible chat-completions integration.

pub mod client;
pub mod stream;

pub use client::{ChatCompletionsBackend, DEFAULT_MAX_TOKENS};
pub use stream::{SseDecoder, SseEvent, StreamAccumulator, parse_delta};
