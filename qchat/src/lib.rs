//! Call orchestration for the quill conversational client.
//!
//! [`ChatClient::send_message`] validates input, negotiates parameters with
//! the transport, decodes streamed or whole replies and turns every failure
//! into a localized [`CallResult`]. It never returns an error directly.
//!
//! ```rust
//! use qchat::{CallResult, classify_error};
//!
//! let result = CallResult::failed(classify_error("insufficient_quota"));
//! assert!(!result.success);
//! assert_eq!(result.error.as_deref(), Some("API利用枠が不足しています"));
//! ```

mod classify;
mod decoder;
mod error;
mod service;
mod types;

pub mod prelude {
    pub use crate::{
        CallRequest, CallResult, ChatClient, ChatClientBuilder, ChatError, ChatErrorKind,
        ChunkCallback, ChunkError, ErrorCategory, classify_error,
    };
    pub use tokio_util::sync::CancellationToken;
}

pub use classify::{ErrorCategory, classify_error};
pub use decoder::decode_stream;
pub use error::{ChatError, ChatErrorKind, EMPTY_INPUT_MESSAGE, MISSING_API_KEY_MESSAGE};
pub use service::{ChatClient, ChatClientBuilder};
pub use tokio_util::sync::CancellationToken;
pub use types::{CallRequest, CallResult, ChunkCallback, ChunkError, StreamOutcome};
