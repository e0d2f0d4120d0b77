#![doc = include_str!("../README.md")]
#![allow(unsafe_code)]

pub mod client;
pub mod error;
pub mod logger;
pub mod native;
pub mod platform;
pub mod types;

mod ffi;

// Re-export core public API at crate root.
pub use client::{Client, ClientBuilder, MediaChunks};
pub use error::{Error, Result, SdkErrorCode, UNKNOWN_ERROR_MESSAGE};
pub use logger::{init_logger, stdout_logger};
pub use native::NativeApi;
pub use types::{
    ChatDataResponse, ChatPageOptions, DEFAULT_CHAT_LIMIT, DEFAULT_TIMEOUT_SECS,
    EncryptedChatRecord, MediaDataResponse, MediaOptions,
};
