//! Unified error types and the vendor error-code table.

use std::path::PathBuf;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Message used for codes missing from the vendor table.
pub const UNKNOWN_ERROR_MESSAGE: &str = "未知错误";

/// Top-level error type for the finance SDK binding.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The SDK (or an embedded `errcode` in its response) reported a failure.
    #[error("wework finance error {code}: {message}")]
    Sdk {
        /// Native return code or embedded `errcode`.
        code: i32,
        /// Resolved human-readable message.
        message: String,
    },

    /// The native library file does not exist.
    #[error("SDK library not found: {}", .0.display())]
    LibraryNotFound(PathBuf),

    /// No bundled SDK build exists for this OS / CPU architecture.
    #[error("unsupported platform: {0}")]
    UnsupportedPlatform(String),

    /// The native library exists but could not be loaded or lacks a symbol.
    #[error("failed to load SDK library: {0}")]
    Load(#[from] libloading::Error),

    /// A required builder field was not set.
    #[error("missing credential: {0}")]
    MissingCredentials(&'static str),

    /// A returned pointer was unexpectedly null.
    #[error("unexpected null pointer from FFI")]
    NullPointer,

    /// Bytes received from FFI were not valid UTF-8.
    #[error("invalid UTF-8 in FFI string")]
    InvalidUtf8,

    /// An argument passed to the SDK was invalid.
    #[error("{0}")]
    InvalidArgument(String),

    /// The SDK returned a payload that is not the expected JSON.
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),

    /// Writing downloaded data failed.
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    /// The client was already closed.
    #[error("client is closed")]
    Closed,

    /// A media chunk is not the last one but carries no continuation index.
    #[error("media chunk without continuation index")]
    MissingContinuation,

    /// The process-wide logger could not be installed.
    #[error("logger: {0}")]
    Logger(String),
}

impl Error {
    /// Build an [`Error::Sdk`], resolving an empty `message` through the
    /// vendor table, and log it.
    pub fn sdk(code: i32, message: impl Into<String>) -> Self {
        let mut message = message.into();
        if message.is_empty() {
            message = SdkErrorCode::message_for(code).to_owned();
        }
        tracing::error!(code, %message, "wework finance error");
        Self::Sdk { code, message }
    }

    /// Native error code, if this is an [`Error::Sdk`].
    #[must_use]
    pub const fn code(&self) -> Option<i32> {
        match self {
            Self::Sdk { code, .. } => Some(*code),
            _ => None,
        }
    }
}

/// Known error codes returned by the finance SDK.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum SdkErrorCode {
    /// 参数错误，请求参数错误
    InvalidParameter = 10000,
    /// 网络错误，网络请求错误
    Network = 10001,
    /// 数据解析失败
    DataParse = 10002,
    /// 系统失败
    System = 10003,
    /// 密钥错误导致加密失败
    EncryptKey = 10004,
    /// fileid错误
    InvalidFileId = 10005,
    /// 解密失败
    Decrypt = 10006,
    /// 找不到消息加密版本的私钥，需要重新传入私钥对
    PrivateKeyNotFound = 10007,
    /// 解析encrypt_key出错
    ParseEncryptKey = 10008,
    /// ip非法
    IllegalIp = 10009,
    /// 数据过期
    DataExpired = 10010,
    /// 证书错误
    Certificate = 10011,
}

impl SdkErrorCode {
    /// All known codes, in numeric order.
    pub const ALL: [Self; 12] = [
        Self::InvalidParameter,
        Self::Network,
        Self::DataParse,
        Self::System,
        Self::EncryptKey,
        Self::InvalidFileId,
        Self::Decrypt,
        Self::PrivateKeyNotFound,
        Self::ParseEncryptKey,
        Self::IllegalIp,
        Self::DataExpired,
        Self::Certificate,
    ];

    /// Convert from a native code. Returns `None` for unknown values.
    #[must_use]
    pub fn from_code(code: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.code() == code)
    }

    /// Numeric code.
    #[must_use]
    pub const fn code(self) -> i32 {
        self as i32
    }

    /// Vendor-documented message for this code.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::InvalidParameter => "参数错误，请求参数错误",
            Self::Network => "网络错误，网络请求错误",
            Self::DataParse => "数据解析失败",
            Self::System => "系统失败",
            Self::EncryptKey => "密钥错误导致加密失败",
            Self::InvalidFileId => "fileid错误",
            Self::Decrypt => "解密失败",
            Self::PrivateKeyNotFound => "找不到消息加密版本的私钥，需要重新传入私钥对",
            Self::ParseEncryptKey => "解析encrypt_key出错",
            Self::IllegalIp => "ip非法",
            Self::DataExpired => "数据过期",
            Self::Certificate => "证书错误",
        }
    }

    /// Table lookup with the unknown-error fallback.
    #[must_use]
    pub fn message_for(code: i32) -> &'static str {
        Self::from_code(code).map_or(UNKNOWN_ERROR_MESSAGE, Self::message)
    }
}
