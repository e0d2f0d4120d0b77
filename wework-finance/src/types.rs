//! Response models and per-call request options.

use serde::{Deserialize, Serialize};

/// Default page size for [`Client::fetch_chat_page`](crate::Client::fetch_chat_page).
pub const DEFAULT_CHAT_LIMIT: u32 = 1000;

/// Default per-call timeout of a client, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u32 = 5;

/// One archived message, still encrypted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedChatRecord {
    /// Archive sequence number. Pass the last one as `start_seq` to page on.
    pub seq: u64,
    /// Message ID.
    pub msgid: String,
    /// Version of the public key the message key was encrypted with.
    pub publickey_ver: u32,
    /// RSA-encrypted, base64-encoded symmetric key.
    pub encrypt_random_key: String,
    /// Encrypted message body.
    pub encrypt_chat_msg: String,
}

/// One page of the chat archive, as returned by `GetChatData`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatDataResponse {
    /// Embedded error code (`0` = success).
    #[serde(default)]
    pub errcode: i32,
    /// Embedded error message.
    #[serde(default)]
    pub errmsg: String,
    /// Records in archive sequence order.
    #[serde(default)]
    pub chatdata: Vec<EncryptedChatRecord>,
}

impl ChatDataResponse {
    /// Parse the JSON payload of a `GetChatData` slice.
    pub fn from_json(bytes: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(bytes)
    }

    /// Sequence number of the last record, if any.
    #[must_use]
    pub fn last_seq(&self) -> Option<u64> {
        self.chatdata.last().map(|r| r.seq)
    }
}

/// One chunk of a media file, as returned by `GetMediaData`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MediaDataResponse {
    /// Chunk bytes.
    pub data: Vec<u8>,
    /// Continuation token for the next chunk request.
    pub outindexbuf: String,
    /// Whether this is the final chunk.
    pub is_finish: bool,
}

/// Options for [`Client::fetch_chat_page`](crate::Client::fetch_chat_page).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatPageOptions {
    /// Exclusive lower bound on `seq` (`0` = from the beginning).
    pub start_seq: u64,
    /// Maximum number of records in the page.
    pub limit: u32,
    /// Proxy URL, e.g. `socks5://10.0.0.1:8081`. Empty = none.
    pub proxy: String,
    /// Proxy credentials, e.g. `user:pass`. Empty = none.
    pub password: String,
    /// Timeout in seconds. `0` = the client's default.
    pub timeout: u32,
}

impl Default for ChatPageOptions {
    fn default() -> Self {
        Self {
            start_seq: 0,
            limit: DEFAULT_CHAT_LIMIT,
            proxy: String::new(),
            password: String::new(),
            timeout: 0,
        }
    }
}

/// Options for [`Client::fetch_media`](crate::Client::fetch_media).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MediaOptions {
    /// Proxy URL. Empty = none.
    pub proxy: String,
    /// Proxy credentials. Empty = none.
    pub password: String,
    /// Timeout in seconds. `0` = the client's default.
    pub timeout: u32,
}
