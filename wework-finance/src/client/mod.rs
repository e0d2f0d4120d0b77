#![allow(unsafe_code)]
//! Finance SDK client — the primary entry point of the crate.

mod media;

pub use media::MediaChunks;

use std::ffi::c_int;
use std::fmt;
use std::path::PathBuf;
use std::ptr::NonNull;

use tracing::Dispatch;

use crate::error::{Error, Result};
use crate::ffi::{MediaDataGuard, SliceGuard, c_str_ptr, optional_c_string, to_c_string};
use crate::native::{FinanceSdk, NativeApi, WeWorkFinanceSdk_t};
use crate::platform;
use crate::types::{
    ChatDataResponse, ChatPageOptions, DEFAULT_TIMEOUT_SECS, MediaDataResponse, MediaOptions,
};

/// An initialized SDK session against the chat-archive service.
///
/// Owns the native `WeWorkFinanceSdk_t` handle and releases it on
/// [`close`](Self::close) or drop. The SDK makes no thread-safety promises,
/// so a client is neither `Send` nor `Sync`; use one client per thread.
pub struct Client<N: NativeApi = FinanceSdk> {
    native: N,
    sdk: Option<NonNull<WeWorkFinanceSdk_t>>,
    default_timeout: u32,
    dispatch: Option<Dispatch>,
}

impl Client {
    /// Create a new [`ClientBuilder`].
    #[must_use]
    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }
}

impl<N: NativeApi> Client<N> {
    /// Fetch one page of encrypted chat records (`GetChatData`).
    ///
    /// Fails if the call itself fails or if the returned page carries a
    /// nonzero embedded `errcode`.
    pub fn fetch_chat_page(&self, opts: &ChatPageOptions) -> Result<ChatDataResponse> {
        self.in_scope(|| -> Result<ChatDataResponse> {
            let timeout = self.effective_timeout(opts.timeout);
            tracing::info!("fetching chat data");
            tracing::debug!(
                start_seq = opts.start_seq,
                limit = opts.limit,
                proxy = %opts.proxy,
                password = redact(&opts.password),
                timeout,
                "GetChatData"
            );
            let sdk = self.sdk_ptr()?;
            let proxy = to_c_string(&opts.proxy)?;
            let passwd = to_c_string(&opts.password)?;

            let slice = SliceGuard::new(&self.native)?;
            let rc = unsafe {
                self.native.get_chat_data(
                    sdk,
                    opts.start_seq,
                    opts.limit,
                    proxy.as_ptr(),
                    passwd.as_ptr(),
                    timeout,
                    slice.as_mut_ptr(),
                )
            };
            tracing::debug!(rc, "GetChatData returned");
            if rc != 0 {
                return Err(Error::sdk(rc, "failed to fetch chat data"));
            }
            let content = slice.to_vec();
            drop(slice);
            tracing::debug!(content = %String::from_utf8_lossy(&content), "chat data payload");

            let resp = ChatDataResponse::from_json(&content)?;
            if resp.errcode != 0 {
                return Err(Error::sdk(resp.errcode, resp.errmsg));
            }
            Ok(resp)
        })
    }

    /// Decrypt one chat record (`DecryptData`).
    ///
    /// `encrypt_key` is the record's `encrypt_random_key` after RSA decryption
    /// with the private key matching its `publickey_ver`. The plaintext is
    /// JSON whose shape depends on the message type.
    pub fn decrypt(&self, encrypt_key: &str, encrypt_msg: &str) -> Result<serde_json::Value> {
        self.in_scope(|| -> Result<serde_json::Value> {
            tracing::info!("decrypting message");
            tracing::debug!(encrypt_key = redact(encrypt_key), encrypt_msg, "DecryptData");
            let c_key = to_c_string(encrypt_key)?;
            let c_msg = to_c_string(encrypt_msg)?;

            let slice = SliceGuard::new(&self.native)?;
            let rc = unsafe {
                self.native
                    .decrypt_data(c_key.as_ptr(), c_msg.as_ptr(), slice.as_mut_ptr())
            };
            if rc != 0 {
                tracing::debug!(rc, "DecryptData returned");
                return Err(Error::sdk(rc, "failed to decrypt message"));
            }
            let content = slice.to_vec();
            drop(slice);

            let value: serde_json::Value = serde_json::from_slice(&content)?;
            tracing::debug!(%value, "decrypted message");
            Ok(value)
        })
    }

    /// Fetch one chunk of a media file (`GetMediaData`).
    ///
    /// Pass `None` (or an empty token) for the first chunk, then the previous
    /// chunk's [`outindexbuf`](MediaDataResponse::outindexbuf) until
    /// [`is_finish`](MediaDataResponse::is_finish) is set. See
    /// [`media_chunks`](Self::media_chunks) for a driver.
    pub fn fetch_media(
        &self,
        file_id: &str,
        continuation: Option<&str>,
        opts: &MediaOptions,
    ) -> Result<MediaDataResponse> {
        self.in_scope(|| -> Result<MediaDataResponse> {
            let timeout = self.effective_timeout(opts.timeout);
            let continuation = continuation.filter(|s| !s.is_empty());
            tracing::info!("downloading media");
            tracing::debug!(
                file_id,
                index_buf = continuation,
                proxy = %opts.proxy,
                password = redact(&opts.password),
                timeout,
                "GetMediaData"
            );
            let sdk = self.sdk_ptr()?;
            let c_index = optional_c_string(continuation)?;
            let c_file = to_c_string(file_id)?;
            let proxy = to_c_string(&opts.proxy)?;
            let passwd = to_c_string(&opts.password)?;

            let media = MediaDataGuard::new(&self.native)?;
            let rc = unsafe {
                self.native.get_media_data(
                    sdk,
                    c_str_ptr(c_index.as_ref()),
                    c_file.as_ptr(),
                    proxy.as_ptr(),
                    passwd.as_ptr(),
                    timeout,
                    media.as_mut_ptr(),
                )
            };
            if rc != 0 {
                tracing::debug!(rc, "GetMediaData returned");
                return Err(Error::sdk(rc, "failed to fetch media data"));
            }
            let chunk = MediaDataResponse {
                data: media.data(),
                outindexbuf: media.index_buf()?,
                is_finish: media.is_finish(),
            };
            drop(media);
            tracing::debug!(
                len = chunk.data.len(),
                outindexbuf = %chunk.outindexbuf,
                is_finish = chunk.is_finish,
                "media chunk"
            );
            Ok(chunk)
        })
    }

    /// Default timeout (seconds) used when a call passes `timeout = 0`.
    #[must_use]
    pub const fn default_timeout(&self) -> u32 {
        self.default_timeout
    }

    /// Whether [`close`](Self::close) has run.
    #[must_use]
    pub const fn is_closed(&self) -> bool {
        self.sdk.is_none()
    }

    /// Destroy the native SDK instance. Safe to call multiple times; later
    /// fetches return [`Error::Closed`].
    pub fn close(&mut self) {
        if let Some(sdk) = self.sdk.take() {
            let native = &self.native;
            in_scope(self.dispatch.as_ref(), || {
                tracing::info!("destroying SDK instance");
                unsafe { native.destroy_sdk(sdk.as_ptr()) };
            });
        }
    }

    fn sdk_ptr(&self) -> Result<*mut WeWorkFinanceSdk_t> {
        self.sdk.map(NonNull::as_ptr).ok_or(Error::Closed)
    }

    /// `0` selects the client default; values beyond `c_int` are clamped.
    fn effective_timeout(&self, timeout: u32) -> c_int {
        let secs = if timeout == 0 {
            self.default_timeout
        } else {
            timeout
        };
        c_int::try_from(secs).unwrap_or(c_int::MAX)
    }

    fn in_scope<T>(&self, f: impl FnOnce() -> T) -> T {
        in_scope(self.dispatch.as_ref(), f)
    }
}

impl<N: NativeApi> Drop for Client<N> {
    fn drop(&mut self) {
        self.close();
    }
}

impl<N: NativeApi> fmt::Debug for Client<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("sdk", &self.sdk)
            .field("default_timeout", &self.default_timeout)
            .field("has_logger", &self.dispatch.is_some())
            .finish_non_exhaustive()
    }
}

/// Builder for constructing a [`Client`].
#[derive(Debug, Clone, Default)]
pub struct ClientBuilder {
    corp_id: Option<String>,
    secret: Option<String>,
    library_path: Option<PathBuf>,
    lib_dir: Option<PathBuf>,
    default_timeout: Option<u32>,
    logger: Option<Dispatch>,
}

impl ClientBuilder {
    /// Set the enterprise (corp) ID.
    #[must_use]
    pub fn corp_id(mut self, id: impl Into<String>) -> Self {
        self.corp_id = Some(id.into());
        self
    }

    /// Set the chat-archive secret.
    #[must_use]
    pub fn secret(mut self, s: impl Into<String>) -> Self {
        self.secret = Some(s.into());
        self
    }

    /// Load the SDK from this exact file instead of the bundled build.
    #[must_use]
    pub fn library_path(mut self, p: impl Into<PathBuf>) -> Self {
        self.library_path = Some(p.into());
        self
    }

    /// Directory holding the bundled builds (see [`platform`]).
    #[must_use]
    pub fn lib_dir(mut self, d: impl Into<PathBuf>) -> Self {
        self.lib_dir = Some(d.into());
        self
    }

    /// Default per-call timeout in seconds (default: 5; `0` keeps the default).
    #[must_use]
    pub fn default_timeout(mut self, secs: u32) -> Self {
        self.default_timeout = Some(secs);
        self
    }

    /// Route this client's log events to `dispatch` instead of the process default.
    #[must_use]
    pub fn logger(mut self, dispatch: Dispatch) -> Self {
        self.logger = Some(dispatch);
        self
    }

    /// Resolve and load the SDK library, then create and initialize the session.
    pub fn build(self) -> Result<Client> {
        let dispatch = self.logger.clone();
        in_scope(dispatch.as_ref(), || -> Result<Client> {
            let path =
                platform::resolve(self.library_path.as_deref(), self.lib_dir.as_deref())?;
            tracing::debug!(path = %path.display(), "loading SDK library");
            let native = unsafe { FinanceSdk::load(&path) }?;
            self.build_with(native)
        })
    }

    /// Create and initialize a session on an already loaded [`NativeApi`].
    pub fn build_with<N: NativeApi>(self, native: N) -> Result<Client<N>> {
        let dispatch = self.logger;
        in_scope(dispatch.clone().as_ref(), move || -> Result<Client<N>> {
            tracing::info!("initializing WeWork finance SDK");
            let corp_id = self.corp_id.ok_or(Error::MissingCredentials("corp_id"))?;
            let secret = self.secret.ok_or(Error::MissingCredentials("secret"))?;
            tracing::debug!(corp_id = %corp_id, secret = redact(&secret), "Init");
            let c_corp = to_c_string(&corp_id)?;
            let c_secret = to_c_string(&secret)?;

            let sdk = NonNull::new(unsafe { native.new_sdk() }).ok_or(Error::NullPointer)?;
            // From here on the handle is owned by `client` and destroyed on any error.
            let client = Client {
                native,
                sdk: Some(sdk),
                default_timeout: self
                    .default_timeout
                    .filter(|t| *t > 0)
                    .unwrap_or(DEFAULT_TIMEOUT_SECS),
                dispatch,
            };
            let rc = unsafe {
                client
                    .native
                    .init(sdk.as_ptr(), c_corp.as_ptr(), c_secret.as_ptr())
            };
            if rc != 0 {
                return Err(Error::sdk(rc, format!("init failed: {rc}")));
            }
            Ok(client)
        })
    }
}

fn in_scope<T>(dispatch: Option<&Dispatch>, f: impl FnOnce() -> T) -> T {
    match dispatch {
        Some(d) => tracing::dispatcher::with_default(d, f),
        None => f(),
    }
}

const fn redact(secret: &str) -> &'static str {
    if secret.is_empty() { "" } else { "***" }
}
