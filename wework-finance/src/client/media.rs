//! Chunked media download on top of [`Client::fetch_media`].

use std::fmt;
use std::io::Write;

use super::Client;
use crate::error::{Error, Result};
use crate::native::NativeApi;
use crate::types::{MediaDataResponse, MediaOptions};

/// Iterator over the chunks of one media file.
///
/// Starts with no continuation token and feeds each chunk's `outindexbuf`
/// into the next request. Ends after the chunk flagged `is_finish`, or after
/// the first error. A non-final chunk with an empty `outindexbuf` yields
/// [`Error::MissingContinuation`].
pub struct MediaChunks<'a, N: NativeApi> {
    client: &'a Client<N>,
    file_id: String,
    opts: MediaOptions,
    index: Option<String>,
    done: bool,
}

impl<N: NativeApi> Iterator for MediaChunks<'_, N> {
    type Item = Result<MediaDataResponse>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let result = self
            .client
            .fetch_media(&self.file_id, self.index.as_deref(), &self.opts);
        match result {
            Ok(chunk) if !chunk.is_finish => {
                // An empty index would restart the download from the first chunk.
                if chunk.outindexbuf.is_empty() {
                    self.done = true;
                    return Some(Err(Error::MissingContinuation));
                }
                self.index = Some(chunk.outindexbuf.clone());
                Some(Ok(chunk))
            }
            other => {
                self.done = true;
                Some(other)
            }
        }
    }
}

impl<N: NativeApi> fmt::Debug for MediaChunks<'_, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MediaChunks")
            .field("file_id", &self.file_id)
            .field("index", &self.index)
            .field("done", &self.done)
            .finish_non_exhaustive()
    }
}

impl<N: NativeApi> Client<N> {
    /// Iterate over every chunk of the media file `file_id` (`sdkfileid`).
    #[must_use]
    pub fn media_chunks(&self, file_id: &str, opts: &MediaOptions) -> MediaChunks<'_, N> {
        MediaChunks {
            client: self,
            file_id: file_id.to_owned(),
            opts: opts.clone(),
            index: None,
            done: false,
        }
    }

    /// Download the whole media file into `out`. Returns the number of bytes written.
    pub fn download_media<W: Write + ?Sized>(
        &self,
        file_id: &str,
        out: &mut W,
        opts: &MediaOptions,
    ) -> Result<u64> {
        let mut written = 0u64;
        for chunk in self.media_chunks(file_id, opts) {
            let chunk = chunk?;
            out.write_all(&chunk.data)?;
            written += chunk.data.len() as u64;
        }
        out.flush()?;
        self.in_scope(|| tracing::info!(file_id, bytes = written, "media downloaded"));
        Ok(written)
    }
}
