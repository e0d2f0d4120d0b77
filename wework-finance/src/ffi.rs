#![allow(unsafe_code)]
//! Internal FFI utilities: RAII guards for SDK output buffers + C string helpers.

use std::ffi::{CString, c_char, c_int};
use std::ptr::{self, NonNull};

use crate::error::{Error, Result};
use crate::native::{MediaData_t, NativeApi, Slice_t};

/// Scoped `Slice_t`: allocated with `NewSlice`, released with `FreeSlice` on drop.
pub(crate) struct SliceGuard<'a, N: NativeApi + ?Sized> {
    native: &'a N,
    ptr: NonNull<Slice_t>,
}

impl<'a, N: NativeApi + ?Sized> SliceGuard<'a, N> {
    /// Allocate a fresh slice. Returns [`Error::NullPointer`] if the SDK returns null.
    pub(crate) fn new(native: &'a N) -> Result<Self> {
        let raw = unsafe { native.new_slice() };
        NonNull::new(raw)
            .map(|ptr| Self { native, ptr })
            .ok_or(Error::NullPointer)
    }

    /// Mutable pointer for the output parameter of a foreign call.
    #[inline]
    pub(crate) fn as_mut_ptr(&self) -> *mut Slice_t {
        self.ptr.as_ptr()
    }

    /// Copy the slice contents out (pointer + length, NUL bytes preserved).
    pub(crate) fn to_vec(&self) -> Vec<u8> {
        let buf = unsafe { self.native.slice_content(self.ptr.as_ptr()) };
        let len = unsafe { self.native.slice_len(self.ptr.as_ptr()) };
        unsafe { copy_bytes(buf, len) }
    }
}

impl<N: NativeApi + ?Sized> Drop for SliceGuard<'_, N> {
    fn drop(&mut self) {
        unsafe { self.native.free_slice(self.ptr.as_ptr()) };
    }
}

/// Scoped `MediaData_t`: allocated with `NewMediaData`, released with
/// `FreeMediaData` on drop.
pub(crate) struct MediaDataGuard<'a, N: NativeApi + ?Sized> {
    native: &'a N,
    ptr: NonNull<MediaData_t>,
}

impl<'a, N: NativeApi + ?Sized> MediaDataGuard<'a, N> {
    /// Allocate a fresh media struct. Returns [`Error::NullPointer`] if the SDK returns null.
    pub(crate) fn new(native: &'a N) -> Result<Self> {
        let raw = unsafe { native.new_media_data() };
        NonNull::new(raw)
            .map(|ptr| Self { native, ptr })
            .ok_or(Error::NullPointer)
    }

    #[inline]
    pub(crate) fn as_mut_ptr(&self) -> *mut MediaData_t {
        self.ptr.as_ptr()
    }

    /// Chunk payload bytes.
    pub(crate) fn data(&self) -> Vec<u8> {
        let buf = unsafe { self.native.media_data(self.ptr.as_ptr()) };
        let len = unsafe { self.native.media_data_len(self.ptr.as_ptr()) };
        unsafe { copy_bytes(buf, len) }
    }

    /// Continuation index for the next request, as UTF-8 text.
    pub(crate) fn index_buf(&self) -> Result<String> {
        let buf = unsafe { self.native.media_index_buf(self.ptr.as_ptr()) };
        let len = unsafe { self.native.media_index_len(self.ptr.as_ptr()) };
        String::from_utf8(unsafe { copy_bytes(buf, len) }).map_err(|_| Error::InvalidUtf8)
    }

    /// Whether this was the last chunk.
    pub(crate) fn is_finish(&self) -> bool {
        unsafe { self.native.media_is_finish(self.ptr.as_ptr()) != 0 }
    }
}

impl<N: NativeApi + ?Sized> Drop for MediaDataGuard<'_, N> {
    fn drop(&mut self) {
        unsafe { self.native.free_media_data(self.ptr.as_ptr()) };
    }
}

/// Copy a **borrowed** `(ptr, len)` buffer into a `Vec`. Does NOT free anything.
/// Null pointers and non-positive lengths yield an empty vector.
unsafe fn copy_bytes(ptr: *const c_char, len: c_int) -> Vec<u8> {
    if ptr.is_null() || len <= 0 {
        return vec![];
    }
    unsafe { std::slice::from_raw_parts(ptr.cast::<u8>(), len.unsigned_abs() as usize) }.to_vec()
}

/// Convert `&str` to `CString` for FFI.
pub(crate) fn to_c_string(s: &str) -> Result<CString> {
    CString::new(s).map_err(|_| Error::InvalidArgument("string contains NUL".into()))
}

/// Convert optional `&str` to optional `CString`.
pub(crate) fn optional_c_string(s: Option<&str>) -> Result<Option<CString>> {
    s.map(to_c_string).transpose()
}

/// Get pointer from an optional `CString` (null if `None`).
pub(crate) fn c_str_ptr(opt: Option<&CString>) -> *const c_char {
    opt.map_or(ptr::null(), |c| c.as_ptr())
}
