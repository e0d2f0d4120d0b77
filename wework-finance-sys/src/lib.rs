//! Raw FFI bindings to `libWeWorkFinanceSdk_C` — the WeCom finance (chat archive) SDK.
//!
//! The vendor ships the SDK only as a prebuilt shared library
//! (`WeWorkFinanceSdk.dll`, `libWeWorkFinanceSdk_C_x86.so`,
//! `libWeWorkFinanceSdk_C_arm.so`), so nothing is linked at build time.
//! [`FinanceSdk::load`] opens the library at runtime with
//! [`libloading`](https://docs.rs/libloading) and resolves every entry point
//! declared in `WeWorkFinanceSdk_C.h` up front.
//!
//! Struct layouts and signatures mirror the C header one-to-one. Do not
//! reorder fields or change integer widths: a mismatch is undefined behavior,
//! not an error.

// sys crate: unsafe FFI, names follow the C header
#![allow(
    unsafe_code,
    missing_docs,
    non_camel_case_types,
    non_snake_case,
    clippy::missing_safety_doc
)]

use std::ffi::{OsStr, c_char, c_int, c_uint, c_ulonglong};
use std::fmt;

use libloading::Library;

/// Opaque SDK instance (`WeWorkFinanceSdk_t`).
#[repr(C)]
pub struct WeWorkFinanceSdk_t {
    _data: [u8; 0],
    _marker: core::marker::PhantomData<(*mut u8, core::marker::PhantomPinned)>,
}

/// Output buffer for `GetChatData` and `DecryptData` (`Slice_t`).
#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct Slice_t {
    /// Payload bytes, owned by the SDK.
    pub buf: *mut c_char,
    /// Payload length in bytes.
    pub len: c_int,
}

/// Output buffer for `GetMediaData` (`MediaData_t`).
#[repr(C)]
#[derive(Debug, Copy, Clone)]
pub struct MediaData_t {
    /// Continuation index for the next chunk request.
    pub outindexbuf: *mut c_char,
    /// Length of `outindexbuf`.
    pub out_len: c_int,
    /// Chunk payload (may contain NUL bytes).
    pub data: *mut c_char,
    /// Length of `data`.
    pub data_len: c_int,
    /// Nonzero once the last chunk has been delivered.
    pub is_finish: c_int,
}

pub type NewSdkFn = unsafe extern "C" fn() -> *mut WeWorkFinanceSdk_t;
pub type InitFn =
    unsafe extern "C" fn(*mut WeWorkFinanceSdk_t, *const c_char, *const c_char) -> c_int;
pub type GetChatDataFn = unsafe extern "C" fn(
    *mut WeWorkFinanceSdk_t,
    c_ulonglong,
    c_uint,
    *const c_char,
    *const c_char,
    c_int,
    *mut Slice_t,
) -> c_int;
pub type DecryptDataFn = unsafe extern "C" fn(*const c_char, *const c_char, *mut Slice_t) -> c_int;
pub type GetMediaDataFn = unsafe extern "C" fn(
    *mut WeWorkFinanceSdk_t,
    *const c_char,
    *const c_char,
    *const c_char,
    *const c_char,
    c_int,
    *mut MediaData_t,
) -> c_int;
pub type DestroySdkFn = unsafe extern "C" fn(*mut WeWorkFinanceSdk_t);
pub type NewSliceFn = unsafe extern "C" fn() -> *mut Slice_t;
pub type FreeSliceFn = unsafe extern "C" fn(*mut Slice_t);
pub type GetContentFromSliceFn = unsafe extern "C" fn(*mut Slice_t) -> *mut c_char;
pub type GetSliceLenFn = unsafe extern "C" fn(*mut Slice_t) -> c_int;
pub type NewMediaDataFn = unsafe extern "C" fn() -> *mut MediaData_t;
pub type FreeMediaDataFn = unsafe extern "C" fn(*mut MediaData_t);
pub type GetOutIndexBufFn = unsafe extern "C" fn(*mut MediaData_t) -> *mut c_char;
pub type GetDataFn = unsafe extern "C" fn(*mut MediaData_t) -> *mut c_char;
pub type GetIndexLenFn = unsafe extern "C" fn(*mut MediaData_t) -> c_int;
pub type GetDataLenFn = unsafe extern "C" fn(*mut MediaData_t) -> c_int;
pub type IsMediaDataFinishFn = unsafe extern "C" fn(*mut MediaData_t) -> c_int;

/// Every entry point of the SDK, resolved from one loaded library.
///
/// The function pointers stay valid for as long as this value lives: the
/// [`Library`] is unloaded only when it is dropped.
pub struct FinanceSdk {
    pub NewSdk: NewSdkFn,
    pub Init: InitFn,
    pub GetChatData: GetChatDataFn,
    pub DecryptData: DecryptDataFn,
    pub GetMediaData: GetMediaDataFn,
    pub DestroySdk: DestroySdkFn,
    pub NewSlice: NewSliceFn,
    pub FreeSlice: FreeSliceFn,
    pub GetContentFromSlice: GetContentFromSliceFn,
    pub GetSliceLen: GetSliceLenFn,
    pub NewMediaData: NewMediaDataFn,
    pub FreeMediaData: FreeMediaDataFn,
    pub GetOutIndexBuf: GetOutIndexBufFn,
    pub GetData: GetDataFn,
    pub GetIndexLen: GetIndexLenFn,
    pub GetDataLen: GetDataLenFn,
    pub IsMediaDataFinish: IsMediaDataFinishFn,
    _lib: Library,
}

impl FinanceSdk {
    /// Open the shared library at `path` and resolve all SDK symbols.
    ///
    /// # Safety
    ///
    /// Loading runs the library's initializers. `path` must point at a
    /// genuine build of the WeCom finance SDK whose exports match the
    /// signatures declared in this crate.
    pub unsafe fn load(path: impl AsRef<OsStr>) -> Result<Self, libloading::Error> {
        let lib = unsafe { Library::new(path.as_ref())? };

        macro_rules! sym {
            ($name:literal, $ty:ty) => {{
                let sym: libloading::Symbol<'_, $ty> = unsafe { lib.get($name)? };
                *sym
            }};
        }

        Ok(Self {
            NewSdk: sym!(b"NewSdk\0", NewSdkFn),
            Init: sym!(b"Init\0", InitFn),
            GetChatData: sym!(b"GetChatData\0", GetChatDataFn),
            DecryptData: sym!(b"DecryptData\0", DecryptDataFn),
            GetMediaData: sym!(b"GetMediaData\0", GetMediaDataFn),
            DestroySdk: sym!(b"DestroySdk\0", DestroySdkFn),
            NewSlice: sym!(b"NewSlice\0", NewSliceFn),
            FreeSlice: sym!(b"FreeSlice\0", FreeSliceFn),
            GetContentFromSlice: sym!(b"GetContentFromSlice\0", GetContentFromSliceFn),
            GetSliceLen: sym!(b"GetSliceLen\0", GetSliceLenFn),
            NewMediaData: sym!(b"NewMediaData\0", NewMediaDataFn),
            FreeMediaData: sym!(b"FreeMediaData\0", FreeMediaDataFn),
            GetOutIndexBuf: sym!(b"GetOutIndexBuf\0", GetOutIndexBufFn),
            GetData: sym!(b"GetData\0", GetDataFn),
            GetIndexLen: sym!(b"GetIndexLen\0", GetIndexLenFn),
            GetDataLen: sym!(b"GetDataLen\0", GetDataLenFn),
            IsMediaDataFinish: sym!(b"IsMediaDataFinish\0", IsMediaDataFinishFn),
            _lib: lib,
        })
    }
}

impl fmt::Debug for FinanceSdk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FinanceSdk")
            .field("lib", &self._lib)
            .finish_non_exhaustive()
    }
}
