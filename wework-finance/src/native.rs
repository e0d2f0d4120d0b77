#![allow(unsafe_code)]
//! The seam between the safe client and the SDK's C entry points.
//!
//! [`NativeApi`] has one method per exported function of
//! `WeWorkFinanceSdk_C.h`. The production implementation forwards to the
//! symbols resolved by [`wework_finance_sys::FinanceSdk`]; tests plug in a
//! fake that records buffer allocations.

use std::ffi::{c_char, c_int, c_uint, c_ulonglong};

pub use wework_finance_sys::{FinanceSdk, MediaData_t, Slice_t, WeWorkFinanceSdk_t};

/// Raw SDK entry points, matching the C ABI one-to-one.
///
/// # Safety
///
/// Every method is a direct foreign call. Callers must pass pointers that
/// were produced by the matching allocator of the same implementation and
/// not yet freed, and NUL-terminated strings that outlive the call.
pub trait NativeApi {
    /// `NewSdk`
    unsafe fn new_sdk(&self) -> *mut WeWorkFinanceSdk_t;
    /// `Init`
    unsafe fn init(
        &self,
        sdk: *mut WeWorkFinanceSdk_t,
        corp_id: *const c_char,
        secret: *const c_char,
    ) -> c_int;
    /// `GetChatData`
    #[allow(clippy::too_many_arguments)]
    unsafe fn get_chat_data(
        &self,
        sdk: *mut WeWorkFinanceSdk_t,
        seq: c_ulonglong,
        limit: c_uint,
        proxy: *const c_char,
        passwd: *const c_char,
        timeout: c_int,
        out: *mut Slice_t,
    ) -> c_int;
    /// `DecryptData`
    unsafe fn decrypt_data(
        &self,
        encrypt_key: *const c_char,
        encrypt_msg: *const c_char,
        out: *mut Slice_t,
    ) -> c_int;
    /// `GetMediaData`. `index_buf` is null on the first chunk.
    #[allow(clippy::too_many_arguments)]
    unsafe fn get_media_data(
        &self,
        sdk: *mut WeWorkFinanceSdk_t,
        index_buf: *const c_char,
        file_id: *const c_char,
        proxy: *const c_char,
        passwd: *const c_char,
        timeout: c_int,
        out: *mut MediaData_t,
    ) -> c_int;
    /// `DestroySdk`
    unsafe fn destroy_sdk(&self, sdk: *mut WeWorkFinanceSdk_t);

    /// `NewSlice`
    unsafe fn new_slice(&self) -> *mut Slice_t;
    /// `FreeSlice`
    unsafe fn free_slice(&self, slice: *mut Slice_t);
    /// `GetContentFromSlice`
    unsafe fn slice_content(&self, slice: *mut Slice_t) -> *mut c_char;
    /// `GetSliceLen`
    unsafe fn slice_len(&self, slice: *mut Slice_t) -> c_int;

    /// `NewMediaData`
    unsafe fn new_media_data(&self) -> *mut MediaData_t;
    /// `FreeMediaData`
    unsafe fn free_media_data(&self, media: *mut MediaData_t);
    /// `GetOutIndexBuf`
    unsafe fn media_index_buf(&self, media: *mut MediaData_t) -> *mut c_char;
    /// `GetIndexLen`
    unsafe fn media_index_len(&self, media: *mut MediaData_t) -> c_int;
    /// `GetData`
    unsafe fn media_data(&self, media: *mut MediaData_t) -> *mut c_char;
    /// `GetDataLen`
    unsafe fn media_data_len(&self, media: *mut MediaData_t) -> c_int;
    /// `IsMediaDataFinish`
    unsafe fn media_is_finish(&self, media: *mut MediaData_t) -> c_int;
}

impl NativeApi for FinanceSdk {
    unsafe fn new_sdk(&self) -> *mut WeWorkFinanceSdk_t {
        unsafe { (self.NewSdk)() }
    }

    unsafe fn init(
        &self,
        sdk: *mut WeWorkFinanceSdk_t,
        corp_id: *const c_char,
        secret: *const c_char,
    ) -> c_int {
        unsafe { (self.Init)(sdk, corp_id, secret) }
    }

    unsafe fn get_chat_data(
        &self,
        sdk: *mut WeWorkFinanceSdk_t,
        seq: c_ulonglong,
        limit: c_uint,
        proxy: *const c_char,
        passwd: *const c_char,
        timeout: c_int,
        out: *mut Slice_t,
    ) -> c_int {
        unsafe { (self.GetChatData)(sdk, seq, limit, proxy, passwd, timeout, out) }
    }

    unsafe fn decrypt_data(
        &self,
        encrypt_key: *const c_char,
        encrypt_msg: *const c_char,
        out: *mut Slice_t,
    ) -> c_int {
        unsafe { (self.DecryptData)(encrypt_key, encrypt_msg, out) }
    }

    unsafe fn get_media_data(
        &self,
        sdk: *mut WeWorkFinanceSdk_t,
        index_buf: *const c_char,
        file_id: *const c_char,
        proxy: *const c_char,
        passwd: *const c_char,
        timeout: c_int,
        out: *mut MediaData_t,
    ) -> c_int {
        unsafe { (self.GetMediaData)(sdk, index_buf, file_id, proxy, passwd, timeout, out) }
    }

    unsafe fn destroy_sdk(&self, sdk: *mut WeWorkFinanceSdk_t) {
        unsafe { (self.DestroySdk)(sdk) }
    }

    unsafe fn new_slice(&self) -> *mut Slice_t {
        unsafe { (self.NewSlice)() }
    }

    unsafe fn free_slice(&self, slice: *mut Slice_t) {
        unsafe { (self.FreeSlice)(slice) }
    }

    unsafe fn slice_content(&self, slice: *mut Slice_t) -> *mut c_char {
        unsafe { (self.GetContentFromSlice)(slice) }
    }

    unsafe fn slice_len(&self, slice: *mut Slice_t) -> c_int {
        unsafe { (self.GetSliceLen)(slice) }
    }

    unsafe fn new_media_data(&self) -> *mut MediaData_t {
        unsafe { (self.NewMediaData)() }
    }

    unsafe fn free_media_data(&self, media: *mut MediaData_t) {
        unsafe { (self.FreeMediaData)(media) }
    }

    unsafe fn media_index_buf(&self, media: *mut MediaData_t) -> *mut c_char {
        unsafe { (self.GetOutIndexBuf)(media) }
    }

    unsafe fn media_index_len(&self, media: *mut MediaData_t) -> c_int {
        unsafe { (self.GetIndexLen)(media) }
    }

    unsafe fn media_data(&self, media: *mut MediaData_t) -> *mut c_char {
        unsafe { (self.GetData)(media) }
    }

    unsafe fn media_data_len(&self, media: *mut MediaData_t) -> c_int {
        unsafe { (self.GetDataLen)(media) }
    }

    unsafe fn media_is_finish(&self, media: *mut MediaData_t) -> c_int {
        unsafe { (self.IsMediaDataFinish)(media) }
    }
}
