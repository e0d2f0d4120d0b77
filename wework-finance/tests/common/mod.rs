//! In-process stand-in for the SDK shared library.
//!
//! Buffers are real heap allocations handed out as raw pointers, so the
//! client's guards are exercised exactly as against the vendor library.
//! Every allocation is tracked; freeing an unknown or already freed pointer
//! panics.

#![allow(unsafe_code, dead_code, missing_docs)]

use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::ffi::{CStr, c_char, c_int, c_uint, c_ulonglong};
use std::ptr;
use std::rc::Rc;

use wework_finance::native::{MediaData_t, NativeApi, Slice_t, WeWorkFinanceSdk_t};
use wework_finance::{Client, ClientBuilder};

/// Arguments of one `GetChatData` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatCall {
    pub seq: u64,
    pub limit: u32,
    pub proxy: String,
    pub passwd: String,
    pub timeout: i32,
}

/// Arguments of one `GetMediaData` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaCall {
    pub index: Option<String>,
    pub file_id: String,
    pub timeout: i32,
}

#[derive(Debug, Default)]
pub struct FakeState {
    pub sdk_created: Cell<usize>,
    pub sdk_destroyed: Cell<usize>,
    pub init_args: RefCell<Option<(String, String)>>,
    pub init_rc: Cell<c_int>,

    pub slices_allocated: Cell<usize>,
    pub slices_freed: Cell<usize>,
    pub media_allocated: Cell<usize>,
    pub media_freed: Cell<usize>,
    pub fail_alloc: Cell<bool>,
    live: RefCell<HashSet<usize>>,

    pub chat_rc: Cell<c_int>,
    pub chat_payload: RefCell<Vec<u8>>,
    pub chat_calls: RefCell<Vec<ChatCall>>,

    pub decrypt_rc: Cell<c_int>,
    pub decrypt_payload: RefCell<Vec<u8>>,
    pub decrypt_calls: RefCell<Vec<(String, String)>>,

    pub media_chunks: RefCell<Vec<Vec<u8>>>,
    /// Fail with this code when asked for the chunk at this position.
    pub media_fail_at: Cell<Option<(usize, c_int)>>,
    /// Raw `outindexbuf` bytes returned instead of the `idx-N` token.
    pub media_index_override: RefCell<Option<Vec<u8>>>,
    pub media_calls: RefCell<Vec<MediaCall>>,
}

impl FakeState {
    fn track(&self, addr: usize) {
        assert!(self.live.borrow_mut().insert(addr), "address reused while live");
    }

    fn untrack(&self, addr: usize) {
        assert!(
            self.live.borrow_mut().remove(&addr),
            "free of unknown or already freed pointer"
        );
    }

    /// Native allocations (SDK handles and buffers) not yet released.
    pub fn live_allocations(&self) -> usize {
        self.live.borrow().len()
    }
}

/// Fake native layer. Clone it to keep a handle on the recorded state after
/// moving it into a [`Client`].
#[derive(Debug, Clone, Default)]
pub struct FakeNative {
    pub state: Rc<FakeState>,
}

impl FakeNative {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_chat_payload(self, json: &str) -> Self {
        *self.state.chat_payload.borrow_mut() = json.as_bytes().to_vec();
        self
    }

    pub fn with_media(self, chunks: &[&[u8]]) -> Self {
        *self.state.media_chunks.borrow_mut() = chunks.iter().map(|c| c.to_vec()).collect();
        self
    }
}

pub fn builder() -> ClientBuilder {
    Client::builder().corp_id("wwcorp").secret("s3cret")
}

/// A fake plus a client built on it.
pub fn client(fake: &FakeNative) -> Client<FakeNative> {
    builder().build_with(fake.clone()).unwrap()
}

fn leak(bytes: &[u8]) -> (*mut c_char, c_int) {
    if bytes.is_empty() {
        return (ptr::null_mut(), 0);
    }
    let len = bytes.len() as c_int;
    let raw = Box::into_raw(bytes.to_vec().into_boxed_slice());
    (raw.cast::<c_char>(), len)
}

unsafe fn reclaim(buf: *mut c_char, len: c_int) {
    if !buf.is_null() {
        let slice = ptr::slice_from_raw_parts_mut(buf.cast::<u8>(), len as usize);
        drop(unsafe { Box::from_raw(slice) });
    }
}

unsafe fn read_str(p: *const c_char) -> String {
    unsafe { CStr::from_ptr(p) }.to_str().unwrap().to_owned()
}

unsafe fn fill_slice(out: *mut Slice_t, bytes: &[u8]) {
    let (buf, len) = leak(bytes);
    unsafe {
        reclaim((*out).buf, (*out).len);
        (*out).buf = buf;
        (*out).len = len;
    }
}

impl NativeApi for FakeNative {
    unsafe fn new_sdk(&self) -> *mut WeWorkFinanceSdk_t {
        self.state.sdk_created.set(self.state.sdk_created.get() + 1);
        // Any unique non-null address will do; the client never dereferences it.
        let raw = Box::into_raw(Box::new(0u64));
        self.state.track(raw as usize);
        raw.cast()
    }

    unsafe fn init(
        &self,
        sdk: *mut WeWorkFinanceSdk_t,
        corp_id: *const c_char,
        secret: *const c_char,
    ) -> c_int {
        assert!(!sdk.is_null());
        let args = unsafe { (read_str(corp_id), read_str(secret)) };
        *self.state.init_args.borrow_mut() = Some(args);
        self.state.init_rc.get()
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
        assert!(!sdk.is_null() && !out.is_null());
        self.state.chat_calls.borrow_mut().push(ChatCall {
            seq,
            limit,
            proxy: unsafe { read_str(proxy) },
            passwd: unsafe { read_str(passwd) },
            timeout,
        });
        let rc = self.state.chat_rc.get();
        if rc == 0 {
            unsafe { fill_slice(out, &self.state.chat_payload.borrow()) };
        }
        rc
    }

    unsafe fn decrypt_data(
        &self,
        encrypt_key: *const c_char,
        encrypt_msg: *const c_char,
        out: *mut Slice_t,
    ) -> c_int {
        let args = unsafe { (read_str(encrypt_key), read_str(encrypt_msg)) };
        self.state.decrypt_calls.borrow_mut().push(args);
        let rc = self.state.decrypt_rc.get();
        if rc == 0 {
            unsafe { fill_slice(out, &self.state.decrypt_payload.borrow()) };
        }
        rc
    }

    unsafe fn get_media_data(
        &self,
        sdk: *mut WeWorkFinanceSdk_t,
        index_buf: *const c_char,
        file_id: *const c_char,
        _proxy: *const c_char,
        _passwd: *const c_char,
        timeout: c_int,
        out: *mut MediaData_t,
    ) -> c_int {
        assert!(!sdk.is_null() && !out.is_null());
        let index = (!index_buf.is_null()).then(|| unsafe { read_str(index_buf) });
        self.state.media_calls.borrow_mut().push(MediaCall {
            index: index.clone(),
            file_id: unsafe { read_str(file_id) },
            timeout,
        });

        let pos = match index.as_deref() {
            None => 0,
            Some(tok) => match tok.strip_prefix("idx-").and_then(|n| n.parse().ok()) {
                Some(n) => n,
                None => return 10005,
            },
        };
        if let Some((at, rc)) = self.state.media_fail_at.get()
            && at == pos
        {
            return rc;
        }
        let chunks = self.state.media_chunks.borrow();
        let Some(chunk) = chunks.get(pos) else {
            return 10005;
        };
        let finished = pos + 1 == chunks.len();
        let next = if finished {
            String::new()
        } else {
            format!("idx-{}", pos + 1)
        };
        let (data, data_len) = leak(chunk);
        let index_bytes = self
            .state
            .media_index_override
            .borrow()
            .clone()
            .unwrap_or_else(|| next.into_bytes());
        let (idx, idx_len) = leak(&index_bytes);
        unsafe {
            (*out).data = data;
            (*out).data_len = data_len;
            (*out).outindexbuf = idx;
            (*out).out_len = idx_len;
            (*out).is_finish = c_int::from(finished);
        }
        0
    }

    unsafe fn destroy_sdk(&self, sdk: *mut WeWorkFinanceSdk_t) {
        self.state.untrack(sdk as usize);
        self.state.sdk_destroyed.set(self.state.sdk_destroyed.get() + 1);
        drop(unsafe { Box::from_raw(sdk.cast::<u64>()) });
    }

    unsafe fn new_slice(&self) -> *mut Slice_t {
        if self.state.fail_alloc.get() {
            return ptr::null_mut();
        }
        self.state
            .slices_allocated
            .set(self.state.slices_allocated.get() + 1);
        let raw = Box::into_raw(Box::new(Slice_t {
            buf: ptr::null_mut(),
            len: 0,
        }));
        self.state.track(raw as usize);
        raw
    }

    unsafe fn free_slice(&self, slice: *mut Slice_t) {
        self.state.untrack(slice as usize);
        self.state.slices_freed.set(self.state.slices_freed.get() + 1);
        let slice = unsafe { Box::from_raw(slice) };
        unsafe { reclaim(slice.buf, slice.len) };
    }

    unsafe fn slice_content(&self, slice: *mut Slice_t) -> *mut c_char {
        unsafe { (*slice).buf }
    }

    unsafe fn slice_len(&self, slice: *mut Slice_t) -> c_int {
        unsafe { (*slice).len }
    }

    unsafe fn new_media_data(&self) -> *mut MediaData_t {
        if self.state.fail_alloc.get() {
            return ptr::null_mut();
        }
        self.state
            .media_allocated
            .set(self.state.media_allocated.get() + 1);
        let raw = Box::into_raw(Box::new(MediaData_t {
            outindexbuf: ptr::null_mut(),
            out_len: 0,
            data: ptr::null_mut(),
            data_len: 0,
            is_finish: 0,
        }));
        self.state.track(raw as usize);
        raw
    }

    unsafe fn free_media_data(&self, media: *mut MediaData_t) {
        self.state.untrack(media as usize);
        self.state.media_freed.set(self.state.media_freed.get() + 1);
        let media = unsafe { Box::from_raw(media) };
        unsafe {
            reclaim(media.outindexbuf, media.out_len);
            reclaim(media.data, media.data_len);
        }
    }

    unsafe fn media_index_buf(&self, media: *mut MediaData_t) -> *mut c_char {
        unsafe { (*media).outindexbuf }
    }

    unsafe fn media_index_len(&self, media: *mut MediaData_t) -> c_int {
        unsafe { (*media).out_len }
    }

    unsafe fn media_data(&self, media: *mut MediaData_t) -> *mut c_char {
        unsafe { (*media).data }
    }

    unsafe fn media_data_len(&self, media: *mut MediaData_t) -> c_int {
        unsafe { (*media).data_len }
    }

    unsafe fn media_is_finish(&self, media: *mut MediaData_t) -> c_int {
        unsafe { (*media).is_finish }
    }
}
