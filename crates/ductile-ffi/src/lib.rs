//! C FFI bindings for the Ductile sequence container.
//!
//! Exposes the container through `u64` handles and `int32_t` status codes.
//! This is the only crate in the workspace that contains `unsafe` code;
//! every entry point that dereferences a caller pointer opts in with
//! `#[allow(unsafe_code)]` and documents its contract.
//!
//! Every entry point runs inside [`ffi_guard!`] (or [`ffi_guard_or!`] for
//! the value-returning accessors), so a Rust panic never unwinds into C.
//! It is reported as [`DuctileStatus::Panicked`] and the message is kept
//! per thread for [`ductile_last_panic_message`].

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

use std::any::Any;
use std::cell::RefCell;
use std::ffi::c_char;

/// Run an FFI body, converting a panic into `Panicked`.
///
/// The body is an `i32`-valued block; `return` inside it returns from the
/// guarded closure, not the enclosing function.
macro_rules! ffi_guard {
    ($body:block) => {
        match ::std::panic::catch_unwind(::std::panic::AssertUnwindSafe(|| -> i32 { $body })) {
            Ok(status) => status,
            Err(payload) => {
                $crate::record_panic(payload.as_ref());
                $crate::status::DuctileStatus::Panicked as i32
            }
        }
    };
}

/// Like [`ffi_guard!`] for entry points that return a plain value: a
/// panic yields `$default` instead of a status.
macro_rules! ffi_guard_or {
    ($default:expr, $body:block) => {
        match ::std::panic::catch_unwind(::std::panic::AssertUnwindSafe(|| $body)) {
            Ok(value) => value,
            Err(payload) => {
                $crate::record_panic(payload.as_ref());
                $default
            }
        }
    };
}

/// Lock a mutex, returning `InternalError` from the enclosing closure if a
/// previous panic poisoned it.
macro_rules! ffi_lock {
    ($mutex:expr) => {
        match $mutex.lock() {
            Ok(guard) => guard,
            Err(_) => return $crate::status::DuctileStatus::InternalError as i32,
        }
    };
}

pub mod config;
mod handle;
pub mod metrics;
pub mod status;
pub mod vector;

pub use config::DuctileConfig;
pub use metrics::DuctileMetrics;
pub use status::DuctileStatus;

thread_local! {
    /// Message of the most recent panic caught on this thread.
    pub(crate) static LAST_PANIC: RefCell<String> = const { RefCell::new(String::new()) };
}

pub(crate) fn record_panic(payload: &(dyn Any + Send)) {
    let message = if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_owned()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        String::from("unknown panic payload")
    };
    LAST_PANIC.with(|cell| *cell.borrow_mut() = message);
}

/// Copy the message of the last panic caught on this thread into `buf`.
///
/// Returns the full message length in bytes (0 if no panic has been
/// caught). If `buf` is non-null and `cap > 0`, up to `cap - 1` bytes are
/// copied and the result is NUL-terminated. Call with a null `buf` to size
/// the buffer first.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn ductile_last_panic_message(buf: *mut c_char, cap: usize) -> i32 {
    LAST_PANIC.with(|cell| {
        let message = cell.borrow();
        let bytes = message.as_bytes();
        if !buf.is_null() && cap > 0 {
            let n = bytes.len().min(cap - 1);
            // SAFETY: buf points to at least cap writable bytes per caller
            // contract, and n < cap.
            unsafe {
                std::ptr::copy_nonoverlapping(bytes.as_ptr(), buf.cast::<u8>(), n);
                *buf.add(n) = 0;
            }
        }
        i32::try_from(bytes.len()).unwrap_or(i32::MAX)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::DuctileStatus;

    fn clear_panic() {
        LAST_PANIC.with(|cell| cell.borrow_mut().clear());
    }

    #[test]
    fn guard_passes_status_through() {
        let status = ffi_guard!({ DuctileStatus::NotFound as i32 });
        assert_eq!(status, DuctileStatus::NotFound as i32);
    }

    #[test]
    fn guard_catches_panic_and_stores_message() {
        clear_panic();
        let status = ffi_guard!({
            panic!("boundary test panic");
        });
        assert_eq!(status, DuctileStatus::Panicked as i32);

        let len = ductile_last_panic_message(std::ptr::null_mut(), 0);
        assert!(len > 0);

        let mut buf = vec![0u8; len as usize + 1];
        let len2 = ductile_last_panic_message(buf.as_mut_ptr().cast::<c_char>(), buf.len());
        assert_eq!(len, len2);
        let msg = std::str::from_utf8(&buf[..len as usize]).unwrap();
        assert_eq!(msg, "boundary test panic");
        assert_eq!(buf[len as usize], 0);
    }

    #[test]
    fn formatted_panic_message_is_kept() {
        clear_panic();
        let code = 7;
        ffi_guard!({
            panic!("code {code}");
        });
        let mut buf = [0u8; 16];
        let len = ductile_last_panic_message(buf.as_mut_ptr().cast::<c_char>(), buf.len());
        assert_eq!(&buf[..len as usize], b"code 7");
    }

    #[test]
    fn short_buffer_truncates_and_terminates() {
        clear_panic();
        ffi_guard!({
            panic!("abcdefgh");
        });
        let mut buf = [0xffu8; 4];
        let len = ductile_last_panic_message(buf.as_mut_ptr().cast::<c_char>(), buf.len());
        assert_eq!(len, 8);
        assert_eq!(&buf, b"abc\0");
    }

    #[test]
    fn value_guard_falls_back_on_panic() {
        clear_panic();
        assert_eq!(ffi_guard_or!(0usize, { 12usize }), 12);
        let trigger = true;
        let value = ffi_guard_or!(0usize, {
            if trigger {
                panic!("value panic");
            }
            5usize
        });
        assert_eq!(value, 0);
        let mut buf = [0u8; 16];
        let len = ductile_last_panic_message(buf.as_mut_ptr().cast::<c_char>(), buf.len());
        assert_eq!(&buf[..len as usize], b"value panic");
    }

    #[test]
    fn poisoned_lock_is_internal_error() {
        let mutex = std::sync::Arc::new(std::sync::Mutex::new(0u8));
        let poisoner = std::sync::Arc::clone(&mutex);
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.lock().unwrap();
            panic!("poison");
        })
        .join();

        let status = ffi_guard!({
            let _guard = ffi_lock!(mutex);
            DuctileStatus::Ok as i32
        });
        assert_eq!(status, DuctileStatus::InternalError as i32);
    }
}
