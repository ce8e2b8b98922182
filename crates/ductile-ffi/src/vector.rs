//! Container lifecycle and operations over `u64` handles.
//!
//! Containers live in a global handle table as `Arc<Mutex<ByteSeq>>`. The
//! table lock is held only long enough to clone the `Arc`, so operations on
//! different containers never contend. A comparator or visitor that calls
//! back into the *same* container gets `InternalError` (or 0 from the
//! value accessors) instead of waiting on a lock its own thread holds.
//!
//! Element pointers are read as exactly `element_size` bytes; block
//! pointers as `count * element_size` bytes. Out-pointers are only written
//! on success.

use std::cell::RefCell;
use std::cmp::Ordering;
use std::ffi::c_void;
use std::sync::{Arc, Mutex};

use ductile_core::SeqConfig;
use ductile_seq::ByteSeq;

use crate::config::DuctileConfig;
use crate::handle::HandleTable;
use crate::status::{status_of, DuctileStatus};

/// Three-way comparator: negative, zero, or positive as `a` orders before,
/// equal to, or after `b`. Both pointers address one element.
pub type DuctileCompareFn = unsafe extern "C" fn(a: *const c_void, b: *const c_void) -> i32;

/// Visitor for `ductile_vector_for_each`. `element` is null exactly when
/// the container is empty.
pub type DuctileVisitFn =
    unsafe extern "C" fn(element: *const c_void, index: usize, len: usize, user_data: *mut c_void);

type VectorArc = Arc<Mutex<ByteSeq>>;

static VECTORS: Mutex<HandleTable<VectorArc>> = Mutex::new(HandleTable::new());

/// Clone the Arc for a handle, briefly locking the global table.
///
/// Returns `None` if the handle is invalid or the table lock is poisoned.
pub(crate) fn get_vector(handle: u64) -> Option<VectorArc> {
    VECTORS.lock().ok()?.get(handle).cloned()
}

thread_local! {
    /// Handles whose container lock the current thread is holding.
    static HELD: RefCell<Vec<u64>> = const { RefCell::new(Vec::new()) };
}

/// Marks `handle` as locked by this thread until dropped.
struct Held(u64);

impl Held {
    /// `None` if this thread already holds `handle`, i.e. a callback is
    /// re-entering the container it was called from.
    fn enter(handle: u64) -> Option<Self> {
        HELD.with(|held| {
            let mut held = held.borrow_mut();
            if held.contains(&handle) {
                None
            } else {
                held.push(handle);
                Some(Held(handle))
            }
        })
    }
}

impl Drop for Held {
    fn drop(&mut self) {
        HELD.with(|held| {
            let mut held = held.borrow_mut();
            if let Some(pos) = held.iter().rposition(|h| *h == self.0) {
                held.swap_remove(pos);
            }
        });
    }
}

/// Run `op` on the container behind `handle` under its own lock.
///
/// Re-entry from a callback on the same thread is `InternalError`.
pub(crate) fn with_vector(handle: u64, op: impl FnOnce(&mut ByteSeq) -> i32) -> i32 {
    let arc = match get_vector(handle) {
        Some(arc) => arc,
        None => return DuctileStatus::InvalidHandle as i32,
    };
    let Some(_held) = Held::enter(handle) else {
        return DuctileStatus::InternalError as i32;
    };
    let mut seq = ffi_lock!(arc);
    op(&mut seq)
}

/// Read from the container behind `handle`, or `None` if the handle is
/// invalid, the lock is poisoned, or the call re-enters the container.
fn read_vector<R>(handle: u64, op: impl FnOnce(&ByteSeq) -> R) -> Option<R> {
    let arc = get_vector(handle)?;
    let _held = Held::enter(handle)?;
    let seq = arc.lock().ok()?;
    Some(op(&seq))
}

/// View `len` caller bytes at `ptr`, or `None` if `ptr` is null.
///
/// # Safety
///
/// A non-null `ptr` must be valid for reads of `len` bytes for the
/// returned lifetime.
#[allow(unsafe_code)]
unsafe fn caller_bytes<'a>(ptr: *const c_void, len: usize) -> Option<&'a [u8]> {
    if ptr.is_null() {
        None
    } else {
        // SAFETY: guaranteed by the caller.
        Some(unsafe { std::slice::from_raw_parts(ptr.cast::<u8>(), len) })
    }
}

/// Copy `element` into `buf`, or report `IndexOutOfRange` if there is none.
#[allow(unsafe_code)]
fn copy_out(element: Option<&[u8]>, buf: *mut c_void) -> i32 {
    match element {
        Some(bytes) => {
            // SAFETY: buf was checked non-null and at least element_size
            // bytes long by check_out_buffer.
            unsafe {
                std::ptr::copy_nonoverlapping(bytes.as_ptr(), buf.cast::<u8>(), bytes.len());
            }
            DuctileStatus::Ok as i32
        }
        None => DuctileStatus::IndexOutOfRange as i32,
    }
}

fn check_out_buffer(seq: &ByteSeq, buf: *mut c_void, buf_len: usize) -> bool {
    !buf.is_null() && buf_len >= seq.element_size()
}

/// Adapt a C comparator to the container's ordering closure.
#[allow(unsafe_code)]
fn ordering(cmp: DuctileCompareFn) -> impl FnMut(&[u8], &[u8]) -> Ordering {
    move |a, b| {
        // SAFETY: both slices are live elements (or the caller's target)
        // for the duration of the call.
        let r = unsafe { cmp(a.as_ptr().cast(), b.as_ptr().cast()) };
        r.cmp(&0)
    }
}

// ── Lifecycle ──────────────────────────────────────────────────────

/// Create an empty container.
///
/// On success writes the new handle to `handle_out` and returns `Ok`.
/// A zero `element_size` is `InvalidArgument`; a refused initial buffer is
/// `AllocationFailed`.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn ductile_vector_create(
    config: *const DuctileConfig,
    handle_out: *mut u64,
) -> i32 {
    ffi_guard!({
        if config.is_null() || handle_out.is_null() {
            return DuctileStatus::InvalidArgument as i32;
        }
        // SAFETY: config points to a valid DuctileConfig per caller contract.
        let config = SeqConfig::from(unsafe { *config });
        let seq = match ByteSeq::new(config) {
            Ok(seq) => seq,
            Err(e) => return DuctileStatus::from(&e) as i32,
        };
        let handle = ffi_lock!(VECTORS).insert(Arc::new(Mutex::new(seq)));
        // SAFETY: handle_out is valid per caller contract.
        unsafe { *handle_out = handle };
        DuctileStatus::Ok as i32
    })
}

/// Destroy a container and release its buffer.
///
/// A stale or already-destroyed handle returns `InvalidHandle`.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn ductile_vector_destroy(handle: u64) -> i32 {
    ffi_guard!({
        match ffi_lock!(VECTORS).remove(handle) {
            Some(_) => DuctileStatus::Ok as i32,
            None => DuctileStatus::InvalidHandle as i32,
        }
    })
}

/// Drop every element and return the buffer to the minimum capacity.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn ductile_vector_clear(handle: u64) -> i32 {
    ffi_guard!({ with_vector(handle, |seq| status_of(seq.clear())) })
}

/// Reallocate to `max(size, 4)` slots if that is smaller than capacity.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn ductile_vector_shrink(handle: u64) -> i32 {
    ffi_guard!({ with_vector(handle, |seq| status_of(seq.shrink())) })
}

// ── Insertion ──────────────────────────────────────────────────────

/// Append the element at `value`.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn ductile_vector_push_back(handle: u64, value: *const c_void) -> i32 {
    ffi_guard!({
        with_vector(handle, |seq| {
            // SAFETY: value addresses element_size bytes per caller contract.
            match unsafe { caller_bytes(value, seq.element_size()) } {
                Some(bytes) => status_of(seq.push_back(bytes)),
                None => DuctileStatus::InvalidArgument as i32,
            }
        })
    })
}

/// Prepend the element at `value`.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn ductile_vector_push_front(handle: u64, value: *const c_void) -> i32 {
    ffi_guard!({
        with_vector(handle, |seq| {
            // SAFETY: value addresses element_size bytes per caller contract.
            match unsafe { caller_bytes(value, seq.element_size()) } {
                Some(bytes) => status_of(seq.push_front(bytes)),
                None => DuctileStatus::InvalidArgument as i32,
            }
        })
    })
}

/// Append `count` contiguous elements starting at `block`.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn ductile_vector_push_back_block(
    handle: u64,
    block: *const c_void,
    count: usize,
) -> i32 {
    ffi_guard!({
        with_vector(handle, |seq| {
            let Some(bytes_len) = count.checked_mul(seq.element_size()) else {
                return DuctileStatus::InvalidArgument as i32;
            };
            // SAFETY: block addresses count elements per caller contract.
            match unsafe { caller_bytes(block, bytes_len) } {
                Some(bytes) => status_of(seq.push_back_block(bytes)),
                None => DuctileStatus::InvalidArgument as i32,
            }
        })
    })
}

/// Insert the element at `value` before position `index` (`index < size`).
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn ductile_vector_insert(handle: u64, index: usize, value: *const c_void) -> i32 {
    ffi_guard!({
        with_vector(handle, |seq| {
            // SAFETY: value addresses element_size bytes per caller contract.
            match unsafe { caller_bytes(value, seq.element_size()) } {
                Some(bytes) => status_of(seq.insert(index, bytes)),
                None => DuctileStatus::InvalidArgument as i32,
            }
        })
    })
}

/// Insert `count` contiguous elements from `block` before position `index`.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn ductile_vector_insert_block(
    handle: u64,
    index: usize,
    block: *const c_void,
    count: usize,
) -> i32 {
    ffi_guard!({
        with_vector(handle, |seq| {
            let Some(bytes_len) = count.checked_mul(seq.element_size()) else {
                return DuctileStatus::InvalidArgument as i32;
            };
            // SAFETY: block addresses count elements per caller contract.
            match unsafe { caller_bytes(block, bytes_len) } {
                Some(bytes) => status_of(seq.insert_block(index, bytes)),
                None => DuctileStatus::InvalidArgument as i32,
            }
        })
    })
}

/// Overwrite the element at `index` with the element at `value`.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn ductile_vector_modify(handle: u64, index: usize, value: *const c_void) -> i32 {
    ffi_guard!({
        with_vector(handle, |seq| {
            // SAFETY: value addresses element_size bytes per caller contract.
            match unsafe { caller_bytes(value, seq.element_size()) } {
                Some(bytes) => status_of(seq.modify(index, bytes)),
                None => DuctileStatus::InvalidArgument as i32,
            }
        })
    })
}

// ── Removal ────────────────────────────────────────────────────────

/// Remove the element at `index`.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn ductile_vector_remove(handle: u64, index: usize) -> i32 {
    ffi_guard!({ with_vector(handle, |seq| status_of(seq.remove(index))) })
}

/// Remove `count` elements starting at `index`.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn ductile_vector_remove_block(handle: u64, index: usize, count: usize) -> i32 {
    ffi_guard!({ with_vector(handle, |seq| status_of(seq.remove_block(index, count))) })
}

/// Remove the last element. `Ok` on an empty container.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn ductile_vector_pop_back(handle: u64) -> i32 {
    ffi_guard!({ with_vector(handle, |seq| status_of(seq.pop_back())) })
}

/// Remove the first element. `Ok` on an empty container.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn ductile_vector_pop_front(handle: u64) -> i32 {
    ffi_guard!({ with_vector(handle, |seq| status_of(seq.pop_front())) })
}

// ── Queries ────────────────────────────────────────────────────────

/// Copy the element at `index` into `buf` (`buf_len >= element_size`).
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn ductile_vector_get(
    handle: u64,
    index: usize,
    buf: *mut c_void,
    buf_len: usize,
) -> i32 {
    ffi_guard!({
        with_vector(handle, |seq| {
            if !check_out_buffer(seq, buf, buf_len) {
                return DuctileStatus::InvalidArgument as i32;
            }
            copy_out(seq.get(index), buf)
        })
    })
}

/// Copy the first element into `buf`. `IndexOutOfRange` when empty.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn ductile_vector_front(handle: u64, buf: *mut c_void, buf_len: usize) -> i32 {
    ffi_guard!({
        with_vector(handle, |seq| {
            if !check_out_buffer(seq, buf, buf_len) {
                return DuctileStatus::InvalidArgument as i32;
            }
            copy_out(seq.front(), buf)
        })
    })
}

/// Copy the last element into `buf`. `IndexOutOfRange` when empty.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn ductile_vector_back(handle: u64, buf: *mut c_void, buf_len: usize) -> i32 {
    ffi_guard!({
        with_vector(handle, |seq| {
            if !check_out_buffer(seq, buf, buf_len) {
                return DuctileStatus::InvalidArgument as i32;
            }
            copy_out(seq.back(), buf)
        })
    })
}

/// Number of live elements.
///
/// **Ambiguity warning:** returns 0 for both "empty" and "invalid handle."
/// Prefer [`ductile_vector_size_get`] for unambiguous error detection.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn ductile_vector_size(handle: u64) -> usize {
    ffi_guard_or!(0, { read_vector(handle, |seq| seq.len()).unwrap_or(0) })
}

/// Number of live elements with explicit error reporting.
///
/// Writes the count to `*size_out` and returns `DUCTILE_STATUS_OK`. Returns
/// `InvalidHandle` or `InternalError` without writing to `size_out`.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn ductile_vector_size_get(handle: u64, size_out: *mut usize) -> i32 {
    ffi_guard!({
        if size_out.is_null() {
            return DuctileStatus::InvalidArgument as i32;
        }
        with_vector(handle, |seq| {
            // SAFETY: size_out is valid per caller contract.
            unsafe { *size_out = seq.len() };
            DuctileStatus::Ok as i32
        })
    })
}

/// Number of allocated slots, or 0 for an invalid handle.
///
/// A live container always has at least 4 slots, so 0 is unambiguous.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn ductile_vector_capacity(handle: u64) -> usize {
    ffi_guard_or!(0, { read_vector(handle, |seq| seq.capacity()).unwrap_or(0) })
}

/// Number of allocated slots with explicit error reporting.
///
/// Writes the count to `*capacity_out` and returns `DUCTILE_STATUS_OK`. Returns
/// `InvalidHandle` or `InternalError` without writing to `capacity_out`.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn ductile_vector_capacity_get(handle: u64, capacity_out: *mut usize) -> i32 {
    ffi_guard!({
        if capacity_out.is_null() {
            return DuctileStatus::InvalidArgument as i32;
        }
        with_vector(handle, |seq| {
            // SAFETY: capacity_out is valid per caller contract.
            unsafe { *capacity_out = seq.capacity() };
            DuctileStatus::Ok as i32
        })
    })
}

/// Index of the first element that compares equal to the element at
/// `target`, written to `index_out`. `NotFound` if none does.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn ductile_vector_find(
    handle: u64,
    target: *const c_void,
    cmp: Option<DuctileCompareFn>,
    index_out: *mut usize,
) -> i32 {
    ffi_guard!({
        let Some(cmp) = cmp else {
            return DuctileStatus::InvalidArgument as i32;
        };
        if index_out.is_null() {
            return DuctileStatus::InvalidArgument as i32;
        }
        with_vector(handle, |seq| {
            // SAFETY: target addresses element_size bytes per caller contract.
            let Some(target) = (unsafe { caller_bytes(target, seq.element_size()) }) else {
                return DuctileStatus::InvalidArgument as i32;
            };
            match seq.find(target, ordering(cmp)) {
                Ok(index) => {
                    // SAFETY: index_out is valid per caller contract.
                    unsafe { *index_out = index };
                    DuctileStatus::Ok as i32
                }
                Err(e) => DuctileStatus::from(&e) as i32,
            }
        })
    })
}

/// Call `action(element, index, size, user_data)` for every element in
/// order. An empty container gets one call with a null element, index 0,
/// and size 0.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn ductile_vector_for_each(
    handle: u64,
    action: Option<DuctileVisitFn>,
    user_data: *mut c_void,
) -> i32 {
    ffi_guard!({
        let Some(action) = action else {
            return DuctileStatus::InvalidArgument as i32;
        };
        with_vector(handle, |seq| {
            seq.for_each(|element, index, len| {
                let ptr = element.map_or(std::ptr::null(), |e| e.as_ptr().cast::<c_void>());
                // SAFETY: ptr is null or a live element; user_data is
                // passed through untouched.
                unsafe { action(ptr, index, len, user_data) };
            });
            DuctileStatus::Ok as i32
        })
    })
}

// ── Sorting ────────────────────────────────────────────────────────

/// Stable sort by `cmp`. On `AllocationFailed` the order is unchanged.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn ductile_vector_sort(handle: u64, cmp: Option<DuctileCompareFn>) -> i32 {
    ffi_guard!({
        let Some(cmp) = cmp else {
            return DuctileStatus::InvalidArgument as i32;
        };
        with_vector(handle, |seq| status_of(seq.sort(ordering(cmp))))
    })
}
