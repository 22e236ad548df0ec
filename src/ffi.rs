//! C interface, for code written against the `libgetargv` header.
//!
//! Every function returns `false` (or `-1`) on failure and sets `errno`.
//! Buffers handed out here come from `malloc` and are released with the
//! matching `free_*` function exactly once.

#![allow(non_snake_case)]

use crate::error::Error;
use crate::fetch::Getargv;
use crate::options::QueryOptions;
use libc::{c_char, c_int, c_uint, pid_t, size_t};
use std::ops::Range;
use std::ptr;

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct GetArgvOptions {
    pub skip: c_uint,
    pub pid: pid_t,
    pub nuls: bool,
}

/// Arguments as one delimited span: `[start_pointer, end_pointer)` inside
/// `buffer`. `end_pointer` sits on the terminator of the last argument, so
/// `*end_pointer` is always a NUL byte within the buffer. Unless `nuls` was
/// requested, the separators inside the span are spaces.
#[repr(C)]
#[derive(Debug)]
pub struct ArgvResult {
    pub buffer: *mut c_char,
    pub start_pointer: *mut c_char,
    pub end_pointer: *mut c_char,
}

/// Arguments as a null-terminated `argv` of `argc` strings inside `buffer`.
#[repr(C)]
#[derive(Debug)]
pub struct ArgvArgcResult {
    pub buffer: *mut c_char,
    pub argv: *mut *mut c_char,
    pub argc: c_uint,
}

impl From<&GetArgvOptions> for QueryOptions {
    fn from(options: &GetArgvOptions) -> Self {
        QueryOptions::new(options.pid)
            .with_skip(options.skip as usize)
            .with_nuls(options.nuls)
    }
}

#[cfg(target_os = "linux")]
fn set_errno(code: c_int) {
    // SAFETY: errno is thread local.
    unsafe { *libc::__errno_location() = code }
}

#[cfg(any(target_vendor = "apple", target_os = "freebsd"))]
fn set_errno(code: c_int) {
    // SAFETY: errno is thread local.
    unsafe { *libc::__error() = code }
}

#[cfg(not(any(
    target_os = "linux",
    target_vendor = "apple",
    target_os = "freebsd"
)))]
fn set_errno(code: c_int) {
    log::warn!("cannot report errno {code} on this platform");
}

fn fail(e: Error) -> bool {
    log::debug!("{e}");
    set_errno(e.raw_os_error());
    false
}

/// Copy `bytes` into a fresh `malloc` block with one extra NUL at the end.
unsafe fn malloc_copy(bytes: &[u8]) -> Result<*mut c_char, Error> {
    let len = bytes.len() + 1;
    let buffer = libc::malloc(len) as *mut c_char;
    if buffer.is_null() {
        return Err(Error::OutOfMemory { bytes: len });
    }
    ptr::copy_nonoverlapping(bytes.as_ptr(), buffer.cast(), bytes.len());
    *buffer.add(bytes.len()) = 0;
    Ok(buffer)
}

/// Move the end of `range` onto a NUL byte inside `buf`, writing one after
/// an unterminated tail if there is room, and turn the separators before it
/// into spaces unless `nuls` is set.
fn c_span(buf: &mut [u8], range: Range<usize>, nuls: bool) -> Result<Range<usize>, Error> {
    let end = if range.end > 0 && buf[range.end - 1] == 0 {
        range.end - 1
    } else if range.end < buf.len() {
        buf[range.end] = 0;
        range.end
    } else {
        return Err(Error::BufferTooSmall {
            capacity: buf.len(),
        });
    };
    let start = range.start.min(end);
    if !nuls {
        for b in buf[start..end].iter_mut().filter(|b| **b == 0) {
            *b = b' ';
        }
    }
    Ok(start..end)
}

/// `argc` as the header's `uint`, if it fits.
fn c_argc(argc: usize) -> Option<c_uint> {
    c_uint::try_from(argc).ok()
}

#[no_mangle]
pub extern "C" fn get_arg_exact(pid: pid_t) -> i32 {
    match Getargv::system().exact_size(pid) {
        Ok(size) => i32::try_from(size).unwrap_or(i32::MAX),
        Err(e) => {
            fail(e);
            -1
        }
    }
}

/// # Safety
///
/// `options` and `result` must be null or valid pointers.
#[no_mangle]
pub unsafe extern "C" fn get_argv_of_pid(
    options: *const GetArgvOptions,
    result: *mut ArgvResult,
) -> bool {
    let (Some(options), Some(result)) = (options.as_ref(), result.as_mut()) else {
        set_errno(libc::EINVAL);
        return false;
    };
    let region = match Getargv::system().argv_of_pid(&QueryOptions::from(options)) {
        Ok(region) => region,
        Err(e) => return fail(e),
    };
    let len = region.as_bytes().len();
    let buffer = match malloc_copy(region.as_bytes()) {
        Ok(buffer) => buffer,
        Err(e) => return fail(e),
    };
    // The copy carries a spare NUL, so this cannot run out of room.
    let copy = std::slice::from_raw_parts_mut(buffer as *mut u8, len + 1);
    let span = match c_span(copy, 0..len, options.nuls) {
        Ok(span) => span,
        Err(e) => {
            libc::free(buffer.cast());
            return fail(e);
        }
    };
    result.buffer = buffer;
    result.start_pointer = buffer.add(span.start);
    result.end_pointer = buffer.add(span.end);
    true
}

/// Like [`get_argv_of_pid`], but into the caller's `result.buffer` of
/// `argsize` bytes. Nothing is allocated and nothing needs freeing.
///
/// # Safety
///
/// `options` must be null or valid; `result.buffer` must be valid for
/// writes of `argsize` bytes.
#[no_mangle]
pub unsafe extern "C" fn get_argv_of_pid_no_malloc(
    options: *const GetArgvOptions,
    result: *mut ArgvResult,
    argsize: size_t,
) -> bool {
    let (Some(options), Some(result)) = (options.as_ref(), result.as_mut()) else {
        set_errno(libc::EINVAL);
        return false;
    };
    if result.buffer.is_null() {
        set_errno(libc::EINVAL);
        return false;
    }
    let buf = std::slice::from_raw_parts_mut(result.buffer as *mut u8, argsize);
    let range = match Getargv::system().argv_of_pid_in(&QueryOptions::from(options), &mut *buf) {
        Ok(region) => region.range(),
        Err(e) => return fail(e),
    };
    let span = match c_span(buf, range, options.nuls) {
        Ok(span) => span,
        Err(e) => return fail(e),
    };
    result.start_pointer = result.buffer.add(span.start);
    result.end_pointer = result.buffer.add(span.end);
    true
}

/// # Safety
///
/// `result` must be null or a valid pointer.
#[no_mangle]
pub unsafe extern "C" fn get_argv_and_argc_of_pid(pid: pid_t, result: *mut ArgvArgcResult) -> bool {
    let Some(result) = result.as_mut() else {
        set_errno(libc::EINVAL);
        return false;
    };
    let argv = match Getargv::system().argv_and_argc_of_pid(pid) {
        Ok(argv) => argv,
        Err(e) => return fail(e),
    };
    let (bytes, spans) = argv.into_raw_parts();
    let Some(argc) = c_argc(spans.len()) else {
        set_errno(libc::ERANGE);
        return false;
    };
    // Only the arguments are copied; anything before the first one (the
    // procargs header on macOS) stays behind.
    let base = spans.first().map_or(bytes.len(), |span| span.start);
    let buffer = match malloc_copy(&bytes[base..]) {
        Ok(buffer) => buffer,
        Err(e) => return fail(e),
    };
    let table_size = (spans.len() + 1) * std::mem::size_of::<*mut c_char>();
    let table = libc::malloc(table_size) as *mut *mut c_char;
    if table.is_null() {
        libc::free(buffer.cast());
        return fail(Error::OutOfMemory { bytes: table_size });
    }
    for (i, span) in spans.iter().enumerate() {
        *table.add(i) = buffer.add(span.start - base);
    }
    *table.add(spans.len()) = ptr::null_mut();
    result.buffer = buffer;
    result.argv = table;
    result.argc = argc;
    true
}

fn release_argv_result(result: &mut ArgvResult) {
    debug_assert!(
        !result.buffer.is_null(),
        "ArgvResult released twice or never filled"
    );
    // SAFETY: the buffer came from `malloc_copy`, or is null.
    unsafe { libc::free(result.buffer.cast()) };
    result.buffer = ptr::null_mut();
    result.start_pointer = ptr::null_mut();
    result.end_pointer = ptr::null_mut();
}

fn release_argv_argc_result(result: &mut ArgvArgcResult) {
    debug_assert!(
        !result.buffer.is_null(),
        "ArgvArgcResult released twice or never filled"
    );
    // SAFETY: both blocks came from `malloc`, or are null.
    unsafe {
        libc::free(result.argv.cast());
        libc::free(result.buffer.cast());
    }
    result.buffer = ptr::null_mut();
    result.argv = ptr::null_mut();
    result.argc = 0;
}

/// Release a result filled by [`get_argv_of_pid`]. Releasing the same
/// result twice is a caller bug; debug builds abort on it.
///
/// # Safety
///
/// `result` must be null or point to a result filled by `get_argv_of_pid`.
#[no_mangle]
pub unsafe extern "C" fn free_ArgvResult(result: *mut ArgvResult) {
    if let Some(result) = result.as_mut() {
        release_argv_result(result);
    }
}

/// Release a result filled by [`get_argv_and_argc_of_pid`]. Releasing the
/// same result twice is a caller bug; debug builds abort on it.
///
/// # Safety
///
/// `result` must be null or point to a result filled by
/// `get_argv_and_argc_of_pid`.
#[no_mangle]
pub unsafe extern "C" fn free_ArgvArgcResult(result: *mut ArgvArgcResult) {
    if let Some(result) = result.as_mut() {
        release_argv_argc_result(result);
    }
}
