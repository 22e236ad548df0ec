//! `sysctl(CTL_KERN, KERN_PROCARGS2, pid)`

use super::{procargs, ArgSource};
use crate::error::{Error, Result};
use libc::{c_int, c_void, pid_t, size_t};
use std::io;
use std::ops::Range;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Sysctl;

impl Sysctl {
    pub fn new() -> Self {
        Self
    }
}

/// SAFETY: `out` must be null or valid for writes of `*len` bytes.
unsafe fn procargs2(pid: pid_t, out: *mut c_void, len: &mut size_t) -> io::Result<()> {
    let mut mib: [c_int; 3] = [libc::CTL_KERN, libc::KERN_PROCARGS2, pid];
    if libc::sysctl(mib.as_mut_ptr(), 3, out, len, std::ptr::null_mut(), 0) == 0 {
        Ok(())
    } else {
        Err(io::Error::last_os_error())
    }
}

/// The kernel answers EINVAL both for dead processes and for ones we may
/// not look at; tell them apart with a null signal.
fn classify(pid: pid_t, e: io::Error) -> Error {
    if e.raw_os_error() != Some(libc::EINVAL) {
        return Error::from_os(pid, e);
    }
    if pid < 0 {
        return Error::NoSuchProcess { pid };
    }
    // SAFETY: signal 0 only checks for existence.
    let alive = unsafe { libc::kill(pid, 0) } == 0
        || io::Error::last_os_error().raw_os_error() != Some(libc::ESRCH);
    if alive {
        Error::PermissionDenied { pid }
    } else {
        Error::NoSuchProcess { pid }
    }
}

impl ArgSource for Sysctl {
    fn exact_size(&self, pid: pid_t) -> Result<usize> {
        let mut len: size_t = 0;
        // SAFETY: a null output buffer only asks for the length.
        unsafe { procargs2(pid, std::ptr::null_mut(), &mut len) }.map_err(|e| classify(pid, e))?;
        log::debug!("process {pid} has {len} bytes of procargs");
        Ok(len)
    }

    fn fetch(&self, pid: pid_t, buf: &mut [u8]) -> Result<Range<usize>> {
        if buf.is_empty() {
            return Err(Error::BufferTooSmall { capacity: 0 });
        }
        let mut len: size_t = buf.len();
        // SAFETY: `buf` is valid for `len` bytes.
        match unsafe { procargs2(pid, buf.as_mut_ptr().cast(), &mut len) } {
            Ok(()) => procargs::args_span(pid, &buf[..len.min(buf.len())]),
            Err(e) if e.raw_os_error() == Some(libc::ENOMEM) => Err(Error::BufferTooSmall {
                capacity: buf.len(),
            }),
            Err(e) => Err(classify(pid, e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn reads_own_arguments() {
        let pid = std::process::id() as pid_t;
        let size = Sysctl.exact_size(pid).unwrap();
        let mut buf = vec![0u8; size];
        let range = Sysctl.fetch(pid, &mut buf).unwrap();
        assert_eq!(crate::split::count(&buf[range]), std::env::args_os().count());
    }

    #[test]
    fn missing_process() {
        let err = Sysctl.exact_size(pid_t::MAX).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NoSuchProcess);
    }
}
