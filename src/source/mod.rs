//! Where the raw argument bytes come from.

use crate::error::Result;
use libc::pid_t;
use std::ops::Range;

mod procargs;
#[cfg(not(target_vendor = "apple"))]
mod procfs;
#[cfg(target_vendor = "apple")]
mod sysctl;

#[cfg(not(target_vendor = "apple"))]
pub use procfs::ProcFs;
#[cfg(target_vendor = "apple")]
pub use sysctl::Sysctl;

/// The operating system's argument interface on this platform.
#[cfg(not(target_vendor = "apple"))]
pub type SystemSource = ProcFs;
/// The operating system's argument interface on this platform.
#[cfg(target_vendor = "apple")]
pub type SystemSource = Sysctl;

/// Access to the raw argument blob of a process.
///
/// Implementations do not retry; a caller that wants to cope with a
/// process changing its arguments under it re-queries the size and tries
/// again.
pub trait ArgSource {
    /// Number of bytes the raw blob of `pid` occupies right now. Only a
    /// hint: the process may exit or re-exec before the fetch.
    fn exact_size(&self, pid: pid_t) -> Result<usize>;

    /// Copy the raw blob of `pid` into `buf` and return the range of `buf`
    /// that holds the NUL-terminated arguments.
    ///
    /// Fails with `BufferTooSmall` when the data does not fit and with
    /// `SizeMismatch` when what was read is not self-consistent.
    fn fetch(&self, pid: pid_t, buf: &mut [u8]) -> Result<Range<usize>>;
}

impl<T: ArgSource + ?Sized> ArgSource for &T {
    fn exact_size(&self, pid: pid_t) -> Result<usize> {
        (**self).exact_size(pid)
    }

    fn fetch(&self, pid: pid_t, buf: &mut [u8]) -> Result<Range<usize>> {
        (**self).fetch(pid, buf)
    }
}
