//! Error type shared by every stage of argument retrieval.

use libc::pid_t;
use std::io;
use thiserror::Error;

/// Coarse classification of [`Error`], for callers that branch on the kind
/// of failure rather than on its details.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// See [`Error::NoSuchProcess`].
    NoSuchProcess,
    /// See [`Error::PermissionDenied`].
    PermissionDenied,
    /// See [`Error::BufferTooSmall`].
    BufferTooSmall,
    /// See [`Error::SizeMismatch`].
    SizeMismatch,
    /// See [`Error::TargetVolatile`].
    TargetVolatile,
    /// See [`Error::OutOfMemory`].
    OutOfMemory,
    /// See [`Error::SinkWriteFailed`].
    SinkWriteFailed,
    /// See [`Error::Unavailable`].
    Unavailable,
    /// See [`Error::Os`].
    Os,
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The pid does not name a live process.
    #[error("no such process: {pid}")]
    NoSuchProcess { pid: pid_t },

    /// The process exists but its arguments are not visible to us.
    #[error("permission denied reading the arguments of process {pid}")]
    PermissionDenied { pid: pid_t },

    /// The buffer cannot hold the current argument data.
    #[error("buffer of {capacity} bytes is too small for the argument data")]
    BufferTooSmall { capacity: usize },

    /// The data changed shape while it was being read. Retrying with a
    /// freshly queried size may succeed.
    #[error("arguments of process {pid} changed while being read")]
    SizeMismatch { pid: pid_t },

    /// Every attempt of the retry budget hit a size mismatch.
    #[error("arguments of process {pid} kept changing across {attempts} attempts")]
    TargetVolatile { pid: pid_t, attempts: usize },

    /// Allocating the argument buffer or the argv table failed.
    #[error("out of memory allocating {bytes} bytes")]
    OutOfMemory { bytes: usize },

    /// The output sink rejected the rendered arguments.
    #[error("failed to write arguments: {0}")]
    SinkWriteFailed(#[source] io::Error),

    /// The kernel interface used to read arguments is missing.
    #[error("process argument interface unavailable: {0}")]
    Unavailable(#[source] io::Error),

    /// Any other OS error while reading the arguments.
    #[error("reading the arguments of process {pid} failed: {source}")]
    Os {
        pid: pid_t,
        #[source]
        source: io::Error,
    },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::NoSuchProcess { .. } => ErrorKind::NoSuchProcess,
            Error::PermissionDenied { .. } => ErrorKind::PermissionDenied,
            Error::BufferTooSmall { .. } => ErrorKind::BufferTooSmall,
            Error::SizeMismatch { .. } => ErrorKind::SizeMismatch,
            Error::TargetVolatile { .. } => ErrorKind::TargetVolatile,
            Error::OutOfMemory { .. } => ErrorKind::OutOfMemory,
            Error::SinkWriteFailed(_) => ErrorKind::SinkWriteFailed,
            Error::Unavailable(_) => ErrorKind::Unavailable,
            Error::Os { .. } => ErrorKind::Os,
        }
    }

    /// The errno value reported for this error across the C ABI.
    pub fn raw_os_error(&self) -> i32 {
        match self {
            Error::NoSuchProcess { .. } => libc::ESRCH,
            Error::PermissionDenied { .. } => libc::EPERM,
            Error::BufferTooSmall { .. } => libc::ERANGE,
            Error::SizeMismatch { .. } | Error::TargetVolatile { .. } => libc::EAGAIN,
            Error::OutOfMemory { .. } => libc::ENOMEM,
            Error::SinkWriteFailed(e) => e.raw_os_error().unwrap_or(libc::EIO),
            Error::Unavailable(_) => libc::ENOSYS,
            Error::Os { source, .. } => source.raw_os_error().unwrap_or(libc::EIO),
        }
    }

    /// Classify an OS error raised while talking to the kernel about `pid`.
    pub(crate) fn from_os(pid: pid_t, e: io::Error) -> Self {
        match e.raw_os_error() {
            Some(libc::ESRCH) | Some(libc::ENOENT) => Error::NoSuchProcess { pid },
            Some(libc::EPERM) | Some(libc::EACCES) => Error::PermissionDenied { pid },
            Some(libc::ENOSYS) | Some(libc::ENOTSUP) => Error::Unavailable(e),
            _ => match e.kind() {
                io::ErrorKind::NotFound => Error::NoSuchProcess { pid },
                io::ErrorKind::PermissionDenied => Error::PermissionDenied { pid },
                _ => Error::Os { pid, source: e },
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn os_errors_are_classified() {
        let e = Error::from_os(7, io::Error::from_raw_os_error(libc::ESRCH));
        assert_eq!(e.kind(), ErrorKind::NoSuchProcess);
        let e = Error::from_os(7, io::Error::from_raw_os_error(libc::ENOENT));
        assert_eq!(e.kind(), ErrorKind::NoSuchProcess);
        let e = Error::from_os(7, io::Error::from_raw_os_error(libc::EACCES));
        assert_eq!(e.kind(), ErrorKind::PermissionDenied);
        let e = Error::from_os(7, io::Error::from_raw_os_error(libc::EIO));
        assert_eq!(e.kind(), ErrorKind::Os);
        assert_eq!(e.raw_os_error(), libc::EIO);
    }

    #[test]
    fn errno_mapping() {
        assert_eq!(Error::NoSuchProcess { pid: 1 }.raw_os_error(), libc::ESRCH);
        assert_eq!(
            Error::TargetVolatile { pid: 1, attempts: 3 }.raw_os_error(),
            libc::EAGAIN
        );
        assert_eq!(Error::OutOfMemory { bytes: 8 }.raw_os_error(), libc::ENOMEM);
        let sink = Error::SinkWriteFailed(io::Error::new(io::ErrorKind::Other, "closed"));
        assert_eq!(sink.raw_os_error(), libc::EIO);
    }

    #[test]
    fn messages_name_the_pid() {
        let msg = Error::PermissionDenied { pid: 42 }.to_string();
        assert!(msg.contains("42"), "{msg}");
    }
}
