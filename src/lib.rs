//! Read the command line arguments of another running process.
//!
//! The kernel keeps the arguments of every process as one blob of
//! NUL-terminated strings (`/proc/<pid>/cmdline` on Linux, the
//! `KERN_PROCARGS2` sysctl on macOS). This crate sizes that blob, copies it
//! out, and splits it back into arguments.
//!
//! ```rust,no_run
//! use getargv::QueryOptions;
//!
//! # fn main() -> Result<(), getargv::Error> {
//! let pid = 1;
//! // Everything but the program name, separated by spaces.
//! let region = getargv::argv_of_pid(&QueryOptions::new(pid).with_skip(1))?;
//! region.render(&mut std::io::stdout(), false)?;
//!
//! // Or as an indexable argv.
//! let argv = getargv::argv_and_argc_of_pid(pid)?;
//! for arg in argv.iter() {
//!     println!("{}", String::from_utf8_lossy(arg));
//! }
//! # Ok(())
//! # }
//! ```
//!
//! Two ways to fetch are offered. [`argv_of_pid_in`] fills a caller buffer
//! and never allocates. [`argv_of_pid`] sizes and allocates the buffer
//! itself and re-sizes a bounded number of times when the target changes
//! its arguments in between.

#[cfg(not(unix))]
compile_error!("getargv reads process arguments through unix kernel interfaces");

mod argv;
mod error;
pub mod ffi;
mod fetch;
mod options;
mod region;
pub mod source;
pub mod split;

pub use argv::{ArgvView, CArgv};
pub use error::{Error, ErrorKind, Result};
pub use fetch::Getargv;
pub use libc::pid_t;
pub use options::{FetchPolicy, QueryOptions};
pub use region::RawRegion;
pub use source::{ArgSource, SystemSource};

/// Size in bytes of the raw argument blob of `pid`.
pub fn exact_size(pid: pid_t) -> Result<usize> {
    Getargv::system().exact_size(pid)
}

/// Arguments of `options.pid` in a buffer allocated for them.
pub fn argv_of_pid(options: &QueryOptions) -> Result<RawRegion<Vec<u8>>> {
    Getargv::system().argv_of_pid(options)
}

/// Arguments of `options.pid` in `buf`, without allocating.
pub fn argv_of_pid_in<'b>(options: &QueryOptions, buf: &'b mut [u8]) -> Result<RawRegion<&'b [u8]>> {
    Getargv::system().argv_of_pid_in(options, buf)
}

/// All arguments of `pid` as an indexable argv.
pub fn argv_and_argc_of_pid(pid: pid_t) -> Result<ArgvView> {
    Getargv::system().argv_and_argc_of_pid(pid)
}
