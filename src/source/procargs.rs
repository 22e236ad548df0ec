//! Layout of the `KERN_PROCARGS2` blob:
//!
//! ```text
//! int argc | exec path \0 | \0 padding | argv[0] \0 ... argv[argc-1] \0 | env ...
//! ```

#![cfg_attr(not(target_vendor = "apple"), allow(dead_code))]

use crate::error::{Error, Result};
use libc::pid_t;
use std::ops::Range;

const ARGC_SIZE: usize = std::mem::size_of::<libc::c_int>();

/// Locate the argv strings inside a `KERN_PROCARGS2` blob. A blob that
/// ends before `argc` strings were seen was caught mid-change.
pub fn args_span(pid: pid_t, data: &[u8]) -> Result<Range<usize>> {
    let mismatch = || Error::SizeMismatch { pid };
    let argc = data
        .get(..ARGC_SIZE)
        .and_then(|b| <[u8; ARGC_SIZE]>::try_from(b).ok())
        .map(libc::c_int::from_ne_bytes)
        .ok_or_else(mismatch)?;
    let argc = usize::try_from(argc).map_err(|_| mismatch())?;

    let mut pos = ARGC_SIZE;
    pos += data[pos..]
        .iter()
        .position(|&b| b == 0)
        .ok_or_else(mismatch)?;
    pos += data[pos..].iter().take_while(|&&b| b == 0).count();

    let start = pos;
    for _ in 0..argc {
        let len = data[pos..]
            .iter()
            .position(|&b| b == 0)
            .ok_or_else(mismatch)?;
        pos += len + 1;
    }
    log::trace!("argc {argc} spans {start}..{pos}");
    Ok(start..pos)
}
