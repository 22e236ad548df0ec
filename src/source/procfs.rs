//! `/proc/<pid>/cmdline`

use super::ArgSource;
use crate::error::{Error, Result};
use libc::pid_t;
use std::fs::File;
use std::io::{self, Read};
use std::ops::Range;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcFs {
    root: PathBuf,
}

impl Default for ProcFs {
    fn default() -> Self {
        Self::with_root("/proc")
    }
}

impl ProcFs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read from a proc tree mounted somewhere other than `/proc`.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn open(&self, pid: pid_t) -> Result<File> {
        let path = self.root.join(pid.to_string()).join("cmdline");
        log::trace!("opening {}", path.display());
        File::open(&path).map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound && !self.root.is_dir() {
                Error::Unavailable(e)
            } else {
                Error::from_os(pid, e)
            }
        })
    }
}

fn read_some(file: &mut File, buf: &mut [u8]) -> io::Result<usize> {
    loop {
        match file.read(buf) {
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            r => return r,
        }
    }
}

impl ArgSource for ProcFs {
    fn exact_size(&self, pid: pid_t) -> Result<usize> {
        // procfs reports a size of zero for cmdline, so count by reading.
        let mut file = self.open(pid)?;
        let mut chunk = [0u8; 4096];
        let mut total = 0;
        loop {
            match read_some(&mut file, &mut chunk).map_err(|e| Error::from_os(pid, e))? {
                0 => break,
                n => total += n,
            }
        }
        log::debug!("process {pid} has {total} bytes of arguments");
        Ok(total)
    }

    fn fetch(&self, pid: pid_t, buf: &mut [u8]) -> Result<Range<usize>> {
        if buf.is_empty() {
            return Err(Error::BufferTooSmall { capacity: 0 });
        }
        let mut file = self.open(pid)?;
        let mut filled = 0;
        while filled < buf.len() {
            match read_some(&mut file, &mut buf[filled..]).map_err(|e| Error::from_os(pid, e))? {
                0 => return Ok(0..filled),
                n => filled += n,
            }
        }
        // Full buffer: it only fit if nothing is left to read.
        let mut extra = [0u8; 1];
        match read_some(&mut file, &mut extra).map_err(|e| Error::from_os(pid, e))? {
            0 => Ok(0..filled),
            _ => Err(Error::BufferTooSmall {
                capacity: buf.len(),
            }),
        }
    }
}
