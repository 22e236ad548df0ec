use crate::argv::ArgvView;
use crate::error::{Error, Result};
use crate::options::{FetchPolicy, QueryOptions};
use crate::region::RawRegion;
use crate::source::{ArgSource, SystemSource};
use libc::pid_t;

/// Fetches process arguments from an [`ArgSource`], either into a caller
/// buffer or into one it allocates.
#[derive(Debug, Clone, Default)]
pub struct Getargv<S = SystemSource> {
    source: S,
    policy: FetchPolicy,
}

impl Getargv<SystemSource> {
    pub fn system() -> Self {
        Self::default()
    }
}

impl<S: ArgSource> Getargv<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            policy: FetchPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: FetchPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn policy(&self) -> FetchPolicy {
        self.policy
    }

    pub fn exact_size(&self, pid: pid_t) -> Result<usize> {
        self.source.exact_size(pid)
    }

    /// Fetch into `buf` without allocating. A buffer that is too small is
    /// an error, never grown.
    pub fn argv_of_pid_in<'b>(
        &self,
        options: &QueryOptions,
        buf: &'b mut [u8],
    ) -> Result<RawRegion<&'b [u8]>> {
        let range = self.source.fetch(options.pid, buf)?;
        Ok(RawRegion::new(&*buf, range).skip(options.skip))
    }

    /// Fetch into a buffer sized from [`ArgSource::exact_size`]. If the
    /// process changes its arguments between sizing and fetching, the size is
    /// queried again, up to `max_attempts` rounds in total.
    pub fn argv_of_pid(&self, options: &QueryOptions) -> Result<RawRegion<Vec<u8>>> {
        let pid = options.pid;
        let attempts = self.policy.max_attempts.max(1);
        for attempt in 1..=attempts {
            let size = self.source.exact_size(pid)?;
            let capacity = size.saturating_add(self.policy.margin).max(1);
            log::debug!("attempt {attempt}: fetching process {pid} into {capacity} bytes");
            let mut buf = Vec::new();
            buf.try_reserve_exact(capacity)
                .map_err(|_| Error::OutOfMemory { bytes: capacity })?;
            buf.resize(capacity, 0);
            match self.source.fetch(pid, &mut buf) {
                Ok(range) => {
                    buf.truncate(range.end);
                    return Ok(RawRegion::new(buf, range).skip(options.skip));
                }
                Err(e @ (Error::BufferTooSmall { .. } | Error::SizeMismatch { .. })) => {
                    log::warn!("process {pid} changed during attempt {attempt}/{attempts}: {e}");
                }
                Err(e) => return Err(e),
            }
        }
        Err(Error::TargetVolatile { pid, attempts })
    }

    /// All arguments of `pid` in indexable form.
    pub fn argv_and_argc_of_pid(&self, pid: pid_t) -> Result<ArgvView> {
        self.argv_of_pid(&QueryOptions::new(pid))?.into_argv()
    }
}
