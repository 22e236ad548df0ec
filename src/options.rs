use libc::pid_t;

/// What to fetch, and how to present it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryOptions {
    /// Target process.
    pub pid: pid_t,
    /// Number of leading arguments to drop. Skipping more arguments than the
    /// process has yields an empty result.
    pub skip: usize,
    /// Keep the NUL separators when rendering instead of turning them into
    /// spaces.
    pub nuls: bool,
}

impl QueryOptions {
    pub fn new(pid: pid_t) -> Self {
        Self {
            pid,
            skip: 0,
            nuls: false,
        }
    }

    pub fn with_skip(mut self, skip: usize) -> Self {
        self.skip = skip;
        self
    }

    pub fn with_nuls(mut self, nuls: bool) -> Self {
        self.nuls = nuls;
        self
    }
}

/// Sizing and retry behaviour of the allocating fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchPolicy {
    /// Total number of size-then-fetch rounds before giving up with
    /// `TargetVolatile`. Never less than one.
    pub max_attempts: usize,
    /// Extra bytes allocated on top of the queried size, so small growth
    /// between query and fetch does not cost a retry.
    pub margin: usize,
}

impl Default for FetchPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            margin: 64,
        }
    }
}

impl FetchPolicy {
    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    pub fn with_margin(mut self, margin: usize) -> Self {
        self.margin = margin;
        self
    }
}
