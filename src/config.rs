use std::time::Duration;

pub const DEFAULT_ATTEMPT_TIMEOUT: Duration = Duration::from_secs(2);
pub const DEFAULT_ATTEMPTS: u32 = 3;
pub const DEFAULT_DEADLINE: Duration = Duration::from_secs(30);
pub const DEFAULT_MAX_DEPTH: usize = 8;

/// Limits applied to one resolution run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolverConfig {
    /// How long to wait for a reply to a single datagram
    pub attempt_timeout: Duration,
    /// Datagrams sent for one (name, server) pair before giving up on it
    pub attempts: u32,
    /// Wall-clock bound for the whole run, referrals and retries included
    pub deadline: Duration,
    /// How many nameserver lookups may be nested inside each other
    pub max_depth: usize,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        ResolverConfig {
            attempt_timeout: DEFAULT_ATTEMPT_TIMEOUT,
            attempts: DEFAULT_ATTEMPTS,
            deadline: DEFAULT_DEADLINE,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}
