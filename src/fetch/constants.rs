//! Constants for page acquisition (timeouts).

/// Default TCP connect timeout (10 seconds).
pub const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Default per-attempt timeout covering request and body (30 seconds).
pub const ATTEMPT_TIMEOUT_SECS: u64 = 30;
