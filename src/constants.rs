//! Constants shared by the verse client and the acquisition engine.

use std::time::Duration;

/// Default verse service base URL.
pub const DEFAULT_BASE_URL: &str = "https://bolls.life";

/// Default HTTP connect timeout (10 seconds).
pub const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Default HTTP read timeout (30 seconds; verse payloads are tiny).
pub const READ_TIMEOUT_SECS: u64 = 30;

/// Default pause between consecutive verse requests.
pub const DEFAULT_REQUEST_DELAY: Duration = Duration::from_millis(50);

/// Highest verse number probed in any chapter before treating it as ended.
pub const MAX_VERSES_PER_CHAPTER: u32 = 250;

/// Warning threshold for cumulative throttle delay per host (5 minutes).
///
/// A full Psalms download spends roughly two minutes sleeping at the default delay.
pub const CUMULATIVE_DELAY_WARNING_THRESHOLD: Duration = Duration::from_secs(300);
