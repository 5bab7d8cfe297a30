//! Poll-until-true primitive shared by conditions, matchers and pages

use std::future::Future;
use std::time::Duration;
use tokio::time::{Instant, sleep};

use crate::errors::Result;

/// Timeout substituted for a zero timeout so that at least one check runs
pub const MIN_CHECK_TIMEOUT: Duration = Duration::from_millis(10);

/// Shortest pause between two checks
const MIN_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Replace a zero timeout with [`MIN_CHECK_TIMEOUT`]
pub fn at_least_one_check(timeout: Duration) -> Duration {
    if timeout.is_zero() {
        MIN_CHECK_TIMEOUT
    } else {
        timeout
    }
}

/// Run `check` until it reports `true` or `timeout` elapses.
///
/// The check always runs at least once. Sleeps never overshoot the deadline,
/// so the last check happens right at it. Returns `Ok(false)` on timeout;
/// errors from `check` end the wait immediately.
pub async fn poll_until<F, Fut>(timeout: Duration, poll: Duration, mut check: F) -> Result<bool>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<bool>>,
{
    let deadline = Instant::now() + timeout;
    let poll = poll.max(MIN_POLL_INTERVAL);

    loop {
        if check().await? {
            return Ok(true);
        }

        let now = Instant::now();
        if now >= deadline {
            return Ok(false);
        }
        sleep(poll.min(deadline - now)).await;
    }
}
