use std::thread;
use std::time::{Duration, Instant};
use log::debug;

pub fn pause(duration: Duration, reason: &str) {
    if duration.is_zero() {
        return;
    }
    debug!("Waiting {} ms ({})...", duration.as_millis(), reason);
    thread::sleep(duration);
}

/// Polls `check` every `interval` until it returns true or `timeout` has passed.
/// `check` always runs at least once. Errors from `check` end the wait immediately.
pub fn wait_until<F>(timeout: Duration, interval: Duration, mut check: F) -> anyhow::Result<bool>
where
    F: FnMut() -> anyhow::Result<bool>,
{
    let deadline = Instant::now() + timeout;
    loop {
        if check()? {
            return Ok(true);
        }
        if Instant::now() >= deadline {
            return Ok(false);
        }
        thread::sleep(interval.min(deadline.saturating_duration_since(Instant::now())));
    }
}
