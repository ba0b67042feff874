//! Deadline timers for time-managed searches.

use std::thread;
use std::time::{Duration, Instant};

use crate::sync::StopFlag;

/// Poll granularity while waiting on a deadline. Short enough that a
/// `stop` command releases the thread promptly.
const MAX_POLL_SLEEP: Duration = Duration::from_millis(5);

/// Spawn a detached thread that sets `stop` once `deadline` passes.
///
/// The thread also exits as soon as the flag is set by someone else, so
/// long deadlines (infinite analysis uses an hour) do not leak sleeping
/// threads across searches.
pub fn spawn_deadline_timer(deadline: Instant, stop: StopFlag) {
    thread::spawn(move || loop {
        if stop.is_stopped() {
            break;
        }
        let now = Instant::now();
        if now >= deadline {
            stop.stop();
            break;
        }
        thread::sleep((deadline - now).min(MAX_POLL_SLEEP));
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timer_trips_the_flag() {
        let flag = StopFlag::new();
        spawn_deadline_timer(Instant::now() + Duration::from_millis(30), flag.clone());
        thread::sleep(Duration::from_millis(120));
        assert!(flag.is_stopped());
    }

    #[test]
    fn past_deadline_trips_immediately() {
        let flag = StopFlag::new();
        spawn_deadline_timer(Instant::now(), flag.clone());
        thread::sleep(Duration::from_millis(50));
        assert!(flag.is_stopped());
    }
}
