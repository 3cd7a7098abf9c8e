//! Condition debouncing against the boot clock

use std::time::Duration;
use upkeep_errors::Error;
use upkeep_platform::Clock;

/// Wait until `condition` has read true continuously for `debounce`
///
/// The condition is evaluated once per `poll`, after sleeping. Every false
/// reading, and every evaluation error, restarts the window. Elapsed time is
/// measured on `clock` so wall-clock changes during the wait have no effect.
///
/// Returns the total time spent waiting. Never returns while the condition
/// keeps flapping.
pub async fn wait_until_stable<F>(
    clock: &dyn Clock,
    mut condition: F,
    debounce: Duration,
    poll: Duration,
) -> Duration
where
    F: FnMut() -> Result<bool, Error>,
{
    let start = clock.uptime();
    let mut begin = start;

    loop {
        tokio::time::sleep(poll).await;
        let now = clock.uptime();

        let holds = match condition() {
            Ok(holds) => holds,
            Err(e) => {
                tracing::debug!(error = %e, "debounce condition failed, treating as false");
                false
            }
        };

        if !holds {
            begin = now;
            continue;
        }

        if now.saturating_sub(begin) >= debounce {
            return now.saturating_sub(start);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct VirtualClock {
        origin: tokio::time::Instant,
    }

    impl Clock for VirtualClock {
        fn uptime(&self) -> Duration {
            self.origin.elapsed()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn always_true_returns_after_one_window() {
        let clock = VirtualClock {
            origin: tokio::time::Instant::now(),
        };
        let waited = wait_until_stable(
            &clock,
            || Ok(true),
            Duration::from_secs(15),
            Duration::from_secs(1),
        )
        .await;
        assert_eq!(waited, Duration::from_secs(15));
    }

    #[tokio::test(start_paused = true)]
    async fn errors_restart_the_window() {
        let clock = VirtualClock {
            origin: tokio::time::Instant::now(),
        };
        let calls = Cell::new(0u32);
        let waited = wait_until_stable(
            &clock,
            || {
                calls.set(calls.get() + 1);
                if calls.get() <= 3 {
                    Err(Error::internal("process table unavailable"))
                } else {
                    Ok(true)
                }
            },
            Duration::from_secs(5),
            Duration::from_secs(1),
        )
        .await;
        assert_eq!(waited, Duration::from_secs(8));
    }

    #[tokio::test(start_paused = true)]
    async fn a_single_false_reading_restarts_the_window() {
        let clock = VirtualClock {
            origin: tokio::time::Instant::now(),
        };
        let calls = Cell::new(0u32);
        let waited = wait_until_stable(
            &clock,
            || {
                calls.set(calls.get() + 1);
                Ok(calls.get() != 4)
            },
            Duration::from_secs(5),
            Duration::from_secs(1),
        )
        .await;
        // true at 1..=3 (window not yet full), false at 4, then true from 5
        assert_eq!(waited, Duration::from_secs(9));
    }
}
