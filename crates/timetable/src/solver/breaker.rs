//! Fail-fast guard for an unavailable solver.
//!
//! Only failures that say the solver itself is down count: it could not be
//! reached, it timed out, or it answered 5xx. A 4xx answer or a malformed
//! body means the solver is up, so those reset the streak like a success.

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use super::SolverError;

#[derive(Debug, Default)]
struct Streak {
    failures: u32,
    open_until: Option<Instant>,
}

pub struct SolverBreaker {
    streak: Mutex<Streak>,
    threshold: u32,
    cooldown: Duration,
}

impl SolverBreaker {
    /// Opens after `threshold` consecutive outages and stays open for `cooldown`.
    pub fn new(threshold: u32, cooldown: Duration) -> Self {
        Self {
            streak: Mutex::new(Streak::default()),
            threshold: threshold.max(1),
            cooldown,
        }
    }

    fn streak(&self) -> MutexGuard<'_, Streak> {
        self.streak.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// `Err(CircuitOpen)` with the remaining wait while calls are suspended.
    /// Once the cooldown has passed the next call is let through as a trial.
    pub fn check(&self) -> Result<(), SolverError> {
        let mut streak = self.streak();
        let open_until = streak.open_until;
        match open_until {
            Some(until) if Instant::now() < until => Err(SolverError::CircuitOpen {
                retry_after_secs: until.saturating_duration_since(Instant::now()).as_secs() + 1,
            }),
            Some(_) => {
                streak.open_until = None;
                Ok(())
            }
            None => Ok(()),
        }
    }

    /// Feeds the outcome of one solver call into the streak.
    pub fn record<T>(&self, outcome: &Result<T, SolverError>) {
        let mut streak = self.streak();
        match outcome {
            Err(e) if e.is_outage() => {
                streak.failures = streak.failures.saturating_add(1);
                if streak.failures >= self.threshold {
                    streak.open_until = Some(Instant::now() + self.cooldown);
                }
            }
            _ => *streak = Streak::default(),
        }
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.streak().failures
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outage() -> Result<(), SolverError> {
        Err(SolverError::Unreachable {
            message: "connection refused".to_string(),
        })
    }

    fn upstream(status: u16) -> Result<(), SolverError> {
        Err(SolverError::Upstream {
            status,
            body: String::new(),
        })
    }

    #[test]
    fn test_opens_after_consecutive_outages() {
        let breaker = SolverBreaker::new(2, Duration::from_secs(60));

        breaker.record(&outage());
        assert!(breaker.check().is_ok());
        breaker.record(&upstream(503));
        assert_eq!(breaker.consecutive_failures(), 2);

        match breaker.check() {
            Err(SolverError::CircuitOpen { retry_after_secs }) => {
                assert!(retry_after_secs > 0 && retry_after_secs <= 61)
            }
            other => panic!("expected an open breaker, got {:?}", other),
        }
    }

    #[test]
    fn test_client_errors_do_not_trip() {
        let breaker = SolverBreaker::new(1, Duration::from_secs(60));

        breaker.record(&upstream(422));
        breaker.record(&Err::<(), _>(SolverError::InvalidResponse {
            message: "not json".to_string(),
        }));
        assert!(breaker.check().is_ok());
        assert_eq!(breaker.consecutive_failures(), 0);
    }

    #[test]
    fn test_success_resets_the_streak() {
        let breaker = SolverBreaker::new(3, Duration::from_secs(60));
        breaker.record(&outage());
        breaker.record(&outage());
        breaker.record(&Ok::<(), SolverError>(()));
        breaker.record(&outage());

        assert_eq!(breaker.consecutive_failures(), 1);
        assert!(breaker.check().is_ok());
    }

    #[test]
    fn test_allows_a_trial_after_cooldown() {
        let breaker = SolverBreaker::new(1, Duration::ZERO);
        breaker.record(&outage());

        std::thread::sleep(Duration::from_millis(5));
        assert!(breaker.check().is_ok());

        breaker.record(&outage());
        assert_eq!(breaker.consecutive_failures(), 2);
    }
}
