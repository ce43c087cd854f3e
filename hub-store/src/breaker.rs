//! Circuit breaker guarding the triple store connection. After a run of
//! failures the breaker opens and calls fail fast instead of piling
//! timeouts onto a struggling store; after a cool-down a single probe is
//! let through.

use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tracing::warn;

use crate::error::{Result, StoreError};

#[derive(Debug, Clone)]
pub struct BreakerConfig {
    /// Consecutive failures before the breaker opens.
    pub failure_threshold: u32,
    /// How long the breaker stays open before letting a probe through.
    pub reset_timeout: Duration,
}

impl Default for BreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: 5,
            reset_timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Debug)]
enum State {
    Closed { failures: u32 },
    Open { since: Instant },
    HalfOpen,
}

#[derive(Debug)]
pub struct CircuitBreaker {
    config: BreakerConfig,
    state: Mutex<State>,
}

impl CircuitBreaker {
    pub fn new(config: BreakerConfig) -> Self {
        Self {
            config,
            state: Mutex::new(State::Closed { failures: 0 }),
        }
    }

    /// Call before each request. `Err(CircuitOpen)` means skip the request.
    pub fn try_acquire(&self) -> Result<()> {
        let mut state = self.state.lock();
        match *state {
            State::Closed { .. } | State::HalfOpen => Ok(()),
            State::Open { since } => {
                if since.elapsed() >= self.config.reset_timeout {
                    *state = State::HalfOpen;
                    Ok(())
                } else {
                    Err(StoreError::CircuitOpen)
                }
            }
        }
    }

    pub fn record_success(&self) {
        *self.state.lock() = State::Closed { failures: 0 };
    }

    pub fn record_failure(&self) {
        let mut state = self.state.lock();
        match *state {
            State::Closed { failures } => {
                let failures = failures + 1;
                if failures >= self.config.failure_threshold {
                    warn!(failures, "circuit breaker opened");
                    *state = State::Open {
                        since: Instant::now(),
                    };
                } else {
                    *state = State::Closed { failures };
                }
            }
            State::HalfOpen => {
                *state = State::Open {
                    since: Instant::now(),
                };
            }
            State::Open { .. } => {}
        }
    }
}
