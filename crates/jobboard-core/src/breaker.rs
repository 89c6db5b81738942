//! Circuit breaker guarding calls to one logical dependency.
//!
//! ```text
//! ┌────────┐  failure ratio  ┌──────┐  open_duration  ┌───────────┐
//! │ Closed ├────────────────►│ Open ├────────────────►│ Half-Open │
//! └────┬───┘                 └──────┘                 └─────┬─────┘
//!      │                        ▲                           │
//!      │                        │  probe failure            │ probe successes
//!      │                        └───────────────────────────┤
//!      │◄───────────────────────────────────────────────────┘
//! ```
//!
//! One breaker instance exists per dependency per process and is shared by
//! every concurrent request calling that dependency; while a circuit is
//! open, calls fail immediately without any network I/O.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crate::error::{Error, Result};

/// Breaker tuning, read from the environment so deployments can retune
/// without a code change.
#[derive(Debug, Clone)]
pub struct BreakerConfig {
    /// Failure ratio over the rolling window that opens the circuit.
    pub failure_rate: f64,
    /// Rolling window length; no evaluation happens before this many calls.
    pub min_calls: usize,
    /// How long an open circuit stays open before probing.
    pub open_duration: Duration,
    /// Number of probe calls allowed (and required to succeed) in half-open.
    pub half_open_probes: u32,
}

impl Default for BreakerConfig {
    fn default() -> Self {
        Self {
            failure_rate: 0.5,
            min_calls: 10,
            open_duration: Duration::from_secs(30),
            half_open_probes: 3,
        }
    }
}

impl BreakerConfig {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            failure_rate: env_or("BREAKER_FAILURE_RATE", defaults.failure_rate)?,
            min_calls: env_or("BREAKER_MIN_CALLS", defaults.min_calls)?,
            open_duration: Duration::from_secs(env_or(
                "BREAKER_OPEN_SECS",
                defaults.open_duration.as_secs(),
            )?),
            half_open_probes: env_or("BREAKER_HALF_OPEN_PROBES", defaults.half_open_probes)?,
        })
    }
}

fn env_or<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|e| Error::Config(format!("Invalid value for {name}: {e}"))),
        Err(_) => Ok(default),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakerState {
    Closed,
    Open,
    HalfOpen,
}

impl std::fmt::Display for BreakerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Closed => write!(f, "closed"),
            Self::Open => write!(f, "open"),
            Self::HalfOpen => write!(f, "half-open"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("{dependency} circuit is open, retry in {retry_after:?}")]
pub struct BreakerOpen {
    pub dependency: String,
    pub retry_after: Duration,
}

#[derive(Debug)]
struct BreakerInner {
    state: BreakerState,
    /// Rolling window of recent outcomes, `true` = failure.
    window: VecDeque<bool>,
    opened_at: Option<Instant>,
    probes_issued: u32,
    probe_successes: u32,
}

impl BreakerInner {
    fn new() -> Self {
        Self {
            state: BreakerState::Closed,
            window: VecDeque::new(),
            opened_at: None,
            probes_issued: 0,
            probe_successes: 0,
        }
    }
}

/// Shared-state circuit breaker; cloning yields a handle to the same
/// circuit. Counters are mutex-guarded since many requests probe the same
/// breaker concurrently.
#[derive(Clone)]
pub struct CircuitBreaker {
    name: Arc<str>,
    config: BreakerConfig,
    inner: Arc<Mutex<BreakerInner>>,
}

impl CircuitBreaker {
    pub fn new(name: impl Into<String>, config: BreakerConfig) -> Self {
        Self {
            name: Arc::from(name.into()),
            config,
            inner: Arc::new(Mutex::new(BreakerInner::new())),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether a call may proceed. In open state, transitions to half-open
    /// once the open duration has elapsed and admits a probe; otherwise
    /// fails fast. In half-open, admits at most `half_open_probes` calls.
    pub fn check(&self) -> std::result::Result<(), BreakerOpen> {
        let mut inner = self.inner.lock().expect("breaker mutex poisoned");
        match inner.state {
            BreakerState::Closed => Ok(()),
            BreakerState::HalfOpen => {
                if inner.probes_issued < self.config.half_open_probes {
                    inner.probes_issued += 1;
                    Ok(())
                } else {
                    Err(BreakerOpen {
                        dependency: self.name.to_string(),
                        retry_after: self.config.open_duration,
                    })
                }
            }
            BreakerState::Open => {
                let elapsed = inner
                    .opened_at
                    .map(|t| t.elapsed())
                    .unwrap_or(Duration::ZERO);
                if elapsed >= self.config.open_duration {
                    inner.state = BreakerState::HalfOpen;
                    inner.probes_issued = 1;
                    inner.probe_successes = 0;
                    tracing::warn!(
                        dependency = %self.name,
                        from = %BreakerState::Open,
                        to = %BreakerState::HalfOpen,
                        "circuit breaker transition: allowing probe"
                    );
                    Ok(())
                } else {
                    Err(BreakerOpen {
                        dependency: self.name.to_string(),
                        retry_after: self.config.open_duration.saturating_sub(elapsed),
                    })
                }
            }
        }
    }

    pub fn record_success(&self) {
        let mut inner = self.inner.lock().expect("breaker mutex poisoned");
        match inner.state {
            BreakerState::Closed => {
                self.push_outcome(&mut inner, false);
            }
            BreakerState::HalfOpen => {
                inner.probe_successes += 1;
                if inner.probe_successes >= self.config.half_open_probes {
                    inner.state = BreakerState::Closed;
                    inner.window.clear();
                    inner.opened_at = None;
                    tracing::warn!(
                        dependency = %self.name,
                        from = %BreakerState::HalfOpen,
                        to = %BreakerState::Closed,
                        "circuit breaker transition: recovery confirmed"
                    );
                }
            }
            BreakerState::Open => {}
        }
    }

    pub fn record_failure(&self) {
        let mut inner = self.inner.lock().expect("breaker mutex poisoned");
        match inner.state {
            BreakerState::Closed => {
                self.push_outcome(&mut inner, true);
            }
            BreakerState::HalfOpen => {
                self.open(&mut inner, BreakerState::HalfOpen);
            }
            BreakerState::Open => {
                // Late failure from a call issued before the circuit opened;
                // restart the cooldown.
                inner.opened_at = Some(Instant::now());
            }
        }
    }

    /// Current state, applying the implicit open → half-open transition.
    pub fn state(&self) -> BreakerState {
        let mut inner = self.inner.lock().expect("breaker mutex poisoned");
        if inner.state == BreakerState::Open {
            let elapsed = inner
                .opened_at
                .map(|t| t.elapsed())
                .unwrap_or(Duration::ZERO);
            if elapsed >= self.config.open_duration {
                inner.state = BreakerState::HalfOpen;
                inner.probes_issued = 0;
                inner.probe_successes = 0;
            }
        }
        inner.state
    }

    fn push_outcome(&self, inner: &mut BreakerInner, failed: bool) {
        inner.window.push_back(failed);
        while inner.window.len() > self.config.min_calls {
            inner.window.pop_front();
        }
        if inner.window.len() >= self.config.min_calls {
            let failures = inner.window.iter().filter(|f| **f).count();
            let ratio = failures as f64 / inner.window.len() as f64;
            if ratio >= self.config.failure_rate {
                self.open(inner, BreakerState::Closed);
            }
        }
    }

    fn open(&self, inner: &mut BreakerInner, from: BreakerState) {
        inner.state = BreakerState::Open;
        inner.opened_at = Some(Instant::now());
        inner.window.clear();
        inner.probes_issued = 0;
        inner.probe_successes = 0;
        tracing::warn!(
            dependency = %self.name,
            from = %from,
            to = %BreakerState::Open,
            "circuit breaker transition: dependency marked unavailable"
        );
    }
}
