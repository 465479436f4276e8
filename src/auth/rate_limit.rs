use std::{
    collections::HashMap,
    sync::Mutex,
    time::{Duration, Instant},
};

use crate::errors::{AppError, AppResult};

/// Throttles attempts per client key.
pub trait RateLimiter: Send + Sync {
    /// `Ok` when the attempt may proceed, `TooManyRequests` otherwise.
    fn check(&self, key: &str) -> AppResult<()>;
}

struct Window {
    started: Instant,
    count: u32,
}

/// Expired windows are swept once this many keys are tracked.
const SWEEP_THRESHOLD: usize = 1024;

/// Fixed-window counter held in process memory. State is lost on restart
/// and not shared between instances.
pub struct InMemoryRateLimiter {
    max_attempts: u32,
    window: Duration,
    windows: Mutex<HashMap<String, Window>>,
}

impl InMemoryRateLimiter {
    pub fn new(max_attempts: u32, window: Duration) -> Self {
        Self {
            max_attempts,
            window,
            windows: Mutex::new(HashMap::new()),
        }
    }

    pub fn check_at(&self, key: &str, now: Instant) -> AppResult<()> {
        let mut windows = self
            .windows
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if windows.len() >= SWEEP_THRESHOLD {
            let span = self.window;
            windows.retain(|_, w| now.saturating_duration_since(w.started) <= span);
        }

        let window = windows.entry(key.to_string()).or_insert(Window {
            started: now,
            count: 0,
        });

        let elapsed = now.saturating_duration_since(window.started);
        if elapsed > self.window {
            *window = Window {
                started: now,
                count: 0,
            };
        }

        if window.count >= self.max_attempts {
            let remaining = self.window.saturating_sub(elapsed);
            let retry_after_secs = remaining.as_millis().div_ceil(1000).max(1) as u64;
            log::warn!("Rate limit hit for client {}", key);
            return Err(AppError::TooManyRequests { retry_after_secs });
        }

        window.count += 1;
        Ok(())
    }
}

impl InMemoryRateLimiter {
    pub fn tracked_keys(&self) -> usize {
        self.windows
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }
}

impl RateLimiter for InMemoryRateLimiter {
    fn check(&self, key: &str) -> AppResult<()> {
        self.check_at(key, Instant::now())
    }
}
