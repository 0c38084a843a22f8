//! Timing instrumentation.
//!
//! Pointer handling and `tick` run on the host's UI thread, so anything slow
//! there shows up as input lag or a stuttering slide. This module provides:
//!
//! - **Scoped timers**: RAII-style timing for code blocks
//! - **Operation statistics**: rolling average / p95 / max per operation
//! - **Conditional compilation**: `profile_scope!` is free when the
//!   `profiling` feature is off
//!
//! ## Usage
//!
//! ```toml
//! [dependencies]
//! dockboard = { features = ["profiling"] }
//! ```
//!
//! ```ignore
//! use dockboard::profile_scope;
//!
//! fn place_items() {
//!     profile_scope!("place_items");
//!     // ... work ...
//! }
//! ```

use std::collections::{HashMap, VecDeque};
use std::time::Instant;
use tracing::{debug, warn};
#[cfg(feature = "profiling")]
use tracing::trace;

/// Budget for a single `tick` or pointer event before it is reported.
pub const EVENT_BUDGET_MS: f64 = 4.0;

/// Samples kept per operation.
const STATS_SAMPLE_COUNT: usize = 100;

/// Profile a scope with the given name. Zero-cost when profiling is disabled.
///
/// # Example
/// ```ignore
/// fn hit_test() {
///     profile_scope!("hit_test");
/// }
/// ```
#[macro_export]
macro_rules! profile_scope {
    ($name:expr) => {
        #[cfg(feature = "profiling")]
        let _timer = $crate::perf::ScopedTimer::for_profiling($name);
        #[cfg(not(feature = "profiling"))]
        let _ = $name;
    };
    ($name:expr, $threshold_ms:expr) => {
        #[cfg(feature = "profiling")]
        let _timer = $crate::perf::ScopedTimer::new($name, $threshold_ms);
        #[cfg(not(feature = "profiling"))]
        let _ = ($name, $threshold_ms);
    };
}

/// Rolling statistics for one operation.
#[derive(Debug, Clone)]
pub struct OperationStats {
    samples: VecDeque<f64>,
    count: u64,
    min_ms: f64,
    max_ms: f64,
    sum_ms: f64,
}

impl Default for OperationStats {
    fn default() -> Self {
        Self {
            samples: VecDeque::with_capacity(STATS_SAMPLE_COUNT),
            count: 0,
            min_ms: f64::MAX,
            max_ms: 0.0,
            sum_ms: 0.0,
        }
    }
}

impl OperationStats {
    pub fn record(&mut self, ms: f64) {
        if self.samples.len() >= STATS_SAMPLE_COUNT {
            if let Some(old) = self.samples.pop_front() {
                self.sum_ms -= old;
            }
        }
        self.samples.push_back(ms);
        self.sum_ms += ms;
        self.count += 1;
        self.min_ms = self.min_ms.min(ms);
        self.max_ms = self.max_ms.max(ms);
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn min_ms(&self) -> f64 {
        if self.count == 0 { 0.0 } else { self.min_ms }
    }

    pub fn max_ms(&self) -> f64 {
        self.max_ms
    }

    /// Average over the retained samples.
    pub fn average(&self) -> f64 {
        if self.samples.is_empty() {
            0.0
        } else {
            self.sum_ms / self.samples.len() as f64
        }
    }

    /// 95th percentile over the retained samples.
    pub fn p95(&self) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        let mut sorted: Vec<f64> = self.samples.iter().copied().collect();
        sorted.sort_by(|a, b| a.total_cmp(b));
        let idx = ((sorted.len() as f64) * 0.95).floor() as usize;
        sorted.get(idx.min(sorted.len() - 1)).copied().unwrap_or(0.0)
    }
}

/// Per-operation timing table, filled by the host or the replay tool.
#[derive(Debug, Default)]
pub struct PerfRecorder {
    stats: HashMap<&'static str, OperationStats>,
    over_budget: u64,
}

impl PerfRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, name: &'static str, elapsed_ms: f64) {
        if elapsed_ms > EVENT_BUDGET_MS {
            self.over_budget += 1;
            warn!(
                operation = name,
                elapsed_ms = format!("{:.2}", elapsed_ms),
                budget_ms = format!("{:.2}", EVENT_BUDGET_MS),
                "event over budget"
            );
        }
        self.stats.entry(name).or_default().record(elapsed_ms);
    }

    /// Run `f`, recording its duration under `name`.
    pub fn time<T, F: FnOnce() -> T>(&mut self, name: &'static str, f: F) -> T {
        let (result, elapsed_ms) = measure(f);
        self.record(name, elapsed_ms);
        result
    }

    pub fn get(&self, name: &str) -> Option<&OperationStats> {
        self.stats.get(name)
    }

    pub fn over_budget(&self) -> u64 {
        self.over_budget
    }

    /// Operations sorted by average time, slowest first.
    pub fn slowest(&self) -> Vec<(&'static str, &OperationStats)> {
        let mut ops: Vec<_> = self.stats.iter().map(|(k, v)| (*k, v)).collect();
        ops.sort_by(|a, b| b.1.average().total_cmp(&a.1.average()));
        ops
    }

    pub fn log_summary(&self) {
        for (name, stats) in self.slowest().iter().take(5) {
            debug!(
                "{}: avg={:.3}ms, p95={:.3}ms, max={:.3}ms, count={}",
                name,
                stats.average(),
                stats.p95(),
                stats.max_ms,
                stats.count
            );
        }
    }
}

/// A scoped timer that reports its duration on drop when it exceeds the
/// threshold.
pub struct ScopedTimer {
    name: &'static str,
    start: Instant,
    threshold_ms: f64,
    #[cfg(feature = "profiling")]
    depth: usize,
}

#[cfg(feature = "profiling")]
thread_local! {
    static CURRENT_DEPTH: std::cell::Cell<usize> = const { std::cell::Cell::new(0) };
}

impl ScopedTimer {
    pub fn new(name: &'static str, threshold_ms: f64) -> Self {
        #[cfg(feature = "profiling")]
        let depth = CURRENT_DEPTH.with(|d| {
            let current = d.get();
            d.set(current + 1);
            current
        });

        Self {
            name,
            start: Instant::now(),
            threshold_ms,
            #[cfg(feature = "profiling")]
            depth,
        }
    }

    /// Timer for `profile_scope!` (1ms threshold).
    pub fn for_profiling(name: &'static str) -> Self {
        Self::new(name, 1.0)
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl Drop for ScopedTimer {
    fn drop(&mut self) {
        let elapsed_ms = self.elapsed_ms();

        #[cfg(feature = "profiling")]
        {
            CURRENT_DEPTH.with(|d| d.set(d.get().saturating_sub(1)));
            if elapsed_ms > self.threshold_ms {
                let indent = "  ".repeat(self.depth);
                trace!("{}[PERF] {}: {:.2}ms", indent, self.name, elapsed_ms);
            }
        }

        #[cfg(not(feature = "profiling"))]
        {
            if elapsed_ms > self.threshold_ms {
                warn!(
                    operation = self.name,
                    elapsed_ms = format!("{:.2}", elapsed_ms),
                    threshold_ms = format!("{:.2}", self.threshold_ms),
                    "slow operation"
                );
            }
        }
    }
}

/// Run `f` and return its result with the elapsed time in milliseconds.
#[inline]
pub fn measure<T, F: FnOnce() -> T>(f: F) -> (T, f64) {
    let start = Instant::now();
    let result = f();
    let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;
    (result, elapsed_ms)
}
