//! Per-operation latency capture and reporting.
//!
//! ## Components
//!
//! - [`LatencyRecorder`]: nanosecond samples in arrival order
//! - [`ScopedTimer`]: records the time between its creation and drop
//! - [`LatencyStats`]: count, min, max, mean, median and percentiles
//!
//! ## Export Format
//!
//! `save_csv` writes one integer nanosecond value per line, in arrival
//! order, with no header.
//!
//! ## Statistics
//!
//! Mean and median are `rust_decimal::Decimal`; percentiles are read at
//! index `floor(count * q)` of the sorted samples.
//!
//! ```
//! use level_book::latency::LatencyStats;
//!
//! let stats = LatencyStats::from_samples(&[40, 10, 30, 20]).unwrap();
//! assert_eq!(stats.min, 10);
//! assert_eq!(stats.max, 40);
//! assert_eq!(stats.median, rust_decimal::Decimal::from(25));
//! assert_eq!(stats.p50, 30);
//! ```

use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::Instant;

use rust_decimal::Decimal;

use crate::error::HarnessError;

// ============================================================================
// Recorder
// ============================================================================

/// Collected nanosecond samples.
#[derive(Debug, Clone, Default)]
pub struct LatencyRecorder {
    samples: Vec<u64>,
}

impl LatencyRecorder {
    /// Create an empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a recorder with room for `capacity` samples
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            samples: Vec::with_capacity(capacity),
        }
    }

    /// Append one sample
    #[inline]
    pub fn record(&mut self, nanos: u64) {
        self.samples.push(nanos);
    }

    /// Samples in arrival order
    pub fn samples(&self) -> &[u64] {
        &self.samples
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Check if nothing was recorded
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Summary statistics, or `None` if nothing was recorded
    pub fn stats(&self) -> Option<LatencyStats> {
        LatencyStats::from_samples(&self.samples)
    }

    /// Write every sample, one per line
    pub fn write_to<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for nanos in &self.samples {
            writeln!(writer, "{nanos}")?;
        }
        Ok(())
    }

    /// Write every sample to `path`, one per line
    pub fn save_csv(&self, path: impl AsRef<Path>) -> Result<(), HarnessError> {
        let path = path.as_ref();
        let export = |source| HarnessError::Export {
            path: path.to_path_buf(),
            source,
        };

        let file = File::create(path).map_err(export)?;
        let mut writer = BufWriter::new(file);
        self.write_to(&mut writer).map_err(export)?;
        writer.flush().map_err(export)?;

        tracing::debug!(path = %path.display(), samples = self.len(), "latencies exported");
        Ok(())
    }
}

// ============================================================================
// Scoped timer
// ============================================================================

/// Records elapsed nanoseconds into a recorder when dropped.
///
/// ```
/// use level_book::latency::{LatencyRecorder, ScopedTimer};
///
/// let mut recorder = LatencyRecorder::new();
/// {
///     let _timer = ScopedTimer::new(&mut recorder);
/// }
/// assert_eq!(recorder.len(), 1);
/// ```
#[must_use = "the timer records on drop; binding it to `_` drops it immediately"]
pub struct ScopedTimer<'a> {
    recorder: &'a mut LatencyRecorder,
    start: Instant,
}

impl<'a> ScopedTimer<'a> {
    /// Start timing
    #[inline]
    pub fn new(recorder: &'a mut LatencyRecorder) -> Self {
        Self {
            recorder,
            start: Instant::now(),
        }
    }
}

impl Drop for ScopedTimer<'_> {
    #[inline]
    fn drop(&mut self) {
        let nanos = u64::try_from(self.start.elapsed().as_nanos()).unwrap_or(u64::MAX);
        self.recorder.record(nanos);
    }
}

// ============================================================================
// Statistics
// ============================================================================

/// Summary of a sample set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LatencyStats {
    /// Number of samples
    pub count: usize,
    /// Fastest sample (ns)
    pub min: u64,
    /// Slowest sample (ns)
    pub max: u64,
    /// Arithmetic mean (ns)
    pub mean: Decimal,
    /// Middle sample, or the mean of the two middle samples (ns)
    pub median: Decimal,
    /// 50th percentile (ns)
    pub p50: u64,
    /// 90th percentile (ns)
    pub p90: u64,
    /// 99th percentile (ns)
    pub p99: u64,
}

impl LatencyStats {
    /// Compute statistics over `samples`
    ///
    /// # Returns
    ///
    /// `None` for an empty sample set.
    pub fn from_samples(samples: &[u64]) -> Option<Self> {
        if samples.is_empty() {
            return None;
        }

        let mut sorted = samples.to_vec();
        sorted.sort_unstable();
        let count = sorted.len();

        let total: Decimal = sorted.iter().map(|&n| Decimal::from(n)).sum();
        let mean = total / Decimal::from(count as u64);

        let mid = count / 2;
        let median = if count % 2 == 0 {
            (Decimal::from(sorted[mid - 1]) + Decimal::from(sorted[mid])) / Decimal::TWO
        } else {
            Decimal::from(sorted[mid])
        };

        Some(Self {
            count,
            min: sorted[0],
            max: sorted[count - 1],
            mean,
            median,
            p50: percentile(&sorted, 50),
            p90: percentile(&sorted, 90),
            p99: percentile(&sorted, 99),
        })
    }
}

/// Sample at index `floor(len * pct / 100)` of a sorted, non-empty slice
fn percentile(sorted: &[u64], pct: usize) -> u64 {
    let idx = (sorted.len() * pct / 100).min(sorted.len() - 1);
    sorted[idx]
}

impl fmt::Display for LatencyStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Operations: {}", self.count)?;
        writeln!(f, "Min: {} ns", self.min)?;
        writeln!(f, "Max: {} ns", self.max)?;
        writeln!(f, "Avg: {} ns", self.mean.round_dp(2).normalize())?;
        writeln!(f, "Median: {} ns", self.median.normalize())?;
        writeln!(f, "P50: {} ns", self.p50)?;
        writeln!(f, "P90: {} ns", self.p90)?;
        write!(f, "P99: {} ns", self.p99)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
