use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Monotonic clock the game loops poll against
pub trait Timer: Clone + Send + Sync {
    type Timestamp: Copy + Clone + Send + Sync;
    fn now(&self) -> Self::Timestamp;
    fn elapsed(&self, ts: Self::Timestamp) -> Duration;
    fn sleep(&self, d: Duration);
    /// Records the gap between two consecutive input samples
    fn record_sample(&mut self, gap: Duration);
    fn reset_samples(&mut self);
    fn poll_stats(&self) -> PollStats;
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PollStats {
    pub average_gap_ns: f64,
    pub jitter_ns: f64,
    pub min_gap_ns: f64,
    pub max_gap_ns: f64,
    pub samples: usize,
}

impl PollStats {
    pub fn from_gaps<'a>(gaps: impl IntoIterator<Item = &'a Duration>) -> Self {
        let times: Vec<f64> = gaps.into_iter().map(|d| d.as_nanos() as f64).collect();
        if times.is_empty() {
            return PollStats::default();
        }
        let n = times.len() as f64;
        let avg = times.iter().sum::<f64>() / n;
        let var = times.iter().map(|x| (x - avg).powi(2)).sum::<f64>() / n;
        let min = times.iter().copied().fold(f64::INFINITY, f64::min);
        let max = times.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        PollStats {
            average_gap_ns: avg,
            jitter_ns: var.sqrt(),
            min_gap_ns: min,
            max_gap_ns: max,
            samples: times.len(),
        }
    }

    /// Worst-case error of a reaction time measured with this poll rate
    pub fn resolution_ms(&self) -> f64 {
        self.max_gap_ns / 1_000_000.0
    }
}

#[derive(Debug, Clone)]
pub struct HighPrecisionTimer {
    start: Instant,
    gaps: VecDeque<Duration>,
    max_samples: usize,
}

impl Timer for HighPrecisionTimer {
    type Timestamp = u64;
    fn now(&self) -> u64 {
        self.start.elapsed().as_nanos() as u64
    }
    fn elapsed(&self, ts: u64) -> Duration {
        Duration::from_nanos(self.now().saturating_sub(ts))
    }
    fn sleep(&self, d: Duration) {
        self.high_precision_sleep(d)
    }
    fn record_sample(&mut self, gap: Duration) {
        if self.gaps.len() >= self.max_samples {
            self.gaps.pop_front();
        }
        self.gaps.push_back(gap);
    }
    fn reset_samples(&mut self) {
        self.gaps.clear();
    }
    fn poll_stats(&self) -> PollStats {
        PollStats::from_gaps(&self.gaps)
    }
}

impl HighPrecisionTimer {
    pub fn new() -> Self {
        Self::with_capacity(4096)
    }

    pub fn with_capacity(max_samples: usize) -> Self {
        Self {
            start: Instant::now(),
            gaps: VecDeque::with_capacity(max_samples),
            max_samples: max_samples.max(1),
        }
    }

    pub fn high_precision_sleep(&self, duration: Duration) {
        if duration.is_zero() {
            return;
        }
        #[cfg(target_os = "linux")]
        self.linux_sleep(duration);
        #[cfg(not(target_os = "linux"))]
        std::thread::sleep(duration);
    }

    #[cfg(target_os = "linux")]
    fn linux_sleep(&self, duration: Duration) {
        use libc::{
            clock_gettime, clock_nanosleep, timespec, CLOCK_MONOTONIC, EINTR, TIMER_ABSTIME,
        };

        let mut now = timespec {
            tv_sec: 0,
            tv_nsec: 0,
        };
        unsafe {
            if clock_gettime(CLOCK_MONOTONIC, &mut now) != 0 {
                std::thread::sleep(duration);
                return;
            }
        }

        // absolute deadline so an interrupted sleep resumes without drift
        let total_nsec = now.tv_nsec as u64 + duration.subsec_nanos() as u64;
        let carry_sec = total_nsec / 1_000_000_000;
        let deadline = timespec {
            tv_sec: now.tv_sec + (duration.as_secs() + carry_sec) as libc::time_t,
            tv_nsec: (total_nsec % 1_000_000_000) as libc::c_long,
        };

        loop {
            let rc = unsafe {
                clock_nanosleep(CLOCK_MONOTONIC, TIMER_ABSTIME, &deadline, std::ptr::null_mut())
            };
            if rc != EINTR {
                break;
            }
        }
    }
}

impl Default for HighPrecisionTimer {
    fn default() -> Self {
        Self::new()
    }
}
