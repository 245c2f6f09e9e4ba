/// Function call counting for the meshing hot paths
use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe counters tracking how much work each stage of the sweep
/// performs. Incremented through `count_call!`, which compiles to
/// nothing without the `profiling` feature.
pub struct FunctionCounters {
    pub generate_calls: AtomicU64,
    pub direction_sweeps: AtomicU64,
    pub slices_skipped: AtomicU64,
    pub slices_meshed: AtomicU64,
    pub quads_emitted: AtomicU64,
}

impl FunctionCounters {
    pub const fn new() -> Self {
        Self {
            generate_calls: AtomicU64::new(0),
            direction_sweeps: AtomicU64::new(0),
            slices_skipped: AtomicU64::new(0),
            slices_meshed: AtomicU64::new(0),
            quads_emitted: AtomicU64::new(0),
        }
    }

    /// Reset all counters to zero
    pub fn reset(&self) {
        self.generate_calls.store(0, Ordering::Relaxed);
        self.direction_sweeps.store(0, Ordering::Relaxed);
        self.slices_skipped.store(0, Ordering::Relaxed);
        self.slices_meshed.store(0, Ordering::Relaxed);
        self.quads_emitted.store(0, Ordering::Relaxed);
    }

    /// Get snapshot of all counters
    pub fn snapshot(&self) -> CounterSnapshot {
        CounterSnapshot {
            generate_calls: self.generate_calls.load(Ordering::Relaxed),
            direction_sweeps: self.direction_sweeps.load(Ordering::Relaxed),
            slices_skipped: self.slices_skipped.load(Ordering::Relaxed),
            slices_meshed: self.slices_meshed.load(Ordering::Relaxed),
            quads_emitted: self.quads_emitted.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CounterSnapshot {
    pub generate_calls: u64,
    pub direction_sweeps: u64,
    pub slices_skipped: u64,
    pub slices_meshed: u64,
    pub quads_emitted: u64,
}

impl CounterSnapshot {
    pub fn print_report(&self) {
        println!("\n=== Meshing Function Counters ===");
        println!("  generate calls:     {:12}", self.generate_calls);
        println!("  direction sweeps:   {:12}", self.direction_sweeps);
        println!("  slices skipped:     {:12}", self.slices_skipped);
        println!("  slices meshed:      {:12}", self.slices_meshed);
        println!("  quads emitted:      {:12}", self.quads_emitted);

        let total_slices = self.slices_skipped + self.slices_meshed;
        if total_slices > 0 {
            let skip_rate = (self.slices_skipped as f64 / total_slices as f64) * 100.0;
            println!("  slice skip rate:    {:11.2}%", skip_rate);
        }
        println!();
    }
}

/// Global function counters instance
pub static FUNCTION_COUNTERS: FunctionCounters = FunctionCounters::new();

/// Macro for incrementing a counter (only when profiling feature is enabled)
#[macro_export]
macro_rules! count_call {
    ($counter:expr) => {
        #[cfg(feature = "profiling")]
        {
            $counter.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
        }
    };
}

/// Macro for adding to a counter (only when profiling feature is enabled)
#[macro_export]
macro_rules! count_add {
    ($counter:expr, $value:expr) => {
        #[cfg(feature = "profiling")]
        {
            $counter.fetch_add($value, std::sync::atomic::Ordering::Relaxed);
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_snapshot_and_reset() {
        let counters = FunctionCounters::new();
        counters.quads_emitted.fetch_add(3, Ordering::Relaxed);
        counters.slices_meshed.fetch_add(1, Ordering::Relaxed);
        counters.slices_skipped.fetch_add(4, Ordering::Relaxed);

        let snapshot = counters.snapshot();
        assert_eq!(snapshot.quads_emitted, 3);
        assert_eq!(snapshot.slices_meshed, 1);
        assert_eq!(snapshot.slices_skipped, 4);

        counters.reset();
        let cleared = counters.snapshot();
        assert_eq!(cleared.quads_emitted, 0);
        assert_eq!(cleared.slices_skipped, 0);
    }
}
