/// Instrumentation for optimization analysis
/// Counters are compiled out unless the `profiling` feature is enabled
pub mod profiling;

pub use profiling::{CounterSnapshot, FunctionCounters, FUNCTION_COUNTERS};
