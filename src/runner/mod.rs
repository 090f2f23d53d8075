pub mod classifier;
pub mod invoker;
pub mod reporter;
pub mod scheduler;
pub mod types;

// Re-export commonly used types
pub use classifier::classify;
pub use invoker::Invoker;
pub use reporter::Reporter;
pub use scheduler::Scheduler;
pub use types::{ExecutionResult, SuiteSummary, TestVerdict, Verdict};
