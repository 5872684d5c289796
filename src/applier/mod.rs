pub mod core;


// Re-export the primary types so callers can use `crate::applier::*` directly.
pub use self::core::{Applier, ApplyMode, ApplyOptions, ApplySummary};
