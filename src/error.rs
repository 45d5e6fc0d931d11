//! Error types for u-exam-schedule.
//!
//! Scheduling itself never fails (an incomplete placement is a normal
//! result); errors only arise when building a configuration.

use thiserror::Error;

/// Result type alias for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Invalid scheduler configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The slot table is empty.
    #[error("slot table is empty")]
    NoSlots,

    /// Slot start times are not strictly ascending.
    #[error("slot {index} starts at minute {start}, not after the previous slot")]
    UnorderedSlots {
        /// Offending slot index.
        index: usize,
        /// Its start minute.
        start: u32,
    },

    /// Slots have zero length.
    #[error("slot length must be positive")]
    ZeroSlotLength,

    /// A gen-ed block names a slot outside the slot table.
    #[error("gen-ed category {category} references slot {slot}, but only {slots} slots exist")]
    BlockOutOfRange {
        /// Category name.
        category: String,
        /// Referenced slot index.
        slot: usize,
        /// Number of configured slots.
        slots: usize,
    },

    /// Two gen-ed categories share a name.
    #[error("duplicate gen-ed category: {0}")]
    DuplicateCategory(String),

    /// JSON parsing error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
