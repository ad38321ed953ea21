//! Pure reconstruction engine: no I/O, deterministic over its inputs.

pub mod normalize;
pub mod position_tracker;
pub mod reconstruct;

pub use normalize::{normalize, normalize_events, FillEvent, LedgerDelta, LedgerUpdate, RawEvent};
pub use position_tracker::{PositionState, PositionTracker};
pub use reconstruct::reconstruct_trades;
