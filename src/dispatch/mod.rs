//! Per-message signal dispatch

mod coordinator;

pub use coordinator::{acknowledgments, DispatchCoordinator, LineOutcome, LineStatus, TradeResult};
