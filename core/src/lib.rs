//! The lanprobe discovery engine.
//!
//! * [`session`]: aggregation and the scan deadline.
//! * [`scanner`]: the per-protocol scanners and the [`scanner::Scanner`] trait.
//! * [`network`]: socket setup and the listener loop.
//! * [`sink`]: the bounded fan-in every listener publishes into.

pub mod network;
pub mod scanner;
pub mod session;
pub mod sink;

pub use session::ScanSession;
