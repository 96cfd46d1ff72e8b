//! # sm-engine — Probability-weighted slot payout engine
//!
//! The math core of the SpinMath casino: weighted per-reel symbol draws,
//! leftmost-run win evaluation with scatter/free-spin handling, and a
//! closed-form return-to-player analyzer derived from the same weight
//! tables the draw uses.
//!
//! ## Architecture
//!
//! ```text
//! SlotEngine
//!     │
//!     ├── SymbolSet (validated catalogue, per-reel weighted draw)
//!     ├── EngineConfig (scatter trigger, free-spin rule, RTP target)
//!     └── RtpReport (computed once at construction, cached)
//!           │
//!           v
//!     spin(bet, multiplier) → SpinResult
//! ```
//!
//! The engine is an explicitly constructed value with no ambient state;
//! callers own it and may hold one per worker. All evaluation is pure over
//! the immutable catalogue, so tests and the batch simulator drive the
//! same code paths with their own RNGs.

pub mod config;
pub mod engine;
pub mod error;
pub mod rtp;
pub mod spin;
pub mod symbols;

pub use config::{EngineConfig, GameDefinition};
pub use engine::{SessionStats, SlotEngine};
pub use error::{EngineError, EngineResult};
pub use rtp::{RtpReport, SymbolContribution, analyze};
pub use spin::{SpinDetails, SpinResult, WinTier, evaluate_board};
pub use symbols::{REEL_COUNT, REEL_STOPS, Symbol, SymbolSet};
