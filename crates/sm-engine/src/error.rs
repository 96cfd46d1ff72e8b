//! Error types for the payout engine

use thiserror::Error;

/// Engine error type
///
/// Configuration variants are raised by [`crate::symbols::SymbolSet`]
/// construction and [`crate::config::GameDefinition`] loading, so a
/// malformed table can never reach the spin path. The two input variants
/// are the only errors `spin` itself can return.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("symbol {icon}: weight vector has {got} entries, expected {expected}")]
    WeightVectorLength {
        icon: String,
        got: usize,
        expected: usize,
    },

    #[error("symbol {icon}: weight {weight} on reel {reel} exceeds {max} virtual stops")]
    WeightAboveStops {
        icon: String,
        reel: usize,
        weight: u32,
        max: u32,
    },

    #[error("symbol {icon}: payout table missing entry for {count} of a kind")]
    MissingPayout { icon: String, count: u8 },

    #[error("symbol {icon}: payout for {count} of a kind decreases below the {prev_count}-match payout")]
    NonMonotonicPayout {
        icon: String,
        count: u8,
        prev_count: u8,
    },

    #[error("symbol {icon}: negative payout for {count} of a kind")]
    NegativePayout { icon: String, count: u8 },

    #[error("reel {reel} has no symbol with a non-zero weight")]
    EmptyReel { reel: usize },

    #[error("duplicate symbol icon {icon}")]
    DuplicateIcon { icon: String },

    #[error("catalogue declares more than one scatter symbol ({first} and {second})")]
    MultipleScatters { first: String, second: String },

    #[error("empty symbol catalogue")]
    EmptyCatalogue,

    #[error("bet must be positive, got {0}")]
    InvalidBet(u64),

    #[error("bonus multiplier must be finite and non-negative, got {0}")]
    InvalidMultiplier(f64),

    #[error("failed to parse game definition: {0}")]
    Parse(String),
}

/// Result type alias
pub type EngineResult<T> = Result<T, EngineError>;
