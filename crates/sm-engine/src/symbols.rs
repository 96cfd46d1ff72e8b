//! Symbol catalogue, reel weights, and the weighted draw

use std::collections::BTreeMap;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Number of reels in a spin
pub const REEL_COUNT: usize = 5;

/// Virtual stops per reel — the granularity used to express per-symbol
/// probability as an integer weight
pub const REEL_STOPS: u32 = 64;

/// Match counts that can pay (fewer than 3 never pays)
pub const PAYING_MATCHES: [u8; 3] = [3, 4, 5];

/// A symbol definition
///
/// Immutable once the catalogue is built. `reel_weights[i]` is the number
/// of virtual stops this symbol occupies on reel `i`; draw probability is
/// the weight divided by that reel's stop total.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Symbol {
    /// Display icon, unique per symbol (e.g. "💎")
    pub icon: String,
    /// One weight per reel, each in `0..=REEL_STOPS`
    pub reel_weights: Vec<u32>,
    /// Payout multiplier per consecutive-match count (keys 3, 4, 5)
    pub payouts: BTreeMap<u8, f64>,
    /// Scatter symbols are counted anywhere on the board and can trigger
    /// free spins; they still pay only through the leftmost-run rule
    #[serde(default)]
    pub scatter: bool,
}

impl Symbol {
    /// Create a regular paying symbol
    pub fn paying(icon: impl Into<String>, weights: [u32; REEL_COUNT], pays: [f64; 3]) -> Self {
        Self {
            icon: icon.into(),
            reel_weights: weights.to_vec(),
            payouts: BTreeMap::from([(3, pays[0]), (4, pays[1]), (5, pays[2])]),
            scatter: false,
        }
    }

    /// Create a scatter symbol
    pub fn scatter(icon: impl Into<String>, weights: [u32; REEL_COUNT], pays: [f64; 3]) -> Self {
        Self {
            scatter: true,
            ..Self::paying(icon, weights, pays)
        }
    }

    /// Payout multiplier for a match count (0 below 3 or for a missing entry)
    pub fn payout_for(&self, matches: u8) -> f64 {
        if matches < 3 {
            return 0.0;
        }
        self.payouts.get(&matches).copied().unwrap_or(0.0)
    }

    /// Highest payout in the table (the 5-of-a-kind value on a valid symbol)
    pub fn max_payout(&self) -> f64 {
        self.payouts.values().copied().fold(0.0, f64::max)
    }

    /// Average per-reel appearance probability given the reel stop totals
    pub fn avg_reel_probability(&self, reel_totals: &[u32; REEL_COUNT]) -> f64 {
        let weight_sum: u32 = self.reel_weights.iter().sum();
        let total_sum: u32 = reel_totals.iter().sum();
        weight_sum as f64 / total_sum as f64
    }
}

/// Validated symbol catalogue
///
/// Construction checks every invariant the spin and analysis paths rely
/// on, so a malformed table fails at startup rather than mid-spin.
#[derive(Debug, Clone)]
pub struct SymbolSet {
    symbols: Vec<Symbol>,
    reel_totals: [u32; REEL_COUNT],
    scatter: Option<usize>,
    /// Symbol indices sorted by descending 5-of-a-kind payout, ties broken
    /// toward the rarer symbol
    rank: Vec<usize>,
}

impl SymbolSet {
    /// Build and validate a catalogue
    pub fn new(symbols: Vec<Symbol>) -> EngineResult<Self> {
        if symbols.is_empty() {
            return Err(EngineError::EmptyCatalogue);
        }

        let mut scatter = None;
        for (idx, symbol) in symbols.iter().enumerate() {
            if symbols[..idx].iter().any(|s| s.icon == symbol.icon) {
                return Err(EngineError::DuplicateIcon {
                    icon: symbol.icon.clone(),
                });
            }
            if symbol.reel_weights.len() != REEL_COUNT {
                return Err(EngineError::WeightVectorLength {
                    icon: symbol.icon.clone(),
                    got: symbol.reel_weights.len(),
                    expected: REEL_COUNT,
                });
            }
            for (reel, &weight) in symbol.reel_weights.iter().enumerate() {
                if weight > REEL_STOPS {
                    return Err(EngineError::WeightAboveStops {
                        icon: symbol.icon.clone(),
                        reel,
                        weight,
                        max: REEL_STOPS,
                    });
                }
            }
            Self::validate_payouts(symbol)?;
            if symbol.scatter {
                if let Some(first) = scatter {
                    let first: &Symbol = &symbols[first];
                    return Err(EngineError::MultipleScatters {
                        first: first.icon.clone(),
                        second: symbol.icon.clone(),
                    });
                }
                scatter = Some(idx);
            }
        }

        let mut reel_totals = [0u32; REEL_COUNT];
        for (reel, total) in reel_totals.iter_mut().enumerate() {
            *total = symbols.iter().map(|s| s.reel_weights[reel]).sum();
            if *total == 0 {
                return Err(EngineError::EmptyReel { reel });
            }
            if *total != REEL_STOPS {
                log::debug!(
                    "reel {} stops sum to {} (granularity is {})",
                    reel,
                    total,
                    REEL_STOPS
                );
            }
        }

        let mut rank: Vec<usize> = (0..symbols.len()).collect();
        rank.sort_by(|&a, &b| {
            let by_pay = symbols[b]
                .max_payout()
                .partial_cmp(&symbols[a].max_payout())
                .unwrap_or(std::cmp::Ordering::Equal);
            by_pay.then_with(|| {
                symbols[a]
                    .avg_reel_probability(&reel_totals)
                    .partial_cmp(&symbols[b].avg_reel_probability(&reel_totals))
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
        });

        Ok(Self {
            symbols,
            reel_totals,
            scatter,
            rank,
        })
    }

    fn validate_payouts(symbol: &Symbol) -> EngineResult<()> {
        let mut prev: Option<(u8, f64)> = None;
        for count in PAYING_MATCHES {
            let pay = *symbol
                .payouts
                .get(&count)
                .ok_or_else(|| EngineError::MissingPayout {
                    icon: symbol.icon.clone(),
                    count,
                })?;
            if pay < 0.0 {
                return Err(EngineError::NegativePayout {
                    icon: symbol.icon.clone(),
                    count,
                });
            }
            if let Some((prev_count, prev_pay)) = prev {
                if pay < prev_pay {
                    return Err(EngineError::NonMonotonicPayout {
                        icon: symbol.icon.clone(),
                        count,
                        prev_count,
                    });
                }
            }
            prev = Some((count, pay));
        }
        Ok(())
    }

    /// All symbols in catalogue order
    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    /// Symbol count
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Check if empty (never true after construction)
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Symbol by catalogue index
    pub fn get(&self, index: usize) -> &Symbol {
        &self.symbols[index]
    }

    /// Catalogue index of an icon
    pub fn index_of(&self, icon: &str) -> Option<usize> {
        self.symbols.iter().position(|s| s.icon == icon)
    }

    /// Index of the scatter symbol, if the catalogue has one
    pub fn scatter_index(&self) -> Option<usize> {
        self.scatter
    }

    /// Total virtual stops on a reel
    pub fn reel_total(&self, reel: usize) -> u32 {
        self.reel_totals[reel]
    }

    /// Per-reel stop totals
    pub fn reel_totals(&self) -> &[u32; REEL_COUNT] {
        &self.reel_totals
    }

    /// Draw probability of a symbol on a reel
    pub fn reel_probability(&self, index: usize, reel: usize) -> f64 {
        self.symbols[index].reel_weights[reel] as f64 / self.reel_totals[reel] as f64
    }

    /// Payout-rank position of a symbol (0 = highest 5-of-a-kind payout)
    pub fn rank_of(&self, index: usize) -> usize {
        self.rank.iter().position(|&i| i == index).unwrap_or(usize::MAX)
    }

    /// Symbol indices ordered by descending 5-of-a-kind payout
    pub fn ranked(&self) -> &[usize] {
        &self.rank
    }

    /// Weighted draw of one symbol on a reel
    ///
    /// Proportional to `reel_weights[reel]` by construction: a uniform
    /// ticket over the reel's stop total is walked through the cumulative
    /// weights. Zero-weight symbols can never be drawn.
    pub fn draw_reel<R: Rng>(&self, reel: usize, rng: &mut R) -> usize {
        let mut ticket = rng.random_range(0..self.reel_totals[reel]);
        for (idx, symbol) in self.symbols.iter().enumerate() {
            let weight = symbol.reel_weights[reel];
            if ticket < weight {
                return idx;
            }
            ticket -= weight;
        }
        // Unreachable: reel totals cover every ticket value.
        self.symbols.len() - 1
    }

    /// Draw a full board, one symbol index per reel
    pub fn draw_board<R: Rng>(&self, rng: &mut R) -> [usize; REEL_COUNT] {
        let mut board = [0usize; REEL_COUNT];
        for (reel, slot) in board.iter_mut().enumerate() {
            *slot = self.draw_reel(reel, rng);
        }
        board
    }

    /// The built-in game: six paying symbols plus one scatter, every reel
    /// partitioned into exactly [`REEL_STOPS`] stops
    pub fn default_catalogue() -> Self {
        let symbols = vec![
            Symbol::paying("🍒", [24, 24, 24, 22, 22], [4.0, 9.0, 27.0]),
            Symbol::paying("🍋", [16, 16, 16, 16, 16], [6.0, 15.0, 55.0]),
            Symbol::paying("🍀", [10, 10, 10, 10, 10], [9.0, 25.0, 100.0]),
            Symbol::paying("🔔", [6, 6, 6, 7, 7], [13.0, 35.0, 140.0]),
            Symbol::paying("7️⃣", [3, 3, 3, 4, 4], [17.0, 45.0, 170.0]),
            Symbol::paying("💎", [2, 2, 2, 3, 3], [20.0, 50.0, 200.0]),
            Symbol::scatter("⭐", [3, 3, 3, 2, 2], [2.0, 10.0, 50.0]),
        ];
        Self::new(symbols).expect("built-in catalogue is valid")
    }
}
