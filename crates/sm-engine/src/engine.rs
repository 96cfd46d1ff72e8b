//! Slot engine — owns the catalogue, the RNG, and session tracking

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::config::{EngineConfig, GameDefinition};
use crate::error::{EngineError, EngineResult};
use crate::rtp::{self, RtpReport};
use crate::spin::{SpinResult, evaluate_board};
use crate::symbols::SymbolSet;

/// The slot payout engine
///
/// An explicitly constructed value: whoever needs spins owns an engine (or
/// one per worker) and passes it by reference. Construction validates the
/// catalogue and computes the analytic report once; after that every call
/// is bounded, synchronous arithmetic over immutable tables plus five
/// weighted draws.
pub struct SlotEngine {
    config: EngineConfig,
    set: SymbolSet,
    rng: StdRng,
    report: RtpReport,
    stats: SessionStats,
}

/// Session statistics accumulated across spins
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionStats {
    pub total_spins: u64,
    pub total_bet: u64,
    pub total_win: u64,
    pub wins: u64,
    pub free_spin_triggers: u64,
    pub max_win_ratio: f64,
}

impl SessionStats {
    /// Empirical RTP so far, percent
    pub fn rtp(&self) -> f64 {
        if self.total_bet > 0 {
            self.total_win as f64 / self.total_bet as f64 * 100.0
        } else {
            0.0
        }
    }

    /// Empirical hit rate so far, percent
    pub fn hit_rate(&self) -> f64 {
        if self.total_spins > 0 {
            self.wins as f64 / self.total_spins as f64 * 100.0
        } else {
            0.0
        }
    }

    fn record(&mut self, bet: u64, result: &SpinResult) {
        self.total_spins += 1;
        self.total_bet += bet;
        self.total_win += result.payout;
        if result.is_win() {
            self.wins += 1;
        }
        if result.details.free_spins_triggered {
            self.free_spin_triggers += 1;
        }
        self.max_win_ratio = self.max_win_ratio.max(result.win_ratio(bet));
    }
}

impl SlotEngine {
    /// Build an engine from a definition, seeding the RNG from the OS
    pub fn new(definition: GameDefinition) -> EngineResult<Self> {
        Self::build(definition, StdRng::from_os_rng())
    }

    /// Build an engine with a fixed RNG seed for reproducible sessions
    pub fn with_seed(definition: GameDefinition, seed: u64) -> EngineResult<Self> {
        Self::build(definition, StdRng::seed_from_u64(seed))
    }

    /// The built-in game
    pub fn classic() -> Self {
        Self::new(GameDefinition::default()).expect("built-in definition is valid")
    }

    fn build(definition: GameDefinition, rng: StdRng) -> EngineResult<Self> {
        let set = SymbolSet::new(definition.symbols)?;
        let report = rtp::analyze(&set);
        log::debug!(
            "engine '{}' ready: {} symbols, analytic rtp {:.2}% (target {:.2}%)",
            definition.config.name,
            set.len(),
            report.rtp,
            definition.config.target_rtp
        );
        Ok(Self {
            config: definition.config,
            set,
            rng,
            report,
            stats: SessionStats::default(),
        })
    }

    /// Re-seed the RNG
    pub fn seed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    /// Run one spin
    ///
    /// `bonus_multiplier` is the caller-computed equipment/item bonus, 1.0
    /// meaning none; it is opaque to the engine. Rejects invalid inputs
    /// instead of clamping — a clamped bet would corrupt the caller's
    /// ledger.
    pub fn spin(&mut self, bet: u64, bonus_multiplier: f64) -> EngineResult<SpinResult> {
        if bet == 0 {
            return Err(EngineError::InvalidBet(bet));
        }
        if !bonus_multiplier.is_finite() || bonus_multiplier < 0.0 {
            return Err(EngineError::InvalidMultiplier(bonus_multiplier));
        }

        let board = self.set.draw_board(&mut self.rng);
        let result = evaluate_board(&self.set, &self.config, &board, bet, bonus_multiplier);
        self.stats.record(bet, &result);
        log::debug!(
            "spin #{}: {:?} bet {} payout {} (run {})",
            self.stats.total_spins,
            result.reels,
            bet,
            result.payout,
            result.details.matches
        );
        Ok(result)
    }

    /// Engine configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The validated catalogue
    pub fn symbols(&self) -> &SymbolSet {
        &self.set
    }

    /// The cached analytic report
    pub fn report(&self) -> &RtpReport {
        &self.report
    }

    /// Render the paytable for display, headed by the game name
    pub fn render_paytable(&self) -> String {
        format!("{}\n{}", self.config.name, self.report.render_paytable(&self.set))
    }

    /// Session stats
    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    /// Reset session stats
    pub fn reset_stats(&mut self) {
        self.stats = SessionStats::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_engines_agree() {
        let mut a = SlotEngine::with_seed(GameDefinition::default(), 1234).unwrap();
        let mut b = SlotEngine::with_seed(GameDefinition::default(), 1234).unwrap();
        for _ in 0..50 {
            let ra = a.spin(10, 1.0).unwrap();
            let rb = b.spin(10, 1.0).unwrap();
            assert_eq!(ra.reels, rb.reels);
            assert_eq!(ra.payout, rb.payout);
        }
    }

    #[test]
    fn test_reseed_replays_sequence() {
        let mut engine = SlotEngine::with_seed(GameDefinition::default(), 7).unwrap();
        let first: Vec<_> = (0..10).map(|_| engine.spin(5, 1.0).unwrap().reels).collect();
        engine.seed(7);
        let second: Vec<_> = (0..10).map(|_| engine.spin(5, 1.0).unwrap().reels).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_rejects_zero_bet() {
        let mut engine = SlotEngine::with_seed(GameDefinition::default(), 1).unwrap();
        assert!(matches!(
            engine.spin(0, 1.0).unwrap_err(),
            EngineError::InvalidBet(0)
        ));
    }

    #[test]
    fn test_rejects_bad_multiplier() {
        let mut engine = SlotEngine::with_seed(GameDefinition::default(), 1).unwrap();
        assert!(matches!(
            engine.spin(10, -0.5).unwrap_err(),
            EngineError::InvalidMultiplier(_)
        ));
        assert!(matches!(
            engine.spin(10, f64::NAN).unwrap_err(),
            EngineError::InvalidMultiplier(_)
        ));
        // Nothing recorded for rejected calls.
        assert_eq!(engine.stats().total_spins, 0);
    }

    #[test]
    fn test_stats_accumulate_and_reset() {
        let mut engine = SlotEngine::with_seed(GameDefinition::default(), 42).unwrap();
        for _ in 0..200 {
            engine.spin(10, 1.0).unwrap();
        }
        let stats = engine.stats();
        assert_eq!(stats.total_spins, 200);
        assert_eq!(stats.total_bet, 2_000);
        assert!(stats.hit_rate() >= 0.0 && stats.hit_rate() <= 100.0);

        engine.reset_stats();
        assert_eq!(engine.stats().total_spins, 0);
        assert_eq!(engine.stats().rtp(), 0.0);
    }

    #[test]
    fn test_report_is_cached_at_construction() {
        let engine = SlotEngine::classic();
        let report = engine.report();
        assert!(report.rtp > 0.0);
        assert_eq!(report.contributions.len(), engine.symbols().len());
        assert!(engine.render_paytable().contains(&engine.config().name));
    }

    #[test]
    fn test_spin_returns_one_icon_per_reel() {
        let mut engine = SlotEngine::with_seed(GameDefinition::default(), 9).unwrap();
        let result = engine.spin(25, 1.0).unwrap();
        assert_eq!(result.reels.len(), crate::symbols::REEL_COUNT);
    }
}
