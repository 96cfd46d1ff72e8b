//! # sm-sim — batch spin simulator
//!
//! Monte-Carlo validation for the analytic payout report: spins are
//! sharded across rayon workers, each worker runs a deterministic ChaCha8
//! stream derived from the base seed, and the shard tallies are merged by
//! reduction. Same seed and worker count ⇒ identical report.
//!
//! The simulator exists to make the engine's documented simplifications
//! measurable: the analytic report prices scatter pay by anywhere-count
//! while the live path pays scatter only through a leftmost run, and the
//! hit-frequency figure uses a per-symbol independence approximation.
//! [`SimReport::compare`] puts numbers on both gaps.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use sm_engine::{EngineError, GameDefinition, RtpReport, evaluate_board};

/// Simulator error type
#[derive(Error, Debug)]
pub enum SimError {
    #[error("simulation needs a positive spin count")]
    NoSpins,

    #[error("simulation needs a positive bet")]
    NoBet,

    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// Batch configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimConfig {
    /// Total spins across all workers
    pub spins: u64,
    /// Bet per spin
    pub bet: u64,
    /// Caller bonus multiplier applied to every spin
    pub bonus_multiplier: f64,
    /// Base RNG seed; each worker derives its own stream from it
    pub seed: u64,
    /// Worker count (0 = one per CPU)
    pub workers: usize,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            spins: 1_000_000,
            bet: 10,
            bonus_multiplier: 1.0,
            seed: 0x5EED,
            workers: 0,
        }
    }
}

impl SimConfig {
    fn effective_workers(&self) -> usize {
        if self.workers > 0 {
            self.workers
        } else {
            num_cpus::get().max(1)
        }
    }
}

/// Merged tallies of a simulation batch
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimReport {
    pub spins: u64,
    pub total_bet: u64,
    pub total_win: u64,
    /// Spins with a qualifying run of a non-scatter symbol — the same
    /// convention the analytic hit frequency uses
    pub hits: u64,
    /// Spins with any payout at all
    pub wins: u64,
    /// Spins that triggered free spins
    pub free_spin_triggers: u64,
    /// Win counts indexed by `WinTier::index()`
    pub tier_counts: [u64; 5],
    /// Largest single-spin win-to-bet ratio seen
    pub max_win_ratio: f64,
}

impl SimReport {
    /// Empirical RTP, percent
    pub fn empirical_rtp(&self) -> f64 {
        if self.total_bet > 0 {
            self.total_win as f64 / self.total_bet as f64 * 100.0
        } else {
            0.0
        }
    }

    /// Empirical hit frequency, percent
    pub fn empirical_hit_frequency(&self) -> f64 {
        if self.spins > 0 {
            self.hits as f64 / self.spins as f64 * 100.0
        } else {
            0.0
        }
    }

    /// Empirical−analytic deltas
    pub fn compare(&self, analytic: &RtpReport) -> SimDelta {
        SimDelta {
            rtp_delta: self.empirical_rtp() - analytic.rtp,
            hit_frequency_delta: self.empirical_hit_frequency() - analytic.hit_frequency,
        }
    }

    fn merge(mut self, other: Self) -> Self {
        self.spins += other.spins;
        self.total_bet += other.total_bet;
        self.total_win += other.total_win;
        self.hits += other.hits;
        self.wins += other.wins;
        self.free_spin_triggers += other.free_spin_triggers;
        for (mine, theirs) in self.tier_counts.iter_mut().zip(other.tier_counts) {
            *mine += theirs;
        }
        self.max_win_ratio = self.max_win_ratio.max(other.max_win_ratio);
        self
    }
}

/// Empirical−analytic comparison, in percentage points
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SimDelta {
    pub rtp_delta: f64,
    pub hit_frequency_delta: f64,
}

/// Run a simulation batch
pub fn run(definition: &GameDefinition, config: &SimConfig) -> Result<SimReport, SimError> {
    if config.spins == 0 {
        return Err(SimError::NoSpins);
    }
    if config.bet == 0 {
        return Err(SimError::NoBet);
    }
    let set = definition.build_symbols()?;
    let engine_config = definition.config.clone();

    let workers = config.effective_workers();
    let base = config.spins / workers as u64;
    let remainder = config.spins % workers as u64;
    let shards: Vec<(usize, u64)> = (0..workers)
        .map(|worker| {
            let extra = if (worker as u64) < remainder { 1 } else { 0 };
            (worker, base + extra)
        })
        .filter(|&(_, spins)| spins > 0)
        .collect();

    log::info!(
        "simulating {} spins of '{}' across {} workers (seed {:#x})",
        config.spins,
        engine_config.name,
        shards.len(),
        config.seed
    );

    let report = shards
        .into_par_iter()
        .map(|(worker, spins)| {
            // Widely spaced per-worker streams from the base seed.
            let stream_seed = config
                .seed
                .wrapping_add((worker as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15));
            let mut rng = ChaCha8Rng::seed_from_u64(stream_seed);
            let mut tally = SimReport::default();

            for _ in 0..spins {
                let board = set.draw_board(&mut rng);
                let result =
                    evaluate_board(&set, &engine_config, &board, config.bet, config.bonus_multiplier);

                tally.spins += 1;
                tally.total_bet += config.bet;
                tally.total_win += result.payout;
                if result.details.matches >= 3 && !set.get(board[0]).scatter {
                    tally.hits += 1;
                }
                if result.payout > 0 {
                    tally.wins += 1;
                }
                if result.details.free_spins_triggered {
                    tally.free_spin_triggers += 1;
                }
                if let Some(tier) = result.details.tier {
                    tally.tier_counts[tier.index() as usize] += 1;
                }
                tally.max_win_ratio = tally.max_win_ratio.max(result.win_ratio(config.bet));
            }

            log::debug!("worker {worker}: {spins} spins, rtp {:.2}%", tally.empirical_rtp());
            tally
        })
        .reduce(SimReport::default, SimReport::merge);

    Ok(report)
}
