//! Convergence of the empirical batch against the analytic report
//!
//! Tolerances are sized for the built-in game at one million spins: the
//! per-spin payout deviation gives the empirical RTP a standard error of
//! about 0.35 percentage points, and the known scatter-pricing gap
//! between the analytic and live paths is close to 0.11 points, so the
//! 2.0-point band sits at roughly 5σ. The hit-frequency band likewise
//! dwarfs its ~0.03-point standard error plus the documented
//! independence-approximation bias.

use sm_engine::{GameDefinition, analyze};
use sm_sim::{SimConfig, run};

#[test]
fn million_spins_track_the_analytic_report() {
    let definition = GameDefinition::default();
    let set = definition.build_symbols().unwrap();
    let analytic = analyze(&set);

    let config = SimConfig {
        spins: 1_000_000,
        bet: 10,
        seed: 0xC0FFEE,
        workers: 8,
        ..SimConfig::default()
    };
    let report = run(&definition, &config).unwrap();
    let delta = report.compare(&analytic);

    assert!(
        delta.rtp_delta.abs() < 2.0,
        "empirical rtp {:.3}% vs analytic {:.3}%",
        report.empirical_rtp(),
        analytic.rtp
    );
    assert!(
        delta.hit_frequency_delta.abs() < 0.5,
        "empirical hit {:.3}% vs analytic {:.3}%",
        report.empirical_hit_frequency(),
        analytic.hit_frequency
    );

    // Free spins trigger about once in 1,600 spins for the built-in game.
    assert!(
        report.free_spin_triggers > 300 && report.free_spin_triggers < 1_200,
        "free spin triggers {}",
        report.free_spin_triggers
    );
}
