//! Closed-form payout analysis
//!
//! Everything here is derived analytically from the weight tables — no
//! simulation. The same `weight / reel-total` ratios drive the live draw,
//! so the analyzer and the spin path can never disagree about a symbol's
//! appearance probability.
//!
//! Two documented simplifications are preserved from the original design
//! rather than corrected, because correcting them would change the
//! numbers operators display:
//!
//! - **Hit frequency** multiplies per-symbol no-win complements as if the
//!   qualifying-run events were independent, although only one symbol can
//!   occupy reel 0 on a given spin. The reported figure slightly
//!   undershoots the exact sum of run probabilities.
//! - **Scatter pricing** uses the binomial anywhere-count formula, while
//!   the live payout path pays scatter only through a leftmost run. The
//!   batch simulator quantifies the resulting gap.

use serde::{Deserialize, Serialize};

use crate::symbols::{PAYING_MATCHES, REEL_COUNT, Symbol, SymbolSet};

/// Per-symbol slice of the analytic report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymbolContribution {
    /// Symbol icon
    pub icon: String,
    /// Expected return from this symbol, in percent of the bet
    pub rtp_contribution: f64,
    /// Average per-reel appearance probability
    pub avg_reel_probability: f64,
    /// Scatter symbols are priced by anywhere-count instead of run length
    pub scatter: bool,
}

/// Theoretical payout statistics for a symbol catalogue
///
/// Computed once per engine and cached; reads only the immutable
/// catalogue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RtpReport {
    /// Expected return per unit bet, percent
    pub rtp: f64,
    /// `100 - rtp`
    pub house_edge: f64,
    /// Percent of spins with a qualifying non-scatter run
    pub hit_frequency: f64,
    /// One entry per symbol, catalogue order
    pub contributions: Vec<SymbolContribution>,
}

/// Probability of exactly `n` consecutive matches of a symbol starting at
/// reel 0
///
/// Product of the first `n` reel probabilities, times the complement of
/// the probability on reel `n` when one exists (a 5-run has no reel to
/// fail on).
pub fn exact_run_probability(set: &SymbolSet, symbol: usize, n: u8) -> f64 {
    let n = n as usize;
    let mut probability = 1.0;
    for reel in 0..n {
        probability *= set.reel_probability(symbol, reel);
    }
    if n < REEL_COUNT {
        probability *= 1.0 - set.reel_probability(symbol, n);
    }
    probability
}

/// Probability that a symbol's leftmost run reaches at least 3
pub fn qualifying_run_probability(set: &SymbolSet, symbol: usize) -> f64 {
    (0..3).map(|reel| set.reel_probability(symbol, reel)).product()
}

/// Probability of exactly `k` scatter icons anywhere on the board
///
/// Binomial across the reels with the scatter's average per-reel
/// probability.
pub fn scatter_exact_probability(set: &SymbolSet, symbol: usize, k: u8) -> f64 {
    let avg_p = set.get(symbol).avg_reel_probability(set.reel_totals());
    let k = k as usize;
    choose(REEL_COUNT, k) * avg_p.powi(k as i32) * (1.0 - avg_p).powi((REEL_COUNT - k) as i32)
}

fn choose(n: usize, k: usize) -> f64 {
    let mut result = 1.0;
    for i in 0..k {
        result = result * (n - i) as f64 / (i + 1) as f64;
    }
    result
}

fn symbol_ev(set: &SymbolSet, index: usize, symbol: &Symbol) -> f64 {
    PAYING_MATCHES
        .iter()
        .map(|&count| {
            let probability = if symbol.scatter {
                scatter_exact_probability(set, index, count)
            } else {
                exact_run_probability(set, index, count)
            };
            probability * symbol.payout_for(count)
        })
        .sum()
}

/// Analyze a catalogue
pub fn analyze(set: &SymbolSet) -> RtpReport {
    let contributions: Vec<SymbolContribution> = set
        .symbols()
        .iter()
        .enumerate()
        .map(|(index, symbol)| SymbolContribution {
            icon: symbol.icon.clone(),
            rtp_contribution: symbol_ev(set, index, symbol) * 100.0,
            avg_reel_probability: symbol.avg_reel_probability(set.reel_totals()),
            scatter: symbol.scatter,
        })
        .collect();

    let rtp: f64 = contributions.iter().map(|c| c.rtp_contribution).sum();

    let no_hit: f64 = set
        .symbols()
        .iter()
        .enumerate()
        .filter(|(_, symbol)| !symbol.scatter)
        .map(|(index, _)| 1.0 - qualifying_run_probability(set, index))
        .product();
    let hit_frequency = 100.0 * (1.0 - no_hit);

    RtpReport {
        rtp,
        house_edge: 100.0 - rtp,
        hit_frequency,
        contributions,
    }
}

impl RtpReport {
    /// Render the paytable for display, symbols sorted by descending
    /// 5-of-a-kind payout
    pub fn render_paytable(&self, set: &SymbolSet) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "RTP {:.2}%  |  house edge {:.2}%  |  hit frequency {:.2}%\n\n",
            self.rtp, self.house_edge, self.hit_frequency
        ));
        out.push_str("symbol      x3        x4        x5    avg p/reel   rtp share\n");
        for &index in set.ranked() {
            let symbol = set.get(index);
            let contribution = &self.contributions[index];
            out.push_str(&format!(
                "{:<4}  {:>8.1}  {:>8.1}  {:>8.1}    {:>8.4}    {:>6.2}%{}\n",
                symbol.icon,
                symbol.payout_for(3),
                symbol.payout_for(4),
                symbol.payout_for(5),
                contribution.avg_reel_probability,
                contribution.rtp_contribution,
                if symbol.scatter { "  (scatter)" } else { "" },
            ));
        }
        out
    }
}
