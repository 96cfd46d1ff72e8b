//! Spin results and the pure board evaluation

use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::symbols::{REEL_COUNT, SymbolSet};

/// Win tier label derived from run length and symbol payout rank
///
/// Ordering contract: 5-of-a-kind beats 4 beats 3, and among 5-of-a-kind
/// the top two payout ranks get their own labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WinTier {
    MegaJackpot,
    Jackpot,
    BigWin,
    GoodWin,
    Win,
}

impl WinTier {
    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::MegaJackpot => "MEGA JACKPOT",
            Self::Jackpot => "JACKPOT",
            Self::BigWin => "Big Win",
            Self::GoodWin => "Good Win",
            Self::Win => "Win",
        }
    }

    /// Tier index (0 = highest)
    pub fn index(&self) -> u8 {
        match self {
            Self::MegaJackpot => 0,
            Self::Jackpot => 1,
            Self::BigWin => 2,
            Self::GoodWin => 3,
            Self::Win => 4,
        }
    }
}

/// Structured outcome record for one spin
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpinDetails {
    /// Did the leftmost run pay?
    pub win: bool,
    /// Win tier (None on a losing spin)
    pub tier: Option<WinTier>,
    /// Leftmost-run length, reported even when below 3
    pub matches: u8,
    /// Winning symbol icon (None on a losing spin)
    pub symbol: Option<String>,
    /// Scatter icons anywhere on the board
    pub scatter_count: u8,
    /// Free spins triggered by the scatter count
    pub free_spins_triggered: bool,
    /// Free spins awarded (scatter count × configured rate)
    pub free_spins_count: u32,
    /// Was a bonus multiplier above 1.0 applied?
    pub bonus_applied: bool,
    /// Payout added by the bonus multiplier
    pub bonus_amount: u64,
}

/// Complete result of one spin
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpinResult {
    /// Realized draw, one icon per reel
    pub reels: Vec<String>,
    /// Coins awarded after the bonus multiplier
    pub payout: u64,
    /// Structured outcome record
    pub details: SpinDetails,
}

impl SpinResult {
    /// Check if this is a winning spin
    pub fn is_win(&self) -> bool {
        self.details.win
    }

    /// Win-to-bet ratio
    pub fn win_ratio(&self, bet: u64) -> f64 {
        if bet > 0 {
            self.payout as f64 / bet as f64
        } else {
            0.0
        }
    }
}

/// Evaluate a drawn board
///
/// Pure over the catalogue: tests and the batch simulator call this with
/// constructed boards, the engine calls it with fresh draws. Base payout
/// comes strictly from the leftmost run; the scatter count anywhere on the
/// board drives only the free-spin trigger. Flooring happens twice, first
/// on `bet × table multiplier` and again after the bonus multiplier.
pub fn evaluate_board(
    set: &SymbolSet,
    config: &EngineConfig,
    board: &[usize; REEL_COUNT],
    bet: u64,
    bonus_multiplier: f64,
) -> SpinResult {
    let first = board[0];
    let run_length = board.iter().take_while(|&&idx| idx == first).count() as u8;

    let base_payout = if run_length >= 3 {
        let multiplier = set.get(first).payout_for(run_length);
        (bet as f64 * multiplier).floor() as u64
    } else {
        0
    };

    let final_payout = (base_payout as f64 * bonus_multiplier).floor() as u64;
    let bonus_applied = bonus_multiplier > 1.0;
    let bonus_amount = if bonus_applied {
        final_payout - base_payout
    } else {
        0
    };

    let scatter_count = set
        .scatter_index()
        .map(|scatter| board.iter().filter(|&&idx| idx == scatter).count() as u8)
        .unwrap_or(0);
    let free_spins_triggered = scatter_count >= config.scatter_trigger_count;
    let free_spins_count = if free_spins_triggered {
        scatter_count as u32 * config.free_spins_per_scatter
    } else {
        0
    };

    let win = base_payout > 0;
    let tier = if win {
        Some(classify(run_length, set.rank_of(first)))
    } else {
        None
    };

    SpinResult {
        reels: board.iter().map(|&idx| set.get(idx).icon.clone()).collect(),
        payout: final_payout,
        details: SpinDetails {
            win,
            tier,
            matches: run_length,
            symbol: win.then(|| set.get(first).icon.clone()),
            scatter_count,
            free_spins_triggered,
            free_spins_count,
            bonus_applied,
            bonus_amount,
        },
    }
}

fn classify(run_length: u8, payout_rank: usize) -> WinTier {
    match (run_length, payout_rank) {
        (5, 0) => WinTier::MegaJackpot,
        (5, 1) => WinTier::Jackpot,
        (5, _) => WinTier::BigWin,
        (4, _) => WinTier::GoodWin,
        _ => WinTier::Win,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbols::Symbol;

    fn board_of(set: &SymbolSet, icons: [&str; REEL_COUNT]) -> [usize; REEL_COUNT] {
        icons.map(|icon| set.index_of(icon).unwrap())
    }

    fn classic() -> (SymbolSet, EngineConfig) {
        (SymbolSet::default_catalogue(), EngineConfig::default())
    }

    #[test]
    fn test_run_stops_at_first_mismatch() {
        let (set, config) = classic();
        let board = board_of(&set, ["🍒", "🍒", "🍋", "🍒", "🍒"]);
        let result = evaluate_board(&set, &config, &board, 100, 1.0);
        assert_eq!(result.details.matches, 2);
        assert_eq!(result.payout, 0);
        assert!(!result.is_win());
        assert_eq!(result.details.tier, None);
        assert_eq!(result.details.symbol, None);
    }

    #[test]
    fn test_diamond_three_match_pays_twenty_times_bet() {
        let (set, config) = classic();
        let board = board_of(&set, ["💎", "💎", "💎", "🍒", "🍒"]);
        let result = evaluate_board(&set, &config, &board, 100, 1.0);
        assert_eq!(result.payout, 2_000);
        assert_eq!(result.details.matches, 3);
        assert_eq!(result.details.symbol.as_deref(), Some("💎"));
        assert_eq!(result.details.tier, Some(WinTier::Win));
        assert!(!result.details.bonus_applied);
        assert_eq!(result.details.bonus_amount, 0);
    }

    #[test]
    fn test_bonus_multiplier_floors_after_base() {
        // Lemon pays 6× on a 3-run: bet 50 → base 300, ×1.2 → 360.
        let (set, config) = classic();
        let board = board_of(&set, ["🍋", "🍋", "🍋", "🍒", "💎"]);
        let result = evaluate_board(&set, &config, &board, 50, 1.2);
        assert_eq!(result.payout, 360);
        assert!(result.details.bonus_applied);
        assert_eq!(result.details.bonus_amount, 60);
    }

    #[test]
    fn test_two_step_truncation_order() {
        // Fractional table multiplier: bet 7 × 2.5 floors to 17 before the
        // bonus multiplier floors again (17 × 1.5 → 25, not floor(26.25)).
        let symbols = vec![
            Symbol::paying("🍇", [32, 32, 32, 32, 32], [2.5, 5.0, 10.0]),
            Symbol::paying("🍉", [32, 32, 32, 32, 32], [1.0, 2.0, 4.0]),
        ];
        let set = SymbolSet::new(symbols).unwrap();
        let config = EngineConfig::default();
        let board = board_of(&set, ["🍇", "🍇", "🍇", "🍉", "🍉"]);
        let result = evaluate_board(&set, &config, &board, 7, 1.5);
        assert_eq!(result.payout, 25);
        assert_eq!(result.details.bonus_amount, 8);
    }

    #[test]
    fn test_multiplier_linearity_on_fixed_board() {
        let (set, config) = classic();
        let board = board_of(&set, ["🍀", "🍀", "🍀", "🍀", "🍒"]);
        let once = evaluate_board(&set, &config, &board, 80, 1.0);
        let twice = evaluate_board(&set, &config, &board, 80, 2.0);
        assert_eq!(twice.payout, 2 * once.payout);
    }

    #[test]
    fn test_scattered_scatters_trigger_without_paying() {
        let (set, config) = classic();
        let board = board_of(&set, ["⭐", "🍒", "⭐", "🍒", "⭐"]);
        let result = evaluate_board(&set, &config, &board, 100, 1.0);
        assert_eq!(result.details.matches, 1);
        assert_eq!(result.payout, 0);
        assert_eq!(result.details.scatter_count, 3);
        assert!(result.details.free_spins_triggered);
        assert_eq!(result.details.free_spins_count, 6);
    }

    #[test]
    fn test_scatter_counts_scale_free_spins() {
        let (set, config) = classic();
        let four = board_of(&set, ["⭐", "⭐", "🍒", "⭐", "⭐"]);
        let result = evaluate_board(&set, &config, &four, 10, 1.0);
        assert_eq!(result.details.free_spins_count, 8);

        let two = board_of(&set, ["⭐", "⭐", "🍒", "🍒", "🍒"]);
        let result = evaluate_board(&set, &config, &two, 10, 1.0);
        assert!(!result.details.free_spins_triggered);
        assert_eq!(result.details.free_spins_count, 0);
    }

    #[test]
    fn test_scatter_run_pays_and_triggers() {
        // A scatter run still pays through the ordinary leftmost-run path;
        // the anywhere-count trigger stacks on top.
        let (set, config) = classic();
        let board = board_of(&set, ["⭐", "⭐", "⭐", "⭐", "⭐"]);
        let result = evaluate_board(&set, &config, &board, 10, 1.0);
        assert_eq!(result.payout, 500);
        assert_eq!(result.details.scatter_count, 5);
        assert_eq!(result.details.free_spins_count, 10);
    }

    #[test]
    fn test_tier_labels_follow_rank() {
        let (set, config) = classic();
        let mega = board_of(&set, ["💎", "💎", "💎", "💎", "💎"]);
        let jackpot = board_of(&set, ["7️⃣", "7️⃣", "7️⃣", "7️⃣", "7️⃣"]);
        let big = board_of(&set, ["🔔", "🔔", "🔔", "🔔", "🔔"]);
        let good = board_of(&set, ["🍒", "🍒", "🍒", "🍒", "🍋"]);

        let tier = |b: &[usize; REEL_COUNT]| {
            evaluate_board(&set, &config, b, 10, 1.0).details.tier.unwrap()
        };
        assert_eq!(tier(&mega), WinTier::MegaJackpot);
        assert_eq!(tier(&jackpot), WinTier::Jackpot);
        assert_eq!(tier(&big), WinTier::BigWin);
        assert_eq!(tier(&good), WinTier::GoodWin);
        assert!(WinTier::MegaJackpot.index() < WinTier::Jackpot.index());
        assert!(WinTier::GoodWin.index() < WinTier::Win.index());
    }

    #[test]
    fn test_zero_multiplier_zeroes_payout_without_bonus_flag() {
        let (set, config) = classic();
        let board = board_of(&set, ["🍒", "🍒", "🍒", "🍋", "🍋"]);
        let result = evaluate_board(&set, &config, &board, 100, 0.0);
        assert_eq!(result.payout, 0);
        assert!(!result.details.bonus_applied);
        assert!(result.details.win);
    }
}
