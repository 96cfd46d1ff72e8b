//! SpinMath operator tools
//!
//! Usage:
//!   sm paytable                 - Print the paytable and analytic report
//!   sm spin --bet 100           - Run spins against the built-in game
//!   sm simulate --spins 1000000 - Batch-validate the analytic figures
//!   sm check game.yaml          - Validate an external game definition

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use sm_engine::{GameDefinition, SlotEngine, analyze};
use sm_sim::SimConfig;

#[derive(Parser)]
#[command(name = "sm", about = "SpinMath slot engine tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the paytable and analytic report
    Paytable {
        /// Game definition file (JSON or YAML); built-in game if omitted
        #[arg(short, long)]
        definition: Option<PathBuf>,
    },
    /// Run spins and print each outcome
    Spin {
        /// Bet per spin
        #[arg(short, long)]
        bet: u64,
        /// Caller bonus multiplier
        #[arg(short, long, default_value_t = 1.0)]
        multiplier: f64,
        /// Number of spins
        #[arg(short, long, default_value_t = 1)]
        count: u32,
        /// RNG seed for a reproducible session
        #[arg(short, long)]
        seed: Option<u64>,
        /// Game definition file (JSON or YAML); built-in game if omitted
        #[arg(short, long)]
        definition: Option<PathBuf>,
    },
    /// Run a batch simulation and compare against the analytic report
    Simulate {
        /// Total spins
        #[arg(long, default_value_t = 1_000_000)]
        spins: u64,
        /// Bet per spin
        #[arg(long, default_value_t = 10)]
        bet: u64,
        /// Base RNG seed
        #[arg(long, default_value_t = 0x5EED)]
        seed: u64,
        /// Worker count (defaults to one per CPU)
        #[arg(long)]
        workers: Option<usize>,
        /// Game definition file (JSON or YAML); built-in game if omitted
        #[arg(short, long)]
        definition: Option<PathBuf>,
    },
    /// Validate a game definition file
    Check {
        /// Game definition file (JSON or YAML)
        definition: PathBuf,
    },
}

fn load_definition(path: Option<&Path>) -> Result<GameDefinition> {
    let Some(path) = path else {
        return Ok(GameDefinition::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let is_yaml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));
    let definition = if is_yaml {
        GameDefinition::from_yaml_str(&text)
    } else {
        GameDefinition::from_json_str(&text)
    };
    definition.with_context(|| format!("invalid game definition {}", path.display()))
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Paytable { definition } => {
            let definition = load_definition(definition.as_deref())?;
            let engine = SlotEngine::new(definition)?;
            print!("{}", engine.render_paytable());
        }
        Commands::Spin {
            bet,
            multiplier,
            count,
            seed,
            definition,
        } => {
            let definition = load_definition(definition.as_deref())?;
            let mut engine = match seed {
                Some(seed) => SlotEngine::with_seed(definition, seed)?,
                None => SlotEngine::new(definition)?,
            };

            for _ in 0..count {
                let result = engine.spin(bet, multiplier)?;
                let mut line = format!("{}  payout {}", result.reels.join(" "), result.payout);
                if let Some(tier) = result.details.tier {
                    line.push_str(&format!(
                        "  [{} — {}x {}]",
                        tier.display_name(),
                        result.details.matches,
                        result.details.symbol.as_deref().unwrap_or("?"),
                    ));
                }
                if result.details.bonus_applied {
                    line.push_str(&format!("  (+{} bonus)", result.details.bonus_amount));
                }
                if result.details.free_spins_triggered {
                    line.push_str(&format!(
                        "  ✦ {} free spins",
                        result.details.free_spins_count
                    ));
                }
                println!("{line}");
            }

            let stats = engine.stats();
            println!(
                "\n{} spins | bet {} | won {} | session rtp {:.2}% | hit rate {:.2}% | best {:.1}x",
                stats.total_spins,
                stats.total_bet,
                stats.total_win,
                stats.rtp(),
                stats.hit_rate(),
                stats.max_win_ratio
            );
        }
        Commands::Simulate {
            spins,
            bet,
            seed,
            workers,
            definition,
        } => {
            let definition = load_definition(definition.as_deref())?;
            let analytic = analyze(&definition.build_symbols()?);
            let config = SimConfig {
                spins,
                bet,
                seed,
                workers: workers.unwrap_or(0),
                ..SimConfig::default()
            };
            let report = sm_sim::run(&definition, &config)?;
            let delta = report.compare(&analytic);

            println!("spins              {}", report.spins);
            println!("total bet          {}", report.total_bet);
            println!("total win          {}", report.total_win);
            println!(
                "empirical rtp      {:.3}%  (analytic {:.3}%, delta {:+.3})",
                report.empirical_rtp(),
                analytic.rtp,
                delta.rtp_delta
            );
            println!(
                "empirical hit freq {:.3}%  (analytic {:.3}%, delta {:+.3})",
                report.empirical_hit_frequency(),
                analytic.hit_frequency,
                delta.hit_frequency_delta
            );
            println!("free spin triggers {}", report.free_spin_triggers);
            println!("max win ratio      {:.1}x", report.max_win_ratio);
        }
        Commands::Check { definition } => {
            let loaded = load_definition(Some(&definition))?;
            let report = analyze(&loaded.build_symbols()?);
            println!(
                "{} OK — {} symbols, rtp {:.2}%, house edge {:.2}%, hit frequency {:.2}%",
                definition.display(),
                loaded.symbols.len(),
                report.rtp,
                report.house_edge,
                report.hit_frequency
            );
        }
    }

    Ok(())
}
