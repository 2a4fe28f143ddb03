//! Watch Your Back! engine front end.
//!
//! ## Usage
//!
//! - `watch-your-back` - Engine self-play demo
//! - `watch-your-back demo --plies 60` - Self-play for a bounded number of plies
//! - `watch-your-back analyse board.txt --side black --phase moving` - Report
//!   legal moves, goal tiles and the engine's choice for a saved position
//!
//! Logging goes through `RUST_LOG` (default `info`); `-v` raises it to
//! `debug`, `-vv` to `trace`.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};

use watch_your_back::board::{Board, Side};
use watch_your_back::constants::{MAX_NODES, SEARCH_DEPTH, TREE_BREADTH};
use watch_your_back::evaluation::{EvalWeights, find_goal_tiles};
use watch_your_back::game::{GameState, Phase};
use watch_your_back::moves::count_moves;
use watch_your_back::search::{SearchLimits, SearchResult, alphabeta_search, fallback_action};
use watch_your_back::tree::tree_search;

/// Watch Your Back!: rule engine and adversarial search
#[derive(Parser)]
#[command(name = "watch-your-back")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Raise log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(flatten)]
    search: SearchArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Let the engine play both sides from the opening
    Demo {
        /// Maximum number of plies to play
        #[arg(long, default_value_t = 40)]
        plies: usize,
        /// Seed for the random fallback when search returns nothing
        #[arg(long, default_value_t = 0)]
        seed: u64,
    },
    /// Load a board from a file and report on it
    Analyse {
        /// Board in the textual grid form
        file: PathBuf,
        /// Side to move
        #[arg(long, value_enum, default_value_t = SideArg::White)]
        side: SideArg,
        /// Game phase
        #[arg(long, value_enum, default_value_t = PhaseArg::Moving)]
        phase: PhaseArg,
        /// Plies already played in the phase
        #[arg(long, default_value_t = 0)]
        turn: u32,
    },
}

/// Search tuning shared by all subcommands.
#[derive(Args)]
struct SearchArgs {
    /// Search depth in plies
    #[arg(long, global = true, default_value_t = SEARCH_DEPTH)]
    depth: usize,
    /// Use bounded tree exploration instead of alpha-beta
    #[arg(long, global = true)]
    tree: bool,
    /// Children per node for tree exploration
    #[arg(long, global = true, default_value_t = TREE_BREADTH)]
    breadth: usize,
    /// Node budget per search
    #[arg(long, global = true, default_value_t = MAX_NODES)]
    max_nodes: usize,
    /// Time budget per search in milliseconds
    #[arg(long, global = true)]
    time_ms: Option<u64>,
    /// Piece difference weight
    #[arg(long, global = true)]
    alpha: Option<f64>,
    /// Pieces on goal tiles weight
    #[arg(long, global = true)]
    beta: Option<f64>,
    /// Inverse goal distance weight
    #[arg(long, global = true)]
    gamma: Option<f64>,
}

impl SearchArgs {
    fn weights(&self) -> EvalWeights {
        let default = EvalWeights::default();
        EvalWeights {
            alpha: self.alpha.unwrap_or(default.alpha),
            beta: self.beta.unwrap_or(default.beta),
            gamma: self.gamma.unwrap_or(default.gamma),
        }
    }

    /// Fresh limits for one search; the deadline starts now.
    fn limits(&self) -> SearchLimits {
        let limits = SearchLimits {
            max_nodes: self.max_nodes,
            deadline: None,
        };
        match self.time_ms {
            Some(ms) => limits.with_time(Duration::from_millis(ms)),
            None => limits,
        }
    }

    fn run(&self, state: &GameState) -> SearchResult {
        let weights = self.weights();
        if self.tree {
            tree_search(state, self.depth, self.breadth, &weights, &self.limits())
        } else {
            alphabeta_search(state, self.depth, &weights, &self.limits())
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum SideArg {
    White,
    Black,
}

impl From<SideArg> for Side {
    fn from(side: SideArg) -> Side {
        match side {
            SideArg::White => Side::White,
            SideArg::Black => Side::Black,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum PhaseArg {
    Placing,
    Moving,
}

impl From<PhaseArg> for Phase {
    fn from(phase: PhaseArg) -> Phase {
        match phase {
            PhaseArg::Placing => Phase::Placing,
            PhaseArg::Moving => Phase::Moving,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match cli.command {
        Some(Commands::Analyse {
            file,
            side,
            phase,
            turn,
        }) => run_analyse(&cli.search, &file, side.into(), phase.into(), turn),
        Some(Commands::Demo { plies, seed }) => run_demo(&cli.search, plies, seed),
        None => run_demo(&cli.search, 40, 0),
    }
}

fn run_demo(search: &SearchArgs, plies: usize, seed: u64) -> Result<()> {
    println!("Watch Your Back!: engine self-play\n");

    let mut rng = fastrand::Rng::with_seed(seed);
    let mut state = GameState::new();

    for ply in 0..plies {
        if state.is_terminal() {
            break;
        }
        let result = search.run(&state);
        let action = result
            .action
            .unwrap_or_else(|| fallback_action(&state, &mut rng));
        log::info!(
            "ply {ply}: {} ({}) plays {action}, value {:.3}, {} nodes",
            state.to_move(),
            state.phase(),
            result.value,
            result.stats.nodes
        );
        state = state
            .apply(&action)
            .with_context(|| format!("engine chose an illegal action at ply {ply}"))?;
    }

    println!("{}", state.board());
    println!(
        "White: {} pieces, Black: {} pieces",
        state.board().count(Side::White),
        state.board().count(Side::Black)
    );
    if state.is_terminal() {
        match state.winner() {
            Some(side) => println!("{side} wins"),
            None => println!("Draw"),
        }
    }
    Ok(())
}

fn run_analyse(search: &SearchArgs, file: &Path, side: Side, phase: Phase, turn: u32) -> Result<()> {
    let text = fs::read_to_string(file).with_context(|| format!("reading {}", file.display()))?;
    let board: Board = text
        .parse()
        .with_context(|| format!("parsing board from {}", file.display()))?;
    let state = GameState::from_board(board, side, phase, turn).with_weights(search.weights());

    println!("{}", state.board());
    println!("{side} to move, {phase} phase, turn {turn}");
    if state.is_terminal() {
        println!("Position is terminal");
        return Ok(());
    }

    let actions: Vec<String> = state.legal_actions().iter().map(|a| a.to_string()).collect();
    println!("Legal actions ({}): {}", actions.len(), actions.join(" "));
    if phase == Phase::Moving {
        println!(
            "Mobility: {} {}, {} {}",
            side,
            count_moves(state.board(), side),
            side.opponent(),
            count_moves(state.board(), side.opponent())
        );
    }

    let goals: Vec<String> = find_goal_tiles(state.board(), side)
        .iter()
        .map(|c| c.to_string())
        .collect();
    println!("Goal tiles: {}", goals.join(" "));
    println!("Utility: {:.3}", state.utility());

    let result = search.run(&state);
    println!(
        "Engine plays {} (value {:.3}, {} nodes, {} leaves, {} cutoffs{})",
        result.action_or_forfeit(),
        result.value,
        result.stats.nodes,
        result.stats.leaves,
        result.stats.cutoffs,
        if result.stats.truncated { ", budget exhausted" } else { "" }
    );
    Ok(())
}
