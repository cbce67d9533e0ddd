//! dlgo-search: a Go rules engine with brute-force search agents.
//!
//! ## Usage
//!
//! - `dlgo-search play` - Play Black against a search agent on the console
//! - `dlgo-search selfplay` - Watch two agents play each other
//! - `dlgo-search gtp` - Start a GTP server for GUI integration
//!
//! Logging goes to stderr and is controlled with `RUST_LOG`.

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use dlgo_search::agent::{Agent, RandomBot};
use dlgo_search::alpha_beta::AlphaBetaAgent;
use dlgo_search::board::Move;
use dlgo_search::constants::{DEFAULT_BOARD_SIZE, DEFAULT_DEPTH, DEFAULT_KOMI, MAX_BOARD_SIZE};
use dlgo_search::coords::{format_move, parse_move};
use dlgo_search::depth_prune::DepthPrunedAgent;
use dlgo_search::eval::{EvalFn, capture_diff};
use dlgo_search::game::GameState;
use dlgo_search::gtp::GtpEngine;
use dlgo_search::minimax::MinimaxAgent;
use dlgo_search::types::Player;

/// Go rules engine with minimax and alpha-beta agents
#[derive(Parser)]
#[command(name = "dlgo-search")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    settings: Settings,
}

#[derive(Args)]
struct Settings {
    /// Board size (1 to 19)
    #[arg(long, global = true, default_value_t = DEFAULT_BOARD_SIZE)]
    size: usize,

    /// Compensation points for White
    #[arg(long, global = true, default_value_t = DEFAULT_KOMI, allow_negative_numbers = true)]
    komi: f32,

    /// Search depth for the depth-limited agents
    #[arg(long, global = true, default_value_t = DEFAULT_DEPTH)]
    depth: u32,

    /// Agent playing the engine's side
    #[arg(long, global = true, value_enum, default_value_t = AgentKind::AlphaBeta)]
    agent: AgentKind,

    /// Seed for the agents' tie-breaking
    #[arg(long, global = true)]
    seed: Option<u64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Play Black against the agent on the console
    Play,
    /// Let two agents play each other
    Selfplay {
        /// Agent playing White
        #[arg(long, value_enum, default_value_t = AgentKind::Random)]
        opponent: AgentKind,
    },
    /// Start the GTP (Go Text Protocol) server for use with GUI applications
    Gtp,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum AgentKind {
    AlphaBeta,
    DepthPruned,
    Minimax,
    Random,
}

impl Settings {
    fn rng(&self, offset: u64) -> fastrand::Rng {
        match self.seed {
            Some(seed) => fastrand::Rng::with_seed(seed.wrapping_add(offset)),
            None => fastrand::Rng::new(),
        }
    }

    fn build_agent(&self, kind: AgentKind, offset: u64) -> Box<dyn Agent> {
        let rng = self.rng(offset);
        let eval_fn: EvalFn = capture_diff;
        match kind {
            AgentKind::AlphaBeta => Box::new(AlphaBetaAgent::with_rng(self.depth, eval_fn, rng)),
            AgentKind::DepthPruned => {
                Box::new(DepthPrunedAgent::with_rng(self.depth, eval_fn, rng))
            }
            AgentKind::Minimax => Box::new(MinimaxAgent::with_rng(rng)),
            AgentKind::Random => Box::new(RandomBot::with_rng(rng)),
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let settings = cli.settings;
    if !(1..=MAX_BOARD_SIZE).contains(&settings.size) {
        bail!("board size must be between 1 and {MAX_BOARD_SIZE}, got {}", settings.size);
    }

    match cli.command {
        Some(Commands::Gtp) => {
            let agent = settings.build_agent(settings.agent, 0);
            GtpEngine::new(settings.size, settings.komi, agent).run()
        }
        Some(Commands::Selfplay { opponent }) => run_selfplay(&settings, opponent),
        Some(Commands::Play) | None => run_play(&settings),
    }
}

fn run_play(settings: &Settings) -> Result<()> {
    let mut bot = settings.build_agent(settings.agent, 0);
    let mut game = GameState::new_game_with_komi(settings.size, settings.komi);
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    while !game.is_over() {
        print!("{}", game.board());
        let mv = if game.next_player() == Player::Black {
            print!("-- ");
            io::stdout().flush().context("failed to flush prompt")?;
            let Some(line) = lines.next() else {
                bail!("input closed before the game ended");
            };
            let line = line.context("failed to read move")?;
            match parse_move(&line) {
                Ok(mv) if game.is_valid_move(mv) => mv,
                Ok(_) => {
                    println!("Illegal move, try again.");
                    continue;
                }
                Err(e) => {
                    println!("{e}, try again.");
                    continue;
                }
            }
        } else {
            bot.select_move(&game)
        };
        println!("{}", format_move(game.next_player(), mv));
        game = game.apply_move(mv);
    }

    report_result(&game);
    Ok(())
}

fn run_selfplay(settings: &Settings, opponent: AgentKind) -> Result<()> {
    let mut black = settings.build_agent(settings.agent, 0);
    let mut white = settings.build_agent(opponent, 1);
    let mut game = GameState::new_game_with_komi(settings.size, settings.komi);

    while !game.is_over() {
        let mv = match game.next_player() {
            Player::Black => black.select_move(&game),
            Player::White => white.select_move(&game),
        };
        println!("{}", format_move(game.next_player(), mv));
        game = game.apply_move(mv);
        print!("{}", game.board());
    }

    report_result(&game);
    Ok(())
}

fn report_result(game: &Arc<GameState>) {
    if game.last_move() == Some(Move::Resign) {
        if let Some(winner) = game.winner() {
            println!("{} resigned, {winner} wins", winner.other());
        }
    } else {
        println!("Result: {}", game.game_result());
    }
    info!(winner = ?game.winner(), "game over");
}
