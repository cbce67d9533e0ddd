//! Go Text Protocol (GTP) front end.
//!
//! Lets a graphical Go client drive a [`GameState`] and any [`Agent`] over
//! stdin/stdout, following GTP version 2.
//!
//! ## Supported Commands
//!
//! - `name`, `version`, `protocol_version`
//! - `list_commands`, `known_command <cmd>`
//! - `quit`
//! - `boardsize <size>` - Resize and clear the board (1 to 19)
//! - `clear_board` - Start a new game
//! - `komi <value>` - Set komi for the game in progress and later games
//! - `play <color> <vertex>` - Play a move for the player to move
//! - `genmove <color>` - Ask the agent for a move and play it
//! - `showboard` - Render the board
//!
//! Colors must alternate: `play` and `genmove` reject the color that is not
//! on move, since the game history has no way to record two moves in a row
//! by the same player.

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::agent::Agent;
use crate::constants::MAX_BOARD_SIZE;
use crate::coords::{format_vertex, parse_move};
use crate::game::GameState;
use crate::types::Player;

/// The list of known GTP commands.
const KNOWN_COMMANDS: &[&str] = &[
    "boardsize",
    "clear_board",
    "genmove",
    "known_command",
    "komi",
    "list_commands",
    "name",
    "play",
    "protocol_version",
    "quit",
    "showboard",
    "version",
];

/// GTP engine state.
pub struct GtpEngine {
    /// Current game
    game: Arc<GameState>,
    /// Agent answering `genmove`
    agent: Box<dyn Agent>,
    board_size: usize,
    komi: f32,
}

impl GtpEngine {
    pub fn new(board_size: usize, komi: f32, agent: Box<dyn Agent>) -> Self {
        Self {
            game: GameState::new_game_with_komi(board_size, komi),
            agent,
            board_size,
            komi,
        }
    }

    /// The game as it currently stands.
    pub fn game(&self) -> &Arc<GameState> {
        &self.game
    }

    /// Run the GTP command loop, reading from stdin and writing to stdout.
    pub fn run(&mut self) -> Result<()> {
        let stdin = io::stdin();
        let stdout = io::stdout();
        self.serve(stdin.lock(), stdout.lock())
    }

    /// Run the GTP command loop over arbitrary streams until `quit` or EOF.
    pub fn serve<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> Result<()> {
        for line in input.lines() {
            let line = line.context("failed to read GTP command")?;

            // Skip empty lines and comments
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (id, command_line) = Self::parse_id(line);
            let parts: Vec<&str> = command_line.split_whitespace().collect();
            if parts.is_empty() {
                continue;
            }

            let command = parts[0].to_lowercase();
            let args = &parts[1..];
            debug!(%command, ?args, "gtp command");

            let (success, message) = self.execute(&command, args);
            let prefix = if success { '=' } else { '?' };
            let id_str = id.map(|i| i.to_string()).unwrap_or_default();

            write!(output, "{prefix}{id_str} {message}\n\n")
                .context("failed to write GTP response")?;
            output.flush().context("failed to flush GTP response")?;

            if command == "quit" {
                break;
            }
        }
        Ok(())
    }

    /// Parse an optional numeric command ID from the beginning of the line.
    fn parse_id(line: &str) -> (Option<u32>, &str) {
        let trimmed = line.trim();
        let end = trimmed
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(trimmed.len());
        if end > 0 {
            if let Ok(id) = trimmed[..end].parse::<u32>() {
                return (Some(id), trimmed[end..].trim());
            }
        }
        (None, trimmed)
    }

    fn parse_color(s: &str) -> Option<Player> {
        match s.to_lowercase().as_str() {
            "b" | "black" => Some(Player::Black),
            "w" | "white" => Some(Player::White),
            _ => None,
        }
    }

    fn new_game(&mut self) {
        self.game = GameState::new_game_with_komi(self.board_size, self.komi);
    }

    /// Check that `color` names the player to move.
    fn check_turn(&self, color: &str) -> std::result::Result<(), String> {
        let player = Self::parse_color(color).ok_or_else(|| format!("invalid color '{color}'"))?;
        if player != self.game.next_player() {
            return Err(format!("it is {}'s turn", self.game.next_player()));
        }
        Ok(())
    }

    /// Execute a GTP command and return (success, response).
    fn execute(&mut self, command: &str, args: &[&str]) -> (bool, String) {
        match command {
            "name" => (true, env!("CARGO_PKG_NAME").to_string()),

            "version" => (true, env!("CARGO_PKG_VERSION").to_string()),

            "protocol_version" => (true, "2".to_string()),

            "list_commands" => (true, KNOWN_COMMANDS.join("\n")),

            "known_command" => {
                let Some(cmd) = args.first() else {
                    return (false, "missing argument".to_string());
                };
                let known = KNOWN_COMMANDS.contains(&cmd.to_lowercase().as_str());
                (true, known.to_string())
            }

            "quit" => (true, String::new()),

            "boardsize" => {
                let Some(arg) = args.first() else {
                    return (false, "missing argument".to_string());
                };
                match arg.parse::<usize>() {
                    Ok(size) if (1..=MAX_BOARD_SIZE).contains(&size) => {
                        self.board_size = size;
                        self.new_game();
                        (true, String::new())
                    }
                    Ok(_) => (false, "unacceptable size".to_string()),
                    Err(_) => (false, "invalid size".to_string()),
                }
            }

            "clear_board" => {
                self.new_game();
                (true, String::new())
            }

            "komi" => {
                let Some(arg) = args.first() else {
                    return (false, "missing argument".to_string());
                };
                match arg.parse::<f32>() {
                    Ok(komi) => {
                        self.komi = komi;
                        self.game = self.game.with_komi(komi);
                        (true, String::new())
                    }
                    Err(_) => (false, "invalid komi".to_string()),
                }
            }

            "play" => {
                let [color, vertex, ..] = args else {
                    return (false, "missing arguments".to_string());
                };
                if let Err(msg) = self.check_turn(color) {
                    return (false, msg);
                }
                let mv = match parse_move(vertex) {
                    Ok(mv) => mv,
                    Err(e) => return (false, format!("invalid vertex: {e}")),
                };
                if !self.game.is_valid_move(mv) {
                    return (false, "illegal move".to_string());
                }
                self.game = self.game.apply_move(mv);
                (true, String::new())
            }

            "genmove" => {
                let Some(color) = args.first() else {
                    return (false, "missing argument".to_string());
                };
                if let Err(msg) = self.check_turn(color) {
                    return (false, msg);
                }
                if self.game.is_over() {
                    return (true, "resign".to_string());
                }
                let mv = self.agent.select_move(&self.game);
                info!(player = %self.game.next_player(), vertex = %format_vertex(mv), "genmove");
                self.game = self.game.apply_move(mv);
                (true, format_vertex(mv))
            }

            "showboard" => (true, format!("\n{}", self.game.board())),

            _ => (false, format!("unknown command: {command}")),
        }
    }
}
