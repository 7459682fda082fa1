//! forumkit - inspect board trees, level curves and colors from the terminal
//!
//! # Usage
//!
//! ```bash
//! forumkit level 1500                       # Level for an experience value
//! forumkit curve --max 20                   # Threshold table
//! forumkit boards boards.json               # Print the board tree
//! forumkit boards boards.json --board 12    # Ancestor chain of board 12
//! forumkit color "Rust" --color 3498db      # Resolved and hover color
//! forumkit date --format "yyyy/MM/dd"       # Current local time
//! ```
//!
//! Logging goes to stderr; set `RUST_LOG=debug` for detail.

use chrono::Local;
use clap::{Parser, Subcommand};
use forumkit::core::api::JsonFileSource;
use forumkit::core::board::{Board, BoardId};
use forumkit::core::hierarchy::{BoardCache, BoardIndex};
use forumkit::core::level::{ExperienceCurve, MAX_LEVEL};
use forumkit::formatting::{DEFAULT_PATTERN, date_format};
use forumkit::theme::board_color;
use forumkit::utils::truncate_string;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Board names longer than this are shortened in tree output
const MAX_NAME_WIDTH: usize = 32;

#[derive(Parser)]
#[command(name = "forumkit")]
#[command(about = "Forum client toolkit - board trees, levels and colors", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the level reached with an amount of experience
    Level {
        /// Experience points
        exp: u64,
    },
    /// Print the experience table
    Curve {
        /// Last level to print, at most the level cap
        #[arg(short, long, default_value_t = 20)]
        max: u32,
    },
    /// Load a board list response from disk and print it
    Boards {
        /// JSON file holding `{"code": 0, "data": {"items": [...]}}`
        file: PathBuf,
        /// Print this board's ancestor chain instead of the tree
        #[arg(short, long, value_name = "ID")]
        board: Option<String>,
        /// Return code that counts as success
        #[arg(long, default_value_t = 0)]
        success_code: i32,
    },
    /// Resolve a board's color
    Color {
        /// Board name, used when no color is set or it does not parse
        name: String,
        /// Configured board color
        #[arg(short, long)]
        color: Option<String>,
    },
    /// Print the current local time
    Date {
        #[arg(short, long, default_value = DEFAULT_PATTERN)]
        format: String,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Error: cannot start runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(handle_cli(cli.command)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn handle_cli(command: Commands) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::Level { exp } => {
            let mut curve = ExperienceCurve::new();
            let progress = curve.level_for_exp(exp);
            println!("Level: {}", progress.level);
            println!(
                "Progress: {} / {}",
                progress.current_level_progress, progress.level_info.level_exp
            );
            println!("Next level at: {}", progress.level_info.cumulative_exp);
        }
        Commands::Curve { max } => {
            let mut curve = ExperienceCurve::new();
            println!("{:>5}  {:>22}  {:>22}", "level", "exp", "cumulative");
            for level in 1..=max.min(MAX_LEVEL) {
                let info = curve.level_info(i64::from(level));
                println!(
                    "{level:>5}  {:>22}  {:>22}",
                    info.level_exp, info.cumulative_exp
                );
            }
        }
        Commands::Boards {
            file,
            board,
            success_code,
        } => {
            let source = JsonFileSource::new(file).with_success_code(success_code);
            let cache = BoardCache::new(source);
            cache.ensure_loaded(false).await?;
            let Some(index) = cache.snapshot() else {
                return Err("board list did not load".into());
            };

            if let Some(id) = board {
                let chain = cache.chain_for(&BoardId::from(id), true)?;
                let names: Vec<String> = chain
                    .iter()
                    .map(|id| match index.info(id) {
                        Some(b) => format!("{} ({id})", b.name),
                        None => id.to_string(),
                    })
                    .collect();
                println!("{}", names.join(" < "));
            } else {
                for root in index.roots() {
                    print_tree(&index, root, 0);
                }
            }
        }
        Commands::Color { name, color } => {
            let mut board = Board::new("preview", None, name);
            if let Some(c) = color {
                board = board.with_color(c);
            }
            let colors = board_color::colors_for(&board);
            println!("color: {}", colors.color);
            println!("hover: {}", colors.hover);
        }
        Commands::Date { format } => {
            println!("{}", date_format(&Local::now(), &format));
        }
    }
    Ok(())
}

fn print_tree(index: &BoardIndex, board: &Board, depth: usize) {
    let color = index
        .ex_info(&board.id)
        .map_or_else(String::new, |ex| ex.color.clone());
    println!(
        "{}{} [{}] {color}",
        "  ".repeat(depth),
        truncate_string(&board.name, MAX_NAME_WIDTH),
        board.id
    );
    if let Some(ex) = index.ex_info(&board.id) {
        for sub in &ex.subboards {
            print_tree(index, sub, depth + 1);
        }
    }
}
