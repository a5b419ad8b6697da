use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use log::info;
use serde_json::json;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

use bingoboard::grid::{self, Constraints, MAX_GRID_SIZE, MIN_GRID_SIZE};
use bingoboard::{BoardRequest, DirTextureSource};

fn level_for(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

/// Install the stderr subscriber. `RUST_LOG` wins over `-v` when set.
fn init_logging(verbose: u8) {
    let filter = EnvFilter::builder()
        .with_default_directive(level_for(verbose).into())
        .from_env_lossy();
    // Also installs the `log` -> `tracing` bridge for the library's records
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

#[derive(Parser)]
#[command(name = "bingoboard", version, about = "Render bingo board images")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render a board request (JSON) to a PNG
    Render {
        /// Request document (JSON)
        request: PathBuf,
        /// Directory holding sprite textures
        #[arg(short, long, default_value = "textures")]
        textures: PathBuf,
        /// Output PNG path
        #[arg(short, long, default_value = "board.png")]
        out: PathBuf,
        /// Print the PNG as base64 on stdout instead of writing a file
        #[arg(long)]
        base64: bool,
        /// Include the SHA-256 digest of the raw pixels in the summary
        #[arg(long)]
        digest: bool,
    },
    /// Solve the grid layout for one grid size
    Solve {
        #[arg(short, long)]
        grid_size: u32,
        #[command(flatten)]
        constraints: ConstraintArgs,
    },
    /// Print the cached default layout of every grid size
    Presets,
}

#[derive(Args)]
struct ConstraintArgs {
    #[arg(long)]
    min_padding: Option<u32>,
    #[arg(long)]
    max_padding: Option<u32>,
    #[arg(long)]
    min_line_width: Option<u32>,
    #[arg(long)]
    max_line_width: Option<u32>,
    #[arg(long)]
    min_border_width: Option<u32>,
    #[arg(long)]
    max_border_width: Option<u32>,
    #[arg(long)]
    pixel_perfect: Option<bool>,
    #[arg(long)]
    fill_board: Option<bool>,
}

impl From<ConstraintArgs> for Constraints {
    fn from(a: ConstraintArgs) -> Self {
        Constraints {
            min_padding: a.min_padding,
            max_padding: a.max_padding,
            min_line_width: a.min_line_width,
            max_line_width: a.max_line_width,
            min_border_width: a.min_border_width,
            max_border_width: a.max_border_width,
            pixel_perfect: a.pixel_perfect,
            fill_board: a.fill_board,
            center_board: None,
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Render {
            request,
            textures,
            out,
            base64,
            digest,
        } => {
            let json = std::fs::read_to_string(&request)
                .with_context(|| format!("reading request {}", request.display()))?;
            let board = BoardRequest::from_json(&json)?.into_board()?;
            let source = DirTextureSource::new(textures);
            info!("resolving textures under {}", source.root().display());
            let rendered = bingoboard::render(&board, &source)?;

            let mut summary = json!({ "bingo": rendered.winner() });
            if base64 {
                summary["png_base64"] = json!(rendered.to_png_base64()?);
            } else {
                std::fs::write(&out, rendered.to_png()?).with_context(|| format!("writing {}", out.display()))?;
                info!("wrote {}", out.display());
                summary["out"] = json!(out.display().to_string());
            }
            if digest {
                summary["digest"] = json!(rendered.digest());
            }
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        Command::Solve { grid_size, constraints } => {
            let params = grid::solve(grid_size, &constraints.into())?;
            println!("{}", serde_json::to_string_pretty(&params)?);
        }
        Command::Presets => {
            let mut table = serde_json::Map::new();
            for size in MIN_GRID_SIZE..=MAX_GRID_SIZE {
                table.insert(size.to_string(), serde_json::to_value(grid::default_params(size)?)?);
            }
            println!("{}", serde_json::to_string_pretty(&table)?);
        }
    }
    Ok(())
}


fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    grid::warm_defaults();

    if let Err(e) = run(cli) {
        eprintln!("bingoboard: {:#}", e);
        std::process::exit(1);
    }
}
