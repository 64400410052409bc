use clap::{ArgAction, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use crate::config::{ColorMode, Config};

mod palette;
mod show;
mod userconfig;

pub use show::{InputFormat, parse_input};

#[derive(Parser, Debug)]
#[command(
    name = "printree",
    version,
    about = "Printree - render JSON/YAML as a colorized tree",
    long_about = None,
    disable_help_subcommand = true,
    // Ensure `printree palette` is parsed as subcommand, not an input file
    subcommand_precedence_over_arg = true,
)]
pub struct Cli {
    /// When to emit ANSI styles
    #[arg(long, global = true, value_enum)]
    pub color: Option<ColorMode>,
    /// Palette preset (default, vivid, plain)
    #[arg(long, global = true)]
    pub palette: Option<String>,
    /// Config file (default: searched in ./printree/config, ~/.printree/config, ./config)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    /// Input format (default: from file extension, else JSON then YAML)
    #[arg(short, long, global = true)]
    pub format: Option<InputFormat>,
    /// Increase log verbosity (-v debug, -vv trace); logs go to stderr
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,
    /// Optional positional input, e.g. `printree data.json`; `-` or absent reads stdin
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Command to run (default: show)
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Render a JSON or YAML document as a tree (default)
    Show {
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,
    },
    /// Render a sample document showing every style of the palette
    Palette,
    /// Config operations
    Config {
        #[command(subcommand)]
        cmd: userconfig::ConfigCmd,
    },
}

pub fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        // config commands run before loading, so a broken config can be replaced
        Some(Command::Config { cmd }) => userconfig::config_cmd(cmd),
        Some(Command::Palette) => {
            let cfg = effective_config(cli.config.as_deref(), cli.color, cli.palette)?;
            palette::palette_cmd(&cfg)
        }
        Some(Command::Show { file }) => {
            let cfg = effective_config(cli.config.as_deref(), cli.color, cli.palette)?;
            show::show(&cfg, file.or(cli.file), cli.format)
        }
        None => {
            let cfg = effective_config(cli.config.as_deref(), cli.color, cli.palette)?;
            show::show(&cfg, cli.file, cli.format)
        }
    }
}

/// Loaded config with command-line flags applied on top.
fn effective_config(
    path: Option<&Path>,
    color: Option<ColorMode>,
    palette: Option<String>,
) -> anyhow::Result<Config> {
    let mut cfg = Config::load(path)?;
    if let Some(c) = color {
        cfg.color = c;
    }
    if let Some(p) = palette {
        cfg.palette = p;
    }
    if cfg.color == ColorMode::Always {
        colored::control::set_override(true);
    }
    tracing::debug!(color = ?cfg.color, palette = %cfg.palette, "effective settings");
    Ok(cfg)
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = if verbose > 0 {
        EnvFilter::new(level)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
