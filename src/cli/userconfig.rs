use crate::config::{CONFIG_FILE, Config};
use clap::Subcommand;
use colored::*;

#[derive(Subcommand, Debug)]
pub enum ConfigCmd {
    /// Write the default config to ~/.printree/config/config.yaml
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Print the config file that would be used
    Path,
}

fn write_default_config(dir: &std::path::Path, force: bool) -> anyhow::Result<std::path::PathBuf> {
    std::fs::create_dir_all(dir)?;
    let dst = dir.join(CONFIG_FILE);
    if dst.exists() && !force {
        anyhow::bail!("{} already exists (use --force to overwrite)", dst.display());
    }
    std::fs::write(&dst, Config::default_yaml())?;
    Ok(dst)
}

pub fn config_cmd(cmd: ConfigCmd) -> anyhow::Result<()> {
    match cmd {
        ConfigCmd::Init { force } => {
            let created = write_default_config(&Config::user_config_dir(), force)?;
            println!("{} {}", "Wrote".green(), created.display());
        }
        ConfigCmd::Path => match Config::find_config_file(CONFIG_FILE) {
            Some(p) => println!("{}", p.display()),
            None => println!("{}", "No config file found; using defaults".yellow()),
        },
    }
    Ok(())
}
