use crate::error::TreeError;
use crate::render::TreePrinter;
use crate::style::{Palette, Style};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub const CONFIG_FILE: &str = "config.yaml";

const DEFAULT_YAML: &str = "\
# printree configuration
# auto follows the terminal (and NO_COLOR / CLICOLOR_FORCE); always | never force it
color: auto
# default | vivid | plain
palette: default
# per-slot overrides: key, item, string, null, boolean, numeric
# values are a color name plus optional bold / dimmed / italic
styles: {}
#  key: \"blue bold\"
#  string: \"green\"
";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    #[default]
    Auto,
    Always,
    Never,
}

impl FromStr for ColorMode {
    type Err = TreeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "auto" => Ok(ColorMode::Auto),
            "always" | "on" | "true" => Ok(ColorMode::Always),
            "never" | "off" | "false" => Ok(ColorMode::Never),
            _ => Err(TreeError::InvalidColorMode(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub color: ColorMode,
    #[serde(default = "default_palette")]
    pub palette: String,
    #[serde(default)]
    pub styles: BTreeMap<String, String>,
}

fn default_palette() -> String {
    "default".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            color: ColorMode::default(),
            palette: default_palette(),
            styles: BTreeMap::new(),
        }
    }
}

impl Config {
    pub fn load_from_yaml(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        // an empty file (or one with only comments) means defaults
        let blank = content
            .lines()
            .map(str::trim)
            .all(|l| l.is_empty() || l.starts_with('#'));
        let cfg: Config = if blank {
            Config::default()
        } else {
            match serde_yaml::from_str::<Option<Config>>(&content)? {
                Some(c) => c,
                None => Config::default(),
            }
        };
        // fail early on typos in palette or style strings
        cfg.palette()?;
        tracing::debug!(path = %path.as_ref().display(), "loaded config");
        Ok(cfg)
    }

    /// Explicit path if given (must exist), otherwise the first config file
    /// found by [`Config::find_config_file`], otherwise defaults. Environment
    /// overrides are applied last.
    pub fn load(explicit: Option<&Path>) -> anyhow::Result<Self> {
        let mut cfg = match explicit {
            Some(p) => {
                if !p.exists() {
                    anyhow::bail!("config file not found: {}", p.display());
                }
                Self::load_from_yaml(p)?
            }
            None => match Self::find_config_file(CONFIG_FILE) {
                Some(p) => Self::load_from_yaml(p)?,
                None => {
                    tracing::debug!("no config file found, using defaults");
                    Config::default()
                }
            },
        };
        Self::apply_env_overrides(&mut cfg);
        Ok(cfg)
    }

    pub fn user_config_dir() -> PathBuf {
        let mut p = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        p.push(".printree");
        p.push("config");
        p
    }

    /// Candidate locations for `filename`, most specific first: a
    /// `printree/config` dir under the cwd, the user config dir, then `./config`.
    pub fn search_paths(filename: &str) -> Vec<PathBuf> {
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        vec![
            cwd.join("printree").join("config").join(filename),
            Self::user_config_dir().join(filename),
            cwd.join("config").join(filename),
        ]
    }

    pub fn find_config_file(filename: &str) -> Option<PathBuf> {
        Self::search_paths(filename).into_iter().find(|p| p.exists())
    }

    pub fn default_yaml() -> &'static str {
        DEFAULT_YAML
    }

    /// Preset named by `palette` with the `styles` overrides applied on top.
    pub fn palette(&self) -> Result<Palette, TreeError> {
        let mut palette = Palette::preset(&self.palette)?;
        for (slot, spec) in &self.styles {
            palette.set(slot, Style::parse(spec)?)?;
        }
        Ok(palette)
    }

    /// Printer for this configuration. `never` always yields unstyled output.
    pub fn printer(&self) -> Result<TreePrinter, TreeError> {
        if self.color == ColorMode::Never {
            return Ok(TreePrinter::plain());
        }
        Ok(TreePrinter::new(self.palette()?))
    }

    fn apply_env_overrides(cfg: &mut Self) {
        Self::apply_overrides_from(cfg, |key| std::env::var(key).ok());
    }

    fn apply_overrides_from(cfg: &mut Self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(c) = lookup("PRINTREE_COLOR").filter(|v| !v.is_empty()) {
            match c.parse() {
                Ok(mode) => cfg.color = mode,
                Err(e) => tracing::warn!("ignoring PRINTREE_COLOR: {}", e),
            }
        }
        if let Some(p) = lookup("PRINTREE_PALETTE").filter(|v| !v.is_empty()) {
            cfg.palette = p;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use colored::Color;
    use std::fs;

    fn temp_file(contents: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("printree_cfg_test_{}", uuid::Uuid::new_v4()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(CONFIG_FILE);
        fs::write(&path, contents).expect("write");
        path
    }

    #[test]
    fn default_template_parses_to_defaults() {
        let path = temp_file(Config::default_yaml());
        assert_eq!(Config::load_from_yaml(&path).unwrap(), Config::default());
    }

    #[test]
    fn empty_file_means_defaults() {
        let path = temp_file("# nothing here\n");
        assert_eq!(Config::load_from_yaml(&path).unwrap(), Config::default());
    }

    #[test]
    fn overrides_are_applied_to_preset() {
        let path = temp_file("color: always\npalette: plain\nstyles:\n  string: \"red bold\"\n");
        let cfg = Config::load_from_yaml(&path).unwrap();
        assert_eq!(cfg.color, ColorMode::Always);
        let palette = cfg.palette().unwrap();
        assert_eq!(palette.string, Style::fg(Color::Red).bold());
        assert!(palette.key.is_plain());
    }

    #[test]
    fn bad_style_is_rejected_at_load() {
        let path = temp_file("styles:\n  key: glitter\n");
        let err = Config::load_from_yaml(&path).unwrap_err();
        assert!(err.to_string().contains("glitter"));
    }

    #[test]
    fn search_order_is_cwd_then_user_then_config_dir() {
        let cwd = std::env::current_dir().unwrap();
        let paths = Config::search_paths("x.yaml");
        assert_eq!(
            paths,
            vec![
                cwd.join("printree").join("config").join("x.yaml"),
                Config::user_config_dir().join("x.yaml"),
                cwd.join("config").join("x.yaml"),
            ]
        );
        let name = format!("printree_absent_{}.yaml", uuid::Uuid::new_v4());
        assert_eq!(Config::find_config_file(&name), None);
    }

    #[test]
    fn missing_explicit_path_fails() {
        let p = std::env::temp_dir().join(format!("printree_missing_{}.yaml", uuid::Uuid::new_v4()));
        assert!(Config::load(Some(&p)).is_err());
    }

    #[test]
    fn env_overrides_win() {
        let mut cfg = Config::default();
        Config::apply_overrides_from(&mut cfg, |k| match k {
            "PRINTREE_COLOR" => Some("never".into()),
            "PRINTREE_PALETTE" => Some("plain".into()),
            _ => None,
        });
        assert_eq!(cfg.color, ColorMode::Never);
        assert_eq!(cfg.palette, "plain");
    }

    #[test]
    fn invalid_env_color_is_ignored() {
        let mut cfg = Config::default();
        Config::apply_overrides_from(&mut cfg, |k| {
            (k == "PRINTREE_COLOR").then(|| "rainbow".to_string())
        });
        assert_eq!(cfg.color, ColorMode::Auto);
    }

    #[test]
    fn never_gives_plain_printer() {
        let cfg = Config {
            color: ColorMode::Never,
            ..Config::default()
        };
        assert!(cfg.printer().unwrap().palette().is_plain());
    }

    #[test]
    fn color_mode_parsing() {
        assert_eq!("ALWAYS".parse::<ColorMode>().unwrap(), ColorMode::Always);
        assert!(matches!(
            "sometimes".parse::<ColorMode>(),
            Err(TreeError::InvalidColorMode(_))
        ));
    }
}
