use crate::config::Config;
use crate::error::TreeError;
use crate::node::Node;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Json,
    Yaml,
}

impl InputFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "json" => Some(InputFormat::Json),
            "yaml" | "yml" => Some(InputFormat::Yaml),
            _ => None,
        }
    }
}

impl FromStr for InputFormat {
    type Err = TreeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(InputFormat::Json),
            "yaml" | "yml" => Ok(InputFormat::Yaml),
            _ => Err(TreeError::UnknownFormat(s.to_string())),
        }
    }
}

/// Parses `text` in the given format. Without one, JSON is tried first so
/// numbers keep their JSON typing, then YAML.
pub fn parse_input(text: &str, format: Option<InputFormat>) -> Result<Node, TreeError> {
    match format {
        Some(InputFormat::Json) => Node::from_json_str(text),
        Some(InputFormat::Yaml) => Node::from_yaml_str(text),
        None => Node::from_json_str(text).or_else(|e| {
            tracing::debug!("not JSON ({}), trying YAML", e);
            Node::from_yaml_str(text)
        }),
    }
}

fn read_input(file: Option<&Path>) -> anyhow::Result<(String, Option<InputFormat>)> {
    match file {
        Some(p) if p != Path::new("-") => {
            let text = std::fs::read_to_string(p)
                .map_err(|e| anyhow::anyhow!("failed to read {}: {}", p.display(), e))?;
            tracing::debug!(path = %p.display(), bytes = text.len(), "read input file");
            Ok((text, InputFormat::from_path(p)))
        }
        _ => {
            let mut text = String::new();
            io::stdin().read_to_string(&mut text)?;
            tracing::debug!(bytes = text.len(), "read stdin");
            Ok((text, None))
        }
    }
}

pub fn show(cfg: &Config, file: Option<PathBuf>, format: Option<InputFormat>) -> anyhow::Result<()> {
    let (text, detected) = read_input(file.as_deref())?;
    let node = parse_input(&text, format.or(detected))?;
    tracing::debug!(kind = node.kind().name(), "parsed input");
    let printer = cfg.printer()?;
    match printer.print(&node) {
        // downstream closed early, e.g. `printree big.json | head`
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        other => Ok(other?),
    }
}
