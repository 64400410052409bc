use crate::config::Config;
use crate::node::Node;
use colored::*;

/// Document with one entry per classification.
pub fn sample() -> Node {
    Node::mapping(vec![
        ("string", Node::from("text")),
        ("null", Node::null()),
        ("boolean", Node::from(true)),
        ("numeric", Node::sequence(vec![Node::from(42i64), Node::from(2.5)])),
        ("other", Node::other("<opaque>")),
        (
            "mapping",
            Node::mapping(vec![("nested", Node::from(false))]),
        ),
    ])
}

pub fn palette_cmd(cfg: &Config) -> anyhow::Result<()> {
    let printer = cfg.printer()?;
    println!("{} {}", "Palette:".dimmed(), cfg.palette);
    for (slot, spec) in &cfg.styles {
        println!("  {} {} = {}", "-".dimmed(), slot, spec);
    }
    println!();
    printer.print(&sample())?;
    Ok(())
}
