//! Recursive tree renderer.
//!
//! ```text
//! ├── a: 1
//! └── b:
//!     ├── c: 'x'
//!     └── d: None
//! ```

use crate::node::{Node, Scalar};
use crate::style::Palette;
use colored::{ColoredString, Colorize};
use std::io::{self, Write};

const BRANCH: &str = "├── ";
const LAST_BRANCH: &str = "└── ";
const PIPE: &str = "│   ";
const SPACE: &str = "    ";

fn connector(is_last: bool) -> &'static str {
    if is_last { LAST_BRANCH } else { BRANCH }
}

fn child_prefix(prefix: &str, is_last: bool) -> String {
    format!("{}{}", prefix, if is_last { SPACE } else { PIPE })
}

/// Renders [`Node`] trees with the styles of its [`Palette`].
#[derive(Debug, Clone, Default)]
pub struct TreePrinter {
    palette: Palette,
}

impl TreePrinter {
    pub fn new(palette: Palette) -> Self {
        Self { palette }
    }

    /// Printer that never emits escape sequences.
    pub fn plain() -> Self {
        Self::new(Palette::plain())
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn render<W: Write + ?Sized>(&self, node: &Node, out: &mut W) -> io::Result<()> {
        self.render_with_prefix(node, "", out)
    }

    /// Renders `node` with every line starting with `prefix`.
    pub fn render_with_prefix<W: Write + ?Sized>(
        &self,
        node: &Node,
        prefix: &str,
        out: &mut W,
    ) -> io::Result<()> {
        match node {
            Node::Mapping(entries) => {
                let n = entries.len();
                for (i, (key, value)) in entries.iter().enumerate() {
                    let is_last = i + 1 == n;
                    write!(
                        out,
                        "{}{}{}:",
                        prefix,
                        connector(is_last),
                        self.palette.key.paint(key)
                    )?;
                    match value {
                        Node::Scalar(s) => writeln!(out, " {}", self.paint_scalar(s))?,
                        container => {
                            writeln!(out)?;
                            self.render_with_prefix(
                                container,
                                &child_prefix(prefix, is_last),
                                out,
                            )?;
                        }
                    }
                }
            }
            Node::Sequence(items) => {
                let n = items.len();
                for (i, item) in items.iter().enumerate() {
                    let is_last = i + 1 == n;
                    writeln!(
                        out,
                        "{}{}{}",
                        prefix,
                        connector(is_last),
                        self.palette.item.paint(&format!("Item {}", i))
                    )?;
                    self.render_with_prefix(item, &child_prefix(prefix, is_last), out)?;
                }
            }
            Node::Scalar(s) => writeln!(out, "{}{}", prefix, self.paint_scalar(s))?,
        }
        Ok(())
    }

    pub fn render_to_string(&self, node: &Node) -> String {
        let mut buf = Vec::new();
        // writing into a Vec cannot fail
        let _ = self.render(node, &mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    }

    /// Writes the tree to stdout, holding the lock for the whole tree.
    pub fn print(&self, node: &Node) -> io::Result<()> {
        let stdout = io::stdout();
        let mut lock = stdout.lock();
        self.render(node, &mut lock)?;
        lock.flush()
    }

    fn paint_scalar(&self, s: &Scalar) -> ColoredString {
        let text = s.literal();
        match self.palette.scalar_style(s.kind()) {
            Some(style) => style.paint(&text),
            None => text.normal(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::Style;
    use colored::Color;
    use serde_json::json;

    fn plain(node: &Node) -> String {
        TreePrinter::plain().render_to_string(node)
    }

    #[test]
    fn nested_mapping() {
        let node = Node::from(json!({"a": 1, "b": {"c": "x", "d": null}}));
        assert_eq!(
            plain(&node),
            "├── a: 1\n\
             └── b:\n    \
             ├── c: 'x'\n    \
             └── d: None\n"
        );
    }

    #[test]
    fn sequence_items_print_scalar_one_level_down() {
        let node = Node::from(json!([1, "two", true]));
        assert_eq!(
            plain(&node),
            "├── Item 0\n\
             │   1\n\
             ├── Item 1\n\
             │   'two'\n\
             └── Item 2\n    \
             True\n"
        );
    }

    #[test]
    fn bare_scalar_is_one_line() {
        assert_eq!(plain(&Node::from(42i64)), "42\n");
        assert_eq!(plain(&Node::other("<obj>")), "<obj>\n");
    }

    #[test]
    fn empty_containers_emit_nothing() {
        assert_eq!(plain(&Node::from(json!({}))), "");
        assert_eq!(plain(&Node::from(json!([]))), "");
        assert_eq!(plain(&Node::from(json!({"e": []}))), "└── e:\n");
    }

    #[test]
    fn caller_prefix_is_kept() {
        let mut out = Vec::new();
        TreePrinter::plain()
            .render_with_prefix(&Node::from(json!({"k": false})), ">> ", &mut out)
            .unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), ">> └── k: False\n");
    }

    #[test]
    fn continuation_only_under_non_last_children() {
        let node = Node::from(json!({
            "first": {"inner": [1, 2]},
            "last": {"inner": {"x": null}}
        }));
        let text = plain(&node);
        assert_eq!(
            text,
            "├── first:\n\
             │   └── inner:\n\
             │       ├── Item 0\n\
             │       │   1\n\
             │       └── Item 1\n\
             │           2\n\
             └── last:\n    \
             └── inner:\n        \
             └── x: None\n"
        );
    }

    // Depth of every labelled line equals the number of four-column segments
    // before its connector.
    #[test]
    fn indentation_tracks_depth() {
        let node = Node::from(json!({"l0": {"l1": {"l2": {"l3": 0}}}}));
        for (depth, line) in plain(&node).lines().enumerate() {
            let cols = line
                .find(|c: char| c == '├' || c == '└')
                .map(|byte| line[..byte].chars().count())
                .unwrap();
            assert_eq!(cols / 4, depth, "line {:?}", line);
        }
    }

    #[test]
    fn line_count_matches_entries() {
        // 3 scalar entries, 1 container entry, 2 items each with one leaf
        let node = Node::from(json!({"a": 1, "b": "s", "c": null, "d": [true, 2.5]}));
        assert_eq!(plain(&node).lines().count(), 3 + 1 + 2 * 2);
    }

    #[test]
    fn rendering_is_idempotent() {
        let node = Node::from(json!({"a": [1, {"b": "c"}], "d": 0.5}));
        let printer = TreePrinter::plain();
        let first = printer.render_to_string(&node);
        assert_eq!(first, printer.render_to_string(&node));
        assert!(!first.contains('\x1b'));
    }

    #[test]
    fn styles_wrap_each_token() {
        colored::control::set_override(true);
        let mut palette = Palette::plain();
        palette.key = Style::fg(Color::Blue);
        palette.numeric = Style::fg(Color::Red);
        let out = TreePrinter::new(palette).render_to_string(&Node::from(json!({"n": 7})));
        assert_eq!(out, "└── \x1b[34mn\x1b[0m: \x1b[31m7\x1b[0m\n");
    }

    #[test]
    fn other_values_stay_unstyled() {
        colored::control::set_override(true);
        let out = TreePrinter::default().render_to_string(&Node::other("<obj>"));
        assert_eq!(out, "<obj>\n");
    }

    struct Broken;

    impl Write for Broken {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn writer_errors_propagate() {
        let err = TreePrinter::plain()
            .render(&Node::from(json!({"a": 1})), &mut Broken)
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    }
}
