use crate::error::{Result, TreeError};
use crate::node::Kind;
use colored::{Color, ColoredString, Colorize};

/// Terminal style for one token. A default `Style` leaves text untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Style {
    pub color: Option<Color>,
    pub bold: bool,
    pub dimmed: bool,
    pub italic: bool,
}

impl Style {
    pub const fn plain() -> Self {
        Self {
            color: None,
            bold: false,
            dimmed: false,
            italic: false,
        }
    }

    pub const fn fg(color: Color) -> Self {
        Self {
            color: Some(color),
            bold: false,
            dimmed: false,
            italic: false,
        }
    }

    pub const fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn is_plain(&self) -> bool {
        *self == Self::plain()
    }

    /// Parses whitespace separated tokens: at most one color name (`red`,
    /// `bright_blue`, `bright blue`...) plus any of `bold`, `dimmed`, `italic`.
    /// `plain` or an empty string gives the plain style.
    pub fn parse(spec: &str) -> Result<Self> {
        let mut style = Self::plain();
        let mut tokens = spec.split_whitespace();
        while let Some(tok) = tokens.next() {
            let lower = tok.to_lowercase();
            match lower.as_str() {
                "plain" | "none" => {}
                "bold" => style.bold = true,
                "dimmed" | "dim" => style.dimmed = true,
                "italic" => style.italic = true,
                "bright" => {
                    let Some(next) = tokens.next() else {
                        return Err(TreeError::UnknownStyle(tok.to_string()));
                    };
                    style.color = Some(parse_color(&format!("bright {}", next))?);
                }
                other => style.color = Some(parse_color(other)?),
            }
        }
        Ok(style)
    }

    pub fn paint(&self, text: &str) -> ColoredString {
        let mut s = text.normal();
        if let Some(c) = self.color {
            s = s.color(c);
        }
        if self.bold {
            s = s.bold();
        }
        if self.dimmed {
            s = s.dimmed();
        }
        if self.italic {
            s = s.italic();
        }
        s
    }
}

fn parse_color(name: &str) -> Result<Color> {
    name.replace('_', " ")
        .parse::<Color>()
        .map_err(|_| TreeError::UnknownStyle(name.to_string()))
}

/// Style for every label and scalar classification.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    pub key: Style,
    pub item: Style,
    pub string: Style,
    pub null: Style,
    pub boolean: Style,
    pub numeric: Style,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            key: Style::fg(Color::Cyan),
            item: Style::fg(Color::Cyan),
            string: Style::fg(Color::Yellow),
            null: Style::fg(Color::Magenta),
            boolean: Style::fg(Color::Blue),
            numeric: Style::fg(Color::Green),
        }
    }
}

impl Palette {
    /// Bold labels, green strings and cyan numbers.
    pub fn vivid() -> Self {
        Self {
            key: Style::fg(Color::Blue).bold(),
            item: Style::fg(Color::Cyan).bold(),
            string: Style::fg(Color::Green),
            null: Style::fg(Color::Magenta),
            boolean: Style::fg(Color::Yellow),
            numeric: Style::fg(Color::Cyan),
        }
    }

    pub fn plain() -> Self {
        Self {
            key: Style::plain(),
            item: Style::plain(),
            string: Style::plain(),
            null: Style::plain(),
            boolean: Style::plain(),
            numeric: Style::plain(),
        }
    }

    pub fn preset(name: &str) -> Result<Self> {
        match name.to_lowercase().as_str() {
            "default" => Ok(Self::default()),
            "vivid" => Ok(Self::vivid()),
            "plain" | "mono" => Ok(Self::plain()),
            _ => Err(TreeError::UnknownPalette(name.to_string())),
        }
    }

    /// Style of a scalar leaf. Containers and opaque values are not styled.
    pub fn scalar_style(&self, kind: Kind) -> Option<&Style> {
        match kind {
            Kind::String => Some(&self.string),
            Kind::Null => Some(&self.null),
            Kind::Boolean => Some(&self.boolean),
            Kind::Numeric => Some(&self.numeric),
            Kind::Mapping | Kind::Sequence | Kind::Other => None,
        }
    }

    /// Replaces the style of a named slot (`key`, `item`, `string`, `null`,
    /// `boolean`, `numeric`).
    pub fn set(&mut self, slot: &str, style: Style) -> Result<()> {
        let target = match slot.to_lowercase().as_str() {
            "key" => &mut self.key,
            "item" => &mut self.item,
            "string" => &mut self.string,
            "null" | "none" => &mut self.null,
            "boolean" | "bool" => &mut self.boolean,
            "numeric" | "number" => &mut self.numeric,
            _ => return Err(TreeError::UnknownStyle(slot.to_string())),
        };
        *target = style;
        Ok(())
    }

    pub fn is_plain(&self) -> bool {
        *self == Self::plain()
    }
}
