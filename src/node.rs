//! Value model the tree printer walks.
//!
//! Every input, whatever its origin (JSON, YAML, a serde record or values
//! built by hand), is normalized into a [`Node`] first. The printer then only
//! has to deal with three shapes: mappings, sequences and scalars.

use crate::error::{Result, TreeError};
use crate::record::NodeSerializer;
use serde::Serialize;
use std::fmt;

/// Classification tag of a value. Drives both the container/leaf decision and
/// the style lookup in [`crate::style::Palette`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Mapping,
    Sequence,
    String,
    Null,
    Boolean,
    Numeric,
    Other,
}

impl Kind {
    pub const ALL: [Kind; 7] = [
        Kind::Mapping,
        Kind::Sequence,
        Kind::String,
        Kind::Null,
        Kind::Boolean,
        Kind::Numeric,
        Kind::Other,
    ];

    pub fn is_container(self) -> bool {
        matches!(self, Kind::Mapping | Kind::Sequence)
    }

    pub fn name(self) -> &'static str {
        match self {
            Kind::Mapping => "mapping",
            Kind::Sequence => "sequence",
            Kind::String => "string",
            Kind::Null => "null",
            Kind::Boolean => "boolean",
            Kind::Numeric => "numeric",
            Kind::Other => "other",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Int(i64),
    UInt(u64),
    /// Only for values outside the 64-bit ranges.
    I128(i128),
    U128(u128),
    Float(f64),
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Number::Int(i) => write!(f, "{}", i),
            Number::UInt(u) => write!(f, "{}", u),
            Number::I128(i) => write!(f, "{}", i),
            Number::U128(u) => write!(f, "{}", u),
            Number::Float(x) if x.is_nan() => f.write_str("nan"),
            Number::Float(x) if x.is_infinite() => {
                f.write_str(if x > 0.0 { "inf" } else { "-inf" })
            }
            // integral floats keep their fractional marker: 3.0, not 3
            Number::Float(x) if x.fract() == 0.0 && x.abs() < 1e16 => write!(f, "{:.1}", x),
            Number::Float(x) => write!(f, "{}", x),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Str(String),
    Null,
    Bool(bool),
    Number(Number),
    /// Opaque value, already in its default string form.
    Other(String),
}

impl Scalar {
    pub fn kind(&self) -> Kind {
        match self {
            Scalar::Str(_) => Kind::String,
            Scalar::Null => Kind::Null,
            Scalar::Bool(_) => Kind::Boolean,
            Scalar::Number(_) => Kind::Numeric,
            Scalar::Other(_) => Kind::Other,
        }
    }

    /// Text shown for the leaf, before styling.
    pub fn literal(&self) -> String {
        match self {
            Scalar::Str(s) => quote(s),
            Scalar::Null => "None".to_string(),
            Scalar::Bool(true) => "True".to_string(),
            Scalar::Bool(false) => "False".to_string(),
            Scalar::Number(n) => n.to_string(),
            Scalar::Other(s) => s.clone(),
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.literal())
    }
}

/// Quoted, escaped form of a string. Single quotes unless the text contains a
/// single quote and no double quote.
pub fn quote(s: &str) -> String {
    let q = if s.contains('\'') && !s.contains('"') {
        '"'
    } else {
        '\''
    };
    let mut out = String::with_capacity(s.len() + 2);
    out.push(q);
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == q => {
                out.push('\\');
                out.push(c);
            }
            c if c.is_control() => out.push_str(&format!("\\x{:02x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push(q);
    out
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Key/value pairs in insertion order.
    Mapping(Vec<(String, Node)>),
    Sequence(Vec<Node>),
    Scalar(Scalar),
}

impl Node {
    pub fn null() -> Self {
        Node::Scalar(Scalar::Null)
    }

    pub fn other(text: impl Into<String>) -> Self {
        Node::Scalar(Scalar::Other(text.into()))
    }

    pub fn mapping<K, V, I>(entries: I) -> Self
    where
        K: Into<String>,
        V: Into<Node>,
        I: IntoIterator<Item = (K, V)>,
    {
        Node::Mapping(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    pub fn sequence<V, I>(items: I) -> Self
    where
        V: Into<Node>,
        I: IntoIterator<Item = V>,
    {
        Node::Sequence(items.into_iter().map(Into::into).collect())
    }

    pub fn kind(&self) -> Kind {
        match self {
            Node::Mapping(_) => Kind::Mapping,
            Node::Sequence(_) => Kind::Sequence,
            Node::Scalar(s) => s.kind(),
        }
    }

    pub fn is_container(&self) -> bool {
        self.kind().is_container()
    }

    /// Converts a record-like value (any `Serialize` struct) into a mapping of
    /// field name to field value, keeping declaration order.
    pub fn from_record<T: Serialize + ?Sized>(record: &T) -> Result<Self> {
        let node = record.serialize(NodeSerializer)?;
        tracing::trace!(kind = node.kind().name(), "converted record");
        Ok(node)
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(s).map_err(TreeError::Json)?;
        Ok(Node::from(value))
    }

    pub fn from_yaml_str(s: &str) -> Result<Self> {
        let value: serde_yaml::Value = serde_yaml::from_str(s)?;
        Ok(Node::from(value))
    }
}

impl From<Scalar> for Node {
    fn from(s: Scalar) -> Self {
        Node::Scalar(s)
    }
}

impl From<&str> for Node {
    fn from(s: &str) -> Self {
        Node::Scalar(Scalar::Str(s.to_string()))
    }
}

impl From<String> for Node {
    fn from(s: String) -> Self {
        Node::Scalar(Scalar::Str(s))
    }
}

impl From<bool> for Node {
    fn from(b: bool) -> Self {
        Node::Scalar(Scalar::Bool(b))
    }
}

impl From<i32> for Node {
    fn from(i: i32) -> Self {
        Node::Scalar(Scalar::Number(Number::Int(i64::from(i))))
    }
}

impl From<i64> for Node {
    fn from(i: i64) -> Self {
        Node::Scalar(Scalar::Number(Number::Int(i)))
    }
}

impl From<u64> for Node {
    fn from(u: u64) -> Self {
        Node::Scalar(Scalar::Number(Number::UInt(u)))
    }
}

impl From<f64> for Node {
    fn from(x: f64) -> Self {
        Node::Scalar(Scalar::Number(Number::Float(x)))
    }
}

impl<T: Into<Node>> From<Option<T>> for Node {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(v) => v.into(),
            None => Node::null(),
        }
    }
}

impl<T: Into<Node>> From<Vec<T>> for Node {
    fn from(items: Vec<T>) -> Self {
        Node::sequence(items)
    }
}

impl From<serde_json::Value> for Node {
    fn from(v: serde_json::Value) -> Self {
        use serde_json::Value;
        match v {
            Value::Null => Node::null(),
            Value::Bool(b) => b.into(),
            Value::Number(n) => Node::Scalar(Scalar::Number(json_number(&n))),
            Value::String(s) => s.into(),
            Value::Array(a) => Node::Sequence(a.into_iter().map(Node::from).collect()),
            Value::Object(m) => Node::Mapping(m.into_iter().map(|(k, v)| (k, v.into())).collect()),
        }
    }
}

fn json_number(n: &serde_json::Number) -> Number {
    if let Some(i) = n.as_i64() {
        Number::Int(i)
    } else if let Some(u) = n.as_u64() {
        Number::UInt(u)
    } else {
        Number::Float(n.as_f64().unwrap_or(f64::NAN))
    }
}

impl From<serde_yaml::Value> for Node {
    fn from(v: serde_yaml::Value) -> Self {
        use serde_yaml::Value;
        match v {
            Value::Null => Node::null(),
            Value::Bool(b) => b.into(),
            Value::Number(n) => Node::Scalar(Scalar::Number(yaml_number(&n))),
            Value::String(s) => s.into(),
            Value::Sequence(items) => Node::Sequence(items.into_iter().map(Node::from).collect()),
            Value::Mapping(m) => Node::Mapping(
                m.into_iter()
                    .map(|(k, v)| (yaml_key(&k), Node::from(v)))
                    .collect(),
            ),
            Value::Tagged(tagged) => {
                let tag = tagged.tag.to_string();
                match Node::from(tagged.value) {
                    Node::Scalar(s) => Node::other(format!("{} {}", tag, s.literal())),
                    container => container,
                }
            }
        }
    }
}

fn yaml_number(n: &serde_yaml::Number) -> Number {
    if let Some(i) = n.as_i64() {
        Number::Int(i)
    } else if let Some(u) = n.as_u64() {
        Number::UInt(u)
    } else {
        Number::Float(n.as_f64().unwrap_or(f64::NAN))
    }
}

// YAML allows any value as a key; anything that is not a string falls back to
// its default string form.
fn yaml_key(k: &serde_yaml::Value) -> String {
    use serde_yaml::Value;
    match k {
        Value::String(s) => s.clone(),
        Value::Null => "None".to_string(),
        Value::Bool(b) => Scalar::Bool(*b).literal(),
        Value::Number(n) => yaml_number(n).to_string(),
        other => {
            tracing::debug!("non-scalar mapping key, using its YAML text");
            serde_yaml::to_string(other)
                .map(|s| s.trim_end().replace('\n', " "))
                .unwrap_or_else(|_| format!("{:?}", other))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn classify_every_shape() {
        assert_eq!(Node::mapping(Vec::<(String, Node)>::new()).kind(), Kind::Mapping);
        assert_eq!(Node::sequence(vec![1i64]).kind(), Kind::Sequence);
        assert_eq!(Node::from("x").kind(), Kind::String);
        assert_eq!(Node::null().kind(), Kind::Null);
        assert_eq!(Node::from(true).kind(), Kind::Boolean);
        assert_eq!(Node::from(1.5).kind(), Kind::Numeric);
        assert_eq!(Node::other("<obj>").kind(), Kind::Other);
        let containers: Vec<_> = Kind::ALL.iter().filter(|k| k.is_container()).collect();
        assert_eq!(containers, vec![&Kind::Mapping, &Kind::Sequence]);
        assert!(Node::from(json!({"a": 1})).is_container());
        assert!(Node::from(json!([])).is_container());
        assert!(!Node::from("x").is_container());
        assert!(!Node::null().is_container());
    }

    #[test]
    fn scalar_literals() {
        assert_eq!(Scalar::Str("x".into()).literal(), "'x'");
        assert_eq!(Scalar::Null.literal(), "None");
        assert_eq!(Scalar::Bool(true).literal(), "True");
        assert_eq!(Scalar::Bool(false).literal(), "False");
        assert_eq!(Scalar::Number(Number::Int(-42)).literal(), "-42");
        assert_eq!(Scalar::Number(Number::Float(3.0)).literal(), "3.0");
        assert_eq!(Scalar::Number(Number::Float(2.5)).literal(), "2.5");
        assert_eq!(Scalar::Number(Number::Float(f64::INFINITY)).literal(), "inf");
        assert_eq!(Scalar::Other("<obj>".into()).literal(), "<obj>");
    }

    #[test]
    fn quoting_escapes() {
        assert_eq!(quote("it's"), "\"it's\"");
        assert_eq!(quote("both ' and \""), "'both \\' and \"'");
        assert_eq!(quote("a\nb\tc\\"), "'a\\nb\\tc\\\\'");
        assert_eq!(quote("\u{1}"), "'\\x01'");
        assert_eq!(quote("héllo"), "'héllo'");
    }

    #[test]
    fn json_keeps_object_order() {
        let node = Node::from(json!({"z": 1, "a": [true, null], "m": {"k": "v"}}));
        let Node::Mapping(entries) = node else {
            panic!("expected mapping");
        };
        let keys: Vec<_> = entries.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
        assert_eq!(entries[1].1, Node::sequence(vec![Node::from(true), Node::null()]));
    }

    #[test]
    fn json_numbers() {
        assert_eq!(Node::from(json!(7)), Node::from(7i64));
        assert_eq!(Node::from(json!(u64::MAX)), Node::from(u64::MAX));
        assert_eq!(Node::from(json!(0.25)), Node::from(0.25));
    }

    #[test]
    fn yaml_non_string_keys_degrade() {
        let node = Node::from_yaml_str("1: one\ntrue: yes\n~: nothing\nname: x\n").unwrap();
        let Node::Mapping(entries) = node else {
            panic!("expected mapping");
        };
        let keys: Vec<_> = entries.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["1", "True", "None", "name"]);
    }

    #[test]
    fn yaml_tagged_scalar_is_opaque() {
        let node = Node::from_yaml_str("!Celsius 21").unwrap();
        assert_eq!(node, Node::other("!Celsius 21"));
    }

    #[derive(Serialize)]
    struct Point {
        y: i64,
        x: i64,
        label: Option<String>,
    }

    #[test]
    fn record_becomes_ordered_mapping() {
        let node = Node::from_record(&Point {
            y: 2,
            x: 1,
            label: None,
        })
        .unwrap();
        assert_eq!(
            node,
            Node::mapping(vec![
                ("y", Node::from(2i64)),
                ("x", Node::from(1i64)),
                ("label", Node::null()),
            ])
        );
    }

    #[test]
    fn record_with_non_string_keys_fails() {
        let mut m = std::collections::BTreeMap::new();
        m.insert(vec![1u8], 1);
        let err = Node::from_record(&m).unwrap_err();
        assert!(matches!(err, TreeError::Record(_)));
    }

    #[test]
    fn invalid_json_is_reported() {
        assert!(matches!(Node::from_json_str("{"), Err(TreeError::Json(_))));
    }
}
