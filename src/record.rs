//! Serde adapter turning any `Serialize` value into a [`Node`].
//!
//! Structs become mappings of field name to value in declaration order.
//! Floats stay floats (including `nan` and `inf`) and 128-bit integers stay
//! numeric. Enums use the externally tagged layout: a unit variant is its name,
//! every other variant is a one-entry mapping keyed by the variant name.

use crate::error::TreeError;
use crate::node::{Node, Number, Scalar};
use serde::ser::{self, Serialize};

type Result<T> = std::result::Result<T, TreeError>;

pub struct NodeSerializer;

fn int(v: i64) -> Result<Node> {
    Ok(Node::Scalar(Scalar::Number(Number::Int(v))))
}

fn uint(v: u64) -> Result<Node> {
    Ok(Node::Scalar(Scalar::Number(Number::UInt(v))))
}

fn tagged(variant: &'static str, value: Node) -> Node {
    Node::Mapping(vec![(variant.to_string(), value)])
}

/// Mapping keys must be scalars; they are shown in their unquoted text form.
fn key_text(key: Node) -> Result<String> {
    match key {
        Node::Scalar(Scalar::Str(s)) | Node::Scalar(Scalar::Other(s)) => Ok(s),
        Node::Scalar(s) => Ok(s.literal()),
        other => Err(TreeError::Record(format!(
            "map key must be a scalar, got a {}",
            other.kind().name()
        ))),
    }
}

fn insert(entries: &mut Vec<(String, Node)>, key: String, value: Node) {
    match entries.iter_mut().find(|(k, _)| *k == key) {
        Some(slot) => slot.1 = value,
        None => entries.push((key, value)),
    }
}

impl ser::Serializer for NodeSerializer {
    type Ok = Node;
    type Error = TreeError;

    type SerializeSeq = SeqBuilder;
    type SerializeTuple = SeqBuilder;
    type SerializeTupleStruct = SeqBuilder;
    type SerializeTupleVariant = TupleVariantBuilder;
    type SerializeMap = MapBuilder;
    type SerializeStruct = StructBuilder;
    type SerializeStructVariant = StructVariantBuilder;

    fn serialize_bool(self, v: bool) -> Result<Node> {
        Ok(Node::from(v))
    }

    fn serialize_i8(self, v: i8) -> Result<Node> {
        int(i64::from(v))
    }

    fn serialize_i16(self, v: i16) -> Result<Node> {
        int(i64::from(v))
    }

    fn serialize_i32(self, v: i32) -> Result<Node> {
        int(i64::from(v))
    }

    fn serialize_i64(self, v: i64) -> Result<Node> {
        int(v)
    }

    fn serialize_i128(self, v: i128) -> Result<Node> {
        match i64::try_from(v) {
            Ok(i) => int(i),
            Err(_) => Ok(Node::Scalar(Scalar::Number(Number::I128(v)))),
        }
    }

    fn serialize_u8(self, v: u8) -> Result<Node> {
        uint(u64::from(v))
    }

    fn serialize_u16(self, v: u16) -> Result<Node> {
        uint(u64::from(v))
    }

    fn serialize_u32(self, v: u32) -> Result<Node> {
        uint(u64::from(v))
    }

    fn serialize_u64(self, v: u64) -> Result<Node> {
        uint(v)
    }

    fn serialize_u128(self, v: u128) -> Result<Node> {
        match u64::try_from(v) {
            Ok(u) => uint(u),
            Err(_) => Ok(Node::Scalar(Scalar::Number(Number::U128(v)))),
        }
    }

    fn serialize_f32(self, v: f32) -> Result<Node> {
        Ok(Node::from(f64::from(v)))
    }

    fn serialize_f64(self, v: f64) -> Result<Node> {
        Ok(Node::from(v))
    }

    fn serialize_char(self, v: char) -> Result<Node> {
        Ok(Node::from(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<Node> {
        Ok(Node::from(v))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Node> {
        Ok(Node::sequence(v.iter().map(|b| u64::from(*b))))
    }

    fn serialize_none(self) -> Result<Node> {
        Ok(Node::null())
    }

    fn serialize_some<T: ?Sized + Serialize>(self, value: &T) -> Result<Node> {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Node> {
        Ok(Node::null())
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Node> {
        Ok(Node::null())
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _index: u32,
        variant: &'static str,
    ) -> Result<Node> {
        Ok(Node::from(variant))
    }

    fn serialize_newtype_struct<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<Node> {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        _index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Node> {
        Ok(tagged(variant, value.serialize(NodeSerializer)?))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SeqBuilder> {
        Ok(SeqBuilder {
            items: Vec::with_capacity(len.unwrap_or(0)),
        })
    }

    fn serialize_tuple(self, len: usize) -> Result<SeqBuilder> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_struct(self, _name: &'static str, len: usize) -> Result<SeqBuilder> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<TupleVariantBuilder> {
        Ok(TupleVariantBuilder {
            variant,
            items: Vec::with_capacity(len),
        })
    }

    fn serialize_map(self, len: Option<usize>) -> Result<MapBuilder> {
        Ok(MapBuilder {
            entries: Vec::with_capacity(len.unwrap_or(0)),
            pending: None,
        })
    }

    fn serialize_struct(self, _name: &'static str, len: usize) -> Result<StructBuilder> {
        Ok(StructBuilder {
            entries: Vec::with_capacity(len),
        })
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<StructVariantBuilder> {
        Ok(StructVariantBuilder {
            variant,
            entries: Vec::with_capacity(len),
        })
    }
}

pub struct SeqBuilder {
    items: Vec<Node>,
}

impl ser::SerializeSeq for SeqBuilder {
    type Ok = Node;
    type Error = TreeError;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        self.items.push(value.serialize(NodeSerializer)?);
        Ok(())
    }

    fn end(self) -> Result<Node> {
        Ok(Node::Sequence(self.items))
    }
}

impl ser::SerializeTuple for SeqBuilder {
    type Ok = Node;
    type Error = TreeError;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<Node> {
        ser::SerializeSeq::end(self)
    }
}

impl ser::SerializeTupleStruct for SeqBuilder {
    type Ok = Node;
    type Error = TreeError;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<Node> {
        ser::SerializeSeq::end(self)
    }
}

pub struct TupleVariantBuilder {
    variant: &'static str,
    items: Vec<Node>,
}

impl ser::SerializeTupleVariant for TupleVariantBuilder {
    type Ok = Node;
    type Error = TreeError;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        self.items.push(value.serialize(NodeSerializer)?);
        Ok(())
    }

    fn end(self) -> Result<Node> {
        Ok(tagged(self.variant, Node::Sequence(self.items)))
    }
}

pub struct MapBuilder {
    entries: Vec<(String, Node)>,
    pending: Option<String>,
}

impl ser::SerializeMap for MapBuilder {
    type Ok = Node;
    type Error = TreeError;

    fn serialize_key<T: ?Sized + Serialize>(&mut self, key: &T) -> Result<()> {
        self.pending = Some(key_text(key.serialize(NodeSerializer)?)?);
        Ok(())
    }

    fn serialize_value<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        let Some(key) = self.pending.take() else {
            return Err(TreeError::Record("map value without a key".into()));
        };
        let value = value.serialize(NodeSerializer)?;
        insert(&mut self.entries, key, value);
        Ok(())
    }

    fn end(self) -> Result<Node> {
        Ok(Node::Mapping(self.entries))
    }
}

pub struct StructBuilder {
    entries: Vec<(String, Node)>,
}

impl ser::SerializeStruct for StructBuilder {
    type Ok = Node;
    type Error = TreeError;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<()> {
        let value = value.serialize(NodeSerializer)?;
        insert(&mut self.entries, key.to_string(), value);
        Ok(())
    }

    fn end(self) -> Result<Node> {
        Ok(Node::Mapping(self.entries))
    }
}

pub struct StructVariantBuilder {
    variant: &'static str,
    entries: Vec<(String, Node)>,
}

impl ser::SerializeStructVariant for StructVariantBuilder {
    type Ok = Node;
    type Error = TreeError;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<()> {
        let value = value.serialize(NodeSerializer)?;
        insert(&mut self.entries, key.to_string(), value);
        Ok(())
    }

    fn end(self) -> Result<Node> {
        Ok(tagged(self.variant, Node::Mapping(self.entries)))
    }
}
