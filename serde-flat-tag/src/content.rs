//! In-memory buffer for any value of the serde data model.
//!
//! The tag of a flat tagged map can appear after the payload fields,
//! so the whole map has to be read before the payload type is known.

use std::marker::PhantomData;

use serde::de::value::{MapDeserializer, SeqDeserializer};
use serde::de::{IntoDeserializer, Unexpected};

/// A buffered value.
#[derive(Debug, Clone)]
pub(crate) enum Content {
	Bool(bool),

	U8(u8),
	U16(u16),
	U32(u32),
	U64(u64),
	U128(u128),

	I8(i8),
	I16(i16),
	I32(i32),
	I64(i64),
	I128(i128),

	F32(f32),
	F64(f64),

	Char(char),
	String(String),
	Bytes(Vec<u8>),

	None,
	Some(Box<Content>),

	Unit,
	Newtype(Box<Content>),
	Seq(Vec<Content>),
	Map(Vec<(Content, Content)>),
}

impl Content {
	pub fn as_str(&self) -> Option<&str> {
		match self {
			Self::String(x) => Some(x),
			_ => None,
		}
	}

	fn unexpected(&self) -> Unexpected<'_> {
		match self {
			Self::Bool(x) => Unexpected::Bool(*x),
			Self::U8(x) => Unexpected::Unsigned(u64::from(*x)),
			Self::U16(x) => Unexpected::Unsigned(u64::from(*x)),
			Self::U32(x) => Unexpected::Unsigned(u64::from(*x)),
			Self::U64(x) => Unexpected::Unsigned(*x),
			Self::U128(_) => Unexpected::Other("128-bit integer"),
			Self::I8(x) => Unexpected::Signed(i64::from(*x)),
			Self::I16(x) => Unexpected::Signed(i64::from(*x)),
			Self::I32(x) => Unexpected::Signed(i64::from(*x)),
			Self::I64(x) => Unexpected::Signed(*x),
			Self::I128(_) => Unexpected::Other("128-bit integer"),
			Self::F32(x) => Unexpected::Float(f64::from(*x)),
			Self::F64(x) => Unexpected::Float(*x),
			Self::Char(x) => Unexpected::Char(*x),
			Self::String(x) => Unexpected::Str(x),
			Self::Bytes(x) => Unexpected::Bytes(x),
			Self::None | Self::Some(_) => Unexpected::Option,
			Self::Unit => Unexpected::Unit,
			Self::Newtype(_) => Unexpected::NewtypeStruct,
			Self::Seq(_) => Unexpected::Seq,
			Self::Map(_) => Unexpected::Map,
		}
	}
}

impl<'de> serde::Deserialize<'de> for Content {
	fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		deserializer.deserialize_any(ContentVisitor)
	}
}

struct ContentVisitor;

impl<'de> serde::de::Visitor<'de> for ContentVisitor {
	type Value = Content;

	fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
		formatter.write_str("any value")
	}

	fn visit_bool<E: serde::de::Error>(self, value: bool) -> Result<Content, E> {
		Ok(Content::Bool(value))
	}

	fn visit_i8<E: serde::de::Error>(self, value: i8) -> Result<Content, E> {
		Ok(Content::I8(value))
	}

	fn visit_i16<E: serde::de::Error>(self, value: i16) -> Result<Content, E> {
		Ok(Content::I16(value))
	}

	fn visit_i32<E: serde::de::Error>(self, value: i32) -> Result<Content, E> {
		Ok(Content::I32(value))
	}

	fn visit_i64<E: serde::de::Error>(self, value: i64) -> Result<Content, E> {
		Ok(Content::I64(value))
	}

	fn visit_i128<E: serde::de::Error>(self, value: i128) -> Result<Content, E> {
		Ok(Content::I128(value))
	}

	fn visit_u8<E: serde::de::Error>(self, value: u8) -> Result<Content, E> {
		Ok(Content::U8(value))
	}

	fn visit_u16<E: serde::de::Error>(self, value: u16) -> Result<Content, E> {
		Ok(Content::U16(value))
	}

	fn visit_u32<E: serde::de::Error>(self, value: u32) -> Result<Content, E> {
		Ok(Content::U32(value))
	}

	fn visit_u64<E: serde::de::Error>(self, value: u64) -> Result<Content, E> {
		Ok(Content::U64(value))
	}

	fn visit_u128<E: serde::de::Error>(self, value: u128) -> Result<Content, E> {
		Ok(Content::U128(value))
	}

	fn visit_f32<E: serde::de::Error>(self, value: f32) -> Result<Content, E> {
		Ok(Content::F32(value))
	}

	fn visit_f64<E: serde::de::Error>(self, value: f64) -> Result<Content, E> {
		Ok(Content::F64(value))
	}

	fn visit_char<E: serde::de::Error>(self, value: char) -> Result<Content, E> {
		Ok(Content::Char(value))
	}

	fn visit_str<E: serde::de::Error>(self, value: &str) -> Result<Content, E> {
		Ok(Content::String(value.into()))
	}

	fn visit_string<E: serde::de::Error>(self, value: String) -> Result<Content, E> {
		Ok(Content::String(value))
	}

	fn visit_bytes<E: serde::de::Error>(self, value: &[u8]) -> Result<Content, E> {
		Ok(Content::Bytes(value.into()))
	}

	fn visit_byte_buf<E: serde::de::Error>(self, value: Vec<u8>) -> Result<Content, E> {
		Ok(Content::Bytes(value))
	}

	fn visit_none<E: serde::de::Error>(self) -> Result<Content, E> {
		Ok(Content::None)
	}

	fn visit_some<D: serde::Deserializer<'de>>(self, deserializer: D) -> Result<Content, D::Error> {
		let value = serde::Deserialize::deserialize(deserializer)?;
		Ok(Content::Some(Box::new(value)))
	}

	fn visit_unit<E: serde::de::Error>(self) -> Result<Content, E> {
		Ok(Content::Unit)
	}

	fn visit_newtype_struct<D: serde::Deserializer<'de>>(self, deserializer: D) -> Result<Content, D::Error> {
		let value = serde::Deserialize::deserialize(deserializer)?;
		Ok(Content::Newtype(Box::new(value)))
	}

	fn visit_seq<A: serde::de::SeqAccess<'de>>(self, mut seq: A) -> Result<Content, A::Error> {
		let mut elements = Vec::with_capacity(seq.size_hint().unwrap_or(0).min(4096));
		while let Some(element) = seq.next_element()? {
			elements.push(element);
		}
		Ok(Content::Seq(elements))
	}

	fn visit_map<A: serde::de::MapAccess<'de>>(self, mut map: A) -> Result<Content, A::Error> {
		let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0).min(4096));
		while let Some(entry) = map.next_entry()? {
			entries.push(entry);
		}
		Ok(Content::Map(entries))
	}
}

/// Deserializer that replays a buffered [`Content`].
pub(crate) struct ContentDeserializer<E> {
	content: Content,
	error: PhantomData<E>,
}

impl<E> ContentDeserializer<E> {
	pub fn new(content: Content) -> Self {
		Self {
			content,
			error: PhantomData,
		}
	}
}

impl<'de, E: serde::de::Error> IntoDeserializer<'de, E> for Content {
	type Deserializer = ContentDeserializer<E>;

	fn into_deserializer(self) -> Self::Deserializer {
		ContentDeserializer::new(self)
	}
}

fn visit_content_seq<'de, V, E>(elements: Vec<Content>, visitor: V) -> Result<V::Value, E>
where
	V: serde::de::Visitor<'de>,
	E: serde::de::Error,
{
	let mut seq = SeqDeserializer::<_, E>::new(elements.into_iter());
	let value = visitor.visit_seq(&mut seq)?;
	seq.end()?;
	Ok(value)
}

fn visit_content_map<'de, V, E>(entries: Vec<(Content, Content)>, visitor: V) -> Result<V::Value, E>
where
	V: serde::de::Visitor<'de>,
	E: serde::de::Error,
{
	let mut map: MapDeserializer<'de, _, E> = MapDeserializer::new(entries.into_iter());
	let value = visitor.visit_map(&mut map)?;
	map.end()?;
	Ok(value)
}

impl<'de, E: serde::de::Error> serde::Deserializer<'de> for ContentDeserializer<E> {
	type Error = E;

	fn deserialize_any<V: serde::de::Visitor<'de>>(self, visitor: V) -> Result<V::Value, E> {
		match self.content {
			Content::Bool(x) => visitor.visit_bool(x),
			Content::U8(x) => visitor.visit_u8(x),
			Content::U16(x) => visitor.visit_u16(x),
			Content::U32(x) => visitor.visit_u32(x),
			Content::U64(x) => visitor.visit_u64(x),
			Content::U128(x) => visitor.visit_u128(x),
			Content::I8(x) => visitor.visit_i8(x),
			Content::I16(x) => visitor.visit_i16(x),
			Content::I32(x) => visitor.visit_i32(x),
			Content::I64(x) => visitor.visit_i64(x),
			Content::I128(x) => visitor.visit_i128(x),
			Content::F32(x) => visitor.visit_f32(x),
			Content::F64(x) => visitor.visit_f64(x),
			Content::Char(x) => visitor.visit_char(x),
			Content::String(x) => visitor.visit_string(x),
			Content::Bytes(x) => visitor.visit_byte_buf(x),
			Content::None => visitor.visit_none(),
			Content::Some(x) => visitor.visit_some(ContentDeserializer::new(*x)),
			Content::Unit => visitor.visit_unit(),
			Content::Newtype(x) => visitor.visit_newtype_struct(ContentDeserializer::new(*x)),
			Content::Seq(x) => visit_content_seq(x, visitor),
			Content::Map(x) => visit_content_map(x, visitor),
		}
	}

	fn deserialize_option<V: serde::de::Visitor<'de>>(self, visitor: V) -> Result<V::Value, E> {
		match self.content {
			Content::None | Content::Unit => visitor.visit_none(),
			Content::Some(x) => visitor.visit_some(ContentDeserializer::new(*x)),
			_ => visitor.visit_some(self),
		}
	}

	fn deserialize_unit<V: serde::de::Visitor<'de>>(self, visitor: V) -> Result<V::Value, E> {
		match self.content {
			Content::Unit => visitor.visit_unit(),
			_ => self.deserialize_any(visitor),
		}
	}

	fn deserialize_unit_struct<V: serde::de::Visitor<'de>>(self, _name: &'static str, visitor: V) -> Result<V::Value, E> {
		self.deserialize_unit(visitor)
	}

	fn deserialize_newtype_struct<V: serde::de::Visitor<'de>>(self, _name: &'static str, visitor: V) -> Result<V::Value, E> {
		match self.content {
			Content::Newtype(x) => visitor.visit_newtype_struct(ContentDeserializer::new(*x)),
			_ => visitor.visit_newtype_struct(self),
		}
	}

	fn deserialize_enum<V: serde::de::Visitor<'de>>(
		self,
		_name: &'static str,
		_variants: &'static [&'static str],
		visitor: V,
	) -> Result<V::Value, E> {
		// Externally tagged: either a bare variant name, or a map with a single entry.
		let (variant, value) = match self.content {
			Content::String(_) => (self.content, None),
			Content::Map(entries) => {
				let mut entries = entries.into_iter();
				match (entries.next(), entries.next()) {
					(Some((variant, value)), None) => (variant, Some(value)),
					_ => return Err(E::invalid_value(Unexpected::Map, &"map with a single key")),
				}
			},
			other => return Err(E::invalid_type(other.unexpected(), &"string or map")),
		};
		visitor.visit_enum(EnumDeserializer {
			variant,
			value,
			error: PhantomData,
		})
	}

	serde::forward_to_deserialize_any! {
		bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
		bytes byte_buf seq tuple tuple_struct map struct identifier ignored_any
	}
}

struct EnumDeserializer<E> {
	variant: Content,
	value: Option<Content>,
	error: PhantomData<E>,
}

impl<'de, E: serde::de::Error> serde::de::EnumAccess<'de> for EnumDeserializer<E> {
	type Error = E;
	type Variant = VariantDeserializer<E>;

	fn variant_seed<V: serde::de::DeserializeSeed<'de>>(self, seed: V) -> Result<(V::Value, Self::Variant), E> {
		let variant = seed.deserialize(ContentDeserializer::<E>::new(self.variant))?;
		Ok((variant, VariantDeserializer { value: self.value, error: PhantomData }))
	}
}

struct VariantDeserializer<E> {
	value: Option<Content>,
	error: PhantomData<E>,
}

impl<'de, E: serde::de::Error> serde::de::VariantAccess<'de> for VariantDeserializer<E> {
	type Error = E;

	fn unit_variant(self) -> Result<(), E> {
		match self.value {
			None => Ok(()),
			Some(value) => serde::Deserialize::deserialize(ContentDeserializer::<E>::new(value)),
		}
	}

	fn newtype_variant_seed<T: serde::de::DeserializeSeed<'de>>(self, seed: T) -> Result<T::Value, E> {
		match self.value {
			Some(value) => seed.deserialize(ContentDeserializer::new(value)),
			None => Err(E::invalid_type(Unexpected::UnitVariant, &"newtype variant")),
		}
	}

	fn tuple_variant<V: serde::de::Visitor<'de>>(self, _len: usize, visitor: V) -> Result<V::Value, E> {
		match self.value {
			Some(Content::Seq(elements)) => visit_content_seq(elements, visitor),
			Some(other) => Err(E::invalid_type(other.unexpected(), &"tuple variant")),
			None => Err(E::invalid_type(Unexpected::UnitVariant, &"tuple variant")),
		}
	}

	fn struct_variant<V: serde::de::Visitor<'de>>(self, _fields: &'static [&'static str], visitor: V) -> Result<V::Value, E> {
		match self.value {
			Some(Content::Map(entries)) => visit_content_map(entries, visitor),
			Some(Content::Seq(elements)) => visit_content_seq(elements, visitor),
			Some(other) => Err(E::invalid_type(other.unexpected(), &"struct variant")),
			None => Err(E::invalid_type(Unexpected::UnitVariant, &"struct variant")),
		}
	}
}
