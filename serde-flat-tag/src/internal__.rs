//! Internal utilities for use by the derive macros.
//!
//! Do not call these directly, as they may be changed without matching semver bump.

#![deny(missing_docs)]

pub use ::serde;

#[cfg(feature = "schemars")]
pub use ::schemars;

use serde::de::DeserializeOwned;
use serde::ser::SerializeMap;

use crate::content::{Content, ContentDeserializer};

/// Convert a value into a [`String`].
pub fn string(input: impl Into<String>) -> String {
	input.into()
}

/// The buffered content of a flat tagged map.
///
/// The tag field can be read on its own with [`Self::decode_tag`],
/// after which the whole map (including the tag field) is given to the payload with [`Self::decode_payload`].
///
/// Values are buffered without loss for any self-describing format:
/// integers keep their width, and bytes and non-string keys are kept as they are.
pub struct FlatContent {
	entries: Vec<(Content, Content)>,
}

impl<'de> serde::Deserialize<'de> for FlatContent {
	fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		struct Visitor;

		impl<'de> serde::de::Visitor<'de> for Visitor {
			type Value = FlatContent;

			fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
				formatter.write_str("a map with a tag field")
			}

			fn visit_map<A: serde::de::MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
				let mut entries: Vec<(Content, Content)> = Vec::with_capacity(map.size_hint().unwrap_or(0).min(4096));
				while let Some((key, value)) = map.next_entry::<Content, Content>()? {
					if let Some(name) = key.as_str() {
						if entries.iter().any(|(x, _)| x.as_str() == Some(name)) {
							return Err(serde::de::Error::custom(format_args!("duplicate field `{name}`")));
						}
					}
					entries.push((key, value));
				}
				Ok(FlatContent { entries })
			}
		}

		deserializer.deserialize_map(Visitor)
	}
}

impl FlatContent {
	/// Deserialize the tag field only.
	///
	/// Fails with a missing field error if the tag field is not present.
	pub fn decode_tag<Tag, E>(&self, tag_field: &'static str) -> Result<Tag, E>
	where
		Tag: DeserializeOwned,
		E: serde::de::Error,
	{
		let value = self.entries.iter()
			.find(|(key, _)| key.as_str() == Some(tag_field))
			.map(|(_, value)| value.clone())
			.ok_or_else(|| E::missing_field(tag_field))?;
		Tag::deserialize(ContentDeserializer::<E>::new(value))
	}

	/// Deserialize the entire map as the payload of a variant.
	pub fn decode_payload<'de, T, E>(self) -> Result<T, E>
	where
		T: serde::Deserialize<'de>,
		E: serde::de::Error,
	{
		T::deserialize(ContentDeserializer::<E>::new(Content::Map(self.entries)))
	}
}

/// Serializer that writes the fields of a struct or map into an already opened map.
///
/// Used to write the fields of a payload next to the tag field.
pub struct FlatMapSerializer<'a, M> {
	map: &'a mut M,
}

impl<'a, M: SerializeMap> FlatMapSerializer<'a, M> {
	/// Create a new serializer writing to `map`.
	pub fn new(map: &'a mut M) -> Self {
		Self { map }
	}
}

/// Create the error for payloads that have no fields to flatten.
fn unsupported<E: serde::ser::Error>(what: &str) -> E {
	E::custom(format_args!("can not flatten {what} into a tagged map, expected a struct or map"))
}

impl<'a, M: SerializeMap> serde::Serializer for FlatMapSerializer<'a, M> {
	type Ok = ();
	type Error = M::Error;

	type SerializeSeq = serde::ser::Impossible<(), M::Error>;
	type SerializeTuple = serde::ser::Impossible<(), M::Error>;
	type SerializeTupleStruct = serde::ser::Impossible<(), M::Error>;
	type SerializeTupleVariant = serde::ser::Impossible<(), M::Error>;
	type SerializeMap = FlatMapSerializeMap<'a, M>;
	type SerializeStruct = FlatMapSerializeStruct<'a, M>;
	type SerializeStructVariant = serde::ser::Impossible<(), M::Error>;

	fn serialize_bool(self, _value: bool) -> Result<(), M::Error> {
		Err(unsupported("a boolean"))
	}

	fn serialize_i8(self, _value: i8) -> Result<(), M::Error> {
		Err(unsupported("an integer"))
	}

	fn serialize_i16(self, _value: i16) -> Result<(), M::Error> {
		Err(unsupported("an integer"))
	}

	fn serialize_i32(self, _value: i32) -> Result<(), M::Error> {
		Err(unsupported("an integer"))
	}

	fn serialize_i64(self, _value: i64) -> Result<(), M::Error> {
		Err(unsupported("an integer"))
	}

	fn serialize_u8(self, _value: u8) -> Result<(), M::Error> {
		Err(unsupported("an integer"))
	}

	fn serialize_u16(self, _value: u16) -> Result<(), M::Error> {
		Err(unsupported("an integer"))
	}

	fn serialize_u32(self, _value: u32) -> Result<(), M::Error> {
		Err(unsupported("an integer"))
	}

	fn serialize_u64(self, _value: u64) -> Result<(), M::Error> {
		Err(unsupported("an integer"))
	}

	fn serialize_f32(self, _value: f32) -> Result<(), M::Error> {
		Err(unsupported("a float"))
	}

	fn serialize_f64(self, _value: f64) -> Result<(), M::Error> {
		Err(unsupported("a float"))
	}

	fn serialize_char(self, _value: char) -> Result<(), M::Error> {
		Err(unsupported("a char"))
	}

	fn serialize_str(self, _value: &str) -> Result<(), M::Error> {
		Err(unsupported("a string"))
	}

	fn serialize_bytes(self, _value: &[u8]) -> Result<(), M::Error> {
		Err(unsupported("a byte array"))
	}

	fn serialize_none(self) -> Result<(), M::Error> {
		Err(unsupported("`None`"))
	}

	fn serialize_some<T: ?Sized + serde::Serialize>(self, value: &T) -> Result<(), M::Error> {
		value.serialize(self)
	}

	fn serialize_unit(self) -> Result<(), M::Error> {
		Err(unsupported("a unit value"))
	}

	fn serialize_unit_struct(self, _name: &'static str) -> Result<(), M::Error> {
		Err(unsupported("a unit struct"))
	}

	fn serialize_unit_variant(self, _name: &'static str, _variant_index: u32, _variant: &'static str) -> Result<(), M::Error> {
		Err(unsupported("a unit variant"))
	}

	fn serialize_newtype_struct<T: ?Sized + serde::Serialize>(self, _name: &'static str, value: &T) -> Result<(), M::Error> {
		value.serialize(self)
	}

	fn serialize_newtype_variant<T: ?Sized + serde::Serialize>(
		self,
		_name: &'static str,
		_variant_index: u32,
		_variant: &'static str,
		_value: &T,
	) -> Result<(), M::Error> {
		Err(unsupported("a newtype variant"))
	}

	fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq, M::Error> {
		Err(unsupported("a sequence"))
	}

	fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple, M::Error> {
		Err(unsupported("a tuple"))
	}

	fn serialize_tuple_struct(self, _name: &'static str, _len: usize) -> Result<Self::SerializeTupleStruct, M::Error> {
		Err(unsupported("a tuple struct"))
	}

	fn serialize_tuple_variant(
		self,
		_name: &'static str,
		_variant_index: u32,
		_variant: &'static str,
		_len: usize,
	) -> Result<Self::SerializeTupleVariant, M::Error> {
		Err(unsupported("a tuple variant"))
	}

	fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap, M::Error> {
		Ok(FlatMapSerializeMap { map: self.map })
	}

	fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<Self::SerializeStruct, M::Error> {
		Ok(FlatMapSerializeStruct { map: self.map })
	}

	fn serialize_struct_variant(
		self,
		_name: &'static str,
		_variant_index: u32,
		_variant: &'static str,
		_len: usize,
	) -> Result<Self::SerializeStructVariant, M::Error> {
		Err(unsupported("a struct variant"))
	}
}

/// Forwards the entries of a payload map to the outer map.
pub struct FlatMapSerializeMap<'a, M> {
	map: &'a mut M,
}

impl<M: SerializeMap> SerializeMap for FlatMapSerializeMap<'_, M> {
	type Ok = ();
	type Error = M::Error;

	fn serialize_key<T: ?Sized + serde::Serialize>(&mut self, key: &T) -> Result<(), M::Error> {
		self.map.serialize_key(key)
	}

	fn serialize_value<T: ?Sized + serde::Serialize>(&mut self, value: &T) -> Result<(), M::Error> {
		self.map.serialize_value(value)
	}

	fn end(self) -> Result<(), M::Error> {
		Ok(())
	}
}

/// Forwards the fields of a payload struct to the outer map.
pub struct FlatMapSerializeStruct<'a, M> {
	map: &'a mut M,
}

impl<M: SerializeMap> serde::ser::SerializeStruct for FlatMapSerializeStruct<'_, M> {
	type Ok = ();
	type Error = M::Error;

	fn serialize_field<T: ?Sized + serde::Serialize>(&mut self, key: &'static str, value: &T) -> Result<(), M::Error> {
		self.map.serialize_entry(key, value)
	}

	fn end(self) -> Result<(), M::Error> {
		Ok(())
	}
}

/// Create a schema for an object with the given properties.
///
/// All properties will be required.
#[inline]
#[cfg(feature = "schemars")]
pub fn object_schema(properties: schemars::Map<String, schemars::schema::Schema>) -> schemars::schema::Schema {
	object_schema_object(properties).into()
}

#[cfg(feature = "schemars")]
fn object_schema_object(properties: schemars::Map<String, schemars::schema::Schema>) -> schemars::schema::SchemaObject {
	let required = properties.keys().cloned().collect();
	schemars::schema::SchemaObject {
		instance_type: Some(schemars::schema::SingleOrVec::Single(Box::new(schemars::schema::InstanceType::Object))),
		object: Some(Box::new(schemars::schema::ObjectValidation {
			properties,
			required,
			..Default::default()
		})),
		..Default::default()
	}
}

/// Create a schema for a constant string value.
#[inline]
#[cfg(feature = "schemars")]
pub fn const_string_value(value: &str) -> schemars::schema::Schema {
	schemars::schema::SchemaObject {
		instance_type: Some(schemars::schema::SingleOrVec::Single(Box::new(schemars::schema::InstanceType::String))),
		const_value: Some(value.into()),
		..Default::default()
	}.into()
}

/// Create a subschema for a variant.
///
/// If the tag field holds the variant name, the payload schema applies to the same object.
#[inline]
#[cfg(feature = "schemars")]
pub fn variant_subschema(
	tag_field_name: &'static str,
	variant_name: &str,
	payload_schema: schemars::schema::Schema,
) -> schemars::schema::SubschemaValidation {
	let mut if_properties = schemars::Map::new();
	if_properties.insert(tag_field_name.into(), const_string_value(variant_name));

	schemars::schema::SubschemaValidation {
		if_schema: Some(Box::new(object_schema(if_properties))),
		then_schema: Some(Box::new(payload_schema)),
		..Default::default()
	}
}

/// Create the schema for a flat tagged enum from the subschemas of the variants.
///
/// The tag field is a required string that must be one of `tag_values`.
#[cfg(feature = "schemars")]
pub fn flat_enum_schema(
	tag_field_name: &'static str,
	tag_values: &[&str],
	mut variants: Vec<schemars::schema::SubschemaValidation>,
) -> schemars::schema::Schema {
	let tag_schema: schemars::schema::Schema = schemars::schema::SchemaObject {
		instance_type: Some(schemars::schema::SingleOrVec::Single(Box::new(schemars::schema::InstanceType::String))),
		enum_values: Some(tag_values.iter().map(|&x| serde_json::Value::from(x)).collect()),
		..Default::default()
	}.into();

	let mut properties = schemars::Map::new();
	properties.insert(tag_field_name.into(), tag_schema);

	// One variant is used directly, multiple variants are combined with `allOf`.
	let subschemas = match variants.len() {
		0 => None,
		1 => Some(Box::new(variants.remove(0))),
		_ => Some(Box::new(schemars::schema::SubschemaValidation {
			all_of: Some(variants.into_iter().map(subschema_to_schema).collect()),
			..Default::default()
		})),
	};

	schemars::schema::SchemaObject {
		subschemas,
		..object_schema_object(properties)
	}.into()
}

/// Create a schema with the given subschema.
#[inline]
#[cfg(feature = "schemars")]
pub fn subschema_to_schema(subschema: schemars::schema::SubschemaValidation) -> schemars::schema::Schema {
	schemars::schema::SchemaObject {
		subschemas: Some(Box::new(subschema)),
		..Default::default()
	}.into()
}
