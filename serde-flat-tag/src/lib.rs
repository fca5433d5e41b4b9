//! Flat internally tagged enum representation for [`serde`].
//!
//! Each variant of the enum must hold exactly one value (the payload).
//! The enum is represented as a single map with a `type` field holding the variant name,
//! and all the fields of the payload flattened into the same map:
//!
//! ```
//! #[derive(Debug, PartialEq, serde::Serialize, serde::Deserialize)]
//! struct TextMessage {
//! 	text: String,
//! }
//!
//! #[derive(Debug, PartialEq, serde::Serialize, serde::Deserialize)]
//! struct MediaMessage {
//! 	url: String,
//! }
//!
//! #[derive(Debug, PartialEq, serde_flat_tag::FlatTag)]
//! #[allow(non_camel_case_types)]
//! enum Message {
//! 	text(TextMessage),
//! 	media(MediaMessage),
//! }
//!
//! let message = Message::text(TextMessage { text: "Hello world".into() });
//! let json = serde_json::to_string(&message).unwrap();
//! assert_eq!(json, r#"{"type":"text","text":"Hello world"}"#);
//!
//! let parsed: Message = serde_json::from_str(r#"{"type":"media","url":"https://example.com/image.png"}"#).unwrap();
//! assert_eq!(parsed, Message::media(MediaMessage { url: "https://example.com/image.png".into() }));
//! ```
//!
//! The tag value is always the name of the variant, exactly as written.
//!
//! When deserializing, the entire map is passed to the payload, including the `type` field.
//! Payload types must accept (or ignore) that field, so `#[serde(deny_unknown_fields)]` can not be used on them.
//!
//! The map is buffered before the payload is deserialized, which has some consequences:
//! * Payloads can not borrow from the input.
//! * Errors from the tag or the payload are raised after the whole map is read.
//!   Formats that report error positions, like `serde_json`, can not point at the offending value.
//! * Values are buffered through [`Deserializer::deserialize_any`](serde::Deserializer::deserialize_any),
//!   so they are kept as the format reports them.
//!   `serde_json` reports integers that do not fit in 64 bits as floating point numbers,
//!   so `u128` and `i128` payload fields only work within the 64-bit range in JSON.
//!   The same limit applies to `#[serde(tag = "...")]` and `#[serde(flatten)]`.
//!
//! When serializing, the payload must serialize as a struct or map.
//! Payloads without fields to flatten cause an error, both when serializing and deserializing.
//! This includes strings, numbers, sequences, unit structs, `()`, `None` and externally tagged enums.
//!
//! Variants may also use a single named field, like `Text { message: TextMessage }`.
//! Unit variants and variants with more than one field are rejected at compile time.

mod content;

#[doc(hidden)]
pub mod internal__;

/// Marker trait for enums that use the flat tagged representation.
///
/// Implemented by `#[derive(FlatTag)]`, together with [`serde::Serialize`] and [`serde::Deserialize`].
pub trait FlatTag {
	/// The name of the field that holds the variant name.
	const TAG_FIELD: &'static str = "type";
}

/// Derive [`serde::Serialize`], [`serde::Deserialize`] and [`FlatTag`] for an enum using the flat tagged format.
///
/// See the crate documentation for details on the serialization format.
///
/// The path to this crate used by the generated code can be changed with `#[flat_tag(crate = "...")]`.
#[cfg(feature = "derive")]
pub use serde_flat_tag_derive::FlatTag;

/// Derive [`schemars::JsonSchema`] for an enum using the flat tagged format.
///
/// See the crate documentation for details on the serialization format.
#[cfg(all(feature = "derive", feature = "schemars"))]
pub use serde_flat_tag_derive::JsonSchema;
