#![cfg(all(feature = "derive", feature = "schemars"))]

use assert2::{assert, let_assert};
use serde_json::json;

#[derive(Debug, PartialEq, serde::Serialize, serde::Deserialize, schemars::JsonSchema)]
struct TextMessage {
	text: String,
}

#[derive(Debug, PartialEq, serde::Serialize, serde::Deserialize, schemars::JsonSchema)]
struct MediaMessage {
	url: String,
}

#[derive(Debug, PartialEq, serde_flat_tag::FlatTag, serde_flat_tag::JsonSchema)]
#[allow(non_camel_case_types)]
enum Message {
	text(TextMessage),
	media(MediaMessage),
}

#[track_caller]
fn schema<T: schemars::JsonSchema>() -> serde_json::Value {
	let schema = schemars::schema_for!(T);
	let_assert!(Ok(value) = serde_json::to_value(schema));
	value
}

#[test]
fn tag_field_is_required_string_enum() {
	let schema = schema::<Message>();
	assert!(schema["title"] == "Message");
	assert!(schema["type"] == "object");
	assert!(schema["required"] == json!(["type"]));
	assert!(schema["properties"]["type"] == json!({
		"type": "string",
		"enum": ["text", "media"],
	}));
}

#[test]
fn one_conditional_subschema_per_variant() {
	let schema = schema::<Message>();
	let_assert!(Some(all_of) = schema["allOf"].as_array());
	assert!(all_of.len() == 2);

	assert!(all_of[0]["if"]["properties"]["type"]["const"] == "text");
	assert!(all_of[0]["if"]["required"] == json!(["type"]));
	assert!(all_of[0]["then"]["$ref"] == "#/definitions/TextMessage");

	assert!(all_of[1]["if"]["properties"]["type"]["const"] == "media");
	assert!(all_of[1]["then"]["$ref"] == "#/definitions/MediaMessage");

	assert!(schema["definitions"]["TextMessage"]["required"] == json!(["text"]));
	assert!(schema["definitions"]["MediaMessage"]["required"] == json!(["url"]));
}

#[test]
fn single_variant_has_no_all_of() {
	#[derive(serde_flat_tag::FlatTag, serde_flat_tag::JsonSchema)]
	#[allow(non_camel_case_types, dead_code)]
	enum Single {
		text(TextMessage),
	}

	let schema = schema::<Single>();
	assert!(schema.get("allOf").is_none());
	assert!(schema["if"]["properties"]["type"]["const"] == "text");
	assert!(schema["then"]["$ref"] == "#/definitions/TextMessage");
}

#[test]
fn generic_enum_schema() {
	#[derive(serde::Serialize, serde::Deserialize, schemars::JsonSchema)]
	struct Wrapped<T> {
		inner: T,
	}

	#[derive(serde_flat_tag::FlatTag, serde_flat_tag::JsonSchema)]
	#[allow(dead_code)]
	enum Either<L, R> {
		Left(Wrapped<L>),
		Right(Wrapped<R>),
	}

	let schema = schema::<Either<u32, String>>();
	assert!(schema["properties"]["type"]["enum"] == json!(["Left", "Right"]));
	let_assert!(Some(all_of) = schema["allOf"].as_array());
	assert!(all_of.len() == 2);
}
