#![cfg(feature = "derive")]

use assert2::{assert, let_assert};
use serde_flat_tag::FlatTag;

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
struct TextMessage {
	text: String,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
struct MediaMessage {
	url: String,
}

#[derive(Debug, Clone, PartialEq, serde_flat_tag::FlatTag)]
#[allow(non_camel_case_types)]
enum Message {
	text(TextMessage),
	media(MediaMessage),
}

mod reexport {
	pub use serde_flat_tag as flat;
}

#[track_caller]
fn json<T: serde::Serialize>(value: T) -> String {
	let_assert!(Ok(json) = serde_json::to_string(&value));
	json
}

#[track_caller]
fn parse<T: serde::de::DeserializeOwned + std::fmt::Debug>(data: &str) -> T {
	let_assert!(Ok(value) = serde_json::from_str(data));
	value
}

#[track_caller]
fn keys(value: &serde_json::Value) -> Vec<&str> {
	let_assert!(Some(object) = value.as_object());
	let mut keys: Vec<_> = object.keys().map(|x| x.as_str()).collect();
	keys.sort();
	keys
}

#[test]
fn deserialize_message_list() {
	let data = r#"[
		{
			"type": "text",
			"text": "Hello world"
		},
		{
			"type": "media",
			"url": "https://example.com/image.png"
		}
	]"#;
	let messages: Vec<Message> = parse(data);
	assert!(messages.len() == 2);
	assert!(messages[0] == Message::text(TextMessage { text: "Hello world".into() }));
	assert!(messages[1] == Message::media(MediaMessage { url: "https://example.com/image.png".into() }));

	let reencoded: serde_json::Value = parse(&json(&messages));
	let original: serde_json::Value = parse(data);
	assert!(reencoded == original);
}

#[test]
fn serialize_flattens_payload() {
	assert!(json(Message::text(TextMessage { text: "Hello world".into() })) == r#"{"type":"text","text":"Hello world"}"#);
	assert!(json(Message::media(MediaMessage { url: "https://example.com/image.png".into() })) == r#"{"type":"media","url":"https://example.com/image.png"}"#);
}

#[test]
fn round_trip() {
	let messages = [
		Message::text(TextMessage { text: "".into() }),
		Message::text(TextMessage { text: "type".into() }),
		Message::media(MediaMessage { url: "https://example.com/".into() }),
	];
	for message in messages {
		let encoded = json(&message);
		let decoded: Message = parse(&encoded);
		assert!(decoded == message);
	}
}

#[test]
fn key_set_is_tag_and_payload_fields() {
	#[derive(Debug, PartialEq, serde::Serialize, serde::Deserialize)]
	struct Point {
		x: i32,
		y: i32,
		label: Option<String>,
	}

	#[derive(Debug, PartialEq, serde_flat_tag::FlatTag)]
	enum Shape {
		Point(Point),
		Text(TextMessage),
	}

	let value = serde_json::to_value(Shape::Point(Point { x: 1, y: -2, label: None }));
	let_assert!(Ok(value) = value);
	assert!(keys(&value) == ["label", "type", "x", "y"]);
	assert!(value["type"] == "Point");

	let value = serde_json::to_value(Shape::Text(TextMessage { text: "hi".into() }));
	let_assert!(Ok(value) = value);
	assert!(keys(&value) == ["text", "type"]);
}

#[test]
fn tag_is_variant_name_as_written() {
	#[derive(Debug, PartialEq, serde_flat_tag::FlatTag)]
	enum Event {
		MessageSent(TextMessage),
		MediaShared(MediaMessage),
	}

	assert!(json(Event::MessageSent(TextMessage { text: "a".into() })) == r#"{"type":"MessageSent","text":"a"}"#);
	let event: Event = parse(r#"{"type":"MediaShared","url":"b"}"#);
	assert!(event == Event::MediaShared(MediaMessage { url: "b".into() }));
}

#[test]
fn tag_field_may_appear_anywhere() {
	let message: Message = parse(r#"{"text":"Hello world","type":"text"}"#);
	assert!(message == Message::text(TextMessage { text: "Hello world".into() }));
}

#[test]
fn payload_sees_tag_field() {
	#[derive(Debug, PartialEq, serde::Serialize, serde::Deserialize)]
	struct Tagged {
		#[serde(rename = "type", skip_serializing)]
		kind: String,
		value: u32,
	}

	#[derive(Debug, PartialEq, serde_flat_tag::FlatTag)]
	#[allow(non_camel_case_types)]
	enum Wrapper {
		number(Tagged),
	}

	let wrapper: Wrapper = parse(r#"{"type":"number","value":5}"#);
	assert!(wrapper == Wrapper::number(Tagged { kind: "number".into(), value: 5 }));
	assert!(json(&wrapper) == r#"{"type":"number","value":5}"#);
}

#[test]
fn named_field_variant() {
	#[derive(Debug, PartialEq, serde_flat_tag::FlatTag)]
	#[allow(non_camel_case_types)]
	enum Message {
		text { message: TextMessage },
		media(MediaMessage),
	}

	let message = Message::text { message: TextMessage { text: "hi".into() } };
	assert!(json(&message) == r#"{"type":"text","text":"hi"}"#);
	let decoded: Message = parse(r#"{"type":"text","text":"hi"}"#);
	assert!(decoded == message);
}

#[test]
fn payload_named_like_generated_items() {
	#[derive(Debug, PartialEq, serde::Serialize, serde::Deserialize)]
	struct Tag {
		name: String,
	}

	#[derive(Debug, PartialEq, serde::Serialize, serde::Deserialize)]
	struct Visitor {
		id: u64,
	}

	#[derive(Debug, PartialEq, serde_flat_tag::FlatTag)]
	enum Label {
		Tag(Tag),
		Visitor(Visitor),
	}

	let label = Label::Tag(Tag { name: "important".into() });
	assert!(json(&label) == r#"{"type":"Tag","name":"important"}"#);
	let decoded: Label = parse(r#"{"type":"Visitor","id":7}"#);
	assert!(decoded == Label::Visitor(Visitor { id: 7 }));
}

#[test]
fn map_payload() {
	use std::collections::BTreeMap;

	#[derive(Debug, PartialEq, serde_flat_tag::FlatTag)]
	#[allow(non_camel_case_types)]
	enum Value {
		attributes(BTreeMap<String, serde_json::Value>),
	}

	let mut attributes = BTreeMap::new();
	attributes.insert("color".to_string(), serde_json::json!("red"));
	attributes.insert("size".to_string(), serde_json::json!(3));
	let value = Value::attributes(attributes);
	assert!(json(&value) == r#"{"type":"attributes","color":"red","size":3}"#);

	// The tag field is part of the payload map too.
	let Value::attributes(decoded) = parse::<Value>(r#"{"type":"attributes","size":3}"#);
	assert!(decoded.len() == 2);
	assert!(decoded["type"] == "attributes");
	assert!(decoded["size"] == 3);
}

#[test]
fn payload_with_flattened_fields() {
	#[derive(Debug, PartialEq, serde::Serialize, serde::Deserialize)]
	struct Envelope {
		id: u32,
		#[serde(flatten)]
		extra: std::collections::BTreeMap<String, u32>,
	}

	#[derive(Debug, PartialEq, serde_flat_tag::FlatTag)]
	enum Packet {
		Envelope(Envelope),
	}

	let mut extra = std::collections::BTreeMap::new();
	extra.insert("priority".to_string(), 2);
	let packet = Packet::Envelope(Envelope { id: 1, extra });
	assert!(json(&packet) == r#"{"type":"Envelope","id":1,"priority":2}"#);
}

#[test]
fn boxed_payload() {
	#[derive(Debug, PartialEq, serde_flat_tag::FlatTag)]
	#[allow(non_camel_case_types)]
	enum Message {
		text(Box<TextMessage>),
	}

	let message = Message::text(Box::new(TextMessage { text: "boxed".into() }));
	assert!(json(&message) == r#"{"type":"text","text":"boxed"}"#);
	assert!(parse::<Message>(r#"{"type":"text","text":"boxed"}"#) == message);
}

#[test]
fn raw_identifier_variant() {
	#[derive(Debug, PartialEq, serde_flat_tag::FlatTag)]
	#[allow(non_camel_case_types)]
	enum Keyword {
		r#type(TextMessage),
		r#match(MediaMessage),
	}

	let value = Keyword::r#type(TextMessage { text: "x".into() });
	assert!(json(&value) == r#"{"type":"type","text":"x"}"#);
	assert!(parse::<Keyword>(r#"{"type":"type","text":"x"}"#) == value);
	assert!(parse::<Keyword>(r#"{"url":"y","type":"match"}"#) == Keyword::r#match(MediaMessage { url: "y".into() }));
}

#[test]
fn optional_payload() {
	#[derive(Debug, PartialEq, serde_flat_tag::FlatTag)]
	#[allow(non_camel_case_types)]
	enum Message {
		text(Option<TextMessage>),
	}

	let message = Message::text(Some(TextMessage { text: "maybe".into() }));
	assert!(json(&message) == r#"{"type":"text","text":"maybe"}"#);
	assert!(parse::<Message>(r#"{"type":"text","text":"maybe"}"#) == message);
}

#[test]
fn payload_with_nested_values() {
	#[derive(Debug, PartialEq, serde::Serialize, serde::Deserialize)]
	enum Priority {
		Low,
		High(u8),
	}

	#[derive(Debug, PartialEq, serde::Serialize, serde::Deserialize)]
	struct Task {
		id: u128,
		delta: i128,
		ratio: f32,
		tags: Vec<String>,
		priority: Priority,
		fallback: Priority,
		note: Option<String>,
	}

	#[derive(Debug, PartialEq, serde_flat_tag::FlatTag)]
	#[allow(non_camel_case_types)]
	enum Message {
		task(Task),
	}

	let message = Message::task(Task {
		id: u64::MAX.into(),
		delta: i64::MIN.into(),
		ratio: 0.5,
		tags: vec!["a".into(), "b".into()],
		priority: Priority::High(3),
		fallback: Priority::Low,
		note: None,
	});
	let encoded = json(&message);
	assert!(encoded == r#"{"type":"task","id":18446744073709551615,"delta":-9223372036854775808,"ratio":0.5,"tags":["a","b"],"priority":{"High":3},"fallback":"Low","note":null}"#);
	assert!(parse::<Message>(&encoded) == message);
}

#[test]
fn generic_enum() {
	#[derive(Debug, PartialEq, serde::Serialize, serde::Deserialize)]
	struct Wrapped<T> {
		inner: T,
	}

	#[derive(Debug, PartialEq, serde_flat_tag::FlatTag)]
	enum Either<L, R> {
		Left(Wrapped<L>),
		Right(Wrapped<R>),
		Text(TextMessage),
	}

	let value: Either<u8, String> = Either::Left(Wrapped { inner: 3 });
	assert!(json(&value) == r#"{"type":"Left","inner":3}"#);

	let value: Either<u8, String> = parse(r#"{"type":"Right","inner":"hello"}"#);
	assert!(value == Either::Right(Wrapped { inner: "hello".to_string() }));
}

#[test]
fn generic_enum_with_lifetime() {
	#[derive(Debug, PartialEq, serde::Serialize, serde::Deserialize)]
	struct Named<'a> {
		name: std::borrow::Cow<'a, str>,
	}

	#[derive(Debug, PartialEq, serde_flat_tag::FlatTag)]
	enum Entry<'a> {
		Named(Named<'a>),
	}

	let entry = Entry::Named(Named { name: "borrowed".into() });
	assert!(json(&entry) == r#"{"type":"Named","name":"borrowed"}"#);
	let decoded: Entry<'static> = parse(r#"{"type":"Named","name":"owned"}"#);
	assert!(decoded == Entry::Named(Named { name: "owned".into() }));
}

#[test]
fn implements_marker_trait() {
	fn tag_field<T: FlatTag>() -> &'static str {
		T::TAG_FIELD
	}
	assert!(tag_field::<Message>() == "type");
}

#[test]
fn crate_path_override() {
	#[derive(Debug, PartialEq, serde_flat_tag::FlatTag)]
	#[flat_tag(crate = "crate::reexport::flat")]
	#[allow(non_camel_case_types)]
	enum Message {
		text(TextMessage),
	}

	let message = Message::text(TextMessage { text: "hi".into() });
	assert!(json(&message) == r#"{"type":"text","text":"hi"}"#);
	assert!(parse::<Message>(r#"{"type":"text","text":"hi"}"#) == message);
}

#[test]
fn empty_enum_is_accepted() {
	#[derive(serde_flat_tag::FlatTag)]
	#[allow(dead_code)]
	enum Never {}
}
