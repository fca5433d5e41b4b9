use proc_macro2::TokenStream;
use quote::ToTokens;

use crate::Context;

/// Parser for the arguments of a single `#[name(...)]` attribute.
pub struct AttrParser {
	arguments: TokenStream,
}

impl AttrParser {
	pub fn new(context: &mut Context, attribute: &syn::Attribute, ident: &str) -> Option<Self> {
		if !attribute.path().is_ident(ident) {
			return None;
		}
		match &attribute.meta {
			syn::Meta::List(meta) => Some(Self {
				arguments: meta.tokens.clone(),
			}),
			_ => {
				context.spanned_error(attribute.path(), format_args!("expected #[{ident}(...)]"));
				None
			}
		}
	}

	pub fn parse<const N: usize>(&mut self, context: &mut Context, args: [&mut dyn AttributeArg; N]) {
		let mut args = args;
		'outer: while !self.arguments.is_empty() {
			for arg in &mut args {
				if arg.try_parse(context, self) {
					continue 'outer;
				}
			}
			self.parse_unrecognized_argument(context)
		}
	}

	fn parse_unrecognized_argument(&mut self, context: &mut Context) {
		let arguments = std::mem::take(&mut self.arguments);
		match syn::parse::Parser::parse2(parse_unrecognized_argument, arguments) {
			Err(e) => {
				context.syn_error(e);
			}
			Ok((ident, rest)) => {
				self.arguments = rest;
				context.error(ident.span(), format_args!("unrecognized attribute argument: {ident}"));
			}
		}
	}
}

/// A `key = value` attribute argument.
pub struct KeyValueArg<K, V> {
	pub key: K,
	pub value: V,
}

pub trait AttributeArg {
	fn try_parse(&mut self, context: &mut Context, parser: &mut AttrParser) -> bool;
}

impl<K, V> AttributeArg for Option<KeyValueArg<K, V>>
where
	K: syn::parse::Parse + ToTokens,
	V: syn::parse::Parse,
{
	fn try_parse(&mut self, context: &mut Context, parser: &mut AttrParser) -> bool {
		let arguments = std::mem::take(&mut parser.arguments);
		let (key, _eq, value) = match syn::parse::Parser::parse2(parse_key_value_attr_arg::<K, V>, arguments) {
			Ok((arg, rest)) => {
				parser.arguments = rest;
				match arg {
					Some(arg) => arg,
					None => return false,
				}
			},
			Err(e) => {
				context.syn_error(e);
				return false;
			}
		};

		if self.is_some() {
			context.spanned_error(&key, format_args!("attribute `{}` already set before", key.to_token_stream()));
			return true;
		}

		*self = Some(KeyValueArg {
			key,
			value,
		});
		true
	}
}

#[allow(clippy::type_complexity)]
fn parse_key_value_attr_arg<K, V>(input: &syn::parse::ParseBuffer) -> syn::Result<(Option<(K, syn::token::Eq, V)>, TokenStream)>
where
	K: syn::parse::Parse,
	V: syn::parse::Parse,
{
	// Input does NOT begin with the expected keyword.
	if input.fork().parse::<K>().is_err() {
		let rest = input.parse()?;
		return Ok((None, rest));
	}

	// Input DOES begin with the expected keyword.
	let key = input.parse()?;
	let eq = input.parse()?;
	let value = input.parse()?;

	// If the input is not empty now, we need a comma to separate the next argument.
	if !input.is_empty() {
		let _: syn::token::Comma = input.parse()?;
	}

	// Collect the remainder into a TokenStream again.
	let rest = input.parse()?;

	Ok((Some((key, eq, value)), rest))
}

fn parse_unrecognized_argument(input: &syn::parse::ParseBuffer) -> syn::Result<(syn::Ident, TokenStream)> {
	// Keywords like `type` or `crate` in the wrong position are arguments too.
	let ident = <syn::Ident as syn::ext::IdentExt>::parse_any(input)?;

	// Eat all token trees up to the next comma, and the comma itself.
	input.step(|cursor| {
		let mut cursor = *cursor;
		while let Some((next, rest)) = cursor.token_tree() {
			cursor = rest;
			if let proc_macro2::TokenTree::Punct(punct) = next {
				if punct.as_char() == ',' {
					return Ok(((), cursor));
				}
			}
		}
		Ok(((), cursor))
	})?;

	// Collect the remainder into a TokenStream again.
	let rest = input.parse()?;

	Ok((ident, rest))
}
