use proc_macro2::TokenStream;
use quote::quote;

use crate::input::{EnumAttributes, FlatEnum};
use crate::Context;

mod deserialize;
mod serialize;
mod tag;

#[cfg(feature = "schemars")]
mod json_schema;

/// The name of the field holding the variant tag.
const TAG_FIELD_NAME: &str = "type";

/// Generate the full flat tagged representation for an enum.
///
/// This produces the tag field constant, the tag enum,
/// the `Serialize` and `Deserialize` impls and the `FlatTag` marker impl.
///
/// An enum without variants produces no output at all.
pub fn expand_flat_tag(context: &mut Context, tokens: TokenStream) -> TokenStream {
	let Some(item) = parse_flat_enum(context, tokens) else {
		return TokenStream::new();
	};
	if item.variants.is_empty() {
		return TokenStream::new();
	}

	let tag_field = tag_field_const();
	let tag_enum = tag::make_tag_enum(context, &item);
	let serialize = serialize::impl_serialize_enum(context, &item);
	let deserialize = deserialize::impl_deserialize_enum(context, &item);
	let conformance = impl_flat_tag(context, &item);

	quote! {
		#[doc(hidden)]
		#[allow(non_camel_case_types, non_upper_case_globals, unused_qualifications, clippy::all)]
		const _: () = {
			const #tag_field: &::core::primitive::str = #TAG_FIELD_NAME;

			#tag_enum
			#serialize
			#deserialize
		};

		#conformance
	}
}

/// Generate a `schemars::JsonSchema` impl for an enum in the flat tagged representation.
#[cfg(feature = "schemars")]
pub fn expand_json_schema(context: &mut Context, tokens: TokenStream) -> TokenStream {
	let Some(item) = parse_flat_enum(context, tokens) else {
		return TokenStream::new();
	};
	if item.variants.is_empty() {
		return TokenStream::new();
	}
	json_schema::impl_json_schema(context, &item)
}

/// Parse and validate the derive input.
///
/// Also applies a `#[flat_tag(crate = "...")]` override to the context.
fn parse_flat_enum(context: &mut Context, tokens: TokenStream) -> Option<FlatEnum> {
	let input: syn::DeriveInput = match syn::parse2(tokens) {
		Ok(x) => x,
		Err(e) => {
			context.syn_error(e);
			return None;
		},
	};

	let attr = EnumAttributes::from_syn(context, &input.attrs);
	if let Some(crate_name) = attr.crate_path(context) {
		context.set_crate_name(crate_name);
	}

	match FlatEnum::from_derive_input(input) {
		Ok(x) => Some(x),
		Err(e) => {
			context.syn_error(e);
			None
		},
	}
}

/// The name of the constant holding the tag field name.
fn tag_field_const() -> syn::Ident {
	syn::Ident::new("__FLAT_TAG_FIELD", proc_macro2::Span::call_site())
}

/// The name of the generated tag enum.
///
/// Prefixed to stay out of the way of the payload types, which are also named inside the generated scope.
fn tag_enum_name(item: &FlatEnum) -> syn::Ident {
	quote::format_ident!("__{}FlatTag", item.ident)
}

/// Declare that the enum implements the `FlatTag` marker trait.
fn impl_flat_tag(context: &Context, item: &FlatEnum) -> TokenStream {
	let krate = &context.krate;
	let enum_name = &item.ident;
	let (impl_generics, type_generics, where_clause) = item.generics.split_for_impl();
	quote! {
		#[automatically_derived]
		impl #impl_generics #krate::FlatTag for #enum_name #type_generics #where_clause {}
	}
}
