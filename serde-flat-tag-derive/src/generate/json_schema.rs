use proc_macro2::TokenStream;
use quote::quote;

use crate::input::FlatEnum;
use crate::{util, Context};

/// Generate code that implement the `schemars::JsonSchema` trait for an enum using the flat tag format.
///
/// The schema describes an object with a required tag field,
/// and one `if`/`then` subschema per variant that applies the schema of the payload to the same object.
pub fn impl_json_schema(context: &Context, item: &FlatEnum) -> TokenStream {
	let internal = &context.internal;
	let schemars = &context.schemars;
	let tag_field_name = super::TAG_FIELD_NAME;

	let ty = &item.ident;
	let schema_name = ty.to_string();
	let tag_value: Vec<_> = item.variants.iter().map(|x| x.tag_value()).collect();
	let payload_type: Vec<_> = item.variants.iter().map(|x| &x.payload).collect();
	let variant_count = item.variants.len();

	let (impl_generics, type_generics, _where_clause) = item.generics.split_for_impl();
	let where_clause = make_where_clause(context, item);

	quote! {
		#[automatically_derived]
		impl #impl_generics #schemars::JsonSchema for #ty #type_generics #where_clause {
			fn schema_name() -> ::std::string::String {
				#internal::string(#schema_name)
			}

			fn schema_id() -> ::std::borrow::Cow<'static, ::core::primitive::str> {
				::std::borrow::Cow::Borrowed(::core::any::type_name::<Self>())
			}

			fn json_schema(generator: &mut #schemars::gen::SchemaGenerator) -> #schemars::schema::Schema {
				let mut variants = ::std::vec::Vec::with_capacity(#variant_count);
				#(
					variants.push(#internal::variant_subschema(
						#tag_field_name,
						#tag_value,
						generator.subschema_for::<#payload_type>(),
					));
				)*
				#internal::flat_enum_schema(#tag_field_name, &[#(#tag_value),*], variants)
			}
		}
	}
}

fn make_where_clause(context: &Context, item: &FlatEnum) -> Option<syn::WhereClause> {
	let schemars = &context.schemars;

	let mut predicates = Vec::<syn::WherePredicate>::new();
	for variant in &item.variants {
		let ty = &variant.payload;
		if util::type_uses_generic(ty, &item.generics) {
			predicates.push(syn::parse_quote! {
				#ty: #schemars::JsonSchema
			})
		}
	}

	util::extend_where_clause(&item.generics, predicates)
}

#[cfg(test)]
mod test {
	use super::*;
	use assert2::{assert, let_assert};

	#[test]
	fn one_subschema_per_variant() {
		let_assert!(Ok(input) = syn::parse2::<syn::DeriveInput>(quote! {
			enum Message {
				text(TextMessage),
				media(MediaMessage),
			}
		}));
		let_assert!(Ok(item) = FlatEnum::from_derive_input(input));
		let context = Context::new(crate::crate_name());
		let output = impl_json_schema(&context, &item);
		let_assert!(Ok(_) = syn::parse2::<syn::ItemImpl>(output.clone()));

		let output = output.to_string();
		assert!(output.matches("variant_subschema").count() == 2);
		let text = output.find("subschema_for :: < TextMessage >");
		let media = output.find("subschema_for :: < MediaMessage >");
		let_assert!((Some(text), Some(media)) = (text, media));
		assert!(text < media);
	}
}
