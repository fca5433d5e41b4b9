use proc_macro2::TokenStream;
use quote::quote;

use crate::input::FlatEnum;
use crate::{util, Context};

/// Generate code that implement the serde `Deserialize` trait for an enum using the flat tag format.
///
/// The whole map is buffered once.
/// The tag is read from the buffered map, and then the entire map (tag included) is deserialized as the payload.
pub fn impl_deserialize_enum(context: &Context, item: &FlatEnum) -> TokenStream {
	let internal = &context.internal;
	let serde = &context.serde;
	let enum_name = &item.ident;
	let tag_field = super::tag_field_const();
	let tag_enum = super::tag_enum_name(item);

	let (_impl_generics, type_generics, _where_clause) = item.generics.split_for_impl();
	let (de_generics, de_lifetime, error) = util::add_lifetime(&item.generics, "de");
	let (impl_generics, _type_generics, _where_clause) = de_generics.split_for_impl();
	let where_clause = make_where_clause(context, item, &de_lifetime);

	let match_arms = make_match_arms(item);

	quote! {
		#error
		#[automatically_derived]
		impl #impl_generics #serde::Deserialize<#de_lifetime> for #enum_name #type_generics #where_clause {
			fn deserialize<D: #serde::Deserializer<#de_lifetime>>(deserializer: D) -> ::core::result::Result<Self, D::Error> {
				let content = <#internal::FlatContent as #serde::Deserialize>::deserialize(deserializer)?;
				let tag: #tag_enum = content.decode_tag::<_, D::Error>(#tag_field)?;
				match tag {
					#(#match_arms)*
				}
			}
		}
	}
}

/// Generate one match arm per variant, in declaration order.
fn make_match_arms(item: &FlatEnum) -> Vec<TokenStream> {
	let tag_enum = super::tag_enum_name(item);
	let payload = syn::Ident::new("payload", proc_macro2::Span::call_site());

	item.variants.iter()
		.map(|variant| {
			let variant_name = &variant.ident;
			let payload_type = &variant.payload;
			let construct = variant.pattern(&payload);
			quote! {
				#tag_enum::#variant_name => {
					let #payload = content.decode_payload::<#payload_type, D::Error>()?;
					::core::result::Result::Ok(#construct)
				},
			}
		})
		.collect()
}

fn make_where_clause(context: &Context, item: &FlatEnum, de_lifetime: &syn::Lifetime) -> Option<syn::WhereClause> {
	let serde = &context.serde;

	let mut predicates = Vec::<syn::WherePredicate>::new();
	for variant in &item.variants {
		let ty = &variant.payload;
		if util::type_uses_generic(ty, &item.generics) {
			predicates.push(syn::parse_quote! {
				#ty: #serde::Deserialize<#de_lifetime>
			})
		}
	}

	util::extend_where_clause(&item.generics, predicates)
}

#[cfg(test)]
mod test {
	use super::*;
	use assert2::{assert, let_assert};

	fn flat_enum(tokens: TokenStream) -> FlatEnum {
		let_assert!(Ok(input) = syn::parse2::<syn::DeriveInput>(tokens));
		let_assert!(Ok(item) = FlatEnum::from_derive_input(input));
		item
	}

	#[test]
	fn one_arm_per_variant_in_order() {
		let item = flat_enum(quote! {
			enum Message {
				text(TextMessage),
				media { message: MediaMessage },
				quote(QuoteMessage),
			}
		});
		let arms = make_match_arms(&item);
		assert!(arms.len() == 3);

		let expected = [
			quote!(__MessageFlatTag::text =>),
			quote!(__MessageFlatTag::media =>),
			quote!(__MessageFlatTag::quote =>),
		];
		for (arm, expected) in arms.iter().zip(expected) {
			assert!(arm.to_string().starts_with(&expected.to_string()));
		}
		assert!(arms[1].to_string().contains(&quote!(Self::media { message: payload }).to_string()));
	}

	#[test]
	fn decodes_payload_from_entire_content() {
		let item = flat_enum(quote! {
			enum Message {
				text(TextMessage),
			}
		});
		let context = Context::new(crate::crate_name());
		let output = impl_deserialize_enum(&context, &item).to_string();
		assert!(output.contains(&quote!(content.decode_payload::<TextMessage, D::Error>()).to_string()));
		assert!(!output.contains("_ =>"));
	}

	#[test]
	fn lifetime_comes_first() {
		let item = flat_enum(quote! {
			enum Message<T> {
				other(T),
			}
		});
		let context = Context::new(crate::crate_name());
		let_assert!(Ok(item_impl) = syn::parse2::<syn::ItemImpl>(impl_deserialize_enum(&context, &item)));
		let generics = &item_impl.generics;
		assert!(quote!(#generics).to_string() == quote!(<'de, T>).to_string());
		let_assert!(Some(clause) = &item_impl.generics.where_clause);
		assert!(quote!(#clause).to_string() == quote!(where T: ::serde_flat_tag::internal__::serde::Deserialize<'de>,).to_string());
	}
}
