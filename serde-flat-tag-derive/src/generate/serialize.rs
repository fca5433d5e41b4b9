use proc_macro2::TokenStream;
use quote::quote;

use crate::input::FlatEnum;
use crate::{util, Context};

/// Generate code that implement the serde `Serialize` trait for an enum using the flat tag format.
///
/// The tag and the fields of the payload are written to the same map.
pub fn impl_serialize_enum(context: &Context, item: &FlatEnum) -> TokenStream {
	let serde = &context.serde;
	let enum_name = &item.ident;
	let match_arms = make_match_arms(context, item);

	let (impl_generics, type_generics, _where_clause) = item.generics.split_for_impl();
	let where_clause = make_where_clause(context, item);

	quote! {
		#[automatically_derived]
		impl #impl_generics #serde::Serialize for #enum_name #type_generics #where_clause {
			fn serialize<S: #serde::Serializer>(&self, serializer: S) -> ::core::result::Result<S::Ok, S::Error> {
				let mut map = #serde::Serializer::serialize_map(serializer, ::core::option::Option::None)?;
				match self {
					#(#match_arms)*
				}
				#serde::ser::SerializeMap::end(map)
			}
		}
	}
}

/// Generate one match arm per variant, in declaration order.
fn make_match_arms(context: &Context, item: &FlatEnum) -> Vec<TokenStream> {
	let serde = &context.serde;
	let internal = &context.internal;
	let tag_field = super::tag_field_const();
	let tag_enum = super::tag_enum_name(item);
	let payload = syn::Ident::new("payload", proc_macro2::Span::call_site());

	item.variants.iter()
		.map(|variant| {
			let variant_name = &variant.ident;
			let pattern = variant.pattern(&payload);
			quote! {
				#pattern => {
					#serde::ser::SerializeMap::serialize_entry(&mut map, #tag_field, &#tag_enum::#variant_name)?;
					#serde::Serialize::serialize(#payload, #internal::FlatMapSerializer::new(&mut map))?;
				},
			}
		})
		.collect()
}

fn make_where_clause(context: &Context, item: &FlatEnum) -> Option<syn::WhereClause> {
	let serde = &context.serde;

	let mut predicates = Vec::<syn::WherePredicate>::new();
	for variant in &item.variants {
		let ty = &variant.payload;
		if util::type_uses_generic(ty, &item.generics) {
			predicates.push(syn::parse_quote! {
				#ty: #serde::Serialize
			})
		}
	}

	util::extend_where_clause(&item.generics, predicates)
}
