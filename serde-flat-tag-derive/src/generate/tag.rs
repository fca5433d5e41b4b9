use proc_macro2::TokenStream;
use quote::quote;

use crate::input::FlatEnum;
use crate::{util, Context};

/// Generate the tag enum for a flat tagged enum.
///
/// The tag enum has one unit variant for each variant of the input, with the same name and in the same order.
/// It (de)serializes as a string holding the variant name.
pub fn make_tag_enum(context: &Context, item: &FlatEnum) -> TokenStream {
	let serde = &context.serde;
	let tag_enum = super::tag_enum_name(item);

	let variant_name: Vec<_> = item.variants.iter().map(|x| &x.ident).collect();
	let tag_value: Vec<_> = item.variants.iter().map(|x| x.tag_value()).collect();
	let expecting = util::make_expecting("one of", &tag_value);

	quote! {
		#[derive(Clone, Copy)]
		enum #tag_enum {
			#(#variant_name,)*
		}

		impl #tag_enum {
			const VARIANTS: &'static [&'static ::core::primitive::str] = &[#(#tag_value),*];

			const fn as_str(self) -> &'static ::core::primitive::str {
				match self {
					#(Self::#variant_name => #tag_value,)*
				}
			}
		}

		#[automatically_derived]
		impl #serde::Serialize for #tag_enum {
			fn serialize<S: #serde::Serializer>(&self, serializer: S) -> ::core::result::Result<S::Ok, S::Error> {
				#serde::Serializer::serialize_str(serializer, self.as_str())
			}
		}

		#[automatically_derived]
		impl<'de> #serde::Deserialize<'de> for #tag_enum {
			fn deserialize<D: #serde::Deserializer<'de>>(deserializer: D) -> ::core::result::Result<Self, D::Error> {
				struct Visitor;

				impl<'de> #serde::de::Visitor<'de> for Visitor {
					type Value = #tag_enum;

					fn expecting(&self, f: &mut ::core::fmt::Formatter) -> ::core::fmt::Result {
						f.write_str(#expecting)
					}

					fn visit_str<E: #serde::de::Error>(self, value: &::core::primitive::str) -> ::core::result::Result<Self::Value, E> {
						match value {
							#(
								#tag_value => ::core::result::Result::Ok(#tag_enum::#variant_name),
							)*
							value => ::core::result::Result::Err(E::unknown_variant(value, #tag_enum::VARIANTS)),
						}
					}
				}

				#serde::Deserializer::deserialize_str(deserializer, Visitor)
			}
		}
	}
}
