use syn::spanned::Spanned;

mod attributes;
pub use attributes::EnumAttributes;

/// An enum where every variant wraps exactly one payload.
pub struct FlatEnum {
	pub ident: syn::Ident,
	pub generics: syn::Generics,
	pub variants: Vec<FlatVariant>,
}

/// A single variant of a [`FlatEnum`].
pub struct FlatVariant {
	pub ident: syn::Ident,
	pub binding: Binding,
	pub payload: syn::Type,
}

/// How the payload is stored in the variant.
pub enum Binding {
	/// `Variant(Payload)`
	Tuple,

	/// `Variant { field: Payload }`
	Named(syn::Ident),
}

impl FlatEnum {
	/// Check that the input is an enum with exactly one associated value per variant.
	///
	/// Stops at the first offending variant.
	/// An enum without variants is accepted and yields an empty variant list.
	pub fn from_derive_input(input: syn::DeriveInput) -> syn::Result<Self> {
		let data = match input.data {
			syn::Data::Enum(data) => data,
			syn::Data::Struct(data) => return Err(not_an_enum(data.struct_token.span)),
			syn::Data::Union(data) => return Err(not_an_enum(data.union_token.span)),
		};

		let mut variants = Vec::with_capacity(data.variants.len());
		for variant in data.variants {
			variants.push(FlatVariant::from_syn(variant)?);
		}

		Ok(Self {
			ident: input.ident,
			generics: input.generics,
			variants,
		})
	}
}

impl FlatVariant {
	fn from_syn(variant: syn::Variant) -> syn::Result<Self> {
		let span = variant.span();
		let fields = match variant.fields {
			syn::Fields::Unit => {
				return Err(syn::Error::new(span, "serde_flat_tag: each variant must have exactly one associated value"));
			},
			syn::Fields::Unnamed(fields) => fields.unnamed,
			syn::Fields::Named(fields) => fields.named,
		};
		let mut fields = fields.into_iter();
		let (Some(field), None) = (fields.next(), fields.next()) else {
			return Err(syn::Error::new(span, "serde_flat_tag: each variant must have exactly one associated value (no more, no less)"));
		};

		let binding = match field.ident {
			Some(ident) => Binding::Named(ident),
			None => Binding::Tuple,
		};
		Ok(Self {
			ident: variant.ident,
			binding,
			payload: field.ty,
		})
	}

	/// The tag value used on the wire for this variant.
	///
	/// Raw identifiers lose their `r#` prefix.
	pub fn tag_value(&self) -> String {
		syn::ext::IdentExt::unraw(&self.ident).to_string()
	}

	/// Create a pattern or constructor for this variant, binding the payload to `name`.
	///
	/// Gives `Self::Variant(name)` or `Self::Variant { field: name }`.
	pub fn pattern(&self, name: &syn::Ident) -> proc_macro2::TokenStream {
		let variant_name = &self.ident;
		match &self.binding {
			Binding::Tuple => quote::quote!(Self::#variant_name(#name)),
			Binding::Named(field) => quote::quote!(Self::#variant_name { #field: #name }),
		}
	}
}

fn not_an_enum(span: proc_macro2::Span) -> syn::Error {
	syn::Error::new(span, "serde_flat_tag: can only be applied to enums")
}
