mod generate;
mod input;
mod util;

fn crate_name() -> syn::Path {
	let mut segments = syn::punctuated::Punctuated::new();
	segments.push(syn::PathSegment {
		ident: syn::Ident::new("serde_flat_tag", proc_macro2::Span::call_site()),
		arguments: syn::PathArguments::None,
	});
	syn::Path {
		leading_colon: Some(syn::token::PathSep(proc_macro2::Span::call_site())),
		segments,
	}
}

struct Context {
	krate: syn::Path,
	internal: syn::Path,
	serde: syn::Path,
	#[cfg_attr(not(feature = "schemars"), allow(unused))]
	schemars: syn::Path,
	errors: Vec<syn::Error>,
}

impl Context {
	fn new(crate_name: syn::Path) -> Self {
		let mut internal = crate_name.clone();
		internal.segments.push(syn::PathSegment {
			ident: syn::Ident::new("internal__", proc_macro2::Span::call_site()),
			arguments: syn::PathArguments::None,
		});
		let mut serde = internal.clone();
		serde.segments.push(syn::PathSegment {
			ident: syn::Ident::new("serde", proc_macro2::Span::call_site()),
			arguments: syn::PathArguments::None,
		});
		let mut schemars = internal.clone();
		schemars.segments.push(syn::PathSegment {
			ident: syn::Ident::new("schemars", proc_macro2::Span::call_site()),
			arguments: syn::PathArguments::None,
		});
		Self {
			krate: crate_name,
			internal,
			serde,
			schemars,
			errors: Vec::new(),
		}
	}

	/// Replace the path of the runtime crate, for example from a `#[flat_tag(crate = "...")]` attribute.
	fn set_crate_name(&mut self, crate_name: syn::Path) {
		let errors = std::mem::take(&mut self.errors);
		*self = Self {
			errors,
			..Self::new(crate_name)
		};
	}

	fn error(&mut self, span: proc_macro2::Span, message: impl std::fmt::Display) {
		self.errors.push(syn::Error::new(span, format!("serde_flat_tag: {message}")))
	}

	fn spanned_error<T: quote::ToTokens>(&mut self, object: &T, message: impl std::fmt::Display) {
		self.errors.push(syn::Error::new_spanned(object, format!("serde_flat_tag: {message}")))
	}

	fn syn_error(&mut self, error: syn::Error) {
		self.errors.push(error)
	}

	fn collect_errors(self, mut tokens: proc_macro2::TokenStream) -> proc_macro2::TokenStream {
		for error in self.errors {
			tokens.extend(error.into_compile_error())
		}
		tokens
	}
}

/// Derive [`serde::Serialize`], [`serde::Deserialize`] and `FlatTag` for an enum using the flat tagged format.
#[proc_macro_derive(FlatTag, attributes(flat_tag))]
pub fn derive_flat_tag(tokens: proc_macro::TokenStream) -> proc_macro::TokenStream {
	let mut context = Context::new(crate_name());
	let output = generate::expand_flat_tag(&mut context, tokens.into());
	context.collect_errors(output).into()
}

/// Derive `schemars::JsonSchema` for an enum using the flat tagged format.
#[cfg(feature = "schemars")]
#[proc_macro_derive(JsonSchema, attributes(flat_tag))]
pub fn derive_json_schema(tokens: proc_macro::TokenStream) -> proc_macro::TokenStream {
	let mut context = Context::new(crate_name());
	let output = generate::expand_json_schema(&mut context, tokens.into());
	context.collect_errors(output).into()
}
