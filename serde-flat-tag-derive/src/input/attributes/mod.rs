mod args;
pub use args::KeyValueArg;

use quote::ToTokens;

use crate::Context;

#[derive(Default)]
pub struct EnumAttributes {
	pub crate_path: Option<KeyValueArg<syn::Token![crate], syn::LitStr>>,
}

impl EnumAttributes {
	pub fn from_syn(context: &mut Context, input: &[syn::Attribute]) -> Self {
		let mut output = Self::default();
		for attr in input {
			output.parse_one(context, attr)
		}
		output
	}

	fn parse_one(&mut self, context: &mut Context, attr: &syn::Attribute) {
		if let Some(mut parser) = args::AttrParser::new(context, attr, "flat_tag") {
			parser.parse(context, [
				&mut self.crate_path,
			]);
		}
	}

	/// Get the path of the runtime crate, if overridden with `#[flat_tag(crate = "...")]`.
	pub fn crate_path(&self, context: &mut Context) -> Option<syn::Path> {
		let arg = self.crate_path.as_ref()?;
		match arg.value.parse() {
			Ok(path) => Some(path),
			Err(e) => {
				context.spanned_error(&arg.value, format_args!("invalid `{}` path: {e}", arg.key.to_token_stream()));
				None
			},
		}
	}
}
