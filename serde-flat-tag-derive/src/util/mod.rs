use proc_macro2::{Span, TokenStream};

/// Add a new lifetime parameter to a set of generics.
///
/// The lifetime is named after `hint` if that name is still free.
/// If the name is already taken, the first free single letter lifetime is used instead.
pub fn add_lifetime(generics: &syn::Generics, hint: &str) -> (syn::Generics, syn::Lifetime, Option<TokenStream>) {
	let lifetime = match allocate_unused_lifetime(generics, hint) {
		Ok(x) => x,
		Err(e) => return (generics.clone(), syn::Lifetime::new("'a", Span::call_site()), Some(e.into_compile_error())),
	};
	let lifetime = syn::Lifetime::new(&format!("'{lifetime}"), Span::call_site());
	let param = syn::LifetimeParam::new(lifetime.clone());

	let mut generics = generics.clone();
	generics.params.insert(0, syn::GenericParam::Lifetime(param));
	(generics, lifetime, None)
}

fn allocate_unused_lifetime(generics: &syn::Generics, hint: &str) -> Result<String, syn::Error> {
	if !has_lifetime(generics, hint) {
		return Ok(hint.into());
	}
	for lifetime in 'a'..='z' {
		let lifetime = lifetime.to_string();
		if !has_lifetime(generics, &lifetime) {
			return Ok(lifetime);
		}
	}
	for i in 0..generics.params.len() + 1 {
		let lifetime = format!("_{i}");
		if !has_lifetime(generics, &lifetime) {
			return Ok(lifetime);
		}
	}

	Err(syn::Error::new_spanned(generics, "serde_flat_tag: failed to allocate unused lifetime"))
}

fn has_lifetime(generics: &syn::Generics, lifetime: &str) -> bool {
	generics.lifetimes().any(|param| param.lifetime.ident == lifetime)
}

/// Check if a type uses any of the given generic arguments.
pub fn type_uses_generic(ty: &syn::Type, generics: &syn::Generics) -> bool {
	struct Visit<'a> {
		generics: &'a syn::Generics,
		found: bool,
	}
	impl syn::visit::Visit<'_> for Visit<'_> {
		fn visit_path(&mut self, item: &syn::Path) {
			for param in &self.generics.params {
				match param {
					syn::GenericParam::Type(param) if item.is_ident(&param.ident) => {
						self.found = true;
						return;
					},
					syn::GenericParam::Const(param) if item.is_ident(&param.ident) => {
						self.found = true;
						return;
					},
					_ => (),
				}
			}
			syn::visit::visit_path(self, item)
		}

		fn visit_type_path(&mut self, item: &syn::TypePath) {
			// `T::Assoc` uses `T` too.
			if item.qself.is_none() {
				if let Some(first) = item.path.segments.first() {
					for param in self.generics.type_params() {
						if first.ident == param.ident {
							self.found = true;
							return;
						}
					}
				}
			}
			syn::visit::visit_type_path(self, item)
		}

		fn visit_lifetime(&mut self, item: &syn::Lifetime) {
			for param in self.generics.lifetimes() {
				if item.ident == param.lifetime.ident {
					self.found = true;
					return;
				}
			}
			syn::visit::visit_lifetime(self, item)
		}
	}

	let mut visitor = Visit {
		generics,
		found: false,
	};

	syn::visit::Visit::visit_type(&mut visitor, ty);
	visitor.found
}

/// Extend the where clause of `generics` with `predicates`.
pub fn extend_where_clause(generics: &syn::Generics, predicates: Vec<syn::WherePredicate>) -> Option<syn::WhereClause> {
	match &generics.where_clause {
		Some(clause) => {
			let mut clause = clause.clone();
			clause.predicates.extend(predicates);
			Some(clause)
		},
		None => {
			if predicates.is_empty() {
				None
			} else {
				Some(syn::parse_quote!(where #(#predicates,)*))
			}
		}
	}
}

/// Create a human readable description of the accepted values for an `expecting` message.
pub fn make_expecting(prefix: &str, values: &[impl AsRef<str>]) -> String {
	match values {
		[] => String::from("nothing"),
		[tag] => format!("{prefix} {:?}", tag.as_ref()),
		values => {
			let mut expecting = format!("{prefix} ");
			for (i, value) in values.iter().enumerate() {
				if i == values.len() - 1 {
					expecting.push_str(" or ");
				} else if i > 0 {
					expecting.push_str(", ");
				}
				expecting.push_str(&format!("{:?}", value.as_ref()));
			}
			expecting
		}
	}
}
