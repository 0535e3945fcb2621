use proc_macro::TokenStream;
use quote::quote;
use syn::punctuated::Punctuated;
use syn::{parse_macro_input, Data, DeriveInput, Fields, Ident, Token};

/// Derive macro that implements `Bindable` from field attributes.
///
/// # Attributes on fields
/// - `#[bind(X)]` - the field is written whenever the `X` binding updates
/// - `#[bind(X, BaseX)]` - several binding names may drive the same field
/// - `#[bind(flatten)]` - names not matched on this struct are looked up on the field,
///   which must itself implement `Bindable`
///
/// Bound fields must be `f64`.
///
/// # Example
/// ```ignore
/// #[derive(Clone, Bindable)]
/// pub struct Marker {
///     state: ObjectState,
///     #[bind(X)]
///     x: f64,
///     #[bind(Y)]
///     y: f64,
/// }
/// ```
#[proc_macro_derive(Bindable, attributes(bind))]
pub fn derive_bindable(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match expand_bindable(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand_bindable(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let struct_name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    struct_name,
                    "Bindable can only be derived for structs with named fields",
                ))
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                struct_name,
                "Bindable can only be derived for structs",
            ))
        }
    };

    let mut bound = Vec::new();
    let mut flattened = Vec::new();

    for field in fields {
        let Some(field_name) = field.ident.clone() else {
            continue;
        };

        for attr in field.attrs.iter().filter(|attr| attr.path().is_ident("bind")) {
            let names =
                attr.parse_args_with(Punctuated::<Ident, Token![,]>::parse_terminated)?;
            if names.is_empty() {
                return Err(syn::Error::new_spanned(attr, "expected at least one binding name"));
            }

            for name in names {
                if name == "flatten" {
                    flattened.push(field_name.clone());
                } else {
                    bound.push(BoundField {
                        field: field_name.clone(),
                        binding: name,
                    });
                }
            }
        }
    }

    let mut_arms = bound.iter().map(|b| {
        let field = &b.field;
        let binding = &b.binding;
        quote! {
            ::simple2d::scene::Binding::#binding => return Some(&mut self.#field),
        }
    });

    let ref_arms = bound.iter().map(|b| {
        let field = &b.field;
        let binding = &b.binding;
        quote! {
            ::simple2d::scene::Binding::#binding => return Some(self.#field),
        }
    });

    let flatten_mut = flattened.iter().map(|field| {
        quote! {
            if let Some(value) = ::simple2d::scene::Bindable::binding_mut(&mut self.#field, binding) {
                return Some(value);
            }
        }
    });

    let flatten_ref = flattened.iter().map(|field| {
        quote! {
            if let Some(value) = ::simple2d::scene::Bindable::binding(&self.#field, binding) {
                return Some(value);
            }
        }
    });

    let expanded = quote! {
        impl #impl_generics ::simple2d::scene::Bindable for #struct_name #ty_generics #where_clause {
            #[allow(unreachable_patterns, clippy::needless_return)]
            fn binding_mut(&mut self, binding: ::simple2d::scene::Binding) -> Option<&mut f64> {
                match binding {
                    #(#mut_arms)*
                    _ => {}
                }
                #(#flatten_mut)*
                None
            }

            #[allow(unreachable_patterns, clippy::needless_return)]
            fn binding(&self, binding: ::simple2d::scene::Binding) -> Option<f64> {
                match binding {
                    #(#ref_arms)*
                    _ => {}
                }
                #(#flatten_ref)*
                None
            }
        }
    };

    Ok(expanded)
}

struct BoundField {
    field: Ident,
    binding: Ident,
}
