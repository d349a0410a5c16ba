use proc_macro::TokenStream;
use quote::{format_ident, quote};
use syn::{parse_macro_input, Data, DataStruct, DeriveInput, Fields};

/// Derive a partial "overrides" companion for a plain configuration struct.
///
/// For a struct `Name`, generates `NameOverrides` where every field is wrapped
/// in `Option`. The generated type has:
/// - a chaining setter per field (`NameOverrides::new().speed(0.9)`)
/// - `is_empty()` - true when no field is set
/// - `merge(other)` - fields set on `other` win
/// - `apply_to(&base)` - shallow-merge onto a full value, returning a new one
/// - `From<Name>` - every field set
///
/// Field types must be `Clone + Debug + PartialEq`.
///
/// # Example
/// ```ignore
/// #[derive(Clone, Overrides)]
/// pub struct Style {
///     width: f32,
///     visible: bool,
/// }
///
/// let base = Style { width: 10.0, visible: true };
/// let style = StyleOverrides::new().width(20.0).apply_to(&base);
/// assert_eq!(style.width, 20.0);
/// ```
#[proc_macro_derive(Overrides)]
pub fn derive_overrides(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand_overrides(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn expand_overrides(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let struct_name = &input.ident;
    let vis = &input.vis;

    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "Overrides cannot be derived for generic structs",
        ));
    }

    let fields = match &input.data {
        Data::Struct(DataStruct {
            fields: Fields::Named(fields),
            ..
        }) => &fields.named,
        _ => {
            return Err(syn::Error::new_spanned(
                struct_name,
                "Overrides can only be derived for structs with named fields",
            ));
        }
    };

    let names: Vec<_> = fields.iter().filter_map(|field| field.ident.clone()).collect();
    let types: Vec<_> = fields.iter().map(|field| field.ty.clone()).collect();

    let overrides_name = format_ident!("{}Overrides", struct_name);
    let struct_doc = format!(
        "Partial [`{}`]: every field is optional and only set fields are applied.",
        struct_name
    );

    let setters = names.iter().zip(types.iter()).map(|(name, ty)| {
        let doc = format!("Override `{}`.", name);
        quote! {
            #[doc = #doc]
            pub fn #name(mut self, value: #ty) -> Self {
                self.#name = ::core::option::Option::Some(value);
                self
            }
        }
    });

    Ok(quote! {
        #[doc = #struct_doc]
        #[derive(Clone, Debug, Default, PartialEq)]
        #vis struct #overrides_name {
            #(pub #names: ::core::option::Option<#types>,)*
        }

        impl #overrides_name {
            /// Overrides with no field set.
            pub fn new() -> Self {
                ::core::default::Default::default()
            }

            #(#setters)*

            /// True when no field is set.
            pub fn is_empty(&self) -> bool {
                true #(&& self.#names.is_none())*
            }

            /// Combine two override sets; fields set on `other` win.
            pub fn merge(mut self, other: &Self) -> Self {
                #(
                    if let ::core::option::Option::Some(value) = &other.#names {
                        self.#names = ::core::option::Option::Some(::core::clone::Clone::clone(value));
                    }
                )*
                self
            }

            /// Shallow-merge the set fields onto `base`.
            pub fn apply_to(&self, base: &#struct_name) -> #struct_name {
                let mut out = ::core::clone::Clone::clone(base);
                #(
                    if let ::core::option::Option::Some(value) = &self.#names {
                        out.#names = ::core::clone::Clone::clone(value);
                    }
                )*
                out
            }
        }

        impl ::core::convert::From<#struct_name> for #overrides_name {
            fn from(value: #struct_name) -> Self {
                Self {
                    #(#names: ::core::option::Option::Some(value.#names),)*
                }
            }
        }
    })
}
