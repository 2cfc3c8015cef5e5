use proc_macro::TokenStream;
use quote::quote;
use syn::{
    Attribute, Data, DataEnum, DeriveInput, Fields, GenericParam, Meta, parse_macro_input, parse_quote,
};

/// Options parsed from `#[inspect(...)]`
#[derive(Debug, Default)]
struct InspectOptions {
    skip: bool,
    rename: Option<String>,
}

/// Derive `integrity_check::Inspect`
///
/// - structs with named fields become objects, in declaration order
/// - newtype structs inspect as their inner value, other tuple structs as arrays
/// - unit structs become null
/// - enums with only unit variants become the variant name as a string
///
/// Fields accept `#[inspect(skip)]` and `#[inspect(rename = "name")]`; variants accept
/// `rename`.
#[proc_macro_derive(Inspect, attributes(inspect))]
pub fn derive_inspect(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match generate_inspect(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn generate_inspect(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let name = &input.ident;

    // Every type parameter must itself be inspectable
    let mut generics = input.generics.clone();
    for param in &mut generics.params {
        if let GenericParam::Type(ty) = param {
            ty.bounds.push(parse_quote!(::integrity_check::Inspect));
        }
    }
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let body = match &input.data {
        Data::Struct(data) => struct_body(&data.fields)?,
        Data::Enum(data) => enum_body(data)?,
        Data::Union(_) => {
            return Err(syn::Error::new_spanned(
                input,
                "derive(Inspect) does not support unions",
            ));
        }
    };

    Ok(quote! {
        impl #impl_generics ::integrity_check::Inspect for #name #ty_generics #where_clause {
            fn inspect(
                &self,
            ) -> ::core::result::Result<::integrity_check::Value, ::integrity_check::InspectError> {
                #body
            }
        }
    })
}

fn struct_body(fields: &Fields) -> syn::Result<proc_macro2::TokenStream> {
    match fields {
        Fields::Named(named) => {
            let mut pushes = Vec::new();
            for field in &named.named {
                let options = parse_options(&field.attrs)?;
                if options.skip {
                    continue;
                }

                let ident = field
                    .ident
                    .as_ref()
                    .ok_or_else(|| syn::Error::new_spanned(field, "expected a named field"))?;
                let key = options.rename.unwrap_or_else(|| ident.to_string());

                pushes.push(quote! {
                    entries.push((
                        ::std::string::String::from(#key),
                        ::integrity_check::Inspect::inspect(&self.#ident)?,
                    ));
                });
            }

            Ok(quote! {
                #[allow(unused_mut)]
                let mut entries = ::std::vec::Vec::new();
                #(#pushes)*
                ::core::result::Result::Ok(::integrity_check::Value::Object(entries))
            })
        }
        Fields::Unnamed(unnamed) => {
            let mut indices = Vec::new();
            for (i, field) in unnamed.unnamed.iter().enumerate() {
                let options = parse_options(&field.attrs)?;
                if options.rename.is_some() {
                    return Err(syn::Error::new_spanned(
                        field,
                        "rename is only supported on named fields",
                    ));
                }
                if !options.skip {
                    indices.push(syn::Index::from(i));
                }
            }

            // Newtypes are transparent
            if unnamed.unnamed.len() == 1 && indices.len() == 1 {
                let index = &indices[0];
                return Ok(quote! {
                    ::integrity_check::Inspect::inspect(&self.#index)
                });
            }

            Ok(quote! {
                ::core::result::Result::Ok(::integrity_check::Value::Array(::std::vec![
                    #(::integrity_check::Inspect::inspect(&self.#indices)?),*
                ]))
            })
        }
        Fields::Unit => Ok(quote! {
            ::core::result::Result::Ok(::integrity_check::Value::Null)
        }),
    }
}

fn enum_body(data: &DataEnum) -> syn::Result<proc_macro2::TokenStream> {
    if data.variants.is_empty() {
        return Ok(quote! { match *self {} });
    }

    let mut arms = Vec::new();
    for variant in &data.variants {
        if !matches!(variant.fields, Fields::Unit) {
            return Err(syn::Error::new_spanned(
                variant,
                "derive(Inspect) only supports enums with unit variants",
            ));
        }

        let options = parse_options(&variant.attrs)?;
        if options.skip {
            return Err(syn::Error::new_spanned(
                variant,
                "skip is not supported on enum variants",
            ));
        }

        let ident = &variant.ident;
        let key = options.rename.unwrap_or_else(|| ident.to_string());
        arms.push(quote! { Self::#ident => #key });
    }

    Ok(quote! {
        let name = match self {
            #(#arms),*
        };
        ::core::result::Result::Ok(::integrity_check::Value::String(::std::string::String::from(name)))
    })
}

/// Parse #[inspect(skip)] and #[inspect(rename = "x")]
fn parse_options(attrs: &[Attribute]) -> syn::Result<InspectOptions> {
    let mut options = InspectOptions::default();

    for attr in attrs.iter().filter(|attr| attr.path().is_ident("inspect")) {
        let list = match &attr.meta {
            Meta::List(list) => list,
            _ => {
                return Err(syn::Error::new_spanned(
                    attr,
                    "inspect attribute must be a list: #[inspect(...)]",
                ));
            }
        };

        list.parse_nested_meta(|meta| {
            if meta.path.is_ident("skip") {
                options.skip = true;
                Ok(())
            } else if meta.path.is_ident("rename") {
                let value: syn::LitStr = meta.value()?.parse()?;
                options.rename = Some(value.value());
                Ok(())
            } else {
                Err(meta.error("expected `skip` or `rename = \"...\"`"))
            }
        })?;
    }

    Ok(options)
}
