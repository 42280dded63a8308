use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{Data, DeriveInput, Field, Fields, GenericArgument, PathArguments, Type};

pub fn derive_identifiable(input: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(input as DeriveInput);

    match expand(&input) {
        Ok(tokens) => TokenStream::from(tokens),
        Err(err) => TokenStream::from(err.to_compile_error()),
    }
}

fn expand(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let field = extract_id_field(input)?;
    let ident = field
        .ident
        .as_ref()
        .ok_or_else(|| syn::Error::new_spanned(field, "identity field must be named"))?;

    let expanded = match option_inner(&field.ty) {
        Some(inner) => quote! {
            impl #impl_generics persist_rust::Identifiable for #name #ty_generics #where_clause {
                type Key = #inner;

                fn id(&self) -> ::core::option::Option<Self::Key> {
                    ::core::clone::Clone::clone(&self.#ident)
                }

                fn set_id(&mut self, id: Self::Key) {
                    self.#ident = ::core::option::Option::Some(id);
                }

                fn has_empty_id(&self) -> bool {
                    match &self.#ident {
                        ::core::option::Option::Some(id) => {
                            persist_rust::IdentityKey::is_empty_key(id)
                        }
                        ::core::option::Option::None => true,
                    }
                }
            }
        },
        None => {
            let ty = &field.ty;
            quote! {
                impl #impl_generics persist_rust::Identifiable for #name #ty_generics #where_clause {
                    type Key = #ty;

                    fn id(&self) -> ::core::option::Option<Self::Key> {
                        ::core::option::Option::Some(::core::clone::Clone::clone(&self.#ident))
                    }

                    fn set_id(&mut self, id: Self::Key) {
                        self.#ident = id;
                    }
                }
            }
        }
    };

    Ok(expanded)
}

fn extract_id_field(input: &DeriveInput) -> syn::Result<&Field> {
    let fields = match &input.data {
        Data::Struct(data_struct) => match &data_struct.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    &input.ident,
                    "Identifiable derive: only structs with named fields are supported",
                ))
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &input.ident,
                "Identifiable derive: only structs are supported, implement the trait by hand for other shapes",
            ))
        }
    };

    for field in fields {
        for attr in &field.attrs {
            if !attr.path().is_ident("identifiable") {
                continue;
            }

            let mut is_id = false;
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("id") {
                    is_id = true;
                    Ok(())
                } else {
                    Err(meta.error("unsupported identifiable attribute, expected `id`"))
                }
            })?;
            if is_id {
                return Ok(field);
            }
        }
    }

    // Default: a field named "id", "Id" or "ID"
    fields
        .iter()
        .find(|field| {
            field
                .ident
                .as_ref()
                .map(|ident| ident.to_string().eq_ignore_ascii_case("id"))
                .unwrap_or(false)
        })
        .ok_or_else(|| {
            syn::Error::new_spanned(
                &input.ident,
                "Identifiable derive: no field marked with #[identifiable(id)] and no field named `id`",
            )
        })
}

/// Returns `T` when the type is spelled `Option<T>`.
fn option_inner(ty: &Type) -> Option<&Type> {
    let Type::Path(type_path) = ty else {
        return None;
    };
    let segment = type_path.path.segments.last()?;
    if segment.ident != "Option" {
        return None;
    }
    let PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };
    match args.args.first()? {
        GenericArgument::Type(inner) => Some(inner),
        _ => None,
    }
}
