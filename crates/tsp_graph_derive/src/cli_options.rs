use proc_macro::TokenStream;
use proc_macro2::Span;
use quote::quote;
use syn::{Data, DeriveInput, Field, Fields, LitStr, Path, parse_macro_input, spanned::Spanned};

use crate::utils;

/// Settings collected from `#[cli(...)]` on a single field.
struct FieldCli {
    long: String,
    parse_with: Option<Path>,
}

fn field_cli(field: &Field) -> syn::Result<Option<FieldCli>> {
    let mut long = None;
    let mut parse_with = None;

    for attr in field.attrs.iter().filter(|attr| attr.path().is_ident("cli")) {
        attr.parse_nested_meta(|meta| {
            let lit: LitStr = meta.value()?.parse()?;
            if meta.path.is_ident("long") {
                long = Some(lit.value());
            } else if meta.path.is_ident("parse_with") {
                parse_with = Some(syn::parse_str::<Path>(&lit.value())?);
            } else {
                return Err(meta.error("expected `long` or `parse_with`"));
            }
            Ok(())
        })?;
    }

    Ok(long.map(|long| FieldCli { long, parse_with }))
}

pub fn derive_cli_options_inner(item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    match expand(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let struct_ident = &input.ident;
    let Data::Struct(data_struct) = &input.data else {
        return Err(syn::Error::new(
            input.span(),
            "CliOptions can only be derived for structs",
        ));
    };
    let Fields::Named(fields) = &data_struct.fields else {
        return Err(syn::Error::new(
            input.span(),
            "CliOptions requires named fields",
        ));
    };

    let mut arms = Vec::new();
    let mut long_names = Vec::new();

    for field in &fields.named {
        let (Some(field_ident), Some(cli)) = (&field.ident, field_cli(field)?) else {
            continue;
        };

        let long_lit = LitStr::new(&cli.long, Span::call_site());
        let assign = match utils::inner_of_option(&field.ty) {
            Some(inner) => {
                let parse = utils::build_cli_parse_expr(inner, cli.parse_with.as_ref());
                quote! { self.#field_ident = Some(#parse); }
            }
            None => {
                let parse = utils::build_cli_parse_expr(&field.ty, cli.parse_with.as_ref());
                quote! { self.#field_ident = #parse; }
            }
        };

        arms.push(quote! {
            #long_lit => {
                let raw = value.ok_or_else(|| {
                    crate::Error::invalid_input(format!("Missing value for --{name}"))
                })?;
                #assign
                Ok(true)
            }
        });
        long_names.push(long_lit);
    }

    Ok(quote! {
        impl #struct_ident {
            /// Long option names handled by `apply_cli_option`.
            pub const CLI_OPTIONS: &'static [&'static str] = &[#(#long_names),*];

            /// Splits `name=value` or `name value` forms. A following argument that
            /// itself starts with `--` is never consumed as a value.
            fn split_arg(
                raw_name: &str,
                args: &mut std::iter::Peekable<impl Iterator<Item = String>>,
            ) -> (String, Option<String>) {
                if let Some((name, value)) = raw_name.split_once('=') {
                    return (name.to_string(), Some(value.to_string()));
                }

                let value = args.next_if(|next| !next.starts_with("--"));
                (raw_name.to_string(), value)
            }

            /// Returns `Ok(false)` when `name` is not a derived option.
            fn apply_cli_option(
                &mut self,
                name: &str,
                value: Option<String>,
            ) -> crate::Result<bool> {
                match name {
                    #(#arms,)*
                    _ => Ok(false),
                }
            }
        }
    })
}
