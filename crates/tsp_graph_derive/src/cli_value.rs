use proc_macro::TokenStream;
use proc_macro2::Span;
use quote::quote;
use syn::{Attribute, Data, DeriveInput, Fields, LitStr, parse_macro_input, spanned::Spanned};

use crate::utils;

struct VariantNames {
    canonical: String,
    aliases: Vec<String>,
}

fn variant_names(ident: &syn::Ident, attrs: &[Attribute]) -> syn::Result<VariantNames> {
    let mut names = VariantNames {
        canonical: utils::to_kebab_case(&ident.to_string()),
        aliases: Vec::new(),
    };

    for attr in attrs.iter().filter(|attr| attr.path().is_ident("cli")) {
        attr.parse_nested_meta(|meta| {
            let lit: LitStr = meta.value()?.parse()?;
            if meta.path.is_ident("name") {
                names.canonical = lit.value();
            } else if meta.path.is_ident("alias") {
                names.aliases.push(lit.value());
            } else {
                return Err(meta.error("expected `name` or `alias`"));
            }
            Ok(())
        })?;
    }

    Ok(names)
}

fn option_name(input: &DeriveInput) -> syn::Result<String> {
    let mut name = utils::to_kebab_case(&input.ident.to_string());
    for attr in input
        .attrs
        .iter()
        .filter(|attr| attr.path().is_ident("cli_value"))
    {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("option") {
                let lit: LitStr = meta.value()?.parse()?;
                name = lit.value();
                return Ok(());
            }
            Err(meta.error("expected `option = \"...\"`"))
        })?;
    }
    Ok(name)
}

pub fn derive_cli_value_inner(item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    match expand(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let enum_ident = &input.ident;
    let Data::Enum(data_enum) = &input.data else {
        return Err(syn::Error::new(
            input.span(),
            "CliValue can only be derived for enums",
        ));
    };

    let option_lit = LitStr::new(&option_name(input)?, Span::call_site());

    let mut parse_arms = Vec::new();
    let mut display_arms = Vec::new();
    let mut canonical_names = Vec::new();

    for variant in &data_enum.variants {
        if !matches!(variant.fields, Fields::Unit) {
            return Err(syn::Error::new(
                variant.span(),
                "CliValue variants cannot carry fields",
            ));
        }

        let variant_ident = &variant.ident;
        let names = variant_names(variant_ident, &variant.attrs)?;
        let canonical_lit = LitStr::new(&names.canonical, Span::call_site());
        let accepted = std::iter::once(&names.canonical)
            .chain(names.aliases.iter())
            .map(|name| LitStr::new(name, Span::call_site()))
            .collect::<Vec<_>>();

        parse_arms.push(quote! { #(#accepted)|* => Ok(Self::#variant_ident), });
        display_arms.push(quote! { Self::#variant_ident => #canonical_lit, });
        canonical_names.push(canonical_lit);
    }

    Ok(quote! {
        impl #enum_ident {
            /// Canonical command-line spellings, in declaration order.
            pub const VARIANTS: &'static [&'static str] = &[#(#canonical_names),*];

            pub fn parse(raw: &str) -> crate::Result<Self> {
                match raw.trim().to_ascii_lowercase().as_str() {
                    #(#parse_arms)*
                    _ => Err(crate::Error::invalid_input(format!(
                        "Invalid value for --{}: {} (expected {})",
                        #option_lit,
                        raw,
                        Self::VARIANTS.join("|")
                    ))),
                }
            }

            pub fn as_str(&self) -> &'static str {
                match self {
                    #(#display_arms)*
                }
            }
        }

        impl std::fmt::Display for #enum_ident {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    })
}
