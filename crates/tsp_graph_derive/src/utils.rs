use quote::quote;
use syn::{AngleBracketedGenericArguments, GenericArgument, Path, PathArguments, Type, TypePath};

/// Returns `T` for `Option<T>`, `std::option::Option<T>` and `core::option::Option<T>`.
pub fn inner_of_option(ty: &Type) -> Option<&Type> {
    let Type::Path(TypePath { qself: None, path }) = ty else {
        return None;
    };

    let names: Vec<String> = path.segments.iter().map(|s| s.ident.to_string()).collect();
    let is_option = match names.as_slice() {
        [only] => only == "Option",
        [krate, module, ty] => {
            (krate == "std" || krate == "core") && module == "option" && ty == "Option"
        }
        _ => false,
    };
    if !is_option {
        return None;
    }

    let PathArguments::AngleBracketed(AngleBracketedGenericArguments { args, .. }) =
        &path.segments.last()?.arguments
    else {
        return None;
    };
    match args.first() {
        Some(GenericArgument::Type(inner)) => Some(inner),
        _ => None,
    }
}

/// Expression turning `raw: String` into the field type, inside a fn returning `crate::Result`.
pub fn build_cli_parse_expr(ty: &Type, parse_with: Option<&Path>) -> proc_macro2::TokenStream {
    if let Some(parse_with) = parse_with {
        return quote! { #parse_with(&raw)? };
    }

    quote! {
        raw.trim().parse::<#ty>()
            .map_err(|e| crate::Error::invalid_input(format!(
                "Invalid value for --{name}: {raw} ({e})"
            )))?
    }
}

pub fn to_kebab_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 4);
    for (idx, ch) in s.chars().enumerate() {
        if ch.is_ascii_uppercase() {
            if idx != 0 {
                out.push('-');
            }
            out.push(ch.to_ascii_lowercase());
        } else if ch == '_' {
            out.push('-');
        } else {
            out.push(ch);
        }
    }
    out
}
