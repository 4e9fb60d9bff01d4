//! Expansion of `#[derive(ReflectConf)]`.

use proc_macro2::TokenStream;
use syn::DeriveInput;

mod crate_path;
mod generate;
mod parse;

/// Expand the derive for `input`.
pub(crate) fn expand(input: &DeriveInput) -> syn::Result<TokenStream> {
    let (struct_attrs, fields) = parse::parse_input(input)?;
    let krate = crate_path::resolve(struct_attrs.crate_path.as_ref());
    Ok(generate::reflect_conf_impl(input, &krate, &fields))
}
