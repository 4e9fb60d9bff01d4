//! Procedural macros for `reflect_conf`.
//!
//! `#[derive(ReflectConf)]` builds the field descriptor table walked by the
//! population engine. Only fields carrying a `#[reflect_conf(...)]` attribute
//! are described; every other field is never touched.

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod derive;

/// Derive macro for `reflect_conf::ReflectConf`.
///
/// Field attributes:
///
/// - `tag = "..."` stores a raw annotation such as
///   `transformer:"diSlice" conf:"hosts|HOSTS"` verbatim.
/// - `transformer = "..."`, `conf = "..."` and an optional `default = "..."`
///   are rendered into the same annotation format.
/// - `skip` leaves the field out of the table.
///
/// The struct attribute `crate = "path"` changes the runtime crate path used
/// by the generated code.
#[proc_macro_derive(ReflectConf, attributes(reflect_conf))]
pub fn derive_reflect_conf(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    derive::expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
