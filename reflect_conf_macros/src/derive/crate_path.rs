//! Runtime crate prefix for generated descriptor tables.
//!
//! Generated impls name `ReflectConf`, `FieldDescriptor` and `assign_value`
//! through a single prefix. Records defined in a crate that renames the
//! runtime dependency set `#[reflect_conf(crate = "alias")]`.

use proc_macro2::TokenStream;
use quote::{ToTokens, quote};

/// Prefix for runtime items, `reflect_conf` unless the record overrides it.
pub(crate) fn resolve(crate_path: Option<&syn::Path>) -> TokenStream {
    crate_path.map_or_else(|| quote! { reflect_conf }, ToTokens::to_token_stream)
}
