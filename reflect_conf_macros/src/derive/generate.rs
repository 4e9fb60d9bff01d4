//! Token generation for the `ReflectConf` implementation.

use proc_macro2::TokenStream;
use quote::quote;
use syn::DeriveInput;

use super::parse::DescribedField;

/// Build one `FieldDescriptor` constructor call.
fn descriptor(krate: &TokenStream, field: &DescribedField) -> TokenStream {
    let DescribedField { ident, ty, tag } = field;
    let name = ident.to_string();
    quote! {
        #krate::FieldDescriptor::<Self>::new::<#ty>(
            #name,
            #tag,
            |record, value| #krate::assign_value(&mut record.#ident, value),
        )
    }
}

/// Generate `impl ReflectConf` for the input struct.
pub(crate) fn reflect_conf_impl(
    input: &DeriveInput,
    krate: &TokenStream,
    fields: &[DescribedField],
) -> TokenStream {
    let ident = &input.ident;
    let name = ident.to_string();
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    let descriptors = fields.iter().map(|field| descriptor(krate, field));
    quote! {
        impl #impl_generics #krate::ReflectConf for #ident #ty_generics #where_clause {
            fn type_name() -> &'static str {
                #name
            }

            fn fields() -> ::std::vec::Vec<#krate::FieldDescriptor<Self>> {
                ::std::vec![#( #descriptors ),*]
            }
        }
    }
}
