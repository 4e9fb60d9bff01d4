//! Attribute parsing for the `ReflectConf` derive macro.

use proc_macro2::Span;
use syn::meta::ParseNestedMeta;
use syn::spanned::Spanned;
use syn::{Attribute, Data, DeriveInput, Fields, Ident, Lit, LitStr, Type};

const ATTRIBUTE: &str = "reflect_conf";

/// Struct-level attributes.
#[derive(Default)]
pub(crate) struct StructAttrs {
    /// Overrides the runtime crate path, set via
    /// `#[reflect_conf(crate = "my_alias")]`.
    pub crate_path: Option<syn::Path>,
}

/// A field that receives a descriptor.
pub(crate) struct DescribedField {
    pub ident: Ident,
    pub ty: Type,
    pub tag: String,
}

#[derive(Default)]
struct FieldAttrs {
    tag: Option<LitStr>,
    transformer: Option<LitStr>,
    conf: Option<LitStr>,
    default: Option<LitStr>,
    skip: Option<Span>,
}

impl FieldAttrs {
    fn has_structured(&self) -> bool {
        self.transformer.is_some() || self.conf.is_some() || self.default.is_some()
    }

    /// Render the annotation string, or `None` when the field is skipped.
    fn into_tag(self, field: &syn::Field) -> syn::Result<Option<String>> {
        if let Some(span) = self.skip {
            if self.tag.is_some() || self.has_structured() {
                return Err(syn::Error::new(span, "`skip` cannot be combined with other keys"));
            }
            return Ok(None);
        }
        if let Some(raw) = &self.tag {
            if self.has_structured() {
                return Err(syn::Error::new(
                    raw.span(),
                    "`tag` cannot be combined with `transformer`, `conf` or `default`",
                ));
            }
            return Ok(Some(raw.value()));
        }
        let (Some(transformer), Some(conf)) = (&self.transformer, &self.conf) else {
            return Err(syn::Error::new_spanned(
                field,
                "expected `tag`, `skip`, or both `transformer` and `conf`",
            ));
        };
        let mut pairs = vec![("transformer", transformer.value()), ("conf", conf.value())];
        if let Some(default) = &self.default {
            pairs.push(("default", default.value()));
        }
        Ok(Some(render_tag(&pairs)))
    }
}

/// Gathers the struct-level attributes and the described fields.
///
/// Fields without a `#[reflect_conf(...)]` attribute, or marked `skip`, are
/// left out.
pub(crate) fn parse_input(input: &DeriveInput) -> syn::Result<(StructAttrs, Vec<DescribedField>)> {
    let struct_attrs = parse_struct_attrs(&input.attrs)?;
    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    data.struct_token,
                    "ReflectConf requires named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &input.ident,
                "ReflectConf can only be derived for structs",
            ));
        }
    };

    let mut described = Vec::new();
    for field in fields {
        if !field.attrs.iter().any(|attr| attr.path().is_ident(ATTRIBUTE)) {
            continue;
        }
        let Some(tag) = parse_field_attrs(&field.attrs)?.into_tag(field)? else {
            continue;
        };
        let Some(ident) = field.ident.clone() else {
            return Err(syn::Error::new_spanned(field, "ReflectConf requires named fields"));
        };
        described.push(DescribedField {
            ident,
            ty: field.ty.clone(),
            tag,
        });
    }
    Ok((struct_attrs, described))
}

/// Iterate all `#[reflect_conf(...)]` attributes once and apply a callback.
fn parse_reflect_conf<F>(attrs: &[Attribute], mut f: F) -> syn::Result<()>
where
    F: FnMut(&ParseNestedMeta) -> syn::Result<()>,
{
    for attr in attrs.iter().filter(|a| a.path().is_ident(ATTRIBUTE)) {
        attr.parse_nested_meta(|meta| f(&meta))?;
    }
    Ok(())
}

fn parse_struct_attrs(attrs: &[Attribute]) -> syn::Result<StructAttrs> {
    let mut out = StructAttrs::default();
    parse_reflect_conf(attrs, |meta| {
        if meta.path.is_ident("crate") {
            let s = lit_str(meta, "crate")?;
            let path: syn::Path =
                syn::parse_str(&s.value()).map_err(|e| syn::Error::new(s.span(), e))?;
            out.crate_path = Some(path);
            Ok(())
        } else {
            Err(meta.error("unknown reflect_conf struct attribute"))
        }
    })?;
    Ok(out)
}

fn parse_field_attrs(attrs: &[Attribute]) -> syn::Result<FieldAttrs> {
    let mut out = FieldAttrs::default();
    parse_reflect_conf(attrs, |meta| {
        let Some(key) = meta.path.get_ident().map(ToString::to_string) else {
            return Err(meta.error("unknown reflect_conf field attribute"));
        };
        match key.as_str() {
            "tag" => assign_once(&mut out.tag, meta, "tag"),
            "transformer" => assign_once(&mut out.transformer, meta, "transformer"),
            "conf" => assign_once(&mut out.conf, meta, "conf"),
            "default" => assign_once(&mut out.default, meta, "default"),
            "skip" => {
                out.skip = Some(meta.path.span());
                Ok(())
            }
            _ => Err(meta.error("unknown reflect_conf field attribute")),
        }
    })?;
    Ok(out)
}

fn assign_once(target: &mut Option<LitStr>, meta: &ParseNestedMeta, key: &str) -> syn::Result<()> {
    if target.is_some() {
        return Err(meta.error(format!("duplicate `{key}`")));
    }
    *target = Some(lit_str(meta, key)?);
    Ok(())
}

fn lit_str(meta: &ParseNestedMeta, key: &str) -> syn::Result<LitStr> {
    match meta.value()?.parse::<Lit>()? {
        Lit::Str(s) => Ok(s),
        other => Err(syn::Error::new(other.span(), format!("{key} must be a string"))),
    }
}

/// Render `key:"value"` pairs, escaping backslashes, quotes and control characters.
pub(crate) fn render_tag(pairs: &[(&str, String)]) -> String {
    let mut out = String::new();
    for (key, value) in pairs {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(key);
        out.push_str(":\"");
        for c in value.chars() {
            match c {
                '\\' => out.push_str("\\\\"),
                '"' => out.push_str("\\\""),
                '\n' => out.push_str("\\n"),
                '\r' => out.push_str("\\r"),
                '\t' => out.push_str("\\t"),
                other => out.push(other),
            }
        }
        out.push('"');
    }
    out
}
