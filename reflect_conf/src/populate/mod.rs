//! The population engine.
//!
//! A record type describes its fields through [`ReflectConf::fields`],
//! normally generated by `#[derive(ReflectConf)]`. [`populate_with`] walks
//! those descriptors in declaration order and writes each converted value
//! back through the descriptor's assignment function.

use std::fmt;

use crate::error::{FieldContext, ReflectConfError, ReflectConfResult, ShapeError};
use crate::kind::FieldType;
use crate::layer::{SourceComposer, SourceLayer, SourceOrigin};
use crate::merge::{SourceMap, merge_sources};
use crate::resolve::resolve;
use crate::rule::RuleRegistry;
use crate::tag::Annotation;
use crate::value::{ConfType, ConfValue};

/// Writes a converted value into one field of `T`.
pub type AssignFn<T> = fn(&mut T, ConfValue) -> Result<(), ShapeError>;

/// Descriptor of one record field.
pub struct FieldDescriptor<T> {
    name: &'static str,
    tag: &'static str,
    field_type: FieldType,
    assign: AssignFn<T>,
}

impl<T> FieldDescriptor<T> {
    /// Describe a field of type `V`.
    ///
    /// # Examples
    ///
    /// ```
    /// use reflect_conf::{FieldDescriptor, assign_value};
    ///
    /// struct Limits {
    ///     burst: u32,
    /// }
    ///
    /// let field = FieldDescriptor::<Limits>::new::<u32>(
    ///     "burst",
    ///     r#"transformer:"direct" conf:"burst""#,
    ///     |record, value| assign_value(&mut record.burst, value),
    /// );
    /// assert_eq!(field.name(), "burst");
    /// assert_eq!(field.field_type().to_string(), "u32");
    /// ```
    #[must_use]
    pub fn new<V: ConfType>(name: &'static str, tag: &'static str, assign: AssignFn<T>) -> Self {
        Self {
            name,
            tag,
            field_type: V::field_type(),
            assign,
        }
    }

    /// Field name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Raw annotation.
    #[must_use]
    pub const fn tag(&self) -> &'static str {
        self.tag
    }

    /// Declared type.
    #[must_use]
    pub const fn field_type(&self) -> &FieldType {
        &self.field_type
    }
}

impl<T> fmt::Debug for FieldDescriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .field("tag", &self.tag)
            .field("field_type", &self.field_type)
            .finish_non_exhaustive()
    }
}

/// Record types that can be populated from source maps.
///
/// Implement with `#[derive(ReflectConf)]`:
///
/// ```
/// use reflect_conf::{ReflectConf, SourceMap};
///
/// #[derive(Debug, Default, ReflectConf)]
/// struct Server {
///     #[reflect_conf(transformer = "direct", conf = "port|PORT", default = "8080")]
///     port: u16,
///     #[reflect_conf(transformer = "diSliceComma", conf = "hosts")]
///     hosts: Vec<String>,
///     unmanaged: bool,
/// }
///
/// let env = SourceMap::from([("PORT".to_owned(), " 9000 ".to_owned())]);
/// let mut server = Server::default();
/// server.populate_from(true, [env])?;
/// assert_eq!(server.port, 9000);
/// assert!(server.hosts.is_empty());
/// # Ok::<_, reflect_conf::ReflectConfError>(())
/// ```
pub trait ReflectConf: Sized {
    /// Name of the record type, used in diagnostics.
    fn type_name() -> &'static str;

    /// Field descriptors in declaration order.
    fn fields() -> Vec<FieldDescriptor<Self>>;

    /// Populate `self` using only the built-in rules.
    ///
    /// # Errors
    ///
    /// See [`populate_with`].
    fn populate_from<I>(&mut self, use_default: bool, sources: I) -> ReflectConfResult<()>
    where
        I: IntoIterator<Item = SourceMap>,
    {
        populate(self, use_default, sources)
    }
}

/// Populate `record` using only the built-in rules.
///
/// # Errors
///
/// See [`populate_with`].
pub fn populate<T, I>(record: &mut T, use_default: bool, sources: I) -> ReflectConfResult<()>
where
    T: ReflectConf,
    I: IntoIterator<Item = SourceMap>,
{
    populate_with(&RuleRegistry::default(), record, use_default, sources)
}

/// Populate `record` from layers collected in `composer`.
///
/// Failures name the layer, and its file path when known, that supplied the
/// offending value.
///
/// # Errors
///
/// See [`populate_with`].
pub fn populate_from_composer<T: ReflectConf>(
    record: &mut T,
    use_default: bool,
    composer: SourceComposer,
) -> ReflectConfResult<()> {
    let layers = composer.into_layers();
    let merged = merge_sources(layers.iter().map(|layer| layer.values().clone())).unwrap_or_default();
    let origin_of = |key: &str| {
        layers
            .iter()
            .find(|layer| layer.values().contains_key(key))
            .map(SourceLayer::origin)
    };
    populate_merged(&RuleRegistry::default(), record, use_default, &merged, origin_of)
}

/// Populate `record` from `sources`, highest priority first.
///
/// For each annotated field, in declaration order: the first lookup key with
/// a non-blank value wins; otherwise the annotation's default is used when
/// `use_default` is set. Fields without a value are left untouched. The value
/// is trimmed, converted with the resolved rule, checked against the field's
/// shape and written.
///
/// # Errors
///
/// Returns the first [`ReflectConfError`] encountered. Fields processed
/// before the failing one keep their new values.
pub fn populate_with<T, I>(
    registry: &RuleRegistry,
    record: &mut T,
    use_default: bool,
    sources: I,
) -> ReflectConfResult<()>
where
    T: ReflectConf,
    I: IntoIterator<Item = SourceMap>,
{
    let merged = merge_sources(sources).unwrap_or_default();
    populate_merged(registry, record, use_default, &merged, |_| None)
}

fn populate_merged<T, F>(
    registry: &RuleRegistry,
    record: &mut T,
    use_default: bool,
    merged: &SourceMap,
    origin_of: F,
) -> ReflectConfResult<()>
where
    T: ReflectConf,
    F: Fn(&str) -> Option<SourceOrigin>,
{
    for field in T::fields() {
        let Some(annotation) = Annotation::from_tag(field.tag) else {
            tracing::trace!(field = field.name, "field has no population rule");
            continue;
        };
        let Some((key, raw)) = lookup(&annotation, merged, use_default) else {
            tracing::trace!(field = field.name, "no value for field");
            continue;
        };
        let origin = || key.and_then(&origin_of);
        populate_field(registry, record, &field, &annotation.rule, raw, origin)?;
    }
    Ok(())
}

fn populate_field<T: ReflectConf>(
    registry: &RuleRegistry,
    record: &mut T,
    field: &FieldDescriptor<T>,
    rule: &str,
    raw: &str,
    origin: impl Fn() -> Option<SourceOrigin>,
) -> ReflectConfResult<()> {
    let context = || {
        Box::new(FieldContext {
            record: T::type_name(),
            field: field.name,
            tag: field.tag.to_owned(),
            rule: rule.to_owned(),
            raw: raw.to_owned(),
            field_type: field.field_type.clone(),
            origin: origin(),
        })
    };
    let convert = resolve(rule, &field.field_type, registry).map_err(|source| {
        ReflectConfError::Resolve {
            context: context(),
            source,
        }
    })?;
    let value = convert(raw).map_err(|source| ReflectConfError::Convert {
        context: context(),
        source,
    })?;
    if value.shape() != field.field_type.shape() {
        return Err(ReflectConfError::Shape {
            context: context(),
            source: ShapeError {
                expected: field.field_type.clone(),
                found: value.shape().to_string(),
            },
        });
    }
    (field.assign)(record, value).map_err(|source| ReflectConfError::Shape {
        context: context(),
        source,
    })?;
    tracing::debug!(record = T::type_name(), field = field.name, rule, raw, "populated field");
    Ok(())
}

/// Resolve the trimmed raw value for a field and the key that supplied it.
///
/// Lookup keys are probed in order, skipping values that are blank after
/// trimming. The default applies only with `use_default` and is dropped when
/// it trims to nothing; its key is `None`.
fn lookup<'a>(
    annotation: &'a Annotation,
    merged: &'a SourceMap,
    use_default: bool,
) -> Option<(Option<&'a str>, &'a str)> {
    let found = annotation
        .keys
        .iter()
        .filter_map(|key| merged.get(key).map(|value| (key.as_str(), value.as_str())))
        .find(|(_, value)| !value.trim().is_empty());
    let (key, chosen) = match found {
        Some((key, value)) => (Some(key), value),
        None if use_default => (None, annotation.default.as_deref()?),
        None => return None,
    };
    let trimmed = chosen.trim();
    (!trimmed.is_empty()).then_some((key, trimmed))
}
