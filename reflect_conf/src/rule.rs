//! Rule identifiers and the registry of caller-supplied rules.
//!
//! Built-in rules form the closed [`Rule`] enumeration. Shape-parametric
//! rules carry their [`Separator`], selected either by a name suffix
//! (`diSliceComma`) or by the explicit `diSliceSep(,)` form.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::convert::Converter;
use crate::error::{ConvertError, RegistryError, ResolveError};
use crate::kind::FieldType;
use crate::value::ConfType;

/// Token separator for sequence and set rules.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub enum Separator {
    /// `|`
    #[default]
    Pipe,
    /// `;`
    Semicolon,
    /// `:`
    Colon,
    /// `,`
    Comma,
}

impl Separator {
    /// The separator character.
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            Self::Pipe => '|',
            Self::Semicolon => ';',
            Self::Colon => ':',
            Self::Comma => ',',
        }
    }

    const fn suffix(self) -> &'static str {
        match self {
            Self::Pipe => "",
            Self::Semicolon => "Semicolon",
            Self::Colon => "Colon",
            Self::Comma => "Comma",
        }
    }

    fn from_suffix(suffix: &str) -> Option<Self> {
        match suffix {
            "" => Some(Self::Pipe),
            "Semicolon" => Some(Self::Semicolon),
            "Colon" => Some(Self::Colon),
            "Comma" => Some(Self::Comma),
            _ => None,
        }
    }

    fn from_explicit(explicit: &str) -> Option<Self> {
        match explicit {
            "|" => Some(Self::Pipe),
            ";" => Some(Self::Semicolon),
            ":" => Some(Self::Colon),
            "," => Some(Self::Comma),
            _ => None,
        }
    }
}

const DIRECT: &str = "direct";
const DI_SLICE: &str = "diSlice";
const DI_MAP_STRUCT: &str = "diMapStruct";

/// Built-in conversion rules.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Rule {
    /// One raw string to one scalar of the field's type.
    Direct,
    /// Split into a `Vec` of the field's element type.
    DirectSlice(Separator),
    /// Split into a `HashSet` of the field's member type.
    DirectSet(Separator),
    /// Signed duration relative to now, as Unix seconds (`i64`).
    TimeDuration,
    /// `k:v|k:v` into `HashMap<i32, f32>`.
    ConfMapIntFloat,
    /// `k:v|k:v` into `HashMap<i32, i32>`.
    ConfMapIntInt,
    /// `k:v|k:v` into `HashMap<i64, String>`.
    ConfMapIntString,
    /// `k:a;b|k:c` into `HashMap<i64, Vec<String>>`.
    ConfMapIntStrings,
    /// `k:a|b;k:c` into `HashMap<i64, HashSet<u64>>`.
    ConfMapIntUintMap,
    /// `k:v|k:v` into `HashMap<String, f32>`.
    ConfMapStringFloat,
}

impl Rule {
    /// Every fixed-shape rule, in catalogue order.
    pub const FIXED: [Self; 7] = [
        Self::TimeDuration,
        Self::ConfMapIntFloat,
        Self::ConfMapIntInt,
        Self::ConfMapIntString,
        Self::ConfMapIntStrings,
        Self::ConfMapIntUintMap,
        Self::ConfMapStringFloat,
    ];

    /// Look up a built-in rule by name.
    ///
    /// # Examples
    ///
    /// ```
    /// use reflect_conf::{Rule, Separator};
    ///
    /// assert_eq!(Rule::parse("diSliceComma"), Some(Rule::DirectSlice(Separator::Comma)));
    /// assert_eq!(Rule::parse("diMapStructSep(|)"), Some(Rule::DirectSet(Separator::Pipe)));
    /// assert_eq!(Rule::parse("nope"), None);
    /// ```
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            DIRECT => Some(Self::Direct),
            "timeDuration" => Some(Self::TimeDuration),
            "confMapIntFloat" => Some(Self::ConfMapIntFloat),
            "confMapIntInt" => Some(Self::ConfMapIntInt),
            "confMapIntString" => Some(Self::ConfMapIntString),
            "confMapIntStrings" => Some(Self::ConfMapIntStrings),
            "confMapIntUintMap" => Some(Self::ConfMapIntUintMap),
            "confMapStringFloat" => Some(Self::ConfMapStringFloat),
            _ => Self::parse_parametric(name),
        }
    }

    fn parse_parametric(name: &str) -> Option<Self> {
        if let Some(rest) = name.strip_prefix(DI_SLICE) {
            return parse_separator(rest).map(Self::DirectSlice);
        }
        let rest = name.strip_prefix(DI_MAP_STRUCT)?;
        parse_separator(rest).map(Self::DirectSet)
    }

    /// Canonical name of the rule.
    #[must_use]
    pub fn name(self) -> String {
        match self {
            Self::Direct => DIRECT.to_owned(),
            Self::DirectSlice(sep) => format!("{DI_SLICE}{}", sep.suffix()),
            Self::DirectSet(sep) => format!("{DI_MAP_STRUCT}{}", sep.suffix()),
            Self::TimeDuration => "timeDuration".to_owned(),
            Self::ConfMapIntFloat => "confMapIntFloat".to_owned(),
            Self::ConfMapIntInt => "confMapIntInt".to_owned(),
            Self::ConfMapIntString => "confMapIntString".to_owned(),
            Self::ConfMapIntStrings => "confMapIntStrings".to_owned(),
            Self::ConfMapIntUintMap => "confMapIntUintMap".to_owned(),
            Self::ConfMapStringFloat => "confMapStringFloat".to_owned(),
        }
    }
}

/// Separator from a name suffix: `""`, `Comma`, or `Sep(,)`.
fn parse_separator(rest: &str) -> Option<Separator> {
    rest.strip_prefix("Sep(")
        .and_then(|inner| inner.strip_suffix(')'))
        .map_or_else(|| Separator::from_suffix(rest), Separator::from_explicit)
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

impl FromStr for Rule {
    type Err = ResolveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| ResolveError::UnknownRule(s.to_owned()))
    }
}

/// A caller-supplied rule and the type it produces.
#[derive(Clone)]
pub struct CustomRule {
    exemplar: FieldType,
    convert: Converter,
}

impl CustomRule {
    /// Type the rule produces. Fields must match it exactly.
    #[must_use]
    pub const fn exemplar(&self) -> &FieldType {
        &self.exemplar
    }

    pub(crate) fn converter(&self) -> Converter {
        Arc::clone(&self.convert)
    }
}

impl fmt::Debug for CustomRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomRule")
            .field("exemplar", &self.exemplar)
            .field("convert", &"<fn>")
            .finish()
    }
}

/// Named custom rules consulted after the built-in catalogue.
///
/// # Examples
///
/// ```
/// use reflect_conf::{ConvertError, RuleRegistry};
///
/// let mut registry = RuleRegistry::new();
/// registry
///     .register("upper", |raw: &str| Ok::<_, ConvertError>(raw.to_uppercase()))
///     .expect("name is free");
/// assert!(registry.get("upper").is_some());
/// assert!(registry.register("direct", |raw: &str| Ok::<_, ConvertError>(raw.to_owned())).is_err());
/// ```
#[derive(Clone, Debug, Default)]
pub struct RuleRegistry {
    rules: HashMap<String, CustomRule>,
}

impl RuleRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `convert` under `name`, replacing any earlier custom rule of
    /// the same name.
    ///
    /// The produced type `V` becomes the rule's exemplar; only fields whose
    /// declared type is exactly `V` may use the rule.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Reserved`] when `name` is a built-in rule and
    /// [`RegistryError::InvalidName`] when it is blank or padded.
    pub fn register<V, F>(&mut self, name: &str, convert: F) -> Result<(), RegistryError>
    where
        V: ConfType + 'static,
        F: Fn(&str) -> Result<V, ConvertError> + Send + Sync + 'static,
    {
        if name.is_empty() || name.trim() != name {
            return Err(RegistryError::InvalidName(name.to_owned()));
        }
        if Rule::parse(name).is_some() {
            return Err(RegistryError::Reserved(name.to_owned()));
        }
        let erased: Converter =
            Arc::new(move |raw: &str| convert(raw).map(ConfType::into_value));
        self.rules.insert(
            name.to_owned(),
            CustomRule {
                exemplar: V::field_type(),
                convert: erased,
            },
        );
        Ok(())
    }

    /// Custom rule registered under `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&CustomRule> {
        self.rules.get(name)
    }

    /// Number of registered rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether no custom rules are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Canonical names of every built-in rule, including all separator variants.
#[must_use]
pub fn builtin_rule_names() -> Vec<String> {
    let separators = [
        Separator::Pipe,
        Separator::Semicolon,
        Separator::Colon,
        Separator::Comma,
    ];
    std::iter::once(Rule::Direct)
        .chain(separators.iter().copied().map(Rule::DirectSlice))
        .chain(separators.iter().copied().map(Rule::DirectSet))
        .chain(Rule::FIXED)
        .map(Rule::name)
        .collect()
}
