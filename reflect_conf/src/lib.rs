//! Populate typed configuration records from layered string maps.
//!
//! Each record field carries an annotation naming a conversion rule, the
//! lookup keys to probe and an optional default. [`populate()`] merges the
//! supplied [`SourceMap`]s by priority, finds a raw value for every annotated
//! field, converts it with the rule selected for the field's declared type and
//! writes the result back.
//!
//! Records describe their fields through the [`ReflectConf`](trait@ReflectConf) trait, which is
//! normally implemented with `#[derive(ReflectConf)]` from the companion
//! `reflect_conf_macros` crate:
//!
//! ```
//! use std::collections::HashMap;
//!
//! use reflect_conf::{ReflectConf, SourceMap};
//!
//! #[derive(Debug, Default, ReflectConf)]
//! struct Limits {
//!     #[reflect_conf(tag = r#"transformer:"direct" conf:"burst""#)]
//!     burst: i32,
//!     #[reflect_conf(transformer = "confMapIntString", conf = "names")]
//!     names: HashMap<i64, String>,
//! }
//!
//! let source = SourceMap::from([
//!     ("burst".to_owned(), "42".to_owned()),
//!     ("names".to_owned(), "1:one|x|2:two".to_owned()),
//! ]);
//! let mut limits = Limits::default();
//! limits.populate_from(false, [source])?;
//! assert_eq!(limits.burst, 42);
//! assert_eq!(limits.names.len(), 2);
//! # Ok::<_, reflect_conf::ReflectConfError>(())
//! ```

extern crate self as reflect_conf;

pub use reflect_conf_macros::ReflectConf;

mod convert;
mod error;
mod kind;
mod layer;
mod merge;
mod populate;
mod resolve;
mod rule;
mod tag;
mod value;

pub use convert::{
    Converter, fixed_converter, parse_bool, parse_scalar, scalar_converter, seq_converter,
    set_converter,
};
pub use error::{
    ConvertError, FieldContext, ReflectConfError, ReflectConfResult, RegistryError, ResolveError,
    ShapeError,
};
pub use kind::{FieldType, Match, ScalarKind, Shape, check_shape};
pub use layer::{Provenance, SourceComposer, SourceLayer, SourceOrigin};
pub use merge::{SourceMap, merge_sources};
pub use populate::{
    AssignFn, FieldDescriptor, ReflectConf, populate, populate_from_composer, populate_with,
};
pub use resolve::resolve;
pub use rule::{CustomRule, Rule, RuleRegistry, Separator, builtin_rule_names};
pub use tag::{Annotation, CONF_TAG, DEFAULT_TAG, TRANSFORMER_TAG, parse_annotation};
pub use value::{ConfKey, ConfScalar, ConfType, ConfValue, Scalar, assign_value};
