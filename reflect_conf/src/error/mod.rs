//! Error types produced while resolving rules and populating records.

mod context;
mod types;

pub use context::FieldContext;
pub use types::{
    ConvertError, ReflectConfError, ReflectConfResult, RegistryError, ResolveError, ShapeError,
};
