//! The conversion catalogue.
//!
//! Every function here turns one trimmed, non-blank raw string into a
//! [`ConfValue`]. Scalar rules fail on malformed input; composite rules drop
//! malformed tokens or entries and return whatever parsed.

mod collection;
mod fixed;
mod scalar;

use std::sync::Arc;

use crate::error::ConvertError;
use crate::value::ConfValue;

pub use collection::{seq_converter, set_converter};
pub use fixed::fixed_converter;
pub use scalar::{parse_bool, parse_scalar, scalar_converter};

/// A conversion function specialised to one field type.
pub type Converter = Arc<dyn Fn(&str) -> Result<ConfValue, ConvertError> + Send + Sync>;
