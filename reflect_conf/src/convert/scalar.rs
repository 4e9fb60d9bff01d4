//! Scalar parsing for the `direct` rule and for collection tokens.

use std::sync::Arc;

use num_complex::{Complex32, Complex64};

use super::Converter;
use crate::error::ConvertError;
use crate::kind::ScalarKind;
use crate::value::{ConfValue, Scalar};

/// Parse a boolean using the accepted spellings `1 t T TRUE true True` and
/// `0 f F FALSE false False`.
#[must_use]
pub fn parse_bool(raw: &str) -> Option<bool> {
    match raw {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

/// Parse an unsigned integer at 64 bits. A leading sign is rejected.
pub(super) fn parse_unsigned(raw: &str) -> Option<u64> {
    if raw.starts_with('+') {
        return None;
    }
    raw.parse().ok()
}

/// Parse `a+bi`, `bi` or `a`, optionally wrapped in parentheses.
fn parse_complex(raw: &str) -> Option<Complex64> {
    let inner = raw
        .strip_prefix('(')
        .and_then(|rest| rest.strip_suffix(')'))
        .unwrap_or(raw);
    inner.parse().ok()
}

/// Convert `raw` into a scalar of `kind`.
///
/// Integers are parsed at 64 bits and truncated to the target width;
/// floating-point and complex values are parsed at double precision and
/// narrowed.
///
/// # Errors
///
/// Returns [`ConvertError::InvalidScalar`] when `raw` is not valid for
/// `kind`.
///
/// # Examples
///
/// ```
/// use reflect_conf::{ScalarKind, parse_scalar, Scalar};
///
/// assert_eq!(parse_scalar(ScalarKind::I8, "300").ok(), Some(Scalar::I8(44)));
/// assert!(parse_scalar(ScalarKind::Bool, "yes").is_err());
/// ```
#[expect(
    clippy::cast_possible_truncation,
    reason = "integers and floats are narrowed to the declared field width"
)]
pub fn parse_scalar(kind: ScalarKind, raw: &str) -> Result<Scalar, ConvertError> {
    let invalid = || ConvertError::InvalidScalar {
        kind,
        raw: raw.to_owned(),
    };
    let signed = || raw.parse::<i64>().map_err(|_| invalid());
    let unsigned = || parse_unsigned(raw).ok_or_else(invalid);
    let float = || raw.parse::<f64>().map_err(|_| invalid());
    let complex = || parse_complex(raw).ok_or_else(invalid);
    Ok(match kind {
        ScalarKind::String => Scalar::String(raw.to_owned()),
        ScalarKind::Bool => Scalar::Bool(parse_bool(raw).ok_or_else(invalid)?),
        ScalarKind::I8 => Scalar::I8(signed()? as i8),
        ScalarKind::I16 => Scalar::I16(signed()? as i16),
        ScalarKind::I32 => Scalar::I32(signed()? as i32),
        ScalarKind::I64 => Scalar::I64(signed()?),
        ScalarKind::Isize => Scalar::Isize(signed()? as isize),
        ScalarKind::U8 => Scalar::U8(unsigned()? as u8),
        ScalarKind::U16 => Scalar::U16(unsigned()? as u16),
        ScalarKind::U32 => Scalar::U32(unsigned()? as u32),
        ScalarKind::U64 => Scalar::U64(unsigned()?),
        ScalarKind::Usize => Scalar::Usize(unsigned()? as usize),
        ScalarKind::F32 => Scalar::F32(float()? as f32),
        ScalarKind::F64 => Scalar::F64(float()?),
        ScalarKind::Complex32 => {
            let value = complex()?;
            Scalar::Complex32(Complex32::new(value.re as f32, value.im as f32))
        }
        ScalarKind::Complex64 => Scalar::Complex64(complex()?),
    })
}

/// Converter for the `direct` rule on a scalar field of `kind`.
#[must_use]
pub fn scalar_converter(kind: ScalarKind) -> Converter {
    Arc::new(move |raw: &str| parse_scalar(kind, raw).map(ConfValue::Scalar))
}
