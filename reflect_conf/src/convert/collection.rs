//! Shape-parametric converters for sequences and sets.
//!
//! Both split the raw value on the rule's separator and parse each token with
//! [`parse_scalar`]. Tokens that fail to parse are dropped, so the result may
//! be shorter than the token count, down to an empty collection.

use std::sync::Arc;

use super::{Converter, parse_scalar};
use crate::error::ResolveError;
use crate::kind::ScalarKind;
use crate::rule::{Rule, Separator};
use crate::value::{ConfValue, Scalar};

fn parse_tokens(kind: ScalarKind, raw: &str, sep: Separator) -> Vec<Scalar> {
    raw.split(sep.as_char())
        .filter_map(|token| parse_scalar(kind, token).ok())
        .collect()
}

/// Converter splitting into a sequence of `kind` elements.
#[must_use]
pub fn seq_converter(kind: ScalarKind, sep: Separator) -> Converter {
    Arc::new(move |raw: &str| Ok(ConfValue::Seq(parse_tokens(kind, raw, sep))))
}

/// Converter splitting into a set of `kind` members.
///
/// # Errors
///
/// Returns [`ResolveError::UnsupportedKind`] for kinds that cannot be hashed.
pub fn set_converter(kind: ScalarKind, sep: Separator) -> Result<Converter, ResolveError> {
    if !kind.is_hashable() {
        return Err(ResolveError::UnsupportedKind {
            rule: Rule::DirectSet(sep).name(),
            found: kind.to_string(),
        });
    }
    Ok(Arc::new(move |raw: &str| {
        Ok(ConfValue::Set(parse_tokens(kind, raw, sep)))
    }))
}
