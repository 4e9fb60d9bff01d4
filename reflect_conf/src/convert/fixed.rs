//! Fixed-shape rules.
//!
//! Each rule commits to one concrete result type, recorded as its exemplar.
//! Map rules read `key:value` entries; an entry with the wrong arity or an
//! unparsable part is skipped and the remaining entries still populate.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::{TimeDelta, Utc};

use super::Converter;
use super::scalar::parse_unsigned;
use crate::error::ConvertError;
use crate::kind::FieldType;
use crate::rule::Rule;
use crate::value::{ConfType, ConfValue};

/// Exemplar type and converter for a fixed-shape rule.
///
/// Returns `None` for the shape-parametric rules.
#[must_use]
pub fn fixed_converter(rule: Rule) -> Option<(FieldType, Converter)> {
    match rule {
        Rule::Direct | Rule::DirectSlice(_) | Rule::DirectSet(_) => None,
        Rule::TimeDuration => Some(typed(time_duration)),
        Rule::ConfMapIntFloat => Some(typed(conf_map_int_float)),
        Rule::ConfMapIntInt => Some(typed(conf_map_int_int)),
        Rule::ConfMapIntString => Some(typed(conf_map_int_string)),
        Rule::ConfMapIntStrings => Some(typed(conf_map_int_strings)),
        Rule::ConfMapIntUintMap => Some(typed(conf_map_int_uint_map)),
        Rule::ConfMapStringFloat => Some(typed(conf_map_string_float)),
    }
}

fn typed<V: ConfType + 'static>(convert: fn(&str) -> V) -> (FieldType, Converter) {
    let erased: Converter = Arc::new(move |raw: &str| -> Result<ConfValue, ConvertError> {
        Ok(convert(raw).into_value())
    });
    (V::field_type(), erased)
}

/// Parse a signed duration such as `-12h` or `+90m`.
///
/// Unit spellings follow `humantime`, so `1day` and `1 h` are accepted too.
fn parse_signed_duration(raw: &str) -> Result<TimeDelta, String> {
    let (negative, body) = raw
        .strip_prefix('-')
        .map_or_else(|| (false, raw.strip_prefix('+').unwrap_or(raw)), |rest| (true, rest));
    let magnitude = humantime::parse_duration(body).map_err(|err| err.to_string())?;
    let delta = TimeDelta::from_std(magnitude).map_err(|err| err.to_string())?;
    Ok(if negative { -delta } else { delta })
}

/// Current Unix time shifted by a signed duration.
///
/// An unparsable duration counts as zero, so the result is the current time.
fn time_duration(raw: &str) -> i64 {
    let offset = parse_signed_duration(raw).unwrap_or_else(|err| {
        tracing::warn!(raw, error = %err, "unparsable duration treated as zero");
        TimeDelta::zero()
    });
    Utc::now()
        .checked_add_signed(offset)
        .unwrap_or_else(Utc::now)
        .timestamp()
}

/// Split `raw` into `key:value` pairs on `entry_sep`, dropping entries whose
/// arity is not two.
fn entries(raw: &str, entry_sep: char) -> impl Iterator<Item = (&str, &str)> {
    raw.split(entry_sep).filter_map(|entry| {
        let mut parts = entry.split(':');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(key), Some(value), None) => Some((key, value)),
            _ => None,
        }
    })
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "keys are parsed at 64 bits and narrowed like the direct rule"
)]
fn int32_key(raw: &str) -> Option<i32> {
    raw.parse::<i64>().ok().map(|key| key as i32)
}

/// Parse a single-precision value. Finite input outside the `f32` range is
/// rejected rather than saturating to infinity.
#[expect(
    clippy::cast_possible_truncation,
    reason = "values are parsed at double precision and narrowed"
)]
fn float32_value(raw: &str) -> Option<f32> {
    let wide = raw.parse::<f64>().ok()?;
    let narrowed = wide as f32;
    (!narrowed.is_infinite() || wide.is_infinite()).then_some(narrowed)
}

fn conf_map_int_float(raw: &str) -> HashMap<i32, f32> {
    entries(raw, '|')
        .filter_map(|(key, value)| Some((int32_key(key)?, float32_value(value)?)))
        .collect()
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "values are parsed at 64 bits and narrowed like the direct rule"
)]
fn conf_map_int_int(raw: &str) -> HashMap<i32, i32> {
    entries(raw, '|')
        .filter_map(|(key, value)| {
            Some((int32_key(key)?, value.parse::<i64>().ok()? as i32))
        })
        .collect()
}

fn conf_map_int_string(raw: &str) -> HashMap<i64, String> {
    entries(raw, '|')
        .filter_map(|(key, value)| Some((key.parse().ok()?, value.to_owned())))
        .collect()
}

fn conf_map_int_strings(raw: &str) -> HashMap<i64, Vec<String>> {
    entries(raw, '|')
        .filter_map(|(key, value)| {
            let items = value.split(';').map(str::to_owned).collect();
            Some((key.parse().ok()?, items))
        })
        .collect()
}

/// `key:v|v;key:v`. Keys must fit in 32 bits. A key is present only when at
/// least one of its values parses.
fn conf_map_int_uint_map(raw: &str) -> HashMap<i64, HashSet<u64>> {
    let mut out: HashMap<i64, HashSet<u64>> = HashMap::new();
    for entry in raw.trim().split(';') {
        let mut parts = entry.trim().split(':');
        let (Some(key), Some(values), None) = (parts.next(), parts.next(), parts.next()) else {
            continue;
        };
        let Ok(outer) = key.parse::<i32>() else {
            continue;
        };
        for member in values.split('|').filter_map(parse_unsigned) {
            out.entry(i64::from(outer)).or_default().insert(member);
        }
    }
    out
}

fn conf_map_string_float(raw: &str) -> HashMap<String, f32> {
    entries(raw, '|')
        .filter_map(|(key, value)| Some((key.to_owned(), float32_value(value)?)))
        .collect()
}
