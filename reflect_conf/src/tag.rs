//! Field annotation parsing.
//!
//! Annotations use the `key:"value"` grammar: space-separated pairs whose
//! values are double-quoted and may contain backslash escapes. Parsing stops
//! at the first malformed pair and keeps whatever was read before it.

use std::collections::HashMap;

/// Annotation key naming the conversion rule.
pub const TRANSFORMER_TAG: &str = "transformer";
/// Annotation key listing `|`-separated lookup keys.
pub const CONF_TAG: &str = "conf";
/// Annotation key holding the default raw value.
pub const DEFAULT_TAG: &str = "default";

/// Parse an annotation string into its key/value pairs.
///
/// A pair whose quoted value contains an invalid escape is dropped, and
/// parsing continues with the next pair. Later duplicates replace earlier
/// ones.
///
/// # Examples
///
/// ```
/// use reflect_conf::parse_annotation;
///
/// let pairs = parse_annotation(r#"transformer:"direct" conf:"a|b" junk"#);
/// assert_eq!(pairs.get("transformer").map(String::as_str), Some("direct"));
/// assert_eq!(pairs.get("conf").map(String::as_str), Some("a|b"));
/// assert_eq!(pairs.len(), 2);
/// ```
#[must_use]
pub fn parse_annotation(raw: &str) -> HashMap<String, String> {
    let mut pairs = HashMap::new();
    let mut rest = raw;
    loop {
        let trimmed = rest.trim_start_matches(' ');
        if trimmed.is_empty() {
            break;
        }
        let Some((name, quoted, tail)) = split_pair(trimmed) else {
            break;
        };
        if let Some(value) = unquote(quoted) {
            pairs.insert(name.to_owned(), value);
        }
        rest = tail;
    }
    pairs
}

/// Split `name:"value"` off the front of `input`.
///
/// Returns the name, the quoted value including both quotes, and the
/// remainder.
fn split_pair(input: &str) -> Option<(&str, &str, &str)> {
    let name_len = input
        .bytes()
        .take_while(|&b| b > b' ' && b != b':' && b != b'"' && b != 0x7f)
        .count();
    if name_len == 0 {
        return None;
    }
    let (name, after_name) = input.split_at_checked(name_len)?;
    let quoted_start = after_name.strip_prefix(':')?;
    if !quoted_start.starts_with('"') {
        return None;
    }
    let bytes = quoted_start.as_bytes();
    let mut idx = 1;
    while let Some(&b) = bytes.get(idx) {
        match b {
            b'"' => break,
            b'\\' => idx += 2,
            _ => idx += 1,
        }
    }
    if bytes.get(idx).is_none() {
        return None;
    }
    let (quoted, tail) = quoted_start.split_at_checked(idx + 1)?;
    Some((name, quoted, tail))
}

/// Remove the surrounding quotes from `quoted` and resolve escapes.
///
/// Supports the simple escapes `\a \b \f \n \r \t \v \\ \"`, octal `\ooo`,
/// hex `\xhh` and unicode `\uhhhh` / `\Uhhhhhhhh`. Returns `None` for any
/// other escape or for an unescaped newline.
fn unquote(quoted: &str) -> Option<String> {
    let body = quoted.strip_prefix('"')?.strip_suffix('"')?;
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => out.push(unescape(&mut chars)?),
            '\n' | '"' => return None,
            other => out.push(other),
        }
    }
    Some(out)
}

fn unescape(chars: &mut std::str::Chars<'_>) -> Option<char> {
    let escaped = match chars.next()? {
        'a' => '\u{07}',
        'b' => '\u{08}',
        'f' => '\u{0c}',
        'n' => '\n',
        'r' => '\r',
        't' => '\t',
        'v' => '\u{0b}',
        '\\' => '\\',
        '"' => '"',
        'x' => char::from(u8::try_from(read_radix(chars, 2, 16)?).ok()?),
        'u' => char::from_u32(read_radix(chars, 4, 16)?)?,
        'U' => char::from_u32(read_radix(chars, 8, 16)?)?,
        first @ '0'..='7' => {
            let high = first.to_digit(8)?;
            let low = read_radix(chars, 2, 8)?;
            char::from(u8::try_from(high * 64 + low).ok()?)
        }
        _ => return None,
    };
    Some(escaped)
}

fn read_radix(chars: &mut std::str::Chars<'_>, digits: usize, radix: u32) -> Option<u32> {
    let mut value = 0_u32;
    for _ in 0..digits {
        let digit = chars.next()?.to_digit(radix)?;
        value = value.checked_mul(radix)?.checked_add(digit)?;
    }
    Some(value)
}

/// The population-relevant part of an annotation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Annotation {
    /// Rule name.
    pub rule: String,
    /// Lookup keys in priority order.
    pub keys: Vec<String>,
    /// Default raw value, if declared.
    pub default: Option<String>,
}

impl Annotation {
    /// Extract the rule, keys and default from a raw annotation.
    ///
    /// Returns `None` when either the rule or the lookup keys are missing,
    /// which opts the field out of population.
    #[must_use]
    pub fn from_tag(raw: &str) -> Option<Self> {
        let mut pairs = parse_annotation(raw);
        let rule = pairs.remove(TRANSFORMER_TAG)?;
        let keys = pairs.remove(CONF_TAG)?;
        Some(Self {
            rule,
            keys: keys.split('|').map(str::to_owned).collect(),
            default: pairs.remove(DEFAULT_TAG),
        })
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for the annotation grammar.

    use super::*;
    use rstest::rstest;

    #[rstest]
    fn parses_all_pairs() {
        let pairs = parse_annotation(r#"transformer:"diSlice" conf:"a|b"  default:"1|2""#);
        assert_eq!(pairs.len(), 3);
        assert_eq!(pairs.get("default").map(String::as_str), Some("1|2"));
    }

    #[rstest]
    #[case::escaped_quote(r#"k:"say \"hi\"""#, "say \"hi\"")]
    #[case::tab(r#"k:"a\tb""#, "a\tb")]
    #[case::hex(r#"k:"\x41""#, "A")]
    #[case::octal(r#"k:"\101""#, "A")]
    #[case::unicode(r#"k:"\u00e9""#, "é")]
    #[case::utf8_literal(r#"k:"ça""#, "ça")]
    fn resolves_escapes(#[case] raw: &str, #[case] expected: &str) {
        let pairs = parse_annotation(raw);
        assert_eq!(pairs.get("k").map(String::as_str), Some(expected));
    }

    #[rstest]
    #[case::missing_colon(r#"a:"1" b"2" c:"3""#)]
    #[case::unterminated(r#"a:"1" b:"2"#)]
    #[case::space_before_colon(r#"a:"1" b :"2""#)]
    fn stops_at_first_malformed_pair(#[case] raw: &str) {
        let pairs = parse_annotation(raw);
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs.get("a").map(String::as_str), Some("1"));
    }

    #[rstest]
    fn skips_pair_with_bad_escape_and_continues() {
        let pairs = parse_annotation(r#"a:"\q" b:"2""#);
        assert!(!pairs.contains_key("a"));
        assert_eq!(pairs.get("b").map(String::as_str), Some("2"));
    }

    #[rstest]
    fn empty_annotation_yields_nothing() {
        assert!(parse_annotation("").is_empty());
        assert!(parse_annotation("   ").is_empty());
    }

    #[rstest]
    fn annotation_splits_lookup_keys() {
        let annotation = Annotation::from_tag(r#"transformer:"direct" conf:"port|PORT" default:"80""#)
            .expect("rule and keys present");
        assert_eq!(annotation.rule, "direct");
        assert_eq!(annotation.keys, vec!["port", "PORT"]);
        assert_eq!(annotation.default.as_deref(), Some("80"));
    }

    #[rstest]
    #[case::no_rule(r#"conf:"port""#)]
    #[case::no_keys(r#"transformer:"direct" default:"1""#)]
    #[case::empty("")]
    fn annotation_requires_rule_and_keys(#[case] raw: &str) {
        assert!(Annotation::from_tag(raw).is_none());
    }
}
