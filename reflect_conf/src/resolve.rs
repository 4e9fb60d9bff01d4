//! Rule resolution: from a rule name and a field type to one converter.

use crate::convert::{Converter, fixed_converter, scalar_converter, seq_converter, set_converter};
use crate::error::ResolveError;
use crate::kind::{FieldType, Match, ScalarKind, check_shape};
use crate::rule::{Rule, RuleRegistry};

/// Select the converter for `rule_name` on a field declared as `field_type`.
///
/// Built-in rules are tried first, then `registry`. Fixed-shape and custom
/// rules require their exemplar to be assignable to the field. Sequence and
/// set rules only check the outer shape and then specialise to the field's
/// element or member kind.
///
/// # Errors
///
/// - [`ResolveError::UnknownRule`] when no rule has that name;
/// - [`ResolveError::Incompatible`] when the rule cannot produce the field's
///   type;
/// - [`ResolveError::UnsupportedKind`] when a parametric rule cannot handle
///   the field's element kind.
///
/// # Examples
///
/// ```
/// use reflect_conf::{ConfValue, FieldType, RuleRegistry, Scalar, ScalarKind, resolve};
///
/// let registry = RuleRegistry::new();
/// let convert = resolve("diSliceComma", &FieldType::Seq(ScalarKind::U8), &registry)?;
/// assert_eq!(
///     convert("1,x,2")?,
///     ConfValue::Seq(vec![Scalar::U8(1), Scalar::U8(2)])
/// );
/// # Ok::<_, Box<dyn std::error::Error>>(())
/// ```
pub fn resolve(
    rule_name: &str,
    field_type: &FieldType,
    registry: &RuleRegistry,
) -> Result<Converter, ResolveError> {
    let Some(rule) = Rule::parse(rule_name) else {
        let custom = registry
            .get(rule_name)
            .ok_or_else(|| ResolveError::UnknownRule(rule_name.to_owned()))?;
        check_shape(field_type, custom.exemplar(), Match::Assignable)?;
        return Ok(custom.converter());
    };
    resolve_builtin(rule, field_type)
}

fn resolve_builtin(rule: Rule, field_type: &FieldType) -> Result<Converter, ResolveError> {
    match rule {
        Rule::Direct => match field_type {
            FieldType::Scalar(kind) => Ok(scalar_converter(*kind)),
            other => Err(unsupported(rule, other.to_string())),
        },
        Rule::DirectSlice(sep) => {
            check_shape(field_type, &FieldType::Seq(ScalarKind::I64), Match::Kind)?;
            match field_type {
                FieldType::Seq(kind) => Ok(seq_converter(*kind, sep)),
                other => Err(unsupported(rule, other.to_string())),
            }
        }
        Rule::DirectSet(sep) => {
            check_shape(field_type, &FieldType::Set(ScalarKind::I64), Match::Kind)?;
            match field_type {
                FieldType::Set(kind) => set_converter(*kind, sep),
                other => Err(unsupported(rule, other.to_string())),
            }
        }
        fixed => {
            let (exemplar, convert) =
                fixed_converter(fixed).ok_or_else(|| unsupported(fixed, field_type.to_string()))?;
            check_shape(field_type, &exemplar, Match::Assignable)?;
            Ok(convert)
        }
    }
}

fn unsupported(rule: Rule, found: String) -> ResolveError {
    ResolveError::UnsupportedKind {
        rule: rule.name(),
        found,
    }
}
