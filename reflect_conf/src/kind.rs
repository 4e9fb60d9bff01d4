//! Declared field types and the shape compatibility check.
//!
//! A [`FieldType`] is the runtime description of a record field's Rust type,
//! produced by [`ConfType::field_type`](crate::ConfType::field_type). Rules
//! are matched against it either by outer [`Shape`] alone or by exact
//! assignability, see [`check_shape`].

use std::fmt;

use crate::error::ResolveError;

/// Scalar kinds a field, sequence element, set member or map key may hold.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
#[non_exhaustive]
pub enum ScalarKind {
    /// `String`.
    String,
    /// `bool`.
    Bool,
    /// `i8`.
    I8,
    /// `i16`.
    I16,
    /// `i32`.
    I32,
    /// `i64`.
    I64,
    /// `isize`.
    Isize,
    /// `u8`.
    U8,
    /// `u16`.
    U16,
    /// `u32`.
    U32,
    /// `u64`.
    U64,
    /// `usize`.
    Usize,
    /// `f32`.
    F32,
    /// `f64`.
    F64,
    /// `Complex<f32>`.
    Complex32,
    /// `Complex<f64>`.
    Complex64,
}

impl ScalarKind {
    /// Rust spelling of the kind, used in diagnostics.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::String => "String",
            Self::Bool => "bool",
            Self::I8 => "i8",
            Self::I16 => "i16",
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::Isize => "isize",
            Self::U8 => "u8",
            Self::U16 => "u16",
            Self::U32 => "u32",
            Self::U64 => "u64",
            Self::Usize => "usize",
            Self::F32 => "f32",
            Self::F64 => "f64",
            Self::Complex32 => "Complex<f32>",
            Self::Complex64 => "Complex<f64>",
        }
    }

    /// Whether values of this kind can be set members or map keys.
    ///
    /// Floating-point and complex values have no total equality and so cannot
    /// be hashed.
    #[must_use]
    pub const fn is_hashable(self) -> bool {
        !matches!(
            self,
            Self::F32 | Self::F64 | Self::Complex32 | Self::Complex64
        )
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outer structural kind of a value, independent of element types.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Shape {
    /// A single scalar.
    Scalar,
    /// An ordered sequence (`Vec<T>`).
    Seq,
    /// A set (`HashSet<T>`), the Rust form of a mapping to unit.
    Set,
    /// A mapping from scalar keys to any field type.
    Map,
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Scalar => "scalar",
            Self::Seq => "sequence",
            Self::Set => "set",
            Self::Map => "map",
        })
    }
}

/// Declared type of a record field.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum FieldType {
    /// A single scalar value.
    Scalar(ScalarKind),
    /// `Vec<T>` of scalars.
    Seq(ScalarKind),
    /// `HashSet<T>` of hashable scalars.
    Set(ScalarKind),
    /// `HashMap<K, V>` keyed by a hashable scalar.
    Map(ScalarKind, Box<FieldType>),
}

impl FieldType {
    /// Outer shape of the declared type.
    #[must_use]
    pub const fn shape(&self) -> Shape {
        match self {
            Self::Scalar(_) => Shape::Scalar,
            Self::Seq(_) => Shape::Seq,
            Self::Set(_) => Shape::Set,
            Self::Map(..) => Shape::Map,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(kind) => write!(f, "{kind}"),
            Self::Seq(kind) => write!(f, "Vec<{kind}>"),
            Self::Set(kind) => write!(f, "HashSet<{kind}>"),
            Self::Map(key, value) => write!(f, "HashMap<{key}, {value}>"),
        }
    }
}

/// How strictly [`check_shape`] compares a field against a rule exemplar.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Match {
    /// Only the outer [`Shape`] must agree. Used by shape-parametric rules
    /// that specialise to the field's element or key type afterwards.
    Kind,
    /// The exemplar must be assignable to the field without conversion.
    Assignable,
}

/// Decide whether a rule producing `exemplar` may populate `field`.
///
/// # Errors
///
/// Returns [`ResolveError::Incompatible`] naming the field's declared type
/// when the comparison selected by `mode` fails.
///
/// # Examples
///
/// ```
/// use reflect_conf::{FieldType, Match, ScalarKind, check_shape};
///
/// let field = FieldType::Seq(ScalarKind::F32);
/// let exemplar = FieldType::Seq(ScalarKind::I64);
/// assert!(check_shape(&field, &exemplar, Match::Kind).is_ok());
/// assert!(check_shape(&field, &exemplar, Match::Assignable).is_err());
/// ```
pub fn check_shape(
    field: &FieldType,
    exemplar: &FieldType,
    mode: Match,
) -> Result<(), ResolveError> {
    let compatible = match mode {
        Match::Kind => field.shape() == exemplar.shape(),
        Match::Assignable => field == exemplar,
    };
    if compatible {
        Ok(())
    } else {
        Err(ResolveError::Incompatible {
            field_type: field.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for type descriptions and the compatibility check.

    use super::*;
    use rstest::rstest;

    fn nested_set() -> FieldType {
        FieldType::Map(
            ScalarKind::I64,
            Box::new(FieldType::Set(ScalarKind::U64)),
        )
    }

    #[rstest]
    #[case::scalar(FieldType::Scalar(ScalarKind::I32), "i32")]
    #[case::seq(FieldType::Seq(ScalarKind::String), "Vec<String>")]
    #[case::set(FieldType::Set(ScalarKind::U32), "HashSet<u32>")]
    #[case::nested(nested_set(), "HashMap<i64, HashSet<u64>>")]
    fn renders_rust_spelling(#[case] ty: FieldType, #[case] expected: &str) {
        assert_eq!(ty.to_string(), expected);
    }

    #[rstest]
    #[case::same_shape(FieldType::Seq(ScalarKind::U8), FieldType::Seq(ScalarKind::I64), true)]
    #[case::set_is_not_seq(FieldType::Set(ScalarKind::U8), FieldType::Seq(ScalarKind::I64), false)]
    #[case::map_is_not_set(nested_set(), FieldType::Set(ScalarKind::I64), false)]
    fn kind_match_compares_outer_shape(
        #[case] field: FieldType,
        #[case] exemplar: FieldType,
        #[case] ok: bool,
    ) {
        assert_eq!(check_shape(&field, &exemplar, Match::Kind).is_ok(), ok);
    }

    #[rstest]
    fn assignable_match_requires_identical_types() {
        let exemplar = nested_set();
        assert!(check_shape(&nested_set(), &exemplar, Match::Assignable).is_ok());

        let field = FieldType::Map(
            ScalarKind::I32,
            Box::new(FieldType::Set(ScalarKind::U64)),
        );
        let err = check_shape(&field, &exemplar, Match::Assignable)
            .expect_err("key kinds differ");
        assert!(err.to_string().contains("HashMap<i32, HashSet<u64>>"));
    }

    #[rstest]
    #[case(ScalarKind::String, true)]
    #[case(ScalarKind::Bool, true)]
    #[case(ScalarKind::Usize, true)]
    #[case(ScalarKind::F64, false)]
    #[case(ScalarKind::Complex32, false)]
    fn hashable_kinds(#[case] kind: ScalarKind, #[case] expected: bool) {
        assert_eq!(kind.is_hashable(), expected);
    }
}
