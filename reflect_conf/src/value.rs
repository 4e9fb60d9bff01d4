//! Converted values and the traits linking them to concrete Rust types.
//!
//! Conversion functions produce a [`ConfValue`]; a field's assignment
//! function turns it back into the field's concrete type through
//! [`ConfType::from_value`].

use std::collections::{HashMap, HashSet};
use std::hash::{BuildHasher, Hash};

use num_complex::{Complex32, Complex64};

use crate::error::ShapeError;
use crate::kind::{FieldType, ScalarKind, Shape};

/// A single converted scalar.
#[derive(Clone, Debug, PartialEq)]
#[non_exhaustive]
pub enum Scalar {
    /// `String` value.
    String(String),
    /// `bool` value.
    Bool(bool),
    /// `i8` value.
    I8(i8),
    /// `i16` value.
    I16(i16),
    /// `i32` value.
    I32(i32),
    /// `i64` value.
    I64(i64),
    /// `isize` value.
    Isize(isize),
    /// `u8` value.
    U8(u8),
    /// `u16` value.
    U16(u16),
    /// `u32` value.
    U32(u32),
    /// `u64` value.
    U64(u64),
    /// `usize` value.
    Usize(usize),
    /// `f32` value.
    F32(f32),
    /// `f64` value.
    F64(f64),
    /// `Complex<f32>` value.
    Complex32(Complex32),
    /// `Complex<f64>` value.
    Complex64(Complex64),
}

impl Scalar {
    /// Kind of the held scalar.
    #[must_use]
    pub const fn kind(&self) -> ScalarKind {
        match self {
            Self::String(_) => ScalarKind::String,
            Self::Bool(_) => ScalarKind::Bool,
            Self::I8(_) => ScalarKind::I8,
            Self::I16(_) => ScalarKind::I16,
            Self::I32(_) => ScalarKind::I32,
            Self::I64(_) => ScalarKind::I64,
            Self::Isize(_) => ScalarKind::Isize,
            Self::U8(_) => ScalarKind::U8,
            Self::U16(_) => ScalarKind::U16,
            Self::U32(_) => ScalarKind::U32,
            Self::U64(_) => ScalarKind::U64,
            Self::Usize(_) => ScalarKind::Usize,
            Self::F32(_) => ScalarKind::F32,
            Self::F64(_) => ScalarKind::F64,
            Self::Complex32(_) => ScalarKind::Complex32,
            Self::Complex64(_) => ScalarKind::Complex64,
        }
    }
}

/// A converted value of any supported shape.
///
/// Sets and maps are carried as ordered entry lists; duplicates collapse (and
/// later map entries win) when the value is collected into the field's
/// concrete container.
#[derive(Clone, Debug, PartialEq)]
pub enum ConfValue {
    /// One scalar.
    Scalar(Scalar),
    /// Sequence elements in order.
    Seq(Vec<Scalar>),
    /// Set members.
    Set(Vec<Scalar>),
    /// Key/value entries.
    Map(Vec<(Scalar, ConfValue)>),
}

impl ConfValue {
    /// Outer shape of the value.
    #[must_use]
    pub const fn shape(&self) -> Shape {
        match self {
            Self::Scalar(_) => Shape::Scalar,
            Self::Seq(_) => Shape::Seq,
            Self::Set(_) => Shape::Set,
            Self::Map(_) => Shape::Map,
        }
    }

    fn describe(&self) -> String {
        match self {
            Self::Scalar(scalar) => scalar.kind().to_string(),
            other => other.shape().to_string(),
        }
    }
}

/// Rust types usable as a scalar field, sequence element or map value.
pub trait ConfScalar: Sized {
    /// Kind tag of the type.
    const KIND: ScalarKind;

    /// Extract the value when `scalar` holds this exact kind.
    fn from_scalar(scalar: Scalar) -> Option<Self>;

    /// Wrap the value.
    fn into_scalar(self) -> Scalar;
}

/// Scalars that can be set members or map keys.
pub trait ConfKey: ConfScalar + Eq + Hash {}

/// Rust types a conversion rule can populate.
pub trait ConfType: Sized {
    /// Declared type description used for rule resolution.
    fn field_type() -> FieldType;

    /// Rebuild the concrete value from a converted one.
    ///
    /// # Errors
    ///
    /// Returns [`ShapeError`] when the value's shape or scalar kinds differ
    /// from [`Self::field_type`].
    fn from_value(value: ConfValue) -> Result<Self, ShapeError>;

    /// Convert into the dynamic representation.
    fn into_value(self) -> ConfValue;
}

fn mismatch<T: ConfType>(found: &ConfValue) -> ShapeError {
    ShapeError {
        expected: T::field_type(),
        found: found.describe(),
    }
}

macro_rules! conf_scalar {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl ConfScalar for $ty {
                const KIND: ScalarKind = ScalarKind::$variant;

                fn from_scalar(scalar: Scalar) -> Option<Self> {
                    match scalar {
                        Scalar::$variant(value) => Some(value),
                        _ => None,
                    }
                }

                fn into_scalar(self) -> Scalar {
                    Scalar::$variant(self)
                }
            }

            impl ConfType for $ty {
                fn field_type() -> FieldType {
                    FieldType::Scalar(ScalarKind::$variant)
                }

                fn from_value(value: ConfValue) -> Result<Self, ShapeError> {
                    match value {
                        ConfValue::Scalar(Scalar::$variant(inner)) => Ok(inner),
                        other => Err(mismatch::<Self>(&other)),
                    }
                }

                fn into_value(self) -> ConfValue {
                    ConfValue::Scalar(Scalar::$variant(self))
                }
            }
        )*
    };
}

conf_scalar! {
    String => String,
    bool => Bool,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    isize => Isize,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    usize => Usize,
    f32 => F32,
    f64 => F64,
    Complex32 => Complex32,
    Complex64 => Complex64,
}

impl ConfKey for String {}
impl ConfKey for bool {}
impl ConfKey for i8 {}
impl ConfKey for i16 {}
impl ConfKey for i32 {}
impl ConfKey for i64 {}
impl ConfKey for isize {}
impl ConfKey for u8 {}
impl ConfKey for u16 {}
impl ConfKey for u32 {}
impl ConfKey for u64 {}
impl ConfKey for usize {}

/// Collect scalars of one kind, failing on the first foreign kind.
fn collect_scalars<T, C>(items: Vec<Scalar>) -> Option<C>
where
    T: ConfScalar,
    C: FromIterator<T>,
{
    items.into_iter().map(T::from_scalar).collect()
}

impl<T: ConfScalar> ConfType for Vec<T> {
    fn field_type() -> FieldType {
        FieldType::Seq(T::KIND)
    }

    fn from_value(value: ConfValue) -> Result<Self, ShapeError> {
        match value {
            ConfValue::Seq(items) => {
                let found = ConfValue::Seq(Vec::new());
                collect_scalars::<T, Self>(items).ok_or_else(|| mismatch::<Self>(&found))
            }
            other => Err(mismatch::<Self>(&other)),
        }
    }

    fn into_value(self) -> ConfValue {
        ConfValue::Seq(self.into_iter().map(ConfScalar::into_scalar).collect())
    }
}

impl<K, S> ConfType for HashSet<K, S>
where
    K: ConfKey,
    S: BuildHasher + Default,
{
    fn field_type() -> FieldType {
        FieldType::Set(K::KIND)
    }

    fn from_value(value: ConfValue) -> Result<Self, ShapeError> {
        match value {
            ConfValue::Set(items) => {
                let found = ConfValue::Set(Vec::new());
                collect_scalars::<K, Self>(items).ok_or_else(|| mismatch::<Self>(&found))
            }
            other => Err(mismatch::<Self>(&other)),
        }
    }

    fn into_value(self) -> ConfValue {
        ConfValue::Set(self.into_iter().map(ConfScalar::into_scalar).collect())
    }
}

impl<K, V, S> ConfType for HashMap<K, V, S>
where
    K: ConfKey,
    V: ConfType,
    S: BuildHasher + Default,
{
    fn field_type() -> FieldType {
        FieldType::Map(K::KIND, Box::new(V::field_type()))
    }

    fn from_value(value: ConfValue) -> Result<Self, ShapeError> {
        let ConfValue::Map(entries) = value else {
            return Err(mismatch::<Self>(&value));
        };
        let mut out = Self::with_capacity_and_hasher(entries.len(), S::default());
        for (key, entry) in entries {
            let found = ConfValue::Scalar(key.clone());
            let typed_key = K::from_scalar(key).ok_or_else(|| mismatch::<Self>(&found))?;
            out.insert(typed_key, V::from_value(entry)?);
        }
        Ok(out)
    }

    fn into_value(self) -> ConfValue {
        ConfValue::Map(
            self.into_iter()
                .map(|(key, value)| (key.into_scalar(), value.into_value()))
                .collect(),
        )
    }
}

/// Assign a converted value into a field slot.
///
/// Generated descriptor tables call this from their assignment functions;
/// hand-written descriptors can do the same.
///
/// # Errors
///
/// Propagates [`ShapeError`] from [`ConfType::from_value`]; the slot is left
/// unchanged in that case.
pub fn assign_value<V: ConfType>(slot: &mut V, value: ConfValue) -> Result<(), ShapeError> {
    *slot = V::from_value(value)?;
    Ok(())
}
