//! A closed set of value kinds for lists whose element type is chosen at
//! run time.
//!
//! A binding layer converts caller values into [`Value`] and builds a list for
//! one [`ValueKind`]. The three built-in kinds use their natural ordering;
//! the `Object` kind holds opaque shared values ordered by a caller supplied
//! [`Predicate`].
//!
//! ```
//! use rankskip::value::{Predicate, Value, ValueKind};
//! use rankskip::ValueSkipList;
//!
//! let list = ValueSkipList::with_kind(ValueKind::Int, None).unwrap();
//! list.insert(Value::Int(3)).unwrap();
//! list.insert(Value::Int(1)).unwrap();
//! assert_eq!(list.at(0).unwrap(), Value::Int(1));
//!
//! let names = ValueSkipList::with_kind(
//!     ValueKind::Object,
//!     Some(Predicate::typed(|a: &String, b: &String| a.len() < b.len())),
//! )
//! .unwrap();
//! names.insert(Value::object(String::from("abc"))).unwrap();
//! assert_eq!(names.size(), 1);
//! ```

use std::any::Any;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::compare::Compare;
use crate::error::CompareError;
use crate::error::Error;
use crate::error::Result;

/// An opaque, shared value. Identity is the allocation.
pub type Object = Arc<dyn Any + Send + Sync>;

/// The kind a value-kind list is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Int,
    Float,
    Bytes,
    Object,
}

impl ValueKind {
    pub fn name(self) -> &'static str {
        match self {
            ValueKind::Int => "int",
            ValueKind::Float => "float",
            ValueKind::Bytes => "bytes",
            ValueKind::Object => "object",
        }
    }

    /// True for the kinds that order themselves without a predicate.
    pub fn is_builtin(self) -> bool {
        return self != ValueKind::Object;
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ValueKind {
    type Err = Error;

    fn from_str(name: &str) -> Result<ValueKind> {
        match name {
            "int" | "long" => Ok(ValueKind::Int),
            "float" | "double" => Ok(ValueKind::Float),
            "bytes" => Ok(ValueKind::Bytes),
            "object" => Ok(ValueKind::Object),
            other => Err(Error::UnsupportedKind(other.to_string())),
        }
    }
}

/// A value of one of the supported kinds.
#[derive(Debug, Clone)]
pub enum Value {
    Int(i64),
    Float(f64),
    Bytes(Vec<u8>),
    Object(Object),
}

impl Value {
    /// Wrap any shareable value as an opaque object.
    pub fn object<U: Any + Send + Sync>(value: U) -> Value {
        return Value::Object(Arc::new(value));
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Int(_) => ValueKind::Int,
            Value::Float(_) => ValueKind::Float,
            Value::Bytes(_) => ValueKind::Bytes,
            Value::Object(_) => ValueKind::Object,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(v) => Some(v),
            _ => None,
        }
    }

    /// Downcast an object value to a concrete type.
    pub fn downcast_ref<U: Any>(&self) -> Option<&U> {
        match self {
            Value::Object(v) => v.downcast_ref::<U>(),
            _ => None,
        }
    }

    /// True if both values are the same object allocation.
    pub fn same_object(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Object(a), Value::Object(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{}", v),
            Value::Bytes(v) => write!(f, "b\"{}\"", v.escape_ascii()),
            Value::Object(v) => write!(f, "<object {:p}>", Arc::as_ptr(v)),
        }
    }
}

/// Built-in values compare by content, objects by identity.
impl PartialEq for Value {
    fn eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Bytes(a), Value::Bytes(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Value {
        Value::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Value {
        Value::Int(v as i64)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Value {
        Value::Float(v)
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Value {
        Value::Bytes(v)
    }
}

impl From<&[u8]> for Value {
    fn from(v: &[u8]) -> Value {
        Value::Bytes(v.to_vec())
    }
}

impl TryFrom<i128> for Value {
    type Error = Error;

    fn try_from(v: i128) -> Result<Value> {
        return i64::try_from(v)
            .map(Value::Int)
            .map_err(|_| Error::IntegerOverflow(v));
    }
}

impl TryFrom<u64> for Value {
    type Error = Error;

    fn try_from(v: u64) -> Result<Value> {
        return Value::try_from(v as i128);
    }
}

type PredicateFn = dyn Fn(&dyn Any, &dyn Any) -> std::result::Result<bool, CompareError> + Send + Sync;

/// A two-argument less-than over opaque values.
#[derive(Clone)]
pub struct Predicate(Arc<PredicateFn>);

impl Predicate {
    /// A predicate over raw opaque operands.
    pub fn new<F>(f: F) -> Predicate
    where
        F: Fn(&dyn Any, &dyn Any) -> std::result::Result<bool, CompareError> + Send + Sync + 'static,
    {
        return Predicate(Arc::new(f));
    }

    /// A predicate over operands of type `U`.
    ///
    /// Operands of any other type are only discovered when the predicate is
    /// first called with them, and then fail with
    /// [`CompareError::Incomparable`].
    pub fn typed<U, F>(f: F) -> Predicate
    where
        U: Any,
        F: Fn(&U, &U) -> bool + Send + Sync + 'static,
    {
        return Predicate::new(move |a: &dyn Any, b: &dyn Any| {
            match (a.downcast_ref::<U>(), b.downcast_ref::<U>()) {
                (Some(a), Some(b)) => Ok(f(a, b)),
                _ => Err(CompareError::Incomparable {
                    expected: std::any::type_name::<U>(),
                }),
            }
        });
    }

    pub fn call(&self, a: &dyn Any, b: &dyn Any) -> std::result::Result<bool, CompareError> {
        (self.0)(a, b)
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Predicate(..)")
    }
}

/// The ordering of a list bound to one value kind.
#[derive(Debug, Clone)]
pub struct ValueOrder {
    kind: ValueKind,
    predicate: Option<Predicate>,
}

impl ValueOrder {
    /// Validate a kind/predicate pairing.
    pub fn new(kind: ValueKind, predicate: Option<Predicate>) -> Result<ValueOrder> {
        match (kind, &predicate) {
            (ValueKind::Object, None) => return Err(Error::MissingComparator),
            (kind, Some(_)) if kind.is_builtin() => {
                return Err(Error::ComparatorWithBuiltinKind(kind));
            }
            _ => {}
        }
        return Ok(ValueOrder { kind, predicate });
    }

    pub fn kind(&self) -> ValueKind {
        self.kind
    }
}

impl Compare<Value> for ValueOrder {
    fn less(&self, a: &Value, b: &Value) -> std::result::Result<bool, CompareError> {
        match (a, b) {
            (Value::Int(a), Value::Int(b)) => Ok(a < b),
            (Value::Float(a), Value::Float(b)) => Ok(a < b),
            (Value::Bytes(a), Value::Bytes(b)) => Ok(a < b),
            (Value::Object(a), Value::Object(b)) => match &self.predicate {
                Some(predicate) => predicate.call(a.as_ref(), b.as_ref()),
                None => Err(CompareError::NoPredicate),
            },
            (a, b) => Err(CompareError::KindMismatch {
                left: a.kind(),
                right: b.kind(),
            }),
        }
    }

    fn admit(&self, value: &Value) -> Result<()> {
        if value.kind() != self.kind {
            return Err(Error::TypeMismatch {
                expected: self.kind,
                found: value.kind(),
            });
        }
        match value {
            Value::Float(v) if v.is_nan() => Err(Error::Unorderable),
            Value::Object(_) => {
                if self.less(value, value)? {
                    return Err(Error::Unorderable);
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }
}
