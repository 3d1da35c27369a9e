//! The untyped value union transported by ports and connectors.
//!
//! Every port carries exactly one [`Value`]. The engine moves values from
//! output ports to input ports without ever looking inside them; only blocks
//! branch on the variant. A block that receives a variant it cannot handle
//! reports a [`BlockError`](crate::BlockError) for that tick instead of
//! coercing silently.
//!
//! # Serialized form
//!
//! Values are adjacently tagged so diagram files stay readable:
//!
//! ```toml
//! start = { type = "scalar", value = 0.0 }
//! label = { type = "text", value = "gain" }
//! z     = { type = "complex", value = { re = 1.0, im = -2.0 } }
//! empty = { type = "undefined" }
//! ```

use core::fmt;

use rustfft::num_complex::Complex64;
use serde::{Deserialize, Serialize};

/// A value produced by a block and carried by a port.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Value {
    /// Nothing has been produced yet (or the producing block failed this tick).
    #[default]
    Undefined,
    /// A single number.
    Scalar(f64),
    /// An ordered sequence of numbers.
    Array(Vec<f64>),
    /// A rectangular sequence of rows.
    Matrix(Vec<Vec<f64>>),
    /// A geometric vector with magnitude and dot-product semantics.
    Vector(Vector),
    /// A complex number.
    Complex(#[serde(with = "complex_repr")] Complex64),
    /// A string.
    Text(String),
    /// A truth value.
    Boolean(bool),
}

impl Value {
    /// Builds a matrix value, returning `None` if the rows are ragged.
    ///
    /// An empty row list is a valid 0×0 matrix.
    pub fn matrix(rows: Vec<Vec<f64>>) -> Option<Self> {
        let width = rows.first().map_or(0, Vec::len);
        rows.iter()
            .all(|row| row.len() == width)
            .then_some(Self::Matrix(rows))
    }

    /// Builds a complex value from its parts.
    pub fn complex(re: f64, im: f64) -> Self {
        Self::Complex(Complex64::new(re, im))
    }

    /// Short lowercase name of the variant, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Undefined => "undefined",
            Self::Scalar(_) => "scalar",
            Self::Array(_) => "array",
            Self::Matrix(_) => "matrix",
            Self::Vector(_) => "vector",
            Self::Complex(_) => "complex",
            Self::Text(_) => "text",
            Self::Boolean(_) => "boolean",
        }
    }

    /// Returns `true` for every variant except [`Value::Undefined`].
    pub fn is_defined(&self) -> bool {
        !matches!(self, Self::Undefined)
    }

    /// Returns the number if this is a scalar.
    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            Self::Scalar(x) => Some(*x),
            _ => None,
        }
    }

    /// Returns the elements if this is an array.
    pub fn as_array(&self) -> Option<&[f64]> {
        match self {
            Self::Array(xs) => Some(xs),
            _ => None,
        }
    }

    /// Returns the rows if this is a matrix.
    pub fn as_matrix(&self) -> Option<&[Vec<f64>]> {
        match self {
            Self::Matrix(rows) => Some(rows),
            _ => None,
        }
    }

    /// Returns the truth value if this is a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the string if this is text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Bitwise identity: like `==`, but numbers compare by bit pattern, so
    /// `NaN` is identical to itself and `0.0` differs from `-0.0`.
    ///
    /// The engine uses this to decide whether a global changed.
    pub fn is_identical(&self, other: &Value) -> bool {
        fn same(a: &[f64], b: &[f64]) -> bool {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.to_bits() == y.to_bits())
        }

        match (self, other) {
            (Self::Scalar(a), Self::Scalar(b)) => a.to_bits() == b.to_bits(),
            (Self::Array(a), Self::Array(b)) => same(a, b),
            (Self::Vector(a), Self::Vector(b)) => same(&a.0, &b.0),
            (Self::Matrix(a), Self::Matrix(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| same(x, y))
            }
            (Self::Complex(a), Self::Complex(b)) => same(&[a.re, a.im], &[b.re, b.im]),
            _ => self == other,
        }
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Self::Scalar(x)
    }
}

impl From<Vec<f64>> for Value {
    fn from(xs: Vec<f64>) -> Self {
        Self::Array(xs)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<Complex64> for Value {
    fn from(z: Complex64) -> Self {
        Self::Complex(z)
    }
}

impl From<Vector> for Value {
    fn from(v: Vector) -> Self {
        Self::Vector(v)
    }
}

fn write_numbers(f: &mut fmt::Formatter<'_>, xs: &[f64]) -> fmt::Result {
    f.write_str("[")?;
    for (i, x) in xs.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{x}")?;
    }
    f.write_str("]")
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Undefined => f.write_str("undefined"),
            Self::Scalar(x) => write!(f, "{x}"),
            Self::Array(xs) => write_numbers(f, xs),
            Self::Matrix(rows) => {
                f.write_str("[")?;
                for (i, row) in rows.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write_numbers(f, row)?;
                }
                f.write_str("]")
            }
            Self::Vector(v) => {
                f.write_str("vec")?;
                write_numbers(f, &v.0)
            }
            Self::Complex(z) => {
                if z.im < 0.0 {
                    write!(f, "{} - {}i", z.re, -z.im)
                } else {
                    write!(f, "{} + {}i", z.re, z.im)
                }
            }
            Self::Text(s) => write!(f, "{s:?}"),
            Self::Boolean(b) => write!(f, "{b}"),
        }
    }
}

/// A geometric vector: an array with magnitude and dot-product semantics.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Vector(pub Vec<f64>);

impl Vector {
    /// Creates a vector from its components.
    pub fn new(components: Vec<f64>) -> Self {
        Self(components)
    }

    /// Euclidean length.
    pub fn magnitude(&self) -> f64 {
        self.0.iter().map(|x| x * x).sum::<f64>().sqrt()
    }

    /// Dot product, or `None` if the dimensions differ.
    pub fn dot(&self, other: &Vector) -> Option<f64> {
        (self.0.len() == other.0.len())
            .then(|| self.0.iter().zip(&other.0).map(|(a, b)| a * b).sum())
    }

    /// Number of components.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the vector has no components.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Serde representation of [`Complex64`] as `{ re, im }`.
mod complex_repr {
    use rustfft::num_complex::Complex64;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Serialize, Deserialize)]
    struct Parts {
        re: f64,
        im: f64,
    }

    pub fn serialize<S: Serializer>(z: &Complex64, serializer: S) -> Result<S::Ok, S::Error> {
        Parts { re: z.re, im: z.im }.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Complex64, D::Error> {
        let parts = Parts::deserialize(deserializer)?;
        Ok(Complex64::new(parts.re, parts.im))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matrix_rejects_ragged_rows() {
        assert!(Value::matrix(vec![vec![1.0, 2.0], vec![3.0]]).is_none());
        assert!(Value::matrix(vec![vec![1.0, 2.0], vec![3.0, 4.0]]).is_some());
        assert_eq!(Value::matrix(Vec::new()), Some(Value::Matrix(Vec::new())));
    }

    #[test]
    fn vector_magnitude_and_dot() {
        let a = Vector::new(vec![3.0, 4.0]);
        let b = Vector::new(vec![1.0, 2.0]);
        assert_eq!(a.magnitude(), 5.0);
        assert_eq!(a.dot(&b), Some(11.0));
        assert_eq!(a.dot(&Vector::new(vec![1.0])), None);
    }

    #[test]
    fn default_is_undefined() {
        assert_eq!(Value::default(), Value::Undefined);
        assert!(!Value::Undefined.is_defined());
        assert!(Value::Scalar(0.0).is_defined());
    }

    #[test]
    fn accessors_only_match_their_variant() {
        let v = Value::Array(vec![1.0, 2.0]);
        assert_eq!(v.as_array(), Some(&[1.0, 2.0][..]));
        assert_eq!(v.as_scalar(), None);
        assert_eq!(Value::from(true).as_bool(), Some(true));
        assert_eq!(Value::from("x").as_text(), Some("x"));
    }

    #[test]
    fn identity_compares_bits() {
        assert!(Value::Scalar(f64::NAN).is_identical(&Value::Scalar(f64::NAN)));
        assert!(!Value::Scalar(0.0).is_identical(&Value::Scalar(-0.0)));
        assert!(Value::Array(vec![1.0, f64::NAN]).is_identical(&Value::Array(vec![1.0, f64::NAN])));
        assert!(!Value::Array(vec![1.0]).is_identical(&Value::Array(vec![1.0, 2.0])));
        assert!(Value::complex(f64::NAN, 1.0).is_identical(&Value::complex(f64::NAN, 1.0)));
        assert!(
            Value::Matrix(vec![vec![f64::NAN]]).is_identical(&Value::Matrix(vec![vec![f64::NAN]]))
        );
        assert!(Value::from("a").is_identical(&Value::from("a")));
        assert!(!Value::Scalar(1.0).is_identical(&Value::Array(vec![1.0])));
        assert!(Value::Undefined.is_identical(&Value::Undefined));
    }

    #[test]
    fn display_formats() {
        assert_eq!(Value::Array(vec![10.0, 11.5]).to_string(), "[10, 11.5]");
        assert_eq!(Value::complex(1.0, -2.0).to_string(), "1 - 2i");
        assert_eq!(
            Value::Matrix(vec![vec![1.0], vec![2.0]]).to_string(),
            "[[1], [2]]"
        );
        assert_eq!(Value::Undefined.to_string(), "undefined");
    }

    #[test]
    fn json_uses_adjacent_tags() {
        let json = serde_json::to_string(&Value::Scalar(1.5)).unwrap();
        assert_eq!(json, r#"{"type":"scalar","value":1.5}"#);

        let z: Value = serde_json::from_str(r#"{"type":"complex","value":{"re":1.0,"im":2.0}}"#)
            .unwrap();
        assert_eq!(z, Value::complex(1.0, 2.0));

        let u: Value = serde_json::from_str(r#"{"type":"undefined"}"#).unwrap();
        assert_eq!(u, Value::Undefined);
    }
}
