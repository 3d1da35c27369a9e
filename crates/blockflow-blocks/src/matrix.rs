//! Matrix and vector helpers: transpose and magnitude.

use blockflow_core::{Block, BlockError, EvalContext, Ports, Properties, Value};

/// Transposes a matrix on `In`.
///
/// An array is treated as a single row, so it comes out as a column matrix.
#[derive(Debug, Clone)]
pub struct Transpose {
    uid: String,
    ports: Ports,
}

impl Transpose {
    /// Creates a transpose block.
    pub fn new(uid: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            ports: Ports::with(&["In"], &["Out"]),
        }
    }
}

/// Transpose of a rectangular row list.
pub fn transpose(rows: &[Vec<f64>]) -> Vec<Vec<f64>> {
    let width = rows.first().map_or(0, Vec::len);
    (0..width)
        .map(|c| rows.iter().map(|row| row[c]).collect())
        .collect()
}

impl Block for Transpose {
    block_plumbing!("transpose");

    fn update_model(&mut self, _ctx: &mut EvalContext<'_>) -> Result<(), BlockError> {
        let out = match self.ports.input("In") {
            Value::Matrix(rows) => {
                if rows.iter().any(|row| row.len() != rows[0].len()) {
                    return Err(BlockError::Shape("matrix rows differ in length".into()));
                }
                Value::Matrix(transpose(rows))
            }
            Value::Array(xs) => Value::Matrix(xs.iter().map(|&x| vec![x]).collect()),
            Value::Undefined => return Err(BlockError::MissingInput("In".into())),
            other => return Err(BlockError::wrong_type("In", "matrix or array", other)),
        };
        self.ports.set_output("Out", out);
        Ok(())
    }

    fn reset(&mut self) {}

    fn copy_with_uid(&self, uid: String) -> Box<dyn Block> {
        Box::new(Self::new(uid))
    }

    fn properties(&self) -> Properties {
        Properties::new()
    }

    fn set_property(&mut self, key: &str, _value: Value) -> Result<(), BlockError> {
        Err(BlockError::UnknownProperty(key.to_string()))
    }
}

/// Emits the magnitude of `In` as a scalar.
///
/// Vectors and arrays give their Euclidean norm, complex numbers their
/// modulus, scalars their absolute value.
#[derive(Debug, Clone)]
pub struct Magnitude {
    uid: String,
    ports: Ports,
}

impl Magnitude {
    /// Creates a magnitude block.
    pub fn new(uid: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            ports: Ports::with(&["In"], &["Out"]),
        }
    }
}

impl Block for Magnitude {
    block_plumbing!("magnitude");

    fn update_model(&mut self, _ctx: &mut EvalContext<'_>) -> Result<(), BlockError> {
        let magnitude = match self.ports.input("In") {
            Value::Vector(v) => v.magnitude(),
            Value::Array(xs) => xs.iter().map(|x| x * x).sum::<f64>().sqrt(),
            Value::Complex(z) => z.re.hypot(z.im),
            Value::Scalar(x) => x.abs(),
            Value::Undefined => return Err(BlockError::MissingInput("In".into())),
            other => {
                return Err(BlockError::wrong_type("In", "vector, array, complex or scalar", other));
            }
        };
        self.ports.set_output("Out", Value::Scalar(magnitude));
        Ok(())
    }

    fn reset(&mut self) {}

    fn copy_with_uid(&self, uid: String) -> Box<dyn Block> {
        Box::new(Self::new(uid))
    }

    fn properties(&self) -> Properties {
        Properties::new()
    }

    fn set_property(&mut self, key: &str, _value: Value) -> Result<(), BlockError> {
        Err(BlockError::UnknownProperty(key.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockflow_core::{Globals, Vector};

    fn run(block: &mut dyn Block, input: Value) -> Result<Value, BlockError> {
        let globals = Globals::new();
        block.ports_mut().get_mut("In").unwrap().value = input;
        block.update_model(&mut EvalContext::new(&globals))?;
        Ok(block.ports().get("Out").unwrap().value.clone())
    }

    #[test]
    fn transposes_matrix_and_array() {
        let mut t = Transpose::new("t");
        let m = Value::Matrix(vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]);
        assert_eq!(
            run(&mut t, m).unwrap(),
            Value::Matrix(vec![vec![1.0, 4.0], vec![2.0, 5.0], vec![3.0, 6.0]])
        );
        assert_eq!(
            run(&mut t, Value::Array(vec![1.0, 2.0])).unwrap(),
            Value::Matrix(vec![vec![1.0], vec![2.0]])
        );
    }

    #[test]
    fn ragged_matrix_fails() {
        let mut t = Transpose::new("t");
        let err = run(&mut t, Value::Matrix(vec![vec![1.0, 2.0], vec![3.0]])).unwrap_err();
        assert!(matches!(err, BlockError::Shape(_)));
    }

    #[test]
    fn magnitude_of_each_variant() {
        let mut m = Magnitude::new("m");
        assert_eq!(
            run(&mut m, Value::Vector(Vector::new(vec![3.0, 4.0]))).unwrap(),
            Value::Scalar(5.0)
        );
        assert_eq!(run(&mut m, Value::complex(-3.0, 4.0)).unwrap(), Value::Scalar(5.0));
        assert_eq!(run(&mut m, Value::Scalar(-2.0)).unwrap(), Value::Scalar(2.0));
        assert!(run(&mut m, Value::from(true)).is_err());
    }
}
