//! Element-wise arithmetic block.
//!
//! Combines inputs `A` and `B` with one of six binary operations. When `B`
//! is not connected (or carries nothing yet), the configured `operand` is
//! used in its place, so `Arithmetic` doubles as "add a constant".
//!
//! ## Accepted Combinations
//!
//! | A | B | Result |
//! |---|---|--------|
//! | scalar | scalar | scalar |
//! | array | scalar, or scalar / array | array (broadcast) |
//! | array | array (same length) | array |
//! | matrix | scalar, or scalar / matrix | matrix (broadcast) |
//! | matrix | matrix (same shape) | matrix |
//! | vector | vector (same length) | vector for add/subtract, scalar dot product for multiply |
//! | vector | scalar, or scalar / vector | vector scaled (multiply, divide) |
//! | complex | complex or scalar (either side) | complex (modulus unsupported) |
//!
//! Division or modulus by zero fails the block for the tick rather than
//! producing infinities.

use blockflow_core::{
    Block, BlockError, Complex64, EvalContext, Ports, Properties, Value, Vector, scalar_property,
    text_property,
};

const NUMERIC: &str = "scalar, array, matrix, vector or complex";

/// Binary operation applied by [`Arithmetic`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Operation {
    /// `a + b`
    #[default]
    Add,
    /// `a - b`
    Subtract,
    /// `a * b`
    Multiply,
    /// `a / b`
    Divide,
    /// `a % b` (remainder with the sign of `a`)
    Modulus,
    /// `a ^ b`
    Power,
}

impl Operation {
    /// Every operation, in display order.
    pub const ALL: [Self; 6] = [
        Self::Add,
        Self::Subtract,
        Self::Multiply,
        Self::Divide,
        Self::Modulus,
        Self::Power,
    ];

    /// Property value naming this operation.
    pub fn name(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Subtract => "subtract",
            Self::Multiply => "multiply",
            Self::Divide => "divide",
            Self::Modulus => "modulus",
            Self::Power => "power",
        }
    }

    /// Parses a name (`"add"`) or symbol (`"+"`).
    pub fn parse(s: &str) -> Option<Self> {
        let op = match s.trim().to_ascii_lowercase().as_str() {
            "add" | "+" => Self::Add,
            "subtract" | "-" => Self::Subtract,
            "multiply" | "*" => Self::Multiply,
            "divide" | "/" => Self::Divide,
            "modulus" | "%" => Self::Modulus,
            "power" | "^" => Self::Power,
            _ => return None,
        };
        Some(op)
    }

    fn apply(self, a: f64, b: f64) -> Result<f64, BlockError> {
        match self {
            Self::Add => Ok(a + b),
            Self::Subtract => Ok(a - b),
            Self::Multiply => Ok(a * b),
            Self::Divide | Self::Modulus if b == 0.0 => {
                Err(BlockError::Compute("division by zero".into()))
            }
            Self::Divide => Ok(a / b),
            Self::Modulus => Ok(a % b),
            Self::Power => Ok(a.powf(b)),
        }
    }

    fn apply_complex(self, a: Complex64, b: Complex64) -> Result<Complex64, BlockError> {
        match self {
            Self::Add => Ok(a + b),
            Self::Subtract => Ok(a - b),
            Self::Multiply => Ok(a * b),
            Self::Divide if b.norm_sqr() == 0.0 => {
                Err(BlockError::Compute("division by zero".into()))
            }
            Self::Divide => Ok(a / b),
            Self::Power => Ok(a.powc(b)),
            Self::Modulus => Err(BlockError::Compute(
                "modulus is not defined for complex numbers".into(),
            )),
        }
    }
}

fn map_scalar(xs: &[f64], f: impl Fn(f64) -> Result<f64, BlockError>) -> Result<Vec<f64>, BlockError> {
    xs.iter().map(|&x| f(x)).collect()
}

fn zip_arrays(op: Operation, xs: &[f64], ys: &[f64]) -> Result<Vec<f64>, BlockError> {
    if xs.len() != ys.len() {
        return Err(BlockError::Shape(format!(
            "array lengths differ ({} vs {})",
            xs.len(),
            ys.len()
        )));
    }
    xs.iter().zip(ys).map(|(&x, &y)| op.apply(x, y)).collect()
}

fn map_matrix(
    rows: &[Vec<f64>],
    f: impl Fn(f64) -> Result<f64, BlockError>,
) -> Result<Value, BlockError> {
    let rows = rows
        .iter()
        .map(|row| map_scalar(row, &f))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Value::Matrix(rows))
}

/// Applies `op` to two values following the combination table above.
pub fn combine(op: Operation, a: &Value, b: &Value) -> Result<Value, BlockError> {
    use Value::{Array, Complex, Matrix, Scalar};

    let result = match (a, b) {
        (Value::Undefined, _) => return Err(BlockError::MissingInput("A".into())),
        (_, Value::Undefined) => return Err(BlockError::MissingInput("B".into())),

        (Scalar(x), Scalar(y)) => Scalar(op.apply(*x, *y)?),
        (Array(xs), Scalar(y)) => Array(map_scalar(xs, |x| op.apply(x, *y))?),
        (Scalar(x), Array(ys)) => Array(map_scalar(ys, |y| op.apply(*x, y))?),
        (Array(xs), Array(ys)) => Array(zip_arrays(op, xs, ys)?),

        (Matrix(m), Scalar(y)) => map_matrix(m, |x| op.apply(x, *y))?,
        (Scalar(x), Matrix(m)) => map_matrix(m, |y| op.apply(*x, y))?,
        (Matrix(m), Matrix(n)) => {
            if m.len() != n.len() {
                return Err(BlockError::Shape(format!(
                    "matrix row counts differ ({} vs {})",
                    m.len(),
                    n.len()
                )));
            }
            let rows = m
                .iter()
                .zip(n)
                .map(|(r, s)| zip_arrays(op, r, s))
                .collect::<Result<Vec<_>, _>>()?;
            Matrix(rows)
        }

        (Value::Vector(u), Value::Vector(v)) => {
            if u.len() != v.len() {
                return Err(BlockError::Shape(format!(
                    "vector dimensions differ ({} vs {})",
                    u.len(),
                    v.len()
                )));
            }
            match op {
                Operation::Add | Operation::Subtract => {
                    Value::Vector(Vector::new(zip_arrays(op, &u.0, &v.0)?))
                }
                Operation::Multiply => Scalar(u.dot(v).unwrap_or_default()),
                _ => return Err(BlockError::wrong_type("B", "scalar for this operation", b)),
            }
        }
        (Value::Vector(u), Scalar(y)) if matches!(op, Operation::Multiply | Operation::Divide) => {
            Value::Vector(Vector::new(map_scalar(&u.0, |x| op.apply(x, *y))?))
        }
        (Scalar(x), Value::Vector(v)) if op == Operation::Multiply => {
            Value::Vector(Vector::new(map_scalar(&v.0, |y| op.apply(*x, y))?))
        }

        (Complex(z), Complex(w)) => Complex(op.apply_complex(*z, *w)?),
        (Complex(z), Scalar(y)) => Complex(op.apply_complex(*z, Complex64::new(*y, 0.0))?),
        (Scalar(x), Complex(w)) => Complex(op.apply_complex(Complex64::new(*x, 0.0), *w)?),

        (Value::Text(_) | Value::Boolean(_), _) => {
            return Err(BlockError::wrong_type("A", NUMERIC, a));
        }
        _ => return Err(BlockError::wrong_type("B", "a value compatible with A", b)),
    };
    Ok(result)
}

/// Element-wise binary arithmetic on `A` and `B`.
///
/// ## Properties
///
/// | Key | Value | Default |
/// |-----|-------|---------|
/// | `operation` | `add`, `subtract`, `multiply`, `divide`, `modulus`, `power` (or `+ - * / % ^`) | `add` |
/// | `operand` | scalar used when `B` is unconnected | 0 |
#[derive(Debug, Clone)]
pub struct Arithmetic {
    uid: String,
    operation: Operation,
    operand: f64,
    ports: Ports,
}

impl Arithmetic {
    /// Creates an adder with operand `0`.
    pub fn new(uid: impl Into<String>) -> Self {
        Self::with_operation(uid, Operation::Add, 0.0)
    }

    /// Creates a block with explicit operation and fallback operand.
    pub fn with_operation(uid: impl Into<String>, operation: Operation, operand: f64) -> Self {
        Self {
            uid: uid.into(),
            operation,
            operand,
            ports: Ports::with(&["A", "B"], &["Out"]),
        }
    }

    /// The configured operation.
    pub fn operation(&self) -> Operation {
        self.operation
    }
}

impl Block for Arithmetic {
    block_plumbing!("arithmetic");

    fn update_model(&mut self, _ctx: &mut EvalContext<'_>) -> Result<(), BlockError> {
        let fallback;
        let b = match self.ports.input("B") {
            Value::Undefined => {
                fallback = Value::Scalar(self.operand);
                &fallback
            }
            value => value,
        };
        let result = combine(self.operation, self.ports.input("A"), b)?;
        self.ports.set_output("Out", result);
        Ok(())
    }

    fn reset(&mut self) {}

    fn copy_with_uid(&self, uid: String) -> Box<dyn Block> {
        Box::new(Self::with_operation(uid, self.operation, self.operand))
    }

    fn properties(&self) -> Properties {
        Properties::from([
            ("operand".to_string(), Value::Scalar(self.operand)),
            ("operation".to_string(), Value::from(self.operation.name())),
        ])
    }

    fn set_property(&mut self, key: &str, value: Value) -> Result<(), BlockError> {
        match key {
            "operation" => {
                let name = text_property(key, &value)?;
                self.operation = Operation::parse(&name).ok_or_else(|| {
                    BlockError::invalid_property(key, format!("unknown operation '{name}'"))
                })?;
            }
            "operand" => self.operand = scalar_property(key, &value)?,
            _ => return Err(BlockError::UnknownProperty(key.to_string())),
        }
        Ok(())
    }
}
