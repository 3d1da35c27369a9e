//! Discrete Fourier transform block.

use rustfft::FftPlanner;
use rustfft::num_complex::Complex64;

use blockflow_core::{Block, BlockError, EvalContext, Ports, Properties, Value};

/// Transforms the real array on `In` into its spectrum.
///
/// The real parts go to `Re`, the imaginary parts to `Im`, both as arrays of
/// the input length. With `inverse` set the inverse transform runs instead
/// and the result is scaled by `1/n`, so forward then inverse gives back the
/// input.
///
/// ## Properties
///
/// | Key | Value | Default |
/// |-----|-------|---------|
/// | `inverse` | boolean | false |
#[derive(Debug, Clone)]
pub struct Fft {
    uid: String,
    inverse: bool,
    ports: Ports,
}

impl Fft {
    /// Creates a forward transform block.
    pub fn new(uid: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            inverse: false,
            ports: Ports::with(&["In"], &["Re", "Im"]),
        }
    }

    /// Creates an inverse transform block.
    pub fn inverse(uid: impl Into<String>) -> Self {
        Self {
            inverse: true,
            ..Self::new(uid)
        }
    }
}

/// Runs the transform over `input`, returning the complex result.
pub fn transform(input: &[f64], inverse: bool) -> Vec<Complex64> {
    let mut buffer: Vec<Complex64> = input.iter().map(|&x| Complex64::new(x, 0.0)).collect();
    if buffer.is_empty() {
        return buffer;
    }

    let mut planner = FftPlanner::<f64>::new();
    if inverse {
        planner.plan_fft_inverse(buffer.len()).process(&mut buffer);
        let scale = 1.0 / buffer.len() as f64;
        for z in &mut buffer {
            *z *= scale;
        }
    } else {
        planner.plan_fft_forward(buffer.len()).process(&mut buffer);
    }
    buffer
}

impl Block for Fft {
    block_plumbing!("fft");

    fn update_model(&mut self, _ctx: &mut EvalContext<'_>) -> Result<(), BlockError> {
        let input = match self.ports.input("In") {
            Value::Array(xs) => xs,
            Value::Undefined => return Err(BlockError::MissingInput("In".into())),
            other => return Err(BlockError::wrong_type("In", "array", other)),
        };
        let spectrum = transform(input, self.inverse);
        self.ports
            .set_output("Re", Value::Array(spectrum.iter().map(|z| z.re).collect()));
        self.ports
            .set_output("Im", Value::Array(spectrum.iter().map(|z| z.im).collect()));
        Ok(())
    }

    fn reset(&mut self) {}

    fn copy_with_uid(&self, uid: String) -> Box<dyn Block> {
        Box::new(Self {
            inverse: self.inverse,
            ..Self::new(uid)
        })
    }

    fn properties(&self) -> Properties {
        Properties::from([("inverse".to_string(), Value::Boolean(self.inverse))])
    }

    fn set_property(&mut self, key: &str, value: Value) -> Result<(), BlockError> {
        match key {
            "inverse" => {
                self.inverse = value.as_bool().ok_or_else(|| {
                    BlockError::invalid_property(
                        key,
                        format!("expected boolean, got {}", value.type_name()),
                    )
                })?;
                Ok(())
            }
            _ => Err(BlockError::UnknownProperty(key.to_string())),
        }
    }
}
