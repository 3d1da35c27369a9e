//! Random source block backed by a seeded xorshift generator.

use blockflow_core::{
    Block, BlockError, EvalContext, Ports, Properties, Value, count_property, scalar_property,
};

/// Fallback state for a zero seed, which xorshift cannot leave.
const ZERO_SEED_STATE: u32 = 0x1234_5678;

/// Emits uniformly distributed numbers in `[min, max)`.
///
/// The generator state advances on every evaluation, so repeated recomputes
/// produce new numbers; [`reset`](Block::reset) rewinds it to `seed`, making
/// a run reproducible.
///
/// ## Properties
///
/// | Key | Value | Default |
/// |-----|-------|---------|
/// | `seed` | non-negative integer | 1 |
/// | `min` | scalar | 0 |
/// | `max` | scalar | 1 |
/// | `count` | `0` for a scalar, `n` for an array of `n` | 0 |
#[derive(Debug, Clone)]
pub struct Random {
    uid: String,
    seed: u32,
    state: u32,
    min: f64,
    max: f64,
    count: usize,
    ports: Ports,
}

impl Random {
    /// Creates a scalar source in `[0, 1)` seeded with `1`.
    pub fn new(uid: impl Into<String>) -> Self {
        Self::with_seed(uid, 1)
    }

    /// Creates a scalar source in `[0, 1)` with the given seed.
    pub fn with_seed(uid: impl Into<String>, seed: u32) -> Self {
        Self {
            uid: uid.into(),
            seed,
            state: initial_state(seed),
            min: 0.0,
            max: 1.0,
            count: 0,
            ports: Ports::with(&[], &["Out"]),
        }
    }

    fn next_unit(&mut self) -> f64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        f64::from(x) / (f64::from(u32::MAX) + 1.0)
    }

    fn sample(&mut self) -> f64 {
        self.min + (self.max - self.min) * self.next_unit()
    }
}

fn initial_state(seed: u32) -> u32 {
    if seed == 0 { ZERO_SEED_STATE } else { seed }
}

impl Block for Random {
    block_plumbing!("random");

    fn update_model(&mut self, _ctx: &mut EvalContext<'_>) -> Result<(), BlockError> {
        let value = if self.count == 0 {
            Value::Scalar(self.sample())
        } else {
            Value::Array((0..self.count).map(|_| self.sample()).collect())
        };
        self.ports.set_output("Out", value);
        Ok(())
    }

    fn reset(&mut self) {
        self.state = initial_state(self.seed);
        self.ports.clear_outputs();
    }

    fn copy_with_uid(&self, uid: String) -> Box<dyn Block> {
        let mut copy = Self::with_seed(uid, self.seed);
        copy.min = self.min;
        copy.max = self.max;
        copy.count = self.count;
        Box::new(copy)
    }

    fn properties(&self) -> Properties {
        Properties::from([
            ("count".to_string(), Value::Scalar(self.count as f64)),
            ("max".to_string(), Value::Scalar(self.max)),
            ("min".to_string(), Value::Scalar(self.min)),
            ("seed".to_string(), Value::Scalar(f64::from(self.seed))),
        ])
    }

    fn set_property(&mut self, key: &str, value: Value) -> Result<(), BlockError> {
        match key {
            "seed" => {
                let seed = count_property(key, &value)?;
                self.seed = u32::try_from(seed).map_err(|_| {
                    BlockError::invalid_property(key, format!("seed {seed} exceeds u32"))
                })?;
                self.state = initial_state(self.seed);
            }
            "min" => self.min = scalar_property(key, &value)?,
            "max" => self.max = scalar_property(key, &value)?,
            "count" => self.count = count_property(key, &value)?,
            _ => return Err(BlockError::UnknownProperty(key.to_string())),
        }
        Ok(())
    }
}
