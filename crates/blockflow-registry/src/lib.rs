//! Block kind registry and factory for blockflow diagrams.
//!
//! This crate maps kind ids (`"arithmetic"`, `"series"`, ...) to descriptors
//! and constructors. Diagram loading, the CLI and anything else that builds a
//! chart by name goes through it.
//!
//! # Features
//!
//! - **Kind Discovery**: List every available block kind with metadata
//! - **Factory Pattern**: Create blocks by kind id at runtime
//! - **Category System**: Kinds grouped by role (sources, math, signal, ...)
//! - **Search**: Case-insensitive substring match over id, name, category and
//!   description
//!
//! # Example
//!
//! ```rust
//! use blockflow_core::{Block, Flowchart};
//! use blockflow_registry::{BlockCategory, BlockRegistry};
//!
//! let registry = BlockRegistry::new();
//!
//! for block in registry.all_blocks() {
//!     println!("{}: {}", block.name, block.description);
//! }
//!
//! let mut chart = Flowchart::default();
//! let series = chart.add_block_of_kind(&registry, "series", Some("s")).unwrap();
//! assert_eq!(chart.block(series).unwrap().kind(), "series");
//!
//! for block in registry.blocks_in_category(BlockCategory::Signal) {
//!     println!("Signal block: {}", block.name);
//! }
//! ```

use blockflow_blocks::{
    Accumulator, Arithmetic, Bundle, Constant, Fft, GlobalRef, GlobalVariable, History, Logic,
    Magnitude, Random, Series, Sticker, Transpose,
};
use blockflow_core::{Block, BlockFactory};

/// Role of a block kind, for organization and filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockCategory {
    /// Blocks with no inputs that produce values
    Source,
    /// Element-wise arithmetic
    Math,
    /// Boolean gates
    Logic,
    /// Matrix and vector operations
    Matrix,
    /// Stateful and spectral processing over sequences
    Signal,
    /// Global variables and input bundling
    Routing,
    /// Sinks that show a value
    Display,
}

impl BlockCategory {
    /// Every category, in display order.
    pub const ALL: [BlockCategory; 7] = [
        BlockCategory::Source,
        BlockCategory::Math,
        BlockCategory::Logic,
        BlockCategory::Matrix,
        BlockCategory::Signal,
        BlockCategory::Routing,
        BlockCategory::Display,
    ];

    /// Returns a human-readable name for the category.
    pub const fn name(&self) -> &'static str {
        match self {
            BlockCategory::Source => "Source",
            BlockCategory::Math => "Math",
            BlockCategory::Logic => "Logic",
            BlockCategory::Matrix => "Matrix",
            BlockCategory::Signal => "Signal",
            BlockCategory::Routing => "Routing",
            BlockCategory::Display => "Display",
        }
    }

    /// Returns a description of the category.
    pub const fn description(&self) -> &'static str {
        match self {
            BlockCategory::Source => "Constants, series and random generators",
            BlockCategory::Math => "Arithmetic on scalars, arrays, matrices and complex numbers",
            BlockCategory::Logic => "Boolean gates",
            BlockCategory::Matrix => "Transpose, magnitude and other matrix/vector helpers",
            BlockCategory::Signal => "Running sums, sliding windows and Fourier transforms",
            BlockCategory::Routing => "Global variables and multi-input bundles",
            BlockCategory::Display => "Sinks that show the value they receive",
        }
    }
}

/// Factory function type for creating blocks.
pub type BlockConstructor = fn(&str) -> Box<dyn Block>;

/// Describes a block kind in the registry.
#[derive(Debug, Clone)]
pub struct BlockDescriptor {
    /// Kind id (lowercase, no spaces), as stored in diagram files.
    pub kind: &'static str,
    /// Human-readable name.
    pub name: &'static str,
    /// Brief description of what the block computes.
    pub description: &'static str,
    /// Category for organization.
    pub category: BlockCategory,
}

impl BlockDescriptor {
    /// Case-insensitive substring match over kind, name, category and
    /// description. An empty query matches everything.
    pub fn matches_query(&self, query: &str) -> bool {
        if query.is_empty() {
            return true;
        }
        let q = query.to_lowercase();
        self.kind.contains(&q)
            || self.name.to_lowercase().contains(&q)
            || self.category.name().to_lowercase().contains(&q)
            || self.description.to_lowercase().contains(&q)
    }
}

struct RegistryEntry {
    descriptor: BlockDescriptor,
    constructor: BlockConstructor,
}

/// Registry of all available block kinds.
///
/// All built-in kinds are registered by [`BlockRegistry::new`]; embedders may
/// add their own with [`BlockRegistry::register`].
pub struct BlockRegistry {
    entries: Vec<RegistryEntry>,
}

impl Default for BlockRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockRegistry {
    /// Create a new registry with all built-in kinds registered.
    pub fn new() -> Self {
        let mut registry = Self {
            entries: Vec::with_capacity(14),
        };
        registry.register_builtin_blocks();
        registry
    }

    /// Create a registry with no kinds.
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    fn register_builtin_blocks(&mut self) {
        // Sources
        self.register(
            BlockDescriptor {
                kind: "constant",
                name: "Constant",
                description: "Emits a fixed value of any type",
                category: BlockCategory::Source,
            },
            |uid| Box::new(Constant::new(uid)),
        );
        self.register(
            BlockDescriptor {
                kind: "series",
                name: "Series",
                description: "Arithmetic progression as an array",
                category: BlockCategory::Source,
            },
            |uid| Box::new(Series::new(uid)),
        );
        self.register(
            BlockDescriptor {
                kind: "random",
                name: "Random",
                description: "Seeded pseudo-random scalar or array",
                category: BlockCategory::Source,
            },
            |uid| Box::new(Random::new(uid)),
        );

        // Math and logic
        self.register(
            BlockDescriptor {
                kind: "arithmetic",
                name: "Arithmetic",
                description: "Add, subtract, multiply, divide, modulus or power with broadcasting",
                category: BlockCategory::Math,
            },
            |uid| Box::new(Arithmetic::new(uid)),
        );
        self.register(
            BlockDescriptor {
                kind: "logic",
                name: "Logic Gate",
                description: "AND, OR, XOR, NAND, NOR or NOT over booleans",
                category: BlockCategory::Logic,
            },
            |uid| Box::new(Logic::new(uid)),
        );

        // Matrix
        self.register(
            BlockDescriptor {
                kind: "transpose",
                name: "Transpose",
                description: "Swaps rows and columns of a matrix",
                category: BlockCategory::Matrix,
            },
            |uid| Box::new(Transpose::new(uid)),
        );
        self.register(
            BlockDescriptor {
                kind: "magnitude",
                name: "Magnitude",
                description: "Euclidean norm of a vector, array or complex number",
                category: BlockCategory::Matrix,
            },
            |uid| Box::new(Magnitude::new(uid)),
        );

        // Signal
        self.register(
            BlockDescriptor {
                kind: "accumulator",
                name: "Accumulator",
                description: "Running sum that advances on every recompute",
                category: BlockCategory::Signal,
            },
            |uid| Box::new(Accumulator::new(uid)),
        );
        self.register(
            BlockDescriptor {
                kind: "history",
                name: "History",
                description: "Sliding window of past samples for plotting",
                category: BlockCategory::Signal,
            },
            |uid| Box::new(History::new(uid)),
        );
        self.register(
            BlockDescriptor {
                kind: "fft",
                name: "FFT",
                description: "Discrete Fourier transform of an array",
                category: BlockCategory::Signal,
            },
            |uid| Box::new(Fft::new(uid)),
        );

        // Routing
        self.register(
            BlockDescriptor {
                kind: "global_variable",
                name: "Global Variable",
                description: "Publishes a value under a graph-wide name",
                category: BlockCategory::Routing,
            },
            |uid| Box::new(GlobalVariable::new(uid)),
        );
        self.register(
            BlockDescriptor {
                kind: "global_ref",
                name: "Global Reference",
                description: "Reads a graph-wide variable by name",
                category: BlockCategory::Routing,
            },
            |uid| Box::new(GlobalRef::new(uid)),
        );
        self.register(
            BlockDescriptor {
                kind: "bundle",
                name: "Bundle",
                description: "Concatenates a variable number of inputs into one array",
                category: BlockCategory::Routing,
            },
            |uid| Box::new(Bundle::new(uid)),
        );

        // Display
        self.register(
            BlockDescriptor {
                kind: "sticker",
                name: "Sticker",
                description: "Shows the value on its input",
                category: BlockCategory::Display,
            },
            |uid| Box::new(Sticker::new(uid)),
        );
    }

    /// Registers a kind. A kind id already present is replaced.
    pub fn register(&mut self, descriptor: BlockDescriptor, constructor: BlockConstructor) {
        let entry = RegistryEntry {
            descriptor,
            constructor,
        };
        match self
            .entries
            .iter_mut()
            .find(|e| e.descriptor.kind == entry.descriptor.kind)
        {
            Some(existing) => *existing = entry,
            None => self.entries.push(entry),
        }
    }

    /// Returns descriptors for all registered kinds.
    pub fn all_blocks(&self) -> Vec<&BlockDescriptor> {
        self.entries.iter().map(|e| &e.descriptor).collect()
    }

    /// Returns descriptors for kinds in a specific category.
    pub fn blocks_in_category(&self, category: BlockCategory) -> Vec<&BlockDescriptor> {
        self.entries
            .iter()
            .filter(|e| e.descriptor.category == category)
            .map(|e| &e.descriptor)
            .collect()
    }

    /// Returns descriptors matching a search query.
    pub fn search(&self, query: &str) -> Vec<&BlockDescriptor> {
        self.entries
            .iter()
            .filter(|e| e.descriptor.matches_query(query))
            .map(|e| &e.descriptor)
            .collect()
    }

    /// Get a descriptor by kind id.
    pub fn get(&self, kind: &str) -> Option<&BlockDescriptor> {
        self.entries
            .iter()
            .find(|e| e.descriptor.kind == kind)
            .map(|e| &e.descriptor)
    }

    /// Create a block by kind id with the given uid.
    ///
    /// Returns `None` if the kind is not registered.
    pub fn create(&self, kind: &str, uid: &str) -> Option<Box<dyn Block>> {
        self.entries
            .iter()
            .find(|e| e.descriptor.kind == kind)
            .map(|e| (e.constructor)(uid))
    }

    /// Returns the number of registered kinds.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no kinds are registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl BlockFactory for BlockRegistry {
    fn create(&self, kind: &str, uid: &str) -> Option<Box<dyn Block>> {
        BlockRegistry::create(self, kind, uid)
    }
}
