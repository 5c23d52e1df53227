//! Batch renaming of scene nodes.
//!
//! The core is [`naming::Resolver`]: compose `[prefix_][side_]base[_index][_suffix]`
//! and step the index until the candidate is absent from a [`naming::NameUniverse`].
//! [`batch`] builds previews for a selection, [`ops`] holds single-name manual
//! edits, [`rules`] solves names from templates and [`host`] defines the
//! collaborators that enumerate, rename and name nodes.

pub mod batch;
pub mod config;
pub mod error;
pub mod host;
pub mod loader;
pub mod naming;
pub mod ops;
pub mod rules;

pub use batch::{
    ManualOptions, RenameItem, apply_edits, auto_names, generate_names, make_unique_names,
};
pub use error::{RenameError, Result};
pub use host::{
    MemoryScene, RenameExecutor, RenameReport, RuleEngine, RuleTokens, SceneNodes, SceneUniverse,
    apply_plan,
};
pub use naming::{IndexMode, NameRequest, NameUniverse, Resolver, Side};
pub use ops::EditOp;
