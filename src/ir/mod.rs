//! # Intermediate Representation for C declarations
//!
//! The IR sits between the front end's declaration list and Lean code
//! generation. It models C types and functions without any front-end syntax.
//!
//! ## Module Structure
//!
//! ```text
//! ir/
//! ├── mod.rs        # This file - module definition and re-exports
//! ├── ids.rs        # TypeId, FunctionId, ItemId
//! ├── arena.rs      # Arena (id-addressed storage) and Interner (key -> id)
//! ├── types.rs      # Type, TypeKind, IntKind, FloatKind, PointerKind, Layout
//! ├── function.rs   # Function, Param, Item, Constant, GlobalVar
//! ├── rejection.rs  # Rejection reasons and skipped-function records
//! ├── context.rs    # IRContext owning every arena
//! └── builder.rs    # IrBuilder lowering HeaderDecls into an IRContext
//! ```
//!
//! ## Lifecycle
//!
//! ```text
//! HeaderDecls → IrBuilder (mutates) → IRContext (read-only) → TypeMapper → codegen
//! ```

pub mod arena;
mod builder;
mod context;
mod function;
mod ids;
mod rejection;
mod types;

pub use builder::{float_kind, int_kind, BuiltIr, IrBuilder};
pub use context::IRContext;
pub use function::{Constant, ConstantValue, Function, GlobalVar, Item, ItemData, ItemKind, Param};
pub use ids::{ArenaId, FunctionId, ItemId, TypeId};
pub use rejection::{Lowered, RejectedAt, Rejection, SkipStage, SkippedFunction};
pub use types::{struct_name, FloatKind, IntKind, Layout, PointerKind, Type, TypeKind};
