//! # Lean 4 FFI target
//!
//! Maps IR types onto Lean's FFI and emits the two artifacts.
//!
//! ## Module Structure
//!
//! ```text
//! lean/
//! ├── mod.rs      # This file - module definition and re-exports
//! ├── types.rs    # LeanType, LeanTypeInfo, Marshal, TypeMapper
//! ├── naming.rs   # Extern symbols and generated type names
//! └── codegen.rs  # Lean declarations + C glue from one binding list
//! ```

pub mod codegen;
pub mod naming;
pub mod types;

pub use codegen::{Binding, CodeGenerator};
pub use types::{
    LeanType, LeanTypeInfo, MappedParam, MappedReturn, MappedSignature, Marshal, Support,
    TypeMapper, BOXED_C_TYPE,
};
