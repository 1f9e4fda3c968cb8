//! # lean-bindgen - Lean 4 FFI bindings from C declarations
//!
//! Turns the declaration list of a C header into two files that agree on every
//! symbol: Lean `@[extern]` declarations and the C glue that implements them.
//!
//! ## Quick Start
//!
//! ```rust
//! use lean_bindgen::{Bindgen, BindgenConfig, HeaderDecls};
//!
//! # fn main() -> lean_bindgen::Result<()> {
//! let decls = HeaderDecls::from_json_str(r#"{
//!     "functions": [{
//!         "name": "add",
//!         "return_type": {"kind": "INT", "spelling": "int"},
//!         "params": [
//!             {"name": "a", "type": {"kind": "INT", "spelling": "int"}},
//!             {"name": "b", "type": {"kind": "INT", "spelling": "int"}}
//!         ]
//!     }]
//! }"#)?;
//!
//! let config = BindgenConfig::new("SimpleMath", "simple_math", "simple_math.h")?;
//! let output = Bindgen::new(config)?.run(&decls)?;
//!
//! assert!(output.artifacts.lean.contains("@[extern \"lean_simple_math_add\"]"));
//! assert!(output.artifacts.c_glue.contains("lean_simple_math_add(uint32_t a, uint32_t b)"));
//! assert_eq!(output.report.summary(), "1/1 generated");
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! HeaderDecls → IrBuilder → IRContext → TypeMapper → CodeGenerator → {Module}.lean + ffi.c
//! ```
//!
//! ### Main Components
//!
//! - [`HeaderDecls`] - Declaration list from the C front end
//! - [`IrBuilder`] - Lowers declarations into the IR, classifying pointers
//! - [`IRContext`] - Arena owning every type, function, and item
//! - [`TypeMapper`] - Decides how (and whether) each type crosses the FFI
//! - [`CodeGenerator`] - Emits both artifacts from one binding list
//! - [`Bindgen`] - Runs the whole pipeline for one header
//!
//! ## What gets bound
//!
//! - Integers, mapped by width to `UInt8`/`UInt16`/`UInt32`/`UInt64`
//! - `float`, `double`, `long double` as `Float`
//! - `const char *` as `String`
//! - Pointers to structs declared with `typedef struct x x;` as opaque `XRef` handles
//! - `void` returns as `Unit`
//!
//! Everything else (raw `void *`, callbacks, non-const `char *`, unknown
//! structs) drops the whole function with a warning.
//!
//! ## Error Handling
//!
//! Unsupported types are not errors. They show up in
//! [`GenerationReport::skipped`] and as `tracing` warnings. [`Error`] is kept for
//! bad input, I/O, an empty result, and internal defects:
//!
//! ```rust
//! use lean_bindgen::{Bindgen, BindgenConfig, Error, HeaderDecls};
//!
//! let decls = HeaderDecls::from_json_str(r#"{"functions": []}"#).unwrap();
//! let config = BindgenConfig::new("Empty", "empty", "empty.h").unwrap();
//! match Bindgen::new(config).unwrap().run(&decls) {
//!     Err(Error::NothingToGenerate { total }) => assert_eq!(total, 0),
//!     other => panic!("unexpected: {:?}", other.map(|o| o.report)),
//! }
//! ```

/// Version of lean-bindgen
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod config;
pub mod error;
pub mod input;
pub mod ir;
pub mod lean;
pub mod pipeline;

// Re-export main types
pub use config::BindgenConfig;
pub use error::{Error, ErrorClass, InvariantViolation, Result};
pub use input::{FunctionDecl, HeaderDecls, NativeKind, ParamDecl, PointeeDesc, TypeDesc, TypedefDecl};
pub use ir::{IRContext, IrBuilder, Rejection, SkippedFunction};
pub use lean::{CodeGenerator, LeanType, LeanTypeInfo, TypeMapper};
pub use pipeline::{analyze, Artifacts, Bindgen, BindgenOutput, GenerationReport};
