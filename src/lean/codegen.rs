//! # Dual-Artifact Code Generator
//!
//! Emits the Lean `@[extern]` declarations and the C glue that implements them.
//! Both emitters walk the same ordered [`Binding`] list and read the same
//! mapping records, so symbol names, order, and types always agree.
//!
//! Output is a pure function of the bindings: no hash-order iteration, no
//! timestamps.

use std::collections::HashSet;

use super::naming;
use super::types::{LeanTypeInfo, Marshal, MappedSignature, Support, TypeMapper};
use crate::config::BindgenConfig;
use crate::error::{InvariantViolation, Result};
use crate::ir::{FunctionId, IRContext};

/// One supported function paired with its mapping
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    /// IR function
    pub function: FunctionId,
    /// Native function name
    pub c_name: String,
    /// Lean declaration name
    pub lean_name: String,
    /// Extern symbol shared by both artifacts
    pub symbol: String,
    /// Doc comment carried from the header
    pub comment: Option<String>,
    /// Mapped return and parameters
    pub signature: MappedSignature,
}

/// An opaque handle type in first-use order
#[derive(Debug, Clone, PartialEq, Eq)]
struct OpaqueDecl {
    c_name: String,
    lean_name: String,
}

/// Generates both artifacts from the supported-function list
#[derive(Debug, Clone)]
pub struct CodeGenerator {
    config: BindgenConfig,
    bindings: Vec<Binding>,
}

impl CodeGenerator {
    /// Pair every supported function with its mapping, in supported-list order
    pub fn new(ctx: &IRContext, mapper: &mut TypeMapper<'_>) -> Result<Self> {
        let mut bindings = Vec::with_capacity(ctx.get_supported_functions().len());
        for &id in ctx.get_supported_functions() {
            let func = ctx.require_function(id)?;
            let signature = match mapper.map_function(func)? {
                Support::Supported(signature) => signature,
                Support::Rejected { .. } => {
                    return Err(InvariantViolation::UnmappedSupported(id).into())
                }
            };
            bindings.push(Binding {
                function: id,
                c_name: func.c_name.clone(),
                lean_name: naming::lean_ident(&func.c_name),
                symbol: naming::extern_symbol(&ctx.config.module_prefix, &func.c_name),
                comment: func.comment.clone(),
                signature,
            });
        }

        Ok(Self {
            config: ctx.config.clone(),
            bindings,
        })
    }

    /// Bindings in emission order
    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    /// Generate the Lean bindings file
    pub fn generate_lean(&self) -> String {
        let mut code = String::new();

        // Header
        code.push_str("/-\n");
        code.push_str(&format!(
            "  Auto-generated Lean bindings for: {}\n",
            self.config.header_name
        ));
        code.push_str("  Generated by lean-bindgen - DO NOT EDIT\n");
        code.push_str("-/\n\n");

        code.push_str(&format!("namespace {}\n\n", self.config.module_name));

        // Opaque handle types, declared before first use
        for opaque in dedup_by(self.opaque_decls(), |o| o.c_name.clone()) {
            let name = &opaque.lean_name;
            code.push_str(&format!("opaque {}Pointed : NonemptyType\n", name));
            code.push_str(&format!("def {} : Type := {}Pointed.type\n", name, name));
            code.push_str(&format!(
                "instance : Nonempty {} := {}Pointed.property\n\n",
                name, name
            ));
        }

        for binding in &self.bindings {
            if let Some(comment) = &binding.comment {
                code.push_str(&format!("/-- {} -/\n", lean_doc(comment)));
            }
            code.push_str(&format!("@[extern \"{}\"]\n", binding.symbol));
            code.push_str(&format!("opaque {}", binding.lean_name));
            if binding.signature.params.is_empty() {
                code.push_str(" (unit : Unit)");
            }
            for param in &binding.signature.params {
                code.push_str(&format!(
                    " ({} : {})",
                    naming::lean_ident(&param.name),
                    lean_param_type(&param.info)
                ));
            }
            code.push_str(&format!(
                " : {}\n\n",
                binding.signature.ret.info.lean_type.to_lean()
            ));
        }

        code.push_str(&format!("end {}\n", self.config.module_name));
        code
    }

    /// Generate the C glue file
    pub fn generate_c_glue(&self) -> String {
        let mut code = String::new();

        // Header
        code.push_str("/*\n");
        code.push_str(&format!(
            " * Auto-generated C glue for: {}\n",
            self.config.header_name
        ));
        code.push_str(" * Generated by lean-bindgen - DO NOT EDIT\n");
        code.push_str(" */\n\n");

        code.push_str("#include <lean/lean.h>\n");
        code.push_str("#include <stdint.h>\n");
        code.push_str(&format!("#include \"{}\"\n", self.config.header_name));

        for opaque in dedup_by(self.opaque_decls(), |o| o.c_name.clone()) {
            code.push('\n');
            code.push_str(&external_class(&opaque.c_name));
        }

        for binding in &self.bindings {
            code.push('\n');
            code.push_str(&adapter(binding));
        }

        code
    }

    /// Opaque types in first-use order: each binding's return, then its params
    fn opaque_decls(&self) -> Vec<OpaqueDecl> {
        let mut decls = Vec::new();
        for binding in &self.bindings {
            let sig = &binding.signature;
            let infos = std::iter::once(&sig.ret.info).chain(sig.params.iter().map(|p| &p.info));
            for info in infos {
                if let Marshal::Handle { c_name } = &info.marshal {
                    decls.push(OpaqueDecl {
                        c_name: c_name.clone(),
                        lean_name: info.lean_type.to_lean(),
                    });
                }
            }
        }
        decls
    }
}

/// Keep the first element for each key, preserving order
fn dedup_by<T, K, F>(items: Vec<T>, key: F) -> Vec<T>
where
    K: std::hash::Hash + Eq,
    F: Fn(&T) -> K,
{
    let mut seen = HashSet::new();
    items.into_iter().filter(|item| seen.insert(key(item))).collect()
}

/// Boxed parameters are borrowed: Lean keeps ownership
fn lean_param_type(info: &LeanTypeInfo) -> String {
    if info.boxed {
        format!("@& {}", info.lean_type.to_lean())
    } else {
        info.lean_type.to_lean()
    }
}

/// Single-line doc text that cannot close the Lean comment early
fn lean_doc(comment: &str) -> String {
    comment
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .replace("-/", "- /")
}

/// External class registration for one opaque struct.
///
/// The finalizer does nothing: the native library owns the handle and
/// releases it through its own close function.
fn external_class(c_name: &str) -> String {
    let finalize = naming::external_finalizer(c_name);
    let foreach = naming::external_foreach(c_name);
    let slot = naming::external_class_slot(c_name);
    let getter = naming::external_class_getter(c_name);

    let mut code = String::new();
    code.push_str(&format!("static void {}(void *ptr) {{\n", finalize));
    code.push_str("    (void)ptr;\n");
    code.push_str("}\n\n");
    code.push_str(&format!(
        "static void {}(void *ptr, b_lean_obj_arg fn) {{\n",
        foreach
    ));
    code.push_str("    (void)ptr;\n");
    code.push_str("    (void)fn;\n");
    code.push_str("}\n\n");
    code.push_str(&format!("static lean_external_class *{} = NULL;\n\n", slot));
    code.push_str(&format!("static lean_external_class *{}(void) {{\n", getter));
    code.push_str(&format!("    if ({} == NULL) {{\n", slot));
    code.push_str(&format!(
        "        {} = lean_register_external_class({}, {});\n",
        slot, finalize, foreach
    ));
    code.push_str("    }\n");
    code.push_str(&format!("    return {};\n", slot));
    code.push_str("}\n");
    code
}

/// One exported adapter: unbox, call, box
fn adapter(binding: &Binding) -> String {
    let sig = &binding.signature;

    let params = if sig.params.is_empty() {
        "b_lean_obj_arg unit".to_string()
    } else {
        sig.params
            .iter()
            .map(|p| format!("{} {}", c_param_type(&p.info), p.name))
            .collect::<Vec<_>>()
            .join(", ")
    };

    let args = sig
        .params
        .iter()
        .map(|p| unbox(&p.info, &p.c_type, &p.name))
        .collect::<Vec<_>>()
        .join(", ");
    let call = format!("{}({})", binding.c_name, args);

    let mut code = String::new();
    code.push_str(&format!(
        "LEAN_EXPORT {} {}({}) {{\n",
        c_return_type(&sig.ret.info),
        binding.symbol,
        params
    ));
    if sig.params.is_empty() {
        code.push_str("    (void)unit;\n");
    }
    let taken: Vec<&str> = sig.params.iter().map(|p| p.name.as_str()).collect();
    let local = naming::fresh_local("result", &taken);
    code.push_str(&box_result(&sig.ret.info, &sig.ret.c_type, &call, &local));
    code.push_str("}\n");
    code
}

fn c_param_type(info: &LeanTypeInfo) -> &str {
    if info.boxed {
        "b_lean_obj_arg"
    } else {
        &info.c_ffi_type
    }
}

fn c_return_type(info: &LeanTypeInfo) -> &str {
    if info.boxed {
        "lean_obj_res"
    } else {
        &info.c_ffi_type
    }
}

/// Expression turning a Lean argument into the native parameter
fn unbox(info: &LeanTypeInfo, c_type: &str, name: &str) -> String {
    match &info.marshal {
        Marshal::Cast | Marshal::NarrowFloat => format!("({}){}", c_type, name),
        Marshal::String => format!("lean_string_cstr({})", name),
        Marshal::Handle { .. } => format!("({})lean_get_external_data({})", c_type, name),
        // Rejected as a parameter type before generation
        Marshal::Unit => format!("(void){}", name),
    }
}

/// Statements calling the native function and returning the Lean value
fn box_result(info: &LeanTypeInfo, c_type: &str, call: &str, local: &str) -> String {
    match &info.marshal {
        Marshal::Cast | Marshal::NarrowFloat => {
            format!("    return ({}){};\n", info.c_ffi_type, call)
        }
        Marshal::String => format!(
            "    {} = {};\n    return lean_mk_string({} != NULL ? {} : \"\");\n",
            c_declaration(c_type, local),
            call,
            local,
            local
        ),
        Marshal::Handle { c_name } => format!(
            "    return lean_alloc_external({}(), (void *){});\n",
            naming::external_class_getter(c_name),
            call
        ),
        Marshal::Unit => format!("    {};\n    return lean_box(0);\n", call),
    }
}

/// `T name`, or `T *name` for pointer spellings
fn c_declaration(c_type: &str, name: &str) -> String {
    if c_type.ends_with('*') {
        format!("{}{}", c_type, name)
    } else {
        format!("{} {}", c_type, name)
    }
}
