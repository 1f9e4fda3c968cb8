//! # C to Lean 4 Type Mapping
//!
//! Projects IR types onto Lean's FFI. Typedefs are transparent: every type is
//! resolved to its canonical form before dispatch. Results are memoized per
//! [`TypeId`].

use std::collections::{BTreeSet, HashMap};

use super::naming;
use crate::error::Result;
use crate::ir::{
    struct_name, FloatKind, Function, IRContext, IntKind, Lowered, PointerKind, RejectedAt,
    Rejection, Type, TypeId, TypeKind,
};

/// Lean 4 type used in `@[extern]` declarations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LeanType {
    /// UInt8
    UInt8,
    /// UInt16
    UInt16,
    /// UInt32
    UInt32,
    /// UInt64
    UInt64,
    /// Float (always 64-bit)
    Float,
    /// Unit
    Unit,
    /// String
    String,
    /// Generated opaque handle type, e.g. `DbConnRef`
    Opaque(String),
}

impl LeanType {
    /// Convert to Lean 4 syntax string
    pub fn to_lean(&self) -> String {
        match self {
            LeanType::UInt8 => "UInt8".to_string(),
            LeanType::UInt16 => "UInt16".to_string(),
            LeanType::UInt32 => "UInt32".to_string(),
            LeanType::UInt64 => "UInt64".to_string(),
            LeanType::Float => "Float".to_string(),
            LeanType::Unit => "Unit".to_string(),
            LeanType::String => "String".to_string(),
            LeanType::Opaque(name) => name.clone(),
        }
    }

    /// C type Lean's ABI uses for unboxed scalars
    fn scalar_c_type(&self) -> &'static str {
        match self {
            LeanType::UInt8 => "uint8_t",
            LeanType::UInt16 => "uint16_t",
            LeanType::UInt32 => "uint32_t",
            LeanType::UInt64 => "uint64_t",
            LeanType::Float => "double",
            LeanType::Unit | LeanType::String | LeanType::Opaque(_) => BOXED_C_TYPE,
        }
    }
}

/// C type of every boxed Lean value
pub const BOXED_C_TYPE: &str = "lean_object*";

/// What the glue layer does to move a value across the boundary
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Marshal {
    /// Plain C cast between the native spelling and the Lean scalar
    Cast,
    /// `float` carried as Lean's 64-bit `Float`: narrow going in, widen coming out
    NarrowFloat,
    /// Lean `String` in, `const char *` out (and `lean_mk_string` back)
    String,
    /// Pointer to an opaque struct wrapped in a Lean external object
    Handle {
        /// Struct name without the `struct` keyword
        c_name: String,
    },
    /// C `void` result returned as `Unit`
    Unit,
}

/// How an IR type maps to Lean
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeanTypeInfo {
    /// The Lean type to use in `@[extern]` declarations
    pub lean_type: LeanType,
    /// The C type the glue layer uses (must match Lean's ABI)
    pub c_ffi_type: String,
    /// Whether the glue layer has to convert the value
    pub needs_conversion: bool,
    /// Whether this is an opaque handle
    pub is_opaque: bool,
    /// Whether Lean passes the value as a `lean_object *`
    pub boxed: bool,
    /// Conversion the glue layer performs
    pub marshal: Marshal,
}

impl LeanTypeInfo {
    fn scalar(lean_type: LeanType, marshal: Marshal) -> Self {
        Self {
            c_ffi_type: lean_type.scalar_c_type().to_string(),
            needs_conversion: marshal != Marshal::Cast,
            lean_type,
            is_opaque: false,
            boxed: false,
            marshal,
        }
    }

    fn boxed(lean_type: LeanType, marshal: Marshal) -> Self {
        Self {
            c_ffi_type: BOXED_C_TYPE.to_string(),
            needs_conversion: marshal != Marshal::Unit,
            is_opaque: matches!(marshal, Marshal::Handle { .. }),
            lean_type,
            boxed: true,
            marshal,
        }
    }

    /// Whether this is the `Unit` mapping of C `void`
    pub fn is_unit(&self) -> bool {
        self.marshal == Marshal::Unit
    }
}

/// A mapped parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappedParam {
    /// Parameter name
    pub name: String,
    /// Original C spelling (used for casts in the glue layer)
    pub c_type: String,
    /// Lean mapping
    pub info: LeanTypeInfo,
}

/// A mapped return value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappedReturn {
    /// Original C spelling
    pub c_type: String,
    /// Lean mapping
    pub info: LeanTypeInfo,
}

/// Signature mapping for one function
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappedSignature {
    /// Return mapping
    pub ret: MappedReturn,
    /// Parameter mappings in declaration order
    pub params: Vec<MappedParam>,
}

/// Per-function support decision
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Support {
    /// Every type maps
    Supported(MappedSignature),
    /// The first type that did not map
    Rejected {
        /// Where it sits in the signature
        at: RejectedAt,
        /// Why it was refused
        reason: Rejection,
    },
}

/// Maps IR types to Lean FFI equivalents.
///
/// Borrows the finished context; the cache lives as long as the mapper.
pub struct TypeMapper<'a> {
    ctx: &'a IRContext,
    cache: HashMap<TypeId, Lowered<LeanTypeInfo>>,
    handle_owners: HashMap<String, BTreeSet<String>>,
}

impl<'a> TypeMapper<'a> {
    /// Create a mapper over a built context
    pub fn new(ctx: &'a IRContext) -> Self {
        // Lean handle name -> every struct that generates it
        let mut handle_owners: HashMap<String, BTreeSet<String>> = HashMap::new();
        for typ in ctx.all_types() {
            if let TypeKind::Opaque { .. } = typ.kind {
                let c_name = struct_name(&typ.c_spelling);
                handle_owners
                    .entry(naming::opaque_type_name(c_name))
                    .or_default()
                    .insert(c_name.to_string());
            }
        }

        Self {
            ctx,
            cache: HashMap::new(),
            handle_owners,
        }
    }

    /// The context being mapped
    pub fn context(&self) -> &'a IRContext {
        self.ctx
    }

    /// Map an IR type to its Lean equivalent, or say why it has none
    pub fn map_type(&mut self, type_id: TypeId) -> Result<Lowered<LeanTypeInfo>> {
        if let Some(cached) = self.cache.get(&type_id) {
            return Ok(cached.clone());
        }

        let canonical = self.ctx.resolve_canonical_type(type_id)?;
        let typ = self.ctx.require_type(canonical)?;
        let mapped = self.map_type_kind(typ)?;

        self.cache.insert(type_id, mapped.clone());
        Ok(mapped)
    }

    /// Decide whether a function can be bound.
    ///
    /// The return type and every parameter are checked independently of the
    /// builder; the first refusal rejects the whole function.
    pub fn map_function(&mut self, func: &Function) -> Result<Support> {
        let ret = match self.map_type(func.return_type)? {
            Ok(info) => MappedReturn {
                c_type: self.ctx.require_type(func.return_type)?.c_spelling.clone(),
                info,
            },
            Err(reason) => {
                return Ok(Support::Rejected {
                    at: RejectedAt::Return,
                    reason,
                })
            }
        };

        let mut params = Vec::with_capacity(func.params.len());
        for param in &func.params {
            let at = || RejectedAt::Param(param.name.clone());
            let info = match self.map_type(param.type_id)? {
                Ok(info) if info.is_unit() => {
                    return Ok(Support::Rejected {
                        at: at(),
                        reason: Rejection::VoidParameter,
                    })
                }
                Ok(info) => info,
                Err(reason) => return Ok(Support::Rejected { at: at(), reason }),
            };
            params.push(MappedParam {
                name: param.name.clone(),
                c_type: self.ctx.require_type(param.type_id)?.c_spelling.clone(),
                info,
            });
        }

        Ok(Support::Supported(MappedSignature { ret, params }))
    }

    fn map_type_kind(&self, typ: &Type) -> Result<Lowered<LeanTypeInfo>> {
        let mapped = match &typ.kind {
            TypeKind::Int { kind, .. } => Ok(map_int(*kind)),
            TypeKind::Float { kind } => Ok(map_float(*kind)),
            TypeKind::Void => Ok(LeanTypeInfo::boxed(LeanType::Unit, Marshal::Unit)),
            TypeKind::Pointer {
                pointee,
                classification,
                ..
            } => return self.map_pointer(typ, *pointee, *classification),
            TypeKind::Alias { .. } => Err(Rejection::UnresolvedAlias {
                spelling: typ.c_spelling.clone(),
            }),
            TypeKind::Opaque { .. } => Err(Rejection::ByValueOpaque {
                spelling: typ.c_spelling.clone(),
            }),
        };
        Ok(mapped)
    }

    fn map_pointer(
        &self,
        typ: &Type,
        pointee: TypeId,
        classification: PointerKind,
    ) -> Result<Lowered<LeanTypeInfo>> {
        match classification {
            PointerKind::Opaque => {
                let pointee = self.ctx.require_type(pointee)?;
                let c_name = struct_name(&pointee.c_spelling).to_string();
                let lean_name = naming::opaque_type_name(&c_name);
                match self.handle_owners.get(&lean_name) {
                    Some(owners) if owners.len() > 1 => {
                        Ok(Err(Rejection::OpaqueNameCollision {
                            structs: owners.iter().cloned().collect::<Vec<_>>().join(", "),
                            lean_name,
                        }))
                    }
                    _ => Ok(Ok(LeanTypeInfo::boxed(
                        LeanType::Opaque(lean_name),
                        Marshal::Handle { c_name },
                    ))),
                }
            }
            PointerKind::String => Ok(Ok(LeanTypeInfo::boxed(LeanType::String, Marshal::String))),
            PointerKind::Buffer
            | PointerKind::OutParam
            | PointerKind::Function
            | PointerKind::Typed => Ok(Err(Rejection::ReservedPointer {
                classification,
                spelling: typ.c_spelling.clone(),
            })),
        }
    }
}

/// Map integers by storage width only; Lean's FFI exposes unsigned widths
fn map_int(kind: IntKind) -> LeanTypeInfo {
    let lean_type = match kind.width() {
        1 => LeanType::UInt8,
        2 => LeanType::UInt16,
        4 => LeanType::UInt32,
        _ => LeanType::UInt64,
    };
    LeanTypeInfo::scalar(lean_type, Marshal::Cast)
}

/// Lean's Float is always 64-bit; `float` is narrowed in the glue layer
fn map_float(kind: FloatKind) -> LeanTypeInfo {
    match kind {
        FloatKind::Float => LeanTypeInfo::scalar(LeanType::Float, Marshal::NarrowFloat),
        FloatKind::Double | FloatKind::LongDouble => {
            LeanTypeInfo::scalar(LeanType::Float, Marshal::Cast)
        }
    }
}
