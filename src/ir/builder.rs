//! IR builder - lowers the front end's declaration list into an [`IRContext`]
//!
//! Two passes:
//!
//! 1. Typedef discovery. Struct typedefs register opaque handle names and
//!    scalar typedefs are remembered for canonicalization.
//! 2. Function lowering. Return type first, then parameters in order. The first
//!    rejected type drops the whole function; nothing is half-lowered.
//!
//! Conversions are interned on `(native kind, spelling)` so the same C type
//! always yields the same [`TypeId`]. Pointee placeholders for opaque structs
//! live in a second interner keyed by struct name, shared by every pointer
//! spelling that reaches the same struct.

use std::collections::{BTreeSet, HashMap, HashSet};

use super::arena::Interner;
use super::context::IRContext;
use super::function::{Function, ItemData, Param};
use super::ids::{FunctionId, TypeId};
use super::rejection::{Lowered, RejectedAt, Rejection, SkipStage, SkippedFunction};
use super::types::{struct_name, FloatKind, IntKind, PointerKind, TypeKind};
use crate::config::BindgenConfig;
use crate::error::Result;
use crate::input::{
    FunctionDecl, HeaderDecls, NativeKind, ParamDecl, PointeeDesc, TypeDesc, TypedefDecl,
};

/// Result of lowering one header
#[derive(Debug, Clone)]
pub struct BuiltIr {
    /// The populated context, read-only from here on
    pub ctx: IRContext,
    /// Functions dropped because a type could not be lowered
    pub skipped: Vec<SkippedFunction>,
    /// Number of function declarations in the input
    pub total_functions: usize,
}

/// Converts the declaration list to IR.
///
/// All mutable state (caches, opaque names) lives in the builder, so separate
/// headers use separate builders and share nothing.
pub struct IrBuilder {
    ctx: IRContext,
    type_cache: Interner<(NativeKind, String), TypeId>,
    opaque_cache: Interner<String, TypeId>,
    opaque_names: BTreeSet<String>,
    scalar_typedefs: HashMap<String, TypedefDecl>,
    alias_stack: Vec<String>,
    skipped: Vec<SkippedFunction>,
}

impl IrBuilder {
    /// Create a builder with an empty context
    pub fn new(config: BindgenConfig) -> Self {
        Self {
            ctx: IRContext::new(config),
            type_cache: Interner::new(),
            opaque_cache: Interner::new(),
            opaque_names: BTreeSet::new(),
            scalar_typedefs: HashMap::new(),
            alias_stack: Vec::new(),
            skipped: Vec::new(),
        }
    }

    /// Build the complete IR for one header
    pub fn build(mut self, decls: &HeaderDecls) -> Result<BuiltIr> {
        self.register_typedefs(&decls.typedefs);
        tracing::debug!(
            "Registered {} opaque name(s), {} scalar typedef(s)",
            self.opaque_names.len(),
            self.scalar_typedefs.len()
        );

        for func in &decls.functions {
            self.lower_function(func)?;
        }
        tracing::debug!(
            "Built IR with {} type(s), {} function(s)",
            self.ctx.type_count(),
            self.ctx.function_count()
        );

        Ok(BuiltIr {
            ctx: self.ctx,
            skipped: self.skipped,
            total_functions: decls.functions.len(),
        })
    }

    /// Pass 1
    fn register_typedefs(&mut self, typedefs: &[TypedefDecl]) {
        for typedef in typedefs {
            if typedef.is_struct || typedef.underlying_kind == NativeKind::Record {
                self.opaque_names.insert(typedef.name.clone());
                self.opaque_names
                    .insert(struct_name(&typedef.underlying).to_string());
            } else if scalar_shape(&typedef.underlying_kind).is_some()
                && typedef.name != typedef.underlying
            {
                self.scalar_typedefs
                    .entry(typedef.name.clone())
                    .or_insert_with(|| typedef.clone());
            }
        }
    }

    /// Pass 2, one function
    fn lower_function(&mut self, decl: &FunctionDecl) -> Result<Option<FunctionId>> {
        let return_type = match self.convert(&decl.return_type)? {
            Ok(id) => id,
            Err(reason) => {
                self.skip(decl, RejectedAt::Return, reason);
                return Ok(None);
            }
        };

        let mut params = Vec::with_capacity(decl.params.len());
        for (param, name) in decl.params.iter().zip(param_names(&decl.params)) {
            match self.convert(&param.ty)? {
                Ok(type_id) => params.push(Param { name, type_id }),
                Err(reason) => {
                    self.skip(decl, RejectedAt::Param(name), reason);
                    return Ok(None);
                }
            }
        }

        let id = self.ctx.add_function(Function {
            id: FunctionId::from_index(0),
            c_name: decl.name.clone(),
            return_type,
            params,
            is_variadic: false,
            source_location: decl.source_location.clone(),
            comment: decl.comment.clone(),
        })?;
        self.ctx
            .add_item(ItemData::Function(id), decl.name.clone(), decl.comment.clone(), true)?;
        Ok(Some(id))
    }

    fn skip(&mut self, decl: &FunctionDecl, at: RejectedAt, reason: Rejection) {
        let skipped = SkippedFunction {
            name: decl.name.clone(),
            stage: SkipStage::Lowering,
            at,
            reason,
        };
        tracing::debug!("Lowering dropped: {}", skipped);
        self.skipped.push(skipped);
    }

    /// Convert one front-end type to IR.
    ///
    /// `Ok(Err(_))` is an unsupported type; `Err(_)` is an IR invariant failure.
    pub fn convert(&mut self, desc: &TypeDesc) -> Result<Lowered<TypeId>> {
        let key = (desc.kind.clone(), desc.spelling.clone());
        if let Some(id) = self.type_cache.get(&key) {
            return Ok(Ok(id));
        }

        if desc.kind == NativeKind::Pointer {
            return self.convert_pointer(desc, key);
        }

        let Some(shape) = scalar_shape(&desc.kind) else {
            return Ok(Err(Rejection::UnsupportedKind {
                spelling: desc.spelling.clone(),
                kind: desc.kind.to_string(),
            }));
        };

        let id = match self.scalar_typedefs.get(&desc.spelling).cloned() {
            Some(typedef) => match self.convert_alias(desc, &typedef)? {
                Ok(id) => id,
                Err(reason) => return Ok(Err(reason)),
            },
            None => self.ctx.add_type(shape, desc.spelling.clone(), None, None)?,
        };
        Ok(Ok(self.type_cache.insert(key, id)))
    }

    fn convert_alias(&mut self, desc: &TypeDesc, typedef: &TypedefDecl) -> Result<Lowered<TypeId>> {
        if self.alias_stack.contains(&typedef.name) {
            return Ok(Err(Rejection::AliasCycle {
                name: typedef.name.clone(),
            }));
        }

        self.alias_stack.push(typedef.name.clone());
        let target = self.convert(&TypeDesc::new(desc.kind.clone(), typedef.underlying.clone()));
        self.alias_stack.pop();
        let target = match target? {
            Ok(id) => id,
            Err(reason) => return Ok(Err(reason)),
        };

        let id = self.ctx.add_type(
            TypeKind::Alias {
                name: typedef.name.clone(),
                target,
            },
            desc.spelling.clone(),
            Some(target),
            None,
        )?;
        Ok(Ok(id))
    }

    fn convert_pointer(
        &mut self,
        desc: &TypeDesc,
        key: (NativeKind, String),
    ) -> Result<Lowered<TypeId>> {
        let Some(pointee) = desc.pointee.as_ref() else {
            return Ok(Err(Rejection::MissingPointee {
                spelling: desc.spelling.clone(),
            }));
        };

        let classification = match self.classify_pointer(&desc.spelling, pointee) {
            Ok(classification) => classification,
            Err(reason) => return Ok(Err(reason)),
        };

        let pointee_id = match classification {
            PointerKind::Opaque => self.opaque_placeholder(struct_name(&pointee.spelling))?,
            _ => match self.convert(&TypeDesc::new(pointee.kind.clone(), pointee.spelling.clone()))? {
                Ok(id) => id,
                Err(reason) => return Ok(Err(reason)),
            },
        };

        let id = self.ctx.add_type(
            TypeKind::Pointer {
                pointee: pointee_id,
                classification,
                is_const: pointee.is_const,
            },
            desc.spelling.clone(),
            None,
            None,
        )?;
        Ok(Ok(self.type_cache.insert(key, id)))
    }

    /// Decide what a pointer means. Anything not recognised is refused.
    fn classify_pointer(&self, spelling: &str, pointee: &PointeeDesc) -> Lowered<PointerKind> {
        let spelling = spelling.to_string();
        match &pointee.kind {
            kind if kind.is_plain_char() => {
                if pointee.is_const {
                    Ok(PointerKind::String)
                } else {
                    Err(Rejection::MutableCharPointer { spelling })
                }
            }
            NativeKind::Record => {
                let name = struct_name(&pointee.spelling);
                if self.opaque_names.contains(name) {
                    Ok(PointerKind::Opaque)
                } else {
                    Err(Rejection::UnknownStruct {
                        name: name.to_string(),
                    })
                }
            }
            NativeKind::Void => Err(Rejection::RawPointer { spelling }),
            NativeKind::FunctionProto | NativeKind::FunctionNoProto => {
                Err(Rejection::FunctionPointer { spelling })
            }
            NativeKind::Pointer => Err(Rejection::PointerToPointer { spelling }),
            _ => Err(Rejection::UnsupportedPointee { spelling }),
        }
    }

    fn opaque_placeholder(&mut self, name: &str) -> Result<TypeId> {
        let ctx = &mut self.ctx;
        self.opaque_cache.intern_with(name.to_string(), || -> Result<TypeId> {
            let id = ctx.add_type(
                TypeKind::Opaque {
                    name: name.to_string(),
                },
                name,
                None,
                None,
            )?;
            ctx.add_item(ItemData::Type(id), name, None, true)?;
            Ok(id)
        })
    }
}

/// Parameter names in order, `arg{index}` where the header left one unnamed.
///
/// A placeholder never reuses a name the header gave another parameter; an
/// underscore is appended until it is free.
fn param_names(params: &[ParamDecl]) -> Vec<String> {
    fn explicit(param: &ParamDecl) -> Option<&str> {
        param.name.as_deref().filter(|name| !name.is_empty())
    }

    let mut taken: HashSet<String> = params
        .iter()
        .filter_map(explicit)
        .map(str::to_string)
        .collect();

    params
        .iter()
        .enumerate()
        .map(|(index, param)| match explicit(param) {
            Some(name) => name.to_string(),
            None => {
                let mut name = format!("arg{}", index);
                while taken.contains(&name) {
                    name.push('_');
                }
                taken.insert(name.clone());
                name
            }
        })
        .collect()
}

/// Integer kind for a native tag
pub fn int_kind(kind: &NativeKind) -> Option<IntKind> {
    match kind {
        NativeKind::CharS | NativeKind::CharU => Some(IntKind::Char),
        NativeKind::SChar => Some(IntKind::SChar),
        NativeKind::UChar => Some(IntKind::UChar),
        NativeKind::Short => Some(IntKind::Short),
        NativeKind::UShort => Some(IntKind::UShort),
        NativeKind::Int => Some(IntKind::Int),
        NativeKind::UInt => Some(IntKind::UInt),
        NativeKind::Long => Some(IntKind::Long),
        NativeKind::ULong => Some(IntKind::ULong),
        NativeKind::LongLong => Some(IntKind::LongLong),
        NativeKind::ULongLong => Some(IntKind::ULongLong),
        _ => None,
    }
}

/// Floating kind for a native tag
pub fn float_kind(kind: &NativeKind) -> Option<FloatKind> {
    match kind {
        NativeKind::Float => Some(FloatKind::Float),
        NativeKind::Double => Some(FloatKind::Double),
        NativeKind::LongDouble => Some(FloatKind::LongDouble),
        _ => None,
    }
}

/// IR shape for a non-pointer native kind: integer, then float, then void
fn scalar_shape(kind: &NativeKind) -> Option<TypeKind> {
    if let Some(int) = int_kind(kind) {
        return Some(TypeKind::Int {
            kind: int,
            is_signed: int.is_signed(),
        });
    }
    if let Some(float) = float_kind(kind) {
        return Some(TypeKind::Float { kind: float });
    }
    match kind {
        NativeKind::Void => Some(TypeKind::Void),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::ItemKind;

    fn builder() -> IrBuilder {
        IrBuilder::new(BindgenConfig::new("Test", "test", "test.h").unwrap())
    }

    fn int() -> TypeDesc {
        TypeDesc::new(NativeKind::Int, "int")
    }

    fn const_char_ptr() -> TypeDesc {
        TypeDesc::pointer(
            "const char *",
            PointeeDesc {
                spelling: "const char".into(),
                kind: NativeKind::CharS,
                is_const: true,
            },
        )
    }

    fn struct_ptr(spelling: &str, pointee: &str) -> TypeDesc {
        TypeDesc::pointer(
            spelling,
            PointeeDesc {
                spelling: pointee.into(),
                kind: NativeKind::Record,
                is_const: false,
            },
        )
    }

    fn func(name: &str, ret: TypeDesc, params: Vec<TypeDesc>) -> FunctionDecl {
        FunctionDecl {
            name: name.into(),
            return_type: ret,
            params: params
                .into_iter()
                .enumerate()
                .map(|(i, ty)| ParamDecl {
                    name: Some(format!("p{}", i)),
                    ty,
                })
                .collect(),
            source_location: Some("test.h".into()),
            comment: None,
        }
    }

    fn struct_typedef(name: &str) -> TypedefDecl {
        TypedefDecl {
            name: name.into(),
            underlying: format!("struct {}", name),
            underlying_kind: NativeKind::Record,
            is_struct: true,
        }
    }

    fn pointer_kind(ctx: &IRContext, id: TypeId) -> PointerKind {
        match ctx.get_type(id).unwrap().kind {
            TypeKind::Pointer { classification, .. } => classification,
            ref other => panic!("expected pointer, got {:?}", other),
        }
    }

    #[test]
    fn test_interning_same_key_same_id() {
        let mut b = builder();
        let a = b.convert(&int()).unwrap().unwrap();
        let c = b.convert(&int()).unwrap().unwrap();
        assert_eq!(a, c);
        assert_eq!(b.ctx.type_count(), 1);
    }

    #[test]
    fn test_signedness_from_table() {
        let mut b = builder();
        let id = b
            .convert(&TypeDesc::new(NativeKind::UShort, "unsigned short"))
            .unwrap()
            .unwrap();
        assert_eq!(
            b.ctx.get_type(id).unwrap().kind,
            TypeKind::Int {
                kind: IntKind::UShort,
                is_signed: false
            }
        );
    }

    #[test]
    fn test_unsupported_kind_is_rejection() {
        let mut b = builder();
        let rejected = b
            .convert(&TypeDesc::new(NativeKind::Other("ENUM".into()), "enum color"))
            .unwrap();
        assert!(matches!(rejected, Err(Rejection::UnsupportedKind { .. })));
        assert_eq!(b.ctx.type_count(), 0);
    }

    #[test]
    fn test_const_char_pointer_is_string() {
        let mut b = builder();
        let id = b.convert(&const_char_ptr()).unwrap().unwrap();
        assert_eq!(pointer_kind(&b.ctx, id), PointerKind::String);
    }

    #[test]
    fn test_mutable_char_pointer_rejected() {
        let mut b = builder();
        b.register_typedefs(&[struct_typedef("char")]);
        let desc = TypeDesc::pointer(
            "char *",
            PointeeDesc {
                spelling: "char".into(),
                kind: NativeKind::CharS,
                is_const: false,
            },
        );
        assert!(matches!(
            b.convert(&desc).unwrap(),
            Err(Rejection::MutableCharPointer { .. })
        ));
    }

    #[test]
    fn test_struct_pointer_needs_registration() {
        let mut b = builder();
        assert!(matches!(
            b.convert(&struct_ptr("db_conn *", "db_conn")).unwrap(),
            Err(Rejection::UnknownStruct { .. })
        ));

        let mut b = builder();
        b.register_typedefs(&[struct_typedef("db_conn")]);
        let id = b.convert(&struct_ptr("db_conn *", "db_conn")).unwrap().unwrap();
        assert_eq!(pointer_kind(&b.ctx, id), PointerKind::Opaque);
    }

    #[test]
    fn test_placeholder_shared_across_spellings() {
        let mut b = builder();
        b.register_typedefs(&[struct_typedef("sqlite3")]);
        let plain = b.convert(&struct_ptr("sqlite3 *", "sqlite3")).unwrap().unwrap();
        let tagged = b
            .convert(&struct_ptr("struct sqlite3 *", "struct sqlite3"))
            .unwrap()
            .unwrap();
        assert_ne!(plain, tagged);

        let pointee = |id| match b.ctx.get_type(id).unwrap().kind {
            TypeKind::Pointer { pointee, .. } => pointee,
            _ => unreachable!(),
        };
        assert_eq!(pointee(plain), pointee(tagged));
        let type_items = b
            .ctx
            .all_items()
            .filter(|item| item.kind() == ItemKind::Type)
            .count();
        assert_eq!(type_items, 1);
    }

    #[test]
    fn test_rejected_pointers() {
        let mut b = builder();
        let cases = [
            (NativeKind::Void, "void"),
            (NativeKind::FunctionProto, "void (int)"),
            (NativeKind::Pointer, "char *"),
            (NativeKind::Int, "int"),
        ];
        for (kind, pointee) in cases {
            let desc = TypeDesc::pointer(
                format!("{} *", pointee),
                PointeeDesc {
                    spelling: pointee.into(),
                    kind,
                    is_const: false,
                },
            );
            assert!(b.convert(&desc).unwrap().is_err(), "{}", pointee);
        }
        assert_eq!(b.ctx.type_count(), 0);
    }

    #[test]
    fn test_scalar_typedef_becomes_alias() {
        let mut b = builder();
        b.register_typedefs(&[TypedefDecl {
            name: "my_int".into(),
            underlying: "int".into(),
            underlying_kind: NativeKind::Int,
            is_struct: false,
        }]);
        let id = b
            .convert(&TypeDesc::new(NativeKind::Int, "my_int"))
            .unwrap()
            .unwrap();
        let canonical = b.ctx.resolve_canonical_type(id).unwrap();
        assert_ne!(id, canonical);
        assert_eq!(b.ctx.get_type(canonical).unwrap().c_spelling, "int");
        assert_eq!(b.convert(&int()).unwrap().unwrap(), canonical);
    }

    #[test]
    fn test_typedef_cycle_rejected() {
        let mut b = builder();
        b.register_typedefs(&[
            TypedefDecl {
                name: "a_t".into(),
                underlying: "b_t".into(),
                underlying_kind: NativeKind::Int,
                is_struct: false,
            },
            TypedefDecl {
                name: "b_t".into(),
                underlying: "a_t".into(),
                underlying_kind: NativeKind::Int,
                is_struct: false,
            },
        ]);
        assert!(matches!(
            b.convert(&TypeDesc::new(NativeKind::Int, "a_t")).unwrap(),
            Err(Rejection::AliasCycle { .. })
        ));
    }

    #[test]
    fn test_function_dropped_whole() {
        let callback = TypeDesc::pointer(
            "void (*)(int)",
            PointeeDesc {
                spelling: "void (int)".into(),
                kind: NativeKind::FunctionProto,
                is_const: false,
            },
        );
        let decls = HeaderDecls {
            functions: vec![
                func("add", int(), vec![int(), int()]),
                func("mixed", int(), vec![int(), callback]),
            ],
            typedefs: vec![],
        };
        let built = builder().build(&decls).unwrap();
        assert_eq!(built.ctx.function_count(), 1);
        assert_eq!(built.total_functions, 2);
        assert_eq!(built.skipped.len(), 1);
        assert_eq!(built.skipped[0].name, "mixed");
        assert_eq!(built.skipped[0].at, RejectedAt::Param("p1".into()));
    }

    #[test]
    fn test_unnamed_params_get_placeholders() {
        let mut decl = func("add", int(), vec![int(), int()]);
        decl.params[0].name = None;
        decl.params[1].name = Some(String::new());
        let built = builder()
            .build(&HeaderDecls {
                functions: vec![decl],
                typedefs: vec![],
            })
            .unwrap();
        let f = built.ctx.all_functions().next().unwrap();
        let names: Vec<_> = f.params.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["arg0", "arg1"]);
        assert_eq!(f.source_location.as_deref(), Some("test.h"));
    }

    #[test]
    fn test_placeholder_skips_explicit_names() {
        let mut decl = func("f", int(), vec![int(), int(), int()]);
        decl.params[0].name = None;
        decl.params[1].name = Some("arg0".into());
        decl.params[2].name = Some("arg0_".into());
        let built = builder()
            .build(&HeaderDecls {
                functions: vec![decl],
                typedefs: vec![],
            })
            .unwrap();
        let f = built.ctx.all_functions().next().unwrap();
        let names: Vec<_> = f.params.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["arg0__", "arg0", "arg0_"]);
    }
}
