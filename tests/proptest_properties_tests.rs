//! Property-based tests for lean-bindgen
//!
//! These tests use proptest to generate random declaration lists and verify that:
//! 1. Integer mapping depends on width only, never on signedness
//! 2. Opaque type naming is pure and well-formed
//! 3. A function with any unsupported type is dropped whole
//! 4. Generation is deterministic and both artifacts agree on symbols

use lean_bindgen::input::{FunctionDecl, NativeKind, ParamDecl, PointeeDesc, TypeDesc};
use lean_bindgen::ir::{IntKind, TypeKind};
use lean_bindgen::lean::naming::opaque_type_name;
use lean_bindgen::{Bindgen, BindgenConfig, Error, HeaderDecls, IRContext, TypeMapper};
use proptest::prelude::*;

// =============================================================================
// STRATEGY GENERATORS
// =============================================================================

fn int_kind() -> impl Strategy<Value = IntKind> {
    prop_oneof![
        Just(IntKind::Char),
        Just(IntKind::SChar),
        Just(IntKind::UChar),
        Just(IntKind::Short),
        Just(IntKind::UShort),
        Just(IntKind::Int),
        Just(IntKind::UInt),
        Just(IntKind::Long),
        Just(IntKind::ULong),
        Just(IntKind::LongLong),
        Just(IntKind::ULongLong),
    ]
}

/// Types the pipeline accepts
fn supported_type() -> impl Strategy<Value = TypeDesc> {
    prop_oneof![
        Just(TypeDesc::new(NativeKind::Int, "int")),
        Just(TypeDesc::new(NativeKind::UShort, "unsigned short")),
        Just(TypeDesc::new(NativeKind::LongLong, "long long")),
        Just(TypeDesc::new(NativeKind::Double, "double")),
        Just(TypeDesc::new(NativeKind::Float, "float")),
        Just(TypeDesc::pointer(
            "const char *",
            PointeeDesc {
                spelling: "const char".into(),
                kind: NativeKind::CharS,
                is_const: true,
            },
        )),
    ]
}

/// Types the pipeline always refuses
fn unsupported_type() -> impl Strategy<Value = TypeDesc> {
    prop_oneof![
        Just(TypeDesc::pointer(
            "void *",
            PointeeDesc {
                spelling: "void".into(),
                kind: NativeKind::Void,
                is_const: false,
            },
        )),
        Just(TypeDesc::pointer(
            "char *",
            PointeeDesc {
                spelling: "char".into(),
                kind: NativeKind::CharS,
                is_const: false,
            },
        )),
        Just(TypeDesc::pointer(
            "void (*)(int)",
            PointeeDesc {
                spelling: "void (int)".into(),
                kind: NativeKind::FunctionProto,
                is_const: false,
            },
        )),
        Just(TypeDesc::new(NativeKind::Other("ENUM".into()), "enum color")),
    ]
}

fn function(name: String, ret: TypeDesc, params: Vec<TypeDesc>) -> FunctionDecl {
    FunctionDecl {
        name,
        return_type: ret,
        params: params
            .into_iter()
            .enumerate()
            .map(|(i, ty)| ParamDecl {
                name: Some(format!("p{}", i)),
                ty,
            })
            .collect(),
        source_location: None,
        comment: None,
    }
}

/// A header of 1..8 functions with distinct names, some of them unsupported
fn header() -> impl Strategy<Value = HeaderDecls> {
    prop::collection::vec(
        (
            supported_type(),
            prop::collection::vec(supported_type(), 0..4),
            prop::option::weighted(0.3, unsupported_type()),
        ),
        1..8,
    )
    .prop_map(|shapes| {
        let functions = shapes
            .into_iter()
            .enumerate()
            .map(|(i, (ret, mut params, bad))| {
                if let Some(bad) = bad {
                    params.push(bad);
                }
                function(format!("fn_{}", i), ret, params)
            })
            .collect();
        HeaderDecls {
            functions,
            typedefs: vec![],
        }
    })
}

fn is_supported(ty: &TypeDesc) -> bool {
    match ty.kind {
        NativeKind::Int
        | NativeKind::UShort
        | NativeKind::LongLong
        | NativeKind::Double
        | NativeKind::Float => true,
        NativeKind::Pointer => ty.spelling == "const char *",
        _ => false,
    }
}

fn bindgen() -> Bindgen {
    Bindgen::new(BindgenConfig::new("Prop", "prop", "prop.h").unwrap()).unwrap()
}

// =============================================================================
// PROPERTIES
// =============================================================================

proptest! {
    #[test]
    fn int_mapping_ignores_signedness(a in int_kind(), b in int_kind()) {
        let mut ctx = IRContext::new(BindgenConfig::new("Prop", "prop", "prop.h").unwrap());
        let ta = ctx
            .add_type(TypeKind::Int { kind: a, is_signed: a.is_signed() }, a.to_string(), None, None)
            .unwrap();
        let tb = ctx
            .add_type(TypeKind::Int { kind: b, is_signed: b.is_signed() }, b.to_string(), None, None)
            .unwrap();
        let mut mapper = TypeMapper::new(&ctx);
        let ma = mapper.map_type(ta).unwrap().unwrap();
        let mb = mapper.map_type(tb).unwrap().unwrap();
        prop_assert_eq!(a.width() == b.width(), ma.lean_type == mb.lean_type);
    }

    #[test]
    fn resolve_canonical_is_idempotent(depth in 0usize..6) {
        let mut ctx = IRContext::new(BindgenConfig::new("Prop", "prop", "prop.h").unwrap());
        let mut current = ctx
            .add_type(TypeKind::Int { kind: IntKind::Int, is_signed: true }, "int", None, None)
            .unwrap();
        let base = current;
        for level in 0..depth {
            let name = format!("alias_{}", level);
            current = ctx
                .add_type(TypeKind::Alias { name: name.clone(), target: current }, name, Some(current), None)
                .unwrap();
        }
        let once = ctx.resolve_canonical_type(current).unwrap();
        prop_assert_eq!(once, base);
        prop_assert_eq!(ctx.resolve_canonical_type(once).unwrap(), once);
    }

    #[test]
    fn opaque_names_are_well_formed(name in "(struct )?[a-z][a-z0-9_]{0,15}") {
        let lean = opaque_type_name(&name);
        prop_assert_eq!(&lean, &opaque_type_name(&name));
        prop_assert!(lean.ends_with("Ref"));
        prop_assert!(!lean.contains('_'));
        prop_assert!(!lean.contains(' '));
        prop_assert!(lean.starts_with(|c: char| c.is_ascii_uppercase()));
    }

    #[test]
    fn unsupported_functions_are_dropped_whole(decls in header()) {
        let bad: Vec<String> = decls
            .functions
            .iter()
            .filter(|f| f.params.iter().any(|p| !is_supported(&p.ty)))
            .map(|f| f.name.clone())
            .collect();

        match bindgen().run(&decls) {
            Ok(output) => {
                prop_assert_eq!(output.report.generated + output.report.skipped.len(), decls.functions.len());
                for name in &bad {
                    let symbol = format!("lean_prop_{}\"", name);
                    let adapter = format!("lean_prop_{}(", name);
                    prop_assert!(!output.artifacts.lean.contains(&symbol));
                    prop_assert!(!output.artifacts.c_glue.contains(&adapter));
                    prop_assert!(output.report.skipped.iter().any(|s| &s.name == name));
                }
            }
            Err(Error::NothingToGenerate { total }) => {
                prop_assert_eq!(total, decls.functions.len());
                prop_assert_eq!(bad.len(), decls.functions.len());
            }
            Err(other) => prop_assert!(false, "unexpected error: {}", other),
        }
    }

    #[test]
    fn generation_is_deterministic_and_consistent(decls in header()) {
        let first = bindgen().run(&decls);
        let second = bindgen().run(&decls);
        if let (Ok(first), Ok(second)) = (first, second) {
            prop_assert_eq!(&first.artifacts, &second.artifacts);
            let lean_count = first.artifacts.lean.matches("@[extern \"").count();
            let c_count = first.artifacts.c_glue.matches("LEAN_EXPORT ").count();
            prop_assert_eq!(lean_count, first.bindings.len());
            prop_assert_eq!(c_count, first.bindings.len());
            for binding in &first.bindings {
                let lean_attr = format!("@[extern \"{}\"]", binding.symbol);
                let c_def = format!(" {}(", binding.symbol);
                prop_assert!(first.artifacts.lean.contains(&lean_attr));
                prop_assert!(first.artifacts.c_glue.contains(&c_def));
            }
        }
    }
}
