use criterion::{black_box, criterion_group, criterion_main, Criterion};
use lean_bindgen::input::{FunctionDecl, NativeKind, ParamDecl, PointeeDesc, TypeDesc, TypedefDecl};
use lean_bindgen::{Bindgen, BindgenConfig, HeaderDecls};

/// A header with `n` handle functions over one opaque struct
fn synthetic_header(n: usize) -> HeaderDecls {
    let handle = TypeDesc::pointer(
        "db_conn *",
        PointeeDesc {
            spelling: "db_conn".into(),
            kind: NativeKind::Record,
            is_const: false,
        },
    );
    let string = TypeDesc::pointer(
        "const char *",
        PointeeDesc {
            spelling: "const char".into(),
            kind: NativeKind::CharS,
            is_const: true,
        },
    );
    let functions = (0..n)
        .map(|i| FunctionDecl {
            name: format!("db_op_{}", i),
            return_type: TypeDesc::new(NativeKind::Int, "int"),
            params: vec![
                ParamDecl {
                    name: Some("conn".into()),
                    ty: handle.clone(),
                },
                ParamDecl {
                    name: Some("arg".into()),
                    ty: string.clone(),
                },
            ],
            source_location: None,
            comment: None,
        })
        .collect();
    HeaderDecls {
        functions,
        typedefs: vec![TypedefDecl {
            name: "db_conn".into(),
            underlying: "struct db_conn".into(),
            underlying_kind: NativeKind::Record,
            is_struct: true,
        }],
    }
}

fn pipeline_benchmark(c: &mut Criterion) {
    let bindgen = Bindgen::new(BindgenConfig::new("Bench", "bench", "bench.h").unwrap()).unwrap();
    let small = synthetic_header(10);
    let large = synthetic_header(1000);

    c.bench_function("bindgen 10 functions", |b| {
        b.iter(|| bindgen.run(black_box(&small)).unwrap())
    });

    c.bench_function("bindgen 1000 functions", |b| {
        b.iter(|| bindgen.run(black_box(&large)).unwrap())
    });
}

criterion_group!(benches, pipeline_benchmark);
criterion_main!(benches);
