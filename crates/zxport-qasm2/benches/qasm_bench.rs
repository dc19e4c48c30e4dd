//! Benchmarks for QASM2 import and export
//!
//! Run with: cargo bench -p zxport-qasm2

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use std::fmt::Write as _;
use zxport_ir::{Circuit, VariableBindings};
use zxport_qasm2::{decompose_remove_y, export_to_text, import_from_text, parse};

/// A layered circuit with rotations, entanglers and a final measurement.
fn layered_source(num_qubits: u32, layers: u32) -> String {
    let mut source = format!(
        "OPENQASM 2.0;\ninclude \"qelib1.inc\";\nqreg q[{num_qubits}];\ncreg c[{num_qubits}];\n"
    );
    for layer in 0..layers {
        for q in 0..num_qubits {
            let _ = writeln!(source, "ry({layer} * pi / 7) q[{q}];");
        }
        for q in 0..num_qubits - 1 {
            let _ = writeln!(source, "cx q[{q}], q[{}];", q + 1);
        }
    }
    source.push_str("measure q -> c;\n");
    source
}

/// The same circuit written through a gate macro and register broadcast.
fn macro_source(num_qubits: u32, layers: u32) -> String {
    let mut source = format!(
        "OPENQASM 2.0;\ngate layer(t) a, b {{ ry(t) a; ry(t) b; cx a, b; }}\nqreg q[{num_qubits}];\nqreg r[{num_qubits}];\n"
    );
    for layer in 0..layers {
        let _ = writeln!(source, "layer({layer} * pi / 7) q, r;");
    }
    source
}

fn bench_import(c: &mut Criterion) {
    let mut group = c.benchmark_group("import");

    for num_qubits in [5, 20, 50] {
        let source = layered_source(num_qubits, 20);
        group.throughput(Throughput::Bytes(source.len() as u64));
        group.bench_with_input(BenchmarkId::new("layered", num_qubits), &source, |b, s| {
            b.iter(|| parse(black_box(s)).unwrap());
        });
    }

    for num_qubits in [5, 20, 50] {
        let source = macro_source(num_qubits, 20);
        group.throughput(Throughput::Bytes(source.len() as u64));
        group.bench_with_input(BenchmarkId::new("macro", num_qubits), &source, |b, s| {
            b.iter(|| import_from_text(black_box(s), true).unwrap());
        });
    }

    group.finish();
}

fn bench_export(c: &mut Criterion) {
    let mut group = c.benchmark_group("export");
    let bindings = VariableBindings::new();

    for num_qubits in [5, 20, 50] {
        let circuit = parse(&layered_source(num_qubits, 20)).unwrap();
        group.throughput(Throughput::Elements(circuit.num_ops() as u64));
        group.bench_with_input(BenchmarkId::new("plain", num_qubits), &circuit, |b, circ| {
            b.iter(|| export_to_text(black_box(circ), &bindings, false).unwrap());
        });
        group.bench_with_input(BenchmarkId::new("no_y", num_qubits), &circuit, |b, circ| {
            b.iter(|| export_to_text(black_box(circ), &bindings, true).unwrap());
        });
    }

    group.finish();
}

fn bench_decompose(c: &mut Criterion) {
    let circuit: Circuit = parse(&layered_source(50, 50)).unwrap();
    c.bench_function("decompose_remove_y", |b| {
        b.iter(|| decompose_remove_y(black_box(&circuit)));
    });
}

criterion_group!(benches, bench_import, bench_export, bench_decompose);
criterion_main!(benches);
