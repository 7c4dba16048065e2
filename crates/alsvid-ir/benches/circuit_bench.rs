//! Benchmarks for Alsvid circuit operations
//!
//! Run with: cargo bench -p alsvid-ir

use alsvid_ir::{Circuit, GateArity, RegBit};
use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

fn basis_circuit(num_qubits: u32) -> Circuit {
    let mut circuit = Circuit::new();
    circuit.add_qreg("q", num_qubits).unwrap();
    circuit.add_creg("c", num_qubits).unwrap();
    circuit
        .add_basis_element("U", GateArity::Fixed(1), 0, 3)
        .unwrap();
    circuit
        .add_basis_element("CX", GateArity::Fixed(2), 0, 0)
        .unwrap();
    circuit
        .add_basis_element("measure", GateArity::Fixed(1), 1, 0)
        .unwrap();
    circuit
}

/// Benchmark register declaration.
fn bench_register_creation(c: &mut Criterion) {
    let mut group = c.benchmark_group("register_creation");

    for num_qubits in &[2u32, 10, 50, 200] {
        group.bench_with_input(
            BenchmarkId::new("add_qreg", num_qubits),
            num_qubits,
            |b, &n| {
                b.iter(|| {
                    let mut circuit = Circuit::new();
                    circuit.add_qreg(black_box("q"), black_box(n)).unwrap();
                });
            },
        );
    }

    group.finish();
}

/// Benchmark appending operations.
fn bench_apply_operation(c: &mut Criterion) {
    let mut group = c.benchmark_group("apply_operation");

    group.bench_function("u_gate", |b| {
        let mut circuit = basis_circuit(10);
        b.iter(|| {
            circuit
                .apply_operation_back(
                    black_box("U"),
                    vec![RegBit::new("q", 0)],
                    vec![],
                    vec!["0.5".into(), "0.0".into(), "0.0".into()],
                    None,
                )
                .unwrap();
        });
    });

    group.bench_function("cx_gate", |b| {
        let mut circuit = basis_circuit(10);
        b.iter(|| {
            circuit
                .apply_operation_back(
                    black_box("CX"),
                    vec![RegBit::new("q", 0), RegBit::new("q", 1)],
                    vec![],
                    vec![],
                    None,
                )
                .unwrap();
        });
    });

    group.finish();
}

/// Benchmark composition of a prepared circuit.
fn bench_compose(c: &mut Criterion) {
    let mut group = c.benchmark_group("compose");

    let mut other = basis_circuit(8);
    for i in 0..7u32 {
        other
            .apply_operation_back(
                "CX",
                vec![RegBit::new("q", i), RegBit::new("q", i + 1)],
                vec![],
                vec![],
                None,
            )
            .unwrap();
    }

    group.bench_function("identity_map_8q", |b| {
        b.iter(|| {
            let mut target = basis_circuit(8);
            target.compose(black_box(&other), &[]).unwrap();
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_register_creation,
    bench_apply_operation,
    bench_compose
);
criterion_main!(benches);
