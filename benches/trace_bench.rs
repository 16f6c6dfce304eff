/// Benchmarks for the GraphMe tracing hot path.
///
/// Run with: `cargo bench`
///
/// Covers the per-event cost (resolve + record) and whole-session tracing of
/// the recursive fibonacci workload at several sizes.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use graphme::application::{HookSlot, TraceSession};
use graphme::domain::event::{CallRecord, FrameId, LocalValue, TraceEvent};
use graphme::infrastructure::SimulatedRuntime;

fn fibo(rt: &mut SimulatedRuntime, n: i64) -> i64 {
    rt.call("fibo", vec![("n".to_string(), LocalValue::Int(n))], |rt| {
        if n <= 1 {
            n
        } else {
            fibo(rt, n - 1) + fibo(rt, n - 2)
        }
    })
}

fn bench_event_dispatch(c: &mut Criterion) {
    let mut group = c.benchmark_group("event_dispatch");

    for num_events in [100u64, 1_000, 10_000] {
        group.throughput(Throughput::Elements(num_events));
        group.bench_with_input(
            BenchmarkId::from_parameter(num_events),
            &num_events,
            |b, &num_events| {
                b.iter(|| {
                    let slot = HookSlot::new();
                    let session = TraceSession::activate(&slot).unwrap();
                    // Flat chain of calls, each the child of the previous.
                    for i in 1..=num_events {
                        let parent = (i > 1).then(|| FrameId(i - 1));
                        slot.dispatch(&TraceEvent::Call(
                            CallRecord::new(FrameId(i), parent, "step")
                                .with_locals(vec![("i".to_string(), LocalValue::Int(i as i64))]),
                        ));
                    }
                    black_box(session.finish())
                })
            },
        );
    }

    group.finish();
}

fn bench_trace_fibo(c: &mut Criterion) {
    let mut group = c.benchmark_group("trace_fibo");

    for n in [10i64, 15, 20] {
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            b.iter(|| {
                let slot = HookSlot::new();
                let session = TraceSession::activate(&slot).unwrap();
                let mut rt = SimulatedRuntime::new(&slot);
                black_box(fibo(&mut rt, n));
                black_box(session.finish())
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_event_dispatch, bench_trace_fibo);
criterion_main!(benches);
