use criterion::{black_box, criterion_group, criterion_main, Criterion};
use vanta_native::{NativeList, NativeQueue, NativeStack, NativeString};

fn bench_list(c: &mut Criterion) {
    let mut group = c.benchmark_group("NativeList");

    group.bench_function("push 10k (cold)", |b| {
        b.iter(|| {
            let mut list = NativeList::new();
            for i in 0..10_000u32 {
                list.push(i);
            }
            black_box(list.len());
        });
    });

    group.bench_function("push 10k (reserved)", |b| {
        b.iter(|| {
            let mut list = NativeList::with_capacity(10_000);
            for i in 0..10_000u32 {
                list.push(i);
            }
            black_box(list.len());
        });
    });

    group.bench_function("insert front 1k", |b| {
        b.iter(|| {
            let mut list = NativeList::with_capacity(1_000);
            for i in 0..1_000u32 {
                list.insert(0, i);
            }
            black_box(list[0]);
        });
    });

    group.bench_function("index_of worst case", |b| {
        let mut list = NativeList::with_capacity(10_000);
        for i in 0..10_000u32 {
            list.push(i);
        }
        b.iter(|| black_box(list.index_of(&9_999)));
    });

    group.finish();
}

fn bench_queue_and_stack(c: &mut Criterion) {
    let mut group = c.benchmark_group("NativeQueue / NativeStack");

    // Drains fully each round, so the window rewinds instead of growing
    // without bound.
    group.bench_function("queue churn 1k", |b| {
        let mut queue = NativeQueue::with_capacity(1_000);
        b.iter(|| {
            for i in 0..1_000u32 {
                queue.enqueue(i);
            }
            while let Some(value) = queue.try_dequeue() {
                black_box(value);
            }
        });
    });

    group.bench_function("stack churn 1k", |b| {
        let mut stack = NativeStack::with_capacity(1_000);
        b.iter(|| {
            for i in 0..1_000u32 {
                stack.push(i);
            }
            while let Some(value) = stack.try_pop() {
                black_box(value);
            }
        });
    });

    group.finish();
}

fn bench_string(c: &mut Criterion) {
    let mut group = c.benchmark_group("NativeString");

    group.bench_function("append 4k bytes", |b| {
        b.iter(|| {
            let mut s = NativeString::new();
            for _ in 0..256 {
                s.push_str("0123456789abcdef");
            }
            black_box(s.len());
        });
    });

    group.bench_function("replace scattered", |b| {
        let source = "the cat sat on the mat and the rat spat".repeat(64);
        b.iter(|| {
            let mut s = NativeString::from(source.as_str());
            s.replace(b"at", b"ATAT");
            black_box(s.len());
        });
    });

    group.bench_function("find_last", |b| {
        let source = "abcdefgh".repeat(512) + "needle";
        let s = NativeString::from(source.as_str());
        b.iter(|| black_box(s.find_last(b"needle")));
    });

    group.finish();
}

criterion_group!(benches, bench_list, bench_queue_and_stack, bench_string);
criterion_main!(benches);
