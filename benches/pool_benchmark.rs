use chunkpool::alloc::{ElementAlloc, SizeClassPool, TypedAllocator};
use chunkpool::PoolRegistry;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn bench_pool_alloc_free(c: &mut Criterion) {
    let mut group = c.benchmark_group("pool_alloc_free");

    group.bench_function("size_class_pool_alloc_free", |b| {
        b.iter(|| {
            let mut pool = SizeClassPool::new(8).unwrap();
            let mut chunks = Vec::with_capacity(1000);
            for _ in 0..1000 {
                chunks.push(pool.acquire().unwrap());
            }
            for ptr in chunks {
                unsafe { pool.release(ptr) };
            }
        });
    });

    group.bench_function("typed_allocator_alloc_free", |b| {
        let registry = PoolRegistry::new();
        let alloc = TypedAllocator::<u64>::new(&registry);
        b.iter(|| {
            let mut ptrs = Vec::with_capacity(1000);
            for _ in 0..1000 {
                ptrs.push(alloc.allocate(1).unwrap());
            }
            for ptr in ptrs {
                unsafe { alloc.deallocate(ptr, 1) };
            }
        });
    });

    group.bench_function("std_box_alloc_free", |b| {
        b.iter(|| {
            let mut boxes = Vec::with_capacity(1000);
            for i in 0..1000u64 {
                boxes.push(Box::new(i));
            }
            black_box(boxes);
        });
    });

    group.finish();
}

fn bench_pool_reuse(c: &mut Criterion) {
    let mut group = c.benchmark_group("pool_reuse");

    group.bench_function("size_class_pool_reuse", |b| {
        let mut pool = SizeClassPool::new(8).unwrap();
        b.iter(|| {
            // Repeated acquire/release keeps hitting the same chunk
            for _ in 0..1000 {
                let ptr = pool.acquire().unwrap();
                unsafe { pool.release(black_box(ptr)) };
            }
        });
    });

    group.bench_function("std_box_reuse", |b| {
        b.iter(|| {
            for i in 0..1000u64 {
                let b = Box::new(i);
                black_box(b);
            }
        });
    });

    group.finish();
}

criterion_group!(benches, bench_pool_alloc_free, bench_pool_reuse);
criterion_main!(benches);
