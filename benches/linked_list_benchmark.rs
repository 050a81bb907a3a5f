use chunkpool::{DoublyLinkedList, PoolRegistry, TypedAllocator};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::collections::LinkedList;

fn bench_linked_list_iter(c: &mut Criterion) {
    let mut group = c.benchmark_group("linked_list_iter");

    group.bench_function("std_linked_list_iter", |b| {
        let list: LinkedList<i32> = (0..1000).collect();
        b.iter(|| {
            let mut sum = 0;
            for x in &list {
                sum += *x;
            }
            black_box(sum);
        });
    });

    group.bench_function("pooled_linked_list_iter", |b| {
        let registry = PoolRegistry::new();
        let mut list = DoublyLinkedList::new_in(TypedAllocator::new(&registry));
        list.extend(0..1000);
        b.iter(|| {
            let mut sum = 0;
            for x in &list {
                sum += *x;
            }
            black_box(sum);
        });
    });

    group.finish();
}

fn bench_linked_list_push_pop(c: &mut Criterion) {
    let mut group = c.benchmark_group("linked_list_push_pop");

    group.bench_function("std_linked_list_push_pop", |b| {
        b.iter(|| {
            let mut list = LinkedList::new();
            for i in 0..1000 {
                list.push_back(i);
            }
            while list.pop_front().is_some() {}
        });
    });

    group.bench_function("heap_linked_list_push_pop", |b| {
        b.iter(|| {
            let mut list = DoublyLinkedList::new();
            for i in 0..1000 {
                list.push_back(i);
            }
            while list.pop_front().is_some() {}
        });
    });

    group.bench_function("pooled_linked_list_push_pop", |b| {
        // The registry outlives the loop so arenas are warm after the first pass.
        let registry = PoolRegistry::new();
        b.iter(|| {
            let mut list = DoublyLinkedList::new_in(TypedAllocator::new(&registry));
            for i in 0..1000 {
                list.push_back(i);
            }
            while list.pop_front().is_some() {}
        });
    });

    group.finish();
}

fn bench_linked_list_erase_middle(c: &mut Criterion) {
    let mut group = c.benchmark_group("linked_list_erase_middle");

    group.bench_function("pooled_erase_every_other", |b| {
        let registry = PoolRegistry::new();
        b.iter(|| {
            let mut list = DoublyLinkedList::new_in(TypedAllocator::new(&registry));
            list.extend(0..1000u32);
            let mut pos = list.begin();
            while pos != list.end() {
                let Ok(next) = list.erase(pos) else { break };
                pos = match list.next_position(next) {
                    Ok(p) => p,
                    Err(_) => break,
                };
            }
            black_box(list.len());
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_linked_list_iter,
    bench_linked_list_push_pop,
    bench_linked_list_erase_middle
);
criterion_main!(benches);
