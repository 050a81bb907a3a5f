use chunkpool::alloc::{ElementAlloc, PoolConfig, PoolRegistry, TypedAllocator};
use chunkpool::collections::{DoublyLinkedList, Position};
use proptest::prelude::*;
use std::collections::VecDeque;

#[derive(Debug, Clone)]
enum Operation {
    PushFront(i32),
    PushBack(i32),
    PopFront,
    PopBack,
    InsertAt(usize, i32),
    EraseAt(usize),
    Clear,
}

fn operation() -> impl Strategy<Value = Operation> {
    prop_oneof![
        any::<i32>().prop_map(Operation::PushFront),
        any::<i32>().prop_map(Operation::PushBack),
        Just(Operation::PopFront),
        Just(Operation::PopBack),
        (any::<usize>(), any::<i32>()).prop_map(|(i, v)| Operation::InsertAt(i, v)),
        any::<usize>().prop_map(Operation::EraseAt),
        Just(Operation::Clear),
    ]
}

/// Position of the `index`-th node after the before-first sentinel.
fn nth_position<A: ElementAlloc<Value = i32>>(list: &DoublyLinkedList<i32, A>, index: usize) -> Position {
    let mut pos = list.begin();
    for _ in 0..index {
        pos = list.next_position(pos).unwrap();
    }
    pos
}

fn run<A: ElementAlloc<Value = i32>>(mut list: DoublyLinkedList<i32, A>, ops: Vec<Operation>) {
    let mut model = VecDeque::new();

    for op in ops {
        match op {
            Operation::PushFront(v) => {
                list.push_front(v);
                model.push_front(v);
            }
            Operation::PushBack(v) => {
                list.push_back(v);
                model.push_back(v);
            }
            Operation::PopFront => assert_eq!(list.pop_front(), model.pop_front()),
            Operation::PopBack => assert_eq!(list.pop_back(), model.pop_back()),
            Operation::InsertAt(i, v) => {
                let index = i % (model.len() + 1);
                let pos = list.insert(nth_position(&list, index), v).unwrap();
                model.insert(index, v);
                assert_eq!(list.get(pos), Ok(&v));
            }
            Operation::EraseAt(i) => {
                if model.is_empty() {
                    assert!(list.erase(list.begin()).is_err());
                    continue;
                }
                let index = i % model.len();
                let next = list.erase(nth_position(&list, index)).unwrap();
                model.remove(index);
                assert_eq!(list.get(next).ok(), model.get(index));
            }
            Operation::Clear => {
                list.clear();
                model.clear();
            }
        }

        assert_eq!(list.len(), model.len());
        assert_eq!(list.front(), model.front());
        assert_eq!(list.back(), model.back());
    }

    assert!(list.iter().eq(model.iter()), "forward mismatch");
    assert!(list.iter().rev().eq(model.iter().rev()), "reverse mismatch");
    assert_eq!(list.into_iter().collect::<Vec<_>>(), Vec::from(model));
}

proptest! {
    #[test]
    fn test_heap_list_matches_vec_deque(ops in proptest::collection::vec(operation(), 1..200)) {
        run(DoublyLinkedList::new(), ops);
    }

    #[test]
    fn test_pooled_list_matches_vec_deque(ops in proptest::collection::vec(operation(), 1..200)) {
        // A tiny first arena forces several growth steps.
        let config = PoolConfig::default().with_initial_capacity(2);
        let registry = PoolRegistry::with_config(config).unwrap();
        run(DoublyLinkedList::new_in(TypedAllocator::new(&registry)), ops);
    }
}
