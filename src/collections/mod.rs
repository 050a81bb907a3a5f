//! Collections that draw their storage from an [`ElementAlloc`](crate::alloc::ElementAlloc).
//!
//! - `doubly_linked_list`: sentinel-bounded list with stable, checked positions

pub mod doubly_linked_list;

pub use doubly_linked_list::{Cursor, DoublyLinkedList, IntoIter, Iter, IterMut, ListError, Node, Position};
