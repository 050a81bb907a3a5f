use super::node::{next_of, node_at, prev_of, Position, Slot, BEFORE_FIRST, PAST_LAST};

/// A read-only cursor that walks the full node chain of a list, sentinels included.
///
/// Moving forward from the past-last sentinel or backward from the
/// before-first sentinel leaves the cursor where it is.
pub struct Cursor<'a, T> {
    pub(super) slots: &'a [Slot<T>],
    pub(super) owner: u64,
    pub(super) index: usize,
}

impl<'a, T> Cursor<'a, T> {
    /// The position the cursor stands on.
    pub fn position(&self) -> Position {
        Position {
            owner: self.owner,
            slot: self.index,
            generation: self.slots[self.index].generation,
        }
    }

    /// The element under the cursor, or `None` on a sentinel.
    pub fn current(&self) -> Option<&'a T> {
        if self.is_sentinel() {
            return None;
        }
        // SAFETY: non-sentinel linked nodes hold an initialized value.
        unsafe { Some((*node_at(self.slots, self.index).as_ptr()).value.assume_init_ref()) }
    }

    /// Returns `true` on either sentinel.
    pub fn is_sentinel(&self) -> bool {
        self.index == BEFORE_FIRST || self.index == PAST_LAST
    }

    /// Returns `true` on the past-last sentinel.
    pub fn is_end(&self) -> bool {
        self.index == PAST_LAST
    }

    /// Follows the `next` link.
    pub fn move_next(&mut self) {
        if self.index != PAST_LAST {
            self.index = next_of(self.slots, self.index);
        }
    }

    /// Follows the `prev` link.
    pub fn move_prev(&mut self) {
        if self.index != BEFORE_FIRST {
            self.index = prev_of(self.slots, self.index);
        }
    }

    /// The element after the cursor, without moving.
    pub fn peek_next(&self) -> Option<&'a T> {
        let mut probe = Cursor {
            slots: self.slots,
            owner: self.owner,
            index: self.index,
        };
        probe.move_next();
        probe.current()
    }
}
