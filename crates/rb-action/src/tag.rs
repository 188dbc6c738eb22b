//! Action tag allocation.
//!
//! Every live action holds a [`TagLease`].  While the lease exists its tag is
//! reserved; dropping the lease (which happens when the owning
//! [`ActionRunner`][crate::ActionRunner] is dropped) returns the tag to the
//! pool.  The allocator is an explicit object owned by the robot's
//! [`ActionList`][crate::ActionList]; cloning it yields another handle to the
//! same pool.

use std::cell::RefCell;
use std::rc::Rc;

use rb_core::ActionTag;
use rustc_hash::FxHashSet;

use crate::ActionError;

/// First tag handed out automatically.  Zero stays free for callers that
/// treat it as "unset".
pub const FIRST_AUTO_TAG: u32 = 1;

#[derive(Debug)]
struct TagPool {
    next:   u32,
    in_use: FxHashSet<u32>,
}

impl Default for TagPool {
    fn default() -> Self {
        TagPool { next: FIRST_AUTO_TAG, in_use: FxHashSet::default() }
    }
}

/// Shared handle to the pool of in-use action tags.
#[derive(Clone, Debug, Default)]
pub struct TagAllocator {
    pool: Rc<RefCell<TagPool>>,
}

impl TagAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve the next free tag, skipping any still held by live actions.
    pub fn allocate(&self) -> TagLease {
        let mut pool = self.pool.borrow_mut();
        loop {
            let candidate = pool.next;
            pool.next = if candidate >= ActionTag::INVALID.0 - 1 {
                FIRST_AUTO_TAG
            } else {
                candidate + 1
            };
            if pool.in_use.insert(candidate) {
                return TagLease { tag: ActionTag(candidate), pool: Rc::clone(&self.pool) };
            }
        }
    }

    /// Reserve a caller-chosen tag.
    pub fn reserve(&self, tag: ActionTag) -> Result<TagLease, ActionError> {
        if !tag.is_valid() {
            return Err(ActionError::ReservedTag(tag));
        }
        let mut pool = self.pool.borrow_mut();
        if !pool.in_use.insert(tag.0) {
            return Err(ActionError::TagInUse(tag));
        }
        Ok(TagLease { tag, pool: Rc::clone(&self.pool) })
    }

    pub fn is_in_use(&self, tag: ActionTag) -> bool {
        self.pool.borrow().in_use.contains(&tag.0)
    }

    pub fn num_in_use(&self) -> usize {
        self.pool.borrow().in_use.len()
    }
}

/// Ownership of one reserved tag.  Releases it on drop.
#[derive(Debug)]
pub struct TagLease {
    tag:  ActionTag,
    pool: Rc<RefCell<TagPool>>,
}

impl TagLease {
    #[inline]
    pub fn tag(&self) -> ActionTag {
        self.tag
    }
}

impl Drop for TagLease {
    fn drop(&mut self) {
        if let Ok(mut pool) = self.pool.try_borrow_mut() {
            pool.in_use.remove(&self.tag.0);
        }
    }
}
