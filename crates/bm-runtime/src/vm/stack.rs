//! Bounded value stack

use crate::value::{Fault, Word};

/// Default maximum stack depth
pub const STACK_CAPACITY: usize = bm_config::DEFAULT_STACK_CAPACITY;

/// Value stack with a fixed capacity
///
/// Every operation that would break `len() <= capacity()` or read past the
/// bottom returns a [`Fault`] and leaves the stack unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stack {
    items: Vec<Word>,
    capacity: usize,
}

impl Stack {
    pub fn new() -> Self {
        Self::with_capacity(STACK_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity.min(STACK_CAPACITY)),
            capacity,
        }
    }

    #[inline(always)]
    pub fn push(&mut self, value: Word) -> Result<(), Fault> {
        if self.is_full() {
            return Err(Fault::StackOverflow);
        }
        self.items.push(value);
        Ok(())
    }

    #[inline(always)]
    pub fn pop(&mut self) -> Result<Word, Fault> {
        self.items.pop().ok_or(Fault::StackUnderflow)
    }

    /// Read the element `distance` positions below the top (0 = top)
    #[inline(always)]
    pub fn peek(&self, distance: usize) -> Result<Word, Fault> {
        self.items
            .len()
            .checked_sub(distance)
            .and_then(|above| above.checked_sub(1))
            .map(|index| self.items[index])
            .ok_or(Fault::StackUnderflow)
    }

    /// Overwrite the top element
    #[inline(always)]
    pub fn replace_top(&mut self, value: Word) -> Result<(), Fault> {
        let top = self.items.last_mut().ok_or(Fault::StackUnderflow)?;
        *top = value;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.items.len() >= self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Contents, bottom first
    pub fn as_slice(&self) -> &[Word] {
        &self.items
    }
}

impl Default for Stack {
    fn default() -> Self {
        Self::new()
    }
}
