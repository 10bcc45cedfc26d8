//! A stack with a permanent bottom element.
//!
//! [FloorStack] is a last-in-first-out stack that always contains at least one element:
//!     the *floor*, which is provided at construction and can never be popped.
//! Popping an empty-above-the-floor stack is a no-op.
//! This makes it possible to write code that pops unconditionally, for example when
//!     processing user input with unbalanced push and pop operations,
//!     without ever reaching an invalid state.
//!
//! ```
//! # use quill_stdext::collections::floorstack::FloorStack;
//! let mut stack = FloorStack::new("floor");
//! stack.push("a");
//! stack.push("b");
//! assert_eq!(stack.pop(), Some("b"));
//! assert_eq!(stack.pop(), Some("a"));
//! assert_eq!(stack.pop(), None);
//! assert_eq!(stack.pop(), None);
//! assert_eq!(stack.top(), &"floor");
//! assert_eq!(stack.len(), 1);
//! ```

/// Stack type whose bottom element can never be removed.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FloorStack<T> {
    floor: T,
    above: Vec<T>,
}

impl<T> FloorStack<T> {
    /// Creates a new stack containing only the provided floor element.
    pub fn new(floor: T) -> FloorStack<T> {
        FloorStack {
            floor,
            above: Vec::new(),
        }
    }

    /// Pushes an element onto the top of the stack.
    pub fn push(&mut self, t: T) {
        self.above.push(t);
    }

    /// Pops the top element, or returns `None` if only the floor remains.
    pub fn pop(&mut self) -> Option<T> {
        self.above.pop()
    }

    /// Returns the top element. This is the floor if nothing has been pushed.
    pub fn top(&self) -> &T {
        self.above.last().unwrap_or(&self.floor)
    }

    /// Returns the floor element.
    pub fn floor(&self) -> &T {
        &self.floor
    }

    /// Returns the number of elements in the stack, including the floor.
    ///
    /// This is always at least 1.
    pub fn len(&self) -> usize {
        self.above.len() + 1
    }

    /// Returns true if only the floor is in the stack.
    pub fn is_floor_only(&self) -> bool {
        self.above.is_empty()
    }

    /// Pops every element above the floor.
    pub fn clear_to_floor(&mut self) {
        self.above.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn len_never_below_one() {
        let mut stack = FloorStack::new(0);
        for i in 0..5 {
            stack.push(i);
        }
        for _ in 0..10 {
            stack.pop();
            assert!(stack.len() >= 1);
        }
        assert_eq!(stack.top(), &0);
        assert!(stack.is_floor_only());
    }

    #[test]
    fn clear_to_floor() {
        let mut stack = FloorStack::new('a');
        stack.push('b');
        stack.push('c');
        stack.clear_to_floor();
        assert_eq!(stack.len(), 1);
        assert_eq!(stack.floor(), &'a');
    }
}
