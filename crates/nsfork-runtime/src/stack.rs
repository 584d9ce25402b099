//! History of displaced registry views.

use std::sync::Arc;

use nsfork_core::RegistryView;

/// A last-in, first-out history of the views an execution context has left.
///
/// The root registry is never stored here; an empty stack stands for it.
#[derive(Debug, Default)]
pub struct ContextStack {
    views: Vec<Arc<RegistryView>>,
}

impl ContextStack {
    /// Creates an empty stack.
    #[must_use]
    pub const fn new() -> Self {
        Self { views: Vec::new() }
    }

    /// Pushes a displaced view.
    pub fn push(&mut self, view: Arc<RegistryView>) {
        self.views.push(view);
    }

    /// Removes and returns the most recently displaced view.
    pub fn pop(&mut self) -> Option<Arc<RegistryView>> {
        self.views.pop()
    }

    /// Returns the number of stored views.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.views.len()
    }

    /// Returns `true` if no view is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pops_in_reverse_push_order() {
        let first = Arc::new(RegistryView::new());
        let second = Arc::new(RegistryView::new());
        let mut stack = ContextStack::new();
        stack.push(Arc::clone(&first));
        stack.push(Arc::clone(&second));

        assert_eq!(stack.depth(), 2);
        assert!(Arc::ptr_eq(&stack.pop().expect("second"), &second));
        assert!(Arc::ptr_eq(&stack.pop().expect("first"), &first));
        assert!(stack.pop().is_none());
        assert!(stack.is_empty());
    }
}
