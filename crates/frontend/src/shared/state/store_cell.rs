use leptos::prelude::{RwSignal, Update, WithUntracked};
use std::cell::RefCell;
use std::rc::Rc;

/// Shared, mutable home of an application state.
///
/// The store and its effects only talk to this trait: the UI hands in a
/// `RwSignal` so views re-render on change, tests use `Rc<RefCell<_>>`.
pub trait StoreCell<S>: Clone + 'static {
    /// Read without subscribing
    fn peek<R>(&self, f: impl FnOnce(&S) -> R) -> R;

    /// Mutate and notify subscribers
    fn mutate(&self, f: impl FnOnce(&mut S));
}

impl<S: 'static> StoreCell<S> for Rc<RefCell<S>> {
    fn peek<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        f(&self.borrow())
    }

    fn mutate(&self, f: impl FnOnce(&mut S)) {
        f(&mut self.borrow_mut())
    }
}

impl<S: Send + Sync + 'static> StoreCell<S> for RwSignal<S> {
    fn peek<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        self.with_untracked(f)
    }

    fn mutate(&self, f: impl FnOnce(&mut S)) {
        self.update(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rc_cell() {
        let cell = Rc::new(RefCell::new(vec![1, 2]));
        cell.mutate(|v| v.push(3));
        assert_eq!(cell.peek(|v| v.len()), 3);

        let alias = cell.clone();
        alias.mutate(|v| v.clear());
        assert!(cell.peek(|v| v.is_empty()));
    }
}
