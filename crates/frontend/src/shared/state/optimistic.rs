//! Optimistic mutations with automatic rollback
//!
//! A command is an `{apply, rollback}` pair. [`execute`] applies it right
//! away, awaits the network effect and restores the captured state when the
//! effect fails.

use super::store_cell::StoreCell;
use std::future::Future;

type Step<S> = Box<dyn FnOnce(&mut S)>;

pub struct OptimisticCommand<S> {
    apply: Step<S>,
    rollback: Step<S>,
}

impl<S: 'static> OptimisticCommand<S> {
    pub fn new(apply: impl FnOnce(&mut S) + 'static, rollback: impl FnOnce(&mut S) + 'static) -> Self {
        Self {
            apply: Box::new(apply),
            rollback: Box::new(rollback),
        }
    }

    /// Capture `capture(state)` now; rollback hands it back to `restore`.
    ///
    /// Build the command right before [`execute`] so the snapshot is the
    /// state the mutation starts from.
    pub fn with_snapshot<T: 'static>(
        state: &S,
        capture: impl FnOnce(&S) -> T,
        restore: impl FnOnce(&mut S, T) + 'static,
        apply: impl FnOnce(&mut S) + 'static,
    ) -> Self {
        let snapshot = capture(state);
        Self::new(apply, move |s| restore(s, snapshot))
    }
}

/// Apply, await `effect`, roll back on `Err`
pub async fn execute<S, C, T, E, F>(cell: &C, command: OptimisticCommand<S>, effect: F) -> Result<T, E>
where
    S: 'static,
    C: StoreCell<S>,
    F: Future<Output = Result<T, E>>,
{
    let OptimisticCommand { apply, rollback } = command;
    cell.mutate(apply);
    match effect.await {
        Ok(value) => Ok(value),
        Err(err) => {
            cell.mutate(rollback);
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[tokio::test]
    async fn test_success_keeps_applied_state() {
        let cell = Rc::new(RefCell::new(vec![1, 2, 3]));
        let command = cell.peek(|s| {
            OptimisticCommand::with_snapshot(s, |s| s.clone(), |s, snap| *s = snap, |s| s.reverse())
        });
        let result: Result<(), String> = execute(&cell, command, async { Ok(()) }).await;
        assert!(result.is_ok());
        assert_eq!(*cell.borrow(), vec![3, 2, 1]);
    }

    #[tokio::test]
    async fn test_failure_restores_snapshot() {
        let cell = Rc::new(RefCell::new(vec![1, 2, 3]));
        let command = cell.peek(|s| {
            OptimisticCommand::with_snapshot(s, |s| s.clone(), |s, snap| *s = snap, |s| s.push(4))
        });
        let observed = cell.clone();
        let result: Result<(), String> = execute(&cell, command, async move {
            // applied before the effect resolves
            assert_eq!(observed.borrow().len(), 4);
            Err("offline".to_string())
        })
        .await;
        assert_eq!(result, Err("offline".to_string()));
        assert_eq!(*cell.borrow(), vec![1, 2, 3]);
    }
}
