//! Assign-assessment modal flag and the listeners told about new assignments.

use std::fmt;

type Callback = Box<dyn FnMut() -> anyhow::Result<()> + Send>;

/// Handle returned by [`ModalController::register`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CallbackId(u64);

#[derive(Default)]
pub struct ModalController {
    assign_open: bool,
    next_id: u64,
    callbacks: Vec<(CallbackId, Callback)>,
}

impl ModalController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_assign_open(&self) -> bool {
        self.assign_open
    }

    pub fn open_assign(&mut self) {
        self.assign_open = true;
    }

    pub fn close_assign(&mut self) {
        self.assign_open = false;
    }

    /// Adds a listener for "an assessment was assigned".
    pub fn register<F>(&mut self, callback: F) -> CallbackId
    where
        F: FnMut() -> anyhow::Result<()> + Send + 'static,
    {
        let id = CallbackId(self.next_id);
        self.next_id += 1;
        self.callbacks.push((id, Box::new(callback)));
        id
    }

    pub fn unregister(&mut self, id: CallbackId) -> bool {
        let before = self.callbacks.len();
        self.callbacks.retain(|(registered, _)| *registered != id);
        self.callbacks.len() != before
    }

    pub fn listener_count(&self) -> usize {
        self.callbacks.len()
    }

    /// Runs every listener in registration order. Failures are logged and
    /// do not stop the remaining listeners. Returns how many failed.
    pub fn trigger(&mut self) -> usize {
        let mut failed = 0;
        for (id, callback) in &mut self.callbacks {
            if let Err(err) = callback() {
                log::error!("Assessment callback {id:?} failed: {err:#}");
                failed += 1;
            }
        }
        failed
    }
}

impl fmt::Debug for ModalController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModalController")
            .field("assign_open", &self.assign_open)
            .field("listeners", &self.callbacks.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counter() -> (Arc<AtomicUsize>, impl FnMut() -> anyhow::Result<()> + Send + 'static) {
        let count = Arc::new(AtomicUsize::new(0));
        let handle = Arc::clone(&count);
        (count, move || {
            handle.fetch_add(1, Ordering::SeqCst);
            Ok(())
        })
    }

    #[test]
    fn open_and_close() {
        let mut modal = ModalController::new();
        modal.open_assign();
        assert!(modal.is_assign_open());
        modal.close_assign();
        assert!(!modal.is_assign_open());
    }

    #[test]
    fn failing_listener_does_not_stop_others() {
        let mut modal = ModalController::new();
        let (first, first_cb) = counter();
        let (last, last_cb) = counter();

        modal.register(first_cb);
        modal.register(|| anyhow::bail!("refresh failed"));
        modal.register(last_cb);

        assert_eq!(modal.trigger(), 1);
        assert_eq!(first.load(Ordering::SeqCst), 1);
        assert_eq!(last.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn unregistered_listener_is_not_called() {
        let mut modal = ModalController::new();
        let (count, callback) = counter();
        let id = modal.register(callback);

        assert!(modal.unregister(id));
        assert!(!modal.unregister(id));
        modal.trigger();

        assert_eq!(count.load(Ordering::SeqCst), 0);
        assert_eq!(modal.listener_count(), 0);
    }
}
