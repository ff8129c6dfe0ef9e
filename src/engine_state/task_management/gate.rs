//! Manually reset worker gate.

use parking_lot::{Condvar, Mutex};

/// A signal that stays open until the worker waiting on it closes it again.
///
/// The driving side opens it once per tick; the worker closes it after
/// draining its batch.
#[derive(Debug, Default)]
pub struct Gate {
    open: Mutex<bool>,
    condvar: Condvar,
}

impl Gate {
    /// Creates a closed gate.
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens the gate and wakes the waiting worker.
    pub fn open(&self) {
        let mut open = self.open.lock();
        *open = true;
        self.condvar.notify_all();
    }

    /// Closes the gate.
    pub fn close(&self) {
        *self.open.lock() = false;
    }

    /// Whether the gate is currently open.
    pub fn is_open(&self) -> bool {
        *self.open.lock()
    }

    /// Blocks until the gate is open. Returns immediately if it already is.
    pub fn wait(&self) {
        let mut open = self.open.lock();
        while !*open {
            self.condvar.wait(&mut open);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{sync::Arc, thread, time::Duration};

    use super::*;

    #[test]
    fn wait_returns_once_opened_from_another_thread() {
        let gate = Arc::new(Gate::new());
        let waiter = {
            let gate = gate.clone();
            thread::spawn(move || gate.wait())
        };
        thread::sleep(Duration::from_millis(10));
        gate.open();
        waiter.join().unwrap();
        assert!(gate.is_open());
    }

    #[test]
    fn stays_open_until_closed() {
        let gate = Gate::new();
        assert!(!gate.is_open());
        gate.open();
        gate.wait();
        gate.wait();
        gate.close();
        assert!(!gate.is_open());
    }
}
