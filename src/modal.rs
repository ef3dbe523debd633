use std::{cell::Cell, rc::Rc};

/// Page-level no-scroll flag shared between the page shell and overlays.
/// Single-threaded by design; clones observe the same flag.
#[derive(Clone, Debug, Default)]
pub struct ScrollLock {
    locked: Rc<Cell<bool>>,
}

impl ScrollLock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_locked(&self) -> bool {
        self.locked.get()
    }

    fn set(&self, locked: bool) {
        self.locked.set(locked);
    }
}

/// Two-state overlay: CLOSED ⇄ OPEN. While OPEN the page scroll lock is
/// held; it is released on close and unconditionally on drop, whichever
/// path tore the overlay down.
#[derive(Debug)]
pub struct ModalOverlay {
    lock: ScrollLock,
    open: bool,
}

impl ModalOverlay {
    pub fn new(lock: ScrollLock) -> Self {
        Self { lock, open: false }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn open(&mut self) {
        if !self.open {
            self.open = true;
            self.lock.set(true);
        }
    }

    pub fn close(&mut self) {
        if self.open {
            self.open = false;
            self.lock.set(false);
        }
    }
}

impl Drop for ModalOverlay {
    fn drop(&mut self) {
        if self.open {
            self.lock.set(false);
        }
    }
}
