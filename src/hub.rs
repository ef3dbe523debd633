use std::{
    cell::RefCell,
    rc::{Rc, Weak},
};

use crate::core::Viewport;

type Listener = Box<dyn FnMut(&Viewport)>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum EventKind {
    Scroll,
    Resize,
}

#[derive(Default)]
struct HubInner {
    next_id: u64,
    scroll: Vec<(u64, Listener)>,
    resize: Vec<(u64, Listener)>,
    // Ids unsubscribed while their list was checked out for dispatch.
    dead: Vec<(EventKind, u64)>,
}

/// Single-threaded scroll/resize event dispatcher. Listeners are scoped:
/// the returned [`Subscription`] deregisters on drop, so an unmounted
/// section stops receiving notifications without any explicit teardown call.
#[derive(Clone, Default)]
pub struct ScrollHub {
    inner: Rc<RefCell<HubInner>>,
}

impl ScrollHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_scroll(&self, listener: impl FnMut(&Viewport) + 'static) -> Subscription {
        self.subscribe(EventKind::Scroll, Box::new(listener))
    }

    pub fn on_resize(&self, listener: impl FnMut(&Viewport) + 'static) -> Subscription {
        self.subscribe(EventKind::Resize, Box::new(listener))
    }

    fn subscribe(&self, kind: EventKind, listener: Listener) -> Subscription {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_id;
        inner.next_id += 1;
        match kind {
            EventKind::Scroll => inner.scroll.push((id, listener)),
            EventKind::Resize => inner.resize.push((id, listener)),
        }
        Subscription {
            hub: Rc::downgrade(&self.inner),
            kind,
            id,
        }
    }

    pub fn emit_scroll(&self, viewport: &Viewport) {
        self.emit(EventKind::Scroll, viewport);
    }

    pub fn emit_resize(&self, viewport: &Viewport) {
        tracing::debug!(
            width = viewport.width,
            height = viewport.height,
            "viewport resized"
        );
        self.emit(EventKind::Resize, viewport);
    }

    fn emit(&self, kind: EventKind, viewport: &Viewport) {
        // Check the list out so listeners may subscribe or unsubscribe
        // without re-entering the borrow.
        let mut current = {
            let mut inner = self.inner.borrow_mut();
            match kind {
                EventKind::Scroll => std::mem::take(&mut inner.scroll),
                EventKind::Resize => std::mem::take(&mut inner.resize),
            }
        };

        for (_, listener) in current.iter_mut() {
            listener(viewport);
        }

        let mut inner = self.inner.borrow_mut();
        let added = match kind {
            EventKind::Scroll => std::mem::take(&mut inner.scroll),
            EventKind::Resize => std::mem::take(&mut inner.resize),
        };
        current.extend(added);

        let dead = std::mem::take(&mut inner.dead);
        let (mine, other): (Vec<_>, Vec<_>) = dead.into_iter().partition(|(k, _)| *k == kind);
        inner.dead = other;
        current.retain(|(id, _)| !mine.iter().any(|(_, dead_id)| dead_id == id));

        match kind {
            EventKind::Scroll => inner.scroll = current,
            EventKind::Resize => inner.resize = current,
        }
    }

    pub fn scroll_listeners(&self) -> usize {
        self.inner.borrow().scroll.len()
    }

    pub fn resize_listeners(&self) -> usize {
        self.inner.borrow().resize.len()
    }
}

/// RAII handle for a registered listener.
#[derive(Debug)]
pub struct Subscription {
    hub: Weak<RefCell<HubInner>>,
    kind: EventKind,
    id: u64,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        let Some(inner) = self.hub.upgrade() else {
            return;
        };
        let Ok(mut inner) = inner.try_borrow_mut() else {
            // Dropped from inside a dispatch that holds the borrow; the
            // emit loop sweeps tombstones instead.
            return;
        };
        let list = match self.kind {
            EventKind::Scroll => &mut inner.scroll,
            EventKind::Resize => &mut inner.resize,
        };
        let before = list.len();
        list.retain(|(id, _)| *id != self.id);
        if list.len() == before {
            let kind = self.kind;
            let id = self.id;
            inner.dead.push((kind, id));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{cell::Cell, rc::Rc};

    fn vp(scroll_y: f64) -> Viewport {
        Viewport::new(1280.0, 800.0).at_scroll(scroll_y)
    }

    #[test]
    fn listeners_receive_emitted_events() {
        let hub = ScrollHub::new();
        let seen = Rc::new(Cell::new(0.0));
        let seen2 = Rc::clone(&seen);
        let _sub = hub.on_scroll(move |v| seen2.set(v.scroll_y));

        hub.emit_scroll(&vp(640.0));
        assert_eq!(seen.get(), 640.0);
    }

    #[test]
    fn drop_deregisters() {
        let hub = ScrollHub::new();
        let hits = Rc::new(Cell::new(0u32));
        let hits2 = Rc::clone(&hits);
        let sub = hub.on_scroll(move |_| hits2.set(hits2.get() + 1));
        assert_eq!(hub.scroll_listeners(), 1);

        hub.emit_scroll(&vp(0.0));
        drop(sub);
        assert_eq!(hub.scroll_listeners(), 0);
        hub.emit_scroll(&vp(100.0));
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn scroll_and_resize_lists_are_independent() {
        let hub = ScrollHub::new();
        let scrolls = Rc::new(Cell::new(0u32));
        let resizes = Rc::new(Cell::new(0u32));
        let s = Rc::clone(&scrolls);
        let r = Rc::clone(&resizes);
        let _a = hub.on_scroll(move |_| s.set(s.get() + 1));
        let _b = hub.on_resize(move |_| r.set(r.get() + 1));

        hub.emit_scroll(&vp(0.0));
        hub.emit_resize(&vp(0.0));
        hub.emit_scroll(&vp(0.0));
        assert_eq!(scrolls.get(), 2);
        assert_eq!(resizes.get(), 1);
    }

    #[test]
    fn subscribing_during_dispatch_does_not_reenter() {
        let hub = ScrollHub::new();
        let hub2 = hub.clone();
        let late: Rc<RefCell<Vec<Subscription>>> = Rc::new(RefCell::new(Vec::new()));
        let late2 = Rc::clone(&late);
        let _sub = hub.on_scroll(move |_| {
            late2.borrow_mut().push(hub2.on_scroll(|_| {}));
        });

        hub.emit_scroll(&vp(0.0));
        assert_eq!(hub.scroll_listeners(), 2);
    }

    #[test]
    fn drop_after_hub_is_gone_is_harmless() {
        let hub = ScrollHub::new();
        let sub = hub.on_scroll(|_| {});
        drop(hub);
        drop(sub);
    }
}
