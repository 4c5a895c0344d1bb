use std::cell::Cell;
use std::rc::Rc;

/// Handle returned when a callback is registered. Cancelling it removes the
/// callback before its next invocation.
///
/// Cancellation only flips a shared flag; the slot itself is swept after the
/// current frame, so neighbours are never skipped or invoked twice even when
/// a handle is cancelled mid-iteration.
#[derive(Debug, Clone)]
pub struct Registration {
    id: u64,
    cancelled: Rc<Cell<bool>>,
}

impl Registration {
    /// Unregister the callback. Idempotent.
    pub fn cancel(&self) {
        self.cancelled.set(true);
    }

    /// Whether the callback has been unregistered.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.get()
    }

    /// Registration id, unique within one callback list.
    pub fn id(&self) -> u64 {
        self.id
    }
}

pub(crate) struct Slot<F> {
    pub(crate) name: String,
    cancelled: Rc<Cell<bool>>,
    pub(crate) callback: F,
}

impl<F> Slot<F> {
    pub(crate) fn is_live(&self) -> bool {
        !self.cancelled.get()
    }
}

/// Callbacks kept in registration order.
pub(crate) struct CallbackList<F> {
    slots: Vec<Slot<F>>,
    next_id: u64,
}

impl<F> CallbackList<F> {
    pub(crate) fn new() -> Self {
        Self {
            slots: Vec::new(),
            next_id: 0,
        }
    }

    pub(crate) fn register(&mut self, name: String, callback: F) -> Registration {
        let cancelled = Rc::new(Cell::new(false));
        let id = self.next_id;
        self.next_id += 1;
        self.slots.push(Slot {
            name,
            cancelled: Rc::clone(&cancelled),
            callback,
        });
        Registration { id, cancelled }
    }

    pub(crate) fn slots_mut(&mut self) -> impl Iterator<Item = &mut Slot<F>> {
        self.slots.iter_mut()
    }

    /// Drop cancelled slots.
    pub(crate) fn sweep(&mut self) {
        self.slots.retain(Slot::is_live);
    }

    pub(crate) fn live_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_live()).count()
    }
}
