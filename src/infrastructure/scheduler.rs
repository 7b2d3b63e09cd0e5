use std::collections::VecDeque;

/// Work a picker postpones until the current interaction has finished and
/// its listeners have run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeferredAction {
    ClosePopup,
}

/// FIFO of deferred actions, drained once per tick by the host.
#[derive(Debug, Default)]
pub struct DeferredQueue {
    pending: VecDeque<DeferredAction>,
}

impl DeferredQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues `action` unless the same action is already waiting.
    pub fn schedule(&mut self, action: DeferredAction) {
        if !self.pending.contains(&action) {
            self.pending.push_back(action);
        }
    }

    pub fn drain(&mut self) -> impl Iterator<Item = DeferredAction> + '_ {
        self.pending.drain(..)
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
