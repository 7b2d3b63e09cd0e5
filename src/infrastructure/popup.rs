use std::cell::Cell;
use std::rc::Rc;

/// The one thing a picker may do to the popup or menu hosting it.
pub trait HostPopup {
    fn request_close(&self);
}

/// Shared open/closed flag of a hosting popup.
///
/// Clones share the flag: the host keeps one handle and gives another to the
/// picker.
#[derive(Debug, Clone)]
pub struct PopupFlag {
    open: Rc<Cell<bool>>,
}

impl PopupFlag {
    pub fn new(open: bool) -> Self {
        Self {
            open: Rc::new(Cell::new(open)),
        }
    }

    pub fn opened() -> Self {
        Self::new(true)
    }

    pub fn is_open(&self) -> bool {
        self.open.get()
    }

    pub fn open(&self) {
        self.open.set(true);
    }
}

impl HostPopup for PopupFlag {
    fn request_close(&self) {
        if self.open.replace(false) {
            log::debug!("host popup closed");
        }
    }
}
