use crate::entities::{ActivePicker, Granularity};

/// Tracks which table a picker shows.
///
/// The active view is never finer than the granularity: a month picker only
/// ever visits YEAR and MONTH.
#[derive(Debug, Clone)]
pub struct ViewMachine {
    granularity: Granularity,
    active: ActivePicker,
}

impl ViewMachine {
    /// `initial` wins when given. Without it a picker that has no value
    /// starts on the year table so the first pick is a year.
    pub fn new(granularity: Granularity, initial: Option<ActivePicker>, has_value: bool) -> Self {
        let terminal = granularity.terminal_view();
        let active = match initial {
            Some(view) if view > terminal => {
                log::debug!("active picker {view} is finer than {granularity}, using {terminal}");
                terminal
            }
            Some(view) => view,
            None if !has_value => ActivePicker::Year,
            None => terminal,
        };

        Self {
            granularity,
            active,
        }
    }

    pub fn active(&self) -> ActivePicker {
        self.active
    }

    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    /// Whether a pick on the active table finalizes the selection.
    pub fn is_terminal(&self) -> bool {
        self.active == self.granularity.terminal_view()
    }

    /// Title click. Returns whether the view changed.
    pub fn ascend(&mut self) -> bool {
        match self.active.coarser() {
            Some(coarser) => {
                self.active = coarser;
                true
            }
            None => false,
        }
    }

    /// Pick on a non-terminal table. Returns whether the view changed.
    pub fn descend(&mut self) -> bool {
        if self.is_terminal() {
            return false;
        }
        match self.active.finer() {
            Some(finer) => {
                self.active = finer;
                true
            }
            None => false,
        }
    }

    pub fn reset(&mut self, granularity: Granularity) {
        self.granularity = granularity;
        self.active = granularity.terminal_view();
    }
}
