use crate::application::DatePicker;
use crate::domain::TableCell;
use crate::entities::{ActivePicker, Direction};
use crate::infrastructure::PopupFlag;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEventKind};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
    /// The picker closed on a value, or the user left with one selected
    Selected(String),
    /// User exited without a value (quit, escape, ctrl+c)
    Cancelled,
}

/// Keyboard and mouse driver for a [`DatePicker`], independent of the
/// terminal. The session is the picker's host popup: it is finished once an
/// autosaved selection closes it.
pub struct PickerSession {
    picker: DatePicker,
    popup: PopupFlag,
    cursor: usize,
}

impl PickerSession {
    pub fn new(mut picker: DatePicker) -> Self {
        let popup = PopupFlag::opened();
        picker.attach_popup(popup.clone());

        let mut session = Self {
            picker,
            popup,
            cursor: 0,
        };
        session.reset_cursor();
        session
    }

    pub fn picker(&self) -> &DatePicker {
        &self.picker
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn cells(&self) -> Vec<TableCell> {
        self.picker.active_cells()
    }

    /// Cells per row of the active table.
    pub fn columns(&self) -> usize {
        match self.picker.active_picker() {
            ActivePicker::Year => 1,
            ActivePicker::Month => 3,
            ActivePicker::Date => 7,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<SessionOutcome> {
        let before = (self.picker.active_picker(), self.picker.period());
        let columns = self.columns() as isize;

        match (key.code, key.modifiers) {
            (KeyCode::Char('c'), KeyModifiers::CONTROL)
            | (KeyCode::Char('d'), KeyModifiers::CONTROL) => {
                return Some(SessionOutcome::Cancelled);
            }
            (KeyCode::Char('q'), _) | (KeyCode::Esc, _) => {
                return Some(self.leave());
            }

            // Cursor moves place the cursor themselves, even across a block
            (KeyCode::Left, _) | (KeyCode::Char('h'), _) => return self.move_cursor(-1),
            (KeyCode::Right, _) | (KeyCode::Char('l'), _) => return self.move_cursor(1),
            (KeyCode::Up, _) | (KeyCode::Char('k'), _) => return self.move_cursor(-columns),
            (KeyCode::Down, _) | (KeyCode::Char('j'), _) => return self.move_cursor(columns),

            (KeyCode::Enter, _) | (KeyCode::Char(' '), _) => {
                if let Some(cell) = self.cells().get(self.cursor) {
                    self.picker.click(cell);
                }
            }
            (KeyCode::Char('['), _) => self.picker.header_arrow(Direction::Previous),
            (KeyCode::Char(']'), _) => self.picker.header_arrow(Direction::Next),
            (KeyCode::Char('u'), _) | (KeyCode::Backspace, _) => {
                self.picker.title_click();
            }
            (KeyCode::PageUp, _) => {
                self.picker.wheel(-1.0);
            }
            (KeyCode::PageDown, _) => {
                self.picker.wheel(1.0);
            }
            (KeyCode::Char('t'), _) => self.picker.jump_to_today(),

            _ => {}
        }

        self.settle(before)
    }

    pub fn handle_mouse(&mut self, kind: MouseEventKind) -> Option<SessionOutcome> {
        let before = (self.picker.active_picker(), self.picker.period());
        match kind {
            MouseEventKind::ScrollUp => {
                self.picker.wheel(-1.0);
            }
            MouseEventKind::ScrollDown => {
                self.picker.wheel(1.0);
            }
            _ => {}
        }
        self.settle(before)
    }

    /// Runs deferred work and re-anchors the cursor when the table changed.
    fn settle(
        &mut self,
        before: (ActivePicker, crate::domain::TablePeriod),
    ) -> Option<SessionOutcome> {
        self.picker.next_tick();
        if !self.popup.is_open() {
            return Some(self.leave());
        }

        if before != (self.picker.active_picker(), self.picker.period()) {
            self.reset_cursor();
        }
        None
    }

    fn leave(&self) -> SessionOutcome {
        self.picker
            .value()
            .map(SessionOutcome::Selected)
            .unwrap_or(SessionOutcome::Cancelled)
    }

    fn move_cursor(&mut self, offset: isize) -> Option<SessionOutcome> {
        let len = self.cells().len() as isize;
        let next = self.cursor as isize + offset;
        if (0..len).contains(&next) {
            self.cursor = next as usize;
        } else if self.picker.active_picker() == ActivePicker::Year {
            self.cross_year_block(offset);
        }
        None
    }

    /// Years are listed newest first, so moving down past the last row shows
    /// the previous block with the cursor on the year just before.
    fn cross_year_block(&mut self, offset: isize) {
        let Some(year) = self.cells().get(self.cursor).map(|c| c.token.year()) else {
            return;
        };
        let target = year - offset as i32;
        let direction = if offset > 0 {
            Direction::Previous
        } else {
            Direction::Next
        };

        self.picker.header_arrow(direction);
        if let Some(index) = self.cells().iter().position(|c| c.token.year() == target) {
            self.cursor = index;
        }
    }

    fn reset_cursor(&mut self) {
        let cells = self.cells();
        self.cursor = cells
            .iter()
            .position(|c| c.selected)
            .or_else(|| cells.iter().position(|c| c.current))
            .or_else(|| cells.iter().position(|c| c.allowed))
            .unwrap_or(0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::PickerOptions;
    use crate::entities::Granularity;
    use crate::infrastructure::test_utils::test_harness::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_cursor_starts_on_selection() {
        let session = PickerSession::new(month_picker(Some("2013-05")));
        assert_eq!(session.cursor(), 4);
        assert_eq!(session.columns(), 3);
    }

    #[test]
    fn test_enter_with_autosave_finishes() {
        let mut session = PickerSession::new(picker(
            PickerOptions::new(Granularity::Month)
                .value(Some("2013-05"))
                .autosave(true),
        ));

        assert_eq!(session.handle_key(key(KeyCode::Right)), None);
        assert_eq!(
            session.handle_key(key(KeyCode::Enter)),
            Some(SessionOutcome::Selected("2013-06".to_string()))
        );
    }

    #[test]
    fn test_without_autosave_escape_returns_last_value() {
        let mut session = PickerSession::new(month_picker(Some("2013-05")));

        session.handle_key(key(KeyCode::Down));
        assert_eq!(session.handle_key(key(KeyCode::Enter)), None);
        assert_eq!(
            session.handle_key(key(KeyCode::Esc)),
            Some(SessionOutcome::Selected("2013-08".to_string()))
        );
    }

    #[test]
    fn test_cancel_without_value() {
        let mut session = PickerSession::new(month_picker(None));
        assert_eq!(session.handle_key(key(KeyCode::Char('q'))), Some(SessionOutcome::Cancelled));

        let mut session = PickerSession::new(month_picker(Some("2013-05")));
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(session.handle_key(ctrl_c), Some(SessionOutcome::Cancelled));
    }

    #[test]
    fn test_title_and_year_pick_move_cursor() {
        let mut session = PickerSession::new(month_picker(Some("2013-05")));

        session.handle_key(key(KeyCode::Char('u')));
        assert_eq!(session.picker().active_picker(), ActivePicker::Year);
        // 2019 down to 2010.
        assert_eq!(session.cursor(), 6);

        session.handle_key(key(KeyCode::Up));
        session.handle_key(key(KeyCode::Enter));
        assert_eq!(session.picker().active_picker(), ActivePicker::Month);
        assert_eq!(session.picker().table_date(), "2014");
        assert_eq!(session.picker().value().as_deref(), Some("2014-05"));
        assert_eq!(session.cursor(), 4);
    }

    #[test]
    fn test_header_arrows_and_wheel() {
        let mut session = PickerSession::new(picker(
            PickerOptions::new(Granularity::Month)
                .value(Some("2013-05"))
                .scrollable(true),
        ));

        session.handle_key(key(KeyCode::Char('[')));
        assert_eq!(session.picker().table_date(), "2012");

        session.handle_mouse(MouseEventKind::ScrollDown);
        session.handle_key(key(KeyCode::PageDown));
        assert_eq!(session.picker().table_date(), "2014");
    }

    #[test]
    fn test_cursor_crosses_year_blocks() {
        let mut session = PickerSession::new(month_picker(Some("2010-05")));
        session.handle_key(key(KeyCode::Char('u')));
        assert_eq!(session.cursor(), 9);

        session.handle_key(key(KeyCode::Down));
        assert_eq!(session.picker().period().decade(), 2000);
        assert_eq!(session.cursor(), 0);
        assert_eq!(session.cells()[0].token.year(), 2009);

        session.handle_key(key(KeyCode::Up));
        assert_eq!(session.picker().period().decade(), 2010);
        assert_eq!(session.cursor(), 9);

        session.handle_key(key(KeyCode::Down));
        session.handle_key(key(KeyCode::Enter));
        assert_eq!(session.picker().value().as_deref(), Some("2009-05"));
        assert_eq!(session.picker().active_picker(), ActivePicker::Month);
    }

    #[test]
    fn test_cursor_stops_at_year_0000() {
        let mut session = PickerSession::new(month_picker(Some("0000-05")));
        session.handle_key(key(KeyCode::Char('u')));
        assert_eq!(session.cursor(), 9);

        session.handle_key(key(KeyCode::Down));
        assert_eq!(session.picker().period().decade(), 0);
        assert_eq!(session.cursor(), 9);
    }

    #[test]
    fn test_cursor_stays_inside_table() {
        let mut session = PickerSession::new(month_picker(Some("2013-01")));
        session.handle_key(key(KeyCode::Left));
        session.handle_key(key(KeyCode::Up));
        assert_eq!(session.cursor(), 0);
    }
}
