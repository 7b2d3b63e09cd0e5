/// Test utilities for picker tests
///
/// This module provides a recording listener that captures everything a picker
/// emits, plus fixtures that build pickers against a fixed "today" so tests do
/// not depend on the wall clock.
///
/// ## Usage Examples
///
/// ```rust,ignore
/// use crate::infrastructure::test_utils::test_harness::*;
///
/// #[test]
/// fn my_test() {
///     let recorder = RecordingListener::new();
///     let mut picker = month_picker(Some("2013-05"));
///     picker.listen(recorder.clone());
///
///     picker.month_click(1);
///     assert_eq!(recorder.inputs(), ["2013-01"]);
/// }
/// ```
#[cfg(test)]
pub mod test_harness {
    use crate::application::{DatePicker, PickerOptions};
    use crate::entities::{Granularity, PickerEvent};
    use crate::infrastructure::{PickerListener, PopupFlag};
    use anyhow::Result;
    use chrono::NaiveDate;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// An event together with the host popup state seen when it arrived
    #[derive(Debug, Clone, PartialEq)]
    pub struct Recorded {
        pub event: PickerEvent,
        pub popup_open: Option<bool>,
    }

    /// Listener that keeps every event it receives
    #[derive(Clone, Default)]
    pub struct RecordingListener {
        events: Rc<RefCell<Vec<Recorded>>>,
        popup: Option<PopupFlag>,
    }

    impl RecordingListener {
        pub fn new() -> Self {
            Self::default()
        }

        /// Also record whether `popup` was still open at each event
        pub fn watching(popup: PopupFlag) -> Self {
            Self {
                events: Rc::default(),
                popup: Some(popup),
            }
        }

        pub fn events(&self) -> Vec<Recorded> {
            self.events.borrow().clone()
        }

        /// Payloads of the `Input` events, in order
        pub fn inputs(&self) -> Vec<String> {
            self.events
                .borrow()
                .iter()
                .filter_map(|r| match &r.event {
                    PickerEvent::Input(value) => Some(value.clone()),
                    _ => None,
                })
                .collect()
        }

        /// Payloads of the `TableDate` events, in order
        pub fn table_dates(&self) -> Vec<String> {
            self.events
                .borrow()
                .iter()
                .filter_map(|r| match &r.event {
                    PickerEvent::TableDate(value) => Some(value.clone()),
                    _ => None,
                })
                .collect()
        }
    }

    impl PickerListener for RecordingListener {
        fn on_event(&self, event: &PickerEvent) -> Result<()> {
            self.events.borrow_mut().push(Recorded {
                event: event.clone(),
                popup_open: self.popup.as_ref().map(PopupFlag::is_open),
            });
            Ok(())
        }

        fn name(&self) -> &str {
            "Recording"
        }
    }

    /// The "today" every fixture picker sees
    pub fn fixed_today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2020, 6, 15).unwrap()
    }

    /// Build a picker from options against `fixed_today`
    pub fn picker(options: PickerOptions) -> DatePicker {
        DatePicker::with_today(options, fixed_today())
    }

    /// Month picker with an optional initial value
    pub fn month_picker(value: Option<&str>) -> DatePicker {
        picker(PickerOptions::new(Granularity::Month).value(value))
    }

    /// Attach a recorder to `picker` and return it
    pub fn record(picker: &mut DatePicker) -> RecordingListener {
        let recorder = RecordingListener::new();
        picker.listen(recorder.clone());
        recorder
    }
}

#[cfg(test)]
mod tests {
    use super::test_harness::*;
    use crate::entities::PickerEvent;
    use crate::infrastructure::{HostPopup, PickerListener, PopupFlag};

    #[test]
    fn test_recorder_captures_popup_state() {
        let popup = PopupFlag::opened();
        let recorder = RecordingListener::watching(popup.clone());

        recorder.on_event(&PickerEvent::Input("2013-06".to_string())).unwrap();
        popup.request_close();
        recorder.on_event(&PickerEvent::TableDate("2014".to_string())).unwrap();

        let events = recorder.events();
        assert_eq!(events[0].popup_open, Some(true));
        assert_eq!(events[1].popup_open, Some(false));
        assert_eq!(recorder.inputs(), ["2013-06"]);
        assert_eq!(recorder.table_dates(), ["2014"]);
    }

    #[test]
    fn test_fixture_picker_uses_fixed_today() {
        let picker = month_picker(None);
        assert_eq!(picker.input_date(), "2020-06");
    }
}
