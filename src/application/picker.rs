use crate::application::Formatters;
use crate::domain::{
    AllowedDates, DateBounds, DateFilter, DateToken, Navigator, TableCell, TableContext,
    TablePeriod, ViewMachine, table,
};
use crate::entities::{ActivePicker, Direction, Granularity, PickerEvent};
use crate::infrastructure::{
    DeferredAction, DeferredQueue, HostPopup, ListenerRegistry, PickerListener,
};
use chrono::{Local, NaiveDate, Weekday};

/// Presentation settings the picker carries for its renderer.
#[derive(Debug, Clone)]
pub struct Appearance {
    pub color: Option<String>,
    pub header_color: Option<String>,
    pub prepend_icon: String,
    pub append_icon: String,
    pub formatters: Formatters,
}

impl Default for Appearance {
    fn default() -> Self {
        Self {
            color: None,
            header_color: None,
            prepend_icon: "chevron_left".to_string(),
            append_icon: "chevron_right".to_string(),
            formatters: Formatters::default(),
        }
    }
}

/// Construction settings of a [`DatePicker`].
#[derive(Debug, Clone)]
pub struct PickerOptions {
    pub granularity: Granularity,
    pub value: Option<String>,
    pub allowed_dates: AllowedDates,
    pub min: Option<String>,
    pub max: Option<String>,
    pub scrollable: bool,
    pub autosave: bool,
    pub active_picker: Option<ActivePicker>,
    /// Initial table date, overriding the one derived from the value.
    pub picker_date: Option<String>,
    pub show_current: bool,
    pub first_day_of_week: Weekday,
    pub appearance: Appearance,
}

impl PickerOptions {
    pub fn new(granularity: Granularity) -> Self {
        Self {
            granularity,
            value: None,
            allowed_dates: AllowedDates::Unrestricted,
            min: None,
            max: None,
            scrollable: false,
            autosave: false,
            active_picker: None,
            picker_date: None,
            show_current: true,
            first_day_of_week: Weekday::Sun,
            appearance: Appearance::default(),
        }
    }

    pub fn value(mut self, value: Option<&str>) -> Self {
        self.value = value.map(str::to_string);
        self
    }

    pub fn allowed_dates(mut self, allowed_dates: AllowedDates) -> Self {
        self.allowed_dates = allowed_dates;
        self
    }

    pub fn min(mut self, min: &str) -> Self {
        self.min = Some(min.to_string());
        self
    }

    pub fn max(mut self, max: &str) -> Self {
        self.max = Some(max.to_string());
        self
    }

    pub fn scrollable(mut self, scrollable: bool) -> Self {
        self.scrollable = scrollable;
        self
    }

    pub fn autosave(mut self, autosave: bool) -> Self {
        self.autosave = autosave;
        self
    }

    pub fn active_picker(mut self, active_picker: ActivePicker) -> Self {
        self.active_picker = Some(active_picker);
        self
    }

    pub fn picker_date(mut self, picker_date: &str) -> Self {
        self.picker_date = Some(picker_date.to_string());
        self
    }

    pub fn show_current(mut self, show_current: bool) -> Self {
        self.show_current = show_current;
        self
    }

    pub fn first_day_of_week(mut self, first_day_of_week: Weekday) -> Self {
        self.first_day_of_week = first_day_of_week;
        self
    }

    pub fn appearance(mut self, appearance: Appearance) -> Self {
        self.appearance = appearance;
        self
    }

    fn filter(&self) -> DateFilter {
        let bound = |raw: &Option<String>| DateToken::parse(raw.as_deref(), self.granularity);
        DateFilter::new(
            self.granularity,
            self.allowed_dates.clone(),
            DateBounds::new(bound(&self.min), bound(&self.max)),
        )
    }
}

/// A user action on the picker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Interaction {
    YearCell(i32),
    MonthCell(u32),
    DayCell(u32),
    HeaderArrow(Direction),
    Title,
    Wheel(f64),
    Today,
}

/// The date picker state machine.
///
/// Every interaction runs to completion synchronously. Listeners hear about
/// an accepted selection before any deferred work (closing the host popup)
/// runs on the next [`DatePicker::next_tick`].
pub struct DatePicker {
    options: PickerOptions,
    filter: DateFilter,
    value: Option<DateToken>,
    navigator: Navigator,
    view: ViewMachine,
    today: NaiveDate,
    listeners: ListenerRegistry,
    popup: Option<Box<dyn HostPopup>>,
    deferred: DeferredQueue,
}

impl DatePicker {
    pub fn new(options: PickerOptions) -> Self {
        Self::with_today(options, Local::now().date_naive())
    }

    pub fn with_today(options: PickerOptions, today: NaiveDate) -> Self {
        let granularity = options.granularity;
        let filter = options.filter();
        let value = DateToken::parse(options.value.as_deref(), granularity);
        if value.is_none() && options.value.is_some() {
            log::debug!("ignoring malformed {granularity} value {:?}", options.value);
        }

        let view = ViewMachine::new(granularity, options.active_picker, value.is_some());
        let anchor = options
            .picker_date
            .as_deref()
            .and_then(|raw| table_anchor(raw, granularity))
            .or(value)
            .unwrap_or_else(|| filter.first_selectable(DateToken::from_naive(today, granularity)));
        let navigator = Navigator::new(granularity, &anchor);

        Self {
            options,
            filter,
            value,
            navigator,
            view,
            today,
            listeners: ListenerRegistry::new(),
            popup: None,
            deferred: DeferredQueue::new(),
        }
    }

    pub fn listen<L>(&mut self, listener: L)
    where
        L: PickerListener + 'static,
    {
        self.listeners.register(listener);
    }

    pub fn attach_popup<P>(&mut self, popup: P)
    where
        P: HostPopup + 'static,
    {
        self.popup = Some(Box::new(popup));
    }

    // ------------------------------------------------------------------
    // State
    // ------------------------------------------------------------------

    pub fn options(&self) -> &PickerOptions {
        &self.options
    }

    pub fn granularity(&self) -> Granularity {
        self.options.granularity
    }

    pub fn value(&self) -> Option<String> {
        self.value.map(|v| v.to_string())
    }

    /// The value, or the token the picker opens on when there is none.
    pub fn input_date(&self) -> String {
        self.value.unwrap_or_else(|| self.first_selectable()).to_string()
    }

    /// The displayed table period: `YYYY` or `YYYY-MM`.
    pub fn table_date(&self) -> String {
        self.navigator.period().to_string()
    }

    pub fn period(&self) -> TablePeriod {
        self.navigator.period()
    }

    pub fn active_picker(&self) -> ActivePicker {
        self.view.active()
    }

    /// Today's token when `show_current` is set.
    pub fn current(&self) -> Option<String> {
        self.current_token().map(|t| t.to_string())
    }

    pub fn has_pending_work(&self) -> bool {
        !self.deferred.is_empty()
    }

    fn today_token(&self) -> DateToken {
        DateToken::from_naive(self.today, self.granularity())
    }

    fn current_token(&self) -> Option<DateToken> {
        self.options.show_current.then(|| self.today_token())
    }

    fn first_selectable(&self) -> DateToken {
        self.filter.first_selectable(self.today_token())
    }

    // ------------------------------------------------------------------
    // Tables
    // ------------------------------------------------------------------

    fn table_context(&self) -> TableContext<'_> {
        TableContext {
            filter: &self.filter,
            selected: self.value,
            current: self.current_token(),
        }
    }

    pub fn year_cells(&self) -> Vec<TableCell> {
        table::year_cells(self.navigator.period(), &self.table_context())
    }

    pub fn month_cells(&self) -> Vec<TableCell> {
        table::month_cells(self.navigator.period(), &self.table_context())
    }

    pub fn day_weeks(&self) -> Vec<[Option<TableCell>; 7]> {
        table::day_weeks(
            self.navigator.period(),
            self.options.first_day_of_week,
            &self.table_context(),
        )
    }

    pub fn weekday_headers(&self) -> Vec<Weekday> {
        table::weekday_headers(self.options.first_day_of_week)
    }

    /// Cells of the active table in reading order.
    pub fn active_cells(&self) -> Vec<TableCell> {
        match self.view.active() {
            ActivePicker::Year => self.year_cells(),
            ActivePicker::Month => self.month_cells(),
            ActivePicker::Date => self.day_weeks().into_iter().flatten().flatten().collect(),
        }
    }

    // ------------------------------------------------------------------
    // Interactions
    // ------------------------------------------------------------------

    pub fn handle(&mut self, interaction: Interaction) {
        match interaction {
            Interaction::YearCell(year) => self.year_click(year),
            Interaction::MonthCell(month) => self.month_click(month),
            Interaction::DayCell(day) => self.date_click(day),
            Interaction::HeaderArrow(direction) => self.header_arrow(direction),
            Interaction::Title => {
                self.title_click();
            }
            Interaction::Wheel(delta) => {
                self.wheel(delta);
            }
            Interaction::Today => self.jump_to_today(),
        }
    }

    /// Clicks `cell` on whichever table it belongs to.
    pub fn click(&mut self, cell: &TableCell) {
        let token = cell.token;
        match token.granularity() {
            Granularity::Year => self.year_click(token.year()),
            Granularity::Month => self.month_click(token.month().unwrap_or(1)),
            Granularity::Date => self.date_click(token.day().unwrap_or(1)),
        }
    }

    pub fn year_click(&mut self, year: i32) {
        if !self.expect_view(ActivePicker::Year) {
            return;
        }

        let Some(year_token) = DateToken::from_year(year) else {
            log::debug!("year {year} has no four-digit form");
            return;
        };

        if self.granularity() == Granularity::Year {
            self.select(year_token);
            return;
        }

        if !self.filter_overlaps(&year_token) {
            log::debug!("year {year} lies outside the selectable range");
            return;
        }

        // Picking a year moves the current value to that year when the
        // result is selectable; the finer pick still follows.
        if let Some(candidate) = self.value.and_then(|value| value.with_year(year)) {
            if self.filter.is_selectable(&candidate) {
                self.commit(candidate);
            } else {
                log::debug!("not emitting {candidate}: not selectable");
            }
        }

        self.move_table(|nav| nav.show_year(year));
        self.view.descend();
        log::debug!("picked year {year}, showing {}", self.view.active());
    }

    pub fn month_click(&mut self, month: u32) {
        if !self.expect_view(ActivePicker::Month) {
            return;
        }

        let year = self.navigator.year();
        let Some(candidate) = DateToken::from_year_month(year, month) else {
            log::debug!("ignoring click on month {month}");
            return;
        };

        match self.granularity() {
            Granularity::Date => {
                if !self.filter_overlaps(&candidate) {
                    log::debug!("month {candidate} lies outside the selectable range");
                    return;
                }
                self.move_table(|nav| nav.show_month(year, month));
                self.view.descend();
            }
            _ => self.select(candidate),
        }
    }

    pub fn date_click(&mut self, day: u32) {
        if !self.expect_view(ActivePicker::Date) {
            return;
        }

        let year = self.navigator.year();
        let month = self.navigator.month().unwrap_or(1);
        match DateToken::from_ymd(year, month, day) {
            Some(candidate) => self.select(candidate),
            None => log::debug!("ignoring click on day {day} of {year}-{month:02}"),
        }
    }

    pub fn header_arrow(&mut self, direction: Direction) {
        let view = self.view.active();
        self.move_table(|nav| {
            nav.step(view, direction);
        });
    }

    /// Returns whether the view changed.
    pub fn title_click(&mut self) -> bool {
        let changed = self.view.ascend();
        if changed {
            log::debug!("title click, showing {}", self.view.active());
        }
        changed
    }

    /// Returns whether the event was handled; wheel events are ignored unless
    /// the picker is scrollable.
    pub fn wheel(&mut self, delta: f64) -> bool {
        if !self.options.scrollable {
            return false;
        }
        let view = self.view.active();
        self.move_table(|nav| {
            nav.scroll(view, delta);
        });
        true
    }

    pub fn jump_to_today(&mut self) {
        let today = self.today_token();
        self.move_table(|nav| nav.recenter(&today));
    }

    /// External update of the value. Never emits `Input`. The shown table is
    /// derived again as if the picker had been opened on the new value.
    pub fn set_value(&mut self, raw: Option<&str>) {
        self.value = DateToken::parse(raw, self.granularity());
        self.view = ViewMachine::new(self.granularity(), None, self.value.is_some());
        let anchor = self.value.unwrap_or_else(|| self.first_selectable());
        self.move_table(|nav| nav.recenter(&anchor));
    }

    /// Switches precision. The value is re-expressed at the new precision and
    /// emitted again.
    pub fn set_granularity(&mut self, granularity: Granularity) {
        if granularity == self.granularity() {
            return;
        }

        self.options.granularity = granularity;
        self.filter = self.filter.regranulate(granularity);
        self.value = self.value.map(|v| v.with_granularity(granularity));
        self.view.reset(granularity);

        let anchor = self.value.unwrap_or_else(|| self.first_selectable());
        let before = self.table_date();
        self.navigator = Navigator::new(granularity, &anchor);
        if self.table_date() != before {
            self.listeners.notify(&PickerEvent::TableDate(self.table_date()));
        }

        if let Some(value) = self.value {
            self.listeners.notify(&PickerEvent::Input(value.to_string()));
        }
    }

    /// Runs deferred work. Returns how many actions ran.
    pub fn next_tick(&mut self) -> usize {
        let actions: Vec<DeferredAction> = self.deferred.drain().collect();
        for action in &actions {
            match action {
                DeferredAction::ClosePopup => match &self.popup {
                    Some(popup) => popup.request_close(),
                    None => log::debug!("close requested without a host popup"),
                },
            }
        }
        actions.len()
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn expect_view(&self, view: ActivePicker) -> bool {
        let active = self.view.active();
        if active != view {
            log::debug!("ignoring {view} click while {active} is shown");
        }
        active == view
    }

    fn filter_overlaps(&self, coarser: &DateToken) -> bool {
        self.filter.overlaps(coarser)
    }

    fn select(&mut self, candidate: DateToken) {
        if !self.filter.is_selectable(&candidate) {
            log::debug!("discarding {candidate}: not selectable");
            return;
        }

        self.commit(candidate);
        if self.options.autosave && self.view.is_terminal() {
            self.deferred.schedule(DeferredAction::ClosePopup);
        }
    }

    fn commit(&mut self, token: DateToken) {
        self.value = Some(token);
        self.listeners.notify(&PickerEvent::Input(token.to_string()));
    }

    fn move_table<F>(&mut self, navigate: F)
    where
        F: FnOnce(&mut Navigator),
    {
        let before = self.navigator.period();
        navigate(&mut self.navigator);
        let after = self.navigator.period();
        if before != after {
            self.listeners.notify(&PickerEvent::TableDate(after.to_string()));
        }
    }
}

/// Reads a table date (`YYYY` or `YYYY-MM`) as a token of `granularity`.
fn table_anchor(raw: &str, granularity: Granularity) -> Option<DateToken> {
    let table_granularity = match granularity {
        Granularity::Year | Granularity::Month => Granularity::Year,
        Granularity::Date => Granularity::Month,
    };
    DateToken::parse(Some(raw), table_granularity).map(|t| t.with_granularity(granularity))
}
