use super::token::{DateToken, YEARS};
use crate::entities::{ActivePicker, Direction, Granularity};
use std::fmt;

/// The period a picker's table shows, one level coarser than its granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TablePeriod {
    /// First year of a ten-year block.
    Decade(i32),
    Year(i32),
    Month { year: i32, month: u32 },
}

impl TablePeriod {
    /// The period of `granularity` containing `token`.
    pub fn containing(token: &DateToken, granularity: Granularity) -> Self {
        let year = token.year();
        match granularity {
            Granularity::Year => TablePeriod::Decade(decade_of(year)),
            Granularity::Month => TablePeriod::Year(year),
            Granularity::Date => TablePeriod::Month {
                year,
                month: token.month().unwrap_or(1),
            },
        }
    }

    pub fn year(&self) -> i32 {
        match *self {
            TablePeriod::Decade(year) | TablePeriod::Year(year) => year,
            TablePeriod::Month { year, .. } => year,
        }
    }

    pub fn month(&self) -> Option<u32> {
        match *self {
            TablePeriod::Month { month, .. } => Some(month),
            _ => None,
        }
    }

    fn has_four_digit_year(&self) -> bool {
        YEARS.contains(&self.year())
    }

    /// First year of the ten-year block the period falls in.
    pub fn decade(&self) -> i32 {
        decade_of(self.year())
    }

    fn shift_years(self, years: i32) -> Self {
        match self {
            TablePeriod::Decade(year) => TablePeriod::Decade(year + years),
            TablePeriod::Year(year) => TablePeriod::Year(year + years),
            TablePeriod::Month { year, month } => TablePeriod::Month {
                year: year + years,
                month,
            },
        }
    }

    fn shift_months(self, months: i32) -> Self {
        match self {
            TablePeriod::Month { year, month } => {
                let total = year * 12 + (month as i32 - 1) + months;
                TablePeriod::Month {
                    year: total.div_euclid(12),
                    month: total.rem_euclid(12) as u32 + 1,
                }
            }
            other => other.shift_years(months.div_euclid(12)),
        }
    }
}

impl fmt::Display for TablePeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TablePeriod::Decade(year) | TablePeriod::Year(year) => write!(f, "{:04}", year),
            TablePeriod::Month { year, month } => write!(f, "{:04}-{:02}", year, month),
        }
    }
}

fn decade_of(year: i32) -> i32 {
    year - year.rem_euclid(10)
}

/// Owns the displayed table period and moves it on navigation.
#[derive(Debug, Clone)]
pub struct Navigator {
    granularity: Granularity,
    period: TablePeriod,
}

impl Navigator {
    pub fn new(granularity: Granularity, anchor: &DateToken) -> Self {
        Self {
            granularity,
            period: TablePeriod::containing(anchor, granularity),
        }
    }

    pub fn period(&self) -> TablePeriod {
        self.period
    }

    pub fn year(&self) -> i32 {
        self.period.year()
    }

    pub fn month(&self) -> Option<u32> {
        self.period.month()
    }

    /// Moves by one unit of the given table: a month on the day table, a year
    /// on the month table, a ten-year block on the year table. A step that
    /// would leave years 0000-9999 is refused.
    pub fn step(&mut self, view: ActivePicker, direction: Direction) -> TablePeriod {
        let sign = direction.sign();
        let next = match view {
            ActivePicker::Date => self.period.shift_months(sign),
            ActivePicker::Month => self.period.shift_years(sign),
            ActivePicker::Year => match self.period {
                TablePeriod::Decade(year) => TablePeriod::Decade(decade_of(year) + 10 * sign),
                other => other.shift_years(10 * sign),
            },
        };
        if next.has_four_digit_year() {
            self.period = next;
        } else {
            log::debug!("not stepping past {}", self.period);
        }
        self.period
    }

    /// One step per wheel event; only the sign of `delta` is used.
    pub fn scroll(&mut self, view: ActivePicker, delta: f64) -> TablePeriod {
        self.step(view, Direction::from_delta(delta))
    }

    pub fn recenter(&mut self, token: &DateToken) {
        self.period = TablePeriod::containing(token, self.granularity);
    }

    /// Shows `year`, keeping the displayed month on a day table.
    pub fn show_year(&mut self, year: i32) {
        if !YEARS.contains(&year) {
            return;
        }
        self.period = match self.period {
            TablePeriod::Decade(_) => TablePeriod::Decade(decade_of(year)),
            TablePeriod::Year(_) => TablePeriod::Year(year),
            TablePeriod::Month { month, .. } => TablePeriod::Month { year, month },
        };
    }

    pub fn show_month(&mut self, year: i32, month: u32) {
        if self.granularity == Granularity::Date
            && YEARS.contains(&year)
            && (1..=12).contains(&month)
        {
            self.period = TablePeriod::Month { year, month };
        }
    }
}
