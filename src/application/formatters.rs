use crate::domain::DateToken;
use crate::entities::Granularity;
use std::fmt;
use std::sync::Arc;

/// Turns a canonical date string into display text.
pub type LabelFormatter = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// Optional label hooks used when rendering tables. They never feed back into
/// picker state.
#[derive(Clone, Default)]
pub struct Formatters {
    pub title: Option<LabelFormatter>,
    pub header: Option<LabelFormatter>,
    pub year: Option<LabelFormatter>,
    pub month: Option<LabelFormatter>,
    pub day: Option<LabelFormatter>,
}

impl Formatters {
    /// Label of the selected value, e.g. "Nov 2005" for a month.
    pub fn title(&self, value: &str) -> String {
        apply(&self.title, value, |token| match token.granularity() {
            Granularity::Year => token.year().to_string(),
            Granularity::Month => token.to_naive_date().format("%b %Y").to_string(),
            Granularity::Date => token.to_naive_date().format("%a, %b %-d").to_string(),
        })
    }

    /// Label of a table date: "2005" for a year, "November 2005" for a month.
    pub fn header(&self, table_date: &str) -> String {
        apply(&self.header, table_date, |token| match token.granularity() {
            Granularity::Year => token.year().to_string(),
            _ => token.to_naive_date().format("%B %Y").to_string(),
        })
    }

    pub fn year(&self, value: &str) -> String {
        apply(&self.year, value, |token| token.year().to_string())
    }

    pub fn month(&self, value: &str) -> String {
        apply(&self.month, value, |token| token.to_naive_date().format("%b").to_string())
    }

    pub fn day(&self, value: &str) -> String {
        apply(&self.day, value, |token| token.day().unwrap_or(1).to_string())
    }
}

fn apply(custom: &Option<LabelFormatter>, raw: &str, default: impl Fn(&DateToken) -> String) -> String {
    if let Some(formatter) = custom {
        return formatter(raw);
    }
    parse_any(raw)
        .map(|token| default(&token))
        .unwrap_or_else(|| raw.to_string())
}

fn parse_any(raw: &str) -> Option<DateToken> {
    [Granularity::Date, Granularity::Month, Granularity::Year]
        .into_iter()
        .find_map(|granularity| DateToken::parse_exact(raw, granularity))
}

impl fmt::Debug for Formatters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Formatters")
            .field("title", &self.title.is_some())
            .field("header", &self.header.is_some())
            .field("year", &self.year.is_some())
            .field("month", &self.month.is_some())
            .field("day", &self.day.is_some())
            .finish()
    }
}
