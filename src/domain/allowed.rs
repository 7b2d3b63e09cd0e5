use super::token::{DateToken, days_in_month};
use crate::entities::Granularity;
use std::fmt;
use std::sync::Arc;

/// Decides selectability of a canonical date string.
pub type DatePredicate = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// Which values a picker lets the user select.
#[derive(Clone, Default)]
pub enum AllowedDates {
    #[default]
    Unrestricted,
    /// Canonical strings. Entries that are not tokens of the picker's
    /// granularity never match.
    Only(Vec<String>),
    Predicate(DatePredicate),
}

impl AllowedDates {
    pub fn only<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        AllowedDates::Only(entries.into_iter().map(Into::into).collect())
    }

    pub fn predicate<F>(predicate: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        AllowedDates::Predicate(Arc::new(predicate))
    }

    pub fn is_allowed(&self, candidate: &DateToken, granularity: Granularity) -> bool {
        match self {
            AllowedDates::Unrestricted => true,
            AllowedDates::Only(_) => self
                .valid_entries(granularity)
                .any(|entry| entry == *candidate),
            AllowedDates::Predicate(predicate) => predicate(&candidate.to_string()),
        }
    }

    /// The token a picker without a value opens on.
    pub fn first_allowed(&self, granularity: Granularity, fallback: DateToken) -> DateToken {
        match self {
            AllowedDates::Unrestricted => fallback,
            AllowedDates::Only(_) => self.valid_entries(granularity).min().unwrap_or(fallback),
            AllowedDates::Predicate(_) => enclosing_period(fallback, granularity)
                .into_iter()
                .find(|candidate| self.is_allowed(candidate, granularity))
                .unwrap_or(fallback),
        }
    }

    fn valid_entries(&self, granularity: Granularity) -> impl Iterator<Item = DateToken> + '_ {
        let entries: &[String] = match self {
            AllowedDates::Only(entries) => entries,
            _ => &[],
        };
        entries
            .iter()
            .filter_map(move |entry| DateToken::parse_exact(entry, granularity))
    }
}

impl fmt::Debug for AllowedDates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AllowedDates::Unrestricted => f.write_str("Unrestricted"),
            AllowedDates::Only(entries) => f.debug_tuple("Only").field(entries).finish(),
            AllowedDates::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

/// Every token of `granularity` in the decade, year or month that `anchor`
/// belongs to, in chronological order.
pub fn enclosing_period(anchor: DateToken, granularity: Granularity) -> Vec<DateToken> {
    let year = anchor.year();
    match granularity {
        Granularity::Year => {
            let decade = year - year.rem_euclid(10);
            (decade..decade + 10).filter_map(DateToken::from_year).collect()
        }
        Granularity::Month => (1..=12)
            .filter_map(|month| DateToken::from_year_month(year, month))
            .collect(),
        Granularity::Date => {
            let month = anchor.month().unwrap_or(1);
            (1..=days_in_month(year, month))
                .filter_map(|day| DateToken::from_ymd(year, month, day))
                .collect()
        }
    }
}

/// Inclusive lower and upper limits on selectable tokens.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateBounds {
    pub min: Option<DateToken>,
    pub max: Option<DateToken>,
}

impl DateBounds {
    pub fn new(min: Option<DateToken>, max: Option<DateToken>) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, token: &DateToken) -> bool {
        self.min.is_none_or(|min| *token >= min) && self.max.is_none_or(|max| *token <= max)
    }

    pub fn clamp(&self, token: DateToken) -> DateToken {
        match (self.min, self.max) {
            (Some(min), _) if token < min => min,
            (_, Some(max)) if token > max => max,
            _ => token,
        }
    }
}

/// Allow-list and bounds applied together.
#[derive(Debug, Clone)]
pub struct DateFilter {
    pub allowed: AllowedDates,
    pub bounds: DateBounds,
    granularity: Granularity,
}

impl DateFilter {
    pub fn new(granularity: Granularity, allowed: AllowedDates, bounds: DateBounds) -> Self {
        Self {
            allowed,
            bounds,
            granularity,
        }
    }

    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    pub fn is_selectable(&self, candidate: &DateToken) -> bool {
        self.bounds.contains(candidate) && self.allowed.is_allowed(candidate, self.granularity())
    }

    pub fn first_selectable(&self, fallback: DateToken) -> DateToken {
        let granularity = self.granularity();
        match &self.allowed {
            AllowedDates::Unrestricted => self.bounds.clamp(fallback),
            AllowedDates::Only(_) => self
                .allowed
                .valid_entries(granularity)
                .filter(|entry| self.bounds.contains(entry))
                .min()
                .unwrap_or(fallback),
            AllowedDates::Predicate(_) => {
                let anchor = self.bounds.clamp(fallback);
                enclosing_period(anchor, granularity)
                    .into_iter()
                    .find(|candidate| self.is_selectable(candidate))
                    .unwrap_or(anchor)
            }
        }
    }

    /// Whether a coarser `period` (a year, or a month of a date picker) reaches
    /// into the bounds. Allow-lists are not consulted: such cells only
    /// navigate.
    pub fn overlaps(&self, period: &DateToken) -> bool {
        let at = period.granularity();
        if at >= self.granularity {
            return self.bounds.contains(period);
        }
        let min_ok = self
            .bounds
            .min
            .and_then(|min| min.truncate(at))
            .is_none_or(|min| *period >= min);
        let max_ok = self
            .bounds
            .max
            .and_then(|max| max.truncate(at))
            .is_none_or(|max| *period <= max);
        min_ok && max_ok
    }

    /// A copy of this filter for another granularity. Bounds are re-expressed
    /// at the new precision; a refined max still covers its whole period.
    pub fn regranulate(&self, granularity: Granularity) -> Self {
        let bounds = DateBounds::new(
            self.bounds.min.map(|min| min.with_granularity(granularity)),
            self.bounds.max.map(|max| max.with_granularity_at_end(granularity)),
        );
        Self::new(granularity, self.allowed.clone(), bounds)
    }
}
