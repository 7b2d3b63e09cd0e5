use super::allowed::DateFilter;
use super::navigator::TablePeriod;
use super::token::{DateToken, days_in_month};
use chrono::{Datelike, Weekday};

/// One clickable cell of a year, month or day table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableCell {
    pub token: DateToken,
    pub selected: bool,
    pub current: bool,
    pub allowed: bool,
}

/// Context shared by the table builders.
pub struct TableContext<'a> {
    pub filter: &'a DateFilter,
    pub selected: Option<DateToken>,
    pub current: Option<DateToken>,
}

impl TableContext<'_> {
    fn cell(&self, token: DateToken) -> TableCell {
        // Selection and today are compared at the table's own precision, so a
        // month cell is "selected" when the value falls in that month.
        let at = token.granularity();
        TableCell {
            token,
            selected: self.selected.and_then(|s| s.truncate(at)) == Some(token),
            current: self.current.and_then(|c| c.truncate(at)) == Some(token),
            allowed: self.is_allowed(&token),
        }
    }

    fn is_allowed(&self, token: &DateToken) -> bool {
        if token.granularity() == self.filter.granularity() {
            return self.filter.is_selectable(token);
        }
        self.filter.overlaps(token)
    }
}

/// The years of the block containing `period` that have a four-digit form,
/// newest first.
pub fn year_cells(period: TablePeriod, ctx: &TableContext) -> Vec<TableCell> {
    let decade = period.decade();
    (decade..decade + 10)
        .rev()
        .filter_map(DateToken::from_year)
        .map(|token| ctx.cell(token))
        .collect()
}

/// The twelve months of the displayed year.
pub fn month_cells(period: TablePeriod, ctx: &TableContext) -> Vec<TableCell> {
    let year = period.year();
    (1..=12)
        .filter_map(|month| DateToken::from_year_month(year, month))
        .map(|token| ctx.cell(token))
        .collect()
}

/// Day cells of the displayed month laid out in weeks. Slots before the 1st
/// and after the last day are `None`.
pub fn day_weeks(
    period: TablePeriod,
    first_day_of_week: Weekday,
    ctx: &TableContext,
) -> Vec<[Option<TableCell>; 7]> {
    let year = period.year();
    let month = period.month().unwrap_or(1);
    let first = DateToken::from_ymd(year, month, 1).map(|t| t.to_naive_date());
    let Some(first) = first else {
        return Vec::new();
    };

    let offset = (first.weekday().num_days_from_sunday() + 7
        - first_day_of_week.num_days_from_sunday()) as usize
        % 7;
    let mut weeks = Vec::new();
    let mut week: [Option<TableCell>; 7] = Default::default();
    let mut slot = offset;

    for day in 1..=days_in_month(year, month) {
        if let Some(token) = DateToken::from_ymd(year, month, day) {
            week[slot] = Some(ctx.cell(token));
        }
        slot += 1;
        if slot == 7 {
            weeks.push(std::mem::take(&mut week));
            slot = 0;
        }
    }
    if slot > 0 {
        weeks.push(week);
    }

    weeks
}

/// Weekday column headers starting at `first_day_of_week`.
pub fn weekday_headers(first_day_of_week: Weekday) -> Vec<Weekday> {
    let mut day = first_day_of_week;
    (0..7)
        .map(|_| {
            let current = day;
            day = day.succ();
            current
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::allowed::{AllowedDates, DateBounds};
    use crate::entities::Granularity;

    fn month(raw: &str) -> DateToken {
        DateToken::parse(Some(raw), Granularity::Month).unwrap()
    }

    #[test]
    fn test_month_cells_flag_selection_and_allowed() {
        let filter = DateFilter::new(
            Granularity::Month,
            AllowedDates::only(["2013-01", "2013-03", "2013-05", "2013-07", "invalid month"]),
            DateBounds::default(),
        );
        let ctx = TableContext {
            filter: &filter,
            selected: Some(month("2013-05")),
            current: None,
        };

        let cells = month_cells(TablePeriod::Year(2013), &ctx);
        assert_eq!(cells.len(), 12);

        let allowed: Vec<String> = cells
            .iter()
            .filter(|c| c.allowed)
            .map(|c| c.token.to_string())
            .collect();
        assert_eq!(allowed, ["2013-01", "2013-03", "2013-05", "2013-07"]);

        let selected: Vec<&TableCell> = cells.iter().filter(|c| c.selected).collect();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].token.to_string(), "2013-05");
    }

    #[test]
    fn test_year_cells_are_newest_first() {
        let filter = DateFilter::new(Granularity::Year, AllowedDates::Unrestricted, DateBounds::default());
        let ctx = TableContext {
            filter: &filter,
            selected: DateToken::from_year(2013),
            current: DateToken::from_year(2016),
        };

        let cells = year_cells(TablePeriod::Decade(2010), &ctx);
        assert_eq!(cells.first().unwrap().token.to_string(), "2019");
        assert_eq!(cells.last().unwrap().token.to_string(), "2010");
        assert!(cells.iter().any(|c| c.selected && c.token.year() == 2013));
        assert!(cells.iter().any(|c| c.current && c.token.year() == 2016));
    }

    #[test]
    fn test_year_cells_in_month_picker_follow_bounds() {
        let bounds = DateBounds::new(Some(month("2012-06")), Some(month("2014-02")));
        let filter = DateFilter::new(Granularity::Month, AllowedDates::Unrestricted, bounds);
        let ctx = TableContext {
            filter: &filter,
            selected: Some(month("2013-05")),
            current: None,
        };

        let allowed: Vec<i32> = year_cells(TablePeriod::Year(2013), &ctx)
            .iter()
            .filter(|c| c.allowed)
            .map(|c| c.token.year())
            .collect();
        assert_eq!(allowed, [2014, 2013, 2012]);
    }

    #[test]
    fn test_day_weeks_layout() {
        let filter = DateFilter::new(Granularity::Date, AllowedDates::Unrestricted, DateBounds::default());
        let ctx = TableContext {
            filter: &filter,
            selected: None,
            current: None,
        };

        // 2024-02-01 is a Thursday.
        let weeks = day_weeks(TablePeriod::Month { year: 2024, month: 2 }, Weekday::Sun, &ctx);
        assert_eq!(weeks.len(), 5);
        assert!(weeks[0][3].is_none());
        assert_eq!(weeks[0][4].as_ref().unwrap().token.day(), Some(1));
        assert_eq!(weeks[4][4].as_ref().unwrap().token.day(), Some(29));

        let weeks = day_weeks(TablePeriod::Month { year: 2024, month: 2 }, Weekday::Thu, &ctx);
        assert_eq!(weeks[0][0].as_ref().unwrap().token.day(), Some(1));
    }

    #[test]
    fn test_weekday_headers_rotate() {
        let headers = weekday_headers(Weekday::Mon);
        assert_eq!(headers.first(), Some(&Weekday::Mon));
        assert_eq!(headers.last(), Some(&Weekday::Sun));
    }
}
