use std::fmt;
use std::str::FromStr;
use thiserror::Error;

// ============================================================================
// Granularity and Views
// ============================================================================

/// Precision of the values a picker selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Granularity {
    Year,
    Month,
    Date,
}

impl Granularity {
    /// The table on which a pick finalizes the selection.
    pub fn terminal_view(self) -> ActivePicker {
        match self {
            Granularity::Year => ActivePicker::Year,
            Granularity::Month => ActivePicker::Month,
            Granularity::Date => ActivePicker::Date,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Granularity::Year => "year",
            Granularity::Month => "month",
            Granularity::Date => "date",
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Granularity {
    type Err = PickerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "year" => Ok(Granularity::Year),
            "month" => Ok(Granularity::Month),
            "date" => Ok(Granularity::Date),
            other => Err(PickerError::InvalidGranularity(other.to_string())),
        }
    }
}

/// The table currently shown by a picker, coarsest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ActivePicker {
    Year,
    Month,
    Date,
}

impl ActivePicker {
    pub fn coarser(self) -> Option<Self> {
        match self {
            ActivePicker::Year => None,
            ActivePicker::Month => Some(ActivePicker::Year),
            ActivePicker::Date => Some(ActivePicker::Month),
        }
    }

    pub fn finer(self) -> Option<Self> {
        match self {
            ActivePicker::Year => Some(ActivePicker::Month),
            ActivePicker::Month => Some(ActivePicker::Date),
            ActivePicker::Date => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ActivePicker::Year => "YEAR",
            ActivePicker::Month => "MONTH",
            ActivePicker::Date => "DATE",
        }
    }
}

impl fmt::Display for ActivePicker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActivePicker {
    type Err = PickerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "YEAR" => Ok(ActivePicker::Year),
            "MONTH" => Ok(ActivePicker::Month),
            "DATE" => Ok(ActivePicker::Date),
            _ => Err(PickerError::InvalidActivePicker(s.to_string())),
        }
    }
}

/// Direction of a header arrow or a wheel event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Previous,
    Next,
}

impl Direction {
    /// Only the sign of the delta counts. A zero delta moves forward.
    pub fn from_delta(delta: f64) -> Self {
        if delta < 0.0 {
            Direction::Previous
        } else {
            Direction::Next
        }
    }

    pub fn sign(self) -> i32 {
        match self {
            Direction::Previous => -1,
            Direction::Next => 1,
        }
    }
}

// ============================================================================
// Events
// ============================================================================

/// Notifications a picker sends to its listeners.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickerEvent {
    /// A selection was accepted. Carries the canonical value.
    Input(String),
    /// The displayed table moved. Carries the new table date.
    TableDate(String),
}

impl PickerEvent {
    pub fn name(&self) -> &'static str {
        match self {
            PickerEvent::Input(_) => "input",
            PickerEvent::TableDate(_) => "update:table-date",
        }
    }

    pub fn payload(&self) -> &str {
        match self {
            PickerEvent::Input(value) | PickerEvent::TableDate(value) => value,
        }
    }
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PickerError {
    #[error("invalid picker type '{0}', expected one of: date, month, year")]
    InvalidGranularity(String),
    #[error("invalid active picker '{0}', expected one of: YEAR, MONTH, DATE")]
    InvalidActivePicker(String),
    #[error("first day of week must be between 0 (Sunday) and 6, got {0}")]
    InvalidFirstDayOfWeek(u32),
}
