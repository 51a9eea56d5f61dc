use std::fmt;

/// Field position inside a standardized cron expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    Second,
    Minute,
    Hour,
    DayOfMonth,
    Month,
    DayOfWeek,
    Year,
}

impl Position {
    /// Map a standardized field index (second-first) to its position.
    pub(crate) fn from_index(index: usize) -> Option<Position> {
        match index {
            0 => Some(Position::Second),
            1 => Some(Position::Minute),
            2 => Some(Position::Hour),
            3 => Some(Position::DayOfMonth),
            4 => Some(Position::Month),
            5 => Some(Position::DayOfWeek),
            6 => Some(Position::Year),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Position::Second => "second",
            Position::Minute => "minute",
            Position::Hour => "hour",
            Position::DayOfMonth => "day-of-month",
            Position::Month => "month",
            Position::DayOfWeek => "day-of-week",
            Position::Year => "year",
        }
    }

    /// Inclusive value bounds for this field. `None` means unbounded
    /// above (the year field accepts any positive integer).
    pub(crate) fn bounds(&self) -> (u32, Option<u32>) {
        match self {
            Position::Second | Position::Minute => (0, Some(59)),
            Position::Hour => (0, Some(23)),
            Position::DayOfMonth => (1, Some(31)),
            Position::Month => (1, Some(12)),
            Position::DayOfWeek => (0, Some(6)),
            Position::Year => (1, None),
        }
    }

    /// Step divisors accepted for this field. An empty slice means step
    /// expressions are rejected; `None` means any positive divisor.
    pub(crate) fn step_divisors(&self) -> Option<&'static [u32]> {
        match self {
            Position::Second | Position::Minute => {
                Some(&[2, 3, 4, 5, 6, 10, 12, 15, 20, 30])
            }
            Position::Hour => Some(&[2, 3, 4, 6, 8, 12]),
            Position::DayOfMonth | Position::Month | Position::DayOfWeek => Some(&[]),
            Position::Year => None,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_mapping_covers_all_seven_fields() {
        let positions = [
            Position::Second,
            Position::Minute,
            Position::Hour,
            Position::DayOfMonth,
            Position::Month,
            Position::DayOfWeek,
            Position::Year,
        ];
        for (i, expected) in positions.iter().enumerate() {
            assert_eq!(Position::from_index(i), Some(*expected));
        }
        assert_eq!(Position::from_index(7), None);
    }

    #[test]
    fn display_matches_field_names() {
        assert_eq!(Position::Second.to_string(), "second");
        assert_eq!(Position::DayOfMonth.to_string(), "day-of-month");
        assert_eq!(Position::Year.to_string(), "year");
    }
}
