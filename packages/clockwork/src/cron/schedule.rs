use std::fmt;

use chrono::{DateTime, Datelike, Timelike, Utc};

use super::{CronError, Element, Position};

/// Macro templates accepted in place of a full expression.
const TEMPLATES: &[(&str, &str)] = &[
    ("@yearly", "0 0 1 1 *"),
    ("@annually", "0 0 1 1 *"),
    ("@monthly", "0 0 1 * *"),
    ("@weekly", "0 0 * * 0"),
    ("@daily", "0 0 * * *"),
    ("@hourly", "0 * * * *"),
    ("@always", "* * * * *"),
    ("@5minutes", "*/5 * * * *"),
    ("@10minutes", "*/10 * * * *"),
    ("@15minutes", "*/15 * * * *"),
    ("@30minutes", "0,30 * * * *"),
    ("@everysecond", "* * * * * *"),
];

const WEEKDAY_NAMES: &[(&str, &str)] = &[
    ("SUN", "0"),
    ("MON", "1"),
    ("TUE", "2"),
    ("WED", "3"),
    ("THU", "4"),
    ("FRI", "5"),
    ("SAT", "6"),
];

const MONTH_NAMES: &[(&str, &str)] = &[
    ("JAN", "1"),
    ("FEB", "2"),
    ("MAR", "3"),
    ("APR", "4"),
    ("MAY", "5"),
    ("JUN", "6"),
    ("JUL", "7"),
    ("AUG", "8"),
    ("SEP", "9"),
    ("OCT", "10"),
    ("NOV", "11"),
    ("DEC", "12"),
];

/// An immutable, parsed cron schedule.
///
/// Construct with [`Schedule::parse`]; query with [`Schedule::is_due`].
/// Cloning is cheap relative to re-parsing and schedules are freely
/// shared inside job definitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schedule {
    expression: String,
    elements: Vec<Element>,
}

impl Schedule {
    /// Parse a cron expression or `@`-macro into a schedule.
    pub fn parse(expression: &str) -> Result<Schedule, CronError> {
        let expression = replace_template(expression.trim());
        let expression = normalize(&expression);
        let fields = standardize(&expression)?;

        let mut elements = Vec::with_capacity(fields.len());
        for (index, field) in fields.iter().enumerate() {
            // Field counts are capped at 7 by standardize, so the
            // position lookup cannot miss.
            let position = Position::from_index(index).ok_or_else(|| {
                CronError::InvalidExpression(format!("unexpected field index {index}"))
            })?;
            elements.push(Element::parse(field, position)?);
        }

        Ok(Schedule {
            expression,
            elements,
        })
    }

    /// Whether every field of this schedule matches the given instant.
    pub fn is_due(&self, instant: DateTime<Utc>) -> bool {
        self.elements
            .iter()
            .all(|element| element.matches(field_value(element.position(), instant)))
    }

    /// The normalized expression, with macros expanded.
    pub fn expression(&self) -> &str {
        &self.expression
    }
}

impl fmt::Display for Schedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.expression)
    }
}

fn replace_template(expression: &str) -> String {
    for (name, expansion) in TEMPLATES {
        if expression == *name {
            return (*expansion).to_string();
        }
    }
    expression.to_string()
}

/// Collapse whitespace, uppercase, and substitute weekday/month names.
fn normalize(expression: &str) -> String {
    let mut normalized = expression
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase();
    for (name, number) in WEEKDAY_NAMES {
        normalized = normalized.replace(name, number);
    }
    for (name, number) in MONTH_NAMES {
        normalized = normalized.replace(name, number);
    }
    normalized
}

/// Split into fields and pad to the second-first layout.
///
/// Accepts 5, 6 or 7 fields. A 5-field expression gains a leading `0`
/// second; so does a 6-field expression whose last field is a year
/// (four or more digits).
fn standardize(expression: &str) -> Result<Vec<String>, CronError> {
    let mut fields: Vec<String> = expression.split(' ').map(str::to_string).collect();
    let count = fields.len();

    if !(5..=7).contains(&count) {
        return Err(CronError::InvalidExpression(format!(
            "expected 5 to 7 fields separated by space, got {count}"
        )));
    }

    let trailing_year = count == 6 && looks_like_year(&fields[5]);
    if count == 5 || trailing_year {
        fields.insert(0, "0".to_string());
    }

    Ok(fields)
}

fn looks_like_year(field: &str) -> bool {
    field.len() >= 4 && field.bytes().all(|b| b.is_ascii_digit())
}

fn field_value(position: Position, instant: DateTime<Utc>) -> u32 {
    match position {
        Position::Second => instant.second(),
        Position::Minute => instant.minute(),
        Position::Hour => instant.hour(),
        Position::DayOfMonth => instant.day(),
        Position::Month => instant.month(),
        Position::DayOfWeek => instant.weekday().num_days_from_sunday(),
        // Negative years never match; saturate to a value outside
        // every element's accepted range.
        Position::Year => u32::try_from(instant.year()).unwrap_or(0),
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    /// Monday 2006-01-02 15:04:05 UTC.
    fn golden_instant() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2006, 1, 2, 15, 4, 5).unwrap()
    }

    #[test]
    fn field_count_bounds() {
        for expr in ["*", "* *", "* * *", "* * * *", "* * * * * * * *"] {
            assert!(Schedule::parse(expr).is_err(), "{expr:?} should reject");
        }
        for expr in ["* * * * *", "* * * * * *", "* * * * * * *"] {
            assert!(Schedule::parse(expr).is_ok(), "{expr:?} should parse");
        }
    }

    #[test]
    fn invalid_field_values_reject() {
        for expr in [
            "",
            "a",
            "a * * * *",
            "60 * * * * *",
            "0 24 * * * *",
            "0 0 32 * * *",
            "5-1 * * * * *",
        ] {
            assert!(Schedule::parse(expr).is_err(), "{expr:?} should reject");
        }
    }

    #[test]
    fn every_second_is_due_at_any_instant() {
        let s = Schedule::parse("* * * * * *").unwrap();
        assert!(s.is_due(golden_instant()));
        assert!(s.is_due(Utc.with_ymd_and_hms(2031, 12, 31, 23, 59, 59).unwrap()));
    }

    #[test]
    fn each_field_matches_golden_instant() {
        for expr in [
            "* * * * * *",
            "5 * * * * *",
            "* 4 * * * *",
            "* * 15 * * *",
            "* * * 2 * *",
            "* * * * 1 *",
            "* * * * * 1 *",
        ] {
            let s = Schedule::parse(expr).unwrap();
            assert!(s.is_due(golden_instant()), "{expr:?} should be due");
        }
    }

    #[test]
    fn each_field_rejects_off_by_one() {
        for expr in [
            "6 * * * * *",
            "* 5 * * * *",
            "* * 14 * * *",
            "* * * 3 * *",
            "* * * * 2 *",
            "* * * * * 2 *",
        ] {
            let s = Schedule::parse(expr).unwrap();
            assert!(!s.is_due(golden_instant()), "{expr:?} should not be due");
        }
    }

    #[test]
    fn five_field_expression_implies_second_zero() {
        let on_the_minute = Utc.with_ymd_and_hms(2006, 1, 2, 15, 4, 0).unwrap();
        let s = Schedule::parse("* * * * 1").unwrap();
        assert!(s.is_due(on_the_minute));
        assert!(!s.is_due(golden_instant()));
    }

    #[test]
    fn fully_pinned_expression_matches_exactly_one_second() {
        let s = Schedule::parse("5 4 15 2 1 *").unwrap();
        assert!(s.is_due(golden_instant()));
        assert!(!s.is_due(Utc.with_ymd_and_hms(2006, 1, 2, 15, 4, 6).unwrap()));
    }

    #[test]
    fn step_seconds_match_even_seconds_only() {
        let s = Schedule::parse("*/2 * * * * *").unwrap();
        for second in 0..60 {
            let t = Utc.with_ymd_and_hms(2006, 1, 2, 15, 4, second).unwrap();
            assert_eq!(s.is_due(t), second % 2 == 0, "second {second}");
        }
    }

    #[test]
    fn range_seconds_are_inclusive() {
        let s = Schedule::parse("0-1 * * * * *").unwrap();
        assert!(s.is_due(Utc.with_ymd_and_hms(2006, 1, 2, 15, 4, 0).unwrap()));
        assert!(s.is_due(Utc.with_ymd_and_hms(2006, 1, 2, 15, 4, 1).unwrap()));
        assert!(!s.is_due(Utc.with_ymd_and_hms(2006, 1, 2, 15, 4, 2).unwrap()));
    }

    #[test]
    fn trailing_year_field_is_recognized() {
        // Year-last six-field form pads the second to 0.
        let s = Schedule::parse("* * * * * 2006").unwrap();
        assert!(s.is_due(Utc.with_ymd_and_hms(2006, 1, 2, 15, 4, 0).unwrap()));
        assert!(!s.is_due(golden_instant()));
        assert!(!s.is_due(Utc.with_ymd_and_hms(2007, 1, 1, 15, 4, 0).unwrap()));
    }

    #[test]
    fn macros_expand_and_match_their_documented_moment() {
        let cases: &[(&str, DateTime<Utc>)] = &[
            ("@yearly", Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap()),
            ("@annually", Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap()),
            ("@monthly", Utc.with_ymd_and_hms(2026, 8, 1, 0, 0, 0).unwrap()),
            // 2026-08-02 is a Sunday.
            ("@weekly", Utc.with_ymd_and_hms(2026, 8, 2, 0, 0, 0).unwrap()),
            ("@daily", Utc.with_ymd_and_hms(2026, 8, 5, 0, 0, 0).unwrap()),
            ("@hourly", Utc.with_ymd_and_hms(2026, 8, 5, 17, 0, 0).unwrap()),
            ("@always", Utc.with_ymd_and_hms(2026, 8, 5, 17, 42, 0).unwrap()),
            ("@5minutes", Utc.with_ymd_and_hms(2026, 8, 5, 17, 45, 0).unwrap()),
            ("@10minutes", Utc.with_ymd_and_hms(2026, 8, 5, 17, 50, 0).unwrap()),
            ("@15minutes", Utc.with_ymd_and_hms(2026, 8, 5, 17, 45, 0).unwrap()),
            ("@30minutes", Utc.with_ymd_and_hms(2026, 8, 5, 17, 30, 0).unwrap()),
            ("@everysecond", golden_instant()),
        ];
        for (macro_name, moment) in cases {
            let s = Schedule::parse(macro_name).unwrap();
            assert!(s.is_due(*moment), "{macro_name} should be due at {moment}");
        }
    }

    #[test]
    fn macro_expansion_is_visible_in_display() {
        let cases = [
            ("@yearly", "0 0 1 1 *"),
            ("@everysecond", "* * * * * *"),
            ("* * * * *", "* * * * *"),
            ("* * * * * * *", "* * * * * * *"),
        ];
        for (input, rendered) in cases {
            assert_eq!(Schedule::parse(input).unwrap().to_string(), rendered);
        }
    }

    #[test]
    fn weekday_and_month_names_normalize() {
        let s = Schedule::parse("0 0 * JAN MON").unwrap();
        assert_eq!(s.to_string(), "0 0 * 1 1");
        assert!(s.is_due(golden_instant().with_time(chrono::NaiveTime::MIN).unwrap()));
    }

    #[test]
    fn whitespace_collapses_and_case_is_ignored() {
        let s = Schedule::parse("  0   0 *  jan   mon ").unwrap();
        assert_eq!(s.to_string(), "0 0 * 1 1");
    }

    #[test]
    fn unknown_macro_rejects() {
        assert!(Schedule::parse("@fortnightly").is_err());
    }
}
