use chrono::{Days, Local, NaiveDate};

/// Format used for persisted calendar dates (`YYYY-MM-DD`).
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A simple clock abstraction for deterministic dates in services and tests.
///
/// The drill only cares about the learner's local calendar day, so the clock
/// yields a `NaiveDate` rather than an instant.
#[derive(Debug, Clone, Copy, Default)]
pub enum Clock {
    #[default]
    Default,
    Fixed(NaiveDate),
}

impl Clock {
    /// Returns a clock that follows the local system calendar.
    #[must_use]
    pub fn default_clock() -> Self {
        Self::Default
    }

    /// Returns a clock fixed on the given day.
    #[must_use]
    pub fn fixed(on: NaiveDate) -> Self {
        Self::Fixed(on)
    }

    /// Returns today's local calendar date according to the clock.
    #[must_use]
    pub fn today(&self) -> NaiveDate {
        match self {
            Clock::Default => Local::now().date_naive(),
            Clock::Fixed(day) => *day,
        }
    }

    /// If this is a fixed clock, advance it by whole days.
    ///
    /// Has no effect on `Clock::Default`.
    pub fn advance_days(&mut self, days: u64) {
        if let Clock::Fixed(day) = self {
            if let Some(next) = day.checked_add_days(Days::new(days)) {
                *day = next;
            }
        }
    }

    /// Returns true if this clock represents real time.
    #[must_use]
    pub fn is_default(&self) -> bool {
        matches!(self, Clock::Default)
    }

    /// Returns true if this clock is fixed.
    #[must_use]
    pub fn is_fixed(&self) -> bool {
        matches!(self, Clock::Fixed(_))
    }
}

/// Whole calendar days from `from` to `to` (negative when `to` is earlier).
///
/// Works on calendar dates, so daylight-saving shifts never produce an
/// off-by-one.
#[must_use]
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    to.signed_duration_since(from).num_days()
}

/// Parses a persisted `YYYY-MM-DD` date.
#[must_use]
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).ok()
}

/// Formats a date the way it is persisted.
#[must_use]
pub fn format_date(day: NaiveDate) -> String {
    day.format(DATE_FORMAT).to_string()
}

/// Deterministic day for tests and examples (2024-01-01).
///
/// # Panics
///
/// Panics if the fixed date cannot be represented.
#[must_use]
pub fn fixed_today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).expect("fixed date should be valid")
}

/// Returns a `Clock` fixed on the deterministic test day.
#[must_use]
pub fn fixed_clock() -> Clock {
    Clock::fixed(fixed_today())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(raw: &str) -> NaiveDate {
        parse_date(raw).unwrap()
    }

    #[test]
    fn days_between_counts_calendar_days() {
        assert_eq!(days_between(day("2024-01-01"), day("2024-01-03")), 2);
        assert_eq!(days_between(day("2024-01-01"), day("2024-01-04")), 3);
        assert_eq!(days_between(day("2024-01-04"), day("2024-01-01")), -3);
    }

    #[test]
    fn days_between_ignores_dst_transitions() {
        // Spring-forward weekends in Europe and North America.
        assert_eq!(days_between(day("2024-03-30"), day("2024-04-02")), 3);
        assert_eq!(days_between(day("2024-03-09"), day("2024-03-12")), 3);
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(parse_date("yesterday").is_none());
        assert!(parse_date("2024-13-01").is_none());
        assert_eq!(format_date(day(" 2024-02-29 ")), "2024-02-29");
    }

    #[test]
    fn fixed_clock_advances() {
        let mut clock = fixed_clock();
        clock.advance_days(3);
        assert_eq!(clock.today(), day("2024-01-04"));
        assert!(clock.is_fixed());

        let mut real = Clock::default_clock();
        real.advance_days(3);
        assert!(real.is_default());
    }
}
