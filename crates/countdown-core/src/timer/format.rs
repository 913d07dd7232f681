use serde::{Deserialize, Serialize};

const SECS_PER_DAY: u64 = 86_400;
const SECS_PER_HOUR: u64 = 3_600;
const SECS_PER_MINUTE: u64 = 60;

/// Remaining time split into zero-padded display segments.
///
/// `days` is never truncated: more than 99 days simply renders with more
/// digits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeParts {
    pub days: String,
    pub hours: String,
    pub minutes: String,
    pub seconds: String,
}

impl TimeParts {
    pub fn from_seconds(total: u64) -> Self {
        let days = total / SECS_PER_DAY;
        let hours = (total % SECS_PER_DAY) / SECS_PER_HOUR;
        let minutes = (total % SECS_PER_HOUR) / SECS_PER_MINUTE;
        let seconds = total % SECS_PER_MINUTE;
        Self {
            days: format!("{days:02}"),
            hours: format!("{hours:02}"),
            minutes: format!("{minutes:02}"),
            seconds: format!("{seconds:02}"),
        }
    }
}

impl std::fmt::Display for TimeParts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}:{}:{}",
            self.days, self.hours, self.minutes, self.seconds
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parts(d: &str, h: &str, m: &str, s: &str) -> TimeParts {
        TimeParts {
            days: d.into(),
            hours: h.into(),
            minutes: m.into(),
            seconds: s.into(),
        }
    }

    #[test]
    fn one_hour_one_minute_one_second() {
        assert_eq!(TimeParts::from_seconds(3661), parts("00", "01", "01", "01"));
    }

    #[test]
    fn one_day_one_hour() {
        assert_eq!(TimeParts::from_seconds(90_000), parts("01", "01", "00", "00"));
    }

    #[test]
    fn zero() {
        assert_eq!(TimeParts::from_seconds(0), parts("00", "00", "00", "00"));
    }

    #[test]
    fn days_grow_past_two_digits() {
        let p = TimeParts::from_seconds(123 * 86_400 + 59);
        assert_eq!(p.days, "123");
        assert_eq!(p.seconds, "59");
        assert_eq!(p.to_string(), "123:00:00:59");
    }
}
