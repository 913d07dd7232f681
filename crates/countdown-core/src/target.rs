//! Target moment resolution.
//!
//! The countdown target is computed once per session. By default it is the
//! next New Year's midnight pinned to UTC+07:00 so that every viewer counts
//! down to the same absolute instant; `TargetZone::Local` gives each viewer
//! their own civil midnight instead.

use std::fmt;
use std::str::FromStr;

use chrono::{
    DateTime, Datelike, Duration, FixedOffset, Local, NaiveDate, Offset, TimeZone, Utc,
};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Default pinned offset, in seconds east of UTC.
pub const DEFAULT_OFFSET_SECS: i32 = 7 * 3600;

/// Which civil calendar decides when midnight happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetZone {
    /// The viewer's local timezone.
    Local,
    /// A fixed offset from UTC.
    Fixed(FixedOffset),
}

impl Default for TargetZone {
    fn default() -> Self {
        // Always in range, so the fallback is unreachable.
        TargetZone::Fixed(FixedOffset::east_opt(DEFAULT_OFFSET_SECS).unwrap_or(Utc.fix()))
    }
}

impl fmt::Display for TargetZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetZone::Local => f.write_str("local"),
            TargetZone::Fixed(offset) => write!(f, "{offset}"),
        }
    }
}

impl FromStr for TargetZone {
    type Err = ValidationError;

    /// Accepts `local`, `utc`, `Z`, or `+HH:MM` / `-HH:MM` / `+HH`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("local") {
            return Ok(TargetZone::Local);
        }
        if trimmed.eq_ignore_ascii_case("utc") || trimmed == "Z" {
            return Ok(TargetZone::Fixed(Utc.fix()));
        }

        let invalid = || ValidationError::InvalidZone(s.to_string());
        let (sign, rest) = match trimmed.as_bytes().first() {
            Some(b'+') => (1, &trimmed[1..]),
            Some(b'-') => (-1, &trimmed[1..]),
            _ => return Err(invalid()),
        };
        let (hours, minutes) = match rest.split_once(':') {
            Some((h, m)) => (h, m),
            None => (rest, "0"),
        };
        let hours: i32 = hours.parse().map_err(|_| invalid())?;
        let minutes: i32 = minutes.parse().map_err(|_| invalid())?;
        if !(0..=23).contains(&hours) || !(0..=59).contains(&minutes) {
            return Err(invalid());
        }
        FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
            .map(TargetZone::Fixed)
            .ok_or_else(invalid)
    }
}

/// How the session's target is chosen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetSpec {
    /// Midnight on January 1. With `year: None` this is the year after `now`.
    NewYear { zone: TargetZone, year: Option<i32> },
    /// A plain countdown of the given length starting at `now`.
    In(std::time::Duration),
}

impl Default for TargetSpec {
    fn default() -> Self {
        TargetSpec::NewYear {
            zone: TargetZone::default(),
            year: None,
        }
    }
}

/// The fixed instant a session counts down to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetMoment {
    pub instant: DateTime<Utc>,
    /// The year being celebrated, if this is a New Year target.
    pub year: Option<i32>,
    /// `local`, an offset like `+07:00`, or `timer` for plain countdowns.
    pub zone: String,
}

impl TargetMoment {
    /// Whole seconds left until the target, clamped at zero.
    pub fn seconds_until(&self, now: DateTime<Utc>) -> u64 {
        seconds_between(now, self.instant)
    }
}

/// `max(0, floor((target - now) / 1s))`.
pub fn seconds_between(now: DateTime<Utc>, target: DateTime<Utc>) -> u64 {
    let ms = (target - now).num_milliseconds();
    if ms <= 0 {
        0
    } else {
        (ms / 1000) as u64
    }
}

/// Resolve a [`TargetSpec`] against the current instant.
pub fn resolve_target(spec: &TargetSpec, now: DateTime<Utc>) -> TargetMoment {
    match spec {
        TargetSpec::NewYear { zone, year } => match year {
            Some(year) => new_year_of(*year, *zone),
            None => next_new_year(now, *zone),
        },
        TargetSpec::In(duration) => {
            let secs = i64::try_from(duration.as_secs()).unwrap_or(i64::MAX);
            let instant = Duration::try_seconds(secs)
                .and_then(|d| now.checked_add_signed(d))
                .unwrap_or(DateTime::<Utc>::MAX_UTC);
            TargetMoment {
                instant,
                year: None,
                zone: "timer".into(),
            }
        }
    }
}

/// The next January 1, 00:00:00 after `now` in the given zone.
pub fn next_new_year(now: DateTime<Utc>, zone: TargetZone) -> TargetMoment {
    let year = match zone {
        TargetZone::Local => now.with_timezone(&Local).year() + 1,
        TargetZone::Fixed(offset) => now.with_timezone(&offset).year() + 1,
    };
    new_year_of(year, zone)
}

/// January 1, 00:00:00 of `year` in the given zone.
pub fn new_year_of(year: i32, zone: TargetZone) -> TargetMoment {
    let instant = match zone {
        TargetZone::Local => midnight_jan1(&Local, year),
        TargetZone::Fixed(offset) => midnight_jan1(&offset, year),
    };
    TargetMoment {
        instant,
        year: Some(year),
        zone: zone.to_string(),
    }
}

fn midnight_jan1<Tz: TimeZone>(tz: &Tz, year: i32) -> DateTime<Utc> {
    let Some(naive) = NaiveDate::from_ymd_opt(year, 1, 1).and_then(|d| d.and_hms_opt(0, 0, 0))
    else {
        return DateTime::<Utc>::MAX_UTC;
    };
    // A midnight inside a DST gap moves forward to the first valid instant.
    (0..=3)
        .find_map(|h| tz.from_local_datetime(&(naive + Duration::hours(h))).earliest())
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| Utc.from_utc_datetime(&naive))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plus7() -> TargetZone {
        TargetZone::default()
    }

    #[test]
    fn default_zone_is_plus_seven() {
        assert_eq!(plus7().to_string(), "+07:00");
    }

    #[test]
    fn next_new_year_in_fixed_offset() {
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        let target = next_new_year(now, plus7());
        assert_eq!(target.year, Some(2026));
        assert_eq!(
            target.instant,
            Utc.with_ymd_and_hms(2025, 12, 31, 17, 0, 0).unwrap()
        );
    }

    #[test]
    fn new_year_already_passed_in_offset_rolls_forward() {
        // 18:00 UTC on Dec 31 is already Jan 1 at +07:00.
        let now = Utc.with_ymd_and_hms(2025, 12, 31, 18, 0, 0).unwrap();
        let target = next_new_year(now, plus7());
        assert_eq!(target.year, Some(2027));
    }

    #[test]
    fn seconds_clamp_at_zero() {
        let target = new_year_of(2026, plus7());
        assert_eq!(target.seconds_until(target.instant), 0);
        assert_eq!(
            target.seconds_until(target.instant + Duration::seconds(30)),
            0
        );
    }

    #[test]
    fn seconds_floor_partial_seconds() {
        let target = new_year_of(2026, plus7());
        let now = target.instant - Duration::milliseconds(1999);
        assert_eq!(target.seconds_until(now), 1);
        let now = target.instant - Duration::milliseconds(999);
        assert_eq!(target.seconds_until(now), 0);
    }

    #[test]
    fn explicit_year_is_honoured() {
        let now = Utc.with_ymd_and_hms(2030, 3, 1, 0, 0, 0).unwrap();
        let spec = TargetSpec::NewYear {
            zone: plus7(),
            year: Some(2026),
        };
        let target = resolve_target(&spec, now);
        assert_eq!(target.year, Some(2026));
        assert_eq!(target.seconds_until(now), 0);
    }

    #[test]
    fn duration_target_is_relative_to_now() {
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let target = resolve_target(&TargetSpec::In(std::time::Duration::from_secs(90)), now);
        assert_eq!(target.seconds_until(now), 90);
        assert_eq!(target.year, None);
        assert_eq!(target.zone, "timer");
    }

    #[test]
    fn parses_zones() {
        assert_eq!("local".parse::<TargetZone>().unwrap(), TargetZone::Local);
        assert_eq!("+07:00".parse::<TargetZone>().unwrap(), plus7());
        assert_eq!("+7".parse::<TargetZone>().unwrap(), plus7());
        assert_eq!(
            "-05:30".parse::<TargetZone>().unwrap(),
            TargetZone::Fixed(FixedOffset::west_opt(5 * 3600 + 1800).unwrap())
        );
        assert_eq!(
            "utc".parse::<TargetZone>().unwrap(),
            TargetZone::Fixed(Utc.fix())
        );
        assert!("tomorrow".parse::<TargetZone>().is_err());
        assert!("+25:00".parse::<TargetZone>().is_err());
    }
}
