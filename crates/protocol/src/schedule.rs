//! Day-of-week opening hours.
//!
//! Times are persisted as `HH:MM:SS` strings. [`TimeOfDay`] keeps that
//! format on the wire and converts losslessly to and from the full
//! date-time values that time-picking widgets work with.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{ProtocolError, Result};

const WIRE_FORMAT: &str = "%H:%M:%S";

/// A time of day without a date, serialized as `HH:MM:SS`.
///
/// # Examples
///
/// ```
/// use wawidget_protocol::TimeOfDay;
///
/// let time: TimeOfDay = "08:30:15".parse().unwrap();
/// assert_eq!(time.to_string(), "08:30:15");
///
/// // Minute-only input reads as second zero
/// let time: TimeOfDay = "18:00".parse().unwrap();
/// assert_eq!(time.to_string(), "18:00:00");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimeOfDay(NaiveTime);

impl TimeOfDay {
    /// Creates a time from hour, minute and second.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::InvalidTime`] if any component is out of range.
    pub fn from_hms(hour: u32, minute: u32, second: u32) -> Result<Self> {
        NaiveTime::from_hms_opt(hour, minute, second)
            .map(Self)
            .ok_or_else(|| ProtocolError::InvalidTime(format!("{hour}:{minute}:{second}")))
    }

    /// Returns the wrapped chrono time.
    #[must_use]
    pub const fn as_naive(&self) -> NaiveTime {
        self.0
    }

    /// Places this time on `date`, for handing to a date-time picker.
    #[must_use]
    pub fn to_picker(self, date: NaiveDate) -> NaiveDateTime {
        date.and_time(self.0)
    }

    /// Reads the time back from a picker value, keeping its seconds.
    #[must_use]
    pub fn from_picker(value: &NaiveDateTime) -> Self {
        Self(value.time().with_nanosecond(0).unwrap_or_else(|| value.time()))
    }

    /// Returns a copy with a new hour and minute, keeping the seconds.
    ///
    /// This is the conversion for minute-granularity pickers.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::InvalidTime`] if `hour` or `minute` is out of range.
    ///
    /// # Examples
    ///
    /// ```
    /// use wawidget_protocol::TimeOfDay;
    ///
    /// let time: TimeOfDay = "08:30:15".parse().unwrap();
    /// assert_eq!(time.with_hour_minute(9, 40).unwrap().to_string(), "09:40:15");
    /// ```
    pub fn with_hour_minute(self, hour: u32, minute: u32) -> Result<Self> {
        Self::from_hms(hour, minute, self.0.second())
    }
}

impl From<NaiveTime> for TimeOfDay {
    fn from(time: NaiveTime) -> Self {
        Self(time)
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(WIRE_FORMAT))
    }
}

impl FromStr for TimeOfDay {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        NaiveTime::parse_from_str(s, WIRE_FORMAT)
            .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
            .map(Self)
            .map_err(|_| ProtocolError::InvalidTime(s.to_string()))
    }
}

impl Serialize for TimeOfDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TimeOfDay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Opening hours for one day of the week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    /// Identity of the day entry.
    pub id: i64,
    /// Display name of the day.
    #[serde(default)]
    pub day_name: String,
    /// Opening time.
    pub start_time: TimeOfDay,
    /// Closing time.
    pub end_time: TimeOfDay,
    /// Whether the day is open.
    #[serde(default)]
    pub active: bool,
}

impl Schedule {
    /// Returns a copy with a new opening time.
    #[must_use]
    pub fn with_start_time(mut self, time: TimeOfDay) -> Self {
        self.start_time = time;
        self
    }

    /// Returns a copy with a new closing time.
    #[must_use]
    pub fn with_end_time(mut self, time: TimeOfDay) -> Self {
        self.end_time = time;
        self
    }

    /// Returns a copy with the active flag flipped.
    #[must_use]
    pub fn toggled(mut self) -> Self {
        self.active = !self.active;
        self
    }
}

/// Replaces the entry whose identity matches `day`, leaving every other
/// entry untouched.
///
/// # Errors
///
/// Returns [`ProtocolError::ScheduleNotFound`] if no entry has `day.id`.
///
/// # Examples
///
/// ```
/// use wawidget_protocol::{Schedule, update_day};
///
/// let monday = Schedule {
///     id: 1,
///     day_name: "Lunes".into(),
///     start_time: "08:00:00".parse().unwrap(),
///     end_time: "18:00:00".parse().unwrap(),
///     active: true,
/// };
/// let schedules = vec![monday.clone()];
///
/// let updated = update_day(&schedules, monday.toggled()).unwrap();
/// assert!(!updated[0].active);
/// ```
pub fn update_day(schedules: &[Schedule], day: Schedule) -> Result<Vec<Schedule>> {
    if !schedules.iter().any(|s| s.id == day.id) {
        return Err(ProtocolError::ScheduleNotFound { id: day.id });
    }

    Ok(schedules
        .iter()
        .map(|s| if s.id == day.id { day.clone() } else { s.clone() })
        .collect())
}

/// Checks that no two entries share an identity.
///
/// # Errors
///
/// Returns [`ProtocolError::DuplicateSchedule`] naming the first repeated identity.
pub fn validate_schedules(schedules: &[Schedule]) -> Result<()> {
    let mut seen = std::collections::HashSet::new();
    for schedule in schedules {
        if !seen.insert(schedule.id) {
            return Err(ProtocolError::DuplicateSchedule { id: schedule.id });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(id: i64, name: &str) -> Schedule {
        Schedule {
            id,
            day_name: name.to_string(),
            start_time: "08:00:00".parse().unwrap(),
            end_time: "17:30:45".parse().unwrap(),
            active: true,
        }
    }

    #[test]
    fn time_of_day_rejects_garbage() {
        assert!("25:00:00".parse::<TimeOfDay>().is_err());
        assert!("noon".parse::<TimeOfDay>().is_err());
    }

    #[test]
    fn picker_roundtrip_keeps_seconds() {
        let time: TimeOfDay = "17:30:45".parse().unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();

        let picked = time.to_picker(date);
        assert_eq!(TimeOfDay::from_picker(&picked), time);
        assert_eq!(TimeOfDay::from_picker(&picked).to_string(), "17:30:45");
    }

    #[test]
    fn from_picker_drops_subsecond_noise() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let picked = date.and_hms_milli_opt(9, 15, 30, 250).unwrap();
        assert_eq!(TimeOfDay::from_picker(&picked).to_string(), "09:15:30");
    }

    #[test]
    fn schedule_wire_format() {
        let json = r#"{"id": 3, "day_name": "Miércoles", "start_time": "09:00:00", "end_time": "18:00:00", "active": false}"#;
        let schedule: Schedule = serde_json::from_str(json).unwrap();
        assert_eq!(schedule.start_time.to_string(), "09:00:00");

        let back = serde_json::to_value(&schedule).unwrap();
        assert_eq!(back["end_time"], "18:00:00");
    }

    #[test]
    fn update_day_replaces_only_match() {
        let schedules = vec![day(1, "Lunes"), day(2, "Martes"), day(3, "Miércoles")];
        let tuesday = schedules[1]
            .clone()
            .with_start_time("10:00:00".parse().unwrap());

        let updated = update_day(&schedules, tuesday).unwrap();
        assert_eq!(updated[1].start_time.to_string(), "10:00:00");
        assert_eq!(updated[0], schedules[0]);
        assert_eq!(updated[2], schedules[2]);
    }

    #[test]
    fn update_day_unknown_id_fails() {
        let schedules = vec![day(1, "Lunes")];
        let err = update_day(&schedules, day(9, "Domingo")).unwrap_err();
        assert_eq!(err, ProtocolError::ScheduleNotFound { id: 9 });
    }

    #[test]
    fn validate_schedules_detects_duplicates() {
        assert!(validate_schedules(&[day(1, "Lunes"), day(2, "Martes")]).is_ok());
        let err = validate_schedules(&[day(1, "Lunes"), day(1, "Lunes")]).unwrap_err();
        assert_eq!(err, ProtocolError::DuplicateSchedule { id: 1 });
    }
}
