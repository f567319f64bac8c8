//! Weekly consultation schedule.
//!
//! `time_slots` arrives either as a JSON object keyed by day name or as a string containing
//! such an object. Both decode into a fixed seven-slot [`WeeklySchedule`]. Unknown keys are
//! ignored and an undecodable value yields an empty schedule.

use chrono::Weekday;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

const DAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Opening hours per day of the week, Monday first.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WeeklySchedule {
    slots: [Option<String>; 7],
}

impl WeeklySchedule {
    pub fn get(&self, day: Weekday) -> Option<&str> {
        self.slots[day.num_days_from_monday() as usize].as_deref()
    }

    pub fn set(&mut self, day: Weekday, hours: impl Into<String>) {
        self.slots[day.num_days_from_monday() as usize] = Some(hours.into());
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// Days that have hours set, Monday first.
    pub fn days(&self) -> impl Iterator<Item = (Weekday, &str)> + '_ {
        DAYS.iter()
            .filter_map(move |day| self.get(*day).map(|hours| (*day, hours)))
    }

    fn from_object(object: &Map<String, Value>) -> Self {
        let mut schedule = Self::default();
        for (key, value) in object {
            let Ok(day) = key.trim().parse::<Weekday>() else {
                tracing::debug!("ignoring unknown schedule key {key:?}");
                continue;
            };
            let hours = match value {
                Value::String(s) => s.trim().to_owned(),
                Value::Null => continue,
                other => other.to_string(),
            };
            if !hours.is_empty() {
                schedule.set(day, hours);
            }
        }
        schedule
    }

    fn from_value(value: Value) -> Self {
        match value {
            Value::Object(object) => Self::from_object(&object),
            Value::String(encoded) if encoded.trim().is_empty() => Self::default(),
            Value::String(encoded) => match serde_json::from_str::<Value>(&encoded) {
                Ok(Value::Object(object)) => Self::from_object(&object),
                _ => {
                    tracing::warn!("time_slots is not a JSON object; using an empty schedule");
                    Self::default()
                }
            },
            Value::Null => Self::default(),
            _ => {
                tracing::warn!("time_slots has an unsupported shape; using an empty schedule");
                Self::default()
            }
        }
    }
}

fn day_key(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "monday",
        Weekday::Tue => "tuesday",
        Weekday::Wed => "wednesday",
        Weekday::Thu => "thursday",
        Weekday::Fri => "friday",
        Weekday::Sat => "saturday",
        Weekday::Sun => "sunday",
    }
}

impl Serialize for WeeklySchedule {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(None)?;
        for (day, hours) in self.days() {
            map.serialize_entry(day_key(day), hours)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for WeeklySchedule {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Self::from_value(Value::deserialize(deserializer)?))
    }
}
