use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

/// One completed session, recorded when tracking goes from active to idle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailySession {
    pub date: NaiveDate, // ⇔ "date" (TEXT "YYYY-MM-DD")
    #[serde(rename = "duration", deserialize_with = "millis_from_number")]
    pub duration_ms: u64, // ⇔ "duration" (milliseconds)
}

impl DailySession {
    pub fn new(date: NaiveDate, duration_ms: u64) -> Self {
        Self { date, duration_ms }
    }

    pub fn date_str(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }

    pub fn hours(&self) -> f64 {
        self.duration_ms as f64 / 3_600_000.0
    }

    pub fn meets_target(&self, target_ms: u64) -> bool {
        self.duration_ms >= target_ms
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawMillis {
    Exact(u64),
    Legacy(f64),
}

/// Durations are integer milliseconds. Older snapshots may carry fractional
/// values (e.g. `9.1 * 3600000`) or negatives: those are rounded and
/// clamped to zero.
fn millis_from_number<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    match RawMillis::deserialize(deserializer)? {
        RawMillis::Exact(ms) => Ok(ms),
        RawMillis::Legacy(raw) if raw.is_finite() => Ok(raw.max(0.0).round() as u64),
        RawMillis::Legacy(raw) => Err(serde::de::Error::custom(format!(
            "invalid duration value: {raw}"
        ))),
    }
}
