use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::ops::Deref;
use std::str::FromStr;
use thiserror::Error;

const MANDRILL_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A timestamp as Mandrill writes it, e.g. `"2013-01-01 15:30:27"`.
///
/// The service omits the timezone; all values are UTC. Fractional seconds
/// are accepted when parsing but dropped by `Display` and `Serialize`, so
/// a round trip keeps whole-second precision only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MandrillTime(pub DateTime<Utc>);

impl MandrillTime {
    /// Returns the wrapped UTC timestamp
    pub fn into_inner(self) -> DateTime<Utc> {
        self.0
    }
}

impl FromStr for MandrillTime {
    type Err = chrono::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDateTime::parse_from_str(s.trim(), "%Y-%m-%d %H:%M:%S%.f")
            .map(|naive| MandrillTime(naive.and_utc()))
    }
}

impl fmt::Display for MandrillTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(MANDRILL_TIME_FORMAT))
    }
}

impl Deref for MandrillTime {
    type Target = DateTime<Utc>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<DateTime<Utc>> for MandrillTime {
    fn from(value: DateTime<Utc>) -> Self {
        MandrillTime(value)
    }
}

impl Serialize for MandrillTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MandrillTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(|err| {
            serde::de::Error::custom(format!("invalid Mandrill timestamp {raw:?}: {err}"))
        })
    }
}

/// Account information returned by `users/info.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    pub created_at: MandrillTime,
    pub public_id: String,
    pub reputation: i64,
    pub hourly_quota: i64,
    pub backlog: i64,
    pub stats: Stat,
}

/// Sending statistics aggregated over the five fixed time windows
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stat {
    pub today: StatInfo,
    pub last_7_days: StatInfo,
    pub last_30_days: StatInfo,
    pub last_90_days: StatInfo,
    pub all_time: StatInfo,
}

/// Counters for a single time window.
///
/// Counters the service leaves out decode as zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatInfo {
    pub sent: u64,
    pub hard_bounces: u64,
    pub soft_bounces: u64,
    pub rejects: u64,
    pub complaints: u64,
    pub unsubs: u64,
    pub opens: u64,
    pub unique_opens: u64,
    pub clicks: u64,
    pub unique_clicks: u64,
}

/// A sender address with its lifetime counters, as listed by `users/senders.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sender {
    pub address: String,
    pub created_at: MandrillTime,
    #[serde(default)]
    pub sent: u64,
    #[serde(default)]
    pub hard_bounces: u64,
    #[serde(default)]
    pub soft_bounces: u64,
    #[serde(default)]
    pub rejects: u64,
    #[serde(default)]
    pub complaints: u64,
    #[serde(default)]
    pub unsubs: u64,
    #[serde(default)]
    pub opens: u64,
    #[serde(default)]
    pub clicks: u64,
    #[serde(default)]
    pub unique_opens: u64,
    #[serde(default)]
    pub unique_clicks: u64,
}

/// Error payload the service sends alongside an HTTP 500
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("{name} ({code}): {message}")]
pub struct ApiError {
    pub status: String,
    pub code: i64,
    pub name: String,
    pub message: String,
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn parses_service_timestamp() {
        let t: MandrillTime = "2013-01-01 15:30:27".parse().unwrap();
        assert_eq!(t.year(), 2013);
        assert_eq!(t.hour(), 15);
        assert_eq!(t.second(), 27);
        assert_eq!(t.to_string(), "2013-01-01 15:30:27");
    }

    #[test]
    fn fractional_seconds_are_dropped_on_display() {
        let frac: MandrillTime = "2013-01-01 15:30:27.12345".parse().unwrap();
        assert_eq!(frac.nanosecond(), 123_450_000);
        assert_eq!(frac.to_string(), "2013-01-01 15:30:27");
    }

    #[test]
    fn rejects_other_timestamp_formats() {
        assert!("2013-01-01T17:30:27+02:00".parse::<MandrillTime>().is_err());
        assert!("2013-01-01 15:30".parse::<MandrillTime>().is_err());
    }

    #[test]
    fn rejects_malformed_timestamp() {
        assert!("01/01/2013".parse::<MandrillTime>().is_err());
        assert!("".parse::<MandrillTime>().is_err());

        let err = serde_json::from_str::<MandrillTime>("\"yesterday\"").unwrap_err();
        assert!(err.to_string().contains("invalid Mandrill timestamp"));
    }

    #[test]
    fn decodes_user_payload() {
        let body = r#"{
            "username": "myusername",
            "created_at": "2013-01-01 15:30:27",
            "public_id": "aaabbbccc112233",
            "reputation": 42,
            "hourly_quota": 42,
            "backlog": 0,
            "stats": {
                "today": {"sent": 42, "hard_bounces": 1, "soft_bounces": 2, "rejects": 3,
                          "complaints": 0, "unsubs": 0, "opens": 10, "unique_opens": 8,
                          "clicks": 5, "unique_clicks": 4},
                "last_7_days": {"sent": 100},
                "last_30_days": {},
                "last_90_days": {},
                "all_time": {"sent": 1000, "opens": 300}
            }
        }"#;
        let user: User = serde_json::from_str(body).unwrap();
        assert_eq!(user.username, "myusername");
        assert_eq!(user.stats.today.rejects, 3);
        assert_eq!(user.stats.last_7_days.sent, 100);
        assert_eq!(user.stats.last_30_days, StatInfo::default());
        assert_eq!(user.stats.all_time.opens, 300);
    }

    #[test]
    fn user_without_stats_is_rejected() {
        let body = r#"{"username": "u", "created_at": "2013-01-01 15:30:27",
                       "public_id": "p", "reputation": 1, "hourly_quota": 1, "backlog": 0}"#;
        assert!(serde_json::from_str::<User>(body).is_err());
    }

    #[test]
    fn mistyped_counter_is_rejected() {
        assert!(serde_json::from_str::<StatInfo>(r#"{"sent": "x"}"#).is_err());
        assert!(serde_json::from_str::<StatInfo>(r#"{"opens": -1}"#).is_err());
    }

    #[test]
    fn stat_requires_every_bucket() {
        let body = r#"{"today": {}, "last_7_days": {}, "last_30_days": {}, "all_time": {}}"#;
        let err = serde_json::from_str::<Stat>(body).unwrap_err();
        assert!(err.to_string().contains("last_90_days"));
    }

    #[test]
    fn api_error_display() {
        let err: ApiError = serde_json::from_str(
            r#"{"status":"error","code":-1,"name":"Invalid_Key","message":"Invalid API key"}"#,
        )
        .unwrap();
        assert_eq!(err.to_string(), "Invalid_Key (-1): Invalid API key");
    }
}
