//! Session length options

use std::{fmt, time::Duration};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Identifier of a predefined session length
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
pub enum SessionKey {
    #[serde(rename = "60")]
    #[value(name = "60")]
    OneMinute,
    #[serde(rename = "180")]
    #[value(name = "180")]
    ThreeMinutes,
    #[serde(rename = "300")]
    #[value(name = "300")]
    FiveMinutes,
    #[serde(rename = "continuous")]
    #[value(name = "continuous")]
    Continuous,
}

impl SessionKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionKey::OneMinute => "60",
            SessionKey::ThreeMinutes => "180",
            SessionKey::FiveMinutes => "300",
            SessionKey::Continuous => "continuous",
        }
    }

    pub fn option(&self) -> &'static SessionOption {
        SessionOption::get(*self)
    }
}

impl fmt::Display for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A selectable session length; `seconds` is `None` for continuous sessions
#[derive(Debug, Serialize)]
pub struct SessionOption {
    pub key: SessionKey,
    pub label: &'static str,
    pub seconds: Option<u32>,
}

static SESSION_OPTIONS: [SessionOption; 4] = [
    SessionOption {
        key: SessionKey::OneMinute,
        label: "1 minute",
        seconds: Some(60),
    },
    SessionOption {
        key: SessionKey::ThreeMinutes,
        label: "3 minutes",
        seconds: Some(180),
    },
    SessionOption {
        key: SessionKey::FiveMinutes,
        label: "5 minutes",
        seconds: Some(300),
    },
    SessionOption {
        key: SessionKey::Continuous,
        label: "Continuous",
        seconds: None,
    },
];

impl SessionOption {
    pub fn get(key: SessionKey) -> &'static SessionOption {
        match key {
            SessionKey::OneMinute => &SESSION_OPTIONS[0],
            SessionKey::ThreeMinutes => &SESSION_OPTIONS[1],
            SessionKey::FiveMinutes => &SESSION_OPTIONS[2],
            SessionKey::Continuous => &SESSION_OPTIONS[3],
        }
    }

    pub fn all() -> &'static [SessionOption] {
        &SESSION_OPTIONS
    }

    /// Total session length, if the session is time-limited
    pub fn total(&self) -> Option<Duration> {
        self.seconds.map(|secs| Duration::from_secs(u64::from(secs)))
    }

    pub fn is_continuous(&self) -> bool {
        self.seconds.is_none()
    }
}
