use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[cfg(feature = "ts")]
use ts_rs::TS;

/// The two restaurant locations whose inventory is tracked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(TS), ts(export))]
pub enum Venue {
    #[serde(rename = "PORT")]
    Port,
    #[serde(rename = "Диккенс")]
    Dickens,
}

impl Venue {
    /// Venue name as stored in entries and sent to the API
    pub fn as_str(&self) -> &'static str {
        match self {
            Venue::Port => "PORT",
            Venue::Dickens => "Диккенс",
        }
    }
}

impl fmt::Display for Venue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Venue {
    type Err = String;

    /// Accepts the stored names plus a latin alias for the second venue,
    /// case-insensitively, so it can be typed on any keyboard.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "port" => Ok(Venue::Port),
            "диккенс" | "dickens" => Ok(Venue::Dickens),
            other => Err(format!("Unknown venue: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_venue_parse() {
        assert_eq!("PORT".parse::<Venue>(), Ok(Venue::Port));
        assert_eq!("port".parse::<Venue>(), Ok(Venue::Port));
        assert_eq!("Диккенс".parse::<Venue>(), Ok(Venue::Dickens));
        assert_eq!("dickens".parse::<Venue>(), Ok(Venue::Dickens));
        assert!("harbour".parse::<Venue>().is_err());
    }

    #[test]
    fn test_venue_serializes_as_stored_name() {
        assert_eq!(serde_json::to_string(&Venue::Dickens).unwrap(), "\"Диккенс\"");
        assert_eq!(Venue::Port.to_string(), "PORT");
    }
}
