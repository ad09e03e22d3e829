//! Object key parsing.
//!
//! Uploaded captures are stored as `<device>/<traffic_type>/<attack>/<file_name>`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Separator between key segments.
pub const KEY_DELIMITER: char = '/';

/// Number of segments in a valid key.
pub const KEY_SEGMENTS: usize = 4;

/// Prefix under which quality artifacts are written.
pub const ARTIFACT_PREFIX: &str = "zero_to_one";

/// Semantic fields of an object key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectKeyFields {
    pub device: String,
    pub traffic_type: String,
    pub attack: String,
    pub file_name: String,
}

impl ObjectKeyFields {
    /// Split a key into its four segments.
    ///
    /// Keys with more or fewer segments, or with an empty segment, are
    /// rejected rather than truncated.
    pub fn parse(key: &str) -> Result<Self> {
        let segments: Vec<&str> = key.split(KEY_DELIMITER).collect();

        match segments.as_slice() {
            [device, traffic_type, attack, file_name]
                if segments.iter().all(|s| !s.is_empty()) =>
            {
                Ok(Self {
                    device: (*device).to_string(),
                    traffic_type: (*traffic_type).to_string(),
                    attack: (*attack).to_string(),
                    file_name: (*file_name).to_string(),
                })
            }
            _ => Err(Error::malformed_key(key, segments.len())),
        }
    }

    /// Key of the quality artifact derived from this object.
    pub fn artifact_key(&self) -> String {
        format!(
            "{}/{}_{}_{}",
            ARTIFACT_PREFIX, self.device, self.traffic_type, self.file_name
        )
    }
}

impl FromStr for ObjectKeyFields {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for ObjectKeyFields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}/{}",
            self.device, self.traffic_type, self.attack, self.file_name
        )
    }
}

/// First `/`-delimited segment of a key.
pub fn first_segment(key: &str) -> &str {
    key.split(KEY_DELIMITER).next().unwrap_or(key)
}
