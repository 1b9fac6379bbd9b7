//! Data models for the prediction service API and selector domain.
//!
//! The wire structures match the JSON contract of the squid prediction
//! service: a POST body of `{year, month}` and a response carrying an
//! ordered list of pre-rendered heatmap fragments.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::SquidmapError;

/// Years the prediction model covers.
///
/// The service is trained on a fixed window; anything outside it is
/// rejected at parse time rather than forwarded to the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Year {
    #[default]
    Y2023,
    Y2024,
    Y2025,
}

impl Year {
    /// All selectable years, in display order.
    pub const ALL: [Self; 3] = [Self::Y2023, Self::Y2024, Self::Y2025];

    /// Get the calendar year as an integer.
    #[must_use]
    pub const fn as_u16(self) -> u16 {
        match self {
            Self::Y2023 => 2023,
            Self::Y2024 => 2024,
            Self::Y2025 => 2025,
        }
    }
}

impl fmt::Display for Year {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u16())
    }
}

impl std::str::FromStr for Year {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "2023" => Ok(Self::Y2023),
            "2024" => Ok(Self::Y2024),
            "2025" => Ok(Self::Y2025),
            other => Err(format!("unknown year: {other} (expected 2023-2025)")),
        }
    }
}

/// Calendar month, invariant 1..=12.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Month(u8);

impl Month {
    /// Construct a month from its 1-based number.
    ///
    /// # Errors
    ///
    /// Returns an error if `n` is outside 1..=12.
    pub fn new(n: u8) -> Result<Self, String> {
        if (1..=12).contains(&n) {
            Ok(Self(n))
        } else {
            Err(format!("month {n} out of range [1, 12]"))
        }
    }

    /// All twelve months, January first.
    #[must_use]
    pub fn all() -> impl Iterator<Item = Self> {
        (1..=12).map(Self)
    }

    /// Get the 1-based month number.
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self.0
    }

    /// Get the English month name.
    #[must_use]
    pub fn name(self) -> &'static str {
        chrono::Month::try_from(self.0).map_or("Unknown", |m| m.name())
    }
}

impl Default for Month {
    fn default() -> Self {
        Self(1)
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Month {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let n: u8 = s
            .trim()
            .parse()
            .map_err(|e| format!("invalid month: {e}"))?;
        Self::new(n)
    }
}

/// Request body for the prediction endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct PredictRequest {
    pub year: u16,
    pub month: u8,
}

impl PredictRequest {
    #[must_use]
    pub const fn new(year: Year, month: Month) -> Self {
        Self {
            year: year.as_u16(),
            month: month.as_u8(),
        }
    }
}

/// Response body from the prediction endpoint.
///
/// `heatmaps` is an ordered sequence of opaque markup fragments; only the
/// first entry is displayed.
#[derive(Debug, Clone, Deserialize)]
pub struct PredictResponse {
    pub heatmaps: Vec<String>,
}

impl PredictResponse {
    /// Validate the response structure.
    pub fn validate(&self) -> Result<(), SquidmapError> {
        if self.heatmaps.is_empty() {
            return Err(SquidmapError::InvalidResponse(
                "response contained no heatmaps".into(),
            ));
        }
        Ok(())
    }

    /// Take the first heatmap fragment, consuming the response.
    #[must_use]
    pub fn into_first_heatmap(mut self) -> Option<String> {
        if self.heatmaps.is_empty() {
            None
        } else {
            Some(self.heatmaps.swap_remove(0))
        }
    }
}
