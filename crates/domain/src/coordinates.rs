//! Site map coordinate codec.
//!
//! Coordinates place a permit on the 2D site plan. Both axes are percentages
//! of the plan extent, so each component must be finite and within
//! `[COORDINATE_MIN, COORDINATE_MAX]`.
//!
//! Accepted textual encodings:
//!
//! - `"x;y"` (semicolon takes precedence when present),
//! - `"x,y"`,
//! - a JSON object string `{"x": <number>, "y": <number>}`.
//!
//! A string whose first non-blank character is `{` is always read as JSON, so
//! the comma inside an object literal never triggers the `"x,y"` branch.
//! The canonical persisted form is `"x,y"` with shortest round-trip decimals.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::Serialize;
use serde_json::Value;
use sika_core::{AppError, AppResult};

/// Lower bound for both axes.
pub const COORDINATE_MIN: f64 = 0.0;

/// Upper bound for both axes.
pub const COORDINATE_MAX: f64 = 100.0;

/// A validated point on the site plan.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SiteCoordinates {
    x: f64,
    y: f64,
}

impl SiteCoordinates {
    /// Creates a validated coordinate pair.
    pub fn new(x: f64, y: f64) -> AppResult<Self> {
        validate_axis("x", x)?;
        validate_axis("y", y)?;
        Ok(Self { x, y })
    }

    /// Returns the horizontal component.
    #[must_use]
    pub fn x(&self) -> f64 {
        self.x
    }

    /// Returns the vertical component.
    #[must_use]
    pub fn y(&self) -> f64 {
        self.y
    }

    /// Parses any accepted textual encoding.
    pub fn parse(input: &str) -> AppResult<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(AppError::Validation(
                "coordinates must not be empty".to_owned(),
            ));
        }

        if trimmed.starts_with('{') {
            let value = serde_json::from_str::<Value>(trimmed).map_err(|error| {
                AppError::Validation(format!("coordinates are not valid JSON: {error}"))
            })?;
            return Self::from_object(&value);
        }

        if let Some((x, y)) = trimmed.split_once(';') {
            return Self::from_parts(x, y);
        }

        if let Some((x, y)) = trimmed.split_once(',') {
            return Self::from_parts(x, y);
        }

        Err(AppError::Validation(format!(
            "unrecognized coordinates '{trimmed}', expected \"x,y\", \"x;y\" or {{\"x\":..,\"y\":..}}"
        )))
    }

    /// Reads coordinates from a JSON transport value.
    ///
    /// Strings go through [`SiteCoordinates::parse`]; objects must carry numeric
    /// `x` and `y` members. `null` and every other shape are rejected.
    pub fn from_value(value: &Value) -> AppResult<Self> {
        match value {
            Value::String(text) => Self::parse(text),
            Value::Object(_) => Self::from_object(value),
            Value::Null => Err(AppError::Validation(
                "coordinates must not be null".to_owned(),
            )),
            _ => Err(AppError::Validation(
                "coordinates must be a string or an {x, y} object".to_owned(),
            )),
        }
    }

    /// Returns the canonical persisted form `"x,y"`.
    #[must_use]
    pub fn to_storage_string(&self) -> String {
        format!("{},{}", self.x, self.y)
    }

    fn from_parts(x: &str, y: &str) -> AppResult<Self> {
        Self::new(parse_axis("x", x)?, parse_axis("y", y)?)
    }

    fn from_object(value: &Value) -> AppResult<Self> {
        let object = value.as_object().ok_or_else(|| {
            AppError::Validation("coordinates JSON must be an object".to_owned())
        })?;

        let axis = |name: &str| {
            object.get(name).and_then(Value::as_f64).ok_or_else(|| {
                AppError::Validation(format!("coordinates JSON must have a numeric '{name}'"))
            })
        };

        Self::new(axis("x")?, axis("y")?)
    }
}

impl Display for SiteCoordinates {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{},{}", self.x, self.y)
    }
}

impl FromStr for SiteCoordinates {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
    }
}

fn parse_axis(axis: &str, raw: &str) -> AppResult<f64> {
    raw.trim().parse::<f64>().map_err(|_| {
        AppError::Validation(format!("coordinate {axis} '{}' is not a number", raw.trim()))
    })
}

fn validate_axis(axis: &str, value: f64) -> AppResult<()> {
    if !value.is_finite() {
        return Err(AppError::Validation(format!(
            "coordinate {axis} must be a finite number"
        )));
    }

    if !(COORDINATE_MIN..=COORDINATE_MAX).contains(&value) {
        return Err(AppError::Validation(format!(
            "coordinate {axis} must be between {COORDINATE_MIN} and {COORDINATE_MAX}, got {value}"
        )));
    }

    Ok(())
}
