//! Device search filter
//!
//! Free text matches name, type, room or any linked category name
//! (case-insensitive substring). Power bounds are inclusive.

use serde::Deserialize;

use super::device::Device;
use super::validation::ValidationError;

/// Query string for `GET /devices/search`.
///
/// Bounds are kept as strings so an empty `powermin=` means "no bound"
/// rather than a parse failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
    pub powermin: Option<String>,
    pub powermax: Option<String>,
}

/// Validated search criteria
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceFilter {
    query: Option<String>,
    power_min: Option<f64>,
    power_max: Option<f64>,
}

impl DeviceFilter {
    /// Build a filter; at least one criterion is required.
    pub fn new(params: &SearchParams) -> Result<Self, ValidationError> {
        let query = params
            .q
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(str::to_lowercase);
        let power_min = bound(params.powermin.as_deref(), "powermin")?;
        let power_max = bound(params.powermax.as_deref(), "powermax")?;

        if query.is_none() && power_min.is_none() && power_max.is_none() {
            return Err(ValidationError::Missing { field: "q" });
        }

        if let (Some(min), Some(max)) = (power_min, power_max) {
            if min > max {
                return Err(ValidationError::InvalidFormat {
                    field: "powermin",
                    reason: "must not exceed powermax",
                });
            }
        }

        Ok(Self {
            query,
            power_min,
            power_max,
        })
    }

    pub fn matches(&self, device: &Device) -> bool {
        self.matches_text(device) && self.matches_power(device.power)
    }

    fn matches_text(&self, device: &Device) -> bool {
        let Some(query) = &self.query else {
            return true;
        };

        [&device.name, &device.kind, &device.room]
            .into_iter()
            .chain(device.categories.iter().map(|c| &c.name))
            .any(|field| field.to_lowercase().contains(query.as_str()))
    }

    fn matches_power(&self, power: f64) -> bool {
        self.power_min.map_or(true, |min| power >= min)
            && self.power_max.map_or(true, |max| power <= max)
    }
}

fn bound(value: Option<&str>, field: &'static str) -> Result<Option<f64>, ValidationError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => raw
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .map(Some)
            .ok_or(ValidationError::InvalidFormat {
                field,
                reason: "must be a number",
            }),
    }
}
