//! Device input validation and the device record
//!
//! A device links to one or more categories through the `device_category`
//! join table. `DeviceDraft` is the validated write shape; `Device` is what
//! reads return, with the linked categories resolved to `{id, name}` pairs.

use serde::{Deserialize, Serialize};

use super::validation::{required_id, required_text, LooseNumber, ValidationError};

/// Raw device fields as submitted by a client.
///
/// Every field is optional here so that absence can be reported as a
/// validation error instead of a JSON parse failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeviceInput {
    pub id: Option<LooseNumber>,
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub power: Option<LooseNumber>,
    pub room: Option<String>,
    pub categories: Option<Vec<LooseNumber>>,
    pub image: Option<String>,
}

/// Validated device fields for insert or update
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceDraft {
    pub name: String,
    pub kind: String,
    /// Watts
    pub power: f64,
    pub room: String,
    pub image: String,
    /// Distinct category ids in submission order
    pub categories: Vec<i64>,
}

impl DeviceDraft {
    /// Validate every required field of a device.
    ///
    /// `name`, `type`, `power`, `room` and `image` must be present, and
    /// `categories` must hold at least one id. Repeated ids collapse to one.
    pub fn validate(input: &DeviceInput) -> Result<Self, ValidationError> {
        let name = required_text(input.name.as_deref(), "name")?;
        let kind = required_text(input.kind.as_deref(), "type")?;
        let power = input
            .power
            .as_ref()
            .ok_or(ValidationError::Missing { field: "power" })?
            .to_non_negative("power")?;
        let room = required_text(input.room.as_deref(), "room")?;
        let image = required_text(input.image.as_deref(), "image")?;
        let categories = category_ids(input.categories.as_deref())?;

        Ok(Self {
            name,
            kind,
            power,
            room,
            image,
            categories,
        })
    }

    /// Validate an update: the device id plus every create field.
    pub fn validate_with_id(input: &DeviceInput) -> Result<(i64, Self), ValidationError> {
        let id = required_id(input.id.as_ref(), "id")?;
        Ok((id, Self::validate(input)?))
    }
}

fn category_ids(values: Option<&[LooseNumber]>) -> Result<Vec<i64>, ValidationError> {
    let values = values.ok_or(ValidationError::Missing {
        field: "categories",
    })?;

    if values.is_empty() {
        return Err(ValidationError::Empty {
            field: "categories",
        });
    }

    let mut ids = Vec::with_capacity(values.len());
    for value in values {
        let id = value.to_id("categories")?;
        if !ids.contains(&id) {
            ids.push(id);
        }
    }
    Ok(ids)
}

/// Category reference embedded in a device
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceCategory {
    pub id: i64,
    pub name: String,
}

/// Device with its linked categories
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub power: f64,
    pub room: String,
    pub image: String,
    pub categories: Vec<DeviceCategory>,
}

impl Device {
    /// Ids of the linked categories, in stored order.
    pub fn category_ids(&self) -> Vec<i64> {
        self.categories.iter().map(|c| c.id).collect()
    }
}
