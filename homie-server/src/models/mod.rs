//! Domain models with validation at construction
//!
//! All user input is validated when creating these types.
//! Invalid input returns ValidationError, not panic.

pub mod validation;
pub mod category;
pub mod device;
pub mod image;
pub mod search;

pub use validation::{required_id, required_text, LooseNumber, ValidationError};
pub use category::{Category, CategoryName};
pub use device::{Device, DeviceCategory, DeviceDraft, DeviceInput};
pub use search::{DeviceFilter, SearchParams};
