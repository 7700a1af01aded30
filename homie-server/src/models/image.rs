//! Device image path resolution
//!
//! Admin clients resolve what the user typed into a servable path before
//! submitting it. The server stores whatever it receives.

/// Directory that bare image names are placed in
pub const IMAGE_DIR: &str = "images";

/// Extension appended to names that carry none
pub const DEFAULT_IMAGE_EXTENSION: &str = "png";

/// Fallback asset for devices without an image
pub const DEFAULT_IMAGE: &str = "images/default.png";

/// Resolve a user-entered image name into a path.
///
/// # Rules
/// - Empty input falls back to [`DEFAULT_IMAGE`]
/// - A name without a `.` gets `.png` appended
/// - A name without a `/` is placed under `images/`
///
/// # Example
/// ```
/// use homie_server::models::image::resolve_image;
///
/// assert_eq!(resolve_image("lampe"), "images/lampe.png");
/// assert_eq!(resolve_image("photos/lampe.jpg"), "photos/lampe.jpg");
/// ```
pub fn resolve_image(raw: &str) -> String {
    let raw = raw.trim();
    if raw.is_empty() {
        return DEFAULT_IMAGE.to_owned();
    }

    let mut name = raw.to_owned();
    if !name.contains('.') {
        name.push('.');
        name.push_str(DEFAULT_IMAGE_EXTENSION);
    }

    if name.contains('/') {
        name
    } else {
        format!("{}/{}", IMAGE_DIR, name)
    }
}
