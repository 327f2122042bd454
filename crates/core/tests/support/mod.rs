//! Shared test support for core service tests.

pub mod fakes;

use atlas_domain::Profile;

/// Build a profile the way the directory adapter would emit it.
pub fn profile(profile_id: i64, name: &str, location: Option<&str>) -> Profile {
    let slug = name.to_ascii_lowercase();
    Profile {
        profile_id,
        name: name.to_string(),
        image_url: None,
        directory_url: format!("https://directory.test/directory/{slug}"),
        location: location.map(str::to_string),
    }
}
