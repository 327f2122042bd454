//! Member directory API client
//!
//! Pages through the directory's profile listing endpoint and maps the wire
//! records into domain profiles. The listing is exposed as a lazy stream:
//! each page is fetched only when the consumer has drained the previous one,
//! and the first empty page ends the stream.

use std::collections::VecDeque;
use std::time::Duration;

use atlas_core::sync::ports::{ProfileSource, ProfileStream};
use atlas_domain::constants::DIRECTORY_PAGE_SIZE;
use atlas_domain::{AtlasError, Profile, Result};
use futures::stream::{self, StreamExt};
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::errors::InfraError;

/// Configuration for the directory client
#[derive(Debug, Clone)]
pub struct DirectoryClientConfig {
    /// Base URL of the directory site (e.g. "https://www.recurse.com")
    pub base_url: String,
    /// Personal access token sent as a bearer header
    pub access_token: String,
    /// Timeout for API requests
    pub timeout: Duration,
}

/// HTTP client for the member directory's profile listing.
pub struct DirectoryClient {
    http: reqwest::Client,
    base_url: String,
    access_token: String,
}

/// One profile record as served by the directory API.
#[derive(Debug, Clone, Deserialize)]
struct ProfileRecord {
    id: i64,
    name: String,
    image_path: Option<String>,
    slug: String,
    #[serde(default)]
    current_location: Option<CurrentLocation>,
}

#[derive(Debug, Clone, Deserialize)]
struct CurrentLocation {
    name: Option<String>,
}

impl ProfileRecord {
    fn into_profile(self, base_url: &str) -> Profile {
        Profile {
            profile_id: self.id,
            name: self.name,
            image_url: self.image_path,
            directory_url: format!("{base_url}/directory/{}", self.slug),
            location: self.current_location.and_then(|location| location.name),
        }
    }
}

#[derive(Default)]
struct PageState {
    offset: i64,
    buffered: VecDeque<Profile>,
    done: bool,
}

impl DirectoryClient {
    /// Create a new client from configuration.
    pub fn new(config: DirectoryClientConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|err| AtlasError::Config(format!("failed to build HTTP client: {err}")))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            access_token: config.access_token,
        })
    }

    /// Fetch one page of profiles at the given offset.
    #[instrument(skip(self))]
    async fn fetch_page(&self, offset: i64) -> Result<Vec<Profile>> {
        let url = format!("{}/api/v1/profiles", self.base_url);

        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.access_token)
            .query(&[("limit", DIRECTORY_PAGE_SIZE), ("offset", offset)])
            .send()
            .await
            .map_err(InfraError::from)?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(AtlasError::RemoteApi(format!(
                "directory API returned HTTP {status} for offset {offset}"
            )));
        }

        let records: Vec<ProfileRecord> = response.json().await.map_err(|err| {
            AtlasError::RemoteApi(format!("failed to parse directory page: {err}"))
        })?;

        debug!(offset, count = records.len(), "fetched directory page");

        Ok(records.into_iter().map(|record| record.into_profile(&self.base_url)).collect())
    }
}

impl ProfileSource for DirectoryClient {
    fn fetch_all(&self) -> ProfileStream<'_> {
        stream::try_unfold(PageState::default(), move |mut state| async move {
            loop {
                if let Some(profile) = state.buffered.pop_front() {
                    return Ok(Some((profile, state)));
                }
                if state.done {
                    return Ok(None);
                }

                let page = self.fetch_page(state.offset).await?;
                if page.is_empty() {
                    state.done = true;
                    continue;
                }

                state.offset += DIRECTORY_PAGE_SIZE;
                state.buffered.extend(page);
            }
        })
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_maps_to_profile_with_directory_url() {
        let record = ProfileRecord {
            id: 7,
            name: "Ada".into(),
            image_path: Some("/assets/ada.jpg".into()),
            slug: "ada".into(),
            current_location: Some(CurrentLocation { name: Some("Berlin".into()) }),
        };

        let profile = record.into_profile("https://directory.test");

        assert_eq!(profile.profile_id, 7);
        assert_eq!(profile.directory_url, "https://directory.test/directory/ada");
        assert_eq!(profile.location.as_deref(), Some("Berlin"));
    }

    #[test]
    fn missing_location_maps_to_none() {
        let json = r#"{"id": 9, "name": "Grace", "image_path": null, "slug": "grace"}"#;
        let record: ProfileRecord = serde_json::from_str(json).expect("record parses");

        let profile = record.into_profile("https://directory.test");

        assert!(profile.location.is_none());
        assert!(profile.image_url.is_none());
    }

    #[test]
    fn location_without_name_maps_to_none() {
        let json = r#"{"id": 9, "name": "Grace", "slug": "grace", "current_location": {}}"#;
        let record: ProfileRecord = serde_json::from_str(json).expect("record parses");

        assert!(record.into_profile("https://directory.test").location.is_none());
    }
}
