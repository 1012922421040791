// ABOUTME: Peloton API integration: session login, catalog listings, and entity fetching
// ABOUTME: Converts platform DTOs into shared models; session state lives in an explicit client
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Peloton Mirror Contributors

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use url::Url;

use super::core::CatalogProvider;
use crate::config::{MirrorConfig, PelotonCredentials, DEFAULT_API_BASE};
use crate::errors::{MirrorError, MirrorResult};
use crate::models::{
    CategoryRecord, ClassPage, DeviceTypeMapping, InstructorRecord, WorkoutDetail, WorkoutRecord,
};
use crate::utils::http_client::session_client;

/// Listing page size for user workout and roster endpoints
const LISTING_LIMIT: usize = 100;

/// Category used to seed the browse-category discovery call
const SEED_CATEGORY: &str = "cycling";

/// Configuration for Peloton API integration
#[derive(Debug, Clone)]
pub struct PelotonApiConfig {
    /// API base URL
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Connection timeout in seconds
    pub connect_timeout_secs: u64,
}

impl Default for PelotonApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE.to_owned(),
            timeout_secs: 30,
            connect_timeout_secs: 10,
        }
    }
}

impl From<&MirrorConfig> for PelotonApiConfig {
    fn from(config: &MirrorConfig) -> Self {
        Self {
            base_url: config.api_base_url.clone(),
            timeout_secs: config.timeout_secs,
            connect_timeout_secs: config.connect_timeout_secs,
        }
    }
}

/// Reqwest-backed catalog provider holding an authenticated session
///
/// Construction goes through [`PelotonProvider::login`]: the session is an
/// explicitly created, explicitly owned object rather than ambient
/// process-wide state, so its lifetime is visible to the caller and a
/// second session never shares cookies with the first.
pub struct PelotonProvider {
    client: Client,
    base: Url,
}

impl PelotonProvider {
    /// Perform the session login and return an authenticated provider
    ///
    /// # Errors
    ///
    /// Returns `Config` for an unparseable base URL, `Transport` for a
    /// failed request, and `NotAuthenticated` when the platform rejects
    /// the credentials.
    pub async fn login(
        config: PelotonApiConfig,
        credentials: &PelotonCredentials,
    ) -> MirrorResult<Self> {
        let base = Url::parse(&config.base_url).map_err(|e| MirrorError::Config {
            detail: format!("invalid API base URL '{}': {e}", config.base_url),
        })?;

        let client = session_client(config.timeout_secs, config.connect_timeout_secs);

        let mut login_url = base.clone();
        login_url.set_path("/auth/login");

        let response = client
            .post(login_url)
            .json(&LoginRequest {
                username_or_email: &credentials.username_or_email,
                password: &credentials.password,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(MirrorError::NotAuthenticated {
                reason: format!("login rejected with status {status}"),
            });
        }

        info!(
            user = %credentials.username_or_email,
            "authenticated platform session established"
        );

        Ok(Self { client, base })
    }

    fn url_for(&self, path: &str) -> Url {
        let mut url = self.base.clone();
        url.set_path(path);
        url
    }

    /// GET a URL and decode its JSON body into `T`
    ///
    /// Non-success statuses become `Api` errors; an undecodable body
    /// becomes `MalformedResponse`. Callers that tolerate 404 check the
    /// status themselves via `get_json_optional`.
    async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        endpoint: &str,
    ) -> MirrorResult<T> {
        debug!(endpoint, "fetching");
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_else(|e| {
                warn!("failed to read error response body: {e}");
                "unable to read error response".to_owned()
            });
            return Err(MirrorError::api(status.as_u16(), endpoint, &body));
        }
        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| MirrorError::malformed(endpoint, e.to_string()))
    }

    /// GET a single-entity URL, mapping 404 to `Ok(None)`
    async fn get_json_optional<T: DeserializeOwned>(
        &self,
        url: Url,
        endpoint: &str,
    ) -> MirrorResult<Option<T>> {
        debug!(endpoint, "fetching");
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_else(|e| {
                warn!("failed to read error response body: {e}");
                "unable to read error response".to_owned()
            });
            return Err(MirrorError::api(status.as_u16(), endpoint, &body));
        }
        let text = response.text().await?;
        serde_json::from_str(&text)
            .map(Some)
            .map_err(|e| MirrorError::malformed(endpoint, e.to_string()))
    }
}

#[async_trait]
impl CatalogProvider for PelotonProvider {
    fn name(&self) -> &'static str {
        "peloton"
    }

    async fn list_categories(&self) -> MirrorResult<Vec<CategoryRecord>> {
        let mut url = self.url_for("/api/v2/ride/archived");
        url.query_pairs_mut()
            .append_pair("browse_category", SEED_CATEGORY)
            .append_pair("page", "0");

        let listing: ArchivedListing = self.get_json(url, "/api/v2/ride/archived").await?;
        Ok(listing
            .browse_categories
            .into_iter()
            .map(CategoryDto::into_record)
            .collect())
    }

    async fn class_page(&self, slug: &str, page: usize) -> MirrorResult<ClassPage> {
        let mut url = self.url_for("/api/v2/ride/archived");
        url.query_pairs_mut()
            .append_pair("browse_category", slug)
            .append_pair("page", &page.to_string());

        let listing: ArchivedListing = self.get_json(url, "/api/v2/ride/archived").await?;
        Ok(ClassPage {
            records: listing
                .data
                .into_iter()
                .map(RideSummary::into_record)
                .collect(),
            page_count: listing.page_count,
        })
    }

    async fn user_workout_page(&self, user_id: &str, page: usize) -> MirrorResult<ClassPage> {
        let mut url = self.url_for(&format!("/api/user/{user_id}/workouts"));
        url.query_pairs_mut()
            .append_pair("limit", &LISTING_LIMIT.to_string())
            .append_pair("page", &page.to_string());

        let listing: WorkoutListing = self.get_json(url, "/api/user/{id}/workouts").await?;
        Ok(ClassPage {
            records: listing
                .data
                .into_iter()
                .map(WorkoutSummary::into_record)
                .collect(),
            page_count: listing.page_count,
        })
    }

    async fn get_workout(&self, id: &str) -> MirrorResult<Option<WorkoutDetail>> {
        let url = self.url_for(&format!("/api/workout/{id}"));
        let detail: Option<WorkoutResponse> =
            self.get_json_optional(url, "/api/workout/{id}").await?;
        Ok(detail.map(WorkoutResponse::into_detail))
    }

    async fn get_instructor(&self, id: &str) -> MirrorResult<Option<InstructorRecord>> {
        let url = self.url_for(&format!("/api/instructor/{id}"));
        let dto: Option<InstructorDto> =
            self.get_json_optional(url, "/api/instructor/{id}").await?;
        Ok(dto.map(InstructorDto::into_record))
    }

    async fn list_instructors(&self) -> MirrorResult<Vec<InstructorRecord>> {
        let mut url = self.url_for("/api/instructor");
        url.query_pairs_mut()
            .append_pair("limit", &LISTING_LIMIT.to_string());

        let listing: InstructorListing = self.get_json(url, "/api/instructor").await?;
        Ok(listing
            .data
            .into_iter()
            .map(InstructorDto::into_record)
            .collect())
    }

    async fn device_type_mappings(&self) -> MirrorResult<Vec<DeviceTypeMapping>> {
        let url = self.url_for("/api/ride/metadata_mappings");
        let mappings: MetadataMappings =
            self.get_json(url, "/api/ride/metadata_mappings").await?;
        Ok(mappings
            .device_type_display_names
            .into_iter()
            .map(DeviceTypeDto::into_mapping)
            .collect())
    }
}

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    username_or_email: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct ArchivedListing {
    #[serde(default)]
    data: Vec<RideSummary>,
    #[serde(default)]
    page_count: usize,
    #[serde(default)]
    browse_categories: Vec<CategoryDto>,
}

#[derive(Debug, Deserialize)]
struct RideSummary {
    id: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    instructor_id: Option<String>,
    #[serde(default)]
    original_air_time: Option<i64>,
    #[serde(default)]
    duration: Option<u64>,
    #[serde(default)]
    fitness_discipline: Option<String>,
    #[serde(default)]
    content_format: Option<String>,
    #[serde(default)]
    difficulty_rating_avg: Option<f64>,
    #[serde(default)]
    difficulty_rating_count: Option<u64>,
    #[serde(default)]
    overall_rating_avg: Option<f64>,
    #[serde(default)]
    overall_rating_count: Option<u64>,
}

impl RideSummary {
    fn into_record(self) -> WorkoutRecord {
        WorkoutRecord {
            id: self.id,
            title: self.title,
            instructor_id: self.instructor_id,
            original_air_time: self
                .original_air_time
                .map(|epoch| epoch.to_string())
                .unwrap_or_default(),
            duration_seconds: self.duration,
            fitness_discipline: self.fitness_discipline,
            workout_type: None,
            live_or_on_demand: self.content_format,
            calories: None,
            total_output: None,
            avg_heart_rate: None,
            avg_cadence: None,
            difficulty_rating_avg: self.difficulty_rating_avg,
            difficulty_rating_count: self.difficulty_rating_count,
            overall_rating_avg: self.overall_rating_avg,
            overall_rating_count: self.overall_rating_count,
        }
    }
}

#[derive(Debug, Deserialize)]
struct WorkoutListing {
    #[serde(default)]
    data: Vec<WorkoutSummary>,
    #[serde(default)]
    page_count: usize,
}

#[derive(Debug, Deserialize)]
struct WorkoutSummary {
    id: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    workout_type: Option<String>,
    #[serde(default)]
    created_at: Option<i64>,
    #[serde(default)]
    fitness_discipline: Option<String>,
}

impl WorkoutSummary {
    fn into_record(self) -> WorkoutRecord {
        WorkoutRecord {
            id: self.id,
            title: self.name.unwrap_or_default(),
            // Workout listings carry no instructor id; the resolver
            // discovers one through the workout detail view
            instructor_id: None,
            original_air_time: self
                .created_at
                .map(|epoch| epoch.to_string())
                .unwrap_or_default(),
            duration_seconds: None,
            fitness_discipline: self.fitness_discipline,
            workout_type: self.workout_type,
            live_or_on_demand: None,
            calories: None,
            total_output: None,
            avg_heart_rate: None,
            avg_cadence: None,
            difficulty_rating_avg: None,
            difficulty_rating_count: None,
            overall_rating_avg: None,
            overall_rating_count: None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct WorkoutResponse {
    id: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    workout_type: Option<String>,
    #[serde(default)]
    ride: Option<RideRef>,
}

#[derive(Debug, Deserialize)]
struct RideRef {
    #[serde(default)]
    instructor_id: Option<String>,
}

impl WorkoutResponse {
    fn into_detail(self) -> WorkoutDetail {
        WorkoutDetail {
            id: self.id,
            name: self.name,
            workout_type: self.workout_type,
            instructor_id: self.ride.and_then(|r| r.instructor_id),
        }
    }
}

#[derive(Debug, Deserialize)]
struct CategoryDto {
    #[serde(default)]
    slug: String,
    #[serde(default)]
    name: String,
}

impl CategoryDto {
    fn into_record(self) -> CategoryRecord {
        CategoryRecord {
            slug: self.slug,
            name: self.name,
        }
    }
}

#[derive(Debug, Deserialize)]
struct InstructorListing {
    #[serde(default)]
    data: Vec<InstructorDto>,
}

#[derive(Debug, Deserialize)]
struct InstructorDto {
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    user_id: Option<String>,
    #[serde(default)]
    image_url: Option<String>,
    #[serde(default)]
    quote: Option<String>,
    #[serde(default)]
    bio: Option<String>,
}

impl InstructorDto {
    fn into_record(self) -> InstructorRecord {
        InstructorRecord {
            id: self.id,
            name: self.name,
            user_id: self.user_id,
            image_url: self.image_url,
            quote: self.quote,
            bio: self.bio,
        }
    }
}

#[derive(Debug, Deserialize)]
struct MetadataMappings {
    #[serde(default)]
    device_type_display_names: Vec<DeviceTypeDto>,
}

#[derive(Debug, Deserialize)]
struct DeviceTypeDto {
    #[serde(default)]
    device_type: String,
    #[serde(default)]
    display_name: String,
}

impl DeviceTypeDto {
    fn into_mapping(self) -> DeviceTypeMapping {
        DeviceTypeMapping {
            device_type: self.device_type,
            display_name: self.display_name,
        }
    }
}
