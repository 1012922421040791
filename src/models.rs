// ABOUTME: Shared domain models for catalog records, instructors, and mirror rows
// ABOUTME: The EnrichedWorkout field set is the CSV column contract with the dashboard consumer
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Peloton Mirror Contributors

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::features;

/// Serde adapter for the reserved missing-value token
///
/// The platform's workout export writes the literal string `None` where a
/// numeric metric is absent. Loose metric columns round-trip through this
/// adapter so `Option::None` serializes as the token and both the token and
/// the empty string deserialize back to `None`.
pub mod none_token {
    use serde::{Deserialize, Deserializer, Serializer};

    /// The reserved missing-value token in mirror CSV files
    pub const TOKEN: &str = "None";

    /// Serialize `None` as the reserved token
    ///
    /// # Errors
    ///
    /// Propagates serializer failures.
    pub fn serialize<S>(value: &Option<String>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(v) => serializer.serialize_str(v),
            None => serializer.serialize_str(TOKEN),
        }
    }

    /// Deserialize the reserved token (or an empty cell) as `None`
    ///
    /// # Errors
    ///
    /// Propagates deserializer failures.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        if raw.is_empty() || raw == TOKEN {
            Ok(None)
        } else {
            Ok(Some(raw))
        }
    }
}

/// One catalog class or completed workout as fetched from a remote listing
///
/// The identifier is the sole dedup key; everything else is carried as
/// loosely as the platform sends it and only normalized during enrichment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutRecord {
    /// Unique identifier within a mirror table
    pub id: String,
    /// Class or workout title
    pub title: String,
    /// Instructor identifier, absent for instructor-less content
    pub instructor_id: Option<String>,
    /// Original air time as received: epoch seconds or a datetime string
    pub original_air_time: String,
    /// Duration in seconds (canonical unit)
    pub duration_seconds: Option<u64>,
    /// Fitness discipline label (cycling, strength, yoga, ...)
    pub fitness_discipline: Option<String>,
    /// Workout type label, used as the last resolver fallback
    pub workout_type: Option<String>,
    /// Live vs on-demand label
    pub live_or_on_demand: Option<String>,
    /// Calories burned, loosely typed
    pub calories: Option<String>,
    /// Total output, loosely typed
    pub total_output: Option<String>,
    /// Average heart rate, loosely typed
    pub avg_heart_rate: Option<String>,
    /// Average cadence, loosely typed
    pub avg_cadence: Option<String>,
    /// Difficulty rating average
    pub difficulty_rating_avg: Option<f64>,
    /// Difficulty rating count
    pub difficulty_rating_count: Option<u64>,
    /// Overall rating average
    pub overall_rating_avg: Option<f64>,
    /// Overall rating count
    pub overall_rating_count: Option<u64>,
}

/// One mirror row: a `WorkoutRecord` plus the enrichment-derived columns
///
/// The field names here are the fixed CSV header contract shared with the
/// dashboard consumer. Rows are sorted descending by `air_time_epoch`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedWorkout {
    /// Unique identifier within a mirror table
    pub id: String,
    /// Class or workout title
    pub title: String,
    /// Instructor identifier, absent for instructor-less content
    pub instructor_id: Option<String>,
    /// Resolved instructor display name (or its fallback label)
    pub instructor_name: String,
    /// Normalized original air time, epoch seconds (sort key)
    pub air_time_epoch: i64,
    /// Normalized local display datetime, `YYYY-MM-DD HH:MM`
    pub air_datetime: String,
    /// English weekday name derived from the air time
    pub day_of_week: String,
    /// Time-of-day bucket label
    pub time_of_day: String,
    /// Month-year label, e.g. `September-21`
    pub month_year: String,
    /// Duration in seconds (canonical unit)
    pub duration_seconds: Option<u64>,
    /// Fitness discipline label
    pub fitness_discipline: Option<String>,
    /// Workout type label
    pub workout_type: Option<String>,
    /// Live vs on-demand label
    pub live_or_on_demand: Option<String>,
    /// Calories burned, loosely typed; absent values use the reserved token
    #[serde(with = "none_token")]
    pub calories: Option<String>,
    /// Total output, loosely typed; absent values use the reserved token
    #[serde(with = "none_token")]
    pub total_output: Option<String>,
    /// Average heart rate, loosely typed; absent values use the reserved token
    #[serde(with = "none_token")]
    pub avg_heart_rate: Option<String>,
    /// Average cadence, loosely typed; absent values use the reserved token
    #[serde(with = "none_token")]
    pub avg_cadence: Option<String>,
    /// Difficulty rating average
    pub difficulty_rating_avg: Option<f64>,
    /// Difficulty rating count
    pub difficulty_rating_count: Option<u64>,
    /// Overall rating average
    pub overall_rating_avg: Option<f64>,
    /// Overall rating count
    pub overall_rating_count: Option<u64>,
}

impl EnrichedWorkout {
    /// Build a mirror row from a raw record, its parsed air time, and a
    /// resolved instructor name
    #[must_use]
    pub fn from_record(
        record: WorkoutRecord,
        air_time: &DateTime<FixedOffset>,
        instructor_name: String,
    ) -> Self {
        Self {
            id: record.id,
            title: record.title,
            instructor_id: record.instructor_id,
            instructor_name,
            air_time_epoch: air_time.timestamp(),
            air_datetime: features::normalized_datetime(air_time),
            day_of_week: features::day_of_week(air_time),
            time_of_day: features::time_of_day_for(air_time).to_owned(),
            month_year: features::month_year(air_time),
            duration_seconds: record.duration_seconds,
            fitness_discipline: record.fitness_discipline,
            workout_type: record.workout_type,
            live_or_on_demand: record.live_or_on_demand,
            calories: record.calories,
            total_output: record.total_output,
            avg_heart_rate: record.avg_heart_rate,
            avg_cadence: record.avg_cadence,
            difficulty_rating_avg: record.difficulty_rating_avg,
            difficulty_rating_count: record.difficulty_rating_count,
            overall_rating_avg: record.overall_rating_avg,
            overall_rating_count: record.overall_rating_count,
        }
    }
}

/// One instructor from the platform roster
///
/// The name is treated as immutable once cached; extra roster fields are
/// tolerated on fetch and dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstructorRecord {
    /// Instructor identifier (cache key)
    pub id: String,
    /// Display name
    pub name: String,
    /// Platform user identifier, used to fetch the instructor's own workouts
    pub user_id: Option<String>,
    /// Hero/profile image URL
    pub image_url: Option<String>,
    /// Signature quote
    pub quote: Option<String>,
    /// Biography text
    pub bio: Option<String>,
}

/// One browse category from the archived-class listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRecord {
    /// Categorical token identifying the category in listing URLs
    pub slug: String,
    /// Display name
    pub name: String,
}

/// Detail view of a single workout, used for instructor discovery
///
/// User-workout listings do not carry an instructor identifier; the
/// resolver fetches this detail to find one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutDetail {
    /// Workout identifier
    pub id: String,
    /// Workout display name
    pub name: Option<String>,
    /// Workout type label
    pub workout_type: Option<String>,
    /// Instructor identifier from the underlying ride, when present
    pub instructor_id: Option<String>,
}

/// One page of a remote listing plus its total page count
#[derive(Debug, Clone, Default)]
pub struct ClassPage {
    /// Records on this page, newest first
    pub records: Vec<WorkoutRecord>,
    /// Total number of pages in the listing
    pub page_count: usize,
}

/// Device-type identifier to display-name mapping from ride metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceTypeMapping {
    /// Internal device type token
    pub device_type: String,
    /// Human-readable display name
    pub display_name: String,
}
