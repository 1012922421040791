// ABOUTME: Shared test fixtures: an in-memory catalog provider and record builders
// ABOUTME: Used by the sync engine, resolver, and storage integration tests
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Peloton Mirror Contributors

#![allow(dead_code)]
#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use peloton_mirror::errors::{MirrorError, MirrorResult};
use peloton_mirror::models::{
    CategoryRecord, ClassPage, DeviceTypeMapping, InstructorRecord, WorkoutDetail, WorkoutRecord,
};
use peloton_mirror::providers::CatalogProvider;

/// In-memory provider serving fixed listing pages and entity tables
pub struct MockProvider {
    pub pages: Vec<Vec<WorkoutRecord>>,
    pub instructors: HashMap<String, InstructorRecord>,
    pub workouts: HashMap<String, WorkoutDetail>,
    pub fail_pages: HashSet<usize>,
    pub instructor_calls: AtomicUsize,
}

impl MockProvider {
    pub fn new(pages: Vec<Vec<WorkoutRecord>>) -> Self {
        Self {
            pages,
            instructors: HashMap::new(),
            workouts: HashMap::new(),
            fail_pages: HashSet::new(),
            instructor_calls: AtomicUsize::new(0),
        }
    }

    pub fn with_instructor(mut self, record: InstructorRecord) -> Self {
        self.instructors.insert(record.id.clone(), record);
        self
    }

    pub fn with_workout_detail(mut self, detail: WorkoutDetail) -> Self {
        self.workouts.insert(detail.id.clone(), detail);
        self
    }

    pub fn failing_page(mut self, page: usize) -> Self {
        self.fail_pages.insert(page);
        self
    }

    pub fn instructor_calls(&self) -> usize {
        self.instructor_calls.load(Ordering::SeqCst)
    }

    fn page(&self, page: usize) -> MirrorResult<ClassPage> {
        if self.fail_pages.contains(&page) {
            return Err(MirrorError::malformed("mock", "page fixture marked failing"));
        }
        Ok(ClassPage {
            records: self.pages.get(page).cloned().unwrap_or_default(),
            // The listing reports the highest page index
            page_count: self.pages.len().saturating_sub(1),
        })
    }
}

#[async_trait]
impl CatalogProvider for MockProvider {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn list_categories(&self) -> MirrorResult<Vec<CategoryRecord>> {
        Ok(vec![CategoryRecord {
            slug: "cycling".to_owned(),
            name: "Cycling".to_owned(),
        }])
    }

    async fn class_page(&self, _slug: &str, page: usize) -> MirrorResult<ClassPage> {
        self.page(page)
    }

    async fn user_workout_page(&self, _user_id: &str, page: usize) -> MirrorResult<ClassPage> {
        self.page(page)
    }

    async fn get_workout(&self, id: &str) -> MirrorResult<Option<WorkoutDetail>> {
        Ok(self.workouts.get(id).cloned())
    }

    async fn get_instructor(&self, id: &str) -> MirrorResult<Option<InstructorRecord>> {
        self.instructor_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.instructors.get(id).cloned())
    }

    async fn list_instructors(&self) -> MirrorResult<Vec<InstructorRecord>> {
        Ok(self.instructors.values().cloned().collect())
    }

    async fn device_type_mappings(&self) -> MirrorResult<Vec<DeviceTypeMapping>> {
        Ok(Vec::new())
    }
}

/// Build a listing record with an epoch air time
pub fn record(id: &str, epoch: i64, instructor_id: Option<&str>) -> WorkoutRecord {
    WorkoutRecord {
        id: id.to_owned(),
        title: format!("30 min Ride {id}"),
        instructor_id: instructor_id.map(ToOwned::to_owned),
        original_air_time: epoch.to_string(),
        duration_seconds: Some(1800),
        fitness_discipline: Some("cycling".to_owned()),
        workout_type: Some("class".to_owned()),
        live_or_on_demand: Some("on_demand".to_owned()),
        calories: None,
        total_output: None,
        avg_heart_rate: None,
        avg_cadence: None,
        difficulty_rating_avg: Some(7.5),
        difficulty_rating_count: Some(120),
        overall_rating_avg: Some(0.98),
        overall_rating_count: Some(140),
    }
}

/// Build a roster record
pub fn instructor(id: &str, name: &str) -> InstructorRecord {
    InstructorRecord {
        id: id.to_owned(),
        name: name.to_owned(),
        user_id: Some(format!("user-{id}")),
        image_url: None,
        quote: Some("Together we go far".to_owned()),
        bio: None,
    }
}
