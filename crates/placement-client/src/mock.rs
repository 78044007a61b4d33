//! In-memory content API for testing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use placement_core::bank::{BankOwner, BankSummary, QuestionBank};
use placement_core::curriculum::{Level, Unit};
use placement_core::model::Id;
use placement_core::traits::{
    ContentApi, MediaKind, MediaUploader, UploadRequest, UploadedMedia,
};
use placement_core::ApiError;

use crate::media::thumbnail_url;

/// A content API backed by fixed data, for exercising scans without a server.
#[derive(Default)]
pub struct MockApi {
    levels: Vec<Level>,
    units: HashMap<Id, Vec<Unit>>,
    summaries: HashMap<BankOwner, BankSummary>,
    banks: HashMap<Id, QuestionBank>,
    failures: HashMap<BankOwner, ApiError>,
    call_count: AtomicU32,
}

impl MockApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a level with the given id.
    pub fn with_level(mut self, id: Id, code: &str, name: &str) -> Self {
        let mut level = Level::new(code, name);
        level.id = Some(id);
        self.levels.push(level);
        self
    }

    /// Add a unit with the given id under `level`.
    pub fn with_unit(mut self, level: Id, id: Id, title: &str) -> Self {
        let mut unit = Unit::new(level, title);
        unit.id = Some(id);
        unit.order = self.units.get(&level).map_or(0, |u| u.len() as u32);
        self.units.entry(level).or_default().push(unit);
        self
    }

    pub fn with_summary(mut self, owner: BankOwner, summary: BankSummary) -> Self {
        self.summaries.insert(owner, summary);
        self
    }

    pub fn with_bank(mut self, bank: QuestionBank) -> Self {
        self.banks.insert(bank.id, bank);
        self
    }

    /// Make every fetch of `owner`'s bank fail.
    pub fn with_failure(mut self, owner: BankOwner, error: ApiError) -> Self {
        self.failures.insert(owner, error);
        self
    }

    /// Number of bank summary requests served.
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl ContentApi for MockApi {
    fn name(&self) -> &str {
        "mock"
    }

    async fn bank_summary(&self, owner: BankOwner) -> Result<BankSummary, ApiError> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        if let Some(error) = self.failures.get(&owner) {
            return Err(error.clone());
        }
        self.summaries
            .get(&owner)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(format!("question bank for {owner}")))
    }

    async fn question_bank(&self, id: Id) -> Result<QuestionBank, ApiError> {
        self.banks
            .get(&id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(format!("question bank {id}")))
    }

    async fn list_levels(&self) -> Result<Vec<Level>, ApiError> {
        Ok(self.levels.clone())
    }

    async fn list_units(&self, level: Id) -> Result<Vec<Unit>, ApiError> {
        Ok(self.units.get(&level).cloned().unwrap_or_default())
    }
}

/// Records uploads and hands back predictable URLs.
#[derive(Default)]
pub struct MockUploader {
    uploads: Mutex<Vec<String>>,
}

impl MockUploader {
    pub fn new() -> Self {
        Self::default()
    }

    /// File names uploaded so far.
    pub fn uploaded(&self) -> Vec<String> {
        self.uploads.lock().map(|u| u.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl MediaUploader for MockUploader {
    async fn upload(&self, request: &UploadRequest) -> Result<UploadedMedia, ApiError> {
        if let Ok(mut uploads) = self.uploads.lock() {
            uploads.push(request.file_name.clone());
        }
        let url = format!(
            "https://media.mock/{}/{}",
            request.kind.resource_type(),
            request.file_name
        );
        Ok(UploadedMedia {
            kind: request.kind,
            thumbnail_url: (request.kind == MediaKind::Video).then(|| thumbnail_url(&url)),
            public_id: request.file_name.clone(),
            duration_secs: None,
            bytes: Some(request.bytes.len() as u64),
            url,
        })
    }
}
