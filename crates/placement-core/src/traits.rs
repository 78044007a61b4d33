//! Core trait definitions for the content API and the media-upload service.
//!
//! These async traits are implemented by the `placement-client` crate; the
//! scan engine and the CLI only depend on the traits.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::bank::{BankOwner, BankSummary, QuestionBank};
use crate::content::{
    ListeningAudio, PlacementTest, Question, ReadingPassage, SpeakingVideo, WritingPrompt,
};
use crate::curriculum::{Lesson, Level, Unit};
use crate::error::ApiError;
use crate::model::Id;
use crate::validation::{self, FieldError};

// ---------------------------------------------------------------------------
// Content API trait
// ---------------------------------------------------------------------------

/// The read side of the remote content API that readiness scans need.
#[async_trait]
pub trait ContentApi: Send + Sync {
    /// Human-readable backend name (e.g. the base URL).
    fn name(&self) -> &str;

    /// Readiness payload for the bank owned by `owner`.
    async fn bank_summary(&self, owner: BankOwner) -> Result<BankSummary, ApiError>;

    /// A bank by its own id.
    async fn question_bank(&self, id: Id) -> Result<QuestionBank, ApiError>;

    /// All curriculum levels.
    async fn list_levels(&self) -> Result<Vec<Level>, ApiError>;

    /// Units of one level.
    async fn list_units(&self, level: Id) -> Result<Vec<Unit>, ApiError>;
}

// ---------------------------------------------------------------------------
// CRUD resources
// ---------------------------------------------------------------------------

/// An entity exposed as a REST collection under `/api/{COLLECTION}/`.
pub trait Resource: Serialize + DeserializeOwned + Send + Sync {
    /// Collection path segment.
    const COLLECTION: &'static str;
    /// Singular label for messages.
    const LABEL: &'static str;

    fn id(&self) -> Option<Id>;

    /// Required-field problems that block creation.
    fn validate(&self) -> Vec<FieldError>;
}

macro_rules! impl_resource {
    ($ty:ty, $collection:literal, $label:literal, $validate:path) => {
        impl Resource for $ty {
            const COLLECTION: &'static str = $collection;
            const LABEL: &'static str = $label;

            fn id(&self) -> Option<Id> {
                self.id
            }

            fn validate(&self) -> Vec<FieldError> {
                $validate(self)
            }
        }
    };
}

impl_resource!(PlacementTest, "tests", "test", validation::validate_test);
impl_resource!(Question, "questions", "question", validation::validate_question);
impl_resource!(ReadingPassage, "passages", "reading passage", validation::validate_passage);
impl_resource!(ListeningAudio, "audios", "listening audio", validation::validate_audio);
impl_resource!(SpeakingVideo, "videos", "speaking video", validation::validate_video);
impl_resource!(
    WritingPrompt,
    "writing-prompts",
    "writing prompt",
    validation::validate_writing_prompt
);
impl_resource!(Level, "levels", "level", validation::validate_level);
impl_resource!(Unit, "units", "unit", validation::validate_unit);
impl_resource!(Lesson, "lessons", "lesson", validation::validate_lesson);

/// Query filter for list requests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListFilter {
    pub test: Option<Id>,
    pub level: Option<Id>,
    pub unit: Option<Id>,
}

impl ListFilter {
    pub fn by_test(test: Id) -> Self {
        Self {
            test: Some(test),
            ..Default::default()
        }
    }

    /// Query-string pairs for the set filters.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(test) = self.test {
            pairs.push(("test", test.to_string()));
        }
        if let Some(level) = self.level {
            pairs.push(("level", level.to_string()));
        }
        if let Some(unit) = self.unit {
            pairs.push(("unit", unit.to_string()));
        }
        pairs
    }
}

// ---------------------------------------------------------------------------
// Media upload trait
// ---------------------------------------------------------------------------

/// Kind of media file being uploaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Audio,
    Video,
}

impl MediaKind {
    /// Resource type the hosted CDN files this kind under. Audio is stored
    /// as `video`, which is where the CDN computes durations.
    pub fn resource_type(self) -> &'static str {
        match self {
            MediaKind::Image => "image",
            MediaKind::Audio | MediaKind::Video => "video",
        }
    }

    /// Guess the kind from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "jpg" | "jpeg" | "png" | "gif" | "webp" | "svg" => Some(MediaKind::Image),
            "mp3" | "wav" | "ogg" | "m4a" | "aac" | "flac" => Some(MediaKind::Audio),
            "mp4" | "mov" | "webm" | "mkv" | "avi" => Some(MediaKind::Video),
            _ => None,
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaKind::Image => write!(f, "image"),
            MediaKind::Audio => write!(f, "audio"),
            MediaKind::Video => write!(f, "video"),
        }
    }
}

impl FromStr for MediaKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "image" | "img" => Ok(MediaKind::Image),
            "audio" => Ok(MediaKind::Audio),
            "video" => Ok(MediaKind::Video),
            other => Err(format!("unknown media kind: {other}")),
        }
    }
}

/// A file to upload.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub kind: MediaKind,
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// What the upload service reports back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadedMedia {
    pub kind: MediaKind,
    /// Durable HTTPS URL of the stored file.
    pub url: String,
    pub public_id: String,
    #[serde(default)]
    pub duration_secs: Option<f64>,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub bytes: Option<u64>,
}

/// Trait for hosted media storage.
#[async_trait]
pub trait MediaUploader: Send + Sync {
    async fn upload(&self, request: &UploadRequest) -> Result<UploadedMedia, ApiError>;
}
