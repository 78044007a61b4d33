//! Placement-test content: tests, questions, and the media-backed items
//! attached to them.
//!
//! Every type doubles as a draft (no `id`) and as a stored entity.

use serde::{Deserialize, Serialize};

use crate::model::{Category, Id};
use crate::traits::UploadedMedia;

/// A placement test that groups questions and media items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacementTest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Id>,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Target level code, if the test is level-specific.
    #[serde(default)]
    pub level: Option<String>,
    #[serde(default = "default_duration")]
    pub duration_minutes: u32,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl PlacementTest {
    pub fn new(title: &str) -> Self {
        Self {
            id: None,
            title: title.to_string(),
            description: String::new(),
            level: None,
            duration_minutes: default_duration(),
            is_active: true,
        }
    }
}

fn default_duration() -> u32 {
    60
}

fn default_true() -> bool {
    true
}

/// One answer option of a multiple-choice question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionOption {
    pub text: String,
    #[serde(default)]
    pub is_correct: bool,
}

impl QuestionOption {
    pub fn correct(text: &str) -> Self {
        Self {
            text: text.to_string(),
            is_correct: true,
        }
    }

    pub fn wrong(text: &str) -> Self {
        Self {
            text: text.to_string(),
            is_correct: false,
        }
    }
}

/// A question in one of the six categories.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Id>,
    #[serde(default)]
    pub test: Option<Id>,
    pub category: Category,
    pub text: String,
    /// Answer options; empty for speaking and writing questions.
    #[serde(default)]
    pub options: Vec<QuestionOption>,
    #[serde(default)]
    pub explanation: Option<String>,
    /// Reading passage the question refers to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passage: Option<Id>,
    /// Listening audio the question refers to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio: Option<Id>,
}

impl Question {
    pub fn new(category: Category, text: &str) -> Self {
        Self {
            id: None,
            test: None,
            category,
            text: text.to_string(),
            options: Vec::new(),
            explanation: None,
            passage: None,
            audio: None,
        }
    }

    pub fn with_options(mut self, options: Vec<QuestionOption>) -> Self {
        self.options = options;
        self
    }

    /// The option marked correct, if exactly one is.
    pub fn correct_option(&self) -> Option<&QuestionOption> {
        let mut correct = self.options.iter().filter(|o| o.is_correct);
        match (correct.next(), correct.next()) {
            (Some(option), None) => Some(option),
            _ => None,
        }
    }
}

/// A reading passage that reading questions refer to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadingPassage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Id>,
    #[serde(default)]
    pub test: Option<Id>,
    pub title: String,
    pub body: String,
}

impl ReadingPassage {
    /// Word count of the passage body.
    pub fn word_count(&self) -> usize {
        self.body.split_whitespace().count()
    }
}

/// A listening clip hosted on the media CDN.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListeningAudio {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Id>,
    #[serde(default)]
    pub test: Option<Id>,
    pub title: String,
    pub audio_url: String,
    #[serde(default)]
    pub duration_secs: Option<f64>,
    #[serde(default)]
    pub transcript: Option<String>,
}

impl ListeningAudio {
    /// Build a draft from a finished upload.
    pub fn from_upload(title: &str, media: &UploadedMedia) -> Self {
        Self {
            id: None,
            test: None,
            title: title.to_string(),
            audio_url: media.url.clone(),
            duration_secs: media.duration_secs,
            transcript: None,
        }
    }
}

/// A speaking prompt delivered as a video hosted on the media CDN.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeakingVideo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Id>,
    #[serde(default)]
    pub test: Option<Id>,
    pub title: String,
    pub video_url: String,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub duration_secs: Option<f64>,
    #[serde(default)]
    pub instructions: String,
}

impl SpeakingVideo {
    /// Build a draft from a finished upload.
    pub fn from_upload(title: &str, media: &UploadedMedia) -> Self {
        Self {
            id: None,
            test: None,
            title: title.to_string(),
            video_url: media.url.clone(),
            thumbnail_url: media.thumbnail_url.clone(),
            duration_secs: media.duration_secs,
            instructions: String::new(),
        }
    }
}

/// A free-text writing task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WritingPrompt {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Id>,
    #[serde(default)]
    pub test: Option<Id>,
    pub title: String,
    pub prompt: String,
    #[serde(default)]
    pub min_words: u32,
    #[serde(default)]
    pub max_words: u32,
}
