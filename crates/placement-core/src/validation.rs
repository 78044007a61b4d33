//! Required-field checks for drafts before they are sent to the API.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::content::{
    ListeningAudio, PlacementTest, Question, ReadingPassage, SpeakingVideo, WritingPrompt,
};
use crate::curriculum::{Lesson, Level, Unit};

/// A problem with one field of a draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &str, message: &str) -> Self {
        Self {
            field: field.to_string(),
            message: message.to_string(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

fn require_text(errors: &mut Vec<FieldError>, field: &str, value: &str) {
    if value.trim().is_empty() {
        errors.push(FieldError::new(field, "is required"));
    }
}

fn require_url(errors: &mut Vec<FieldError>, field: &str, value: &str) {
    let value = value.trim();
    if value.is_empty() {
        errors.push(FieldError::new(field, "is required; upload the file first"));
    } else if !(value.starts_with("https://") || value.starts_with("http://")) {
        errors.push(FieldError::new(field, "must be an http(s) URL"));
    }
}

fn require_positive_duration(errors: &mut Vec<FieldError>, field: &str, value: Option<f64>) {
    if let Some(secs) = value {
        if !secs.is_finite() || secs <= 0.0 {
            errors.push(FieldError::new(field, "must be positive"));
        }
    }
}

pub fn validate_test(test: &PlacementTest) -> Vec<FieldError> {
    let mut errors = Vec::new();
    require_text(&mut errors, "title", &test.title);
    if test.duration_minutes == 0 {
        errors.push(FieldError::new("duration_minutes", "must be positive"));
    }
    errors
}

pub fn validate_question(question: &Question) -> Vec<FieldError> {
    let mut errors = Vec::new();
    require_text(&mut errors, "text", &question.text);

    if question.category.is_multiple_choice() {
        if question.options.len() < 2 {
            errors.push(FieldError::new("options", "at least two options are required"));
        }
        for (i, option) in question.options.iter().enumerate() {
            require_text(&mut errors, &format!("options[{i}].text"), &option.text);
        }
        let correct = question.options.iter().filter(|o| o.is_correct).count();
        if correct != 1 {
            errors.push(FieldError::new(
                "options",
                &format!("exactly one option must be correct (found {correct})"),
            ));
        }
    } else if !question.options.is_empty() {
        errors.push(FieldError::new(
            "options",
            &format!("{} questions do not take options", question.category),
        ));
    }
    errors
}

pub fn validate_passage(passage: &ReadingPassage) -> Vec<FieldError> {
    let mut errors = Vec::new();
    require_text(&mut errors, "title", &passage.title);
    require_text(&mut errors, "body", &passage.body);
    errors
}

pub fn validate_audio(audio: &ListeningAudio) -> Vec<FieldError> {
    let mut errors = Vec::new();
    require_text(&mut errors, "title", &audio.title);
    require_url(&mut errors, "audio_url", &audio.audio_url);
    require_positive_duration(&mut errors, "duration_secs", audio.duration_secs);
    errors
}

pub fn validate_video(video: &SpeakingVideo) -> Vec<FieldError> {
    let mut errors = Vec::new();
    require_text(&mut errors, "title", &video.title);
    require_url(&mut errors, "video_url", &video.video_url);
    require_positive_duration(&mut errors, "duration_secs", video.duration_secs);
    errors
}

pub fn validate_writing_prompt(prompt: &WritingPrompt) -> Vec<FieldError> {
    let mut errors = Vec::new();
    require_text(&mut errors, "title", &prompt.title);
    require_text(&mut errors, "prompt", &prompt.prompt);
    if prompt.max_words > 0 && prompt.min_words > prompt.max_words {
        errors.push(FieldError::new(
            "min_words",
            "must not be greater than max_words",
        ));
    }
    errors
}

pub fn validate_level(level: &Level) -> Vec<FieldError> {
    let mut errors = Vec::new();
    require_text(&mut errors, "code", &level.code);
    require_text(&mut errors, "name", &level.name);
    errors
}

pub fn validate_unit(unit: &Unit) -> Vec<FieldError> {
    let mut errors = Vec::new();
    require_text(&mut errors, "title", &unit.title);
    errors
}

pub fn validate_lesson(lesson: &Lesson) -> Vec<FieldError> {
    let mut errors = Vec::new();
    require_text(&mut errors, "title", &lesson.title);
    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::QuestionOption;
    use crate::model::Category;

    #[test]
    fn valid_multiple_choice_question() {
        let q = Question::new(Category::Vocabulary, "Pick the fruit").with_options(vec![
            QuestionOption::correct("apple"),
            QuestionOption::wrong("chair"),
        ]);
        assert!(validate_question(&q).is_empty());
    }

    #[test]
    fn question_needs_text_and_one_correct_option() {
        let q = Question::new(Category::Grammar, "  ").with_options(vec![
            QuestionOption::wrong("a"),
            QuestionOption::wrong("b"),
        ]);
        let errors = validate_question(&q);
        assert!(errors.iter().any(|e| e.field == "text"));
        assert!(errors.iter().any(|e| e.message.contains("found 0")));
    }

    #[test]
    fn question_needs_two_options() {
        let q = Question::new(Category::Reading, "Why?")
            .with_options(vec![QuestionOption::correct("because")]);
        let errors = validate_question(&q);
        assert!(errors.iter().any(|e| e.message.contains("at least two")));
    }

    #[test]
    fn writing_question_rejects_options() {
        let q = Question::new(Category::Writing, "Describe your town")
            .with_options(vec![QuestionOption::correct("x")]);
        let errors = validate_question(&q);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("writing questions"));

        let ok = Question::new(Category::Speaking, "Talk about hobbies");
        assert!(validate_question(&ok).is_empty());
    }

    #[test]
    fn audio_requires_uploaded_url() {
        let audio = ListeningAudio {
            id: None,
            test: None,
            title: "Dialogue".into(),
            audio_url: String::new(),
            duration_secs: Some(-1.0),
            transcript: None,
        };
        let errors = validate_audio(&audio);
        assert!(errors.iter().any(|e| e.field == "audio_url"));
        assert!(errors.iter().any(|e| e.field == "duration_secs"));

        let bad_scheme = ListeningAudio {
            audio_url: "ftp://files/clip.mp3".into(),
            duration_secs: None,
            ..audio
        };
        let errors = validate_audio(&bad_scheme);
        assert!(errors[0].message.contains("http(s)"));
    }

    #[test]
    fn writing_prompt_word_bounds() {
        let prompt = WritingPrompt {
            id: None,
            test: None,
            title: "Email".into(),
            prompt: "Write an email to a friend".into(),
            min_words: 200,
            max_words: 100,
        };
        assert_eq!(validate_writing_prompt(&prompt).len(), 1);

        let unbounded = WritingPrompt {
            max_words: 0,
            ..prompt
        };
        assert!(validate_writing_prompt(&unbounded).is_empty());
    }

    #[test]
    fn test_and_level_required_fields() {
        let test = PlacementTest {
            id: None,
            title: String::new(),
            description: String::new(),
            level: None,
            duration_minutes: 0,
            is_active: true,
        };
        assert_eq!(validate_test(&test).len(), 2);
        assert_eq!(validate_level(&Level::new("", "")).len(), 2);
        assert!(validate_unit(&Unit::new(1, "Travel")).is_empty());
        assert_eq!(validate_lesson(&Lesson::new(1, "")).len(), 1);
    }
}
