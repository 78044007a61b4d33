//! Curriculum hierarchy: levels contain units, units contain lessons.

use serde::{Deserialize, Serialize};

use crate::model::Id;

/// An educational level (e.g. A1, B2). Owns a question bank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Id>,
    /// Short code used to look up readiness thresholds (e.g. "B1").
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub order: u32,
}

/// A unit within a level. Owns its own question bank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Id>,
    /// Owning level id.
    pub level: Id,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub order: u32,
}

/// A lesson within a unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lesson {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Id>,
    /// Owning unit id.
    pub unit: Id,
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub order: u32,
}

impl Level {
    pub fn new(code: &str, name: &str) -> Self {
        Self {
            id: None,
            code: code.to_string(),
            name: name.to_string(),
            description: String::new(),
            order: 0,
        }
    }
}

impl Unit {
    pub fn new(level: Id, title: &str) -> Self {
        Self {
            id: None,
            level,
            title: title.to_string(),
            description: String::new(),
            order: 0,
        }
    }
}

impl Lesson {
    pub fn new(unit: Id, title: &str) -> Self {
        Self {
            id: None,
            unit,
            title: title.to_string(),
            content: String::new(),
            order: 0,
        }
    }
}

/// Sort curriculum nodes the way the dashboard lists them.
pub fn sort_units(units: &mut [Unit]) {
    units.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.title.cmp(&b.title)));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draft_level_omits_id() {
        let json = serde_json::to_value(Level::new("A1", "Beginner")).unwrap();
        assert!(json.get("id").is_none());
        assert_eq!(json["code"], "A1");
    }

    #[test]
    fn unit_parses_with_defaults() {
        let unit: Unit =
            serde_json::from_str(r#"{"id": 4, "level": 1, "title": "Greetings"}"#).unwrap();
        assert_eq!(unit.id, Some(4));
        assert_eq!(unit.order, 0);
        assert!(unit.description.is_empty());
    }

    #[test]
    fn units_sort_by_order_then_title() {
        let mut units = vec![
            Unit::new(1, "Food"),
            Unit::new(1, "Family"),
            Unit::new(1, "Alphabet"),
        ];
        units[0].order = 2;
        units[1].order = 1;
        units[2].order = 1;
        sort_units(&mut units);
        let titles: Vec<_> = units.iter().map(|u| u.title.as_str()).collect();
        assert_eq!(titles, vec!["Alphabet", "Family", "Food"]);
    }
}
