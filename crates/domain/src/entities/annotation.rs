//! Free-text notes pinned to the Notes layer

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::{NoteText, Point};
use crate::AnnotationId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapAnnotation {
    id: AnnotationId,
    text: NoteText,
    position: Point,
    #[serde(default)]
    color: Option<String>,
    created_at: DateTime<Utc>,
}

impl MapAnnotation {
    pub fn new(text: NoteText, position: Point, created_at: DateTime<Utc>) -> Self {
        Self {
            id: AnnotationId::new(),
            text,
            position,
            color: None,
            created_at,
        }
    }

    pub fn id(&self) -> AnnotationId {
        self.id
    }

    pub fn text(&self) -> &NoteText {
        &self.text
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn color(&self) -> Option<&str> {
        self.color.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn with_id(mut self, id: AnnotationId) -> Self {
        self.id = id;
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Take text, position and colour from `edited`; creation time is kept.
    pub fn apply_edit(&mut self, edited: MapAnnotation) {
        self.text = edited.text;
        self.position = edited.position;
        self.color = edited.color;
    }
}
