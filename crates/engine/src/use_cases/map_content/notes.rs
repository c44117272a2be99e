//! Free-text annotations on the Notes layer.

use wrldbldr_map_domain::{AnnotationId, MapAnnotation, MapEventData, MapId, NoteText, Point};

use super::MapContent;
use crate::error::MapError;

impl MapContent {
    pub async fn add_annotation(
        &self,
        map_id: MapId,
        text: &str,
        position: Point,
        color: Option<String>,
    ) -> Result<MapAnnotation, MapError> {
        let mut annotation = MapAnnotation::new(NoteText::new(text)?, position, self.maps.now());
        if let Some(color) = color {
            annotation = annotation.with_color(color);
        }

        let stored = annotation.clone();
        self.maps
            .modify(map_id, move |map| map.add_annotation(annotation))
            .await?;

        self.maps.publish(
            map_id,
            MapEventData::AnnotationCreated {
                annotation: stored.clone(),
            },
        );
        Ok(stored)
    }

    /// Replace text, position and colour of an existing note.
    pub async fn update_annotation(
        &self,
        map_id: MapId,
        annotation: MapAnnotation,
    ) -> Result<MapAnnotation, MapError> {
        let (_, updated) = self
            .maps
            .modify(map_id, move |map| map.update_annotation(annotation).cloned())
            .await?;

        self.maps.publish(
            map_id,
            MapEventData::AnnotationUpdated {
                annotation: updated.clone(),
            },
        );
        Ok(updated)
    }

    pub async fn delete_annotation(
        &self,
        map_id: MapId,
        annotation_id: AnnotationId,
    ) -> Result<(), MapError> {
        self.maps
            .modify(map_id, |map| map.remove_annotation(annotation_id))
            .await?;

        self.maps
            .publish(map_id, MapEventData::AnnotationDeleted { id: annotation_id });
        Ok(())
    }

    pub async fn get_annotations(&self, map_id: MapId) -> Result<Vec<MapAnnotation>, MapError> {
        Ok(self.maps.get_map(map_id).await?.annotations().to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::TestContext;
    use std::sync::Arc;

    #[tokio::test]
    async fn annotation_lifecycle() {
        let ctx = TestContext::new();
        let content = MapContent::new(Arc::clone(&ctx.maps));
        let map = ctx.map("Atlas").await;

        let note = content
            .add_annotation(map.id(), "Dragon sighted", Point::new(40.0, 60.0), None)
            .await
            .unwrap();
        assert_eq!(content.get_annotations(map.id()).await.unwrap(), vec![note.clone()]);

        let edited = MapAnnotation::new(
            NoteText::new("Dragon sighted twice").unwrap(),
            Point::new(42.0, 61.0),
            note.created_at() + chrono::Duration::days(3),
        )
        .with_id(note.id())
        .with_color("#ff0000");
        let updated = content.update_annotation(map.id(), edited).await.unwrap();
        assert_eq!(updated.text().as_str(), "Dragon sighted twice");
        assert_eq!(updated.color(), Some("#ff0000"));
        assert_eq!(updated.created_at(), note.created_at());

        content.delete_annotation(map.id(), note.id()).await.unwrap();
        assert!(content.get_annotations(map.id()).await.unwrap().is_empty());
        assert_eq!(
            ctx.recorder.event_types(),
            vec![
                "map_created",
                "annotation_created",
                "annotation_updated",
                "annotation_deleted"
            ]
        );
    }

    #[tokio::test]
    async fn non_finite_note_position_rejected() {
        let ctx = TestContext::new();
        let content = MapContent::new(Arc::clone(&ctx.maps));
        let map = ctx.map("Atlas").await;

        let result = content
            .add_annotation(map.id(), "Somewhere", Point::new(0.0, f64::NAN), None)
            .await;
        assert!(matches!(result, Err(MapError::Validation(_))));

        let note = content
            .add_annotation(map.id(), "Here", Point::new(1.0, 1.0), None)
            .await
            .unwrap();
        let edited = MapAnnotation::new(
            NoteText::new("Elsewhere").unwrap(),
            Point::new(f64::NEG_INFINITY, 0.0),
            note.created_at(),
        )
        .with_id(note.id());
        assert!(content.update_annotation(map.id(), edited).await.is_err());

        assert_eq!(content.get_annotations(map.id()).await.unwrap(), vec![note]);
        assert_eq!(ctx.maps.get_all_maps().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn empty_note_rejected() {
        let ctx = TestContext::new();
        let content = MapContent::new(Arc::clone(&ctx.maps));
        let map = ctx.map("Atlas").await;

        let result = content
            .add_annotation(map.id(), "   ", Point::ORIGIN, None)
            .await;

        assert!(matches!(result, Err(MapError::Validation(_))));
    }
}
