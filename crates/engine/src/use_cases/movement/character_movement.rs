//! Live character positions and travel history.
//!
//! Each character has at most one live position per map. Moving a character
//! that already has a position on the map overwrites the live record and
//! appends a travel log entry from the old position to the new one.

use std::sync::Arc;

use wrldbldr_map_domain::{
    CharacterId, CharacterMapPosition, MapEventData, MapId, MapLocationId, Point, TravelLogEntry,
};

use crate::error::MapError;
use crate::infrastructure::locks::KeyedLocks;
use crate::repositories::{CharacterPositionRepository, MapRepository};

/// Outcome of [`CharacterMovement::set_character_position`].
#[derive(Debug, Clone, PartialEq)]
pub struct MoveResult {
    pub position: CharacterMapPosition,
    /// `None` for the first placement on a map
    pub travel_log_entry: Option<TravelLogEntry>,
}

pub struct CharacterMovement {
    maps: Arc<MapRepository>,
    positions: Arc<CharacterPositionRepository>,
    move_locks: KeyedLocks<CharacterId>,
}

impl CharacterMovement {
    pub fn new(maps: Arc<MapRepository>, positions: Arc<CharacterPositionRepository>) -> Self {
        Self {
            maps,
            positions,
            move_locks: KeyedLocks::new(),
        }
    }

    /// Place or move a character on a map.
    ///
    /// Moves of the same character are applied one at a time, so each log
    /// entry starts where the previous one ended. The map's write lock is
    /// held until the move is stored, so a concurrent map deletion either
    /// sees the new position and removes it, or makes this call fail.
    ///
    /// If the log entry cannot be stored the previous live record is put
    /// back, leaving the character where it was.
    ///
    /// # Errors
    ///
    /// `NotFound` when the map does not exist, or when `location_id` is not
    /// a location on it.
    pub async fn set_character_position(
        &self,
        character_id: CharacterId,
        map_id: MapId,
        position: Point,
        location_id: Option<MapLocationId>,
    ) -> Result<MoveResult, MapError> {
        if !position.is_finite() {
            return Err(MapError::Validation(
                "Character position must have finite coordinates".to_string(),
            ));
        }

        let _move_guard = self.move_locks.lock(character_id).await;
        let (_map_guard, map) = self.maps.lock_existing(map_id).await?;
        if let Some(location_id) = location_id {
            if map.location(location_id).is_none() {
                return Err(MapError::not_found("MapLocation", location_id));
            }
        }

        let previous = self.positions.get(character_id, map_id).await?;
        let next =
            CharacterMapPosition::new(character_id, map_id, position, location_id, self.maps.now());
        let travel_log_entry = previous.as_ref().map(|previous| previous.travel_to(&next));

        self.positions.save(&next).await?;
        if let (Some(entry), Some(previous)) = (&travel_log_entry, &previous) {
            if let Err(error) = self.positions.append_travel_log(entry).await {
                if let Err(restore_error) = self.positions.save(previous).await {
                    tracing::error!(
                        character_id = %character_id,
                        map_id = %map_id,
                        error = %restore_error,
                        "Failed to restore live position after travel log write failed"
                    );
                }
                return Err(error.into());
            }
        }

        tracing::info!(
            character_id = %character_id,
            map_id = %map_id,
            x = position.x,
            y = position.y,
            distance = travel_log_entry.as_ref().map(|e| e.distance),
            "Character moved"
        );
        self.maps.publish(
            map_id,
            MapEventData::CharacterMoved {
                character_id,
                from: previous.map(|p| p.position),
                to: position,
                location_id,
                travel_log_entry_id: travel_log_entry.as_ref().map(|e| e.id),
            },
        );

        Ok(MoveResult {
            position: next,
            travel_log_entry,
        })
    }

    pub async fn get_character_position(
        &self,
        character_id: CharacterId,
        map_id: MapId,
    ) -> Result<Option<CharacterMapPosition>, MapError> {
        Ok(self.positions.get(character_id, map_id).await?)
    }

    /// Travel history, newest first, optionally limited to one map.
    pub async fn get_character_travel_log(
        &self,
        character_id: CharacterId,
        map_id: Option<MapId>,
    ) -> Result<Vec<TravelLogEntry>, MapError> {
        let mut log = self.positions.travel_log(character_id).await?;
        if let Some(map_id) = map_id {
            log.retain(|entry| entry.map_id == map_id);
        }
        // Stored oldest first.
        log.reverse();
        Ok(log)
    }

    /// Live positions of every character on a map.
    pub async fn get_characters_on_map(
        &self,
        map_id: MapId,
    ) -> Result<Vec<CharacterMapPosition>, MapError> {
        Ok(self.positions.list_for_map(map_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::event_bus::MapEventBus;
    use crate::infrastructure::memory_store::InMemoryDocumentStore;
    use crate::infrastructure::ports::{Collection, DocumentStore, MockClockPort};
    use crate::test_fixtures::{start_time, FlakyStore, TestContext};
    use crate::use_cases::map_content::MapContent;
    use std::time::Duration;
    use wrldbldr_map_domain::{LocationName, MapLocation, MapLocationType};

    fn movement(ctx: &TestContext) -> CharacterMovement {
        CharacterMovement::new(Arc::clone(&ctx.maps), Arc::clone(&ctx.positions))
    }

    #[tokio::test]
    async fn first_placement_has_no_log_entry() {
        let ctx = TestContext::new();
        let movement = movement(&ctx);
        let map = ctx.map("Atlas").await;
        let hero = CharacterId::new();

        let result = movement
            .set_character_position(hero, map.id(), Point::new(1.0, 2.0), None)
            .await
            .unwrap();

        assert!(result.travel_log_entry.is_none());
        let live = movement.get_character_position(hero, map.id()).await.unwrap();
        assert_eq!(live, Some(result.position));
        assert!(movement
            .get_character_travel_log(hero, None)
            .await
            .unwrap()
            .is_empty());

        let moved = ctx.recorder.events().pop().unwrap();
        assert_eq!(moved.event_type(), "character_moved");
        match moved.data {
            MapEventData::CharacterMoved { from, to, .. } => {
                assert_eq!(from, None);
                assert_eq!(to, Point::new(1.0, 2.0));
            }
            other => panic!("Expected CharacterMoved, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn moves_build_newest_first_log() {
        let ctx = TestContext::new();
        let movement = movement(&ctx);
        let map = ctx.map("Atlas").await;
        let hero = CharacterId::new();

        movement
            .set_character_position(hero, map.id(), Point::new(0.0, 0.0), None)
            .await
            .unwrap();
        movement
            .set_character_position(hero, map.id(), Point::new(3.0, 4.0), None)
            .await
            .unwrap();

        let log = movement.get_character_travel_log(hero, None).await.unwrap();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].distance, 5.0);
        assert_eq!(log[0].start_position, Point::new(0.0, 0.0));
        assert_eq!(log[0].end_position, Point::new(3.0, 4.0));

        movement
            .set_character_position(hero, map.id(), Point::new(3.0, 10.0), None)
            .await
            .unwrap();

        let log = movement.get_character_travel_log(hero, None).await.unwrap();
        assert_eq!(log.len(), 2);
        assert_eq!(log[0].start_position, Point::new(3.0, 4.0));
        assert_eq!(log[0].distance, 6.0);
        assert_eq!(log[1].distance, 5.0);
        assert!(log[0].end_time > log[1].end_time);
    }

    #[tokio::test]
    async fn travel_log_filters_by_map() {
        let ctx = TestContext::new();
        let movement = movement(&ctx);
        let north = ctx.map("North").await;
        let south = ctx.map("South").await;
        let hero = CharacterId::new();

        for (map_id, x) in [(north.id(), 0.0), (north.id(), 1.0), (south.id(), 0.0), (south.id(), 2.0)] {
            movement
                .set_character_position(hero, map_id, Point::new(x, 0.0), None)
                .await
                .unwrap();
        }

        let south_log = movement
            .get_character_travel_log(hero, Some(south.id()))
            .await
            .unwrap();
        assert_eq!(south_log.len(), 1);
        assert_eq!(south_log[0].distance, 2.0);
        assert_eq!(
            movement.get_character_travel_log(hero, None).await.unwrap().len(),
            2
        );
    }

    #[tokio::test]
    async fn location_must_exist_on_map() {
        let ctx = TestContext::new();
        let movement = movement(&ctx);
        let content = MapContent::new(Arc::clone(&ctx.maps));
        let map = ctx.map("Atlas").await;
        let inn = content
            .add_location(
                map.id(),
                MapLocation::new(
                    LocationName::new("Prancing Pony").unwrap(),
                    MapLocationType::Landmark,
                    Point::new(7.0, 7.0),
                ),
            )
            .await
            .unwrap();
        let hero = CharacterId::new();

        let at_inn = movement
            .set_character_position(hero, map.id(), inn.position(), Some(inn.id()))
            .await
            .unwrap();
        assert_eq!(at_inn.position.location_id, Some(inn.id()));

        let nowhere = movement
            .set_character_position(hero, map.id(), Point::ORIGIN, Some(MapLocationId::new()))
            .await;
        assert!(nowhere.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn unknown_map_is_not_found() {
        let ctx = TestContext::new();
        let movement = movement(&ctx);

        let result = movement
            .set_character_position(CharacterId::new(), MapId::new(), Point::ORIGIN, None)
            .await;

        assert!(result.unwrap_err().is_not_found());
        assert!(ctx.recorder.events().is_empty());
    }

    #[tokio::test]
    async fn characters_on_map_lists_live_records() {
        let ctx = TestContext::new();
        let movement = movement(&ctx);
        let map = ctx.map("Atlas").await;
        let other = ctx.map("Elsewhere").await;
        let (a, b) = (CharacterId::new(), CharacterId::new());

        movement.set_character_position(a, map.id(), Point::ORIGIN, None).await.unwrap();
        movement.set_character_position(a, map.id(), Point::new(1.0, 1.0), None).await.unwrap();
        movement.set_character_position(b, map.id(), Point::ORIGIN, None).await.unwrap();
        movement.set_character_position(b, other.id(), Point::ORIGIN, None).await.unwrap();

        let mut on_map: Vec<CharacterId> = movement
            .get_characters_on_map(map.id())
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.character_id)
            .collect();
        on_map.sort();
        let mut expected = vec![a, b];
        expected.sort();
        assert_eq!(on_map, expected);
    }

    #[tokio::test]
    async fn concurrent_moves_chain_log_entries() {
        let ctx = TestContext::new();
        let movement = Arc::new(movement(&ctx));
        let map = ctx.map("Atlas").await;
        let hero = CharacterId::new();
        movement
            .set_character_position(hero, map.id(), Point::ORIGIN, None)
            .await
            .unwrap();

        let mut handles = Vec::new();
        for step in 1..=5 {
            let movement = Arc::clone(&movement);
            let map_id = map.id();
            handles.push(tokio::spawn(async move {
                movement
                    .set_character_position(hero, map_id, Point::new(step as f64, 0.0), None)
                    .await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let mut log = movement.get_character_travel_log(hero, None).await.unwrap();
        assert_eq!(log.len(), 5);
        log.reverse();
        for pair in log.windows(2) {
            assert_eq!(pair[0].end_position, pair[1].start_position);
        }
    }

    #[tokio::test]
    async fn failed_log_write_leaves_character_in_place() {
        let store = Arc::new(FlakyStore::new());
        let ctx = TestContext::with_store(store.clone());
        let movement = movement(&ctx);
        let map = ctx.map("Atlas").await;
        let hero = CharacterId::new();
        movement
            .set_character_position(hero, map.id(), Point::ORIGIN, None)
            .await
            .unwrap();

        store.fail_writes_to(Collection::CharacterTravelLogs);
        for target in [Point::new(3.0, 4.0), Point::new(6.0, 8.0)] {
            let result = movement
                .set_character_position(hero, map.id(), target, None)
                .await;
            assert!(matches!(result, Err(MapError::Persistence(_))));
        }

        let live = movement.get_character_position(hero, map.id()).await.unwrap().unwrap();
        assert_eq!(live.position, Point::ORIGIN);
        assert!(movement.get_character_travel_log(hero, None).await.unwrap().is_empty());
        assert_eq!(ctx.recorder.count_of("character_moved"), 1);

        store.heal();
        movement
            .set_character_position(hero, map.id(), Point::new(6.0, 8.0), None)
            .await
            .unwrap();
        let log = movement.get_character_travel_log(hero, None).await.unwrap();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].start_position, Point::ORIGIN);
        assert_eq!(log[0].distance, 10.0);
    }

    #[tokio::test]
    async fn failed_position_write_logs_nothing() {
        let store = Arc::new(FlakyStore::new());
        let ctx = TestContext::with_store(store.clone());
        let movement = movement(&ctx);
        let map = ctx.map("Atlas").await;
        let hero = CharacterId::new();
        movement
            .set_character_position(hero, map.id(), Point::ORIGIN, None)
            .await
            .unwrap();

        store.fail_writes_to(Collection::CharacterMapPositions);
        let result = movement
            .set_character_position(hero, map.id(), Point::new(3.0, 4.0), None)
            .await;

        assert!(matches!(result, Err(MapError::Persistence(_))));
        assert!(movement.get_character_travel_log(hero, None).await.unwrap().is_empty());
        let live = movement.get_character_position(hero, map.id()).await.unwrap().unwrap();
        assert_eq!(live.position, Point::ORIGIN);
    }

    #[tokio::test]
    async fn move_racing_map_deletion_leaves_no_position() {
        let ctx = TestContext::new();
        let movement = Arc::new(movement(&ctx));
        let map = ctx.map("Doomed").await;
        let hero = CharacterId::new();

        // Hold the map so both the move and the delete queue behind us.
        let (guard, _) = ctx.maps.lock_existing(map.id()).await.unwrap();
        let mover = {
            let movement = Arc::clone(&movement);
            let map_id = map.id();
            tokio::spawn(async move {
                movement
                    .set_character_position(hero, map_id, Point::new(1.0, 1.0), None)
                    .await
            })
        };
        tokio::task::yield_now().await;
        assert!(!mover.is_finished());

        let deleter = {
            let maps = Arc::clone(&ctx.maps);
            let map_id = map.id();
            tokio::spawn(async move { maps.delete_map(map_id).await })
        };
        tokio::task::yield_now().await;
        drop(guard);

        mover.await.unwrap().unwrap();
        deleter.await.unwrap().unwrap();

        assert!(movement
            .get_character_position(hero, map.id())
            .await
            .unwrap()
            .is_none());
        assert!(movement.get_characters_on_map(map.id()).await.unwrap().is_empty());
        let deleted = ctx.recorder.events().pop().unwrap();
        assert_eq!(
            deleted.data,
            MapEventData::MapDeleted {
                removed_positions: 1
            }
        );
    }

    #[tokio::test]
    async fn move_after_deletion_is_not_found() {
        let ctx = TestContext::new();
        let movement = movement(&ctx);
        let map = ctx.map("Gone").await;
        ctx.maps.delete_map(map.id()).await.unwrap();

        let result = movement
            .set_character_position(CharacterId::new(), map.id(), Point::ORIGIN, None)
            .await;

        assert!(result.unwrap_err().is_not_found());
        assert!(movement.get_characters_on_map(map.id()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn timestamps_come_from_clock() {
        let store: Arc<dyn DocumentStore> = Arc::new(InMemoryDocumentStore::new());
        let mut clock = MockClockPort::new();
        clock.expect_now().returning(start_time);
        let positions = Arc::new(CharacterPositionRepository::new(store.clone()));
        let maps = Arc::new(MapRepository::new(
            store.clone(),
            positions.clone(),
            Arc::new(clock),
            Arc::new(MapEventBus::new()),
            Duration::from_secs(60),
        ));
        let movement = CharacterMovement::new(maps.clone(), positions);
        let map = maps.create_map("Atlas", 10.0, 10.0, None).await.unwrap();
        let hero = CharacterId::new();

        let result = movement
            .set_character_position(hero, map.id(), Point::ORIGIN, None)
            .await
            .unwrap();

        assert_eq!(result.position.timestamp, start_time());
        let key = CharacterMapPosition::storage_key(hero, map.id());
        assert!(store
            .get(Collection::CharacterMapPositions, &key)
            .await
            .unwrap()
            .is_some());
    }
}
