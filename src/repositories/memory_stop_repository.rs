//! Almacén de paradas en memoria
//!
//! Misma semántica que `PgStopRepository` (unicidad del número de parada,
//! orden por fecha de registro) sin base de datos. Se activa con
//! `STORE_BACKEND=memory`.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::models::{Stop, StopDraft};
use crate::repositories::stop_repository::StopStore;
use crate::utils::errors::{duplicate_code_error, not_found_error, AppResult};

#[derive(Default)]
struct MemoryTable {
    next_id: i32,
    rows: Vec<Stop>,
}

impl MemoryTable {
    fn code_taken(&self, code: Option<&str>, except_id: Option<i32>) -> bool {
        let Some(code) = code else {
            return false;
        };
        self.rows
            .iter()
            .any(|s| Some(s.id) != except_id && s.external_code.as_deref() == Some(code))
    }
}

#[derive(Default)]
pub struct MemoryStopRepository {
    table: RwLock<MemoryTable>,
}

impl MemoryStopRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StopStore for MemoryStopRepository {
    async fn create(&self, draft: StopDraft) -> AppResult<Stop> {
        let mut table = self.table.write().await;
        if table.code_taken(draft.external_code.as_deref(), None) {
            return Err(duplicate_code_error(draft.external_code.as_deref().unwrap_or_default()));
        }

        table.next_id += 1;
        let stop = Stop::from_draft(table.next_id, draft, Utc::now());
        table.rows.push(stop.clone());
        Ok(stop)
    }

    async fn list_all(&self) -> AppResult<Vec<Stop>> {
        let table = self.table.read().await;
        let mut stops = table.rows.clone();
        stops.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(stops)
    }

    async fn get(&self, id: i32) -> AppResult<Option<Stop>> {
        let table = self.table.read().await;
        Ok(table.rows.iter().find(|s| s.id == id).cloned())
    }

    async fn update(&self, id: i32, draft: StopDraft) -> AppResult<Stop> {
        let mut table = self.table.write().await;
        if table.code_taken(draft.external_code.as_deref(), Some(id)) {
            return Err(duplicate_code_error(draft.external_code.as_deref().unwrap_or_default()));
        }

        let stop = table
            .rows
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| not_found_error(id))?;
        stop.apply_draft(draft);
        Ok(stop.clone())
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        let mut table = self.table.write().await;
        let before = table.rows.len();
        table.rows.retain(|s| s.id != id);
        if table.rows.len() == before {
            return Err(not_found_error(id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Direction, FixtureType};
    use crate::utils::errors::AppError;
    use rust_decimal::Decimal;

    fn draft(code: Option<&str>, street: &str) -> StopDraft {
        StopDraft {
            external_code: code.map(str::to_string),
            street: street.to_string(),
            street_number: None,
            neighborhood: "Centro".to_string(),
            postal_code: None,
            reference: "Praça".to_string(),
            direction: Direction::Pc1ToPc2,
            fixture_type: FixtureType::Sign,
            latitude: Decimal::new(-1225, 2),
            longitude: Decimal::new(-3895, 2),
            photo_name: None,
        }
    }

    #[tokio::test]
    async fn test_create_and_get_round_trip() {
        let store = MemoryStopRepository::new();
        let created = store.create(draft(Some("P-1"), "Rua A")).await.unwrap();
        let fetched = store.get(created.id).await.unwrap().unwrap();
        assert_eq!(created, fetched);
        assert_eq!(fetched.street, "Rua A");
    }

    #[tokio::test]
    async fn test_duplicate_code_rejected_without_write() {
        let store = MemoryStopRepository::new();
        store.create(draft(Some("P-1"), "Rua A")).await.unwrap();
        let err = store.create(draft(Some("P-1"), "Rua B")).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
        assert_eq!(store.list_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_absent_codes_never_collide() {
        let store = MemoryStopRepository::new();
        store.create(draft(None, "Rua A")).await.unwrap();
        store.create(draft(None, "Rua B")).await.unwrap();
        assert_eq!(store.list_all().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_update_keeps_id_and_created_at() {
        let store = MemoryStopRepository::new();
        let created = store.create(draft(Some("P-1"), "Rua A")).await.unwrap();

        let mut changes = draft(Some("P-1"), "Rua A");
        changes.fixture_type = FixtureType::Shelter;
        let updated = store.update(created.id, changes).await.unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.created_at, created.created_at);
        assert_eq!(updated.fixture_type, FixtureType::Shelter);
    }

    #[tokio::test]
    async fn test_update_to_taken_code_conflicts() {
        let store = MemoryStopRepository::new();
        store.create(draft(Some("P-1"), "Rua A")).await.unwrap();
        let other = store.create(draft(Some("P-2"), "Rua B")).await.unwrap();

        let err = store.update(other.id, draft(Some("P-1"), "Rua B")).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
        let unchanged = store.get(other.id).await.unwrap().unwrap();
        assert_eq!(unchanged.external_code.as_deref(), Some("P-2"));
    }

    #[tokio::test]
    async fn test_list_newest_first_and_delete() {
        let store = MemoryStopRepository::new();
        let first = store.create(draft(None, "Rua A")).await.unwrap();
        let second = store.create(draft(None, "Rua B")).await.unwrap();

        let ids: Vec<i32> = store.list_all().await.unwrap().iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![second.id, first.id]);

        store.delete(first.id).await.unwrap();
        assert!(store.get(first.id).await.unwrap().is_none());
        assert!(matches!(store.delete(first.id).await, Err(AppError::NotFound(_))));
    }
}
