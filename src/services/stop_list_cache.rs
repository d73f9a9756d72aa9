//! Cache de la lista de paradas
//!
//! La lista completa se reutiliza durante un intervalo corto para no
//! consultar la base en cada filtro. Cualquier escritura la invalida.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;

use crate::models::Stop;
use crate::repositories::StopStore;
use crate::utils::errors::AppResult;

struct CachedList {
    loaded_at: Instant,
    stops: Arc<Vec<Stop>>,
}

pub struct StopListCache {
    ttl: Duration,
    entry: RwLock<Option<CachedList>>,
}

impl StopListCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entry: RwLock::new(None),
        }
    }

    /// Devuelve la lista en cache o la recarga desde el store.
    pub async fn get_or_load(&self, store: &dyn StopStore) -> AppResult<Arc<Vec<Stop>>> {
        if let Some(stops) = self.fresh().await {
            return Ok(stops);
        }

        let mut entry = self.entry.write().await;
        // otra request pudo recargar mientras esperábamos el lock
        if let Some(cached) = entry.as_ref() {
            if cached.loaded_at.elapsed() < self.ttl {
                return Ok(cached.stops.clone());
            }
        }

        let stops = Arc::new(store.list_all().await?);
        log::debug!("🔄 Lista de paradas recarregada ({} registros)", stops.len());
        *entry = Some(CachedList {
            loaded_at: Instant::now(),
            stops: stops.clone(),
        });
        Ok(stops)
    }

    async fn fresh(&self) -> Option<Arc<Vec<Stop>>> {
        let entry = self.entry.read().await;
        entry
            .as_ref()
            .filter(|cached| cached.loaded_at.elapsed() < self.ttl)
            .map(|cached| cached.stops.clone())
    }

    pub async fn invalidate(&self) {
        *self.entry.write().await = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Direction, FixtureType, StopDraft};
    use crate::repositories::MemoryStopRepository;
    use rust_decimal::Decimal;

    fn draft(street: &str) -> StopDraft {
        StopDraft {
            external_code: None,
            street: street.to_string(),
            street_number: None,
            neighborhood: "Centro".to_string(),
            postal_code: None,
            reference: "Praça".to_string(),
            direction: Direction::Pc2ToPc1,
            fixture_type: FixtureType::Sign,
            latitude: Decimal::new(-1225, 2),
            longitude: Decimal::new(-3895, 2),
            photo_name: None,
        }
    }

    #[tokio::test]
    async fn test_cached_until_invalidated() {
        let store = MemoryStopRepository::new();
        let cache = StopListCache::new(Duration::from_secs(60));

        store.create(draft("Rua A")).await.unwrap();
        assert_eq!(cache.get_or_load(&store).await.unwrap().len(), 1);

        store.create(draft("Rua B")).await.unwrap();
        assert_eq!(cache.get_or_load(&store).await.unwrap().len(), 1);

        cache.invalidate().await;
        assert_eq!(cache.get_or_load(&store).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_zero_ttl_always_reloads() {
        let store = MemoryStopRepository::new();
        let cache = StopListCache::new(Duration::ZERO);

        assert!(cache.get_or_load(&store).await.unwrap().is_empty());
        store.create(draft("Rua A")).await.unwrap();
        assert_eq!(cache.get_or_load(&store).await.unwrap().len(), 1);
    }
}
