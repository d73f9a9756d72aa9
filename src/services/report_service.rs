//! Filtros y reportes sobre la lista de paradas
//!
//! Todo se calcula en memoria sobre la lista cacheada. Rua y bairro se
//! comparan y agrupan ya normalizados, igual que se muestran.

use std::collections::{BTreeSet, HashMap};

use rust_decimal::prelude::ToPrimitive;

use crate::models::report::{
    CategoryCount, DashboardReport, MapMarker, MapPoint, MapView, RankedStreet, StopSelectionItem,
};
use crate::models::Stop;
use crate::utils::text::normalize_text;

const TOP_STREETS: usize = 10;

/// Filtro de la vista de inventario
#[derive(Debug, Clone, Default)]
pub struct StopFilter {
    neighborhoods: Vec<String>,
    street_fragment: Option<String>,
}

impl StopFilter {
    pub fn new(neighborhoods: Vec<String>, street: Option<String>) -> Self {
        Self {
            neighborhoods: neighborhoods.iter().map(|b| normalize_text(b)).collect(),
            street_fragment: street
                .map(|s| s.trim().to_lowercase())
                .filter(|s| !s.is_empty()),
        }
    }

    pub fn neighborhoods(&self) -> &[String] {
        &self.neighborhoods
    }

    /// Bairro en la selección (si hay) Y rua que contiene el trecho (si hay)
    pub fn matches(&self, stop: &Stop) -> bool {
        let neighborhood_ok = self.neighborhoods.is_empty()
            || self.neighborhoods.contains(&normalize_text(&stop.neighborhood));
        let street_ok = match &self.street_fragment {
            Some(fragment) => normalize_text(&stop.street).to_lowercase().contains(fragment),
            None => true,
        };
        neighborhood_ok && street_ok
    }

    pub fn apply<'a>(&self, stops: &'a [Stop]) -> Vec<&'a Stop> {
        stops.iter().filter(|s| self.matches(s)).collect()
    }
}

/// Frecuencias ordenadas por cantidad desc y nombre asc
fn frequencies<I: IntoIterator<Item = String>>(values: I) -> Vec<CategoryCount> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for value in values {
        *counts.entry(value).or_insert(0) += 1;
    }

    let mut result: Vec<CategoryCount> = counts
        .into_iter()
        .map(|(name, count)| CategoryCount { name, count })
        .collect();
    result.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
    result
}

pub fn build_dashboard(stops: &[&Stop]) -> DashboardReport {
    let by_neighborhood = frequencies(stops.iter().map(|s| normalize_text(&s.neighborhood)));
    let by_street = frequencies(stops.iter().map(|s| normalize_text(&s.street)));
    let by_fixture_type =
        frequencies(stops.iter().map(|s| s.fixture_type.as_str().to_string()));

    let max_count = by_street.first().map(|c| c.count).unwrap_or(0);
    let distinct_streets = by_street.len();
    let top_streets = by_street
        .into_iter()
        .take(TOP_STREETS)
        .enumerate()
        .map(|(i, c)| RankedStreet {
            position: i + 1,
            share: c.count as f64 / max_count as f64,
            name: c.name,
            count: c.count,
        })
        .collect();

    DashboardReport {
        total_stops: stops.len(),
        distinct_neighborhoods: by_neighborhood.len(),
        distinct_streets,
        by_neighborhood,
        top_streets,
        by_fixture_type,
    }
}

/// Bairros distintos, ordenados, para el multi-select
pub fn neighborhood_options(stops: &[Stop]) -> Vec<String> {
    stops
        .iter()
        .map(|s| normalize_text(&s.neighborhood))
        .filter(|b| !b.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Marcadores y centro (media de las coordenadas) del mapa
pub fn build_map_view(stops: &[&Stop]) -> MapView {
    let markers: Vec<MapMarker> = stops
        .iter()
        .map(|s| MapMarker {
            id: s.id,
            external_code: s.external_code.clone(),
            street: normalize_text(&s.street),
            neighborhood: normalize_text(&s.neighborhood),
            latitude: s.latitude.to_f64().unwrap_or_default(),
            longitude: s.longitude.to_f64().unwrap_or_default(),
        })
        .collect();

    let center = if markers.is_empty() {
        None
    } else {
        let n = markers.len() as f64;
        Some(MapPoint {
            latitude: markers.iter().map(|m| m.latitude).sum::<f64>() / n,
            longitude: markers.iter().map(|m| m.longitude).sum::<f64>() / n,
        })
    };

    MapView { center, markers }
}

/// Lista de selección de la pestaña de edición
pub fn selection_list(stops: &[Stop]) -> Vec<StopSelectionItem> {
    stops
        .iter()
        .map(|s| StopSelectionItem {
            id: s.id,
            label: format!(
                "{} — {} ({})",
                s.external_code.as_deref().unwrap_or("Sem identificação"),
                s.street,
                s.neighborhood
            ),
        })
        .collect()
}
