//! Modelos del dashboard y de la vista de mapa

use serde::Serialize;

/// Cantidad de paradas por categoría (bairro, rua o tipo)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryCount {
    pub name: String,
    pub count: usize,
}

/// Entrada del ranking de ruas; `share` es count / máximo del ranking
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedStreet {
    pub position: usize,
    pub name: String,
    pub count: usize,
    pub share: f64,
}

/// Resumen para dashboard
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardReport {
    pub total_stops: usize,
    pub distinct_neighborhoods: usize,
    pub distinct_streets: usize,
    pub by_neighborhood: Vec<CategoryCount>,
    pub top_streets: Vec<RankedStreet>,
    pub by_fixture_type: Vec<CategoryCount>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapPoint {
    pub latitude: f64,
    pub longitude: f64,
}

/// Marcador de una parada en el mapa
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapMarker {
    pub id: i32,
    pub external_code: Option<String>,
    pub street: String,
    pub neighborhood: String,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapView {
    pub center: Option<MapPoint>,
    pub markers: Vec<MapMarker>,
}

/// Opción de la lista de selección de la pestaña de edición
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StopSelectionItem {
    pub id: i32,
    pub label: String,
}
