pub mod dashboard_routes;
pub mod session_routes;
pub mod stop_routes;
