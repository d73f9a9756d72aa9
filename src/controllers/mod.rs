pub mod dashboard_controller;
pub mod session_controller;
pub mod stop_controller;
