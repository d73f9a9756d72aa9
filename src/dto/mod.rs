pub mod api_response;
pub mod session_dto;
pub mod stop_dto;
