pub mod api_response;
pub mod organisation_dto;
pub mod subscription_dto;

pub use api_response::ApiResponse;
