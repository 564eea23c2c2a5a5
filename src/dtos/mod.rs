pub mod auth_dtos;
pub mod prediction_dtos;
