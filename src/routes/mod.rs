pub mod auth;
pub mod games;
pub mod phases;
pub mod predictions;
