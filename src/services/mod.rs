pub mod board_service;
pub mod cache;
pub mod deadline_service;
pub mod match_catalog;
pub mod memory_store;
pub mod participant_directory;
pub mod prediction_store;
pub mod session_service;
pub mod sheets_service;
pub mod submission_service;
pub mod tabular_store;
