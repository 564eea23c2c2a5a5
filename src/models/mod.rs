pub mod game;
pub mod participant;
pub mod phase;
pub mod prediction;
