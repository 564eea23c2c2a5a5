pub(crate) mod auth;
pub(crate) mod games;
pub(crate) mod phases;
pub(crate) mod predictions;
