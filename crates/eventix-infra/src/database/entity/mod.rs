//! SeaORM entities.

pub mod event;
pub mod ticket;
pub mod user;
