pub mod common;
pub mod errors;
pub mod fixture;
pub mod football_api;
pub mod game;
pub mod reference;
pub mod schedule;
pub mod tipp;
