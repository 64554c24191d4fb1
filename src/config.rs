pub mod football_api;
pub mod jwt;
pub mod settings;
pub mod sync;
