#![allow(dead_code)]

pub mod provider;
pub mod utils;
