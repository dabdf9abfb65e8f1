//! FoodLens - recognize food from a photo and look up its nutrition
//!
//! A Gemini-backed extraction client, an HTTP facade exposing it, and a small
//! interactive terminal client that drives the facade.

pub mod ai;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod prompts;
pub mod server;

pub use error::{Error, Result};
