pub mod client;
pub mod food;
pub mod types;

pub use client::GeminiHttpClient;
pub use food::GeminiFoodClient;
