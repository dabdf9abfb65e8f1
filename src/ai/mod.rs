//! Food extraction backed by a generative model
//!
//! The model is treated as an untrusted text oracle: it is instructed to
//! answer in JSON, and whatever it returns is parsed defensively.

pub mod extract;
pub mod gemini;
pub mod mime;
pub mod mock;

pub use gemini::GeminiFoodClient;
pub use mime::ImageMime;
pub use mock::MockFoodExtractor;

use crate::Result;
use async_trait::async_trait;
use serde_json::{Map, Value};

#[async_trait]
pub trait FoodExtractor: Send + Sync {
    /// Up to five candidate names for the food in `image`, most likely first.
    ///
    /// An answer that cannot be understood yields an empty list; only
    /// transport and provider failures are returned as errors.
    async fn recognize_food(&self, image: &[u8], mime: ImageMime) -> Result<Vec<String>>;

    /// Raw nutrition fields for one serving of `food_name`.
    ///
    /// The map is not validated and is empty when the answer cannot be
    /// understood.
    async fn fetch_nutrition(&self, food_name: &str) -> Result<Map<String, Value>>;
}
