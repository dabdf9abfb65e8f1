use super::{FoodExtractor, ImageMime};
use crate::{Error, Result};
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::sync::{Arc, Mutex};

/// In-memory [`FoodExtractor`] for tests and local harnesses.
///
/// Returns canned answers and records what it was asked.
#[derive(Clone, Default)]
pub struct MockFoodExtractor {
    predictions: Arc<Mutex<Vec<String>>>,
    nutrition: Arc<Mutex<Map<String, Value>>>,
    fail_with: Arc<Mutex<Option<String>>>,
    recognized_mimes: Arc<Mutex<Vec<ImageMime>>>,
    requested_names: Arc<Mutex<Vec<String>>>,
}

impl MockFoodExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_predictions<I, S>(self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        *self.predictions.lock().unwrap() = names.into_iter().map(Into::into).collect();
        self
    }

    /// Canned nutrition answer. Non-object values are ignored.
    pub fn with_nutrition(self, fields: Value) -> Self {
        if let Value::Object(map) = fields {
            *self.nutrition.lock().unwrap() = map;
        }
        self
    }

    /// Make every call fail as if the provider were unreachable.
    pub fn failing(self, message: impl Into<String>) -> Self {
        *self.fail_with.lock().unwrap() = Some(message.into());
        self
    }

    pub fn recognized_mimes(&self) -> Vec<ImageMime> {
        self.recognized_mimes.lock().unwrap().clone()
    }

    pub fn requested_names(&self) -> Vec<String> {
        self.requested_names.lock().unwrap().clone()
    }

    fn check_failure(&self) -> Result<()> {
        match self.fail_with.lock().unwrap().as_ref() {
            Some(message) => Err(Error::AiProvider(message.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl FoodExtractor for MockFoodExtractor {
    async fn recognize_food(&self, _image: &[u8], mime: ImageMime) -> Result<Vec<String>> {
        self.recognized_mimes.lock().unwrap().push(mime);
        self.check_failure()?;
        Ok(self.predictions.lock().unwrap().clone())
    }

    async fn fetch_nutrition(&self, food_name: &str) -> Result<Map<String, Value>> {
        self.requested_names
            .lock()
            .unwrap()
            .push(food_name.to_string());
        self.check_failure()?;
        Ok(self.nutrition.lock().unwrap().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_defaults_to_empty_answers() {
        let mock = MockFoodExtractor::new();

        assert!(mock.recognize_food(&[], ImageMime::Jpeg).await.unwrap().is_empty());
        assert!(mock.fetch_nutrition("Apple").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_mock_records_calls() {
        let mock = MockFoodExtractor::new()
            .with_predictions(["Pizza"])
            .with_nutrition(serde_json::json!({ "calories": 266 }));

        assert_eq!(
            mock.recognize_food(&[1, 2], ImageMime::Png).await.unwrap(),
            vec!["Pizza"]
        );
        assert_eq!(mock.fetch_nutrition("Pizza").await.unwrap()["calories"], 266);
        assert_eq!(mock.recognized_mimes(), vec![ImageMime::Png]);
        assert_eq!(mock.requested_names(), vec!["Pizza"]);
    }

    #[tokio::test]
    async fn test_mock_failure() {
        let mock = MockFoodExtractor::new().failing("boom");
        let err = mock.fetch_nutrition("Apple").await.unwrap_err();
        assert!(matches!(err, Error::AiProvider(_)));
    }
}
