use super::{FacadeApi, UploadedImage};
use crate::models::NutritionRecord;

pub const NO_FOOD_MESSAGE: &str =
    "Could not identify food in the image. Please try another one or enter the name manually.";
pub const NO_IMAGE_MESSAGE: &str = "Please upload an image first.";

/// What the user currently sees. Derived data always belongs to the image
/// it was computed from, so replacing the image drops it.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum SessionState {
    #[default]
    Idle,
    ImageLoaded {
        image: UploadedImage,
    },
    CandidatesShown {
        image: UploadedImage,
        candidates: Vec<String>,
    },
    NutritionShown {
        image: UploadedImage,
        candidates: Vec<String>,
        nutrition: NutritionRecord,
    },
}

impl SessionState {
    fn into_image(self) -> Option<UploadedImage> {
        match self {
            SessionState::Idle => None,
            SessionState::ImageLoaded { image }
            | SessionState::CandidatesShown { image, .. }
            | SessionState::NutritionShown { image, .. } => Some(image),
        }
    }

    fn into_image_and_candidates(self) -> Option<(UploadedImage, Vec<String>)> {
        match self {
            SessionState::CandidatesShown { image, candidates }
            | SessionState::NutritionShown {
                image, candidates, ..
            } => Some((image, candidates)),
            _ => None,
        }
    }
}

/// Result of a nutrition request from the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NutritionOutcome {
    Fetched,
    Failed,
    /// Neither a selection nor a manual name was given; nothing was sent.
    MissingName,
    /// There are no candidates to pick from yet; nothing was sent.
    NoCandidates,
}

/// One user's interactive session.
///
/// Holds a single error slot next to the state; every successful step
/// clears it.
#[derive(Debug, Default)]
pub struct Session {
    state: SessionState,
    error: Option<String>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn image(&self) -> Option<&UploadedImage> {
        match &self.state {
            SessionState::Idle => None,
            SessionState::ImageLoaded { image }
            | SessionState::CandidatesShown { image, .. }
            | SessionState::NutritionShown { image, .. } => Some(image),
        }
    }

    pub fn candidates(&self) -> &[String] {
        match &self.state {
            SessionState::CandidatesShown { candidates, .. }
            | SessionState::NutritionShown { candidates, .. } => candidates,
            _ => &[],
        }
    }

    pub fn nutrition(&self) -> Option<&NutritionRecord> {
        match &self.state {
            SessionState::NutritionShown { nutrition, .. } => Some(nutrition),
            _ => None,
        }
    }

    /// Load an image. A different image resets candidates, nutrition and
    /// error; the same bytes again leave the session untouched.
    ///
    /// Returns whether the session was reset.
    pub fn load_image(&mut self, image: UploadedImage) -> bool {
        if self.image().is_some_and(|current| current.bytes == image.bytes) {
            return false;
        }
        self.state = SessionState::ImageLoaded { image };
        self.error = None;
        true
    }

    /// Ask the facade for candidate names of the loaded image.
    pub async fn recognize(&mut self, api: &dyn FacadeApi) {
        let result = match self.image() {
            Some(image) => api.recognize_food(image).await,
            None => {
                self.error = Some(NO_IMAGE_MESSAGE.to_string());
                return;
            }
        };

        let candidates = match result {
            Ok(candidates) => candidates,
            Err(e) => {
                tracing::warn!("Recognition request failed: {}", e);
                self.error = Some(format!("API Error: {}", e));
                return;
            }
        };

        let previous = std::mem::take(&mut self.state);
        if candidates.is_empty() {
            if let Some(image) = previous.into_image() {
                self.state = SessionState::ImageLoaded { image };
            }
            self.error = Some(NO_FOOD_MESSAGE.to_string());
            return;
        }

        // A shown record stays until a new image or another lookup replaces it.
        self.state = match previous {
            SessionState::NutritionShown {
                image, nutrition, ..
            } => SessionState::NutritionShown {
                image,
                candidates,
                nutrition,
            },
            other => match other.into_image() {
                Some(image) => SessionState::CandidatesShown { image, candidates },
                None => return,
            },
        };
        self.error = None;
    }

    /// Submit the nutrition form.
    ///
    /// `manual` wins over `selected` when it is non-empty after trimming.
    pub async fn request_nutrition(
        &mut self,
        api: &dyn FacadeApi,
        selected: Option<&str>,
        manual: &str,
    ) -> NutritionOutcome {
        if self.candidates().is_empty() {
            return NutritionOutcome::NoCandidates;
        }
        let Some(food_name) = resolve_food_name(selected, manual) else {
            return NutritionOutcome::MissingName;
        };

        let result = api.get_nutrition(&food_name).await;

        let Some((image, candidates)) = std::mem::take(&mut self.state).into_image_and_candidates()
        else {
            return NutritionOutcome::NoCandidates;
        };

        match result {
            Ok(nutrition) => {
                self.state = SessionState::NutritionShown {
                    image,
                    candidates,
                    nutrition,
                };
                self.error = None;
                NutritionOutcome::Fetched
            }
            Err(e) => {
                tracing::warn!("Nutrition request for '{}' failed: {}", food_name, e);
                self.state = SessionState::CandidatesShown { image, candidates };
                self.error = Some(format!(
                    "Could not fetch data for '{}'. Please try another name.",
                    food_name
                ));
                NutritionOutcome::Failed
            }
        }
    }
}

/// The name to look up: trimmed manual entry if any, else the selection.
pub fn resolve_food_name(selected: Option<&str>, manual: &str) -> Option<String> {
    let manual = manual.trim();
    if !manual.is_empty() {
        return Some(manual.to_string());
    }
    selected
        .filter(|name| !name.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::ImageMime;
    use crate::{Error, Result};
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeApi {
        candidates: Vec<String>,
        nutrition: Option<NutritionRecord>,
        fail_recognition: bool,
        requested: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl FacadeApi for FakeApi {
        async fn recognize_food(&self, _image: &UploadedImage) -> Result<Vec<String>> {
            if self.fail_recognition {
                return Err(Error::AiProvider("connection refused".to_string()));
            }
            Ok(self.candidates.clone())
        }

        async fn get_nutrition(&self, food_name: &str) -> Result<NutritionRecord> {
            self.requested.lock().unwrap().push(food_name.to_string());
            self.nutrition
                .clone()
                .ok_or_else(|| Error::AiProvider("404 Not Found".to_string()))
        }
    }

    fn image(bytes: &[u8]) -> UploadedImage {
        UploadedImage::new("meal.jpg", ImageMime::Jpeg, bytes.to_vec())
    }

    fn record(name: &str, calories: f64) -> NutritionRecord {
        NutritionRecord {
            food_name: name.to_string(),
            serving_size_grams: 150.0,
            calories,
            protein_grams: 10.0,
            carbohydrates_grams: 20.0,
            fat_grams: 5.0,
            fiber_grams: 1.0,
            sugar_grams: 2.0,
        }
    }

    fn api_with(candidates: &[&str], nutrition: Option<NutritionRecord>) -> FakeApi {
        FakeApi {
            candidates: candidates.iter().map(|c| c.to_string()).collect(),
            nutrition,
            ..FakeApi::default()
        }
    }

    #[tokio::test]
    async fn test_new_image_clears_candidates_and_nutrition() {
        let api = api_with(&["Pizza", "Flatbread"], Some(record("Pizza", 266.0)));
        let mut session = Session::new();

        session.load_image(image(b"image-a"));
        session.recognize(&api).await;
        session.request_nutrition(&api, Some("Pizza"), "").await;
        assert!(session.nutrition().is_some());

        assert!(session.load_image(image(b"image-b")));

        assert!(session.candidates().is_empty());
        assert!(session.nutrition().is_none());
        assert!(session.error().is_none());
        assert_eq!(
            session.state(),
            &SessionState::ImageLoaded {
                image: image(b"image-b")
            }
        );
    }

    #[tokio::test]
    async fn test_same_image_does_not_reset() {
        let api = api_with(&["Soup"], None);
        let mut session = Session::new();

        session.load_image(image(b"image-a"));
        session.recognize(&api).await;

        assert!(!session.load_image(image(b"image-a")));
        assert_eq!(session.candidates(), ["Soup".to_string()]);
    }

    #[tokio::test]
    async fn test_recognize_success_shows_candidates() {
        let api = api_with(&["Ramen", "Pho"], None);
        let mut session = Session::new();
        session.load_image(image(b"bowl"));

        session.recognize(&api).await;

        assert_eq!(session.candidates(), ["Ramen".to_string(), "Pho".to_string()]);
        assert!(session.error().is_none());
    }

    #[tokio::test]
    async fn test_recognizing_same_image_again_keeps_nutrition() {
        let api = api_with(&["Pizza", "Flatbread"], Some(record("Pizza", 266.0)));
        let mut session = Session::new();
        session.load_image(image(b"slice"));
        session.recognize(&api).await;
        session.request_nutrition(&api, Some("Pizza"), "").await;

        let again = api_with(&["Margherita Pizza"], None);
        session.recognize(&again).await;

        assert_eq!(session.candidates(), ["Margherita Pizza".to_string()]);
        assert_eq!(session.nutrition(), Some(&record("Pizza", 266.0)));
        assert!(session.error().is_none());
    }

    #[tokio::test]
    async fn test_recognize_without_candidates_shows_error() {
        let api = api_with(&[], None);
        let mut session = Session::new();
        session.load_image(image(b"blur"));

        session.recognize(&api).await;

        assert!(session.candidates().is_empty());
        assert_eq!(session.error(), Some(NO_FOOD_MESSAGE));
        assert!(matches!(session.state(), SessionState::ImageLoaded { .. }));
    }

    #[tokio::test]
    async fn test_recognize_transport_error_is_reported() {
        let api = FakeApi {
            fail_recognition: true,
            ..FakeApi::default()
        };
        let mut session = Session::new();
        session.load_image(image(b"meal"));

        session.recognize(&api).await;

        let error = session.error().unwrap();
        assert!(error.starts_with("API Error: "));
        assert!(error.contains("connection refused"));
        assert!(matches!(session.state(), SessionState::ImageLoaded { .. }));
    }

    #[tokio::test]
    async fn test_recognize_without_image() {
        let mut session = Session::new();
        session.recognize(&api_with(&["Pizza"], None)).await;
        assert_eq!(session.error(), Some(NO_IMAGE_MESSAGE));
        assert_eq!(session.state(), &SessionState::Idle);
    }

    #[tokio::test]
    async fn test_manual_name_overrides_selection() {
        let api = api_with(&["Pizza"], Some(record("Cheese Pizza", 285.0)));
        let mut session = Session::new();
        session.load_image(image(b"slice"));
        session.recognize(&api).await;

        let outcome = session
            .request_nutrition(&api, Some("Pizza"), "  cheese pizza ")
            .await;

        assert_eq!(outcome, NutritionOutcome::Fetched);
        assert_eq!(*api.requested.lock().unwrap(), vec!["cheese pizza"]);
        assert_eq!(session.nutrition().unwrap().food_name, "Cheese Pizza");
    }

    #[tokio::test]
    async fn test_blank_manual_name_uses_selection() {
        let api = api_with(&["Pizza", "Calzone"], Some(record("Calzone", 300.0)));
        let mut session = Session::new();
        session.load_image(image(b"slice"));
        session.recognize(&api).await;

        session.request_nutrition(&api, Some("Calzone"), "   ").await;

        assert_eq!(*api.requested.lock().unwrap(), vec!["Calzone"]);
    }

    #[tokio::test]
    async fn test_nutrition_failure_drops_record_and_sets_error() {
        let api = api_with(&["Pizza"], Some(record("Pizza", 266.0)));
        let mut session = Session::new();
        session.load_image(image(b"slice"));
        session.recognize(&api).await;
        session.request_nutrition(&api, Some("Pizza"), "").await;

        let failing = api_with(&["Pizza"], None);
        let outcome = session.request_nutrition(&failing, Some("Pizza"), "mud pie").await;

        assert_eq!(outcome, NutritionOutcome::Failed);
        assert!(session.nutrition().is_none());
        assert_eq!(session.candidates(), ["Pizza".to_string()]);
        assert_eq!(
            session.error(),
            Some("Could not fetch data for 'mud pie'. Please try another name.")
        );
    }

    #[tokio::test]
    async fn test_successful_step_clears_error() {
        let api = api_with(&["Pizza"], Some(record("Pizza", 266.0)));
        let failing = api_with(&["Pizza"], None);
        let mut session = Session::new();
        session.load_image(image(b"slice"));
        session.recognize(&api).await;

        session.request_nutrition(&failing, Some("Pizza"), "").await;
        assert!(session.error().is_some());

        session.request_nutrition(&api, Some("Pizza"), "").await;
        assert!(session.error().is_none());
        assert!(session.nutrition().is_some());
    }

    #[tokio::test]
    async fn test_nutrition_requires_candidates_and_name() {
        let api = api_with(&["Pizza"], Some(record("Pizza", 266.0)));
        let mut session = Session::new();
        session.load_image(image(b"slice"));

        assert_eq!(
            session.request_nutrition(&api, Some("Pizza"), "").await,
            NutritionOutcome::NoCandidates
        );

        session.recognize(&api).await;
        assert_eq!(
            session.request_nutrition(&api, None, " ").await,
            NutritionOutcome::MissingName
        );
        assert!(api.requested.lock().unwrap().is_empty());
    }

    #[test]
    fn test_resolve_food_name() {
        assert_eq!(resolve_food_name(Some("Pizza"), ""), Some("Pizza".to_string()));
        assert_eq!(resolve_food_name(Some("Pizza"), " Pie "), Some("Pie".to_string()));
        assert_eq!(resolve_food_name(None, "Pie"), Some("Pie".to_string()));
        assert_eq!(resolve_food_name(None, "  "), None);
        assert_eq!(resolve_food_name(Some(""), ""), None);
    }
}
