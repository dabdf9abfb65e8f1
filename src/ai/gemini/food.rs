use super::client::GeminiHttpClient;
use super::types::{
    Content, GenerateContentRequest, GenerationConfig, InlineData, Part, ThinkingConfig, Tool,
};
use crate::ai::{extract, FoodExtractor, ImageMime};
use crate::{prompts, Result};
use async_trait::async_trait;
use serde_json::{Map, Value};

/// Food recognition and nutrition lookup through Gemini.
///
/// Every request enables Google Search grounding and a dynamic thinking
/// budget. Each operation is a single call with no retry.
pub struct GeminiFoodClient {
    http: GeminiHttpClient,
}

impl GeminiFoodClient {
    pub fn new(http: GeminiHttpClient) -> Self {
        Self { http }
    }

    fn request(parts: Vec<Part>) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts,
            }],
            tools: vec![Tool::google_search()],
            generation_config: Some(GenerationConfig {
                thinking_config: Some(ThinkingConfig::dynamic()),
            }),
        }
    }

    async fn ask(&self, task: &str, request: &GenerateContentRequest) -> Result<String> {
        let response = self.http.generate_content(request).await?;
        let text = response.text();
        tracing::debug!("{} response: {}", task, text);
        Ok(text)
    }
}

#[async_trait]
impl FoodExtractor for GeminiFoodClient {
    async fn recognize_food(&self, image: &[u8], mime: ImageMime) -> Result<Vec<String>> {
        tracing::debug!(
            "Recognizing food in image ({} bytes, {}) via Gemini model {}",
            image.len(),
            mime,
            self.http.model()
        );

        use base64::Engine as _;
        let base64_image = base64::engine::general_purpose::STANDARD.encode(image);

        let request = Self::request(vec![
            Part::Text {
                text: prompts::RECOGNIZE_FOOD.to_string(),
            },
            Part::InlineData {
                inline_data: InlineData {
                    mime_type: mime.as_str().to_string(),
                    data: base64_image,
                },
            },
        ]);

        let text = self.ask("Food recognition", &request).await?;
        Ok(extract::predictions(&text))
    }

    async fn fetch_nutrition(&self, food_name: &str) -> Result<Map<String, Value>> {
        tracing::debug!("Fetching nutrition for '{}' via Gemini", food_name);

        let request = Self::request(vec![Part::Text {
            text: prompts::render(prompts::NUTRITION, &[("food_name", food_name)]),
        }]);

        let text = self.ask("Nutrition", &request).await?;
        Ok(extract::json_object(&text))
    }
}
