use async_trait::async_trait;
use reqwest::Client;

use super::connection::{ensure_success, http_client, require_key};
use super::endpoints::{
    ChatCompletionRequest, ChatCompletionResponse, ChatMessage, DEFAULT_OPENAI_MODEL,
    DEFAULT_OPENAI_URL, FINISH_REASON_LENGTH, OPENAI_SERVICE,
};
use super::RecipeGenerator;
use crate::config::OPENAI_KEY_VAR;
use crate::error::{RecipeError, RecipeResult};

const SYSTEM_PROMPT: &str = "You are a cooking expert who writes simple recipes for students. \
You answer ONLY with a JSON object.";

fn recipe_prompt(ingredients: &[String]) -> String {
    format!(
        "Create a simple, student-friendly recipe using these ingredients: {}.

Answer ONLY with a JSON object (no extra text) of this shape:
{{
    \"name\": \"Recipe name\",
    \"ingredients\": [\"ingredient 1 with quantity\", \"ingredient 2 with quantity\"],
    \"time\": \"X minutes\",
    \"servings\": 2,
    \"diet\": \"standard/vegetarian/vegan\",
    \"instructions\": [\"Step 1: detailed description\", \"Step 2: detailed description\"],
    \"tip\": \"Extra advice for a student\"
}}

The recipe should be:
- simple and quick
- cheap and easy
- written with precise steps
- practical",
        ingredients.join(", ")
    )
}

#[derive(Clone)]
pub struct OpenAiClient {
    http_client: Client,
    api_key: Option<String>,
    api_url: String,
    model: String,
}

impl OpenAiClient {
    pub fn new(api_key: Option<String>, api_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            http_client: http_client(),
            api_key,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
        }
    }

    pub fn with_defaults(api_key: Option<String>) -> Self {
        Self::new(api_key, DEFAULT_OPENAI_URL, DEFAULT_OPENAI_MODEL)
    }

    pub async fn call_chat_completion(
        &self,
        request: &ChatCompletionRequest,
    ) -> RecipeResult<ChatCompletionResponse> {
        let api_key = require_key(self.api_key.as_deref(), OPENAI_KEY_VAR)?;
        let url = format!("{}/v1/chat/completions", self.api_url);

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(api_key)
            .json(request)
            .send()
            .await?;
        let response = ensure_success(OPENAI_SERVICE, response).await?;

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| RecipeError::MalformedResponse {
            service: OPENAI_SERVICE,
            detail: e.to_string(),
        })
    }
}

#[async_trait]
impl RecipeGenerator for OpenAiClient {
    async fn generate(&self, ingredients: &[String]) -> RecipeResult<String> {
        if ingredients.is_empty() {
            return Err(RecipeError::NoIngredientsSelected);
        }

        let request = ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage::system(SYSTEM_PROMPT),
                ChatMessage::user(recipe_prompt(ingredients)),
            ],
            temperature: Some(0.8),
            max_tokens: Some(1000),
        };

        let response = self.call_chat_completion(&request).await?;
        let choice = response.choices.into_iter().next();
        let finish_reason = choice.as_ref().and_then(|c| c.finish_reason.clone());
        tracing::debug!(
            id = response.id.as_deref().unwrap_or("-"),
            model = response.model.as_deref().unwrap_or(self.model.as_str()),
            finish_reason = finish_reason.as_deref().unwrap_or("-"),
            "Chat completion received"
        );
        if finish_reason.as_deref() == Some(FINISH_REASON_LENGTH) {
            tracing::warn!("AI reply was cut off at the token limit");
        }
        let content = choice
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or_else(|| {
                RecipeError::MalformedAIResponse("no message content in response".to_string())
            })?;

        tracing::debug!(model = %self.model, chars = content.len(), "AI recipe text received");
        Ok(content)
    }

    fn name(&self) -> &'static str {
        OPENAI_SERVICE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_lists_ingredients() {
        let prompt = recipe_prompt(&["egg".to_string(), "pasta".to_string()]);
        assert!(prompt.contains("egg, pasta."));
        assert!(prompt.contains("\"instructions\""));
    }

    #[tokio::test]
    async fn test_missing_api_key_error() {
        let client = OpenAiClient::with_defaults(None);
        let result = client.generate(&["egg".to_string()]).await;
        assert!(matches!(result, Err(RecipeError::MissingCredential(OPENAI_KEY_VAR))));
    }

    #[tokio::test]
    async fn test_no_ingredients_is_rejected_before_network() {
        let client = OpenAiClient::new(Some("key".to_string()), "http://127.0.0.1:9", "m");
        let result = client.generate(&[]).await;
        assert!(matches!(result, Err(RecipeError::NoIngredientsSelected)));
    }
}
