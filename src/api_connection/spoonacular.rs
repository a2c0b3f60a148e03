use async_trait::async_trait;
use reqwest::Client;

use super::connection::{ensure_success, http_client, require_key};
use super::endpoints::{
    RecipeDetails, SearchHit, DEFAULT_SPOONACULAR_URL, SEARCH_RESULT_COUNT, SPOONACULAR_SERVICE,
};
use super::RecipeSearchProvider;
use crate::config::SPOONACULAR_KEY_VAR;
use crate::error::{RecipeError, RecipeResult};

#[derive(Clone)]
pub struct SpoonacularClient {
    http_client: Client,
    api_key: Option<String>,
    api_url: String,
}

impl SpoonacularClient {
    pub fn new(api_key: Option<String>, api_url: impl Into<String>) -> Self {
        Self {
            http_client: http_client(),
            api_key,
            api_url: api_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn with_default_url(api_key: Option<String>) -> Self {
        Self::new(api_key, DEFAULT_SPOONACULAR_URL)
    }

    async fn fetch_details(&self, id: u64) -> RecipeResult<RecipeDetails> {
        let api_key = require_key(self.api_key.as_deref(), SPOONACULAR_KEY_VAR)?;
        let url = format!("{}/recipes/{}/information", self.api_url, id);

        let response = self
            .http_client
            .get(&url)
            .query(&[("apiKey", api_key), ("includeNutrition", "false")])
            .send()
            .await?;
        let response = ensure_success(SPOONACULAR_SERVICE, response).await?;

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| RecipeError::MalformedResponse {
            service: SPOONACULAR_SERVICE,
            detail: e.to_string(),
        })
    }
}

#[async_trait]
impl RecipeSearchProvider for SpoonacularClient {
    async fn find_by_ingredients(&self, ingredients: &[String]) -> RecipeResult<Vec<SearchHit>> {
        let api_key = require_key(self.api_key.as_deref(), SPOONACULAR_KEY_VAR)?;
        if ingredients.is_empty() {
            return Err(RecipeError::NoIngredientsSelected);
        }

        let url = format!("{}/recipes/findByIngredients", self.api_url);
        let joined = ingredients.join(",");
        let number = SEARCH_RESULT_COUNT.to_string();

        let response = self
            .http_client
            .get(&url)
            .query(&[
                ("apiKey", api_key),
                ("ingredients", joined.as_str()),
                ("number", number.as_str()),
                ("ranking", "2"),
                ("ignorePantry", "false"),
            ])
            .send()
            .await?;
        let response = ensure_success(SPOONACULAR_SERVICE, response).await?;

        let body = response.text().await?;
        let hits: Vec<SearchHit> = serde_json::from_str(&body).map_err(|e| {
            tracing::error!(error = %e, "Failed to deserialize Spoonacular search response");
            RecipeError::MalformedResponse {
                service: SPOONACULAR_SERVICE,
                detail: e.to_string(),
            }
        })?;

        tracing::info!(
            ingredients = %joined,
            results = hits.len(),
            provider = SPOONACULAR_SERVICE,
            "Ingredient search completed"
        );
        Ok(hits)
    }

    async fn recipe_details(&self, id: u64) -> Option<RecipeDetails> {
        match self.fetch_details(id).await {
            Ok(details) => Some(details),
            Err(e) => {
                tracing::warn!(recipe_id = id, error = %e, "Recipe details unavailable");
                None
            }
        }
    }

    fn name(&self) -> &'static str {
        SPOONACULAR_SERVICE
    }
}
