//! External recipe services.
//!
//! The search side (Spoonacular) returns candidates plus per-recipe details;
//! the generation side (OpenAI) returns raw model text that the normaliser
//! turns into a recipe. Both sit behind traits so the search pipeline can be
//! driven by stubs in tests.
use async_trait::async_trait;

use crate::error::RecipeResult;

pub mod connection;
pub mod endpoints;
pub mod openai;
pub mod spoonacular;

pub use endpoints::{RecipeDetails, SearchHit};
pub use openai::OpenAiClient;
pub use spoonacular::SpoonacularClient;

#[async_trait]
pub trait RecipeSearchProvider: Send + Sync {
    /// Candidates using some of `ingredients`, each with used/missed lists.
    async fn find_by_ingredients(&self, ingredients: &[String]) -> RecipeResult<Vec<SearchHit>>;

    /// Extended fields for one candidate.
    ///
    /// Failures are swallowed and reported as `None`; callers degrade the
    /// single recipe instead of aborting.
    async fn recipe_details(&self, id: u64) -> Option<RecipeDetails>;

    fn name(&self) -> &'static str;
}

#[async_trait]
pub trait RecipeGenerator: Send + Sync {
    /// Raw model output expected to embed one recipe JSON object.
    async fn generate(&self, ingredients: &[String]) -> RecipeResult<String>;

    fn name(&self) -> &'static str;
}
