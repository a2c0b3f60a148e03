use serde::{Deserialize, Serialize};

pub const SPOONACULAR_SERVICE: &str = "Spoonacular";
pub const OPENAI_SERVICE: &str = "OpenAI";

pub const DEFAULT_SPOONACULAR_URL: &str = "https://api.spoonacular.com";
pub const DEFAULT_OPENAI_URL: &str = "https://api.openai.com";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-3.5-turbo";

/// Number of candidates requested from `findByIngredients`.
pub const SEARCH_RESULT_COUNT: u32 = 20;
/// Candidates that get a detail lookup; the rest are dropped.
pub const DETAIL_LOOKUP_LIMIT: usize = 15;

// --- OpenAI chat completions ---

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Serialize, Clone)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChatCompletionResponseMessage {
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChatCompletionChoice {
    pub message: ChatCompletionResponseMessage,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Finish reason of a reply cut off by `max_tokens`.
pub const FINISH_REASON_LENGTH: &str = "length";

#[derive(Debug, Deserialize, Clone)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    pub choices: Vec<ChatCompletionChoice>,
}

// --- Spoonacular ---

/// One entry of a `usedIngredients` / `missedIngredients` list.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SearchIngredient {
    pub name: String,
    #[serde(default)]
    pub original: Option<String>,
}

/// One candidate from `/recipes/findByIngredients`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SearchHit {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub used_ingredients: Vec<SearchIngredient>,
    #[serde(default)]
    pub missed_ingredients: Vec<SearchIngredient>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct InstructionStep {
    #[serde(default)]
    pub number: u32,
    pub step: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AnalyzedInstruction {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub steps: Vec<InstructionStep>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ExtendedIngredient {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub original: String,
}

/// The subset of `/recipes/{id}/information` the app uses.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct RecipeDetails {
    pub id: u64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub ready_in_minutes: Option<u32>,
    #[serde(default)]
    pub servings: Option<u32>,
    #[serde(default)]
    pub vegetarian: bool,
    #[serde(default)]
    pub vegan: bool,
    #[serde(default)]
    pub source_url: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub instructions: Option<String>,
    #[serde(default)]
    pub analyzed_instructions: Vec<AnalyzedInstruction>,
    #[serde(default)]
    pub extended_ingredients: Vec<ExtendedIngredient>,
}

impl RecipeDetails {
    /// Ingredient lines as written in the recipe, e.g. "2 cups flour".
    pub fn ingredient_lines(&self) -> Vec<String> {
        self.extended_ingredients
            .iter()
            .map(|ing| {
                if ing.original.trim().is_empty() {
                    ing.name.clone()
                } else {
                    ing.original.trim().to_string()
                }
            })
            .filter(|line| !line.is_empty())
            .collect()
    }

    /// Structured steps when present, else the free-text instructions as a
    /// single step.
    pub fn steps(&self) -> Vec<String> {
        let structured: Vec<String> = self
            .analyzed_instructions
            .first()
            .map(|block| block.steps.iter().map(|s| s.step.clone()).collect())
            .unwrap_or_default();
        if !structured.is_empty() {
            return structured;
        }
        self.instructions
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .map(|text| vec![text.to_string()])
            .unwrap_or_default()
    }
}
