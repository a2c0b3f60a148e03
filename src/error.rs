use reqwest::StatusCode;

/// Everything that can go wrong between the user picking ingredients and a
/// recipe card being shown.
#[derive(thiserror::Error, Debug)]
pub enum RecipeError {
    #[error("no ingredients selected")]
    NoIngredientsSelected,

    #[error("API key not configured: {0}")]
    MissingCredential(&'static str),

    #[error("unknown ingredient: {0}")]
    UnknownIngredient(String),

    #[error("{service} rejected the API key")]
    Unauthorized { service: &'static str },

    #[error("{service} request limit exceeded")]
    RateLimited { service: &'static str },

    #[error("{service} returned status {status}: {body}")]
    UpstreamStatus {
        service: &'static str,
        status: StatusCode,
        body: String,
    },

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("{service} sent a response we could not read: {detail}")]
    MalformedResponse {
        service: &'static str,
        detail: String,
    },

    #[error("AI response did not contain a recipe object: {0}")]
    MalformedAIResponse(String),

    #[error("storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("stored favorites are not valid JSON: {0}")]
    StorageFormat(#[from] serde_json::Error),

    #[error("catalog error: {0}")]
    Catalog(String),
}

impl RecipeError {
    /// Maps a non-success HTTP status onto the upstream error classes.
    ///
    /// Spoonacular answers 402 when the daily quota is used up, everyone else
    /// uses 429.
    pub fn from_status(service: &'static str, status: StatusCode, body: String) -> Self {
        match status {
            StatusCode::UNAUTHORIZED => RecipeError::Unauthorized { service },
            StatusCode::PAYMENT_REQUIRED | StatusCode::TOO_MANY_REQUESTS => {
                RecipeError::RateLimited { service }
            }
            _ => RecipeError::UpstreamStatus {
                service,
                status,
                body,
            },
        }
    }

    /// True for errors caused by what the user typed or configured.
    pub fn is_user_input(&self) -> bool {
        matches!(
            self,
            RecipeError::NoIngredientsSelected
                | RecipeError::MissingCredential(_)
                | RecipeError::UnknownIngredient(_)
        )
    }

    /// Short message suitable for the results area.
    pub fn user_message(&self) -> String {
        match self {
            RecipeError::NoIngredientsSelected => "Select at least one ingredient!".to_string(),
            RecipeError::MissingCredential(key) => format!("Set {} to use this source.", key),
            RecipeError::UnknownIngredient(name) => {
                format!("'{}' is not on the ingredient list.", name)
            }
            RecipeError::Unauthorized { service } => format!("Invalid {} API key!", service),
            RecipeError::RateLimited { service } => {
                format!("{} request limit exceeded, try again later.", service)
            }
            RecipeError::UpstreamStatus {
                service, status, ..
            } => format!("{} API error: {}", service, status.as_u16()),
            RecipeError::Network(_) => {
                "Connection failed. Check your internet connection and API key.".to_string()
            }
            RecipeError::MalformedResponse { service, .. } => {
                format!("{} returned an unexpected response.", service)
            }
            RecipeError::MalformedAIResponse(_) => {
                "The AI did not return a recipe in the expected format.".to_string()
            }
            RecipeError::Storage(_) | RecipeError::StorageFormat(_) => {
                "Could not read or write favorites.".to_string()
            }
            RecipeError::Catalog(detail) => format!("Recipe catalog problem: {}", detail),
        }
    }
}

pub type RecipeResult<T> = Result<T, RecipeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        assert!(matches!(
            RecipeError::from_status("Spoonacular", StatusCode::UNAUTHORIZED, String::new()),
            RecipeError::Unauthorized { service: "Spoonacular" }
        ));
        assert!(matches!(
            RecipeError::from_status("Spoonacular", StatusCode::PAYMENT_REQUIRED, String::new()),
            RecipeError::RateLimited { .. }
        ));
        assert!(matches!(
            RecipeError::from_status("OpenAI", StatusCode::TOO_MANY_REQUESTS, String::new()),
            RecipeError::RateLimited { service: "OpenAI" }
        ));
        match RecipeError::from_status("OpenAI", StatusCode::BAD_GATEWAY, "down".to_string()) {
            RecipeError::UpstreamStatus { status, body, .. } => {
                assert_eq!(status, StatusCode::BAD_GATEWAY);
                assert_eq!(body, "down");
            }
            other => panic!("unexpected classification: {:?}", other),
        }
    }

    #[test]
    fn test_user_input_errors() {
        assert!(RecipeError::NoIngredientsSelected.is_user_input());
        assert!(RecipeError::MissingCredential("OPENAI_API_KEY").is_user_input());
        assert!(!RecipeError::RateLimited { service: "OpenAI" }.is_user_input());
    }

    #[test]
    fn test_user_message_mentions_status_code() {
        let err = RecipeError::from_status("Spoonacular", StatusCode::NOT_FOUND, String::new());
        assert_eq!(err.user_message(), "Spoonacular API error: 404");
    }
}
