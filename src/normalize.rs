//! Turns records from the three sources into [`Recipe`] / [`MatchResult`].
//!
//! Local catalog entries already have the shape. Spoonacular candidates bring
//! their own used/missed ingredient lists, so their coverage is computed here
//! instead of by the matcher. AI output is free text that should contain one
//! JSON object somewhere inside it.

use rand::Rng;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::api_connection::endpoints::{RecipeDetails, SearchHit};
use crate::error::{RecipeError, RecipeResult};
use crate::matcher::{coverage_percent, MatchResult};
use crate::recipe::{Diet, FilterOptions, PrepTime, Provenance, Recipe, RecipeId};

pub const MIN_ESTIMATED_SAVINGS: u32 = 25;
pub const MAX_ESTIMATED_SAVINGS: u32 = 39;
/// Servings assumed when a source does not say.
pub const DEFAULT_SERVINGS: u32 = 2;

/// Estimates how much cooking a recipe saves compared with eating out.
pub trait SavingsEstimator: Send + Sync {
    fn estimate_savings(&self, recipe: &Recipe) -> u32;
}

/// Uniform pick from 25..=39.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomSavings;

impl SavingsEstimator for RandomSavings {
    fn estimate_savings(&self, _recipe: &Recipe) -> u32 {
        rand::thread_rng().gen_range(MIN_ESTIMATED_SAVINGS..=MAX_ESTIMATED_SAVINGS)
    }
}

/// Always the same amount. Used by tests and reproducible runs.
#[derive(Debug, Clone, Copy)]
pub struct FixedSavings(pub u32);

impl SavingsEstimator for FixedSavings {
    fn estimate_savings(&self, _recipe: &Recipe) -> u32 {
        self.0
    }
}

impl<F> SavingsEstimator for F
where
    F: Fn(&Recipe) -> u32 + Send + Sync,
{
    fn estimate_savings(&self, recipe: &Recipe) -> u32 {
        self(recipe)
    }
}

/// Converts a Spoonacular candidate (plus its details, if the lookup worked).
fn remote_title(hit: &SearchHit, details: Option<&RecipeDetails>) -> String {
    let title = hit.title.trim();
    if !title.is_empty() {
        return title.to_string();
    }
    details
        .and_then(|d| d.title.as_deref())
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .unwrap_or(title)
        .to_string()
}

pub fn from_remote(
    hit: &SearchHit,
    details: Option<&RecipeDetails>,
    filters: &FilterOptions,
    estimator: &dyn SavingsEstimator,
) -> MatchResult {
    let used = hit.used_ingredients.len();
    let missed = hit.missed_ingredients.len();
    let coverage = coverage_percent(used, used + missed);

    let ingredients = details
        .map(RecipeDetails::ingredient_lines)
        .filter(|lines| !lines.is_empty())
        .unwrap_or_else(|| {
            hit.used_ingredients
                .iter()
                .chain(&hit.missed_ingredients)
                .map(|ing| ing.original.clone().unwrap_or_else(|| ing.name.clone()))
                .collect()
        });
    let missing = hit
        .missed_ingredients
        .iter()
        .map(|ing| ing.name.clone())
        .collect();

    let mut recipe = Recipe {
        id: RecipeId::remote(hit.id),
        name: remote_title(hit, details),
        ingredients,
        prep_time: details
            .and_then(|d| d.ready_in_minutes)
            .map(PrepTime::Minutes)
            .unwrap_or(PrepTime::Unknown),
        servings: details
            .and_then(|d| d.servings)
            .unwrap_or(DEFAULT_SERVINGS),
        diet: details
            .map(|d| Diet::from_flags(d.vegetarian, d.vegan))
            .unwrap_or_default(),
        portable: true,
        savings: 0,
        instructions: details.map(RecipeDetails::steps).unwrap_or_default(),
        tip: None,
        provenance: Provenance::RemoteApi,
        source_url: details.and_then(|d| d.source_url.clone()),
        image: hit
            .image
            .clone()
            .or_else(|| details.and_then(|d| d.image.clone())),
        details_available: details.is_some(),
    };
    recipe.savings = estimator.estimate_savings(&recipe);

    MatchResult {
        recipe,
        coverage,
        missing,
        admitted_by: *filters,
    }
}

/// Finds the first top-level JSON object embedded in `text`.
///
/// Only braces outside any earlier object are tried as start positions; each
/// is handed to a streaming deserializer, which stops at the end of the first
/// complete value. Commentary and code fences around the object are ignored,
/// and an object cut off mid-way never yields one of its nested objects.
pub fn locate_json_object(text: &str) -> RecipeResult<Map<String, Value>> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (pos, byte) in text.bytes().enumerate() {
        if in_string {
            if escaped {
                escaped = false;
            } else if byte == b'\\' {
                escaped = true;
            } else if byte == b'"' {
                in_string = false;
            }
            continue;
        }
        match byte {
            b'{' => {
                if depth == 0 {
                    let mut values =
                        serde_json::Deserializer::from_str(&text[pos..]).into_iter::<Value>();
                    if let Some(Ok(Value::Object(object))) = values.next() {
                        return Ok(object);
                    }
                }
                depth += 1;
            }
            b'}' => depth = depth.saturating_sub(1),
            b'"' if depth > 0 => in_string = true,
            _ => {}
        }
    }
    Err(RecipeError::MalformedAIResponse(
        "no JSON object found in model output".to_string(),
    ))
}

#[derive(Debug, Deserialize)]
struct GeneratedRecipe {
    #[serde(alias = "title", alias = "nazwa")]
    name: String,
    #[serde(default, alias = "skladniki")]
    ingredients: Vec<String>,
    #[serde(default, alias = "prep_time", alias = "czas")]
    time: Option<Value>,
    #[serde(default, alias = "porcje")]
    servings: Option<Value>,
    #[serde(default, alias = "dieta")]
    diet: Option<String>,
    #[serde(default, alias = "steps", alias = "instrukcje")]
    instructions: Vec<String>,
    #[serde(default, alias = "tips", alias = "wskazowki")]
    tip: Option<String>,
    #[serde(default)]
    savings: Option<u32>,
}

/// Numbers, or strings that start with one ("2", "2 servings").
fn leading_number(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => match PrepTime::parse(s) {
            PrepTime::Minutes(n) => Some(n),
            _ => None,
        },
        _ => None,
    }
}

fn prep_time_from(value: Option<&Value>) -> PrepTime {
    match value {
        Some(Value::String(s)) => PrepTime::parse(s),
        Some(other) => leading_number(other)
            .map(PrepTime::Minutes)
            .unwrap_or(PrepTime::Unknown),
        None => PrepTime::Unknown,
    }
}

/// Parses raw model output into a recipe with a fresh id.
pub fn from_ai_text(raw: &str, estimator: &dyn SavingsEstimator) -> RecipeResult<Recipe> {
    let object = locate_json_object(raw)?;
    let generated: GeneratedRecipe = serde_json::from_value(Value::Object(object))
        .map_err(|e| RecipeError::MalformedAIResponse(e.to_string()))?;

    let name = generated.name.trim().to_string();
    if name.is_empty() {
        return Err(RecipeError::MalformedAIResponse(
            "recipe has no name".to_string(),
        ));
    }

    let mut recipe = Recipe {
        id: RecipeId::generated(),
        name,
        ingredients: generated.ingredients,
        prep_time: prep_time_from(generated.time.as_ref()),
        servings: generated
            .servings
            .as_ref()
            .and_then(leading_number)
            .unwrap_or(DEFAULT_SERVINGS),
        diet: generated
            .diet
            .as_deref()
            .map(Diet::parse)
            .unwrap_or_default(),
        portable: true,
        savings: 0,
        instructions: generated.instructions,
        tip: generated.tip.filter(|t| !t.trim().is_empty()),
        provenance: Provenance::AiGenerated,
        source_url: None,
        image: None,
        details_available: true,
    };
    recipe.savings = match generated.savings {
        Some(savings) => savings,
        None => estimator.estimate_savings(&recipe),
    };

    tracing::info!(
        recipe_id = %recipe.id,
        name = %recipe.name,
        steps = recipe.instructions.len(),
        "AI recipe parsed"
    );
    Ok(recipe)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api_connection::endpoints::{ExtendedIngredient, SearchIngredient};

    fn ingredient(name: &str) -> SearchIngredient {
        SearchIngredient {
            name: name.to_string(),
            original: None,
        }
    }

    fn hit(used: &[&str], missed: &[&str]) -> SearchHit {
        SearchHit {
            id: 42,
            title: "Tomato pasta".to_string(),
            image: None,
            used_ingredients: used.iter().map(|n| ingredient(n)).collect(),
            missed_ingredients: missed.iter().map(|n| ingredient(n)).collect(),
        }
    }

    #[test]
    fn test_random_savings_stay_in_range() {
        let recipe = from_remote(&hit(&[], &[]), None, &FilterOptions::default(), &FixedSavings(0)).recipe;
        for _ in 0..500 {
            let value = RandomSavings.estimate_savings(&recipe);
            assert!((MIN_ESTIMATED_SAVINGS..=MAX_ESTIMATED_SAVINGS).contains(&value));
        }
    }

    #[test]
    fn test_remote_coverage_from_used_and_missed() {
        let result = from_remote(
            &hit(&["pasta", "tomato", "garlic"], &["basil"]),
            None,
            &FilterOptions::default(),
            &FixedSavings(31),
        );
        assert_eq!(result.coverage, 75.0);
        assert_eq!(result.missing, vec!["basil"]);
        assert_eq!(result.recipe.ingredients, vec!["pasta", "tomato", "garlic", "basil"]);
        assert_eq!(result.recipe.savings, 31);
        assert_eq!(result.recipe.provenance, Provenance::RemoteApi);
        assert!(!result.recipe.details_available);
        assert_eq!(result.recipe.servings, DEFAULT_SERVINGS);
    }

    #[test]
    fn test_remote_ingredients_use_detail_lines() {
        let details = RecipeDetails {
            id: 42,
            title: Some("Tomato pasta with basil".to_string()),
            extended_ingredients: vec![
                ExtendedIngredient {
                    name: "pasta".to_string(),
                    original: "200 g spaghetti".to_string(),
                },
                ExtendedIngredient {
                    name: "basil".to_string(),
                    original: String::new(),
                },
            ],
            ..Default::default()
        };
        let result = from_remote(
            &hit(&["pasta"], &["basil"]),
            Some(&details),
            &FilterOptions::default(),
            &FixedSavings(30),
        );
        assert_eq!(result.recipe.ingredients, vec!["200 g spaghetti", "basil"]);
        assert_eq!(result.recipe.name, "Tomato pasta");
        assert_eq!(result.missing, vec!["basil"]);

        let untitled = SearchHit {
            title: "  ".to_string(),
            ..hit(&["pasta"], &[])
        };
        let result = from_remote(&untitled, Some(&details), &FilterOptions::default(), &FixedSavings(30));
        assert_eq!(result.recipe.name, "Tomato pasta with basil");
    }

    #[test]
    fn test_remote_search_lines_without_details() {
        let mut remote = hit(&["pasta"], &["basil"]);
        remote.used_ingredients[0].original = Some("1 lb penne".to_string());
        let result = from_remote(&remote, None, &FilterOptions::default(), &FixedSavings(30));
        assert_eq!(result.recipe.ingredients, vec!["1 lb penne", "basil"]);
        assert_eq!(result.missing, vec!["basil"]);
    }

    #[test]
    fn test_remote_without_ingredient_lists_has_zero_coverage() {
        let result = from_remote(&hit(&[], &[]), None, &FilterOptions::default(), &FixedSavings(30));
        assert_eq!(result.coverage, 0.0);
    }

    #[test]
    fn test_remote_details_map_diet_and_time() {
        let details = RecipeDetails {
            id: 42,
            ready_in_minutes: Some(15),
            servings: Some(4),
            vegetarian: true,
            vegan: true,
            source_url: Some("https://example.com/pasta".to_string()),
            ..Default::default()
        };
        let result = from_remote(
            &hit(&["pasta"], &[]),
            Some(&details),
            &FilterOptions::default(),
            &FixedSavings(30),
        );
        assert_eq!(result.recipe.diet, Diet::Vegan);
        assert!(result.recipe.prep_time.is_quick());
        assert_eq!(result.recipe.servings, 4);
        assert_eq!(result.recipe.source_url.as_deref(), Some("https://example.com/pasta"));
        assert!(result.recipe.details_available);

        let slow = RecipeDetails {
            ready_in_minutes: Some(16),
            vegetarian: true,
            ..details
        };
        let result = from_remote(&hit(&["pasta"], &[]), Some(&slow), &FilterOptions::default(), &FixedSavings(30));
        assert!(!result.recipe.prep_time.is_quick());
    }

    #[test]
    fn test_locates_object_inside_commentary() {
        let raw = "Here you go: {\"nazwa\":\"X\", \"porcje\": 2} enjoy!";
        let object = locate_json_object(raw).unwrap();
        assert_eq!(object["nazwa"], "X");
        assert_eq!(object["porcje"], 2);
    }

    #[test]
    fn test_locates_outer_object_with_nested_braces() {
        let raw = "```json\n{\"name\": \"Pie\", \"extra\": {\"a\": \"}\"}}\n```";
        let object = locate_json_object(raw).unwrap();
        assert_eq!(object["name"], "Pie");
        assert_eq!(object["extra"]["a"], "}");
    }

    #[test]
    fn test_skips_braces_that_do_not_start_json() {
        let raw = "Use {your} pan. {\"name\": \"Toast\"} done";
        let object = locate_json_object(raw).unwrap();
        assert_eq!(object["name"], "Toast");
    }

    #[test]
    fn test_truncated_object_does_not_yield_nested_one() {
        let raw = "{\"outer\": {\"name\": \"Inner\"}, broken";
        assert!(matches!(
            locate_json_object(raw),
            Err(RecipeError::MalformedAIResponse(_))
        ));

        let raw = "{\"cut\": \"{off\", \"x\": {\"a\": 1} ... {\"name\": \"Late\"}";
        assert!(locate_json_object(raw).is_err());
    }

    #[test]
    fn test_object_after_closed_prose_braces_is_found() {
        let raw = "{not json} then {\"name\": \"Soup\", \"x\": {\"y\": 1}}";
        let object = locate_json_object(raw).unwrap();
        assert_eq!(object["name"], "Soup");
    }

    #[test]
    fn test_no_object_is_malformed() {
        for raw in ["Sorry, I cannot help.", "{\"name\": \"cut off", "[1, 2, 3]", ""] {
            assert!(
                matches!(locate_json_object(raw), Err(RecipeError::MalformedAIResponse(_))),
                "expected failure for {:?}",
                raw
            );
        }
    }

    #[test]
    fn test_ai_recipe_normalised() {
        let raw = r#"Sure! {
            "name": "Egg fried rice",
            "ingredients": ["200 g rice", "2 eggs", "1 tbsp soy sauce"],
            "time": "12 minutes",
            "servings": 2,
            "diet": "vegetarian",
            "instructions": ["Cook the rice.", "Fry with eggs.", "Season."],
            "tip": "Day-old rice works best."
        } Enjoy your meal."#;
        let recipe = from_ai_text(raw, &FixedSavings(27)).unwrap();

        assert_eq!(recipe.name, "Egg fried rice");
        assert!(recipe.id.as_str().starts_with("ai-"));
        assert_eq!(recipe.provenance, Provenance::AiGenerated);
        assert!(recipe.portable);
        assert_eq!(recipe.savings, 27);
        assert_eq!(recipe.prep_time, PrepTime::Minutes(12));
        assert!(recipe.prep_time.is_quick());
        assert_eq!(recipe.diet, Diet::Vegetarian);
        assert_eq!(recipe.instructions.len(), 3);
        assert_eq!(recipe.tip.as_deref(), Some("Day-old rice works best."));
    }

    #[test]
    fn test_ai_recipe_with_polish_keys() {
        let raw = "Here you go: {\"nazwa\":\"X\", \"skladniki\":[\"2 jajka\", \"makaron\"], \"czas\":\"10 minut\", \"porcje\":2, \"dieta\":\"wegetariańska\", \"instrukcje\":[\"Ugotuj makaron.\"], \"wskazowki\":\"Dodaj ser.\"} enjoy!";
        let recipe = from_ai_text(raw, &FixedSavings(26)).unwrap();

        assert_eq!(recipe.name, "X");
        assert_eq!(recipe.ingredients, vec!["2 jajka", "makaron"]);
        assert_eq!(recipe.prep_time, PrepTime::Minutes(10));
        assert_eq!(recipe.servings, 2);
        assert_eq!(recipe.diet, Diet::Vegetarian);
        assert_eq!(recipe.instructions, vec!["Ugotuj makaron."]);
        assert_eq!(recipe.tip.as_deref(), Some("Dodaj ser."));
        assert_eq!(recipe.savings, 26);
    }

    #[test]
    fn test_ai_supplied_savings_are_kept() {
        let raw = r#"{"name": "Soup", "savings": 18, "servings": "4 servings"}"#;
        let estimator = |_: &Recipe| -> u32 { panic!("estimator should not be called") };
        let recipe = from_ai_text(raw, &estimator).unwrap();
        assert_eq!(recipe.savings, 18);
        assert_eq!(recipe.servings, 4);
        assert_eq!(recipe.prep_time, PrepTime::Unknown);
    }

    #[test]
    fn test_ai_ids_are_fresh() {
        let raw = r#"{"name": "Soup"}"#;
        let a = from_ai_text(raw, &FixedSavings(30)).unwrap();
        let b = from_ai_text(raw, &FixedSavings(30)).unwrap();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_ai_object_without_name_is_malformed() {
        let result = from_ai_text(r#"{"ingredients": ["egg"]}"#, &FixedSavings(30));
        assert!(matches!(result, Err(RecipeError::MalformedAIResponse(_))));
        let result = from_ai_text(r#"{"name": "  "}"#, &FixedSavings(30));
        assert!(matches!(result, Err(RecipeError::MalformedAIResponse(_))));
    }
}
