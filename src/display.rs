//! Plain-text rendering of search results, recipes and favorites.

use std::fmt::Write;

use crate::catalog::DEFAULT_SAVINGS;
use crate::error::RecipeResult;
use crate::favorites::{AddOutcome, FavoriteRecord};
use crate::matcher::{MatchOutcome, MatchResult};
use crate::recipe::{Provenance, Recipe};
use crate::session::DisplayState;

/// Missing ingredients listed on a card before the rest are summarised.
pub const MAX_MISSING_ON_CARD: usize = 5;
/// Missing ingredients repeated in the "cook it" reminder.
pub const MAX_MISSING_IN_SUMMARY: usize = 3;

const NO_INGREDIENTS_MESSAGE: &str = "Select at least one ingredient!";

pub fn results_headline(count: usize) -> String {
    match count {
        0 => "No matching recipes. Try changing the ingredients or filters.".to_string(),
        1 => "Found 1 recipe".to_string(),
        n => format!("Found {} recipes", n),
    }
}

fn missing_line(missing: &[String]) -> String {
    if missing.is_empty() {
        return "You have everything!".to_string();
    }
    let shown = missing
        .iter()
        .take(MAX_MISSING_ON_CARD)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    if missing.len() > MAX_MISSING_ON_CARD {
        format!("Missing: {} (+{} more)", shown, missing.len() - MAX_MISSING_ON_CARD)
    } else {
        format!("Missing: {}", shown)
    }
}

fn meta_line(recipe: &Recipe) -> String {
    let mut line = format!(
        "{} | {} servings | {}",
        recipe.prep_time, recipe.servings, recipe.diet
    );
    if recipe.portable {
        line.push_str(" | lunchbox");
    }
    line
}

/// One search result as a short card.
pub fn render_card(result: &MatchResult) -> String {
    let recipe = &result.recipe;
    let mut card = format!("[{}] {}", recipe.id, recipe.name);
    if recipe.provenance != Provenance::Local {
        let _ = write!(card, " ({})", recipe.provenance.badge());
    }
    let _ = write!(card, "\n  {}", meta_line(recipe));
    let _ = write!(card, "\n  Match: {:.0}%", result.coverage);
    let _ = write!(card, "\n  {}", missing_line(&result.missing));
    if !recipe.details_available {
        card.push_str("\n  Details unavailable");
    }
    card
}

pub fn render_outcome(outcome: &MatchOutcome) -> String {
    match outcome {
        MatchOutcome::NoIngredientsSelected => NO_INGREDIENTS_MESSAGE.to_string(),
        MatchOutcome::Matches(matches) => render_results(matches),
    }
}

fn render_results(matches: &[MatchResult]) -> String {
    let mut out = results_headline(matches.len());
    for result in matches {
        out.push_str("\n\n");
        out.push_str(&render_card(result));
    }
    out
}

/// Full recipe view: shopping list, ingredients, steps, tip and savings.
pub fn render_details(recipe: &Recipe, missing: &[String]) -> String {
    let mut out = format!("{}\n{}\n", recipe.name, meta_line(recipe));

    if !missing.is_empty() {
        out.push_str("\nShopping list:\n");
        for item in missing {
            let _ = writeln!(out, "  - {}", item);
        }
    }

    out.push_str("\nIngredients:\n");
    for item in &recipe.ingredients {
        let _ = writeln!(out, "  - {}", item);
    }

    out.push_str("\nSteps:\n");
    if recipe.instructions.is_empty() {
        match &recipe.source_url {
            Some(_) => out.push_str("  See the full recipe at the source link below.\n"),
            None => out.push_str("  Combine the ingredients and cook to taste.\n"),
        }
    } else {
        for (i, step) in recipe.instructions.iter().enumerate() {
            let _ = writeln!(out, "  {}. {}", i + 1, step);
        }
    }

    if let Some(tip) = &recipe.tip {
        let _ = write!(out, "\nTip: {}\n", tip);
    }
    let _ = write!(
        out,
        "\nYou save about {} compared with eating out.\n",
        savings_or_default(recipe)
    );
    if let Some(url) = &recipe.source_url {
        let _ = writeln!(out, "Source: {}", url);
    }
    out
}

fn savings_or_default(recipe: &Recipe) -> u32 {
    if recipe.savings == 0 {
        DEFAULT_SAVINGS
    } else {
        recipe.savings
    }
}

/// Message shown once the user decides to cook a recipe.
pub fn cook_summary(recipe: &Recipe, missing: &[String]) -> String {
    let mut out = format!(
        "Enjoy your {}!\nYou save about {} by cooking at home.\n",
        recipe.name,
        savings_or_default(recipe)
    );
    if !missing.is_empty() {
        let shown = missing
            .iter()
            .take(MAX_MISSING_IN_SUMMARY)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        let _ = write!(out, "Remember to buy: {}", shown);
        if missing.len() > MAX_MISSING_IN_SUMMARY {
            let _ = write!(out, " (and {} more)", missing.len() - MAX_MISSING_IN_SUMMARY);
        }
        out.push('\n');
    }
    out.push_str("Less food wasted, more money saved.\n");
    out
}

/// Outcome of "add to favorites"; a storage failure becomes its message.
pub fn favorite_saved_message(name: &str, result: &RecipeResult<AddOutcome>) -> String {
    match result {
        Ok(AddOutcome::Added) => format!("Added '{}' to favorites.", name),
        Ok(AddOutcome::AlreadyExists) => format!("'{}' is already in your favorites.", name),
        Err(e) => format!("Error: {}", e.user_message()),
    }
}

pub fn render_favorite(favorite: &FavoriteRecord) -> String {
    let recipe = &favorite.recipe;
    format!(
        "[{}] {} ({})\n  {}\n  Saved {}",
        recipe.id,
        recipe.name,
        recipe.provenance.badge(),
        meta_line(recipe),
        favorite.added_at.format("%Y-%m-%d %H:%M UTC")
    )
}

pub fn render_favorites(favorites: &[FavoriteRecord]) -> String {
    if favorites.is_empty() {
        return "No favorite recipes yet.".to_string();
    }
    let mut out = format!("Favorites ({})", favorites.len());
    for favorite in favorites {
        out.push_str("\n\n");
        out.push_str(&render_favorite(favorite));
    }
    out
}

pub fn render_state(state: &DisplayState) -> String {
    match state {
        DisplayState::Idle => String::new(),
        DisplayState::Loading => "Loading...".to_string(),
        DisplayState::NoIngredients => NO_INGREDIENTS_MESSAGE.to_string(),
        DisplayState::Results(matches) => render_results(matches),
        DisplayState::Recipe(recipe) => render_details(recipe, &[]),
        DisplayState::Error(message) => format!("Error: {}", message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::builtin_catalog;
    use crate::error::RecipeError;
    use crate::recipe::{FilterOptions, RecipeId};
    use chrono::{TimeZone, Utc};

    fn result_with_missing(missing: &[&str]) -> MatchResult {
        MatchResult {
            recipe: builtin_catalog().remove(0),
            coverage: 200.0 / 3.0,
            missing: missing.iter().map(|s| s.to_string()).collect(),
            admitted_by: FilterOptions::default(),
        }
    }

    #[test]
    fn test_headlines() {
        assert!(results_headline(0).starts_with("No matching recipes"));
        assert_eq!(results_headline(1), "Found 1 recipe");
        assert_eq!(results_headline(4), "Found 4 recipes");
    }

    #[test]
    fn test_card_rounds_coverage_and_caps_missing() {
        let card = render_card(&result_with_missing(&["a", "b", "c", "d", "e", "f", "g"]));
        assert!(card.contains("Match: 67%"));
        assert!(card.contains("Missing: a, b, c, d, e (+2 more)"));
    }

    #[test]
    fn test_card_with_nothing_missing() {
        let card = render_card(&result_with_missing(&[]));
        assert!(card.contains("You have everything!"));
    }

    #[test]
    fn test_details_fallback_and_default_savings() {
        let mut recipe = builtin_catalog().remove(0);
        recipe.instructions.clear();
        recipe.savings = 0;
        let text = render_details(&recipe, &["onion".to_string()]);
        assert!(text.contains("Shopping list:\n  - onion"));
        assert!(text.contains("Combine the ingredients"));
        assert!(text.contains("You save about 30"));
    }

    #[test]
    fn test_cook_summary_caps_reminder() {
        let recipe = builtin_catalog().remove(0);
        let missing: Vec<String> = ["milk", "flour", "ham", "corn"].iter().map(|s| s.to_string()).collect();
        let text = cook_summary(&recipe, &missing);
        assert!(text.contains("Remember to buy: milk, flour, ham (and 1 more)"));
    }

    #[test]
    fn test_favorite_saved_messages() {
        assert_eq!(
            favorite_saved_message("Soup", &Ok(AddOutcome::Added)),
            "Added 'Soup' to favorites."
        );
        assert!(favorite_saved_message("Soup", &Ok(AddOutcome::AlreadyExists)).contains("already"));
        let corrupt = serde_json::from_str::<Vec<FavoriteRecord>>("not json").map_err(RecipeError::from);
        let failed = corrupt.map(|_| AddOutcome::Added);
        assert_eq!(
            favorite_saved_message("Soup", &failed),
            "Error: Could not read or write favorites."
        );
    }

    #[test]
    fn test_favorite_card_shows_ai_badge() {
        let mut recipe = builtin_catalog().remove(0);
        recipe.id = RecipeId::new("ai-1");
        recipe.provenance = Provenance::AiGenerated;
        let favorite = FavoriteRecord {
            recipe,
            added_at: Utc.with_ymd_and_hms(2024, 5, 2, 18, 30, 0).unwrap(),
        };
        let text = render_favorite(&favorite);
        assert!(text.contains("(AI generated)"));
        assert!(text.contains("Saved 2024-05-02 18:30 UTC"));
    }
}
