use serde::Serialize;

use crate::ingredients::OwnedIngredients;
use crate::recipe::{FilterOptions, Recipe};

/// Recipes covering less than this share of their ingredients are dropped.
pub const MIN_MATCH_PERCENT: f64 = 50.0;

/// A recipe that passed the filters and the coverage threshold.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchResult {
    pub recipe: Recipe,
    /// Share of required ingredients the user owns, 0 to 100.
    pub coverage: f64,
    /// Required ingredients the user lacks, in the recipe's order.
    pub missing: Vec<String>,
    pub admitted_by: FilterOptions,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MatchOutcome {
    /// Nothing was selected, so nothing was scanned.
    NoIngredientsSelected,
    Matches(Vec<MatchResult>),
}

impl MatchOutcome {
    pub fn into_matches(self) -> Vec<MatchResult> {
        match self {
            MatchOutcome::NoIngredientsSelected => Vec::new(),
            MatchOutcome::Matches(matches) => matches,
        }
    }
}

/// Percentage of `required` found in `owned`; 0 for an empty requirement.
pub fn coverage_percent(owned_count: usize, required_count: usize) -> f64 {
    if required_count == 0 {
        0.0
    } else {
        owned_count as f64 / required_count as f64 * 100.0
    }
}

/// The recipe's ingredients with repeats removed, first occurrence kept.
fn distinct_ingredients(recipe: &Recipe) -> Vec<&str> {
    let mut seen = Vec::with_capacity(recipe.ingredients.len());
    for ingredient in &recipe.ingredients {
        if !seen.contains(&ingredient.as_str()) {
            seen.push(ingredient.as_str());
        }
    }
    seen
}

/// Scores one recipe, returning `None` if it falls below the threshold.
pub fn score_recipe(
    owned: &OwnedIngredients,
    recipe: &Recipe,
    filters: &FilterOptions,
) -> Option<MatchResult> {
    let required = distinct_ingredients(recipe);
    let (have, missing): (Vec<&str>, Vec<&str>) =
        required.iter().copied().partition(|name| owned.contains(name));

    let coverage = coverage_percent(have.len(), required.len());
    if coverage < MIN_MATCH_PERCENT {
        return None;
    }

    Some(MatchResult {
        recipe: recipe.clone(),
        coverage,
        missing: missing.into_iter().map(str::to_owned).collect(),
        admitted_by: *filters,
    })
}

/// Scores and filters `catalog` against what the user owns.
///
/// Results come back in catalog order; ordering for display is the
/// ranker's job.
pub fn match_catalog(
    owned: &OwnedIngredients,
    catalog: &[Recipe],
    filters: &FilterOptions,
) -> MatchOutcome {
    if owned.is_empty() {
        return MatchOutcome::NoIngredientsSelected;
    }

    let matches: Vec<MatchResult> = catalog
        .iter()
        .filter(|recipe| filters.admits(recipe))
        .filter_map(|recipe| score_recipe(owned, recipe, filters))
        .collect();

    tracing::debug!(
        catalog = catalog.len(),
        owned = owned.len(),
        admitted = matches.len(),
        "Catalog matched"
    );

    MatchOutcome::Matches(matches)
}

/// The result whose recipe has `id`, if any.
pub fn find_match<'a>(matches: &'a [MatchResult], id: &str) -> Option<&'a MatchResult> {
    matches.iter().find(|m| m.recipe.id.as_str() == id)
}
