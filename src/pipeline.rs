use futures_util::future::join_all;

use crate::api_connection::endpoints::DETAIL_LOOKUP_LIMIT;
use crate::api_connection::{RecipeGenerator, RecipeSearchProvider};
use crate::error::{RecipeError, RecipeResult};
use crate::ingredients::OwnedIngredients;
use crate::matcher::{match_catalog, MatchOutcome, MatchResult};
use crate::normalize::{from_ai_text, from_remote, SavingsEstimator};
use crate::ranker::rank;
use crate::recipe::{FilterOptions, Recipe};

/// Matches the local catalog and ranks what survives.
pub fn search_local(
    owned: &OwnedIngredients,
    catalog: &[Recipe],
    filters: &FilterOptions,
) -> MatchOutcome {
    match match_catalog(owned, catalog, filters) {
        MatchOutcome::Matches(matches) => MatchOutcome::Matches(rank(matches)),
        outcome => outcome,
    }
}

/// Remote candidates keep only what their details prove.
///
/// Without details neither diet nor time is known, so such records are
/// dropped as soon as one of those filters is on.
fn admits_remote(result: &MatchResult, filters: &FilterOptions) -> bool {
    if (filters.vegetarian_only || filters.quick_only) && !result.recipe.details_available {
        return false;
    }
    filters.admits(&result.recipe)
}

/// Asks the search service for candidates, then fetches details for the
/// first [`DETAIL_LOOKUP_LIMIT`] of them concurrently.
///
/// A failed detail lookup only marks its own record; the search fails only
/// when the candidate query itself does.
pub async fn search_remote(
    provider: &dyn RecipeSearchProvider,
    owned: &OwnedIngredients,
    filters: &FilterOptions,
    estimator: &dyn SavingsEstimator,
) -> RecipeResult<MatchOutcome> {
    if owned.is_empty() {
        return Ok(MatchOutcome::NoIngredientsSelected);
    }

    let mut hits = provider.find_by_ingredients(&owned.to_vec()).await?;
    hits.truncate(DETAIL_LOOKUP_LIMIT);

    let details = join_all(hits.iter().map(|hit| provider.recipe_details(hit.id))).await;
    let unavailable = details.iter().filter(|d| d.is_none()).count();
    tracing::info!(
        provider = provider.name(),
        candidates = hits.len(),
        unavailable,
        "Recipe details joined"
    );

    let results: Vec<MatchResult> = hits
        .iter()
        .zip(details.iter())
        .map(|(hit, details)| from_remote(hit, details.as_ref(), filters, estimator))
        .filter(|result| admits_remote(result, filters))
        .collect();

    Ok(MatchOutcome::Matches(rank(results)))
}

/// Has the model write a recipe for the owned ingredients.
pub async fn generate_recipe(
    generator: &dyn RecipeGenerator,
    owned: &OwnedIngredients,
    estimator: &dyn SavingsEstimator,
) -> RecipeResult<Recipe> {
    if owned.is_empty() {
        return Err(RecipeError::NoIngredientsSelected);
    }
    tracing::info!(
        generator = generator.name(),
        ingredients = owned.len(),
        "Requesting AI recipe"
    );
    let raw = generator.generate(&owned.to_vec()).await?;
    from_ai_text(&raw, estimator)
}
