use anyhow::{Context, Result};
use std::path::Path;

use leftovers::api_connection::{OpenAiClient, SpoonacularClient};
use leftovers::catalog::{builtin_catalog, load_catalog_csv};
use leftovers::cli::{parse_args, Command, FavoritesAction, GenerateArgs, SearchArgs, Source};
use leftovers::config::Settings;
use leftovers::display::{
    cook_summary, favorite_saved_message, render_details, render_favorites, render_state,
};
use leftovers::favorites::{Favorites, FavoritesStore, JsonFileStore};
use leftovers::ingredients::{OwnedIngredients, KNOWN_INGREDIENTS};
use leftovers::logging::init_tracing;
use leftovers::matcher::find_match;
use leftovers::normalize::RandomSavings;
use leftovers::pipeline::{generate_recipe, search_local, search_remote};
use leftovers::recipe::{Recipe, RecipeId};
use leftovers::session::{DisplayState, Session};

fn load_catalog(path: Option<&Path>) -> Result<Vec<Recipe>> {
    match path {
        Some(path) => load_catalog_csv(path)
            .with_context(|| format!("Failed to load recipe catalog from '{}'", path.display())),
        None => Ok(builtin_catalog()),
    }
}

/// Parses the `--have` list, printing the problem instead of failing.
fn owned_from_args(have: &[String]) -> Option<OwnedIngredients> {
    match OwnedIngredients::from_names(have) {
        Ok(owned) => Some(owned),
        Err(e) => {
            println!("{}", render_state(&DisplayState::Error(e.user_message())));
            None
        }
    }
}

/// A failed save is reported, not fatal: the recipe was already shown.
fn save_favorite<S: FavoritesStore>(favorites: &Favorites<S>, recipe: Recipe) {
    let name = recipe.name.clone();
    let result = favorites.add(recipe);
    if let Err(e) = &result {
        tracing::warn!(error = %e, "Failed to save favorite");
    }
    println!("{}", favorite_saved_message(&name, &result));
}

async fn run_search<S: FavoritesStore>(
    args: SearchArgs,
    settings: &Settings,
    favorites: &Favorites<S>,
) -> Result<()> {
    let Some(owned) = owned_from_args(&args.have) else {
        return Ok(());
    };
    let mut session = Session::with_ingredients(owned);
    session.set_filters(args.filters());

    let ticket = session.begin_request();
    let outcome = match args.source {
        Source::Local => {
            let catalog_path = args.catalog.as_deref().or(settings.catalog_path.as_deref());
            let catalog = load_catalog(catalog_path)?;
            Ok(search_local(session.owned(), &catalog, &session.filters()))
        }
        Source::Api => {
            let api_key = args.api_key.clone().or_else(|| settings.spoonacular_api_key.clone());
            let client = SpoonacularClient::new(api_key, settings.spoonacular_url.as_str());
            search_remote(&client, session.owned(), &session.filters(), &RandomSavings).await
        }
    };
    session.commit_result(ticket, outcome);
    println!("{}", render_state(session.view()));

    let DisplayState::Results(matches) = session.view() else {
        return Ok(());
    };
    if let Some(id) = args.show.as_deref() {
        match find_match(matches, id) {
            Some(m) => println!("\n{}", render_details(&m.recipe, &m.missing)),
            None => println!("\nNo result with id '{}'.", id),
        }
    }
    if let Some(id) = args.cook.as_deref() {
        match find_match(matches, id) {
            Some(m) => println!("\n{}", cook_summary(&m.recipe, &m.missing)),
            None => println!("\nNo result with id '{}'.", id),
        }
    }
    if let Some(id) = args.save.as_deref() {
        match find_match(matches, id) {
            Some(m) => save_favorite(favorites, m.recipe.clone()),
            None => println!("\nNo result with id '{}'.", id),
        }
    }
    Ok(())
}

async fn run_generate<S: FavoritesStore>(
    args: GenerateArgs,
    settings: &Settings,
    favorites: &Favorites<S>,
) -> Result<()> {
    let Some(owned) = owned_from_args(&args.have) else {
        return Ok(());
    };
    let mut session = Session::with_ingredients(owned);

    let api_key = args.api_key.or_else(|| settings.openai_api_key.clone());
    let client = OpenAiClient::new(
        api_key,
        settings.openai_url.as_str(),
        settings.openai_model.as_str(),
    );

    let ticket = session.begin_request();
    println!("Generating a recipe...");
    let result = generate_recipe(&client, session.owned(), &RandomSavings).await;
    let generated = result.as_ref().ok().cloned();
    session.commit_result(ticket, result);
    println!("{}", render_state(session.view()));

    if args.save {
        if let Some(recipe) = generated {
            save_favorite(favorites, recipe);
        }
    }
    Ok(())
}

fn run_favorites<S: FavoritesStore>(action: FavoritesAction, favorites: &Favorites<S>) -> Result<()> {
    match action {
        FavoritesAction::List => {
            let list = favorites.list().context("Failed to read favorites")?;
            println!("{}", render_favorites(&list));
        }
        FavoritesAction::Show { id } => {
            match favorites.get(&RecipeId::new(id.as_str())).context("Failed to read favorites")? {
                Some(favorite) => println!("{}", render_details(&favorite.recipe, &[])),
                None => println!("No favorite with id '{}'.", id),
            }
        }
        FavoritesAction::Cook { id } => {
            match favorites.get(&RecipeId::new(id.as_str())).context("Failed to read favorites")? {
                Some(favorite) => println!("{}", cook_summary(&favorite.recipe, &[])),
                None => println!("No favorite with id '{}'.", id),
            }
        }
        FavoritesAction::Remove { id } => {
            if favorites
                .remove(&RecipeId::new(id.as_str()))
                .context("Failed to update favorites")?
            {
                println!("Removed '{}' from favorites.", id);
            } else {
                println!("No favorite with id '{}'.", id);
            }
        }
        FavoritesAction::Count => {
            println!("{}", favorites.count().context("Failed to read favorites")?);
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = parse_args();
    init_tracing(cli.verbose);

    let mut settings = Settings::from_env();
    if let Some(dir) = cli.data_dir {
        settings.data_dir = dir;
    }
    let favorites = Favorites::new(JsonFileStore::in_dir(&settings.data_dir));
    tracing::debug!(path = ?favorites.store().path(), "Using favorites file");

    match cli.command {
        Command::Ingredients => {
            for name in KNOWN_INGREDIENTS {
                println!("{}", name);
            }
        }
        Command::Search(args) => run_search(args, &settings, &favorites).await?,
        Command::Generate(args) => run_generate(args, &settings, &favorites).await?,
        Command::Favorites { action } => {
            run_favorites(action.unwrap_or(FavoritesAction::List), &favorites)?
        }
    }
    Ok(())
}
