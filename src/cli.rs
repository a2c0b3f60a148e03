use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::recipe::FilterOptions;

#[derive(Parser, Debug)]
#[command(author, version, about = "Find recipes for the leftovers in your fridge", long_about = None)]
pub struct Cli {
    /// Log at debug level (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Directory holding the favorites file
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the ingredients that can be selected
    Ingredients,
    /// Find recipes for the ingredients you have
    Search(SearchArgs),
    /// Ask the AI for a recipe using the ingredients you have
    Generate(GenerateArgs),
    /// Show or edit saved recipes
    Favorites {
        #[command(subcommand)]
        action: Option<FavoritesAction>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum Source {
    /// Built-in or CSV catalog
    #[default]
    Local,
    /// Spoonacular recipe search
    Api,
}

#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Owned ingredients, comma separated or repeated
    #[arg(long = "have", value_delimiter = ',')]
    pub have: Vec<String>,

    #[arg(long, value_enum, default_value_t = Source::Local)]
    pub source: Source,

    /// Only vegetarian or vegan recipes
    #[arg(long)]
    pub vegetarian: bool,

    /// Only recipes ready in up to 15 minutes
    #[arg(long)]
    pub quick: bool,

    /// Only recipes that travel well in a lunchbox
    #[arg(long)]
    pub lunchbox: bool,

    /// CSV catalog to search instead of the built-in one
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    /// Spoonacular API key (defaults to SPOONACULAR_API_KEY)
    #[arg(long)]
    pub api_key: Option<String>,

    /// Show the full recipe for this result id
    #[arg(long)]
    pub show: Option<String>,

    /// Print the cooking summary, with a shopping reminder, for this result id
    #[arg(long)]
    pub cook: Option<String>,

    /// Save the result with this id to favorites
    #[arg(long)]
    pub save: Option<String>,
}

impl SearchArgs {
    pub fn filters(&self) -> FilterOptions {
        FilterOptions {
            vegetarian_only: self.vegetarian,
            quick_only: self.quick,
            portable_only: self.lunchbox,
        }
    }
}

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Owned ingredients, comma separated or repeated
    #[arg(long = "have", value_delimiter = ',')]
    pub have: Vec<String>,

    /// OpenAI API key (defaults to OPENAI_API_KEY)
    #[arg(long)]
    pub api_key: Option<String>,

    /// Save the generated recipe to favorites
    #[arg(long)]
    pub save: bool,
}

#[derive(Subcommand, Debug)]
pub enum FavoritesAction {
    /// List saved recipes, newest first
    List,
    /// Show one saved recipe in full
    Show { id: String },
    /// Print a summary for cooking a saved recipe
    Cook { id: String },
    /// Remove a saved recipe
    Remove { id: String },
    /// Print how many recipes are saved
    Count,
}

pub fn parse_args() -> Cli {
    Cli::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_arguments() {
        let cli = Cli::try_parse_from([
            "leftovers", "search", "--have", "egg,pasta", "--have", "onion", "--quick", "--source", "api",
        ])
        .unwrap();
        match cli.command {
            Command::Search(args) => {
                assert_eq!(args.have, vec!["egg", "pasta", "onion"]);
                assert_eq!(args.source, Source::Api);
                let filters = args.filters();
                assert!(filters.quick_only);
                assert!(!filters.vegetarian_only);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_favorites_defaults_to_list() {
        let cli = Cli::try_parse_from(["leftovers", "favorites"]).unwrap();
        assert!(matches!(cli.command, Command::Favorites { action: None }));

        let cli = Cli::try_parse_from(["leftovers", "-v", "favorites", "remove", "local-3"]).unwrap();
        assert!(cli.verbose);
        assert!(matches!(
            cli.command,
            Command::Favorites { action: Some(FavoritesAction::Remove { ref id }) } if id == "local-3"
        ));
    }

    #[test]
    fn test_search_without_ingredients_parses() {
        let cli = Cli::try_parse_from(["leftovers", "search"]).unwrap();
        match cli.command {
            Command::Search(args) => {
                assert!(args.have.is_empty());
                assert_eq!(args.source, Source::Local);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_search_cook_and_save_ids() {
        let cli = Cli::try_parse_from([
            "leftovers", "search", "--have", "egg", "--cook", "local-2", "--save", "local-2",
        ])
        .unwrap();
        match cli.command {
            Command::Search(args) => {
                assert_eq!(args.cook.as_deref(), Some("local-2"));
                assert_eq!(args.save.as_deref(), Some("local-2"));
                assert_eq!(args.show, None);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_unknown_source_is_rejected() {
        assert!(Cli::try_parse_from(["leftovers", "search", "--source", "fridge"]).is_err());
    }
}
