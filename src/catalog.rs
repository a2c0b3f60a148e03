use anyhow::{Context, Result};
use csv::ReaderBuilder;
use std::path::Path;

use crate::ingredients::canonical_name;
use crate::recipe::{Diet, PrepTime, Provenance, Recipe, RecipeId, TimeBucket};

// Expected column headers
const ID_COL: &str = "id";
const NAME_COL: &str = "name";
const INGREDIENTS_COL: &str = "ingredients";
const TIME_COL: &str = "time";
const SERVINGS_COL: &str = "servings";
const DIET_COL: &str = "diet";
const LUNCHBOX_COL: &str = "lunchbox";
const SAVINGS_COL: &str = "savings";
const INSTRUCTIONS_COL: &str = "instructions";

const LIST_SEPARATOR: char = ';';
const STEP_SEPARATOR: char = '|';

/// Savings shown when a catalog row leaves the cell empty.
pub const DEFAULT_SAVINGS: u32 = 30;

struct Entry {
    name: &'static str,
    ingredients: &'static [&'static str],
    time: TimeBucket,
    servings: u32,
    diet: Diet,
    lunchbox: bool,
    savings: u32,
    steps: &'static [&'static str],
}

const BUILTIN: &[Entry] = &[
    Entry {
        name: "Pasta carbonara",
        ingredients: &["pasta", "egg", "bacon", "cheese", "garlic"],
        time: TimeBucket::Medium,
        servings: 2,
        diet: Diet::Standard,
        lunchbox: false,
        savings: 35,
        steps: &[
            "Cook the pasta in salted water.",
            "Fry the bacon with chopped garlic.",
            "Whisk the eggs with grated cheese.",
            "Drain the pasta, toss with bacon, take off the heat and stir in the egg mix.",
        ],
    },
    Entry {
        name: "Scrambled eggs on toast",
        ingredients: &["egg", "butter", "bread", "milk"],
        time: TimeBucket::Quick,
        servings: 1,
        diet: Diet::Vegetarian,
        lunchbox: false,
        savings: 20,
        steps: &[
            "Whisk the eggs with a splash of milk.",
            "Melt butter in a pan and stir the eggs gently until just set.",
            "Serve on toasted bread.",
        ],
    },
    Entry {
        name: "Egg fried rice",
        ingredients: &["rice", "egg", "soy sauce", "onion", "corn"],
        time: TimeBucket::Quick,
        servings: 2,
        diet: Diet::Vegetarian,
        lunchbox: true,
        savings: 28,
        steps: &[
            "Fry chopped onion until soft.",
            "Add cooked rice and corn, fry for a few minutes.",
            "Push aside, scramble the eggs, mix everything with soy sauce.",
        ],
    },
    Entry {
        name: "Chicken tortilla wraps",
        ingredients: &["tortilla", "chicken", "bell pepper", "onion", "mayonnaise"],
        time: TimeBucket::Medium,
        servings: 2,
        diet: Diet::Standard,
        lunchbox: true,
        savings: 38,
        steps: &[
            "Slice chicken, pepper and onion into strips.",
            "Fry the chicken, then the vegetables.",
            "Spread mayonnaise on the tortillas, fill and roll.",
        ],
    },
    Entry {
        name: "Tomato soup",
        ingredients: &["canned tomatoes", "onion", "garlic", "cream", "olive oil"],
        time: TimeBucket::Medium,
        servings: 3,
        diet: Diet::Vegetarian,
        lunchbox: false,
        savings: 25,
        steps: &[
            "Soften onion and garlic in olive oil.",
            "Add tomatoes, simmer for 15 minutes.",
            "Blend and stir in the cream.",
        ],
    },
    Entry {
        name: "Chickpea curry",
        ingredients: &["chickpeas", "canned tomatoes", "onion", "garlic", "rice"],
        time: TimeBucket::Long,
        servings: 4,
        diet: Diet::Vegan,
        lunchbox: true,
        savings: 36,
        steps: &[
            "Cook the rice.",
            "Fry onion and garlic, add tomatoes and chickpeas.",
            "Simmer for 20 minutes and serve over rice.",
        ],
    },
    Entry {
        name: "Overnight oats",
        ingredients: &["oats", "milk", "yogurt", "jam"],
        time: TimeBucket::Quick,
        servings: 1,
        diet: Diet::Vegetarian,
        lunchbox: true,
        savings: 15,
        steps: &[
            "Mix oats with milk and yogurt in a jar.",
            "Top with jam and leave in the fridge overnight.",
        ],
    },
    Entry {
        name: "Tuna pasta salad",
        ingredients: &["pasta", "canned tuna", "corn", "mayonnaise", "cucumber"],
        time: TimeBucket::Medium,
        servings: 2,
        diet: Diet::Standard,
        lunchbox: true,
        savings: 30,
        steps: &[
            "Cook and cool the pasta.",
            "Mix with drained tuna, corn, diced cucumber and mayonnaise.",
        ],
    },
    Entry {
        name: "Potato pancakes",
        ingredients: &["potatoes", "egg", "flour", "onion"],
        time: TimeBucket::Long,
        servings: 3,
        diet: Diet::Vegetarian,
        lunchbox: false,
        savings: 27,
        steps: &[
            "Grate potatoes and onion, squeeze out the water.",
            "Mix with egg and flour.",
            "Fry spoonfuls on both sides until golden.",
        ],
    },
    Entry {
        name: "Buckwheat with mushrooms",
        ingredients: &["buckwheat", "mushrooms", "onion", "butter"],
        time: TimeBucket::Medium,
        servings: 2,
        diet: Diet::Vegetarian,
        lunchbox: true,
        savings: 26,
        steps: &[
            "Cook the buckwheat.",
            "Fry sliced mushrooms and onion in butter.",
            "Combine and season.",
        ],
    },
    Entry {
        name: "Tofu stir-fry",
        ingredients: &["tofu", "soy sauce", "bell pepper", "garlic", "rice"],
        time: TimeBucket::Medium,
        servings: 2,
        diet: Diet::Vegan,
        lunchbox: true,
        savings: 33,
        steps: &[
            "Press and cube the tofu, fry until crisp.",
            "Add pepper and garlic, then soy sauce.",
            "Serve with rice.",
        ],
    },
    Entry {
        name: "Spinach and feta omelette",
        ingredients: &["egg", "frozen spinach", "feta cheese", "butter"],
        time: TimeBucket::Quick,
        servings: 1,
        diet: Diet::Vegetarian,
        lunchbox: false,
        savings: 22,
        steps: &[
            "Thaw the spinach in a pan with butter.",
            "Pour in beaten eggs, crumble feta on top.",
            "Fold once set.",
        ],
    },
    Entry {
        name: "Pesto pasta",
        ingredients: &["pasta", "pesto", "cheese"],
        time: TimeBucket::Quick,
        servings: 2,
        diet: Diet::Vegetarian,
        lunchbox: true,
        savings: 29,
        steps: &["Cook the pasta.", "Stir in pesto and top with grated cheese."],
    },
    Entry {
        name: "Red bean chili",
        ingredients: &["red beans", "canned tomatoes", "onion", "garlic", "bell pepper", "rice"],
        time: TimeBucket::Long,
        servings: 4,
        diet: Diet::Vegan,
        lunchbox: true,
        savings: 34,
        steps: &[
            "Fry onion, garlic and pepper.",
            "Add beans and tomatoes, simmer for 25 minutes.",
            "Serve with rice.",
        ],
    },
    Entry {
        name: "Ham and cheese sandwich",
        ingredients: &["bread", "ham", "cheese", "butter", "tomato"],
        time: TimeBucket::Quick,
        servings: 1,
        diet: Diet::Standard,
        lunchbox: true,
        savings: 18,
        steps: &["Butter the bread.", "Layer ham, cheese and tomato slices."],
    },
    Entry {
        name: "Cottage cheese with cucumber",
        ingredients: &["cottage cheese", "cucumber", "bread"],
        time: TimeBucket::Quick,
        servings: 1,
        diet: Diet::Vegetarian,
        lunchbox: true,
        savings: 16,
        steps: &["Dice the cucumber, mix with cottage cheese.", "Serve with bread."],
    },
];

/// The catalog shipped with the app.
pub fn builtin_catalog() -> Vec<Recipe> {
    BUILTIN
        .iter()
        .enumerate()
        .map(|(index, entry)| Recipe {
            id: RecipeId::new(format!("local-{}", index + 1)),
            name: entry.name.to_string(),
            ingredients: entry.ingredients.iter().map(|s| s.to_string()).collect(),
            prep_time: PrepTime::Bucket(entry.time),
            servings: entry.servings,
            diet: entry.diet,
            portable: entry.lunchbox,
            savings: entry.savings,
            instructions: entry.steps.iter().map(|s| s.to_string()).collect(),
            tip: None,
            provenance: Provenance::Local,
            source_url: None,
            image: None,
            details_available: true,
        })
        .collect()
}

fn split_list(cell: &str, separator: char) -> Vec<String> {
    cell.split(separator)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_flag(cell: &str) -> bool {
    matches!(
        cell.trim().to_lowercase().as_str(),
        "true" | "yes" | "1" | "y"
    )
}

/// Loads a recipe catalog from CSV.
///
/// Columns: id, name, ingredients (`;`-separated), time, servings, diet,
/// lunchbox, savings, instructions (`|`-separated). Rows with an empty name
/// are skipped.
pub fn load_catalog_csv(csv_path: &Path) -> Result<Vec<Recipe>> {
    if !csv_path.exists() {
        return Err(anyhow::anyhow!("Catalog CSV file not found at: {:?}", csv_path));
    }

    let file = std::fs::File::open(csv_path)
        .with_context(|| format!("Failed to open catalog CSV file at {:?}", csv_path))?;
    let mut rdr = ReaderBuilder::new().has_headers(true).from_reader(file);

    let headers = rdr.headers()?.clone();
    let column = |name: &str| -> Result<usize> {
        headers
            .iter()
            .position(|h| h.trim() == name)
            .ok_or_else(|| anyhow::anyhow!("Column '{}' not found", name))
    };
    let id_idx = column(ID_COL)?;
    let name_idx = column(NAME_COL)?;
    let ingredients_idx = column(INGREDIENTS_COL)?;
    let time_idx = column(TIME_COL)?;
    let servings_idx = column(SERVINGS_COL)?;
    let diet_idx = column(DIET_COL)?;
    let lunchbox_idx = column(LUNCHBOX_COL)?;
    // Optional columns
    let savings_idx = column(SAVINGS_COL).ok();
    let instructions_idx = column(INSTRUCTIONS_COL).ok();

    let mut catalog: Vec<Recipe> = Vec::new();
    for (row_index, result) in rdr.records().enumerate() {
        let record =
            result.with_context(|| format!("Failed to read record at row index {}", row_index))?;
        let cell = |idx: usize| record.get(idx).unwrap_or("").trim();

        let name = cell(name_idx);
        if name.is_empty() {
            tracing::debug!(row = row_index + 1, "Skipping catalog row without a name");
            continue;
        }

        let id = match cell(id_idx) {
            "" => format!("local-{}", row_index + 1),
            id => id.to_string(),
        };
        if catalog.iter().any(|r| r.id.as_str() == id) {
            return Err(anyhow::anyhow!("Duplicate recipe id '{}' at row {}", id, row_index + 1));
        }

        let ingredients = split_list(cell(ingredients_idx), LIST_SEPARATOR)
            .iter()
            .map(|name| canonical_name(name))
            .collect();

        let servings = match cell(servings_idx) {
            "" => crate::normalize::DEFAULT_SERVINGS,
            raw => raw
                .parse::<u32>()
                .with_context(|| format!("Invalid servings '{}' at row {}", raw, row_index + 1))?,
        };

        let savings = savings_idx
            .map(cell)
            .and_then(|raw| raw.parse().ok())
            .unwrap_or(DEFAULT_SAVINGS);

        catalog.push(Recipe {
            id: RecipeId::new(id),
            name: name.to_string(),
            ingredients,
            prep_time: PrepTime::parse(cell(time_idx)),
            servings,
            diet: Diet::parse(cell(diet_idx)),
            portable: parse_flag(cell(lunchbox_idx)),
            savings,
            instructions: instructions_idx
                .map(|idx| split_list(cell(idx), STEP_SEPARATOR))
                .unwrap_or_default(),
            tip: None,
            provenance: Provenance::Local,
            source_url: None,
            image: None,
            details_available: true,
        });
    }

    if catalog.is_empty() {
        return Err(anyhow::anyhow!("No recipes loaded from {:?}", csv_path));
    }

    tracing::info!(path = ?csv_path, recipes = catalog.len(), "Catalog loaded");
    Ok(catalog)
}
