use std::collections::BTreeSet;

use crate::error::{RecipeError, RecipeResult};

/// Every ingredient a user can pick. Names are canonical: lowercase English.
pub const KNOWN_INGREDIENTS: &[&str] = &[
    "pasta",
    "rice",
    "egg",
    "cheese",
    "bread",
    "onion",
    "garlic",
    "tomato",
    "potatoes",
    "butter",
    "olive oil",
    "cream",
    "milk",
    "flour",
    "cottage cheese",
    "ham",
    "chicken",
    "bacon",
    "tofu",
    "bell pepper",
    "cucumber",
    "soy sauce",
    "jam",
    "yogurt",
    "mayonnaise",
    "canned tomatoes",
    "feta cheese",
    "pesto",
    "tortilla",
    "buckwheat",
    "oats",
    "red beans",
    "chickpeas",
    "canned tuna",
    "corn",
    "mushrooms",
    "frozen spinach",
];

/// Trims and lowercases a user-typed ingredient name.
pub fn canonical_name(raw: &str) -> String {
    raw.trim().to_lowercase()
}

pub fn is_known(name: &str) -> bool {
    KNOWN_INGREDIENTS.contains(&name)
}

/// The ingredients a user currently has at hand.
///
/// Only names from [`KNOWN_INGREDIENTS`] are accepted. Iteration order is
/// alphabetical so requests built from the set are reproducible.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OwnedIngredients {
    names: BTreeSet<String>,
}

impl OwnedIngredients {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a set from user input, rejecting the first unknown name.
    pub fn from_names<I, S>(names: I) -> RecipeResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut owned = Self::new();
        for name in names {
            owned.insert(name.as_ref())?;
        }
        Ok(owned)
    }

    /// Adds the ingredient if absent, removes it if present.
    ///
    /// Returns whether the ingredient is selected afterwards.
    pub fn toggle(&mut self, name: &str) -> RecipeResult<bool> {
        let name = Self::validate(name)?;
        if self.names.remove(&name) {
            Ok(false)
        } else {
            self.names.insert(name);
            Ok(true)
        }
    }

    pub fn insert(&mut self, name: &str) -> RecipeResult<()> {
        let name = Self::validate(name)?;
        self.names.insert(name);
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.names.iter().cloned().collect()
    }

    fn validate(name: &str) -> RecipeResult<String> {
        let name = canonical_name(name);
        if is_known(&name) {
            Ok(name)
        } else {
            Err(RecipeError::UnknownIngredient(name))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_adds_then_removes() {
        let mut owned = OwnedIngredients::new();
        assert!(owned.toggle("egg").unwrap());
        assert!(owned.contains("egg"));
        assert!(!owned.toggle("egg").unwrap());
        assert!(owned.is_empty());
    }

    #[test]
    fn test_names_are_canonicalised() {
        let owned = OwnedIngredients::from_names(["  Pasta ", "EGG", "egg"]).unwrap();
        assert_eq!(owned.len(), 2);
        assert_eq!(owned.to_vec(), vec!["egg".to_string(), "pasta".to_string()]);
    }

    #[test]
    fn test_unknown_ingredient_rejected() {
        let mut owned = OwnedIngredients::new();
        let err = owned.toggle("unobtainium").unwrap_err();
        assert!(matches!(err, RecipeError::UnknownIngredient(ref n) if n == "unobtainium"));
        assert!(owned.is_empty());
    }

    #[test]
    fn test_known_list_has_no_duplicates() {
        let unique: BTreeSet<_> = KNOWN_INGREDIENTS.iter().collect();
        assert_eq!(unique.len(), KNOWN_INGREDIENTS.len());
        assert!(KNOWN_INGREDIENTS.iter().all(|n| *n == canonical_name(n)));
    }
}
