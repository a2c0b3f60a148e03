use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

const REMOTE_ID_PREFIX: &str = "spoonacular-";
const GENERATED_ID_PREFIX: &str = "ai-";

/// Upper bound (inclusive) of the quick preparation bucket, in minutes.
pub const QUICK_MAX_MINUTES: u32 = 15;
const MEDIUM_MAX_MINUTES: u32 = 30;

/// Stable identity of a recipe record, unique across all three sources.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecipeId(String);

impl RecipeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn remote(spoonacular_id: u64) -> Self {
        Self(format!("{}{}", REMOTE_ID_PREFIX, spoonacular_id))
    }

    pub fn generated() -> Self {
        Self(format!("{}{}", GENERATED_ID_PREFIX, Uuid::new_v4()))
    }

    /// The Spoonacular id behind a remote record, if this is one.
    pub fn remote_id(&self) -> Option<u64> {
        self.0.strip_prefix(REMOTE_ID_PREFIX)?.parse().ok()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecipeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecipeId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeBucket {
    Quick,
    Medium,
    Long,
}

impl TimeBucket {
    pub const ALL: [TimeBucket; 3] = [TimeBucket::Quick, TimeBucket::Medium, TimeBucket::Long];

    pub fn from_minutes(minutes: u32) -> Self {
        if minutes <= QUICK_MAX_MINUTES {
            TimeBucket::Quick
        } else if minutes <= MEDIUM_MAX_MINUTES {
            TimeBucket::Medium
        } else {
            TimeBucket::Long
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            TimeBucket::Quick => "quick",
            TimeBucket::Medium => "medium",
            TimeBucket::Long => "long",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TimeBucket::Quick => "up to 15 min",
            TimeBucket::Medium => "15-30 min",
            TimeBucket::Long => "30+ min",
        }
    }
}

/// How long a recipe takes, in whatever form the source gave it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum PrepTime {
    Bucket(TimeBucket),
    Minutes(u32),
    Text(String),
    Unknown,
}

impl PrepTime {
    /// Reads a duration cell or a model-written duration.
    ///
    /// Bucket labels and names map to buckets, text starting with a number maps
    /// to minutes ("12 minutes", "20 min"), anything else is kept as text.
    pub fn parse(raw: &str) -> Self {
        let text = raw.trim();
        if text.is_empty() {
            return PrepTime::Unknown;
        }
        let lowered = text.to_lowercase();
        if let Some(bucket) = TimeBucket::ALL
            .into_iter()
            .find(|b| lowered == b.label() || lowered == b.name())
        {
            return PrepTime::Bucket(bucket);
        }
        let digits_end = text
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(text.len());
        let rest = text[digits_end..].trim_start();
        match text[..digits_end].parse::<u32>() {
            // "10-20 min" is a range, not a single duration
            Ok(minutes) if !rest.starts_with('-') => PrepTime::Minutes(minutes),
            _ => PrepTime::Text(text.to_string()),
        }
    }

    /// The bucket this duration falls into; free text has none.
    pub fn bucket(&self) -> Option<TimeBucket> {
        match self {
            PrepTime::Bucket(bucket) => Some(*bucket),
            PrepTime::Minutes(minutes) => Some(TimeBucket::from_minutes(*minutes)),
            PrepTime::Text(_) | PrepTime::Unknown => None,
        }
    }

    pub fn is_quick(&self) -> bool {
        self.bucket() == Some(TimeBucket::Quick)
    }
}

impl fmt::Display for PrepTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrepTime::Bucket(bucket) => f.write_str(bucket.label()),
            PrepTime::Minutes(minutes) => write!(f, "{} min", minutes),
            PrepTime::Text(text) => f.write_str(text),
            PrepTime::Unknown => f.write_str("unknown"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Diet {
    #[default]
    Standard,
    Vegetarian,
    Vegan,
}

impl Diet {
    /// Vegan recipes count as vegetarian.
    pub fn is_vegetarian(self) -> bool {
        matches!(self, Diet::Vegetarian | Diet::Vegan)
    }

    pub fn from_flags(vegetarian: bool, vegan: bool) -> Self {
        if vegan {
            Diet::Vegan
        } else if vegetarian {
            Diet::Vegetarian
        } else {
            Diet::Standard
        }
    }

    /// Lenient parse used for catalog cells and model output; unknown words
    /// fall back to standard.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "vegan" | "wegańska" | "weganska" => Diet::Vegan,
            "vegetarian" | "veggie" | "wegetariańska" | "wegetarianska" => Diet::Vegetarian,
            _ => Diet::Standard,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Diet::Standard => "standard",
            Diet::Vegetarian => "vegetarian",
            Diet::Vegan => "vegan",
        }
    }
}

impl fmt::Display for Diet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    Local,
    RemoteApi,
    AiGenerated,
}

impl Provenance {
    pub fn badge(self) -> &'static str {
        match self {
            Provenance::Local => "local",
            Provenance::RemoteApi => "Spoonacular",
            Provenance::AiGenerated => "AI generated",
        }
    }
}

fn default_true() -> bool {
    true
}

/// The one recipe shape every source is normalised into.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: RecipeId,
    pub name: String,
    pub ingredients: Vec<String>,
    pub prep_time: PrepTime,
    pub servings: u32,
    pub diet: Diet,
    pub portable: bool,
    pub savings: u32,
    #[serde(default)]
    pub instructions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tip: Option<String>,
    pub provenance: Provenance,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// False when the remote detail lookup for this recipe failed.
    #[serde(default = "default_true")]
    pub details_available: bool,
}

/// Filter flags applied before coverage is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FilterOptions {
    pub vegetarian_only: bool,
    pub quick_only: bool,
    pub portable_only: bool,
}

impl FilterOptions {
    /// Diet, time and portability checks, in that order.
    pub fn admits(&self, recipe: &Recipe) -> bool {
        if self.vegetarian_only && !recipe.diet.is_vegetarian() {
            return false;
        }
        if self.quick_only && !recipe.prep_time.is_quick() {
            return false;
        }
        if self.portable_only && !recipe.portable {
            return false;
        }
        true
    }
}
