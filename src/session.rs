//! Per-user state between searches: the owned ingredients, the filter flags
//! and what is currently on screen.
//!
//! Every search or generation takes a [`RequestTicket`] before it starts and
//! hands it back with its result. Only the newest ticket may replace the
//! display, so a slow response to an older request can never overwrite the
//! answer to a newer one.

use crate::error::RecipeResult;
use crate::ingredients::OwnedIngredients;
use crate::matcher::{MatchOutcome, MatchResult};
use crate::recipe::{FilterOptions, Recipe};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RequestTicket(u64);

#[derive(Debug, Clone, PartialEq, Default)]
pub enum DisplayState {
    #[default]
    Idle,
    Loading,
    NoIngredients,
    Results(Vec<MatchResult>),
    Recipe(Box<Recipe>),
    Error(String),
}

impl From<MatchOutcome> for DisplayState {
    fn from(outcome: MatchOutcome) -> Self {
        match outcome {
            MatchOutcome::NoIngredientsSelected => DisplayState::NoIngredients,
            MatchOutcome::Matches(matches) => DisplayState::Results(matches),
        }
    }
}

#[derive(Debug, Default)]
pub struct Session {
    owned: OwnedIngredients,
    filters: FilterOptions,
    generation: u64,
    view: DisplayState,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ingredients(owned: OwnedIngredients) -> Self {
        Self {
            owned,
            ..Self::default()
        }
    }

    pub fn owned(&self) -> &OwnedIngredients {
        &self.owned
    }

    /// Flips one ingredient; returns whether it is now owned.
    pub fn toggle_ingredient(&mut self, name: &str) -> RecipeResult<bool> {
        self.owned.toggle(name)
    }

    pub fn filters(&self) -> FilterOptions {
        self.filters
    }

    pub fn set_filters(&mut self, filters: FilterOptions) {
        self.filters = filters;
    }

    pub fn view(&self) -> &DisplayState {
        &self.view
    }

    /// Starts a new request, invalidating every ticket handed out before.
    pub fn begin_request(&mut self) -> RequestTicket {
        self.generation += 1;
        self.view = DisplayState::Loading;
        RequestTicket(self.generation)
    }

    pub fn is_current(&self, ticket: RequestTicket) -> bool {
        ticket.0 == self.generation
    }

    /// Replaces the display if `ticket` is still the newest one.
    ///
    /// Returns false, leaving the display untouched, for a stale ticket.
    pub fn commit(&mut self, ticket: RequestTicket, state: DisplayState) -> bool {
        if !self.is_current(ticket) {
            tracing::debug!(
                ticket = ticket.0,
                current = self.generation,
                "Discarding stale result"
            );
            return false;
        }
        self.view = state;
        true
    }

    /// Commits a search or generation result, mapping errors to their message.
    pub fn commit_result<T>(&mut self, ticket: RequestTicket, result: RecipeResult<T>) -> bool
    where
        T: Into<DisplayState>,
    {
        let state = match result {
            Ok(value) => value.into(),
            Err(e) => {
                if e.is_user_input() {
                    tracing::debug!(error = %e, "Request rejected");
                } else {
                    tracing::warn!(error = %e, "Request failed");
                }
                DisplayState::Error(e.user_message())
            }
        };
        self.commit(ticket, state)
    }
}

impl From<Recipe> for DisplayState {
    fn from(recipe: Recipe) -> Self {
        DisplayState::Recipe(Box::new(recipe))
    }
}
