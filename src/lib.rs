pub mod api_connection;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod favorites;
pub mod ingredients;
pub mod logging;
pub mod matcher;
pub mod normalize;
pub mod pipeline;
pub mod ranker;
pub mod recipe;
pub mod session;
