pub mod api;
pub mod app;
pub mod config;
pub mod fetch_error;
pub mod fetcher;
pub mod geocoder;
pub mod models;
pub mod narration;
pub mod prompts;
pub mod query;
pub mod services;
pub mod utils;
