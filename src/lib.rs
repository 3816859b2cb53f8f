pub mod api;
pub mod cache;
pub mod config;
pub mod db;
pub mod error;
pub mod export;
pub mod fetcher;
pub mod filter;
pub mod loader;
pub mod reduce;
pub mod stats;
pub mod store;
pub mod types;
