pub mod analytics;
pub mod config;
pub mod dashboard;
pub mod db;
pub mod error;
pub mod migrations;
pub mod models;
pub mod repositories;
pub mod store;
