pub mod config;
pub mod db;
pub mod envelope;
pub mod error;
pub mod handler;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
