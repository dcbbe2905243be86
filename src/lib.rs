pub mod auth;
pub mod cep;
pub mod cli;
pub mod client;
pub mod config;
pub mod debounce;
pub mod error;
pub mod gate;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod pagination;
pub mod query;
pub mod routes;
pub mod validation;
