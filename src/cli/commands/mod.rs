pub mod auth;
pub mod cep;
pub mod items;
pub mod orders;
pub mod profile;
pub mod users;
