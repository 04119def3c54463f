pub mod conversation;
pub mod models;
pub mod oauth2;
pub mod resources;
pub mod transport;
