pub mod auth;
pub mod folders;
pub mod get;
pub mod list;
pub mod send;
pub mod trash;
