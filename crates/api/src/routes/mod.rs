pub mod admin;
pub mod common;
pub mod engagement;
pub mod feedback;
pub mod health;
pub mod learning;
pub mod models;
