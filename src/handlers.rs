pub mod admin;
pub mod audit;
pub mod auth;
pub mod dashboard;
pub mod inventory;
pub mod movements;
pub mod users;
