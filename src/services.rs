pub mod auth_service;
pub mod dashboard_service;
pub mod inventory_service;
pub mod seed_service;
pub mod user_service;
