pub mod movement_repo;
pub use movement_repo::MovementRepository;
pub mod product_repo;
pub use product_repo::ProductRepository;
pub mod settings_repo;
pub use settings_repo::SettingsRepository;
pub mod user_repo;
pub use user_repo::UserRepository;
