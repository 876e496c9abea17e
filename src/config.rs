// src/config.rs

use sqlx::{postgres::PgPoolOptions, PgPool};
use std::{env, time::Duration};

use crate::{
    db::{MovementRepository, ProductRepository, SettingsRepository, UserRepository},
    services::{
        auth_service::AuthService, dashboard_service::DashboardService,
        inventory_service::InventoryService, seed_service::SeedService,
        user_service::UserService,
    },
};

// O estado compartilhado que será acessível em toda a aplicação
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub auth_service: AuthService,
    pub inventory_service: InventoryService,
    pub user_service: UserService,
    pub dashboard_service: DashboardService,
    pub seed_service: SeedService,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL deve ser definida");
        let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET deve ser definido");

        // Conecta ao banco de dados, usando '?' para propagar erros
        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        // --- Monta o gráfico de dependências ---
        let user_repo = UserRepository::new(db_pool.clone());
        let product_repo = ProductRepository::new(db_pool.clone());
        let movement_repo = MovementRepository::new(db_pool.clone());
        let settings_repo = SettingsRepository::new(db_pool.clone());

        let auth_service = AuthService::new(user_repo.clone(), jwt_secret);
        let inventory_service =
            InventoryService::new(product_repo.clone(), movement_repo, db_pool.clone());
        let user_service = UserService::new(user_repo.clone(), db_pool.clone());
        let dashboard_service = DashboardService::new(product_repo.clone());
        let seed_service =
            SeedService::new(user_repo, product_repo, settings_repo, db_pool.clone());

        Ok(Self {
            db_pool,
            auth_service,
            inventory_service,
            user_service,
            dashboard_service,
            seed_service,
        })
    }
}
