// src/main.rs

use axum::{
    middleware as axum_middleware,
    routing::{get, post, put},
    Router,
};
use tokio::net::TcpListener;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

// Declaração dos nossos módulos
mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;

use crate::config::AppState;
use crate::middleware::auth::auth_guard;

#[tokio::main]
async fn main() {
    // Inicializa o logger.
    tracing_subscriber::fmt().with_target(false).compact().init();

    // .expect() é bom aqui: se a configuração falhar, a aplicação não deve iniciar.
    let app_state = AppState::new()
        .await
        .expect("Falha ao inicializar o estado da aplicação.");

    // Roda as migrações do SQLx na inicialização
    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("Falha ao rodar as migrações do banco de dados.");

    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    // Semeadura/reconciliação: garante o admin e o catálogo canônico
    // antes do servidor aceitar a primeira conexão.
    app_state
        .seed_service
        .run_startup_seed()
        .await
        .expect("Falha na semeadura/reconciliação inicial do banco.");

    // Tudo aqui dentro exige Bearer token válido; a permissão específica
    // de cada rota é verificada pelo extractor RequirePermission.
    let protected_routes = Router::new()
        .route("/api/users/me", get(handlers::auth::get_me))
        .route(
            "/api/products",
            get(handlers::inventory::get_all_products).post(handlers::inventory::create_product),
        )
        .route(
            "/api/products/{id}",
            put(handlers::inventory::update_product).delete(handlers::inventory::delete_product),
        )
        .route(
            "/api/movements",
            get(handlers::movements::list_movements).post(handlers::movements::register_movement),
        )
        .route("/api/audit/count", post(handlers::audit::register_count))
        .route("/api/dashboard", get(handlers::dashboard::get_summary))
        .route(
            "/api/users",
            get(handlers::users::list_users).post(handlers::users::create_user),
        )
        .route(
            "/api/users/{id}",
            put(handlers::users::update_user).delete(handlers::users::delete_user),
        )
        .route("/api/permissions", get(handlers::users::list_permissions))
        .route("/api/admin/reseed", post(handlers::admin::force_reseed))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Combina tudo no router principal
    let app = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route("/api/auth/login", post(handlers::auth::login))
        .merge(protected_routes)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", docs::ApiDoc::openapi()))
        .with_state(app_state);

    // Inicia o servidor
    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    let listener = TcpListener::bind(&addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr().unwrap());
    axum::serve(listener, app).await.expect("Erro no servidor Axum");
}
