// src/docs.rs

use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::OpenApi;

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::login,
        handlers::auth::get_me,

        // --- Inventory ---
        handlers::inventory::get_all_products,
        handlers::inventory::create_product,
        handlers::inventory::update_product,
        handlers::inventory::delete_product,

        // --- Movements ---
        handlers::movements::register_movement,
        handlers::movements::list_movements,

        // --- Audit ---
        handlers::audit::register_count,

        // --- Dashboard ---
        handlers::dashboard::get_summary,

        // --- Users ---
        handlers::users::list_users,
        handlers::users::create_user,
        handlers::users::update_user,
        handlers::users::delete_user,
        handlers::users::list_permissions,

        // --- Admin ---
        handlers::admin::force_reseed,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::Role,
            models::auth::Permission,
            models::auth::PermissionEntry,
            models::auth::User,
            models::auth::LoginPayload,
            models::auth::AuthResponse,

            // --- Inventory ---
            models::inventory::UnitType,
            models::inventory::Product,
            models::inventory::MovementType,
            models::inventory::Movement,

            // --- Dashboard ---
            models::dashboard::DashboardSummary,

            // --- Payloads ---
            handlers::inventory::CreateProductPayload,
            handlers::inventory::UpdateProductPayload,
            handlers::movements::RegisterMovementPayload,
            handlers::audit::AuditCountPayload,
            handlers::audit::AuditCountResponse,
            handlers::users::CreateUserPayload,
            handlers::users::UpdateUserPayload,
            handlers::admin::ReseedPayload,
        )
    ),
    tags(
        (name = "Auth", description = "Login por PIN e sessão"),
        (name = "Inventory", description = "Catálogo de produtos do estoque"),
        (name = "Movements", description = "Livro-razão de entradas e saídas"),
        (name = "Audit", description = "Averiguação (contagem física)"),
        (name = "Dashboard", description = "Indicadores do estoque"),
        (name = "Users", description = "Gestão de usuários e permissões"),
        (name = "Admin", description = "Operações administrativas destrutivas")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}
