// src/models/auth.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

// --- Papéis ---
// ADMIN ignora a lista explícita de permissões: tem acesso a tudo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "user_role", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Admin,
    Operator,
}

// --- Permissões ---
// Enumeração fechada: cada aba/ação do app corresponde a uma entrada.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "permission", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    ViewDashboard,
    ViewInventory,
    EditInventory,
    RegisterMovements,
    ViewMovements,
    ViewFinancials,
    ManageUsers,
    ViewAudit,
}

impl Permission {
    pub fn slug(&self) -> &'static str {
        match self {
            Permission::ViewDashboard => "view_dashboard",
            Permission::ViewInventory => "view_inventory",
            Permission::EditInventory => "edit_inventory",
            Permission::RegisterMovements => "register_movements",
            Permission::ViewMovements => "view_movements",
            Permission::ViewFinancials => "view_financials",
            Permission::ManageUsers => "manage_users",
            Permission::ViewAudit => "view_audit",
        }
    }

    // Rótulo exibido na tela de gestão de usuários.
    pub fn label(&self) -> &'static str {
        match self {
            Permission::ViewDashboard => "Ver Dashboard",
            Permission::ViewInventory => "Ver Estoque",
            Permission::EditInventory => "Editar Produtos",
            Permission::RegisterMovements => "Registrar Entradas/Saídas",
            Permission::ViewMovements => "Ver Histórico",
            Permission::ViewFinancials => "Ver Valores Financeiros",
            Permission::ManageUsers => "Gerenciar Usuários",
            Permission::ViewAudit => "Realizar Averiguação",
        }
    }
}

impl std::fmt::Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.slug())
    }
}

pub const ALL_PERMISSIONS: [Permission; 8] = [
    Permission::ViewDashboard,
    Permission::ViewInventory,
    Permission::EditInventory,
    Permission::RegisterMovements,
    Permission::ViewMovements,
    Permission::ViewFinancials,
    Permission::ManageUsers,
    Permission::ViewAudit,
];

// Entrada do catálogo de permissões (GET /api/permissions).
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PermissionEntry {
    pub id: Permission,
    pub label: &'static str,
}

// Representa um usuário vindo do banco de dados
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,

    #[serde(skip_serializing)] // IMPORTANTE para segurança
    #[schema(ignore)]
    pub pin_hash: String,

    pub role: Role,
    pub permissions: Vec<Permission>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Avaliador de permissões: verdadeiro se a permissão foi concedida
    /// explicitamente ou se o usuário é ADMIN. Função pura, sem banco.
    pub fn has_permission(&self, permission: Permission) -> bool {
        self.role == Role::Admin || self.permissions.contains(&permission)
    }
}

// ---
// Validação customizada: PIN de exatamente 4 dígitos.
// ---
pub fn validate_pin(pin: &str) -> Result<(), ValidationError> {
    if pin.len() != 4 || !pin.chars().all(|c| c.is_ascii_digit()) {
        let mut err = ValidationError::new("pin");
        err.message = Some("O PIN deve ter exatamente 4 dígitos.".into());
        return Err(err);
    }
    Ok(())
}

// Dados para login
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginPayload {
    #[validate(custom(function = "validate_pin"))]
    #[schema(example = "1234")]
    pub pin: String,
}

// Resposta de autenticação com o token e o usuário já saneado
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

// Estrutura de dados ("claims") dentro do JWT
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,  // Subject (ID do usuário)
    pub exp: usize, // Expiration time (quando o token expira)
    pub iat: usize, // Issued At (quando o token foi criado)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn usuario(role: Role, permissions: Vec<Permission>) -> User {
        User {
            id: Uuid::new_v4(),
            name: "Teste".into(),
            email: "teste@lagoon.com".into(),
            pin_hash: "$2b$12$hash".into(),
            role,
            permissions,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn admin_tem_toda_permissao_mesmo_com_lista_vazia() {
        let admin = usuario(Role::Admin, vec![]);
        for p in ALL_PERMISSIONS {
            assert!(admin.has_permission(p), "ADMIN deveria ter '{}'", p);
        }
    }

    #[test]
    fn operador_so_tem_o_que_foi_concedido() {
        let operador = usuario(Role::Operator, vec![Permission::ViewInventory]);
        assert!(operador.has_permission(Permission::ViewInventory));
        assert!(!operador.has_permission(Permission::EditInventory));
        assert!(!operador.has_permission(Permission::ManageUsers));
    }

    #[test]
    fn operador_sem_permissoes_nao_acessa_nada() {
        let operador = usuario(Role::Operator, vec![]);
        for p in ALL_PERMISSIONS {
            assert!(!operador.has_permission(p));
        }
    }

    #[test]
    fn pin_valido_tem_quatro_digitos() {
        assert!(validate_pin("1234").is_ok());
        assert!(validate_pin("0000").is_ok());
        assert!(validate_pin("123").is_err());
        assert!(validate_pin("12345").is_err());
        assert!(validate_pin("12a4").is_err());
        assert!(validate_pin("").is_err());
    }

    #[test]
    fn catalogo_cobre_todas_as_permissoes() {
        // Garante que ninguém adicione uma variante sem rótulo.
        assert_eq!(ALL_PERMISSIONS.len(), 8);
        for p in ALL_PERMISSIONS {
            assert!(!p.label().is_empty());
            assert!(!p.slug().is_empty());
        }
    }
}
