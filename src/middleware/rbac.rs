// src/middleware/rbac.rs

use axum::{extract::FromRequestParts, http::request::Parts};
use std::marker::PhantomData;

use crate::{
    common::error::AppError,
    models::auth::{Permission, User},
};

/// 1. O Trait que define qual permissão um guardião exige
pub trait PermissionDef: Send + Sync + 'static {
    fn required() -> Permission;
}

/// 2. O Extractor (Guardião)
///
/// Verifica a permissão em memória, sobre o usuário que o auth_guard já
/// carregou: a lista de permissões mora na própria linha do usuário e o
/// ADMIN passa por cima de qualquer lista.
pub struct RequirePermission<T>(pub PhantomData<T>);

impl<T, S> FromRequestParts<S> for RequirePermission<T>
where
    T: PermissionDef,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = parts
            .extensions
            .get::<User>()
            .ok_or(AppError::InvalidToken)?;

        let required = T::required();
        if !user.has_permission(required) {
            tracing::warn!(
                "Usuário {} tentou ação que exige '{}'",
                user.name,
                required
            );
            return Err(AppError::PermissionDenied(required));
        }

        Ok(RequirePermission(PhantomData))
    }
}

// ---
// DEFINIÇÃO DAS PERMISSÕES (TIPOS)
// ---

pub struct PermViewDashboard;
impl PermissionDef for PermViewDashboard {
    fn required() -> Permission {
        Permission::ViewDashboard
    }
}

pub struct PermViewInventory;
impl PermissionDef for PermViewInventory {
    fn required() -> Permission {
        Permission::ViewInventory
    }
}

pub struct PermEditInventory;
impl PermissionDef for PermEditInventory {
    fn required() -> Permission {
        Permission::EditInventory
    }
}

pub struct PermRegisterMovements;
impl PermissionDef for PermRegisterMovements {
    fn required() -> Permission {
        Permission::RegisterMovements
    }
}

pub struct PermViewMovements;
impl PermissionDef for PermViewMovements {
    fn required() -> Permission {
        Permission::ViewMovements
    }
}

pub struct PermManageUsers;
impl PermissionDef for PermManageUsers {
    fn required() -> Permission {
        Permission::ManageUsers
    }
}

pub struct PermViewAudit;
impl PermissionDef for PermViewAudit {
    fn required() -> Permission {
        Permission::ViewAudit
    }
}
