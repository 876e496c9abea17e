// src/services/seed_service.rs

use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::{
    common::error::AppError,
    db::{settings_repo::CATALOG_VERSION_KEY, ProductRepository, SettingsRepository, UserRepository},
    models::auth::{Role, ALL_PERMISSIONS},
    models::inventory::UnitType,
};

/// Versão do catálogo canônico abaixo. Incrementar aqui dispara uma
/// ressemeadura completa na próxima inicialização.
pub const CATALOG_VERSION: &str = "2";

/// Item usado como sonda de consistência: se sumiu do banco, o catálogo
/// foi mexido por fora e a reconciliação replanta tudo.
pub const SENTINEL_PRODUCT: &str = "Pão de Forma";

const DEFAULT_ADMIN_NAME: &str = "Administrador Lagoon";
const DEFAULT_ADMIN_EMAIL: &str = "admin@lagoon.com";
const DEFAULT_ADMIN_PIN: &str = "1234";

/// Inventário canônico do Lagoon GastroBar: (nome, unidade, quantidade
/// inicial). O estoque mínimo é derivado da unidade na hora de plantar.
pub const CANONICAL_CATALOG: &[(&str, UnitType, u32)] = &[
    ("Pão de Forma", UnitType::Un, 30),
    ("Pão Bisnaguinha", UnitType::Un, 13),
    ("Biscoito Vilma", UnitType::Pc, 9),
    ("Óleo Composto", UnitType::Un, 7),
    ("Óleo de Cozinha", UnitType::Un, 63),
    ("Vinagre de Maçã", UnitType::Un, 40),
    ("Shoyo", UnitType::Un, 2),
    ("Molho de Alho", UnitType::Un, 9),
    ("Molho de Pimenta 1L", UnitType::Un, 2),
    ("Molho de Tomate 1.7kg", UnitType::Un, 10),
    ("Batata Palha 400g", UnitType::Un, 4),
    ("Molho Vermelhão 1.01kg", UnitType::Un, 2),
    ("Caldo SB Carne 1.01kg", UnitType::Un, 11),
    ("Grão de Bico", UnitType::Un, 15),
    ("Adoçante", UnitType::Un, 6),
    ("Fermento (PCT/6)", UnitType::Pc, 2),
    ("Milho", UnitType::Un, 10),
    ("Ervilha", UnitType::Un, 10),
    ("Molho de Tomate 300g", UnitType::Un, 21),
    ("Farinha de Trigo (PCT10)", UnitType::Pc, 3),
    ("Suco em Pó Morango", UnitType::Un, 2),
    ("Suco em Pó Uva", UnitType::Un, 2),
    ("Arroz 5kg (PCT/6)", UnitType::Pc, 3),
    ("Sal Refinado", UnitType::Un, 10),
    ("Feijão 1kg", UnitType::Un, 21),
    ("Farofa de Mandioca 1kg", UnitType::Un, 7),
    ("Açúcar Refinado 1kg", UnitType::Un, 27),
    ("Macarrão Parafuso", UnitType::Un, 47),
    ("Sal Sachê", UnitType::Cx, 2),
    ("Creme de Leite", UnitType::Cx, 5),
    ("Leite Condensado", UnitType::Cx, 2),
    ("Veja Supremo", UnitType::Un, 20),
    ("Álcool Etílico 1L", UnitType::Un, 6),
    ("Bombril", UnitType::Pc, 2),
    ("Alcaparras", UnitType::Un, 2),
    ("Smirnoff", UnitType::Un, 10),
    ("Gin", UnitType::Un, 24),
    ("Suco Concentrado Manga", UnitType::Un, 8),
    ("Leite Integral", UnitType::Cx, 1),
    ("PCT Garfo", UnitType::Pc, 19),
    ("Papel Higiênico", UnitType::Pc, 13),
    ("Papel Toalha", UnitType::Pc, 12),
    ("Mel 250g", UnitType::Un, 2),
    ("Pratinho Isopor", UnitType::Pc, 23),
    ("Linguiça Calabresa 2.5kg", UnitType::Un, 15),
    ("Rolo Folha de Alumínio", UnitType::Un, 2),
    ("Papel Manteiga", UnitType::Un, 1),
    ("Faca Descartável", UnitType::Un, 20),
    ("Toalha de Papel (PCT)", UnitType::Pc, 2),
    ("Língua (Fechada)", UnitType::Cx, 3),
    ("Moela", UnitType::Pc, 9),
    ("Pernil", UnitType::Cx, 1),
    ("Fígado", UnitType::Pc, 2),
    ("Carne Moída", UnitType::Cx, 1),
    ("Barriga", UnitType::Pc, 3),
    ("Filé de Peixe", UnitType::Cx, 2),
    ("Sobrecoxa", UnitType::Un, 7),
    ("Batata Frita Grossa", UnitType::Pc, 26),
    ("Batata frita Fina", UnitType::Pc, 8),
    ("Pão de Alho", UnitType::Un, 38),
    ("Iogurte 1.1kg", UnitType::Un, 17),
    ("Melancia", UnitType::Un, 3),
    ("Energético Tropical", UnitType::Un, 11),
    ("Energético Melancia", UnitType::Un, 6),
    ("Heineken Long Neck (PCT)", UnitType::Pc, 44),
    ("Budweiser Long Neck (PCT)", UnitType::Pc, 22),
    ("Cachaça 51", UnitType::Un, 12),
    ("Melão", UnitType::Un, 10),
    ("Mamão", UnitType::Un, 9),
    ("Abacaxi", UnitType::Un, 4),
    ("Uva (PCT)", UnitType::Pc, 9),
];

/// Decide se o catálogo precisa ser replantado. O marcador de versão é o
/// critério principal; a sentinela pega o caso do catálogo esvaziado por
/// fora sem que o marcador tenha sido tocado.
fn catalog_is_stale(version: Option<&str>, sentinel_present: bool) -> bool {
    version != Some(CATALOG_VERSION) || !sentinel_present
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// Versão confere e a sentinela está presente: nada a fazer.
    UpToDate,
    /// Catálogo foi apagado e replantado a partir da lista canônica.
    Reseeded,
}

// Motor de semeadura e reconciliação. Roda uma vez na inicialização,
// antes do servidor aceitar conexões.
#[derive(Clone)]
pub struct SeedService {
    user_repo: UserRepository,
    product_repo: ProductRepository,
    settings_repo: SettingsRepository,
    pool: PgPool,
}

impl SeedService {
    pub fn new(
        user_repo: UserRepository,
        product_repo: ProductRepository,
        settings_repo: SettingsRepository,
        pool: PgPool,
    ) -> Self {
        Self {
            user_repo,
            product_repo,
            settings_repo,
            pool,
        }
    }

    /// Rotina de inicialização: garante o admin e reconcilia o catálogo.
    pub async fn run_startup_seed(&self) -> Result<ReconcileOutcome, AppError> {
        self.ensure_admin_user().await?;
        self.reconcile_catalog().await
    }

    /// Se a tabela de usuários está completamente vazia, cria exatamente
    /// um ADMIN padrão. Nunca roda se já existe qualquer usuário, para
    /// não duplicar o administrador.
    async fn ensure_admin_user(&self) -> Result<(), AppError> {
        if self.user_repo.count(&self.pool).await? > 0 {
            return Ok(());
        }

        let pin = DEFAULT_ADMIN_PIN.to_owned();
        let pin_hash = tokio::task::spawn_blocking(move || hash_pin(&pin))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;

        self.user_repo
            .create(
                &self.pool,
                DEFAULT_ADMIN_NAME,
                DEFAULT_ADMIN_EMAIL,
                &pin_hash,
                Role::Admin,
                &ALL_PERMISSIONS,
            )
            .await?;

        tracing::warn!(
            "Nenhum usuário encontrado: admin padrão criado ({}). Troque o PIN inicial!",
            DEFAULT_ADMIN_EMAIL
        );
        Ok(())
    }

    /// Reconciliação do catálogo. O marcador explícito de versão em
    /// system_settings decide se o banco está atual; a sentinela cobre o
    /// caso do catálogo ter sido esvaziado ou corrompido por fora sem
    /// mexer no marcador. Qualquer divergência replanta tudo em uma
    /// única transação: destruidor, mas nunca parcial.
    pub async fn reconcile_catalog(&self) -> Result<ReconcileOutcome, AppError> {
        let version = self
            .settings_repo
            .get(&self.pool, CATALOG_VERSION_KEY)
            .await?;
        let sentinel_present = self
            .product_repo
            .exists_by_name(&self.pool, SENTINEL_PRODUCT)
            .await?;

        if !catalog_is_stale(version.as_deref(), sentinel_present) {
            tracing::info!("Catálogo na versão {}: reconciliação dispensada.", CATALOG_VERSION);
            return Ok(ReconcileOutcome::UpToDate);
        }

        tracing::warn!(
            "Catálogo desatualizado (versão {:?}, sentinela presente: {}). Ressemeando.",
            version,
            sentinel_present
        );
        self.reseed_catalog().await?;
        Ok(ReconcileOutcome::Reseeded)
    }

    /// Apaga e replanta o catálogo canônico. Também atende o comando
    /// manual do ADMIN ("limpar banco"), depois da confirmação exigida
    /// pelo handler.
    pub async fn reseed_catalog(&self) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        let removed = self.product_repo.delete_all(&mut *tx).await?;

        for (name, unit, qty) in CANONICAL_CATALOG {
            self.product_repo
                .create(
                    &mut *tx,
                    name,
                    *unit,
                    Decimal::from(*qty),
                    unit.default_min_stock(),
                    Decimal::ZERO,
                )
                .await?;
        }

        self.settings_repo
            .set(&mut *tx, CATALOG_VERSION_KEY, CATALOG_VERSION)
            .await?;

        tx.commit().await?;

        tracing::info!(
            "Catálogo ressemeado: {} produtos removidos, {} plantados (versão {}).",
            removed,
            CANONICAL_CATALOG.len(),
            CATALOG_VERSION
        );
        Ok(())
    }
}

fn hash_pin(pin: &str) -> Result<String, bcrypt::BcryptError> {
    bcrypt::hash(pin, bcrypt::DEFAULT_COST)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn sentinela_esta_no_catalogo_canonico() {
        assert!(CANONICAL_CATALOG
            .iter()
            .any(|(name, _, _)| *name == SENTINEL_PRODUCT));
    }

    #[test]
    fn catalogo_nao_tem_nomes_duplicados() {
        let mut vistos = HashSet::new();
        for (name, _, _) in CANONICAL_CATALOG {
            assert!(vistos.insert(*name), "nome duplicado no catálogo: {}", name);
        }
    }

    #[test]
    fn catalogo_tem_o_inventario_completo() {
        assert_eq!(CANONICAL_CATALOG.len(), 71);
    }

    #[test]
    fn reconciliacao_e_dispensada_com_versao_e_sentinela_em_dia() {
        // Única combinação que NÃO dispara ressemeadura: rodar a
        // inicialização de novo sobre um banco em dia é um no-op.
        assert!(!catalog_is_stale(Some(CATALOG_VERSION), true));
    }

    #[test]
    fn qualquer_divergencia_dispara_ressemeadura() {
        // Marcador ausente (banco recém-criado).
        assert!(catalog_is_stale(None, true));
        // Versão antiga do catálogo.
        assert!(catalog_is_stale(Some("1"), true));
        // Sentinela sumiu: catálogo mexido por fora do app.
        assert!(catalog_is_stale(Some(CATALOG_VERSION), false));
        // Banco completamente zerado.
        assert!(catalog_is_stale(None, false));
    }

    #[test]
    fn minimos_derivados_seguem_a_unidade() {
        for (name, unit, _) in CANONICAL_CATALOG {
            let min = unit.default_min_stock();
            match unit {
                UnitType::Cx => assert_eq!(min, Decimal::ONE, "{}", name),
                _ => assert_eq!(min, Decimal::from(5), "{}", name),
            }
        }
    }
}
