// src/db/catalogo_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::{
        error::{map_foreign_key_violation, map_unique_violation, AppError},
        pagination::PageRequest,
    },
    models::catalogo::{StatusServico, TipoServico},
};

#[derive(Clone)]
pub struct CatalogoRepository {
    pool: PgPool,
}

impl CatalogoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    //  STATUS DE SERVIÇO
    // =========================================================================

    pub async fn create_status(
        &self,
        nome_status: &str,
        descricao: Option<&str>,
        ordem: Option<i32>,
    ) -> Result<StatusServico, AppError> {
        sqlx::query_as::<_, StatusServico>(
            r#"
            INSERT INTO status_servico (nome_status, descricao, ordem)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(nome_status)
        .bind(descricao)
        .bind(ordem)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, || format!("O status '{}' já existe.", nome_status)))
    }

    pub async fn find_status_by_id<'e, E>(
        &self,
        executor: E,
        id_status_servico: Uuid,
    ) -> Result<Option<StatusServico>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let status = sqlx::query_as::<_, StatusServico>(
            "SELECT * FROM status_servico WHERE id_status_servico = $1",
        )
        .bind(id_status_servico)
        .fetch_optional(executor)
        .await?;

        Ok(status)
    }

    pub async fn find_status_by_name<'e, E>(
        &self,
        executor: E,
        nome_status: &str,
    ) -> Result<Option<StatusServico>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let status = sqlx::query_as::<_, StatusServico>(
            "SELECT * FROM status_servico WHERE nome_status = $1",
        )
        .bind(nome_status)
        .fetch_optional(executor)
        .await?;

        Ok(status)
    }

    pub async fn list_status(
        &self,
        search: Option<&str>,
        page: PageRequest,
    ) -> Result<(Vec<StatusServico>, i64), AppError> {
        let status = sqlx::query_as::<_, StatusServico>(
            r#"
            SELECT * FROM status_servico
            WHERE ($1::text IS NULL OR nome_status ILIKE $1)
            ORDER BY ordem ASC NULLS LAST, nome_status ASC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(search)
        .bind(page.limit)
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM status_servico WHERE ($1::text IS NULL OR nome_status ILIKE $1)",
        )
        .bind(search)
        .fetch_one(&self.pool)
        .await?;

        Ok((status, total))
    }

    pub async fn update_status(
        &self,
        id_status_servico: Uuid,
        nome_status: &str,
        descricao: &str,
        ordem: Option<i32>,
    ) -> Result<Option<StatusServico>, AppError> {
        sqlx::query_as::<_, StatusServico>(
            r#"
            UPDATE status_servico
            SET nome_status = $2, descricao = $3, ordem = COALESCE($4, ordem)
            WHERE id_status_servico = $1
            RETURNING *
            "#,
        )
        .bind(id_status_servico)
        .bind(nome_status)
        .bind(descricao)
        .bind(ordem)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, || format!("O status '{}' já existe.", nome_status)))
    }

    /// Quantas OS ou linhas de histórico ainda apontam para o status.
    pub async fn count_status_usage(&self, id_status_servico: Uuid) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT
                (SELECT COUNT(*) FROM servicos WHERE id_status_atual = $1)
              + (SELECT COUNT(*) FROM historico_servico
                 WHERE id_status_novo = $1 OR id_status_anterior = $1)
            "#,
        )
        .bind(id_status_servico)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    pub async fn delete_status(&self, id_status_servico: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM status_servico WHERE id_status_servico = $1")
            .bind(id_status_servico)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                map_foreign_key_violation(e, || "Status em uso por serviços e não pode ser excluído.".into())
            })?;

        Ok(result.rows_affected())
    }

    // =========================================================================
    //  TIPOS DE SERVIÇO
    // =========================================================================

    pub async fn create_tipo(&self, nome_tipo_servico: &str, descricao: &str) -> Result<TipoServico, AppError> {
        sqlx::query_as::<_, TipoServico>(
            r#"
            INSERT INTO tipos_servico (nome_tipo_servico, descricao)
            VALUES ($1, $2)
            RETURNING *
            "#,
        )
        .bind(nome_tipo_servico)
        .bind(descricao)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            map_unique_violation(e, || format!("O tipo de serviço '{}' já existe.", nome_tipo_servico))
        })
    }

    pub async fn find_tipo_by_id<'e, E>(
        &self,
        executor: E,
        id_tipo_servico: Uuid,
    ) -> Result<Option<TipoServico>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let tipo = sqlx::query_as::<_, TipoServico>(
            "SELECT * FROM tipos_servico WHERE id_tipo_servico = $1",
        )
        .bind(id_tipo_servico)
        .fetch_optional(executor)
        .await?;

        Ok(tipo)
    }

    pub async fn list_tipos(
        &self,
        search: Option<&str>,
        page: PageRequest,
    ) -> Result<(Vec<TipoServico>, i64), AppError> {
        let tipos = sqlx::query_as::<_, TipoServico>(
            r#"
            SELECT * FROM tipos_servico
            WHERE ($1::text IS NULL OR nome_tipo_servico ILIKE $1 OR descricao ILIKE $1)
            ORDER BY nome_tipo_servico ASC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(search)
        .bind(page.limit)
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM tipos_servico
            WHERE ($1::text IS NULL OR nome_tipo_servico ILIKE $1 OR descricao ILIKE $1)
            "#,
        )
        .bind(search)
        .fetch_one(&self.pool)
        .await?;

        Ok((tipos, total))
    }

    pub async fn update_tipo(
        &self,
        id_tipo_servico: Uuid,
        nome_tipo_servico: &str,
        descricao: &str,
    ) -> Result<Option<TipoServico>, AppError> {
        sqlx::query_as::<_, TipoServico>(
            r#"
            UPDATE tipos_servico
            SET nome_tipo_servico = $2, descricao = $3
            WHERE id_tipo_servico = $1
            RETURNING *
            "#,
        )
        .bind(id_tipo_servico)
        .bind(nome_tipo_servico)
        .bind(descricao)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            map_unique_violation(e, || format!("O tipo de serviço '{}' já existe.", nome_tipo_servico))
        })
    }

    pub async fn count_tipo_usage(&self, id_tipo_servico: Uuid) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM servicos WHERE id_tipo_servico = $1")
            .bind(id_tipo_servico)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    pub async fn delete_tipo(&self, id_tipo_servico: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM tipos_servico WHERE id_tipo_servico = $1")
            .bind(id_tipo_servico)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                map_foreign_key_violation(e, || {
                    "Tipo de serviço em uso por serviços e não pode ser excluído.".into()
                })
            })?;

        Ok(result.rows_affected())
    }
}
