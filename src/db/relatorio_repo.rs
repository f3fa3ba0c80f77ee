// src/db/relatorio_repo.rs

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{
        clientes::TipoPessoa,
        relatorios::{FaturamentoLinha, ServicoStatusLinha},
    },
};

#[derive(Clone)]
pub struct RelatorioRepository {
    pool: PgPool,
}

impl RelatorioRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// OS com saída efetiva dentro do período e valor positivo.
    pub async fn faturamento(
        &self,
        inicio: DateTime<Utc>,
        fim: DateTime<Utc>,
        tipo_pessoa: Option<TipoPessoa>,
    ) -> Result<Vec<FaturamentoLinha>, AppError> {
        let linhas = sqlx::query_as::<_, FaturamentoLinha>(
            r#"
            SELECT
                s.id_servico,
                s.data_efetiva_saida,
                c.tipo_pessoa,
                c.nome_completo,
                c.razao_social,
                c.email,
                t.nome_tipo_servico,
                s.valor_servico
            FROM servicos s
            INNER JOIN clientes c ON c.id_cliente = s.id_cliente
            INNER JOIN tipos_servico t ON t.id_tipo_servico = s.id_tipo_servico
            WHERE s.data_efetiva_saida BETWEEN $1 AND $2
            AND s.valor_servico > 0
            AND ($3::tipo_pessoa IS NULL OR c.tipo_pessoa = $3)
            ORDER BY s.data_efetiva_saida ASC
            "#,
        )
        .bind(inicio)
        .bind(fim)
        .bind(tipo_pessoa)
        .fetch_all(&self.pool)
        .await?;

        Ok(linhas)
    }

    pub async fn servicos_por_status(
        &self,
        status_id: Option<Uuid>,
        inicio: Option<DateTime<Utc>>,
        fim: Option<DateTime<Utc>>,
    ) -> Result<Vec<ServicoStatusLinha>, AppError> {
        let linhas = sqlx::query_as::<_, ServicoStatusLinha>(
            r#"
            SELECT
                s.id_servico,
                c.tipo_pessoa,
                c.nome_completo,
                c.razao_social,
                t.nome_tipo_servico,
                s.data_entrada,
                st.nome_status,
                s.valor_servico
            FROM servicos s
            INNER JOIN clientes c ON c.id_cliente = s.id_cliente
            INNER JOIN tipos_servico t ON t.id_tipo_servico = s.id_tipo_servico
            INNER JOIN status_servico st ON st.id_status_servico = s.id_status_atual
            WHERE ($1::uuid IS NULL OR s.id_status_atual = $1)
            AND ($2::timestamptz IS NULL OR s.data_entrada >= $2)
            AND ($3::timestamptz IS NULL OR s.data_entrada <= $3)
            ORDER BY s.data_entrada ASC
            "#,
        )
        .bind(status_id)
        .bind(inicio)
        .bind(fim)
        .fetch_all(&self.pool)
        .await?;

        Ok(linhas)
    }
}
