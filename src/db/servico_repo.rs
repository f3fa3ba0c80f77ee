// src/db/servico_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::{error::AppError, pagination::PageRequest},
    models::servicos::{
        ClienteContato, HistoricoServico, HistoricoServicoDetalhe, Servico, ServicoDados,
        ServicoResumo, ServicoResumoRow,
    },
};

#[derive(Clone)]
pub struct ServicoRepository {
    pool: PgPool,
}

impl ServicoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    //  ORDENS DE SERVIÇO
    // =========================================================================

    pub async fn create<'e, E>(
        &self,
        executor: E,
        dados: &ServicoDados,
        id_status_atual: Uuid,
    ) -> Result<Servico, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let servico = sqlx::query_as::<_, Servico>(
            r#"
            INSERT INTO servicos (
                id_cliente, id_tipo_servico, id_status_atual,
                descricao_problema, equipamento_descricao, equipamento_marca,
                equipamento_modelo, equipamento_num_serie,
                data_entrada, data_previsao_saida, data_efetiva_saida,
                valor_servico, valor_pecas, valor_mao_de_obra,
                descricao_solucao, observacoes_internas
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, NOW(), $9, $10, $11, $12, $13, $14, $15)
            RETURNING *
            "#,
        )
        .bind(dados.id_cliente)
        .bind(dados.id_tipo_servico)
        .bind(id_status_atual)
        .bind(&dados.descricao_problema)
        .bind(&dados.equipamento_descricao)
        .bind(&dados.equipamento_marca)
        .bind(&dados.equipamento_modelo)
        .bind(&dados.equipamento_num_serie)
        .bind(dados.data_previsao_saida)
        .bind(dados.data_efetiva_saida)
        .bind(dados.valor_servico)
        .bind(dados.valor_pecas)
        .bind(dados.valor_mao_de_obra)
        .bind(&dados.descricao_solucao)
        .bind(&dados.observacoes_internas)
        .fetch_one(executor)
        .await?;

        Ok(servico)
    }

    /// Busca a OS travando a linha (usar dentro de transação).
    pub async fn find_by_id_for_update<'e, E>(
        &self,
        executor: E,
        id_servico: Uuid,
    ) -> Result<Option<Servico>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let servico = sqlx::query_as::<_, Servico>(
            "SELECT * FROM servicos WHERE id_servico = $1 FOR UPDATE",
        )
        .bind(id_servico)
        .fetch_optional(executor)
        .await?;

        Ok(servico)
    }

    pub async fn find_by_id(&self, id_servico: Uuid) -> Result<Option<Servico>, AppError> {
        let servico = sqlx::query_as::<_, Servico>("SELECT * FROM servicos WHERE id_servico = $1")
            .bind(id_servico)
            .fetch_optional(&self.pool)
            .await?;

        Ok(servico)
    }

    pub async fn update<'e, E>(
        &self,
        executor: E,
        id_servico: Uuid,
        dados: &ServicoDados,
        id_status_atual: Uuid,
    ) -> Result<Servico, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let servico = sqlx::query_as::<_, Servico>(
            r#"
            UPDATE servicos SET
                id_cliente = $2, id_tipo_servico = $3, id_status_atual = $4,
                descricao_problema = $5, equipamento_descricao = $6, equipamento_marca = $7,
                equipamento_modelo = $8, equipamento_num_serie = $9,
                data_previsao_saida = $10, data_efetiva_saida = $11,
                valor_servico = $12, valor_pecas = $13, valor_mao_de_obra = $14,
                descricao_solucao = $15, observacoes_internas = $16,
                data_atualizacao = NOW()
            WHERE id_servico = $1
            RETURNING *
            "#,
        )
        .bind(id_servico)
        .bind(dados.id_cliente)
        .bind(dados.id_tipo_servico)
        .bind(id_status_atual)
        .bind(&dados.descricao_problema)
        .bind(&dados.equipamento_descricao)
        .bind(&dados.equipamento_marca)
        .bind(&dados.equipamento_modelo)
        .bind(&dados.equipamento_num_serie)
        .bind(dados.data_previsao_saida)
        .bind(dados.data_efetiva_saida)
        .bind(dados.valor_servico)
        .bind(dados.valor_pecas)
        .bind(dados.valor_mao_de_obra)
        .bind(&dados.descricao_solucao)
        .bind(&dados.observacoes_internas)
        .fetch_one(executor)
        .await?;

        Ok(servico)
    }

    pub async fn delete(&self, id_servico: Uuid) -> Result<u64, AppError> {
        // O histórico cai junto (ON DELETE CASCADE)
        let result = sqlx::query("DELETE FROM servicos WHERE id_servico = $1")
            .bind(id_servico)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    pub async fn list(
        &self,
        search: Option<&str>,
        status_filter: Option<Uuid>,
        page: PageRequest,
    ) -> Result<(Vec<ServicoResumo>, i64), AppError> {
        let rows = sqlx::query_as::<_, ServicoResumoRow>(
            r#"
            SELECT
                s.*,
                c.tipo_pessoa   AS cliente_tipo_pessoa,
                c.nome_completo AS cliente_nome_completo,
                c.razao_social  AS cliente_razao_social,
                t.nome_tipo_servico,
                st.nome_status
            FROM servicos s
            INNER JOIN clientes c ON c.id_cliente = s.id_cliente
            INNER JOIN tipos_servico t ON t.id_tipo_servico = s.id_tipo_servico
            INNER JOIN status_servico st ON st.id_status_servico = s.id_status_atual
            WHERE ($1::text IS NULL
                   OR s.id_servico::text ILIKE $1
                   OR s.descricao_problema ILIKE $1
                   OR s.equipamento_descricao ILIKE $1
                   OR c.nome_completo ILIKE $1
                   OR c.razao_social ILIKE $1)
            AND ($2::uuid IS NULL OR s.id_status_atual = $2)
            ORDER BY s.data_entrada DESC
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(search)
        .bind(status_filter)
        .bind(page.limit)
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM servicos s
            INNER JOIN clientes c ON c.id_cliente = s.id_cliente
            WHERE ($1::text IS NULL
                   OR s.id_servico::text ILIKE $1
                   OR s.descricao_problema ILIKE $1
                   OR s.equipamento_descricao ILIKE $1
                   OR c.nome_completo ILIKE $1
                   OR c.razao_social ILIKE $1)
            AND ($2::uuid IS NULL OR s.id_status_atual = $2)
            "#,
        )
        .bind(search)
        .bind(status_filter)
        .fetch_one(&self.pool)
        .await?;

        Ok((rows.into_iter().map(ServicoResumo::from).collect(), total))
    }

    pub async fn find_cliente_contato(&self, id_cliente: Uuid) -> Result<Option<ClienteContato>, AppError> {
        let cliente = sqlx::query_as::<_, ClienteContato>(
            r#"
            SELECT id_cliente, nome_completo, razao_social, tipo_pessoa, email, telefone_principal
            FROM clientes
            WHERE id_cliente = $1
            "#,
        )
        .bind(id_cliente)
        .fetch_optional(&self.pool)
        .await?;

        Ok(cliente)
    }

    // =========================================================================
    //  HISTÓRICO
    // =========================================================================

    pub async fn insert_historico<'e, E>(
        &self,
        executor: E,
        id_servico: Uuid,
        id_status_anterior: Option<Uuid>,
        id_status_novo: Uuid,
        observacao: &str,
    ) -> Result<HistoricoServico, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let historico = sqlx::query_as::<_, HistoricoServico>(
            r#"
            INSERT INTO historico_servico (id_servico, id_status_anterior, id_status_novo, observacao)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(id_servico)
        .bind(id_status_anterior)
        .bind(id_status_novo)
        .bind(observacao)
        .fetch_one(executor)
        .await?;

        Ok(historico)
    }

    /// Histórico mais recente primeiro, com o nome dos status.
    pub async fn list_historico(&self, id_servico: Uuid) -> Result<Vec<HistoricoServicoDetalhe>, AppError> {
        let historico = sqlx::query_as::<_, HistoricoServicoDetalhe>(
            r#"
            SELECT
                h.*,
                sa.nome_status AS nome_status_anterior,
                sn.nome_status AS nome_status_novo
            FROM historico_servico h
            LEFT JOIN status_servico sa ON sa.id_status_servico = h.id_status_anterior
            INNER JOIN status_servico sn ON sn.id_status_servico = h.id_status_novo
            WHERE h.id_servico = $1
            ORDER BY h.data_alteracao DESC, h.id_historico_servico
            "#,
        )
        .bind(id_servico)
        .fetch_all(&self.pool)
        .await?;

        Ok(historico)
    }
}
