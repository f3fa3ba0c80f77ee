// src/services/servico_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{error::AppError, pagination::Paginated},
    db::{CatalogoRepository, ClienteRepository, ServicoRepository},
    models::servicos::{
        status_transition, CreateServicoPayload, Servico, ServicoDados, ServicoDetalhe,
        ServicoListParams, ServicoResumo, UpdateServicoPayload, OBSERVACAO_CRIACAO,
        OBSERVACAO_MUDANCA_PADRAO,
    },
};

fn servico_nao_encontrado() -> AppError {
    AppError::NotFound("Serviço não encontrado.".into())
}

#[derive(Clone)]
pub struct ServicoService {
    repo: ServicoRepository,
    cliente_repo: ClienteRepository,
    catalogo_repo: CatalogoRepository,
    pool: PgPool,
    status_inicial: String,
}

impl ServicoService {
    pub fn new(
        repo: ServicoRepository,
        cliente_repo: ClienteRepository,
        catalogo_repo: CatalogoRepository,
        pool: PgPool,
        status_inicial: String,
    ) -> Self {
        Self {
            repo,
            cliente_repo,
            catalogo_repo,
            pool,
            status_inicial,
        }
    }

    /// Abre a OS no status inicial configurado e grava a primeira linha do histórico,
    /// tudo na mesma transação.
    pub async fn create(&self, payload: CreateServicoPayload) -> Result<Servico, AppError> {
        let dados = payload.into_dados();

        let mut tx = self.pool.begin().await?;

        if self.cliente_repo.find_by_id(&mut *tx, dados.id_cliente).await?.is_none() {
            return Err(AppError::NotFound("Cliente não encontrado.".into()));
        }
        if self.catalogo_repo.find_tipo_by_id(&mut *tx, dados.id_tipo_servico).await?.is_none() {
            return Err(AppError::NotFound("Tipo de serviço não encontrado.".into()));
        }

        let status_inicial = self
            .catalogo_repo
            .find_status_by_name(&mut *tx, &self.status_inicial)
            .await?
            .ok_or_else(|| AppError::InitialStatusMissing(self.status_inicial.clone()))?;

        let servico = self
            .repo
            .create(&mut *tx, &dados, status_inicial.id_status_servico)
            .await?;

        self.repo
            .insert_historico(
                &mut *tx,
                servico.id_servico,
                None,
                status_inicial.id_status_servico,
                OBSERVACAO_CRIACAO,
            )
            .await?;

        tx.commit().await?;

        tracing::info!(
            id_servico = %servico.id_servico,
            id_cliente = %servico.id_cliente,
            "Ordem de serviço aberta"
        );

        Ok(servico)
    }

    pub async fn list(&self, params: &ServicoListParams) -> Result<Paginated<ServicoResumo>, AppError> {
        let page = params.page_request();
        let search = params.search_pattern();

        let (servicos, total) = self
            .repo
            .list(search.as_deref(), params.status_filter, page)
            .await?;

        Ok(Paginated::new(servicos, total, page))
    }

    pub async fn get(&self, id_servico: Uuid) -> Result<ServicoDetalhe, AppError> {
        let servico = self
            .repo
            .find_by_id(id_servico)
            .await?
            .ok_or_else(servico_nao_encontrado)?;

        // As FKs são RESTRICT, então cliente/tipo/status sempre existem
        let cliente = self
            .repo
            .find_cliente_contato(servico.id_cliente)
            .await?
            .ok_or_else(|| anyhow::anyhow!("OS {} sem cliente", id_servico))?;
        let tipo_servico = self
            .catalogo_repo
            .find_tipo_by_id(&self.pool, servico.id_tipo_servico)
            .await?
            .ok_or_else(|| anyhow::anyhow!("OS {} sem tipo de serviço", id_servico))?;
        let status_atual = self
            .catalogo_repo
            .find_status_by_id(&self.pool, servico.id_status_atual)
            .await?
            .ok_or_else(|| anyhow::anyhow!("OS {} sem status", id_servico))?;
        let historico = self.repo.list_historico(id_servico).await?;

        Ok(ServicoDetalhe {
            servico,
            cliente,
            tipo_servico,
            status_atual,
            historico,
        })
    }

    /// Atualização parcial. Quando o status muda, grava exatamente uma linha de
    /// histórico junto com o UPDATE; a linha da OS fica travada durante a transação.
    pub async fn update(&self, id_servico: Uuid, payload: UpdateServicoPayload) -> Result<Servico, AppError> {
        payload.check_valores()?;

        let mut tx = self.pool.begin().await?;

        let atual = self
            .repo
            .find_by_id_for_update(&mut *tx, id_servico)
            .await?
            .ok_or_else(servico_nao_encontrado)?;

        if let Some(id_cliente) = payload.id_cliente.filter(|id| *id != atual.id_cliente) {
            if self.cliente_repo.find_by_id(&mut *tx, id_cliente).await?.is_none() {
                return Err(AppError::NotFound("Cliente não encontrado.".into()));
            }
        }
        if let Some(id_tipo) = payload.id_tipo_servico.filter(|id| *id != atual.id_tipo_servico) {
            if self.catalogo_repo.find_tipo_by_id(&mut *tx, id_tipo).await?.is_none() {
                return Err(AppError::NotFound("Tipo de serviço não encontrado.".into()));
            }
        }

        let transicao = status_transition(atual.id_status_atual, payload.id_status_atual);
        if let Some((_, novo)) = transicao {
            if self.catalogo_repo.find_status_by_id(&mut *tx, novo).await?.is_none() {
                return Err(AppError::NotFound("Status de serviço não encontrado.".into()));
            }
        }

        let id_status_atual = atual.id_status_atual;
        let dados = payload.apply_to(ServicoDados::from(atual));
        let id_status = transicao.map(|(_, novo)| novo).unwrap_or(id_status_atual);

        let servico = self.repo.update(&mut *tx, id_servico, &dados, id_status).await?;

        if let Some((anterior, novo)) = transicao {
            let observacao = payload
                .observacao_mudanca_status
                .as_deref()
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .unwrap_or(OBSERVACAO_MUDANCA_PADRAO);

            self.repo
                .insert_historico(&mut *tx, id_servico, Some(anterior), novo, observacao)
                .await?;

            tracing::info!(%id_servico, %anterior, %novo, "Status da OS alterado");
        }

        tx.commit().await?;

        Ok(servico)
    }

    pub async fn delete(&self, id_servico: Uuid) -> Result<(), AppError> {
        if self.repo.delete(id_servico).await? == 0 {
            return Err(servico_nao_encontrado());
        }
        tracing::info!(%id_servico, "Ordem de serviço excluída");

        Ok(())
    }
}
