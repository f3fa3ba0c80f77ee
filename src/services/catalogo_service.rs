// src/services/catalogo_service.rs

use uuid::Uuid;

use crate::{
    common::{
        error::AppError,
        pagination::{ListParams, Paginated},
    },
    db::CatalogoRepository,
    models::catalogo::{
        CreateStatusServicoPayload, StatusServico, TipoServico, TipoServicoPayload,
        UpdateStatusServicoPayload,
    },
};

fn trimmed(value: &str) -> &str {
    value.trim()
}

fn status_nao_encontrado() -> AppError {
    AppError::NotFound("Status de serviço não encontrado.".into())
}

fn tipo_nao_encontrado() -> AppError {
    AppError::NotFound("Tipo de serviço não encontrado.".into())
}

#[derive(Clone)]
pub struct CatalogoService {
    repo: CatalogoRepository,
    pool: sqlx::PgPool,
}

impl CatalogoService {
    pub fn new(repo: CatalogoRepository, pool: sqlx::PgPool) -> Self {
        Self { repo, pool }
    }

    // =========================================================================
    //  STATUS DE SERVIÇO
    // =========================================================================

    pub async fn create_status(&self, payload: CreateStatusServicoPayload) -> Result<StatusServico, AppError> {
        let descricao = payload
            .descricao
            .as_deref()
            .map(trimmed)
            .filter(|d| !d.is_empty());

        let status = self
            .repo
            .create_status(trimmed(&payload.nome_status), descricao, payload.ordem)
            .await?;
        tracing::info!(id_status_servico = %status.id_status_servico, nome = %status.nome_status, "Status criado");

        Ok(status)
    }

    pub async fn list_status(&self, params: &ListParams) -> Result<Paginated<StatusServico>, AppError> {
        let page = params.page_request();
        let search = params.search_pattern();

        let (status, total) = self.repo.list_status(search.as_deref(), page).await?;

        Ok(Paginated::new(status, total, page))
    }

    pub async fn get_status(&self, id_status_servico: Uuid) -> Result<StatusServico, AppError> {
        self.repo
            .find_status_by_id(&self.pool, id_status_servico)
            .await?
            .ok_or_else(status_nao_encontrado)
    }

    pub async fn update_status(
        &self,
        id_status_servico: Uuid,
        payload: UpdateStatusServicoPayload,
    ) -> Result<StatusServico, AppError> {
        self.repo
            .update_status(
                id_status_servico,
                trimmed(&payload.nome_status),
                trimmed(&payload.descricao),
                payload.ordem,
            )
            .await?
            .ok_or_else(status_nao_encontrado)
    }

    /// Só exclui status que nenhuma OS (nem o histórico) referencia.
    pub async fn delete_status(&self, id_status_servico: Uuid) -> Result<(), AppError> {
        self.get_status(id_status_servico).await?;

        if self.repo.count_status_usage(id_status_servico).await? > 0 {
            return Err(AppError::ResourceInUse(
                "Status em uso por serviços e não pode ser excluído.".into(),
            ));
        }

        if self.repo.delete_status(id_status_servico).await? == 0 {
            return Err(status_nao_encontrado());
        }
        tracing::info!(%id_status_servico, "Status excluído");

        Ok(())
    }

    // =========================================================================
    //  TIPOS DE SERVIÇO
    // =========================================================================

    pub async fn create_tipo(&self, payload: TipoServicoPayload) -> Result<TipoServico, AppError> {
        let tipo = self
            .repo
            .create_tipo(trimmed(&payload.nome_tipo_servico), trimmed(&payload.descricao))
            .await?;
        tracing::info!(id_tipo_servico = %tipo.id_tipo_servico, nome = %tipo.nome_tipo_servico, "Tipo de serviço criado");

        Ok(tipo)
    }

    pub async fn list_tipos(&self, params: &ListParams) -> Result<Paginated<TipoServico>, AppError> {
        let page = params.page_request();
        let search = params.search_pattern();

        let (tipos, total) = self.repo.list_tipos(search.as_deref(), page).await?;

        Ok(Paginated::new(tipos, total, page))
    }

    pub async fn get_tipo(&self, id_tipo_servico: Uuid) -> Result<TipoServico, AppError> {
        self.repo
            .find_tipo_by_id(&self.pool, id_tipo_servico)
            .await?
            .ok_or_else(tipo_nao_encontrado)
    }

    pub async fn update_tipo(
        &self,
        id_tipo_servico: Uuid,
        payload: TipoServicoPayload,
    ) -> Result<TipoServico, AppError> {
        self.repo
            .update_tipo(
                id_tipo_servico,
                trimmed(&payload.nome_tipo_servico),
                trimmed(&payload.descricao),
            )
            .await?
            .ok_or_else(tipo_nao_encontrado)
    }

    pub async fn delete_tipo(&self, id_tipo_servico: Uuid) -> Result<(), AppError> {
        self.get_tipo(id_tipo_servico).await?;

        if self.repo.count_tipo_usage(id_tipo_servico).await? > 0 {
            return Err(AppError::ResourceInUse(
                "Tipo de serviço em uso por serviços e não pode ser excluído.".into(),
            ));
        }

        if self.repo.delete_tipo(id_tipo_servico).await? == 0 {
            return Err(tipo_nao_encontrado());
        }
        tracing::info!(%id_tipo_servico, "Tipo de serviço excluído");

        Ok(())
    }
}
