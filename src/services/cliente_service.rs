// src/services/cliente_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{
        error::AppError,
        pagination::{ListParams, Paginated},
    },
    db::ClienteRepository,
    models::clientes::{Cliente, ClienteDados, CreateClientePayload, UpdateClientePayload},
};

#[derive(Clone)]
pub struct ClienteService {
    repo: ClienteRepository,
    pool: PgPool,
}

impl ClienteService {
    pub fn new(repo: ClienteRepository, pool: PgPool) -> Self {
        Self { repo, pool }
    }

    /// Verifica email/CPF/CNPJ antes de gravar, para devolver uma mensagem específica.
    /// A constraint UNIQUE do banco continua cobrindo a corrida entre duas requisições.
    async fn check_unique(&self, dados: &ClienteDados, except: Option<Uuid>) -> Result<(), AppError> {
        let conflito = |campo: &str| {
            let msg = match except {
                Some(_) => format!("{} já cadastrado para outro cliente.", campo),
                None => format!("{} já cadastrado.", campo),
            };
            Err(AppError::UniqueConstraintViolation(msg))
        };

        if self.repo.email_in_use(&dados.email, except).await? {
            return conflito("Email");
        }
        if let Some(cpf) = &dados.cpf {
            if self.repo.cpf_in_use(cpf, except).await? {
                return conflito("CPF");
            }
        }
        if let Some(cnpj) = &dados.cnpj {
            if self.repo.cnpj_in_use(cnpj, except).await? {
                return conflito("CNPJ");
            }
        }
        Ok(())
    }

    pub async fn create(&self, payload: CreateClientePayload) -> Result<Cliente, AppError> {
        let dados = payload.into_dados()?;
        self.check_unique(&dados, None).await?;

        let cliente = self.repo.create(&self.pool, &dados).await?;
        tracing::info!(id_cliente = %cliente.id_cliente, "Cliente cadastrado");

        Ok(cliente)
    }

    pub async fn list(&self, params: &ListParams) -> Result<Paginated<Cliente>, AppError> {
        let page = params.page_request();
        let search = params.search_pattern();

        let (clientes, total) = self.repo.list_active(search.as_deref(), page).await?;

        Ok(Paginated::new(clientes, total, page))
    }

    pub async fn get(&self, id_cliente: Uuid) -> Result<Cliente, AppError> {
        self.repo
            .find_by_id(&self.pool, id_cliente)
            .await?
            .ok_or_else(|| AppError::NotFound("Cliente não encontrado.".into()))
    }

    pub async fn update(&self, id_cliente: Uuid, payload: UpdateClientePayload) -> Result<Cliente, AppError> {
        let atual = self.get(id_cliente).await?;
        let dados_atuais = ClienteDados::from(atual);

        let novos = payload.apply_to(dados_atuais)?;
        self.check_unique(&novos, Some(id_cliente)).await?;

        let cliente = self.repo.update(&self.pool, id_cliente, &novos).await?;
        tracing::info!(%id_cliente, "Cliente atualizado");

        Ok(cliente)
    }

    /// Exclusão lógica; bloqueada se o cliente tiver ordens de serviço.
    pub async fn delete(&self, id_cliente: Uuid) -> Result<(), AppError> {
        self.get(id_cliente).await?;

        let servicos = self.repo.count_servicos(&self.pool, id_cliente).await?;
        if servicos > 0 {
            return Err(AppError::ResourceInUse(
                "Cliente possui serviços associados e não pode ser excluído. Considere inativá-lo.".into(),
            ));
        }

        self.repo.deactivate(&self.pool, id_cliente).await?;
        tracing::info!(%id_cliente, "Cliente inativado");

        Ok(())
    }
}
