// src/db/cliente_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::{
        error::{map_unique_violation, AppError},
        pagination::PageRequest,
    },
    models::clientes::{Cliente, ClienteDados},
};

#[derive(Clone)]
pub struct ClienteRepository {
    pool: PgPool,
}

// A constraint violada diz qual campo duplicou
fn map_cliente_error(e: sqlx::Error) -> AppError {
    let constraint = e
        .as_database_error()
        .and_then(|db_err| db_err.constraint())
        .map(str::to_owned);

    map_unique_violation(e, || match constraint.as_deref() {
        Some("clientes_cpf_key") => "CPF já cadastrado.".to_string(),
        Some("clientes_cnpj_key") => "CNPJ já cadastrado.".to_string(),
        _ => "Email já cadastrado.".to_string(),
    })
}

impl ClienteRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create<'e, E>(&self, executor: E, dados: &ClienteDados) -> Result<Cliente, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Cliente>(
            r#"
            INSERT INTO clientes (
                tipo_pessoa, nome_completo, cpf,
                razao_social, nome_fantasia, cnpj,
                inscricao_estadual, inscricao_municipal, nome_contato_pj,
                telefone_principal, telefone_secundario, email,
                cep, rua, numero, complemento, bairro, cidade, estado_uf,
                observacoes, ativo
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19, $20, $21)
            RETURNING *
            "#,
        )
        .bind(dados.tipo_pessoa)
        .bind(&dados.nome_completo)
        .bind(&dados.cpf)
        .bind(&dados.razao_social)
        .bind(&dados.nome_fantasia)
        .bind(&dados.cnpj)
        .bind(&dados.inscricao_estadual)
        .bind(&dados.inscricao_municipal)
        .bind(&dados.nome_contato_pj)
        .bind(&dados.telefone_principal)
        .bind(&dados.telefone_secundario)
        .bind(&dados.email)
        .bind(&dados.cep)
        .bind(&dados.rua)
        .bind(&dados.numero)
        .bind(&dados.complemento)
        .bind(&dados.bairro)
        .bind(&dados.cidade)
        .bind(&dados.estado_uf)
        .bind(&dados.observacoes)
        .bind(dados.ativo)
        .fetch_one(executor)
        .await
        .map_err(map_cliente_error)
    }

    pub async fn update<'e, E>(
        &self,
        executor: E,
        id_cliente: Uuid,
        dados: &ClienteDados,
    ) -> Result<Cliente, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Cliente>(
            r#"
            UPDATE clientes SET
                tipo_pessoa = $2, nome_completo = $3, cpf = $4,
                razao_social = $5, nome_fantasia = $6, cnpj = $7,
                inscricao_estadual = $8, inscricao_municipal = $9, nome_contato_pj = $10,
                telefone_principal = $11, telefone_secundario = $12, email = $13,
                cep = $14, rua = $15, numero = $16, complemento = $17,
                bairro = $18, cidade = $19, estado_uf = $20,
                observacoes = $21, ativo = $22,
                data_atualizacao = NOW()
            WHERE id_cliente = $1
            RETURNING *
            "#,
        )
        .bind(id_cliente)
        .bind(dados.tipo_pessoa)
        .bind(&dados.nome_completo)
        .bind(&dados.cpf)
        .bind(&dados.razao_social)
        .bind(&dados.nome_fantasia)
        .bind(&dados.cnpj)
        .bind(&dados.inscricao_estadual)
        .bind(&dados.inscricao_municipal)
        .bind(&dados.nome_contato_pj)
        .bind(&dados.telefone_principal)
        .bind(&dados.telefone_secundario)
        .bind(&dados.email)
        .bind(&dados.cep)
        .bind(&dados.rua)
        .bind(&dados.numero)
        .bind(&dados.complemento)
        .bind(&dados.bairro)
        .bind(&dados.cidade)
        .bind(&dados.estado_uf)
        .bind(&dados.observacoes)
        .bind(dados.ativo)
        .fetch_optional(executor)
        .await
        .map_err(map_cliente_error)?
        .ok_or_else(|| AppError::NotFound("Cliente não encontrado.".into()))
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, id_cliente: Uuid) -> Result<Option<Cliente>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let cliente = sqlx::query_as::<_, Cliente>("SELECT * FROM clientes WHERE id_cliente = $1")
            .bind(id_cliente)
            .fetch_optional(executor)
            .await?;

        Ok(cliente)
    }

    /// Procura outro cliente (diferente de `except`) com o mesmo valor na coluna.
    /// `column` vem sempre de uma constante interna, nunca do usuário.
    async fn exists_with(
        &self,
        column: &'static str,
        value: &str,
        except: Option<Uuid>,
    ) -> Result<bool, AppError> {
        let sql = format!(
            "SELECT EXISTS (SELECT 1 FROM clientes WHERE {} = $1 AND ($2::uuid IS NULL OR id_cliente <> $2))",
            column
        );
        let exists: bool = sqlx::query_scalar(&sql)
            .bind(value)
            .bind(except)
            .fetch_one(&self.pool)
            .await?;

        Ok(exists)
    }

    pub async fn email_in_use(&self, email: &str, except: Option<Uuid>) -> Result<bool, AppError> {
        self.exists_with("email", email, except).await
    }

    pub async fn cpf_in_use(&self, cpf: &str, except: Option<Uuid>) -> Result<bool, AppError> {
        self.exists_with("cpf", cpf, except).await
    }

    pub async fn cnpj_in_use(&self, cnpj: &str, except: Option<Uuid>) -> Result<bool, AppError> {
        self.exists_with("cnpj", cnpj, except).await
    }

    /// Lista paginada de clientes ativos, com o total para a paginação.
    pub async fn list_active(
        &self,
        search: Option<&str>,
        page: PageRequest,
    ) -> Result<(Vec<Cliente>, i64), AppError> {
        let clientes = sqlx::query_as::<_, Cliente>(
            r#"
            SELECT * FROM clientes
            WHERE ativo = TRUE
            AND (
                $1::text IS NULL
                OR nome_completo ILIKE $1
                OR razao_social ILIKE $1
                OR cpf ILIKE $1
                OR cnpj ILIKE $1
                OR email ILIKE $1
            )
            ORDER BY COALESCE(nome_completo, razao_social) ASC, data_cadastro ASC
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
            SELECT COUNT(*) FROM clientes
            WHERE ativo = TRUE
            AND (
                $1::text IS NULL
                OR nome_completo ILIKE $1
                OR razao_social ILIKE $1
                OR cpf ILIKE $1
                OR cnpj ILIKE $1
                OR email ILIKE $1
            )
            "#,
        )
        .bind(search)
        .fetch_one(&self.pool)
        .await?;

        Ok((clientes, total))
    }

    pub async fn count_servicos<'e, E>(&self, executor: E, id_cliente: Uuid) -> Result<i64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM servicos WHERE id_cliente = $1")
            .bind(id_cliente)
            .fetch_one(executor)
            .await?;

        Ok(count)
    }

    /// Exclusão lógica. Retorna quantas linhas foram afetadas.
    pub async fn deactivate<'e, E>(&self, executor: E, id_cliente: Uuid) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            "UPDATE clientes SET ativo = FALSE, data_atualizacao = NOW() WHERE id_cliente = $1",
        )
        .bind(id_cliente)
        .execute(executor)
        .await?;

        Ok(result.rows_affected())
    }
}
