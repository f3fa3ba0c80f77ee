// src/models/clientes.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::common::{
    error::AppError,
    serde_helpers::{apply_patch, double_option},
    validation::not_blank,
};

// --- ENUMS ---

// Mapeia o CREATE TYPE tipo_pessoa do banco
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "tipo_pessoa", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum TipoPessoa {
    Fisica,
    Juridica,
}

impl TipoPessoa {
    pub fn as_str(&self) -> &'static str {
        match self {
            TipoPessoa::Fisica => "FISICA",
            TipoPessoa::Juridica => "JURIDICA",
        }
    }
}

/// Nome exibido em listagens e relatórios: nome completo (PF) ou razão social (PJ).
pub fn nome_exibicao<'a>(
    tipo: TipoPessoa,
    nome_completo: Option<&'a str>,
    razao_social: Option<&'a str>,
) -> Option<&'a str> {
    match tipo {
        TipoPessoa::Fisica => nome_completo,
        TipoPessoa::Juridica => razao_social,
    }
}

// --- CLIENTE ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Cliente {
    pub id_cliente: Uuid,
    pub tipo_pessoa: TipoPessoa,

    #[schema(example = "Maria da Silva")]
    pub nome_completo: Option<String>,
    #[schema(example = "123.456.789-00")]
    pub cpf: Option<String>,

    pub razao_social: Option<String>,
    pub nome_fantasia: Option<String>,
    pub cnpj: Option<String>,
    pub inscricao_estadual: Option<String>,
    pub inscricao_municipal: Option<String>,
    pub nome_contato_pj: Option<String>,

    #[schema(example = "(11) 99999-0000")]
    pub telefone_principal: String,
    pub telefone_secundario: Option<String>,
    #[schema(example = "maria@email.com")]
    pub email: String,

    pub cep: Option<String>,
    pub rua: Option<String>,
    pub numero: Option<String>,
    pub complemento: Option<String>,
    pub bairro: Option<String>,
    pub cidade: Option<String>,
    pub estado_uf: Option<String>,
    pub observacoes: Option<String>,

    pub data_cadastro: DateTime<Utc>,
    pub data_atualizacao: DateTime<Utc>,
    pub ativo: bool,
}

/// Campos graváveis de um cliente, já normalizados.
/// É o que o repositório insere/atualiza.
#[derive(Debug, Clone, PartialEq)]
pub struct ClienteDados {
    pub tipo_pessoa: TipoPessoa,
    pub nome_completo: Option<String>,
    pub cpf: Option<String>,
    pub razao_social: Option<String>,
    pub nome_fantasia: Option<String>,
    pub cnpj: Option<String>,
    pub inscricao_estadual: Option<String>,
    pub inscricao_municipal: Option<String>,
    pub nome_contato_pj: Option<String>,
    pub telefone_principal: String,
    pub telefone_secundario: Option<String>,
    pub email: String,
    pub cep: Option<String>,
    pub rua: Option<String>,
    pub numero: Option<String>,
    pub complemento: Option<String>,
    pub bairro: Option<String>,
    pub cidade: Option<String>,
    pub estado_uf: Option<String>,
    pub observacoes: Option<String>,
    pub ativo: bool,
}

fn blank_to_none(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl ClienteDados {
    /// Zera os campos que não pertencem ao tipo de pessoa escolhido
    /// e troca strings vazias por NULL.
    pub fn normalize(mut self) -> Self {
        for field in [
            &mut self.nome_completo,
            &mut self.cpf,
            &mut self.razao_social,
            &mut self.nome_fantasia,
            &mut self.cnpj,
            &mut self.inscricao_estadual,
            &mut self.inscricao_municipal,
            &mut self.nome_contato_pj,
            &mut self.telefone_secundario,
            &mut self.cep,
            &mut self.rua,
            &mut self.numero,
            &mut self.complemento,
            &mut self.bairro,
            &mut self.cidade,
            &mut self.estado_uf,
            &mut self.observacoes,
        ] {
            *field = blank_to_none(field.take());
        }
        self.telefone_principal = self.telefone_principal.trim().to_string();
        self.email = self.email.trim().to_string();

        match self.tipo_pessoa {
            TipoPessoa::Fisica => {
                self.razao_social = None;
                self.nome_fantasia = None;
                self.cnpj = None;
                self.inscricao_estadual = None;
                self.inscricao_municipal = None;
                self.nome_contato_pj = None;
            }
            TipoPessoa::Juridica => {
                self.nome_completo = None;
                self.cpf = None;
            }
        }
        self
    }

    /// Campos obrigatórios de acordo com o tipo de pessoa.
    pub fn check_required(&self) -> Result<(), AppError> {
        match self.tipo_pessoa {
            TipoPessoa::Fisica => {
                if self.nome_completo.is_none() {
                    return Err(AppError::InvalidInput(
                        "Nome completo é obrigatório para pessoa física.".into(),
                    ));
                }
                if self.cpf.is_none() {
                    return Err(AppError::InvalidInput("CPF é obrigatório para pessoa física.".into()));
                }
            }
            TipoPessoa::Juridica => {
                if self.razao_social.is_none() {
                    return Err(AppError::InvalidInput(
                        "Razão Social é obrigatória para pessoa jurídica.".into(),
                    ));
                }
                if self.cnpj.is_none() {
                    return Err(AppError::InvalidInput("CNPJ é obrigatório para pessoa jurídica.".into()));
                }
            }
        }
        if self.telefone_principal.is_empty() {
            return Err(AppError::InvalidInput("Telefone principal é obrigatório".into()));
        }
        Ok(())
    }
}

impl From<Cliente> for ClienteDados {
    fn from(c: Cliente) -> Self {
        Self {
            tipo_pessoa: c.tipo_pessoa,
            nome_completo: c.nome_completo,
            cpf: c.cpf,
            razao_social: c.razao_social,
            nome_fantasia: c.nome_fantasia,
            cnpj: c.cnpj,
            inscricao_estadual: c.inscricao_estadual,
            inscricao_municipal: c.inscricao_municipal,
            nome_contato_pj: c.nome_contato_pj,
            telefone_principal: c.telefone_principal,
            telefone_secundario: c.telefone_secundario,
            email: c.email,
            cep: c.cep,
            rua: c.rua,
            numero: c.numero,
            complemento: c.complemento,
            bairro: c.bairro,
            cidade: c.cidade,
            estado_uf: c.estado_uf,
            observacoes: c.observacoes,
            ativo: c.ativo,
        }
    }
}

// --- PAYLOADS ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateClientePayload {
    #[schema(example = "FISICA")]
    pub tipo_pessoa: TipoPessoa,

    #[schema(example = "Maria da Silva")]
    pub nome_completo: Option<String>,
    #[schema(example = "123.456.789-00")]
    pub cpf: Option<String>,

    pub razao_social: Option<String>,
    pub nome_fantasia: Option<String>,
    pub cnpj: Option<String>,
    pub inscricao_estadual: Option<String>,
    pub inscricao_municipal: Option<String>,
    pub nome_contato_pj: Option<String>,

    #[validate(custom(function = "not_blank", message = "Telefone principal é obrigatório"))]
    #[schema(example = "(11) 99999-0000")]
    pub telefone_principal: String,
    pub telefone_secundario: Option<String>,

    #[validate(email(message = "Email inválido"))]
    #[schema(example = "maria@email.com")]
    pub email: String,

    pub cep: Option<String>,
    pub rua: Option<String>,
    pub numero: Option<String>,
    pub complemento: Option<String>,
    pub bairro: Option<String>,
    pub cidade: Option<String>,
    #[schema(example = "SP")]
    pub estado_uf: Option<String>,
    pub observacoes: Option<String>,
}

impl CreateClientePayload {
    pub fn into_dados(self) -> Result<ClienteDados, AppError> {
        let dados = ClienteDados {
            tipo_pessoa: self.tipo_pessoa,
            nome_completo: self.nome_completo,
            cpf: self.cpf,
            razao_social: self.razao_social,
            nome_fantasia: self.nome_fantasia,
            cnpj: self.cnpj,
            inscricao_estadual: self.inscricao_estadual,
            inscricao_municipal: self.inscricao_municipal,
            nome_contato_pj: self.nome_contato_pj,
            telefone_principal: self.telefone_principal,
            telefone_secundario: self.telefone_secundario,
            email: self.email,
            cep: self.cep,
            rua: self.rua,
            numero: self.numero,
            complemento: self.complemento,
            bairro: self.bairro,
            cidade: self.cidade,
            estado_uf: self.estado_uf,
            observacoes: self.observacoes,
            ativo: true,
        }
        .normalize();

        dados.check_required()?;
        Ok(dados)
    }
}

/// Atualização parcial: campo ausente mantém o valor, `null` limpa.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateClientePayload {
    pub tipo_pessoa: Option<TipoPessoa>,

    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub nome_completo: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub cpf: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub razao_social: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub nome_fantasia: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub cnpj: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub inscricao_estadual: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub inscricao_municipal: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub nome_contato_pj: Option<Option<String>>,

    #[validate(custom(function = "not_blank", message = "Telefone principal é obrigatório"))]
    pub telefone_principal: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub telefone_secundario: Option<Option<String>>,

    #[validate(email(message = "Email inválido"))]
    pub email: Option<String>,

    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub cep: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub rua: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub numero: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub complemento: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub bairro: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub cidade: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub estado_uf: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub observacoes: Option<Option<String>>,

    pub ativo: Option<bool>,
}

impl UpdateClientePayload {
    /// Aplica o patch sobre os dados atuais. Se o tipo de pessoa mudar,
    /// os campos do tipo anterior são descartados pelo `normalize`.
    pub fn apply_to(self, mut dados: ClienteDados) -> Result<ClienteDados, AppError> {
        if let Some(tipo) = self.tipo_pessoa {
            dados.tipo_pessoa = tipo;
        }
        apply_patch(&mut dados.nome_completo, self.nome_completo);
        apply_patch(&mut dados.cpf, self.cpf);
        apply_patch(&mut dados.razao_social, self.razao_social);
        apply_patch(&mut dados.nome_fantasia, self.nome_fantasia);
        apply_patch(&mut dados.cnpj, self.cnpj);
        apply_patch(&mut dados.inscricao_estadual, self.inscricao_estadual);
        apply_patch(&mut dados.inscricao_municipal, self.inscricao_municipal);
        apply_patch(&mut dados.nome_contato_pj, self.nome_contato_pj);
        if let Some(telefone) = self.telefone_principal {
            dados.telefone_principal = telefone;
        }
        apply_patch(&mut dados.telefone_secundario, self.telefone_secundario);
        if let Some(email) = self.email {
            dados.email = email;
        }
        apply_patch(&mut dados.cep, self.cep);
        apply_patch(&mut dados.rua, self.rua);
        apply_patch(&mut dados.numero, self.numero);
        apply_patch(&mut dados.complemento, self.complemento);
        apply_patch(&mut dados.bairro, self.bairro);
        apply_patch(&mut dados.cidade, self.cidade);
        apply_patch(&mut dados.estado_uf, self.estado_uf);
        apply_patch(&mut dados.observacoes, self.observacoes);
        if let Some(ativo) = self.ativo {
            dados.ativo = ativo;
        }

        let dados = dados.normalize();
        dados.check_required()?;
        Ok(dados)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn pessoa_fisica() -> serde_json::Value {
        json!({
            "tipo_pessoa": "FISICA",
            "nome_completo": "Maria da Silva",
            "cpf": "123.456.789-00",
            "razao_social": "Não deveria ficar",
            "telefone_principal": "(11) 99999-0000",
            "email": "maria@email.com",
            "cep": ""
        })
    }

    #[test]
    fn create_payload_validates_email_and_phone() {
        let payload: CreateClientePayload = serde_json::from_value(json!({
            "tipo_pessoa": "FISICA",
            "nome_completo": "Maria",
            "cpf": "1",
            "telefone_principal": "   ",
            "email": "nao-e-email"
        }))
        .unwrap();

        let errors = payload.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("telefone_principal"));
    }

    #[test]
    fn pessoa_fisica_drops_company_fields_and_blanks() {
        let payload: CreateClientePayload = serde_json::from_value(pessoa_fisica()).unwrap();
        let dados = payload.into_dados().unwrap();

        assert_eq!(dados.tipo_pessoa, TipoPessoa::Fisica);
        assert_eq!(dados.razao_social, None);
        assert_eq!(dados.cep, None);
        assert_eq!(dados.cpf.as_deref(), Some("123.456.789-00"));
        assert!(dados.ativo);
    }

    #[test]
    fn pessoa_fisica_requires_cpf() {
        let mut value = pessoa_fisica();
        value["cpf"] = json!("  ");
        let payload: CreateClientePayload = serde_json::from_value(value).unwrap();

        match payload.into_dados() {
            Err(AppError::InvalidInput(msg)) => assert_eq!(msg, "CPF é obrigatório para pessoa física."),
            other => panic!("esperava InvalidInput, veio {:?}", other),
        }
    }

    #[test]
    fn pessoa_juridica_requires_razao_social_and_cnpj() {
        let payload: CreateClientePayload = serde_json::from_value(json!({
            "tipo_pessoa": "JURIDICA",
            "cnpj": "12.345.678/0001-90",
            "telefone_principal": "1133334444",
            "email": "contato@empresa.com"
        }))
        .unwrap();

        match payload.into_dados() {
            Err(AppError::InvalidInput(msg)) => {
                assert_eq!(msg, "Razão Social é obrigatória para pessoa jurídica.")
            }
            other => panic!("esperava InvalidInput, veio {:?}", other),
        }
    }

    #[test]
    fn update_switching_to_juridica_clears_cpf() {
        let atual = CreateClientePayload::deserialize(pessoa_fisica())
            .unwrap()
            .into_dados()
            .unwrap();

        let patch: UpdateClientePayload = serde_json::from_value(json!({
            "tipo_pessoa": "JURIDICA",
            "razao_social": "Silva Informática LTDA",
            "cnpj": "12.345.678/0001-90"
        }))
        .unwrap();

        let novo = patch.apply_to(atual).unwrap();
        assert_eq!(novo.tipo_pessoa, TipoPessoa::Juridica);
        assert_eq!(novo.nome_completo, None);
        assert_eq!(novo.cpf, None);
        assert_eq!(novo.cnpj.as_deref(), Some("12.345.678/0001-90"));
        assert_eq!(novo.email, "maria@email.com");
    }

    #[test]
    fn update_with_null_clears_optional_field() {
        let mut atual = CreateClientePayload::deserialize(pessoa_fisica())
            .unwrap()
            .into_dados()
            .unwrap();
        atual.observacoes = Some("cliente antigo".into());

        let patch: UpdateClientePayload =
            serde_json::from_value(json!({ "observacoes": null, "ativo": false })).unwrap();
        let novo = patch.apply_to(atual).unwrap();

        assert_eq!(novo.observacoes, None);
        assert!(!novo.ativo);
    }

    #[test]
    fn update_cannot_remove_required_field() {
        let atual = CreateClientePayload::deserialize(pessoa_fisica())
            .unwrap()
            .into_dados()
            .unwrap();

        let patch: UpdateClientePayload = serde_json::from_value(json!({ "cpf": null })).unwrap();
        assert!(matches!(patch.apply_to(atual), Err(AppError::InvalidInput(_))));
    }

    #[test]
    fn display_name_depends_on_person_type() {
        assert_eq!(nome_exibicao(TipoPessoa::Fisica, Some("Ana"), Some("ACME")), Some("Ana"));
        assert_eq!(nome_exibicao(TipoPessoa::Juridica, Some("Ana"), Some("ACME")), Some("ACME"));
        assert_eq!(nome_exibicao(TipoPessoa::Juridica, Some("Ana"), None), None);
    }
}
