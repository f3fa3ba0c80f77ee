// src/services/relatorio_service.rs

use chrono::{DateTime, FixedOffset, Offset, Utc};

use crate::{
    common::error::AppError,
    db::RelatorioRepository,
    models::relatorios::{
        FiltroFaturamento, FiltroServicosStatus, Formato, RelatorioFaturamento, ServicoStatusLinha,
    },
    services::document_service::DocumentService,
};

pub const CSV_CONTENT_TYPE: &str = "text/csv; charset=utf-8";
pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// Relatório já renderizado para download.
#[derive(Debug)]
pub struct Arquivo {
    pub content_type: &'static str,
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Saída de um relatório: o próprio dado (JSON) ou um arquivo.
#[derive(Debug)]
pub enum Relatorio<T> {
    Json(T),
    Arquivo(Arquivo),
}

// Campo com `;`, aspas ou quebra de linha vai entre aspas, com aspas dobradas
fn csv_campo(valor: &str) -> String {
    if valor.contains([';', '"', '\n', '\r']) {
        format!("\"{}\"", valor.replace('"', "\"\""))
    } else {
        valor.to_string()
    }
}

fn data_br(data: &DateTime<Utc>, fuso: FixedOffset) -> String {
    data.with_timezone(&fuso).format("%d/%m/%Y").to_string()
}

fn data_arquivo(data: &DateTime<FixedOffset>) -> String {
    data.with_timezone(&Utc).format("%Y-%m-%d").to_string()
}

pub fn faturamento_csv(relatorio: &RelatorioFaturamento, fuso: FixedOffset) -> String {
    let mut csv = String::from("OS;Data Saida;Cliente;Tipo Pessoa;Email Cliente;Tipo Servico;Valor Servico\n");

    for linha in &relatorio.data {
        let campos = [
            linha.id_servico.to_string(),
            data_br(&linha.data_efetiva_saida, fuso),
            csv_campo(linha.nome_cliente()),
            linha.tipo_pessoa.as_str().to_string(),
            csv_campo(&linha.email),
            csv_campo(&linha.nome_tipo_servico),
            format!("{:.2}", linha.valor_servico),
        ];
        csv.push_str(&campos.join(";"));
        csv.push('\n');
    }

    csv.push_str(&format!("\nTotal Faturado;;;;;;R$ {:.2}\n", relatorio.total_faturado));
    csv
}

pub fn servicos_status_csv(linhas: &[ServicoStatusLinha], fuso: FixedOffset) -> String {
    let mut csv = String::from("OS;Cliente;Tipo Pessoa;Tipo Servico;Data Entrada;Status Atual;Valor Servico\n");

    for linha in linhas {
        let campos = [
            linha.id_servico.to_string(),
            csv_campo(linha.nome_cliente()),
            linha.tipo_pessoa.as_str().to_string(),
            csv_campo(&linha.nome_tipo_servico),
            data_br(&linha.data_entrada, fuso),
            csv_campo(&linha.nome_status),
            format!("{:.2}", linha.valor_servico.unwrap_or_default()),
        ];
        csv.push_str(&campos.join(";"));
        csv.push('\n');
    }

    csv
}

#[derive(Clone)]
pub struct RelatorioService {
    repo: RelatorioRepository,
    documents: DocumentService,
}

impl RelatorioService {
    pub fn new(repo: RelatorioRepository, documents: DocumentService) -> Self {
        Self { repo, documents }
    }

    pub async fn faturamento(
        &self,
        filtro: FiltroFaturamento,
    ) -> Result<Relatorio<RelatorioFaturamento>, AppError> {
        let linhas = self
            .repo
            .faturamento(
                filtro.inicio.with_timezone(&Utc),
                filtro.fim.with_timezone(&Utc),
                filtro.tipo_cliente.tipo_pessoa(),
            )
            .await?;

        let relatorio = RelatorioFaturamento::new(linhas, &filtro);
        // Datas das linhas saem no fuso em que o período foi pedido
        let fuso = *filtro.inicio.offset();
        let base = format!(
            "relatorio_faturamento_{}_a_{}",
            data_arquivo(&filtro.inicio),
            data_arquivo(&filtro.fim)
        );

        tracing::debug!(
            linhas = relatorio.data.len(),
            formato = ?filtro.formato,
            "Relatório de faturamento gerado"
        );

        let formato = filtro.formato;
        match formato {
            Formato::Json => Ok(Relatorio::Json(relatorio)),
            Formato::Csv => Ok(Relatorio::Arquivo(Arquivo {
                content_type: CSV_CONTENT_TYPE,
                filename: format!("{}.csv", base),
                bytes: faturamento_csv(&relatorio, fuso).into_bytes(),
            })),
            Formato::Pdf => {
                let documents = self.documents.clone();
                let bytes = tokio::task::spawn_blocking(move || {
                    documents.render_faturamento(&relatorio, fuso)
                })
                .await
                .map_err(|e| anyhow::anyhow!("Falha na task de geração do PDF: {}", e))??;

                Ok(Relatorio::Arquivo(Arquivo {
                    content_type: PDF_CONTENT_TYPE,
                    filename: format!("{}.pdf", base),
                    bytes,
                }))
            }
        }
    }

    pub async fn servicos_status(
        &self,
        filtro: FiltroServicosStatus,
    ) -> Result<Relatorio<Vec<ServicoStatusLinha>>, AppError> {
        let linhas = self
            .repo
            .servicos_por_status(
                filtro.status_id,
                filtro.inicio.map(|d| d.with_timezone(&Utc)),
                filtro.fim.map(|d| d.with_timezone(&Utc)),
            )
            .await?;

        let fuso = filtro
            .inicio
            .or(filtro.fim)
            .map(|d| *d.offset())
            .unwrap_or_else(|| Utc.fix());
        let base = format!("relatorio_servicos_status_{}", Utc::now().format("%Y-%m-%d"));

        tracing::debug!(
            linhas = linhas.len(),
            formato = ?filtro.formato,
            "Relatório de serviços por status gerado"
        );

        let formato = filtro.formato;
        match formato {
            Formato::Json => Ok(Relatorio::Json(linhas)),
            Formato::Csv => Ok(Relatorio::Arquivo(Arquivo {
                content_type: CSV_CONTENT_TYPE,
                filename: format!("{}.csv", base),
                bytes: servicos_status_csv(&linhas, fuso).into_bytes(),
            })),
            Formato::Pdf => {
                let documents = self.documents.clone();
                let bytes = tokio::task::spawn_blocking(move || {
                    documents.render_servicos_status(&linhas, &filtro, fuso)
                })
                .await
                .map_err(|e| anyhow::anyhow!("Falha na task de geração do PDF: {}", e))??;

                Ok(Relatorio::Arquivo(Arquivo {
                    content_type: PDF_CONTENT_TYPE,
                    filename: format!("{}.pdf", base),
                    bytes,
                }))
            }
        }
    }
}
