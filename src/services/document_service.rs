// src/services/document_service.rs

use std::path::PathBuf;

use chrono::{DateTime, FixedOffset, Utc};
use genpdf::{elements, fonts, style, Element};

use crate::{
    common::error::AppError,
    models::relatorios::{FiltroServicosStatus, RelatorioFaturamento, ServicoStatusLinha},
};

fn pdf_error(e: genpdf::error::Error) -> AppError {
    AppError::InternalServerError(anyhow::Error::msg(e.to_string()))
}

fn data_local(data: &DateTime<Utc>, fuso: FixedOffset) -> String {
    data.with_timezone(&fuso).format("%d/%m/%Y").to_string()
}

// A coluna OS mostra só o começo do UUID para caber na tabela
fn os_curta(id: &uuid::Uuid) -> String {
    id.simple().to_string()[..8].to_uppercase()
}

/// Gera os relatórios em PDF com genpdf.
/// A fonte é carregada de `fonts_dir` a cada documento (arquivos `<nome>-Regular.ttf` etc).
#[derive(Clone)]
pub struct DocumentService {
    fonts_dir: PathBuf,
    font_name: String,
}

impl DocumentService {
    pub fn new(fonts_dir: impl Into<PathBuf>, font_name: impl Into<String>) -> Self {
        Self {
            fonts_dir: fonts_dir.into(),
            font_name: font_name.into(),
        }
    }

    fn new_document(&self, titulo: &str) -> Result<genpdf::Document, AppError> {
        let font_family = fonts::from_files(&self.fonts_dir, &self.font_name, None).map_err(|_| {
            AppError::FontNotFound(format!(
                "'{}' na pasta {}",
                self.font_name,
                self.fonts_dir.display()
            ))
        })?;

        let mut doc = genpdf::Document::new(font_family);
        doc.set_title(titulo);
        let mut decorator = genpdf::SimplePageDecorator::new();
        decorator.set_margins(10);
        doc.set_page_decorator(decorator);

        let mut title = elements::Paragraph::new(titulo);
        title.set_alignment(genpdf::Alignment::Center);
        doc.push(title.styled(style::Style::new().bold().with_font_size(18)));
        doc.push(elements::Break::new(1));

        Ok(doc)
    }

    fn render(doc: genpdf::Document) -> Result<Vec<u8>, AppError> {
        let mut buffer = Vec::new();
        doc.render(&mut buffer).map_err(pdf_error)?;
        Ok(buffer)
    }

    pub fn render_faturamento(
        &self,
        relatorio: &RelatorioFaturamento,
        fuso: FixedOffset,
    ) -> Result<Vec<u8>, AppError> {
        let mut doc = self.new_document("Relatório de Faturamento")?;

        doc.push(elements::Paragraph::new(format!(
            "Período: {} a {}",
            relatorio.periodo.inicio.format("%d/%m/%Y"),
            relatorio.periodo.fim.format("%d/%m/%Y")
        )));
        doc.push(elements::Paragraph::new(format!(
            "Tipo de Cliente: {}",
            relatorio.filtro_tipo_cliente.as_str()
        )));
        doc.push(elements::Break::new(1.5));

        // Pesos: OS, Data Saída, Cliente, Tipo, Tipo Serviço, Valor
        let mut table = elements::TableLayout::new(vec![2, 2, 4, 2, 3, 2]);
        table.set_cell_decorator(elements::FrameCellDecorator::new(true, true, false));

        let style_bold = style::Style::new().bold();
        table
            .row()
            .element(elements::Paragraph::new("OS").styled(style_bold))
            .element(elements::Paragraph::new("Data Saída").styled(style_bold))
            .element(elements::Paragraph::new("Cliente").styled(style_bold))
            .element(elements::Paragraph::new("Tipo").styled(style_bold))
            .element(elements::Paragraph::new("Tipo Serviço").styled(style_bold))
            .element(elements::Paragraph::new("Valor").styled(style_bold))
            .push()
            .map_err(pdf_error)?;

        for linha in &relatorio.data {
            table
                .row()
                .element(elements::Paragraph::new(os_curta(&linha.id_servico)))
                .element(elements::Paragraph::new(data_local(&linha.data_efetiva_saida, fuso)))
                .element(elements::Paragraph::new(linha.nome_cliente()))
                .element(elements::Paragraph::new(linha.tipo_pessoa.as_str()))
                .element(elements::Paragraph::new(linha.nome_tipo_servico.as_str()))
                .element(elements::Paragraph::new(format!("R$ {:.2}", linha.valor_servico)))
                .push()
                .map_err(pdf_error)?;
        }

        doc.push(table);
        doc.push(elements::Break::new(1.5));

        let mut total = elements::Paragraph::new(format!(
            "Total Faturado: R$ {:.2}",
            relatorio.total_faturado
        ));
        total.set_alignment(genpdf::Alignment::Right);
        doc.push(total.styled(style::Style::new().bold().with_font_size(14)));

        Self::render(doc)
    }

    pub fn render_servicos_status(
        &self,
        linhas: &[ServicoStatusLinha],
        filtro: &FiltroServicosStatus,
        fuso: FixedOffset,
    ) -> Result<Vec<u8>, AppError> {
        let mut doc = self.new_document("Relatório de Serviços por Status")?;

        if let Some(periodo) = filtro.descricao_periodo() {
            doc.push(elements::Paragraph::new(periodo));
        }
        if let Some(status_id) = filtro.status_id {
            doc.push(elements::Paragraph::new(format!("Status filtrado: {}", status_id)));
        }
        doc.push(elements::Break::new(1.5));

        let mut table = elements::TableLayout::new(vec![2, 4, 2, 3, 2, 3, 2]);
        table.set_cell_decorator(elements::FrameCellDecorator::new(true, true, false));

        let style_bold = style::Style::new().bold();
        table
            .row()
            .element(elements::Paragraph::new("OS").styled(style_bold))
            .element(elements::Paragraph::new("Cliente").styled(style_bold))
            .element(elements::Paragraph::new("Tipo Pessoa").styled(style_bold))
            .element(elements::Paragraph::new("Tipo Serviço").styled(style_bold))
            .element(elements::Paragraph::new("Data Entrada").styled(style_bold))
            .element(elements::Paragraph::new("Status").styled(style_bold))
            .element(elements::Paragraph::new("Valor").styled(style_bold))
            .push()
            .map_err(pdf_error)?;

        for linha in linhas {
            table
                .row()
                .element(elements::Paragraph::new(os_curta(&linha.id_servico)))
                .element(elements::Paragraph::new(linha.nome_cliente()))
                .element(elements::Paragraph::new(linha.tipo_pessoa.as_str()))
                .element(elements::Paragraph::new(linha.nome_tipo_servico.as_str()))
                .element(elements::Paragraph::new(data_local(&linha.data_entrada, fuso)))
                .element(elements::Paragraph::new(linha.nome_status.as_str()))
                .element(elements::Paragraph::new(format!(
                    "{:.2}",
                    linha.valor_servico.unwrap_or_default()
                )))
                .push()
                .map_err(pdf_error)?;
        }

        doc.push(table);
        doc.push(elements::Break::new(1.5));

        let mut total = elements::Paragraph::new(format!("Total de Serviços: {}", linhas.len()));
        total.set_alignment(genpdf::Alignment::Right);
        doc.push(total.styled(style::Style::new().with_font_size(12)));

        Self::render(doc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn os_curta_uses_first_eight_hex_digits() {
        let id = uuid::Uuid::parse_str("a1b2c3d4-0000-4000-8000-000000000000").unwrap();
        assert_eq!(os_curta(&id), "A1B2C3D4");
    }

    #[test]
    fn missing_font_is_reported() {
        let service = DocumentService::new("/caminho/inexistente", "Roboto");
        let err = service.new_document("Teste").err().unwrap();
        assert!(matches!(err, AppError::FontNotFound(_)));
    }
}
