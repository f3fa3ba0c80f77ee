// src/docs.rs

use utoipa::OpenApi;

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Assistência Técnica API",
        description = "Clientes, ordens de serviço, status, tipos de serviço e relatórios"
    ),
    paths(
        // --- Clientes ---
        handlers::clientes::create_cliente,
        handlers::clientes::list_clientes,
        handlers::clientes::get_cliente,
        handlers::clientes::update_cliente,
        handlers::clientes::delete_cliente,

        // --- Serviços ---
        handlers::servicos::create_servico,
        handlers::servicos::list_servicos,
        handlers::servicos::get_servico,
        handlers::servicos::update_servico,
        handlers::servicos::delete_servico,

        // --- Status ---
        handlers::status_servico::create_status,
        handlers::status_servico::list_status,
        handlers::status_servico::get_status,
        handlers::status_servico::update_status,
        handlers::status_servico::delete_status,

        // --- Tipos ---
        handlers::tipos_servico::create_tipo,
        handlers::tipos_servico::list_tipos,
        handlers::tipos_servico::get_tipo,
        handlers::tipos_servico::update_tipo,
        handlers::tipos_servico::delete_tipo,

        // --- Relatórios ---
        handlers::relatorios::relatorio_faturamento,
        handlers::relatorios::relatorio_servicos_status,
    ),
    components(
        schemas(
            // --- Clientes ---
            models::clientes::TipoPessoa,
            models::clientes::Cliente,
            models::clientes::CreateClientePayload,
            models::clientes::UpdateClientePayload,

            // --- Serviços ---
            models::servicos::Servico,
            models::servicos::HistoricoServico,
            models::servicos::HistoricoServicoDetalhe,
            models::servicos::ClienteResumo,
            models::servicos::TipoServicoResumo,
            models::servicos::StatusResumo,
            models::servicos::ServicoResumo,
            models::servicos::ClienteContato,
            models::servicos::ServicoDetalhe,
            models::servicos::CreateServicoPayload,
            models::servicos::UpdateServicoPayload,

            // --- Catálogo ---
            models::catalogo::StatusServico,
            models::catalogo::CreateStatusServicoPayload,
            models::catalogo::UpdateStatusServicoPayload,
            models::catalogo::TipoServico,
            models::catalogo::TipoServicoPayload,

            // --- Relatórios ---
            models::relatorios::Formato,
            models::relatorios::FiltroTipoPessoa,
            models::relatorios::FaturamentoLinha,
            models::relatorios::Periodo,
            models::relatorios::RelatorioFaturamento,
            models::relatorios::ServicoStatusLinha,
        )
    ),
    tags(
        (name = "Clientes", description = "Cadastro de clientes (pessoa física e jurídica)"),
        (name = "Serviços", description = "Ordens de serviço e histórico de status"),
        (name = "Status de Serviço", description = "Status possíveis de uma OS"),
        (name = "Tipos de Serviço", description = "Catálogo de tipos de serviço"),
        (name = "Relatórios", description = "Faturamento e serviços por status em JSON, CSV ou PDF")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_lists_every_resource() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/clientes",
            "/api/clientes/{id}",
            "/api/servicos",
            "/api/servicos/{id}",
            "/api/status-servico",
            "/api/status-servico/{id}",
            "/api/tipos-servico",
            "/api/tipos-servico/{id}",
            "/api/relatorios/faturamento",
            "/api/relatorios/servicos-status",
        ] {
            assert!(doc.paths.paths.contains_key(path), "faltando {}", path);
        }
    }
}
