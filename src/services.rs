pub mod catalogo_service;
pub use catalogo_service::CatalogoService;
pub mod cliente_service;
pub use cliente_service::ClienteService;
pub mod document_service;
pub use document_service::DocumentService;
pub mod relatorio_service;
pub use relatorio_service::RelatorioService;
pub mod servico_service;
pub use servico_service::ServicoService;
