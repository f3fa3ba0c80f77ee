pub mod catalogo_repo;
pub use catalogo_repo::CatalogoRepository;
pub mod cliente_repo;
pub use cliente_repo::ClienteRepository;
pub mod relatorio_repo;
pub use relatorio_repo::RelatorioRepository;
pub mod servico_repo;
pub use servico_repo::ServicoRepository;
