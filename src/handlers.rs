pub mod clientes;
pub mod relatorios;
pub mod servicos;
pub mod status_servico;
pub mod tipos_servico;
