pub mod catalogo;
pub mod clientes;
pub mod relatorios;
pub mod servicos;
