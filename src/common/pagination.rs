use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::common::serde_helpers::empty_string_as_none;

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_LIMIT: i64 = 10;
pub const MAX_LIMIT: i64 = 100;
// Maior página cujo OFFSET ainda cabe em i64 com qualquer limite válido.
pub const MAX_PAGE: i64 = i64::MAX / MAX_LIMIT;

/// Parâmetros de paginação e busca comuns às listagens.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListParams {
    /// Página (começa em 1)
    #[param(example = 1)]
    pub page: Option<i64>,

    /// Itens por página (máximo 100)
    #[param(example = 10)]
    pub limit: Option<i64>,

    /// Busca textual (contém, sem diferenciar maiúsculas)
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub search: Option<String>,
}

/// Página já normalizada, pronta para virar LIMIT/OFFSET.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub limit: i64,
}

impl PageRequest {
    pub fn new(page: Option<i64>, limit: Option<i64>) -> Self {
        let page = page.unwrap_or(DEFAULT_PAGE).clamp(1, MAX_PAGE);
        let limit = limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
        Self { page, limit }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

impl ListParams {
    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(self.page, self.limit)
    }

    /// Padrão para `ILIKE`, ou `None` quando não há busca.
    pub fn search_pattern(&self) -> Option<String> {
        search_pattern(self.search.as_deref())
    }
}

/// Busca por substring: `%` e `_` digitados pelo usuário valem como texto.
/// A barra invertida é o escape padrão do `LIKE` no Postgres.
pub fn search_pattern(search: Option<&str>) -> Option<String> {
    search
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| format!("%{}%", escape_like(s)))
}

fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// ceil(total / limit), sem ponto flutuante.
pub fn total_pages(total_items: i64, limit: i64) -> i64 {
    if limit <= 0 || total_items <= 0 {
        return 0;
    }
    (total_items + limit - 1) / limit
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Paginated<T: ToSchema> {
    pub data: Vec<T>,
    #[schema(example = 42)]
    pub total_items: i64,
    #[schema(example = 1)]
    pub current_page: i64,
    #[schema(example = 5)]
    pub total_pages: i64,
}

impl<T: ToSchema> Paginated<T> {
    pub fn new(data: Vec<T>, total_items: i64, page: PageRequest) -> Self {
        Self {
            data,
            total_items,
            current_page: page.page,
            total_pages: total_pages(total_items, page.limit),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(total_pages(0, 10), 0);
        assert_eq!(total_pages(1, 10), 1);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(11, 10), 2);
        assert_eq!(total_pages(95, 20), 5);
    }

    #[test]
    fn page_request_defaults_and_clamps() {
        assert_eq!(PageRequest::new(None, None), PageRequest { page: 1, limit: 10 });
        assert_eq!(PageRequest::new(Some(0), Some(0)), PageRequest { page: 1, limit: 1 });
        assert_eq!(PageRequest::new(Some(-3), Some(1000)), PageRequest { page: 1, limit: MAX_LIMIT });
        assert_eq!(PageRequest::new(Some(3), Some(25)).offset(), 50);
    }

    #[test]
    fn blank_search_is_ignored() {
        assert_eq!(search_pattern(None), None);
        assert_eq!(search_pattern(Some("   ")), None);
        assert_eq!(search_pattern(Some(" notebook ")), Some("%notebook%".to_string()));
    }

    #[test]
    fn huge_page_does_not_overflow_offset() {
        let page = PageRequest::new(Some(i64::MAX), Some(MAX_LIMIT));
        assert_eq!(page.page, MAX_PAGE);
        assert!(page.offset() >= 0);
        assert_eq!(page.offset(), (MAX_PAGE - 1) * MAX_LIMIT);

        let page = PageRequest::new(Some(i64::MAX), Some(10));
        assert!(page.offset() > 0);
    }

    #[test]
    fn search_wildcards_are_literal() {
        assert_eq!(search_pattern(Some("_")), Some(r"%\_%".to_string()));
        assert_eq!(search_pattern(Some("100%")), Some(r"%100\%%".to_string()));
        assert_eq!(search_pattern(Some(r"C:\dados")), Some(r"%C:\\dados%".to_string()));
    }

    #[test]
    fn list_params_accept_empty_search() {
        let params: ListParams = serde_json::from_value(serde_json::json!({
            "page": 2,
            "search": ""
        }))
        .unwrap();
        assert_eq!(params.search, None);
        assert_eq!(params.page_request(), PageRequest { page: 2, limit: DEFAULT_LIMIT });
    }

    #[derive(Serialize, ToSchema)]
    struct Item {
        id: i32,
    }

    #[test]
    fn paginated_serializes_camel_case() {
        let page = Paginated::new(vec![Item { id: 1 }], 21, PageRequest::new(Some(2), Some(10)));
        let value = serde_json::to_value(&page).unwrap();
        assert_eq!(value["totalItems"], 21);
        assert_eq!(value["currentPage"], 2);
        assert_eq!(value["totalPages"], 3);
        assert_eq!(value["data"][0]["id"], 1);
    }
}
