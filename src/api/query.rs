use crate::domain::filters::{CustomerFilters, PersonTypeFilter, RiskClassFilter};

/// Query pairs for `GET /clientes`. Paging is always present; each filter
/// only when it narrows the result.
pub fn customers_query(
    page: u32,
    per_page: u32,
    filters: &CustomerFilters,
) -> Vec<(&'static str, String)> {
    let mut query = vec![("page", page.to_string()), ("per_page", per_page.to_string())];

    if let Some(search) = filters.effective_search() {
        query.push(("search", search.to_owned()));
    }
    if filters.score.min_is_set() {
        query.push(("score_min", filters.score.min().to_string()));
    }
    if filters.score.max_is_set() {
        query.push(("score_max", filters.score.max().to_string()));
    }
    if let RiskClassFilter::Only(class) = &filters.risk_class {
        query.push(("classe_risco", class.label().to_owned()));
    }
    if let PersonTypeFilter::Only(person_type) = filters.person_type {
        query.push(("tipo_pessoa", person_type.code().to_owned()));
    }
    if let Some(active) = filters.active.as_flag() {
        query.push(("ativo", active.to_string()));
    }

    query
}

/// Path for `GET /cliente/{id}` with the id percent-encoded.
pub fn customer_path(customer_id: &str) -> String {
    format!("/cliente/{}", urlencoding::encode(customer_id))
}
