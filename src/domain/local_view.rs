//! In-memory filtering and sorting of already loaded customers.

use std::cmp::Ordering;

use super::{
    customer::Customer,
    filters::{PersonTypeFilter, ScoreRange},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    Name,
    Score,
}

impl SortKey {
    pub fn label(self) -> &'static str {
        match self {
            Self::Name => "Nome",
            Self::Score => "Score",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn toggle(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Asc => "Crescente",
            Self::Desc => "Decrescente",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SortOrder {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl SortOrder {
    pub fn new(key: SortKey, direction: SortDirection) -> Self {
        Self { key, direction }
    }

    /// Parses `name-asc`, `score-desc`, etc.
    pub fn parse(raw: &str) -> Option<Self> {
        let (key, direction) = raw.trim().split_once(['-', '_'])?;
        let key = match key.to_ascii_lowercase().as_str() {
            "name" | "nome" => SortKey::Name,
            "score" => SortKey::Score,
            _ => return None,
        };
        let direction = match direction.to_ascii_lowercase().as_str() {
            "asc" => SortDirection::Asc,
            "desc" => SortDirection::Desc,
            _ => return None,
        };

        Some(Self { key, direction })
    }

    fn compare(&self, left: &Customer, right: &Customer) -> Ordering {
        let ordering = match self.key {
            SortKey::Name => compare_names(&left.name, &right.name),
            SortKey::Score => left.score.cmp(&right.score),
        };

        match self.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

fn compare_names(left: &str, right: &str) -> Ordering {
    left.to_lowercase()
        .cmp(&right.to_lowercase())
        .then_with(|| left.cmp(right))
}

/// Criteria applied to the loaded page only; never sent to the server.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LocalCriteria {
    pub search: String,
    pub score: ScoreRange,
    pub person_type: PersonTypeFilter,
    pub order: SortOrder,
}

impl LocalCriteria {
    pub fn sorted_by(order: SortOrder) -> Self {
        Self {
            order,
            ..Self::default()
        }
    }

    fn matches(&self, customer: &Customer, needle: Option<&str>) -> bool {
        let search_hit = needle.map_or(true, |needle| {
            customer.name.to_lowercase().contains(needle)
                || customer.tax_id.contains(self.search.trim())
        });

        search_hit
            && self.score.contains(customer.score)
            && self.person_type.matches(customer.person_type)
    }
}

/// Filters and sorts `customers` without touching the source slice.
pub fn derive<'a>(customers: &'a [Customer], criteria: &LocalCriteria) -> Vec<&'a Customer> {
    let trimmed = criteria.search.trim();
    let needle = (!trimmed.is_empty()).then(|| trimmed.to_lowercase());

    let mut visible: Vec<&Customer> = customers
        .iter()
        .filter(|customer| criteria.matches(customer, needle.as_deref()))
        .collect();

    visible.sort_by(|left, right| criteria.order.compare(left, right));
    visible
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::customer::{fixtures::customer, PersonType};

    fn sample() -> Vec<Customer> {
        let mut business = customer("3", "beta Comércio", 999);
        business.person_type = PersonType::Business;
        business.tax_id = "12.345.678/0001-90".to_owned();

        vec![
            customer("1", "Carla", 800),
            customer("2", "Ana", 350),
            business,
        ]
    }

    fn names(items: &[&Customer]) -> Vec<String> {
        items.iter().map(|item| item.name.clone()).collect()
    }

    fn scores(items: &[&Customer]) -> Vec<u16> {
        items.iter().map(|item| item.score).collect()
    }

    #[test]
    fn score_descending_orders_highest_first() {
        let data = sample();
        let criteria =
            LocalCriteria::sorted_by(SortOrder::new(SortKey::Score, SortDirection::Desc));

        assert_eq!(scores(&derive(&data, &criteria)), vec![999, 800, 350]);
    }

    #[test]
    fn score_ascending_orders_lowest_first() {
        let data = sample();
        let criteria = LocalCriteria::sorted_by(SortOrder::new(SortKey::Score, SortDirection::Asc));

        assert_eq!(scores(&derive(&data, &criteria)), vec![350, 800, 999]);
    }

    #[test]
    fn name_sort_is_case_insensitive_in_both_directions() {
        let data = sample();

        let asc = derive(&data, &LocalCriteria::default());
        assert_eq!(names(&asc), vec!["Ana", "beta Comércio", "Carla"]);

        let desc = derive(
            &data,
            &LocalCriteria::sorted_by(SortOrder::new(SortKey::Name, SortDirection::Desc)),
        );
        assert_eq!(names(&desc), vec!["Carla", "beta Comércio", "Ana"]);
    }

    #[test]
    fn equal_scores_keep_source_order() {
        let data = vec![
            customer("a", "Primeiro", 500),
            customer("b", "Segundo", 500),
            customer("c", "Terceiro", 500),
        ];
        let criteria =
            LocalCriteria::sorted_by(SortOrder::new(SortKey::Score, SortDirection::Desc));

        assert_eq!(
            names(&derive(&data, &criteria)),
            vec!["Primeiro", "Segundo", "Terceiro"]
        );
    }

    #[test]
    fn search_matches_name_substring_or_tax_id() {
        let data = sample();

        let by_name = LocalCriteria {
            search: "CAR".to_owned(),
            ..LocalCriteria::default()
        };
        assert_eq!(names(&derive(&data, &by_name)), vec!["Carla"]);

        let by_tax_id = LocalCriteria {
            search: "345.678".to_owned(),
            ..LocalCriteria::default()
        };
        assert_eq!(names(&derive(&data, &by_tax_id)), vec!["beta Comércio"]);
    }

    #[test]
    fn score_range_and_type_narrow_the_view() {
        let data = sample();
        let criteria = LocalCriteria {
            score: ScoreRange::new(400, 1000).expect("valid range"),
            person_type: PersonTypeFilter::Only(PersonType::Individual),
            ..LocalCriteria::default()
        };

        assert_eq!(names(&derive(&data, &criteria)), vec!["Carla"]);
    }

    #[test]
    fn derive_leaves_source_untouched() {
        let data = sample();
        let before = data.clone();

        let _ = derive(
            &data,
            &LocalCriteria::sorted_by(SortOrder::new(SortKey::Score, SortDirection::Asc)),
        );

        assert_eq!(data, before);
    }

    #[test]
    fn parses_cli_sort_labels() {
        assert_eq!(
            SortOrder::parse("score-desc"),
            Some(SortOrder::new(SortKey::Score, SortDirection::Desc))
        );
        assert_eq!(
            SortOrder::parse("nome_asc"),
            Some(SortOrder::new(SortKey::Name, SortDirection::Asc))
        );
        assert_eq!(SortOrder::parse("age-asc"), None);
    }
}
