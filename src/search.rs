//! Filter composition over the registry index.

use tracing::debug;

use crate::normalize::normalize;
use crate::registry::{ProviderRecord, RegistryIndex};

/// Which record field a free-text query is matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchField {
    Name,
    Address,
    #[default]
    General,
}

/// The active filters for one search run. Absent parts filter nothing.
#[derive(Debug, Clone, Default)]
pub struct SearchCriteria {
    pub category: Option<String>,
    pub specialization: Option<String>,
    pub field: SearchField,
    pub query: Option<String>,
}

/// Applies the criteria in fixed order: category equality, specialization
/// equality, then substring text match. Matching is plain substring
/// containment over normalized text; survivors keep the index's insertion
/// order.
pub fn search(index: &RegistryIndex, criteria: &SearchCriteria) -> Vec<ProviderRecord> {
    let query = criteria.query.as_deref().map(normalize);

    let results: Vec<ProviderRecord> = index
        .records()
        .iter()
        .filter(|record| matches(record, criteria, query.as_deref()))
        .cloned()
        .collect();

    debug!(
        hits = results.len(),
        category = criteria.category.as_deref().unwrap_or("-"),
        specialization = criteria.specialization.as_deref().unwrap_or("-"),
        "Search completed"
    );
    results
}

fn matches(record: &ProviderRecord, criteria: &SearchCriteria, query: Option<&str>) -> bool {
    if let Some(category) = &criteria.category {
        if record.category != *category {
            return false;
        }
    }

    if let Some(specialization) = &criteria.specialization {
        if record.specialization != *specialization {
            return false;
        }
    }

    match query {
        None => true,
        Some(q) => match criteria.field {
            SearchField::Name => record.name.contains(q),
            SearchField::Address => record.address.contains(q),
            SearchField::General => record.name.contains(q) || record.address.contains(q),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn test_index() -> RegistryIndex {
        let rows = vec![
            json!({"name": "Dr Ali", "address": "Main St", "category": "دكتور",
                   "specialization": "قلب", "phone": "1", "notes": ""}),
            json!({"name": "Dr Sami", "address": "Side St", "category": "دكتور",
                   "specialization": "جلدية", "phone": "2", "notes": ""}),
            json!({"name": "صيدلية النور", "address": "Main St", "category": "صيدلية",
                   "specialization": "", "phone": "3", "notes": ""}),
        ];
        RegistryIndex::load(&rows).unwrap()
    }

    #[test]
    fn test_no_criteria_returns_everything_in_order() {
        let index = test_index();
        let results = search(&index, &SearchCriteria::default());
        let names: Vec<&str> = results.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["dr ali", "dr sami", "صيدلية النور"]);
    }

    #[test]
    fn test_category_and_specialization_compose() {
        let index = test_index();
        let criteria = SearchCriteria {
            category: Some("دكتور".to_string()),
            specialization: Some("قلب".to_string()),
            ..Default::default()
        };

        let results = search(&index, &criteria);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].name, "dr ali");
    }

    #[test]
    fn test_name_query_is_strict_substring() {
        let index = test_index();
        let criteria = SearchCriteria {
            field: SearchField::Name,
            query: Some("ali".to_string()),
            ..Default::default()
        };

        // "ali" is not a contiguous substring of "sami"
        let results = search(&index, &criteria);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].name, "dr ali");
    }

    #[test]
    fn test_address_query_ignores_names() {
        let index = test_index();
        let criteria = SearchCriteria {
            field: SearchField::Address,
            query: Some("main".to_string()),
            ..Default::default()
        };

        let results = search(&index, &criteria);
        let names: Vec<&str> = results.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["dr ali", "صيدلية النور"]);
    }

    #[test]
    fn test_general_query_matches_name_or_address() {
        let index = test_index();
        let criteria = SearchCriteria {
            field: SearchField::General,
            query: Some("st".to_string()),
            ..Default::default()
        };

        assert_eq!(search(&index, &criteria).len(), 3);
    }

    #[test]
    fn test_query_is_normalized_before_matching() {
        let index = test_index();
        let criteria = SearchCriteria {
            field: SearchField::Name,
            query: Some("  DR   Ali ".to_string()),
            ..Default::default()
        };

        assert_eq!(search(&index, &criteria).len(), 1);
    }

    #[test]
    fn test_fixed_order_equals_simultaneous_conjunction() {
        let index = test_index();
        let criteria = SearchCriteria {
            category: Some("دكتور".to_string()),
            specialization: Some("قلب".to_string()),
            field: SearchField::General,
            query: Some("ali".to_string()),
        };

        let staged = search(&index, &criteria);
        let conjunction: Vec<ProviderRecord> = index
            .records()
            .iter()
            .filter(|r| {
                r.category == "دكتور"
                    && r.specialization == "قلب"
                    && (r.name.contains("ali") || r.address.contains("ali"))
            })
            .cloned()
            .collect();
        assert_eq!(staged, conjunction);
    }
}
