//! The fixed category taxonomy and its stable selection identifiers.

use once_cell::sync::Lazy;

use crate::normalize::normalize;

/// Fixed number of records rendered per result page.
pub const PAGE_SIZE: usize = 10;

/// Canonical provider categories, in menu order.
///
/// The stable identifier of a category is its stringified position in this
/// list; identifiers stay fixed for the lifetime of a deployment.
pub const CATEGORIES: [&str; 13] = [
    "دكتور",
    "صيدلية",
    "طبيب اسنان",
    "مركز",
    "مستشفى",
    "مختبر",
    "مجمعات",
    "عيادة",
    "معالج",
    "المضمدين والممرضين",
    "التجهيزات الطبية والمخبرية",
    "عوينات",
    "مستلزمات",
];

/// (stable id, normalized label) pairs in menu order.
static CATEGORY_TABLE: Lazy<Vec<(String, String)>> = Lazy::new(|| {
    CATEGORIES
        .iter()
        .enumerate()
        .map(|(i, label)| (i.to_string(), normalize(label)))
        .collect()
});

/// Resolves a stable category id to the normalized category label.
pub fn category_by_id(id: &str) -> Option<&'static str> {
    CATEGORY_TABLE
        .iter()
        .find(|(cid, _)| cid == id)
        .map(|(_, label)| label.as_str())
}

/// All (id, normalized label) pairs, for menu rendering.
pub fn category_entries() -> impl Iterator<Item = (&'static str, &'static str)> {
    CATEGORY_TABLE
        .iter()
        .map(|(id, label)| (id.as_str(), label.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_ids_are_positional() {
        assert_eq!(category_by_id("0"), Some("دكتور"));
        assert_eq!(category_by_id("12"), Some("مستلزمات"));
    }

    #[test]
    fn test_unknown_category_id() {
        assert_eq!(category_by_id("13"), None);
        assert_eq!(category_by_id("x"), None);
        assert_eq!(category_by_id(""), None);
    }

    #[test]
    fn test_labels_are_normalized() {
        for (_, label) in category_entries() {
            assert_eq!(normalize(label), label);
        }
    }

    #[test]
    fn test_entries_cover_every_category() {
        assert_eq!(category_entries().count(), CATEGORIES.len());
    }
}
