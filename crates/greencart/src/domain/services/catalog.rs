//! Catalog browsing: product filters, tag parsing and pagination

use serde::Serialize;

use crate::domain::{
    entities::Product,
    value_objects::{Role, SustainabilityTag},
};

pub const DEFAULT_PAGE_SIZE: i64 = 20;
pub const MAX_PAGE_SIZE: i64 = 100;

/// Product listing filter. All set criteria must match.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductFilter {
    /// Case-insensitive substring of title or description
    pub search: Option<String>,
    /// Product must carry at least one of these
    pub tags: Vec<SustainabilityTag>,
    /// Case-insensitive substring of the category
    pub category: Option<String>,
    /// Case-insensitive substring of the seller's city
    pub city: Option<String>,
    /// 1-based
    pub page: i64,
    pub limit: i64,
}

impl Default for ProductFilter {
    fn default() -> Self {
        Self {
            search: None,
            tags: Vec::new(),
            category: None,
            city: None,
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

impl ProductFilter {
    /// Build a filter from raw query values, normalizing blanks and bounds
    pub fn from_query(
        search: Option<String>,
        tags: Option<&str>,
        category: Option<String>,
        city: Option<String>,
        page: Option<i64>,
        limit: Option<i64>,
    ) -> Self {
        Self {
            search: non_blank(search),
            tags: tags.map(parse_tags).unwrap_or_default(),
            category: non_blank(category),
            city: non_blank(city),
            page: page.unwrap_or(1).max(1),
            limit: limit
                .unwrap_or(DEFAULT_PAGE_SIZE)
                .clamp(1, MAX_PAGE_SIZE),
        }
    }

    /// Rows to skip; saturates for absurd page numbers
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }

    /// Evaluate the filter in memory.
    ///
    /// `seller` is the product owner's (city, role); products whose seller
    /// is unknown never match a city filter. Inactive products never match.
    pub fn matches(&self, product: &Product, seller: Option<(&str, Role)>) -> bool {
        if !product.is_active {
            return false;
        }

        if let Some(search) = &self.search {
            if !contains_ignore_case(&product.title, search)
                && !contains_ignore_case(&product.description, search)
            {
                return false;
            }
        }

        if !self.tags.is_empty()
            && !product
                .sustainability_tags
                .iter()
                .any(|tag| self.tags.contains(tag))
        {
            return false;
        }

        if let Some(category) = &self.category {
            match &product.category {
                Some(c) if contains_ignore_case(c, category) => {}
                _ => return false,
            }
        }

        if let Some(city) = &self.city {
            match seller {
                Some((seller_city, role)) if role.can_sell() && contains_ignore_case(seller_city, city) => {}
                _ => return false,
            }
        }

        true
    }
}

/// Pagination metadata returned with a product page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub total: i64,
    pub page: i64,
    pub pages: i64,
}

impl Pagination {
    pub fn new(total: i64, page: i64, limit: i64) -> Self {
        let limit = limit.max(1);
        Self {
            total,
            page,
            pages: (total + limit - 1) / limit,
        }
    }
}

/// Parse a tag query value.
///
/// Accepts a JSON array (`["organic","handmade"]`) or words separated by
/// commas and/or whitespace. Matching is case-insensitive; unknown words are
/// dropped and duplicates removed, keeping first-seen order.
pub fn parse_tags(raw: &str) -> Vec<SustainabilityTag> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Vec::new();
    }

    let words: Vec<String> = match serde_json::from_str::<Vec<serde_json::Value>>(raw) {
        Ok(values) => values
            .into_iter()
            .map(|v| match v {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            })
            .collect(),
        Err(_) => raw
            .split(|c: char| c == ',' || c.is_whitespace())
            .map(str::to_string)
            .collect(),
    };

    let mut tags = Vec::new();
    for word in words {
        if let Ok(tag) = word.parse::<SustainabilityTag>() {
            if !tags.contains(&tag) {
                tags.push(tag);
            }
        }
    }
    tags
}

/// Escape `\`, `%` and `_` for use inside a SQL LIKE pattern
pub fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn product(title: &str, tags: Vec<SustainabilityTag>, category: Option<&str>) -> Product {
        Product::new(
            Uuid::new_v4(),
            title.to_string(),
            format!("{title} description"),
            10.0,
            vec![],
            tags,
            category.map(str::to_string),
            5,
        )
        .unwrap()
    }

    #[test]
    fn test_parse_tags_comma_and_space() {
        assert_eq!(
            parse_tags("Organic, handmade  recycled,,"),
            vec![
                SustainabilityTag::Organic,
                SustainabilityTag::Handmade,
                SustainabilityTag::Recycled
            ]
        );
    }

    #[test]
    fn test_parse_tags_json_array() {
        assert_eq!(
            parse_tags(r#"["recycled", "ORGANIC", "recycled"]"#),
            vec![SustainabilityTag::Recycled, SustainabilityTag::Organic]
        );
    }

    #[test]
    fn test_parse_tags_ignores_unknown() {
        assert!(parse_tags("vegan plastic").is_empty());
        assert!(parse_tags("   ").is_empty());
        assert_eq!(parse_tags("vegan,organic"), vec![SustainabilityTag::Organic]);
    }

    #[test]
    fn test_from_query_normalizes() {
        let filter = ProductFilter::from_query(
            Some("  ".to_string()),
            Some("handmade"),
            Some(" Home ".to_string()),
            None,
            Some(0),
            Some(1000),
        );
        assert_eq!(filter.search, None);
        assert_eq!(filter.tags, vec![SustainabilityTag::Handmade]);
        assert_eq!(filter.category.as_deref(), Some("Home"));
        assert_eq!(filter.page, 1);
        assert_eq!(filter.limit, MAX_PAGE_SIZE);
        assert_eq!(filter.offset(), 0);
    }

    #[test]
    fn test_offset_saturates_for_huge_page() {
        let filter = ProductFilter::from_query(None, None, None, None, Some(i64::MAX), Some(20));
        assert_eq!(filter.page, i64::MAX);
        assert_eq!(filter.offset(), i64::MAX);

        let filter = ProductFilter::from_query(None, None, None, None, Some(3), Some(20));
        assert_eq!(filter.offset(), 40);
    }

    #[test]
    fn test_search_and_tags_combine() {
        let honey = product("Organic Honey", vec![SustainabilityTag::Organic], Some("Food"));
        let mug = product("Ceramic Mug", vec![SustainabilityTag::Handmade], Some("Kitchen"));

        let filter = ProductFilter {
            search: Some("honey".to_string()),
            tags: vec![SustainabilityTag::Handmade],
            ..Default::default()
        };
        assert!(!filter.matches(&honey, None));
        assert!(!filter.matches(&mug, None));

        let filter = ProductFilter {
            search: Some("MUG".to_string()),
            tags: vec![SustainabilityTag::Handmade, SustainabilityTag::Recycled],
            ..Default::default()
        };
        assert!(filter.matches(&mug, None));
    }

    #[test]
    fn test_city_requires_selling_role() {
        let mug = product("Mug", vec![], None);
        let filter = ProductFilter {
            city: Some("francisco".to_string()),
            ..Default::default()
        };
        assert!(filter.matches(&mug, Some(("San Francisco", Role::Seller))));
        assert!(!filter.matches(&mug, Some(("San Francisco", Role::Buyer))));
        assert!(!filter.matches(&mug, None));
    }

    #[test]
    fn test_inactive_never_matches() {
        let mut mug = product("Mug", vec![], None);
        mug.is_active = false;
        assert!(!ProductFilter::default().matches(&mug, None));
    }

    #[test]
    fn test_pagination_pages() {
        assert_eq!(Pagination::new(0, 1, 20).pages, 0);
        assert_eq!(Pagination::new(20, 1, 20).pages, 1);
        assert_eq!(Pagination::new(21, 2, 20).pages, 2);
    }

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like(r"50%_off\"), r"50\%\_off\\");
    }
}
