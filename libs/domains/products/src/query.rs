//! Compiles [`ProductFilters`] into the page query.
//!
//! Most predicates target `products` directly. Price is the price of the
//! featured variant (the variant owning the product's featured photo), so
//! price bounds and price ordering join a derived `fv` projection. That join
//! is only emitted when the filters need it.

use sea_orm::{DbBackend, Statement, Value};

use crate::filters::ProductFilters;
use crate::pagination::order_clause;

/// Positional parameters, numbered `$1..` in bind order.
#[derive(Debug, Default)]
struct Params(Vec<Value>);

impl Params {
    fn bind(&mut self, value: impl Into<Value>) -> String {
        self.0.push(value.into());
        format!("${}", self.0.len())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompiledQuery {
    pub sql: String,
    pub values: Vec<Value>,
}

impl CompiledQuery {
    pub fn into_statement(self) -> Statement {
        Statement::from_sql_and_values(DbBackend::Postgres, self.sql, self.values)
    }
}

/// For each product, the variant owning its featured photo.
/// Public callers only see prices of active variants.
pub fn featured_variant_projection(is_admin: bool) -> String {
    let mut sql = String::from(
        "SELECT v.product_id, v.price \
         FROM product_variants v \
         INNER JOIN variant_photos vp ON vp.variant_id = v.id \
         INNER JOIN products fp ON fp.id = v.product_id AND fp.featured_photo_id = vp.id",
    );
    if !is_admin {
        sql.push_str(" WHERE v.is_active = true");
    }
    sql
}

/// `%`, `_` and `\` match literally inside the pattern.
pub fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn contains_pattern(term: &str) -> String {
    format!("%{}%", escape_like(term))
}

fn conditions(filters: &ProductFilters, params: &mut Params) -> Vec<String> {
    let mut conds = Vec::new();

    if !filters.is_admin {
        conds.push("p.is_active = true".to_string());
    } else if let Some(active) = filters.active {
        conds.push(format!("p.is_active = {}", params.bind(active)));
    }

    if let Some(product_type) = filters.product_type {
        conds.push(format!(
            "p.type = {}::product_type",
            params.bind(product_type.to_string())
        ));
    }

    if let Some(search) = &filters.search {
        let p = params.bind(contains_pattern(search));
        conds.push(format!("(p.title ILIKE {p} OR p.description ILIKE {p})"));
    }

    if let Some(title) = &filters.title_search {
        conds.push(format!("p.title ILIKE {}", params.bind(contains_pattern(title))));
    }

    // Overlap: any shared tag matches
    if !filters.tags.is_empty() {
        conds.push(format!("p.tags && {}::text[]", params.bind(filters.tags.clone())));
    }

    let date_bounds = [
        ("p.created_at >=", filters.created_after),
        ("p.created_at <=", filters.created_before),
        ("p.updated_at >=", filters.updated_after),
        ("p.updated_at <=", filters.updated_before),
    ];
    for (predicate, bound) in date_bounds {
        if let Some(ts) = bound {
            conds.push(format!("{} {}", predicate, params.bind(ts)));
        }
    }

    if let Some(min) = filters.min_price {
        conds.push(format!("fv.price >= {}", params.bind(min)));
    }
    if let Some(max) = filters.max_price {
        conds.push(format!("fv.price <= {}", params.bind(max)));
    }

    conds
}

/// Page ids plus the window total, in display order.
pub fn compile_page_query(filters: &ProductFilters) -> CompiledQuery {
    let mut params = Params::default();

    let mut sql = String::from("SELECT p.id, COUNT(*) OVER() AS total_count FROM products p");

    if filters.needs_featured_price() {
        sql.push_str(&format!(
            " INNER JOIN ({}) fv ON fv.product_id = p.id",
            featured_variant_projection(filters.is_admin)
        ));
    }

    let conds = conditions(filters, &mut params);
    if !conds.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&conds.join(" AND "));
    }

    sql.push(' ');
    sql.push_str(&order_clause(filters));

    // Both are range-checked by ProductFilters::from_query
    let limit = params.bind(i64::try_from(filters.limit).unwrap_or(i64::MAX));
    let offset = params.bind(i64::try_from(filters.cursor).unwrap_or(i64::MAX));
    sql.push_str(&format!(" LIMIT {} OFFSET {}", limit, offset));

    CompiledQuery {
        sql,
        values: params.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::{SortBy, SortOrder};
    use crate::models::ProductType;
    use chrono::{TimeZone, Utc};

    fn public_filters() -> ProductFilters {
        ProductFilters {
            product_type: Some(ProductType::DigitalPrintable),
            ..ProductFilters::new(false)
        }
    }

    #[test]
    fn test_direct_path_has_no_join() {
        let query = compile_page_query(&public_filters());

        assert_eq!(
            query.sql,
            "SELECT p.id, COUNT(*) OVER() AS total_count FROM products p \
             WHERE p.is_active = true AND p.type = $1::product_type \
             ORDER BY p.created_at DESC, p.id ASC LIMIT $2 OFFSET $3"
        );
        assert_eq!(
            query.values,
            vec![
                Value::from("DIGITAL_PRINTABLE".to_string()),
                Value::from(20i64),
                Value::from(0i64),
            ]
        );
    }

    #[test]
    fn test_price_bounds_use_featured_join() {
        let filters = ProductFilters {
            min_price: Some(500),
            max_price: Some(1500),
            ..public_filters()
        };
        let query = compile_page_query(&filters);

        assert!(query.sql.contains(
            "INNER JOIN (SELECT v.product_id, v.price FROM product_variants v \
             INNER JOIN variant_photos vp ON vp.variant_id = v.id \
             INNER JOIN products fp ON fp.id = v.product_id AND fp.featured_photo_id = vp.id \
             WHERE v.is_active = true) fv ON fv.product_id = p.id"
        ));
        assert!(query.sql.contains("fv.price >= $2 AND fv.price <= $3"));
        assert_eq!(query.values[1], Value::from(500));
        assert_eq!(query.values[2], Value::from(1500));
    }

    #[test]
    fn test_price_sort_uses_featured_join() {
        let filters = ProductFilters {
            sort_by: SortBy::Price,
            sort_order: SortOrder::Asc,
            ..public_filters()
        };
        let query = compile_page_query(&filters);

        assert!(query.sql.contains(") fv ON fv.product_id = p.id"));
        assert!(query.sql.contains("ORDER BY fv.price ASC, p.id ASC"));
        assert!(!query.sql.contains("fv.price >="));
    }

    #[test]
    fn test_admin_projection_includes_inactive_variants() {
        assert!(!featured_variant_projection(true).contains("is_active"));
        assert!(featured_variant_projection(false).ends_with("WHERE v.is_active = true"));
    }

    #[test]
    fn test_admin_without_filters_has_no_where() {
        let query = compile_page_query(&ProductFilters::new(true));
        assert_eq!(
            query.sql,
            "SELECT p.id, COUNT(*) OVER() AS total_count FROM products p \
             ORDER BY p.created_at DESC, p.id ASC LIMIT $1 OFFSET $2"
        );
    }

    #[test]
    fn test_admin_active_filter_is_bound() {
        let filters = ProductFilters {
            active: Some(false),
            ..ProductFilters::new(true)
        };
        let query = compile_page_query(&filters);
        assert!(query.sql.contains("WHERE p.is_active = $1 "));
        assert_eq!(query.values[0], Value::from(false));
    }

    #[test]
    fn test_search_matches_title_or_description_with_one_param() {
        let filters = ProductFilters {
            search: Some("50%_off".into()),
            ..public_filters()
        };
        let query = compile_page_query(&filters);

        assert!(query.sql.contains("(p.title ILIKE $2 OR p.description ILIKE $2)"));
        assert_eq!(query.values[1], Value::from(r"%50\%\_off%".to_string()));
    }

    #[test]
    fn test_title_search_is_anded_separately() {
        let filters = ProductFilters {
            search: Some("rose".into()),
            title_search: Some("card".into()),
            ..ProductFilters::new(true)
        };
        let query = compile_page_query(&filters);

        assert!(query.sql.contains(
            "WHERE (p.title ILIKE $1 OR p.description ILIKE $1) AND p.title ILIKE $2"
        ));
    }

    #[test]
    fn test_tags_use_overlap() {
        let filters = ProductFilters {
            tags: vec!["floral".into(), "gold".into()],
            ..public_filters()
        };
        let query = compile_page_query(&filters);

        assert!(query.sql.contains("p.tags && $2::text[]"));
        assert_eq!(
            query.values[1],
            Value::from(vec!["floral".to_string(), "gold".to_string()])
        );
    }

    #[test]
    fn test_date_bounds() {
        let after = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let before = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();
        let filters = ProductFilters {
            created_after: Some(after),
            updated_before: Some(before),
            ..ProductFilters::new(true)
        };
        let query = compile_page_query(&filters);

        assert!(query.sql.contains("WHERE p.created_at >= $1 AND p.updated_at <= $2"));
        assert_eq!(query.values[0], Value::from(after));
        assert_eq!(query.values[1], Value::from(before));
    }

    #[test]
    fn test_cursor_and_limit_bound_last() {
        let filters = ProductFilters {
            cursor: 40,
            limit: 5,
            ..public_filters()
        };
        let query = compile_page_query(&filters);

        assert!(query.sql.ends_with("LIMIT $2 OFFSET $3"));
        assert_eq!(query.values[1], Value::from(5i64));
        assert_eq!(query.values[2], Value::from(40i64));
    }

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("plain"), "plain");
        assert_eq!(escape_like(r"a%b_c\d"), r"a\%b\_c\\d");
    }
}
