//! Generic pagination and filter engine
//!
//! Turns a [`ListQuery`] plus a per-entity [`ListSpec`] into a counted,
//! paged result set. Search and sort fields are validated against the
//! spec's whitelists, so no caller-supplied string ever reaches the SQL
//! text; only bind parameters carry user input.

use shared::{ListQuery, Page};
use sqlx::{postgres::PgRow, FromRow, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::error::AppResult;

/// Static description of one listable entity
pub struct ListSpec<'a> {
    pub table: &'a str,
    pub columns: &'a str,
    /// Columns the case-insensitive substring search may target
    pub search_fields: &'a [&'a str],
    /// Columns the caller may sort by
    pub sort_fields: &'a [&'a str],
    pub default_sort: &'a str,
    /// Base filters applied before any caller-supplied ones
    pub filters: Vec<Filter<'a>>,
}

/// A fixed equality filter contributed by the service
pub enum Filter<'a> {
    EqUuid(&'a str, Uuid),
    EqBool(&'a str, bool),
    EqText(&'a str, &'a str),
}

/// Run the count and page queries for one list read
pub async fn paginate<T>(db: &PgPool, spec: &ListSpec<'_>, query: &ListQuery) -> AppResult<Page<T>>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    let page = query.page();
    let take = query.take();

    let mut count_builder =
        QueryBuilder::<Postgres>::new(format!("SELECT COUNT(*) FROM {}", spec.table));
    push_filters(&mut count_builder, spec, query);
    let count: i64 = count_builder.build_query_scalar().fetch_one(db).await?;

    let mut builder =
        QueryBuilder::<Postgres>::new(format!("SELECT {} FROM {}", spec.columns, spec.table));
    push_filters(&mut builder, spec, query);

    let sort_field = query
        .sort_field
        .as_deref()
        .filter(|f| spec.sort_fields.contains(f))
        .unwrap_or(spec.default_sort);
    builder.push(format!(
        " ORDER BY {} {}",
        sort_field,
        query.sort_order().as_sql()
    ));
    builder.push(" LIMIT ");
    builder.push_bind(take);
    builder.push(" OFFSET ");
    builder.push_bind(query.skip());

    let results = builder.build_query_as::<T>().fetch_all(db).await?;

    Ok(Page::new(results, count, page, take))
}

fn push_filters(builder: &mut QueryBuilder<Postgres>, spec: &ListSpec<'_>, query: &ListQuery) {
    builder.push(" WHERE 1 = 1");

    for filter in &spec.filters {
        match filter {
            Filter::EqUuid(column, value) => {
                builder.push(format!(" AND {} = ", column));
                builder.push_bind(*value);
            }
            Filter::EqBool(column, value) => {
                builder.push(format!(" AND {} = ", column));
                builder.push_bind(*value);
            }
            Filter::EqText(column, value) => {
                builder.push(format!(" AND {} = ", column));
                builder.push_bind(value.to_string());
            }
        }
    }

    if let Some((term, field)) = query.search_pair() {
        if spec.search_fields.contains(&field) {
            builder.push(format!(" AND {} ILIKE ", field));
            builder.push_bind(format!("%{}%", escape_like(term)));
        }
    }

    let (from, to) = query.created_bounds();
    if let Some(from) = from {
        builder.push(" AND created_at >= ");
        builder.push_bind(from);
    }
    if let Some(to) = to {
        builder.push(" AND created_at <= ");
        builder.push_bind(to);
    }
}

/// Escape LIKE metacharacters so a search term matches literally
fn escape_like(term: &str) -> String {
    term.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}
