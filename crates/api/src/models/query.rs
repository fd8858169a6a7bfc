//! Query descriptors for listing endpoints.
//!
//! `GET /lists` and `GET /projects` accept a querymen-style query string:
//!
//! ```text
//! ?userId=1&projectId=2&page=1&limit=30&sort=-createdAt,title&fields=title,cards
//! ```
//!
//! which is parsed into a [`QueryDescriptor`]: a typed filter (`query`), a field
//! projection (`select`) and a pagination/sort [`Cursor`].

use std::cmp::Ordering;
use std::ops::Deref;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};
use thiserror::Error;

use taskboard_core::{ProjectId, UserId};

use super::list::{List, ListFilter};
use super::project::{Project, ProjectFilter};

/// Rows per page when `limit` is not given.
pub const DEFAULT_LIMIT: i64 = 30;
/// Largest accepted `limit`.
pub const MAX_LIMIT: i64 = 100;
/// Sort applied when `sort` is not given.
pub const DEFAULT_SORT: &str = "-createdAt";

/// Errors produced while parsing a listing query string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("page must be at least 1 (got {0})")]
    InvalidPage(i64),

    #[error("limit must be between 1 and 100 (got {0})")]
    InvalidLimit(i64),

    #[error("page {0} is out of range")]
    PageOutOfRange(i64),

    #[error("cannot sort by '{0}'")]
    UnknownSortField(String),

    #[error("unknown field '{0}'")]
    UnknownField(String),
}

// =============================================================================
// Sorting
// =============================================================================

/// Fields a listing can be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Id,
    Title,
    CreatedAt,
    UpdatedAt,
}

impl SortField {
    fn parse(name: &str) -> Option<Self> {
        match name {
            "id" => Some(Self::Id),
            "title" => Some(Self::Title),
            "createdAt" => Some(Self::CreatedAt),
            "updatedAt" => Some(Self::UpdatedAt),
            _ => None,
        }
    }

    /// SQL column backing this field.
    #[must_use]
    pub const fn column(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Title => "title",
            Self::CreatedAt => "created_at",
            Self::UpdatedAt => "updated_at",
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    const fn sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// One `sort` component, e.g. `-createdAt`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortKey {
    pub field: SortField,
    pub direction: SortDirection,
}

/// Documents that the in-memory store can order by [`SortField`].
pub trait Sortable {
    fn sort_id(&self) -> i32;
    fn sort_title(&self) -> Option<&str>;
    fn sort_timestamp(&self, field: SortField) -> DateTime<Utc>;

    /// Ascending comparison on `field`. Missing titles sort last, as in `PostgreSQL`.
    fn compare_by(&self, other: &Self, field: SortField) -> Ordering {
        match field {
            SortField::Id => self.sort_id().cmp(&other.sort_id()),
            SortField::Title => match (self.sort_title(), other.sort_title()) {
                (Some(a), Some(b)) => a.cmp(b),
                (None, None) => Ordering::Equal,
                (None, Some(_)) => Ordering::Greater,
                (Some(_), None) => Ordering::Less,
            },
            SortField::CreatedAt | SortField::UpdatedAt => self
                .sort_timestamp(field)
                .cmp(&other.sort_timestamp(field)),
        }
    }
}

// =============================================================================
// Cursor
// =============================================================================

/// Pagination and ordering for a listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cursor {
    /// Number of matching rows to skip.
    pub skip: i64,
    /// Maximum number of rows to return.
    pub limit: i64,
    /// Sort keys, most significant first.
    pub sort: Vec<SortKey>,
}

impl Default for Cursor {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: DEFAULT_LIMIT,
            sort: vec![SortKey {
                field: SortField::CreatedAt,
                direction: SortDirection::Desc,
            }],
        }
    }
}

impl Cursor {
    /// Build a cursor from raw `page`, `limit` and `sort` parameters.
    ///
    /// `page` is 1-based and unbounded; `limit` must be within `1..=MAX_LIMIT`.
    ///
    /// # Errors
    ///
    /// Returns `QueryError` for out-of-range values or unknown sort fields.
    pub fn parse(
        page: Option<i64>,
        limit: Option<i64>,
        sort: Option<&str>,
    ) -> Result<Self, QueryError> {
        let page = page.unwrap_or(1);
        if page < 1 {
            return Err(QueryError::InvalidPage(page));
        }

        let limit = limit.unwrap_or(DEFAULT_LIMIT);
        if !(1..=MAX_LIMIT).contains(&limit) {
            return Err(QueryError::InvalidLimit(limit));
        }

        let skip = (page - 1)
            .checked_mul(limit)
            .ok_or(QueryError::PageOutOfRange(page))?;

        let sort = parse_sort(sort.unwrap_or(DEFAULT_SORT))?;

        Ok(Self { skip, limit, sort })
    }

    /// `ORDER BY` clause body built from whitelisted columns only.
    ///
    /// Always ends with an `id` tie-breaker so pages are stable.
    #[must_use]
    pub fn order_by_sql(&self) -> String {
        let mut parts: Vec<String> = self
            .sort
            .iter()
            .map(|key| format!("{} {}", key.field.column(), key.direction.sql()))
            .collect();

        if !self.sort.iter().any(|key| key.field == SortField::Id) {
            parts.push("id ASC".to_string());
        }

        parts.join(", ")
    }

    /// Sort, skip and truncate `rows` in memory, mirroring [`Self::order_by_sql`].
    #[must_use]
    pub fn apply<T: Sortable>(&self, mut rows: Vec<T>) -> Vec<T> {
        rows.sort_by(|a, b| {
            self.sort
                .iter()
                .fold(Ordering::Equal, |ordering, key| {
                    ordering.then_with(|| {
                        let ord = a.compare_by(b, key.field);
                        match key.direction {
                            SortDirection::Asc => ord,
                            SortDirection::Desc => ord.reverse(),
                        }
                    })
                })
                .then_with(|| a.sort_id().cmp(&b.sort_id()))
        });

        let skip = usize::try_from(self.skip).unwrap_or(usize::MAX);
        let limit = usize::try_from(self.limit).unwrap_or(usize::MAX);
        rows.into_iter().skip(skip).take(limit).collect()
    }
}

fn parse_sort(raw: &str) -> Result<Vec<SortKey>, QueryError> {
    let keys = raw
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            let (direction, name) = match part.strip_prefix('-') {
                Some(name) => (SortDirection::Desc, name),
                None => (
                    SortDirection::Asc,
                    part.strip_prefix('+').unwrap_or(part),
                ),
            };
            SortField::parse(name)
                .map(|field| SortKey { field, direction })
                .ok_or_else(|| QueryError::UnknownSortField(name.to_string()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    if keys.is_empty() {
        return Ok(Cursor::default().sort);
    }
    Ok(keys)
}

// =============================================================================
// Projection
// =============================================================================

/// Field projection requested through `fields`. `id` is always kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Select(Option<Arc<[String]>>);

impl Select {
    /// Select every field.
    #[must_use]
    pub const fn all() -> Self {
        Self(None)
    }

    /// Parse a comma-separated `fields` parameter against the view's field names.
    ///
    /// # Errors
    ///
    /// Returns `QueryError::UnknownField` for names that are not part of the view.
    pub fn parse(raw: Option<&str>, allowed: &[&str]) -> Result<Self, QueryError> {
        let Some(raw) = raw else {
            return Ok(Self::all());
        };

        let fields = raw
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(|name| {
                if allowed.contains(&name) {
                    Ok(name.to_string())
                } else {
                    Err(QueryError::UnknownField(name.to_string()))
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        if fields.is_empty() {
            return Ok(Self::all());
        }
        Ok(Self(Some(fields.into())))
    }

    /// Wrap `doc` so that it serializes with only the selected fields.
    #[must_use]
    pub fn project<T>(&self, doc: T) -> Projected<T> {
        Projected {
            doc,
            fields: self.0.clone(),
        }
    }
}

/// A document paired with the projection it will be serialized with.
#[derive(Debug, Clone, PartialEq)]
pub struct Projected<T> {
    doc: T,
    fields: Option<Arc<[String]>>,
}

impl<T> Projected<T> {
    /// Unwrap the full document.
    #[must_use]
    pub fn into_inner(self) -> T {
        self.doc
    }
}

impl<T> Deref for Projected<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.doc
    }
}

impl<T: Serialize> Serialize for Projected<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let Some(fields) = &self.fields else {
            return self.doc.serialize(serializer);
        };

        let value = serde_json::to_value(&self.doc).map_err(serde::ser::Error::custom)?;
        let serde_json::Value::Object(object) = value else {
            return value.serialize(serializer);
        };

        let projected: serde_json::Map<String, serde_json::Value> = object
            .into_iter()
            .filter(|(key, _)| key == "id" || fields.iter().any(|field| field == key))
            .collect();
        projected.serialize(serializer)
    }
}

// =============================================================================
// Descriptors
// =============================================================================

/// A parsed listing request: filter, projection and cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryDescriptor<F> {
    pub query: F,
    pub select: Select,
    pub cursor: Cursor,
}

impl<F: Default> Default for QueryDescriptor<F> {
    fn default() -> Self {
        Self {
            query: F::default(),
            select: Select::all(),
            cursor: Cursor::default(),
        }
    }
}

/// Query string of `GET /lists`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListsQuery {
    pub user_id: Option<UserId>,
    pub project_id: Option<ProjectId>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub sort: Option<String>,
    pub fields: Option<String>,
}

impl ListsQuery {
    /// Parse into a list query descriptor.
    ///
    /// # Errors
    ///
    /// Returns `QueryError` if pagination, sort or projection parameters are invalid.
    pub fn into_descriptor(self) -> Result<QueryDescriptor<ListFilter>, QueryError> {
        Ok(QueryDescriptor {
            query: ListFilter {
                user_id: self.user_id,
                project_id: self.project_id,
            },
            select: Select::parse(self.fields.as_deref(), List::FIELDS)?,
            cursor: Cursor::parse(self.page, self.limit, self.sort.as_deref())?,
        })
    }
}

/// Query string of `GET /projects`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectsQuery {
    pub user_id: Option<UserId>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub sort: Option<String>,
    pub fields: Option<String>,
}

impl ProjectsQuery {
    /// Parse into a project query descriptor.
    ///
    /// # Errors
    ///
    /// Returns `QueryError` if pagination, sort or projection parameters are invalid.
    pub fn into_descriptor(self) -> Result<QueryDescriptor<ProjectFilter>, QueryError> {
        Ok(QueryDescriptor {
            query: ProjectFilter {
                user_id: self.user_id,
            },
            select: Select::parse(self.fields.as_deref(), Project::FIELDS)?,
            cursor: Cursor::parse(self.page, self.limit, self.sort.as_deref())?,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Duration;
    use serde_json::json;

    #[derive(Debug, Clone, Serialize)]
    struct Doc {
        id: i32,
        title: Option<&'static str>,
        created_at: DateTime<Utc>,
    }

    impl Sortable for Doc {
        fn sort_id(&self) -> i32 {
            self.id
        }

        fn sort_title(&self) -> Option<&str> {
            self.title
        }

        fn sort_timestamp(&self, _field: SortField) -> DateTime<Utc> {
            self.created_at
        }
    }

    fn docs() -> Vec<Doc> {
        let base = Utc::now();
        vec![
            Doc {
                id: 1,
                title: Some("b"),
                created_at: base,
            },
            Doc {
                id: 2,
                title: None,
                created_at: base + Duration::seconds(2),
            },
            Doc {
                id: 3,
                title: Some("a"),
                created_at: base + Duration::seconds(1),
            },
        ]
    }

    #[test]
    fn test_cursor_defaults() {
        let cursor = Cursor::parse(None, None, None).unwrap();
        assert_eq!(cursor, Cursor::default());
        assert_eq!(cursor.skip, 0);
        assert_eq!(cursor.limit, DEFAULT_LIMIT);
    }

    #[test]
    fn test_cursor_page_is_unbounded() {
        let cursor = Cursor::parse(Some(1_000), Some(10), None).unwrap();
        assert_eq!(cursor.skip, 9_990);
    }

    #[test]
    fn test_cursor_rejects_invalid_values() {
        assert_eq!(
            Cursor::parse(Some(0), None, None),
            Err(QueryError::InvalidPage(0))
        );
        assert_eq!(
            Cursor::parse(None, Some(101), None),
            Err(QueryError::InvalidLimit(101))
        );
        assert_eq!(
            Cursor::parse(Some(i64::MAX), Some(100), None),
            Err(QueryError::PageOutOfRange(i64::MAX))
        );
        assert_eq!(
            Cursor::parse(None, None, Some("password")),
            Err(QueryError::UnknownSortField("password".to_string()))
        );
    }

    #[test]
    fn test_order_by_sql() {
        let cursor = Cursor::parse(None, None, Some("title,-updatedAt")).unwrap();
        assert_eq!(cursor.order_by_sql(), "title ASC, updated_at DESC, id ASC");

        let cursor = Cursor::parse(None, None, Some("-id")).unwrap();
        assert_eq!(cursor.order_by_sql(), "id DESC");
    }

    #[test]
    fn test_apply_sorts_newest_first_by_default() {
        let ids: Vec<i32> = Cursor::default()
            .apply(docs())
            .iter()
            .map(|d| d.id)
            .collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[test]
    fn test_apply_title_sorts_missing_last_and_paginates() {
        let cursor = Cursor::parse(Some(1), Some(2), Some("title")).unwrap();
        let ids: Vec<i32> = cursor.apply(docs()).iter().map(|d| d.id).collect();
        assert_eq!(ids, vec![3, 1]);

        let cursor = Cursor::parse(Some(2), Some(2), Some("title")).unwrap();
        let ids: Vec<i32> = cursor.apply(docs()).iter().map(|d| d.id).collect();
        assert_eq!(ids, vec![2]);
    }

    #[test]
    fn test_select_keeps_id_and_requested_fields() {
        let select = Select::parse(Some("title"), &["id", "title", "created_at"]).unwrap();
        let value = serde_json::to_value(select.project(docs().remove(0))).unwrap();
        assert_eq!(value, json!({ "id": 1, "title": "b" }));
    }

    #[test]
    fn test_select_all_serializes_whole_document() {
        let doc = docs().remove(0);
        let value = serde_json::to_value(Select::all().project(doc.clone())).unwrap();
        assert_eq!(value, serde_json::to_value(doc).unwrap());
    }

    #[test]
    fn test_select_rejects_unknown_field() {
        assert_eq!(
            Select::parse(Some("title,secret"), List::FIELDS),
            Err(QueryError::UnknownField("secret".to_string()))
        );
    }

    #[test]
    fn test_lists_query_into_descriptor() {
        let query = ListsQuery {
            user_id: Some(UserId::new(1)),
            project_id: Some(ProjectId::new(2)),
            page: Some(2),
            limit: Some(5),
            ..ListsQuery::default()
        };

        let descriptor = query.into_descriptor().unwrap();
        assert_eq!(descriptor.query.project_id, Some(ProjectId::new(2)));
        assert_eq!(descriptor.cursor.skip, 5);
        assert_eq!(descriptor.select, Select::all());
    }
}
