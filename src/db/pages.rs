//! Database queries for pages.

use chrono::{NaiveDate, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use crate::entity::page::{self, ActiveModel, Entity as Page};
use crate::error::{AppError, AppResult};
use crate::models::PageRole;

use super::{check_swapped, next_version};

/// Field edits for a page. `None` leaves the column unchanged.
#[derive(Debug, Clone, Default)]
pub struct PageChanges {
    pub name: Option<String>,
    pub url: Option<String>,
    pub not_found: Option<bool>,
}

/// Insert a new page.
pub async fn insert_page<C: ConnectionTrait>(
    conn: &C,
    audit_id: Uuid,
    role: PageRole,
    name: &str,
    url: &str,
) -> AppResult<page::Model> {
    let now = Utc::now();

    let model = ActiveModel {
        id: Set(Uuid::now_v7()),
        audit_id: Set(audit_id),
        page_type: Set(role.as_str().to_string()),
        name: Set(name.to_string()),
        url: Set(url.to_string()),
        not_found: Set(false),
        complete_date: Set(None),
        version: Set(0),
        created_at: Set(now),
        updated_at: Set(now),
        deleted_at: Set(None),
    };

    Ok(model.insert(conn).await?)
}

/// Get a page by ID, whatever its lifecycle.
pub async fn find_page<C: ConnectionTrait>(conn: &C, id: Uuid) -> AppResult<Option<page::Model>> {
    Ok(Page::find_by_id(id).one(conn).await?)
}

/// Get an active page or fail with `NotFound`.
pub async fn get_active_page<C: ConnectionTrait>(conn: &C, id: Uuid) -> AppResult<page::Model> {
    find_page(conn, id)
        .await?
        .filter(|p| p.deleted_at.is_none())
        .ok_or_else(|| AppError::NotFound(format!("Page {}", id)))
}

/// Active pages of an audit in creation order.
pub async fn list_active_pages<C: ConnectionTrait>(
    conn: &C,
    audit_id: Uuid,
) -> AppResult<Vec<page::Model>> {
    Ok(Page::find()
        .filter(page::Column::AuditId.eq(audit_id))
        .filter(page::Column::DeletedAt.is_null())
        .order_by_asc(page::Column::CreatedAt)
        .order_by_asc(page::Column::Id)
        .all(conn)
        .await?)
}

/// Count active pages of an audit.
pub async fn count_active_pages<C: ConnectionTrait>(conn: &C, audit_id: Uuid) -> AppResult<u64> {
    Ok(Page::find()
        .filter(page::Column::AuditId.eq(audit_id))
        .filter(page::Column::DeletedAt.is_null())
        .count(conn)
        .await?)
}

/// Apply page edits if `expected_version` is still current.
pub async fn update_page<C: ConnectionTrait>(
    conn: &C,
    id: Uuid,
    expected_version: i32,
    changes: &PageChanges,
) -> AppResult<page::Model> {
    get_active_page(conn, id).await?;

    let mut update = Page::update_many()
        .col_expr(page::Column::Version, Expr::value(next_version(expected_version)?))
        .col_expr(page::Column::UpdatedAt, Expr::value(Utc::now()));
    if let Some(name) = &changes.name {
        update = update.col_expr(page::Column::Name, Expr::value(name.clone()));
    }
    if let Some(url) = &changes.url {
        update = update.col_expr(page::Column::Url, Expr::value(url.clone()));
    }
    if let Some(not_found) = changes.not_found {
        update = update.col_expr(page::Column::NotFound, Expr::value(not_found));
    }

    let result = update
        .filter(page::Column::Id.eq(id))
        .filter(page::Column::Version.eq(expected_version))
        .filter(page::Column::DeletedAt.is_null())
        .exec(conn)
        .await?;
    check_swapped(result.rows_affected, || format!("Page {}", id))?;

    get_active_page(conn, id).await
}

/// Set or clear the page's completion date.
pub async fn set_complete_date<C: ConnectionTrait>(
    conn: &C,
    id: Uuid,
    expected_version: i32,
    complete_date: Option<NaiveDate>,
) -> AppResult<page::Model> {
    get_active_page(conn, id).await?;

    let result = Page::update_many()
        .col_expr(page::Column::CompleteDate, Expr::value(complete_date))
        .col_expr(page::Column::Version, Expr::value(next_version(expected_version)?))
        .col_expr(page::Column::UpdatedAt, Expr::value(Utc::now()))
        .filter(page::Column::Id.eq(id))
        .filter(page::Column::Version.eq(expected_version))
        .filter(page::Column::DeletedAt.is_null())
        .exec(conn)
        .await?;
    check_swapped(result.rows_affected, || format!("Page {}", id))?;

    get_active_page(conn, id).await
}

/// Soft-delete a page if `expected_version` is still current.
pub async fn soft_delete_page<C: ConnectionTrait>(
    conn: &C,
    id: Uuid,
    expected_version: i32,
) -> AppResult<page::Model> {
    get_active_page(conn, id).await?;

    let now = Utc::now();
    let result = Page::update_many()
        .col_expr(page::Column::DeletedAt, Expr::value(Some(now)))
        .col_expr(page::Column::Version, Expr::value(next_version(expected_version)?))
        .col_expr(page::Column::UpdatedAt, Expr::value(now))
        .filter(page::Column::Id.eq(id))
        .filter(page::Column::Version.eq(expected_version))
        .filter(page::Column::DeletedAt.is_null())
        .exec(conn)
        .await?;
    check_swapped(result.rows_affected, || format!("Page {}", id))?;

    find_page(conn, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Page {}", id)))
}

/// Bring a soft-deleted page back if `expected_version` is still current.
pub async fn restore_page<C: ConnectionTrait>(
    conn: &C,
    id: Uuid,
    expected_version: i32,
) -> AppResult<page::Model> {
    let page = find_page(conn, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Page {}", id)))?;
    if page.deleted_at.is_none() {
        return Err(crate::error::PreconditionFailure::InvalidState(format!(
            "Page {} is not deleted",
            id
        ))
        .into());
    }

    let result = Page::update_many()
        .col_expr(page::Column::DeletedAt, Expr::value(Option::<chrono::DateTime<Utc>>::None))
        .col_expr(page::Column::Version, Expr::value(next_version(expected_version)?))
        .col_expr(page::Column::UpdatedAt, Expr::value(Utc::now()))
        .filter(page::Column::Id.eq(id))
        .filter(page::Column::Version.eq(expected_version))
        .filter(page::Column::DeletedAt.is_not_null())
        .exec(conn)
        .await?;
    check_swapped(result.rows_affected, || format!("Page {}", id))?;

    get_active_page(conn, id).await
}
