//! Database queries for WCAG definitions.

use chrono::{NaiveDate, Utc};
use sea_orm::{ActiveModelTrait, ConnectionTrait, EntityTrait, QueryOrder, Set};
use uuid::Uuid;

use crate::entity::wcag_definition::{self, ActiveModel, Entity as WcagDefinition};
use crate::error::{AppError, AppResult};
use crate::models::{NewWcagDefinition, UpdateWcagDefinitionRequest};

/// Append a definition to the reference set.
pub async fn insert_definition<C: ConnectionTrait>(
    conn: &C,
    definition: &NewWcagDefinition,
) -> AppResult<wcag_definition::Model> {
    let model = ActiveModel {
        id: Set(Uuid::now_v7()),
        test_type: Set(definition.test_type.as_str().to_string()),
        sub_type: Set(definition.sub_type.as_str().to_string()),
        name: Set(definition.name.clone()),
        description: Set(definition.description.clone()),
        url: Set(definition.url.clone()),
        date_start: Set(definition.date_start),
        date_end: Set(definition.date_end),
        created_at: Set(Utc::now()),
    };

    Ok(model.insert(conn).await?)
}

/// All definitions in the order they were added.
pub async fn list_definitions<C: ConnectionTrait>(
    conn: &C,
) -> AppResult<Vec<wcag_definition::Model>> {
    Ok(WcagDefinition::find()
        .order_by_asc(wcag_definition::Column::CreatedAt)
        .order_by_asc(wcag_definition::Column::Id)
        .all(conn)
        .await?)
}

/// Definitions whose validity window contains `date`.
pub async fn list_valid_on<C: ConnectionTrait>(
    conn: &C,
    date: NaiveDate,
) -> AppResult<Vec<wcag_definition::Model>> {
    Ok(list_definitions(conn)
        .await?
        .into_iter()
        .filter(|d| d.is_valid_on(date))
        .collect())
}

/// Get a definition or fail with `NotFound`.
pub async fn get_definition<C: ConnectionTrait>(
    conn: &C,
    id: Uuid,
) -> AppResult<wcag_definition::Model> {
    WcagDefinition::find_by_id(id)
        .one(conn)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("WCAG definition {}", id)))
}

/// Overwrite the editable fields of a definition.
pub async fn update_definition<C: ConnectionTrait>(
    conn: &C,
    id: Uuid,
    changes: &UpdateWcagDefinitionRequest,
) -> AppResult<wcag_definition::Model> {
    let mut model: ActiveModel = get_definition(conn, id).await?.into();
    if let Some(sub_type) = changes.sub_type {
        model.sub_type = Set(sub_type.as_str().to_string());
    }
    model.name = Set(changes.name.clone());
    model.description = Set(changes.description.clone());
    model.url = Set(changes.url.clone());
    model.date_start = Set(changes.date_start);
    model.date_end = Set(changes.date_end);

    Ok(model.update(conn).await?)
}
