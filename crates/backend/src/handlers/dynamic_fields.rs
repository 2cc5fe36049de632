//! CRUD of admin-defined dynamic fields and their per-record values

use axum::extract::{Path, Query};
use axum::Json;
use chrono::Utc;
use contracts::domain::is_known_entity;
use contracts::shared::dynamic_fields::{
    is_valid_field_name, DynamicField, DynamicValues, SaveValuesRequest,
};
use contracts::shared::fields::{formula, FieldKind};
use sea_orm::{ConnectionTrait, DatabaseBackend, QueryResult, Statement};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::shared::data::db::get_connection;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub page_name: Option<String>,
}

pub(crate) fn field_from_row(row: &QueryResult) -> AppResult<DynamicField> {
    let get_string = |col: &str| -> AppResult<String> {
        row.try_get("", col).map_err(|e| AppError::Other(e.into()))
    };
    let kind_raw = get_string("kind")?;
    let kind = FieldKind::from_str(&kind_raw)
        .ok_or_else(|| AppError::Other(anyhow::anyhow!("unknown kind '{}' in storage", kind_raw)))?;
    let options_json = get_string("options_json")?;

    Ok(DynamicField {
        id: Some(get_string("id")?),
        entity: get_string("entity")?,
        page_name: get_string("page_name")?,
        name: get_string("name")?,
        label: get_string("label")?,
        kind,
        required: row.try_get::<i32>("", "required").map(|v| v != 0).unwrap_or(false),
        readonly: row.try_get::<i32>("", "readonly").map(|v| v != 0).unwrap_or(false),
        width: row.try_get::<Option<i32>>("", "width").ok().flatten().map(|w| w as u32),
        display_order: row.try_get::<i32>("", "display_order").unwrap_or(0),
        options: serde_json::from_str(&options_json).unwrap_or_default(),
        calculation_formula: row.try_get::<Option<String>>("", "calculation_formula").ok().flatten(),
    })
}

fn validate_definition(field: &DynamicField) -> AppResult<()> {
    if !is_known_entity(&field.entity) {
        return Err(AppError::Validation(format!(
            "неизвестная сущность '{}'",
            field.entity
        )));
    }
    if !is_valid_field_name(&field.name) {
        return Err(AppError::Validation(
            "имя поля должно соответствовать шаблону [a-z][a-z0-9_]*".into(),
        ));
    }
    if field.label.trim().is_empty() {
        return Err(AppError::Validation("подпись поля обязательна".into()));
    }
    match (&field.kind, &field.calculation_formula) {
        (FieldKind::Calculated, Some(text)) => {
            formula::parse(text).map_err(|e| {
                AppError::Validation(format!("формула не разбирается: {}", e))
            })?;
        }
        (FieldKind::Calculated, None) => {
            return Err(AppError::Validation(
                "для вычисляемого поля нужна формула".into(),
            ));
        }
        _ => {}
    }
    Ok(())
}

/// GET /api/system/dynamic-fields/:entity/fields
pub async fn list_fields(
    Path(entity): Path<String>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<DynamicField>>> {
    if !is_known_entity(&entity) {
        return Err(AppError::NotFound(format!("сущность '{}' не найдена", entity)));
    }
    let conn = get_connection();

    let statement = match &query.page_name {
        Some(page) => Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "SELECT * FROM sys_dynamic_field WHERE entity = ? AND page_name = ?
             ORDER BY display_order, created_at",
            [entity.clone().into(), page.clone().into()],
        ),
        None => Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "SELECT * FROM sys_dynamic_field WHERE entity = ?
             ORDER BY display_order, created_at",
            [entity.clone().into()],
        ),
    };

    let rows = conn.query_all(statement).await?;
    let mut fields = Vec::with_capacity(rows.len());
    for row in &rows {
        fields.push(field_from_row(row)?);
    }
    Ok(Json(fields))
}

/// POST /api/system/dynamic-fields/:entity/fields (behind require_admin)
pub async fn create_field(
    Path(entity): Path<String>,
    Json(mut field): Json<DynamicField>,
) -> AppResult<Json<DynamicField>> {
    field.entity = entity;
    validate_definition(&field)?;

    let conn = get_connection();
    let id = uuid::Uuid::new_v4().to_string();
    let now = Utc::now().to_rfc3339();
    let options_json = serde_json::to_string(&field.options)
        .map_err(|e| AppError::Other(anyhow::anyhow!("serialize options: {}", e)))?;

    let result = conn
        .execute(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "INSERT OR IGNORE INTO sys_dynamic_field
             (id, entity, page_name, name, label, kind, required, readonly, width,
              display_order, options_json, calculation_formula, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            [
                id.clone().into(),
                field.entity.clone().into(),
                field.page_name.clone().into(),
                field.name.clone().into(),
                field.label.clone().into(),
                field.kind.as_str().into(),
                (field.required as i32).into(),
                (field.readonly as i32).into(),
                field.width.map(|w| w as i32).into(),
                field.display_order.into(),
                options_json.into(),
                field.calculation_formula.clone().into(),
                now.clone().into(),
                now.into(),
            ],
        ))
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::Validation(format!(
            "поле '{}' уже существует для этой сущности",
            field.name
        )));
    }

    field.id = Some(id);
    tracing::info!("dynamic field created: {}.{}", field.entity, field.name);
    Ok(Json(field))
}

/// PUT /api/system/dynamic-fields/fields/:id (behind require_admin)
pub async fn update_field(
    Path(id): Path<String>,
    Json(field): Json<DynamicField>,
) -> AppResult<Json<DynamicField>> {
    validate_definition(&field)?;

    let conn = get_connection();
    let options_json = serde_json::to_string(&field.options)
        .map_err(|e| AppError::Other(anyhow::anyhow!("serialize options: {}", e)))?;

    let result = conn
        .execute(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "UPDATE sys_dynamic_field SET
                 page_name = ?, label = ?, kind = ?, required = ?, readonly = ?,
                 width = ?, display_order = ?, options_json = ?,
                 calculation_formula = ?, updated_at = ?
             WHERE id = ?",
            [
                field.page_name.clone().into(),
                field.label.clone().into(),
                field.kind.as_str().into(),
                (field.required as i32).into(),
                (field.readonly as i32).into(),
                field.width.map(|w| w as i32).into(),
                field.display_order.into(),
                options_json.into(),
                field.calculation_formula.clone().into(),
                Utc::now().to_rfc3339().into(),
                id.clone().into(),
            ],
        ))
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("поле {} не найдено", id)));
    }

    let mut updated = field;
    updated.id = Some(id);
    Ok(Json(updated))
}

/// DELETE /api/system/dynamic-fields/fields/:id (behind require_admin)
pub async fn delete_field(Path(id): Path<String>) -> AppResult<Json<serde_json::Value>> {
    let conn = get_connection();

    let result = conn
        .execute(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "DELETE FROM sys_dynamic_field WHERE id = ?",
            [id.clone().into()],
        ))
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("поле {} не найдено", id)));
    }

    Ok(Json(serde_json::json!({ "success": true })))
}

/// GET /api/system/dynamic-fields/:entity/page/:page_name/:record_id/values
pub async fn get_values(
    Path((entity, page_name, record_id)): Path<(String, String, String)>,
) -> AppResult<Json<DynamicValues>> {
    if !is_known_entity(&entity) {
        return Err(AppError::NotFound(format!("сущность '{}' не найдена", entity)));
    }
    let conn = get_connection();

    let row = conn
        .query_one(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "SELECT values_json FROM sys_dynamic_field_value
             WHERE entity = ? AND page_name = ? AND record_id = ?",
            [entity.into(), page_name.into(), record_id.clone().into()],
        ))
        .await?;

    let values = match row {
        Some(row) => {
            let json: String = row
                .try_get("", "values_json")
                .map_err(|e| AppError::Other(e.into()))?;
            serde_json::from_str(&json).unwrap_or_default()
        }
        None => serde_json::Map::new(),
    };

    Ok(Json(DynamicValues { record_id, values }))
}

/// POST /api/system/dynamic-fields/:entity/page/:page_name/:record_id/values
pub async fn save_values(
    Path((entity, page_name, record_id)): Path<(String, String, String)>,
    Json(request): Json<SaveValuesRequest>,
) -> AppResult<Json<DynamicValues>> {
    if !is_known_entity(&entity) {
        return Err(AppError::NotFound(format!("сущность '{}' не найдена", entity)));
    }
    let conn = get_connection();
    let values_json = serde_json::to_string(&request.values)
        .map_err(|e| AppError::Other(anyhow::anyhow!("serialize values: {}", e)))?;

    conn.execute(Statement::from_sql_and_values(
        DatabaseBackend::Sqlite,
        "INSERT INTO sys_dynamic_field_value (entity, page_name, record_id, values_json, updated_at)
         VALUES (?, ?, ?, ?, ?)
         ON CONFLICT(entity, page_name, record_id) DO UPDATE SET
             values_json = excluded.values_json,
             updated_at = excluded.updated_at",
        [
            entity.into(),
            page_name.into(),
            record_id.clone().into(),
            values_json.into(),
            Utc::now().to_rfc3339().into(),
        ],
    ))
    .await?;

    Ok(Json(DynamicValues {
        record_id,
        values: request.values,
    }))
}

/// DELETE /api/system/dynamic-fields/:entity/page/:page_name/:record_id/values
pub async fn delete_values(
    Path((entity, page_name, record_id)): Path<(String, String, String)>,
) -> AppResult<Json<serde_json::Value>> {
    if !is_known_entity(&entity) {
        return Err(AppError::NotFound(format!("сущность '{}' не найдена", entity)));
    }
    let conn = get_connection();

    conn.execute(Statement::from_sql_and_values(
        DatabaseBackend::Sqlite,
        "DELETE FROM sys_dynamic_field_value
         WHERE entity = ? AND page_name = ? AND record_id = ?",
        [entity.into(), page_name.into(), record_id.into()],
    ))
    .await?;

    Ok(Json(serde_json::json!({ "success": true })))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unknown_path() -> Path<(String, String, String)> {
        Path((
            "a999_unknown".to_string(),
            "a999_unknown".to_string(),
            "r1".to_string(),
        ))
    }

    // проверка сущности срабатывает до обращения к базе, поэтому
    // инициализация соединения тут не нужна
    #[tokio::test]
    async fn test_values_endpoints_reject_unknown_entity() {
        let err = get_values(unknown_path()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        let err = delete_values(unknown_path()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        let request = SaveValuesRequest {
            values: serde_json::Map::new(),
        };
        let err = save_values(unknown_path(), Json(request)).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn test_validate_definition_rejects_bad_input() {
        let mut field = DynamicField {
            id: None,
            entity: "a005_bag_type".to_string(),
            page_name: String::new(),
            name: "pallet_qty".to_string(),
            label: "Кол-во на паллете".to_string(),
            kind: FieldKind::Integer,
            required: false,
            readonly: false,
            width: None,
            display_order: 0,
            options: Vec::new(),
            calculation_formula: None,
        };
        assert!(validate_definition(&field).is_ok());

        field.entity = "a999_unknown".to_string();
        assert!(matches!(
            validate_definition(&field).unwrap_err(),
            AppError::Validation(_)
        ));

        field.entity = "a005_bag_type".to_string();
        field.name = "ПлохоеИмя".to_string();
        assert!(matches!(
            validate_definition(&field).unwrap_err(),
            AppError::Validation(_)
        ));

        field.name = "pallet_qty".to_string();
        field.kind = FieldKind::Calculated;
        field.calculation_formula = Some("round(width_mm *".to_string());
        assert!(matches!(
            validate_definition(&field).unwrap_err(),
            AppError::Validation(_)
        ));
    }
}
