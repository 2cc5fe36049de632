//! Демонстрационный справочник "Типы пакетов"
//!
//! Один бизнес-модуль, на котором виден полный путь движка: записи
//! отдаются как JSON-объекты с подмешанными значениями динамических
//! полей, так что список на фронте рендерит любые колонки без
//! перекомпиляции.

use axum::extract::Path;
use axum::Json;
use chrono::Utc;
use contracts::domain::a005_bag_type::ENTITY;
use sea_orm::{ConnectionTrait, DatabaseBackend, QueryResult, Statement};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

use crate::error::{AppError, AppResult};
use crate::shared::data::db::get_connection;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BagTypeDto {
    #[serde(default)]
    pub id: Option<String>,
    pub code: String,
    pub description: String,
    #[serde(default)]
    pub bag_kind: String,
    #[serde(default)]
    pub material_category: String,
    #[serde(default)]
    pub width_mm: i64,
    #[serde(default)]
    pub height_mm: i64,
    #[serde(default)]
    pub gusset_mm: i64,
    #[serde(default)]
    pub film_thickness_um: f64,
    #[serde(default)]
    pub print_colors: i64,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub comment: Option<String>,
}

fn default_true() -> bool {
    true
}

fn record_from_row(row: &QueryResult) -> AppResult<Map<String, Value>> {
    let mut record = Map::new();
    let get_string = |col: &str| -> String {
        row.try_get::<String>("", col).unwrap_or_default()
    };

    record.insert("id".into(), Value::String(get_string("id")));
    record.insert("code".into(), Value::String(get_string("code")));
    record.insert("description".into(), Value::String(get_string("description")));
    record.insert("bag_kind".into(), Value::String(get_string("bag_kind")));
    record.insert(
        "material_category".into(),
        Value::String(get_string("material_category")),
    );
    for col in ["width_mm", "height_mm", "gusset_mm", "print_colors"] {
        let n = row.try_get::<i64>("", col).unwrap_or(0);
        record.insert(col.into(), Value::from(n));
    }
    let thickness = row.try_get::<f64>("", "film_thickness_um").unwrap_or(0.0);
    record.insert("film_thickness_um".into(), Value::from(thickness));
    let is_active = row.try_get::<i32>("", "is_active").map(|v| v != 0).unwrap_or(true);
    record.insert("is_active".into(), Value::Bool(is_active));
    record.insert(
        "comment".into(),
        row.try_get::<Option<String>>("", "comment")
            .ok()
            .flatten()
            .map(Value::String)
            .unwrap_or(Value::Null),
    );
    record.insert("created_at".into(), Value::String(get_string("created_at")));
    Ok(record)
}

/// GET /api/bag_type
pub async fn list_all() -> AppResult<Json<Vec<Map<String, Value>>>> {
    let conn = get_connection();

    let rows = conn
        .query_all(Statement::from_string(
            DatabaseBackend::Sqlite,
            "SELECT * FROM a005_bag_type ORDER BY code".to_string(),
        ))
        .await?;

    // значения динамических полей подтягиваем одним запросом
    let value_rows = conn
        .query_all(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "SELECT record_id, values_json FROM sys_dynamic_field_value WHERE entity = ?",
            [ENTITY.into()],
        ))
        .await?;

    let mut dynamic_by_record: HashMap<String, Map<String, Value>> = HashMap::new();
    for row in &value_rows {
        let record_id: String = row
            .try_get("", "record_id")
            .map_err(|e| AppError::Other(e.into()))?;
        let json: String = row
            .try_get("", "values_json")
            .map_err(|e| AppError::Other(e.into()))?;
        let values: Map<String, Value> = serde_json::from_str(&json).unwrap_or_default();
        dynamic_by_record.entry(record_id).or_default().extend(values);
    }

    let mut records = Vec::with_capacity(rows.len());
    for row in &rows {
        let mut record = record_from_row(row)?;
        let id = record
            .get("id")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string();
        if let Some(values) = dynamic_by_record.remove(&id) {
            for (key, value) in values {
                // базовые колонки динамикой не перекрываем
                record.entry(key).or_insert(value);
            }
        }
        records.push(record);
    }

    Ok(Json(records))
}

/// POST /api/bag_type
pub async fn upsert(Json(dto): Json<BagTypeDto>) -> AppResult<Json<Value>> {
    if dto.code.trim().is_empty() || dto.description.trim().is_empty() {
        return Err(AppError::Validation(
            "артикул и наименование обязательны".into(),
        ));
    }

    let conn = get_connection();
    let now = Utc::now().to_rfc3339();

    match &dto.id {
        Some(id) => {
            let result = conn
                .execute(Statement::from_sql_and_values(
                    DatabaseBackend::Sqlite,
                    "UPDATE a005_bag_type SET
                         code = ?, description = ?, bag_kind = ?, material_category = ?,
                         width_mm = ?, height_mm = ?, gusset_mm = ?, film_thickness_um = ?,
                         print_colors = ?, is_active = ?, comment = ?, updated_at = ?
                     WHERE id = ?",
                    [
                        dto.code.clone().into(),
                        dto.description.clone().into(),
                        dto.bag_kind.clone().into(),
                        dto.material_category.clone().into(),
                        dto.width_mm.into(),
                        dto.height_mm.into(),
                        dto.gusset_mm.into(),
                        dto.film_thickness_um.into(),
                        dto.print_colors.into(),
                        (dto.is_active as i32).into(),
                        dto.comment.clone().into(),
                        now.into(),
                        id.clone().into(),
                    ],
                ))
                .await?;
            if result.rows_affected() == 0 {
                return Err(AppError::NotFound(format!("тип пакета {} не найден", id)));
            }
            Ok(Json(serde_json::json!({ "id": id })))
        }
        None => {
            let id = uuid::Uuid::new_v4().to_string();
            conn.execute(Statement::from_sql_and_values(
                DatabaseBackend::Sqlite,
                "INSERT INTO a005_bag_type
                     (id, code, description, bag_kind, material_category, width_mm, height_mm,
                      gusset_mm, film_thickness_um, print_colors, is_active, comment,
                      created_at, updated_at)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
                [
                    id.clone().into(),
                    dto.code.clone().into(),
                    dto.description.clone().into(),
                    dto.bag_kind.clone().into(),
                    dto.material_category.clone().into(),
                    dto.width_mm.into(),
                    dto.height_mm.into(),
                    dto.gusset_mm.into(),
                    dto.film_thickness_um.into(),
                    dto.print_colors.into(),
                    (dto.is_active as i32).into(),
                    dto.comment.clone().into(),
                    now.clone().into(),
                    now.into(),
                ],
            ))
            .await?;
            Ok(Json(serde_json::json!({ "id": id })))
        }
    }
}

/// DELETE /api/bag_type/:id
pub async fn delete(Path(id): Path<String>) -> AppResult<Json<Value>> {
    let conn = get_connection();

    let result = conn
        .execute(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "DELETE FROM a005_bag_type WHERE id = ?",
            [id.clone().into()],
        ))
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("тип пакета {} не найден", id)));
    }

    // вместе с записью уходят и её динамические значения
    conn.execute(Statement::from_sql_and_values(
        DatabaseBackend::Sqlite,
        "DELETE FROM sys_dynamic_field_value WHERE entity = ? AND record_id = ?",
        [ENTITY.into(), id.into()],
    ))
    .await?;

    Ok(Json(serde_json::json!({ "success": true })))
}
