//! Column configuration storage per `(page_name, config_type)`
//!
//! One JSON blob per key, last write wins. Save normalizes the payload
//! through the typed parse helpers, so junk entries never reach the
//! database.

use axum::extract::Query;
use axum::Json;
use chrono::Utc;
use contracts::shared::column_settings::{
    column_config_payload, column_order_payload, parse_column_config, parse_column_order,
    ConfigEntry, ConfigType, GetConfigQuery, SaveConfigRequest, SaveConfigResponse,
};
use contracts::shared::fields::{build_field_set, prune_config, prune_order, FieldDescriptor};
use sea_orm::{ConnectionTrait, DatabaseBackend, Statement};
use serde_json::Value;

use crate::error::{AppError, AppResult};
use crate::handlers::dynamic_fields::field_from_row;
use crate::shared::data::db::get_connection;

/// Full field registry of a list page, or `None` when the page key is not
/// an entity (such pages keep their blobs as sent)
async fn page_registry(page_name: &str) -> AppResult<Option<Vec<FieldDescriptor>>> {
    let Some(static_fields) = contracts::domain::static_fields(page_name) else {
        return Ok(None);
    };
    let conn = get_connection();
    let rows = conn
        .query_all(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "SELECT * FROM sys_dynamic_field WHERE entity = ? ORDER BY display_order, created_at",
            [page_name.into()],
        ))
        .await?;
    let mut dynamic = Vec::with_capacity(rows.len());
    for row in &rows {
        if let Some(descriptor) = field_from_row(row)?.descriptor() {
            dynamic.push(descriptor);
        }
    }
    Ok(Some(build_field_set(&static_fields, &dynamic)))
}

/// GET /api/system/column-config/get
pub async fn get_config(Query(query): Query<GetConfigQuery>) -> AppResult<Json<Option<ConfigEntry>>> {
    let conn = get_connection();

    let row = conn
        .query_one(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "SELECT settings_json, updated_at FROM sys_column_config
             WHERE page_name = ? AND config_type = ?",
            [
                query.page_name.clone().into(),
                query.config_type.as_str().into(),
            ],
        ))
        .await?;

    let Some(row) = row else {
        return Ok(Json(None));
    };

    let settings_json: String = row
        .try_get("", "settings_json")
        .map_err(|e| AppError::Other(e.into()))?;
    let updated_at: String = row
        .try_get("", "updated_at")
        .map_err(|e| AppError::Other(e.into()))?;
    let payload: Value = serde_json::from_str(&settings_json)
        .map_err(|e| AppError::Other(anyhow::anyhow!("stored blob corrupt: {}", e)))?;

    Ok(Json(Some(ConfigEntry {
        page_name: query.page_name,
        config_type: query.config_type,
        payload,
        updated_at,
    })))
}

/// POST /api/system/column-config/save (behind require_admin)
pub async fn save_config(Json(request): Json<SaveConfigRequest>) -> AppResult<Json<SaveConfigResponse>> {
    if request.page_name.trim().is_empty() {
        return Err(AppError::Validation("page_name не задан".into()));
    }

    // normalize: only the typed shape survives the round-trip, and names
    // missing from the page's field registry are dropped
    let registry = page_registry(&request.page_name).await?;
    let stored = match request.config_type {
        ConfigType::ColumnConfig => {
            let mut config = parse_column_config(&request.payload);
            if let Some(fields) = &registry {
                prune_config(&mut config, fields);
            }
            column_config_payload(&config)
        }
        ConfigType::ColumnOrder => {
            let mut order = parse_column_order(&request.payload);
            if let Some(fields) = &registry {
                prune_order(&mut order, fields);
            }
            column_order_payload(&order)
        }
    };

    let conn = get_connection();
    let settings_json = serde_json::to_string(&stored)
        .map_err(|e| AppError::Other(anyhow::anyhow!("serialize failed: {}", e)))?;

    conn.execute(Statement::from_sql_and_values(
        DatabaseBackend::Sqlite,
        "INSERT INTO sys_column_config (page_name, config_type, settings_json, updated_at)
         VALUES (?, ?, ?, ?)
         ON CONFLICT(page_name, config_type) DO UPDATE SET
             settings_json = excluded.settings_json,
             updated_at = excluded.updated_at",
        [
            request.page_name.clone().into(),
            request.config_type.as_str().into(),
            settings_json.into(),
            Utc::now().to_rfc3339().into(),
        ],
    ))
    .await?;

    tracing::info!(
        "column config saved: {} / {}",
        request.page_name,
        request.config_type.as_str()
    );
    Ok(Json(SaveConfigResponse {
        success: true,
        stored,
    }))
}

/// DELETE /api/system/column-config/delete (behind require_admin)
pub async fn delete_config(Query(query): Query<GetConfigQuery>) -> AppResult<Json<SaveConfigResponse>> {
    let conn = get_connection();

    let result = conn
        .execute(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "DELETE FROM sys_column_config WHERE page_name = ? AND config_type = ?",
            [
                query.page_name.clone().into(),
                query.config_type.as_str().into(),
            ],
        ))
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!(
            "настройка {} / {} не найдена",
            query.page_name,
            query.config_type.as_str()
        )));
    }

    Ok(Json(SaveConfigResponse {
        success: true,
        stored: Value::Null,
    }))
}

/// GET /api/system/column-config/list
pub async fn list_configs() -> AppResult<Json<Vec<ConfigEntry>>> {
    let conn = get_connection();

    let rows = conn
        .query_all(Statement::from_string(
            DatabaseBackend::Sqlite,
            "SELECT page_name, config_type, settings_json, updated_at
             FROM sys_column_config ORDER BY page_name, config_type"
                .to_string(),
        ))
        .await?;

    let mut entries = Vec::with_capacity(rows.len());
    for row in rows {
        let page_name: String = row
            .try_get("", "page_name")
            .map_err(|e| AppError::Other(e.into()))?;
        let config_type_raw: String = row
            .try_get("", "config_type")
            .map_err(|e| AppError::Other(e.into()))?;
        let Some(config_type) = ConfigType::from_str(&config_type_raw) else {
            tracing::warn!("skipping row with unknown config_type {}", config_type_raw);
            continue;
        };
        let settings_json: String = row
            .try_get("", "settings_json")
            .map_err(|e| AppError::Other(e.into()))?;
        let updated_at: String = row
            .try_get("", "updated_at")
            .map_err(|e| AppError::Other(e.into()))?;

        entries.push(ConfigEntry {
            page_name,
            config_type,
            payload: serde_json::from_str(&settings_json).unwrap_or(Value::Null),
            updated_at,
        });
    }

    Ok(Json(entries))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // одна инициализация на процесс, поэтому весь путь сохранить-прочитать
    // проверяется в одном тесте
    #[tokio::test]
    async fn test_save_then_get_returns_stored_blob() {
        let db_path = std::env::temp_dir().join(format!(
            "column_config_test_{}.db",
            uuid::Uuid::new_v4()
        ));
        crate::shared::data::db::initialize_database(db_path.to_str())
            .await
            .unwrap();

        // "ghost" отсутствует в реестре полей a005_bag_type и должен быть
        // отброшен при сохранении; нечисловое значение "junk" — при
        // нормализации
        let saved = save_config(Json(SaveConfigRequest {
            page_name: "a005_bag_type".to_string(),
            config_type: ConfigType::ColumnConfig,
            payload: json!({"code": false, "ghost": false, "junk": "x"}),
        }))
        .await
        .unwrap();
        assert_eq!(saved.0.stored, json!({"code": false}));

        let entry = get_config(Query(GetConfigQuery {
            page_name: "a005_bag_type".to_string(),
            config_type: ConfigType::ColumnConfig,
        }))
        .await
        .unwrap()
        .0
        .unwrap();
        assert_eq!(entry.payload, saved.0.stored);

        let saved = save_config(Json(SaveConfigRequest {
            page_name: "a005_bag_type".to_string(),
            config_type: ConfigType::ColumnOrder,
            payload: json!(["description", "ghost", "code", "code"]),
        }))
        .await
        .unwrap();
        assert_eq!(saved.0.stored, json!(["description", "code"]));

        let entry = get_config(Query(GetConfigQuery {
            page_name: "a005_bag_type".to_string(),
            config_type: ConfigType::ColumnOrder,
        }))
        .await
        .unwrap()
        .0
        .unwrap();
        assert_eq!(entry.payload, saved.0.stored);

        // страница вне реестра сущностей: blob нормализуется, но не режется
        let saved = save_config(Json(SaveConfigRequest {
            page_name: "custom_report".to_string(),
            config_type: ConfigType::ColumnConfig,
            payload: json!({"whatever": true, "broken": 3}),
        }))
        .await
        .unwrap();
        assert_eq!(saved.0.stored, json!({"whatever": true}));

        let entry = get_config(Query(GetConfigQuery {
            page_name: "custom_report".to_string(),
            config_type: ConfigType::ColumnConfig,
        }))
        .await
        .unwrap()
        .0
        .unwrap();
        assert_eq!(entry.payload, saved.0.stored);

        let _ = std::fs::remove_file(&db_path);
    }
}
