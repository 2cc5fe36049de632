//! Gateway client for column configs, dynamic fields and field values

use contracts::shared::api_error::ApiError;
use contracts::shared::column_settings::{
    ConfigEntry, ConfigType, SaveConfigRequest, SaveConfigResponse,
};
use contracts::shared::dynamic_fields::{DynamicField, DynamicValues, SaveValuesRequest};
use serde_json::Value;

use crate::shared::api_utils::{delete_json, get_json, post_json, put_json};

// ---------- column config ----------

pub async fn get_column_config(
    page_name: &str,
    config_type: ConfigType,
) -> Result<Option<ConfigEntry>, ApiError> {
    get_json(&format!(
        "/api/system/column-config/get?page_name={}&config_type={}",
        page_name,
        config_type.as_str()
    ))
    .await
}

pub async fn save_column_config(
    page_name: &str,
    config_type: ConfigType,
    payload: serde_json::Value,
) -> Result<SaveConfigResponse, ApiError> {
    post_json(
        "/api/system/column-config/save",
        &SaveConfigRequest {
            page_name: page_name.to_string(),
            config_type,
            payload,
        },
    )
    .await
}

pub async fn delete_column_config(
    page_name: &str,
    config_type: ConfigType,
) -> Result<(), ApiError> {
    delete_json::<serde_json::Value>(&format!(
        "/api/system/column-config/delete?page_name={}&config_type={}",
        page_name,
        config_type.as_str()
    ))
    .await?;
    Ok(())
}

// ---------- dynamic field definitions ----------

pub async fn list_dynamic_fields(
    entity: &str,
    page_name: Option<&str>,
) -> Result<Vec<DynamicField>, ApiError> {
    let path = match page_name {
        Some(page) => format!(
            "/api/system/dynamic-fields/{}/fields?page_name={}",
            entity, page
        ),
        None => format!("/api/system/dynamic-fields/{}/fields", entity),
    };
    get_json(&path).await
}

pub async fn create_dynamic_field(
    entity: &str,
    field: &DynamicField,
) -> Result<DynamicField, ApiError> {
    post_json(
        &format!("/api/system/dynamic-fields/{}/fields", entity),
        field,
    )
    .await
}

pub async fn update_dynamic_field(id: &str, field: &DynamicField) -> Result<DynamicField, ApiError> {
    put_json(&format!("/api/system/dynamic-fields/fields/{}", id), field).await
}

pub async fn delete_dynamic_field(id: &str) -> Result<(), ApiError> {
    delete_json::<Value>(&format!("/api/system/dynamic-fields/fields/{}", id)).await?;
    Ok(())
}

// ---------- per-record field values ----------

pub async fn get_field_values(
    entity: &str,
    page_name: &str,
    record_id: &str,
) -> Result<DynamicValues, ApiError> {
    get_json(&format!(
        "/api/system/dynamic-fields/{}/page/{}/{}/values",
        entity, page_name, record_id
    ))
    .await
}

pub async fn save_field_values(
    entity: &str,
    page_name: &str,
    record_id: &str,
    values: serde_json::Map<String, Value>,
) -> Result<DynamicValues, ApiError> {
    post_json(
        &format!(
            "/api/system/dynamic-fields/{}/page/{}/{}/values",
            entity, page_name, record_id
        ),
        &SaveValuesRequest { values },
    )
    .await
}

// ---------- business records ----------

/// Record rows for the list page; only bag types have a backing table so far,
/// the other entities render an empty list until their CRUD lands
pub async fn list_records(entity: &str) -> Result<Vec<serde_json::Map<String, Value>>, ApiError> {
    match entity {
        "a005_bag_type" => get_json("/api/bag_type").await,
        _ => Ok(Vec::new()),
    }
}
