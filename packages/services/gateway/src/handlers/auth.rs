//! 인증 티어 핸들러
//!
//! `GET /{operation}/{userid}` + `{"Password": ...}` 본문으로 토큰을 발급합니다.
//! 자격 증명이 맞지 않으면 이유를 밝히지 않고 404를 반환합니다.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::HeaderMap,
    Json,
};
use serde::Serialize;
use tg_core::auth::{TokenService, PASSWORD_PROPERTY};

use super::path::{json_body, require_segments, split_path};
use crate::error::{GatewayError, Result};
use crate::state::AppState;

pub const GET_READ_TOKEN: &str = "GetReadToken";
pub const GET_UPDATE_TOKEN: &str = "GetUpdateToken";
pub const GET_UPDATE_DATA: &str = "GetUpdateData";

/// 토큰 응답
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,

    #[serde(rename = "DataPartition", skip_serializing_if = "Option::is_none")]
    pub data_partition: Option<String>,

    #[serde(rename = "DataRow", skip_serializing_if = "Option::is_none")]
    pub data_row: Option<String>,
}

impl TokenResponse {
    fn token_only(token: String) -> Self {
        Self {
            token,
            data_partition: None,
            data_row: None,
        }
    }
}

/// GET: 토큰 발급
pub async fn handle_get(
    State(state): State<Arc<AppState>>,
    path: Option<Path<String>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<TokenResponse>> {
    let segments = path.map(|Path(p)| split_path(&p)).unwrap_or_default();
    require_segments(&segments, 2, "request")?;
    let (operation, user_id) = (segments[0].as_str(), segments[1].as_str());

    let credentials = json_body(&headers, &body)?;
    let password = credentials.get(PASSWORD_PROPERTY).map(String::as_str);

    let service = TokenService::new(
        &state.tables,
        &state.config.auth_table,
        &state.config.data_table,
    );

    let response = match operation {
        GET_READ_TOKEN => {
            let token = service.get_read_token(user_id, password).await?;
            TokenResponse::token_only(token.signature)
        }
        GET_UPDATE_TOKEN => {
            let token = service.get_update_token(user_id, password).await?;
            TokenResponse::token_only(token.signature)
        }
        GET_UPDATE_DATA => {
            let grant = service.get_update_data(user_id, password).await?;
            TokenResponse {
                token: grant.token.signature,
                data_partition: Some(grant.location.partition),
                data_row: Some(grant.location.row),
            }
        }
        other => {
            return Err(GatewayError::bad_request(format!(
                "Unknown operation: {}",
                other
            )))
        }
    };

    tracing::info!(operation, user = user_id, "token issued");
    Ok(Json(response))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_only_skips_location() {
        let json = serde_json::to_value(TokenResponse::token_only("v4.local.x".into())).unwrap();
        assert_eq!(json, serde_json::json!({"token": "v4.local.x"}));
    }

    #[test]
    fn test_update_data_field_names() {
        let response = TokenResponse {
            token: "t".into(),
            data_partition: Some("P1".into()),
            data_row: Some("R1".into()),
        };
        let json = serde_json::to_value(response).unwrap();
        assert_eq!(json["DataPartition"], "P1");
        assert_eq!(json["DataRow"], "R1");
    }
}
