use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::AppState;
use crate::domain::{Address, PositionSnapshot};
use crate::error::AppError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionsQuery {
    pub user: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionsResponse {
    pub positions: Vec<PositionDto>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionDto {
    pub coin: String,
    pub direction: String,
    pub size: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry_price: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position_value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unrealized_pnl: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub leverage: Option<u32>,
}

pub async fn get_positions(
    Query(params): Query<PositionsQuery>,
    State(state): State<AppState>,
) -> Result<Json<PositionsResponse>, AppError> {
    let user = Address::from_str(&params.user)
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let positions = state.service.current_positions(&user).await?;

    Ok(Json(PositionsResponse {
        positions: positions.iter().map(position_dto).collect(),
    }))
}

fn position_dto(position: &PositionSnapshot) -> PositionDto {
    let direction = if position.szi.is_negative() {
        "short"
    } else {
        "long"
    };
    PositionDto {
        coin: position.coin.as_str().to_string(),
        direction: direction.to_string(),
        size: position.szi.abs().to_canonical_string(),
        entry_price: position.entry_px.map(|p| p.to_canonical_string()),
        position_value: position.position_value.map(|p| p.to_canonical_string()),
        unrealized_pnl: position.unrealized_pnl.map(|p| p.to_canonical_string()),
        leverage: position.leverage,
    }
}
