use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::AppState;
use crate::domain::{Address, CompletedTrade, OpenTrade};
use crate::error::AppError;
use crate::service::TradeSummary;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradesQuery {
    pub user: String,
    pub include_open: Option<bool>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TradesResponse {
    pub trades: Vec<CompletedTradeDto>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub open_trades: Option<Vec<OpenTradeDto>>,
    pub summary: SummaryDto,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletedTradeDto {
    pub coin: String,
    pub direction: String,
    pub entry_time: i64,
    pub exit_time: i64,
    pub duration: i64,
    pub entry_price: String,
    pub exit_price: String,
    pub size: String,
    pub realized_pnl: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenTradeDto {
    pub coin: String,
    pub direction: String,
    pub size: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry_price: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mark_price: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unrealized_pnl: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryDto {
    pub trade_count: usize,
    pub win_count: usize,
    pub total_realized_pnl: String,
    pub win_rate: String,
    pub avg_pnl: String,
}

pub async fn get_trades(
    Query(params): Query<TradesQuery>,
    State(state): State<AppState>,
) -> Result<Json<TradesResponse>, AppError> {
    let user = Address::from_str(&params.user)
        .map_err(|e| AppError::BadRequest(e.to_string()))?;
    let include_open = params.include_open.unwrap_or(false);

    let history = state.service.trade_history(&user, include_open).await?;

    Ok(Json(TradesResponse {
        trades: history.trades.iter().map(trade_dto).collect(),
        open_trades: history
            .open_trades
            .map(|open| open.iter().map(open_trade_dto).collect()),
        summary: summary_dto(&history.summary),
    }))
}

fn trade_dto(trade: &CompletedTrade) -> CompletedTradeDto {
    CompletedTradeDto {
        coin: trade.coin.as_str().to_string(),
        direction: trade.direction.to_string(),
        entry_time: trade.entry_time_ms.as_i64(),
        exit_time: trade.exit_time_ms.as_i64(),
        duration: trade.duration_ms,
        entry_price: trade.entry_px.to_canonical_string(),
        exit_price: trade.exit_px.to_canonical_string(),
        size: trade.sz.to_canonical_string(),
        realized_pnl: trade.realized_pnl.to_canonical_string(),
    }
}

fn open_trade_dto(open: &OpenTrade) -> OpenTradeDto {
    OpenTradeDto {
        coin: open.coin.as_str().to_string(),
        direction: open.direction.to_string(),
        size: open.sz.to_canonical_string(),
        entry_price: open.entry_px.map(|p| p.to_canonical_string()),
        mark_price: open.mark_px.map(|p| p.to_canonical_string()),
        unrealized_pnl: open.unrealized_pnl.map(|p| p.to_canonical_string()),
    }
}

fn summary_dto(summary: &TradeSummary) -> SummaryDto {
    SummaryDto {
        trade_count: summary.trade_count,
        win_count: summary.win_count,
        total_realized_pnl: summary.total_realized_pnl.to_canonical_string(),
        win_rate: summary.win_rate_pct.to_canonical_string(),
        avg_pnl: summary.avg_realized_pnl.to_canonical_string(),
    }
}
