use crate::error::ApiError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// `{"code", "msg", "data"}` wrapper used by most backend routes. Failures
/// arrive with HTTP 200 and a non-200 `code`.
#[derive(Deserialize, Debug, Clone)]
pub struct Envelope<T> {
    pub code: i64,
    #[serde(default)]
    pub msg: String,
    pub data: T,
}

impl<T> Envelope<T> {
    pub fn into_result(self) -> Result<T, ApiError> {
        if self.code == 200 {
            Ok(self.data)
        } else {
            Err(ApiError::Backend {
                code: self.code,
                msg: self.msg,
            })
        }
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct HealthStatus {
    pub time: String,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct StockMatch {
    pub name: String,
    pub code: String,
    #[serde(default)]
    pub first_letter: Option<String>,
    #[serde(default)]
    pub is_hk: bool,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct StockName {
    pub name: String,
    pub code: String,
    #[serde(default)]
    pub is_hk: bool,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct StockInfo {
    pub name: String,
    pub code: String,
    #[serde(default)]
    pub is_hk: bool,
    #[serde(default)]
    pub first_letter: String,
}

/// One trading day as reported by `/api/stock_data`.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct PricePoint {
    #[serde(rename = "日期")]
    pub date: NaiveDate,
    #[serde(rename = "收盘价")]
    pub close: f64,
    #[serde(rename = "PE")]
    pub pe: f64,
    /// Absent for Hong Kong listings.
    #[serde(rename = "每股盈利TTM", default)]
    pub eps_ttm: Option<f64>,
    #[serde(rename = "PE分位点", default)]
    pub pe_quantile: f64,
    #[serde(rename = "备注", default)]
    pub note: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct StockData {
    pub code: i64,
    #[serde(default)]
    pub msg: String,
    #[serde(default)]
    pub data: Vec<PricePoint>,
    #[serde(default)]
    pub stock_name: String,
    #[serde(default)]
    pub stock_code: String,
}

impl StockData {
    pub fn into_result(self) -> Result<Self, ApiError> {
        if self.code == 200 {
            Ok(self)
        } else {
            Err(ApiError::Backend {
                code: self.code,
                msg: self.msg,
            })
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct NamedStockData {
    pub name: String,
    pub code: String,
    #[serde(default)]
    pub is_hk: bool,
    /// Fetched per match; a failed fetch still arrives here with a non-200
    /// `code` and no rows. Check it with [`StockData::into_result`].
    pub stock_data: StockData,
}

/// Parameters of a DCA backtest. Unset fields are omitted so the backend
/// applies its own defaults.
#[derive(Serialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StrategyRequest {
    pub stock_code: String,
    #[serde(
        rename = "baostockStartDate",
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_date"
    )]
    pub data_start_date: Option<NaiveDate>,
    #[serde(
        rename = "baostockEndDate",
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_date"
    )]
    pub data_end_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none", serialize_with = "serialize_date")]
    pub start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none", serialize_with = "serialize_date")]
    pub end_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial_capital: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invest_amount: Option<f64>,
    /// Percent, e.g. `50.0`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_ratio: Option<f64>,
    /// Percent, e.g. `0.1`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fee_rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pe_lower_quantile: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pe_upper_quantile: Option<f64>,
}

impl StrategyRequest {
    pub fn new(stock_code: impl Into<String>) -> Self {
        Self {
            stock_code: stock_code.into(),
            ..Default::default()
        }
    }
}

fn serialize_date<S>(date: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    match date {
        Some(d) => serializer.collect_str(&d.format(DATE_FORMAT)),
        None => serializer.serialize_none(),
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct StrategyReport {
    pub success: bool,
    #[serde(default)]
    pub logs: Vec<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub result_summary: Option<Value>,
    #[serde(default)]
    pub chart_data: Option<Value>,
    #[serde(default)]
    pub stock_name: Option<String>,
    #[serde(default)]
    pub stock_code: Option<String>,
}

#[derive(Serialize, Debug, Clone)]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct LoginSession {
    pub token: String,
    pub username: String,
}
