use crate::error::ApiError;
use crate::http_client::{ApiRequest, JsonTransport};
use crate::models::{
    Envelope, HealthStatus, LoginRequest, LoginSession, NamedStockData, StockData, StockInfo,
    StockMatch, StockName, StrategyReport, StrategyRequest, DATE_FORMAT,
};
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

/// Typed access to the stock DCA analysis backend.
pub struct StockApi<T> {
    transport: T,
}

impl<T: JsonTransport> StockApi<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub async fn health(&self) -> Result<HealthStatus, ApiError> {
        self.call(ApiRequest::get("/api/health")).await
    }

    pub async fn stock_names(&self) -> Result<Vec<String>, ApiError> {
        self.call(ApiRequest::get("/api/stock_names")).await
    }

    pub async fn stock_by_name(
        &self,
        name: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<NamedStockData>, ApiError> {
        let name = required("name", name)?;
        let request = ApiRequest::get("/api/stock_by_name")
            .query("name", name)
            .query("start", start.format(DATE_FORMAT).to_string())
            .query("end", end.format(DATE_FORMAT).to_string());

        let matches: Vec<NamedStockData> = self.call(request).await?;
        for matched in matches.iter().filter(|m| m.stock_data.code != 200) {
            warn!(
                "No price data for {} ({}): {}",
                matched.name, matched.code, matched.stock_data.msg
            );
        }
        Ok(matches)
    }

    pub async fn stock_by_letter(&self, letter: &str) -> Result<Vec<StockMatch>, ApiError> {
        let letter = required("letter", letter)?;
        self.call(ApiRequest::get("/api/stock_by_letter").query("letter", letter))
            .await
    }

    pub async fn stock_name_by_code(&self, code: &str) -> Result<StockName, ApiError> {
        let code = required("code", code)?;
        self.call(ApiRequest::get("/api/stock_name_by_code").query("code", code))
            .await
    }

    /// Looks a stock up by code, name or pinyin initials.
    pub async fn stock_info(&self, input: &str) -> Result<StockInfo, ApiError> {
        let input = required("input", input)?;
        self.call(ApiRequest::get("/api/stock_info").query("input", input))
            .await
    }

    pub async fn stock_data(
        &self,
        code: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<StockData, ApiError> {
        let code = required("code", code)?;
        let request = ApiRequest::get("/api/stock_data")
            .query("code", code)
            .query("start_date", start_date.format(DATE_FORMAT).to_string())
            .query("end_date", end_date.format(DATE_FORMAT).to_string());

        debug!("Fetching stock data for {} ({} to {})", code, start_date, end_date);
        let value = self.transport.send_json(request).await?;
        let data: StockData = serde_json::from_value(value)?;

        data.into_result().inspect_err(|e| {
            warn!("Stock data request for {} failed: {}", code, e);
        })
    }

    /// Runs a backtest. A report with `success == false` is returned rather
    /// than turned into an error, since its logs explain the failure. That
    /// includes an unknown or empty stock code.
    pub async fn analyze_strategy(
        &self,
        params: &StrategyRequest,
    ) -> Result<StrategyReport, ApiError> {
        let body = serde_json::to_value(params)?;

        debug!("Requesting strategy analysis for {}", params.stock_code);
        let value = self
            .transport
            .send_json(ApiRequest::post("/api/analyze_strategy").json(body))
            .await?;
        let report: StrategyReport = serde_json::from_value(value)?;

        if !report.success {
            warn!(
                "Strategy analysis for {} unsuccessful: {}",
                params.stock_code,
                report.error.as_deref().unwrap_or("no error message")
            );
        }
        Ok(report)
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<LoginSession, ApiError> {
        let body = serde_json::to_value(LoginRequest { username, password })?;

        self.call(ApiRequest::post("/api/login").json(body)).await
    }

    async fn call<R: DeserializeOwned>(&self, request: ApiRequest) -> Result<R, ApiError> {
        let path = request.path.clone();
        debug!("{} {}", request.method, path);

        let value = self.transport.send_json(request).await?;
        let envelope: Envelope<Value> = serde_json::from_value(value)?;
        let data = envelope.into_result().inspect_err(|e| {
            warn!("Backend rejected {}: {}", path, e);
        })?;

        Ok(serde_json::from_value(data)?)
    }
}

fn required<'a>(field: &str, value: &'a str) -> Result<&'a str, ApiError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ApiError::InvalidInput(format!("{} must not be empty", field)));
    }
    Ok(trimmed)
}
