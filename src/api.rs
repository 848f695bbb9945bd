use anyhow::Result;
use reqwest::StatusCode;
use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::config::AppConfig;
use crate::http_client::http_client;
use crate::model::{
    AnalysisResult, AnalyzeRequest, BetStats, HealthStatus, ResultUpdate, SaveBetRequest,
    SavedBet, TeamHit,
};

/// Failures talking to the analysis service.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("connection error: {0}")]
    Transport(String),
    #[error("http {0}")]
    Status(StatusCode),
    #[error("unexpected response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            return ApiError::Status(status);
        }
        if err.is_decode() {
            return ApiError::Decode(err.to_string());
        }
        ApiError::Transport(err.to_string())
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Everything the client asks of the remote service.
pub trait AnalysisService: Send {
    fn analyze(&self, req: &AnalyzeRequest) -> ApiResult<AnalysisResult>;
    fn save_bet(&self, req: &SaveBetRequest) -> ApiResult<()>;
    fn list_bets(&self) -> ApiResult<Vec<SavedBet>>;
    fn get_bet(&self, id: i64) -> ApiResult<SavedBet>;
    fn update_result(&self, id: i64, update: &ResultUpdate) -> ApiResult<()>;
    fn stats(&self) -> ApiResult<BetStats>;
    fn search_teams(&self, query: &str) -> ApiResult<Vec<TeamHit>>;
    fn health(&self) -> ApiResult<HealthStatus>;
}

pub struct ApiClient {
    client: Client,
    config: AppConfig,
}

impl ApiClient {
    pub fn new(config: AppConfig) -> Result<Self> {
        let client = http_client(&config)?;
        Ok(Self { client, config })
    }

    pub fn base_url(&self) -> &str {
        &self.config.api_url
    }

    fn get(&self, path: &str) -> RequestBuilder {
        self.client.get(self.config.endpoint(path))
    }

    fn post(&self, path: &str) -> RequestBuilder {
        self.client.post(self.config.endpoint(path))
    }
}

impl AnalysisService for ApiClient {
    fn analyze(&self, req: &AnalyzeRequest) -> ApiResult<AnalysisResult> {
        let resp = send_ok(self.post("/analyze").json(req))?;
        read_json(resp, parse_analysis_json)
    }

    fn save_bet(&self, req: &SaveBetRequest) -> ApiResult<()> {
        send_ok(self.post("/save-bet").json(req))?;
        Ok(())
    }

    fn list_bets(&self) -> ApiResult<Vec<SavedBet>> {
        let resp = send_ok(self.get("/bets"))?;
        read_json(resp, parse_bets_json)
    }

    fn get_bet(&self, id: i64) -> ApiResult<SavedBet> {
        let resp = send_ok(self.get(&format!("/bets/{id}")))?;
        read_json(resp, parse_json)
    }

    fn update_result(&self, id: i64, update: &ResultUpdate) -> ApiResult<()> {
        let url = self.config.endpoint(&format!("/bets/{id}/result"));
        send_ok(self.client.put(url).json(update))?;
        Ok(())
    }

    fn stats(&self) -> ApiResult<BetStats> {
        let resp = send_ok(self.get("/stats"))?;
        read_json(resp, parse_json)
    }

    fn search_teams(&self, query: &str) -> ApiResult<Vec<TeamHit>> {
        let resp = send_ok(self.get("/teams/search").query(&[("q", query)]))?;
        read_json(resp, parse_json)
    }

    fn health(&self) -> ApiResult<HealthStatus> {
        let resp = send_ok(self.get("/health"))?;
        read_json(resp, parse_json)
    }
}

fn send_ok(req: RequestBuilder) -> ApiResult<Response> {
    let resp = req.send()?;
    let status = resp.status();
    if !status.is_success() {
        return Err(ApiError::Status(status));
    }
    Ok(resp)
}

fn read_json<T>(resp: Response, parse: fn(&str) -> ApiResult<T>) -> ApiResult<T> {
    let body = resp.text()?;
    parse(&body)
}

fn parse_json<T: DeserializeOwned>(raw: &str) -> ApiResult<T> {
    serde_json::from_str(raw).map_err(|err| ApiError::Decode(err.to_string()))
}

pub fn parse_analysis_json(raw: &str) -> ApiResult<AnalysisResult> {
    parse_json(raw)
}

/// `null` from the service is treated as an empty history.
pub fn parse_bets_json(raw: &str) -> ApiResult<Vec<SavedBet>> {
    let bets: Option<Vec<SavedBet>> = parse_json(raw)?;
    Ok(bets.unwrap_or_default())
}
