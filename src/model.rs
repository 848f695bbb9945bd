use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Probabilities and advisory text returned by `POST /analyze`.
///
/// The outcome probabilities are shown as received; nothing here checks that
/// they sum to one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub home_team: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub away_team: Option<String>,
    pub home_win_prob: f64,
    pub draw_prob: f64,
    pub away_win_prob: f64,
    pub over_2_5_prob: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub under_2_5_prob: Option<f64>,
    pub both_teams_score: f64,
    pub detailed_analysis: DetailedAnalysis,
    pub recommendation: String,
    pub risk_level: String,
    /// Fields this client does not display, sent back untouched on save.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AnalysisResult {
    // Derived from over 2.5; the echoed `under_2_5_prob` is not used for display.
    pub fn under_2_5(&self) -> f64 {
        1.0 - self.over_2_5_prob
    }
}

/// Supporting statistics. Each group maps a label to a number or a string and
/// keeps the key order sent by the service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DetailedAnalysis {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub form: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub h2h: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goals: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defense: Option<Map<String, Value>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalyzeRequest {
    pub home_team: String,
    pub away_team: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SaveBetRequest {
    pub home_team: String,
    pub away_team: String,
    pub analysis: AnalysisResult,
    pub date: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SavedBet {
    #[serde(default)]
    pub id: Option<i64>,
    pub home_team: String,
    pub away_team: String,
    pub analysis: AnalysisResult,
    pub date: String,
    #[serde(default)]
    pub result: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BetOutcome {
    Win,
    Loss,
    Pending,
}

impl BetOutcome {
    pub fn as_str(self) -> &'static str {
        match self {
            BetOutcome::Win => "win",
            BetOutcome::Loss => "loss",
            BetOutcome::Pending => "pending",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultUpdate {
    pub result: BetOutcome,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct BetStats {
    #[serde(default)]
    pub total_bets: u64,
    #[serde(default)]
    pub wins: u64,
    #[serde(default)]
    pub losses: u64,
    #[serde(default)]
    pub pending: u64,
    #[serde(default)]
    pub win_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TeamHit {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub timestamp: Option<String>,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status.eq_ignore_ascii_case("healthy")
    }
}
