use std::collections::VecDeque;

use crate::api::ApiError;
use crate::model::{
    AnalysisResult, AnalyzeRequest, BetOutcome, BetStats, HealthStatus, ResultUpdate,
    SaveBetRequest, SavedBet, TeamHit,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Analyzer,
    History,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputField {
    Home,
    Away,
}

impl InputField {
    pub fn other(self) -> Self {
        match self {
            InputField::Home => InputField::Away,
            InputField::Away => InputField::Home,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryView {
    List,
    Detail,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceHealth {
    Unknown,
    Online,
    Offline,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub kind: AlertKind,
    pub title: String,
    pub message: String,
}

impl Alert {
    pub fn new(kind: AlertKind, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn info(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(AlertKind::Info, title, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(AlertKind::Error, "Error", message)
    }
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub tab: Tab,
    pub home_team: String,
    pub away_team: String,
    pub focus: InputField,
    pub analysis: Option<AnalysisResult>,
    pub analysis_scroll: u16,
    pub loading: bool,
    pub saving: bool,
    pub bets: Vec<SavedBet>,
    pub bets_loading: bool,
    pub history_selected: usize,
    pub history_view: HistoryView,
    pub bet_detail: Option<SavedBet>,
    pub detail_scroll: u16,
    pub stats: Option<BetStats>,
    pub health: ServiceHealth,
    pub alert: Option<Alert>,
    pub help_overlay: bool,
    pub logs: VecDeque<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self {
            tab: Tab::Analyzer,
            home_team: String::new(),
            away_team: String::new(),
            focus: InputField::Home,
            analysis: None,
            analysis_scroll: 0,
            loading: false,
            saving: false,
            bets: Vec::new(),
            bets_loading: false,
            history_selected: 0,
            history_view: HistoryView::List,
            bet_detail: None,
            detail_scroll: 0,
            stats: None,
            health: ServiceHealth::Unknown,
            alert: None,
            help_overlay: false,
            logs: VecDeque::new(),
        }
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        const MAX_LOGS: usize = 200;
        self.logs.push_back(msg.into());
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }

    pub fn field(&self, field: InputField) -> &str {
        match field {
            InputField::Home => &self.home_team,
            InputField::Away => &self.away_team,
        }
    }

    pub fn field_mut(&mut self, field: InputField) -> &mut String {
        match field {
            InputField::Home => &mut self.home_team,
            InputField::Away => &mut self.away_team,
        }
    }

    pub fn clear_form(&mut self) {
        self.home_team.clear();
        self.away_team.clear();
        self.analysis = None;
        self.analysis_scroll = 0;
        self.focus = InputField::Home;
    }

    pub fn selected_bet(&self) -> Option<&SavedBet> {
        self.bets.get(self.history_selected)
    }

    pub fn select_next(&mut self) {
        if self.bets.is_empty() {
            self.history_selected = 0;
            return;
        }
        self.history_selected = (self.history_selected + 1).min(self.bets.len() - 1);
    }

    pub fn select_prev(&mut self) {
        self.history_selected = self.history_selected.saturating_sub(1);
    }

    /// The bet a result update would apply to: the open detail first, then
    /// the list selection.
    pub fn focused_bet(&self) -> Option<&SavedBet> {
        if self.history_view == HistoryView::Detail {
            if let Some(bet) = self.bet_detail.as_ref() {
                return Some(bet);
            }
        }
        self.selected_bet()
    }
}

#[derive(Debug)]
pub enum Delta {
    AnalysisReady(AnalysisResult),
    AnalysisFailed(ApiError),
    BetSaved,
    SaveFailed(ApiError),
    SetBets(Vec<SavedBet>),
    BetsFailed(ApiError),
    SetBetDetail(SavedBet),
    BetDetailFailed { id: i64, error: ApiError },
    ResultUpdated { id: i64, result: BetOutcome },
    ResultUpdateFailed { id: i64, error: ApiError },
    SetStats(BetStats),
    StatsFailed(ApiError),
    TeamHits {
        field: InputField,
        query: String,
        hits: Vec<TeamHit>,
    },
    TeamSearchFailed { query: String, error: ApiError },
    SetHealth(HealthStatus),
    HealthFailed(ApiError),
    Log(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProviderCommand {
    Analyze(AnalyzeRequest),
    SaveBet(SaveBetRequest),
    FetchBets,
    FetchBet { id: i64 },
    UpdateResult { id: i64, update: ResultUpdate },
    FetchStats,
    SearchTeams { field: InputField, query: String },
    CheckHealth,
}

pub fn apply_delta(state: &mut AppState, delta: Delta) {
    match delta {
        Delta::AnalysisReady(analysis) => {
            state.loading = false;
            state.push_log(format!(
                "[INFO] Analysis ready: {} vs {} (risk {})",
                state.home_team, state.away_team, analysis.risk_level
            ));
            state.analysis = Some(analysis);
            state.analysis_scroll = 0;
        }
        Delta::AnalysisFailed(err) => {
            state.loading = false;
            state.push_log(format!("[WARN] Analysis error: {err}"));
            let message = match err {
                ApiError::Transport(msg) => format!("Connection error: {msg}"),
                ApiError::Status(_) | ApiError::Decode(_) => {
                    "Analysis failed. Check the team names.".to_string()
                }
            };
            state.alert = Some(Alert::error(message));
        }
        Delta::BetSaved => {
            state.saving = false;
            state.push_log(format!(
                "[INFO] Bet saved: {} vs {}",
                state.home_team, state.away_team
            ));
            state.clear_form();
            state.alert = Some(Alert::info("Saved", "Bet saved"));
        }
        Delta::SaveFailed(err) => {
            state.saving = false;
            state.push_log(format!("[WARN] Save error: {err}"));
            state.alert = Some(Alert::error(format!("Could not save: {err}")));
        }
        Delta::SetBets(bets) => {
            state.bets_loading = false;
            state.push_log(format!("[INFO] Loaded {} saved bets", bets.len()));
            state.bets = bets;
            if state.history_selected >= state.bets.len() {
                state.history_selected = state.bets.len().saturating_sub(1);
            }
        }
        Delta::BetsFailed(err) => {
            state.bets_loading = false;
            state.bets.clear();
            state.history_selected = 0;
            state.push_log(format!("[WARN] History load error: {err}"));
        }
        Delta::SetBetDetail(bet) => {
            state.bet_detail = Some(bet);
            state.detail_scroll = 0;
            state.history_view = HistoryView::Detail;
        }
        Delta::BetDetailFailed { id, error } => {
            state.push_log(format!("[WARN] Bet {id} load error: {error}"));
            state.alert = Some(Alert::error(format!("Could not load bet {id}: {error}")));
        }
        Delta::ResultUpdated { id, result } => {
            let value = Some(result.as_str().to_string());
            for bet in state.bets.iter_mut().filter(|b| b.id == Some(id)) {
                bet.result = value.clone();
            }
            if let Some(bet) = state.bet_detail.as_mut().filter(|b| b.id == Some(id)) {
                bet.result = value;
            }
            state.push_log(format!("[INFO] Bet {id} marked {}", result.as_str()));
        }
        Delta::ResultUpdateFailed { id, error } => {
            state.push_log(format!("[WARN] Bet {id} result error: {error}"));
            state.alert = Some(Alert::error(format!("Could not update bet {id}: {error}")));
        }
        Delta::SetStats(stats) => {
            state.push_log(format!(
                "[INFO] Stats: {} bets, {} wins, {} losses",
                stats.total_bets, stats.wins, stats.losses
            ));
            state.stats = Some(stats);
        }
        Delta::StatsFailed(err) => {
            state.push_log(format!("[WARN] Stats error: {err}"));
        }
        Delta::TeamHits { field, query, hits } => {
            let Some(first) = hits.first() else {
                state.push_log(format!("[INFO] No team found for \"{query}\""));
                return;
            };
            let names = hits
                .iter()
                .map(|hit| hit.name.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            state.push_log(format!("[INFO] Teams for \"{query}\": {names}"));
            // Only replace text the user has not edited since the search went out.
            if state.field(field) == query {
                *state.field_mut(field) = first.name.clone();
            }
        }
        Delta::TeamSearchFailed { query, error } => {
            state.push_log(format!("[WARN] Team search \"{query}\" error: {error}"));
        }
        Delta::SetHealth(health) => {
            state.health = if health.is_healthy() {
                ServiceHealth::Online
            } else {
                ServiceHealth::Offline
            };
            state.push_log(format!("[INFO] Service status: {}", health.status));
        }
        Delta::HealthFailed(err) => {
            state.health = ServiceHealth::Offline;
            state.push_log(format!("[WARN] Health check error: {err}"));
        }
        Delta::Log(msg) => state.push_log(msg),
    }
}
