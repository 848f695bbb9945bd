use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use bet_analyzer::api::{AnalysisService, ApiError, ApiResult, parse_analysis_json};
use bet_analyzer::model::{
    AnalysisResult, AnalyzeRequest, BetOutcome, BetStats, HealthStatus, ResultUpdate,
    SaveBetRequest, SavedBet, TeamHit,
};
use bet_analyzer::provider::{handle_command, spawn_provider};
use bet_analyzer::state::{Delta, InputField, ProviderCommand};
use reqwest::StatusCode;

#[derive(Clone, Default)]
struct RecordingService {
    calls: Arc<Mutex<Vec<String>>>,
    fail: bool,
}

impl RecordingService {
    fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    fn record(&self, call: String) -> ApiResult<()> {
        self.calls.lock().expect("calls lock").push(call);
        if self.fail {
            return Err(ApiError::Status(StatusCode::INTERNAL_SERVER_ERROR));
        }
        Ok(())
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("calls lock").clone()
    }
}

fn sample_analysis() -> AnalysisResult {
    parse_analysis_json(
        r#"{
            "home_win_prob": 0.45, "draw_prob": 0.30, "away_win_prob": 0.25,
            "over_2_5_prob": 0.6, "both_teams_score": 0.5,
            "detailed_analysis": {}, "recommendation": "Home", "risk_level": "low"
        }"#,
    )
    .expect("sample parses")
}

impl AnalysisService for RecordingService {
    fn analyze(&self, req: &AnalyzeRequest) -> ApiResult<AnalysisResult> {
        self.record(format!("analyze {}|{}", req.home_team, req.away_team))?;
        Ok(sample_analysis())
    }

    fn save_bet(&self, req: &SaveBetRequest) -> ApiResult<()> {
        self.record(format!("save {}|{}", req.home_team, req.away_team))
    }

    fn list_bets(&self) -> ApiResult<Vec<SavedBet>> {
        self.record("bets".to_string())?;
        Ok(Vec::new())
    }

    fn get_bet(&self, id: i64) -> ApiResult<SavedBet> {
        self.record(format!("bet {id}"))?;
        Ok(SavedBet {
            id: Some(id),
            home_team: "A".to_string(),
            away_team: "B".to_string(),
            analysis: sample_analysis(),
            date: "2026-03-14T18:45:12Z".to_string(),
            result: None,
            notes: None,
        })
    }

    fn update_result(&self, id: i64, update: &ResultUpdate) -> ApiResult<()> {
        self.record(format!("result {id} {}", update.result.as_str()))
    }

    fn stats(&self) -> ApiResult<BetStats> {
        self.record("stats".to_string())?;
        Ok(BetStats::default())
    }

    fn search_teams(&self, query: &str) -> ApiResult<Vec<TeamHit>> {
        self.record(format!("search {query}"))?;
        Ok(vec![TeamHit {
            id: 1,
            name: "Fenerbahçe".to_string(),
        }])
    }

    fn health(&self) -> ApiResult<HealthStatus> {
        self.record("health".to_string())?;
        Ok(HealthStatus {
            status: "healthy".to_string(),
            timestamp: None,
        })
    }
}

#[test]
fn commands_map_to_success_deltas() {
    let service = RecordingService::default();

    let delta = handle_command(
        &service,
        ProviderCommand::Analyze(AnalyzeRequest {
            home_team: "A".to_string(),
            away_team: "B".to_string(),
        }),
    );
    assert!(matches!(delta, Delta::AnalysisReady(ref a) if a.risk_level == "low"));

    assert!(matches!(
        handle_command(&service, ProviderCommand::FetchBets),
        Delta::SetBets(ref bets) if bets.is_empty()
    ));
    assert!(matches!(
        handle_command(&service, ProviderCommand::FetchBet { id: 9 }),
        Delta::SetBetDetail(ref bet) if bet.id == Some(9)
    ));
    assert!(matches!(
        handle_command(
            &service,
            ProviderCommand::UpdateResult {
                id: 9,
                update: ResultUpdate {
                    result: BetOutcome::Pending,
                    notes: None,
                },
            }
        ),
        Delta::ResultUpdated {
            id: 9,
            result: BetOutcome::Pending
        }
    ));
    assert!(matches!(
        handle_command(
            &service,
            ProviderCommand::SearchTeams {
                field: InputField::Away,
                query: "fe".to_string(),
            }
        ),
        Delta::TeamHits {
            field: InputField::Away,
            ..
        }
    ));
    assert!(matches!(
        handle_command(&service, ProviderCommand::CheckHealth),
        Delta::SetHealth(_)
    ));

    assert_eq!(
        service.calls(),
        vec![
            "analyze A|B",
            "bets",
            "bet 9",
            "result 9 pending",
            "search fe",
            "health"
        ]
    );
}

#[test]
fn failures_map_to_failure_deltas() {
    let service = RecordingService::failing();

    assert!(matches!(
        handle_command(
            &service,
            ProviderCommand::Analyze(AnalyzeRequest {
                home_team: "A".to_string(),
                away_team: "B".to_string(),
            })
        ),
        Delta::AnalysisFailed(ApiError::Status(_))
    ));
    assert!(matches!(
        handle_command(&service, ProviderCommand::FetchBets),
        Delta::BetsFailed(_)
    ));
    assert!(matches!(
        handle_command(&service, ProviderCommand::FetchStats),
        Delta::StatsFailed(_)
    ));
    assert!(matches!(
        handle_command(&service, ProviderCommand::FetchBet { id: 4 }),
        Delta::BetDetailFailed { id: 4, .. }
    ));
}

#[test]
fn provider_thread_runs_commands_in_order() {
    let service = RecordingService::default();
    let (tx, rx) = mpsc::channel();
    let (cmd_tx, cmd_rx) = mpsc::channel();
    let handle = spawn_provider(service.clone(), tx, cmd_rx);

    cmd_tx.send(ProviderCommand::CheckHealth).expect("send");
    cmd_tx.send(ProviderCommand::FetchBets).expect("send");
    cmd_tx.send(ProviderCommand::FetchStats).expect("send");

    let timeout = Duration::from_secs(5);
    assert!(matches!(rx.recv_timeout(timeout), Ok(Delta::SetHealth(_))));
    assert!(matches!(rx.recv_timeout(timeout), Ok(Delta::SetBets(_))));
    assert!(matches!(rx.recv_timeout(timeout), Ok(Delta::SetStats(_))));

    drop(cmd_tx);
    handle.join().expect("provider thread exits when commands close");
    assert_eq!(service.calls(), vec!["health", "bets", "stats"]);
}
