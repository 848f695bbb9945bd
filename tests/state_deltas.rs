use bet_analyzer::api::{ApiError, parse_bets_json};
use bet_analyzer::model::{BetOutcome, BetStats, HealthStatus, TeamHit};
use bet_analyzer::state::{AppState, Delta, HistoryView, InputField, ServiceHealth, apply_delta};

fn two_bets() -> Vec<bet_analyzer::model::SavedBet> {
    parse_bets_json(
        r#"[
            {"id": 7, "home_team": "A", "away_team": "B", "date": "2026-03-14T18:45:12Z",
             "analysis": {"home_win_prob": 0.5, "draw_prob": 0.3, "away_win_prob": 0.2,
                          "over_2_5_prob": 0.5, "both_teams_score": 0.5,
                          "detailed_analysis": {}, "recommendation": "-", "risk_level": "low"}},
            {"id": 3, "home_team": "C", "away_team": "D", "date": "2026-03-10T20:00:00Z",
             "analysis": {"home_win_prob": 0.5, "draw_prob": 0.3, "away_win_prob": 0.2,
                          "over_2_5_prob": 0.5, "both_teams_score": 0.5,
                          "detailed_analysis": {}, "recommendation": "-", "risk_level": "low"}}
        ]"#,
    )
    .expect("bets parse")
}

#[test]
fn history_failure_is_logged_without_alert() {
    let mut state = AppState::new();
    state.bets = two_bets();
    state.bets_loading = true;

    apply_delta(
        &mut state,
        Delta::BetsFailed(ApiError::Transport("timed out".to_string())),
    );

    assert!(state.alert.is_none());
    assert!(state.bets.is_empty());
    assert!(!state.bets_loading);
    let last = state.logs.back().expect("log line");
    assert!(last.starts_with("[WARN]"));
    assert!(last.contains("timed out"));
}

#[test]
fn reloaded_history_clamps_selection() {
    let mut state = AppState::new();
    state.bets = two_bets();
    state.history_selected = 1;

    let mut shorter = two_bets();
    shorter.truncate(1);
    apply_delta(&mut state, Delta::SetBets(shorter));
    assert_eq!(state.history_selected, 0);
    assert_eq!(state.selected_bet().and_then(|b| b.id), Some(7));
}

#[test]
fn result_update_patches_list_and_detail() {
    let mut state = AppState::new();
    state.bets = two_bets();
    let detail = state.bets[1].clone();
    apply_delta(&mut state, Delta::SetBetDetail(detail));
    assert_eq!(state.history_view, HistoryView::Detail);

    apply_delta(
        &mut state,
        Delta::ResultUpdated {
            id: 3,
            result: BetOutcome::Win,
        },
    );

    assert_eq!(state.bets[1].result.as_deref(), Some("win"));
    assert!(state.bets[0].result.is_none());
    assert_eq!(
        state.bet_detail.as_ref().and_then(|b| b.result.as_deref()),
        Some("win")
    );
}

#[test]
fn team_hit_fills_untouched_field_only() {
    let mut state = AppState::new();
    state.home_team = "fener".to_string();
    state.away_team = "gala".to_string();

    apply_delta(
        &mut state,
        Delta::TeamHits {
            field: InputField::Home,
            query: "fener".to_string(),
            hits: vec![TeamHit {
                id: 1,
                name: "Fenerbahçe".to_string(),
            }],
        },
    );
    assert_eq!(state.home_team, "Fenerbahçe");

    // The user kept typing before the answer came back.
    state.away_team = "galat".to_string();
    apply_delta(
        &mut state,
        Delta::TeamHits {
            field: InputField::Away,
            query: "gala".to_string(),
            hits: vec![TeamHit {
                id: 2,
                name: "Galatasaray".to_string(),
            }],
        },
    );
    assert_eq!(state.away_team, "galat");
}

#[test]
fn empty_team_search_logs() {
    let mut state = AppState::new();
    state.home_team = "zz".to_string();
    apply_delta(
        &mut state,
        Delta::TeamHits {
            field: InputField::Home,
            query: "zz".to_string(),
            hits: Vec::new(),
        },
    );
    assert_eq!(state.home_team, "zz");
    assert!(state.logs.back().is_some_and(|l| l.contains("No team found")));
}

#[test]
fn health_maps_to_header_status() {
    let mut state = AppState::new();
    assert_eq!(state.health, ServiceHealth::Unknown);

    apply_delta(
        &mut state,
        Delta::SetHealth(HealthStatus {
            status: "healthy".to_string(),
            timestamp: None,
        }),
    );
    assert_eq!(state.health, ServiceHealth::Online);

    apply_delta(
        &mut state,
        Delta::HealthFailed(ApiError::Transport("refused".to_string())),
    );
    assert_eq!(state.health, ServiceHealth::Offline);
    assert!(state.alert.is_none());
}

#[test]
fn stats_are_stored() {
    let mut state = AppState::new();
    apply_delta(
        &mut state,
        Delta::SetStats(BetStats {
            total_bets: 4,
            wins: 2,
            losses: 1,
            pending: 1,
            win_rate: 50.0,
        }),
    );
    assert_eq!(state.stats.as_ref().map(|s| s.total_bets), Some(4));
    assert!(bet_analyzer::view::stats_line(&state).contains("Win rate 50.0%"));
}

#[test]
fn log_buffer_is_capped() {
    let mut state = AppState::new();
    for i in 0..250 {
        apply_delta(&mut state, Delta::Log(format!("line {i}")));
    }
    assert_eq!(state.logs.len(), 200);
    assert_eq!(state.logs.front().map(String::as_str), Some("line 50"));
}
