use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use serde_json::{Map, Value};

use crate::model::{AnalysisResult, DetailedAnalysis, SavedBet};
use crate::state::{AppState, HistoryView, InputField, ServiceHealth, Tab};

pub const EMPTY_HISTORY: &str = "No saved bets yet";

/// `0.45` -> `45%`. Rounds, never normalizes.
pub fn format_percent(p: f64) -> String {
    let pct = (p * 100.0).round() + 0.0;
    format!("{pct:.0}%")
}

pub fn format_stat_value(value: &Value) -> String {
    match value {
        Value::Number(n) => match n.as_f64() {
            Some(v) => format!("{v:.2}"),
            None => n.to_string(),
        },
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// History dates show as `DD.MM.YYYY` in local time; anything unparseable is
/// shown as received.
pub fn format_bet_date(raw: &str) -> String {
    let cleaned = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(cleaned) {
        return dt.with_timezone(&Local).format("%d.%m.%Y").to_string();
    }
    const NAIVE_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];
    for fmt in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(cleaned, fmt) {
            return dt.format("%d.%m.%Y").to_string();
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(cleaned, "%Y-%m-%d") {
        return date.format("%d.%m.%Y").to_string();
    }
    cleaned.to_string()
}

/// Detail groups in display order; absent groups are skipped.
pub fn detail_groups(detail: &DetailedAnalysis) -> Vec<(&'static str, &Map<String, Value>)> {
    [
        ("Form", detail.form.as_ref()),
        ("Head to head", detail.h2h.as_ref()),
        ("Goals", detail.goals.as_ref()),
        ("Defense", detail.defense.as_ref()),
    ]
    .into_iter()
    .filter_map(|(label, group)| group.map(|g| (label, g)))
    .collect()
}

pub fn outcome_text(analysis: &AnalysisResult, home: &str, away: &str) -> String {
    format!(
        "Home {home}: {}\nDraw: {}\nAway {away}: {}",
        format_percent(analysis.home_win_prob),
        format_percent(analysis.draw_prob),
        format_percent(analysis.away_win_prob)
    )
}

pub fn goals_text(analysis: &AnalysisResult) -> String {
    format!(
        "Over 2.5: {}\nUnder 2.5: {}\nBoth teams score: {}",
        format_percent(analysis.over_2_5_prob),
        format_percent(analysis.under_2_5()),
        format_percent(analysis.both_teams_score)
    )
}

pub fn detail_text(detail: &DetailedAnalysis) -> String {
    let groups = detail_groups(detail);
    if groups.is_empty() {
        return "No detailed statistics".to_string();
    }
    let mut lines = Vec::new();
    for (label, group) in groups {
        if !lines.is_empty() {
            lines.push(String::new());
        }
        lines.push(format!("[{label}]"));
        for (key, value) in group {
            lines.push(format!("  {key}: {}", format_stat_value(value)));
        }
    }
    lines.join("\n")
}

pub fn recommendation_text(analysis: &AnalysisResult) -> String {
    format!(
        "{}\n\nRisk level: {}",
        analysis.recommendation, analysis.risk_level
    )
}

/// Full analysis as one scrollable block, used by the history detail view.
pub fn analysis_report(analysis: &AnalysisResult, home: &str, away: &str) -> String {
    [
        "Match result".to_string(),
        outcome_text(analysis, home, away),
        String::new(),
        "Goals".to_string(),
        goals_text(analysis),
        String::new(),
        detail_text(&analysis.detailed_analysis),
        String::new(),
        "Recommendation".to_string(),
        recommendation_text(analysis),
    ]
    .join("\n")
}

pub fn input_line(state: &AppState, field: InputField) -> String {
    let value = state.field(field);
    let cursor = if state.tab == Tab::Analyzer && state.focus == field {
        "_"
    } else {
        ""
    };
    format!("{value}{cursor}")
}

pub fn history_row(bet: &SavedBet) -> String {
    let result = bet
        .result
        .as_deref()
        .map(|r| format!(" [{}]", r.to_uppercase()))
        .unwrap_or_default();
    format!(
        "{} vs {}{result}\n  {}  Home: {}  Away: {}",
        bet.home_team,
        bet.away_team,
        format_bet_date(&bet.date),
        format_percent(bet.analysis.home_win_prob),
        format_percent(bet.analysis.away_win_prob)
    )
}

pub fn history_text(state: &AppState) -> String {
    if state.bets.is_empty() {
        if state.bets_loading {
            return "Loading saved bets...".to_string();
        }
        return EMPTY_HISTORY.to_string();
    }
    state
        .bets
        .iter()
        .enumerate()
        .map(|(idx, bet)| {
            let prefix = if idx == state.history_selected { "> " } else { "  " };
            format!("{prefix}{}", history_row(bet))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn bet_detail_text(bet: &SavedBet) -> String {
    let mut lines = vec![
        format!("{} vs {}", bet.home_team, bet.away_team),
        format!("Date: {}", format_bet_date(&bet.date)),
        format!("Result: {}", bet.result.as_deref().unwrap_or("pending")),
    ];
    if let Some(notes) = bet.notes.as_deref().filter(|n| !n.is_empty()) {
        lines.push(format!("Notes: {notes}"));
    }
    lines.push(String::new());
    lines.push(analysis_report(&bet.analysis, &bet.home_team, &bet.away_team));
    lines.join("\n")
}

pub fn stats_line(state: &AppState) -> String {
    match &state.stats {
        Some(s) => format!(
            "Bets {} | W {} | L {} | Pending {} | Win rate {:.1}%",
            s.total_bets, s.wins, s.losses, s.pending, s.win_rate
        ),
        None => "Stats: press s".to_string(),
    }
}

pub fn header_text(state: &AppState, api_url: &str) -> String {
    let tab = match state.tab {
        Tab::Analyzer => "[F1 ANALYZER]  F2 History",
        Tab::History => " F1 Analyzer  [F2 HISTORY]",
    };
    let health = match state.health {
        ServiceHealth::Unknown => "checking",
        ServiceHealth::Online => "online",
        ServiceHealth::Offline => "offline",
    };
    let busy = if state.loading {
        " | analyzing..."
    } else if state.saving {
        " | saving..."
    } else {
        ""
    };
    format!("MATCH ANALYZER | {tab} | {api_url} ({health}){busy}")
}

pub fn footer_text(state: &AppState) -> String {
    match (state.tab, state.history_view) {
        (Tab::Analyzer, _) => {
            "Type team | Tab Switch field | Enter Analyze | Ctrl-S Save | Ctrl-F Search | F2 History | F3 Help | Ctrl-Q Quit".to_string()
        }
        (Tab::History, HistoryView::List) => {
            "j/k Move | Enter Detail | w/l/p Mark | r Reload | s Stats | F1 Analyzer | F3 Help | q Quit".to_string()
        }
        (Tab::History, HistoryView::Detail) => {
            "b/Esc Back | j/k Scroll | w/l/p Mark | F1 Analyzer | q Quit".to_string()
        }
    }
}

pub fn console_text(state: &AppState) -> String {
    if state.logs.is_empty() {
        return "No messages yet".to_string();
    }
    let start = state.logs.len().saturating_sub(3);
    state
        .logs
        .iter()
        .skip(start)
        .cloned()
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn help_text() -> String {
    [
        "Match Analyzer - Help",
        "",
        "Global:",
        "  F1           Analyzer tab",
        "  F2           History tab (reloads saved bets)",
        "  F3           Toggle help",
        "  F5           Check service health",
        "  Ctrl-Q       Quit",
        "",
        "Analyzer:",
        "  Tab / ↑ / ↓  Switch between home and away",
        "  Enter        Analyze",
        "  Ctrl-S       Save the current analysis",
        "  Ctrl-F       Search the focused team name",
        "  Ctrl-U       Clear the focused field",
        "  PgUp / PgDn  Scroll results",
        "",
        "History:",
        "  j/k or ↑/↓   Move",
        "  Enter        Open bet",
        "  w / l / p    Mark win / loss / pending",
        "  r            Reload",
        "  s            Stats",
    ]
    .join("\n")
}
