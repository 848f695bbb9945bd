use std::sync::mpsc::Sender;

use chrono::{SecondsFormat, Utc};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::model::{AnalyzeRequest, BetOutcome, ResultUpdate, SaveBetRequest};
use crate::state::{Alert, AppState, HistoryView, ProviderCommand, Tab};

const MIN_SEARCH_LEN: usize = 2;

pub struct App {
    pub state: AppState,
    pub should_quit: bool,
    cmd_tx: Option<Sender<ProviderCommand>>,
}

impl App {
    pub fn new(cmd_tx: Option<Sender<ProviderCommand>>) -> Self {
        Self {
            state: AppState::new(),
            should_quit: false,
            cmd_tx,
        }
    }

    pub fn on_key(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        if ctrl && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('q')) {
            self.should_quit = true;
            return;
        }

        if self.state.alert.is_some() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                self.state.alert = None;
            }
            return;
        }

        match key.code {
            KeyCode::F(1) => return self.switch_tab(Tab::Analyzer),
            KeyCode::F(2) => return self.switch_tab(Tab::History),
            KeyCode::F(3) => {
                self.state.help_overlay = !self.state.help_overlay;
                return;
            }
            KeyCode::F(5) => return self.check_health(),
            KeyCode::Esc if self.state.help_overlay => {
                self.state.help_overlay = false;
                return;
            }
            _ => {}
        }

        match self.state.tab {
            Tab::Analyzer => self.on_analyzer_key(key, ctrl),
            Tab::History => self.on_history_key(key),
        }
    }

    fn on_analyzer_key(&mut self, key: KeyEvent, ctrl: bool) {
        match key.code {
            KeyCode::Char('s') if ctrl => self.save_bet(),
            KeyCode::Char('f') if ctrl => self.search_focused_team(),
            KeyCode::Char('u') if ctrl => self.state.field_mut(self.state.focus).clear(),
            KeyCode::Char(c) if !ctrl => self.state.field_mut(self.state.focus).push(c),
            KeyCode::Backspace => {
                self.state.field_mut(self.state.focus).pop();
            }
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
                self.state.focus = self.state.focus.other();
            }
            KeyCode::Enter => self.submit_analysis(),
            KeyCode::PageDown => {
                self.state.analysis_scroll = self.state.analysis_scroll.saturating_add(5);
            }
            KeyCode::PageUp => {
                self.state.analysis_scroll = self.state.analysis_scroll.saturating_sub(5);
            }
            _ => {}
        }
    }

    fn on_history_key(&mut self, key: KeyEvent) {
        match self.state.history_view {
            HistoryView::List => match key.code {
                KeyCode::Char('q') => self.should_quit = true,
                KeyCode::Char('j') | KeyCode::Down => self.state.select_next(),
                KeyCode::Char('k') | KeyCode::Up => self.state.select_prev(),
                KeyCode::Char('r') => self.refresh_history(),
                KeyCode::Char('s') => self.request_stats(),
                KeyCode::Enter => self.open_selected_bet(),
                KeyCode::Char('w') => self.mark_result(BetOutcome::Win),
                KeyCode::Char('l') => self.mark_result(BetOutcome::Loss),
                KeyCode::Char('p') => self.mark_result(BetOutcome::Pending),
                _ => {}
            },
            HistoryView::Detail => match key.code {
                KeyCode::Char('q') => self.should_quit = true,
                KeyCode::Char('b') | KeyCode::Esc => {
                    self.state.history_view = HistoryView::List;
                }
                KeyCode::Char('w') => self.mark_result(BetOutcome::Win),
                KeyCode::Char('l') => self.mark_result(BetOutcome::Loss),
                KeyCode::Char('p') => self.mark_result(BetOutcome::Pending),
                KeyCode::Char('j') | KeyCode::Down | KeyCode::PageDown => {
                    self.state.detail_scroll = self.state.detail_scroll.saturating_add(1);
                }
                KeyCode::Char('k') | KeyCode::Up | KeyCode::PageUp => {
                    self.state.detail_scroll = self.state.detail_scroll.saturating_sub(1);
                }
                _ => {}
            },
        }
    }

    /// Validates both team names and sends them untouched to the service.
    pub fn submit_analysis(&mut self) {
        if self.state.loading {
            return;
        }
        if self.state.home_team.trim().is_empty() || self.state.away_team.trim().is_empty() {
            self.state.alert = Some(Alert::error("Please enter both team names"));
            return;
        }
        let req = AnalyzeRequest {
            home_team: self.state.home_team.clone(),
            away_team: self.state.away_team.clone(),
        };
        self.state.push_log(format!(
            "[INFO] Analyzing {} vs {}",
            req.home_team, req.away_team
        ));
        if self.send(ProviderCommand::Analyze(req), "Analysis") {
            self.state.loading = true;
        }
    }

    pub fn save_bet(&mut self) {
        let date = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        self.save_bet_dated(date);
    }

    pub fn save_bet_dated(&mut self, date: String) {
        if self.state.saving {
            return;
        }
        if self.state.loading {
            self.state.push_log("[INFO] Analysis in progress, save skipped");
            return;
        }
        let Some(analysis) = self.state.analysis.clone() else {
            self.state.alert = Some(Alert::error("Analyze a match first"));
            return;
        };
        let req = SaveBetRequest {
            home_team: self.state.home_team.clone(),
            away_team: self.state.away_team.clone(),
            analysis,
            date,
        };
        if self.send(ProviderCommand::SaveBet(req), "Save") {
            self.state.saving = true;
        }
    }

    pub fn switch_tab(&mut self, tab: Tab) {
        if self.state.tab == tab {
            return;
        }
        self.state.tab = tab;
        self.state.help_overlay = false;
        if tab == Tab::History {
            self.state.history_view = HistoryView::List;
            self.refresh_history();
        }
    }

    pub fn refresh_history(&mut self) {
        if self.send(ProviderCommand::FetchBets, "History") {
            self.state.bets_loading = true;
        }
    }

    pub fn request_stats(&mut self) {
        self.send(ProviderCommand::FetchStats, "Stats");
    }

    pub fn open_selected_bet(&mut self) {
        let Some(bet) = self.state.selected_bet() else {
            self.state.push_log("[INFO] No bet selected");
            return;
        };
        match bet.id {
            Some(id) => {
                self.send(ProviderCommand::FetchBet { id }, "Bet detail");
            }
            None => {
                self.state.bet_detail = Some(bet.clone());
                self.state.detail_scroll = 0;
                self.state.history_view = HistoryView::Detail;
            }
        }
    }

    pub fn mark_result(&mut self, result: BetOutcome) {
        let Some(bet) = self.state.focused_bet() else {
            self.state.push_log("[INFO] No bet selected");
            return;
        };
        let Some(id) = bet.id else {
            self.state.push_log("[WARN] Bet has no id, result not sent");
            return;
        };
        let update = ResultUpdate {
            result,
            notes: bet.notes.clone(),
        };
        self.send(ProviderCommand::UpdateResult { id, update }, "Result update");
    }

    pub fn search_focused_team(&mut self) {
        let field = self.state.focus;
        let query = self.state.field(field).to_string();
        if query.trim().chars().count() < MIN_SEARCH_LEN {
            self.state
                .push_log(format!("[INFO] Type at least {MIN_SEARCH_LEN} characters to search"));
            return;
        }
        self.send(ProviderCommand::SearchTeams { field, query }, "Team search");
    }

    pub fn check_health(&mut self) {
        self.send(ProviderCommand::CheckHealth, "Health check");
    }

    fn send(&mut self, cmd: ProviderCommand, label: &str) -> bool {
        let Some(tx) = &self.cmd_tx else {
            self.state.push_log(format!("[INFO] {label} unavailable"));
            return false;
        };
        if tx.send(cmd).is_err() {
            self.state.push_log(format!("[WARN] {label} request failed"));
            self.state.alert = Some(Alert::error(format!("{label} request failed")));
            return false;
        }
        true
    }
}
