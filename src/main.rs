use std::io;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use bet_analyzer::api::ApiClient;
use bet_analyzer::app::App;
use bet_analyzer::config::AppConfig;
use bet_analyzer::provider::spawn_provider;
use bet_analyzer::state::{self, AlertKind, AppState, HistoryView, InputField, Tab, apply_delta};
use bet_analyzer::view;

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    let config = AppConfig::from_env();
    let api_url = config.api_url.clone();
    let client = ApiClient::new(config).context("failed to set up analysis client")?;

    let (tx, rx) = mpsc::channel();
    let (cmd_tx, cmd_rx) = mpsc::channel();
    spawn_provider(client, tx, cmd_rx);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let mut app = App::new(Some(cmd_tx));
    app.state.push_log(format!("[INFO] Service: {api_url}"));
    app.check_health();
    let res = run_app(&mut terminal, &mut app, rx, &api_url);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    Ok(())
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    rx: mpsc::Receiver<state::Delta>,
    api_url: &str,
) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        while let Ok(delta) = rx.try_recv() {
            apply_delta(&mut app.state, delta);
        }

        terminal.draw(|f| ui(f, &app.state, api_url))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key);
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, state: &AppState, api_url: &str) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(1),
            Constraint::Length(5),
            Constraint::Length(2),
        ])
        .split(frame.size());

    let header = Paragraph::new(view::header_text(state, api_url))
        .style(Style::default().add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    match state.tab {
        Tab::Analyzer => render_analyzer(frame, chunks[1], state),
        Tab::History => render_history(frame, chunks[1], state),
    }

    let console = Paragraph::new(view::console_text(state))
        .block(Block::default().title("Console").borders(Borders::ALL));
    frame.render_widget(console, chunks[2]);

    let footer = Paragraph::new(view::footer_text(state))
        .style(Style::default().fg(Color::DarkGray))
        .block(Block::default().borders(Borders::TOP));
    frame.render_widget(footer, chunks[3]);

    if state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
    if state.alert.is_some() {
        render_alert(frame, frame.size(), state);
    }
}

fn render_analyzer(frame: &mut Frame, area: Rect, state: &AppState) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(34), Constraint::Min(30)])
        .split(area);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(1),
        ])
        .split(columns[0]);

    render_input(frame, left[0], state, InputField::Home, "Home team");
    render_input(frame, left[1], state, InputField::Away, "Away team");

    let status = if state.loading {
        "Analyzing...".to_string()
    } else if state.analysis.is_some() {
        "Ctrl-S saves this analysis".to_string()
    } else {
        "Enter both teams and press Enter".to_string()
    };
    let status = Paragraph::new(status)
        .style(Style::default().fg(Color::DarkGray))
        .wrap(Wrap { trim: true })
        .block(Block::default().title("Status").borders(Borders::ALL));
    frame.render_widget(status, left[2]);

    let Some(analysis) = state.analysis.as_ref() else {
        let empty = Paragraph::new("No analysis yet")
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().title("Results").borders(Borders::ALL));
        frame.render_widget(empty, columns[1]);
        return;
    };

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5),
            Constraint::Length(7),
            Constraint::Min(1),
        ])
        .split(columns[1]);

    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(right[0]);

    let outcome = Paragraph::new(view::outcome_text(
        analysis,
        &state.home_team,
        &state.away_team,
    ))
    .block(Block::default().title("Match result").borders(Borders::ALL));
    frame.render_widget(outcome, top[0]);

    let goals = Paragraph::new(view::goals_text(analysis))
        .block(Block::default().title("Goals").borders(Borders::ALL));
    frame.render_widget(goals, top[1]);

    let recommendation = Paragraph::new(view::recommendation_text(analysis))
        .style(Style::default().fg(Color::Yellow))
        .wrap(Wrap { trim: true })
        .block(Block::default().title("Recommendation").borders(Borders::ALL));
    frame.render_widget(recommendation, right[1]);

    let detail = Paragraph::new(view::detail_text(&analysis.detailed_analysis))
        .scroll((state.analysis_scroll, 0))
        .block(Block::default().title("Detailed analysis").borders(Borders::ALL));
    frame.render_widget(detail, right[2]);
}

fn render_input(frame: &mut Frame, area: Rect, state: &AppState, field: InputField, title: &str) {
    let focused = state.focus == field;
    let border = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    let input = Paragraph::new(view::input_line(state, field)).block(
        Block::default()
            .title(title.to_string())
            .borders(Borders::ALL)
            .border_style(border),
    );
    frame.render_widget(input, area);
}

fn render_history(frame: &mut Frame, area: Rect, state: &AppState) {
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(1)])
        .split(area);

    let stats = Paragraph::new(view::stats_line(state))
        .style(Style::default().add_modifier(Modifier::BOLD));
    frame.render_widget(stats, sections[0]);

    if state.history_view == HistoryView::Detail {
        if let Some(bet) = state.bet_detail.as_ref() {
            let detail = Paragraph::new(view::bet_detail_text(bet))
                .scroll((state.detail_scroll, 0))
                .wrap(Wrap { trim: false })
                .block(Block::default().title("Saved bet").borders(Borders::ALL));
            frame.render_widget(detail, sections[1]);
            return;
        }
    }

    let list_area = sections[1];
    if state.bets.is_empty() {
        let empty = Paragraph::new(view::history_text(state))
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().title("Saved bets").borders(Borders::ALL));
        frame.render_widget(empty, list_area);
        return;
    }

    // Two lines per bet; keep the selection in view.
    let visible = (list_area.height.saturating_sub(2) / 2).max(1) as usize;
    let scroll = state.history_selected.saturating_sub(visible.saturating_sub(1)) * 2;
    let list = Paragraph::new(view::history_text(state))
        .scroll((scroll as u16, 0))
        .block(Block::default().title("Saved bets").borders(Borders::ALL));
    frame.render_widget(list, list_area);
}

fn render_alert(frame: &mut Frame, area: Rect, state: &AppState) {
    let Some(alert) = state.alert.as_ref() else {
        return;
    };
    let popup_area = centered_rect(50, 30, area);
    frame.render_widget(Clear, popup_area);

    let border = match alert.kind {
        AlertKind::Info => Color::Green,
        AlertKind::Error => Color::Red,
    };
    let text = format!("{}\n\nEnter / Esc to close", alert.message);
    let popup = Paragraph::new(text)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .title(alert.title.clone())
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border)),
        );
    frame.render_widget(popup, popup_area);
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 70, area);
    frame.render_widget(Clear, popup_area);

    let help = Paragraph::new(view::help_text())
        .block(Block::default().title("Help").borders(Borders::ALL))
        .style(Style::default());
    frame.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
