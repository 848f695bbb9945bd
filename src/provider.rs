use std::sync::mpsc::{Receiver, Sender};
use std::thread::{self, JoinHandle};

use crate::api::AnalysisService;
use crate::state::{Delta, ProviderCommand};

/// Runs commands against the service on a background thread, one at a time,
/// until either channel closes.
pub fn spawn_provider<S>(
    service: S,
    tx: Sender<Delta>,
    cmd_rx: Receiver<ProviderCommand>,
) -> JoinHandle<()>
where
    S: AnalysisService + 'static,
{
    thread::spawn(move || {
        while let Ok(cmd) = cmd_rx.recv() {
            let delta = handle_command(&service, cmd);
            if tx.send(delta).is_err() {
                break;
            }
        }
    })
}

pub fn handle_command(service: &dyn AnalysisService, cmd: ProviderCommand) -> Delta {
    match cmd {
        ProviderCommand::Analyze(req) => match service.analyze(&req) {
            Ok(analysis) => Delta::AnalysisReady(analysis),
            Err(err) => Delta::AnalysisFailed(err),
        },
        ProviderCommand::SaveBet(req) => match service.save_bet(&req) {
            Ok(()) => Delta::BetSaved,
            Err(err) => Delta::SaveFailed(err),
        },
        ProviderCommand::FetchBets => match service.list_bets() {
            Ok(bets) => Delta::SetBets(bets),
            Err(err) => Delta::BetsFailed(err),
        },
        ProviderCommand::FetchBet { id } => match service.get_bet(id) {
            Ok(bet) => Delta::SetBetDetail(bet),
            Err(error) => Delta::BetDetailFailed { id, error },
        },
        ProviderCommand::UpdateResult { id, update } => {
            match service.update_result(id, &update) {
                Ok(()) => Delta::ResultUpdated {
                    id,
                    result: update.result,
                },
                Err(error) => Delta::ResultUpdateFailed { id, error },
            }
        }
        ProviderCommand::FetchStats => match service.stats() {
            Ok(stats) => Delta::SetStats(stats),
            Err(err) => Delta::StatsFailed(err),
        },
        ProviderCommand::SearchTeams { field, query } => match service.search_teams(&query) {
            Ok(hits) => Delta::TeamHits { field, query, hits },
            Err(error) => Delta::TeamSearchFailed { query, error },
        },
        ProviderCommand::CheckHealth => match service.health() {
            Ok(health) => Delta::SetHealth(health),
            Err(err) => Delta::HealthFailed(err),
        },
    }
}
