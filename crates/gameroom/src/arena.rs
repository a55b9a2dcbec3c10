use super::*;
use rbb_competition::*;
use rbb_core::*;
use rbb_save::Archive;
use std::collections::BTreeSet;
use tokio::sync::mpsc::*;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// What woke the arena loop.
enum Wake {
    Request(Request),
    Tick,
    Summary,
    Closed,
}

/// Live competition coordinator.
///
/// Owns the [`Competition`] and handles one request or tick at a time.
/// Every change is broadcast on the outbound channel and written to the
/// [`Archive`]; competition summaries go out once changes settle.
pub struct Arena {
    competition: Competition,
    archive: Archive,
    ticker: Ticker,
    outbound: UnboundedSender<ServerMessage>,
    summary_due: Option<Instant>,
}

impl Arena {
    pub fn new(
        competition: Competition,
        archive: Archive,
        outbound: UnboundedSender<ServerMessage>,
    ) -> Self {
        Self {
            competition,
            archive,
            outbound,
            ticker: Ticker::default(),
            summary_due: None,
        }
    }
    /// Run an arena in its own task. The task ends, handing back the
    /// competition, once every request sender is dropped.
    pub fn spawn(
        competition: Competition,
        archive: Archive,
    ) -> (
        UnboundedSender<Request>,
        UnboundedReceiver<ServerMessage>,
        JoinHandle<Competition>,
    ) {
        let (requests, inbound) = unbounded_channel();
        let (outbound, messages) = unbounded_channel();
        let arena = Self::new(competition, archive, outbound);
        let task = tokio::spawn(arena.run(inbound));
        (requests, messages, task)
    }
    pub fn competition(&self) -> &Competition {
        &self.competition
    }
    pub fn ticker(&self) -> &Ticker {
        &self.ticker
    }
}

impl Arena {
    pub async fn run(mut self, mut inbound: UnboundedReceiver<Request>) -> Competition {
        log::info!("[arena] running {}", self.competition.name());
        self.send(ServerMessage::game_state(&self.competition, now()));
        if self.competition.active().is_some_and(|m| m.is_running()) {
            self.ticker.arm();
        }
        loop {
            let due = self.summary_due;
            let wake = tokio::select! {
                request = inbound.recv() => match request {
                    Some(request) => Wake::Request(request),
                    None => Wake::Closed,
                },
                _ = self.ticker.tick() => Wake::Tick,
                _ = tokio::time::sleep_until(due.unwrap_or_else(Instant::now)), if due.is_some() => Wake::Summary,
            };
            match wake {
                Wake::Request(request) => self.handle(request, now()).await,
                Wake::Tick => self.tick(now()).await,
                Wake::Summary => self.broadcast_summary(now()),
                Wake::Closed => break,
            }
        }
        log::info!("[arena] closing {}", self.competition.name());
        if let Err(e) = self.archive.save_all(&self.competition).await {
            log::error!("[arena] final save failed: {}", e);
        }
        self.archive.flush().await;
        self.competition
    }

    /// Apply one client request at time `now`.
    pub async fn handle(&mut self, request: Request, now: Millis) {
        log::debug!("[arena] {:?}", request);
        let result = match request.command() {
            Some((Some(id), command)) => self.competition.apply(id, command, now),
            Some((None, command)) => self.competition.apply_active(command, now),
            None => match request {
                Request::CreateGame { contestant_ids } => {
                    self.competition.create_game(contestant_ids).map(drop)
                }
                Request::SetActive { match_id } => self.competition.set_active(match_id),
                Request::AddContestant { ref name } => {
                    self.competition.add_contestant(name.clone()).map(drop)
                }
                Request::RemoveContestant { id } => self.competition.remove_contestant(id),
                Request::StartTournament(config) => self.competition.start_tournament(config),
                Request::GetActiveGameState => {
                    self.send(ServerMessage::ActiveGameState(self.competition.robots_view()));
                    Ok(())
                }
                _ => Ok(()),
            },
        };
        if let Err(e) = result {
            log::warn!("[arena] rejected {:?}: {}", request, e);
        }
        self.publish(now).await;
    }

    /// Poll the active match's time limits at `now`.
    pub async fn tick(&mut self, now: Millis) {
        if let Err(e) = self.competition.tick(now) {
            log::warn!("[arena] tick failed: {}", e);
        }
        self.publish(now).await;
    }

    /// Broadcast and persist whatever the last step changed.
    async fn publish(&mut self, now: Millis) {
        let mut changed = false;
        let mut show = false;
        let mut touched = BTreeSet::new();
        for event in self.competition.drain() {
            match event {
                CompetitionEvent::Changed => changed = true,
                CompetitionEvent::Stalled => {
                    log::error!("[arena] swiss stage stalled, next round cannot be paired");
                    changed = true;
                }
                CompetitionEvent::ActiveSet { .. } => show = true,
                CompetitionEvent::MatchChanged { id, kind } => {
                    self.send(ServerMessage::change(id, kind));
                    self.signal(kind);
                    touched.insert(id);
                    show = true;
                }
            }
        }
        if !self.competition.active().is_some_and(|m| m.is_running()) {
            self.ticker.disarm();
        }
        if show {
            self.send(ServerMessage::game_state(&self.competition, now));
        }
        for id in touched.iter().copied() {
            if let Some(game) = self.competition.find(id) {
                if let Err(e) = self.archive.save_match(game).await {
                    log::error!("[arena] failed to save match {}: {}", id, e);
                }
            }
        }
        if changed {
            if let Err(e) = self.archive.save_all(&self.competition).await {
                log::error!("[arena] failed to save competition: {}", e);
            }
        }
        if changed || !touched.is_empty() {
            self.summary_due = Some(Instant::now() + SUMMARY_DEBOUNCE);
        }
    }

    /// Tell the robots to start or stop when a clock opens or closes.
    fn signal(&mut self, kind: rbb_gameplay::MatchEvent) {
        let Some(view) = self.competition.robots_view() else {
            return;
        };
        if kind.starts_clock() {
            self.ticker.arm();
            self.send(ServerMessage::start(view));
        } else if kind.stops_clock() {
            self.send(ServerMessage::stop(view));
        }
    }

    fn broadcast_summary(&mut self, now: Millis) {
        self.summary_due = None;
        self.send(ServerMessage::summary(&self.competition, now));
    }

    fn send(&self, message: ServerMessage) {
        log::trace!("[arena] send {}", message.name());
        if self.outbound.send(message).is_err() {
            log::debug!("[arena] no listeners");
        }
    }
}
