use std::{collections::VecDeque, time::Duration};

use tracing::{debug, info};

use crate::{Difficulty, FallingPiece, GameStats, Grid, PieceKind, SessionConfig};

use super::{
    machine::{Effect, Event, GameMachine, Phase, Timer},
    planner::PlacementPlanner,
    timer::Scheduler,
};

/// A playing session: the lifecycle state machine wired to a planner and a
/// virtual clock.
///
/// The session owns the live grid. The planner only ever sees it through a
/// shared reference while a decision is being made, so a placement decision
/// never overlaps a grid mutation.
///
/// Time is virtual: nothing happens between calls. [`GameSession::advance`]
/// moves the clock and fires due timers; [`GameSession::run_until_settled`]
/// fires everything still pending.
///
/// Observable notifications accumulate in an outbox read with
/// [`GameSession::drain_events`].
#[derive(Debug)]
pub struct GameSession<P> {
    machine: GameMachine,
    planner: P,
    scheduler: Scheduler<Timer>,
    events: Vec<Effect>,
}

impl<P> GameSession<P>
where
    P: PlacementPlanner,
{
    #[must_use]
    pub fn new(planner: P, config: SessionConfig) -> Self {
        Self::with_machine(planner, GameMachine::new(config))
    }

    /// Creates a session whose grid starts from `grid` instead of empty.
    #[must_use]
    pub fn with_grid(planner: P, config: SessionConfig, grid: Grid) -> Self {
        Self::with_machine(planner, GameMachine::with_grid(config, grid))
    }

    fn with_machine(planner: P, machine: GameMachine) -> Self {
        Self {
            machine,
            planner,
            scheduler: Scheduler::new(),
            events: Vec::new(),
        }
    }

    pub fn start(&mut self) {
        self.dispatch(Event::Start);
    }

    pub fn toggle_pause(&mut self) {
        self.dispatch(Event::TogglePause);
    }

    pub fn reset(&mut self) {
        self.dispatch(Event::Reset);
    }

    /// Changes the difficulty used for the next placement decision.
    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.dispatch(Event::SetDifficulty(difficulty));
    }

    /// Like [`GameSession::set_difficulty`], falling back to normal for
    /// unknown names.
    pub fn set_difficulty_by_name(&mut self, name: &str) {
        self.set_difficulty(Difficulty::from_name_or_default(name));
    }

    /// Sends a piece of `kind`.
    ///
    /// The request is ignored unless the session is playing and not paused.
    /// While another piece is being processed it is queued, or dropped when
    /// the queue is full.
    pub fn request_placement(&mut self, kind: PieceKind) {
        self.dispatch(Event::Select(kind));
    }

    /// Moves the clock forward by `dt`, firing every timer that falls due.
    ///
    /// Each timer fires at its own deadline, so timers it schedules in turn
    /// also fire within this call if they are due before the end of `dt`.
    pub fn advance(&mut self, dt: Duration) {
        let until = self.scheduler.now() + dt;
        while let Some(timer) = self.scheduler.pop_next_until(until) {
            self.dispatch(Event::TimerFired(timer));
        }
        self.scheduler.advance_to(until);
    }

    /// Fires pending timers until none is left and returns the time spent.
    pub fn run_until_settled(&mut self) -> Duration {
        let started = self.scheduler.now();
        while let Some(timer) = self.scheduler.pop_next() {
            self.dispatch(Event::TimerFired(timer));
        }
        self.scheduler.now() - started
    }

    fn dispatch(&mut self, event: Event) {
        let mut pending = VecDeque::from([event]);
        while let Some(event) = pending.pop_front() {
            for effect in self.machine.handle(event) {
                match effect {
                    Effect::RequestPlacement { kind, difficulty } => {
                        let placement =
                            self.planner
                                .plan_placement(self.machine.grid(), kind, difficulty);
                        pending.push_back(Event::PlacementDecided(placement));
                    }
                    Effect::Schedule { timer, after } => {
                        self.scheduler.schedule(after, timer);
                    }
                    Effect::CancelTimers => {
                        let cancelled = self.scheduler.cancel_all();
                        debug!(cancelled, "timers cancelled");
                    }
                    effect => {
                        log_effect(&effect);
                        self.events.push(effect);
                    }
                }
            }
        }
    }

    #[must_use]
    pub fn planner(&self) -> &P {
        &self.planner
    }

    pub fn planner_mut(&mut self) -> &mut P {
        &mut self.planner
    }
}

impl<P> GameSession<P> {
    #[must_use]
    pub fn grid(&self) -> &Grid {
        self.machine.grid()
    }

    /// The piece currently falling, if any.
    #[must_use]
    pub fn falling_piece(&self) -> Option<&FallingPiece> {
        self.machine.falling_piece()
    }

    #[must_use]
    pub fn highlighted_lines(&self) -> &[usize] {
        self.machine.highlighted_lines()
    }

    #[must_use]
    pub fn stats(&self) -> &GameStats {
        self.machine.stats()
    }

    #[must_use]
    pub fn max_height(&self) -> usize {
        self.machine.grid().max_height()
    }

    #[must_use]
    pub fn queue_len(&self) -> usize {
        self.machine.queue().len()
    }

    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.machine.difficulty()
    }

    #[must_use]
    pub fn phase(&self) -> &Phase {
        self.machine.phase()
    }

    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.machine.is_playing()
    }

    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.machine.is_paused()
    }

    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.machine.is_terminal()
    }

    #[must_use]
    pub fn is_processing(&self) -> bool {
        self.machine.is_processing()
    }

    /// Current virtual time.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.scheduler.now()
    }

    /// Takes the notifications recorded since the last call.
    pub fn drain_events(&mut self) -> Vec<Effect> {
        std::mem::take(&mut self.events)
    }
}

fn log_effect(effect: &Effect) {
    match effect {
        Effect::Started => info!("session started"),
        Effect::Paused => info!("session paused"),
        Effect::Resumed => info!("session resumed"),
        Effect::ResetDone => info!("session reset"),
        Effect::DifficultyChanged {
            difficulty,
            applies_next,
        } => info!(%difficulty, applies_next, "difficulty changed"),
        Effect::GameCleared { final_score, bonus } => {
            info!(final_score, bonus, "stack reached the top");
        }
        Effect::PieceCommitted { kind, stats, .. } => debug!(
            %kind,
            pieces_sent = stats.pieces_sent(),
            score = stats.score(),
            "piece committed"
        ),
        Effect::LinesCleared { count, stats } => debug!(
            count,
            total = stats.lines_cleared(),
            "lines cleared"
        ),
        _ => {}
    }
}
