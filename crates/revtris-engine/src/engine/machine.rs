use std::time::Duration;

use arrayvec::ArrayVec;
use tracing::debug;

use crate::{Difficulty, FallingPiece, GameStats, Grid, PieceKind, Placement, SessionConfig};

use super::piece_queue::PieceQueue;

/// Lines detected as complete after a commit, top to bottom.
pub type CompletedLines = ArrayVec<usize, { Grid::HEIGHT }>;

/// Where the piece lifecycle currently stands.
///
/// Every phase other than [`Phase::Idle`] and [`Phase::Terminal`] counts as
/// processing: a new request arriving in one of them is queued.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::IsVariant)]
pub enum Phase {
    Idle,
    /// Waiting for the planner to decide where `kind` goes.
    Planning { kind: PieceKind },
    /// A piece is falling toward its resting row.
    Dropping { piece: FallingPiece },
    /// The piece is committed; waiting to look for completed lines.
    Settling,
    /// Completed lines are highlighted and about to be removed.
    Clearing { lines: CompletedLines },
    /// Lines were removed; waiting for the terminal check.
    ClearSettling,
    /// The stack reached the top rows. Only `Start` and `Reset` leave this.
    Terminal,
}

/// Deferred steps of the lifecycle, fired by the session's scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Timer {
    DropStep,
    LineCheck,
    ClearLines,
    TerminalCheck,
}

/// Inputs of the lifecycle state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Start,
    TogglePause,
    Reset,
    SetDifficulty(Difficulty),
    /// The player sends a piece of this kind.
    Select(PieceKind),
    /// Answer to a [`Effect::RequestPlacement`].
    PlacementDecided(Option<Placement>),
    TimerFired(Timer),
}

/// Outputs of the lifecycle state machine.
///
/// `RequestPlacement`, `Schedule` and `CancelTimers` are commands for the
/// driver; everything else is an observable notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Started,
    Paused,
    Resumed,
    ResetDone,
    DifficultyChanged {
        difficulty: Difficulty,
        /// The session is running, so the change only affects the next decision.
        applies_next: bool,
    },
    PieceQueued {
        kind: PieceKind,
        queue_len: usize,
    },
    /// The queue was full; the request is dropped.
    PieceRejected {
        kind: PieceKind,
    },
    PieceDequeued {
        kind: PieceKind,
    },
    RequestPlacement {
        kind: PieceKind,
        difficulty: Difficulty,
    },
    PlacementStarted {
        piece: FallingPiece,
    },
    PieceMoved {
        piece: FallingPiece,
    },
    PieceCommitted {
        kind: PieceKind,
        placement: Placement,
        stats: GameStats,
    },
    /// The planner found no legal placement; nothing was written.
    PieceDiscarded {
        kind: PieceKind,
    },
    LinesHighlighted {
        lines: CompletedLines,
    },
    LinesCleared {
        count: usize,
        stats: GameStats,
    },
    GameCleared {
        final_score: u32,
        bonus: u32,
    },
    Schedule {
        timer: Timer,
        after: Duration,
    },
    CancelTimers,
}

/// Deterministic piece lifecycle: `(state, event) -> (state', effects)`.
///
/// The machine never waits and never calls the planner itself. Suspensions are
/// expressed as [`Effect::Schedule`] and resumed by [`Event::TimerFired`];
/// placement decisions are requested with [`Effect::RequestPlacement`] and
/// answered with [`Event::PlacementDecided`].
///
/// Events that make no sense in the current phase (a stale timer, a decision
/// nobody asked for) are ignored and produce no effects.
#[derive(Debug, Clone)]
pub struct GameMachine {
    grid: Grid,
    stats: GameStats,
    queue: PieceQueue,
    difficulty: Difficulty,
    config: SessionConfig,
    playing: bool,
    paused: bool,
    phase: Phase,
}

impl Default for GameMachine {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

impl GameMachine {
    #[must_use]
    pub fn new(config: SessionConfig) -> Self {
        Self::with_grid(config, Grid::EMPTY)
    }

    /// Creates a machine whose grid starts from `grid` instead of empty.
    #[must_use]
    pub fn with_grid(config: SessionConfig, grid: Grid) -> Self {
        Self {
            grid,
            stats: GameStats::new(),
            queue: PieceQueue::new(),
            difficulty: Difficulty::default(),
            config,
            playing: false,
            paused: false,
            phase: Phase::Idle,
        }
    }

    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    #[must_use]
    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    #[must_use]
    pub fn queue(&self) -> &PieceQueue {
        &self.queue
    }

    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    #[must_use]
    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.phase.is_terminal()
    }

    /// Returns `true` while a piece is being planned, dropped or cleared.
    #[must_use]
    pub fn is_processing(&self) -> bool {
        !matches!(self.phase, Phase::Idle | Phase::Terminal)
    }

    #[must_use]
    pub fn falling_piece(&self) -> Option<&FallingPiece> {
        match &self.phase {
            Phase::Dropping { piece } => Some(piece),
            _ => None,
        }
    }

    #[must_use]
    pub fn highlighted_lines(&self) -> &[usize] {
        match &self.phase {
            Phase::Clearing { lines } => lines.as_slice(),
            _ => &[],
        }
    }

    /// Consuming form of [`GameMachine::handle`].
    #[must_use]
    pub fn transition(mut self, event: Event) -> (Self, Vec<Effect>) {
        let effects = self.handle(event);
        (self, effects)
    }

    /// Applies `event` and returns the resulting effects in order.
    pub fn handle(&mut self, event: Event) -> Vec<Effect> {
        let mut effects = Vec::new();
        match event {
            Event::Start => self.start(&mut effects),
            Event::TogglePause => self.toggle_pause(&mut effects),
            Event::Reset => self.reset(&mut effects),
            Event::SetDifficulty(difficulty) => {
                self.difficulty = difficulty;
                effects.push(Effect::DifficultyChanged {
                    difficulty,
                    applies_next: self.playing,
                });
            }
            Event::Select(kind) => self.select(kind, &mut effects),
            Event::PlacementDecided(placement) => self.placement_decided(placement, &mut effects),
            Event::TimerFired(timer) => self.timer_fired(timer, &mut effects),
        }
        effects
    }

    fn start(&mut self, effects: &mut Vec<Effect>) {
        if self.phase.is_terminal() {
            self.reset(effects);
        }
        if self.playing {
            return;
        }
        self.playing = true;
        self.paused = false;
        effects.push(Effect::Started);
        self.drain_queue(effects);
    }

    fn toggle_pause(&mut self, effects: &mut Vec<Effect>) {
        if !self.playing {
            return;
        }
        self.paused = !self.paused;
        if self.paused {
            effects.push(Effect::Paused);
        } else {
            effects.push(Effect::Resumed);
            self.drain_queue(effects);
        }
    }

    fn reset(&mut self, effects: &mut Vec<Effect>) {
        self.grid = Grid::EMPTY;
        self.stats = GameStats::new();
        self.queue.clear();
        self.playing = false;
        self.paused = false;
        self.phase = Phase::Idle;
        effects.push(Effect::CancelTimers);
        effects.push(Effect::ResetDone);
    }

    fn select(&mut self, kind: PieceKind, effects: &mut Vec<Effect>) {
        if !self.playing || self.paused || self.phase.is_terminal() {
            debug!(%kind, "ignoring piece request");
            return;
        }
        if self.is_processing() {
            match self.queue.try_push(kind) {
                Ok(()) => {
                    let queue_len = self.queue.len();
                    debug!(%kind, queue_len, "piece queued");
                    effects.push(Effect::PieceQueued { kind, queue_len });
                }
                Err(err) => {
                    debug!(%kind, %err, "piece dropped");
                    effects.push(Effect::PieceRejected { kind });
                }
            }
            return;
        }
        self.begin(kind, effects);
    }

    fn begin(&mut self, kind: PieceKind, effects: &mut Vec<Effect>) {
        self.phase = Phase::Planning { kind };
        effects.push(Effect::RequestPlacement {
            kind,
            difficulty: self.difficulty,
        });
    }

    fn placement_decided(&mut self, placement: Option<Placement>, effects: &mut Vec<Effect>) {
        let Phase::Planning { kind } = self.phase else {
            return;
        };
        let Some(placement) = placement else {
            debug!(%kind, "no legal placement, discarding piece");
            effects.push(Effect::PieceDiscarded { kind });
            self.phase = Phase::Idle;
            self.drain_queue(effects);
            return;
        };
        debug!(
            %kind,
            col = placement.col,
            row = placement.row,
            rotation = placement.rotation,
            "placement decided"
        );
        let piece = FallingPiece::new(kind, placement);
        effects.push(Effect::PlacementStarted { piece });
        self.drop_step(piece, effects);
    }

    fn drop_step(&mut self, piece: FallingPiece, effects: &mut Vec<Effect>) {
        if piece.has_landed() {
            self.commit(piece, effects);
            return;
        }
        let piece = piece.stepped_down(self.config.drop_rows_per_step.max(1));
        effects.push(Effect::PieceMoved { piece });
        self.phase = Phase::Dropping { piece };
        schedule(Timer::DropStep, self.config.drop_step_interval, effects);
    }

    fn commit(&mut self, piece: FallingPiece, effects: &mut Vec<Effect>) {
        self.grid.fill_placement(piece.placement(), piece.kind());
        self.stats.record_commit(self.grid.max_height());
        effects.push(Effect::PieceCommitted {
            kind: piece.kind(),
            placement: *piece.placement(),
            stats: self.stats,
        });
        self.phase = Phase::Settling;
        schedule(Timer::LineCheck, self.config.settle_delay, effects);
    }

    fn timer_fired(&mut self, timer: Timer, effects: &mut Vec<Effect>) {
        match (timer, self.phase.clone()) {
            (Timer::DropStep, Phase::Dropping { piece }) => self.drop_step(piece, effects),
            (Timer::LineCheck, Phase::Settling) => {
                let lines = self.grid.completed_rows();
                if lines.is_empty() {
                    self.check_terminal(effects);
                } else {
                    debug!(?lines, "lines completed");
                    effects.push(Effect::LinesHighlighted {
                        lines: lines.clone(),
                    });
                    self.phase = Phase::Clearing { lines };
                    schedule(Timer::ClearLines, self.config.highlight_duration, effects);
                }
            }
            (Timer::ClearLines, Phase::Clearing { lines }) => {
                let count = self.grid.clear_rows(&lines);
                self.stats.record_clear(count);
                effects.push(Effect::LinesCleared {
                    count,
                    stats: self.stats,
                });
                self.phase = Phase::ClearSettling;
                schedule(Timer::TerminalCheck, self.config.post_clear_delay, effects);
            }
            (Timer::TerminalCheck, Phase::ClearSettling) => self.check_terminal(effects),
            (timer, phase) => debug!(?timer, ?phase, "ignoring stale timer"),
        }
    }

    fn check_terminal(&mut self, effects: &mut Vec<Effect>) {
        if self.grid.has_blocks_in_top_rows(Grid::DANGER_ROWS) {
            self.phase = Phase::Terminal;
            self.playing = false;
            let bonus = self.stats.record_completion(self.difficulty);
            effects.push(Effect::GameCleared {
                final_score: self.stats.score(),
                bonus,
            });
            return;
        }
        self.phase = Phase::Idle;
        self.drain_queue(effects);
    }

    fn drain_queue(&mut self, effects: &mut Vec<Effect>) {
        if !self.playing || self.paused || !self.phase.is_idle() {
            return;
        }
        if let Some(kind) = self.queue.pop_front() {
            effects.push(Effect::PieceDequeued { kind });
            self.begin(kind, effects);
        }
    }
}

fn schedule(timer: Timer, after: Duration, effects: &mut Vec<Effect>) {
    effects.push(Effect::Schedule { timer, after });
}
