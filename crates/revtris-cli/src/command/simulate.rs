use std::{path::PathBuf, time::Duration};

use anyhow::Context;
use rand::{Rng, SeedableRng, rngs::StdRng};
use revtris_ai::PlacementSearch;
use revtris_engine::{
    CenterPlanner, Difficulty, Effect, GameSession, PieceKind, PlacementPlanner,
    parse_piece_sequence,
};

use crate::{
    schema::{config::ConfigFile, record::SessionRecord},
    util,
    view::board_text,
};

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::FromStr)]
pub enum PlannerKind {
    /// Exhaustive weighted search
    #[default]
    #[display("search")]
    Search,
    /// Unrotated piece dropped in the middle column
    #[display("center")]
    Center,
}

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct SimulateArg {
    /// Difficulty of the placement engine (easy, normal or hard)
    #[arg(long, default_value_t = Difficulty::Normal)]
    difficulty: Difficulty,
    /// Seed for the placement jitter and random requests
    #[arg(long)]
    seed: Option<u64>,
    /// Pieces to send, e.g. "IOTSZJL"
    #[arg(long, conflicts_with = "random", required_unless_present = "random")]
    pieces: Option<String>,
    /// Send this many uniformly random pieces instead of --pieces
    #[arg(long)]
    random: Option<usize>,
    /// JSON config file with session timings and difficulty weights
    #[arg(long)]
    config: Option<PathBuf>,
    /// Placement planner (search or center)
    #[arg(long, default_value_t = PlannerKind::Search)]
    planner: PlannerKind,
    /// Virtual milliseconds between two requests; defaults to the drop step interval
    #[arg(long)]
    request_interval_ms: Option<u64>,
    /// Stop sending after this many requests
    #[arg(long)]
    max_requests: Option<usize>,
    /// Write a JSON record of the session to this file
    #[arg(long)]
    record: Option<PathBuf>,
}

#[derive(Debug, Default)]
struct EventSummary {
    queued: usize,
    rejected: usize,
    discarded: usize,
}

impl EventSummary {
    fn tally(&mut self, events: &[Effect]) {
        for event in events {
            match event {
                Effect::PieceQueued { .. } => self.queued += 1,
                Effect::PieceRejected { .. } => self.rejected += 1,
                Effect::PieceDiscarded { .. } => self.discarded += 1,
                _ => {}
            }
        }
    }
}

pub(crate) fn run(arg: &SimulateArg) -> anyhow::Result<()> {
    let SimulateArg {
        difficulty,
        seed,
        pieces,
        random,
        config,
        planner,
        request_interval_ms,
        max_requests,
        record,
    } = arg;

    let config = ConfigFile::load_or_default(config.as_deref())?;
    let seed = seed.unwrap_or_else(|| rand::rng().random());
    let mut requests = match (pieces, random) {
        (Some(pieces), _) => parse_piece_sequence(pieces).context("Invalid --pieces value")?,
        (None, Some(count)) => random_pieces(seed, *count),
        (None, None) => anyhow::bail!("either --pieces or --random is required"),
    };
    if let Some(max) = max_requests {
        requests.truncate(*max);
    }
    let request_interval = request_interval_ms
        .map_or(config.session.drop_step_interval, Duration::from_millis);

    let placement_planner: Box<dyn PlacementPlanner> = match planner {
        PlannerKind::Search => {
            Box::new(PlacementSearch::with_seed(seed).with_table(config.difficulties))
        }
        PlannerKind::Center => Box::new(CenterPlanner),
    };
    let mut session = GameSession::new(placement_planner, config.session);
    session.set_difficulty(*difficulty);
    session.start();

    let mut summary = EventSummary::default();
    let mut sent = Vec::with_capacity(requests.len());
    for kind in requests {
        if session.is_terminal() {
            break;
        }
        session.request_placement(kind);
        sent.push(kind);
        session.advance(request_interval);
        summary.tally(&session.drain_events());
    }
    let elapsed = session.run_until_settled();
    summary.tally(&session.drain_events());
    tracing::debug!(?elapsed, "session settled");

    let stats = *session.stats();
    println!("{}", board_text::render_board(session.grid()));
    println!("difficulty:    {difficulty}");
    println!("planner:       {planner}");
    println!("seed:          {seed}");
    println!("requests:      {}", sent.len());
    println!("queued:        {}", summary.queued);
    println!("rejected:      {}", summary.rejected);
    println!("discarded:     {}", summary.discarded);
    println!("pieces sent:   {}", stats.pieces_sent());
    println!("lines cleared: {}", stats.lines_cleared());
    println!("max height:    {}", session.max_height());
    println!("score:         {}", stats.score());
    println!("virtual time:  {:?}", session.now());
    if session.is_terminal() {
        println!("stack reached the top: game cleared");
    }

    if let Some(path) = record {
        let record = SessionRecord {
            recorded_at: chrono::Utc::now(),
            difficulty: *difficulty,
            seed,
            planner: planner.to_string(),
            requests: sent,
            rejected: summary.rejected,
            discarded: summary.discarded,
            final_stats: stats,
            cleared: session.is_terminal(),
            board: board_text::grid_rows(session.grid()),
        };
        util::save_json(&record, Some(path.as_path()))?;
        eprintln!("Session record saved to {}", path.display());
    }

    Ok(())
}

fn random_pieces(seed: u64, count: usize) -> Vec<PieceKind> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count).map(|_| rng.random()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_planner_kind_from_str() {
        assert_eq!("search".parse::<PlannerKind>().unwrap(), PlannerKind::Search);
        assert_eq!("Center".parse::<PlannerKind>().unwrap(), PlannerKind::Center);
        assert!("random".parse::<PlannerKind>().is_err());
        assert_eq!(PlannerKind::Center.to_string(), "center");
    }

    #[test]
    fn test_random_pieces_are_reproducible() {
        let a = random_pieces(9, 32);
        let b = random_pieces(9, 32);
        assert_eq!(a.len(), 32);
        assert_eq!(a, b);
    }

    #[test]
    fn test_event_summary() {
        let mut summary = EventSummary::default();
        summary.tally(&[
            Effect::PieceQueued {
                kind: PieceKind::I,
                queue_len: 1,
            },
            Effect::PieceRejected { kind: PieceKind::O },
            Effect::PieceRejected { kind: PieceKind::O },
            Effect::PieceDiscarded { kind: PieceKind::S },
            Effect::Started,
        ]);
        assert_eq!(summary.queued, 1);
        assert_eq!(summary.rejected, 2);
        assert_eq!(summary.discarded, 1);
    }
}
