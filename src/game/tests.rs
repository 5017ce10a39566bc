//! Session scenario tests
//!
//! These drive [`GameSession`] through whole play-throughs on a small
//! hand-drawn maze with a single route, so every move can be checked against
//! a known optimal path. Time is simulated by offsetting a fixed start.

use super::*;
use crate::error::MazeError;
use crate::game::keys::{GameKey, KeyState, key_from_name};

// One route from (0, 0) to (4, 0), plus a dead end down the left column.
const MAZE: &str = "   # \n # # \n #   \n";
const EXIT: Cell = Cell { col: 4, row: 0 };

fn at(start: DateTime<Local>, secs: i64) -> DateTime<Local> {
    start + Duration::seconds(secs)
}

fn session() -> GameSession {
    let grid = Grid::from_ascii(MAZE).unwrap();
    GameSession::solve(
        "test",
        "Tester",
        Difficulty::Easy,
        grid,
        EXIT,
        &GameConfig::default(),
    )
    .unwrap()
}

fn started() -> (GameSession, DateTime<Local>) {
    let mut session = session();
    let start = Local::now();
    assert!(session.start(start));
    (session, start)
}

fn route_directions(session: &GameSession) -> Vec<Direction> {
    session
        .optimal_path()
        .cells()
        .windows(2)
        .map(|pair| Direction::between(pair[0], pair[1]).unwrap())
        .collect()
}

#[test]
fn optimal_path_is_the_single_route() {
    let session = session();
    assert_eq!(session.optimal_path().len(), 9);
    assert_eq!(session.optimal_path().first(), ENTRANCE);
    assert_eq!(session.optimal_path().last(), EXIT);
    assert_eq!(session.position(), ENTRANCE);
    assert_eq!(session.state(), SessionState::Initializing);
}

#[test]
fn events_before_start_are_ignored() {
    let mut session = session();
    let now = Local::now();
    assert_eq!(session.request_move(Direction::Right, now), EventOutcome::Ignored);
    assert_eq!(session.request_hint(), EventOutcome::Ignored);
    assert_eq!(session.toggle_solution(), EventOutcome::Ignored);
    assert_eq!(session.tick(at(now, 60)), EventOutcome::Ignored);
    assert_eq!(session.hints_remaining(), 3);
    assert_eq!(session.remaining_time(now), Duration::seconds(30));

    assert!(session.start(now));
    assert!(!session.start(now));
    assert_eq!(session.state(), SessionState::Playing);
}

#[test]
fn three_of_four_moves_on_path_scores_seventy_five() {
    let (mut session, start) = started();
    let moves = [
        Direction::Right, // (0,0) -> (1,0), on path
        Direction::Left,  // back again, off path
        Direction::Right, // on path
        Direction::Right, // (1,0) -> (2,0), on path
    ];
    for (i, dir) in moves.into_iter().enumerate() {
        let outcome = session.request_move(dir, at(start, i as i64 + 1));
        assert!(matches!(outcome, EventOutcome::Moved(_)), "{outcome:?}");
    }
    assert_eq!(session.moves().len(), 4);
    assert!(!session.moves()[1].on_optimal_path);
    assert_eq!(session.moves()[0].reaction_time, None);
    assert_eq!(session.moves()[3].reaction_time, Some(Duration::seconds(1)));

    let EventOutcome::Finished(metrics) = session.tick(at(start, 30)) else {
        panic!("session should time out");
    };
    assert_eq!(session.state(), SessionState::Lost);
    assert!(!metrics.won);
    assert_eq!(metrics.total_moves, 4);
    assert_eq!(metrics.correct_moves, 3);
    assert_eq!(metrics.path_accuracy, 75.0);
    assert_eq!(metrics.avg_reaction_time, 1.0);
    assert_eq!(metrics.completion_time, 30.0);
    assert_eq!(metrics.remaining_time, 0);
    assert_eq!(metrics.optimal_path_length, 9);
}

#[test]
fn idle_session_is_lost_at_the_time_limit() {
    let (mut session, start) = started();
    assert_eq!(
        session.tick(at(start, 29)),
        EventOutcome::Ticked {
            remaining: Duration::seconds(1)
        }
    );
    assert_eq!(session.format_time(at(start, 29)), "01.00");

    let outcome = session.handle(GameEvent::Tick, at(start, 31));
    let EventOutcome::Finished(metrics) = outcome else {
        panic!("expected timeout, got {outcome:?}");
    };
    assert!(!metrics.won);
    assert_eq!(metrics.total_moves, 0);
    assert_eq!(metrics.path_accuracy, 0.0);
    assert_eq!(metrics.avg_reaction_time, 0.0);
    assert_eq!(session.remaining_time(at(start, 31)), Duration::zero());
}

#[test]
fn walls_and_edges_block_without_logging() {
    let (mut session, start) = started();
    assert_eq!(session.request_move(Direction::Up, start), EventOutcome::Blocked);
    assert_eq!(session.request_move(Direction::Left, start), EventOutcome::Blocked);

    assert!(matches!(
        session.request_move(Direction::Right, at(start, 1)),
        EventOutcome::Moved(_)
    ));
    // (1, 1) is a wall.
    assert_eq!(session.request_move(Direction::Down, at(start, 2)), EventOutcome::Blocked);
    assert_eq!(session.position(), Cell::new(1, 0));
    assert_eq!(session.moves().len(), 1);
}

#[test]
fn raw_deltas_must_be_unit_steps() {
    let (mut session, start) = started();
    assert_eq!(session.request_move_delta(1, 1, start), EventOutcome::Blocked);
    assert_eq!(session.request_move_delta(0, 0, start), EventOutcome::Blocked);
    assert_eq!(session.request_move_delta(2, 0, start), EventOutcome::Blocked);
    assert!(matches!(
        session.request_move_delta(1, 0, start),
        EventOutcome::Moved(_)
    ));
    assert!(session.moves().iter().all(|m| m.from.is_adjacent(m.to)));
}

#[test]
fn reaching_the_exit_wins_and_freezes_the_session() {
    let (mut session, start) = started();
    let route = route_directions(&session);
    let last = route.len() - 1;

    for (i, dir) in route.iter().enumerate() {
        let outcome = session.handle(GameEvent::Move(*dir), at(start, i as i64 + 1));
        if i < last {
            assert!(matches!(outcome, EventOutcome::Moved(_)), "{outcome:?}");
        } else {
            let EventOutcome::Finished(metrics) = outcome else {
                panic!("last step should win, got {outcome:?}");
            };
            assert!(metrics.won);
            assert_eq!(metrics.total_moves, 8);
            assert_eq!(metrics.path_accuracy, 100.0);
            assert_eq!(metrics.completion_time, 8.0);
            assert_eq!(metrics.remaining_time, 22);
        }
    }
    assert_eq!(session.state(), SessionState::Won);
    assert_eq!(session.position(), EXIT);

    let frozen = session.metrics().cloned();
    assert_eq!(session.request_move(Direction::Down, at(start, 9)), EventOutcome::Ignored);
    assert_eq!(session.tick(at(start, 60)), EventOutcome::Ignored);
    assert_eq!(session.request_hint(), EventOutcome::Ignored);
    assert_eq!(session.toggle_solution(), EventOutcome::Ignored);
    assert_eq!(session.metrics().cloned(), frozen);
    assert_eq!(session.state(), SessionState::Won);
}

#[test]
fn finished_session_produces_records() {
    let (mut session, start) = started();
    assert!(session.record().is_none());
    for (i, dir) in route_directions(&session).into_iter().enumerate() {
        session.request_move(dir, at(start, i as i64 + 1));
    }

    let record = session.record().unwrap();
    assert_eq!(record.session_id, "test");
    assert_eq!(record.player_name, "Tester");
    assert_eq!(record.difficulty, Difficulty::Easy);
    assert!(record.completed);
    assert_eq!(record.correct_moves, 8);
    assert_eq!(record.optimal_path_length, 9);
    assert_eq!(
        record.timestamp,
        at(start, 8).format("%Y-%m-%d %H:%M:%S").to_string()
    );

    let details = session.move_details();
    assert_eq!(details.len(), 8);
    assert_eq!(details[0].reaction_time, 0.0);
    assert_eq!(details[1].reaction_time, 1.0);
    assert_eq!(details[7].move_number, 8);
    assert!(details.iter().all(|d| d.session_id == "test"));
}

#[test]
fn hints_follow_the_route_until_the_budget_runs_out() {
    let (mut session, start) = started();
    assert_eq!(session.request_hint(), EventOutcome::Hint(Cell::new(1, 0)));
    assert_eq!(session.latest_hint(), Some(Cell::new(1, 0)));
    assert_eq!(session.hints_remaining(), 2);

    // Into the dead end: the hint falls back to the route start.
    session.request_move(Direction::Down, at(start, 1));
    assert_eq!(session.request_hint(), EventOutcome::Hint(ENTRANCE));

    session.request_move(Direction::Up, at(start, 2));
    session.request_move(Direction::Right, at(start, 3));
    assert_eq!(session.request_hint(), EventOutcome::Hint(Cell::new(2, 0)));
    assert_eq!(session.hints_remaining(), 0);

    assert_eq!(session.request_hint(), EventOutcome::HintsDepleted);
    assert_eq!(session.latest_hint(), Some(Cell::new(2, 0)));
    assert_eq!(session.hints_used(), 3);

    let EventOutcome::Finished(metrics) = session.tick(at(start, 30)) else {
        panic!("session should time out");
    };
    assert_eq!(metrics.hints_used, 3);
}

#[test]
fn solution_views_count_each_reveal() {
    let (mut session, _) = started();
    assert!(session.visible_solution().is_none());
    assert!(!session.render().contains('.'));

    assert_eq!(session.toggle_solution(), EventOutcome::SolutionShown);
    assert_eq!(session.visible_solution(), Some(session.optimal_path()));
    assert!(session.render().contains('.'));

    assert_eq!(session.toggle_solution(), EventOutcome::SolutionHidden);
    assert_eq!(session.handle(GameEvent::ToggleSolution, Local::now()), EventOutcome::SolutionShown);
    assert_eq!(session.solution_views(), 2);
}

#[test]
fn render_marks_player_exit_and_hint() {
    let (mut session, _) = started();
    session.request_hint();
    assert_eq!(session.render(), "@* #X\n # # \n #   \n");
}

#[test]
fn held_keys_become_moves() {
    let (mut session, start) = started();
    let mut keys = KeyState::new();
    keys.press_key(key_from_name("Right").unwrap());
    keys.press_key(GameKey::MoveDown);

    // Down is sampled first: (0,0) -> (0,1), then right into a wall.
    let outcomes: Vec<EventOutcome> = keys
        .held_directions()
        .into_iter()
        .map(|dir| session.request_move(dir, start))
        .collect();
    assert!(matches!(outcomes[0], EventOutcome::Moved(_)));
    assert_eq!(outcomes[1], EventOutcome::Blocked);
    assert_eq!(session.position(), Cell::new(0, 1));

    let hint = key_from_name("h").and_then(GameKey::discrete_event).unwrap();
    assert_eq!(session.handle(hint, start), EventOutcome::Hint(ENTRANCE));
}

#[test]
fn accuracy_and_reaction_stay_in_bounds() {
    for pattern in [
        vec![Direction::Down, Direction::Up, Direction::Down],
        vec![Direction::Right, Direction::Left],
        vec![Direction::Right],
    ] {
        let (mut session, start) = started();
        for (i, dir) in pattern.into_iter().enumerate() {
            session.request_move(dir, at(start, i as i64));
        }
        let EventOutcome::Finished(metrics) = session.tick(at(start, 45)) else {
            panic!("session should time out");
        };
        assert!((0.0..=100.0).contains(&metrics.path_accuracy));
        assert!(metrics.avg_reaction_time >= 0.0);
        assert!(metrics.correct_moves <= metrics.total_moves);
    }
}

#[test]
fn sessions_refuse_bad_paths() {
    let grid = Grid::from_ascii(MAZE).unwrap();
    let config = GameConfig::default();
    let build = |path: Vec<Cell>| {
        GameSession::new("t", "p", Difficulty::Easy, grid.clone(), EXIT, path, &config)
    };

    assert!(matches!(build(Vec::new()), Err(MazeError::InvalidPath { .. })));
    assert!(matches!(
        build(vec![Cell::new(1, 0), Cell::new(2, 0)]),
        Err(MazeError::InvalidPath { .. })
    ));
    // Right endpoints, but it jumps across the wall.
    assert!(matches!(
        build(vec![ENTRANCE, Cell::new(1, 0), Cell::new(2, 0), EXIT]),
        Err(MazeError::InvalidPath { .. })
    ));
}

#[test]
fn unreachable_exit_is_no_path() {
    let grid = Grid::from_ascii("  #  \n  #  \n").unwrap();
    let result = GameSession::solve(
        "t",
        "p",
        Difficulty::Easy,
        grid,
        Cell::new(4, 1),
        &GameConfig::default(),
    );
    assert_eq!(
        result.err(),
        Some(MazeError::NoPath {
            from: ENTRANCE,
            to: Cell::new(4, 1)
        })
    );
}

#[test]
fn prepare_builds_a_playable_session() {
    let created = Local::now();
    let setup = SessionSetup {
        player_name: "Ada".to_string(),
        difficulty: Difficulty::Easy,
        seed: Some(7),
        config: GameConfig::default(),
    };
    let session = GameSession::prepare(setup.clone(), created).unwrap();

    assert_eq!(session.grid().width(), 10);
    assert_eq!(session.grid().height(), 10);
    assert!(session.exit().manhattan(ENTRANCE) >= 5);
    assert_eq!(session.optimal_path().first(), ENTRANCE);
    assert_eq!(session.optimal_path().last(), session.exit());
    assert!(session.optimal_path().is_valid_on(session.grid()));
    assert_eq!(session.id(), created.format("%Y%m%d_%H%M%S").to_string());
    assert_eq!(session.player_name(), "Ada");
    assert_eq!(session.hints_remaining(), 3);

    let again = GameSession::prepare(setup, created).unwrap();
    assert_eq!(again.grid(), session.grid());
    assert_eq!(again.exit(), session.exit());
}

#[test]
fn blank_player_name_falls_back_to_default() {
    for name in ["", "   "] {
        let setup = SessionSetup {
            player_name: name.to_string(),
            difficulty: Difficulty::Easy,
            seed: Some(3),
            config: GameConfig::default(),
        };
        let session = GameSession::prepare(setup, Local::now()).unwrap();
        assert_eq!(session.player_name(), DEFAULT_PLAYER_NAME);
    }
    assert_eq!(session().player_name(), "Tester");
}

#[test]
fn config_sets_limits() {
    let config = GameConfig {
        time_limit_secs: 5,
        hint_budget: 1,
        ..GameConfig::default()
    };
    let grid = Grid::from_ascii(MAZE).unwrap();
    let mut session =
        GameSession::solve("t", "p", Difficulty::Easy, grid, EXIT, &config).unwrap();
    let start = Local::now();
    session.start(start);

    assert_eq!(session.request_hint(), EventOutcome::Hint(Cell::new(1, 0)));
    assert_eq!(session.request_hint(), EventOutcome::HintsDepleted);
    assert!(matches!(session.tick(at(start, 5)), EventOutcome::Finished(_)));
    assert_eq!(session.state(), SessionState::Lost);
}
