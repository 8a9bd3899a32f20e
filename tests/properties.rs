use mazenv::{
    Action, Env, Maze, MazeEnv, MetaEnv, Position, SurroundingsEnv,
    generators::{Generator, GeneratorKind, IslandGenerator, PrimGenerator, get_rng},
    solve,
};
use proptest::prelude::*;

/// Shortest path length in cells by repeated relaxation over the whole grid,
/// independent of the queue-based solver.
fn reference_distance(maze: &Maze) -> Option<usize> {
    let mut dist = vec![usize::MAX; maze.rows() * maze.cols()];
    dist[maze.cell_index(maze.start())] = 1;
    let mut changed = true;
    while changed {
        changed = false;
        for pos in maze.positions().filter(|&p| !maze.wall(p)) {
            let idx = maze.cell_index(pos);
            for (d_row, d_col) in [(-1, 0), (1, 0), (0, -1), (0, 1)] {
                let n = pos.offset(d_row, d_col);
                if maze.wall(n) {
                    continue;
                }
                let through = dist[maze.cell_index(n)].saturating_add(1);
                if through < dist[idx] {
                    dist[idx] = through;
                    changed = true;
                }
            }
        }
    }
    let d = dist[maze.cell_index(maze.end())];
    (d != usize::MAX).then_some(d)
}

/// A random grid with distinct, open start and end cells.
fn arb_maze() -> impl Strategy<Value = Maze> {
    (1usize..8, 2usize..8).prop_flat_map(|(rows, cols)| {
        let cells = rows * cols;
        (
            Just((rows, cols)),
            prop::collection::vec(prop::bool::weighted(0.35), cells),
            0..cells,
            0..cells - 1,
        )
            .prop_map(|((rows, cols), mut walls, start, end)| {
                // Pick the end among the cells other than the start
                let end = if end >= start { end + 1 } else { end };
                walls[start] = false;
                walls[end] = false;
                let at = |i: usize| Position::new((i / cols) as i32, (i % cols) as i32);
                Maze::new(rows, cols, walls, at(start), at(end)).unwrap()
            })
    })
}

proptest! {
    #[test]
    fn test_text_round_trip(maze in arb_maze()) {
        let text = maze.to_string();
        let parsed = Maze::parse(&text).unwrap();
        prop_assert_eq!(parsed.to_string(), text);
        prop_assert_eq!(parsed, maze);
    }

    #[test]
    fn test_bordered_preserves_cells(maze in arb_maze()) {
        let bordered = maze.bordered();
        prop_assert_eq!(bordered.rows(), maze.rows() + 2);
        prop_assert_eq!(bordered.cols(), maze.cols() + 2);
        for pos in maze.positions() {
            prop_assert_eq!(bordered.wall(pos.offset(1, 1)), maze.wall(pos));
        }
        for pos in bordered.positions() {
            let on_ring = pos.row == 0
                || pos.col == 0
                || pos.row as usize == bordered.rows() - 1
                || pos.col as usize == bordered.cols() - 1;
            if on_ring {
                prop_assert!(bordered.wall(pos));
            }
        }
        prop_assert_eq!(bordered.start(), maze.start().offset(1, 1));
        prop_assert_eq!(bordered.end(), maze.end().offset(1, 1));
    }

    #[test]
    fn test_bfs_is_optimal(maze in arb_maze()) {
        let expected = reference_distance(&maze);
        let path = solve(&maze);
        prop_assert_eq!(path.as_ref().map(Vec::len), expected);
        if let Some(path) = path {
            prop_assert_eq!(path.first(), Some(&maze.start()));
            prop_assert_eq!(path.last(), Some(&maze.end()));
        }
    }

    #[test]
    fn test_generated_mazes_are_solvable(seed in any::<u64>(), half_rows in 1usize..10, half_cols in 1usize..10) {
        let (rows, cols) = (2 * half_rows + 1, 2 * half_cols + 1);
        for kind in GeneratorKind::ALL {
            let maze = kind.with_defaults().generate(rows, cols, &mut get_rng(Some(seed))).unwrap();
            prop_assert_ne!(maze.start(), maze.end());
            prop_assert!(!maze.wall(maze.start()));
            prop_assert!(!maze.wall(maze.end()));
            prop_assert!(solve(&maze).is_some(), "{} produced an unsolvable maze:\n{}", kind, maze);
        }
    }

    #[test]
    fn test_island_parameters_keep_mazes_solvable(
        seed in any::<u64>(),
        density in 0.05f64..1.0,
        complexity in 0.05f64..1.0,
    ) {
        let generator = IslandGenerator { density, complexity };
        let maze = generator.generate(15, 11, &mut get_rng(Some(seed))).unwrap();
        prop_assert!(solve(&maze).is_some());
    }

    #[test]
    fn test_blocked_moves_keep_observation(maze in arb_maze(), action in 0usize..5) {
        let mut env = MazeEnv::new(maze.clone());
        let before = env.reset().unwrap();
        let action = Action::from_index(action).unwrap();
        let (d_row, d_col) = action.offset();
        let target = maze.start().offset(d_row, d_col);
        let step = env.step(&action.one_hot());
        if maze.wall(target) {
            let step = step.unwrap();
            prop_assert_eq!(env.position(), maze.start());
            prop_assert_eq!(step.observation, before);
        }
    }

    #[test]
    fn test_window_size(maze in arb_maze(), horizon in 0usize..4) {
        let mut env = SurroundingsEnv::new(MazeEnv::new(maze), horizon);
        let obs = env.reset().unwrap();
        prop_assert_eq!(obs.len(), (2 * horizon + 1).pow(2) * 5);
    }
}

#[test]
fn test_walking_the_solution_solves_every_run() {
    let maze = PrimGenerator.generate(9, 13, &mut get_rng(Some(21))).unwrap();
    let path = solve(&maze).unwrap();
    let actions = path
        .windows(2)
        .map(|pair| Action::between(pair[0], pair[1]).unwrap())
        .collect::<Vec<_>>();

    let num_runs = 4;
    let mut env = MetaEnv::new(MazeEnv::new(maze), num_runs);
    env.reset().unwrap();
    let mut dones = 0;
    for run in 0..num_runs {
        for (i, action) in actions.iter().enumerate() {
            let step = env.step(&action.one_hot()).unwrap();
            let last = i + 1 == actions.len();
            assert_eq!(step.reward, if last { 0.0 } else { -1.0 });
            if step.done {
                dones += 1;
            }
            assert_eq!(step.done, last && run + 1 == num_runs);
        }
    }
    assert_eq!(dones, 1);
    assert_eq!(env.runs_remaining(), 0);
}
