use std::{
    collections::{HashSet, VecDeque},
    rc::Rc,
};

use crate::maze::{Maze, Position, neighboring_spaces};

/// A search node: the tip of a path prefix, linked back to the start
/// through its parents.
struct TrackedCell {
    coord: Position,
    parent: Option<Rc<TrackedCell>>,
}

impl TrackedCell {
    /// Walks the parent links back to the start.
    fn path(&self) -> Vec<Position> {
        let mut path = vec![self.coord];
        let mut current = self.parent.as_ref();
        while let Some(cell) = current {
            path.push(cell.coord);
            current = cell.parent.as_ref();
        }
        path.reverse();
        path
    }
}

pub fn solve_bfs(maze: &Maze) -> Option<Vec<Position>> {
    let (start, goal) = (maze.start(), maze.end());
    if start == goal {
        return Some(vec![start]);
    }

    let mut queue = VecDeque::from([Rc::new(TrackedCell {
        coord: start,
        parent: None,
    })]);
    let mut visited = HashSet::from([start]);

    while let Some(current) = queue.pop_front() {
        for neighbor in neighboring_spaces(maze, current.coord) {
            if neighbor == goal {
                let path = TrackedCell {
                    coord: neighbor,
                    parent: Some(current),
                }
                .path();
                tracing::trace!("[bfs] reached goal after visiting {} cells", visited.len());
                return Some(path);
            }
            if visited.insert(neighbor) {
                queue.push_back(Rc::new(TrackedCell {
                    coord: neighbor,
                    parent: Some(current.clone()),
                }));
            }
        }
    }

    tracing::trace!("[bfs] exhausted {} cells without reaching the goal", visited.len());
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solvers::{solution_length, solve};

    #[test]
    fn test_unsolvable() {
        let maze: Maze = "ww..ww\nxw....\nwAwwww".parse().unwrap();
        assert_eq!(solve(&maze), None);
        assert_eq!(solution_length(&maze), 0);
    }

    #[test]
    fn test_solvable() {
        let maze: Maze = "ww...w\nww.w.w\nwwAwx.\nww..w.\nww....".parse().unwrap();
        let expected = [(2, 2), (1, 2), (0, 2), (0, 3), (0, 4), (1, 4), (2, 4)]
            .map(|(row, col)| Position::new(row, col))
            .to_vec();
        assert_eq!(solve(&maze), Some(expected));
    }

    #[test]
    fn test_example_maze() {
        let maze: Maze = "...w\n.wxw\nAwww\n...w".parse().unwrap();
        let path = solve(&maze).unwrap();
        assert_eq!(path.len(), 6);
        assert_eq!(path.first(), Some(&Position::new(2, 0)));
        assert_eq!(path.last(), Some(&Position::new(1, 2)));
    }

    #[test]
    fn test_path_is_contiguous() {
        let maze: Maze = "A....\n.ww.w\n...w.\nw.w..\n....x".parse().unwrap();
        let path = solve(&maze).unwrap();
        for pair in path.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            assert_eq!((a.row - b.row).abs() + (a.col - b.col).abs(), 1);
            assert!(!maze.wall(b));
        }
    }

    #[test]
    fn test_start_is_end() {
        let maze = Maze::new(1, 2, vec![false, false], Position::new(0, 1), Position::new(0, 1)).unwrap();
        assert_eq!(solve(&maze), Some(vec![Position::new(0, 1)]));
    }

    #[test]
    fn test_shorter_route_wins() {
        // A long detour to the right and a short one straight down.
        let maze: Maze = "A....\n.www.\n.www.\nx....".parse().unwrap();
        assert_eq!(solution_length(&maze), 4);
    }
}
