//! # Corridor Routing
//!
//! Breadth-first grid search for corridor paths between rooms.
//!
//! The neighbour visiting order is the only tie-break the search has, so it is
//! what gives corridors their style: straight corridors greedily try the step
//! that closes the most distance to the goal first, winding corridors shuffle
//! the four steps on every expansion.

use crate::{CorridorStyle, Position, Room, SeededRandom};
use pathfinding::prelude::bfs;

/// Probability that a `MIXED` corridor shuffles its neighbours on a given expansion.
pub const MIXED_SHUFFLE_CHANCE: f64 = 0.35;

/// Obstacle map for corridor routing: every cell of every room is blocked.
#[derive(Debug, Clone)]
pub struct RoutingGrid {
    width: i32,
    height: i32,
    blocked: Vec<bool>,
}

impl RoutingGrid {
    /// Creates a grid with no blocked cells.
    pub fn new(width: i32, height: i32) -> Self {
        let cells = (width.max(0) * height.max(0)) as usize;
        Self {
            width,
            height,
            blocked: vec![false; cells],
        }
    }

    /// Creates a grid with every room's cells blocked.
    pub fn with_rooms(width: i32, height: i32, rooms: &[Room]) -> Self {
        let mut grid = Self::new(width, height);
        for room in rooms {
            grid.block_room(room);
        }
        grid
    }

    pub fn block_room(&mut self, room: &Room) {
        for y in room.y..=room.bottom() {
            for x in room.x..=room.right() {
                if let Some(index) = self.index(Position::new(x, y)) {
                    self.blocked[index] = true;
                }
            }
        }
    }

    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && pos.x < self.width && pos.y < self.height
    }

    pub fn is_blocked(&self, pos: Position) -> bool {
        self.index(pos).map_or(true, |index| self.blocked[index])
    }

    fn index(&self, pos: Position) -> Option<usize> {
        self.in_bounds(pos)
            .then(|| (pos.y * self.width + pos.x) as usize)
    }

    /// Finds a path from `start` to `goal` over open cells.
    ///
    /// Cells listed in `passable` are treated as open even when a room covers
    /// them; this is how a corridor is allowed to leave its own rooms. Returns
    /// every visited cell from `start` to `goal` inclusive, or `None` if the
    /// goal is unreachable.
    pub fn find_path(
        &self,
        start: Position,
        goal: Position,
        passable: &[Position],
        style: CorridorStyle,
        rng: &mut SeededRandom,
    ) -> Option<Vec<Position>> {
        bfs(
            &start,
            |&pos| {
                let mut steps = pos.cardinal_adjacent_positions();
                let shuffle = match style {
                    CorridorStyle::Winding => true,
                    CorridorStyle::Mixed => rng.chance(MIXED_SHUFFLE_CHANCE),
                    CorridorStyle::Straight => false,
                };
                if shuffle {
                    rng.shuffle(&mut steps);
                } else {
                    steps.sort_by_key(|step| step.manhattan_distance(goal));
                }
                steps
                    .into_iter()
                    .filter(|step| {
                        self.in_bounds(*step) && (!self.is_blocked(*step) || passable.contains(step))
                    })
                    .collect::<Vec<_>>()
            },
            |&pos| pos == goal,
        )
    }
}

/// Drops repeated points and every point lying on a straight run between its
/// neighbours, leaving only the corners of an orthogonal polyline.
///
/// # Examples
///
/// ```
/// use cairn::{compress_polyline, Position};
///
/// let path = vec![
///     Position::new(0, 0),
///     Position::new(1, 0),
///     Position::new(2, 0),
///     Position::new(2, 1),
///     Position::new(2, 2),
/// ];
/// assert_eq!(
///     compress_polyline(path),
///     vec![Position::new(0, 0), Position::new(2, 0), Position::new(2, 2)]
/// );
/// ```
pub fn compress_polyline(points: Vec<Position>) -> Vec<Position> {
    let mut deduped: Vec<Position> = Vec::with_capacity(points.len());
    for point in points {
        if deduped.last() != Some(&point) {
            deduped.push(point);
        }
    }

    let mut compressed: Vec<Position> = Vec::with_capacity(deduped.len());
    for point in deduped {
        if compressed.len() >= 2 {
            let prev = compressed[compressed.len() - 2];
            let mid = compressed[compressed.len() - 1];
            let collinear =
                (prev.x == mid.x && mid.x == point.x) || (prev.y == mid.y && mid.y == point.y);
            if collinear {
                compressed.pop();
            }
        }
        compressed.push(point);
    }
    compressed
}
