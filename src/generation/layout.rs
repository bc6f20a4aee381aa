//! # Layout Generation
//!
//! Room placement and corridor routing for the base dungeon topology.
//!
//! This generator creates layouts by:
//! 1. Placing odd-sized rooms by rejection sampling
//! 2. Building a spanning set of connections between nearby rooms, plus loops
//! 3. Routing each connection as a corridor with breadth-first grid search

use crate::{
    compress_polyline, config, stable_entity_id, CairnError, CairnResult, Corridor,
    GenerationContext, Generator, GeneratorConfig, PassKind, Position, Room, RoutingGrid,
    SeededRandom,
};
use log::{debug, warn};

/// Rooms and corridors produced by the layout pass.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Layout {
    pub rooms: Vec<Room>,
    pub corridors: Vec<Corridor>,
}

/// A candidate connection between two rooms, by index into the connection order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Edge {
    distance: u32,
    a: usize,
    b: usize,
}

/// Primary layout generator using a room-and-corridor algorithm.
#[derive(Debug, Clone, Copy, Default)]
pub struct LayoutGenerator;

impl LayoutGenerator {
    /// Number of rooms placement aims for.
    ///
    /// # Examples
    ///
    /// ```
    /// use cairn::{GeneratorConfig, LayoutGenerator};
    ///
    /// // Small grids are clamped up to eight rooms.
    /// assert_eq!(LayoutGenerator::target_room_count(&GeneratorConfig::new(20, 20)), 8);
    /// ```
    pub fn target_room_count(config: &GeneratorConfig) -> usize {
        let mean_side = f64::from(config.min_room_size + config.max_room_size) / 2.0;
        let avg_room_area = (mean_side * mean_side).max(9.0);
        let grid_area = f64::from(config.width) * f64::from(config.height);
        let target = (grid_area * config.room_density / (avg_room_area * 1.8)).floor();
        (target.max(0.0) as usize).clamp(config::MIN_TARGET_ROOMS, config::MAX_TARGET_ROOMS)
    }

    /// Places rooms by rejection sampling.
    fn place_rooms(&self, context: &GenerationContext<'_>, rng: &mut SeededRandom) -> Vec<Room> {
        let config = context.config;
        let target = Self::target_room_count(config);
        let max_attempts = target * config::PLACEMENT_ATTEMPTS_PER_ROOM;
        let padding = if config.room_density >= 0.3 { 0 } else { 1 };

        let mut rooms: Vec<Room> = Vec::with_capacity(target);
        let mut attempts = 0;
        while attempts < max_attempts && rooms.len() < target {
            attempts += 1;
            let Some(mut candidate) = self.generate_room_candidate(context, rng, rooms.len()) else {
                continue;
            };
            if rooms
                .iter()
                .any(|existing| candidate.overlaps_with_padding(existing, padding))
            {
                continue;
            }
            candidate.is_secret = rng.chance(config.secret_room_chance);
            rooms.push(candidate);
        }

        debug!(
            "Placed {} of {} rooms in {} attempts",
            rooms.len(),
            target,
            attempts
        );

        if rooms.len() < 2 {
            warn!(
                "Only {} rooms placed on {}x{} grid, forcing fallback rooms",
                rooms.len(),
                config.width,
                config.height
            );
            rooms = self.fallback_rooms(context);
        }

        rooms
    }

    /// Samples one candidate room, or `None` if the sampled size cannot fit.
    fn generate_room_candidate(
        &self,
        context: &GenerationContext<'_>,
        rng: &mut SeededRandom,
        placed: usize,
    ) -> Option<Room> {
        let config = context.config;
        let width = odd_size(rng, config.min_room_size, config.max_room_size);
        let height = odd_size(rng, config.min_room_size, config.max_room_size);
        if width > config.width - 2 || height > config.height - 2 {
            return None;
        }

        let x = rng.int_in(1, config.width - width - 1);
        let y = rng.int_in(1, config.height - height - 1);
        let number = placed as u32 + 1;
        Some(Room::new(room_id(context, number), number, x, y, width, height))
    }

    /// Two fixed rooms in opposite corners.
    ///
    /// On small grids the far corner is pushed out so the rooms keep a
    /// one-cell gap.
    fn fallback_rooms(&self, context: &GenerationContext<'_>) -> Vec<Room> {
        let size = config::FALLBACK_ROOM_SIZE;
        let nearest = 2 + size + 1;
        let far_x = (context.config.width - 10).max(nearest);
        let far_y = (context.config.height - 10).max(nearest);
        vec![
            Room::new(room_id(context, 1), 1, 2, 2, size, size),
            Room::new(room_id(context, 2), 2, far_x, far_y, size, size),
        ]
    }

    /// Chooses which room pairs get corridors.
    ///
    /// Returns pairs of indices into `rooms`: first a spanning set that reaches
    /// every room, then extra loop edges depending on connectivity strictness.
    fn connect_rooms(
        &self,
        rooms: &[Room],
        config: &GeneratorConfig,
        rng: &mut SeededRandom,
    ) -> Vec<(usize, usize)> {
        if rooms.len() < 2 {
            return Vec::new(); // Nothing to connect
        }

        let mut order: Vec<usize> = (0..rooms.len()).collect();
        order.sort_by_key(|&index| (rooms[index].x, rooms[index].y));

        let mut edges = Vec::with_capacity(order.len() * (order.len() - 1) / 2);
        for a in 0..order.len() {
            for b in (a + 1)..order.len() {
                let distance = rooms[order[a]]
                    .center()
                    .manhattan_distance(rooms[order[b]].center());
                edges.push(Edge { distance, a, b });
            }
        }
        edges.sort_by_key(|edge| edge.distance);

        let mut selected = vec![false; edges.len()];
        let mut chosen = Vec::new();

        let mut connected = vec![false; order.len()];
        connected[0] = true;
        let mut reached = 1;
        while reached < order.len() {
            let next = edges
                .iter()
                .enumerate()
                .find(|(index, edge)| !selected[*index] && connected[edge.a] != connected[edge.b]);
            let Some((index, edge)) = next else {
                break;
            };
            selected[index] = true;
            connected[edge.a] = true;
            connected[edge.b] = true;
            reached += 1;
            chosen.push(*edge);
        }

        let strictness = config.connectivity_strictness;
        let extra_target = ((order.len() - 1) as f64 * strictness * 0.65).floor() as usize;
        let accept_rate = 0.25 + 0.6 * strictness;
        let mut extra = 0;
        for (index, edge) in edges.iter().enumerate() {
            if extra >= extra_target {
                break;
            }
            if selected[index] {
                continue;
            }
            if rng.chance(accept_rate) {
                selected[index] = true;
                chosen.push(*edge);
                extra += 1;
            }
        }

        debug!(
            "Connected {} rooms with {} spanning and {} extra edges",
            rooms.len(),
            reached - 1,
            extra
        );

        chosen
            .into_iter()
            .map(|edge| (order[edge.a], order[edge.b]))
            .collect()
    }

    /// Routes a corridor between two rooms.
    fn route_corridor(
        &self,
        grid: &RoutingGrid,
        from: &Room,
        to: &Room,
        config: &GeneratorConfig,
        rng: &mut SeededRandom,
    ) -> Corridor {
        let (start_anchor, start_outer) = corridor_anchor(from, to.center());
        let (end_anchor, end_outer) = corridor_anchor(to, from.center());
        let passable = [start_anchor, start_outer, end_anchor, end_outer];

        let points = match grid.find_path(start_outer, end_outer, &passable, config.corridor_style, rng)
        {
            Some(path) => {
                let mut points = Vec::with_capacity(path.len() + 2);
                points.push(start_anchor);
                points.extend(path);
                points.push(end_anchor);
                compress_polyline(points)
            }
            None => {
                warn!(
                    "No corridor path between rooms {} and {}, using raw anchor path",
                    from.number, to.number
                );
                vec![start_anchor, start_outer, end_outer, end_anchor]
            }
        };

        Corridor {
            id: stable_entity_id(&format!("corridor:{}:{}", from.id, to.id)),
            from_room_id: from.id,
            to_room_id: to.id,
            points,
        }
    }
}

impl Generator<Layout> for LayoutGenerator {
    fn generate(&self, context: &GenerationContext<'_>, rng: &mut SeededRandom) -> CairnResult<Layout> {
        let config = context.config;
        let rooms = self.place_rooms(context, rng);

        let grid = RoutingGrid::with_rooms(config.width, config.height, &rooms);
        let corridors = self
            .connect_rooms(&rooms, config, rng)
            .into_iter()
            .map(|(from, to)| self.route_corridor(&grid, &rooms[from], &rooms[to], config, rng))
            .collect();

        Ok(Layout { rooms, corridors })
    }

    fn validate(&self, layout: &Layout, context: &GenerationContext<'_>) -> CairnResult<()> {
        if layout.rooms.len() < 2 {
            return Err(CairnError::GenerationFailed(
                "layout has fewer than two rooms".to_string(),
            ));
        }
        for room in &layout.rooms {
            if room.x < 0
                || room.y < 0
                || room.right() >= context.config.width
                || room.bottom() >= context.config.height
            {
                return Err(CairnError::GenerationFailed(format!(
                    "room {} lies outside the grid",
                    room.number
                )));
            }
        }
        for corridor in &layout.corridors {
            let endpoints_exist = [corridor.from_room_id, corridor.to_room_id]
                .iter()
                .all(|id| layout.rooms.iter().any(|room| room.id == *id));
            if !endpoints_exist || corridor.points.len() < 2 {
                return Err(CairnError::IntegrityViolation(format!(
                    "corridor {} is not attached to two rooms",
                    corridor.id
                )));
            }
        }
        Ok(())
    }

    fn pass(&self) -> PassKind {
        PassKind::Layout
    }

    fn generator_type(&self) -> &'static str {
        "LayoutGenerator"
    }
}

/// Samples a room side in `min..=max`, nudged to an odd length so the room
/// has a whole-cell center.
fn odd_size(rng: &mut SeededRandom, min: i32, max: i32) -> i32 {
    let size = rng.int_in(min, max);
    if size % 2 != 0 {
        size
    } else if size < max {
        size + 1
    } else if size > min {
        size - 1
    } else {
        size
    }
}

fn room_id(context: &GenerationContext<'_>, number: u32) -> crate::EntityId {
    stable_entity_id(&format!(
        "{}:{}:room:{}",
        context.seed, context.config_hash, number
    ))
}

/// The wall cell of `room` facing `target`, and the cell just outside it.
///
/// The east or west wall is used when the horizontal distance dominates,
/// otherwise the north or south wall.
fn corridor_anchor(room: &Room, target: Position) -> (Position, Position) {
    let center = room.center();
    let dx = target.x - center.x;
    let dy = target.y - center.y;
    if dx.abs() >= dy.abs() {
        if dx >= 0 {
            (
                Position::new(room.right(), center.y),
                Position::new(room.right() + 1, center.y),
            )
        } else {
            (
                Position::new(room.x, center.y),
                Position::new(room.x - 1, center.y),
            )
        }
    } else if dy >= 0 {
        (
            Position::new(center.x, room.bottom()),
            Position::new(center.x, room.bottom() + 1),
        )
    } else {
        (
            Position::new(center.x, room.y),
            Position::new(center.x, room.y - 1),
        )
    }
}
