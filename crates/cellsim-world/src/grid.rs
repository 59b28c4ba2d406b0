//! The toroidal tile grid and the cell arena that lives on it.
//!
//! [`World`] owns every [`Tile`] and every [`Cell`]. Tiles refer to cells
//! through [`CellId`] handles; the world is the only owner of both. It also
//! keeps three registries that the scheduler merges between ticks:
//!
//! - `live` -- cells processed each tick, in processing order
//! - `born_this_tick` -- children created during the current pass
//! - `consumed_corpses` -- corpses eaten during the current pass
//!
//! Tiles are stored row-major (`y * width + x`). All coordinate arithmetic
//! is checked or wrapped before a tile is dereferenced, so an out-of-range
//! coordinate never reaches the backing vector.

use std::collections::{BTreeMap, BTreeSet};

use cellsim_types::{Cell, CellId, CellView, Location, Sugar, TileView};
use rand::Rng;
use tracing::{info, warn};

use crate::error::WorldError;
use crate::tile::Tile;

/// Upper bound of the sugar drawn for one tile during generation.
pub const MAX_SUGAR_PER_TILE: u32 = 20;

/// Tile picks allowed per tile of the grid while seeding sugar.
///
/// Bounds the retry loop that skips already seeded tiles, so a sugar factor
/// of 100 on a grid that is almost full cannot spin forever.
pub const GENERATION_ATTEMPT_FACTOR: usize = 16;

/// The simulation grid plus the arena of cells living on it.
#[derive(Debug, Clone)]
pub struct World {
    /// Number of columns.
    width: i32,
    /// Number of rows.
    height: i32,
    /// Row-major tile storage.
    tiles: Vec<Tile>,
    /// Every cell, alive or corpse, indexed by handle.
    cells: BTreeMap<CellId, Cell>,
    /// Handle given to the next inserted cell.
    next_id: CellId,
    /// Cells visited each tick, in visiting order.
    live: Vec<CellId>,
    /// Children created during the current pass.
    born_this_tick: Vec<CellId>,
    /// Corpses eaten during the current pass.
    consumed_corpses: BTreeSet<CellId>,
}

impl World {
    /// Create an empty world of `width` columns and `height` rows.
    ///
    /// Every tile starts without sugar, trail, or occupants.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::EmptyGrid`] if either dimension is zero and
    /// [`WorldError::DimensionsTooLarge`] if the tile count does not fit.
    pub fn new(width: u32, height: u32) -> Result<Self, WorldError> {
        if width == 0 || height == 0 {
            return Err(WorldError::EmptyGrid { width, height });
        }
        let too_large = WorldError::DimensionsTooLarge { width, height };
        let (Ok(w), Ok(h)) = (i32::try_from(width), i32::try_from(height)) else {
            return Err(too_large);
        };
        let count = usize::try_from(width)
            .ok()
            .and_then(|w| usize::try_from(height).ok().and_then(|h| w.checked_mul(h)))
            .ok_or(too_large)?;

        Ok(Self {
            width: w,
            height: h,
            tiles: vec![Tile::default(); count],
            cells: BTreeMap::new(),
            next_id: CellId::new(0),
            live: Vec::new(),
            born_this_tick: Vec::new(),
            consumed_corpses: BTreeSet::new(),
        })
    }

    // -------------------------------------------------------------------
    // Geometry
    // -------------------------------------------------------------------

    /// Number of columns.
    pub const fn width(&self) -> i32 {
        self.width
    }

    /// Number of rows.
    pub const fn height(&self) -> i32 {
        self.height
    }

    /// Total number of tiles.
    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }

    /// Whether `(x, y)` lies inside the grid.
    pub const fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.width && y >= 0 && y < self.height
    }

    /// Normalize `(x, y)` onto the torus.
    pub const fn wrap(&self, x: i32, y: i32) -> Location {
        Location::new(x.rem_euclid(self.width), y.rem_euclid(self.height))
    }

    /// Row-major index of an in-bounds coordinate.
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if !self.in_bounds(x, y) {
            return None;
        }
        let row = usize::try_from(y).ok()?;
        let col = usize::try_from(x).ok()?;
        let width = usize::try_from(self.width).ok()?;
        row.checked_mul(width)?.checked_add(col)
    }

    /// Coordinate of a row-major index.
    fn coordinate(&self, index: usize) -> Option<Location> {
        let width = usize::try_from(self.width).ok()?;
        let x = i32::try_from(index.checked_rem(width)?).ok()?;
        let y = i32::try_from(index.checked_div(width)?).ok()?;
        Some(Location::new(x, y))
    }

    // -------------------------------------------------------------------
    // Tiles
    // -------------------------------------------------------------------

    /// The tile at `(x, y)`, or `None` outside the grid.
    pub fn tile(&self, x: i32, y: i32) -> Option<&Tile> {
        self.index(x, y).and_then(|i| self.tiles.get(i))
    }

    /// Mutable access to the tile at `(x, y)`, or `None` outside the grid.
    pub fn tile_mut(&mut self, x: i32, y: i32) -> Option<&mut Tile> {
        self.index(x, y).and_then(|i| self.tiles.get_mut(i))
    }

    /// The tile at `location`, or `None` outside the grid.
    pub fn tile_at(&self, location: Location) -> Option<&Tile> {
        self.tile(location.x, location.y)
    }

    /// Mutable access to the tile at `location`, or `None` outside the grid.
    pub fn tile_at_mut(&mut self, location: Location) -> Option<&mut Tile> {
        self.tile_mut(location.x, location.y)
    }

    /// The live occupant of `(x, y)`, if any.
    pub fn occupant(&self, x: i32, y: i32) -> Option<CellId> {
        self.tile(x, y).and_then(|t| t.cell)
    }

    /// The corpse lying on `(x, y)`, if any.
    pub fn corpse_at(&self, x: i32, y: i32) -> Option<CellId> {
        self.tile(x, y).and_then(|t| t.corpse)
    }

    /// Whether `(x, y)` is inside the grid and holds neither a live cell
    /// nor a corpse.
    pub fn is_free(&self, x: i32, y: i32) -> bool {
        self.tile(x, y).is_some_and(Tile::is_free)
    }

    /// Sugar amount at `(x, y)`; zero outside the grid.
    pub fn sugar_at(&self, x: i32, y: i32) -> f64 {
        self.tile(x, y).map_or(0.0, |t| t.sugar.amount())
    }

    // -------------------------------------------------------------------
    // Generation
    // -------------------------------------------------------------------

    /// Replace the whole grid with a fresh resource distribution.
    ///
    /// `sugar_factor` is the percentage (clamped to 0--100) of tiles that
    /// receive a sugar draw. Each draw picks a uniformly random tile that is
    /// still empty and assigns it an amount uniform in
    /// `[0, MAX_SUGAR_PER_TILE]`. Tiles already seeded are skipped.
    ///
    /// The arena and every registry are cleared too: a regenerated world
    /// holds no cells. Returns the number of tiles that ended up with sugar.
    pub fn generate<R: Rng + ?Sized>(&mut self, sugar_factor: f64, rng: &mut R) -> usize {
        let factor = if sugar_factor.is_nan() {
            0.0
        } else {
            sugar_factor.clamp(0.0, 100.0)
        };

        self.tiles.iter_mut().for_each(|t| *t = Tile::default());
        self.cells.clear();
        self.live.clear();
        self.born_this_tick.clear();
        self.consumed_corpses.clear();

        let tile_count = self.tiles.len();
        let target = sugar_tile_target(tile_count, factor);

        info!(
            width = self.width,
            height = self.height,
            sugar_factor = factor,
            sugar_tiles = target,
            "Generating world"
        );

        let mut budget = tile_count.saturating_mul(GENERATION_ATTEMPT_FACTOR);
        let mut draws = 0_usize;
        while draws < target && budget > 0 {
            budget = budget.saturating_sub(1);
            let index = rng.random_range(0..tile_count);
            let Some(tile) = self.tiles.get_mut(index) else {
                continue;
            };
            if tile.sugar.has_any() {
                continue;
            }
            let amount = rng.random_range(0..=MAX_SUGAR_PER_TILE);
            tile.sugar = Sugar::new(f64::from(amount));
            draws = draws.saturating_add(1);
        }

        if draws < target {
            warn!(
                requested = target,
                placed = draws,
                "Sugar generation ran out of attempts"
            );
        }

        let seeded = self.tiles.iter().filter(|t| t.sugar.has_any()).count();
        info!(seeded_tiles = seeded, total_sugar = self.total_sugar(), "World generated");
        seeded
    }

    // -------------------------------------------------------------------
    // Spatial queries
    // -------------------------------------------------------------------

    /// Every location of the square `[x - radius, x + radius)` by
    /// `[y - radius, y + radius)`, wrapped onto the torus.
    ///
    /// Out-of-range input is never an error; it wraps. A radius of zero
    /// yields nothing.
    pub fn neighborhood(&self, x: i32, y: i32, radius: u32) -> Vec<Location> {
        let r = i32::try_from(radius).unwrap_or(i32::MAX);
        let mut result = Vec::new();
        for i in x.saturating_sub(r)..x.saturating_add(r) {
            for j in y.saturating_sub(r)..y.saturating_add(r) {
                result.push(self.wrap(i, j));
            }
        }
        result
    }

    /// Sum of every tile's sugar.
    pub fn total_sugar(&self) -> f64 {
        self.tiles.iter().map(|t| t.sugar.amount()).sum()
    }

    /// Age every trail marker by one tick.
    pub fn age_trails(&mut self) {
        for tile in &mut self.tiles {
            if tile.trail.is_active() {
                tile.trail.decay();
            }
        }
    }

    // -------------------------------------------------------------------
    // Cell arena
    // -------------------------------------------------------------------

    /// The cell behind `id`, alive or corpse.
    pub fn cell(&self, id: CellId) -> Option<&Cell> {
        self.cells.get(&id)
    }

    /// The cell behind `id`, or [`WorldError::CellNotFound`].
    pub fn try_cell(&self, id: CellId) -> Result<&Cell, WorldError> {
        self.cells.get(&id).ok_or(WorldError::CellNotFound(id))
    }

    /// Mutable access to the cell behind `id`.
    pub fn cell_mut(&mut self, id: CellId) -> Option<&mut Cell> {
        self.cells.get_mut(&id)
    }

    /// Iterate over every cell in the arena in handle order.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.values()
    }

    /// Number of cells in the arena, corpses included.
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Insert `cell` into the arena and onto its tile.
    ///
    /// The world assigns the handle; whatever `cell.id` held is overwritten.
    /// The cell is not added to any registry -- seeding pushes it to
    /// `live`, reproduction to `born_this_tick`.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::OutOfBounds`] if the cell's position is off the
    /// grid, or [`WorldError::TileOccupied`] if a live cell already stands
    /// there.
    pub fn place_cell(&mut self, mut cell: Cell) -> Result<CellId, WorldError> {
        let (x, y) = (cell.x, cell.y);
        let id = self.next_id;
        let tile = self
            .tile_mut(x, y)
            .ok_or(WorldError::OutOfBounds { x, y })?;
        if let Some(occupant) = tile.cell {
            return Err(WorldError::TileOccupied { x, y, occupant });
        }
        tile.cell = Some(id);
        cell.id = id;
        self.cells.insert(id, cell);
        self.next_id = id.next();
        Ok(id)
    }

    /// Remove a cell from the arena, clearing any tile reference to it.
    pub fn remove_cell(&mut self, id: CellId) -> Option<Cell> {
        let cell = self.cells.remove(&id)?;
        if let Some(tile) = self.tile_mut(cell.x, cell.y) {
            if tile.cell == Some(id) {
                tile.cell = None;
            }
            if tile.corpse == Some(id) {
                tile.corpse = None;
            }
        }
        Some(cell)
    }

    // -------------------------------------------------------------------
    // Registries
    // -------------------------------------------------------------------

    /// Cells visited each tick, in visiting order.
    pub fn live(&self) -> &[CellId] {
        &self.live
    }

    /// Append a cell to the live registry.
    pub fn push_live(&mut self, id: CellId) {
        self.live.push(id);
    }

    /// Keep only the live-registry entries for which `keep` returns `true`.
    pub fn retain_live<F: FnMut(&Cell) -> bool>(&mut self, mut keep: F) {
        let cells = &self.cells;
        self.live
            .retain(|id| cells.get(id).is_some_and(|cell| keep(cell)));
    }

    /// Children created during the current pass.
    pub fn born_this_tick(&self) -> &[CellId] {
        &self.born_this_tick
    }

    /// Record a child created during the current pass.
    pub fn push_born(&mut self, id: CellId) {
        self.born_this_tick.push(id);
    }

    /// Drain the newborn registry.
    pub fn take_born(&mut self) -> Vec<CellId> {
        std::mem::take(&mut self.born_this_tick)
    }

    /// Corpses eaten during the current pass.
    pub const fn consumed_corpses(&self) -> &BTreeSet<CellId> {
        &self.consumed_corpses
    }

    /// Record a corpse eaten during the current pass.
    pub fn push_consumed_corpse(&mut self, id: CellId) {
        self.consumed_corpses.insert(id);
    }

    /// Drain the consumed-corpse registry.
    pub fn take_consumed_corpses(&mut self) -> BTreeSet<CellId> {
        std::mem::take(&mut self.consumed_corpses)
    }

    // -------------------------------------------------------------------
    // Renderer views
    // -------------------------------------------------------------------

    /// Read-only snapshot of one cell.
    pub fn cell_view(&self, id: CellId) -> Option<CellView> {
        self.cells.get(&id).map(|c| CellView {
            id: c.id,
            species: c.species,
            x: c.x,
            y: c.y,
            alive: c.alive,
            energy: c.energy,
        })
    }

    /// Read-only snapshot of every tile in row-major order.
    pub fn tile_views(&self) -> Vec<TileView> {
        self.tiles
            .iter()
            .enumerate()
            .filter_map(|(index, tile)| {
                let at = self.coordinate(index)?;
                Some(TileView {
                    x: at.x,
                    y: at.y,
                    sugar: tile.sugar.amount(),
                    trail: tile.trail.lifetime,
                    cell: tile.cell.and_then(|id| self.cell_view(id)),
                    has_corpse: tile.corpse.is_some(),
                })
            })
            .collect()
    }
}

/// Number of tiles that receive a sugar draw: `floor(tiles * factor / 100)`.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn sugar_tile_target(tile_count: usize, factor: f64) -> usize {
    let raw = (tile_count as f64 * factor / 100.0).floor();
    if raw <= 0.0 { 0 } else { (raw as usize).min(tile_count) }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use cellsim_types::{Behaviour, Direction, Species, Traits};
    use rand::SeedableRng;
    use rand_chacha::ChaCha12Rng;

    use super::*;

    fn traits() -> Traits {
        Traits {
            vision: 3,
            speed: 1.0,
            efficiency: 1.0,
            bite_size: 1.0,
            trail_size: 50,
            mutation_step_multiplier: 1.05,
        }
    }

    fn cell_at(x: i32, y: i32) -> Cell {
        Cell::new(
            CellId::new(0),
            String::from("F"),
            Species::HuntFirst,
            Behaviour::Neutral,
            Location::new(x, y),
            50.0,
            traits(),
            Direction::Up,
        )
    }

    #[test]
    fn empty_grid_rejected() {
        assert_eq!(
            World::new(0, 5).err(),
            Some(WorldError::EmptyGrid { width: 0, height: 5 })
        );
    }

    #[test]
    fn oversized_grid_rejected() {
        assert!(World::new(u32::MAX, 2).is_err());
    }

    #[test]
    fn new_world_is_blank() {
        let world = World::new(4, 3).unwrap();
        assert_eq!(world.tile_count(), 12);
        assert!(world.total_sugar().abs() < f64::EPSILON);
        assert!(world.live().is_empty());
    }

    #[test]
    fn tile_lookup_respects_bounds() {
        let world = World::new(4, 3).unwrap();
        assert!(world.tile(3, 2).is_some());
        assert!(world.tile(4, 0).is_none());
        assert!(world.tile(0, 3).is_none());
        assert!(world.tile(-1, 0).is_none());
    }

    #[test]
    fn wrap_normalizes_both_axes() {
        let world = World::new(10, 8).unwrap();
        assert_eq!(world.wrap(10, 8), Location::new(0, 0));
        assert_eq!(world.wrap(-1, -1), Location::new(9, 7));
        assert_eq!(world.wrap(25, -9), Location::new(5, 7));
    }

    #[test]
    fn generate_zero_factor_leaves_no_sugar() {
        let mut world = World::new(10, 10).unwrap();
        let mut rng = ChaCha12Rng::seed_from_u64(1);
        let seeded = world.generate(0.0, &mut rng);
        assert_eq!(seeded, 0);
        assert!(world.total_sugar().abs() < f64::EPSILON);
    }

    #[test]
    fn generate_respects_target_and_cap() {
        let mut world = World::new(20, 20).unwrap();
        let mut rng = ChaCha12Rng::seed_from_u64(7);
        let seeded = world.generate(25.0, &mut rng);
        // 100 draws; a draw of zero leaves its tile unseeded.
        assert!(seeded <= 100);
        assert!(seeded > 50);
        let max = f64::from(MAX_SUGAR_PER_TILE);
        for y in 0..20 {
            for x in 0..20 {
                let sugar = world.sugar_at(x, y);
                assert!((0.0..=max).contains(&sugar));
            }
        }
    }

    #[test]
    fn generate_full_factor_terminates() {
        let mut world = World::new(5, 5).unwrap();
        let mut rng = ChaCha12Rng::seed_from_u64(3);
        let seeded = world.generate(100.0, &mut rng);
        assert!(seeded <= 25);
    }

    #[test]
    fn generate_clears_cells_and_registries() {
        let mut world = World::new(5, 5).unwrap();
        let id = world.place_cell(cell_at(1, 1));
        assert!(id.is_ok());
        if let Ok(id) = id {
            world.push_live(id);
            world.push_born(id);
            world.push_consumed_corpse(id);
        }
        let mut rng = ChaCha12Rng::seed_from_u64(3);
        let _ = world.generate(10.0, &mut rng);
        assert_eq!(world.cell_count(), 0);
        assert!(world.live().is_empty());
        assert!(world.born_this_tick().is_empty());
        assert!(world.consumed_corpses().is_empty());
        assert!(world.occupant(1, 1).is_none());
    }

    #[test]
    fn generation_is_reproducible() {
        let mut a = World::new(12, 9).unwrap();
        let mut b = World::new(12, 9).unwrap();
        let _ = a.generate(40.0, &mut ChaCha12Rng::seed_from_u64(99));
        let _ = b.generate(40.0, &mut ChaCha12Rng::seed_from_u64(99));
        assert_eq!(a.tile_views(), b.tile_views());
    }

    #[test]
    fn neighborhood_wraps_and_has_square_size() {
        let world = World::new(10, 10).unwrap();
        let tiles = world.neighborhood(0, 0, 2);
        assert_eq!(tiles.len(), 16);
        assert!(tiles.contains(&Location::new(8, 8)));
        assert!(tiles.contains(&Location::new(1, 1)));
        assert!(!tiles.contains(&Location::new(2, 2)));
        for loc in &tiles {
            assert!(world.in_bounds(loc.x, loc.y));
        }
    }

    #[test]
    fn neighborhood_radius_zero_is_empty() {
        let world = World::new(10, 10).unwrap();
        assert!(world.neighborhood(5, 5, 0).is_empty());
    }

    #[test]
    fn place_cell_assigns_handles_and_occupies() {
        let mut world = World::new(5, 5).unwrap();
        let a = world.place_cell(cell_at(2, 2));
        let b = world.place_cell(cell_at(3, 2));
        assert_eq!(a, Ok(CellId::new(0)));
        assert_eq!(b, Ok(CellId::new(1)));
        assert_eq!(world.occupant(2, 2), Some(CellId::new(0)));
        assert_eq!(world.cell(CellId::new(1)).map(|c| c.id), Some(CellId::new(1)));
    }

    #[test]
    fn place_cell_refuses_occupied_tile() {
        let mut world = World::new(5, 5).unwrap();
        let _ = world.place_cell(cell_at(2, 2));
        let result = world.place_cell(cell_at(2, 2));
        assert_eq!(
            result,
            Err(WorldError::TileOccupied {
                x: 2,
                y: 2,
                occupant: CellId::new(0)
            })
        );
        assert_eq!(world.cell_count(), 1);
    }

    #[test]
    fn place_cell_refuses_out_of_bounds() {
        let mut world = World::new(5, 5).unwrap();
        let result = world.place_cell(cell_at(5, 0));
        assert_eq!(result, Err(WorldError::OutOfBounds { x: 5, y: 0 }));
    }

    #[test]
    fn try_cell_reports_missing_handle() {
        let world = World::new(2, 2).unwrap();
        assert_eq!(
            world.try_cell(CellId::new(4)).err(),
            Some(WorldError::CellNotFound(CellId::new(4)))
        );
    }

    #[test]
    fn remove_cell_clears_tile() {
        let mut world = World::new(5, 5).unwrap();
        let id = world.place_cell(cell_at(1, 4)).unwrap();
        assert!(world.remove_cell(id).is_some());
        assert!(world.occupant(1, 4).is_none());
        assert!(world.remove_cell(id).is_none());
    }

    #[test]
    fn trails_age_out() {
        let mut world = World::new(3, 3).unwrap();
        if let Some(tile) = world.tile_mut(1, 1) {
            tile.trail = cellsim_types::Trail::new(2, CellId::new(0));
        }
        world.age_trails();
        assert_eq!(world.tile(1, 1).map(|t| t.trail.lifetime), Some(1));
        world.age_trails();
        world.age_trails();
        assert_eq!(world.tile(1, 1).map(|t| t.trail), Some(cellsim_types::Trail::default()));
    }

    #[test]
    fn retain_live_drops_dead_entries() {
        let mut world = World::new(5, 5).unwrap();
        let a = world.place_cell(cell_at(0, 0)).unwrap();
        let b = world.place_cell(cell_at(1, 0)).unwrap();
        world.push_live(a);
        world.push_live(b);
        if let Some(cell) = world.cell_mut(a) {
            cell.alive = false;
        }
        world.retain_live(|c| c.alive);
        assert_eq!(world.live(), &[b]);
    }

    #[test]
    fn tile_views_are_row_major() {
        let mut world = World::new(3, 2).unwrap();
        let _ = world.place_cell(cell_at(2, 1));
        let views = world.tile_views();
        assert_eq!(views.len(), 6);
        let last = views.last();
        assert_eq!(last.map(|v| (v.x, v.y)), Some((2, 1)));
        assert_eq!(
            last.and_then(|v| v.cell.as_ref()).map(|c| c.species),
            Some(Species::HuntFirst)
        );
    }

    #[test]
    fn sugar_target_floors() {
        assert_eq!(sugar_tile_target(100, 0.0), 0);
        assert_eq!(sugar_tile_target(100, 12.5), 12);
        assert_eq!(sugar_tile_target(7, 50.0), 3);
        assert_eq!(sugar_tile_target(7, 100.0), 7);
    }
}
