//! Grid model: a fixed square lattice of tiles
//!
//! Cells are addressed by integer coordinates (world position floor-divided
//! by the cell size). Anything outside the lattice reads as `Floor`.

use serde::{Deserialize, Serialize};

use crate::consts::{CELLS_PER_SIDE, GRID_CELL_SIZE, GRID_LENGTH, PORTAL_CORNER, SAFE_ZONE_HALF};

/// What occupies a single cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TileKind {
    #[default]
    Floor,
    Hole,
    Obstacle,
    Diamond,
    SpeedBoost,
    ExtraLife,
    Portal,
}

impl TileKind {
    /// One-shot pickups that revert to floor when touched
    pub fn is_item(self) -> bool {
        matches!(
            self,
            TileKind::Diamond | TileKind::SpeedBoost | TileKind::ExtraLife
        )
    }
}

/// Integer cell coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    pub x: i32,
    pub y: i32,
}

impl CellCoord {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x.saturating_add(dx), self.y.saturating_add(dy))
    }

    /// True if the cell's origin lies strictly inside the spawn square.
    ///
    /// Keyed on the origin, so safe cells are `-2..=2` and the floor they
    /// guarantee is the world square `[-100, 150)`, not the full
    /// `(-150, 150)`. A ball at x = -120 sits in cell -3, which may be a hole.
    pub fn in_safe_zone(self) -> bool {
        let (ox, oy) = (self.x * GRID_CELL_SIZE, self.y * GRID_CELL_SIZE);
        -SAFE_ZONE_HALF < ox && ox < SAFE_ZONE_HALF && -SAFE_ZONE_HALF < oy && oy < SAFE_ZONE_HALF
    }

    /// The single cell that holds the level exit
    pub const fn portal() -> Self {
        Self::new(PORTAL_CORNER.0 / GRID_CELL_SIZE, PORTAL_CORNER.1 / GRID_CELL_SIZE)
    }
}

/// Lowest cell index on each axis
const MIN_CELL: i32 = -GRID_LENGTH / GRID_CELL_SIZE;

/// Dense tile storage covering the whole lattice
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    tiles: Vec<TileKind>,
}

impl Default for Grid {
    fn default() -> Self {
        Self::new()
    }
}

impl Grid {
    /// All-floor lattice
    pub fn new() -> Self {
        Self {
            tiles: vec![TileKind::Floor; (CELLS_PER_SIDE * CELLS_PER_SIDE) as usize],
        }
    }

    fn index(cell: CellCoord) -> Option<usize> {
        let ix = cell.x - MIN_CELL;
        let iy = cell.y - MIN_CELL;
        if (0..CELLS_PER_SIDE).contains(&ix) && (0..CELLS_PER_SIDE).contains(&iy) {
            Some((ix * CELLS_PER_SIDE + iy) as usize)
        } else {
            None
        }
    }

    /// Whether the cell is part of the generated lattice
    #[inline]
    pub fn contains(&self, cell: CellCoord) -> bool {
        Self::index(cell).is_some()
    }

    /// Tile at a cell; cells outside the lattice are floor
    #[inline]
    pub fn get(&self, cell: CellCoord) -> TileKind {
        Self::index(cell)
            .map(|i| self.tiles[i])
            .unwrap_or(TileKind::Floor)
    }

    /// Overwrite a cell. Returns false (and does nothing) outside the lattice.
    pub fn set(&mut self, cell: CellCoord, kind: TileKind) -> bool {
        match Self::index(cell) {
            Some(i) => {
                self.tiles[i] = kind;
                true
            }
            None => false,
        }
    }

    /// Every cell on the lattice in generation order (x outer, y inner)
    pub fn cells() -> impl Iterator<Item = CellCoord> {
        (MIN_CELL..MIN_CELL + CELLS_PER_SIDE)
            .flat_map(|x| (MIN_CELL..MIN_CELL + CELLS_PER_SIDE).map(move |y| CellCoord::new(x, y)))
    }

    /// Cells paired with their tiles
    pub fn iter(&self) -> impl Iterator<Item = (CellCoord, TileKind)> + '_ {
        Self::cells().zip(self.tiles.iter().copied())
    }

    /// Number of cells holding `kind`
    pub fn count(&self, kind: TileKind) -> usize {
        self.tiles.iter().filter(|&&t| t == kind).count()
    }
}
