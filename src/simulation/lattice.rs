//! Toroidal location lattice and the catalog of offsets that move across it.

use crate::simulation::error::{ExperimentError, ExperimentResult};
use crate::simulation::params::MAX_LATTICE_WIDTH;
use serde::{Deserialize, Serialize};

/// Index into an [`OffsetCatalog`].
pub type OffsetId = usize;

/// A cell of the location lattice. Coordinates are always in `[0, width)`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    pub x: i32,
    pub y: i32,
}

impl Location {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// A discrete displacement on the location lattice.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Offset {
    pub dx: i32,
    pub dy: i32,
}

impl Offset {
    #[must_use]
    pub const fn new(dx: i32, dy: i32) -> Self {
        Self { dx, dy }
    }

    /// The offset pointing the opposite way.
    #[must_use]
    pub const fn reversed(self) -> Self {
        Self {
            dx: -self.dx,
            dy: -self.dy,
        }
    }

    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.dx == 0 && self.dy == 0
    }
}

/// Every non-zero offset with both components in `[-(K/2), K/2]`.
///
/// Built once; ids are assigned row-major with `dx` as the outer loop.
#[derive(Clone, Debug)]
pub struct OffsetCatalog {
    width: i32,
    offsets: Vec<Offset>,
}

impl OffsetCatalog {
    /// Builds the catalog for an odd offset width `K >= 3`.
    ///
    /// # Errors
    ///
    /// Returns [`ExperimentError::InvalidOffsetWidth`] for even or too-small widths.
    pub fn new(width: i32) -> ExperimentResult<Self> {
        if width < 3 || width % 2 == 0 {
            return Err(ExperimentError::InvalidOffsetWidth(width));
        }
        let half = width / 2;
        let offsets = (-half..=half)
            .flat_map(|dx| (-half..=half).map(move |dy| Offset::new(dx, dy)))
            .filter(|offset| !offset.is_zero())
            .collect();
        Ok(Self { width, offsets })
    }

    #[must_use]
    pub const fn width(&self) -> i32 {
        self.width
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// Returns the offset with the given id, if in range.
    #[must_use]
    pub fn get(&self, id: OffsetId) -> Option<Offset> {
        self.offsets.get(id).copied()
    }

    /// Finds the id of an offset. The zero offset is never present.
    #[must_use]
    pub fn index_of(&self, offset: Offset) -> Option<OffsetId> {
        self.offsets.iter().position(|&candidate| candidate == offset)
    }

    pub fn iter(&self) -> impl Iterator<Item = Offset> + '_ {
        self.offsets.iter().copied()
    }
}

/// Number of cells in a `width × width` grid.
///
/// # Errors
///
/// Fails if `width` is not positive, exceeds `max`, or the cell count
/// overflows `usize`.
pub fn cell_count(name: &'static str, width: i32, max: i32) -> ExperimentResult<usize> {
    if width <= 0 {
        return Err(ExperimentError::NonPositiveWidth { name, value: width });
    }
    let too_large = ExperimentError::WidthTooLarge {
        name,
        value: width,
        max,
    };
    if width > max {
        return Err(too_large);
    }
    let side = usize::try_from(width).map_err(|_| too_large.clone())?;
    side.checked_mul(side).ok_or(too_large)
}

/// Pure transition function on a `width × width` torus.
#[derive(Clone, Copy, Debug)]
pub struct LocationLattice {
    width: i32,
    size: usize,
}

impl LocationLattice {
    /// # Errors
    ///
    /// Returns [`ExperimentError::NonPositiveWidth`] if `width <= 0` and
    /// [`ExperimentError::WidthTooLarge`] above [`MAX_LATTICE_WIDTH`].
    pub fn new(width: i32) -> ExperimentResult<Self> {
        let size = cell_count("lattice_width", width, MAX_LATTICE_WIDTH)?;
        Ok(Self { width, size })
    }

    #[must_use]
    pub const fn width(&self) -> i32 {
        self.width
    }

    /// Number of cells on the lattice.
    #[must_use]
    pub const fn size(&self) -> usize {
        self.size
    }

    /// Reduces arbitrary coordinates onto the torus.
    #[must_use]
    pub const fn wrap(&self, x: i32, y: i32) -> Location {
        Location::new(x.rem_euclid(self.width), y.rem_euclid(self.width))
    }

    /// Applies an offset, wrapping each coordinate.
    #[must_use]
    pub const fn transition(&self, location: Location, offset: Offset) -> Location {
        self.wrap(location.x + offset.dx, location.y + offset.dy)
    }

    /// Centered representative of `to - from`, each component in
    /// `[-(W/2), W - 1 - W/2]`.
    #[must_use]
    pub const fn displacement(&self, from: Location, to: Location) -> Offset {
        Offset::new(
            self.center(to.x - from.x),
            self.center(to.y - from.y),
        )
    }

    /// Maps a coordinate difference onto the centered range.
    #[must_use]
    pub const fn center(&self, value: i32) -> i32 {
        let reduced = value.rem_euclid(self.width);
        if reduced > (self.width - 1) / 2 {
            reduced - self.width
        } else {
            reduced
        }
    }

    /// True when two offsets move to the same cell from any location.
    #[must_use]
    pub const fn equivalent(&self, a: Offset, b: Offset) -> bool {
        (a.dx - b.dx).rem_euclid(self.width) == 0 && (a.dy - b.dy).rem_euclid(self.width) == 0
    }

    /// Random location, uniform over the lattice.
    pub fn random<R: rand::Rng + ?Sized>(&self, rng: &mut R) -> Location {
        Location::new(
            rng.random_range(0..self.width),
            rng.random_range(0..self.width),
        )
    }
}
