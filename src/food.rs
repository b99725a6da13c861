use std::collections::HashSet;

use rand::seq::IteratorRandom;
use rand::Rng;

use crate::error::{GameError, Result};
use crate::geometry::{Cell, Grid};

/// Picks a cell uniformly among those not in `occupied`.
pub fn place<R: Rng + ?Sized>(occupied: &HashSet<Cell>, grid: &Grid, rng: &mut R) -> Result<Cell> {
    grid.cells()
        .filter(|cell| !occupied.contains(cell))
        .choose(rng)
        .ok_or(GameError::ExhaustedGrid)
}
