use crate::cell::CellFlags;
use crate::world::{World, WorldError};

/// Build the standard `n x n` "slalom" test world.
///
/// The layout is an insulated box split by two horizontal corridors joined by
/// two vertical spurs, with a fixed hot row along the top and a single fixed
/// cold cell near the bottom middle. Everything else starts at 0.0.
///
/// With `low = n/3`, `mid = n/2`, `high = 2n/3` (all floored):
/// - row `low` is insulated for columns `0..high`
/// - row `high` is insulated for columns `low..n`
/// - column `high` is insulated for rows `low..mid`
/// - column `low` is insulated for rows `mid..high`
pub fn make_test_world(n: u32, alpha: f32) -> Result<World, WorldError> {
    if n < 3 {
        return Err(WorldError::GridTooSmall(n));
    }
    let size = n as usize;
    let at = |x: usize, y: usize| y * size + x;

    let mut properties = vec![CellFlags::NONE; size * size];
    let mut state = vec![0.0f32; size * size];

    for i in 0..size {
        properties[at(i, 0)] = CellFlags::INSULATOR;
        properties[at(i, size - 1)] = CellFlags::INSULATOR;
        properties[at(0, i)] = CellFlags::INSULATOR;
        properties[at(size - 1, i)] = CellFlags::INSULATOR;
    }

    let low = size / 3;
    let mid = size / 2;
    let high = size * 2 / 3;

    for x in 0..high {
        properties[at(x, low)] = CellFlags::INSULATOR;
    }
    for x in low..size {
        properties[at(x, high)] = CellFlags::INSULATOR;
    }
    for y in low..mid {
        properties[at(high, y)] = CellFlags::INSULATOR;
    }
    for y in mid..high {
        properties[at(low, y)] = CellFlags::INSULATOR;
    }

    // Heat source along the top.
    for x in 1..size - 1 {
        state[at(x, 1)] = 1.0;
        properties[at(x, 1)] = CellFlags::FIXED;
    }
    // Point heat sink, bottom middle.
    state[at(mid, size - 3)] = 0.0;
    properties[at(mid, size - 3)] = CellFlags::FIXED;

    tracing::debug!(n, alpha, low, mid, high, "generated test world");
    World::new(n, n, alpha, properties, state)
}
