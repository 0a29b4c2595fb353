//! Next-stop evaluation for a single elevator car.
//!
//! This module decides which outstanding floor the car should visit next,
//! based on where it is and which way it is travelling.
//!
//! The logic is stateless and purely functional: every function takes a snapshot
//! of the outstanding floors and returns a floor, never touching the store itself.
//! [crate::dispatch::DispatchStore] calls [next_stop] while it holds its lock.
//!
//! # Policies
//! - **Stationary**: the floor closest to the car, in either direction. The car's own
//!   floor counts (distance 0). Ties go to the lower floor.
//! - **Up**: the lowest floor strictly above the car. If there is none, the highest
//!   floor strictly below it.
//! - **Down**: the highest floor strictly below the car. If there is none, the lowest
//!   floor strictly above it.
//!
//! # Example
//! ```
//! use elevatordispatch::dispatch::{request::next_stop, TravelDirection};
//!
//! let floors = [5, 10, 15];
//! assert_eq!(next_stop(&floors, 12, TravelDirection::Up), Some(15));
//! assert_eq!(next_stop(&floors, 1, TravelDirection::Down), Some(5));
//! assert_eq!(next_stop(&floors, 8, TravelDirection::Stationary), Some(10));
//! ```

use super::TravelDirection;

/// Returns the closest floor strictly above `current_floor`.
fn above(floors: &[i32], current_floor: i32) -> Option<i32> {
    floors.iter().copied().filter(|&f| f > current_floor).min()
}

/// Returns the closest floor strictly below `current_floor`.
fn below(floors: &[i32], current_floor: i32) -> Option<i32> {
    floors.iter().copied().filter(|&f| f < current_floor).max()
}

/// Returns the floor closest to `current_floor` in either direction.
///
/// Distances are taken in `i64` so extreme positions cannot overflow.
fn nearest(floors: &[i32], current_floor: i32) -> Option<i32> {
    floors
        .iter()
        .copied()
        .min_by_key(|&f| ((i64::from(f) - i64::from(current_floor)).abs(), f))
}

/// Returns the closest floor ahead of the car when travelling in `direction`.
///
/// `Stationary` has no "ahead", and yields `None`.
fn ahead(floors: &[i32], current_floor: i32, direction: TravelDirection) -> Option<i32> {
    match direction {
        TravelDirection::Up => above(floors, current_floor),
        TravelDirection::Down => below(floors, current_floor),
        TravelDirection::Stationary => None,
    }
}

/// Picks the next floor to stop at.
///
/// Returns `None` when `floors` is empty, or when a moving car has no floor other than
/// its own left to visit. `current_floor` is the car's physical position and is not
/// validated; zero and negative positions are fine.
///
/// # Parameters
/// - `floors`: the outstanding floor requests.
/// - `current_floor`: where the car is now.
/// - `direction`: the way the car is travelling.
pub fn next_stop(floors: &[i32], current_floor: i32, direction: TravelDirection) -> Option<i32> {
    if floors.is_empty() {
        return None;
    }

    match direction {
        TravelDirection::Stationary => nearest(floors, current_floor),
        moving => ahead(floors, current_floor, moving)
            .or_else(|| ahead(floors, current_floor, moving.opposite())),
    }
}
