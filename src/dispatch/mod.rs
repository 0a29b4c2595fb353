//! ## Dispatch Module
//!
//! Owns the outstanding floor requests of the elevator car and answers
//! "where should the car stop next?".
//!
//! ### Overview of Structs & Enums:
//! - [`TravelDirection`] – The direction the car is travelling in, supplied per query.
//! - [`DispatchError`] – The only failure: a floor number that is not positive.
//! - [`DispatchStore`] – The request set, guarded by one lock and shared as `Arc<DispatchStore>`.
//!
//! The next-stop policy itself lives in [`request`].

pub mod request;

use std::fmt;
use std::str::FromStr;
use std::sync::{Mutex, MutexGuard};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::print;

#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// Direction the elevator car is travelling in.
pub enum TravelDirection {
    #[serde(alias = "stationary", alias = "STATIONARY")]
    Stationary,
    #[serde(alias = "up", alias = "UP")]
    Up,
    #[serde(alias = "down", alias = "DOWN")]
    Down,
}

impl TravelDirection {
    /// The direction pointing the other way. `Stationary` stays `Stationary`.
    pub fn opposite(self) -> Self {
        match self {
            TravelDirection::Up => TravelDirection::Down,
            TravelDirection::Down => TravelDirection::Up,
            TravelDirection::Stationary => TravelDirection::Stationary,
        }
    }
}

impl fmt::Display for TravelDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TravelDirection::Stationary => "Stationary",
            TravelDirection::Up => "Up",
            TravelDirection::Down => "Down",
        };
        f.write_str(name)
    }
}

/// Error returned when text does not name a [TravelDirection].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown travel direction '{0}', expected up, down or stationary")]
pub struct ParseDirectionError(pub String);

impl FromStr for TravelDirection {
    type Err = ParseDirectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "up" => Ok(TravelDirection::Up),
            "down" => Ok(TravelDirection::Down),
            "stationary" | "stop" | "idle" => Ok(TravelDirection::Stationary),
            _ => Err(ParseDirectionError(s.to_string())),
        }
    }
}

/// Errors returned by [DispatchStore].
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchError {
    /// The floor number was zero or negative.
    #[error("Invalid floor number {0}. Floor number must be a positive integer.")]
    InvalidFloor(i32),
}

/// Rejects floor numbers below 1.
fn validate_floor(floor: i32) -> Result<i32, DispatchError> {
    if floor <= 0 {
        return Err(DispatchError::InvalidFloor(floor));
    }
    Ok(floor)
}

/// The set of outstanding floor requests for one elevator car.
///
/// Floors are unique, positive and kept in the order they were first requested.
/// Every operation takes the same lock, so callers never observe a half-applied change.
/// None of the operations block on I/O; the lock is only held for a scan of the set,
/// and logging happens after it is released.
///
/// The store is created once at start-up and handed to the transport as an `Arc`:
/// ```
/// use std::sync::Arc;
/// use elevatordispatch::dispatch::{DispatchStore, TravelDirection};
///
/// let store = Arc::new(DispatchStore::new());
/// store.add_request(5).unwrap();
/// store.add_request(15).unwrap();
/// assert_eq!(store.next_stop(10, TravelDirection::Up), Some(15));
/// assert_eq!(store.outstanding(), vec![5, 15]);
/// ```
#[derive(Debug, Default)]
pub struct DispatchStore {
    floors: Mutex<Vec<i32>>,
}

impl DispatchStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every mutation is a single `push` or `remove`, so the set is consistent
    /// even if a holder of the lock panicked.
    fn lock(&self) -> MutexGuard<'_, Vec<i32>> {
        match self.floors.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Adds `floor` to the outstanding requests.
    ///
    /// Adding a floor that is already outstanding does nothing.
    ///
    /// # Errors
    /// [DispatchError::InvalidFloor] if `floor <= 0`. The set is left untouched.
    pub fn add_request(&self, floor: i32) -> Result<(), DispatchError> {
        let floor = validate_floor(floor)?;
        if let Some(count) = self.insert(floor) {
            print::dispatch(format!("Floor {} requested ({} outstanding)", floor, count));
        }
        Ok(())
    }

    /// Removes `floor` from the outstanding requests.
    ///
    /// Returns `true` if the floor was outstanding, `false` if there was nothing to remove.
    ///
    /// # Errors
    /// [DispatchError::InvalidFloor] if `floor <= 0`.
    pub fn remove_request(&self, floor: i32) -> Result<bool, DispatchError> {
        let floor = validate_floor(floor)?;
        match self.take(floor) {
            Some(count) => {
                print::dispatch(format!("Floor {} served ({} outstanding)", floor, count));
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Pushes `floor` if absent. Returns the new count, `None` if it was already there.
    /// The guard is dropped before returning so callers can log without holding the lock.
    fn insert(&self, floor: i32) -> Option<usize> {
        let mut floors = self.lock();
        if floors.contains(&floor) {
            return None;
        }
        floors.push(floor);
        Some(floors.len())
    }

    /// Removes `floor` if present. Returns the remaining count, `None` if it was absent.
    fn take(&self, floor: i32) -> Option<usize> {
        let mut floors = self.lock();
        let idx = floors.iter().position(|&f| f == floor)?;
        floors.remove(idx);
        Some(floors.len())
    }

    /// Returns a copy of the outstanding floors, in request order.
    pub fn outstanding(&self) -> Vec<i32> {
        self.lock().clone()
    }

    /// Returns the floor the car should stop at next, see [request::next_stop].
    ///
    /// The returned floor stays outstanding until [DispatchStore::remove_request] is called for it.
    pub fn next_stop(&self, current_floor: i32, direction: TravelDirection) -> Option<i32> {
        let floors = self.lock();
        request::next_stop(&floors, current_floor, direction)
    }

    /// Number of outstanding floors.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// `true` when nothing is outstanding.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}
