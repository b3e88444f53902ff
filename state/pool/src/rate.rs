//! Rate Governor - per-window inflow and outflow ceilings
//!
//! Counters are keyed by `(direction, window)` and created on first use. A
//! new window id starts from zero; old windows are never reset.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{PoolError, PoolResult};
use crate::types::{Amount, WindowId};

/// Flow direction relative to the pool
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Value entering the pool (shield)
    Inflow,
    /// Value leaving the pool (unshield)
    Outflow,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Inflow => f.write_str("inflow"),
            Direction::Outflow => f.write_str("outflow"),
        }
    }
}

/// Cumulative spend counters with hard ceilings
#[derive(Clone, Debug)]
pub struct RateGovernor {
    inflow_ceiling: Amount,
    outflow_ceiling: Amount,
    consumed: HashMap<(Direction, WindowId), Amount>,
}

impl RateGovernor {
    pub fn new(inflow_ceiling: Amount, outflow_ceiling: Amount) -> Self {
        Self {
            inflow_ceiling,
            outflow_ceiling,
            consumed: HashMap::new(),
        }
    }

    pub fn ceiling(&self, direction: Direction) -> Amount {
        match direction {
            Direction::Inflow => self.inflow_ceiling,
            Direction::Outflow => self.outflow_ceiling,
        }
    }

    pub fn consumed(&self, direction: Direction, window: WindowId) -> Amount {
        self.consumed.get(&(direction, window)).copied().unwrap_or(0)
    }

    /// Admission test without side effects; returns the would-be total
    pub fn check(&self, direction: Direction, amount: Amount, window: WindowId) -> PoolResult<Amount> {
        let ceiling = self.ceiling(direction);
        match self.consumed(direction, window).checked_add(amount) {
            Some(total) if total <= ceiling => Ok(total),
            attempted => Err(PoolError::RateLimitExceeded {
                direction,
                attempted: attempted.unwrap_or(Amount::MAX),
                ceiling,
            }),
        }
    }

    /// Admit `amount` and record it in one step
    pub fn check_and_consume(
        &mut self,
        direction: Direction,
        amount: Amount,
        window: WindowId,
    ) -> PoolResult<Amount> {
        let total = self.check(direction, amount, window)?;
        self.consumed.insert((direction, window), total);
        Ok(total)
    }

    /// Return a consumption made by the operation that is still in flight
    pub(crate) fn release_in_flight(&mut self, direction: Direction, amount: Amount, window: WindowId) {
        let key = (direction, window);
        let remaining = self.consumed(direction, window).saturating_sub(amount);
        if remaining == 0 {
            self.consumed.remove(&key);
        } else {
            self.consumed.insert(key, remaining);
        }
    }

    pub fn snapshot(&self) -> RateSnapshot {
        let mut windows: Vec<RateWindow> = self
            .consumed
            .iter()
            .map(|(&(direction, window), &consumed)| RateWindow {
                direction,
                window,
                consumed,
            })
            .collect();
        windows.sort_by_key(|w| (w.direction, w.window));

        RateSnapshot {
            inflow_ceiling: self.inflow_ceiling,
            outflow_ceiling: self.outflow_ceiling,
            windows,
        }
    }

    pub fn from_snapshot(snapshot: RateSnapshot) -> Self {
        Self {
            inflow_ceiling: snapshot.inflow_ceiling,
            outflow_ceiling: snapshot.outflow_ceiling,
            consumed: snapshot
                .windows
                .into_iter()
                .map(|w| ((w.direction, w.window), w.consumed))
                .collect(),
        }
    }
}

/// One persisted counter
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateWindow {
    pub direction: Direction,
    pub window: WindowId,
    pub consumed: Amount,
}

/// Serializable governor state
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateSnapshot {
    pub inflow_ceiling: Amount,
    pub outflow_ceiling: Amount,
    pub windows: Vec<RateWindow>,
}
