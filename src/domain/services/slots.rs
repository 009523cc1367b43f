//! The fixed daily booking grid and slot enumeration over it.

use crate::config::Config;
use crate::domain::services::timefmt;
use crate::error::AppError;

/// One bookable day: grid-aligned slots of `step_min` minutes between
/// `start_min` (inclusive) and `end_min` (exclusive). Built once from config
/// at bootstrap; the grid is runtime data, not a compiled-in constant.
#[derive(Debug, Clone, Copy)]
pub struct SlotGrid {
    pub start_min: u32,
    pub end_min: u32,
    pub step_min: u32,
}

impl SlotGrid {
    pub fn new(start_min: u32, end_min: u32, step_min: u32) -> Result<Self, AppError> {
        if step_min == 0 {
            return Err(AppError::InvalidRange("Grid step must be positive".into()));
        }
        if start_min >= end_min || end_min > timefmt::MINUTES_PER_DAY {
            return Err(AppError::InvalidRange(format!(
                "Grid window {}..{} is not a valid span of the day",
                start_min, end_min
            )));
        }
        Ok(Self { start_min, end_min, step_min })
    }

    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        Self::new(
            timefmt::parse_storage_time(&config.grid_start)?,
            timefmt::parse_storage_time(&config.grid_end)?,
            config.grid_step_min,
        )
    }

    /// Rejects degenerate or out-of-grid intervals. Rejection (not clamping)
    /// keeps the conflict checks downstream honest.
    pub fn validate_range(&self, start: u32, end: u32) -> Result<(), AppError> {
        if start >= end {
            return Err(AppError::InvalidRange(format!(
                "Start {} must precede end {}",
                timefmt::format_storage(start),
                timefmt::format_storage(end)
            )));
        }
        if start < self.start_min || end > self.end_min {
            return Err(AppError::InvalidRange(format!(
                "Range {}-{} is outside the bookable day ({}-{})",
                timefmt::format_storage(start),
                timefmt::format_storage(end),
                timefmt::format_storage(self.start_min),
                timefmt::format_storage(self.end_min)
            )));
        }
        Ok(())
    }

    /// Every grid-aligned slot start whose `[slot, slot + step)` interval
    /// intersects `[start, end)`, in ascending order.
    pub fn slots_occupied(&self, start: u32, end: u32) -> Result<Vec<u32>, AppError> {
        self.validate_range(start, end)?;

        let mut slots = Vec::new();
        let mut slot = self.start_min;
        while slot < self.end_min {
            if slot < end && slot + self.step_min > start {
                slots.push(slot);
            }
            slot += self.step_min;
        }
        Ok(slots)
    }

    /// All slot starts of the day, for UI affordances.
    pub fn all_slots(&self) -> Vec<u32> {
        (self.start_min..self.end_min)
            .step_by(self.step_min as usize)
            .collect()
    }
}
