//! Experience curve for user levels
//!
//! Going from level `n` to `n + 1` costs `fib(n - 1) * 100` experience, with
//! `fib(0) = fib(1) = 1`. Both the Fibonacci numbers and the per-level tables
//! are memoized inside an [`ExperienceCurve`] and only ever grow.
//!
//! Values saturate at `u64::MAX` (reached around level 90) instead of
//! overflowing; every level past that point shares the saturated threshold.

use serde::Serialize;

/// Highest level [`ExperienceCurve::level_for_exp`] will report
pub const MAX_LEVEL: u32 = 255;

/// Experience awarded per Fibonacci unit
const EXP_PER_FIB: u64 = 100;

/// Experience thresholds of one level
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LevelExp {
    /// Experience needed to complete this level
    pub level_exp: u64,
    /// Total experience needed to complete this level and all below it
    pub cumulative_exp: u64,
}

/// Where a raw experience value lands on the curve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LevelProgress {
    /// Experience earned beyond the previous level's cumulative threshold
    pub current_level_progress: u64,
    pub level: u32,
    pub level_info: LevelExp,
}

/// Memoized experience table.
///
/// Owned rather than global so tests and callers control its lifetime.
/// Computing index `i` requires every index below it, so the tables are
/// filled strictly in order.
#[derive(Debug, Clone, Default)]
pub struct ExperienceCurve {
    fib: Vec<u64>,
    level_exp: Vec<u64>,
    level_all_exp: Vec<u64>,
}

impl ExperienceCurve {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of levels currently memoized
    pub fn memoized_levels(&self) -> usize {
        self.level_exp.len()
    }

    fn fib(&mut self, n: usize) -> u64 {
        while self.fib.len() <= n {
            let i = self.fib.len();
            let next = if i <= 1 {
                1
            } else {
                self.fib[i - 1].saturating_add(self.fib[i - 2])
            };
            self.fib.push(next);
        }
        self.fib[n]
    }

    fn fill_to(&mut self, index: usize) {
        while self.level_exp.len() <= index {
            let i = self.level_exp.len();
            let exp = self.fib(i).saturating_mul(EXP_PER_FIB);
            let all = match i {
                0 => exp,
                _ => self.level_all_exp[i - 1].saturating_add(exp),
            };
            self.level_exp.push(exp);
            self.level_all_exp.push(all);
        }
    }

    /// Experience thresholds of `level`.
    ///
    /// Levels below 1 cost nothing. Levels above [`MAX_LEVEL`] report the
    /// thresholds of `MAX_LEVEL`, so the memo never grows past it.
    pub fn level_info(&mut self, level: i64) -> LevelExp {
        if level < 1 {
            return LevelExp::default();
        }
        let index = (level.min(i64::from(MAX_LEVEL)) - 1) as usize;
        self.fill_to(index);
        LevelExp {
            level_exp: self.level_exp[index],
            cumulative_exp: self.level_all_exp[index],
        }
    }

    /// Maps raw experience to a level.
    ///
    /// Scans upward from level 1 until `exp` is below the level's cumulative
    /// threshold. The scan stops at [`MAX_LEVEL`] no matter how much
    /// experience is left over.
    pub fn level_for_exp(&mut self, exp: u64) -> LevelProgress {
        let mut level: u32 = 1;
        loop {
            let info = self.level_info(i64::from(level));
            if exp < info.cumulative_exp || level >= MAX_LEVEL {
                let floor = self.level_info(i64::from(level) - 1).cumulative_exp;
                return LevelProgress {
                    current_level_progress: exp.saturating_sub(floor),
                    level,
                    level_info: info,
                };
            }
            level += 1;
        }
    }
}
