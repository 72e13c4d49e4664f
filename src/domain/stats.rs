//! Per-year statistics ledger and grand-total summary.

/// Accumulated statistics for one calendar year of the simulation.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnualStats {
    pub year: i32,
    pub total_positions: u32,
    pub winning_positions: u32,
    pub losing_positions: u32,
    pub total_points_gained: f64,
    pub total_points_lost: f64,
    pub capital_start: f64,
    pub capital_end: f64,
    /// Derived once the year's days are exhausted. `None` when
    /// `capital_start` was zero.
    pub return_pct: Option<f64>,
}

impl AnnualStats {
    fn open(year: i32, capital: f64) -> Self {
        AnnualStats {
            year,
            total_positions: 0,
            winning_positions: 0,
            losing_positions: 0,
            total_points_gained: 0.0,
            total_points_lost: 0.0,
            capital_start: capital,
            capital_end: capital,
            return_pct: None,
        }
    }

    fn finalize(&mut self) {
        self.return_pct = if self.capital_start != 0.0 {
            Some((self.capital_end - self.capital_start) / self.capital_start * 100.0)
        } else {
            None
        };
    }
}

/// Year-by-year accumulator threaded through the simulation fold.
///
/// Years are opened in order of first appearance in the day sequence,
/// which is chronological order for a sorted series. Capital carries
/// across year boundaries: a year's `capital_start` equals the previous
/// year's `capital_end`.
#[derive(Debug, Default)]
pub struct AnnualLedger {
    years: Vec<AnnualStats>,
}

impl AnnualLedger {
    pub fn new() -> Self {
        AnnualLedger { years: Vec::new() }
    }

    /// Called at the start of every day, before any transition.
    /// Opens a new year entry when the calendar year changes, fixing
    /// its `capital_start` to the current capital.
    pub fn enter_day(&mut self, year: i32, capital: f64) {
        let same_year = self.years.last().is_some_and(|y| y.year == year);
        if same_year {
            return;
        }
        if let Some(previous) = self.years.last_mut() {
            previous.finalize();
        }
        self.years.push(AnnualStats::open(year, capital));
    }

    pub fn record_entry(&mut self) {
        if let Some(current) = self.years.last_mut() {
            current.total_positions += 1;
        }
    }

    pub fn record_win(&mut self, points: f64) {
        if let Some(current) = self.years.last_mut() {
            current.winning_positions += 1;
            current.total_points_gained += points;
        }
    }

    pub fn record_loss(&mut self, points: f64) {
        if let Some(current) = self.years.last_mut() {
            current.losing_positions += 1;
            current.total_points_lost += points;
        }
    }

    /// Called at the end of every day, after any transition.
    pub fn close_day(&mut self, capital: f64) {
        if let Some(current) = self.years.last_mut() {
            current.capital_end = capital;
        }
    }

    /// Finalize the open year and return the completed ledger.
    pub fn finish(mut self) -> Vec<AnnualStats> {
        if let Some(current) = self.years.last_mut() {
            current.finalize();
        }
        self.years
    }
}

/// Grand-total summary across all years of a run.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub total_positions: u32,
    pub winning_positions: u32,
    pub losing_positions: u32,
    pub total_points_gained: f64,
    pub total_points_lost: f64,
    pub initial_capital: f64,
    pub final_capital: f64,
    /// Sum of per-year capital deltas, in currency.
    pub total_return: f64,
    pub total_return_pct: Option<f64>,
    pub avg_winning_points: Option<f64>,
    pub avg_losing_points: Option<f64>,
}

impl Summary {
    pub fn compute(years: &[AnnualStats], initial_capital: f64, final_capital: f64) -> Self {
        let total_positions = years.iter().map(|y| y.total_positions).sum();
        let winning_positions: u32 = years.iter().map(|y| y.winning_positions).sum();
        let losing_positions: u32 = years.iter().map(|y| y.losing_positions).sum();
        let total_points_gained: f64 = years.iter().map(|y| y.total_points_gained).sum();
        let total_points_lost: f64 = years.iter().map(|y| y.total_points_lost).sum();

        let total_return: f64 = years
            .iter()
            .map(|y| y.capital_end - y.capital_start)
            .sum();

        let total_return_pct = if initial_capital != 0.0 {
            Some((final_capital - initial_capital) / initial_capital * 100.0)
        } else {
            None
        };

        let avg_winning_points = if winning_positions > 0 {
            Some(total_points_gained / winning_positions as f64)
        } else {
            None
        };

        let avg_losing_points = if losing_positions > 0 {
            Some(total_points_lost / losing_positions as f64)
        } else {
            None
        };

        Summary {
            total_positions,
            winning_positions,
            losing_positions,
            total_points_gained,
            total_points_lost,
            initial_capital,
            final_capital,
            total_return,
            total_return_pct,
            avg_winning_points,
            avg_losing_points,
        }
    }

    pub fn win_rate(&self) -> Option<f64> {
        let closed = self.winning_positions + self.losing_positions;
        if closed > 0 {
            Some(self.winning_positions as f64 / closed as f64)
        } else {
            None
        }
    }
}
