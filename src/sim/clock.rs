/// Days per calendar month in a non-leap year, January first.
pub const DAYS_IN_MONTH: [u32; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

/// Days in the simulated year.
pub const DAYS_PER_YEAR: u32 = 365;

/// Returns the zero-based month (0 = January) containing `day_of_year`.
///
/// Days past the end of the year map to December.
pub fn month_of_day(day_of_year: u32) -> usize {
    let mut remaining = day_of_year;
    for (month, &days) in DAYS_IN_MONTH.iter().enumerate() {
        if remaining < days {
            return month;
        }
        remaining -= days;
    }
    DAYS_IN_MONTH.len() - 1
}

/// One operating hour of the simulated year.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HourSlot {
    /// Zero-based operating-hour index; the hour covers `[index, index + 1)`.
    pub index: u32,
    /// Zero-based day of year.
    pub day: u32,
    /// Zero-based month (0 = January).
    pub month: usize,
}

impl HourSlot {
    /// Absolute simulated time at the start of the hour.
    pub fn start(&self) -> f64 {
        f64::from(self.index)
    }

    /// Absolute simulated time at the end of the hour.
    pub fn end(&self) -> f64 {
        f64::from(self.index) + 1.0
    }
}

/// A clock over the operating hours of one year.
///
/// Only open hours exist on the time axis: the last open hour of a day is
/// immediately followed by the first open hour of the next.
///
/// # Examples
///
/// ```
/// use ev_station_opt::sim::clock::OperatingClock;
///
/// let mut clock = OperatingClock::new(2, 3);
/// let mut days = Vec::new();
///
/// clock.run(|slot| days.push(slot.day));
/// assert_eq!(days, vec![0, 0, 1, 1, 2, 2]);
/// ```
pub struct OperatingClock {
    open_hours: u32,
    current: u32,
    total: u32,
}

impl OperatingClock {
    /// Creates a clock covering `days` days of `open_hours` hours each.
    pub fn new(open_hours: u32, days: u32) -> Self {
        Self {
            open_hours,
            current: 0,
            total: open_hours * days,
        }
    }

    /// Creates a clock covering a full non-leap year.
    pub fn year(open_hours: u32) -> Self {
        Self::new(open_hours, DAYS_PER_YEAR)
    }

    /// Total hours the clock runs for.
    pub fn total_hours(&self) -> u32 {
        self.total
    }

    /// Advances the clock by one hour.
    ///
    /// # Returns
    ///
    /// * `Some(slot)` - The hour just entered
    /// * `None` - If every hour has been visited
    pub fn tick(&mut self) -> Option<HourSlot> {
        if self.current >= self.total {
            return None;
        }
        let index = self.current;
        self.current += 1;
        let day = index / self.open_hours;
        Some(HourSlot {
            index,
            day,
            month: month_of_day(day),
        })
    }

    /// Runs `f` for each remaining hour.
    pub fn run(&mut self, mut f: impl FnMut(HourSlot)) {
        while let Some(slot) = self.tick() {
            f(slot);
        }
    }
}
