//! Stall bank and bounded waiting line for one simulated year.

use std::collections::VecDeque;

/// A car waiting for a stall.
#[derive(Debug, Clone, PartialEq)]
pub struct QueuedCar {
    /// Absolute simulated time of arrival (hours).
    pub arrival_hour: f64,
    /// Longest wait the customer accepts (minutes).
    pub wait_tol_min: f64,
    /// Energy the customer wants (kWh).
    pub energy_kwh: f64,
}

impl QueuedCar {
    /// Minutes waited if service started at `now`.
    pub fn waited_min(&self, now: f64) -> f64 {
        (now - self.arrival_hour) * 60.0
    }

    /// True once the wait at `now` exceeds the customer's tolerance.
    pub fn has_reneged(&self, now: f64) -> bool {
        self.waited_min(now) > self.wait_tol_min
    }
}

/// The station's stalls, each reduced to the time it next becomes free.
#[derive(Debug, Clone)]
pub struct StallBank {
    busy_until: Vec<f64>,
}

impl StallBank {
    /// Creates `count` stalls, all free from time zero.
    pub fn new(count: usize) -> Self {
        Self {
            busy_until: vec![0.0; count],
        }
    }

    pub fn len(&self) -> usize {
        self.busy_until.len()
    }

    pub fn is_empty(&self) -> bool {
        self.busy_until.is_empty()
    }

    /// Lowest-index stall free at `now`.
    pub fn free_at(&self, now: f64) -> Option<usize> {
        self.busy_until.iter().position(|&t| t <= now)
    }

    /// Stall that frees up first, with its free time. Ties go to the lowest index.
    pub fn earliest_free(&self) -> Option<(usize, f64)> {
        let mut best: Option<(usize, f64)> = None;
        for (idx, &t) in self.busy_until.iter().enumerate() {
            if best.is_none_or(|(_, b)| t < b) {
                best = Some((idx, t));
            }
        }
        best
    }

    /// Marks `stall` busy from `start` for `duration_hours`.
    pub fn occupy(&mut self, stall: usize, start: f64, duration_hours: f64) {
        self.busy_until[stall] = start + duration_hours;
    }

    pub fn busy_until(&self, stall: usize) -> f64 {
        self.busy_until[stall]
    }
}

/// First-come-first-served waiting line with a hard capacity.
#[derive(Debug, Clone)]
pub struct WaitQueue {
    cars: VecDeque<QueuedCar>,
    capacity: usize,
}

impl WaitQueue {
    pub fn new(capacity: usize) -> Self {
        Self {
            cars: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn len(&self) -> usize {
        self.cars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cars.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.cars.len() >= self.capacity
    }

    /// Appends `car`; hands it back if the line is full.
    pub fn push(&mut self, car: QueuedCar) -> Result<(), QueuedCar> {
        if self.is_full() {
            return Err(car);
        }
        self.cars.push_back(car);
        Ok(())
    }

    pub fn pop_front(&mut self) -> Option<QueuedCar> {
        self.cars.pop_front()
    }

    /// Removes every car whose wait at `now` exceeds its tolerance.
    ///
    /// Returns the number removed. Survivors keep their order.
    pub fn expire(&mut self, now: f64) -> usize {
        let before = self.cars.len();
        self.cars.retain(|car| !car.has_reneged(now));
        before - self.cars.len()
    }
}
