//! Discrete-event simulation of one operating year at a fixed stall count and price.

use super::clock::{HourSlot, OperatingClock};
use super::demand::{
    arrivals_rate_per_hour, sample_energy_kwh, sample_wait_tolerance_min, service_time_hours,
};
use super::kpi::{RunTally, SimRunKpis};
use super::rng::StationRng;
use super::station::{QueuedCar, StallBank, WaitQueue};
use super::types::StationParams;

/// Simulator for one year of station operation.
///
/// Owns the stall bank and waiting line for the year and borrows the RNG
/// stream, so a replicate's state never leaks into another.
///
/// Each hour: draw a Poisson arrival count, scatter the arrivals uniformly
/// inside the hour, then for each arrival in time order drain the queue up
/// to that instant before seating, queueing, or turning the newcomer away.
/// A final drain at the end of the hour lets queued cars start as soon as a
/// stall frees.
pub struct YearSimulator<'a> {
    params: &'a StationParams,
    price: f64,
    rng: &'a mut StationRng,
    stalls: StallBank,
    queue: WaitQueue,
    tally: RunTally,
    arrival_times: Vec<f64>,
}

impl<'a> YearSimulator<'a> {
    /// Creates a simulator with `n_stalls` idle stalls and an empty line.
    pub fn new(
        params: &'a StationParams,
        n_stalls: usize,
        price: f64,
        rng: &'a mut StationRng,
    ) -> Self {
        Self {
            params,
            price,
            rng,
            stalls: StallBank::new(n_stalls),
            queue: WaitQueue::new(params.q_max),
            tally: RunTally::default(),
            arrival_times: Vec::new(),
        }
    }

    /// Simulates one operating hour.
    pub fn step(&mut self, slot: HourSlot) {
        let rate = arrivals_rate_per_hour(slot.month, self.price, self.params);
        let count = self.rng.poisson(rate);

        self.arrival_times.clear();
        for _ in 0..count {
            let t = slot.start() + self.rng.uniform();
            self.arrival_times.push(t);
        }
        self.arrival_times.sort_by(f64::total_cmp);

        for i in 0..self.arrival_times.len() {
            let t = self.arrival_times[i];
            self.drain_queue(t);
            self.arrive(t, slot.month);
        }

        self.drain_queue(slot.end());
    }

    /// Runs every hour of the year and returns the KPIs.
    pub fn run(mut self) -> SimRunKpis {
        let mut clock = OperatingClock::year(self.params.open_hours);
        let total_hours = clock.total_hours();
        clock.run(|slot| self.step(slot));

        let n_stalls = self.stalls.len();
        self.tally.finish(self.params, n_stalls, total_hours)
    }

    fn arrive(&mut self, t: f64, month: usize) {
        self.tally.arrivals += 1;
        let energy_kwh = sample_energy_kwh(self.rng, self.params, month);
        let wait_tol_min = sample_wait_tolerance_min(self.rng, self.params);

        if let Some(stall) = self.stalls.free_at(t) {
            self.serve(stall, t, energy_kwh, 0.0);
            return;
        }

        let car = QueuedCar {
            arrival_hour: t,
            wait_tol_min,
            energy_kwh,
        };
        if self.queue.push(car).is_err() {
            self.tally.dropped_queue_full += 1;
        }
    }

    /// Seats queued cars on stalls that free up no later than `until`.
    ///
    /// Impatient cars are expired at each stall release before the line
    /// advances, and once more at `until`.
    fn drain_queue(&mut self, until: f64) {
        while !self.queue.is_empty() {
            let Some((stall, free_at)) = self.stalls.earliest_free() else {
                break;
            };
            if free_at > until {
                break;
            }

            self.tally.dropped_wait_tol += self.queue.expire(free_at) as u64;
            let Some(car) = self.queue.pop_front() else {
                break;
            };
            let start = free_at.max(car.arrival_hour);
            if car.has_reneged(start) {
                self.tally.dropped_wait_tol += 1;
                continue;
            }
            self.serve(stall, start, car.energy_kwh, car.waited_min(start));
        }

        self.tally.dropped_wait_tol += self.queue.expire(until) as u64;
    }

    fn serve(&mut self, stall: usize, start: f64, energy_kwh: f64, wait_min: f64) {
        let hours = service_time_hours(energy_kwh, self.params);
        self.stalls.occupy(stall, start, hours);
        self.tally
            .record_service(energy_kwh, self.price, hours, wait_min);
    }
}

/// Simulates one year with `n_stalls` stalls at `price` per kWh.
///
/// `params` must already be validated.
pub fn simulate_year(
    params: &StationParams,
    n_stalls: usize,
    price: f64,
    rng: &mut StationRng,
) -> SimRunKpis {
    YearSimulator::new(params, n_stalls, price, rng).run()
}
