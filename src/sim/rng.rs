//! Seeded pseudo-random source for the station simulation.

use rand::rand_core::impls;
use rand::{RngCore, SeedableRng};

/// 2^32 as a float, the divisor mapping a `u32` word into `[0, 1)`.
const TWO_POW_32: f64 = 4_294_967_296.0;

/// Deterministic 32-bit generator (mulberry32).
///
/// The same seed yields the same sequence on every platform. Instances
/// share no state, so each simulated year owns its own stream.
///
/// # Examples
///
/// ```
/// use ev_station_opt::sim::rng::StationRng;
///
/// let mut a = StationRng::new(7);
/// let mut b = StationRng::new(7);
/// assert_eq!(a.uniform(), b.uniform());
/// ```
#[derive(Debug, Clone)]
pub struct StationRng {
    state: u32,
}

impl StationRng {
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// Next 32-bit word.
    pub fn next_word(&mut self) -> u32 {
        self.state = self.state.wrapping_add(0x6D2B_79F5);
        let mut t = self.state;
        t = (t ^ (t >> 15)).wrapping_mul(t | 1);
        t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61));
        t ^ (t >> 14)
    }

    /// Uniform draw in `[0, 1)`.
    pub fn uniform(&mut self) -> f64 {
        f64::from(self.next_word()) / TWO_POW_32
    }

    /// Uniform draw in `[a, b)`.
    pub fn uniform_range(&mut self, a: f64, b: f64) -> f64 {
        a + (b - a) * self.uniform()
    }

    /// Uniform draw in `(0, 1)`, safe to pass to `ln`.
    fn uniform_nonzero(&mut self) -> f64 {
        loop {
            let u = self.uniform();
            if u > 0.0 {
                return u;
            }
        }
    }

    /// Standard normal draw via the Box-Muller transform.
    pub fn normal01(&mut self) -> f64 {
        let u1 = self.uniform_nonzero();
        let u2 = self.uniform();
        (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
    }

    pub fn normal(&mut self, mean: f64, std: f64) -> f64 {
        mean + std * self.normal01()
    }

    /// Exponential draw; `+inf` when `rate <= 0`.
    pub fn exponential(&mut self, rate: f64) -> f64 {
        if rate <= 0.0 {
            return f64::INFINITY;
        }
        -self.uniform_nonzero().ln() / rate
    }

    /// Poisson draw by Knuth's multiplication method.
    ///
    /// Cost grows linearly with `rate`; meant for per-hour arrival counts.
    pub fn poisson(&mut self, rate: f64) -> u32 {
        if rate <= 0.0 {
            return 0;
        }
        let limit = (-rate).exp();
        let mut product = 1.0;
        let mut k = 0_u32;
        loop {
            k += 1;
            product *= self.uniform();
            if product <= limit {
                return k - 1;
            }
        }
    }
}

impl RngCore for StationRng {
    fn next_u32(&mut self) -> u32 {
        self.next_word()
    }

    fn next_u64(&mut self) -> u64 {
        impls::next_u64_via_u32(self)
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        impls::fill_bytes_via_next(self, dst);
    }
}

impl SeedableRng for StationRng {
    type Seed = [u8; 4];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::new(u32::from_le_bytes(seed))
    }
}
