//! Seed derivation for grid points and their replicates.
//!
//! Every `(N, p)` pair gets its own base seed, so a point's results do not
//! depend on which other points are on the grid.

const STALL_SALT: u32 = 374_761_393;
const PRICE_SALT: u32 = 668_265_263;
const REPLICATE_STRIDE: u32 = 1_013_904_223;

/// 32-bit avalanche finisher (xorshift-multiply).
pub fn mix32(mut x: u32) -> u32 {
    x ^= x >> 16;
    x = x.wrapping_mul(0x7feb_352d);
    x ^= x >> 15;
    x = x.wrapping_mul(0x846c_a68b);
    x ^= x >> 16;
    x
}

/// Base seed for grid point `(n_stalls, price)` under master seed `seed`.
///
/// The price enters as integer thousandths.
pub fn base_seed(seed: u32, n_stalls: u32, price: f64) -> u32 {
    let milli = (price * 1000.0).round() as i64 as u32;
    mix32(seed ^ n_stalls.wrapping_mul(STALL_SALT) ^ milli.wrapping_mul(PRICE_SALT))
}

/// Seed of replicate `r` for a grid point with base seed `base`.
pub fn replicate_seed(base: u32, r: u32) -> u32 {
    base.wrapping_add(r.wrapping_mul(REPLICATE_STRIDE))
}
