// The largest number of buckets or slots a table may hold.
pub const MAX_CAPACITY: usize = i32::MAX as usize;

// The Fibonacci multiplier for 32-bit keys, 2^32 / golden ratio.
const PHI: u32 = 2_654_435_769;

// Returns the bucket of a key in a chained table of `capacity` buckets.
//
// The sign bit is masked off rather than taking the absolute value, so
// `i32::MIN` maps to bucket `0 % capacity` instead of overflowing.
#[inline]
pub fn index_of(key: i32, capacity: usize) -> usize {
    (key & 0x7FFF_FFFF) as usize % capacity
}

// Returns the capacity a chained table grows to.
#[inline]
pub fn grown(capacity: usize) -> usize {
    capacity.saturating_mul(2).saturating_add(1).min(MAX_CAPACITY)
}

// Returns the number of entries a table holds before it must grow.
#[inline]
pub fn threshold(capacity: usize, load_factor: f64) -> usize {
    // Saturating float-to-int cast.
    (capacity as f64 * load_factor) as usize
}

// Returns the number of open-addressing slots needed to hold `capacity`
// entries below `fill_factor`, or `None` if that exceeds `MAX_CAPACITY`.
pub fn slots_for(capacity: usize, fill_factor: f64) -> Option<usize> {
    let needed = (capacity as f64 / fill_factor).ceil() as usize;
    let slots = needed.max(2).checked_next_power_of_two()?;
    (slots <= MAX_CAPACITY).then_some(slots)
}

// A linear probe sequence over a power-of-two slot array.
pub struct Probe {
    // The current index in the probe sequence.
    pub i: usize,
    // Mask for the length of the table.
    mask: usize,
}

impl Probe {
    // Start probing at the home slot of a key.
    #[inline]
    pub fn start(key: i32, len: usize) -> Probe {
        debug_assert!(len.is_power_of_two());

        Probe {
            i: home(key, len),
            mask: len - 1,
        }
    }

    // Advance to the next slot, wrapping at the end of the table.
    #[inline]
    pub fn next(&mut self) {
        self.i = (self.i + 1) & self.mask;
    }
}

// Returns the preferred slot of a key in a power-of-two slot array.
//
// Multiplies the key by 2^32 divided by the golden ratio and keeps the top
// bits, which spreads consecutive keys across the table.
#[inline]
pub fn home(key: i32, len: usize) -> usize {
    if len <= 1 {
        return 0;
    }

    let bits = len.trailing_zeros();
    ((key as u32).wrapping_mul(PHI) >> (32 - bits)) as usize
}
