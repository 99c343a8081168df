/// Q48.16 fixed-point time in microseconds.
///
/// Storage: `u64` with 48 integer bits + 16 fractional bits.
/// Base unit: microseconds (1 second = 1,000,000 us).
/// Range: 0 to ~8.9 years with sub-microsecond precision, so tick-derived
/// deadlines never drift for any realistic session length.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Micros(u64);

impl Micros {
    const FRAC_BITS: u32 = 16;
    const MICROS_PER_SEC: u64 = 1_000_000;

    pub const ZERO: Self = Self(0);

    /// Create from whole seconds.
    pub const fn from_secs(secs: u32) -> Self {
        Self((secs as u64 * Self::MICROS_PER_SEC) << Self::FRAC_BITS)
    }

    /// Create from whole milliseconds.
    pub const fn from_millis(millis: u32) -> Self {
        Self((millis as u64 * 1_000) << Self::FRAC_BITS)
    }

    /// Create from whole microseconds.
    pub const fn from_micros(micros: u32) -> Self {
        Self((micros as u64) << Self::FRAC_BITS)
    }

    /// Simulated time at the start of `tick` for a clock running at `tick_hz`.
    ///
    /// Computed from the tick index directly rather than by summing
    /// `per_tick` so rounding never accumulates.
    pub const fn at_tick(tick: u64, tick_hz: u32) -> Self {
        if tick_hz == 0 {
            return Self(0);
        }
        let numer = tick as u128 * ((Self::MICROS_PER_SEC as u128) << Self::FRAC_BITS);
        Self((numer / tick_hz as u128) as u64)
    }

    /// Duration of one tick at the given tick rate.
    pub const fn per_tick(tick_hz: u32) -> Self {
        Self::at_tick(1, tick_hz)
    }

    /// Convert to tick count at the given tick rate, rounding down.
    ///
    /// Formula: ticks = (micros * tick_hz) / MICROS_PER_SEC
    pub const fn to_ticks(self, tick_hz: u32) -> u64 {
        let numer = self.0 as u128 * tick_hz as u128;
        let denom = (Self::MICROS_PER_SEC as u128) << Self::FRAC_BITS;
        (numer / denom) as u64
    }

    /// Whole milliseconds, rounding down.
    pub const fn as_millis(self) -> u64 {
        (self.0 >> Self::FRAC_BITS) / 1_000
    }

    pub const fn saturating_sub(self, rhs: Self) -> Self {
        Self(self.0.saturating_sub(rhs.0))
    }

    /// Returns the raw Q48.16 value.
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl core::ops::Add for Micros {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl core::ops::AddAssign for Micros {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl core::ops::Sub for Micros {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl core::ops::Mul<u32> for Micros {
    type Output = Self;
    fn mul(self, rhs: u32) -> Self {
        Self(self.0 * rhs as u64)
    }
}

impl core::ops::Div<u32> for Micros {
    type Output = Self;
    fn div(self, rhs: u32) -> Self {
        Self(self.0 / rhs as u64)
    }
}
