//! Line clear scoring

/// Points awarded for clearing `rows` rows with a single lock.
/// Anything other than 1-4 is worth nothing.
pub fn points_for(rows: usize) -> u64 {
    match rows {
        1 => 100,
        2 => 300,
        3 => 700,
        4 => 1500,
        _ => 0,
    }
}

/// Score tracking
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Score {
    /// Current score, never decreases until reset
    pub points: u64,
    /// Total rows cleared
    pub lines: u32,
}

impl Score {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a lock that cleared `rows` rows. Returns the points awarded.
    pub fn add_clear(&mut self, rows: usize) -> u64 {
        let award = points_for(rows);
        self.points += award;
        self.lines += rows as u32;
        award
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
