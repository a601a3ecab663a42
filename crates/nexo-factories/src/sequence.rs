use std::sync::atomic::{AtomicU64, Ordering};

/// Monotonic counter for values that must differ between generated rows
#[derive(Debug)]
pub struct Sequence {
    next: AtomicU64,
}

impl Sequence {
    pub const fn starting_at(first: u64) -> Self {
        Self {
            next: AtomicU64::new(first),
        }
    }

    pub fn next(&self) -> u64 {
        self.next.fetch_add(1, Ordering::Relaxed)
    }

    /// Next value formatted with a prefix, e.g. `slug-7`
    pub fn next_with(&self, prefix: &str) -> String {
        format!("{}-{}", prefix, self.next())
    }
}

impl Default for Sequence {
    fn default() -> Self {
        Self::starting_at(1)
    }
}
