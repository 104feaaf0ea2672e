use std::cell::RefCell;

// ── Thread-local RNG (xoshiro256**) ────────────────────────────────────
thread_local! {
    static RNG: RefCell<Xoshiro256StarStar> = RefCell::new(Xoshiro256StarStar::from_time());
}

struct Xoshiro256StarStar {
    s: [u64; 4],
}

impl Xoshiro256StarStar {
    fn from_time() -> Self {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};
        let mut s = [0u64; 4];
        for (i, slot) in s.iter_mut().enumerate() {
            let mut h = DefaultHasher::new();
            std::time::SystemTime::now().hash(&mut h);
            std::thread::current().id().hash(&mut h);
            (i as u64).hash(&mut h);
            *slot = h.finish();
            if *slot == 0 {
                *slot = 0xdeadbeef;
            }
        }
        Self { s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.s[1].wrapping_mul(5)).rotate_left(7).wrapping_mul(9);
        let t = self.s[1] << 17;
        self.s[2] ^= self.s[0];
        self.s[3] ^= self.s[1];
        self.s[1] ^= self.s[2];
        self.s[0] ^= self.s[3];
        self.s[2] ^= t;
        self.s[3] = self.s[3].rotate_left(45);
        result
    }
}

/// Uniform random integer in `[min, max]`. Callers validate the range.
pub(crate) fn random_in_range(min: i64, max: i64) -> i64 {
    let span = (max - min) as u64 + 1;
    let value = RNG.with(|rng| rng.borrow_mut().next_u64());
    min + (value % span) as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stays_in_range() {
        for _ in 0..1000 {
            let n = random_in_range(-3, 7);
            assert!((-3..=7).contains(&n));
        }
    }

    #[test]
    fn degenerate_range() {
        assert_eq!(random_in_range(5, 5), 5);
    }
}
