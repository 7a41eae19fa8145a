/// Hands out prime numbers used to fingerprint dimensions and physics
///
/// Every allocator starts at 2 and never repeats a prime. The allocator is
/// owned by the symbol table of a compilation unit, so two units never share
/// a counter.
#[derive(Debug, Clone, Default)]
pub struct PrimeAllocator {
    issued: Vec<u64>,
}

impl PrimeAllocator {
    /// Creates a new allocator that will first hand out 2
    #[must_use]
    pub const fn new() -> Self {
        Self { issued: Vec::new() }
    }

    /// Returns the next unused prime
    pub fn next_prime(&mut self) -> u64 {
        let mut candidate = self.issued.last().map_or(2, |last| last + 1);
        while !self.is_prime(candidate) {
            candidate += 1;
        }

        self.issued.push(candidate);
        candidate
    }

    /// Returns the number of primes handed out so far
    #[must_use]
    pub const fn issued(&self) -> usize {
        self.issued.len()
    }

    // `issued` always holds every prime below `candidate`, so trial division
    // by it is enough
    fn is_prime(&self, candidate: u64) -> bool {
        self.issued
            .iter()
            .take_while(|prime| **prime * **prime <= candidate)
            .all(|prime| candidate % prime != 0)
    }
}

/// Combines physics ids into a single fingerprint
///
/// The fingerprint is the product of the ids. Because ids are distinct
/// primes, two parameter lists with the same multiset of physics have the
/// same fingerprint regardless of order. The product wraps on overflow.
#[must_use]
pub fn fingerprint(ids: impl IntoIterator<Item = u64>) -> u64 {
    ids.into_iter().fold(1, u64::wrapping_mul)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocator_hands_out_primes_in_order() {
        let mut allocator = PrimeAllocator::new();

        let primes: Vec<u64> = std::iter::repeat_with(|| allocator.next_prime())
            .take(10)
            .collect();

        assert_eq!(primes, vec![2, 3, 5, 7, 11, 13, 17, 19, 23, 29]);
        assert_eq!(allocator.issued(), 10);
    }

    #[test]
    fn separate_allocators_do_not_share_state() {
        let mut first = PrimeAllocator::new();
        let mut second = PrimeAllocator::new();

        first.next_prime();
        first.next_prime();

        assert_eq!(second.next_prime(), 2);
        assert_eq!(first.next_prime(), 5);
    }

    #[test]
    fn fingerprint_is_order_independent() {
        assert_eq!(fingerprint([3, 7, 11]), 231);
        assert_eq!(fingerprint([11, 3, 7]), fingerprint([3, 7, 11]));
        assert_eq!(fingerprint([]), 1);
    }
}
