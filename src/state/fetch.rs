/// Generation tokens guarding fetches tied to a view's lifetime.
///
/// Every async fetch a view starts carries the generation that was
/// current when it launched. When the view refetches or is replaced, the
/// lifetime is renewed; responses stamped with an older generation are
/// discarded instead of being applied to state they no longer describe.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Generation(u64);

#[derive(Debug, Default)]
pub struct Lifetime {
    current: u64,
}

impl Lifetime {
    pub fn new() -> Self {
        Lifetime::default()
    }

    /// Invalidate every outstanding fetch and mint the next generation.
    pub fn renew(&mut self) -> Generation {
        self.current += 1;
        Generation(self.current)
    }

    pub fn current(&self) -> Generation {
        Generation(self.current)
    }

    /// Whether a response stamped with `generation` may still be applied.
    pub fn is_current(&self, generation: Generation) -> bool {
        generation.0 == self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_generation_is_current() {
        let mut lifetime = Lifetime::new();
        let generation = lifetime.renew();
        assert!(lifetime.is_current(generation));
    }

    #[test]
    fn renewal_invalidates_outstanding_fetches() {
        let mut lifetime = Lifetime::new();
        let stale = lifetime.renew();
        let fresh = lifetime.renew();

        assert!(!lifetime.is_current(stale));
        assert!(lifetime.is_current(fresh));
    }

    #[test]
    fn current_matches_the_last_renewal() {
        let mut lifetime = Lifetime::new();
        let generation = lifetime.renew();
        assert_eq!(lifetime.current(), generation);
    }
}
