/// Hands out the names of synthesized features.
///
/// Every name carries the next value of a monotonically increasing counter.
/// The counter is never reset, so two names produced by the same generator
/// never collide, not even across several conversions.
#[derive(Debug, Default, Clone)]
pub struct NameGenerator {
    next: u64,
}

impl NameGenerator {
    /// Constructs a generator that starts counting at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Constructs a generator that starts counting at `start`.
    pub fn starting_at(start: u64) -> Self {
        Self { next: start }
    }

    /// Returns the value the next name will carry.
    pub fn peek(&self) -> u64 {
        self.next
    }

    /// Returns the next counter value and advances the counter.
    pub fn next_index(&mut self) -> u64 {
        let index = self.next;
        self.next += 1;
        index
    }

    /// Returns a name for a feature that represents a conjunction or a
    /// disjunction, e.g. `f3`.
    pub fn group_name(&mut self, prefix: &str) -> String {
        format!("{prefix}{}", self.next_index())
    }

    /// Returns a name for a feature that represents a literal of `variable`,
    /// e.g. `A_4`.
    ///
    /// The separator makes the counter value the only digits after the last
    /// underscore, so names of different variables cannot collide.
    pub fn terminal_name(&mut self, variable: &str) -> String {
        format!("{variable}_{}", self.next_index())
    }
}
