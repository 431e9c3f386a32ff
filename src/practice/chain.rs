//! Fallback tiers shared by every exercise generator.

/// Source that produced an exercise, in the order tiers are tried.
///
/// The first usable result short-circuits the remaining tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    /// Built from previously extracted structured content.
    LocalLookup,
    /// Generated by the model and validated.
    LlmGeneration,
    /// Hard-coded content; always available.
    FixedFallback,
}

/// An exercise together with the tier that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved<T> {
    pub value: T,
    pub tier: Tier,
}

impl<T> Resolved<T> {
    pub fn new(value: T, tier: Tier) -> Self {
        Self { value, tier }
    }

    pub fn into_value(self) -> T {
        self.value
    }

    /// `true` unless the value came from the fixed fallback.
    pub fn is_dynamic(&self) -> bool {
        self.tier != Tier::FixedFallback
    }
}
