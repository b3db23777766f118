use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::foundation::error::{ChaosError, ChaosResult};

/// Source of vertex choices for the chaos walk.
///
/// Every [`rand::Rng`] is a choice source drawing uniformly from `[0, bound)`. Tests and replays
/// use [`ScriptedChoices`] instead.
pub trait ChoiceSource {
    /// Reject a source that cannot produce every choice in `[0, bound)`. [`ChaosWalk::new`]
    /// calls this once before the first step.
    ///
    /// [`ChaosWalk::new`]: crate::ChaosWalk::new
    fn check_bound(&self, _bound: usize) -> ChaosResult<()> {
        Ok(())
    }

    /// Next vertex index, in `[0, bound)`. `bound` is never zero.
    fn next_choice(&mut self, bound: usize) -> usize;
}

impl<R: rand::Rng + ?Sized> ChoiceSource for R {
    fn next_choice(&mut self, bound: usize) -> usize {
        self.random_range(0..bound)
    }
}

/// Replays a fixed sequence of choices, cycling when it runs out.
///
/// Every value must be a valid vertex index of the walk it drives; a script naming vertex 3 of
/// a triangle is rejected by [`ChoiceSource::check_bound`].
#[derive(Clone, Debug)]
pub struct ScriptedChoices {
    script: Vec<usize>,
    pos: usize,
}

impl ScriptedChoices {
    /// Create a replay of `script`, which must not be empty.
    pub fn new(script: Vec<usize>) -> ChaosResult<Self> {
        if script.is_empty() {
            return Err(ChaosError::validation("choice script must not be empty"));
        }
        Ok(Self { script, pos: 0 })
    }

    /// Choices handed out so far.
    pub fn consumed(&self) -> usize {
        self.pos
    }
}

impl ChoiceSource for ScriptedChoices {
    fn check_bound(&self, bound: usize) -> ChaosResult<()> {
        match self.script.iter().find(|&&v| v >= bound) {
            Some(v) => Err(ChaosError::validation(format!(
                "scripted choice {v} is out of range for {bound} vertices"
            ))),
            None => Ok(()),
        }
    }

    fn next_choice(&mut self, bound: usize) -> usize {
        let v = self.script[self.pos % self.script.len()];
        debug_assert!(v < bound, "scripted choice {v} out of range for {bound}");
        self.pos += 1;
        v
    }
}

/// Random source for one run: reproducible with a seed, OS entropy without.
pub fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/chaos/choice.rs"]
mod tests;
