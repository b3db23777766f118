use std::iter::FusedIterator;

use crate::chaos::choice::ChoiceSource;
use crate::foundation::core::{Position, Rgb8, Vertex};
use crate::foundation::error::{ChaosError, ChaosResult};

/// How the midpoint between the cursor and the chosen vertex is rounded to a pixel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rounding {
    /// Round toward negative infinity. Reproduces the classic integer-average renders,
    /// including their slight drift toward the top-left.
    #[default]
    Floor,
    /// Round half up to the nearest pixel.
    Nearest,
}

impl Rounding {
    fn midpoint(self, a: i64, b: i64) -> i64 {
        match self {
            Self::Floor => (a + b).div_euclid(2),
            Self::Nearest => (a + b + 1).div_euclid(2),
        }
    }
}

/// One iteration of the walk.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Step {
    /// Cursor after the jump.
    pub position: Position,
    /// Color of the chosen vertex.
    pub color: Rgb8,
    /// Index of the chosen vertex.
    pub vertex: usize,
    /// 0-based iteration index.
    pub iteration: u64,
}

/// Lazy chaos-game walk: `iterations` halfway jumps toward randomly chosen vertices.
///
/// Each step depends on the cursor left by the previous one, so the walk is strictly
/// sequential and cannot be restarted. The walk never touches a canvas; consumers fold over
/// the yielded [`Step`]s.
pub struct ChaosWalk<'a, C: ChoiceSource + ?Sized> {
    vertices: &'a [Vertex],
    colors: &'a [Rgb8],
    choices: &'a mut C,
    rounding: Rounding,
    cursor: Position,
    next_iteration: u64,
    iterations: u64,
}

impl<'a, C: ChoiceSource + ?Sized> ChaosWalk<'a, C> {
    /// Create a walk starting at `start`.
    ///
    /// `colors[k]` is the color of `vertices[k]`; the slices must be non-empty and of equal
    /// length.
    pub fn new(
        vertices: &'a [Vertex],
        colors: &'a [Rgb8],
        iterations: u64,
        start: Position,
        choices: &'a mut C,
    ) -> ChaosResult<Self> {
        if vertices.is_empty() {
            return Err(ChaosError::validation("chaos walk needs at least one vertex"));
        }
        if vertices.len() != colors.len() {
            return Err(ChaosError::validation(format!(
                "vertex count ({}) must equal color count ({})",
                vertices.len(),
                colors.len()
            )));
        }
        choices.check_bound(vertices.len())?;
        Ok(Self {
            vertices,
            colors,
            choices,
            rounding: Rounding::Floor,
            cursor: start,
            next_iteration: 0,
            iterations,
        })
    }

    /// Use `rounding` for the midpoint computation.
    pub fn with_rounding(mut self, rounding: Rounding) -> Self {
        self.rounding = rounding;
        self
    }

    /// Iterations not yet yielded.
    pub fn remaining(&self) -> u64 {
        self.iterations - self.next_iteration
    }

    /// Drive the walk to completion, calling `on_step` for every step in order.
    ///
    /// Stops at the first error. Returns the number of completed steps.
    pub fn run<F>(self, mut on_step: F) -> ChaosResult<u64>
    where
        F: FnMut(&Step) -> ChaosResult<()>,
    {
        let mut done = 0u64;
        for step in self {
            on_step(&step)?;
            done += 1;
        }
        Ok(done)
    }
}

impl<C: ChoiceSource + ?Sized> Iterator for ChaosWalk<'_, C> {
    type Item = Step;

    fn next(&mut self) -> Option<Step> {
        if self.next_iteration >= self.iterations {
            return None;
        }

        let k = self.choices.next_choice(self.vertices.len());
        let target = Position::from(self.vertices[k]);
        self.cursor = Position::new(
            self.rounding.midpoint(self.cursor.x, target.x),
            self.rounding.midpoint(self.cursor.y, target.y),
        );

        let step = Step {
            position: self.cursor,
            color: self.colors[k],
            vertex: k,
            iteration: self.next_iteration,
        };
        self.next_iteration += 1;
        Some(step)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match usize::try_from(self.remaining()) {
            Ok(n) => (n, Some(n)),
            Err(_) => (usize::MAX, None),
        }
    }
}

impl<C: ChoiceSource + ?Sized> FusedIterator for ChaosWalk<'_, C> {}

#[cfg(test)]
#[path = "../../tests/unit/chaos/walk.rs"]
mod tests;
