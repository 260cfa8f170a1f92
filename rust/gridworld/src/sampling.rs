use crate::{Continous, Result};
use rand::distributions::WeightedIndex;
use rand::prelude::*;

pub trait Weighted<S> {
    fn s(&self) -> S;

    fn p(&self) -> Continous;
}

/// Samples one item proportionally to its weight.
pub fn pick_next<T, S, R>(rng: &mut R, ts: &[T]) -> Result<S>
where
    T: Weighted<S>,
    R: Rng + ?Sized,
{
    let dist = WeightedIndex::new(ts.iter().map(|item| item.p()))?;
    Ok(ts[dist.sample(rng)].s())
}
