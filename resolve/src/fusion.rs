/// Blend a new observation into a stored reference vector with an
/// exponential moving average: `alpha * new + (1 - alpha) * old`,
/// component-wise.
///
/// With no prior vector (or a prior of a different length, left behind by
/// an older embedding model) the new vector is returned unchanged.
pub fn ema_blend(old: Option<&[f32]>, new: &[f32], alpha: f32) -> Vec<f32> {
    match old {
        Some(old) if old.len() == new.len() => new
            .iter()
            .zip(old.iter())
            .map(|(&n, &o)| alpha * n + (1.0 - alpha) * o)
            .collect(),
        _ => new.to_vec(),
    }
}
