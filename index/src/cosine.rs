/// Compute the cosine similarity between two vectors, clamped to `[0, 1]`
/// to match the similarity contract of the index service.
///
/// Uses f64 intermediate precision. Returns 0.0 for zero vectors or
/// dimension mismatches.
pub fn cosine_sim(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let mut dot: f64 = 0.0;
    let mut norm_a: f64 = 0.0;
    let mut norm_b: f64 = 0.0;

    for i in 0..a.len() {
        let ai = a[i] as f64;
        let bi = b[i] as f64;
        dot += ai * bi;
        norm_a += ai * ai;
        norm_b += bi * bi;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    let similarity = dot / (norm_a.sqrt() * norm_b.sqrt());
    // Clamp to [0, 1]: negative cosine carries no identity signal.
    similarity.clamp(0.0, 1.0) as f32
}
