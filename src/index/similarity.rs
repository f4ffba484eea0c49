pub fn l2_norm(v: &[f32]) -> f32 {
    v.iter().map(|x| x * x).sum::<f32>().sqrt()
}

/// Cosine similarity with precomputed norms, clamped to [0, 1]
pub fn relevance(a: &[f32], b: &[f32], a_norm: f32, b_norm: f32) -> f32 {
    if a_norm == 0.0 || b_norm == 0.0 {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    (dot / (a_norm * b_norm)).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_vectors_score_one() {
        let v = [0.3, 0.4];
        let n = l2_norm(&v);
        assert!((relevance(&v, &v, n, n) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_opposite_vectors_clamp_to_zero() {
        let a = [1.0, 0.0];
        let b = [-1.0, 0.0];
        assert_eq!(relevance(&a, &b, 1.0, 1.0), 0.0);
    }

    #[test]
    fn test_zero_norm() {
        assert_eq!(relevance(&[0.0, 0.0], &[1.0, 0.0], 0.0, 1.0), 0.0);
    }
}
