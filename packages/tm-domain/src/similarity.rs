/// Cosine similarity. A zero-norm or dimension-mismatched pair yields 0.0
/// rather than dividing by zero.
pub fn cosine(a: &[f32], b: &[f32]) -> f32 {
	if a.is_empty() || a.len() != b.len() {
		return 0.0;
	}

	let mut dot = 0.0_f32;
	let mut norm_a = 0.0_f32;
	let mut norm_b = 0.0_f32;

	for (x, y) in a.iter().zip(b) {
		dot += x * y;
		norm_a += x * x;
		norm_b += y * y;
	}

	if norm_a == 0.0 || norm_b == 0.0 {
		return 0.0;
	}

	dot / (norm_a.sqrt() * norm_b.sqrt())
}
