#[derive(Clone, Debug)]
pub struct ChunkingConfig {
	pub chunk_words: u32,
	pub overlap_words: u32,
}
impl Default for ChunkingConfig {
	fn default() -> Self {
		Self { chunk_words: 512, overlap_words: 50 }
	}
}

/// Split text into overlapping word windows for long-text embedding.
///
/// Words are whitespace-separated; each window holds `chunk_words` words and
/// the next window starts `chunk_words - overlap_words` words later, so no
/// boundary is cut without context bleeding into the following window.
/// Empty text yields no windows; text shorter than one window yields exactly
/// one.
pub fn word_windows(text: &str, cfg: &ChunkingConfig) -> Vec<String> {
	let words: Vec<&str> = text.split_whitespace().collect();

	if words.is_empty() {
		return Vec::new();
	}

	let chunk = cfg.chunk_words.max(1) as usize;
	let step = chunk.saturating_sub(cfg.overlap_words as usize).max(1);

	if cfg.overlap_words >= cfg.chunk_words {
		tracing::warn!(
			chunk_words = cfg.chunk_words,
			overlap_words = cfg.overlap_words,
			"Chunk overlap is not smaller than the window; falling back to step 1."
		);
	}

	let mut windows = Vec::new();
	let mut start = 0_usize;

	while start < words.len() {
		let end = (start + chunk).min(words.len());

		windows.push(words[start..end].join(" "));

		if end == words.len() {
			break;
		}

		start += step;
	}

	windows
}
