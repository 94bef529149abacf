use tm_chunking::ChunkingConfig;
use tm_domain::SkillSpace;

use crate::{Error, Result, SearchService};

impl SearchService {
	/// Embed arbitrarily long text in one space: overlapping word windows,
	/// one model call for every window, element-wise mean of the results.
	/// Callers treat empty text as "no query in this space" and never get
	/// here with it.
	pub async fn encode_long_text(&self, space: SkillSpace, text: &str) -> Result<Vec<f32>> {
		let chunking = ChunkingConfig {
			chunk_words: self.cfg.chunking.chunk_words,
			overlap_words: self.cfg.chunking.overlap_words,
		};
		let windows = tm_chunking::word_windows(text, &chunking);

		if windows.is_empty() {
			return Err(Error::InvalidRequest {
				message: "Cannot encode empty text.".to_string(),
			});
		}

		let cfg = self.provider_config(space);
		let embedded = self.providers.embedding.embed(cfg, &windows).await?;

		if embedded.len() != windows.len() {
			return Err(Error::Provider {
				message: "Embedding provider returned mismatched vector count.".to_string(),
			});
		}

		let pooled = mean_pool(&embedded).ok_or_else(|| Error::Provider {
			message: "Embedding provider returned no vectors.".to_string(),
		})?;

		if pooled.len() != cfg.dimensions as usize {
			return Err(Error::Provider {
				message: "Embedding vector dimension mismatch.".to_string(),
			});
		}

		Ok(pooled)
	}
}

/// Element-wise mean over a batch of equally sized vectors. The mean of a
/// single vector is that vector unchanged.
pub fn mean_pool(vectors: &[Vec<f32>]) -> Option<Vec<f32>> {
	let first = vectors.first()?;
	let mut pooled = first.clone();

	for vector in &vectors[1..] {
		if vector.len() != pooled.len() {
			return None;
		}

		for (sum, value) in pooled.iter_mut().zip(vector) {
			*sum += value;
		}
	}

	let count = vectors.len() as f32;

	for value in &mut pooled {
		*value /= count;
	}

	Some(pooled)
}
