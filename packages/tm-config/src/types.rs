use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	pub providers: Providers,
	#[serde(default)]
	pub chunking: Chunking,
	#[serde(default)]
	pub search: Search,
}

#[derive(Debug, Deserialize)]
pub struct Service {
	pub log_level: String,
}

#[derive(Debug, Deserialize)]
pub struct Storage {
	pub qdrant: Qdrant,
}

#[derive(Debug, Deserialize)]
pub struct Qdrant {
	pub url: String,
	pub candidates_collection: String,
	pub vacancies_collection: String,
}

#[derive(Debug, Deserialize)]
pub struct Providers {
	/// Descriptive/summary embedding space.
	pub soft: EmbeddingProviderConfig,
	/// Skill embedding space.
	pub hard: EmbeddingProviderConfig,
}

#[derive(Debug, Deserialize)]
pub struct EmbeddingProviderConfig {
	pub provider_id: String,
	pub api_base: String,
	pub api_key: String,
	pub path: String,
	pub model: String,
	pub dimensions: u32,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Chunking {
	pub chunk_words: u32,
	pub overlap_words: u32,
}
impl Default for Chunking {
	fn default() -> Self {
		Self { chunk_words: 512, overlap_words: 50 }
	}
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Search {
	/// Weight of hard-space similarity; soft-space hits get `1 - alpha`.
	pub alpha: f32,
	/// Cosine bar above which an exclusion vector counts as a match.
	pub similarity_threshold: f32,
	/// Partial-ratio bar for fuzzy keyword penalties, in [0, 1].
	pub fuzzy_threshold: f32,
	pub top_k: u32,
	pub prefetch_limit: u32,
	pub scroll_limit: u32,
	pub strategy: String,
	pub exclusion_policy: String,
}
impl Default for Search {
	fn default() -> Self {
		Self {
			alpha: 0.8,
			similarity_threshold: 0.8,
			fuzzy_threshold: 0.85,
			top_k: 20,
			prefetch_limit: 100,
			scroll_limit: 100,
			strategy: "per_space".to_string(),
			exclusion_policy: "penalty".to_string(),
		}
	}
}
