mod error;
mod types;

pub use error::{Error, Result};
pub use types::{
	Chunking, Config, EmbeddingProviderConfig, Providers, Qdrant, Search, Service, Storage,
};

use std::{fs, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.log_level.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.log_level must be non-empty.".to_string(),
		});
	}
	if cfg.storage.qdrant.url.trim().is_empty() {
		return Err(Error::Validation {
			message: "storage.qdrant.url must be non-empty.".to_string(),
		});
	}
	if cfg.storage.qdrant.candidates_collection.trim().is_empty()
		|| cfg.storage.qdrant.vacancies_collection.trim().is_empty()
	{
		return Err(Error::Validation {
			message: "storage.qdrant collections must be non-empty.".to_string(),
		});
	}
	if cfg.storage.qdrant.candidates_collection == cfg.storage.qdrant.vacancies_collection {
		return Err(Error::Validation {
			message: "storage.qdrant collections must be distinct.".to_string(),
		});
	}

	for (label, provider) in
		[("soft", &cfg.providers.soft), ("hard", &cfg.providers.hard)]
	{
		if provider.dimensions == 0 {
			return Err(Error::Validation {
				message: format!("providers.{label}.dimensions must be greater than zero."),
			});
		}
		if provider.api_key.trim().is_empty() {
			return Err(Error::Validation {
				message: format!("providers.{label}.api_key must be non-empty."),
			});
		}
	}

	if cfg.chunking.chunk_words == 0 {
		return Err(Error::Validation {
			message: "chunking.chunk_words must be greater than zero.".to_string(),
		});
	}
	if cfg.chunking.overlap_words >= cfg.chunking.chunk_words {
		return Err(Error::Validation {
			message: "chunking.overlap_words must be less than chunking.chunk_words.".to_string(),
		});
	}

	for (label, value) in [
		("search.alpha", cfg.search.alpha),
		("search.similarity_threshold", cfg.search.similarity_threshold),
		("search.fuzzy_threshold", cfg.search.fuzzy_threshold),
	] {
		if !value.is_finite() {
			return Err(Error::Validation {
				message: format!("{label} must be a finite number."),
			});
		}
		if !(0.0..=1.0).contains(&value) {
			return Err(Error::Validation {
				message: format!("{label} must be in the range 0.0-1.0."),
			});
		}
	}

	for (label, value) in [
		("search.top_k", cfg.search.top_k),
		("search.prefetch_limit", cfg.search.prefetch_limit),
		("search.scroll_limit", cfg.search.scroll_limit),
	] {
		if value == 0 {
			return Err(Error::Validation {
				message: format!("{label} must be greater than zero."),
			});
		}
	}

	if !matches!(cfg.search.strategy.as_str(), "per_space" | "fused") {
		return Err(Error::Validation {
			message: "search.strategy must be one of per_space or fused.".to_string(),
		});
	}
	if !matches!(cfg.search.exclusion_policy.as_str(), "penalty" | "filter") {
		return Err(Error::Validation {
			message: "search.exclusion_policy must be one of penalty or filter.".to_string(),
		});
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	for provider in [&mut cfg.providers.soft, &mut cfg.providers.hard] {
		provider.api_base = provider.api_base.trim().to_string();
		provider.path = provider.path.trim().to_string();
	}

	cfg.storage.qdrant.url = cfg.storage.qdrant.url.trim().to_string();
}
