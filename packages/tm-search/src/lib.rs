pub mod aggregate;
pub mod compile;
pub mod encode;
pub mod index;
pub mod retrieve;
pub mod score;

mod error;

pub use aggregate::{ResumeMatch, SkillMatch, VacancyMatch};
pub use compile::CompiledQuery;
pub use error::{Error, Result};
pub use retrieve::ScoredFragment;

use std::{future::Future, pin::Pin, sync::Arc};

use tm_config::{Config, EmbeddingProviderConfig};
use tm_domain::{EntityKind, SearchRequest, SkillSpace};
use tm_index::qdrant::QdrantStore;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub trait EmbeddingProvider
where
	Self: Send + Sync,
{
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, color_eyre::Result<Vec<Vec<f32>>>>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchStrategy {
	PerSpace,
	Fused,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExclusionPolicy {
	/// Must-not terms penalize scores after retrieval.
	Penalty,
	/// Must-not terms become store-side predicates and exclusion marking.
	Filter,
}

/// Per-search tuning, resolved once from config strings.
#[derive(Clone, Copy, Debug)]
pub struct SearchParams {
	pub alpha: f32,
	pub similarity_threshold: f32,
	pub fuzzy_threshold: f64,
	pub top_k: usize,
	pub prefetch_limit: u64,
	pub scroll_limit: u32,
	pub strategy: SearchStrategy,
	pub exclusion_policy: ExclusionPolicy,
}
impl SearchParams {
	pub fn from_config(search: &tm_config::Search) -> Self {
		let strategy = match search.strategy.as_str() {
			"fused" => SearchStrategy::Fused,
			_ => SearchStrategy::PerSpace,
		};
		let exclusion_policy = match search.exclusion_policy.as_str() {
			"filter" => ExclusionPolicy::Filter,
			_ => ExclusionPolicy::Penalty,
		};

		Self {
			alpha: search.alpha,
			similarity_threshold: search.similarity_threshold,
			fuzzy_threshold: search.fuzzy_threshold as f64,
			top_k: search.top_k as usize,
			prefetch_limit: search.prefetch_limit as u64,
			scroll_limit: search.scroll_limit,
			strategy,
			exclusion_policy,
		}
	}
}

struct DefaultProviders;
impl EmbeddingProvider for DefaultProviders {
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, color_eyre::Result<Vec<Vec<f32>>>> {
		Box::pin(tm_providers::embedding::embed(cfg, texts))
	}
}

#[derive(Clone)]
pub struct Providers {
	pub embedding: Arc<dyn EmbeddingProvider>,
}
impl Providers {
	pub fn new(embedding: Arc<dyn EmbeddingProvider>) -> Self {
		Self { embedding }
	}
}
impl Default for Providers {
	fn default() -> Self {
		Self { embedding: Arc::new(DefaultProviders) }
	}
}

pub struct SearchService {
	pub cfg: Config,
	pub index: QdrantStore,
	pub providers: Providers,
}
impl SearchService {
	pub fn new(cfg: Config, index: QdrantStore) -> Self {
		Self::with_providers(cfg, index, Providers::default())
	}

	pub fn with_providers(cfg: Config, index: QdrantStore, providers: Providers) -> Self {
		Self { cfg, index, providers }
	}

	pub(crate) fn provider_config(&self, space: SkillSpace) -> &EmbeddingProviderConfig {
		match space {
			SkillSpace::Soft => &self.cfg.providers.soft,
			SkillSpace::Hard => &self.cfg.providers.hard,
		}
	}

	pub fn search_params(&self) -> SearchParams {
		SearchParams::from_config(&self.cfg.search)
	}

	/// Search resumes on behalf of an employer-side request.
	pub async fn search_resumes(&self, request: &SearchRequest) -> Result<Vec<ResumeMatch>> {
		let entities = self.run_search(EntityKind::Candidate, request).await?;

		Ok(entities.into_iter().map(aggregate::into_resume).collect())
	}

	/// Search vacancies on behalf of a candidate-side request.
	pub async fn search_vacancies(&self, request: &SearchRequest) -> Result<Vec<VacancyMatch>> {
		let entities = self.run_search(EntityKind::Employer, request).await?;

		Ok(entities.into_iter().map(aggregate::into_vacancy).collect())
	}

	async fn run_search(
		&self,
		kind: EntityKind,
		request: &SearchRequest,
	) -> Result<Vec<aggregate::AggregatedEntity>> {
		let params = self.search_params();
		let compiled = self.compile(request, &params).await?;
		let mut fragments = self.retrieve(kind, &compiled, &params).await?;

		score::score_fragments(&mut fragments, &compiled, &params);

		tracing::debug!(
			kind = kind.as_str(),
			fragments = fragments.len(),
			"Scored retrieved fragments."
		);

		Ok(aggregate::aggregate(fragments))
	}
}
