use std::collections::{HashMap, HashSet};

use qdrant_client::qdrant::{
	Condition, Filter, Fusion, PointId, PrefetchQueryBuilder, Query, QueryPointsBuilder,
	ScoredPoint, ScrollPointsBuilder, point_id::PointIdOptions,
};
use tm_domain::{ComplexKey, EntityKind, FragmentPayload, SkillSpace, payload::fields, similarity};
use tm_index::points;

use crate::{CompiledQuery, ExclusionPolicy, Result, SearchParams, SearchService, SearchStrategy};

/// One retrieved fragment: stored payload and vectors plus the working
/// score the scorer and aggregator refine.
#[derive(Clone, Debug)]
pub struct ScoredFragment {
	pub payload: FragmentPayload,
	pub soft_vector: Option<Vec<f32>>,
	pub hard_vector: Option<Vec<f32>>,
	pub score: f32,
	pub direct_hit: bool,
}

/// Per-key score accumulation across one or more retrieval passes.
#[derive(Default)]
struct Accumulator {
	sums: HashMap<ComplexKey, f32>,
	hits: HashMap<ComplexKey, u32>,
	direct: HashMap<String, f32>,
	excluded: HashSet<ComplexKey>,
}
impl Accumulator {
	fn add_point(
		&mut self,
		point: &ScoredPoint,
		weight: f32,
		compiled: &CompiledQuery,
		params: &SearchParams,
	) {
		let Some(payload) = points::decode_payload(&point.payload) else {
			return;
		};
		let key = payload.key();
		let space = payload.space();
		let weighted = point.score * weight;

		*self.sums.entry(key).or_default() += weighted;
		*self.hits.entry(key).or_default() += 1;

		if let Some(id) = point_id_string(point.id.as_ref()) {
			let entry = self.direct.entry(id).or_insert(weighted);

			if weighted > *entry {
				*entry = weighted;
			}
		}

		// Marking is the hard-veto variant of exclusion; the default policy
		// leaves it to the scorer's bounded penalty instead.
		if params.exclusion_policy == ExclusionPolicy::Filter
			&& !compiled.exclusions(space).is_empty()
			&& let Some(stored) = points::named_vector(point.vectors.as_ref(), space)
			&& exceeds_any(&stored, compiled.exclusions(space), params.similarity_threshold)
		{
			self.excluded.insert(key);
		}
	}

	/// Average each key by its hit count so entities with more fragments
	/// gain no edge, then rank and cut to the page size.
	fn into_ranked(
		self,
		allowed: Option<&HashSet<ComplexKey>>,
		top_k: usize,
	) -> (Vec<ComplexKey>, HashMap<ComplexKey, f32>, HashMap<String, f32>) {
		let Self { sums, hits, direct, excluded } = self;
		let mut averaged: Vec<(ComplexKey, f32)> = sums
			.into_iter()
			.map(|(key, sum)| {
				let count = hits.get(&key).copied().unwrap_or(1).max(1);

				(key, sum / count as f32)
			})
			.filter(|(key, _)| !excluded.contains(key))
			.filter(|(key, _)| allowed.map(|set| set.contains(key)).unwrap_or(true))
			.collect();

		averaged.sort_by(|a, b| {
			b.1.partial_cmp(&a.1)
				.unwrap_or(std::cmp::Ordering::Equal)
				.then_with(|| a.0.cmp(&b.0))
		});
		averaged.truncate(top_k);

		let keys: Vec<ComplexKey> = averaged.iter().map(|(key, _)| *key).collect();
		let scores: HashMap<ComplexKey, f32> = averaged.into_iter().collect();

		(keys, scores, direct)
	}
}

impl SearchService {
	/// Retrieve raw fragments for one compiled request. Four cases: nothing
	/// specified browses, filters alone scroll, any query vector searches
	/// per space, and the fused strategy folds both spaces into one
	/// server-side fusion call.
	pub async fn retrieve(
		&self,
		kind: EntityKind,
		compiled: &CompiledQuery,
		params: &SearchParams,
	) -> Result<Vec<ScoredFragment>> {
		if !compiled.has_vectors() {
			let filter = compiled.merged_filter();

			if filter.is_none() {
				tracing::debug!(kind = kind.as_str(), "Unconstrained browse.");
			}

			let keys = self.keys_matching(kind, filter, params).await?;

			return self
				.rehydrate(kind, &keys, &HashMap::new(), &HashMap::new(), params)
				.await;
		}

		match params.strategy {
			SearchStrategy::PerSpace => self.query_per_space(kind, compiled, params).await,
			SearchStrategy::Fused => self.query_fused(kind, compiled, params).await,
		}
	}

	async fn query_per_space(
		&self,
		kind: EntityKind,
		compiled: &CompiledQuery,
		params: &SearchParams,
	) -> Result<Vec<ScoredFragment>> {
		let mut accumulator = Accumulator::default();
		let passes = [
			(SkillSpace::Hard, &compiled.hard_vector, &compiled.hard_filter, params.alpha),
			(SkillSpace::Soft, &compiled.soft_vector, &compiled.soft_filter, 1.0 - params.alpha),
		];

		for (space, vector, filter, weight) in passes {
			let Some(vector) = vector else {
				continue;
			};
			let mut builder =
				QueryPointsBuilder::new(self.index.collection_for(kind).to_string())
					.query(Query::new_nearest(vector.clone()))
					.using(space.as_str())
					.limit(params.prefetch_limit)
					.with_payload(true)
					.with_vectors(true);

			if let Some(filter) = filter {
				builder = builder.filter(filter.clone());
			}

			let response = self.index.client.query(builder).await?;

			for point in &response.result {
				accumulator.add_point(point, weight, compiled, params);
			}
		}

		let allowed = self.restriction_keys(kind, compiled, params).await?;
		let (keys, scores, direct) = accumulator.into_ranked(allowed.as_ref(), params.top_k);

		self.rehydrate(kind, &keys, &scores, &direct, params).await
	}

	async fn query_fused(
		&self,
		kind: EntityKind,
		compiled: &CompiledQuery,
		params: &SearchParams,
	) -> Result<Vec<ScoredFragment>> {
		let mut search = QueryPointsBuilder::new(self.index.collection_for(kind).to_string())
			.query(Fusion::Dbsf)
			.limit(params.prefetch_limit)
			.with_payload(true)
			.with_vectors(true);
		let prefetches = [
			(SkillSpace::Hard, &compiled.hard_vector, &compiled.hard_filter),
			(SkillSpace::Soft, &compiled.soft_vector, &compiled.soft_filter),
		];

		for (space, vector, filter) in prefetches {
			let Some(vector) = vector else {
				continue;
			};
			let mut prefetch = PrefetchQueryBuilder::default()
				.query(Query::new_nearest(vector.clone()))
				.using(space.as_str())
				.limit(params.prefetch_limit);

			if let Some(filter) = filter {
				prefetch = prefetch.filter(filter.clone());
			}

			search = search.add_prefetch(prefetch);
		}
		if let Some(filter) = &compiled.soft_filter {
			search = search.filter(filter.clone());
		}

		let response = self.index.client.query(search).await?;
		let mut accumulator = Accumulator::default();

		for point in &response.result {
			accumulator.add_point(point, 1.0, compiled, params);
		}

		let allowed = self.restriction_keys(kind, compiled, params).await?;
		let (keys, scores, direct) = accumulator.into_ranked(allowed.as_ref(), params.top_k);

		self.rehydrate(kind, &keys, &scores, &direct, params).await
	}

	/// Keys passing a filter-only scroll. Used for the no-vector cases and
	/// for spaces whose predicates have no query vector to ride along with.
	async fn keys_matching(
		&self,
		kind: EntityKind,
		filter: Option<Filter>,
		params: &SearchParams,
	) -> Result<Vec<ComplexKey>> {
		let mut builder = ScrollPointsBuilder::new(self.index.collection_for(kind).to_string())
			.limit(params.scroll_limit)
			.with_payload(true);

		if let Some(filter) = filter {
			builder = builder.filter(filter);
		}

		let response = self.index.client.scroll(builder).await?;
		let mut keys = Vec::new();
		let mut seen = HashSet::new();

		for point in response.result {
			let Some(payload) = points::decode_payload(&point.payload) else {
				continue;
			};
			let key = payload.key();

			if seen.insert(key) {
				keys.push(key);
			}
		}

		Ok(keys)
	}

	async fn restriction_keys(
		&self,
		kind: EntityKind,
		compiled: &CompiledQuery,
		params: &SearchParams,
	) -> Result<Option<HashSet<ComplexKey>>> {
		let mut allowed: Option<HashSet<ComplexKey>> = None;
		let spaces = [
			(&compiled.hard_vector, &compiled.hard_filter),
			(&compiled.soft_vector, &compiled.soft_filter),
		];

		for (vector, filter) in spaces {
			if vector.is_some() {
				continue;
			}

			let Some(filter) = filter else {
				continue;
			};
			let keys: HashSet<ComplexKey> =
				self.keys_matching(kind, Some(filter.clone()), params).await?.into_iter().collect();

			allowed = Some(match allowed {
				Some(existing) => existing.intersection(&keys).copied().collect(),
				None => keys,
			});
		}

		Ok(allowed)
	}

	/// Fetch every fragment (soft plus all hard siblings) of the discovered
	/// keys and attach the key scores. Direct hits keep their own weighted
	/// score when it beats the key average.
	async fn rehydrate(
		&self,
		kind: EntityKind,
		keys: &[ComplexKey],
		key_scores: &HashMap<ComplexKey, f32>,
		direct: &HashMap<String, f32>,
		params: &SearchParams,
	) -> Result<Vec<ScoredFragment>> {
		if keys.is_empty() {
			return Ok(Vec::new());
		}

		let key_set: HashSet<ComplexKey> = keys.iter().copied().collect();
		let mut document_ids: Vec<i64> = keys.iter().map(|key| key.document_id).collect();

		document_ids.sort_unstable();
		document_ids.dedup();

		let filter = Filter::must([Condition::matches(fields::DOCUMENT_ID, document_ids)]);
		let builder = ScrollPointsBuilder::new(self.index.collection_for(kind).to_string())
			.filter(filter)
			.limit(params.scroll_limit)
			.with_payload(true)
			.with_vectors(true);
		let response = self.index.client.scroll(builder).await?;
		let mut fragments = Vec::new();

		for point in response.result {
			let Some(payload) = points::decode_payload(&point.payload) else {
				continue;
			};
			let key = payload.key();

			if !key_set.contains(&key) {
				continue;
			}

			let base = key_scores.get(&key).copied().unwrap_or(0.0);
			let direct_score =
				point_id_string(point.id.as_ref()).and_then(|id| direct.get(&id)).copied();
			let soft_vector = points::named_vector(point.vectors.as_ref(), SkillSpace::Soft);
			let hard_vector = points::named_vector(point.vectors.as_ref(), SkillSpace::Hard);

			fragments.push(ScoredFragment {
				payload,
				soft_vector,
				hard_vector,
				score: direct_score.map(|score| score.max(base)).unwrap_or(base),
				direct_hit: direct_score.is_some(),
			});
		}

		Ok(fragments)
	}
}

fn point_id_string(id: Option<&PointId>) -> Option<String> {
	match id?.point_id_options.as_ref()? {
		PointIdOptions::Uuid(value) => Some(value.clone()),
		PointIdOptions::Num(value) => Some(value.to_string()),
	}
}

fn exceeds_any(stored: &[f32], exclusions: &[Vec<f32>], threshold: f32) -> bool {
	exclusions.iter().any(|exclusion| similarity::cosine(exclusion, stored) > threshold)
}
