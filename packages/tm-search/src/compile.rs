use qdrant_client::qdrant::{
	Condition, FieldCondition, Filter, Match, MinShould, Range, r#match::MatchValue,
};
use tm_domain::{SearchRequest, SkillSpace, TermSet, normalize, payload::fields};

use crate::{ExclusionPolicy, Result, SearchParams, SearchService};

/// The compiled form of one search request: per-space query vectors,
/// per-term exclusion vectors, store-side filter predicates, and the
/// normalized hard keyword lists the scorer re-checks after retrieval.
#[derive(Clone, Debug, Default)]
pub struct CompiledQuery {
	pub soft_filter: Option<Filter>,
	pub hard_filter: Option<Filter>,
	pub soft_vector: Option<Vec<f32>>,
	pub hard_vector: Option<Vec<f32>>,
	pub soft_exclusions: Vec<Vec<f32>>,
	pub hard_exclusions: Vec<Vec<f32>>,
	pub hard_must_terms: Vec<String>,
	pub hard_must_not_terms: Vec<String>,
}
impl CompiledQuery {
	pub fn has_vectors(&self) -> bool {
		self.soft_vector.is_some() || self.hard_vector.is_some()
	}

	pub fn has_filters(&self) -> bool {
		self.soft_filter.is_some() || self.hard_filter.is_some()
	}

	pub fn exclusions(&self, space: SkillSpace) -> &[Vec<f32>] {
		match space {
			SkillSpace::Soft => &self.soft_exclusions,
			SkillSpace::Hard => &self.hard_exclusions,
		}
	}

	/// One filter carrying both spaces' conditions, for filter-only scrolls.
	pub fn merged_filter(&self) -> Option<Filter> {
		let mut must = Vec::new();
		let mut must_not = Vec::new();
		let mut should = Vec::new();

		for filter in [self.soft_filter.as_ref(), self.hard_filter.as_ref()].into_iter().flatten()
		{
			must.extend(filter.must.iter().cloned());
			must_not.extend(filter.must_not.iter().cloned());

			if let Some(min_should) = filter.min_should.as_ref() {
				should.extend(min_should.conditions.iter().cloned());
			}
		}

		build_filter(must, should, must_not)
	}
}

impl SearchService {
	/// Translate a search request into vectors and predicates: one
	/// concatenated positive query per space, one exclusion vector per
	/// must-not term, scalar constraints as soft-side field conditions.
	pub async fn compile(
		&self,
		request: &SearchRequest,
		params: &SearchParams,
	) -> Result<CompiledQuery> {
		let filters = &request.filters;
		let skills = filters.skills.clone().unwrap_or_default();
		let summary = filters.summary.clone().unwrap_or_default();
		let description = filters.description.clone().unwrap_or_default();

		let hard_must_terms = fold_terms(&skills.must_have);
		let hard_must_not_terms = fold_terms(&skills.must_not_have);

		// Positive query text per space: must and should terms blended into
		// one embedding. Exclusion terms are embedded one by one instead,
		// since they are checked per concept at the fragment level.
		let hard_text = joined_terms(&[
			&skills.must_have,
			&skills.should_have,
			&description.must_have,
			&description.should_have,
		]);
		let hard_vector = match hard_text {
			Some(text) => Some(self.encode_long_text(SkillSpace::Hard, &text).await?),
			None => None,
		};

		let soft_text = joined_terms(&[&summary.must_have, &summary.should_have]);
		let soft_vector = match soft_text {
			Some(text) => Some(self.encode_long_text(SkillSpace::Soft, &text).await?),
			None => None,
		};

		let hard_exclusions = self.encode_terms(SkillSpace::Hard, &hard_must_not_terms).await?;
		let soft_exclusions =
			self.encode_terms(SkillSpace::Soft, &fold_terms(&summary.must_not_have)).await?;

		let hard_filter = build_hard_filter(&skills, params.exclusion_policy);
		let soft_filter = build_soft_filter(filters, &summary, &description);

		Ok(CompiledQuery {
			soft_filter,
			hard_filter,
			soft_vector,
			hard_vector,
			soft_exclusions,
			hard_exclusions,
			hard_must_terms,
			hard_must_not_terms,
		})
	}

	async fn encode_terms(
		&self,
		space: SkillSpace,
		terms: &[String],
	) -> Result<Vec<Vec<f32>>> {
		let mut vectors = Vec::with_capacity(terms.len());

		for term in terms {
			vectors.push(self.encode_long_text(space, term).await?);
		}

		Ok(vectors)
	}
}

fn build_hard_filter(skills: &TermSet, policy: ExclusionPolicy) -> Option<Filter> {
	let must: Vec<Condition> = fold_terms(&skills.must_have)
		.into_iter()
		.map(|term| text_condition(fields::SKILL_NAME_NORM, term))
		.collect();
	let should: Vec<Condition> = fold_terms(&skills.should_have)
		.into_iter()
		.map(|term| text_condition(fields::SKILL_NAME_NORM, term))
		.collect();
	// Under the default penalty policy must-not terms stay out of the store
	// filter; one logical exclusion may have no single matching field.
	let must_not: Vec<Condition> = match policy {
		ExclusionPolicy::Filter => fold_terms(&skills.must_not_have)
			.into_iter()
			.map(|term| text_condition(fields::SKILL_NAME_NORM, term))
			.collect(),
		ExclusionPolicy::Penalty => Vec::new(),
	};

	build_filter(must, should, must_not)
}

fn build_soft_filter(
	filters: &tm_domain::SearchFilters,
	summary: &TermSet,
	description: &TermSet,
) -> Option<Filter> {
	let mut must = Vec::new();
	let mut must_not = Vec::new();
	let should: Vec<Condition> = fold_terms(&summary.must_have)
		.into_iter()
		.map(|term| text_condition(fields::SUMMARY_NORM, term))
		.collect();

	for term in fold_terms(&description.must_not_have) {
		must_not.push(text_condition(fields::DESCRIPTION_NORM, term));
	}

	if let Some(demographics) = filters.demographics.as_ref() {
		if let Some(age_range) = demographics.age_range.as_ref()
			&& (age_range.from.is_some() || age_range.to.is_some())
		{
			must.push(range_condition(
				fields::AGE,
				age_range.from.map(|v| v as f64),
				age_range.to.map(|v| v as f64),
			));
		}
		if !demographics.locations.is_empty() {
			must.push(Condition::matches(fields::LOCATION, demographics.locations.clone()));
		}
	}
	if let Some(experience) = filters.experience_vacancy.as_ref() {
		if let Some(min_years) = experience.min_years {
			must.push(range_condition(
				fields::EXPERIENCE_AGE_FROM,
				Some(min_years as f64),
				None,
			));
		}
		if let Some(max_years) = experience.max_years {
			must.push(range_condition(fields::EXPERIENCE_AGE_TO, None, Some(max_years as f64)));
		}
	}
	if let Some(experience) = filters.experience_resume.as_ref()
		&& (experience.min_years.is_some() || experience.max_years.is_some())
	{
		must.push(range_condition(
			fields::EXPERIENCE_AGE,
			experience.min_years.map(|v| v as f64),
			experience.max_years.map(|v| v as f64),
		));
	}
	if let Some(salary) = filters.salary.as_ref() {
		if let Some(min_salary) = salary.min_salary {
			must.push(range_condition(fields::SALARY_FROM, Some(min_salary as f64), None));
		}
		if let Some(max_salary) = salary.max_salary {
			must.push(range_condition(fields::SALARY_TO, None, Some(max_salary as f64)));
		}
	}
	if let Some(employment) = filters.employment.as_ref()
		&& !employment.types.is_empty()
	{
		must.push(Condition::matches(
			fields::EMPLOYMENT_TYPE_NORM,
			fold_terms(&employment.types),
		));
	}

	build_filter(must, should, must_not)
}

/// An all-empty filter must be `None`; the store treats an empty filter
/// object as "match nothing" on some paths, so "no constraint" is expressed
/// by omitting it entirely.
fn build_filter(
	must: Vec<Condition>,
	should: Vec<Condition>,
	must_not: Vec<Condition>,
) -> Option<Filter> {
	if must.is_empty() && should.is_empty() && must_not.is_empty() {
		return None;
	}

	let min_should = if should.is_empty() {
		None
	} else {
		// At least one should-condition must hold.
		Some(MinShould { min_count: 1, conditions: should })
	};

	Some(Filter { must, should: Vec::new(), must_not, min_should })
}

fn text_condition(field: &str, text: String) -> Condition {
	Condition::from(FieldCondition {
		key: field.to_string(),
		r#match: Some(Match { match_value: Some(MatchValue::Text(text)) }),
		..Default::default()
	})
}

fn range_condition(field: &str, gte: Option<f64>, lte: Option<f64>) -> Condition {
	Condition::from(FieldCondition {
		key: field.to_string(),
		range: Some(Range { lt: None, gt: None, gte, lte }),
		..Default::default()
	})
}

fn fold_terms(terms: &[String]) -> Vec<String> {
	terms.iter().map(|term| normalize::fold(term)).filter(|term| !term.is_empty()).collect()
}

fn joined_terms(groups: &[&Vec<String>]) -> Option<String> {
	let folded: Vec<String> =
		groups.iter().flat_map(|group| fold_terms(group)).collect();

	if folded.is_empty() {
		return None;
	}

	Some(folded.join(", "))
}
