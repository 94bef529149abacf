use std::collections::HashMap;

use tm_domain::{ComplexKey, FragmentPayload, SkillSpace, similarity, text_match};

use crate::{CompiledQuery, ScoredFragment, SearchParams};

/// Fixed increment for a hard fragment whose skill name carries a must
/// keyword, and the per-match step of the keyword penalty.
const KEYWORD_STEP: f32 = 0.1;
/// Weight of the cosine overshoot above the exclusion threshold.
const VECTOR_PENALTY_WEIGHT: f32 = 0.25;
/// Exclusion signals are uncertain; the combined penalty never halves more
/// than the score.
const MAX_PENALTY: f32 = 0.5;

/// Apply keyword boosts and exclusion penalties on top of the retrieval
/// base scores. Boosts and penalties accumulate per logical key; the final
/// score is `(base + boost) * (1 - clamped_penalty)` per fragment.
pub fn score_fragments(
	fragments: &mut [ScoredFragment],
	compiled: &CompiledQuery,
	params: &SearchParams,
) {
	let mut boosts: HashMap<ComplexKey, f32> = HashMap::new();
	let mut penalties: HashMap<ComplexKey, f32> = HashMap::new();

	for fragment in fragments.iter() {
		let key = fragment.payload.key();

		if let FragmentPayload::HardSkill(hard) = &fragment.payload {
			let skill_name = hard.skill_name_norm.as_str();

			if compiled
				.hard_must_terms
				.iter()
				.any(|term| text_match::whole_word(term, skill_name))
			{
				*boosts.entry(key).or_default() += KEYWORD_STEP;
			}

			let matched = compiled
				.hard_must_not_terms
				.iter()
				.filter(|term| {
					text_match::whole_word(term, skill_name)
						|| text_match::partial_ratio(term, skill_name) > params.fuzzy_threshold
				})
				.count();

			if matched > 0 {
				*penalties.entry(key).or_default() += KEYWORD_STEP * matched as f32;
			}
		}

		let (stored, exclusions) = match fragment.payload.space() {
			SkillSpace::Soft => (&fragment.soft_vector, compiled.exclusions(SkillSpace::Soft)),
			SkillSpace::Hard => (&fragment.hard_vector, compiled.exclusions(SkillSpace::Hard)),
		};

		if let Some(stored) = stored {
			for exclusion in exclusions {
				let cosine = similarity::cosine(exclusion, stored);

				if cosine > params.similarity_threshold {
					*penalties.entry(key).or_default() +=
						(cosine - params.similarity_threshold) * VECTOR_PENALTY_WEIGHT;
				}
			}
		}
	}

	for fragment in fragments.iter_mut() {
		let key = fragment.payload.key();
		let boost = boosts.get(&key).copied().unwrap_or(0.0);
		let penalty = penalties.get(&key).copied().unwrap_or(0.0).min(MAX_PENALTY);

		fragment.score = (fragment.score + boost) * (1.0 - penalty);
	}
}
