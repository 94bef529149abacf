use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tm_domain::{ComplexKey, FragmentPayload, SoftPayload};

use crate::ScoredFragment;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SkillMatch {
	pub skill_name: String,
	pub description: String,
	pub experience_age: Option<i64>,
}

/// Candidate-side search result: one resume with its skill list.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ResumeMatch {
	pub user_id: i64,
	pub resume_id: i64,
	pub title: String,
	pub summary: String,
	pub age: Option<i64>,
	pub location: String,
	pub salary_from: Option<i64>,
	pub salary_to: Option<i64>,
	pub employment_type: String,
	pub experience_age: Option<i64>,
	pub status: Option<String>,
	pub skills: Vec<SkillMatch>,
	pub score: f32,
}

/// Employer-side search result: one vacancy with its skill list.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VacancyMatch {
	pub employer_id: i64,
	pub vacancy_id: i64,
	pub title: String,
	pub summary: String,
	pub experience_age_from: Option<i64>,
	pub experience_age_to: Option<i64>,
	pub location: String,
	pub salary_from: Option<i64>,
	pub salary_to: Option<i64>,
	pub employment_type: String,
	pub work_mode: Option<String>,
	pub skills: Vec<SkillMatch>,
	pub score: f32,
}

/// One aggregated logical entity, before projection into the kind-specific
/// response shape.
#[derive(Clone, Debug)]
pub struct AggregatedEntity {
	pub key: ComplexKey,
	pub soft: SoftPayload,
	pub skills: Vec<SkillMatch>,
	pub score: f32,
}

struct KeyGroup {
	soft: Option<(SoftPayload, f32)>,
	hards: Vec<(tm_domain::HardPayload, f32)>,
}

/// Fold scored fragments back into one record per logical key. A key
/// without its soft fragment is incomplete and dropped. The soft score
/// carries the result unless a sibling hard fragment scored strictly
/// higher; a standout skill match is not diluted by an unrelated base.
pub fn aggregate(fragments: Vec<ScoredFragment>) -> Vec<AggregatedEntity> {
	let mut groups: HashMap<ComplexKey, KeyGroup> = HashMap::new();

	for fragment in fragments {
		let key = fragment.payload.key();
		let group =
			groups.entry(key).or_insert_with(|| KeyGroup { soft: None, hards: Vec::new() });

		match fragment.payload {
			FragmentPayload::SoftSkill(soft) => {
				if group.soft.is_some() {
					tracing::warn!(key = %key, "Duplicate soft fragment; keeping the first.");

					continue;
				}

				group.soft = Some((soft, fragment.score));
			},
			FragmentPayload::HardSkill(hard) => {
				group.hards.push((hard, fragment.score));
			},
		}
	}

	let mut entities = Vec::with_capacity(groups.len());

	for (key, group) in groups {
		let Some((soft, soft_score)) = group.soft else {
			tracing::debug!(key = %key, "Skipping key without a soft fragment.");

			continue;
		};
		let mut score = soft_score;
		let mut skills = Vec::new();
		let mut seen_names = std::collections::HashSet::new();

		for (hard, hard_score) in group.hards {
			if hard_score > score {
				score = hard_score;
			}
			if hard.skill_name.trim().is_empty() {
				continue;
			}
			if !seen_names.insert(hard.skill_name_norm.clone()) {
				continue;
			}

			skills.push(SkillMatch {
				skill_name: hard.skill_name,
				description: hard.description,
				experience_age: hard.experience_age,
			});
		}

		entities.push(AggregatedEntity { key, soft, skills, score });
	}

	entities.sort_by(|a, b| {
		b.score
			.partial_cmp(&a.score)
			.unwrap_or(std::cmp::Ordering::Equal)
			.then_with(|| a.key.cmp(&b.key))
	});

	entities
}

pub(crate) fn into_resume(entity: AggregatedEntity) -> ResumeMatch {
	let soft = entity.soft;

	ResumeMatch {
		user_id: soft.owner_id,
		resume_id: soft.document_id,
		title: soft.title,
		summary: soft.summary,
		age: soft.age,
		location: soft.location,
		salary_from: soft.salary_from,
		salary_to: soft.salary_to,
		employment_type: soft.employment_type,
		experience_age: soft.experience_age,
		status: soft.status,
		skills: entity.skills,
		score: entity.score,
	}
}

pub(crate) fn into_vacancy(entity: AggregatedEntity) -> VacancyMatch {
	let soft = entity.soft;

	VacancyMatch {
		employer_id: soft.owner_id,
		vacancy_id: soft.document_id,
		title: soft.title,
		summary: soft.summary,
		experience_age_from: soft.experience_age_from,
		experience_age_to: soft.experience_age_to,
		location: soft.location,
		salary_from: soft.salary_from,
		salary_to: soft.salary_to,
		employment_type: soft.employment_type,
		work_mode: soft.work_mode,
		skills: entity.skills,
		score: entity.score,
	}
}
