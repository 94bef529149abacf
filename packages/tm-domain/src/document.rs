use serde::{Deserialize, Serialize};

use crate::{
	normalize,
	payload::{ComplexKey, HardPayload, SoftPayload},
};

/// The indexing input for one resume or vacancy: the descriptive side plus
/// its skills. One document produces one soft fragment and one hard
/// fragment per skill.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileDocument {
	pub owner_id: i64,
	pub document_id: i64,
	pub title: String,
	pub summary: String,
	pub location: String,
	pub employment_type: String,
	pub salary_from: Option<i64>,
	pub salary_to: Option<i64>,
	pub age: Option<i64>,
	pub status: Option<String>,
	pub work_mode: Option<String>,
	pub experience_age: Option<i64>,
	pub experience_age_from: Option<i64>,
	pub experience_age_to: Option<i64>,
	pub skills: Vec<SkillInput>,
}
impl ProfileDocument {
	pub fn key(&self) -> ComplexKey {
		ComplexKey { owner_id: self.owner_id, document_id: self.document_id }
	}

	pub fn soft_payload(&self) -> SoftPayload {
		SoftPayload {
			owner_id: self.owner_id,
			document_id: self.document_id,
			title: self.title.clone(),
			summary: self.summary.clone(),
			location: self.location.clone(),
			employment_type: self.employment_type.clone(),
			salary_from: self.salary_from,
			salary_to: self.salary_to,
			age: self.age,
			status: self.status.clone(),
			work_mode: self.work_mode.clone(),
			experience_age: self.experience_age,
			experience_age_from: self.experience_age_from,
			experience_age_to: self.experience_age_to,
			summary_norm: normalize::fold(&self.summary),
			description_norm: normalize::fold(&self.summary),
			location_norm: normalize::fold(&self.location),
			employment_type_norm: normalize::fold(&self.employment_type),
		}
	}
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillInput {
	pub name: String,
	pub description: String,
	pub experience_age: Option<i64>,
}
impl SkillInput {
	pub fn is_blank(&self) -> bool {
		self.name.trim().is_empty() && self.description.trim().is_empty()
	}

	/// Text fed to the hard-space encoder for this skill.
	pub fn embedding_text(&self) -> String {
		format!("{} {}", self.name.trim(), self.description.trim()).trim().to_string()
	}

	pub fn hard_payload(&self, key: ComplexKey) -> HardPayload {
		HardPayload {
			owner_id: key.owner_id,
			document_id: key.document_id,
			skill_name: self.name.clone(),
			description: self.description.clone(),
			experience_age: self.experience_age,
			skill_name_norm: normalize::fold(&self.name),
			description_norm: normalize::fold(&self.description),
		}
	}
}
