use serde::{Deserialize, Serialize};

/// Payload field names shared by the filter compiler and the index writer.
pub mod fields {
	pub const OWNER_ID: &str = "owner_id";
	pub const DOCUMENT_ID: &str = "document_id";
	pub const AGE: &str = "age";
	pub const LOCATION: &str = "location";
	pub const SALARY_FROM: &str = "salary_from";
	pub const SALARY_TO: &str = "salary_to";
	pub const EXPERIENCE_AGE: &str = "experience_age";
	pub const EXPERIENCE_AGE_FROM: &str = "experience_age_from";
	pub const EXPERIENCE_AGE_TO: &str = "experience_age_to";
	pub const EMPLOYMENT_TYPE_NORM: &str = "employment_type_norm";
	pub const SKILL_NAME_NORM: &str = "skill_name_norm";
	pub const SUMMARY_NORM: &str = "summary_norm";
	pub const DESCRIPTION_NORM: &str = "description_norm";
}

/// Which logical entity a search targets. Selects the collection and the
/// response shape through explicit lookup, never through type inspection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntityKind {
	Candidate,
	Employer,
}
impl EntityKind {
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Candidate => "candidate",
			Self::Employer => "employer",
		}
	}
}

/// The two independent embedding spaces. The string form doubles as the
/// named-vector name inside the index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SkillSpace {
	Soft,
	Hard,
}
impl SkillSpace {
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Soft => "soft_skill",
			Self::Hard => "hard_skill",
		}
	}
}

/// The unit of aggregation: one profile document owned by one entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComplexKey {
	pub owner_id: i64,
	pub document_id: i64,
}
impl std::fmt::Display for ComplexKey {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}_{}", self.owner_id, self.document_id)
	}
}

/// What one vector point carries. A profile document stores exactly one
/// soft fragment and one hard fragment per skill.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FragmentPayload {
	SoftSkill(SoftPayload),
	HardSkill(HardPayload),
}
impl FragmentPayload {
	pub fn key(&self) -> ComplexKey {
		match self {
			Self::SoftSkill(soft) => ComplexKey {
				owner_id: soft.owner_id,
				document_id: soft.document_id,
			},
			Self::HardSkill(hard) => ComplexKey {
				owner_id: hard.owner_id,
				document_id: hard.document_id,
			},
		}
	}

	pub const fn space(&self) -> SkillSpace {
		match self {
			Self::SoftSkill(_) => SkillSpace::Soft,
			Self::HardSkill(_) => SkillSpace::Hard,
		}
	}

	pub const fn as_soft(&self) -> Option<&SoftPayload> {
		match self {
			Self::SoftSkill(soft) => Some(soft),
			Self::HardSkill(_) => None,
		}
	}

	pub const fn as_hard(&self) -> Option<&HardPayload> {
		match self {
			Self::HardSkill(hard) => Some(hard),
			Self::SoftSkill(_) => None,
		}
	}
}

/// Descriptive side of a profile document. Candidate- and employer-specific
/// attributes are optional on the shared shape; the aggregator projects the
/// relevant subset per entity kind.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SoftPayload {
	pub owner_id: i64,
	pub document_id: i64,
	#[serde(default)]
	pub title: String,
	#[serde(default)]
	pub summary: String,
	#[serde(default)]
	pub location: String,
	#[serde(default)]
	pub employment_type: String,
	#[serde(default)]
	pub salary_from: Option<i64>,
	#[serde(default)]
	pub salary_to: Option<i64>,
	#[serde(default)]
	pub age: Option<i64>,
	#[serde(default)]
	pub status: Option<String>,
	#[serde(default)]
	pub work_mode: Option<String>,
	#[serde(default)]
	pub experience_age: Option<i64>,
	#[serde(default)]
	pub experience_age_from: Option<i64>,
	#[serde(default)]
	pub experience_age_to: Option<i64>,
	#[serde(default)]
	pub summary_norm: String,
	#[serde(default)]
	pub description_norm: String,
	#[serde(default)]
	pub location_norm: String,
	#[serde(default)]
	pub employment_type_norm: String,
}

/// One skill of a profile document.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct HardPayload {
	pub owner_id: i64,
	pub document_id: i64,
	#[serde(default)]
	pub skill_name: String,
	#[serde(default)]
	pub description: String,
	#[serde(default)]
	pub experience_age: Option<i64>,
	#[serde(default)]
	pub skill_name_norm: String,
	#[serde(default)]
	pub description_norm: String,
}
