use serde::{Deserialize, Serialize};

/// One group of free-text constraints. Every list defaults to empty;
/// an absent group means no constraint of that kind.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TermSet {
	pub must_have: Vec<String>,
	pub should_have: Vec<String>,
	pub must_not_have: Vec<String>,
}
impl TermSet {
	pub fn is_empty(&self) -> bool {
		self.must_have.is_empty() && self.should_have.is_empty() && self.must_not_have.is_empty()
	}
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RangeFilter {
	pub from: Option<i64>,
	pub to: Option<i64>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DemographicFilter {
	pub age_range: Option<RangeFilter>,
	pub locations: Vec<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperienceFilter {
	pub min_years: Option<i64>,
	pub max_years: Option<i64>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SalaryFilter {
	pub min_salary: Option<i64>,
	pub max_salary: Option<i64>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EmploymentFilter {
	pub types: Vec<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchFilters {
	pub skills: Option<TermSet>,
	pub summary: Option<TermSet>,
	pub description: Option<TermSet>,
	pub demographics: Option<DemographicFilter>,
	pub experience_vacancy: Option<ExperienceFilter>,
	pub experience_resume: Option<ExperienceFilter>,
	pub salary: Option<SalaryFilter>,
	pub employment: Option<EmploymentFilter>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchRequest {
	pub filters: SearchFilters,
}
