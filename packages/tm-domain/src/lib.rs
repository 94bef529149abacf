pub mod document;
pub mod filters;
pub mod normalize;
pub mod payload;
pub mod similarity;
pub mod text_match;

pub use document::{ProfileDocument, SkillInput};
pub use filters::{
	DemographicFilter, EmploymentFilter, ExperienceFilter, RangeFilter, SalaryFilter,
	SearchFilters, SearchRequest, TermSet,
};
pub use payload::{ComplexKey, EntityKind, FragmentPayload, HardPayload, SkillSpace, SoftPayload};
