//! End-to-end suite against a real Qdrant instance. Every test is ignored
//! unless `TM_QDRANT_URL` points at a reachable server.

use std::sync::Arc;

use tm_config::{Config, EmbeddingProviderConfig};
use tm_domain::{
	DemographicFilter, EntityKind, ProfileDocument, SearchRequest, SkillInput, TermSet,
};
use tm_index::qdrant::QdrantStore;
use tm_search::{BoxFuture, EmbeddingProvider, Providers, SearchService};
use tm_testkit::TestCollections;

const CONFIG_TEMPLATE: &str = r#"
[service]
log_level = "info"

[storage.qdrant]
url = "{{url}}"
candidates_collection = "{{candidates}}"
vacancies_collection = "{{vacancies}}"

[providers.soft]
provider_id = "stub"
api_base = "http://localhost:8080"
api_key = "key"
path = "/v1/embeddings"
model = "soft-encoder"
dimensions = 3
timeout_ms = 1000

[providers.hard]
provider_id = "stub"
api_base = "http://localhost:8080"
api_key = "key"
path = "/v1/embeddings"
model = "hard-encoder"
dimensions = 3
timeout_ms = 1000
"#;

/// Deterministic 3-d embeddings: "python" and "golang" texts land close to
/// each other (cosine 0.95), "backend" prose is orthogonal to both.
struct StubEmbedding;
impl EmbeddingProvider for StubEmbedding {
	fn embed<'a>(
		&'a self,
		_cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, color_eyre::Result<Vec<Vec<f32>>>> {
		Box::pin(async move {
			Ok(texts
				.iter()
				.map(|text| {
					let text = text.to_lowercase();

					if text.contains("python") {
						vec![1.0, 0.0, 0.0]
					} else if text.contains("golang") {
						vec![0.95, 0.312_25, 0.0]
					} else if text.contains("backend") {
						vec![0.0, 1.0, 0.0]
					} else {
						vec![0.0, 0.0, 1.0]
					}
				})
				.collect())
		})
	}
}

async fn build_service(collections: &TestCollections) -> SearchService {
	let toml_payload = CONFIG_TEMPLATE
		.replace("{{url}}", collections.url())
		.replace("{{candidates}}", &collections.collection_name("tm_candidates"))
		.replace("{{vacancies}}", &collections.collection_name("tm_vacancies"));
	let cfg: Config = toml::from_str(&toml_payload).expect("Failed to parse test config.");

	tm_config::validate(&cfg).expect("Test config must validate.");

	let index = QdrantStore::new(&cfg).expect("Failed to build Qdrant store.");

	index.ensure_collections_exist().await.expect("Failed to create collections.");

	SearchService::with_providers(cfg, index, Providers::new(Arc::new(StubEmbedding)))
}

fn sample_resume() -> ProfileDocument {
	ProfileDocument {
		owner_id: 7,
		document_id: 42,
		title: "Backend Engineer".to_string(),
		summary: "Experienced backend developer".to_string(),
		location: "Moscow".to_string(),
		employment_type: "full-time".to_string(),
		salary_from: Some(100_000),
		age: Some(29),
		status: Some("active".to_string()),
		experience_age: Some(5),
		skills: vec![SkillInput {
			name: "Python".to_string(),
			description: String::new(),
			experience_age: Some(5),
		}],
		..Default::default()
	}
}

fn skills_request(must_have: &[&str], must_not_have: &[&str]) -> SearchRequest {
	let mut request = SearchRequest::default();

	request.filters.skills = Some(TermSet {
		must_have: must_have.iter().map(|term| term.to_string()).collect(),
		should_have: Vec::new(),
		must_not_have: must_not_have.iter().map(|term| term.to_string()).collect(),
	});

	request
}

#[tokio::test]
#[ignore = "Requires external Qdrant. Set TM_QDRANT_URL to run."]
async fn must_skill_and_location_return_the_matching_resume() {
	let Some(url) = tm_testkit::qdrant_url() else {
		eprintln!("Skipping; set TM_QDRANT_URL to run this test.");
		return;
	};
	let collections = TestCollections::new(url);
	let service = build_service(&collections).await;

	service
		.index_document(EntityKind::Candidate, &sample_resume())
		.await
		.expect("Failed to index resume.");

	let mut request = skills_request(&["python"], &[]);

	request.filters.demographics = Some(DemographicFilter {
		age_range: None,
		locations: vec!["Moscow".to_string()],
	});

	let matches = service.search_resumes(&request).await.expect("Search failed.");

	assert_eq!(matches.len(), 1);
	assert_eq!(matches[0].user_id, 7);
	assert_eq!(matches[0].resume_id, 42);
	assert_eq!(matches[0].location, "Moscow");
	assert_eq!(matches[0].salary_from, Some(100_000));
	assert_eq!(matches[0].skills.len(), 1);
	assert_eq!(matches[0].skills[0].skill_name, "Python");
	assert!(matches[0].score > 0.0);

	// The same search elsewhere finds nothing: scalar predicates stay hard
	// even though only the hard space carries a query vector.
	request.filters.demographics = Some(DemographicFilter {
		age_range: None,
		locations: vec!["Berlin".to_string()],
	});

	let elsewhere = service.search_resumes(&request).await.expect("Search failed.");

	assert!(elsewhere.is_empty());

	collections.cleanup().await.expect("Failed to clean up collections.");
}

#[tokio::test]
#[ignore = "Requires external Qdrant. Set TM_QDRANT_URL to run."]
async fn semantic_exclusion_penalizes_without_vetoing() {
	let Some(url) = tm_testkit::qdrant_url() else {
		eprintln!("Skipping; set TM_QDRANT_URL to run this test.");
		return;
	};
	let collections = TestCollections::new(url);
	let service = build_service(&collections).await;

	service
		.index_document(EntityKind::Candidate, &sample_resume())
		.await
		.expect("Failed to index resume.");

	let baseline = service
		.search_resumes(&skills_request(&["python"], &[]))
		.await
		.expect("Search failed.");

	assert_eq!(baseline.len(), 1);

	// The "golang" exclusion vector sits at cosine ~0.95 against the stored
	// python skill vector, above the 0.8 threshold.
	let penalized = service
		.search_resumes(&skills_request(&["python"], &["golang"]))
		.await
		.expect("Search failed.");

	assert_eq!(penalized.len(), 1);
	assert!(penalized[0].score > 0.0);
	assert!(penalized[0].score < baseline[0].score);

	collections.cleanup().await.expect("Failed to clean up collections.");
}

#[tokio::test]
#[ignore = "Requires external Qdrant. Set TM_QDRANT_URL to run."]
async fn unconstrained_browse_returns_everything_unranked() {
	let Some(url) = tm_testkit::qdrant_url() else {
		eprintln!("Skipping; set TM_QDRANT_URL to run this test.");
		return;
	};
	let collections = TestCollections::new(url);
	let service = build_service(&collections).await;

	service
		.index_document(EntityKind::Candidate, &sample_resume())
		.await
		.expect("Failed to index resume.");

	let matches = service
		.search_resumes(&SearchRequest::default())
		.await
		.expect("Search failed.");

	assert_eq!(matches.len(), 1);
	assert_eq!(matches[0].score, 0.0);
	assert_eq!(matches[0].skills.len(), 1);

	collections.cleanup().await.expect("Failed to clean up collections.");
}

#[tokio::test]
#[ignore = "Requires external Qdrant. Set TM_QDRANT_URL to run."]
async fn reindexing_replaces_the_fragment_set() {
	let Some(url) = tm_testkit::qdrant_url() else {
		eprintln!("Skipping; set TM_QDRANT_URL to run this test.");
		return;
	};
	let collections = TestCollections::new(url);
	let service = build_service(&collections).await;
	let mut resume = sample_resume();

	service
		.index_document(EntityKind::Candidate, &resume)
		.await
		.expect("Failed to index resume.");

	resume.skills = vec![SkillInput {
		name: "Golang".to_string(),
		description: String::new(),
		experience_age: Some(2),
	}];

	service
		.index_document(EntityKind::Candidate, &resume)
		.await
		.expect("Failed to re-index resume.");

	let matches = service
		.search_resumes(&SearchRequest::default())
		.await
		.expect("Search failed.");

	assert_eq!(matches.len(), 1);
	assert_eq!(matches[0].skills.len(), 1);
	assert_eq!(matches[0].skills[0].skill_name, "Golang");

	service
		.remove_document(EntityKind::Candidate, resume.owner_id, resume.document_id)
		.await
		.expect("Failed to remove resume.");

	let gone = service
		.search_resumes(&SearchRequest::default())
		.await
		.expect("Search failed.");

	assert!(gone.is_empty());

	collections.cleanup().await.expect("Failed to clean up collections.");
}

#[tokio::test]
#[ignore = "Requires external Qdrant. Set TM_QDRANT_URL to run."]
async fn employer_search_uses_the_vacancy_shape() {
	let Some(url) = tm_testkit::qdrant_url() else {
		eprintln!("Skipping; set TM_QDRANT_URL to run this test.");
		return;
	};
	let collections = TestCollections::new(url);
	let service = build_service(&collections).await;
	let vacancy = ProfileDocument {
		owner_id: 3,
		document_id: 11,
		title: "Senior Backend Engineer".to_string(),
		summary: "Backend team building billing services".to_string(),
		location: "Moscow".to_string(),
		employment_type: "full-time".to_string(),
		salary_from: Some(250_000),
		salary_to: Some(350_000),
		work_mode: Some("remote".to_string()),
		experience_age_from: Some(3),
		experience_age_to: Some(8),
		skills: vec![SkillInput {
			name: "Python".to_string(),
			description: "Django, asyncio".to_string(),
			experience_age: Some(3),
		}],
		..Default::default()
	};

	service
		.index_document(EntityKind::Employer, &vacancy)
		.await
		.expect("Failed to index vacancy.");

	let matches = service
		.search_vacancies(&skills_request(&["python"], &[]))
		.await
		.expect("Search failed.");

	assert_eq!(matches.len(), 1);
	assert_eq!(matches[0].employer_id, 3);
	assert_eq!(matches[0].vacancy_id, 11);
	assert_eq!(matches[0].work_mode.as_deref(), Some("remote"));
	assert_eq!(matches[0].experience_age_from, Some(3));
	assert!(matches[0].score > 0.0);

	collections.cleanup().await.expect("Failed to clean up collections.");
}

#[tokio::test]
#[ignore = "Requires external Qdrant. Set TM_QDRANT_URL to run."]
async fn fused_strategy_matches_the_per_space_results() {
	let Some(url) = tm_testkit::qdrant_url() else {
		eprintln!("Skipping; set TM_QDRANT_URL to run this test.");
		return;
	};
	let collections = TestCollections::new(url);
	let mut service = build_service(&collections).await;

	service
		.index_document(EntityKind::Candidate, &sample_resume())
		.await
		.expect("Failed to index resume.");

	service.cfg.search.strategy = "fused".to_string();

	let matches = service
		.search_resumes(&skills_request(&["python"], &[]))
		.await
		.expect("Search failed.");

	assert_eq!(matches.len(), 1);
	assert_eq!(matches[0].resume_id, 42);
	assert!(matches[0].score > 0.0);

	collections.cleanup().await.expect("Failed to clean up collections.");
}
