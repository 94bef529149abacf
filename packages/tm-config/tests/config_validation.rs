use tm_config::{Config, Error};

const SAMPLE_CONFIG_TOML: &str = r#"
[service]
log_level = "info"

[storage.qdrant]
url = "http://localhost:6334"
candidates_collection = "candidates"
vacancies_collection = "vacancies"

[providers.soft]
provider_id = "stub"
api_base = "http://localhost:8080"
api_key = "key"
path = "/v1/embeddings"
model = "soft-encoder"
dimensions = 1024
timeout_ms = 10000

[providers.hard]
provider_id = "stub"
api_base = "http://localhost:8080"
api_key = "key"
path = "/v1/embeddings"
model = "hard-encoder"
dimensions = 384
timeout_ms = 10000
"#;

fn base_config() -> Config {
	toml::from_str(SAMPLE_CONFIG_TOML).expect("Failed to parse sample config.")
}

fn expect_validation_error(cfg: &Config, needle: &str) {
	match tm_config::validate(cfg) {
		Err(Error::Validation { message }) => {
			assert!(
				message.contains(needle),
				"expected validation message containing {needle:?}, got {message:?}"
			);
		},
		other => panic!("expected validation error for {needle:?}, got {other:?}"),
	}
}

#[test]
fn sample_config_is_valid() {
	let cfg = base_config();

	tm_config::validate(&cfg).expect("Sample config must validate.");
}

#[test]
fn search_defaults_match_reference_deployment() {
	let cfg = base_config();

	assert_eq!(cfg.search.alpha, 0.8);
	assert_eq!(cfg.search.similarity_threshold, 0.8);
	assert_eq!(cfg.search.top_k, 20);
	assert_eq!(cfg.search.strategy, "per_space");
	assert_eq!(cfg.search.exclusion_policy, "penalty");
	assert_eq!(cfg.chunking.chunk_words, 512);
	assert_eq!(cfg.chunking.overlap_words, 50);
}

#[test]
fn rejects_identical_collections() {
	let mut cfg = base_config();

	cfg.storage.qdrant.vacancies_collection = cfg.storage.qdrant.candidates_collection.clone();

	expect_validation_error(&cfg, "distinct");
}

#[test]
fn rejects_zero_dimensions() {
	let mut cfg = base_config();

	cfg.providers.hard.dimensions = 0;

	expect_validation_error(&cfg, "providers.hard.dimensions");
}

#[test]
fn rejects_alpha_out_of_range() {
	let mut cfg = base_config();

	cfg.search.alpha = 1.5;

	expect_validation_error(&cfg, "search.alpha");
}

#[test]
fn rejects_overlap_not_below_chunk_size() {
	let mut cfg = base_config();

	cfg.chunking.overlap_words = cfg.chunking.chunk_words;

	expect_validation_error(&cfg, "chunking.overlap_words");
}

#[test]
fn rejects_unknown_strategy() {
	let mut cfg = base_config();

	cfg.search.strategy = "parallel".to_string();

	expect_validation_error(&cfg, "search.strategy");
}

#[test]
fn rejects_unknown_exclusion_policy() {
	let mut cfg = base_config();

	cfg.search.exclusion_policy = "veto".to_string();

	expect_validation_error(&cfg, "search.exclusion_policy");
}

#[test]
fn rejects_empty_api_key() {
	let mut cfg = base_config();

	cfg.providers.soft.api_key = "  ".to_string();

	expect_validation_error(&cfg, "providers.soft.api_key");
}
