pub const SOFT_VECTOR_NAME: &str = "soft_skill";
pub const HARD_VECTOR_NAME: &str = "hard_skill";

use qdrant_client::qdrant::{
	Condition, CreateCollectionBuilder, CreateFieldIndexCollectionBuilder, DeletePointsBuilder,
	Distance, FieldType, Filter, PointStruct, UpsertPointsBuilder, VectorParamsBuilder,
	VectorsConfigBuilder,
};
use tm_domain::{ComplexKey, EntityKind, payload::fields};

use crate::Result;

pub struct QdrantStore {
	pub client: qdrant_client::Qdrant,
	pub candidates_collection: String,
	pub vacancies_collection: String,
	pub soft_vector_dim: u32,
	pub hard_vector_dim: u32,
}
impl QdrantStore {
	pub fn new(cfg: &tm_config::Config) -> Result<Self> {
		let client = qdrant_client::Qdrant::from_url(&cfg.storage.qdrant.url).build()?;

		Ok(Self {
			client,
			candidates_collection: cfg.storage.qdrant.candidates_collection.clone(),
			vacancies_collection: cfg.storage.qdrant.vacancies_collection.clone(),
			soft_vector_dim: cfg.providers.soft.dimensions,
			hard_vector_dim: cfg.providers.hard.dimensions,
		})
	}

	pub fn collection_for(&self, kind: EntityKind) -> &str {
		match kind {
			EntityKind::Candidate => &self.candidates_collection,
			EntityKind::Employer => &self.vacancies_collection,
		}
	}

	/// Idempotent startup step: create each entity collection with the two
	/// named dense vector spaces unless it already exists.
	pub async fn ensure_collections_exist(&self) -> Result<()> {
		for collection in [&self.candidates_collection, &self.vacancies_collection] {
			if self.client.collection_exists(collection.clone()).await? {
				continue;
			}

			let mut vectors_config = VectorsConfigBuilder::default();

			vectors_config.add_named_vector_params(
				SOFT_VECTOR_NAME,
				VectorParamsBuilder::new(self.soft_vector_dim.into(), Distance::Cosine),
			);
			vectors_config.add_named_vector_params(
				HARD_VECTOR_NAME,
				VectorParamsBuilder::new(self.hard_vector_dim.into(), Distance::Cosine),
			);

			self.client
				.create_collection(
					CreateCollectionBuilder::new(collection.clone())
						.vectors_config(vectors_config),
				)
				.await?;

			// Text-match filters require a full-text index on the field.
			for field in
				[fields::SKILL_NAME_NORM, fields::SUMMARY_NORM, fields::DESCRIPTION_NORM]
			{
				self.client
					.create_field_index(CreateFieldIndexCollectionBuilder::new(
						collection.clone(),
						field,
						FieldType::Text,
					))
					.await?;
			}

			tracing::info!(collection = %collection, "Created vector collection.");
		}

		Ok(())
	}

	pub async fn upsert_fragments(
		&self,
		kind: EntityKind,
		points: Vec<PointStruct>,
	) -> Result<()> {
		if points.is_empty() {
			return Ok(());
		}

		let collection = self.collection_for(kind).to_string();
		let upsert = UpsertPointsBuilder::new(collection, points).wait(true);

		self.client.upsert_points(upsert).await?;

		Ok(())
	}

	/// Remove every fragment of one profile document. Fragments are
	/// immutable; an update deletes the document's set and re-inserts it.
	pub async fn delete_document(&self, kind: EntityKind, key: ComplexKey) -> Result<()> {
		let filter = Filter::must([
			Condition::matches(fields::OWNER_ID, key.owner_id),
			Condition::matches(fields::DOCUMENT_ID, key.document_id),
		]);
		let collection = self.collection_for(kind).to_string();
		let delete = DeletePointsBuilder::new(collection).points(filter).wait(true);

		self.client.delete_points(delete).await?;

		Ok(())
	}
}
