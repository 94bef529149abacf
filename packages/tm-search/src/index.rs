use tm_domain::{ComplexKey, EntityKind, FragmentPayload, ProfileDocument, SkillSpace};
use tm_index::points;

use crate::{Error, Result, SearchService};

impl SearchService {
	/// (Re)index one profile document: encode the summary and every skill,
	/// drop the document's previous fragment set, and insert the new one.
	/// Fragments are immutable, so update is always delete plus re-insert.
	pub async fn index_document(&self, kind: EntityKind, doc: &ProfileDocument) -> Result<()> {
		if doc.summary.trim().is_empty() {
			return Err(Error::InvalidRequest {
				message: "Profile document summary must be non-empty.".to_string(),
			});
		}

		let key = doc.key();
		let soft_vector = self.encode_long_text(SkillSpace::Soft, &doc.summary).await?;
		let mut fragment_points = vec![points::fragment_point(
			&FragmentPayload::SoftSkill(doc.soft_payload()),
			soft_vector,
		)?];

		for skill in &doc.skills {
			if skill.is_blank() {
				continue;
			}

			let vector =
				self.encode_long_text(SkillSpace::Hard, &skill.embedding_text()).await?;

			fragment_points.push(points::fragment_point(
				&FragmentPayload::HardSkill(skill.hard_payload(key)),
				vector,
			)?);
		}

		self.index.delete_document(kind, key).await?;
		self.index.upsert_fragments(kind, fragment_points).await?;

		tracing::info!(
			kind = kind.as_str(),
			key = %key,
			skills = doc.skills.len(),
			"Indexed profile document."
		);

		Ok(())
	}

	/// Cascade removal of a deleted document's fragments.
	pub async fn remove_document(
		&self,
		kind: EntityKind,
		owner_id: i64,
		document_id: i64,
	) -> Result<()> {
		self.index.delete_document(kind, ComplexKey { owner_id, document_id }).await?;

		tracing::info!(
			kind = kind.as_str(),
			owner_id,
			document_id,
			"Removed profile document fragments."
		);

		Ok(())
	}
}
