use std::collections::HashMap;

use qdrant_client::{
	Payload,
	qdrant::{PointStruct, Value, Vector, VectorsOutput, value::Kind, vectors_output},
};
use tm_domain::{FragmentPayload, SkillSpace};

use crate::{Error, Result};

/// Build the index point for one fragment: a fresh uuid, the vector under
/// the fragment's space name, and the payload as a JSON map.
pub fn fragment_point(payload: &FragmentPayload, vector: Vec<f32>) -> Result<PointStruct> {
	let json = serde_json::to_value(payload)
		.map_err(|err| Error::InvalidPayload(err.to_string()))?;
	let serde_json::Value::Object(object) = json else {
		return Err(Error::InvalidPayload("Fragment payload must be a JSON object.".to_string()));
	};

	let mut payload_map = HashMap::new();

	for (key, value) in object {
		payload_map.insert(key, Value::from(value));
	}

	let mut vector_map = HashMap::new();

	vector_map.insert(payload.space().as_str().to_string(), Vector::from(vector));

	Ok(PointStruct::new(
		uuid::Uuid::new_v4().to_string(),
		vector_map,
		Payload::from(payload_map),
	))
}

/// Decode a stored payload back into the tagged fragment shape. Undecodable
/// payloads are dropped with a warning; a stray point never aborts a search.
pub fn decode_payload(payload: &HashMap<String, Value>) -> Option<FragmentPayload> {
	let mut object = serde_json::Map::with_capacity(payload.len());

	for (key, value) in payload {
		object.insert(key.clone(), value_to_json(value));
	}

	match serde_json::from_value(serde_json::Value::Object(object)) {
		Ok(fragment) => Some(fragment),
		Err(err) => {
			tracing::warn!(error = %err, "Skipping fragment with undecodable payload.");

			None
		},
	}
}

/// Pull one named vector out of a query or scroll response point.
pub fn named_vector(vectors: Option<&VectorsOutput>, space: SkillSpace) -> Option<Vec<f32>> {
	match vectors?.vectors_options.as_ref()? {
		vectors_output::VectorsOptions::Vector(vector) => Some(vector.data.clone()),
		vectors_output::VectorsOptions::Vectors(named) => {
			named.vectors.get(space.as_str()).map(|vector| vector.data.clone())
		},
	}
}

fn value_to_json(value: &Value) -> serde_json::Value {
	match &value.kind {
		None | Some(Kind::NullValue(_)) => serde_json::Value::Null,
		Some(Kind::BoolValue(value)) => serde_json::Value::Bool(*value),
		Some(Kind::IntegerValue(value)) => serde_json::Value::from(*value),
		Some(Kind::DoubleValue(value)) => serde_json::Value::from(*value),
		Some(Kind::StringValue(value)) => serde_json::Value::String(value.clone()),
		Some(Kind::ListValue(list)) => {
			serde_json::Value::Array(list.values.iter().map(value_to_json).collect())
		},
		Some(Kind::StructValue(object)) => serde_json::Value::Object(
			object
				.fields
				.iter()
				.map(|(key, value)| (key.clone(), value_to_json(value)))
				.collect(),
		),
	}
}

#[cfg(test)]
mod tests {
	use tm_domain::{HardPayload, SoftPayload};

	use super::*;

	#[test]
	fn payload_survives_the_wire_conversion() {
		let fragment = FragmentPayload::SoftSkill(SoftPayload {
			owner_id: 7,
			document_id: 42,
			title: "Backend Engineer".to_string(),
			location: "Moscow".to_string(),
			salary_from: Some(100_000),
			..Default::default()
		});
		let point =
			fragment_point(&fragment, vec![0.1, 0.2]).expect("Failed to build point.");
		let decoded = decode_payload(&point.payload).expect("Failed to decode payload.");
		let soft = decoded.as_soft().expect("Expected a soft fragment.");

		assert_eq!(soft.owner_id, 7);
		assert_eq!(soft.document_id, 42);
		assert_eq!(soft.location, "Moscow");
		assert_eq!(soft.salary_from, Some(100_000));
	}

	#[test]
	fn hard_fragment_points_use_the_hard_space() {
		let fragment = FragmentPayload::HardSkill(HardPayload {
			owner_id: 1,
			document_id: 2,
			skill_name: "Python".to_string(),
			skill_name_norm: "python".to_string(),
			..Default::default()
		});
		let point =
			fragment_point(&fragment, vec![1.0, 0.0]).expect("Failed to build point.");

		assert!(point.vectors.is_some());
		assert_eq!(
			decode_payload(&point.payload).expect("Failed to decode payload.").space(),
			SkillSpace::Hard
		);
	}

	#[test]
	fn undecodable_payloads_are_skipped() {
		let mut payload = HashMap::new();

		payload.insert(
			"type".to_string(),
			Value::from(serde_json::Value::String("unknown_kind".to_string())),
		);

		assert!(decode_payload(&payload).is_none());
	}
}
