mod error;

pub use error::{Error, Result};

use std::{
	collections::HashSet,
	env,
	sync::Mutex,
};

use uuid::Uuid;

pub const QDRANT_URL_ENV: &str = "TM_QDRANT_URL";

/// Qdrant URL for integration tests, or `None` when the suite should skip.
pub fn qdrant_url() -> Option<String> {
	env::var(QDRANT_URL_ENV).ok().filter(|value| !value.trim().is_empty())
}

/// Tracks uniquely named test collections and removes them afterwards, so
/// concurrent test runs never collide on a shared Qdrant instance.
pub struct TestCollections {
	url: String,
	tracked: Mutex<HashSet<String>>,
	cleaned: bool,
}
impl TestCollections {
	pub fn new(url: impl Into<String>) -> Self {
		Self { url: url.into(), tracked: Mutex::new(HashSet::new()), cleaned: false }
	}

	pub fn url(&self) -> &str {
		&self.url
	}

	pub fn collection_name(&self, prefix: &str) -> String {
		let collection = format!("{prefix}_{}", Uuid::new_v4().simple());
		let mut tracked = self.tracked.lock().unwrap_or_else(|err| err.into_inner());

		tracked.insert(collection.clone());

		collection
	}

	pub async fn cleanup(mut self) -> Result<()> {
		let collections = {
			let tracked = self.tracked.lock().unwrap_or_else(|err| err.into_inner());

			tracked.iter().cloned().collect::<Vec<_>>()
		};
		let client = qdrant_client::Qdrant::from_url(&self.url).build()?;

		for collection in collections {
			let _ = client.delete_collection(collection).await;
		}

		self.cleaned = true;

		Ok(())
	}
}
impl Drop for TestCollections {
	fn drop(&mut self) {
		if self.cleaned {
			return;
		}

		let tracked = self.tracked.lock().unwrap_or_else(|err| err.into_inner());

		if !tracked.is_empty() {
			eprintln!(
				"TestCollections dropped without cleanup; leaked collections: {:?}",
				tracked
			);
		}
	}
}
