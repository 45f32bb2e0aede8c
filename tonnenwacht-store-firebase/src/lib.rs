//! Rotation store backed by a Firebase Realtime Database.
//!
//! The database holds a single document at the root whose `members` key
//! is the ordered list of household members. The front member is the one
//! currently responsible for putting the bins out.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use tonnenwacht_core::{
    model::rotate_front_to_back,
    ports::{PortError, RotationPort},
};

/// Root document as stored in the database.
#[derive(Debug, Deserialize)]
struct HouseholdDoc {
    #[serde(default)]
    members: Vec<String>,
}

/// Rotation list stored in a Firebase Realtime Database.
pub struct FirebaseRotationStore {
    client: Client,
    base_url: String,
}

impl FirebaseRotationStore {
    /// Create a new store bound to the given HTTP client and database
    /// root URL (without the `.json` suffix).
    #[must_use]
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { client, base_url }
    }

    fn document_url(&self) -> String {
        format!("{}/.json", self.base_url)
    }

    fn members_url(&self) -> String {
        format!("{}/members.json", self.base_url)
    }

    async fn fetch_members(&self) -> Result<Vec<String>, PortError> {
        let doc: HouseholdDoc = self
            .client
            .get(self.document_url())
            .send()
            .await
            .map_err(PortError::from)?
            .error_for_status()
            .map_err(PortError::from)?
            .json()
            .await
            .map_err(PortError::from)?;

        if doc.members.is_empty() {
            return Err(PortError::MalformedStore(
                "Document has no members".to_owned(),
            ));
        }

        Ok(doc.members)
    }

    async fn store_members(&self, members: &[String]) -> Result<(), PortError> {
        self.client
            .put(self.members_url())
            .json(members)
            .send()
            .await
            .map_err(PortError::from)?
            .error_for_status()
            .map_err(PortError::from)?;

        Ok(())
    }
}

#[async_trait]
impl RotationPort for FirebaseRotationStore {
    async fn advance(&self) -> Result<String, PortError> {
        let mut members = self.fetch_members().await?;

        // fetch_members rejects empty lists, so the rotation always pops.
        let front = rotate_front_to_back(&mut members)
            .ok_or_else(|| PortError::MalformedStore("Document has no members".to_owned()))?;

        self.store_members(&members).await?;
        debug!(member = %front, remaining = members.len(), "Rotated member list");

        Ok(front)
    }
}
