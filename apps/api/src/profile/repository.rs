//! Typed access to per-user profile documents.
//!
//! Every write is a read-modify-write of whole top-level fields with no
//! transaction around it: two concurrent appends to the same list can lose one
//! of the writes (last writer wins).

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, info};

use crate::profile::dedup::{job_key, school_bookmark_key};
use crate::profile::models::{
    Grade, JobBookmark, SchoolBookmark, TestResult, UserProfile, INTEREST_CATEGORIES,
};
use crate::profile::store::{DocumentStore, StoreError};

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("user record not found: {0}")]
    NotFound(String),

    #[error("invalid profile update: {0}")]
    Invalid(String),

    #[error("stored document is malformed: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for RepoError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(user_id) => RepoError::NotFound(user_id),
            other => RepoError::Store(other),
        }
    }
}

/// List-valued profile fields that support [`UserRepository::append_unique`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListField {
    SavedJobs,
    SavedSchools,
}

impl ListField {
    pub fn as_str(self) -> &'static str {
        match self {
            ListField::SavedJobs => "saved_jobs",
            ListField::SavedSchools => "saved_schools",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppendOutcome {
    Appended,
    AlreadyPresent,
}

#[derive(Clone)]
pub struct UserRepository {
    store: Arc<dyn DocumentStore>,
}

impl UserRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub fn backend(&self) -> &'static str {
        self.store.backend()
    }

    pub async fn get(&self, user_id: &str) -> Result<UserProfile, RepoError> {
        let doc = self.load(user_id).await?;
        Ok(serde_json::from_value(doc)?)
    }

    /// Creates the empty default profile if none exists. Existing documents are
    /// returned untouched.
    pub async fn upsert_default(&self, user_id: &str) -> Result<UserProfile, RepoError> {
        self.create_with(user_id, UserProfile::default()).await
    }

    /// Signup path: the default profile with the display name filled in.
    pub async fn create(&self, user_id: &str, name: &str) -> Result<UserProfile, RepoError> {
        let profile = UserProfile {
            name: name.trim().to_string(),
            ..UserProfile::default()
        };
        self.create_with(user_id, profile).await
    }

    async fn create_with(
        &self,
        user_id: &str,
        profile: UserProfile,
    ) -> Result<UserProfile, RepoError> {
        let stored = self
            .store
            .create_if_absent(user_id, serde_json::to_value(&profile)?)
            .await?;
        debug!(user_id, "profile document ensured");
        Ok(serde_json::from_value(stored)?)
    }

    /// Overwrites name, grade and interests. Interests must come from
    /// [`INTEREST_CATEGORIES`].
    pub async fn update_basic_info(
        &self,
        user_id: &str,
        name: &str,
        grade: Option<Grade>,
        interests: BTreeSet<String>,
    ) -> Result<UserProfile, RepoError> {
        if let Some(unknown) = interests
            .iter()
            .find(|i| !INTEREST_CATEGORIES.contains(&i.as_str()))
        {
            return Err(RepoError::Invalid(format!("unknown interest '{unknown}'")));
        }

        let mut fields = Map::new();
        fields.insert("name".into(), Value::String(name.trim().to_string()));
        fields.insert("grade".into(), serde_json::to_value(grade)?);
        fields.insert("interests".into(), serde_json::to_value(&interests)?);
        self.store.merge_fields(user_id, fields).await?;

        info!(user_id, "basic profile info updated");
        self.get(user_id).await
    }

    /// Appends `item` to the list at `field` unless an element with an equal
    /// key is already there. Elements that do not decode as `T` are kept as
    /// they are and never match.
    pub async fn append_unique<T, K, F>(
        &self,
        user_id: &str,
        field: ListField,
        item: T,
        key: F,
    ) -> Result<AppendOutcome, RepoError>
    where
        T: Serialize + DeserializeOwned,
        K: PartialEq,
        F: Fn(&T) -> K,
    {
        let doc = self.load(user_id).await?;
        let mut list = match doc.get(field.as_str()) {
            Some(Value::Array(items)) => items.clone(),
            _ => Vec::new(),
        };

        let wanted = key(&item);
        let present = list.iter().any(|existing| {
            serde_json::from_value::<T>(existing.clone())
                .map(|existing| key(&existing) == wanted)
                .unwrap_or(false)
        });
        if present {
            debug!(user_id, field = field.as_str(), "item already present");
            return Ok(AppendOutcome::AlreadyPresent);
        }

        list.push(serde_json::to_value(&item)?);
        let mut fields = Map::new();
        fields.insert(field.as_str().to_string(), Value::Array(list));
        self.store.merge_fields(user_id, fields).await?;

        info!(user_id, field = field.as_str(), "item appended");
        Ok(AppendOutcome::Appended)
    }

    pub async fn save_job(
        &self,
        user_id: &str,
        job: JobBookmark,
    ) -> Result<AppendOutcome, RepoError> {
        self.append_unique(user_id, ListField::SavedJobs, job, job_key)
            .await
    }

    pub async fn save_school_bookmark(
        &self,
        user_id: &str,
        bookmark: SchoolBookmark,
    ) -> Result<AppendOutcome, RepoError> {
        self.append_unique(user_id, ListField::SavedSchools, bookmark, school_bookmark_key)
            .await
    }

    /// Stores `result` under `test_results[test_id]`, replacing any earlier one.
    pub async fn set_test_result(
        &self,
        user_id: &str,
        test_id: &str,
        result: TestResult,
    ) -> Result<(), RepoError> {
        let doc = self.load(user_id).await?;
        let mut results: BTreeMap<String, Value> = match doc.get("test_results") {
            Some(Value::Object(map)) => map.clone().into_iter().collect(),
            _ => BTreeMap::new(),
        };
        results.insert(test_id.to_string(), serde_json::to_value(&result)?);

        let mut fields = Map::new();
        fields.insert("test_results".into(), serde_json::to_value(results)?);
        self.store.merge_fields(user_id, fields).await?;

        info!(user_id, test_id, "test result stored");
        Ok(())
    }

    async fn load(&self, user_id: &str) -> Result<Value, RepoError> {
        self.store
            .get(user_id)
            .await?
            .ok_or_else(|| RepoError::NotFound(user_id.to_string()))
    }
}
