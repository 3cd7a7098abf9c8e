//! Update records and the ordered collections the pipeline builds from them

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identifier the update service assigns to an update
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UpdateId(String);

impl UpdateId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UpdateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UpdateId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// How installing an update behaves on the host
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallationBehavior {
    /// Installation may stop and wait for someone at the console
    pub can_request_user_input: bool,
}

/// An update as reported by the update service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Update {
    pub id: UpdateId,
    pub title: String,
    #[serde(default)]
    pub kb_article_ids: Vec<String>,
    #[serde(default)]
    pub categories: Vec<String>,
    pub last_deployment_change_time: DateTime<Utc>,
    /// Size in bytes
    pub max_download_size: u64,
    #[serde(default)]
    pub installation_behavior: InstallationBehavior,
    #[serde(default)]
    pub is_mandatory: bool,
    /// Set by the update service once the payload is on disk
    #[serde(default)]
    pub is_downloaded: bool,
}

impl Update {
    /// Create an update with the given identity and title; everything else defaulted
    pub fn new(id: impl Into<UpdateId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            kb_article_ids: Vec::new(),
            categories: Vec::new(),
            last_deployment_change_time: DateTime::<Utc>::UNIX_EPOCH,
            max_download_size: 0,
            installation_behavior: InstallationBehavior::default(),
            is_mandatory: false,
            is_downloaded: false,
        }
    }

    #[must_use]
    pub fn summary(&self) -> UpdateSummary {
        UpdateSummary {
            id: self.id.clone(),
            title: self.title.clone(),
            last_deployment_change_time: self.last_deployment_change_time,
            max_download_size: self.max_download_size,
        }
    }
}

impl From<String> for UpdateId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// The fields of an update that status lines and reports show
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateSummary {
    pub id: UpdateId,
    pub title: String,
    pub last_deployment_change_time: DateTime<Utc>,
    pub max_download_size: u64,
}

impl fmt::Display for UpdateSummary {
    /// `(2024-05-14; 12 MB): <title>`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}; {} MB): {}",
            self.last_deployment_change_time.format("%Y-%m-%d"),
            self.max_download_size.div_ceil(1024 * 1024),
            self.title
        )
    }
}

/// Ordered, append-only sequence of updates
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UpdateCollection {
    updates: Vec<Update>,
}

impl UpdateCollection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, update: Update) {
        self.updates.push(update);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.updates.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.updates.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Update> {
        self.updates.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Update> {
        self.updates.iter_mut()
    }

    /// Look up an update by id
    #[must_use]
    pub fn get(&self, id: &UpdateId) -> Option<&Update> {
        self.updates.iter().find(|u| &u.id == id)
    }

    /// Sum of `max_download_size` over the collection
    #[must_use]
    pub fn total_download_size(&self) -> u64 {
        self.updates
            .iter()
            .map(|u| u.max_download_size)
            .fold(0, u64::saturating_add)
    }

    #[must_use]
    pub fn titles(&self) -> Vec<String> {
        self.updates.iter().map(|u| u.title.clone()).collect()
    }
}

impl FromIterator<Update> for UpdateCollection {
    fn from_iter<T: IntoIterator<Item = Update>>(iter: T) -> Self {
        Self {
            updates: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for UpdateCollection {
    type Item = Update;
    type IntoIter = std::vec::IntoIter<Update>;

    fn into_iter(self) -> Self::IntoIter {
        self.updates.into_iter()
    }
}

impl<'a> IntoIterator for &'a UpdateCollection {
    type Item = &'a Update;
    type IntoIter = std::slice::Iter<'a, Update>;

    fn into_iter(self) -> Self::IntoIter {
        self.updates.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn summary_display_rounds_size_up_to_megabytes() {
        let mut update = Update::new("a", "Security Update for Windows (KB5036893)");
        update.last_deployment_change_time = Utc.with_ymd_and_hms(2024, 5, 14, 0, 0, 0).unwrap();
        update.max_download_size = 12 * 1024 * 1024 + 1;

        assert_eq!(
            update.summary().to_string(),
            "(2024-05-14; 13 MB): Security Update for Windows (KB5036893)"
        );
    }

    #[test]
    fn collection_keeps_insertion_order_and_sums_sizes() {
        let mut collection = UpdateCollection::new();
        for (id, size) in [("b", 10), ("a", 5), ("c", u64::MAX)] {
            let mut update = Update::new(id, id.to_uppercase());
            update.max_download_size = size;
            collection.push(update);
        }

        assert_eq!(collection.len(), 3);
        assert_eq!(collection.titles(), vec!["B", "A", "C"]);
        assert_eq!(collection.total_download_size(), u64::MAX);
        assert!(collection.get(&UpdateId::new("a")).is_some());
        assert!(collection.get(&UpdateId::new("z")).is_none());
    }
}
