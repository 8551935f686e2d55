//! Community resource library.
//!
//! Teachers browse and share classroom resources. The library lives in
//! memory only; nothing is persisted between runs.

use serde::{Deserialize, Serialize};

/// A resource shared by a teacher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SharedResource {
    pub id: u32,
    pub title: String,
    pub subject: String,
    pub grade: String,
    pub language: String,
    pub author: String,
    /// Average rating out of 5.
    pub rating: f32,
    pub downloads: u32,
}

/// A resource about to be shared; the library assigns the id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewResource {
    pub title: String,
    pub subject: String,
    pub grade: String,
    pub language: String,
    pub author: String,
}

/// Browse filter. `None` matches everything ("all subjects", ...).
#[derive(Debug, Clone, Default)]
pub struct ResourceFilter {
    pub subject: Option<String>,
    pub language: Option<String>,
    pub grade: Option<String>,
}

impl ResourceFilter {
    pub fn matches(&self, resource: &SharedResource) -> bool {
        field_matches(&self.subject, &resource.subject)
            && field_matches(&self.language, &resource.language)
            && field_matches(&self.grade, &resource.grade)
    }
}

fn field_matches(wanted: &Option<String>, actual: &str) -> bool {
    wanted
        .as_deref()
        .map_or(true, |w| w.trim().to_lowercase() == actual.trim().to_lowercase())
}

/// In-memory collection of shared resources.
#[derive(Debug, Clone, Default)]
pub struct ResourceLibrary {
    resources: Vec<SharedResource>,
    next_id: u32,
}

impl ResourceLibrary {
    pub fn new() -> Self {
        Self {
            resources: Vec::new(),
            next_id: 1,
        }
    }

    /// A library seeded with sample resources.
    pub fn with_samples() -> Self {
        let mut library = Self::new();
        library.insert(
            NewResource {
                title: "Water Cycle Worksheet".into(),
                subject: "Science".into(),
                grade: "Grade 4".into(),
                language: "English".into(),
                author: "Teacher Priya".into(),
            },
            4.5,
            234,
        );
        library.insert(
            NewResource {
                title: "गणित के खेल".into(),
                subject: "Mathematics".into(),
                grade: "Grade 2".into(),
                language: "Hindi".into(),
                author: "Teacher Raj".into(),
            },
            4.8,
            156,
        );
        library
    }

    pub fn all(&self) -> &[SharedResource] {
        &self.resources
    }

    pub fn get(&self, id: u32) -> Option<&SharedResource> {
        self.resources.iter().find(|r| r.id == id)
    }

    pub fn filter(&self, filter: &ResourceFilter) -> Vec<&SharedResource> {
        self.resources.iter().filter(|r| filter.matches(r)).collect()
    }

    /// Share a new resource and return its id.
    pub fn share(&mut self, resource: NewResource) -> u32 {
        self.insert(resource, 0.0, 0)
    }

    /// Count a download. Returns the new total, or `None` for unknown ids.
    pub fn record_download(&mut self, id: u32) -> Option<u32> {
        let resource = self.resources.iter_mut().find(|r| r.id == id)?;
        resource.downloads += 1;
        Some(resource.downloads)
    }

    fn insert(&mut self, resource: NewResource, rating: f32, downloads: u32) -> u32 {
        let id = self.next_id.max(1);
        self.next_id = id + 1;
        self.resources.push(SharedResource {
            id,
            title: resource.title,
            subject: resource.subject,
            grade: resource.grade,
            language: resource.language,
            author: resource.author,
            rating,
            downloads,
        });
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn samples_are_seeded() {
        let library = ResourceLibrary::with_samples();
        assert_eq!(library.all().len(), 2);
        assert_eq!(library.get(1).unwrap().title, "Water Cycle Worksheet");
        assert_eq!(library.get(2).unwrap().downloads, 156);
    }

    #[test]
    fn empty_filter_matches_everything() {
        let library = ResourceLibrary::with_samples();
        assert_eq!(library.filter(&ResourceFilter::default()).len(), 2);
    }

    #[test]
    fn filters_combine() {
        let library = ResourceLibrary::with_samples();
        let filter = ResourceFilter {
            subject: Some("mathematics".into()),
            language: Some("Hindi".into()),
            grade: None,
        };
        let found = library.filter(&filter);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].author, "Teacher Raj");

        let filter = ResourceFilter {
            grade: Some("Grade 4".into()),
            language: Some("Hindi".into()),
            ..Default::default()
        };
        assert!(library.filter(&filter).is_empty());
    }

    #[test]
    fn shared_resources_get_fresh_ids() {
        let mut library = ResourceLibrary::with_samples();
        let id = library.share(NewResource {
            title: "Phonics Flashcards".into(),
            subject: "English".into(),
            grade: "Grade 1".into(),
            language: "English".into(),
            author: "Teacher Anu".into(),
        });
        assert_eq!(id, 3);
        assert_eq!(library.get(id).unwrap().downloads, 0);
    }

    #[test]
    fn filter_folds_case_beyond_ascii() {
        let mut library = ResourceLibrary::new();
        let id = library.share(NewResource {
            title: "Économie du village".into(),
            subject: "Économie".into(),
            grade: "Grade 6".into(),
            language: "Français".into(),
            author: "Teacher Anu".into(),
        });

        let filter = ResourceFilter {
            subject: Some("économie".into()),
            language: Some("FRANÇAIS".into()),
            ..Default::default()
        };
        let found = library.filter(&filter);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, id);
    }

    #[test]
    fn downloads_are_counted() {
        let mut library = ResourceLibrary::with_samples();
        assert_eq!(library.record_download(1), Some(235));
        assert_eq!(library.record_download(99), None);
    }

    #[test]
    fn default_library_starts_at_id_one() {
        let mut library = ResourceLibrary::default();
        let id = library.share(NewResource {
            title: "t".into(),
            subject: "s".into(),
            grade: "g".into(),
            language: "l".into(),
            author: "a".into(),
        });
        assert_eq!(id, 1);
    }
}
