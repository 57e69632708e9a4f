//! # Dataset
//!
//! The course catalogue the search endpoint filters. Loaded once at start,
//! either from the fixture compiled into the binary or from a file given on
//! the command line, and never mutated afterwards.
//!
//! ## Matching
//!
//! - The term is trimmed and lowercased by the caller
//! - A record matches when its title, description or category (each
//!   lowercased) contains the term anywhere
//! - Results keep dataset order, there is no ranking

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::models::CourseRecord;

pub const BUNDLED_COURSES: &str = include_str!("../data/courses.json");

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("failed to read dataset {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("malformed dataset: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("duplicate course id {0}")]
    DuplicateId(u64),
}

pub struct Dataset {
    courses: Vec<CourseRecord>,
    fingerprint: String,
}

impl Dataset {
    pub fn bundled() -> Result<Self, DatasetError> {
        Self::from_json(BUNDLED_COURSES)
    }

    pub fn from_file(path: &Path) -> Result<Self, DatasetError> {
        let raw = fs::read_to_string(path).map_err(|source| DatasetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, DatasetError> {
        let courses: Vec<CourseRecord> = serde_json::from_str(raw)?;

        let mut hasher = Sha256::new();
        hasher.update(raw.as_bytes());
        let fingerprint = format!("{:x}", hasher.finalize());

        Self::new(courses).map(|mut dataset| {
            dataset.fingerprint = fingerprint;
            dataset
        })
    }

    pub fn new(courses: Vec<CourseRecord>) -> Result<Self, DatasetError> {
        let mut seen = HashSet::with_capacity(courses.len());
        for course in &courses {
            if !seen.insert(course.id) {
                return Err(DatasetError::DuplicateId(course.id));
            }
        }

        Ok(Self {
            courses,
            fingerprint: String::new(),
        })
    }

    // term must already be trimmed + lowercased
    pub fn filter<'a>(&'a self, term: &'a str) -> impl Iterator<Item = &'a CourseRecord> + 'a {
        self.courses.iter().filter(move |course| {
            course.title.to_lowercase().contains(term)
                || course.description.to_lowercase().contains(term)
                || course.category.to_lowercase().contains(term)
        })
    }

    pub fn courses(&self) -> &[CourseRecord] {
        &self.courses
    }

    pub fn len(&self) -> usize {
        self.courses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }

    // sha256 of the source json, empty for in-memory datasets
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }
}
