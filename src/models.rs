use serde::{Deserialize, Serialize};

// Course record as stored in the dataset fixture
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CourseRecord {
    pub id: u64,
    pub title: String,
    pub description: String,
    pub category: String,
}

// Wire format sent by /api/search - fields are renamed on purpose
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SearchResultDto {
    pub id: u64,
    pub name: String,
    pub desc: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl From<&CourseRecord> for SearchResultDto {
    fn from(course: &CourseRecord) -> Self {
        Self {
            id: course.id,
            name: course.title.clone(),
            desc: course.description.clone(),
            kind: course.category.clone(),
        }
    }
}

// Query string of /api/search
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

// Body of every non-200 search response
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}
