use serde::{Deserialize, Serialize};

use crate::ids::WorkId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkRecord {
    pub id: WorkId,
    pub title: String,
    pub author: String,
    pub summary: String,
    pub rating: Vec<String>,
    pub fandoms: Vec<String>,
    pub url: String,
}

// Field order is the CSV column order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordRow {
    pub workid: String,
    pub title: String,
    pub author: String,
    pub summary: String,
    pub rating: String,
    pub fandoms: String,
    pub url: String,
}

const LIST_SEPARATOR: &str = "; ";

impl WorkRecord {
    pub fn to_row(&self) -> RecordRow {
        RecordRow {
            workid: self.id.to_string(),
            title: self.title.clone(),
            author: self.author.clone(),
            summary: self.summary.clone(),
            rating: self.rating.join(LIST_SEPARATOR),
            fandoms: self.fandoms.join(LIST_SEPARATOR),
            url: self.url.clone(),
        }
    }
}
