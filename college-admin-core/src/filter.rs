//! Search and district filtering over the cached college list

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::model::College;

/// Current search box text and district selection
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterQuery {
    pub search: String,
    /// `None` means "all districts"
    pub district: Option<String>,
}

impl FilterQuery {
    pub fn new(search: impl Into<String>, district: Option<String>) -> Self {
        Self {
            search: search.into(),
            district: district.filter(|d| !d.is_empty()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.search.is_empty() && self.district.is_none()
    }

    /// Whether a single college passes this query
    pub fn matches(&self, college: &College) -> bool {
        self.matches_search(college) && self.matches_district(college)
    }

    fn matches_search(&self, college: &College) -> bool {
        if self.search.is_empty() {
            return true;
        }
        let needle = self.search.to_lowercase();
        college.name.to_lowercase().contains(&needle)
            || college.address.to_lowercase().contains(&needle)
            || college
                .programs
                .iter()
                .any(|p| p.name.to_lowercase().contains(&needle))
    }

    fn matches_district(&self, college: &College) -> bool {
        match &self.district {
            Some(district) => &college.district == district,
            None => true,
        }
    }
}

/// The subset of `colleges` matching `query`, in cache order
pub fn filter_colleges<'a>(colleges: &'a [College], query: &FilterQuery) -> Vec<&'a College> {
    colleges.iter().filter(|c| query.matches(c)).collect()
}

/// Distinct districts present in `colleges`, sorted
pub fn districts(colleges: &[College]) -> Vec<String> {
    colleges
        .iter()
        .map(|c| c.district.clone())
        .filter(|d| !d.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
