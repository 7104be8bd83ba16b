use serde::{Deserialize, Serialize};

use super::domain::Scheme;

pub const DEFAULT_PAGE_SIZE: usize = 10;
pub const MAX_PAGE_SIZE: usize = 100;
const MIN_SEARCH_LEN: usize = 2;

/// Catalog listing filters accepted by the browse endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemeQuery {
    pub state: Option<String>,
    pub category: Option<String>,
    /// Case-insensitive match against scheme name and description.
    #[serde(rename = "q")]
    pub search: Option<String>,
    pub skip: usize,
    pub limit: Option<usize>,
}

impl SchemeQuery {
    pub fn page_size(&self) -> Result<usize, InvalidQuery> {
        match self.limit {
            None => Ok(DEFAULT_PAGE_SIZE),
            Some(limit) if (1..=MAX_PAGE_SIZE).contains(&limit) => Ok(limit),
            Some(limit) => Err(InvalidQuery::Limit(limit)),
        }
    }

    fn needle(&self) -> Result<Option<String>, InvalidQuery> {
        match self.search.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(text) if text.chars().count() < MIN_SEARCH_LEN => Err(InvalidQuery::SearchTooShort),
            Some(text) => Ok(Some(text.to_lowercase())),
        }
    }

    fn matches(&self, scheme: &Scheme, needle: Option<&str>) -> bool {
        if let Some(state) = self.state.as_deref() {
            if scheme.state.as_deref() != Some(state) {
                return false;
            }
        }

        if let Some(category) = self.category.as_deref() {
            if scheme.category.as_deref() != Some(category) {
                return false;
            }
        }

        match needle {
            Some(needle) => {
                scheme.name.to_lowercase().contains(needle)
                    || scheme
                        .description
                        .as_deref()
                        .map(|description| description.to_lowercase().contains(needle))
                        .unwrap_or(false)
            }
            None => true,
        }
    }

    /// Filter then paginate, preserving catalog order.
    pub fn apply(&self, schemes: Vec<Scheme>) -> Result<SchemePage, InvalidQuery> {
        let limit = self.page_size()?;
        let needle = self.needle()?;

        let matching: Vec<Scheme> = schemes
            .into_iter()
            .filter(|scheme| self.matches(scheme, needle.as_deref()))
            .collect();
        let total = matching.len();
        let schemes = matching.into_iter().skip(self.skip).take(limit).collect();

        Ok(SchemePage {
            total,
            skip: self.skip,
            limit,
            schemes,
        })
    }
}

/// One page of catalog schemes plus the unpaginated match count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemePage {
    pub total: usize,
    pub skip: usize,
    pub limit: usize,
    pub schemes: Vec<Scheme>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidQuery {
    #[error("limit must be between 1 and 100, got {0}")]
    Limit(usize),
    #[error("search text must contain at least 2 characters")]
    SearchTooShort,
}
