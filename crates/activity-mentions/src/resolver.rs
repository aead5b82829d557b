use crate::directory::UserDirectory;
use crate::error::MentionError;
use crate::extract::{Extraction, MentionExtractor};
use activity_model::UserId;
use std::fmt;
use std::sync::Arc;

/// Extracts mentions from content and resolves them to user ids
#[derive(Clone)]
pub struct MentionResolver {
    extractor: MentionExtractor,
    directory: Arc<dyn UserDirectory>,
}

impl MentionResolver {
    #[inline]
    #[must_use]
    pub fn new(directory: Arc<dyn UserDirectory>) -> Self {
        Self::with_extractor(MentionExtractor::new(), directory)
    }

    #[inline]
    #[must_use]
    pub fn with_extractor(extractor: MentionExtractor, directory: Arc<dyn UserDirectory>) -> Self {
        Self {
            extractor,
            directory,
        }
    }

    #[inline]
    #[must_use]
    pub fn extractor(&self) -> &MentionExtractor {
        &self.extractor
    }

    /// Resolve the users mentioned in `content`
    ///
    /// Returns ids in first-mention order. Unknown usernames are dropped. The
    /// directory is not consulted when the content has no mentions or trips
    /// the scan limit.
    ///
    /// # Errors
    /// Returns error if the directory lookup fails
    pub async fn resolve(&self, content: &str) -> Result<Vec<UserId>, MentionError> {
        let names = match self.extractor.extract(content) {
            Extraction::Skipped { occurrences } => {
                tracing::warn!(
                    "Skipping mention resolution: {} occurrences exceed limit of {}",
                    occurrences,
                    self.extractor.scan_limit()
                );
                return Ok(Vec::new());
            }
            Extraction::Names(names) if names.is_empty() => return Ok(Vec::new()),
            Extraction::Names(names) => names,
        };

        let resolved = self.directory.resolve(&names).await?;
        let mut ids: Vec<UserId> = Vec::with_capacity(resolved.len());
        for name in &names {
            match resolved.get(name) {
                Some(id) if !ids.contains(id) => ids.push(*id),
                Some(_) => {}
                None => tracing::debug!("Dropping unknown mention '{}'", name),
            }
        }
        Ok(ids)
    }
}

impl fmt::Debug for MentionResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MentionResolver")
            .field("extractor", &self.extractor)
            .finish_non_exhaustive()
    }
}
