//! # Environment Classifier
//!
//! Derives the deployment tier from a cluster API endpoint. The result picks
//! an entire permission table, so the pattern set is fixed and exhaustive:
//! a hostname matching any entry of [`NON_PROD_HOST_PATTERNS`] is
//! `non-prod`, everything else (including URLs without a host) is `prod`.

use crate::types::Tier;
use regex::Regex;
use tracing::debug;
use url::Url;

/// Hostname patterns of the internal test and staging domains.
pub const NON_PROD_HOST_PATTERNS: &[&str] = &[r"[eis]dst\.[eis]baintern\.de$", r"iirzi\.de$"];

#[derive(Debug, Clone)]
pub struct TierClassifier {
    non_prod: Vec<Regex>,
}

impl Default for TierClassifier {
    fn default() -> Self {
        Self {
            non_prod: NON_PROD_HOST_PATTERNS
                .iter()
                .filter_map(|p| Regex::new(p).ok())
                .collect(),
        }
    }
}

impl TierClassifier {
    /// Classifier over a custom pattern set.
    pub fn with_patterns<I, S>(patterns: I) -> Result<Self, regex::Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>
    {
        let non_prod = patterns
            .into_iter()
            .map(|p| Regex::new(p.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { non_prod })
    }

    pub fn classify(&self, api_url: &str) -> Tier {
        let Some(host) = Url::parse(api_url)
            .ok()
            .and_then(|u| u.host_str().map(str::to_ascii_lowercase))
        else {
            debug!(url = %api_url, "No hostname in cluster URL, assuming prod");
            return Tier::Prod;
        };

        let tier = if self.non_prod.iter().any(|re| re.is_match(&host)) {
            Tier::NonProd
        } else {
            Tier::Prod
        };
        debug!(host = %host, tier = %tier, "Classified cluster endpoint");
        tier
    }
}

/// Classifies with the default pattern set.
pub fn classify(api_url: &str) -> Tier {
    TierClassifier::default().classify(api_url)
}
