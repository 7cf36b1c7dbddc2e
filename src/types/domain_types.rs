use super::{PageId, ValidationError};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

/// Session token (`token_v2` cookie) for reading non-public workspaces.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken(String);

impl AuthToken {
    /// Create a new auth token with validation
    pub fn new(token: impl Into<String>) -> Result<Self, ValidationError> {
        let token = token.into();
        let token = token.trim();

        if token.is_empty() {
            return Err(ValidationError::InvalidAuthToken {
                reason: "token cannot be empty".to_string(),
            });
        }

        if token.chars().any(|c| c.is_whitespace() || c == ';') {
            return Err(ValidationError::InvalidAuthToken {
                reason: "token must not contain whitespace or ';'".to_string(),
            });
        }

        Ok(Self(token.to_string()))
    }

    /// Get the token as a string reference
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Redact token in display
        let visible: String = self.0.chars().take(6).collect();
        write!(f, "{}...", visible)
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AuthToken({})", self)
    }
}

/// Host name the site is published under, e.g. `example.com`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteDomain(String);

impl SiteDomain {
    /// Accepts a bare host or a full `http(s)` URL and keeps only the host.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyField("domain"));
        }

        let candidate = if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            trimmed.to_string()
        } else {
            format!("https://{}", trimmed)
        };

        let parsed = Url::parse(&candidate).map_err(|e| ValidationError::InvalidUrl {
            url: input.to_string(),
            reason: e.to_string(),
        })?;

        if parsed.path() != "/" && !parsed.path().is_empty() {
            return Err(ValidationError::InvalidUrl {
                url: input.to_string(),
                reason: "domain must not include a path".to_string(),
            });
        }

        match parsed.host_str() {
            Some(host) => Ok(Self(host.to_string())),
            None => Err(ValidationError::InvalidUrl {
                url: input.to_string(),
                reason: "missing host".to_string(),
            }),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The site root, `https://{domain}/`.
    pub fn root_url(&self) -> Result<Url, ValidationError> {
        let root = format!("https://{}/", self.0);
        Url::parse(&root).map_err(|e| ValidationError::InvalidUrl {
            url: root.clone(),
            reason: e.to_string(),
        })
    }
}

impl fmt::Display for SiteDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for SiteDomain {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for SiteDomain {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        SiteDomain::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// Hand-picked slugs for specific pages: `slug -> page`.
///
/// Overrides take precedence over every derived slug.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageUrlOverrides(IndexMap<String, PageId>);

impl PageUrlOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses `slug=page` pairs as given on the command line.
    pub fn parse_pairs<I, S>(pairs: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut overrides = Self::new();
        for pair in pairs {
            let pair = pair.as_ref();
            let (slug, page) = pair.split_once('=').ok_or_else(|| {
                ValidationError::InvalidOverride {
                    input: pair.to_string(),
                    reason: "expected slug=page".to_string(),
                }
            })?;
            let slug = slug.trim().trim_matches('/');
            if slug.is_empty() {
                return Err(ValidationError::InvalidOverride {
                    input: pair.to_string(),
                    reason: "slug cannot be empty".to_string(),
                });
            }
            let page = PageId::parse(page)?;
            overrides = overrides.with_override(slug, page);
        }
        Ok(overrides)
    }

    pub fn with_override(mut self, slug: impl Into<String>, page: PageId) -> Self {
        self.0.insert(slug.into(), page);
        self
    }

    /// The override slug for a page, if one was configured.
    pub fn slug_for(&self, page: &PageId) -> Option<&str> {
        self.0
            .iter()
            .find(|(_, target)| target.same_as(page))
            .map(|(slug, _)| slug.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
