//! Allowlist entries: one crisis resource each.

use crate::error::{AllowlistError, AllowlistResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The kind of crisis a resource serves.
///
/// The set is closed for matching purposes but open on the wire: categories
/// this build does not know about deserialize into [`CrisisCategory::Other`]
/// so a newer server allowlist never fails to parse.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CrisisCategory {
    Suicide,
    Abuse,
    DomesticViolence,
    ChildAbuse,
    Lgbtq,
    Crisis,
    EatingDisorder,
    SubstanceAbuse,
    MentalHealth,
    SexualAssault,
    Runaway,
    Other(String),
}

impl CrisisCategory {
    /// Returns the wire name of the category.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Suicide => "suicide",
            Self::Abuse => "abuse",
            Self::DomesticViolence => "domestic-violence",
            Self::ChildAbuse => "child-abuse",
            Self::Lgbtq => "lgbtq",
            Self::Crisis => "crisis",
            Self::EatingDisorder => "eating-disorder",
            Self::SubstanceAbuse => "substance-abuse",
            Self::MentalHealth => "mental-health",
            Self::SexualAssault => "sexual-assault",
            Self::Runaway => "runaway",
            Self::Other(name) => name,
        }
    }
}

impl From<String> for CrisisCategory {
    fn from(value: String) -> Self {
        match value.as_str() {
            "suicide" => Self::Suicide,
            "abuse" => Self::Abuse,
            "domestic-violence" => Self::DomesticViolence,
            "child-abuse" => Self::ChildAbuse,
            "lgbtq" => Self::Lgbtq,
            "crisis" => Self::Crisis,
            "eating-disorder" => Self::EatingDisorder,
            "substance-abuse" => Self::SubstanceAbuse,
            "mental-health" => Self::MentalHealth,
            "sexual-assault" => Self::SexualAssault,
            "runaway" => Self::Runaway,
            _ => Self::Other(value),
        }
    }
}

impl From<CrisisCategory> for String {
    fn from(value: CrisisCategory) -> Self {
        match value {
            CrisisCategory::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for CrisisCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a crisis resource can be reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactMethod {
    Phone,
    Text,
    Chat,
    Email,
    Web,
}

/// A single crisis resource in the allowlist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllowlistEntry {
    /// Stable unique identifier.
    pub id: String,
    /// Canonical domain: lower-case, no scheme, no `www.`.
    pub domain: String,
    pub category: CrisisCategory,
    /// Coverage scope, a country code or `global`.
    pub region: String,
    pub name: String,
    pub description: String,
    /// Alternate domains matched with the same priority as `domain`.
    #[serde(default)]
    pub aliases: Vec<String>,
    /// Subdomain patterns of the form `*.example.org`, matched by literal suffix.
    #[serde(default)]
    pub wildcard_patterns: Vec<String>,
    pub contact_methods: Vec<ContactMethod>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_number: Option<String>,
}

impl AllowlistEntry {
    /// Checks the entry invariants.
    ///
    /// Every entry needs a non-empty id, domain, category, region, name and
    /// description, at least one contact method, and domains/aliases that are
    /// already in normalized host form.
    pub fn validate(&self) -> AllowlistResult<()> {
        let id = self.id.as_str();
        if id.trim().is_empty() {
            return Err(AllowlistError::invalid_entry(id, "id is empty"));
        }
        if !is_normalized_domain(&self.domain) {
            return Err(AllowlistError::invalid_entry(
                id,
                format!("domain {:?} is not a normalized host", self.domain),
            ));
        }
        if self.category.as_str().trim().is_empty() {
            return Err(AllowlistError::invalid_entry(id, "category is empty"));
        }
        for (field, value) in [
            ("region", &self.region),
            ("name", &self.name),
            ("description", &self.description),
        ] {
            if value.trim().is_empty() {
                return Err(AllowlistError::invalid_entry(id, format!("{field} is empty")));
            }
        }
        if self.contact_methods.is_empty() {
            return Err(AllowlistError::invalid_entry(id, "no contact methods"));
        }
        if let Some(alias) = self.aliases.iter().find(|a| !is_normalized_domain(a)) {
            return Err(AllowlistError::invalid_entry(
                id,
                format!("alias {alias:?} is not a normalized host"),
            ));
        }
        if let Some(pattern) = self
            .wildcard_patterns
            .iter()
            .find(|p| wildcard_suffix(p).is_none())
        {
            return Err(AllowlistError::invalid_entry(
                id,
                format!("wildcard pattern {pattern:?} must look like *.example.org"),
            ));
        }
        Ok(())
    }

    /// Returns the canonical domain followed by every alias.
    pub fn hosts(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.domain.as_str()).chain(self.aliases.iter().map(String::as_str))
    }

    /// Returns the literal suffixes (including the leading dot) of the entry's
    /// wildcard patterns.
    pub fn wildcard_suffixes(&self) -> impl Iterator<Item = &str> {
        self.wildcard_patterns
            .iter()
            .filter_map(|p| wildcard_suffix(p))
    }

    /// Returns true if the resource can be reached by the given method.
    #[must_use]
    pub fn supports(&self, method: ContactMethod) -> bool {
        self.contact_methods.contains(&method)
    }
}

/// Extracts `.example.org` from `*.example.org`.
///
/// Patterns must have at least two labels after the wildcard so that a
/// pattern like `*.org` can never be published.
fn wildcard_suffix(pattern: &str) -> Option<&str> {
    let suffix = pattern.strip_prefix('*')?;
    let rest = suffix.strip_prefix('.')?;
    if rest.contains('.') && is_normalized_domain(rest) {
        Some(suffix)
    } else {
        None
    }
}

fn is_normalized_domain(domain: &str) -> bool {
    !domain.is_empty()
        && !domain.starts_with("www.")
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && domain
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '.')
}
