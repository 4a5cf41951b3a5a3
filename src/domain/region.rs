//! Storyblok regions and their API endpoints

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;

/// Data-center region of a space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    #[default]
    Eu,
    Us,
    Ap,
    Ca,
}

impl Region {
    pub fn as_str(&self) -> &'static str {
        match self {
            Region::Eu => "eu",
            Region::Us => "us",
            Region::Ap => "ap",
            Region::Ca => "ca",
        }
    }

    /// Base URL of the content delivery API (`.../v2/cdn`).
    pub fn delivery_base(&self) -> String {
        format!("{}/v2/cdn", self.delivery_origin())
    }

    /// Base URL of the management API (`.../v1`).
    pub fn management_base(&self) -> String {
        match self {
            Region::Eu => "https://mapi.storyblok.com/v1".to_string(),
            other => format!("{}/v1", other.delivery_origin()),
        }
    }

    fn delivery_origin(&self) -> &'static str {
        match self {
            Region::Eu => "https://api.storyblok.com",
            Region::Us => "https://api-us.storyblok.com",
            Region::Ap => "https://api-ap.storyblok.com",
            Region::Ca => "https://api-ca.storyblok.com",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Region {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "eu" => Ok(Region::Eu),
            "us" => Ok(Region::Us),
            "ap" => Ok(Region::Ap),
            "ca" => Ok(Region::Ca),
            _ => Err(DomainError::UnknownRegion(s.to_string())),
        }
    }
}

/// Reduce a URL to `scheme://host[:port]`.
///
/// `https://api.example.com/v2/cdn?x=1` → `https://api.example.com`
pub fn url_origin(url: &str) -> Result<String, DomainError> {
    let invalid = || DomainError::InvalidBaseUrl(url.to_string());
    let (scheme, rest) = url.trim().split_once("://").ok_or_else(invalid)?;
    if scheme.is_empty() || !scheme.chars().all(|c| c.is_ascii_alphanumeric() || c == '+') {
        return Err(invalid());
    }
    let host = rest
        .split(['/', '?', '#'])
        .next()
        .filter(|h| !h.is_empty())
        .ok_or_else(invalid)?;
    Ok(format!("{}://{}", scheme.to_ascii_lowercase(), host))
}
