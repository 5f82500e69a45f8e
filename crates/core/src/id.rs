//! Strongly-typed item identifiers.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::PlanError;

/// Identifier of a produced item (SKU / economic branch).
///
/// Ordering is plain lexical byte order of the underlying string; result
/// tables rely on it for deterministic output.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    /// Wrap an identifier as-is.
    ///
    /// Use `parse` for untrusted input; it trims and rejects empty values.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl core::fmt::Display for ItemId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ItemId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl AsRef<str> for ItemId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for ItemId {
    type Err = PlanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(PlanError::validation("item id cannot be empty"));
        }
        Ok(Self(trimmed.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_trims_whitespace() {
        let id: ItemId = "  TSHIRT_BASIC_M ".parse().unwrap();
        assert_eq!(id.as_str(), "TSHIRT_BASIC_M");
    }

    #[test]
    fn parse_rejects_blank() {
        let err = "   ".parse::<ItemId>().unwrap_err();
        assert!(matches!(err, PlanError::Validation(_)));
    }

    #[test]
    fn serializes_as_plain_string() {
        let id = ItemId::new("A");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"A\"");
    }

    #[test]
    fn ordering_is_lexical() {
        let mut ids = vec![ItemId::new("b"), ItemId::new("TOTAL"), ItemId::new("A")];
        ids.sort();
        let names: Vec<&str> = ids.iter().map(ItemId::as_str).collect();
        assert_eq!(names, vec!["A", "TOTAL", "b"]);
    }
}
