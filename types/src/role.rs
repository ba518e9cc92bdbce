//! Canonical role sets.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::hash::digest_hex;

/// An unordered set of opaque role identifiers.
///
/// Members are kept sorted and deduplicated so that two set-equal role sets
/// compare, hash and serialize identically regardless of the order (or
/// repetition) in which the roles were supplied.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct RoleSet(Vec<String>);

impl RoleSet {
    pub fn new<I, S>(roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut roles: Vec<String> = roles.into_iter().map(Into::into).collect();
        roles.sort();
        roles.dedup();
        Self(roles)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn contains(&self, role: &str) -> bool {
        self.0.binary_search_by(|r| r.as_str().cmp(role)).is_ok()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// The canonical (sorted, deduplicated) members.
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// JSON array of the canonical members, e.g. `["chw","district_admin"]`.
    pub fn to_json(&self) -> String {
        serde_json::to_string(&self.0).unwrap_or_else(|_| String::from("[]"))
    }

    /// Stable, order-independent hash of this role set (hex Blake2b-256 of
    /// the canonical JSON form).
    pub fn hash(&self) -> String {
        digest_hex(self.to_json().as_bytes())
    }
}

impl From<Vec<String>> for RoleSet {
    fn from(roles: Vec<String>) -> Self {
        Self::new(roles)
    }
}

impl From<RoleSet> for Vec<String> {
    fn from(roles: RoleSet) -> Self {
        roles.0
    }
}

impl<S: Into<String>> FromIterator<S> for RoleSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}

impl fmt::Display for RoleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join(","))
    }
}
