use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Backend record identifier.
///
/// The backend hands out numeric ids, but some records carry string ids.
/// Two ids refer to the same record when their textual forms match.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Number(u64),
    Text(String),
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl PartialEq for RecordId {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Number(a), Self::Number(b)) => a == b,
            (Self::Text(a), Self::Text(b)) => a == b,
            _ => self.to_string() == other.to_string(),
        }
    }
}

impl Eq for RecordId {}

impl FromStr for RecordId {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(AppError::parse("record id cannot be empty"));
        }
        Ok(s.parse::<u64>()
            .map_or_else(|_| Self::Text(s.to_owned()), Self::Number))
    }
}

/// Coarse price/performance tier of a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Segment {
    Budget,
    Midrange,
    Flagship,
}

impl Segment {
    pub const ALL: [Segment; 3] = [Segment::Budget, Segment::Midrange, Segment::Flagship];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Budget => "budget",
            Self::Midrange => "midrange",
            Self::Flagship => "flagship",
        }
    }

    /// Human-readable tier name.
    pub fn label(self) -> &'static str {
        match self {
            Self::Budget => "Budget",
            Self::Midrange => "Mid-range",
            Self::Flagship => "Flagship",
        }
    }

    /// Position from cheapest to most premium.
    pub fn rank(self) -> u8 {
        match self {
            Self::Budget => 0,
            Self::Midrange => 1,
            Self::Flagship => 2,
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Segment {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "budget" => Ok(Self::Budget),
            "midrange" | "mid-range" => Ok(Self::Midrange),
            "flagship" => Ok(Self::Flagship),
            other => Err(AppError::parse(format!(
                "unknown segment '{other}' (expected budget, midrange or flagship)"
            ))),
        }
    }
}

/// Which part of the catalog a listing covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "scope", content = "segment")]
pub enum SegmentScope {
    #[default]
    All,
    Only(Segment),
}

impl SegmentScope {
    pub fn segment(self) -> Option<Segment> {
        match self {
            Self::All => None,
            Self::Only(segment) => Some(segment),
        }
    }
}

impl fmt::Display for SegmentScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Only(segment) => segment.fmt(f),
        }
    }
}

impl FromStr for SegmentScope {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            Ok(Self::All)
        } else {
            s.parse().map(Self::Only)
        }
    }
}

/// Spec values keyed by spec-field key.
///
/// A missing key means "unknown". JSON `null` values are dropped on the way
/// in so they read as unknown too; numbers and booleans are kept as text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, serde_json::Value>")]
pub struct SpecMap(BTreeMap<String, String>);

impl SpecMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.0.remove(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<BTreeMap<String, serde_json::Value>> for SpecMap {
    fn from(raw: BTreeMap<String, serde_json::Value>) -> Self {
        let values = raw
            .into_iter()
            .filter_map(|(key, value)| match value {
                serde_json::Value::Null => None,
                serde_json::Value::String(s) => Some((key, s)),
                other => Some((key, other.to_string())),
            })
            .collect();
        Self(values)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for SpecMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// One catalog item as served by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub id: RecordId,
    #[serde(default)]
    pub product_name: String,
    pub segment: Segment,
    /// Base64-encoded JPEG.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_base64: Option<String>,
    #[serde(default)]
    pub spec_list: SpecMap,
}

impl ProductRecord {
    pub fn spec(&self, key: &str) -> Option<&str> {
        self.spec_list.get(key)
    }

    /// Turn the record back into an editable draft.
    pub fn to_draft(&self) -> ProductDraft {
        ProductDraft {
            product_name: self.product_name.clone(),
            segment: self.segment,
            image_base64: self.image_base64.clone(),
            spec_list: self.spec_list.clone(),
        }
    }
}

/// Body for creating or replacing a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDraft {
    pub product_name: String,
    pub segment: Segment,
    pub image_base64: Option<String>,
    pub spec_list: SpecMap,
}

impl ProductDraft {
    pub fn new(product_name: impl Into<String>, segment: Segment) -> Self {
        Self {
            product_name: product_name.into(),
            segment,
            image_base64: None,
            spec_list: SpecMap::new(),
        }
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.product_name.trim().is_empty() {
            return Err(AppError::validation("product name is required"));
        }
        Ok(())
    }
}

/// Account role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "user" => Ok(Self::User),
            "admin" => Ok(Self::Admin),
            other => Err(AppError::parse(format!(
                "unknown role '{other}' (expected user or admin)"
            ))),
        }
    }
}

/// A user account as served by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: RecordId,
    #[serde(default)]
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default)]
    pub role_type: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub img_profile_base64: Option<String>,
}

/// Body for creating a user.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub role_type: Role,
    pub img_profile_base64: Option<String>,
}

/// Partial update for a user. Only present fields are sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UserPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role_type: Option<Role>,
    /// Outer `None` leaves the avatar alone, `Some(None)` clears it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub img_profile_base64: Option<Option<String>>,
}
