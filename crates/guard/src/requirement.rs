//! Requirements and their evaluation against a [`PermissionSet`].
//!
//! A [`RequirementList`] is satisfied when *any* of its entries is; a
//! [`Requirement::Group`] entry is satisfied only when *all* of its members
//! are held. An empty list is never satisfied.

use crate::context::describe;
use crate::{Fault, PermissionSet};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One entry of a [`RequirementList`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Requirement {
    /// A single permission that must be held.
    Leaf(String),
    /// Permissions that must all be held.
    Group(Vec<String>),
}

impl Requirement {
    pub fn leaf(permission: impl Into<String>) -> Self {
        Self::Leaf(permission.into())
    }

    pub fn group<I, S>(permissions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Group(permissions.into_iter().map(Into::into).collect())
    }

    pub fn is_satisfied_by(&self, held: &PermissionSet) -> bool {
        match self {
            Self::Leaf(permission) => held.contains(permission),
            Self::Group(members) => members.iter().all(|m| held.contains(m)),
        }
    }

    /// Accepts a string or an array of strings.
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(permission) => Some(Self::Leaf(permission.clone())),
            Value::Array(members) => members
                .iter()
                .map(|m| m.as_str().map(str::to_string))
                .collect::<Option<Vec<_>>>()
                .map(Self::Group),
            _ => None,
        }
    }
}

impl From<&str> for Requirement {
    fn from(permission: &str) -> Self {
        Self::leaf(permission)
    }
}

impl From<String> for Requirement {
    fn from(permission: String) -> Self {
        Self::Leaf(permission)
    }
}

impl<const N: usize> From<[&str; N]> for Requirement {
    fn from(members: [&str; N]) -> Self {
        Self::group(members)
    }
}

impl From<&[&str]> for Requirement {
    fn from(members: &[&str]) -> Self {
        Self::group(members.iter().copied())
    }
}

impl From<Vec<&str>> for Requirement {
    fn from(members: Vec<&str>) -> Self {
        Self::group(members)
    }
}

impl From<Vec<String>> for Requirement {
    fn from(members: Vec<String>) -> Self {
        Self::Group(members)
    }
}

/// Requirements combined with OR semantics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RequirementList(Vec<Requirement>);

impl RequirementList {
    pub fn new(entries: Vec<Requirement>) -> Self {
        Self(entries)
    }

    /// Build a list from call-site arguments, one entry per argument.
    ///
    /// `["a", "b"]` is two leaves, `[["a", "b"]]` is one group. Each argument
    /// must be a string or an array of strings; the first one that is not is
    /// reported with its position and nothing is evaluated.
    pub fn from_args(args: &[Value]) -> Result<Self, Fault> {
        args.iter()
            .enumerate()
            .map(|(index, arg)| {
                Requirement::from_value(arg).ok_or(Fault::BadRequirementShape {
                    index,
                    found: describe(arg),
                })
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }

    /// True if any entry is satisfied. Always false for an empty list.
    pub fn evaluate(&self, held: &PermissionSet) -> bool {
        self.0.iter().any(|entry| entry.is_satisfied_by(held))
    }

    pub fn entries(&self) -> &[Requirement] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Requirement> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<Requirement>> for RequirementList {
    fn from(entries: Vec<Requirement>) -> Self {
        Self(entries)
    }
}

impl FromIterator<Requirement> for RequirementList {
    fn from_iter<T: IntoIterator<Item = Requirement>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a RequirementList {
    type Item = &'a Requirement;
    type IntoIter = std::slice::Iter<'a, Requirement>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl TryFrom<&Value> for RequirementList {
    type Error = Fault;

    /// An array is read as call-site arguments; a bare string is one leaf.
    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        match value {
            Value::Array(args) => Self::from_args(args),
            Value::String(permission) => Ok(Self(vec![Requirement::leaf(permission.as_str())])),
            other => Err(Fault::BadRequirementShape {
                index: 0,
                found: describe(other),
            }),
        }
    }
}

impl<'de> Deserialize<'de> for RequirementList {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::try_from(&value).map_err(serde::de::Error::custom)
    }
}

/// Untyped requirement list evaluation: validate the shape, then evaluate.
pub fn evaluate(requirements: &[Value], held: &PermissionSet) -> Result<bool, Fault> {
    Ok(RequirementList::from_args(requirements)?.evaluate(held))
}

/// Conversion into a requirement list, validating shape where the input is
/// untyped.
pub trait IntoRequirements {
    fn into_requirements(self) -> Result<RequirementList, Fault>;
}

impl IntoRequirements for RequirementList {
    fn into_requirements(self) -> Result<RequirementList, Fault> {
        Ok(self)
    }
}

impl IntoRequirements for Vec<Requirement> {
    fn into_requirements(self) -> Result<RequirementList, Fault> {
        Ok(RequirementList(self))
    }
}

impl IntoRequirements for Requirement {
    fn into_requirements(self) -> Result<RequirementList, Fault> {
        Ok(RequirementList(vec![self]))
    }
}

impl IntoRequirements for &str {
    fn into_requirements(self) -> Result<RequirementList, Fault> {
        Ok(RequirementList(vec![Requirement::leaf(self)]))
    }
}

impl IntoRequirements for &[Value] {
    fn into_requirements(self) -> Result<RequirementList, Fault> {
        RequirementList::from_args(self)
    }
}

impl IntoRequirements for Vec<Value> {
    fn into_requirements(self) -> Result<RequirementList, Fault> {
        RequirementList::from_args(&self)
    }
}

impl IntoRequirements for &Value {
    fn into_requirements(self) -> Result<RequirementList, Fault> {
        RequirementList::try_from(self)
    }
}

impl IntoRequirements for Value {
    fn into_requirements(self) -> Result<RequirementList, Fault> {
        RequirementList::try_from(&self)
    }
}
