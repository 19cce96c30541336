//! Per-snapshot parameter storage.
//!
//! # Design
//!
//! A `ParameterMap` maps full qualified names to [`Constant`]s.  Each name
//! holds at most one value, and once a name has been declared with a kind
//! every replacement must carry the same kind; the map refuses anything
//! else with [`AgentError::TypeMismatch`].
//!
//! A `BTreeMap` keeps iteration order stable, so anything derived from a
//! full scan (state copies, debug dumps) is deterministic.
//!
//! # Usage
//!
//! ```rust
//! use sc_agent::{Constant, ParamKind, ParamValue, ParameterMap, QualifiedName};
//!
//! let mut map = ParameterMap::new();
//! let name = QualifiedName::new("car_1", "bb_length", "base");
//! map.insert(Constant::new(name.clone(), ParamValue::Scalar(4.5))).unwrap();
//! assert_eq!(map.value(&name.full(), ParamKind::Scalar).unwrap(), ParamValue::Scalar(4.5));
//! ```

use std::collections::BTreeMap;

use crate::{AgentError, AgentResult, Constant, ParamKind, ParamValue};

#[derive(Clone, Default, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParameterMap {
    map: BTreeMap<String, Constant>,
}

impl ParameterMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `constant` under its full name, returning the one it replaced.
    pub fn insert(&mut self, constant: Constant) -> AgentResult<Option<Constant>> {
        let key = constant.name().full();
        if let Some(existing) = self.map.get(&key) {
            if existing.kind() != constant.kind() {
                return Err(AgentError::TypeMismatch {
                    name:     key,
                    expected: existing.kind(),
                    found:    constant.kind(),
                });
            }
        }
        Ok(self.map.insert(key, constant))
    }

    pub fn remove(&mut self, full_name: &str) -> Option<Constant> {
        self.map.remove(full_name)
    }

    // ── Read access ───────────────────────────────────────────────────────

    pub fn get(&self, full_name: &str) -> Option<&Constant> {
        self.map.get(full_name)
    }

    /// The value stored under `full_name`, checked against `kind`.
    pub fn value(&self, full_name: &str, kind: ParamKind) -> AgentResult<ParamValue> {
        self.map
            .get(full_name)
            .ok_or_else(|| AgentError::Missing(full_name.to_owned()))?
            .expect_kind(kind)
    }

    pub fn contains(&self, full_name: &str) -> bool {
        self.map.contains_key(full_name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Constant> + '_ {
        self.map.values()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.map.keys().map(String::as_str)
    }

    // ── Metadata ──────────────────────────────────────────────────────────

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl FromIterator<Constant> for ParameterMap {
    /// Later constants replace earlier ones with the same name.
    fn from_iter<I: IntoIterator<Item = Constant>>(iter: I) -> Self {
        Self {
            map: iter.into_iter().map(|c| (c.name().full(), c)).collect(),
        }
    }
}
