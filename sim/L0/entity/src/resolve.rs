//! Pattern resolution against a concrete entity list.
//!
//! All functions here are pure: they take the patterns and the names declared
//! by a robot asset and return the matches, without touching any engine.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::{EntityError, Result};
use crate::pattern::{EntityKind, EntityPattern};

/// The set of entities matched by one or more patterns.
///
/// Names are stored in the order the robot declares them, so two resolutions
/// of the same pattern set compare equal regardless of pattern order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    /// Which entity list was searched.
    pub kind: EntityKind,
    /// Indices into the entity list.
    pub indices: Vec<usize>,
    /// Matched names, parallel to `indices`.
    pub names: Vec<String>,
}

impl Resolution {
    /// Number of matched entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Check if nothing matched.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Check if `name` is part of the resolution.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// Iterate over `(index, name)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> {
        self.indices
            .iter()
            .copied()
            .zip(self.names.iter().map(String::as_str))
    }
}

/// A value bound to one entity through a pattern table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundValue<V> {
    /// Index into the entity list.
    pub index: usize,
    /// Entity name.
    pub name: String,
    /// The pattern that matched this entity.
    pub pattern: String,
    /// The bound value.
    pub value: V,
}

/// Resolve compiled patterns to the union of their matches.
///
/// Every pattern must match at least one entity.
///
/// # Errors
///
/// Returns [`EntityError::Unresolved`] for the first pattern that matches
/// nothing.
pub fn resolve<S: AsRef<str>>(
    patterns: &[EntityPattern],
    entities: &[S],
    kind: EntityKind,
) -> Result<Resolution> {
    let mut matched = vec![false; entities.len()];

    for pattern in patterns {
        let mut hit = false;
        for (i, entity) in entities.iter().enumerate() {
            if pattern.matches(entity.as_ref()) {
                matched[i] = true;
                hit = true;
            }
        }
        if !hit {
            return Err(EntityError::unresolved(pattern.as_str(), kind, entities));
        }
    }

    let (indices, names) = entities
        .iter()
        .enumerate()
        .filter(|(i, _)| matched[*i])
        .map(|(i, e)| (i, e.as_ref().to_string()))
        .unzip();

    let resolution = Resolution {
        kind,
        indices,
        names,
    };
    trace!(
        "resolved {} {kind} pattern(s) to {} entities",
        patterns.len(),
        resolution.len()
    );
    Ok(resolution)
}

/// Compile and resolve pattern strings in one call.
///
/// # Errors
///
/// Returns an error if a pattern does not compile or matches nothing.
pub fn resolve_patterns<P: AsRef<str>, S: AsRef<str>>(
    patterns: &[P],
    entities: &[S],
    kind: EntityKind,
) -> Result<Resolution> {
    let compiled = EntityPattern::compile_all(patterns)?;
    resolve(&compiled, entities, kind)
}

/// Resolve patterns keeping the order in which they are listed.
///
/// Used where the order is meaningful, such as the joint list of an action
/// term (it fixes the layout of the action vector). Within one pattern,
/// entities keep declaration order.
///
/// # Errors
///
/// Returns an error if a pattern does not compile, matches nothing, or
/// matches an entity already claimed by an earlier pattern.
pub fn resolve_ordered<P: AsRef<str>, S: AsRef<str>>(
    patterns: &[P],
    entities: &[S],
    kind: EntityKind,
) -> Result<Resolution> {
    let mut claimed: Vec<Option<&str>> = vec![None; entities.len()];
    let mut indices = Vec::new();
    let mut names = Vec::new();

    for raw in patterns {
        let pattern = EntityPattern::new(raw.as_ref())?;
        let mut hit = false;
        for (i, entity) in entities.iter().enumerate() {
            let name = entity.as_ref();
            if !pattern.matches(name) {
                continue;
            }
            hit = true;
            if let Some(first) = claimed[i] {
                return Err(EntityError::ambiguous(name, kind, first, raw.as_ref()));
            }
            claimed[i] = Some(raw.as_ref());
            indices.push(i);
            names.push(name.to_string());
        }
        if !hit {
            return Err(EntityError::unresolved(raw.as_ref(), kind, entities));
        }
    }

    Ok(Resolution {
        kind,
        indices,
        names,
    })
}

/// Bind a `pattern -> value` table to entities.
///
/// Every pattern must match at least one entity and no entity may be
/// matched by two patterns. Entities not named by the table are omitted.
/// The result is in entity declaration order.
///
/// # Errors
///
/// Returns an error if a pattern does not compile, matches nothing, or
/// overlaps another pattern of the table.
pub fn resolve_values<K, V, S, I>(
    table: I,
    entities: &[S],
    kind: EntityKind,
) -> Result<Vec<BoundValue<V>>>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: Clone,
    S: AsRef<str>,
{
    let mut slots: Vec<Option<(String, V)>> = vec![None; entities.len()];

    for (key, value) in table {
        let pattern = EntityPattern::new(key.as_ref())?;
        let mut hit = false;
        for (i, entity) in entities.iter().enumerate() {
            let name = entity.as_ref();
            if !pattern.matches(name) {
                continue;
            }
            hit = true;
            if let Some((first, _)) = &slots[i] {
                return Err(EntityError::ambiguous(name, kind, first.clone(), key.as_ref()));
            }
            slots[i] = Some((key.as_ref().to_string(), value.clone()));
        }
        if !hit {
            return Err(EntityError::unresolved(key.as_ref(), kind, entities));
        }
    }

    Ok(slots
        .into_iter()
        .enumerate()
        .filter_map(|(index, slot)| {
            slot.map(|(pattern, value)| BoundValue {
                index,
                name: entities[index].as_ref().to_string(),
                pattern,
                value,
            })
        })
        .collect())
}
