use serde::{Deserialize, Serialize};

use crate::{direction, error::ValidationError};

pub const MAX_NAME_CHARS: usize = 20;

/// A named binding from a direction sequence to action code. `action` is always the
/// decoded text; the transport encoding only exists on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gesture {
    pub name: String,
    pub directions: String,
    pub action: String,
}

impl Gesture {
    pub fn new(
        name: impl Into<String>,
        directions: impl Into<String>,
        action: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            directions: directions.into(),
            action: action.into(),
        }
    }
}

/// Checks the shape of a name: non-empty and at most [`MAX_NAME_CHARS`] characters.
pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::EmptyName);
    }
    if name.chars().count() > MAX_NAME_CHARS {
        return Err(ValidationError::name_too_long());
    }
    Ok(())
}

/// Snapshot of the server's gesture collection, kept in name order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GestureCollection {
    gestures: Vec<Gesture>,
}

impl GestureCollection {
    pub fn new(mut gestures: Vec<Gesture>) -> Self {
        gestures.sort_by(|a, b| a.name.cmp(&b.name));
        gestures.dedup_by(|a, b| a.name == b.name);
        Self { gestures }
    }

    pub fn len(&self) -> usize {
        self.gestures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gestures.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Gesture> {
        self.gestures.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.gestures.iter().map(|g| g.name.as_str())
    }

    /// Case-sensitive.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn get(&self, name: &str) -> Option<&Gesture> {
        self.gestures
            .binary_search_by(|g| g.name.as_str().cmp(name))
            .ok()
            .map(|idx| &self.gestures[idx])
    }

    /// The gesture bound to `directions`, comparing normalised sequences so labels
    /// and stray whitespace do not matter.
    pub fn find_by_directions(&self, directions: &str) -> Option<&Gesture> {
        let wanted = direction::normalize(directions);
        if wanted.is_empty() {
            return None;
        }
        self.gestures
            .iter()
            .find(|g| direction::normalize(&g.directions) == wanted)
    }

    /// Uniqueness check for a create, or for a rename when `own_name` is the gesture's
    /// prior key.
    pub fn ensure_name_available(
        &self,
        name: &str,
        own_name: Option<&str>,
    ) -> Result<(), ValidationError> {
        if own_name == Some(name) {
            return Ok(());
        }
        if self.contains(name) {
            return Err(ValidationError::DuplicateName(name.to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/domain_tests.rs"]
mod tests;
