//! Attribute arrays keyed by node or edge identity.

use std::ops::Index;

// =#========================================================================#=
// ATTRIBUTE ARRAY
// =#========================================================================$=
/// Dense vector of values keyed by node or edge id with a default value for
/// unset keys.
///
/// The vector grows on demand when a value is set, so an array created for a
/// graph stays usable after nodes or edges were added to it. Reading an id
/// that was never set returns the default.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeArray<T> {
    values: Vec<T>,
    default: T,
}

/// Attribute array keyed by [NodeId](crate::model::NodeId).
pub type NodeArray<T> = AttributeArray<T>;

/// Attribute array keyed by [EdgeId](crate::model::EdgeId).
pub type EdgeArray<T> = AttributeArray<T>;

impl<T: Clone> AttributeArray<T> {
    /// Creates an empty array returning `default` for every id.
    pub fn new(default: T) -> Self {
        Self {
            values: Vec::new(),
            default,
        }
    }

    /// Creates an array with room for `capacity` ids.
    pub fn with_capacity(capacity: usize, default: T) -> Self {
        Self {
            values: Vec::with_capacity(capacity),
            default,
        }
    }

    /// Returns the value for `id`, or the default if it was never set.
    pub fn get(&self, id: usize) -> &T {
        self.values.get(id).unwrap_or(&self.default)
    }

    /// Sets the value for `id`.
    pub fn set(&mut self, id: usize, value: T) {
        *self.get_mut(id) = value;
    }

    /// Returns a mutable reference to the value for `id`,
    /// materializing the default first if necessary.
    pub fn get_mut(&mut self, id: usize) -> &mut T {
        if id >= self.values.len() {
            self.values.resize(id + 1, self.default.clone());
        }
        &mut self.values[id]
    }

    /// Resets the value for `id` back to the default.
    pub fn reset(&mut self, id: usize) {
        if id < self.values.len() {
            self.values[id] = self.default.clone();
        }
    }

    /// Resets all values back to the default.
    pub fn clear(&mut self) {
        self.values.clear();
    }

    /// Returns the default value of this array.
    pub fn default_value(&self) -> &T {
        &self.default
    }
}

impl<T: Clone> Index<usize> for AttributeArray<T> {
    type Output = T;

    fn index(&self, id: usize) -> &Self::Output {
        self.get(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_ids_read_default() {
        let mut weights = EdgeArray::new(1.0);
        assert_eq!(weights[7], 1.0);

        weights.set(3, 0.25);
        assert_eq!(weights[3], 0.25);
        assert_eq!(weights[2], 1.0);
        assert_eq!(weights[4], 1.0);

        weights.reset(3);
        assert_eq!(weights[3], 1.0);
    }

    #[test]
    fn get_mut_materializes_default() {
        let mut taxa: NodeArray<Vec<usize>> = NodeArray::new(Vec::new());
        taxa.get_mut(5).push(2);
        taxa.get_mut(5).push(4);
        assert_eq!(taxa[5], vec![2, 4]);
        assert!(taxa[0].is_empty());
    }
}
