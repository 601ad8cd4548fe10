//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Reference data handed to the workflow by the backend (a looked-up
/// product, a selected location) is never mutated locally. Two values with
/// the same attributes are interchangeable.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
