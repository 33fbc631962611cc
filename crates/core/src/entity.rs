//! Entity trait: identity that survives re-fetches.

/// Entity marker + minimal interface.
///
/// Catalog records are owned by the remote API; two fetches of the same record
/// are the same entity when their ids match.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}
