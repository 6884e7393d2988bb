use crate::contract::model::Snapshot;

/// Port for the domain layer: snapshot persistence the engine needs.
///
/// Implementations never fail outward. Unreadable or missing data loads as
/// `None`; rejected writes report `false`.
pub trait SnapshotRepository: Send + Sync {
    /// Last persisted snapshot, if any.
    fn load(&self) -> Option<Snapshot>;
    /// Replace the persisted snapshot.
    fn save(&self, snapshot: &Snapshot) -> bool;
    /// Remove the persisted snapshot.
    fn clear(&self) -> bool;
}
