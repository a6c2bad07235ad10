use crate::RecordMeta;
use serde::Serialize;
use serde::de::DeserializeOwned;

/// The reduced projection of a record, held by the indexed store.
///
/// Implementors declare every field name of the lite schema in [`FIELDS`];
/// the projector subtracts [`crate::SYSTEM_FIELDS`] from that list to obtain
/// the indexed field set. Fields absent from a given full record are simply
/// omitted, so every non-system field should be optional or defaulted.
///
/// [`FIELDS`]: LiteRecord::FIELDS
pub trait LiteRecord: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Declared field names of the lite schema.
    const FIELDS: &'static [&'static str];

    /// System-managed metadata (read-only on the lite side).
    fn meta(&self) -> &RecordMeta;
}

/// The complete domain object, serialized whole into the value store.
///
/// A full record is paired with exactly one [`LiteRecord`] type; the pairing
/// is all a repository needs — there is no per-entity conversion code.
pub trait FullRecord: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// The paired lite schema.
    type Lite: LiteRecord;

    /// Logical record kind, used as the indexed-store partition and for logs.
    const KIND: &'static str;

    /// True when the lite field list covers every domain field, i.e. the
    /// indexed store holds full-fidelity data for this pairing. Only such
    /// pairings are eligible for index-to-value backfill and for query
    /// hydration without a value-store round trip.
    const INDEX_HAS_FULL_FIDELITY: bool = false;

    /// System-managed metadata.
    fn meta(&self) -> &RecordMeta;

    /// Mutable access, used by the storage layer to copy back identity and
    /// audit stamps after an indexed-store write.
    fn meta_mut(&mut self) -> &mut RecordMeta;
}
