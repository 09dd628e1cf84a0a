//! Catalog data model and the static spec-field schema.

pub mod model;
pub mod schema;

pub use model::{
    NewUser, ProductDraft, ProductRecord, RecordId, Role, Segment, SegmentScope, SpecMap,
    UserPatch, UserRecord,
};
pub use schema::{SpecFieldDescriptor, SPEC_FIELDS};
