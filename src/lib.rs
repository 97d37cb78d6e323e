//! Schema-less entity records.
//!
//! An [`Entity`] is one result row held in memory: an insertion-ordered map of
//! field values plus change tracking, a persistence flag and per-field
//! validation errors. Reads and writes may be intercepted by accessor
//! overrides registered once per [`EntityKind`].
//!
//! ```
//! use entity_record::{Entity, Value, entity_map};
//!
//! let mut user = Entity::new(entity_map!({ "id" => 1, "name" => "Andrew" }));
//! assert!(user.dirty("id"));
//!
//! user.clean();
//! user.set("name", "Andrew");
//! assert!(!user.dirty("name"));
//! user.set("name", "Mark");
//! assert!(user.dirty("name"));
//! assert_eq!(user.get("name"), Value::from("Mark"));
//! ```

pub mod accessor;
pub mod entity;
pub mod error;
pub mod options;
pub mod types;
pub mod value;

pub use accessor::{EntityKind, Methods, Plain};
pub use entity::{Entity, Validator};
pub use error::EntityError;
pub use options::EntityOptions;
pub use smol_str::SmolStr;
pub use types::{ErrorMap, IntoErrors};
pub use value::{Map, Number, Value};
