mod read_op;
pub mod record;
pub mod validate;
mod write_op;

pub use record::Entity;
pub use validate::Validator;
