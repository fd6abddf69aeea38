pub mod buffer;
pub mod index;
pub mod layout;
mod read_op;
mod remove_op;
mod write_op;

pub use buffer::FieldBuffer;
pub use index::FieldIndex;
pub use read_op::FieldIter;
