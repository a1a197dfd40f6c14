//! File entities: the stable record, its versions, and the joined
//! projection exposed to callers.

pub mod model;
pub mod projection;
pub mod version;

pub use model::{FileRecord, NewFileRecord};
pub use projection::File;
pub use version::{FileVersion, NewFileVersion};
