//! Persistence of learned rule tables.
//!
//! Two formats are supported: the plain merges file (one rendered pair per
//! line, rank = line order) and a self-describing JSON bundle that also
//! carries the codec configuration.

pub mod format;
pub mod load;
pub mod save;

pub use format::{ModelFormat, SerializedCodec, FORMAT_VERSION, VERSION_HEADER};
pub use load::CodecLoader;
pub use save::CodecSaver;
