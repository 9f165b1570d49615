mod raw_input;
mod tag;

pub use raw_input::RawInput;
pub use tag::{MAX_TAGS, Tag, TagList};
