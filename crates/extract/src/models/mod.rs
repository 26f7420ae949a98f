mod data;
mod emoji;

pub use self::data::{EmojiData, Emoticon};
pub use self::emoji::Emoji;
