mod emoji;

pub(crate) use self::emoji::EmojiRow;
