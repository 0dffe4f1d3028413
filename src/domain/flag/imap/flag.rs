use crate::Flag;

pub type RawFlag<'a> = imap::types::Flag<'a>;

pub fn from_raw(raw: &RawFlag<'_>) -> Flag {
    match raw {
        RawFlag::Seen => Flag::Seen,
        RawFlag::Answered => Flag::Answered,
        RawFlag::Flagged => Flag::Flagged,
        RawFlag::Deleted => Flag::Deleted,
        RawFlag::Draft => Flag::Draft,
        RawFlag::Recent => Flag::Recent,
        RawFlag::Custom(flag) => Flag::Custom(flag.to_string()),
        flag => Flag::Custom(flag.to_string()),
    }
}

impl From<Flag> for RawFlag<'static> {
    fn from(flag: Flag) -> Self {
        match flag {
            Flag::Seen => RawFlag::Seen,
            Flag::Answered => RawFlag::Answered,
            Flag::Flagged => RawFlag::Flagged,
            Flag::Deleted => RawFlag::Deleted,
            Flag::Draft => RawFlag::Draft,
            Flag::Recent => RawFlag::Recent,
            Flag::Custom(flag) => RawFlag::Custom(flag.into()),
        }
    }
}
