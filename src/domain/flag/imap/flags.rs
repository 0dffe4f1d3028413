use crate::Flags;

use super::{from_raw, RawFlag};

impl From<&[RawFlag<'_>]> for Flags {
    fn from(raw_flags: &[RawFlag<'_>]) -> Self {
        raw_flags.iter().map(from_raw).collect()
    }
}

impl From<Flags> for Vec<RawFlag<'static>> {
    fn from(flags: Flags) -> Self {
        flags.0.into_iter().map(RawFlag::from).collect()
    }
}
