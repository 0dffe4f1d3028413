use serde::Serialize;
use std::{collections::HashSet, fmt, ops};

use crate::Flag;

/// Represents the set of flags attached to a message.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct Flags(pub HashSet<Flag>);

impl fmt::Display for Flags {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut glue = "";

        for flag in &self.0 {
            write!(f, "{}{}", glue, flag)?;
            glue = " ";
        }

        Ok(())
    }
}

impl ops::Deref for Flags {
    type Target = HashSet<Flag>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl ops::DerefMut for Flags {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl From<&str> for Flags {
    fn from(flags: &str) -> Self {
        Flags(flags.split_whitespace().map(Flag::from).collect())
    }
}

impl FromIterator<Flag> for Flags {
    fn from_iter<T: IntoIterator<Item = Flag>>(iter: T) -> Self {
        let mut flags = Flags::default();
        flags.extend(iter);
        flags
    }
}

#[cfg(test)]
mod tests {
    use crate::Flag;

    use super::Flags;

    #[test]
    fn from_wire_string() {
        assert_eq!(Flags::default(), Flags::from(""));
        assert_eq!(
            Flags::from_iter([Flag::Seen, Flag::Flagged]),
            Flags::from("\\Seen \\Flagged"),
        );
        assert_eq!(
            Flags::from_iter([Flag::Seen, Flag::custom("$Junk")]),
            Flags::from("\\Seen $Junk"),
        );
    }

    #[test]
    fn to_wire_string() {
        assert_eq!("", Flags::default().to_string());
        assert_eq!("\\Seen", Flags::from_iter([Flag::Seen]).to_string());
    }
}
