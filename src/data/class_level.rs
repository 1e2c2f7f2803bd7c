use std::convert::TryFrom;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use utoipa::ToSchema;

pub const MIN_CLASS: u8 = 1;
pub const MAX_CLASS: u8 = 5;

/// A class level, stored as its text form `"1"`..`"5"`.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "String", into = "String")]
#[schema(value_type = String, example = "2")]
pub struct ClassLevel(u8);

impl ClassLevel {
    pub fn new(level: u8) -> Option<ClassLevel> {
        (MIN_CLASS..=MAX_CLASS)
            .contains(&level)
            .then_some(ClassLevel(level))
    }

    pub fn level(self) -> u8 {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidClassLevel(pub String);

impl Display for InvalidClassLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "'{}' is not a class level between {} and {}",
            self.0, MIN_CLASS, MAX_CLASS
        )
    }
}

impl FromStr for ClassLevel {
    type Err = InvalidClassLevel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u8>()
            .ok()
            .and_then(ClassLevel::new)
            .ok_or_else(|| InvalidClassLevel(s.to_string()))
    }
}

impl TryFrom<String> for ClassLevel {
    type Error = InvalidClassLevel;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ClassLevel> for String {
    fn from(level: ClassLevel) -> Self {
        level.to_string()
    }
}

impl Display for ClassLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
