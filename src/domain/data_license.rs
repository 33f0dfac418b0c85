//! Open data licenses attached to published infrastructure data

use crate::support::errors::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataLicense {
    OpenDatabaseLicense,
    CreativeCommonsBy4,
    CreativeCommonsBySa4,
    CreativeCommonsZero,
    Proprietary,
}

impl DataLicense {
    pub fn id(&self) -> &'static str {
        match self {
            Self::OpenDatabaseLicense => "ODbL",
            Self::CreativeCommonsBy4 => "CC-BY-4.0",
            Self::CreativeCommonsBySa4 => "CC-BY-SA-4.0",
            Self::CreativeCommonsZero => "CC0-1.0",
            Self::Proprietary => "Proprietary",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::OpenDatabaseLicense => "Open Data Commons Open Database License 1.0",
            Self::CreativeCommonsBy4 => "Creative Commons Attribution 4.0 International",
            Self::CreativeCommonsBySa4 => "Creative Commons Attribution-ShareAlike 4.0 International",
            Self::CreativeCommonsZero => "Creative Commons Zero 1.0 Universal",
            Self::Proprietary => "Proprietary license, contact the data owner",
        }
    }

    pub fn urls(&self) -> &'static [&'static str] {
        match self {
            Self::OpenDatabaseLicense => &["https://opendatacommons.org/licenses/odbl/1-0/"],
            Self::CreativeCommonsBy4 => &["https://creativecommons.org/licenses/by/4.0/"],
            Self::CreativeCommonsBySa4 => &["https://creativecommons.org/licenses/by-sa/4.0/"],
            Self::CreativeCommonsZero => &["https://creativecommons.org/publicdomain/zero/1.0/"],
            Self::Proprietary => &[],
        }
    }

    pub fn parse(s: &str) -> Result<Self, DomainError> {
        [
            Self::OpenDatabaseLicense,
            Self::CreativeCommonsBy4,
            Self::CreativeCommonsBySa4,
            Self::CreativeCommonsZero,
            Self::Proprietary,
        ]
        .into_iter()
        .find(|license| license.id().eq_ignore_ascii_case(s.trim()))
        .ok_or_else(|| DomainError::validation("Unknown data license!"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_by_id_ignoring_case() {
        assert_eq!(DataLicense::parse("odbl").unwrap(), DataLicense::OpenDatabaseLicense);
        assert_eq!(DataLicense::parse("CC-BY-4.0").unwrap().urls().len(), 1);
        assert!(DataLicense::parse("GPL").is_err());
    }
}
