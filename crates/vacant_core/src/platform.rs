use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::VacancyRecord;

/// Platform name mapped to that platform's records, in input order.
pub type PlatformVacancies = BTreeMap<String, Vec<VacancyRecord>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Platform {
    HeadHunter,
    SuperJob,
}

impl Platform {
    pub const ALL: [Platform; 2] = [Platform::HeadHunter, Platform::SuperJob];

    /// Name stored in `VacancyRecord::platform`.
    pub fn name(&self) -> &'static str {
        match self {
            Platform::HeadHunter => "HH.ru",
            Platform::SuperJob => "SuperJob.ru",
        }
    }

    /// Number shown in the interactive platform menu.
    pub fn menu_key(&self) -> &'static str {
        match self {
            Platform::HeadHunter => "1",
            Platform::SuperJob => "2",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown platform {0:?} (expected hh or superjob)")]
pub struct ParsePlatformError(pub String);

impl FromStr for Platform {
    type Err = ParsePlatformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1" | "hh" | "hh.ru" | "headhunter" => Ok(Platform::HeadHunter),
            "2" | "sj" | "superjob" | "superjob.ru" => Ok(Platform::SuperJob),
            _ => Err(ParsePlatformError(s.to_string())),
        }
    }
}

/// Groups a flat record list by `platform`, keeping order within each group.
pub fn group_by_platform(records: impl IntoIterator<Item = VacancyRecord>) -> PlatformVacancies {
    let mut grouped = PlatformVacancies::new();
    for record in records {
        grouped
            .entry(record.platform().to_string())
            .or_default()
            .push(record);
    }
    grouped
}
