//! The closed set of academic domains a sync can target.
//!
//! Each domain owns one static [`DomainConfig`]. Prompt wording is built from
//! the config's phrasing fragments, so the fragments live next to the
//! identity they describe rather than in runtime configuration.

use std::fmt;
use std::str::FromStr;

/// Static description of one academic domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainConfig {
    /// Stable key used on the command line (`engineering`, `medical`, ...)
    pub key: &'static str,
    /// Human label shown in prompts and logs
    pub display_name: &'static str,
    /// Ranking category the upstream is asked to rank by
    pub ranking_category: &'static str,
    /// Spreadsheet tab the records are written to
    pub sheet_name: &'static str,
    /// Number of ranked records a full sync aims for
    pub target_count: u32,
    /// "engineering college"
    pub singular: &'static str,
    /// "engineering colleges"
    pub plural: &'static str,
    /// Course used for the fee and eligibility columns
    pub flagship_course: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Domain {
    Engineering,
    Medical,
    Management,
    Law,
    Pharmacy,
    Architecture,
}

static ENGINEERING: DomainConfig = DomainConfig {
    key: "engineering",
    display_name: "Engineering",
    ranking_category: "NIRF Engineering",
    sheet_name: "Engineering Colleges",
    target_count: 100,
    singular: "engineering college",
    plural: "engineering colleges",
    flagship_course: "B.Tech",
};

static MEDICAL: DomainConfig = DomainConfig {
    key: "medical",
    display_name: "Medical",
    ranking_category: "NIRF Medical",
    sheet_name: "Medical Colleges",
    target_count: 50,
    singular: "medical college",
    plural: "medical colleges",
    flagship_course: "MBBS",
};

static MANAGEMENT: DomainConfig = DomainConfig {
    key: "management",
    display_name: "Management",
    ranking_category: "NIRF Management",
    sheet_name: "Management Colleges",
    target_count: 100,
    singular: "management institute",
    plural: "management institutes",
    flagship_course: "MBA",
};

static LAW: DomainConfig = DomainConfig {
    key: "law",
    display_name: "Law",
    ranking_category: "NIRF Law",
    sheet_name: "Law Colleges",
    target_count: 40,
    singular: "law school",
    plural: "law schools",
    flagship_course: "BA LLB",
};

static PHARMACY: DomainConfig = DomainConfig {
    key: "pharmacy",
    display_name: "Pharmacy",
    ranking_category: "NIRF Pharmacy",
    sheet_name: "Pharmacy Colleges",
    target_count: 75,
    singular: "pharmacy college",
    plural: "pharmacy colleges",
    flagship_course: "B.Pharm",
};

static ARCHITECTURE: DomainConfig = DomainConfig {
    key: "architecture",
    display_name: "Architecture",
    ranking_category: "NIRF Architecture and Planning",
    sheet_name: "Architecture Colleges",
    target_count: 40,
    singular: "architecture college",
    plural: "architecture colleges",
    flagship_course: "B.Arch",
};

impl Domain {
    /// All domains, in prompt order.
    pub const ALL: [Domain; 6] = [
        Domain::Engineering,
        Domain::Medical,
        Domain::Management,
        Domain::Law,
        Domain::Pharmacy,
        Domain::Architecture,
    ];

    pub fn config(self) -> &'static DomainConfig {
        match self {
            Domain::Engineering => &ENGINEERING,
            Domain::Medical => &MEDICAL,
            Domain::Management => &MANAGEMENT,
            Domain::Law => &LAW,
            Domain::Pharmacy => &PHARMACY,
            Domain::Architecture => &ARCHITECTURE,
        }
    }

    pub fn key(self) -> &'static str {
        self.config().key
    }

    /// Case-insensitive lookup by key.
    pub fn from_key(key: &str) -> Option<Domain> {
        let key = key.trim();
        Self::ALL
            .into_iter()
            .find(|d| d.key().eq_ignore_ascii_case(key))
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.config().display_name)
    }
}

impl FromStr for Domain {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Domain::from_key(s).ok_or_else(|| {
            let keys: Vec<&str> = Domain::ALL.iter().map(|d| d.key()).collect();
            format!("unknown domain '{}' (expected one of: {})", s, keys.join(", "))
        })
    }
}
