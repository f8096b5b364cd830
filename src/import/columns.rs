// src/import/columns.rs
//! Fuzzy header-to-field resolution
//!
//! Sheets arrive with unknown column naming conventions. Each canonical
//! field carries an ordered alias list; headers and aliases are normalized
//! (lowercase, spaces/underscores/hyphens/dots stripped) and resolved in
//! three ordered passes: exact, prefix (alias >= 4 chars), substring
//! (alias >= 4 chars). First hit wins; unresolved fields are simply absent.

use std::collections::HashMap;

/// Aliases shorter than this never participate in prefix/substring passes
const MIN_FUZZY_ALIAS_LEN: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CanonicalField {
    Name,
    Email,
    Contact,
    Position,
    Client,
    Skills,
    Location,
    Experience,
    CurrentCtc,
    ExpectedCtc,
    NoticePeriod,
    Status,
}

impl CanonicalField {
    pub const ALL: &'static [CanonicalField] = &[
        CanonicalField::Name,
        CanonicalField::Email,
        CanonicalField::Contact,
        CanonicalField::Position,
        CanonicalField::Client,
        CanonicalField::Skills,
        CanonicalField::Location,
        CanonicalField::Experience,
        CanonicalField::CurrentCtc,
        CanonicalField::ExpectedCtc,
        CanonicalField::NoticePeriod,
        CanonicalField::Status,
    ];

    /// Ordered alias list; more specific aliases come first
    fn aliases(&self) -> &'static [&'static str] {
        match self {
            CanonicalField::Name => &["name", "candidatename", "fullname", "candidate"],
            CanonicalField::Email => &["email", "emailid", "emailaddress", "mailid", "mail"],
            CanonicalField::Contact => &[
                "contact",
                "contactno",
                "contactnumber",
                "phone",
                "phoneno",
                "mobile",
                "mobileno",
            ],
            CanonicalField::Position => &[
                "position",
                "role",
                "jobtitle",
                "designation",
                "appliedfor",
            ],
            CanonicalField::Client => &["client", "clientname", "account", "company"],
            CanonicalField::Skills => &[
                "skills",
                "skillset",
                "keyskills",
                "technologies",
                "technology",
            ],
            CanonicalField::Location => &["location", "currentlocation", "city"],
            CanonicalField::Experience => &[
                "experience",
                "totalexperience",
                "yearsofexperience",
                "exp",
            ],
            CanonicalField::CurrentCtc => &["currentctc", "currentsalary", "ctc", "salary"],
            CanonicalField::ExpectedCtc => &["expectedctc", "expectedsalary", "ectc"],
            CanonicalField::NoticePeriod => &["noticeperiod", "notice"],
            CanonicalField::Status => &["status", "candidatestatus", "stage"],
        }
    }
}

/// Resolved mapping from canonical field to a column index in the sheet
#[derive(Debug, Default, Clone)]
pub struct ColumnMap {
    mapping: HashMap<CanonicalField, usize>,
}

impl ColumnMap {
    pub fn column(&self, field: CanonicalField) -> Option<usize> {
        self.mapping.get(&field).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.mapping.is_empty()
    }

    pub fn len(&self) -> usize {
        self.mapping.len()
    }
}

/// Lowercase and strip spaces, underscores, hyphens, dots
pub fn normalize_header(header: &str) -> String {
    header
        .to_lowercase()
        .chars()
        .filter(|c| !matches!(c, ' ' | '_' | '-' | '.'))
        .collect()
}

/// Resolve each canonical field to at most one column index.
pub fn resolve_columns(headers: &[String]) -> ColumnMap {
    let normalized: Vec<String> = headers.iter().map(|h| normalize_header(h)).collect();
    let mut mapping = HashMap::new();

    for &field in CanonicalField::ALL {
        if let Some(idx) = resolve_field(field, &normalized) {
            mapping.insert(field, idx);
        }
    }

    ColumnMap { mapping }
}

fn resolve_field(field: CanonicalField, headers: &[String]) -> Option<usize> {
    // Pass 1: exact match always beats any fuzzy competitor
    for alias in field.aliases() {
        if let Some(idx) = headers.iter().position(|h| h == alias) {
            return Some(idx);
        }
    }

    // Pass 2: header starts with the alias
    for alias in field.aliases() {
        if alias.len() < MIN_FUZZY_ALIAS_LEN {
            continue;
        }
        if let Some(idx) = headers.iter().position(|h| h.starts_with(alias)) {
            return Some(idx);
        }
    }

    // Pass 3: alias appears anywhere inside the header
    for alias in field.aliases() {
        if alias.len() < MIN_FUZZY_ALIAS_LEN {
            continue;
        }
        if let Some(idx) = headers.iter().position(|h| h.contains(alias)) {
            return Some(idx);
        }
    }

    None
}
