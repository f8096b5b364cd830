// src/parsing/fields.rs
//! Heuristic field extraction over raw resume text
//!
//! Every extractor is best-effort: no match means an empty string, never an
//! error. The extractors are independent of each other; experience is the
//! only one with internal ordering (explicit total > date ranges > duration
//! fragments > give up).

use chrono::{Datelike, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::HashSet;

/// Fixed-shape extraction result. Unrecoverable fields stay empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeFields {
    pub name: String,
    pub email: String,
    #[serde(rename = "contact")]
    pub phone: String,
    pub linkedin: String,
    pub gender: String,
    pub skills: String,
    pub total_experience: String,
    pub education: String,
    pub current_company: String,
    pub current_location: String,
}

/// Run every extractor over the text.
pub fn extract_fields(text: &str) -> ResumeFields {
    ResumeFields {
        name: extract_name(text),
        email: extract_email(text),
        phone: extract_phone(text),
        linkedin: extract_linkedin(text),
        gender: extract_gender(text),
        skills: extract_skills(text),
        total_experience: extract_experience(text),
        education: extract_education(text),
        current_company: extract_current_company(text),
        current_location: extract_current_location(text),
    }
}

// ============================================================================
// Name
// ============================================================================

static NAME_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z][A-Za-z.'\-]*(?:\s+[A-Z][A-Za-z.'\-]*){1,3}$").unwrap());

/// Words that mark a line as a section header rather than a person's name
const NAME_DENYLIST: &[&str] = &[
    "resume",
    "curriculum",
    "vitae",
    "summary",
    "objective",
    "profile",
    "education",
    "experience",
    "skills",
    "contact",
    "address",
    "declaration",
    "career",
    "projects",
    "certifications",
];

fn extract_name(text: &str) -> String {
    for line in text.lines() {
        let line = line.trim();
        if line.len() < 3 || line.len() > 50 {
            continue;
        }
        if !NAME_LINE.is_match(line) {
            continue;
        }
        let lower = line.to_lowercase();
        if NAME_DENYLIST.iter().any(|word| lower.contains(word)) {
            continue;
        }
        return line.to_string();
    }
    String::new()
}

// ============================================================================
// Email / phone / LinkedIn
// ============================================================================

static EMAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Za-z0-9._%+\-]+@[A-Za-z0-9.\-]+\.[A-Za-z]{2,}").unwrap());

fn extract_email(text: &str) -> String {
    EMAIL
        .find(text)
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

static PHONE_INDIAN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:\+?91[\-\s]?)?[6-9]\d{9}\b").unwrap());
static PHONE_SEPARATED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b\d{5}[\-\s]\d{5}\b|\b\d{3}[\-.\s]\d{3}[\-.\s]\d{4}\b").unwrap()
});
static PHONE_US: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\(\d{3}\)\s?\d{3}[\-.\s]?\d{4}").unwrap());

/// Indian mobile first, then separated 10-digit, then US style. Separators
/// are stripped and a leading country code dropped.
fn extract_phone(text: &str) -> String {
    for pattern in [&*PHONE_INDIAN, &*PHONE_SEPARATED, &*PHONE_US] {
        if let Some(m) = pattern.find(text) {
            return normalize_phone(m.as_str());
        }
    }
    String::new()
}

fn normalize_phone(raw: &str) -> String {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() == 12 && digits.starts_with("91") {
        digits[2..].to_string()
    } else if digits.len() == 11 && (digits.starts_with('0') || digits.starts_with('1')) {
        digits[1..].to_string()
    } else {
        digits
    }
}

static LINKEDIN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:https?://)?(?:www\.)?linkedin\.com/(?:in|pub|profile)/[A-Za-z0-9_%\-./]+")
        .unwrap()
});

fn extract_linkedin(text: &str) -> String {
    LINKEDIN
        .find(text)
        .map(|m| m.as_str().trim_end_matches('/').to_string())
        .unwrap_or_default()
}

// ============================================================================
// Gender
// ============================================================================

static GENDER_LABELED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:gender|sex)\s*[:\-]\s*(male|female)\b").unwrap());
static GENDER_FEMALE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bfemale\b").unwrap());
static GENDER_MALE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bmale\b").unwrap());

fn extract_gender(text: &str) -> String {
    if let Some(caps) = GENDER_LABELED.captures(text) {
        return capitalize(&caps[1]);
    }
    // "female" must be probed before "male" since it contains it
    if GENDER_FEMALE.is_match(text) {
        return "Female".to_string();
    }
    if GENDER_MALE.is_match(text) {
        return "Male".to_string();
    }
    "Not Specified".to_string()
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
        None => String::new(),
    }
}

// ============================================================================
// Skills
// ============================================================================

/// Fixed skill vocabulary. Output order follows this list, not the text.
const SKILL_VOCABULARY: &[&str] = &[
    "java",
    "python",
    "javascript",
    "typescript",
    "c++",
    "c#",
    "golang",
    "rust",
    "php",
    "ruby",
    "swift",
    "kotlin",
    "scala",
    "html",
    "css",
    "react",
    "angular",
    "vue",
    "node.js",
    "express",
    "next.js",
    "django",
    "flask",
    "spring boot",
    "spring",
    "hibernate",
    "asp.net",
    ".net",
    "laravel",
    "rails",
    "jquery",
    "bootstrap",
    "tailwind",
    "redux",
    "graphql",
    "rest api",
    "sql",
    "mysql",
    "postgresql",
    "oracle",
    "mongodb",
    "redis",
    "elasticsearch",
    "cassandra",
    "sqlite",
    "aws",
    "azure",
    "gcp",
    "docker",
    "kubernetes",
    "jenkins",
    "git",
    "terraform",
    "ansible",
    "linux",
    "ci/cd",
    "machine learning",
    "deep learning",
    "data science",
    "nlp",
    "pandas",
    "numpy",
    "tensorflow",
    "pytorch",
    "power bi",
    "tableau",
    "excel",
    "selenium",
    "jira",
    "agile",
    "scrum",
    "microservices",
    "kafka",
    "spark",
    "hadoop",
];

static SKILL_PATTERNS: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    SKILL_VOCABULARY
        .iter()
        .map(|term| {
            // Hand-rolled boundaries so c++, c# and .net still match
            let pattern = format!(
                r"(?i)(?:^|[^A-Za-z0-9+#.]){}(?:$|[^A-Za-z0-9+#])",
                regex::escape(term)
            );
            (*term, Regex::new(&pattern).unwrap())
        })
        .collect()
});

fn extract_skills(text: &str) -> String {
    let matched: Vec<&str> = SKILL_PATTERNS
        .iter()
        .filter(|(_, pattern)| pattern.is_match(text))
        .map(|(term, _)| *term)
        .collect();
    matched.join(", ")
}

// ============================================================================
// Experience
// ============================================================================

static TOTAL_EXP_LABELED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)total\s+(?:work\s+)?experience\s*[:\-]?\s*(\d+(?:\.\d+)?)\s*\+?\s*(?:years?|yrs?)?")
        .unwrap()
});
static TOTAL_EXP_PHRASED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*\+?\s*(?:years?|yrs?)\s+of\s+(?:total\s+)?experience")
        .unwrap()
});
static EXP_HEADING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*(?:work\s+|professional\s+|employment\s+)?(?:experience|history)\s*:?\s*$")
        .unwrap()
});
static OTHER_SECTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^\s*(?:education|academics?|technical\s+skills|skills?|projects?|certifications?|achievements?|awards?|references?|summary|objective|personal\s+details?|declaration|hobbies|interests)\s*:?\s*$",
    )
    .unwrap()
});
static YEAR_RANGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b((?:19|20)\d{2})\s*(?:-|–|—|to)\s*((?:19|20)\d{2}|present|current|till\s*date|now)")
        .unwrap()
});
static DURATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(\d+(?:\.\d+)?)\s*\+?\s*(?:years?|yrs?)\b").unwrap());

/// Four-tier fallback: explicit total, year-range arithmetic inside the
/// experience section, duration fragments inside it, nothing.
fn extract_experience(text: &str) -> String {
    if let Some(caps) = TOTAL_EXP_LABELED.captures(text) {
        return caps[1].to_string();
    }
    if let Some(caps) = TOTAL_EXP_PHRASED.captures(text) {
        return caps[1].to_string();
    }

    let section = experience_section(text);
    if section.is_empty() {
        return String::new();
    }

    let years = union_of_range_years(&section);
    if years > 0 {
        return years.to_string();
    }

    let total = sum_of_durations(&section);
    if total > 0.0 {
        return if total.fract() == 0.0 {
            format!("{}", total as i64)
        } else {
            format!("{}", total)
        };
    }

    String::new()
}

/// Lines between an experience heading and the next other-section heading.
fn experience_section(text: &str) -> String {
    let mut inside = false;
    let mut collected = Vec::new();
    for line in text.lines() {
        if EXP_HEADING.is_match(line) {
            inside = true;
            continue;
        }
        if inside && OTHER_SECTION.is_match(line) {
            break;
        }
        if inside {
            collected.push(line);
        }
    }
    collected.join("\n")
}

/// Count distinct calendar years covered by any range, half-open [start, end).
/// Present/current/now resolve to the current year. Bounds: start in
/// (1960, current year], spans under 40 years. A same-year stint counts one.
fn union_of_range_years(section: &str) -> usize {
    let current_year = Utc::now().year();
    let mut covered: HashSet<i32> = HashSet::new();

    for caps in YEAR_RANGE.captures_iter(section) {
        let start: i32 = match caps[1].parse() {
            Ok(y) => y,
            Err(_) => continue,
        };
        let end: i32 = caps[2]
            .parse()
            .unwrap_or(current_year);

        if start <= 1960 || start > current_year {
            continue;
        }
        if end < start || end - start >= 40 {
            continue;
        }
        if end == start {
            covered.insert(start);
        } else {
            covered.extend(start..end);
        }
    }

    covered.len()
}

fn sum_of_durations(section: &str) -> f64 {
    DURATION
        .captures_iter(section)
        .filter_map(|caps| caps[1].parse::<f64>().ok())
        .sum()
}

// ============================================================================
// Education
// ============================================================================

static DEGREE_HIERARCHY: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    // Ranked highest first; M.E and B.E stay case-sensitive so the English
    // words "me" and "be" never match
    let patterns: &[(&str, &str)] = &[
        (r"(?i)\bph\.?\s*d\b|(?i)\bdoctorate\b", "PhD"),
        (r"(?i)\bm\.?\s*tech\b", "M.Tech"),
        (r"\bM\.?\s*E\b", "M.E"),
        (r"(?i)\bm\.?b\.?a\b", "MBA"),
        (r"(?i)\bm\.?c\.?a\b", "MCA"),
        (r"(?i)\bm\.?\s*sc\b", "M.Sc"),
        (r"(?i)\bm\.?\s*com\b", "M.Com"),
        (r"(?i)\bmasters?\b|(?i)\bmaster\s+of\b", "Master's Degree"),
        (r"(?i)\bb\.?\s*tech\b", "B.Tech"),
        (r"\bB\.?\s*E\b", "B.E"),
        (r"(?i)\bb\.?c\.?a\b", "BCA"),
        (r"(?i)\bb\.?b\.?a\b", "BBA"),
        (r"(?i)\bb\.?\s*sc\b", "B.Sc"),
        (r"(?i)\bb\.?\s*com\b", "B.Com"),
        (r"(?i)\bbachelors?\b|(?i)\bbachelor\s+of\b", "Bachelor's Degree"),
    ];
    patterns
        .iter()
        .map(|(pattern, label)| (Regex::new(pattern).unwrap(), *label))
        .collect()
});

const LABEL_DELIMITERS: &[char] = &[',', '|', '(', ';'];
const MAX_EDUCATION_LABEL: usize = 40;

/// First hierarchy match wins; the containing line is trimmed down to a short
/// label, falling back to the generic hierarchy label when too long.
fn extract_education(text: &str) -> String {
    for (pattern, generic_label) in DEGREE_HIERARCHY.iter() {
        for line in text.lines() {
            if let Some(m) = pattern.find(line) {
                let label = trim_education_label(&line[m.start()..]);
                if label.is_empty() || label.len() > MAX_EDUCATION_LABEL {
                    return generic_label.to_string();
                }
                return label;
            }
        }
    }
    String::new()
}

// Case-insensitive match on the original bytes; indexing a lowercased copy
// would misalign on characters whose lowercase form has a different length
static LABEL_STOPWORDS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i) (?:from|at|with|-) ").unwrap());

fn trim_education_label(fragment: &str) -> String {
    let mut label = fragment;
    if let Some(idx) = label.find(LABEL_DELIMITERS) {
        label = &label[..idx];
    }
    if let Some(m) = LABEL_STOPWORDS.find(label) {
        label = &label[..m.start()];
    }
    label.trim().trim_end_matches('.').trim().to_string()
}

// ============================================================================
// Current company / location
// ============================================================================

static CURRENT_COMPANY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:currently\s+working\s+(?:at|with|in)|employed\s+(?:at|with))\s+([A-Za-z0-9&.' \-]{2,60})")
        .unwrap()
});

static COMPANY_TRAILERS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i) (?:as|since|for|in) ").unwrap());

fn extract_current_company(text: &str) -> String {
    let Some(caps) = CURRENT_COMPANY.captures(text) else {
        return String::new();
    };
    let raw = caps[1].to_string();
    let mut company = raw.as_str();
    if let Some(m) = COMPANY_TRAILERS.find(company) {
        company = &company[..m.start()];
    }
    if let Some(idx) = company.find(&['.', '\n'][..]) {
        company = &company[..idx];
    }
    company.trim().to_string()
}

/// City list doubles as canonical casing; multi-word entries come before
/// their substrings (New Delhi before Delhi).
const INDIAN_CITIES: &[&str] = &[
    "Mumbai",
    "New Delhi",
    "Delhi",
    "Bangalore",
    "Bengaluru",
    "Hyderabad",
    "Chennai",
    "Kolkata",
    "Pune",
    "Ahmedabad",
    "Jaipur",
    "Surat",
    "Lucknow",
    "Kanpur",
    "Nagpur",
    "Indore",
    "Bhopal",
    "Patna",
    "Vadodara",
    "Ghaziabad",
    "Ludhiana",
    "Agra",
    "Nashik",
    "Faridabad",
    "Meerut",
    "Rajkot",
    "Varanasi",
    "Srinagar",
    "Amritsar",
    "Prayagraj",
    "Allahabad",
    "Ranchi",
    "Coimbatore",
    "Jabalpur",
    "Gwalior",
    "Vijayawada",
    "Jodhpur",
    "Madurai",
    "Raipur",
    "Kochi",
    "Chandigarh",
    "Guwahati",
    "Thiruvananthapuram",
    "Mysore",
    "Mysuru",
    "Bhubaneswar",
    "Visakhapatnam",
    "Noida",
    "Gurgaon",
    "Gurugram",
    "Mangalore",
    "Dehradun",
];

static CITY_PATTERNS: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    INDIAN_CITIES
        .iter()
        .map(|city| {
            let pattern = format!(r"(?i)\b{}\b", regex::escape(city));
            (*city, Regex::new(&pattern).unwrap())
        })
        .collect()
});

/// Earliest city mention in the text wins, not list order; a resume usually
/// leads with its contact block, while colleges and past employers mention
/// other cities further down.
fn extract_current_location(text: &str) -> String {
    CITY_PATTERNS
        .iter()
        .enumerate()
        .filter_map(|(rank, (city, pattern))| {
            pattern.find(text).map(|m| (m.start(), rank, *city))
        })
        .min_by_key(|(start, rank, _)| (*start, *rank))
        .map(|(_, _, city)| city.to_string())
        .unwrap_or_default()
}

// ============================================================================
// Tests
// ============================================================================
