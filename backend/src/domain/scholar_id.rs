//! Scholar identifiers and the academic facts encoded in them.
//!
//! Identifiers come in two shapes. Alphanumeric ones carry a two-letter
//! branch code at positions 2..4 (`25EC10001`). Purely numeric ones carry a
//! single branch digit at position 3 (`2415062`). Both start with a two-digit
//! admission year code that maps to the student's current semester.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Longest identifier accepted at the API boundary.
pub const SCHOLAR_ID_MAX: usize = 32;

/// Validation errors for [`ScholarId`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ScholarIdValidationError {
    /// Nothing left after trimming.
    #[error("scholar id must not be empty")]
    Empty,
    /// Longer than [`SCHOLAR_ID_MAX`].
    #[error("scholar id must be at most {max} characters")]
    TooLong {
        /// Maximum permitted length.
        max: usize,
    },
    /// Contains something other than ASCII letters and digits.
    #[error("scholar id may only contain ASCII letters and digits")]
    InvalidCharacters,
}

/// Trimmed, ASCII alphanumeric student identifier.
///
/// Case is preserved; lookups decide whether to fold it.
///
/// # Examples
/// ```
/// use scholar_portal::domain::ScholarId;
///
/// let id = ScholarId::new(" 2415062 ").expect("valid id");
/// assert_eq!(id.as_str(), "2415062");
/// assert!(ScholarId::new("24-15").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ScholarId(String);

impl ScholarId {
    /// Validate and normalise a raw identifier.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, ScholarIdValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(ScholarIdValidationError::Empty);
        }
        if trimmed.chars().count() > SCHOLAR_ID_MAX {
            return Err(ScholarIdValidationError::TooLong {
                max: SCHOLAR_ID_MAX,
            });
        }
        if !trimmed.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(ScholarIdValidationError::InvalidCharacters);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the identifier text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Numeric value when the identifier is all digits.
    ///
    /// Leading zeros are ignored, so `"007"` and `"7"` share a value.
    #[must_use]
    pub fn numeric_value(&self) -> Option<u64> {
        if self.0.chars().all(|c| c.is_ascii_digit()) {
            self.0.parse().ok()
        } else {
            None
        }
    }
}

impl AsRef<str> for ScholarId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for ScholarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<ScholarId> for String {
    fn from(value: ScholarId) -> Self {
        value.0
    }
}

impl TryFrom<String> for ScholarId {
    type Error = ScholarIdValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Semester number, 1 through 8.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Semester(u8);

impl Semester {
    /// Highest semester in a four-year programme.
    pub const MAX: u8 = 8;

    /// Wrap a semester number, rejecting values outside 1..=8.
    #[must_use]
    pub fn new(value: u8) -> Option<Self> {
        (1..=Self::MAX).contains(&value).then_some(Self(value))
    }

    /// The semester number.
    #[must_use]
    pub fn get(self) -> u8 {
        self.0
    }
}

impl fmt::Display for Semester {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Academic branches the institute encodes in identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Branch {
    /// Civil engineering.
    #[serde(rename = "CE")]
    Civil,
    /// Mechanical engineering.
    #[serde(rename = "ME")]
    Mechanical,
    /// Electrical engineering.
    #[serde(rename = "EE")]
    Electrical,
    /// Electronics and communication engineering.
    #[serde(rename = "ECE")]
    ElectronicsCommunication,
    /// Electronics and instrumentation engineering.
    #[serde(rename = "EIE")]
    ElectronicsInstrumentation,
    /// Computer science and engineering.
    #[serde(rename = "CSE")]
    ComputerScience,
}

impl Branch {
    /// Every branch in catalogue order.
    pub const ALL: [Self; 6] = [
        Self::Civil,
        Self::Mechanical,
        Self::Electrical,
        Self::ElectronicsCommunication,
        Self::ElectronicsInstrumentation,
        Self::ComputerScience,
    ];

    /// Short name shown to students and used to key the course catalogue.
    #[must_use]
    pub fn short_name(self) -> &'static str {
        match self {
            Self::Civil => "CE",
            Self::Mechanical => "ME",
            Self::Electrical => "EE",
            Self::ElectronicsCommunication => "ECE",
            Self::ElectronicsInstrumentation => "EIE",
            Self::ComputerScience => "CSE",
        }
    }

    /// Numeric code used by numeric identifiers and the legacy catalogue.
    #[must_use]
    pub fn numeric_code(self) -> u8 {
        match self {
            Self::Civil => 1,
            Self::Mechanical => 2,
            Self::Electrical => 3,
            Self::ElectronicsCommunication => 4,
            Self::ElectronicsInstrumentation => 5,
            Self::ComputerScience => 6,
        }
    }

    /// Look a branch up by its short name, ignoring ASCII case.
    #[must_use]
    pub fn from_short_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|branch| branch.short_name().eq_ignore_ascii_case(name.trim()))
    }

    /// Branch for the two-letter code embedded in alphanumeric identifiers.
    #[must_use]
    pub fn from_letter_code(code: &str) -> Option<Self> {
        match code.to_ascii_uppercase().as_str() {
            "CE" => Some(Self::Civil),
            "ME" => Some(Self::Mechanical),
            "EE" => Some(Self::Electrical),
            "EC" => Some(Self::ElectronicsCommunication),
            "EI" => Some(Self::ElectronicsInstrumentation),
            "CS" => Some(Self::ComputerScience),
            _ => None,
        }
    }

    /// Branch for the digit embedded in numeric identifiers.
    #[must_use]
    pub fn from_digit(digit: char) -> Option<Self> {
        let value = digit.to_digit(10)?;
        Self::ALL
            .into_iter()
            .find(|branch| u32::from(branch.numeric_code()) == value)
    }
}

impl fmt::Display for Branch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

/// Current semester for an admission year code.
///
/// Only the four active intakes are known; anything else is `None`.
#[must_use]
pub fn semester_for_year_code(code: &str) -> Option<Semester> {
    let value = match code {
        "22" => 8,
        "23" => 6,
        "24" => 4,
        "25" => 2,
        _ => return None,
    };
    Semester::new(value)
}

/// Semester and branch derived from an identifier.
///
/// Either half is `None` when the identifier does not encode it in a known
/// way. Parsing never fails.
///
/// # Examples
/// ```
/// use scholar_portal::domain::{Branch, ScholarIdProfile};
///
/// let profile = ScholarIdProfile::parse("25EC10001");
/// assert_eq!(profile.branch, Some(Branch::ElectronicsCommunication));
/// assert_eq!(profile.semester.map(|s| s.get()), Some(2));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScholarIdProfile {
    /// Semester from the admission year code.
    pub semester: Option<Semester>,
    /// Branch from the embedded letter code or digit.
    pub branch: Option<Branch>,
}

impl ScholarIdProfile {
    /// Derive what the identifier encodes.
    #[must_use]
    pub fn parse(id: &str) -> Self {
        let id = id.trim();
        let semester = id.get(0..2).and_then(semester_for_year_code);
        let branch = letter_branch(id).or_else(|| digit_branch(id));
        Self { semester, branch }
    }
}

fn letter_branch(id: &str) -> Option<Branch> {
    let code = id.get(2..4)?;
    if !code.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    Branch::from_letter_code(code)
}

fn digit_branch(id: &str) -> Option<Branch> {
    if id.is_empty() || !id.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    id.chars().nth(3).and_then(Branch::from_digit)
}
