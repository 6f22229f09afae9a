//! # Identity Newtypes
//!
//! Identifier newtypes for records and for the Indian statutory registration
//! numbers carried on a client profile. Record identifiers ([`ClientId`],
//! [`TaskId`]) are opaque strings issued by the backend. Statutory numbers
//! ([`Pan`], [`Tan`], [`Gstin`], [`Cin`]) validate format at construction.
//!
//! ## Formats
//!
//! - PAN: income-tax Permanent Account Number, `AAAAA9999A`
//! - TAN: TDS deductor account number, `AAAA99999A`
//! - GSTIN: 15 characters, state code + PAN + entity code + `Z` + checksum
//! - CIN: MCA Corporate Identity Number, 21 characters

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ValidationError;

// ---------------------------------------------------------------------------
// Record identifiers
// ---------------------------------------------------------------------------

/// Accepts either a JSON string or an integer id. Backends in the wild hand
/// out both.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Int(i64),
}

impl From<RawId> for String {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Text(s) => s,
            RawId::Int(n) => n.to_string(),
        }
    }
}

macro_rules! record_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap a backend-issued identifier.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Access the identifier string.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                RawId::deserialize(deserializer).map(|raw| Self(raw.into()))
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }
    };
}

record_id!(
    /// Identifier of a client (a company or firm whose compliance is managed).
    ClientId
);

record_id!(
    /// Identifier of a compliance task.
    TaskId
);

record_id!(
    /// Identifier of a comment posted on a task.
    CommentId
);

record_id!(
    /// Identifier of a document attached to a task.
    DocumentId
);

// ---------------------------------------------------------------------------
// Statutory registration numbers
// ---------------------------------------------------------------------------

const GSTIN_ALPHABET: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

fn all_upper(s: &str) -> bool {
    s.chars().all(|c| c.is_ascii_uppercase())
}

fn all_digits(s: &str) -> bool {
    s.chars().all(|c| c.is_ascii_digit())
}

fn normalize(value: impl Into<String>) -> String {
    value.into().trim().to_ascii_uppercase()
}

fn is_pan(s: &str) -> bool {
    s.len() == 10 && s.is_ascii() && all_upper(&s[..5]) && all_digits(&s[5..9]) && all_upper(&s[9..])
}

/// Permanent Account Number issued by the Income Tax Department.
///
/// Input is trimmed and upper-cased before validation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Pan(String);

impl Pan {
    /// Validate and wrap a PAN.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidPan`] unless the value is five
    /// letters, four digits, and a trailing letter.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let s = normalize(value);
        if !is_pan(&s) {
            return Err(ValidationError::InvalidPan(s));
        }
        Ok(Self(s))
    }

    /// Access the PAN string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The fourth character encodes the holder category (`C` company,
    /// `F` firm/LLP, `P` individual, ...).
    pub fn holder_category(&self) -> char {
        self.0.as_bytes()[3] as char
    }
}

/// Tax Deduction and Collection Account Number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Tan(String);

impl Tan {
    /// Validate and wrap a TAN.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidTan`] unless the value is four
    /// letters, five digits, and a trailing letter.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let s = normalize(value);
        let ok = s.len() == 10
            && s.is_ascii()
            && all_upper(&s[..4])
            && all_digits(&s[4..9])
            && all_upper(&s[9..]);
        if !ok {
            return Err(ValidationError::InvalidTan(s));
        }
        Ok(Self(s))
    }

    /// Access the TAN string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// GST Identification Number.
///
/// Layout: 2-digit state code, the holder's PAN, an entity code
/// (`1`-`9` or `A`-`Z`), the literal `Z`, and a mod-36 check character.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Gstin(String);

impl Gstin {
    /// Validate and wrap a GSTIN, including its check character.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidGstin`] on any layout or checksum
    /// mismatch.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let s = normalize(value);
        let layout_ok = s.len() == 15
            && s.is_ascii()
            && all_digits(&s[..2])
            && is_pan(&s[2..12])
            && s.as_bytes()[12].is_ascii_alphanumeric()
            && s.as_bytes()[12] != b'0'
            && s.as_bytes()[13] == b'Z'
            && s.as_bytes()[14].is_ascii_alphanumeric();
        if !layout_ok || gstin_check_char(&s[..14]) != Some(s.as_bytes()[14]) {
            return Err(ValidationError::InvalidGstin(s));
        }
        Ok(Self(s))
    }

    /// Access the GSTIN string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Two-digit state code prefix.
    pub fn state_code(&self) -> &str {
        &self.0[..2]
    }

    /// The PAN embedded at positions 3-12.
    pub fn pan(&self) -> Pan {
        Pan(self.0[2..12].to_string())
    }
}

/// Compute the GSTIN check character over the first 14 characters.
fn gstin_check_char(body: &str) -> Option<u8> {
    let mut sum = 0u32;
    for (i, b) in body.bytes().enumerate() {
        let value = GSTIN_ALPHABET.iter().position(|&c| c == b)? as u32;
        let factor = if i % 2 == 0 { 1 } else { 2 };
        let product = value * factor;
        sum += product / 36 + product % 36;
    }
    let check = (36 - sum % 36) % 36;
    Some(GSTIN_ALPHABET[check as usize])
}

/// Corporate Identity Number issued by the Ministry of Corporate Affairs.
///
/// Layout: listing flag (`L`/`U`), 5-digit industry code, 2-letter state,
/// 4-digit incorporation year, 3-letter company class, 6-digit registration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Cin(String);

impl Cin {
    /// Validate and wrap a CIN.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidCin`] on any layout mismatch.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let s = normalize(value);
        let ok = s.len() == 21
            && s.is_ascii()
            && matches!(s.as_bytes()[0], b'L' | b'U')
            && all_digits(&s[1..6])
            && all_upper(&s[6..8])
            && all_digits(&s[8..12])
            && all_upper(&s[12..15])
            && all_digits(&s[15..]);
        if !ok {
            return Err(ValidationError::InvalidCin(s));
        }
        Ok(Self(s))
    }

    /// Access the CIN string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the company is listed on a stock exchange.
    pub fn is_listed(&self) -> bool {
        self.0.starts_with('L')
    }

    /// Year of incorporation.
    pub fn incorporation_year(&self) -> u16 {
        self.0[8..12].parse().unwrap_or_default()
    }
}

macro_rules! string_conversions {
    ($($name:ident),*) => {$(
        impl TryFrom<String> for $name {
            type Error = ValidationError;
            fn try_from(s: String) -> Result<Self, Self::Error> {
                Self::new(s)
            }
        }

        impl From<$name> for String {
            fn from(v: $name) -> String {
                v.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }
    )*};
}

string_conversions!(Pan, Tan, Gstin, Cin);

#[cfg(test)]
mod tests {
    use super::*;

    // -- Record ids --

    #[test]
    fn client_id_accepts_string_and_integer_json() {
        let a: ClientId = serde_json::from_str("\"c-42\"").unwrap();
        let b: ClientId = serde_json::from_str("42").unwrap();
        assert_eq!(a.as_str(), "c-42");
        assert_eq!(b.as_str(), "42");
        assert_eq!(serde_json::to_string(&b).unwrap(), "\"42\"");
    }

    // -- PAN --

    #[test]
    fn pan_valid_and_normalized() {
        let pan = Pan::new(" aabct1332l ").unwrap();
        assert_eq!(pan.as_str(), "AABCT1332L");
        assert_eq!(pan.holder_category(), 'C');
    }

    #[test]
    fn pan_rejects_bad_layout() {
        assert!(Pan::new("").is_err());
        assert!(Pan::new("AABC1332LL").is_err());
        assert!(Pan::new("AABCT1332").is_err());
        assert!(Pan::new("AABCT13321").is_err());
    }

    // -- TAN --

    #[test]
    fn tan_valid() {
        assert!(Tan::new("MUMA12345B").is_ok());
        assert!(Tan::new("MUM123456B").is_err());
    }

    // -- GSTIN --

    #[test]
    fn gstin_valid_checksum() {
        let g = Gstin::new("27AAPFU0939F1ZV").unwrap();
        assert_eq!(g.state_code(), "27");
        assert_eq!(g.pan().as_str(), "AAPFU0939F");
        assert!(Gstin::new("29AABCT1332L1ZA").is_ok());
    }

    #[test]
    fn gstin_rejects_wrong_checksum() {
        assert!(matches!(
            Gstin::new("27AAPFU0939F1ZW"),
            Err(ValidationError::InvalidGstin(_))
        ));
    }

    #[test]
    fn gstin_rejects_missing_z() {
        assert!(Gstin::new("27AAPFU0939F1YV").is_err());
        assert!(Gstin::new("27AAPFU0939F").is_err());
    }

    // -- CIN --

    #[test]
    fn cin_valid() {
        let cin = Cin::new("U72900KA2019PTC123456").unwrap();
        assert!(!cin.is_listed());
        assert_eq!(cin.incorporation_year(), 2019);
    }

    #[test]
    fn cin_rejects_bad_layout() {
        assert!(Cin::new("X72900KA2019PTC123456").is_err());
        assert!(Cin::new("U72900KA2019PTC12345").is_err());
        assert!(Cin::new("U7290AKA2019PTC123456").is_err());
    }

    #[test]
    fn statutory_ids_deserialize_with_validation() {
        let pan: Pan = serde_json::from_str("\"AABCT1332L\"").unwrap();
        assert_eq!(pan.to_string(), "AABCT1332L");
        assert!(serde_json::from_str::<Pan>("\"nope\"").is_err());
    }
}
