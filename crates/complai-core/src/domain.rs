//! # Compliance Buckets
//!
//! A bucket is the regulatory category a task is filed under. The seven
//! statutory buckets are enumerated; anything else a practice uses (e.g.
//! "FEMA", "Professional Tax") is kept verbatim as [`ComplianceBucket::Other`].

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Regulatory category attached to a task.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ComplianceBucket {
    /// Goods and Services Tax returns (GSTR-1, GSTR-3B, annual returns).
    Gst,
    /// Tax deducted at source (quarterly returns, challans).
    Tds,
    /// Registrar of Companies filings (AOC-4, MGT-7, DIR-3 KYC).
    Roc,
    /// Provident Fund contributions and ECR filings.
    Pf,
    /// Employees' State Insurance contributions.
    Esi,
    /// Income tax returns and advance tax.
    IncomeTax,
    /// Labour law registers and returns.
    LabourLaw,
    /// Any other practice-defined category.
    Other(String),
}

impl ComplianceBucket {
    /// The statutory buckets, in display order.
    pub fn statutory() -> &'static [ComplianceBucket] {
        &[
            Self::Gst,
            Self::Tds,
            Self::Roc,
            Self::Pf,
            Self::Esi,
            Self::IncomeTax,
            Self::LabourLaw,
        ]
    }

    /// Display label, as shown on the dashboard and sent over the wire.
    pub fn label(&self) -> &str {
        match self {
            Self::Gst => "GST",
            Self::Tds => "TDS",
            Self::Roc => "ROC",
            Self::Pf => "PF",
            Self::Esi => "ESI",
            Self::IncomeTax => "Income Tax",
            Self::LabourLaw => "Labour Law",
            Self::Other(s) => s,
        }
    }

    /// Parse a label case-insensitively. Separators (`_`, `-`, spaces) are
    /// ignored, so `income_tax`, `Income-Tax` and `INCOME TAX` all match.
    pub fn parse(label: &str) -> Self {
        let key: String = label
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match key.as_str() {
            "gst" => Self::Gst,
            "tds" => Self::Tds,
            "roc" | "mca" => Self::Roc,
            "pf" | "epf" => Self::Pf,
            "esi" | "esic" => Self::Esi,
            "incometax" | "it" => Self::IncomeTax,
            "labourlaw" | "laborlaw" | "labour" => Self::LabourLaw,
            _ => Self::Other(label.trim().to_string()),
        }
    }

    /// Whether this is one of the seven statutory buckets.
    pub fn is_statutory(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl std::fmt::Display for ComplianceBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for ComplianceBucket {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for ComplianceBucket {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Self::parse(&s))
    }
}
