//! # Client Records
//!
//! A client is a business whose statutory compliance the practice manages.
//! Tax registration numbers are held as plain optional strings on the wire
//! record; [`NewClient::validate`] and [`ClientPatch::validate`] check them
//! against the typed identifiers before anything is sent to the backend.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::identity::{Cin, ClientId, Gstin, Pan, Tan};

/// Legal constitution of a client business.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClientType {
    /// Private limited company.
    #[serde(rename = "Pvt Ltd", alias = "pvt_ltd", alias = "Private Limited")]
    PvtLtd,
    /// Limited liability partnership.
    #[serde(rename = "LLP", alias = "llp")]
    Llp,
    /// One person company.
    #[serde(rename = "OPC", alias = "opc")]
    Opc,
    /// General partnership firm.
    #[serde(rename = "Partnership", alias = "partnership")]
    Partnership,
    /// Sole proprietorship.
    #[serde(rename = "Proprietorship", alias = "proprietorship")]
    Proprietorship,
}

impl ClientType {
    /// All client types, in form display order.
    pub fn all() -> &'static [ClientType] {
        &[
            Self::PvtLtd,
            Self::Llp,
            Self::Opc,
            Self::Partnership,
            Self::Proprietorship,
        ]
    }

    /// Display label, identical to the wire value.
    pub fn label(&self) -> &'static str {
        match self {
            Self::PvtLtd => "Pvt Ltd",
            Self::Llp => "LLP",
            Self::Opc => "OPC",
            Self::Partnership => "Partnership",
            Self::Proprietorship => "Proprietorship",
        }
    }

    /// Only companies registered with the MCA carry a CIN.
    pub fn has_cin(&self) -> bool {
        matches!(self, Self::PvtLtd | Self::Opc)
    }
}

impl std::fmt::Display for ClientType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for ClientType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match key.as_str() {
            "pvtltd" | "privatelimited" => Ok(Self::PvtLtd),
            "llp" => Ok(Self::Llp),
            "opc" => Ok(Self::Opc),
            "partnership" => Ok(Self::Partnership),
            "proprietorship" => Ok(Self::Proprietorship),
            _ => Err(ValidationError::UnknownVariant {
                field: "client type",
                value: s.to_string(),
            }),
        }
    }
}

/// Whether the practice is actively servicing the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClientStatus {
    /// Engagement is live.
    #[default]
    Active,
    /// Engagement is paused or ended.
    Inactive,
}

impl std::str::FromStr for ClientStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            _ => Err(ValidationError::UnknownVariant {
                field: "client status",
                value: s.to_string(),
            }),
        }
    }
}

/// Client as held by the store and returned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: ClientId,
    pub name: String,
    #[serde(rename = "type")]
    pub client_type: ClientType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pan: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gst: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tan: Option<String>,
    #[serde(default)]
    pub status: ClientStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
}

impl Client {
    /// Build a local record from a creation request.
    pub fn from_new(id: ClientId, new: NewClient, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            name: new.name,
            client_type: new.client_type,
            pan: new.pan,
            cin: new.cin,
            gst: new.gst,
            tan: new.tan,
            status: new.status,
            created_at,
            logo: new.logo,
        }
    }

    /// Apply a partial update in place. Absent fields are left untouched.
    pub fn apply(&mut self, patch: &ClientPatch) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(t) = patch.client_type {
            self.client_type = t;
        }
        if let Some(pan) = &patch.pan {
            self.pan = Some(pan.clone());
        }
        if let Some(cin) = &patch.cin {
            self.cin = Some(cin.clone());
        }
        if let Some(gst) = &patch.gst {
            self.gst = Some(gst.clone());
        }
        if let Some(tan) = &patch.tan {
            self.tan = Some(tan.clone());
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(logo) = &patch.logo {
            self.logo = Some(logo.clone());
        }
    }

    /// Check registrations that depend on each other: a GSTIN must embed
    /// the client's PAN. Run this on the merged record after [`apply`],
    /// since a patch may carry only one of the pair.
    ///
    /// [`apply`]: Client::apply
    pub fn validate_registrations(&self) -> Result<(), ValidationError> {
        check_gstin_embeds_pan(self.pan.as_deref(), self.gst.as_deref())
    }

    /// Whether the engagement is live.
    pub fn is_active(&self) -> bool {
        self.status == ClientStatus::Active
    }
}

/// Client creation form / request body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewClient {
    pub name: String,
    #[serde(rename = "type")]
    pub client_type: ClientType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pan: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gst: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tan: Option<String>,
    #[serde(default)]
    pub status: ClientStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
}

impl NewClient {
    /// Minimal creation request: a name and a constitution.
    pub fn new(name: impl Into<String>, client_type: ClientType) -> Self {
        Self {
            name: name.into(),
            client_type,
            pan: None,
            cin: None,
            gst: None,
            tan: None,
            status: ClientStatus::Active,
            logo: None,
        }
    }

    /// Check the name and any registration numbers present.
    ///
    /// Registration numbers are normalised (trimmed, upper-cased) in place
    /// when valid. Empty strings are treated as absent.
    pub fn validate(&mut self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyField("name"));
        }
        self.name = self.name.trim().to_string();
        normalize_registrations(&mut self.pan, &mut self.cin, &mut self.gst, &mut self.tan)
    }
}

/// Partial update for a client. `None` means "leave unchanged".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub client_type: Option<ClientType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pan: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gst: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tan: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ClientStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
}

impl ClientPatch {
    /// Whether the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Same checks as [`NewClient::validate`], restricted to present fields.
    pub fn validate(&mut self) -> Result<(), ValidationError> {
        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                return Err(ValidationError::EmptyField("name"));
            }
        }
        normalize_registrations(&mut self.pan, &mut self.cin, &mut self.gst, &mut self.tan)
    }
}

fn normalize_registrations(
    pan: &mut Option<String>,
    cin: &mut Option<String>,
    gst: &mut Option<String>,
    tan: &mut Option<String>,
) -> Result<(), ValidationError> {
    normalize_with(pan, |s| Pan::new(s).map(String::from))?;
    normalize_with(cin, |s| Cin::new(s).map(String::from))?;
    normalize_with(gst, |s| Gstin::new(s).map(String::from))?;
    normalize_with(tan, |s| Tan::new(s).map(String::from))?;
    check_gstin_embeds_pan(pan.as_deref(), gst.as_deref())
}

fn check_gstin_embeds_pan(pan: Option<&str>, gst: Option<&str>) -> Result<(), ValidationError> {
    match (pan, gst) {
        (Some(pan), Some(gst)) if gst.get(2..12) != Some(pan) => {
            Err(ValidationError::InvalidGstin(gst.to_string()))
        }
        _ => Ok(()),
    }
}

fn normalize_with(
    field: &mut Option<String>,
    check: impl FnOnce(&str) -> Result<String, ValidationError>,
) -> Result<(), ValidationError> {
    match field.as_deref().map(str::trim) {
        None => Ok(()),
        Some("") => {
            *field = None;
            Ok(())
        }
        Some(raw) => {
            *field = Some(check(raw)?);
            Ok(())
        }
    }
}
