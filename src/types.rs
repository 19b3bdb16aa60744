//! Type-safe enums shared by the manifest, the Setting Store and the pages
//!
//! Manifests spell these as lowercase strings; strum gives the same spelling
//! for `Display`/`FromStr` so values survive a round trip through the UI.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// How free text typed into an input page is checked and canonicalized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ValidationKind {
    /// Pass-through
    #[default]
    Plain,
    /// Base-10 integer
    Integer,
    /// yes/y/no/n, canonicalized to yes or no
    YesOrNo,
    /// Digits only, prefixed with the country code
    PhoneNumber,
}

impl ValidationKind {
    /// Hint shown under the input box
    pub fn hint(&self) -> &'static str {
        match self {
            Self::Plain => "",
            Self::Integer => "whole number",
            Self::YesOrNo => "yes or no",
            Self::PhoneNumber => "phone number, digits are kept",
        }
    }
}

/// Declared type of a setting; controls quoting in the variables file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SettingType {
    #[default]
    String,
    #[serde(alias = "number")]
    #[strum(to_string = "integer", serialize = "number")]
    Integer,
    #[serde(alias = "bool")]
    #[strum(to_string = "boolean", serialize = "bool")]
    Boolean,
    List,
}

impl SettingType {
    /// Values of this type are written quoted
    pub fn is_quoted(&self) -> bool {
        matches!(self, Self::String)
    }
}

/// Product whose regions the region picker lists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RegionType {
    #[default]
    Compute,
    Run,
    Functions,
}
