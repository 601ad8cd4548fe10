use serde::{Deserialize, Serialize};

use wms_core::{DomainError, DomainResult, ValueObject};

/// A scanned or typed product code (SKU / barcode), trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScannedCode(String);

impl ScannedCode {
    pub fn parse(input: &str) -> DomainResult<Self> {
        let code = input.trim();
        if code.is_empty() {
            return Err(DomainError::validation("product code cannot be empty"));
        }
        if code.chars().any(char::is_control) {
            return Err(DomainError::validation("product code contains control characters"));
        }
        Ok(Self(code.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for ScannedCode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl ValueObject for ScannedCode {}
