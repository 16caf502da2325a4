// Asset identity as stored in the trustlines table (assettype, assetcode, issuer)

use serde::{Deserialize, Serialize};

pub const ASSET_TYPE_NATIVE: i64 = 0;
pub const ASSET_TYPE_CREDIT_ALPHANUM4: i64 = 1;
pub const ASSET_TYPE_CREDIT_ALPHANUM12: i64 = 2;

/// Code reported for the native asset.
pub const NATIVE_CODE: &str = "XLM";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "AssetRecord", try_from = "AssetRecord")]
pub enum Asset {
    Native,
    CreditAlphanum4 { code: String, issuer: String },
    CreditAlphanum12 { code: String, issuer: String },
}

impl Asset {
    /// Build from the stored discriminant.
    ///
    /// Panics on an asset type the ledger schema does not define.
    pub fn from_stored(asset_type: i64, code: String, issuer: String) -> Self {
        match asset_type {
            ASSET_TYPE_NATIVE => Asset::Native,
            ASSET_TYPE_CREDIT_ALPHANUM4 => Asset::CreditAlphanum4 { code, issuer },
            ASSET_TYPE_CREDIT_ALPHANUM12 => Asset::CreditAlphanum12 { code, issuer },
            other => panic!("unknown asset type {} for {}:{}", other, code, issuer),
        }
    }

    pub fn code(&self) -> &str {
        match self {
            Asset::Native => NATIVE_CODE,
            Asset::CreditAlphanum4 { code, .. } | Asset::CreditAlphanum12 { code, .. } => code,
        }
    }

    pub fn issuer(&self) -> Option<&str> {
        match self {
            Asset::Native => None,
            Asset::CreditAlphanum4 { issuer, .. } | Asset::CreditAlphanum12 { issuer, .. } => {
                Some(issuer)
            }
        }
    }

    pub fn is_native(&self) -> bool {
        matches!(self, Asset::Native)
    }

    /// Stored discriminant (inverse of [`Asset::from_stored`]).
    pub fn asset_type(&self) -> i64 {
        match self {
            Asset::Native => ASSET_TYPE_NATIVE,
            Asset::CreditAlphanum4 { .. } => ASSET_TYPE_CREDIT_ALPHANUM4,
            Asset::CreditAlphanum12 { .. } => ASSET_TYPE_CREDIT_ALPHANUM12,
        }
    }
}

/// Wire shape of an asset: the stored discriminant plus code and issuer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AssetRecord {
    asset_type: i64,
    asset_code: String,
    issuer: Option<String>,
}

impl From<Asset> for AssetRecord {
    fn from(asset: Asset) -> Self {
        AssetRecord {
            asset_type: asset.asset_type(),
            asset_code: asset.code().to_string(),
            issuer: asset.issuer().map(str::to_string),
        }
    }
}

impl TryFrom<AssetRecord> for Asset {
    type Error = String;

    fn try_from(record: AssetRecord) -> Result<Self, String> {
        let AssetRecord { asset_type, asset_code: code, issuer } = record;
        if asset_type == ASSET_TYPE_NATIVE {
            return Ok(Asset::Native);
        }

        let issuer = issuer.ok_or_else(|| format!("asset {} has no issuer", code))?;
        match asset_type {
            ASSET_TYPE_CREDIT_ALPHANUM4 => Ok(Asset::CreditAlphanum4 { code, issuer }),
            ASSET_TYPE_CREDIT_ALPHANUM12 => Ok(Asset::CreditAlphanum12 { code, issuer }),
            other => Err(format!("unknown asset type {}", other)),
        }
    }
}
