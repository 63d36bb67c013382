/*
[INPUT]:  Caller-supplied addresses, URIs and app metadata
[OUTPUT]: Validated, immutable mutation requests
[POS]:    Data layer - request payloads for state-mutating operations
[UPDATE]: When a new mutation is supported or request fields change
*/

use serde::{Deserialize, Serialize};
use url::Url;

use super::address::EvmAddress;
use super::enums::Platform;
use crate::http::ValidationError;

/// URI schemes accepted for metadata references
const ALLOWED_URI_SCHEMES: &[&str] = &["lens", "ipfs", "ar", "https", "http", "data"];

/// App metadata document, uploaded before `createApp`/`setAppMetadata`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppMetadata {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tagline: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub developer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    #[serde(default)]
    pub platforms: Vec<Platform>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub privacy_policy: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terms_of_service: Option<String>,
}

impl AppMetadata {
    /// Check required fields and every URI the document references
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::Empty {
                field: "name".to_string(),
            });
        }
        for (field, value) in [
            ("url", &self.url),
            ("logo", &self.logo),
            ("privacyPolicy", &self.privacy_policy),
            ("termsOfService", &self.terms_of_service),
        ] {
            if let Some(value) = value {
                validate_uri(value, field)?;
            }
        }
        Ok(())
    }
}

/// Check that `raw` is an absolute URI with a supported scheme
pub fn validate_uri(raw: &str, field: &str) -> Result<(), ValidationError> {
    let invalid = |reason: String| ValidationError::InvalidUri {
        field: field.to_string(),
        reason,
    };

    if raw.trim().is_empty() {
        return Err(ValidationError::Empty {
            field: field.to_string(),
        });
    }
    let url = Url::parse(raw).map_err(|e| invalid(e.to_string()))?;
    if !ALLOWED_URI_SCHEMES.contains(&url.scheme()) {
        return Err(invalid(format!("unsupported scheme `{}`", url.scheme())));
    }
    Ok(())
}

/// `createApp` request
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAppRequest {
    admins: Vec<EvmAddress>,
    metadata_uri: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    treasury: Option<EvmAddress>,
    #[serde(skip_serializing_if = "Option::is_none")]
    verification: Option<bool>,
}

impl CreateAppRequest {
    pub fn new<S: AsRef<str>>(
        admins: &[S],
        metadata_uri: &str,
        treasury: Option<&str>,
    ) -> Result<Self, ValidationError> {
        if admins.is_empty() {
            return Err(ValidationError::Empty {
                field: "admins".to_string(),
            });
        }
        let admins = admins
            .iter()
            .map(|admin| EvmAddress::parse_field(admin.as_ref(), "admins"))
            .collect::<Result<Vec<_>, _>>()?;
        validate_uri(metadata_uri, "metadataUri")?;
        let treasury = treasury
            .map(|raw| EvmAddress::parse_field(raw, "treasury"))
            .transpose()?;

        Ok(Self {
            admins,
            metadata_uri: metadata_uri.to_string(),
            treasury,
            verification: None,
        })
    }

    /// Enable or disable the app's verification requirement
    pub fn with_verification(mut self, enabled: bool) -> Self {
        self.verification = Some(enabled);
        self
    }

    pub fn admins(&self) -> &[EvmAddress] {
        &self.admins
    }

    pub fn metadata_uri(&self) -> &str {
        &self.metadata_uri
    }

    pub fn treasury(&self) -> Option<&EvmAddress> {
        self.treasury.as_ref()
    }
}

/// `setAppMetadata` request
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SetAppMetadataRequest {
    app: EvmAddress,
    metadata_uri: String,
}

impl SetAppMetadataRequest {
    pub fn new(app: &str, metadata_uri: &str) -> Result<Self, ValidationError> {
        let app = EvmAddress::parse_field(app, "app")?;
        validate_uri(metadata_uri, "metadataUri")?;
        Ok(Self {
            app,
            metadata_uri: metadata_uri.to_string(),
        })
    }

    pub fn app(&self) -> &EvmAddress {
        &self.app
    }

    pub fn metadata_uri(&self) -> &str {
        &self.metadata_uri
    }
}

/// One state-mutating intent
#[derive(Debug, Clone, PartialEq)]
pub enum OperationRequest {
    CreateApp(CreateAppRequest),
    SetAppMetadata(SetAppMetadataRequest),
}

impl OperationRequest {
    /// GraphQL root field of the mutation
    pub fn name(&self) -> &'static str {
        match self {
            OperationRequest::CreateApp(_) => "createApp",
            OperationRequest::SetAppMetadata(_) => "setAppMetadata",
        }
    }

    /// GraphQL variables: `{ "request": { ... } }`
    pub fn variables(&self) -> serde_json::Result<serde_json::Value> {
        let request = match self {
            OperationRequest::CreateApp(request) => serde_json::to_value(request)?,
            OperationRequest::SetAppMetadata(request) => serde_json::to_value(request)?,
        };
        Ok(serde_json::json!({ "request": request }))
    }
}

impl From<CreateAppRequest> for OperationRequest {
    fn from(request: CreateAppRequest) -> Self {
        OperationRequest::CreateApp(request)
    }
}

impl From<SetAppMetadataRequest> for OperationRequest {
    fn from(request: SetAppMetadataRequest) -> Self {
        OperationRequest::SetAppMetadata(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ADMIN: &str = "0x00399b4E7EdcF538cc4aD03c4FCfE366B65234a6";

    #[test]
    fn test_create_app_variables() {
        let request = CreateAppRequest::new(
            &[ADMIN],
            "lens://d8c04e484205f742775c8aca200ae03005b328c03f882408112b574190478404",
            Some(ADMIN),
        )
        .unwrap();
        let variables = OperationRequest::from(request).variables().unwrap();

        assert_eq!(
            variables,
            serde_json::json!({
                "request": {
                    "admins": [ADMIN],
                    "metadataUri": "lens://d8c04e484205f742775c8aca200ae03005b328c03f882408112b574190478404",
                    "treasury": ADMIN,
                }
            })
        );
    }

    #[test]
    fn test_create_app_rejects_bad_admin() {
        let err = CreateAppRequest::new(&["0x1234"], "ipfs://bafy", None).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidAddress { ref field, .. } if field == "admins"));
    }

    #[test]
    fn test_create_app_requires_admin() {
        let admins: [&str; 0] = [];
        let err = CreateAppRequest::new(&admins, "ipfs://bafy", None).unwrap_err();
        assert_eq!(err, ValidationError::Empty { field: "admins".into() });
    }

    #[test]
    fn test_uri_validation() {
        assert!(validate_uri("ipfs://bafkreianr76by3y6at65we7dm4c7mg6pgfbk4m5ihpqvxgbs6fbhc34fnm", "metadataUri").is_ok());
        assert!(validate_uri("data:application/json;base64,e30=", "metadataUri").is_ok());
        assert!(validate_uri("https://sf-web-ten.vercel.app/", "url").is_ok());
        assert!(matches!(
            validate_uri("not a uri", "metadataUri"),
            Err(ValidationError::InvalidUri { .. })
        ));
        assert!(matches!(
            validate_uri("ftp://example.com/meta.json", "metadataUri"),
            Err(ValidationError::InvalidUri { .. })
        ));
        assert!(matches!(validate_uri("  ", "metadataUri"), Err(ValidationError::Empty { .. })));
    }

    #[test]
    fn test_set_app_metadata_request() {
        let request = SetAppMetadataRequest::new(
            "0xb3855583511c5f02168a8784B8125D72BD97caB7",
            "lens://abc",
        )
        .unwrap();
        let op = OperationRequest::from(request);
        assert_eq!(op.name(), "setAppMetadata");
        assert_eq!(
            op.variables().unwrap()["request"]["app"],
            "0xb3855583511c5f02168a8784B8125D72BD97caB7"
        );
    }

    #[test]
    fn test_metadata_validation() {
        let metadata = AppMetadata {
            name: "Slice".into(),
            tagline: Some("Social platform built on Lens Protocol".into()),
            description: None,
            developer: Some("Slice Team".into()),
            url: Some("https://sf-web-ten.vercel.app/".into()),
            logo: None,
            platforms: vec![Platform::Web],
            privacy_policy: None,
            terms_of_service: None,
        };
        assert!(metadata.validate().is_ok());

        let json = serde_json::to_value(&metadata).unwrap();
        assert_eq!(json["platforms"], serde_json::json!(["WEB"]));
        assert!(json.get("logo").is_none());

        let unnamed = AppMetadata { name: " ".into(), ..metadata };
        assert!(unnamed.validate().is_err());
    }
}
