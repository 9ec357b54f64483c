use crate::config::ServiceConfig;
use crate::domain::{Credentials, FileDigest, SignedRequest, UploadBody, UploadTarget};
use crate::errors::UploadError;
use crate::ports::SigningClock;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use hmac::{Hmac, Mac};
use reqwest::header::{
    ACCEPT, AUTHORIZATION, CONTENT_LENGTH, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue,
};
use reqwest::{Method, Url};
use sha1::Sha1;
use std::sync::Arc;
use tracing::debug;

type HmacSha1 = Hmac<Sha1>;

pub const CONTENT_MD5: HeaderName = HeaderName::from_static("content-md5");
pub const X_SMUG_RESPONSE_TYPE: HeaderName = HeaderName::from_static("x-smug-responsetype");
pub const X_SMUG_ALBUM_URI: HeaderName = HeaderName::from_static("x-smug-albumuri");
pub const X_SMUG_VERSION: HeaderName = HeaderName::from_static("x-smug-version");
pub const X_SMUG_FILENAME: HeaderName = HeaderName::from_static("x-smug-filename");

const DEFAULT_MEDIA_TYPE: &str = "application/octet-stream";
const ALBUM_URI_PREFIX: &str = "/api/v2/album/";
const API_VERSION: &str = "v2";
const SIGNATURE_METHOD: &str = "HMAC-SHA1";
const OAUTH_VERSION: &str = "1.0";

/// Builds signed upload requests for the configured endpoint.
pub struct RequestSigner {
    config: ServiceConfig,
    clock: Arc<dyn SigningClock>,
}

impl RequestSigner {
    pub fn new(config: ServiceConfig, clock: Arc<dyn SigningClock>) -> Self {
        Self { config, clock }
    }

    /// Build the headers and OAuth `Authorization` for uploading `target`.
    ///
    /// `Content-Length` and `Content-MD5` come straight from `digest`, and the
    /// body is limited to `digest.size_bytes`, so the request describes exactly
    /// the bytes that were hashed.
    ///
    /// # Errors
    ///
    /// Returns `UploadError::Signing` if the path has no file name, a header
    /// value cannot be represented, or the upload URL is invalid.
    pub fn sign(
        &self,
        credentials: &Credentials,
        target: &UploadTarget,
        digest: &FileDigest,
    ) -> Result<SignedRequest, UploadError> {
        let file_name = target
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| {
                UploadError::Signing(format!(
                    "'{}' does not name a file",
                    target.path.display()
                ))
            })?;

        let mut headers = HeaderMap::new();
        for (key, value) in &self.config.base_headers {
            let name = HeaderName::from_bytes(key.as_bytes()).map_err(|e| {
                UploadError::Signing(format!("invalid base header name '{key}': {e}"))
            })?;
            headers.insert(name, header_value(key, value)?);
        }

        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(
            CONTENT_TYPE,
            header_value("Content-Type", &media_type(&file_name))?,
        );
        headers.insert(CONTENT_MD5, header_value("Content-MD5", &digest.md5_hex)?);
        headers.insert(CONTENT_LENGTH, HeaderValue::from(digest.size_bytes));
        headers.insert(X_SMUG_RESPONSE_TYPE, HeaderValue::from_static("JSON"));
        headers.insert(
            X_SMUG_ALBUM_URI,
            header_value(
                "X-Smug-AlbumUri",
                &format!("{ALBUM_URI_PREFIX}{}", target.album_key),
            )?,
        );
        headers.insert(X_SMUG_VERSION, HeaderValue::from_static(API_VERSION));
        headers.insert(X_SMUG_FILENAME, header_value("X-Smug-Filename", &file_name)?);

        let authorization = self.authorization_header(&Method::POST, credentials)?;
        headers.insert(AUTHORIZATION, header_value("Authorization", &authorization)?);

        debug!(
            file = %target.path.display(),
            album = %target.album_key,
            md5 = %digest.md5_hex,
            size = digest.size_bytes,
            "signed upload request"
        );

        Ok(SignedRequest {
            method: Method::POST,
            url: self.config.upload_url.clone(),
            headers,
            body: UploadBody {
                path: target.path.clone(),
                content_length: digest.size_bytes,
            },
        })
    }

    /// OAuth 1.0 `Authorization` value for a request with no extra parameters.
    fn authorization_header(
        &self,
        method: &Method,
        credentials: &Credentials,
    ) -> Result<String, UploadError> {
        let mut oauth_params = vec![
            ("oauth_consumer_key".to_string(), self.config.consumer_key.clone()),
            ("oauth_nonce".to_string(), self.clock.nonce()),
            (
                "oauth_signature_method".to_string(),
                SIGNATURE_METHOD.to_string(),
            ),
            ("oauth_timestamp".to_string(), self.clock.timestamp().to_string()),
            ("oauth_token".to_string(), credentials.token.clone()),
            ("oauth_version".to_string(), OAUTH_VERSION.to_string()),
        ];

        let signature = oauth_signature(
            method.as_str(),
            &self.config.upload_url,
            &oauth_params,
            &self.config.consumer_secret,
            &credentials.secret,
        )?;
        oauth_params.push(("oauth_signature".to_string(), signature));
        oauth_params.sort();

        let fields: Vec<String> = oauth_params
            .iter()
            .map(|(k, v)| format!("{}=\"{}\"", encode(k), encode(v)))
            .collect();
        Ok(format!("OAuth {}", fields.join(", ")))
    }
}

fn header_value(name: &str, value: &str) -> Result<HeaderValue, UploadError> {
    HeaderValue::from_bytes(value.as_bytes())
        .map_err(|_| UploadError::Signing(format!("value for header {name} is not valid: {value:?}")))
}

/// Content-Type for a file name, by extension.
pub fn media_type(file_name: &str) -> String {
    mime_guess::from_path(file_name)
        .first_raw()
        .unwrap_or(DEFAULT_MEDIA_TYPE)
        .to_string()
}

fn encode(s: &str) -> String {
    urlencoding::encode(s).into_owned()
}

/// Scheme and host lower-cased, default port dropped, query and fragment removed.
fn base_string_uri(url: &str) -> Result<String, UploadError> {
    let parsed =
        Url::parse(url).map_err(|e| UploadError::Signing(format!("invalid url '{url}': {e}")))?;
    let host = parsed
        .host_str()
        .ok_or_else(|| UploadError::Signing(format!("url '{url}' has no host")))?;
    let port = parsed.port().map(|p| format!(":{p}")).unwrap_or_default();
    Ok(format!(
        "{}://{}{}{}",
        parsed.scheme(),
        host.to_ascii_lowercase(),
        port,
        parsed.path()
    ))
}

/// Signature base string: method, base URI and the normalized, sorted parameters.
pub fn signature_base_string(
    method: &str,
    url: &str,
    params: &[(String, String)],
) -> Result<String, UploadError> {
    let mut encoded: Vec<(String, String)> =
        params.iter().map(|(k, v)| (encode(k), encode(v))).collect();
    encoded.sort();
    let normalized = encoded
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");

    Ok(format!(
        "{}&{}&{}",
        method.to_ascii_uppercase(),
        encode(&base_string_uri(url)?),
        encode(&normalized)
    ))
}

/// HMAC-SHA1 signature, base64 encoded, over the signature base string.
pub fn oauth_signature(
    method: &str,
    url: &str,
    params: &[(String, String)],
    consumer_secret: &str,
    token_secret: &str,
) -> Result<String, UploadError> {
    let base = signature_base_string(method, url, params)?;
    let key = format!("{}&{}", encode(consumer_secret), encode(token_secret));

    let mut mac = HmacSha1::new_from_slice(key.as_bytes())
        .map_err(|e| UploadError::Signing(format!("signing key rejected: {e}")))?;
    mac.update(base.as_bytes());
    Ok(STANDARD.encode(mac.finalize().into_bytes()))
}
