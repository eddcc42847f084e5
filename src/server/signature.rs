use axum::http::{HeaderMap, Method, Uri};
use axum::http::header::{AUTHORIZATION, DATE};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, Utc};
use rsa::pkcs1::DecodeRsaPublicKey;
use rsa::pkcs8::DecodePublicKey;
use rsa::{Pkcs1v15Sign, RsaPublicKey};
use sha2::{Digest, Sha256};
use std::path::Path;
use thiserror::Error;
use tracing::trace;

const REQUEST_TARGET: &str = "(request-target)";
const SUPPORTED_ALGORITHMS: [&str; 2] = ["rsa-sha256", "hs2019"];
const DIGEST: &str = "digest";
const MAX_CLOCK_SKEW_SECONDS: i64 = 300;

/// Verifies the HTTP signature SmartThings puts on every lifecycle request.
// Draft: https://datatracker.ietf.org/doc/html/draft-cavage-http-signatures-12
#[derive(Debug)]
pub struct HttpSignatureVerifier {
    key: RsaPublicKey,
}

impl HttpSignatureVerifier {
    /// Accepts both SPKI (`BEGIN PUBLIC KEY`) and PKCS#1 (`BEGIN RSA PUBLIC KEY`) encoded keys.
    pub fn from_pem(pem: &str) -> Result<Self, SignatureError> {
        let key = RsaPublicKey::from_public_key_pem(pem)
            .or_else(|_| RsaPublicKey::from_pkcs1_pem(pem))
            .map_err(|e| SignatureError::InvalidKey(e.to_string()))?;
        Ok(HttpSignatureVerifier { key })
    }

    pub async fn load(path: impl AsRef<Path>) -> Result<Self, SignatureError> {
        let path = path.as_ref();
        let pem = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| SignatureError::InvalidKey(format!("unable to read '{}': {}", path.display(), e)))?;
        Self::from_pem(&pem)
    }

    pub fn verify(&self, method: &Method, uri: &Uri, headers: &HeaderMap, body: &[u8]) -> Result<(), SignatureError> {
        self.verify_at(method, uri, headers, body, Utc::now())
    }

    /// Checks the signature, then that the signed request is fresh at `now` and matches `body`.
    fn verify_at(&self, method: &Method, uri: &Uri, headers: &HeaderMap, body: &[u8], now: DateTime<Utc>) -> Result<(), SignatureError> {
        let parameters = SignatureParameters::from_headers(headers)?;
        if let Some(algorithm) = parameters.algorithm.as_deref() {
            if !SUPPORTED_ALGORITHMS.contains(&algorithm.to_ascii_lowercase().as_str()) {
                return Err(SignatureError::UnsupportedAlgorithm(algorithm.to_string()));
            }
        }

        let signing_string = signing_string(&parameters.headers, method, uri, headers)?;
        trace!(key_id = ?parameters.key_id, %signing_string, "Verifying request signature");

        let signature = STANDARD.decode(&parameters.signature).map_err(|_| SignatureError::InvalidEncoding)?;
        let hashed = Sha256::digest(signing_string.as_bytes());
        self.key
            .verify(Pkcs1v15Sign::new::<Sha256>(), &hashed, &signature)
            .map_err(|_| SignatureError::Mismatch)?;

        check_date(headers, now)?;
        if parameters.headers.iter().any(|name| name == DIGEST) {
            check_digest(headers, body)?;
        }
        Ok(())
    }
}

fn check_date(headers: &HeaderMap, now: DateTime<Utc>) -> Result<(), SignatureError> {
    let Some(value) = headers.get(DATE) else {
        return Ok(());
    };

    let value = value.to_str().map_err(|_| SignatureError::InvalidDate)?;
    let date = DateTime::parse_from_rfc2822(value).map_err(|_| SignatureError::InvalidDate)?;
    let skew = now.signed_duration_since(date).num_seconds().abs();
    if skew > MAX_CLOCK_SKEW_SECONDS {
        return Err(SignatureError::Expired(value.to_string()));
    }
    Ok(())
}

/// The `Digest` header may list several algorithms, only SHA-256 is checked and it must be present.
fn check_digest(headers: &HeaderMap, body: &[u8]) -> Result<(), SignatureError> {
    let value = headers
        .get(DIGEST)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| SignatureError::MissingHeader(DIGEST.to_string()))?;

    let expected = STANDARD.encode(Sha256::digest(body));
    let found = value
        .split(',')
        .filter_map(|entry| entry.trim().split_once('='))
        .filter(|(algorithm, _)| algorithm.eq_ignore_ascii_case("SHA-256"))
        .any(|(_, digest)| digest.trim() == expected);

    if found { Ok(()) } else { Err(SignatureError::DigestMismatch) }
}

#[derive(Debug, PartialEq)]
struct SignatureParameters {
    key_id: Option<String>,
    algorithm: Option<String>,
    headers: Vec<String>,
    signature: String,
}

impl SignatureParameters {
    fn from_headers(headers: &HeaderMap) -> Result<Self, SignatureError> {
        if let Some(value) = headers.get(AUTHORIZATION) {
            let value = value.to_str().map_err(|_| SignatureError::Malformed)?;
            let (scheme, parameters) = value.split_once(' ').ok_or(SignatureError::Malformed)?;
            if !scheme.eq_ignore_ascii_case("Signature") {
                return Err(SignatureError::Missing);
            }
            return Self::parse(parameters);
        }

        match headers.get("signature") {
            Some(value) => Self::parse(value.to_str().map_err(|_| SignatureError::Malformed)?),
            None => Err(SignatureError::Missing),
        }
    }

    fn parse(parameters: &str) -> Result<Self, SignatureError> {
        let mut key_id = None;
        let mut algorithm = None;
        let mut headers = None;
        let mut signature = None;

        for parameter in parameters.split(',') {
            let (name, value) = parameter.trim().split_once('=').ok_or(SignatureError::Malformed)?;
            let value = value.trim().trim_matches('"').to_string();
            match name.trim() {
                "keyId" => key_id = Some(value),
                "algorithm" => algorithm = Some(value),
                "headers" => headers = Some(value),
                "signature" => signature = Some(value),
                _ => {}
            }
        }

        let headers = match headers {
            Some(headers) => headers.split_whitespace().map(str::to_ascii_lowercase).collect(),
            None => vec!["date".to_string()],
        };

        Ok(SignatureParameters {
            key_id,
            algorithm,
            headers,
            signature: signature.ok_or(SignatureError::Malformed)?,
        })
    }
}

fn signing_string(names: &[String], method: &Method, uri: &Uri, headers: &HeaderMap) -> Result<String, SignatureError> {
    let lines = names
        .iter()
        .map(|name| {
            if name == REQUEST_TARGET {
                let target = uri.path_and_query().map_or("/", |path| path.as_str());
                return Ok(format!("{}: {} {}", REQUEST_TARGET, method.as_str().to_ascii_lowercase(), target));
            }

            let value = headers
                .get(name.as_str())
                .ok_or_else(|| SignatureError::MissingHeader(name.clone()))?
                .to_str()
                .map_err(|_| SignatureError::MissingHeader(name.clone()))?;
            Ok(format!("{}: {}", name, value.trim()))
        })
        .collect::<Result<Vec<_>, SignatureError>>()?;

    Ok(lines.join("\n"))
}

#[derive(Error, Debug, PartialEq)]
pub enum SignatureError {
    #[error("invalid public key: {0}")]
    InvalidKey(String),
    #[error("the request is not signed")]
    Missing,
    #[error("malformed signature parameters")]
    Malformed,
    #[error("unsupported signature algorithm '{0}'")]
    UnsupportedAlgorithm(String),
    #[error("signed header '{0}' is missing from the request")]
    MissingHeader(String),
    #[error("the signature is not valid base64")]
    InvalidEncoding,
    #[error("the signature does not match the request")]
    Mismatch,
    #[error("the date header is not a valid HTTP date")]
    InvalidDate,
    #[error("the request was signed at '{0}', too far from now")]
    Expired(String),
    #[error("the digest header does not match the body")]
    DigestMismatch,
}

#[cfg(test)]
pub mod test_signing {
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD;
    use chrono::{DateTime, Utc};
    use rsa::pkcs8::DecodePrivateKey;
    use rsa::{Pkcs1v15Sign, RsaPrivateKey};
    use sha2::{Digest, Sha256};

    pub const PUBLIC_KEY: &str = include_str!("../../tests/resources/signing_key.pub");
    const PRIVATE_KEY: &str = include_str!("../../tests/resources/signing_key.pem");

    /// Signs `signing_string` the way SmartThings does and returns the base64 signature.
    pub fn sign(signing_string: &str) -> String {
        let key = RsaPrivateKey::from_pkcs8_pem(PRIVATE_KEY).unwrap();
        let hashed = Sha256::digest(signing_string.as_bytes());
        STANDARD.encode(key.sign(Pkcs1v15Sign::new::<Sha256>(), &hashed).unwrap())
    }

    pub fn http_date(date: DateTime<Utc>) -> String {
        date.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
    }

    pub fn digest(body: &[u8]) -> String {
        format!("SHA-256={}", STANDARD.encode(Sha256::digest(body)))
    }

    /// Returns an `Authorization` header value signing the request target and the date.
    pub fn authorization(method: &str, path: &str, date: &str) -> String {
        let signature = sign(&format!("(request-target): {} {}\ndate: {}", method, path, date));
        format!(
            r#"Signature keyId="/pl/useast2/1-2-3",algorithm="rsa-sha256",headers="(request-target) date",signature="{}""#,
            signature
        )
    }

    /// Returns an `Authorization` header value that also signs `digest`, as SmartThings sends it.
    pub fn authorization_with_digest(method: &str, path: &str, date: &str, digest: &str) -> String {
        let signature = sign(&format!("(request-target): {} {}\ndigest: {}\ndate: {}", method, path, digest, date));
        format!(
            r#"Signature keyId="/pl/useast2/1-2-3",algorithm="rsa-sha256",headers="(request-target) digest date",signature="{}""#,
            signature
        )
    }
}
