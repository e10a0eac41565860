//! Request parsing and validation.
//!
//! A request arrives as a JSON object:
//!
//! ```json
//! { "file_to_obfuscate": "s3://bucket/path/data.csv", "pii_fields": ["name", "email"] }
//! ```
//!
//! [`Request::parse`] validates it before any I/O happens: the location must be
//! `<scheme>://<bucket>/<key>` with a non-empty bucket and key, and the key's
//! trailing extension must name a supported [`Format`].

use crate::config::ObfuscatorConfig;
use crate::error::{ObfuscateError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::info;

/// Tabular file format, derived from a key's trailing extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Csv,
    Json,
    Parquet,
}

impl Format {
    pub const ALL: [Self; 3] = [Self::Csv, Self::Json, Self::Parquet];

    /// File extension / format tag.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
            Self::Parquet => "parquet",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Exact, case-sensitive tag match.
impl FromStr for Format {
    type Err = ObfuscateError;

    fn from_str(tag: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|f| f.extension() == tag)
            .ok_or_else(|| ObfuscateError::UnsupportedFormat(tag.to_string()))
    }
}

/// A validated storage location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub uri: String,
    pub bucket: String,
    pub key: String,
    pub format: Format,
}

impl Location {
    /// Split `<scheme>://<bucket>/<key>` and derive the format tag.
    ///
    /// # Errors
    /// [`ObfuscateError::InvalidInput`] if the URI does not have that shape or the
    /// extension is not `csv`, `json` or `parquet`.
    pub fn parse(uri: &str, scheme: &str) -> Result<Self> {
        let invalid = || ObfuscateError::invalid_input(format!("Invalid S3 URI format: {uri}"));

        let rest = uri
            .strip_prefix(scheme)
            .and_then(|r| r.strip_prefix("://"))
            .ok_or_else(invalid)?;
        let (bucket, key) = rest.split_once('/').ok_or_else(invalid)?;
        if bucket.is_empty() || key.is_empty() {
            return Err(invalid());
        }

        let file_name = key.rsplit('/').next().unwrap_or(key);
        let unsupported =
            |tag: &str| ObfuscateError::invalid_input(format!("Unsupported file format: {tag}"));
        let (_, tag) = file_name
            .rsplit_once('.')
            .ok_or_else(|| unsupported(file_name))?;
        let format = tag.parse::<Format>().map_err(|_| unsupported(tag))?;

        Ok(Self {
            uri: uri.to_string(),
            bucket: bucket.to_string(),
            key: key.to_string(),
            format,
        })
    }
}

#[derive(Deserialize)]
struct RawRequest {
    file_to_obfuscate: Option<String>,
    pii_fields: Option<Vec<String>>,
}

/// A validated obfuscation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub location: Location,
    pub fields_to_mask: Vec<String>,
}

impl Request {
    /// Parse with the default `s3` scheme.
    ///
    /// # Errors
    /// See [`Request::parse_with`].
    pub fn parse(raw: &str) -> Result<Self> {
        Self::parse_with(raw, &ObfuscatorConfig::default())
    }

    /// Parse and validate a raw JSON request.
    ///
    /// # Errors
    /// [`ObfuscateError::InvalidInput`] when the JSON is malformed, the location is
    /// missing or empty, the location is not `<scheme>://<bucket>/<key>`, or the
    /// key's extension is unsupported.
    pub fn parse_with(raw: &str, config: &ObfuscatorConfig) -> Result<Self> {
        let raw: RawRequest = serde_json::from_str(raw)
            .map_err(|e| ObfuscateError::invalid_input(format!("Invalid JSON input: {e}")))?;

        let uri = raw
            .file_to_obfuscate
            .filter(|s| !s.is_empty())
            .ok_or_else(|| ObfuscateError::invalid_input("Missing required S3 file location."))?;
        let location = Location::parse(&uri, &config.uri_scheme)?;
        let fields_to_mask = raw.pii_fields.unwrap_or_default();

        info!(
            bucket = %location.bucket,
            key = %location.key,
            format = %location.format,
            fields = ?fields_to_mask,
            "parsed obfuscation request"
        );
        Ok(Self {
            location,
            fields_to_mask,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCategory;

    fn invalid_message(raw: &str) -> String {
        let err = Request::parse(raw).unwrap_err();
        assert_eq!(err.kind(), ErrorCategory::InvalidInput, "{err}");
        err.to_string()
    }

    #[test]
    fn parses_bucket_key_and_format() {
        let req = Request::parse(
            r#"{"file_to_obfuscate": "s3://my-bucket/dir/sub/data.parquet", "pii_fields": ["name"]}"#,
        )
        .unwrap();
        assert_eq!(req.location.bucket, "my-bucket");
        assert_eq!(req.location.key, "dir/sub/data.parquet");
        assert_eq!(req.location.format, Format::Parquet);
        assert_eq!(req.fields_to_mask, vec!["name".to_string()]);
    }

    #[test]
    fn pii_fields_default_to_empty() {
        for raw in [
            r#"{"file_to_obfuscate": "s3://b/k.json"}"#,
            r#"{"file_to_obfuscate": "s3://b/k.json", "pii_fields": null}"#,
        ] {
            assert!(Request::parse(raw).unwrap().fields_to_mask.is_empty());
        }
    }

    #[test]
    fn malformed_json() {
        assert!(invalid_message("{not json").starts_with("Invalid JSON input"));
        assert!(invalid_message("[1, 2]").starts_with("Invalid JSON input"));
    }

    #[test]
    fn missing_location() {
        for raw in [
            r#"{"pii_fields": ["name"]}"#,
            r#"{"file_to_obfuscate": ""}"#,
            r#"{"file_to_obfuscate": null}"#,
        ] {
            assert_eq!(invalid_message(raw), "Missing required S3 file location.");
        }
    }

    #[test]
    fn bad_location_shapes() {
        for uri in [
            "not-a-valid-uri",
            "s3://bucket-only",
            "s3:///key.csv",
            "s3://bucket/",
            "gs://bucket/key.csv",
            "bucket/key.csv",
        ] {
            let raw = format!(r#"{{"file_to_obfuscate": "{uri}"}}"#);
            assert!(
                invalid_message(&raw).contains("Invalid S3 URI format"),
                "{uri}"
            );
        }
    }

    #[test]
    fn unsupported_extensions() {
        for (uri, tag) in [
            ("s3://b/file.txt", "txt"),
            ("s3://b/file.CSV", "CSV"),
            ("s3://b/file.csv.gz", "gz"),
            ("s3://b/dir.csv/README", "README"),
            ("s3://b/dir/csv", "csv"),
        ] {
            let raw = format!(r#"{{"file_to_obfuscate": "{uri}"}}"#);
            assert_eq!(
                invalid_message(&raw),
                format!("Unsupported file format: {tag}")
            );
        }
    }

    #[test]
    fn custom_scheme() {
        let config = ObfuscatorConfig {
            uri_scheme: "proto".into(),
        };
        let req =
            Request::parse_with(r#"{"file_to_obfuscate": "proto://bucket1/data.csv"}"#, &config)
                .unwrap();
        assert_eq!(req.location.bucket, "bucket1");
        assert!(Request::parse(r#"{"file_to_obfuscate": "proto://bucket1/data.csv"}"#).is_err());
    }

    #[test]
    fn format_tags() {
        assert_eq!("json".parse::<Format>().unwrap(), Format::Json);
        assert!(matches!(
            "xlsx".parse::<Format>(),
            Err(ObfuscateError::UnsupportedFormat(t)) if t == "xlsx"
        ));
    }
}
