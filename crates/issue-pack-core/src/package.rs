//! The issue package envelope stored in a gist.

use crate::error::{IssuePackError, Result};
use crate::payload::{
    BugReportPayload, FeatureRequestPayload, PackRegisterPayload, PackSyncPayload, TypedPayload,
};
use crate::repo::RepoRef;
use crate::types::IssueType;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Envelope format written by this version.
pub const SCHEMA_VERSION: &str = "cursortoolset-issue-v1";

/// The one gist file interpreted as a package.
pub const PAYLOAD_FILENAME: &str = "issue-payload.json";

const CREATED_AT_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

// ---------------------------------------------------------------------------
// Envelope
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meta {
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_project: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cursortoolset_version: Option<String>,
    #[serde(rename = "github_issue_version")]
    pub producer_version: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    pub repo: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pack: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl Target {
    pub fn repo(repo: &RepoRef) -> Self {
        Self {
            repo: repo.to_string(),
            pack: None,
            version: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub name: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssuePackage {
    #[serde(rename = "$schema")]
    pub schema: String,
    pub meta: Meta,
    #[serde(rename = "type")]
    pub issue_type: IssueType,
    pub target: Target,
    pub payload: serde_json::Value,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
}

impl IssuePackage {
    /// Build a package stamped with the current schema, time and version.
    pub fn build<P: Serialize>(
        issue_type: IssueType,
        target: Target,
        payload: &P,
        attachments: Vec<Attachment>,
    ) -> Result<Self> {
        Self::build_at(issue_type, target, payload, attachments, Utc::now())
    }

    pub fn build_at<P: Serialize>(
        issue_type: IssueType,
        target: Target,
        payload: &P,
        attachments: Vec<Attachment>,
        now: DateTime<Utc>,
    ) -> Result<Self> {
        check_attachment_names(&attachments)?;
        let payload = serde_json::to_value(payload).map_err(IssuePackError::Encode)?;
        Ok(Self {
            schema: SCHEMA_VERSION.to_string(),
            meta: Meta {
                created_at: now.format(CREATED_AT_FORMAT).to_string(),
                source_project: None,
                cursortoolset_version: None,
                producer_version: crate::VERSION.to_string(),
            },
            issue_type,
            target,
            payload,
            attachments,
        })
    }

    pub fn with_source_project(mut self, project: Option<String>) -> Self {
        self.meta.source_project = project;
        self
    }

    /// Pretty-printed JSON, as stored in the gist.
    pub fn encode(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(IssuePackError::Encode)
    }

    /// Parse an envelope. Unknown `$schema` values are accepted; callers
    /// check [`IssuePackage::is_current_schema`] before trusting the payload.
    pub fn decode(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(IssuePackError::MalformedPackage)
    }

    pub fn is_current_schema(&self) -> bool {
        self.schema == SCHEMA_VERSION
    }

    /// Project the payload onto `T`.
    pub fn extract_payload<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_value(self.payload.clone()).map_err(|source| {
            IssuePackError::PayloadShapeMismatch {
                shape: std::any::type_name::<T>()
                    .rsplit("::")
                    .next()
                    .unwrap_or("payload"),
                source,
            }
        })
    }

    /// Project the payload onto the shape implied by `type`.
    pub fn typed_payload(&self) -> Result<TypedPayload> {
        if !self.is_current_schema() {
            return Err(IssuePackError::UnsupportedSchema(self.schema.clone()));
        }
        Ok(match self.issue_type {
            IssueType::FeatureRequest => {
                TypedPayload::FeatureRequest(self.extract_payload::<FeatureRequestPayload>()?)
            }
            IssueType::BugReport => {
                TypedPayload::BugReport(self.extract_payload::<BugReportPayload>()?)
            }
            IssueType::PackRegister => {
                TypedPayload::PackRegister(self.extract_payload::<PackRegisterPayload>()?)
            }
            IssueType::PackSync => TypedPayload::PackSync(self.extract_payload::<PackSyncPayload>()?),
            IssueType::Question | IssueType::Custom => TypedPayload::Opaque(self.payload.clone()),
        })
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.meta.created_at)
            .ok()
            .map(|t| t.with_timezone(&Utc))
    }
}

fn check_attachment_names(attachments: &[Attachment]) -> Result<()> {
    let mut seen: Vec<&str> = Vec::with_capacity(attachments.len());
    for attachment in attachments {
        if attachment.name == PAYLOAD_FILENAME {
            return Err(IssuePackError::ReservedAttachmentName(attachment.name.clone()));
        }
        if seen.contains(&attachment.name.as_str()) {
            return Err(IssuePackError::DuplicateAttachment(attachment.name.clone()));
        }
        seen.push(&attachment.name);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn target() -> Target {
        Target::repo(&RepoRef::new("o", "r"))
    }

    fn attachments() -> Vec<Attachment> {
        vec![
            Attachment {
                name: "trace.log".into(),
                content: "line 1\nline 2\n".into(),
            },
            Attachment {
                name: "config.toml".into(),
                content: "[a]\nb = \"ü\"\n".into(),
            },
        ]
    }

    #[test]
    fn build_stamps_schema_time_and_version() {
        let now = Utc.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap();
        let pkg =
            IssuePackage::build_at(IssueType::BugReport, target(), &json!({}), vec![], now).unwrap();
        assert_eq!(pkg.schema, SCHEMA_VERSION);
        assert_eq!(pkg.meta.created_at, "2024-03-09T07:05:01Z");
        assert_eq!(pkg.meta.producer_version, crate::VERSION);
        assert_eq!(pkg.created_at(), Some(now));
    }

    #[test]
    fn encode_uses_wire_field_names() {
        let pkg = IssuePackage::build(IssueType::PackSync, target(), &json!({"x": 1}), vec![])
            .unwrap()
            .with_source_project(Some("demo".into()));
        let value: serde_json::Value = serde_json::from_str(&pkg.encode().unwrap()).unwrap();
        assert_eq!(value["$schema"], SCHEMA_VERSION);
        assert_eq!(value["type"], "pack-sync");
        assert_eq!(value["target"]["repo"], "o/r");
        assert_eq!(value["meta"]["source_project"], "demo");
        assert!(value["meta"]["github_issue_version"].is_string());
        assert!(value.get("attachments").is_none());
    }

    #[test]
    fn round_trip_is_lossless_for_every_type() {
        let payload = json!({
            "title": "X",
            "description": "d",
            "nested": {"list": [1, 2.5, null, "s"], "flag": true}
        });
        for issue_type in IssueType::all() {
            let pkg =
                IssuePackage::build(*issue_type, target(), &payload, attachments()).unwrap();
            let decoded = IssuePackage::decode(&pkg.encode().unwrap()).unwrap();
            assert_eq!(decoded, pkg, "{issue_type}");
            assert_eq!(decoded.payload, payload);
            assert_eq!(decoded.attachments, attachments());
        }
    }

    #[test]
    fn decode_rejects_malformed_envelope() {
        for bad in ["", "not json", "{}", r#"{"$schema": "cursortoolset-issue-v1"}"#] {
            assert!(
                matches!(IssuePackage::decode(bad), Err(IssuePackError::MalformedPackage(_))),
                "{bad:?}"
            );
        }
    }

    #[test]
    fn decode_accepts_unknown_schema_but_typed_payload_refuses() {
        let mut pkg =
            IssuePackage::build(IssueType::FeatureRequest, target(), &json!({"title": "t", "description": "d"}), vec![])
                .unwrap();
        pkg.schema = "cursortoolset-issue-v9".into();
        let decoded = IssuePackage::decode(&pkg.encode().unwrap()).unwrap();
        assert!(!decoded.is_current_schema());
        assert!(matches!(
            decoded.typed_payload(),
            Err(IssuePackError::UnsupportedSchema(ref s)) if s == "cursortoolset-issue-v9"
        ));
    }

    #[test]
    fn duplicate_or_reserved_attachment_names_are_rejected() {
        let mut dup = attachments();
        dup.push(Attachment {
            name: "trace.log".into(),
            content: String::new(),
        });
        assert!(matches!(
            IssuePackage::build(IssueType::Custom, target(), &json!(null), dup),
            Err(IssuePackError::DuplicateAttachment(ref n)) if n == "trace.log"
        ));

        let reserved = vec![Attachment {
            name: PAYLOAD_FILENAME.into(),
            content: String::new(),
        }];
        assert!(matches!(
            IssuePackage::build(IssueType::Custom, target(), &json!(null), reserved),
            Err(IssuePackError::ReservedAttachmentName(_))
        ));
    }

    #[test]
    fn extract_payload_reports_shape_mismatch() {
        let pkg = IssuePackage::build(IssueType::PackRegister, target(), &json!({"name": "p"}), vec![])
            .unwrap();
        let err = pkg.extract_payload::<PackRegisterPayload>().unwrap_err();
        match err {
            IssuePackError::PayloadShapeMismatch { shape, .. } => {
                assert_eq!(shape, "PackRegisterPayload")
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(pkg.typed_payload().is_err());
    }

    #[test]
    fn typed_payload_follows_type() {
        let pkg = IssuePackage::build(
            IssueType::BugReport,
            target(),
            &json!({
                "title": "Crash",
                "description": "on start",
                "steps_to_reproduce": ["run", "wait"],
                "environment": {"os": "linux"}
            }),
            vec![],
        )
        .unwrap();
        match pkg.typed_payload().unwrap() {
            TypedPayload::BugReport(p) => {
                assert_eq!(p.steps_to_reproduce, vec!["run", "wait"]);
                assert_eq!(p.environment.os.as_deref(), Some("linux"));
            }
            other => panic!("unexpected payload: {other:?}"),
        }

        let question =
            IssuePackage::build(IssueType::Question, target(), &json!(["free", "form"]), vec![]).unwrap();
        assert_eq!(
            question.typed_payload().unwrap(),
            TypedPayload::Opaque(json!(["free", "form"]))
        );
    }
}
