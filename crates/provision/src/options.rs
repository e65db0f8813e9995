//! Typed parameter records for share provisioning requests.
//!
//! Parameters arrive as the flat string map of a provisioning request.
//! Each context compiles its field rules into a [`Validator`] once and
//! reuses it for every request; unknown keys in the map are ignored.
//!
//! Create-share parameters:
//!
//! | Parameter      | Rule                                                     |
//! |----------------|----------------------------------------------------------|
//! | `protocol`     | required, `cephfs` or `nfs`                              |
//! | `backend`      | optional backend name                                    |
//! | `zone`         | optional availability zone                               |
//! | `shareNetwork` | optional share network ID                                |
//! | `accessLevel`  | `ro` or `rw`, defaults to `rw`                           |
//! | `exportTo`     | optional, only with `protocol=nfs`                       |
//! | `mounter`      | `kernel` or `fuse`, only with `protocol=cephfs`          |
//! | `fromSnapshot` | optional clone source, excludes `fromShare`              |
//! | `fromShare`    | optional clone source, excludes `fromSnapshot`           |
//! | `restoreMode`  | `full` or `sparse`, needs exactly one clone source       |
//! | `encrypted`    | optional boolean                                         |
//! | `keyRef`       | KMS secret name, required when `encrypted=true`          |
//!
//! Attach-share parameters:
//!
//! | Parameter      | Rule                                                     |
//! |----------------|----------------------------------------------------------|
//! | `shareID`      | required                                                 |
//! | `accessKind`   | `user` or `guest`, defaults to `user`                    |
//! | `accessKey`    | required unless `accessKind=guest`                       |

use std::collections::HashMap;
use std::sync::LazyLock;

use sharekit_params::{FieldSpec, SchemaError, Validator, Violation};

static CREATE_SHARE_RULES: LazyLock<Validator<CreateShareContext>> =
    LazyLock::new(|| CreateShareContext::validator().expect("valid create-share field rules"));

static ATTACH_SHARE_RULES: LazyLock<Validator<AttachShareContext>> =
    LazyLock::new(|| AttachShareContext::validator().expect("valid attach-share field rules"));

/// Availability zone name, carried verbatim from the request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Zone(String);

impl Zone {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for Zone {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for Zone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Validated configuration of a create-share request.
#[derive(Debug, Clone, Default)]
pub struct CreateShareContext {
    pub protocol: String,
    pub backend: String,
    pub zone: Zone,
    pub share_network: String,
    pub access_level: String,
    pub export_to: String,
    pub mounter: String,
    pub from_snapshot: String,
    pub from_share: String,
    pub restore_mode: String,
    pub encrypted: bool,
    pub key_ref: String,
}

impl CreateShareContext {
    /// Compile the create-share field rules.
    pub fn validator() -> Result<Validator<Self>, SchemaError> {
        Validator::new(vec![
            FieldSpec::text("protocol", |o: &mut Self, v| o.protocol = v)
                .required()
                .matches("^(?i)cephfs|nfs$"),
            FieldSpec::text("backend", |o: &mut Self, v| o.backend = v).optional(),
            FieldSpec::text("zone", |o: &mut Self, v| o.zone = Zone::from(v)).optional(),
            FieldSpec::text("shareNetwork", |o: &mut Self, v| o.share_network = v).optional(),
            FieldSpec::text("accessLevel", |o: &mut Self, v| o.access_level = v)
                .default_value("rw")
                .matches("^(?i)ro|rw$"),
            FieldSpec::text("exportTo", |o: &mut Self, v| o.export_to = v)
                .optional()
                .depends_on("protocol=^(?i)nfs$"),
            FieldSpec::text("mounter", |o: &mut Self, v| o.mounter = v)
                .optional()
                .matches("^(?i)kernel|fuse$")
                .depends_on("protocol=^(?i)cephfs$"),
            FieldSpec::text("fromSnapshot", |o: &mut Self, v| o.from_snapshot = v)
                .optional()
                .precludes(&["fromShare"]),
            FieldSpec::text("fromShare", |o: &mut Self, v| o.from_share = v)
                .optional()
                .precludes(&["fromSnapshot"]),
            FieldSpec::text("restoreMode", |o: &mut Self, v| o.restore_mode = v)
                .optional()
                .matches("^(?i)full|sparse$")
                .depends_on("fromSnapshot|fromShare"),
            FieldSpec::boolean("encrypted", |o: &mut Self, v| o.encrypted = v).optional(),
            FieldSpec::text("keyRef", |o: &mut Self, v| o.key_ref = v)
                .required_if("encrypted=^true$"),
        ])
    }

    /// Validate and populate a context from request parameters.
    pub fn from_params(params: &HashMap<String, String>) -> Result<Self, Violation> {
        CREATE_SHARE_RULES.build(params)
    }
}

/// Validated configuration of an attach-share request.
#[derive(Debug, Clone, Default)]
pub struct AttachShareContext {
    pub share_id: String,
    pub access_kind: String,
    pub access_key: String,
}

impl AttachShareContext {
    /// Compile the attach-share field rules.
    pub fn validator() -> Result<Validator<Self>, SchemaError> {
        Validator::new(vec![
            FieldSpec::text("shareID", |o: &mut Self, v| o.share_id = v).required(),
            FieldSpec::text("accessKind", |o: &mut Self, v| o.access_kind = v)
                .default_value("user")
                .matches("^(?i)user|guest$"),
            FieldSpec::text("accessKey", |o: &mut Self, v| o.access_key = v)
                .optional_if("accessKind=^(?i)guest$"),
        ])
    }

    /// Validate and populate a context from request parameters.
    pub fn from_params(params: &HashMap<String, String>) -> Result<Self, Violation> {
        ATTACH_SHARE_RULES.build(params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use assert_matches::assert_matches;

    fn params(entries: &[(&str, &str)]) -> HashMap<String, String> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    // -----------------------------------------------------------------------
    // Schema shape
    // -----------------------------------------------------------------------

    #[test]
    fn schemas_compile() {
        let create = CreateShareContext::validator().unwrap();
        assert_eq!(create.fields()[0], "protocol");
        assert_eq!(create.fields().len(), 12);

        let attach = AttachShareContext::validator().unwrap();
        assert_eq!(attach.fields(), ["shareID", "accessKind", "accessKey"]);
    }

    // -----------------------------------------------------------------------
    // Create-share rules
    // -----------------------------------------------------------------------

    #[test]
    fn minimal_create_request() {
        let ctx = CreateShareContext::from_params(&params(&[("protocol", "CEPHFS")])).unwrap();

        assert_eq!(ctx.protocol, "CEPHFS");
        assert_eq!(ctx.access_level, "rw");
        assert!(!ctx.encrypted);
        assert_eq!(ctx.zone, Zone::default());
    }

    #[test]
    fn protocol_is_required() {
        let err = CreateShareContext::from_params(&params(&[])).unwrap_err();
        assert_matches!(err, Violation::MissingRequired { field } if field == "protocol");
    }

    #[test]
    fn protocol_format_is_enforced() {
        let err = CreateShareContext::from_params(&params(&[("protocol", "smb")])).unwrap_err();
        assert_matches!(err, Violation::PatternMismatch { field, .. } if field == "protocol");
    }

    #[test]
    fn export_to_needs_nfs() {
        let err = CreateShareContext::from_params(&params(&[
            ("protocol", "cephfs"),
            ("exportTo", "10.0.0.0/24"),
        ]))
        .unwrap_err();
        assert_matches!(err, Violation::UnmetDependency { field, .. } if field == "exportTo");

        let ctx = CreateShareContext::from_params(&params(&[
            ("protocol", "nfs"),
            ("exportTo", "10.0.0.0/24"),
        ]))
        .unwrap();
        assert_eq!(ctx.export_to, "10.0.0.0/24");
    }

    #[test]
    fn mounter_needs_cephfs() {
        let err = CreateShareContext::from_params(&params(&[
            ("protocol", "nfs"),
            ("mounter", "fuse"),
        ]))
        .unwrap_err();
        assert_matches!(err, Violation::UnmetDependency { field, .. } if field == "mounter");

        let ctx = CreateShareContext::from_params(&params(&[
            ("protocol", "cephfs"),
            ("mounter", "FUSE"),
        ]))
        .unwrap();
        assert_eq!(ctx.mounter, "FUSE");
    }

    #[test]
    fn mounter_format_is_enforced() {
        let err = CreateShareContext::from_params(&params(&[
            ("protocol", "cephfs"),
            ("mounter", "loop"),
        ]))
        .unwrap_err();
        assert_matches!(err, Violation::PatternMismatch { field, .. } if field == "mounter");
    }

    #[test]
    fn clone_sources_are_mutually_exclusive() {
        let err = CreateShareContext::from_params(&params(&[
            ("protocol", "cephfs"),
            ("fromSnapshot", "snap-1"),
            ("fromShare", "share-2"),
        ]))
        .unwrap_err();
        assert_matches!(
            err,
            Violation::MutuallyExclusive { field, other }
                if field == "fromSnapshot" && other == "fromShare"
        );
    }

    #[test]
    fn restore_mode_needs_exactly_one_clone_source() {
        let err = CreateShareContext::from_params(&params(&[
            ("protocol", "cephfs"),
            ("restoreMode", "full"),
        ]))
        .unwrap_err();
        assert_matches!(err, Violation::UnmetDependency { field, .. } if field == "restoreMode");

        let ctx = CreateShareContext::from_params(&params(&[
            ("protocol", "cephfs"),
            ("fromSnapshot", "snap-1"),
            ("restoreMode", "full"),
        ]))
        .unwrap();
        assert_eq!(ctx.restore_mode, "full");

        let ctx = CreateShareContext::from_params(&params(&[
            ("protocol", "cephfs"),
            ("fromShare", "share-2"),
            ("restoreMode", "sparse"),
        ]))
        .unwrap();
        assert_eq!(ctx.restore_mode, "sparse");
    }

    #[test]
    fn encryption_requires_a_key_reference() {
        let err = CreateShareContext::from_params(&params(&[
            ("protocol", "nfs"),
            ("encrypted", "true"),
        ]))
        .unwrap_err();
        assert_matches!(err, Violation::MissingRequired { field } if field == "keyRef");

        let ctx = CreateShareContext::from_params(&params(&[
            ("protocol", "nfs"),
            ("encrypted", "true"),
            ("keyRef", "share-key-1"),
        ]))
        .unwrap();
        assert!(ctx.encrypted);
        assert_eq!(ctx.key_ref, "share-key-1");

        let ctx = CreateShareContext::from_params(&params(&[
            ("protocol", "nfs"),
            ("encrypted", "false"),
        ]))
        .unwrap();
        assert!(!ctx.encrypted);
        assert_eq!(ctx.key_ref, "");
    }

    #[test]
    fn bad_encrypted_value_is_a_type_violation() {
        let err = CreateShareContext::from_params(&params(&[
            ("protocol", "nfs"),
            ("encrypted", "maybe"),
        ]))
        .unwrap_err();
        assert_matches!(err, Violation::InvalidValue { field, .. } if field == "encrypted");
    }

    #[test]
    fn zone_is_wrapped_unchanged() {
        let ctx = CreateShareContext::from_params(&params(&[
            ("protocol", "nfs"),
            ("zone", "nova-1"),
        ]))
        .unwrap();
        assert_eq!(ctx.zone.as_str(), "nova-1");
        assert_eq!(ctx.zone.to_string(), "nova-1");
    }

    #[test]
    fn unknown_parameters_are_ignored() {
        let ctx = CreateShareContext::from_params(&params(&[
            ("protocol", "nfs"),
            ("comment", "weekly batch"),
        ]))
        .unwrap();
        assert_eq!(ctx.protocol, "nfs");
    }

    // -----------------------------------------------------------------------
    // Attach-share rules
    // -----------------------------------------------------------------------

    #[test]
    fn minimal_attach_request() {
        let ctx = AttachShareContext::from_params(&params(&[
            ("shareID", "share-1"),
            ("accessKey", "alice-key"),
        ]))
        .unwrap();
        assert_eq!(ctx.share_id, "share-1");
        assert_eq!(ctx.access_kind, "user");
        assert_eq!(ctx.access_key, "alice-key");
    }

    #[test]
    fn attach_requires_the_share_id() {
        let err = AttachShareContext::from_params(&params(&[])).unwrap_err();
        assert_matches!(err, Violation::MissingRequired { field } if field == "shareID");
    }

    #[test]
    fn access_key_is_required_for_user_access() {
        let err = AttachShareContext::from_params(&params(&[("shareID", "share-1")]))
            .unwrap_err();
        assert_matches!(err, Violation::MissingRequired { field } if field == "accessKey");
    }

    #[test]
    fn guest_access_needs_no_key() {
        let ctx = AttachShareContext::from_params(&params(&[
            ("shareID", "share-1"),
            ("accessKind", "guest"),
        ]))
        .unwrap();
        assert_eq!(ctx.access_kind, "guest");
        assert_eq!(ctx.access_key, "");
    }

    #[test]
    fn access_kind_format_is_enforced() {
        let err = AttachShareContext::from_params(&params(&[
            ("shareID", "share-1"),
            ("accessKind", "admin"),
        ]))
        .unwrap_err();
        assert_matches!(err, Violation::PatternMismatch { field, .. } if field == "accessKind");
    }
}
