//! Policy checks run against a resource's declared configuration.
//!
//! Only one rule exists today: every taggable resource must carry the
//! `ManagedBy` and `Environment` tags. The rule reads the resource
//! configuration as parsed from HCL/JSON (a mapping with an optional `tags`
//! field) and has no connection to template rendering.

use log::warn;
use serde::Serialize;

/// Outcome of a single check against a single resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CheckResult {
    Passed,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CheckCategory {
    Convention,
}

/// A resource's tags after normalizing the shapes the parser can produce.
#[derive(Debug, Clone, PartialEq)]
pub enum TagSet<'a> {
    /// No tags, an empty mapping, or an empty list.
    Empty,
    /// A single tag mapping, given directly or as the only list element.
    Tags(&'a serde_json::Map<String, serde_json::Value>),
    /// Several tag mappings in one list, or a value that is not a mapping.
    Ambiguous,
}

impl<'a> TagSet<'a> {
    /// Normalizes the `tags` field of a resource configuration.
    pub fn from_conf(conf: &'a serde_json::Value) -> Self {
        match conf.get("tags") {
            None => TagSet::Empty,
            Some(tags) => Self::from_tags(tags),
        }
    }

    fn from_tags(tags: &'a serde_json::Value) -> Self {
        match tags {
            serde_json::Value::Null => TagSet::Empty,
            serde_json::Value::Object(map) if map.is_empty() => TagSet::Empty,
            serde_json::Value::Object(map) => TagSet::Tags(map),
            serde_json::Value::Array(items) => match items.as_slice() {
                [] => TagSet::Empty,
                [single] => match single {
                    serde_json::Value::Null | serde_json::Value::Object(_) => {
                        Self::from_tags(single)
                    }
                    _ => TagSet::Ambiguous,
                },
                _ => TagSet::Ambiguous,
            },
            _ => TagSet::Ambiguous,
        }
    }
}

/// Ensures all resources have the required tags.
#[derive(Debug, Clone)]
pub struct RequiredTagsCheck {
    pub id: &'static str,
    pub name: &'static str,
    pub category: CheckCategory,
    pub supported_resources: &'static [&'static str],
    pub required_tags: &'static [&'static str],
}

impl RequiredTagsCheck {
    pub fn new() -> Self {
        Self {
            id: "CKV_CUSTOM_1",
            name: "Ensure all resources have required tags (ManagedBy, Environment)",
            category: CheckCategory::Convention,
            supported_resources: &[
                "aws_vpc",
                "aws_subnet",
                "aws_security_group",
                "aws_instance",
                "aws_s3_bucket",
                "aws_iam_role",
                "aws_lambda_function",
                "aws_rds_cluster",
                "aws_dynamodb_table",
            ],
            required_tags: &["ManagedBy", "Environment"],
        }
    }

    /// Whether this check applies to the given resource type.
    pub fn supports(&self, resource_type: &str) -> bool {
        self.supported_resources.contains(&resource_type)
    }

    /// Fails when tags are missing, empty, ambiguous, or lack a required key.
    pub fn scan_resource_conf(&self, conf: &serde_json::Value) -> CheckResult {
        let tags = match TagSet::from_conf(conf) {
            TagSet::Tags(tags) => tags,
            TagSet::Empty => return CheckResult::Failed,
            TagSet::Ambiguous => {
                warn!("{}: cannot interpret tags {:?}", self.id, conf.get("tags"));
                return CheckResult::Failed;
            }
        };

        if self.required_tags.iter().all(|tag| tags.contains_key(*tag)) {
            CheckResult::Passed
        } else {
            CheckResult::Failed
        }
    }
}

impl Default for RequiredTagsCheck {
    fn default() -> Self {
        RequiredTagsCheck::new()
    }
}
