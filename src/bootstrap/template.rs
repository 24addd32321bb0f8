//! CloudFormation template for the bootstrap stack
//!
//! The stack holds a versioned state bucket and a deployment user with an
//! access key. Its outputs are what the CI pipeline needs as secrets.

use serde_json::{json, Value};

/// Managed policies attached to the deployment user
pub const DEPLOY_POLICIES: [&str; 4] = [
    "arn:aws:iam::aws:policy/AmazonS3FullAccess",
    "arn:aws:iam::aws:policy/AmazonCognitoPowerUser",
    "arn:aws:iam::aws:policy/CloudFrontFullAccess",
    "arn:aws:iam::aws:policy/AWSLambda_FullAccess",
];

/// Days a non-current object version is kept in the state bucket
pub const NONCURRENT_VERSION_DAYS: u32 = 90;

pub const OUTPUT_BUCKET_NAME: &str = "BucketName";
pub const OUTPUT_ACCESS_KEY_ID: &str = "AccessKeyID";
pub const OUTPUT_SECRET_ACCESS_KEY: &str = "SecretAccessKey";

pub fn bucket_name(postfix: &str) -> String {
    format!("state-{postfix}")
}

pub fn template(postfix: &str) -> Value {
    json!({
        "AWSTemplateFormatVersion": "2010-09-09",
        "Description": "PolGen Wiki Genesis resources: S3 state bucket and user with necessary deployment permissions",
        "Resources": {
            "S3Bucket": {
                "Type": "AWS::S3::Bucket",
                "Properties": {
                    "BucketName": { "Fn::Sub": bucket_name(postfix) },
                    "VersioningConfiguration": { "Status": "Enabled" },
                    "LifecycleConfiguration": {
                        "Rules": [{
                            "Id": "DeleteOldVersions",
                            "Status": "Enabled",
                            "NoncurrentVersionExpiration": { "NoncurrentDays": NONCURRENT_VERSION_DAYS }
                        }]
                    }
                }
            },
            "IAMUser": {
                "Type": "AWS::IAM::User",
                "Properties": {
                    "Path": "/",
                    "ManagedPolicyArns": DEPLOY_POLICIES
                }
            },
            "IAMAccessKey": {
                "Type": "AWS::IAM::AccessKey",
                "Properties": {
                    "Status": "Active",
                    "UserName": { "Ref": "IAMUser" }
                }
            }
        },
        "Outputs": {
            OUTPUT_BUCKET_NAME: {
                "Description": "Name of the created S3 bucket",
                "Value": { "Ref": "S3Bucket" }
            },
            OUTPUT_ACCESS_KEY_ID: {
                "Description": "Access Key ID for the created IAM user",
                "Value": { "Ref": "IAMAccessKey" }
            },
            OUTPUT_SECRET_ACCESS_KEY: {
                "Description": "Secret Access Key for the created IAM user",
                "Value": { "Fn::GetAtt": ["IAMAccessKey", "SecretAccessKey"] }
            }
        }
    })
}

/// Template body as sent to CloudFormation
pub fn render_template(postfix: &str) -> String {
    // Serializing a `Value` built from literals cannot fail
    serde_json::to_string_pretty(&template(postfix)).unwrap_or_default()
}
