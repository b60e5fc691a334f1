// Shared test helpers for snapshot fixtures.

use std::io::Write;

use tempfile::NamedTempFile;

/// AWS organization with three accounts:
/// - `111111111111`: one dangling Beanstalk alias, one live environment, one live bucket
/// - `222222222222`: unreachable (role assumption denied)
/// - `333333333333`: one dangling S3 alias
#[allow(dead_code)] // Used by other test files
pub fn aws_org_snapshot() -> String {
    serde_json::json!({
        "provider": "aws",
        "accounts": [
            {
                "Id": "111111111111",
                "Name": "production",
                "inventory": {
                    "zones": [{
                        "id": "/hostedzone/Z0PROD",
                        "name": "example.com.",
                        "records": [
                            {"name": "test23.example.com.", "type": "CNAME", "values": ["test23.eu-south-1.elasticbeanstalk.com"]},
                            {"name": "www.example.com.", "type": "CNAME", "values": ["live.eu-south-1.elasticbeanstalk.com"]},
                            {"name": "images.example.com.", "type": "CNAME", "values": ["images.example.com.s3.us-east-1.amazonaws.com"]},
                            {"name": "example.com.", "type": "A", "values": ["192.0.2.1"]},
                            {"name": "mail.example.com.", "type": "CNAME", "values": ["mx.mailhost.example.net"]}
                        ]
                    }],
                    "buckets": ["images.example.com"],
                    "environments": [
                        {"cname": "live.eu-south-1.elasticbeanstalk.com", "status": "Ready"}
                    ]
                }
            },
            {
                "Id": "222222222222",
                "Name": "legacy",
                "unavailable": "AccessDenied: not authorized to perform sts:AssumeRole"
            },
            {
                "Id": "333333333333",
                "Name": "marketing",
                "inventory": {
                    "zones": [{
                        "id": "/hostedzone/Z0MKT",
                        "name": "example.com.",
                        "records": [
                            {"name": "assets.example.com.", "type": "CNAME", "values": ["assets.example.com.s3.us-east-1.amazonaws.com"]}
                        ]
                    }],
                    "buckets": [],
                    "environments": []
                }
            }
        ]
    })
    .to_string()
}

/// Bullet list the Slack alert carries for [`aws_org_snapshot`].
#[allow(dead_code)] // Used by other test files
pub const AWS_ORG_BULLETS: &str = "• test23.example.com -> test23.eu-south-1.elasticbeanstalk.com\n• assets.example.com -> assets.example.com.s3.us-east-1.amazonaws.com";

/// Writes `contents` to a temporary snapshot file.
#[allow(dead_code)] // Used by other test files
pub fn write_snapshot(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(contents.as_bytes())
        .expect("Failed to write snapshot");
    file.flush().expect("Failed to flush file");
    file
}
