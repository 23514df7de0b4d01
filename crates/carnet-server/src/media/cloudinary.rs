//! Signed uploads to the Cloudinary image API.

use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use carnet_shared::constants::AVATAR_SIZE_PX;

use super::{MediaError, UploadReceipt};
use crate::config::CloudinaryCredentials;

const API_BASE: &str = "https://api.cloudinary.com/v1_1";
const DELIVERY_BASE: &str = "https://res.cloudinary.com";

#[derive(Debug, Deserialize)]
struct UploadResponse {
    public_id: String,
    version: i64,
}

pub struct CloudinaryClient {
    credentials: CloudinaryCredentials,
    http: reqwest::Client,
}

impl CloudinaryClient {
    pub fn new(credentials: CloudinaryCredentials) -> Self {
        Self {
            credentials,
            http: reqwest::Client::new(),
        }
    }

    pub async fn upload(&self, data: &[u8], public_id: &str) -> Result<UploadReceipt, MediaError> {
        let timestamp = chrono::Utc::now().timestamp().to_string();
        let signed = [
            ("overwrite", "true"),
            ("public_id", public_id),
            ("timestamp", timestamp.as_str()),
        ];
        let signature = sign(&signed, &self.credentials.api_secret);

        let file = Part::bytes(data.to_vec()).file_name("avatar");
        let form = Form::new()
            .part("file", file)
            .text("overwrite", "true")
            .text("public_id", public_id.to_string())
            .text("timestamp", timestamp.clone())
            .text("api_key", self.credentials.api_key.clone())
            .text("signature_algorithm", "sha256")
            .text("signature", signature);

        let url = format!(
            "{API_BASE}/{}/image/upload",
            self.credentials.cloud_name
        );
        let resp = self.http.post(&url).multipart(form).send().await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), public_id, "Cloudinary rejected upload");
            return Err(MediaError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let uploaded: UploadResponse = resp.json().await?;
        debug!(public_id = %uploaded.public_id, version = uploaded.version, "Uploaded to Cloudinary");

        Ok(UploadReceipt {
            public_id: uploaded.public_id,
            version: uploaded.version,
        })
    }

    pub fn avatar_url(&self, public_id: &str, version: i64) -> String {
        format!(
            "{DELIVERY_BASE}/{}/image/upload/c_fill,h_{size},w_{size}/v{version}/{public_id}",
            self.credentials.cloud_name,
            size = AVATAR_SIZE_PX,
        )
    }
}

/// Cloudinary request signature: the parameters sorted by name, joined as
/// `k=v&k=v`, the API secret appended, then SHA-256 hex.
fn sign(params: &[(&str, &str)], api_secret: &str) -> String {
    let mut sorted = params.to_vec();
    sorted.sort_by(|a, b| a.0.cmp(b.0));

    let joined = sorted
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");

    hex::encode(Sha256::digest(format!("{joined}{api_secret}").as_bytes()))
}
