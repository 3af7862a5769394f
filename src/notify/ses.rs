use std::time::SystemTime;

use aws_credential_types::Credentials;
use aws_sigv4::http_request::{SignableBody, SignableRequest, SigningParams, SigningSettings, sign};
use aws_sigv4::sign::v4;
use aws_smithy_runtime_api::client::identity::Identity;
use serde_json::json;

use crate::config::SesConfig;
use crate::error::NotifyError;

use super::{Notification, Notifier, RunStatus};

const SIGNING_NAME: &str = "ses";
const CONTENT_TYPE: &str = "application/json";

/// SES v2 `SendEmail`, signed with SigV4
pub(crate) struct SesNotifier {
    agent: ureq::Agent,
    config: SesConfig,
}

impl SesNotifier {
    pub(crate) fn new(agent: ureq::Agent, config: SesConfig) -> Self {
        Self { agent, config }
    }

    fn endpoint(&self) -> String {
        format!(
            "https://email.{}.amazonaws.com/v2/email/outbound-emails",
            self.config.region
        )
    }

    fn payload(&self, notification: &Notification<'_>) -> serde_json::Value {
        let subject = match notification.status {
            RunStatus::Success => "Daily image generated",
            RunStatus::Error => "Daily image generation failed",
        };
        json!({
            "FromEmailAddress": self.config.from,
            "Destination": { "ToAddresses": self.config.to },
            "Content": {
                "Simple": {
                    "Subject": { "Data": subject, "Charset": "UTF-8" },
                    "Body": {
                        "Text": { "Data": notification.text(), "Charset": "UTF-8" }
                    }
                }
            }
        })
    }

    fn signing_error(message: impl ToString) -> NotifyError {
        NotifyError::Signing {
            provider: SIGNING_NAME,
            message: message.to_string(),
        }
    }

    /// Headers to add for a signed POST of `body` to `url`
    fn signed_headers(
        &self,
        url: &str,
        body: &[u8],
        at: SystemTime,
    ) -> Result<Vec<(String, String)>, NotifyError> {
        let creds = &self.config.credentials;
        let identity: Identity = Credentials::new(
            &creds.access_key_id,
            &creds.secret_access_key,
            creds.session_token.clone(),
            None,
            "dailyshot",
        )
        .into();
        let params: SigningParams<'_> = v4::SigningParams::builder()
            .identity(&identity)
            .region(&self.config.region)
            .name(SIGNING_NAME)
            .time(at)
            .settings(SigningSettings::default())
            .build()
            .map_err(Self::signing_error)?
            .into();

        let request = SignableRequest::new(
            "POST",
            url,
            [("content-type", CONTENT_TYPE)].into_iter(),
            SignableBody::Bytes(body),
        )
        .map_err(Self::signing_error)?;
        let (instructions, _signature) = sign(request, &params)
            .map_err(Self::signing_error)?
            .into_parts();

        Ok(instructions
            .headers()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect())
    }
}

impl Notifier for SesNotifier {
    fn name(&self) -> &'static str {
        "ses"
    }

    fn deliver(&self, notification: &Notification<'_>) -> Result<(), NotifyError> {
        let url = self.endpoint();
        let body = self.payload(notification).to_string().into_bytes();

        let mut request = self.agent.post(&url).header("content-type", CONTENT_TYPE);
        for (name, value) in self.signed_headers(&url, &body, SystemTime::now())? {
            request = request.header(name, value);
        }
        request
            .send(&body[..])
            .map(|_| ())
            .map_err(|source| NotifyError::Http {
                provider: self.name(),
                source,
            })
    }
}
