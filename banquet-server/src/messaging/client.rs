use crate::core::config::Config;
use crate::utils::phone::format_au_phone;
use crate::utils::{AppError, AppResult};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::time::Duration;
use tracing::{info, warn};

/// Pause between sequential MMS submissions to stay under the gateway's
/// rate limit
const BULK_SEND_DELAY: Duration = Duration::from_millis(100);

/// Sender id stamped on outbound SMS campaigns
const SMS_FROM: &str = "Wedding";

/// Per-recipient delivery result
#[derive(Debug, Clone, Serialize)]
pub struct SendOutcome {
    pub to: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Summary of a bulk campaign
#[derive(Debug, Clone, Serialize)]
pub struct SendReport {
    pub success: usize,
    pub failed: usize,
    pub results: Vec<SendOutcome>,
}

/// Prepaid credit on the gateway account
#[derive(Debug, Clone, Serialize)]
pub struct AccountBalance {
    pub balance: f64,
    pub currency: String,
}

#[derive(Clone)]
pub struct MmsClient {
    http: reqwest::Client,
    base_url: String,
    auth_header: String,
}

impl MmsClient {
    /// Build a client from configuration, failing fast when credentials are
    /// absent so a misconfigured deployment is caught at startup
    pub fn from_config(config: &Config) -> AppResult<Self> {
        let username = config
            .clicksend_username
            .as_deref()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| AppError::config("CLICKSEND_USERNAME is not set"))?;
        let api_key = config
            .clicksend_api_key
            .as_deref()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| AppError::config("CLICKSEND_API_KEY is not set"))?;

        let credentials = BASE64.encode(format!("{username}:{api_key}"));
        Ok(Self {
            http: reqwest::Client::new(),
            base_url: config.clicksend_api_url.trim_end_matches('/').to_string(),
            auth_header: format!("Basic {credentials}"),
        })
    }

    /// Send one MMS with a media attachment
    pub async fn send_mms(
        &self,
        to: &str,
        body: &str,
        subject: &str,
        media_url: &str,
    ) -> SendOutcome {
        // Recipients are normalized at the gateway boundary, whatever form
        // the caller stored
        let to = format_au_phone(to);
        let to = to.as_str();
        let payload = json!({
            "media_file": media_url,
            "messages": [{
                "to": to,
                "body": body,
                "subject": subject,
            }],
        });

        match self.post_json("/mms/send", &payload).await {
            Ok(response) => {
                let message_id = first_message_id(&response);
                info!(to, message_id = message_id.as_deref(), "MMS accepted");
                SendOutcome {
                    to: to.to_string(),
                    success: true,
                    message_id,
                    error: None,
                }
            }
            Err(e) => {
                warn!(to, error = %e, "MMS rejected");
                SendOutcome {
                    to: to.to_string(),
                    success: false,
                    message_id: None,
                    error: Some(e),
                }
            }
        }
    }

    /// Send the same MMS to many recipients, one request at a time.
    /// A failed recipient never aborts the rest of the campaign.
    pub async fn send_bulk_mms(
        &self,
        recipients: &[(String, String)],
        subject: &str,
        media_url: &str,
    ) -> SendReport {
        let mut results = Vec::with_capacity(recipients.len());
        for (i, (to, body)) in recipients.iter().enumerate() {
            if i > 0 {
                tokio::time::sleep(BULK_SEND_DELAY).await;
            }
            results.push(self.send_mms(to, body, subject, media_url).await);
        }
        summarize(results)
    }

    /// Send one plain SMS
    pub async fn send_sms(&self, to: &str, body: &str) -> SendOutcome {
        let mut report = self
            .submit_sms(&[(to.to_string(), body.to_string())])
            .await;
        report.results.pop().unwrap_or_else(|| SendOutcome {
            to: to.to_string(),
            success: false,
            message_id: None,
            error: Some("Message delivery failed".to_string()),
        })
    }

    /// Send many SMS as a single batched gateway request
    pub async fn send_bulk_sms(&self, messages: &[(String, String)]) -> SendReport {
        self.submit_sms(messages).await
    }

    /// Remaining prepaid balance on the gateway account, or `None` when the
    /// gateway is unreachable or responds with an unexpected shape
    pub async fn account_balance(&self) -> Option<AccountBalance> {
        let response = self
            .http
            .get(format!("{}/account", self.base_url))
            .header("Authorization", &self.auth_header)
            .send()
            .await
            .map_err(|e| warn!(error = %e, "Balance request failed"))
            .ok()?;

        let value: Value = response
            .json()
            .await
            .map_err(|e| warn!(error = %e, "Balance response unreadable"))
            .ok()?;

        let balance = value.pointer("/data/balance").and_then(Value::as_f64)?;
        let currency = value
            .pointer("/data/currency")
            .and_then(Value::as_str)?
            .to_string();
        Some(AccountBalance { balance, currency })
    }

    async fn submit_sms(&self, messages: &[(String, String)]) -> SendReport {
        let entries: Vec<Value> = messages
            .iter()
            .map(|(to, body)| {
                json!({
                    "to": format_au_phone(to),
                    "body": body,
                    "from": SMS_FROM,
                })
            })
            .collect();
        let payload = json!({ "messages": entries });

        match self.post_json("/sms/send", &payload).await {
            Ok(response) => {
                let statuses = per_message_results(&response, messages);
                summarize(statuses)
            }
            Err(e) => summarize(
                messages
                    .iter()
                    .map(|(to, _)| SendOutcome {
                        to: to.clone(),
                        success: false,
                        message_id: None,
                        error: Some(e.clone()),
                    })
                    .collect(),
            ),
        }
    }

    async fn post_json(&self, path: &str, payload: &Value) -> Result<Value, String> {
        let response = self
            .http
            .post(format!("{}{}", self.base_url, path))
            .header("Authorization", &self.auth_header)
            .json(payload)
            .send()
            .await
            .map_err(|e| format!("Gateway request failed: {e}"))?;

        let status = response.status();
        let value: Value = response
            .json()
            .await
            .map_err(|e| format!("Gateway response unreadable: {e}"))?;

        if status.is_success() && is_gateway_success(&value) {
            Ok(value)
        } else {
            Err(gateway_error_text(&value))
        }
    }
}

fn is_gateway_success(value: &Value) -> bool {
    value
        .get("response_code")
        .and_then(Value::as_str)
        .map(|c| c == "SUCCESS")
        .unwrap_or(true)
}

/// Human-readable failure text, preferring the gateway's own message fields
fn gateway_error_text(value: &Value) -> String {
    value
        .get("response_msg")
        .or_else(|| value.get("message"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| "Message delivery failed".to_string())
}

fn first_message_id(value: &Value) -> Option<String> {
    value
        .pointer("/data/messages/0/message_id")
        .and_then(Value::as_str)
        .map(str::to_string)
}

fn per_message_results(value: &Value, sent: &[(String, String)]) -> Vec<SendOutcome> {
    let rows = value
        .pointer("/data/messages")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();

    sent.iter()
        .enumerate()
        .map(|(i, (to, _))| {
            let row = rows.get(i);
            let status = row
                .and_then(|r| r.get("status"))
                .and_then(Value::as_str)
                .unwrap_or("SUCCESS");
            let success = status == "SUCCESS";
            SendOutcome {
                to: to.clone(),
                success,
                message_id: row
                    .and_then(|r| r.get("message_id"))
                    .and_then(Value::as_str)
                    .map(str::to_string),
                error: (!success).then(|| status.to_string()),
            }
        })
        .collect()
}

fn summarize(results: Vec<SendOutcome>) -> SendReport {
    let success = results.iter().filter(|r| r.success).count();
    SendReport {
        success,
        failed: results.len() - success,
        results,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_text_prefers_response_msg() {
        let value = json!({ "response_msg": "Insufficient credit", "message": "other" });
        assert_eq!(gateway_error_text(&value), "Insufficient credit");
    }

    #[test]
    fn error_text_falls_back_to_message_then_generic() {
        let value = json!({ "message": "Bad request" });
        assert_eq!(gateway_error_text(&value), "Bad request");
        assert_eq!(gateway_error_text(&json!({})), "Message delivery failed");
    }

    #[test]
    fn summarize_counts_successes_and_failures() {
        let report = summarize(vec![
            SendOutcome {
                to: "+61412345678".into(),
                success: true,
                message_id: Some("a".into()),
                error: None,
            },
            SendOutcome {
                to: "+61412345679".into(),
                success: false,
                message_id: None,
                error: Some("Insufficient credit".into()),
            },
        ]);
        assert_eq!(report.success, 1);
        assert_eq!(report.failed, 1);
    }
}
