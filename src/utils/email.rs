//! Outbound email.
//!
//! Handlers talk to a [`Mailer`]. With SMTP enabled that is an
//! [`SmtpMailer`] built on lettre; otherwise a [`LogMailer`] writes the
//! message to the log so local setups can still complete the OTP flow.

use std::sync::Arc;

use async_trait::async_trait;
use edugate_auth::OtpPurpose;
use edugate_config::EmailConfig;
use edugate_core::AppError;
use lettre::message::{MultiPart, SinglePart, header};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use tracing::instrument;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub text_body: String,
    pub html_body: String,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: OutgoingEmail) -> Result<(), AppError>;
}

pub fn mailer_from_config(config: &EmailConfig) -> Arc<dyn Mailer> {
    if config.enabled {
        Arc::new(SmtpMailer::new(config.clone()))
    } else {
        tracing::warn!("SMTP disabled, outgoing email will only be logged");
        Arc::new(LogMailer)
    }
}

pub struct SmtpMailer {
    config: EmailConfig,
}

impl SmtpMailer {
    pub fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    fn build_message(&self, email: &OutgoingEmail) -> Result<Message, AppError> {
        let from = format!("{} <{}>", self.config.from_name, self.config.from_email);

        Message::builder()
            .from(
                from.parse()
                    .map_err(|e| AppError::internal_error(format!("Invalid from email: {}", e)))?,
            )
            .to(email
                .to
                .parse()
                .map_err(|e| AppError::internal_error(format!("Invalid to email: {}", e)))?)
            .subject(email.subject.as_str())
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(header::ContentType::TEXT_PLAIN)
                            .body(email.text_body.clone()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(header::ContentType::TEXT_HTML)
                            .body(email.html_body.clone()),
                    ),
            )
            .map_err(|e| AppError::internal_error(format!("Failed to build email: {}", e)))
    }

    fn transport(&self) -> Result<SmtpTransport, AppError> {
        if self.config.smtp_username.is_empty() {
            return Ok(SmtpTransport::builder_dangerous(&self.config.smtp_host)
                .port(self.config.smtp_port)
                .build());
        }

        let creds = Credentials::new(
            self.config.smtp_username.clone(),
            self.config.smtp_password.clone(),
        );

        Ok(SmtpTransport::relay(&self.config.smtp_host)
            .map_err(|e| AppError::internal_error(format!("Failed to create SMTP relay: {}", e)))?
            .port(self.config.smtp_port)
            .credentials(creds)
            .build())
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    #[instrument(skip(self, email), fields(to = %email.to, subject = %email.subject))]
    async fn send(&self, email: OutgoingEmail) -> Result<(), AppError> {
        let message = self.build_message(&email)?;
        let transport = self.transport()?;

        tokio::task::spawn_blocking(move || transport.send(&message))
            .await
            .map_err(|e| AppError::internal_error(format!("Task join error: {}", e)))?
            .map_err(|e| AppError::internal_error(format!("Failed to send email: {}", e)))?;

        tracing::info!("email sent");
        Ok(())
    }
}

pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, email: OutgoingEmail) -> Result<(), AppError> {
        tracing::info!(to = %email.to, subject = %email.subject, "email not sent (SMTP disabled)");
        tracing::debug!(body = %email.text_body, "suppressed email body");
        Ok(())
    }
}

/// Builds the email carrying a one-time passcode.
pub fn otp_email(to: &str, code: &str, purpose: OtpPurpose, expiry_minutes: i64) -> OutgoingEmail {
    let (subject, intro) = match purpose {
        OtpPurpose::EmailVerification => (
            "Verify your EduGate account",
            "Use the code below to verify your email address.",
        ),
        OtpPurpose::PasswordReset => (
            "Reset your EduGate password",
            "Use the code below to reset your password.",
        ),
    };

    let text_body = format!(
        "Hi,\n\n\
         {}\n\n\
         Your verification code is: {}\n\n\
         This code will expire in {} minutes.\n\n\
         If you didn't request this, please ignore this email.\n\n\
         Best regards,\n\
         EduGate Team",
        intro, code, expiry_minutes
    );

    OutgoingEmail {
        to: to.to_string(),
        subject: subject.to_string(),
        text_body,
        html_body: otp_template(subject, intro, code, expiry_minutes),
    }
}

fn otp_template(title: &str, intro: &str, code: &str, expiry_minutes: i64) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
</head>
<body style="margin: 0; padding: 0; font-family: Arial, sans-serif; background-color: #f4f4f4;">
    <table width="100%" cellpadding="0" cellspacing="0" style="background-color: #f4f4f4; padding: 20px;">
        <tr>
            <td align="center">
                <table width="600" cellpadding="0" cellspacing="0" style="background-color: #ffffff; border-radius: 8px;">
                    <tr>
                        <td style="background-color: #0F766E; padding: 30px; text-align: center;">
                            <h1 style="margin: 0; color: #ffffff; font-size: 28px;">EduGate</h1>
                        </td>
                    </tr>
                    <tr>
                        <td style="padding: 40px 30px;">
                            <p style="margin: 0 0 20px 0; color: #666666; font-size: 16px;">{intro}</p>
                            <p style="margin: 30px 0; text-align: center; font-size: 32px; letter-spacing: 8px; font-weight: bold; color: #0F766E;">{code}</p>
                            <p style="margin: 0; color: #666666; font-size: 14px;">
                                <strong>This code will expire in {expiry_minutes} minutes.</strong>
                            </p>
                        </td>
                    </tr>
                </table>
            </td>
        </tr>
    </table>
</body>
</html>"#
    )
}
