use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::Message;
use lettre::SmtpTransport;
use lettre::Transport;

use crate::account::errors::MailerError;
use crate::account::models::EmailAddress;
use crate::account::ports::Mailer;
use crate::config::SmtpConfig;

/// Sends account emails over SMTP. `lettre`'s blocking transport is used
/// behind `spawn_blocking` so sends never stall the async runtime.
#[derive(Clone)]
pub struct SmtpMailer {
    transport: SmtpTransport,
    from: String,
    base_url: String,
}

impl SmtpMailer {
    pub fn new(config: &SmtpConfig, base_url: String) -> Result<Self, MailerError> {
        let credentials = Credentials::new(config.username.clone(), config.password.clone());

        let transport = SmtpTransport::relay(&config.host)
            .map_err(|e| MailerError::BuildFailed(e.to_string()))?
            .credentials(credentials)
            .port(config.port)
            .build();

        Ok(Self {
            transport,
            from: config.from.clone(),
            base_url,
        })
    }

    async fn send(&self, message: Message) -> Result<(), MailerError> {
        let transport = self.transport.clone();

        tokio::task::spawn_blocking(move || transport.send(&message))
            .await
            .map_err(|e| MailerError::TransportFailed(e.to_string()))?
            .map_err(|e| MailerError::TransportFailed(e.to_string()))?;

        Ok(())
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send_verification_email(
        &self,
        to: &EmailAddress,
        first_name: &str,
        token: &str,
    ) -> Result<(), MailerError> {
        let verification_link = format!("{}/api/auth/verify-email/{}", self.base_url, token);

        let html_body = format!(
            r#"<html>
<body style="font-family: Arial, sans-serif;">
    <h2>Hi {first_name},</h2>
    <p>Thank you for registering. Please click the link below to verify your email address:</p>
    <p>
        <a href="{verification_link}" style="background-color: #4CAF50; color: white; padding: 14px 20px; text-decoration: none; border-radius: 4px;">
            Verify Email
        </a>
    </p>
    <p style="color: #666; font-size: 12px;">
        This link will expire in 1 hour. If you didn't create an account, please ignore this email.
    </p>
</body>
</html>
"#
        );

        let message = Message::builder()
            .from(
                self.from
                    .parse()
                    .map_err(|e: lettre::address::AddressError| {
                        MailerError::InvalidAddress(e.to_string())
                    })?,
            )
            .to(to
                .as_str()
                .parse()
                .map_err(|e: lettre::address::AddressError| {
                    MailerError::InvalidAddress(e.to_string())
                })?)
            .subject("Verify your email address")
            .header(ContentType::TEXT_HTML)
            .body(html_body)
            .map_err(|e| MailerError::BuildFailed(e.to_string()))?;

        self.send(message).await?;

        tracing::info!(to = %to, "verification email sent");

        Ok(())
    }
}
