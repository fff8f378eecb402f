//! Invitation email construction and SMTP delivery.
//!
//! Mirrors the registration flow: one HTML message per successful
//! registration, with the QR entry pass attached inline and referenced by
//! `cid:qr_code` from the markup.

use lettre::{
  AsyncSmtpTransport, AsyncTransport as _, Message, Tokio1Executor,
  message::{Attachment, Mailbox, MultiPart, SinglePart, header::ContentType},
  transport::smtp::authentication::Credentials,
};
use serde::Deserialize;

use crate::{Result, qr::qr_png};

// ─── Configuration ───────────────────────────────────────────────────────────

/// SMTP settings, deserialised from the `[mail]` block of the server config.
/// When the block is absent the mailer runs disabled and registration
/// proceeds without sending anything.
#[derive(Debug, Clone, Deserialize)]
pub struct MailConfig {
  pub smtp_host:    String,
  #[serde(default = "default_smtp_port")]
  pub smtp_port:    u16,
  pub username:     String,
  pub password:     String,
  pub from_name:    String,
  pub from_address: String,
  /// Event branding used in the subject line and message body.
  pub event_name:   String,
}

fn default_smtp_port() -> u16 { 587 }

// ─── Mailer ──────────────────────────────────────────────────────────────────

/// Invitation sender. `Disabled` is a first-class mode, not an error: dev
/// and test environments run without SMTP credentials.
pub enum Mailer {
  Smtp {
    transport:  AsyncSmtpTransport<Tokio1Executor>,
    from:       Mailbox,
    event_name: String,
  },
  Disabled,
}

impl Mailer {
  /// Build a mailer from optional configuration (STARTTLS on the configured
  /// port, username/password auth).
  pub fn from_config(config: Option<&MailConfig>) -> Result<Self> {
    let Some(config) = config else {
      return Ok(Self::Disabled);
    };

    let transport =
      AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
        .port(config.smtp_port)
        .credentials(Credentials::new(
          config.username.clone(),
          config.password.clone(),
        ))
        .build();

    let from: Mailbox =
      format!("{} <{}>", config.from_name, config.from_address).parse()?;

    Ok(Self::Smtp {
      transport,
      from,
      event_name: config.event_name.clone(),
    })
  }

  /// Send the invitation email with the inline QR pass.
  ///
  /// Callers decide what a failure means; the registration endpoint treats
  /// delivery as best-effort and only logs it.
  pub async fn send_invitation(
    &self,
    recipient_email: &str,
    student_name: &str,
    index_number: &str,
  ) -> Result<()> {
    let (transport, from, event_name) = match self {
      Self::Smtp { transport, from, event_name } => (transport, from, event_name),
      Self::Disabled => {
        tracing::info!(
          recipient = recipient_email,
          "mailer disabled; skipping invitation email"
        );
        return Ok(());
      }
    };

    let qr = qr_png(index_number)?;
    let html = invitation_html(event_name, student_name, index_number);

    let message = Message::builder()
      .from(from.clone())
      .to(recipient_email.parse()?)
      .subject(format!("Invitation to {event_name} — your entry pass"))
      .multipart(
        MultiPart::related()
          .singlepart(
            SinglePart::builder()
              .header(ContentType::TEXT_HTML)
              .body(html),
          )
          .singlepart(
            Attachment::new_inline("qr_code".to_string())
              .body(qr, ContentType::parse("image/png")?),
          ),
      )?;

    transport.send(message).await?;
    tracing::info!(recipient = recipient_email, "invitation email sent");
    Ok(())
  }
}

// ─── Template ────────────────────────────────────────────────────────────────

/// Inline-styled HTML body; the QR image is referenced by `cid:qr_code`.
pub fn invitation_html(
  event_name: &str,
  student_name: &str,
  index_number: &str,
) -> String {
  format!(
    r#"<!DOCTYPE html>
<html lang="en">
<head><meta charset="UTF-8"><title>Invitation to {event_name}</title></head>
<body style="margin:0;padding:0;font-family:sans-serif;background-color:#f4f4f4;">
  <table role="presentation" width="100%" cellspacing="0" cellpadding="0"
         style="max-width:600px;margin:0 auto;background-color:#ffffff;">
    <tr>
      <td style="background-color:#1a365d;padding:32px;text-align:center;">
        <h1 style="color:#ffffff;margin:0;">{event_name}</h1>
      </td>
    </tr>
    <tr>
      <td style="padding:32px;">
        <h2 style="color:#333333;">Dear {student_name},</h2>
        <p style="color:#555555;line-height:1.6;">
          Your registration for <strong>{event_name}</strong> has been
          confirmed. Present the QR code below at the entrance for check-in.
        </p>
        <div style="background-color:#f8f9fa;border-radius:8px;padding:24px;text-align:center;margin:24px 0;">
          <img src="cid:qr_code" alt="Your QR entry pass"
               style="max-width:200px;height:auto;">
          <p style="color:#888888;font-size:12px;margin:12px 0 0 0;">
            Index number: <strong>{index_number}</strong>
          </p>
        </div>
        <ul style="color:#555555;line-height:1.8;">
          <li>Save this email or take a screenshot of your QR code</li>
          <li>Carry your student ID for verification</li>
          <li>Arrive at least 15 minutes before the event starts</li>
        </ul>
        <p style="color:#555555;">Best regards,<br>
          <strong>The {event_name} organizing committee</strong></p>
      </td>
    </tr>
    <tr>
      <td style="background-color:#333333;padding:16px;text-align:center;">
        <p style="color:#999999;font-size:12px;margin:0;">
          This is an automated email. Please do not reply to this message.
        </p>
      </td>
    </tr>
  </table>
</body>
</html>"#
  )
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn html_mentions_student_and_pass() {
    let html = invitation_html("Lamitie 2025", "Test Student", "TEST001");
    assert!(html.contains("Test Student"));
    assert!(html.contains("TEST001"));
    assert!(html.contains("cid:qr_code"));
    assert!(html.contains("Lamitie 2025"));
  }

  #[tokio::test]
  async fn disabled_mailer_is_a_silent_success() {
    let mailer = Mailer::from_config(None).unwrap();
    assert!(matches!(mailer, Mailer::Disabled));
    mailer
      .send_invitation("t@example.com", "Test Student", "TEST001")
      .await
      .unwrap();
  }

  #[test]
  fn smtp_port_defaults_to_starttls() {
    assert_eq!(default_smtp_port(), 587);
  }
}
