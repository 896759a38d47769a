//! Best-effort email notification for processed withdrawals
//!
//! Speaks a minimal SMTP dialogue directly over TCP (the target is a plain
//! relay such as mailhog). At most one delivery attempt per withdrawal;
//! every failure mode is a logged warning, never an error to the caller.

use chrono::{NaiveDateTime, Utc};
use rust_decimal::Decimal;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::time::timeout;
use tracing::{info, warn};

use crate::config::MailConfig;
use crate::db::Database;
use crate::withdraw::WithdrawRepository;

const SMTP_TIMEOUT: Duration = Duration::from_secs(5);

pub struct EmailNotifier {
    db: Arc<Database>,
    config: MailConfig,
}

impl EmailNotifier {
    pub fn new(db: Arc<Database>, config: MailConfig) -> Self {
        Self { db, config }
    }

    /// Notify the payout destination of a processed withdrawal.
    ///
    /// Re-reads the withdrawal and its PIX destination fresh: fields like
    /// the processing timestamp are only final after the owning transaction
    /// committed.
    pub async fn notify(&self, withdraw_id: &str) {
        if let Err(e) = self.try_notify(withdraw_id).await {
            warn!(
                withdraw_id,
                error = %e,
                "withdrawal notification failed (non-critical)"
            );
        }
    }

    async fn try_notify(&self, withdraw_id: &str) -> anyhow::Result<()> {
        let Some(withdraw) = WithdrawRepository::find(self.db.pool(), withdraw_id).await? else {
            warn!(withdraw_id, "withdrawal not found for notification");
            return Ok(());
        };

        let Some(pix) = WithdrawRepository::find_pix(self.db.pool(), withdraw_id).await? else {
            warn!(withdraw_id, "no PIX destination on record, skipping notification");
            return Ok(());
        };

        let processed_at = withdraw
            .updated_at
            .unwrap_or_else(|| Utc::now().naive_utc());

        let body = build_email_body(withdraw.amount, processed_at, &pix.kind, &pix.key);
        self.send(&pix.key, "PIX Withdrawal Completed", &body).await?;

        info!(withdraw_id, to = %pix.key, "withdrawal notification sent");
        Ok(())
    }

    async fn send(&self, to: &str, subject: &str, body: &str) -> anyhow::Result<()> {
        let addr = format!("{}:{}", self.config.host, self.config.port);
        let stream = timeout(SMTP_TIMEOUT, TcpStream::connect(&addr)).await??;
        let (read_half, mut writer) = stream.into_split();
        let mut reader = BufReader::new(read_half);

        // Server banner, then the usual dialogue.
        read_reply(&mut reader).await?;
        send_command(&mut reader, &mut writer, "EHLO localhost").await?;
        send_command(
            &mut reader,
            &mut writer,
            &format!("MAIL FROM:<{}>", self.config.from),
        )
        .await?;
        send_command(&mut reader, &mut writer, &format!("RCPT TO:<{}>", to)).await?;
        send_command(&mut reader, &mut writer, "DATA").await?;

        let mut message = String::new();
        message.push_str(&format!("From: {}\r\n", self.config.from));
        message.push_str(&format!("To: {}\r\n", to));
        message.push_str(&format!("Subject: {}\r\n", subject));
        message.push_str("Content-Type: text/html; charset=UTF-8\r\n");
        message.push_str("\r\n");
        message.push_str(body);
        message.push_str("\r\n.\r\n");

        writer.write_all(message.as_bytes()).await?;
        read_reply(&mut reader).await?;

        // Best effort; the mail is already accepted at this point.
        let _ = send_command(&mut reader, &mut writer, "QUIT").await;

        Ok(())
    }
}

async fn send_command(
    reader: &mut BufReader<OwnedReadHalf>,
    writer: &mut OwnedWriteHalf,
    command: &str,
) -> anyhow::Result<String> {
    writer.write_all(command.as_bytes()).await?;
    writer.write_all(b"\r\n").await?;
    read_reply(reader).await
}

/// Read one SMTP reply, skipping "250-..." continuation lines.
async fn read_reply(reader: &mut BufReader<OwnedReadHalf>) -> anyhow::Result<String> {
    loop {
        let mut line = String::new();
        let n = timeout(SMTP_TIMEOUT, reader.read_line(&mut line)).await??;
        if n == 0 {
            anyhow::bail!("SMTP connection closed");
        }

        let bytes = line.as_bytes();
        if bytes.len() >= 4 && bytes[3] == b'-' {
            continue;
        }

        let reply = line.trim().to_string();
        if !reply.starts_with('2') && !reply.starts_with('3') {
            anyhow::bail!("SMTP rejected command: {}", reply);
        }
        return Ok(reply);
    }
}

fn build_email_body(
    amount: Decimal,
    processed_at: NaiveDateTime,
    key_type: &str,
    key: &str,
) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<body>
  <h2>PIX withdrawal completed</h2>
  <p>Your withdrawal has been processed.</p>
  <ul>
    <li><strong>Amount:</strong> R$ {:.2}</li>
    <li><strong>Processed at:</strong> {}</li>
    <li><strong>PIX key type:</strong> {}</li>
    <li><strong>PIX key:</strong> {}</li>
  </ul>
  <p>The amount has been debited from your digital account.</p>
</body>
</html>"#,
        amount,
        processed_at.format("%d/%m/%Y %H:%M:%S"),
        key_type,
        key
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    #[test]
    fn test_email_body_contains_payment_details() {
        let processed_at = NaiveDate::from_ymd_opt(2026, 3, 14)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap();

        let body = build_email_body(dec!(40.00), processed_at, "email", "user@example.com");

        assert!(body.contains("R$ 40.00"));
        assert!(body.contains("14/03/2026 09:30:00"));
        assert!(body.contains("email"));
        assert!(body.contains("user@example.com"));
    }
}
