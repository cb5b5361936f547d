/// Email delivery trait and implementations
///
/// The sweep hands finished notifications to a [`Mailer`]. The trait keeps
/// the transport swappable; [`LogMailer`] writes messages to the log and is
/// the default deployment, since real SMTP delivery is handled by an
/// external relay in production.
///
/// # Contract
///
/// Implementations must:
/// 1. Be cheap to call; the sweep awaits each send inline
/// 2. Report failure through the error type, never panic
///
/// Send failures never abort a sweep; the caller logs and moves on.
///
/// # Example
///
/// ```no_run
/// use taskhive_worker::mailer::{LogMailer, Mailer};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let mailer = LogMailer::new();
/// mailer
///     .send("alice@example.com", "Task due soon", "Your task is due in 3 hours")
///     .await?;
/// # Ok(())
/// # }
/// ```

use async_trait::async_trait;

/// Mailer error types
#[derive(Debug, thiserror::Error)]
pub enum MailerError {
    /// Recipient address could not be used
    #[error("Invalid recipient: {0}")]
    InvalidRecipient(String),

    /// Transport-level failure
    #[error("Delivery failed: {0}")]
    DeliveryFailed(String),
}

/// Mailer result type alias
pub type MailerResult<T> = Result<T, MailerError>;

/// Email delivery contract
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Implementation name, for logging
    fn name(&self) -> &str;

    /// Delivers one message
    async fn send(&self, to: &str, subject: &str, body: &str) -> MailerResult<()>;
}

/// Mailer that writes messages to the tracing log
///
/// Used in development and in deployments where an external relay picks
/// messages up from the log pipeline.
#[derive(Debug, Clone, Default)]
pub struct LogMailer;

impl LogMailer {
    /// Creates a new log mailer
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Mailer for LogMailer {
    fn name(&self) -> &str {
        "log"
    }

    async fn send(&self, to: &str, subject: &str, body: &str) -> MailerResult<()> {
        if to.is_empty() {
            return Err(MailerError::InvalidRecipient("empty address".to_string()));
        }

        tracing::info!(recipient = %to, subject = %subject, body = %body, "Email dispatched");
        Ok(())
    }
}

#[cfg(test)]
pub mod testing {
    //! Capturing mailer for sweep tests

    use super::*;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    /// One captured message
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct SentMail {
        pub to: String,
        pub subject: String,
        pub body: String,
    }

    /// Mailer that records every send for assertions
    #[derive(Debug, Clone, Default)]
    pub struct CapturingMailer {
        pub sent: Arc<Mutex<Vec<SentMail>>>,
        pub fail: bool,
    }

    impl CapturingMailer {
        pub fn new() -> Self {
            Self::default()
        }

        /// A mailer whose every send fails
        pub fn failing() -> Self {
            Self {
                fail: true,
                ..Self::default()
            }
        }
    }

    #[async_trait]
    impl Mailer for CapturingMailer {
        fn name(&self) -> &str {
            "capturing"
        }

        async fn send(&self, to: &str, subject: &str, body: &str) -> MailerResult<()> {
            if self.fail {
                return Err(MailerError::DeliveryFailed("simulated failure".to_string()));
            }

            self.sent.lock().await.push(SentMail {
                to: to.to_string(),
                subject: subject.to_string(),
                body: body.to_string(),
            });
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::CapturingMailer;
    use super::*;

    #[tokio::test]
    async fn test_log_mailer_accepts_message() {
        let mailer = LogMailer::new();
        let result = mailer
            .send("alice@example.com", "Task due soon", "Your task is due in 3 hours")
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_log_mailer_rejects_empty_recipient() {
        let mailer = LogMailer::new();
        let result = mailer.send("", "subject", "body").await;
        assert!(matches!(result, Err(MailerError::InvalidRecipient(_))));
    }

    #[tokio::test]
    async fn test_capturing_mailer_records_sends() {
        let mailer = CapturingMailer::new();
        mailer.send("bob@example.com", "s", "b").await.unwrap();

        let sent = mailer.sent.lock().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "bob@example.com");
    }
}
