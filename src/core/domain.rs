use serde::{Deserialize, Serialize};

// Identifiable defines common traits that can be shared by persistent objects
pub trait Identifiable: Sync + Send {
    fn id(&self) -> String;
}

// MailConfig holds the outbound SMTP settings used by the mail sink
#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub struct MailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_use_tls: bool,
    pub smtp_username: Option<String>,
    pub smtp_password: Option<String>,
    pub smtp_from: String,
    pub smtp_from_name: Option<String>,
}

impl MailConfig {
    pub fn new(smtp_host: &str, smtp_from: &str) -> Self {
        MailConfig {
            smtp_host: smtp_host.to_string(),
            smtp_port: 587,
            smtp_use_tls: true,
            smtp_username: None,
            smtp_password: None,
            smtp_from: smtp_from.to_string(),
            smtp_from_name: None,
        }
    }
}

// Configuration abstracts config options for the lending engine
#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub struct Configuration {
    pub branch_id: String,
    pub book_loan_days: i64,
    pub cd_loan_days: i64,
    pub notification_log_path: String,
    pub fallback_email: String,
    pub mail_to_fallback_only: bool,
    pub mail: Option<MailConfig>,
}

impl Configuration {
    pub fn new(branch_id: &str) -> Self {
        Configuration {
            branch_id: branch_id.to_string(),
            book_loan_days: 28,
            cd_loan_days: 7,
            notification_log_path: "library_notifications.log".to_string(),
            fallback_email: "library@localhost".to_string(),
            mail_to_fallback_only: false,
            mail: None,
        }
    }

    // Overrides the defaults from LENDING_* environment variables.
    pub fn from_env(branch_id: &str) -> Self {
        let mut config = Configuration::new(branch_id);
        if let Some(days) = env_parse::<i64>("LENDING_BOOK_LOAN_DAYS") {
            config.book_loan_days = days;
        }
        if let Some(days) = env_parse::<i64>("LENDING_CD_LOAN_DAYS") {
            config.cd_loan_days = days;
        }
        if let Ok(path) = std::env::var("LENDING_NOTIFICATION_LOG") {
            config.notification_log_path = path;
        }
        if let Ok(email) = std::env::var("LENDING_FALLBACK_EMAIL") {
            config.fallback_email = email;
        }
        if let Some(fixed) = env_parse::<bool>("LENDING_MAIL_TO_FALLBACK_ONLY") {
            config.mail_to_fallback_only = fixed;
        }
        if let (Ok(host), Ok(from)) = (std::env::var("LENDING_SMTP_HOST"), std::env::var("LENDING_SMTP_FROM")) {
            let mut mail = MailConfig::new(host.as_str(), from.as_str());
            if let Some(port) = env_parse::<u16>("LENDING_SMTP_PORT") {
                mail.smtp_port = port;
            }
            if let Some(tls) = env_parse::<bool>("LENDING_SMTP_TLS") {
                mail.smtp_use_tls = tls;
            }
            mail.smtp_username = std::env::var("LENDING_SMTP_USERNAME").ok();
            mail.smtp_password = std::env::var("LENDING_SMTP_PASSWORD").ok();
            mail.smtp_from_name = std::env::var("LENDING_SMTP_FROM_NAME").ok();
            config.mail = Some(mail);
        }
        config
    }
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|v| v.trim().parse::<T>().ok())
}

#[cfg(test)]
mod tests {
    use crate::core::domain::{Configuration, MailConfig};

    #[tokio::test]
    async fn test_should_build_config() {
        let config = Configuration::new("test");
        assert_eq!("test", config.branch_id.as_str());
        assert_eq!(28, config.book_loan_days);
        assert_eq!(7, config.cd_loan_days);
        assert!(!config.mail_to_fallback_only);
        assert_eq!(None, config.mail);
    }

    #[tokio::test]
    async fn test_should_build_mail_config() {
        let mail = MailConfig::new("smtp.example.org", "desk@example.org");
        assert_eq!(587, mail.smtp_port);
        assert!(mail.smtp_use_tls);
    }

    #[tokio::test]
    async fn test_should_read_config_from_env() {
        std::env::set_var("LENDING_CD_LOAN_DAYS", "10");
        let config = Configuration::from_env("env");
        std::env::remove_var("LENDING_CD_LOAN_DAYS");
        assert_eq!(10, config.cd_loan_days);
        assert_eq!(28, config.book_loan_days);
    }
}
