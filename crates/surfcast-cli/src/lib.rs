use anyhow::Context;
use serde::Serialize;
use surfcast_core::{SessionContext, SessionUser, UserMetadata};
use surfcast_processing::{
    Notification, NotificationLevel, Notifier, ProgressReporter, UploadStage,
};

/// Initialize tracing for CLI binaries. Production logs are JSON.
pub fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

pub fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize response")?;
    println!("{}", out);
    Ok(())
}

/// Identity flags shared by commands that act on behalf of a user
#[derive(Debug, Clone, Default, clap::Args)]
pub struct IdentityArgs {
    /// Authenticated user id
    #[arg(long, env = "SURFCAST_USER_ID")]
    pub user: Option<String>,
    #[arg(long, env = "SURFCAST_USER_EMAIL")]
    pub email: Option<String>,
    #[arg(long)]
    pub full_name: Option<String>,
    #[arg(long)]
    pub phone: Option<String>,
    #[arg(long)]
    pub avatar_url: Option<String>,
}

impl IdentityArgs {
    /// Session for these flags; anonymous when no user id was given.
    pub fn session(&self) -> SessionContext {
        match self.user.as_deref().map(str::trim).filter(|u| !u.is_empty()) {
            Some(id) => SessionContext::authenticated(SessionUser {
                id: id.to_string(),
                email: self.email.clone(),
                metadata: UserMetadata {
                    full_name: self.full_name.clone(),
                    phone: self.phone.clone(),
                    avatar_url: self.avatar_url.clone(),
                },
            }),
            None => SessionContext::anonymous(),
        }
    }
}

pub fn format_notification(notification: &Notification) -> String {
    let marker = match notification.level {
        NotificationLevel::Success => "✅",
        NotificationLevel::Warning => "⚠️",
        NotificationLevel::Error => "❌",
    };
    format!("{} {}: {}", marker, notification.title, notification.message)
}

/// Prints notifications to stderr
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notification: &Notification) {
        eprintln!("{}", format_notification(notification));
    }
}

/// Prints upload milestones to stderr
pub struct ConsoleProgress;

impl ProgressReporter for ConsoleProgress {
    fn report(&self, stage: UploadStage) {
        eprintln!("upload: {:>3}% ({:?})", stage.percent(), stage);
    }
}
