use anyhow::Result;
use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter, Registry};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl LogFormat {
    #[must_use]
    pub fn from_arg(value: Option<&str>) -> Self {
        match value {
            Some("json") => Self::Json,
            _ => Self::Text,
        }
    }
}

/// Initialize logging on stderr. `RUST_LOG` overrides the verbosity level.
///
/// # Errors
///
/// Returns an error if the filter directives or the subscriber cannot be set.
pub fn init(verbosity_level: Option<Level>, format: LogFormat) -> Result<()> {
    let verbosity_level = verbosity_level.unwrap_or(Level::ERROR);

    let filter = EnvFilter::builder()
        .with_default_directive(verbosity_level.into())
        .from_env_lossy()
        .add_directive("tokio=error".parse()?);

    match format {
        LogFormat::Text => {
            let fmt_layer = fmt::layer()
                .with_writer(std::io::stderr)
                .with_file(false)
                .with_line_number(false)
                .with_thread_ids(false)
                .with_target(false);
            let subscriber = Registry::default().with(fmt_layer).with(filter);
            tracing::subscriber::set_global_default(subscriber)?;
        }
        LogFormat::Json => {
            let fmt_layer = fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .with_current_span(true)
                .with_target(true);
            let subscriber = Registry::default().with(fmt_layer).with(filter);
            tracing::subscriber::set_global_default(subscriber)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_from_arg() {
        assert_eq!(LogFormat::from_arg(Some("json")), LogFormat::Json);
        assert_eq!(LogFormat::from_arg(Some("text")), LogFormat::Text);
        assert_eq!(LogFormat::from_arg(None), LogFormat::Text);
    }
}
