use anyhow::{Context, Result};
use secrecy::{ExposeSecret, SecretString};
use tokio::io::{AsyncReadExt, AsyncWriteExt};

pub const STDIN: &str = "-";

/// Remove a single trailing `\n` or `\r\n`.
#[must_use]
pub fn trim_newline(value: &str) -> &str {
    let value = value.strip_suffix('\n').unwrap_or(value);
    value.strip_suffix('\r').unwrap_or(value)
}

/// Read a whole file, or stdin when `path` is `-`.
///
/// # Errors
/// Returns an error if the input cannot be read.
pub async fn read_input(path: &str) -> Result<String> {
    if path == STDIN {
        let mut input = String::new();
        tokio::io::stdin()
            .read_to_string(&mut input)
            .await
            .context("failed to read stdin")?;
        return Ok(input);
    }

    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read {path}"))
}

/// Write private material to `path`, readable by the owner only.
///
/// # Errors
/// Returns an error if the file cannot be created or written.
pub async fn write_secret(path: &str, contents: &SecretString) -> Result<()> {
    let mut options = tokio::fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    options.mode(0o600);

    let mut file = options
        .open(path)
        .await
        .with_context(|| format!("failed to create {path}"))?;
    file.write_all(contents.expose_secret().as_bytes())
        .await
        .with_context(|| format!("failed to write {path}"))?;
    file.flush().await?;
    Ok(())
}

/// Read a password from `file`, or prompt on the terminal.
///
/// With `confirm`, the prompt repeats until two entries match.
///
/// # Errors
/// Returns an error if the file or the terminal cannot be read.
pub async fn read_password(file: Option<&str>, confirm: bool) -> Result<SecretString> {
    if let Some(path) = file {
        let contents = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read password file {path}"))?;
        return Ok(SecretString::from(trim_newline(&contents)));
    }

    tokio::task::spawn_blocking(move || -> Result<SecretString> {
        loop {
            let password = rpassword::prompt_password("Password: ")
                .context("failed to read password")?;
            if !confirm {
                return Ok(SecretString::from(password));
            }
            let again = rpassword::prompt_password("Confirm password: ")
                .context("failed to read password")?;
            if password == again {
                return Ok(SecretString::from(password));
            }
            eprintln!("Passwords do not match, try again");
        }
    })
    .await
    .context("password prompt task failed")?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trim_newline() {
        assert_eq!(trim_newline("secret\n"), "secret");
        assert_eq!(trim_newline("secret\r\n"), "secret");
        assert_eq!(trim_newline("secret\n\n"), "secret\n");
        assert_eq!(trim_newline("secret"), "secret");
        assert_eq!(trim_newline(" secret "), " secret ");
    }

    #[tokio::test]
    async fn test_read_password_file() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("password");
        std::fs::write(&path, "correct horse battery staple\n")?;

        let password = read_password(path.to_str(), true).await?;
        assert_eq!(password.expose_secret(), "correct horse battery staple");
        Ok(())
    }

    #[tokio::test]
    async fn test_write_secret() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("key.pem");
        let path = path.to_str().context("non UTF-8 temp path")?;

        write_secret(path, &SecretString::from("private")).await?;
        assert_eq!(read_input(path).await?, "private");

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = std::fs::metadata(path)?.permissions().mode();
            assert_eq!(mode & 0o777, 0o600);
        }
        Ok(())
    }

    #[tokio::test]
    async fn test_read_input_missing_file() {
        let err = read_input("/nonexistent/warden/input").await.unwrap_err();
        assert!(err.to_string().contains("/nonexistent/warden/input"));
    }
}
