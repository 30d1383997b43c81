use crate::cli::actions::{keygen, keypair, password, token, Action};
use anyhow::Result;

/// Execute the provided action.
// This is the single dispatch point for all CLI actions.
/// # Errors
/// Returns an error if the action fails.
pub async fn execute(action: Action) -> Result<()> {
    match action {
        Action::PasswordHash(args) => password::hash(args).await,
        Action::PasswordCheck(args) => password::check(args).await,
        Action::KeypairCreate(args) => keypair::create(args).await,
        Action::KeypairFingerprint(args) => keypair::fingerprint(args).await,
        Action::Keygen(args) => keygen::execute(args).await,
        Action::TokenIssue(args) => token::issue(args).await,
        Action::TokenValidate(args) => token::validate(args).await,
    }
}
