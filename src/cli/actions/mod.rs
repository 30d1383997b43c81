pub mod io;
pub mod keygen;
pub mod keypair;
pub mod password;
pub mod token;

// Internal "interpreter" for `Action`.
mod run;

#[derive(Debug)]
pub enum Action {
    PasswordHash(password::HashArgs),
    PasswordCheck(password::CheckArgs),
    KeypairCreate(keypair::CreateArgs),
    KeypairFingerprint(keypair::FingerprintArgs),
    Keygen(keygen::Args),
    TokenIssue(token::IssueArgs),
    TokenValidate(token::ValidateArgs),
}

impl Action {
    /// Execute the action.
    /// # Errors
    /// Returns an error if the action fails.
    pub async fn execute(self) -> anyhow::Result<()> {
        run::execute(self).await
    }
}
