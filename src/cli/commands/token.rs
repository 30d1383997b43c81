use clap::{Arg, ArgAction, Command};

pub const CMD_TOKEN: &str = "token";
pub const CMD_ISSUE: &str = "issue";
pub const CMD_VALIDATE: &str = "validate";

pub const ARG_KEYRING: &str = "keyring";
pub const ARG_LIFETIME: &str = "lifetime";
pub const ARG_DOMAIN: &str = "domain";
pub const ARG_USER: &str = "user";
pub const ARG_SCOPE_DOMAIN: &str = "scope-domain";
pub const ARG_PROJECT: &str = "project";
pub const ARG_REVOKED_FILE: &str = "revoked-file";
pub const ARG_REVOCATION_TIMEOUT: &str = "revocation-timeout";
pub const ARG_IGNORE_EXPIRY: &str = "ignore-expiry";
pub const ARG_LEEWAY: &str = "leeway";
pub const ARG_TOKEN: &str = "token";

fn keyring() -> Arg {
    Arg::new(ARG_KEYRING)
        .short('k')
        .long(ARG_KEYRING)
        .help("PEM file of signing keys, active key first")
        .env("WARDEN_KEYRING")
        .required(true)
}

#[must_use]
pub fn command() -> Command {
    Command::new(CMD_TOKEN)
        .about("Issue and validate bearer tokens")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new(CMD_ISSUE)
                .about("Issue a signed token")
                .arg(keyring())
                .arg(
                    Arg::new(ARG_LIFETIME)
                        .long(ARG_LIFETIME)
                        .help("Token lifetime in seconds")
                        .env("WARDEN_TOKEN_LIFETIME")
                        .default_value("3600")
                        .value_parser(clap::value_parser!(u64)),
                )
                .arg(
                    Arg::new(ARG_DOMAIN)
                        .short('d')
                        .long(ARG_DOMAIN)
                        .help("Domain of the subject")
                        .default_value("default"),
                )
                .arg(
                    Arg::new(ARG_USER)
                        .short('u')
                        .long(ARG_USER)
                        .help("User name of the subject")
                        .required(true),
                )
                .arg(
                    Arg::new(ARG_SCOPE_DOMAIN)
                        .long(ARG_SCOPE_DOMAIN)
                        .help("Domain of the scope (default: the subject domain)"),
                )
                .arg(
                    Arg::new(ARG_PROJECT)
                        .short('p')
                        .long(ARG_PROJECT)
                        .help("Project of the scope")
                        .required(true),
                ),
        )
        .subcommand(
            Command::new(CMD_VALIDATE)
                .about("Validate a signed token and print its claims as JSON")
                .arg(keyring())
                .arg(
                    Arg::new(ARG_REVOKED_FILE)
                        .long(ARG_REVOKED_FILE)
                        .help("File of revoked token ids, one per line")
                        .env("WARDEN_REVOKED_FILE"),
                )
                .arg(
                    Arg::new(ARG_REVOCATION_TIMEOUT)
                        .long(ARG_REVOCATION_TIMEOUT)
                        .help("Revocation lookup timeout in seconds")
                        .env("WARDEN_REVOCATION_TIMEOUT")
                        .default_value("5")
                        .value_parser(clap::value_parser!(u64)),
                )
                .arg(
                    Arg::new(ARG_IGNORE_EXPIRY)
                        .long(ARG_IGNORE_EXPIRY)
                        .help("Accept tokens past their expiry")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new(ARG_LEEWAY)
                        .long(ARG_LEEWAY)
                        .help("Clock skew tolerated on expiry, in seconds")
                        .default_value("0")
                        .value_parser(clap::value_parser!(u64)),
                )
                .arg(
                    Arg::new(ARG_TOKEN)
                        .help("Signed token, '-' to read it from stdin")
                        .default_value("-"),
                ),
        )
}
