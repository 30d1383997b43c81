use clap::{Arg, ArgAction, Command};

pub const CMD_PWHASH: &str = "pwhash";
pub const CMD_PWCHECK: &str = "pwcheck";

pub const ARG_PASSWORD_FILE: &str = "password-file";
pub const ARG_BASE64: &str = "base64";
pub const ARG_CREDENTIAL: &str = "credential";

fn password_file() -> Arg {
    Arg::new(ARG_PASSWORD_FILE)
        .long(ARG_PASSWORD_FILE)
        .help("Read the password from a file instead of prompting")
        .long_help(
            "Read the password from a file instead of prompting. A single trailing newline is removed.",
        )
}

#[must_use]
pub fn pwhash() -> Command {
    Command::new(CMD_PWHASH)
        .about("Hash a password into a scrypt credential")
        .arg(password_file())
        .arg(
            Arg::new(ARG_BASE64)
                .long(ARG_BASE64)
                .help("Base64 encode the credential, for storing in secret stores")
                .action(ArgAction::SetTrue),
        )
}

#[must_use]
pub fn pwcheck() -> Command {
    Command::new(CMD_PWCHECK)
        .about("Check a password against a scrypt credential")
        .arg(
            Arg::new(ARG_CREDENTIAL)
                .long(ARG_CREDENTIAL)
                .help("Encoded credential: scrypt,<salt>,<digest>")
                .env("WARDEN_CREDENTIAL")
                .required(true),
        )
        .arg(password_file())
        .arg(
            Arg::new(ARG_BASE64)
                .long(ARG_BASE64)
                .help("The credential is base64 encoded")
                .action(ArgAction::SetTrue),
        )
}
