use clap::{Arg, Command};

pub const CMD_KEYGEN: &str = "keygen";

pub const ARG_KIND: &str = "kind";
pub const ARG_OUT: &str = "out";
pub const ARG_ROTATE: &str = "rotate";

#[must_use]
pub fn command() -> Command {
    Command::new(CMD_KEYGEN)
        .about("Generate a token signing key")
        .arg(
            Arg::new(ARG_KIND)
                .short('k')
                .long(ARG_KIND)
                .help("Signing key kind")
                .default_value("p521")
                .value_parser(["rsa", "p256", "p384", "p521"]),
        )
        .arg(
            Arg::new(ARG_OUT)
                .short('o')
                .long(ARG_OUT)
                .help("Write the key to this file (mode 0600) instead of stdout")
                .conflicts_with(ARG_ROTATE),
        )
        .arg(
            Arg::new(ARG_ROTATE)
                .long(ARG_ROTATE)
                .help("Prepend the key to an existing keyring file, making it the active key"),
        )
}
