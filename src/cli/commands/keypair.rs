use crate::crypto::keys::{MAX_KEY_BITS, MIN_KEY_BITS};
use clap::builder::RangedU64ValueParser;
use clap::{Arg, Command};

pub const CMD_KEYPAIR: &str = "keypair";
pub const CMD_CREATE: &str = "create";
pub const CMD_FINGERPRINT: &str = "fingerprint";

pub const ARG_TYPE: &str = "type";
pub const ARG_ALGORITHM: &str = "algorithm";
pub const ARG_BITS: &str = "bits";
pub const ARG_OUT: &str = "out";
pub const ARG_INPUT: &str = "input";
pub const ARG_X509_MODE: &str = "x509-mode";

fn key_type() -> Arg {
    Arg::new(ARG_TYPE)
        .short('t')
        .long(ARG_TYPE)
        .help("Keypair type")
        .default_value("ssh")
        .value_parser(["ssh", "x509"])
}

#[must_use]
pub fn command() -> Command {
    Command::new(CMD_KEYPAIR)
        .about("Create keypairs and fingerprint public keys")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new(CMD_CREATE)
                .about("Create a keypair")
                .arg(key_type())
                .arg(
                    Arg::new(ARG_ALGORITHM)
                        .short('a')
                        .long(ARG_ALGORITHM)
                        .help("Key algorithm")
                        .default_value("rsa")
                        .value_parser(["rsa", "dsa", "ecdsa", "ed25519"]),
                )
                .arg(
                    Arg::new(ARG_BITS)
                        .short('b')
                        .long(ARG_BITS)
                        .help("Key size in bits")
                        .default_value("2048")
                        .value_parser(
                            RangedU64ValueParser::<usize>::new()
                                .range(MIN_KEY_BITS as u64..=MAX_KEY_BITS as u64),
                        ),
                )
                .arg(
                    Arg::new(ARG_OUT)
                        .short('o')
                        .long(ARG_OUT)
                        .help("Write the private key to this file (mode 0600) instead of stdout"),
                ),
        )
        .subcommand(
            Command::new(CMD_FINGERPRINT)
                .about("Fingerprint a public key or certificate")
                .arg(key_type())
                .arg(
                    Arg::new(ARG_X509_MODE)
                        .long(ARG_X509_MODE)
                        .help("X.509 fingerprint mode")
                        .long_help(
                            "X.509 fingerprint mode. 'sha1' hashes the certificate DER, 'legacy' reproduces fingerprints recorded by older deployments.",
                        )
                        .default_value("sha1")
                        .value_parser(["sha1", "legacy"]),
                )
                .arg(
                    Arg::new(ARG_INPUT)
                        .help("File holding the public key, '-' for stdin")
                        .default_value("-"),
                ),
        )
}
