use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{ArgAction, CommandFactory, Parser};
use log::{info, warn};
use scrypt_kdf::{
    CostParams, Error, HashFormat, Scrypt, base91, crypto, hash_password, logging, verify,
};
use zeroize::Zeroizing;

mod auth;

const MIB: u64 = 1024 * 1024;

/// Default derived key size in bits.
const KEY_BITS: u32 = (crypto::KEY_LEN * 8) as u32;
/// Default salt size in bits.
const SALT_BITS: u32 = (crypto::SALT_LEN * 8) as u32;

#[derive(Debug, clap::Args)]
struct DerivationArgs {
    /// Salt, or "-" for a random salt of SALT_SIZE bits
    salt: Option<String>,

    /// scrypt work factor, a power of two greater than 1
    #[arg(value_name = "N", env = "SCRYPT_KDF_N", default_value_t = CostParams::default().n())]
    n: u64,

    /// scrypt block size factor
    #[arg(value_name = "R", env = "SCRYPT_KDF_R", default_value_t = CostParams::default().r())]
    r: u32,

    /// scrypt parallelization factor
    #[arg(value_name = "P", env = "SCRYPT_KDF_P", default_value_t = CostParams::default().p())]
    p: u32,

    /// Derived key size in bits
    #[arg(value_name = "SIZE", env = "SCRYPT_KDF_SIZE", default_value_t = KEY_BITS)]
    size: u32,

    /// Random salt size in bits, used only without an explicit salt [default: 128]
    #[arg(value_name = "SALT_SIZE", env = "SCRYPT_KDF_SALT_SIZE")]
    salt_size: Option<u32>,
}

impl DerivationArgs {
    fn to_cost_params(&self) -> CostParams {
        CostParams::new(self.n, self.r, self.p)
    }

    fn key_len(&self) -> usize {
        (self.size / 8) as usize
    }

    /// An explicit salt wins over a salt size; without either a 128-bit
    /// random salt is generated.
    fn resolve_salt(&self, base91_input: bool) -> Result<Vec<u8>> {
        match self.salt.as_deref() {
            Some(salt) if salt != "-" => {
                if self.salt_size.is_some() {
                    warn!("explicit salt given, ignoring salt size");
                }
                Ok(decode_input(salt, base91_input)
                    .context("invalid salt argument")?
                    .to_vec())
            }
            _ => {
                let bits = self.salt_size.unwrap_or(SALT_BITS);
                info!("generating {bits} bit random salt");
                crypto::generate_salt((bits / 8) as usize)
            }
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "scrypt-kdf")]
#[command(
    version,
    disable_version_flag = true,
    about = "Derive scrypt keys and encode them with their parameters as a single string."
)]
struct Cli {
    /// Password and salt arguments are base91 encoded
    #[arg(short = 'b', long = "base91-input")]
    base91_input: bool,

    /// Test if HASH is derived from the password
    #[arg(short, long, value_name = "HASH", allow_hyphen_values = true)]
    check: Option<String>,

    /// Use the crypt format ($7$N$r$p$salt$key)
    #[arg(short = 'p', long)]
    crypt: bool,

    /// Read the password from the terminal or stdin when none is given
    #[arg(long)]
    prompt: bool,

    /// Refuse derivations needing more than this many MiB [default: 1024]
    #[arg(long, value_name = "MIB", env = "SCRYPT_KDF_MAX_MEMORY")]
    max_memory: Option<u64>,

    /// Print version
    #[arg(short = 'v', long, action = ArgAction::Version)]
    version: Option<bool>,

    /// Password to derive from or to check
    #[arg(env = "SCRYPT_KDF_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    #[command(flatten)]
    derivation: DerivationArgs,
}

impl Cli {
    fn format(&self) -> HashFormat {
        if self.crypt {
            HashFormat::Crypt
        } else {
            HashFormat::Base91
        }
    }

    fn kdf(&self) -> Scrypt {
        match self.max_memory {
            Some(mib) => Scrypt::with_memory_limit(mib.saturating_mul(MIB)),
            None => Scrypt::new(),
        }
    }
}

fn decode_input(arg: &str, base91_input: bool) -> Result<Zeroizing<Vec<u8>>, Error> {
    if base91_input {
        Ok(Zeroizing::new(base91::decode(arg)?))
    } else {
        Ok(Zeroizing::new(arg.as_bytes().to_vec()))
    }
}

fn read_password(cli: &mut Cli) -> Result<Option<Zeroizing<Vec<u8>>>> {
    let raw = match cli.password.take() {
        Some(pw) => Zeroizing::new(pw),
        None if cli.prompt && cli.check.is_some() => auth::read_password()?,
        None if cli.prompt => auth::read_new_password()?,
        None => return Ok(None),
    };

    let password = decode_input(&raw, cli.base91_input).context("invalid password argument")?;
    Ok(Some(password))
}

fn run(mut cli: Cli) -> Result<ExitCode> {
    let Some(password) = read_password(&mut cli)? else {
        eprintln!("missing argument \"password\"\n");
        eprintln!("{}", Cli::command().render_help());
        return Ok(ExitCode::from(1));
    };

    let kdf = cli.kdf();

    if let Some(hash) = cli.check.as_deref() {
        if cli.derivation.salt.is_some() {
            warn!("checking a hash, ignoring salt and cost arguments");
        }
        // --crypt forces the crypt codec, otherwise sniff the prefix
        let format = if cli.crypt {
            HashFormat::Crypt
        } else {
            HashFormat::detect(hash)
        };
        let outcome = verify(&kdf, &password, hash, format)?;
        println!("{outcome}");
    } else {
        let salt = cli.derivation.resolve_salt(cli.base91_input)?;
        let hash = hash_password(
            &kdf,
            &password,
            &salt,
            cli.derivation.to_cost_params(),
            cli.derivation.key_len(),
            cli.format(),
        )?;
        println!("{hash}");
    }

    Ok(ExitCode::SUCCESS)
}

fn exit_code(err: &anyhow::Error) -> ExitCode {
    match err.downcast_ref::<Error>() {
        Some(e) => ExitCode::from(e.code()),
        None => ExitCode::FAILURE,
    }
}

fn main() -> ExitCode {
    logging::init();
    let cli = Cli::parse();

    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            exit_code(&err)
        }
    }
}
