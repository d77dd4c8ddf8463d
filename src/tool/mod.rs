use std::error::Error;
use std::fs::{self, File};
use std::io::{self, Read, Write};
use clap::Parser;
use sha2::{Digest, Sha256};

use crate::config::{init_silent, CONFIG_DEF};
use crate::keys::*;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunMode {
    Generate,
    Sign,
    Verify,
    Test,
}

#[macro_export]
macro_rules! tool_t {
    ($CONFIG: expr, $NAME: ident) => {
#[derive(Debug, Clone, Parser)]
#[clap(name = "ledger-keys", about = "Generate ledger identity keys, sign and verify data")]
pub struct $NAME {
    #[clap(short, long, value_parser, default_value = $CONFIG.mode.as_str(), help = "Run mode: generate, sign, verify, test")]
    pub mode: String,
    #[clap(short, long, value_parser, default_value = $CONFIG.key.as_str(), help = "Private key path, public key at `path.pub'")]
    pub key: String,
    #[clap(long, value_parser, default_value = $CONFIG.key_type.as_str(), help = "Key type: rsa, elliptic")]
    pub key_type: String,
    #[clap(short, long, value_parser, default_value = $CONFIG.input.as_str(), help = "Input filename")]
    pub input: String,
    #[clap(short, long, value_parser, default_value = $CONFIG.output.as_str(), help = "Output filename")]
    pub output: String,
    #[clap(long, value_parser, default_value = $CONFIG.signature.as_str(), help = "Base64 signature file to verify")]
    pub signature: String,
    #[clap(short = 'n', long, value_parser, default_value_t = $CONFIG.count, help = "Generate <COUNT> keys as `key.0', `key.1', ...")]
    pub count: usize,
    #[clap(short, long, value_parser, default_value_t = $CONFIG.threads, help = "Generate in <THREADS> threads")]
    pub threads: usize,
    #[clap(short, long, value_parser, default_value_t = $CONFIG.silent, help = "Disable log output")]
    pub silent: bool,
}
    };
}

tool_t!(CONFIG_DEF, Tool);

impl Tool {
    pub fn reader(&self) -> Result<Box<dyn Read>, Box<dyn Error>> {
        Ok(match self.input.as_str() {
            "stdin" => Box::new(io::stdin()),
            f => Box::new(File::open(f)?),
        })
    }

    pub fn writer(&self) -> Result<Box<dyn Write>, Box<dyn Error>> {
        Ok(match self.output.as_str() {
            "stdout" => Box::new(io::stdout()),
            f => Box::new(File::create(f)?),
        })
    }

    pub fn run_mode(&self) -> Result<RunMode, Box<dyn Error>> {
        match self.mode.as_str() {
            "generate" => Ok(RunMode::Generate),
            "sign" => Ok(RunMode::Sign),
            "verify" => Ok(RunMode::Verify),
            "test" => Ok(RunMode::Test),
            _ => Err("Unknown run mode! available: generate(default), sign, verify, test".into()),
        }
    }

    fn read_input(&self) -> Result<Vec<u8>, Box<dyn Error>> {
        let mut data = Vec::new();
        self.reader()?.read_to_end(&mut data)?;
        Ok(data)
    }

    pub fn run(&mut self) -> Result<(), Box<dyn Error>> {
        init_silent(self.silent);
        let key_type: KeyType = self.key_type.parse()?;
        match self.run_mode()? {
            RunMode::Generate => {
                if self.count <= 1 {
                    let key = Key::generate(key_type)?;
                    key.save(&self.key)?;
                    if !self.silent { println!("Generated key files: {}, {}", self.key, public_path(&self.key)); }
                } else {
                    let keys = generate_batch(key_type, self.count, self.threads)?;
                    for (i, key) in keys.iter().enumerate() {
                        key.save(&format!("{}.{}", self.key, i))?;
                    }
                    if !self.silent { println!("Generated {} key pairs: {}.0 .. {}.{}", keys.len(), self.key, self.key, keys.len() - 1); }
                }
            }
            RunMode::Sign => {
                let key = Key::load(&self.key, key_type)?;
                let data = self.read_input()?;
                let sig = key.sign(&data)?;
                let mut writer = self.writer()?;
                writeln!(writer, "{}", sig.to_base64())?;
                writer.flush()?;
                if !self.silent { println!("Signed {} bytes with {} key {}", data.len(), key_type, self.key); }
            }
            RunMode::Verify => {
                let data = self.read_input()?;
                let digest = Sha256::digest(&data);
                let sig = base64::decode(fs::read_to_string(&self.signature)?.trim())?;
                let public_pem = load_public_pem(&public_path(&self.key))?;
                let verified = Key::verify_with_pem(&sig, &digest, &public_pem, key_type)?;
                let mut writer = self.writer()?;
                writeln!(writer, "{}", if verified { "Verified" } else { "Verification failed" })?;
                writer.flush()?;
                if !verified {
                    return Err(KeyError::Verification(format!("signature {} does not match {}", self.signature, self.input)).into());
                }
            }
            RunMode::Test => {
                let key = Key::load(&self.key, key_type)?;
                if !self.silent {
                    match &key {
                        Key::Rsa(k) => println!("{} key, {} bits", key_type, k.bits()),
                        Key::Elliptic(_) => println!("{} key, secp256k1", key_type),
                    }
                    print!("{}", key.public_pem());
                }
                let data = rand::random::<[u8; 32]>();
                let sig = key.sign(&data)?;
                if !key.verify(&sig.bytes, &sig.digest) || !Key::verify_with_pem(&sig.bytes, &sig.digest, key.public_pem(), key_type)? {
                    return Err(KeyError::Verification("key pair self-test failed".to_string()).into());
                }
                if !self.silent { println!("Test pass"); }
            }
        }
        Ok(())
    }
}
