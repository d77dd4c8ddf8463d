use std::error::Error;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
#[cfg(unix)]
use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};
use crate::keys::{Key, KeyType};

/// `path` holds the private PEM, `path.pub` the public one.
pub fn public_path(path: &str) -> String {
    path.to_string() + ".pub"
}

impl Key {
    pub fn save(&self, path: &str) -> Result<(), Box<dyn Error>> {
        fs::write(public_path(path), self.public_pem())?;
        write_private(path, self.private_pem())?;
        Ok(())
    }

    pub fn load(path: &str, key_type: KeyType) -> Result<Key, Box<dyn Error>> {
        let pem = fs::read_to_string(path)?;
        Ok(Key::from_pem(&pem, key_type)?)
    }
}

/// Owner read/write only on unix, also when overwriting an existing file.
fn write_private(path: &str, pem: &str) -> io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    options.mode(0o600);
    let mut file = options.open(path)?;
    #[cfg(unix)]
    file.set_permissions(fs::Permissions::from_mode(0o600))?;
    file.write_all(pem.as_bytes())
}

pub fn load_public_pem(path: &str) -> Result<String, Box<dyn Error>> {
    Ok(fs::read_to_string(path)?)
}
