//! Machine-bound AES-256-CBC file vault
//!
//! Key material is derived from the machine's MAC address and hostname,
//! padded with a configurable character to 32 bytes (key) and 16 bytes (IV).
//! The connector service on the same machine derives the identical key, so
//! no key is ever stored or transmitted.

use cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use async_trait::async_trait;
use std::fs;
use std::path::Path;
use std::process::Command;

use super::paths;
use crate::domain::collaborators::{CipherVault, SavedFile, VaultError};

type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

/// MAC used when no suitable network interface can be detected
const FALLBACK_MAC: &str = "902E168B9AC1";

/// File vault bound to the local machine identity
pub struct MachineKeyVault {
    pad_char: char,
}

impl MachineKeyVault {
    pub fn new(pad_char: char) -> Self {
        Self { pad_char }
    }

    fn key_material(&self) -> (Vec<u8>, Vec<u8>) {
        let info = machine_info();
        let key = pad_bytes(&info, 32, self.pad_char);
        let iv = pad_bytes(&info, 16, self.pad_char);
        (key, iv)
    }

    fn encrypt_bytes(&self, data: &[u8]) -> Result<Vec<u8>, VaultError> {
        let (key, iv) = self.key_material();
        let cipher = Aes256CbcEnc::new_from_slices(&key, &iv)
            .map_err(|e| VaultError::Cipher(e.to_string()))?;
        Ok(cipher.encrypt_padded_vec_mut::<Pkcs7>(data))
    }

    fn decrypt_bytes(&self, data: &[u8]) -> Result<Vec<u8>, VaultError> {
        let (key, iv) = self.key_material();
        let cipher = Aes256CbcDec::new_from_slices(&key, &iv)
            .map_err(|e| VaultError::Cipher(e.to_string()))?;
        cipher
            .decrypt_padded_vec_mut::<Pkcs7>(data)
            .map_err(|e| VaultError::Cipher(e.to_string()))
    }
}

#[async_trait]
impl CipherVault for MachineKeyVault {
    async fn encrypt(
        &self,
        json_data: &str,
        output_path: Option<&str>,
        username: &str,
    ) -> Result<SavedFile, VaultError> {
        let encrypted = self.encrypt_bytes(json_data.as_bytes())?;

        let path = match output_path {
            Some(requested) => paths::resolve_output_path(requested),
            None => paths::default_output_path(username),
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| VaultError::Io(format!("Failed to create directory: {e}")))?;
        }
        fs::write(&path, &encrypted)
            .map_err(|e| VaultError::Io(format!("Failed to write file: {e}")))?;

        let path = path.to_string_lossy().to_string();
        tracing::info!(path = %path, bytes = encrypted.len(), "encrypted configuration written");
        Ok(SavedFile {
            message: format!("Encryption successful. File saved to: {path}"),
            path,
        })
    }

    async fn decrypt(&self, file_path: Option<&str>, username: &str) -> Result<String, VaultError> {
        let path = match file_path {
            Some(p) => Path::new(p).to_path_buf(),
            None => paths::find_existing(username)
                .ok_or_else(|| VaultError::NotFound(paths::config_file_name(username)))?,
        };
        let encrypted = fs::read(&path)
            .map_err(|e| VaultError::Io(format!("Failed to read file: {e}")))?;
        let decrypted = self.decrypt_bytes(&encrypted)?;
        String::from_utf8(decrypted)
            .map_err(|e| VaultError::Cipher(format!("Decrypted data is not valid UTF-8: {e}")))
    }

    async fn exists(&self, username: &str) -> Result<bool, VaultError> {
        Ok(paths::find_existing(username).is_some())
    }
}

/// Pad or truncate to exactly `length` bytes
fn pad_bytes(input: &str, length: usize, pad_char: char) -> Vec<u8> {
    let mut bytes = input.as_bytes().to_vec();
    bytes.truncate(length);
    while bytes.len() < length {
        bytes.push(pad_char as u8);
    }
    bytes
}

/// MAC address + hostname, matching the connector's key derivation
fn machine_info() -> String {
    let mac = detect_mac().unwrap_or_else(|| {
        tracing::debug!("no usable network interface, using fallback MAC");
        FALLBACK_MAC.to_string()
    });
    let host = hostname::get()
        .map(|h| h.to_string_lossy().into_owned())
        .unwrap_or_else(|_| "unknown".to_string());
    format!("{mac}{host}")
}

/// Pick the MAC of the first physical ethernet/wifi interface
///
/// Parses `ipconfig /all`; virtual, VPN and loopback adapters are skipped,
/// with a second pass accepting anything that is not loopback.
fn detect_mac() -> Option<String> {
    let output = Command::new("ipconfig").arg("/all").output().ok()?;
    let text = String::from_utf8(output.stdout).ok()?;

    let mut interfaces: Vec<(String, String)> = Vec::new();
    let mut current: Option<(String, String)> = None;
    for line in text.lines() {
        let line = line.trim();
        if line.contains("adapter") && line.ends_with(':') {
            if let Some((name, mac)) = current.take() {
                if !mac.is_empty() {
                    interfaces.push((name, mac));
                }
            }
            current = Some((line.trim_end_matches(':').to_string(), String::new()));
        }
        if line.contains("Physical Address") {
            if let (Some(mac_part), Some((_, mac))) = (line.split(':').nth(1), current.as_mut()) {
                *mac = mac_part.trim().replace(['-', ':'], "");
            }
        }
    }
    if let Some((name, mac)) = current {
        if !mac.is_empty() {
            interfaces.push((name, mac));
        }
    }

    for (name, mac) in &interfaces {
        let name = name.to_lowercase();
        if !name.contains("virtual")
            && !name.contains("vpn")
            && !name.contains("vethernet")
            && !name.contains("loopback")
            && ((name.contains("ethernet") && !name.contains("vethernet"))
                || name.contains("wi-fi")
                || name.contains("wlan"))
        {
            return Some(mac.clone());
        }
    }
    interfaces
        .iter()
        .find(|(name, _)| !name.to_lowercase().contains("loopback"))
        .map(|(_, mac)| mac.clone())
}
