mod aes;
mod convert;
mod inspect;
mod rsa;

use std::path::Path;

use anyhow::{Context, Result};

use wincrypto::KeyBlob;

pub use self::aes::AesCommand;
pub use self::convert::ConvertCommand;
pub use self::inspect::InspectCommand;
pub use self::rsa::RsaCommand;

/**
    Decode a binary argument: `@path` reads the file as raw bytes,
    anything else is parsed as hex (whitespace ignored).
*/
pub(crate) fn read_data(arg: &str) -> Result<Vec<u8>> {
    if let Some(path) = arg.strip_prefix('@') {
        return std::fs::read(path).with_context(|| format!("failed to read {path}"));
    }
    let hex: String = arg.chars().filter(|c| !c.is_whitespace()).collect();
    hex::decode(&hex).context("expected hex data or @file")
}

/**
    Load a key blob file, accepting raw blob bytes or base64 text.
*/
pub(crate) fn load_blob(path: &Path) -> Result<KeyBlob> {
    let data = std::fs::read(path)
        .with_context(|| format!("failed to read key blob {}", path.display()))?;

    match KeyBlob::from_bytes(&data) {
        Ok(blob) => Ok(blob),
        Err(raw_err) => {
            let text: Vec<u8> = data.into_iter().filter(|b| !b.is_ascii_whitespace()).collect();
            KeyBlob::from_base64(&text)
                .map_err(|_| raw_err)
                .with_context(|| format!("failed to parse key blob {}", path.display()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_argument() {
        assert_eq!(read_data("01020304").unwrap(), [1, 2, 3, 4]);
        assert_eq!(read_data("01 02\n03").unwrap(), [1, 2, 3]);
        assert!(read_data("").unwrap().is_empty());
        assert!(read_data("0g").is_err());
    }

    #[test]
    fn file_argument() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.bin");
        std::fs::write(&path, [9, 8, 7]).unwrap();
        let arg = format!("@{}", path.display());
        assert_eq!(read_data(&arg).unwrap(), [9, 8, 7]);
        assert!(read_data("@/nonexistent/wincrypto-data.bin").is_err());
    }

    #[test]
    fn blob_file_raw_or_base64() {
        let key = wincrypto::AesKey::new([3u8; 16]).unwrap();
        let dir = tempfile::tempdir().unwrap();

        let raw = dir.path().join("raw.blob");
        std::fs::write(&raw, key.to_blob()).unwrap();
        assert_eq!(load_blob(&raw).unwrap(), KeyBlob::PlainText(key.clone()));

        let b64 = dir.path().join("b64.blob");
        let text = format!("{}\n", KeyBlob::from(key.clone()).to_base64().unwrap());
        std::fs::write(&b64, text).unwrap();
        assert_eq!(load_blob(&b64).unwrap(), KeyBlob::PlainText(key));

        let junk = dir.path().join("junk.blob");
        std::fs::write(&junk, b"not a blob").unwrap();
        assert!(load_blob(&junk).is_err());
    }
}
