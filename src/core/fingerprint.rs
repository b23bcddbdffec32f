//! SleepHQ-compatible content hashing.
//!
//! SleepHQ validates uploads against an MD5 that is *not* a hash of the raw
//! file bytes. Its own implementation decodes each byte as a standalone code
//! point (latin-1 style), re-encodes the resulting text as UTF-8, and hashes
//! that, followed by the file's base name. Bytes >= 0x80 therefore expand to
//! two-byte UTF-8 sequences, so the digest input is longer than the file for
//! any non-ASCII content. This must be reproduced exactly or the service
//! rejects the upload hash.

use anyhow::{Context, Result};
use md5::{Digest, Md5};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Chunk size matching the service's reference hash computation.
const CHUNK_SIZE: usize = 4096;

/// Compute the SleepHQ content hash for the file at `path`.
///
/// Returns the lowercase hex digest. The only failure mode is the file
/// being unreadable.
pub fn fingerprint_file(path: &Path) -> Result<String> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let file =
        File::open(path).with_context(|| format!("failed to open {} for hashing", path.display()))?;
    let mut reader = BufReader::with_capacity(CHUNK_SIZE, file);

    let mut hasher = Md5::new();
    let mut buffer = [0u8; CHUNK_SIZE];
    loop {
        let bytes_read = reader
            .read(&mut buffer)
            .with_context(|| format!("failed to read {} for hashing", path.display()))?;
        if bytes_read == 0 {
            break;
        }
        // Each byte becomes the char with that code point, then the chunk is
        // re-encoded as UTF-8. Per-byte expansion is independent of where
        // chunk boundaries fall.
        let expanded: String = buffer[..bytes_read].iter().map(|&b| b as char).collect();
        hasher.update(expanded.as_bytes());
    }
    hasher.update(name.as_bytes());

    Ok(hex::encode(hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn empty_file_hashes_name_only() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("a");
        fs::write(&path, b"").unwrap();

        // md5("a"), a well-known vector
        assert_eq!(
            fingerprint_file(&path).unwrap(),
            "0cc175b9c0f1b6a831c399e269772661"
        );
    }

    #[test]
    fn digest_is_deterministic() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("therapy.pdat");
        fs::write(&path, b"some therapy data").unwrap();

        let first = fingerprint_file(&path).unwrap();
        let second = fingerprint_file(&path).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), 32);
        assert!(first.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn digest_changes_with_content() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("config.pcfg");

        fs::write(&path, b"version=1").unwrap();
        let before = fingerprint_file(&path).unwrap();

        fs::write(&path, b"version=2").unwrap();
        let after = fingerprint_file(&path).unwrap();
        assert_ne!(before, after);
    }

    #[test]
    fn digest_changes_with_name() {
        let temp = tempdir().unwrap();
        let a = temp.path().join("one.pdat");
        let b = temp.path().join("two.pdat");
        fs::write(&a, b"identical bytes").unwrap();
        fs::write(&b, b"identical bytes").unwrap();

        assert_ne!(
            fingerprint_file(&a).unwrap(),
            fingerprint_file(&b).unwrap()
        );
    }

    #[test]
    fn high_bytes_expand_to_utf8_before_hashing() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("n");
        fs::write(&path, [0xE9u8]).unwrap();

        // 0xE9 as a code point is 'é', whose UTF-8 encoding is C3 A9. The
        // digest input is that expansion followed by the name.
        let expected = hex::encode(Md5::digest([0xC3, 0xA9, b'n']));
        assert_eq!(fingerprint_file(&path).unwrap(), expected);
    }

    #[test]
    fn chunk_boundary_does_not_affect_digest() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("big.pdat");
        // High bytes straddling the 4096-byte chunk boundary
        let content = vec![0xABu8; 5000];
        fs::write(&path, &content).unwrap();

        let expanded: String = content.iter().map(|&b| b as char).collect();
        let mut hasher = Md5::new();
        hasher.update(expanded.as_bytes());
        hasher.update(b"big.pdat");
        let expected = hex::encode(hasher.finalize());

        assert_eq!(fingerprint_file(&path).unwrap(), expected);
    }
}
