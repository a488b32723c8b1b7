//! Helper de hash – abstracción para poder cambiar de algoritmo sin tocar el
//! resto del core.

use sha2::{Digest, Sha256};

/// Hashea un string y devuelve hex.
pub fn hash_str(input: &str) -> String {
    let mut h = Sha256::new();
    h.update(input.as_bytes());
    let digest = h.finalize();
    let mut out = String::with_capacity(digest.len() * 2);
    for byte in digest {
        out.push_str(&format!("{byte:02x}"));
    }
    out
}
