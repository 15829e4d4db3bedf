//! Online-mode cryptography (§4.D): the RSA keypair, the Mojang server-hash
//! digest, and the `hasJoined` session-server check. Grounded in the
//! teacher's `valence_network::connect::login_online`, adapted to this
//! server's offline-UUID-free online flow and its own `rsa` crate version.

use anyhow::{bail, Context};
use num_bigint::BigInt;
use rsa::{Pkcs1v15Encrypt, RsaPrivateKey, RsaPublicKey};
use serde::Deserialize;
use sha1::{Digest, Sha1};

/// A freshly generated 1024-bit RSA keypair plus its DER-encoded public key,
/// sized to survive for one login exchange only.
pub struct LoginKeypair {
    private_key: RsaPrivateKey,
    pub public_key_der: Vec<u8>,
}

impl LoginKeypair {
    pub fn generate() -> anyhow::Result<Self> {
        let private_key = RsaPrivateKey::new(&mut rand::thread_rng(), 1024)
            .context("generating RSA login keypair")?;
        let public_key = RsaPublicKey::from(&private_key);
        let public_key_der = rsa_der::public_key_to_der(
            &public_key.n().to_bytes_be(),
            &public_key.e().to_bytes_be(),
        );

        Ok(Self {
            private_key,
            public_key_der,
        })
    }

    pub fn decrypt(&self, ciphertext: &[u8]) -> anyhow::Result<Vec<u8>> {
        self.private_key
            .decrypt(Pkcs1v15Encrypt, ciphertext)
            .context("RSA PKCS#1 v1.5 decryption failed")
    }
}

/// The Mojang server hash: SHA-1 over the empty server id, the shared
/// secret, and the DER public key, rendered as Java's signed
/// `BigInteger.toString(16)`.
pub fn server_hash(shared_secret: &[u8], public_key_der: &[u8]) -> String {
    let mut hasher = Sha1::new();
    hasher.update(b"");
    hasher.update(shared_secret);
    hasher.update(public_key_der);
    let digest = hasher.finalize();

    BigInt::from_signed_bytes_be(&digest).to_str_radix(16)
}

#[derive(Debug, Deserialize)]
pub struct GameProfile {
    pub id: uuid::Uuid,
    pub name: String,
    #[serde(default)]
    pub properties: Vec<mc_protocol::packets::login::Property>,
}

/// `GET sessionserver.mojang.com/session/minecraft/hasJoined`. Accepts only
/// HTTP 200 with a decodable profile body.
pub async fn has_joined(username: &str, server_hash: &str) -> anyhow::Result<GameProfile> {
    let url = format!(
        "https://sessionserver.mojang.com/session/minecraft/hasJoined?username={username}&serverId={server_hash}"
    );

    let response = reqwest::get(&url).await.context("session server request failed")?;

    if response.status() != reqwest::StatusCode::OK {
        bail!("session server returned {}", response.status());
    }

    response
        .json::<GameProfile>()
        .await
        .context("parsing session server response")
}

#[cfg(test)]
mod tests {
    use super::*;

    // Digests taken from the well-known Minecraft wiki protocol examples.
    #[test]
    fn server_hash_matches_known_digests() {
        assert_eq!(
            server_hash(b"Notch", b""),
            "4ed1f46bbe04bc756bcb17c0c7ce3e4632f06a48"
        );
        assert_eq!(
            server_hash(b"jeb_", b""),
            "-7c9d5b0044c130109bd30cbe2ed4f709f2957b8"
        );
        assert_eq!(
            server_hash(b"simon", b""),
            "88e16a1019277b15d58faf0541e11910eb756f6"
        );
    }
}
