//! Login-state handling (§4.D): offline and online authentication, the
//! Set-Compression/Login-Success ordering, and the handshake's closing
//! `Login Acknowledged` wait.

use mc_protocol::packet::Packet;
use mc_protocol::packets::login::{
    EncryptionRequestS2c, EncryptionResponseC2s, LoginAcknowledgedC2s, LoginDisconnectS2c,
    LoginStartC2s, LoginSuccessS2c, Property, SetCompressionS2c,
};
use mc_protocol::text::Text;
use mc_protocol::uuid_offline::offline_uuid;
use tracing::instrument;
use uuid::Uuid;

use crate::auth::{has_joined, server_hash, LoginKeypair};
use crate::config::ServerConfig;
use crate::conn::Connection;
use crate::error::SessionError;

pub struct LoggedInIdentity {
    pub username: String,
    pub uuid: Uuid,
    pub properties: Vec<Property>,
}

#[instrument(skip_all, fields(peer = %conn.peer_addr))]
pub async fn run(conn: &mut Connection, config: &ServerConfig) -> Result<LoggedInIdentity, SessionError> {
    let login_start = conn.recv_packet::<LoginStartC2s>().await?;
    let username = login_start.username;

    let identity = if config.online_mode {
        match login_online(conn, &username).await {
            Ok(identity) => identity,
            Err(reason) => {
                let _ = conn
                    .send_packet(&LoginDisconnectS2c {
                        reason_json: Text::new(reason.clone()).to_json(),
                    })
                    .await;
                return Err(SessionError::Auth(reason));
            }
        }
    } else {
        LoggedInIdentity {
            uuid: offline_uuid(&username),
            username,
            properties: Vec::new(),
        }
    };

    if config.network_compression_threshold >= 0 {
        conn.send_packet(&SetCompressionS2c {
            threshold: config.network_compression_threshold,
        })
        .await?;
        conn.set_compression(config.network_compression_threshold);
    }

    conn.send_packet(&LoginSuccessS2c {
        uuid: identity.uuid,
        username: identity.username.clone(),
        properties: identity.properties.clone(),
    })
    .await?;

    let frame = conn.recv_frame().await?;
    if frame.id != LoginAcknowledgedC2s::ID {
        return Err(SessionError::UnexpectedPacketId {
            state: "login",
            id: frame.id,
        });
    }

    Ok(identity)
}

async fn login_online(conn: &mut Connection, username: &str) -> Result<LoggedInIdentity, String> {
    let keypair = LoginKeypair::generate().map_err(|e| e.to_string())?;
    let verify_token: [u8; 16] = rand::random();

    conn.send_packet(&EncryptionRequestS2c {
        server_id: String::new(),
        public_key_der: keypair.public_key_der.clone(),
        verify_token,
        authenticate: true,
    })
    .await
    .map_err(|e| e.to_string())?;

    let response = conn
        .recv_packet::<EncryptionResponseC2s>()
        .await
        .map_err(|e| e.to_string())?;

    let shared_secret = keypair
        .decrypt(&response.shared_secret_enc)
        .map_err(|e| e.to_string())?;
    let decrypted_token = keypair
        .decrypt(&response.verify_token_enc)
        .map_err(|e| e.to_string())?;

    if decrypted_token != verify_token {
        return Err("Verify token mismatch".to_owned());
    }

    let key: [u8; 16] = shared_secret
        .as_slice()
        .try_into()
        .map_err(|_| "shared secret is not 16 bytes".to_owned())?;
    conn.enable_encryption(&key);

    let hash = server_hash(&shared_secret, &keypair.public_key_der);
    let profile = has_joined(username, &hash).await.map_err(|e| e.to_string())?;

    if profile.name != username {
        return Err("Usernames do not match".to_owned());
    }

    Ok(LoggedInIdentity {
        username: profile.name,
        uuid: profile.id,
        properties: profile.properties,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offline_identity_uuid_matches_offline_rule() {
        let identity = LoggedInIdentity {
            username: "Alex".to_owned(),
            uuid: offline_uuid("Alex"),
            properties: Vec::new(),
        };
        assert_eq!(identity.uuid, offline_uuid("Alex"));
    }
}
