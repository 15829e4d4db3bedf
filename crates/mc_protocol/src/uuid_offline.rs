use uuid::Uuid;

/// Derives an offline-mode player UUID: a name-based UUIDv3 in the DNS
/// namespace over `"OfflinePlayer:" + username`.
///
/// This matches the reference server's `get_offline_uuid`, and
/// deliberately does not follow the SHA-256-truncation scheme some other
/// Minecraft server implementations use for offline UUIDs.
pub fn offline_uuid(username: &str) -> Uuid {
    let name = format!("OfflinePlayer:{username}");
    Uuid::new_v3(&Uuid::NAMESPACE_DNS, name.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stable_for_a_given_username() {
        let a = offline_uuid("Alex");
        let b = offline_uuid("Alex");
        assert_eq!(a, b);
    }

    #[test]
    fn differs_across_usernames() {
        assert_ne!(offline_uuid("Alex"), offline_uuid("Notch"));
    }

    #[test]
    fn matches_uuidv3_dns_namespace_construction() {
        let expected = Uuid::new_v3(&Uuid::NAMESPACE_DNS, b"OfflinePlayer:Alex");
        assert_eq!(offline_uuid("Alex"), expected);
    }
}
