use secrecy::SecretString;
use std::env;

#[derive(Clone, Debug)]
pub struct Config {
    pub mongo_conn_string: String,
    pub mongo_db_name: String,
    pub web_server_host: String,
    pub web_server_port: u16,
    pub field_encryption_key: SecretString,
    pub ip_hash_salt: SecretString,
    pub export_batch_size: usize,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            mongo_conn_string: env::var("MONGO_CONN_STRING")
                .unwrap_or_else(|_| "mongodb://localhost:27017".to_string()),
            mongo_db_name: env::var("MONGO_DB_NAME")
                .unwrap_or_else(|_| "formflow-local".to_string()),
            web_server_host: env::var("WEB_SERVER_HOST")
                .unwrap_or_else(|_| "localhost".to_string()),
            web_server_port: env::var("WEB_SERVER_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            field_encryption_key: SecretString::from(
                env::var("FIELD_ENCRYPTION_KEY").unwrap_or_default(),
            ),
            ip_hash_salt: SecretString::from(env::var("IP_HASH_SALT").unwrap_or_default()),
            export_batch_size: env::var("EXPORT_BATCH_SIZE")
                .ok()
                .and_then(|b| b.parse().ok())
                .unwrap_or(500),
        }
    }

    /// Validate that production-critical configuration is set.
    /// Panics if key material is absent: answer encryption must never
    /// silently run with an empty or default key.
    pub fn validate_for_production(&self) {
        use secrecy::ExposeSecret;

        let field_key = self.field_encryption_key.expose_secret();
        let ip_salt = self.ip_hash_salt.expose_secret();

        if field_key.is_empty() {
            panic!(
                "FATAL: FIELD_ENCRYPTION_KEY is not set! Set it to 64 hex characters (32 bytes)."
            );
        }

        if field_key.len() != 64 || hex::decode(field_key).is_err() {
            panic!(
                "FATAL: FIELD_ENCRYPTION_KEY must be 64 hex characters (32 bytes), got {} characters.",
                field_key.len()
            );
        }

        if ip_salt.is_empty() {
            panic!("FATAL: IP_HASH_SALT is not set! Set IP_HASH_SALT environment variable.");
        }

        if ip_salt.len() < 16 {
            panic!(
                "FATAL: IP_HASH_SALT is too short ({}). Must be at least 16 characters.",
                ip_salt.len()
            );
        }
    }

    #[cfg(test)]
    pub fn test_config() -> Self {
        Self {
            mongo_conn_string: "mongodb://localhost:27017".to_string(),
            mongo_db_name: "formflow-test".to_string(),
            web_server_host: "127.0.0.1".to_string(),
            web_server_port: 8080,
            field_encryption_key: SecretString::from(
                "000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f".to_string(),
            ),
            ip_hash_salt: SecretString::from("test_ip_hash_salt_value".to_string()),
            export_batch_size: 500,
        }
    }
}
