use std::net::IpAddr;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub host: IpAddr,
    pub port: u16,
    pub max_body_size: usize,
    pub log_level: String,
    pub maps_api_key: String,
    pub cloudinary: CloudinaryConfig,
}

#[derive(Debug, Clone)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
    pub folder: String,
    pub signature_algorithm: SignatureAlgorithm,
}

/// Digest used to sign upload API requests. Accounts verify SHA-1 unless switched over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SignatureAlgorithm {
    #[default]
    Sha1,
    Sha256,
}

impl std::str::FromStr for SignatureAlgorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sha1" => Ok(SignatureAlgorithm::Sha1),
            "sha256" => Ok(SignatureAlgorithm::Sha256),
            other => Err(format!("unknown signature algorithm '{other}'")),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let database_url = env_required("DATABASE_URL")?;
        let maps_api_key = env_required("MAPS_API_KEY")?;

        let cloudinary = CloudinaryConfig {
            cloud_name: env_required("CLOUDINARY_CLOUD_NAME")?,
            api_key: env_required("CLOUDINARY_API_KEY")?,
            api_secret: env_required("CLOUDINARY_API_SECRET")?,
            folder: env_or("PHOTOMAP_UPLOAD_FOLDER", "user_photos"),
            signature_algorithm: env_or("CLOUDINARY_SIGNATURE_ALGORITHM", "sha1")
                .parse()
                .map_err(|e| format!("Invalid CLOUDINARY_SIGNATURE_ALGORITHM: {e}"))?,
        };

        let host: IpAddr = env_or("PHOTOMAP_HOST", "0.0.0.0")
            .parse()
            .map_err(|e| format!("Invalid PHOTOMAP_HOST: {e}"))?;

        let port: u16 = env_or("PHOTOMAP_PORT", "3000")
            .parse()
            .map_err(|e| format!("Invalid PHOTOMAP_PORT: {e}"))?;

        let max_body_size: usize = env_or("PHOTOMAP_MAX_BODY_SIZE", "10485760")
            .parse()
            .map_err(|e| format!("Invalid PHOTOMAP_MAX_BODY_SIZE: {e}"))?;

        let log_level = env_or("PHOTOMAP_LOG_LEVEL", "info");

        Ok(Config {
            database_url,
            host,
            port,
            max_body_size,
            log_level,
            maps_api_key,
            cloudinary,
        })
    }
}

fn env_required(key: &str) -> Result<String, String> {
    std::env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| format!("Missing required environment variable: {key}"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
