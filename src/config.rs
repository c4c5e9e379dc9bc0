use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UploadConfig {
    pub dir: String,
    pub max_file_size: usize,
    pub allowed_types: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
    /// Argon2 time cost (iterations). Raising it slows every hash and
    /// verify on purpose.
    pub hash_time_cost: u32,
    pub upload: UploadConfig,
}

const DEFAULT_ALLOWED_TYPES: &[&str] = &[
    "application/pdf",
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    "application/vnd.ms-excel",
    "text/plain",
    "text/markdown",
];

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "thinkcate".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "thinkcate-users".into()),
            ttl_minutes: std::env::var("JWT_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(60 * 24),
        };
        let hash_time_cost = std::env::var("HASH_TIME_COST")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(argon2::Params::DEFAULT_T_COST);
        let upload = UploadConfig {
            dir: std::env::var("UPLOAD_DIR").unwrap_or_else(|_| "data/uploads".into()),
            max_file_size: std::env::var("MAX_FILE_SIZE")
                .ok()
                .and_then(|v| v.parse::<usize>().ok())
                .unwrap_or(50 * 1024 * 1024),
            allowed_types: std::env::var("ALLOWED_FILE_TYPES")
                .map(|v| v.split(',').map(|s| s.trim().to_string()).collect())
                .unwrap_or_else(|_| {
                    DEFAULT_ALLOWED_TYPES.iter().map(|s| s.to_string()).collect()
                }),
        };
        Ok(Self {
            database_url,
            jwt,
            hash_time_cost,
            upload,
        })
    }
}
