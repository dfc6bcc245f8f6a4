use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    #[serde(default)]
    pub deepseek: DeepSeekConfig,
    #[serde(default)]
    pub advisor: AdvisorConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub access_token_expires_in: i64,  // seconds
    pub refresh_token_expires_in: i64, // seconds
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeepSeekConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_deepseek_url")]
    pub api_url: String,
    #[serde(default = "default_deepseek_model")]
    pub model: String,
    /// 连接超时(秒)
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    /// 读取超时(秒)
    #[serde(default = "default_read_timeout")]
    pub read_timeout_secs: u64,
    /// 超时/连接失败时的最大重试次数
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvisorConfig {
    /// 上下文缓存 TTL(秒)
    #[serde(default = "default_context_ttl")]
    pub context_ttl_secs: u64,
    /// 上下文长度预算(字符), 超出则分段压缩
    #[serde(default = "default_context_budget")]
    pub context_budget: usize,
}

fn default_deepseek_url() -> String {
    "https://api.deepseek.com/v1/chat/completions".to_string()
}

fn default_deepseek_model() -> String {
    "deepseek-chat".to_string()
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_read_timeout() -> u64 {
    60
}

fn default_max_retries() -> u32 {
    2
}

fn default_context_ttl() -> u64 {
    60
}

fn default_context_budget() -> usize {
    4000
}

impl Default for DeepSeekConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_url: default_deepseek_url(),
            model: default_deepseek_model(),
            connect_timeout_secs: default_connect_timeout(),
            read_timeout_secs: default_read_timeout(),
            max_retries: default_max_retries(),
        }
    }
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            context_ttl_secs: default_context_ttl(),
            context_budget: default_context_budget(),
        }
    }
}

impl Config {
    pub fn from_toml() -> Result<Self, Box<dyn std::error::Error>> {
        let config_path = env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
        use std::io::ErrorKind;

        // 尝试读取配置文件, 不存在则完全依赖环境变量
        let config_result = std::fs::read_to_string(&config_path);

        let mut config: Config = match config_result {
            Ok(config_str) => {
                // 有配置文件: 先解析再用环境变量覆盖
                toml::from_str(&config_str).map_err(|e| format!("解析配置文件失败: {e}"))?
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                fn get_env(name: &str) -> Option<String> {
                    env::var(name).ok()
                }
                fn get_env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
                    env::var(name)
                        .ok()
                        .and_then(|v| v.parse::<T>().ok())
                        .unwrap_or(default)
                }

                Config {
                    server: ServerConfig {
                        host: get_env("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                        port: get_env_parse("SERVER_PORT", 8080u16),
                    },
                    database: DatabaseConfig {
                        url: get_env("DATABASE_URL")
                            .unwrap_or_else(|| "sqlite://diancan.db?mode=rwc".to_string()),
                        max_connections: get_env_parse("DB_MAX_CONNECTIONS", 10u32),
                    },
                    jwt: JwtConfig {
                        secret: get_env("JWT_SECRET")
                            .unwrap_or_else(|| "change-me-in-production".to_string()),
                        access_token_expires_in: get_env_parse("JWT_ACCESS_EXPIRES_IN", 7200i64),
                        refresh_token_expires_in: get_env_parse(
                            "JWT_REFRESH_EXPIRES_IN",
                            2_592_000i64,
                        ),
                    },
                    deepseek: DeepSeekConfig {
                        api_key: get_env("DEEPSEEK_API_KEY").unwrap_or_default(),
                        api_url: get_env("DEEPSEEK_API_URL")
                            .unwrap_or_else(default_deepseek_url),
                        model: get_env("DEEPSEEK_MODEL").unwrap_or_else(default_deepseek_model),
                        connect_timeout_secs: get_env_parse(
                            "DEEPSEEK_CONNECT_TIMEOUT",
                            default_connect_timeout(),
                        ),
                        read_timeout_secs: get_env_parse(
                            "DEEPSEEK_READ_TIMEOUT",
                            default_read_timeout(),
                        ),
                        max_retries: get_env_parse("DEEPSEEK_MAX_RETRIES", default_max_retries()),
                    },
                    advisor: AdvisorConfig {
                        context_ttl_secs: get_env_parse(
                            "ADVISOR_CONTEXT_TTL",
                            default_context_ttl(),
                        ),
                        context_budget: get_env_parse(
                            "ADVISOR_CONTEXT_BUDGET",
                            default_context_budget(),
                        ),
                    },
                }
            }
            Err(e) => {
                return Err(format!("无法读取配置文件 {config_path}: {e}").into());
            }
        };

        // 环境变量覆盖 (文件存在时也覆盖)
        if let Ok(v) = env::var("SERVER_HOST") {
            config.server.host = v;
        }
        if let Ok(v) = env::var("SERVER_PORT")
            && let Ok(p) = v.parse()
        {
            config.server.port = p;
        }
        if let Ok(v) = env::var("DATABASE_URL") {
            config.database.url = v;
        }
        if let Ok(v) = env::var("DB_MAX_CONNECTIONS")
            && let Ok(mc) = v.parse()
        {
            config.database.max_connections = mc;
        }
        if let Ok(v) = env::var("JWT_SECRET") {
            config.jwt.secret = v;
        }
        if let Ok(v) = env::var("JWT_ACCESS_EXPIRES_IN")
            && let Ok(n) = v.parse()
        {
            config.jwt.access_token_expires_in = n;
        }
        if let Ok(v) = env::var("JWT_REFRESH_EXPIRES_IN")
            && let Ok(n) = v.parse()
        {
            config.jwt.refresh_token_expires_in = n;
        }
        if let Ok(v) = env::var("DEEPSEEK_API_KEY") {
            config.deepseek.api_key = v;
        }
        if let Ok(v) = env::var("DEEPSEEK_API_URL") {
            config.deepseek.api_url = v;
        }
        if let Ok(v) = env::var("DEEPSEEK_MODEL") {
            config.deepseek.model = v;
        }
        if let Ok(v) = env::var("ADVISOR_CONTEXT_TTL")
            && let Ok(n) = v.parse()
        {
            config.advisor.context_ttl_secs = n;
        }
        if let Ok(v) = env::var("ADVISOR_CONTEXT_BUDGET")
            && let Ok(n) = v.parse()
        {
            config.advisor.context_budget = n;
        }

        Ok(config)
    }
}
