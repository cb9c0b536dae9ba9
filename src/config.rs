use std::env;

pub const DEFAULT_WRIS_URL: &str = "https://indiawris.gov.in/Dataset/Ground Water Level";
pub const DEFAULT_LOCATIONS_URL: &str =
    "https://raw.githubusercontent.com/sab99r/Indian-States-And-Districts/master/states-and-districts.json";

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub server_host: String,
    pub server_port: u16,
    pub wris_url: String,
    pub locations_url: String,
}

impl Config {
    pub fn from_env() -> Result<Self, env::VarError> {
        Ok(Config {
            database_url: env::var("DATABASE_URL")?,
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            server_port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            wris_url: env::var("WRIS_URL").unwrap_or_else(|_| DEFAULT_WRIS_URL.to_string()),
            locations_url: env::var("LOCATIONS_URL")
                .unwrap_or_else(|_| DEFAULT_LOCATIONS_URL.to_string()),
        })
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}
