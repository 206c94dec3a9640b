use clap::builder::TypedValueParser as _;
use clap::Parser;
use dotenvy::dotenv;
use log::LevelFilter;
use std::fmt;
use std::str::FromStr;

/// Default Google Maps web services base URL used when `GOOGLE_MAPS_BASE_URL` is not set.
pub const DEFAULT_GOOGLE_MAPS_BASE_URL: &str = "https://maps.googleapis.com/maps/api";

/// Radius around a pickup point searched for captains to offer a new ride to.
pub const DEFAULT_DISPATCH_RADIUS_KM: f64 = 2.0;

#[derive(Clone, Debug, PartialEq)]
pub enum RustEnv {
    Development,
    Production,
    Staging,
}

#[derive(Debug, PartialEq, Eq)]
pub struct RustEnvParseError;

impl FromStr for RustEnv {
    type Err = RustEnvParseError;
    fn from_str(level: &str) -> Result<RustEnv, Self::Err> {
        match level.to_lowercase().as_str() {
            "development" => Ok(RustEnv::Development),
            "production" => Ok(RustEnv::Production),
            "staging" => Ok(RustEnv::Staging),
            _ => Err(RustEnvParseError),
        }
    }
}

impl fmt::Display for RustEnv {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RustEnv::Development => write!(f, "development"),
            RustEnv::Production => write!(f, "production"),
            RustEnv::Staging => write!(f, "staging"),
        }
    }
}

#[derive(Clone, Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// A list of full CORS origin URLs that allowed to receive server responses.
    #[arg(
        long,
        env,
        value_delimiter = ',',
        use_value_delimiter = true,
        default_value = "http://localhost:5173"
    )]
    pub allowed_origins: Vec<String>,

    /// HMAC secret used to sign and verify session tokens.
    #[arg(long, env)]
    jwt_secret: Option<String>,

    /// Lifetime in seconds of issued session tokens (default: 24 hours = 86400 seconds)
    #[arg(long, env, default_value_t = 86400)]
    pub session_expiry_seconds: u64,

    /// Radius in kilometres around a pickup point searched for captains to notify.
    #[arg(long, env, default_value_t = DEFAULT_DISPATCH_RADIUS_KM)]
    pub dispatch_radius_km: f64,

    /// The API key for Google Maps web services. Without it the server runs offline:
    /// addresses must be literal "lat,lng" pairs and routes are straight-line estimates.
    #[arg(long, env)]
    google_maps_api_key: Option<String>,

    /// The base URL of the Google Maps web services.
    /// Override in tests to point at a mock server.
    #[arg(long, env, default_value = DEFAULT_GOOGLE_MAPS_BASE_URL)]
    google_maps_base_url: String,

    /// Largest inbound websocket message accepted, in bytes.
    #[arg(long, env, default_value_t = 65536)]
    pub socket_max_message_bytes: usize,

    /// Populate the in-memory store with demo riders and captains at startup
    /// and print a session token for each. Ignored in production.
    #[arg(long, env, default_value_t = false)]
    pub seed_demo_data: bool,

    /// The host interface to listen for incoming connections
    #[arg(short, long, env, default_value = "127.0.0.1")]
    pub interface: Option<String>,

    /// The host TCP port to listen for incoming connections
    #[arg(short, long, env, default_value_t = 4000)]
    pub port: u16,

    /// Set the log level verbosity threshold (level) to control what gets displayed on console output
    #[arg(
        short,
        long,
        env,
        default_value_t = LevelFilter::Info,
        value_parser = clap::builder::PossibleValuesParser::new(["OFF", "ERROR", "WARN", "INFO", "DEBUG", "TRACE"])
            .map(|s| s.parse::<LevelFilter>().unwrap()),
        )]
    pub log_level_filter: LevelFilter,

    /// Set the Rust runtime environment to use.
    #[arg(
    short,
    long,
    env,
    default_value_t = RustEnv::Development,
    value_parser = clap::builder::PossibleValuesParser::new([
        "DEVELOPMENT", "PRODUCTION", "STAGING",
        "development", "production", "staging"
    ])
        .map(|s| s.parse::<RustEnv>().unwrap()),
    )]
    pub runtime_env: RustEnv,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    pub fn new() -> Self {
        // Load .env file first
        dotenv().ok();
        // Then parse the command line parameters and flags
        Config::parse()
    }

    /// Builds a config from defaults plus explicit arguments, ignoring the
    /// process command line. Environment variables still apply.
    pub fn from_args<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let program = std::iter::once(std::ffi::OsString::from("ride_dispatch"));
        Config::try_parse_from(program.chain(args.into_iter().map(Into::into)))
    }

    pub fn set_jwt_secret(mut self, jwt_secret: String) -> Self {
        self.jwt_secret = Some(jwt_secret);
        self
    }

    pub fn jwt_secret(&self) -> Option<String> {
        self.jwt_secret.clone()
    }

    /// Returns the Google Maps API key, if configured.
    pub fn google_maps_api_key(&self) -> Option<String> {
        self.google_maps_api_key.clone()
    }

    pub fn set_google_maps_api_key(mut self, api_key: String) -> Self {
        self.google_maps_api_key = Some(api_key);
        self
    }

    /// Returns the Google Maps base URL.
    pub fn google_maps_base_url(&self) -> &str {
        &self.google_maps_base_url
    }

    pub fn set_google_maps_base_url(mut self, base_url: String) -> Self {
        self.google_maps_base_url = base_url;
        self
    }

    pub fn runtime_env(&self) -> RustEnv {
        self.runtime_env.clone()
    }

    pub fn is_production(&self) -> bool {
        self.runtime_env() == RustEnv::Production
    }
}
