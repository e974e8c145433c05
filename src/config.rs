use clap::Parser;

const DEFAULT_LIBRARY_PATH: &str = "./library.json";
const DEFAULT_EXPORT_DIR: &str = ".";

#[derive(Parser, Debug)]
#[command(name = "readera-collection")]
#[command(about = "Browse, sample and analyze a ReadEra library export")]
pub struct CliArgs {
    /// Path to the library export JSON file
    #[arg(short, long)]
    pub library_path: Option<String>,

    /// Directory for per-book quote exports
    #[arg(short, long)]
    pub export_dir: Option<String>,

    /// Seed for reproducible random sampling
    #[arg(short, long)]
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub library_path: String,
    pub export_dir: String,
    pub seed: Option<u64>,
}

#[derive(Debug, PartialEq)]
pub enum ConfigError {
    InvalidSeed(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidSeed(s) => {
                write!(f, "Invalid seed: '{}'. Expected an unsigned integer", s)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        let cli = CliArgs::parse();
        Self::from_args(cli)
    }

    fn from_args(cli: CliArgs) -> Result<Self, ConfigError> {
        let library_path = cli
            .library_path
            .or_else(|| std::env::var("LIBRARY_PATH").ok())
            .unwrap_or_else(|| DEFAULT_LIBRARY_PATH.to_string());

        let export_dir = cli
            .export_dir
            .or_else(|| std::env::var("EXPORT_DIR").ok())
            .unwrap_or_else(|| DEFAULT_EXPORT_DIR.to_string());

        let seed = match cli.seed {
            Some(seed) => Some(seed),
            None => match std::env::var("SAMPLE_SEED") {
                Ok(raw) => Some(parse_seed(&raw)?),
                Err(_) => None,
            },
        };

        Ok(Config {
            library_path,
            export_dir,
            seed,
        })
    }
}

fn parse_seed(raw: &str) -> Result<u64, ConfigError> {
    raw.parse()
        .map_err(|_| ConfigError::InvalidSeed(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_cli(
        library_path: Option<&str>,
        export_dir: Option<&str>,
        seed: Option<u64>,
    ) -> CliArgs {
        CliArgs {
            library_path: library_path.map(String::from),
            export_dir: export_dir.map(String::from),
            seed,
        }
    }

    #[test]
    fn test_default_paths() {
        let config = Config::from_args(make_cli(None, None, None)).unwrap();

        assert_eq!(config.library_path, "./library.json");
        assert_eq!(config.export_dir, ".");
    }

    #[test]
    fn test_explicit_args_win() {
        let config =
            Config::from_args(make_cli(Some("/data/library.json"), Some("/tmp/out"), Some(7)))
                .unwrap();

        assert_eq!(config.library_path, "/data/library.json");
        assert_eq!(config.export_dir, "/tmp/out");
        assert_eq!(config.seed, Some(7));
    }

    #[test]
    fn test_invalid_seed_is_error() {
        assert_eq!(
            parse_seed("not-a-number"),
            Err(ConfigError::InvalidSeed("not-a-number".to_string()))
        );
    }

    #[test]
    fn test_valid_seed_parses() {
        assert_eq!(parse_seed("42"), Ok(42));
    }
}
