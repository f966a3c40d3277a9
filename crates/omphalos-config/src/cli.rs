//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Omphalos command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "omphalos", about = "Omphalos world fields")]
pub struct CliArgs {
    /// World width in cells.
    #[arg(long)]
    pub width: Option<usize>,

    /// World height in cells.
    #[arg(long)]
    pub height: Option<usize>,

    /// World seed.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Planet terrain seed.
    #[arg(long)]
    pub planet_seed: Option<u64>,

    /// Planet base radius.
    #[arg(long)]
    pub planet_radius: Option<f64>,

    /// Log level (error, warn, info, debug, trace) or a full filter string.
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl CliArgs {
    /// Config directory to use: `--config` if given, else the platform default.
    pub fn config_dir(&self) -> Option<PathBuf> {
        self.config.clone().or_else(Config::default_dir)
    }
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(w) = args.width {
            self.world.width = w;
        }
        if let Some(h) = args.height {
            self.world.height = h;
        }
        if let Some(seed) = args.seed {
            self.world.seed = seed;
        }
        if let Some(seed) = args.planet_seed {
            self.planet.seed = seed;
        }
        if let Some(radius) = args.planet_radius {
            self.planet.radius = radius;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_override() {
        let mut config = Config::default();
        let args = CliArgs {
            width: Some(64),
            seed: Some(7),
            planet_radius: Some(6371.0),
            ..Default::default()
        };
        config.apply_cli_overrides(&args);
        assert_eq!(config.world.width, 64);
        assert_eq!(config.world.seed, 7);
        assert_eq!(config.planet.radius, 6371.0);
        // Non-overridden fields retain defaults
        assert_eq!(config.world.height, 200);
        assert_eq!(config.planet.seed, 0);
    }

    #[test]
    fn test_cli_no_override() {
        let original = Config::default();
        let mut config = Config::default();
        config.apply_cli_overrides(&CliArgs::default());
        assert_eq!(config, original);
    }

    #[test]
    fn test_parse_flags() {
        let args = CliArgs::try_parse_from([
            "omphalos",
            "--height",
            "32",
            "--planet-seed",
            "11",
            "--log-level",
            "debug",
            "--config",
            "/tmp/omphalos-test",
        ])
        .unwrap();
        assert_eq!(args.height, Some(32));
        assert_eq!(args.planet_seed, Some(11));
        assert_eq!(args.log_level.as_deref(), Some("debug"));
        assert_eq!(args.config_dir(), Some(PathBuf::from("/tmp/omphalos-test")));
    }

    #[test]
    fn test_parse_rejects_bad_seed() {
        let result = CliArgs::try_parse_from(["omphalos", "--seed", "not-a-number"]);
        assert!(result.is_err());
    }
}
