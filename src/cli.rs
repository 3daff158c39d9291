use std::path::PathBuf;
use std::str::FromStr;

use clap::ValueHint;
use glam::Vec3;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, clap::ValueEnum)]
pub enum LogFormat {
    Compact,
    Full,
    Pretty,
    Json,
}

impl std::fmt::Display for LogFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogFormat::Compact => f.write_str("compact"),
            LogFormat::Full => f.write_str("full"),
            LogFormat::Pretty => f.write_str("pretty"),
            LogFormat::Json => f.write_str("json"),
        }
    }
}

#[derive(Debug, clap::Parser)]
#[command(author, version, about)]
pub struct Cli {
    /// Logging output filters; comma-separated
    #[arg(short, long, default_value = "warn,vista=info", env = "VISTA_LOG")]
    pub log_filter: String,
    /// Logging output format
    #[arg(long, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
    /// Settings file to use instead of the one in the config directory
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    pub settings: Option<PathBuf>,
    /// Where to centre the player's body, overriding the settings
    #[arg(long, value_parser = parse_vec3, value_name = "X,Y,Z", allow_hyphen_values = true)]
    pub spawn: Option<Vec3>,
    /// Idle steps to run after loading, overriding the settings
    #[arg(long, value_name = "N")]
    pub settle_ticks: Option<u32>,
    /// Write the effective settings back to the settings file
    #[arg(long)]
    pub save_settings: bool,
    /// Scene to load (.glb or .gltf)
    #[arg(value_hint = ValueHint::FilePath)]
    pub scene: PathBuf,
}

fn parse_vec3(s: &str) -> Result<Vec3, Box<dyn std::error::Error + Send + Sync + 'static>> {
    let parts = s
        .trim()
        .split(',')
        .map(|part| f32::from_str(part.trim()))
        .collect::<Result<Vec<_>, _>>()?;
    match parts[..] {
        [x, y, z] => Ok(Vec3::new(x, y, z)),
        _ => Err(format!("expected three comma-separated numbers, got {}", parts.len()).into()),
    }
}

/// Set up log output on stderr
pub(crate) fn initialize_tracing(log_filter: &str, log_format: LogFormat) {
    let tsub = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_env_filter(log_filter);

    match log_format {
        LogFormat::Compact => tsub.compact().init(),
        LogFormat::Full => tsub.init(),
        LogFormat::Pretty => tsub.pretty().init(),
        LogFormat::Json => tsub.json().init(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn parses_spawn_triple() {
        assert_eq!(parse_vec3("1, -2.5,3").unwrap(), Vec3::new(1.0, -2.5, 3.0));
        assert!(parse_vec3("1,2").is_err());
        assert!(parse_vec3("1,2,x").is_err());
    }

    #[test]
    fn parses_arguments() {
        let cli = Cli::try_parse_from([
            "vista",
            "--spawn",
            "-1,2,3",
            "--settle-ticks",
            "5",
            "--log-format",
            "json",
            "scene.glb",
        ])
        .unwrap();
        assert_eq!(cli.scene, PathBuf::from("scene.glb"));
        assert_eq!(cli.spawn, Some(Vec3::new(-1.0, 2.0, 3.0)));
        assert_eq!(cli.settle_ticks, Some(5));
        assert_eq!(cli.log_format, LogFormat::Json);
        assert!(!cli.save_settings);
    }

    #[test]
    fn scene_is_required() {
        assert!(Cli::try_parse_from(["vista"]).is_err());
    }
}
