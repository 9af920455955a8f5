use std::{
    collections::HashMap,
    env,
    ffi::{OsStr, OsString},
    path::PathBuf,
    str::FromStr,
};

use anyhow::{anyhow, bail, Result};

use crate::cli::Cli;
use crate::interpreter::{self, VersionSelection};

/// Root prefix used to locate interpreters and the test entry point.
pub const EPREFIX_KEY: &str = "PORTAGE_OVERRIDE_EPREFIX";
/// Legacy toggle: a truthy value turns colors off.
pub const NOCOLOR_KEY: &str = "NOCOLOR";

/// Snapshot of the environment variables the runner cares about.
///
/// Values are kept as `OsString`; unrelated variables are never decoded.
#[derive(Debug, Clone, Default)]
pub struct Config {
    inner: HashMap<String, OsString>,
}

impl Config {
    pub fn load() -> Self {
        Self::from_vars(env::vars_os())
    }

    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<OsString>,
        V: Into<OsString>,
    {
        let inner = vars
            .into_iter()
            .filter_map(|(k, v)| {
                let key = k.into().into_string().ok()?;
                is_config_key(&key).then(|| (key, v.into()))
            })
            .collect();
        Self { inner }
    }

    pub fn get(&self, key: &str) -> Option<&OsStr> {
        self.inner.get(key).map(OsString::as_os_str)
    }

    pub fn root(&self) -> PathBuf {
        match self.get(EPREFIX_KEY) {
            Some(v) if !v.is_empty() => PathBuf::from(v),
            _ => PathBuf::from("/"),
        }
    }
}

fn is_config_key(k: &str) -> bool {
    const KEYS: &[&str] = &[EPREFIX_KEY, NOCOLOR_KEY];
    KEYS.contains(&k)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
    ForceOn,
    ForceOff,
    Auto,
}

impl FromStr for ColorMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match parse_switch(s) {
            Some(true) => Ok(Self::ForceOn),
            Some(false) => Ok(Self::ForceOff),
            None => Err(anyhow!(
                "'{}' is not a valid value for --color (expected yes, no, true, false, y or n)",
                s
            )),
        }
    }
}

impl ColorMode {
    /// Collapse `Auto` using the legacy `NOCOLOR` toggle, whose truthy values mean colors off.
    pub fn resolve(self, cfg: &Config) -> Result<bool> {
        match self {
            Self::ForceOn => Ok(true),
            Self::ForceOff => Ok(false),
            Self::Auto => {
                let Some(raw) = cfg.get(NOCOLOR_KEY) else {
                    return Ok(true);
                };
                if raw.is_empty() {
                    return Ok(true);
                }
                match raw.to_str().and_then(parse_switch) {
                    Some(nocolor) => Ok(!nocolor),
                    None => bail!(
                        "${} is not a valid choice: '{}' (expected yes, no, true, false, y or n)",
                        NOCOLOR_KEY,
                        raw.to_string_lossy()
                    ),
                }
            }
        }
    }
}

fn parse_switch(token: &str) -> Option<bool> {
    match token.to_ascii_lowercase().as_str() {
        "yes" | "y" | "true" => Some(true),
        "no" | "n" | "false" => Some(false),
        _ => None,
    }
}

/// Everything a run needs, fixed before the first interpreter is spawned.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub versions: Vec<String>,
    /// Discovery mode: interpreters that cannot be found are skipped instead of failed.
    pub ignore_missing: bool,
    pub color: bool,
    pub keep_temp: bool,
    pub root: PathBuf,
    pub extra_args: Vec<String>,
    pub verbosity: i32,
}

impl RunConfig {
    pub fn from_cli(cli: &Cli, cfg: &Config) -> Result<Self> {
        let mode = match cli.color.as_deref() {
            Some(token) => token.parse::<ColorMode>()?,
            None => ColorMode::Auto,
        };
        let color = mode.resolve(cfg)?;

        let selection = VersionSelection::from_args(&cli.python_versions);
        Ok(Self {
            versions: selection.versions,
            ignore_missing: selection.ignore_missing,
            color,
            keep_temp: cli.keep_temp,
            root: cfg.root(),
            extra_args: cli.args.clone(),
            verbosity: cli.verbosity_level(),
        })
    }

    pub fn interpreters(&self) -> Vec<interpreter::Interpreter> {
        self.versions
            .iter()
            .map(|v| interpreter::Interpreter::resolve(&self.root, v))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli_with_color(color: Option<&str>) -> Cli {
        Cli { color: color.map(str::to_string), ..Cli::default() }
    }

    #[test]
    fn test_color_tokens_case_insensitive() {
        assert_eq!("YES".parse::<ColorMode>().unwrap(), ColorMode::ForceOn);
        assert_eq!("y".parse::<ColorMode>().unwrap(), ColorMode::ForceOn);
        assert_eq!("True".parse::<ColorMode>().unwrap(), ColorMode::ForceOn);
        assert_eq!("no".parse::<ColorMode>().unwrap(), ColorMode::ForceOff);
        assert_eq!("N".parse::<ColorMode>().unwrap(), ColorMode::ForceOff);
        assert_eq!("FALSE".parse::<ColorMode>().unwrap(), ColorMode::ForceOff);
        let err = "maybe".parse::<ColorMode>().unwrap_err();
        assert!(err.to_string().contains("maybe"));
    }

    #[test]
    fn test_auto_uses_nocolor_inverted() {
        let unset = Config::default();
        assert!(ColorMode::Auto.resolve(&unset).unwrap());

        let off = Config::from_vars([(NOCOLOR_KEY, "true")]);
        assert!(!ColorMode::Auto.resolve(&off).unwrap());

        let on = Config::from_vars([(NOCOLOR_KEY, "no")]);
        assert!(ColorMode::Auto.resolve(&on).unwrap());

        let empty = Config::from_vars([(NOCOLOR_KEY, "")]);
        assert!(ColorMode::Auto.resolve(&empty).unwrap());

        let bad = Config::from_vars([(NOCOLOR_KEY, "sometimes")]);
        assert!(ColorMode::Auto.resolve(&bad).is_err());
    }

    #[test]
    fn test_explicit_color_overrides_nocolor() {
        let cfg = Config::from_vars([(NOCOLOR_KEY, "yes")]);
        let run = RunConfig::from_cli(&cli_with_color(Some("yes")), &cfg).unwrap();
        assert!(run.color);

        // An explicit flag wins even when the toggle is garbage.
        let cfg = Config::from_vars([(NOCOLOR_KEY, "garbage")]);
        let run = RunConfig::from_cli(&cli_with_color(Some("no")), &cfg).unwrap();
        assert!(!run.color);
    }

    #[test]
    fn test_invalid_color_is_config_error() {
        let err = RunConfig::from_cli(&cli_with_color(Some("maybe")), &Config::default()).unwrap_err();
        assert!(err.to_string().contains("--color"));
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_values() {
        use std::os::unix::ffi::OsStrExt;

        let raw = OsStr::from_bytes(b"/opt/\xffprefix");
        let cfg = Config::from_vars([
            (OsStr::new("UNRELATED"), OsStr::from_bytes(b"\xff\xfe")),
            (OsStr::new(EPREFIX_KEY), raw),
        ]);
        assert_eq!(cfg.root(), PathBuf::from(raw));
        assert!(cfg.get("UNRELATED").is_none());

        let cfg = Config::from_vars([(OsStr::new(NOCOLOR_KEY), OsStr::from_bytes(b"y\xff"))]);
        let err = ColorMode::Auto.resolve(&cfg).unwrap_err();
        assert!(err.to_string().contains("NOCOLOR"));
    }

    #[test]
    fn test_root_prefix() {
        assert_eq!(Config::default().root(), PathBuf::from("/"));
        let cfg = Config::from_vars([(EPREFIX_KEY, "/opt/gentoo"), ("HOME", "/root")]);
        assert_eq!(cfg.root(), PathBuf::from("/opt/gentoo"));
        assert!(cfg.get("HOME").is_none());
    }

    #[test]
    fn test_run_config_from_cli() {
        let cli = Cli {
            keep_temp: true,
            python_versions: vec!["3.7".into()],
            args: vec!["--failfast".into()],
            ..Cli::default()
        };
        let run = RunConfig::from_cli(&cli, &Config::default()).unwrap();
        assert_eq!(run.versions, vec!["3.7"]);
        assert!(!run.ignore_missing);
        assert!(run.keep_temp);
        assert_eq!(run.extra_args, vec!["--failfast"]);
        assert_eq!(run.verbosity, 1);
    }
}
