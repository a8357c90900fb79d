use std::{collections::HashMap, fs, path::Path, time::Duration};

use shared::{domain::Algorithm, input::DEFAULT_INPUT, speed::Timing};

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub log_filter: String,
    pub algorithm: Algorithm,
    pub input: String,
    pub speed: Option<u32>,
    pub settle_gap_ms: u64,
    pub sweep_interval_ms: u64,
    pub random_seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        let timing = Timing::default();
        Self {
            log_filter: "info".into(),
            algorithm: Algorithm::default(),
            input: DEFAULT_INPUT.into(),
            speed: None,
            settle_gap_ms: millis(timing.settle_gap),
            sweep_interval_ms: millis(timing.sweep_interval),
            random_seed: None,
        }
    }
}

impl Settings {
    /// Pacing for a run. Without a slider value the initial delays apply.
    pub fn timing(&self) -> Timing {
        let base = match self.speed {
            Some(slider) => Timing::from_slider(slider),
            None => Timing::default(),
        };
        Timing {
            settle_gap: Duration::from_millis(self.settle_gap_ms),
            sweep_interval: Duration::from_millis(self.sweep_interval_ms),
            ..base
        }
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Defaults, then `path` if it exists, then the environment.
pub fn load_settings(path: &Path) -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(path) {
        if let Ok(file_cfg) = toml::from_str::<HashMap<String, String>>(&raw) {
            apply_file(&mut settings, &file_cfg);
        }
    }

    apply_env(&mut settings, |key| std::env::var(key).ok());
    settings
}

fn apply_file(settings: &mut Settings, file_cfg: &HashMap<String, String>) {
    for (key, value) in file_cfg {
        apply(settings, key, value);
    }
}

/// `SORTVIZ_<KEY>` first, then `APP__<KEY>`, so the latter wins.
fn apply_env(settings: &mut Settings, var: impl Fn(&str) -> Option<String>) {
    for key in KEYS {
        let upper = key.to_ascii_uppercase();
        for name in [format!("SORTVIZ_{upper}"), format!("APP__{upper}")] {
            if let Some(value) = var(&name) {
                apply(settings, key, &value);
            }
        }
    }
}

const KEYS: [&str; 7] = [
    "log_filter",
    "algorithm",
    "input",
    "speed",
    "settle_gap_ms",
    "sweep_interval_ms",
    "random_seed",
];

fn apply(settings: &mut Settings, key: &str, value: &str) {
    match key {
        "log_filter" => settings.log_filter = value.to_string(),
        "algorithm" => {
            if let Ok(algorithm) = value.parse() {
                settings.algorithm = algorithm;
            }
        }
        "input" => settings.input = value.to_string(),
        "speed" => {
            if let Ok(parsed) = value.trim().parse() {
                settings.speed = Some(parsed);
            }
        }
        "settle_gap_ms" => {
            if let Ok(parsed) = value.trim().parse() {
                settings.settle_gap_ms = parsed;
            }
        }
        "sweep_interval_ms" => {
            if let Ok(parsed) = value.trim().parse() {
                settings.sweep_interval_ms = parsed;
            }
        }
        "random_seed" => {
            if let Ok(parsed) = value.trim().parse() {
                settings.random_seed = Some(parsed);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use std::{
        env,
        time::{SystemTime, UNIX_EPOCH},
    };

    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn missing_file_keeps_defaults() {
        let settings = load_settings(Path::new("definitely/not/here/sortviz.toml"));
        assert_eq!(settings.settle_gap_ms, 200);
        assert_eq!(settings.sweep_interval_ms, 80);
    }

    #[test]
    fn file_values_are_applied() {
        let suffix = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock")
            .as_nanos();
        let path = env::temp_dir().join(format!("sortviz_config_test_{suffix}.toml"));
        fs::write(
            &path,
            "algorithm = \"quick\"\ninput = \"3,2,1\"\nspeed = \"4000\"\nlog_filter = \"debug\"\n",
        )
        .expect("write config");

        let settings = load_settings(&path);
        fs::remove_file(&path).expect("cleanup");

        assert_eq!(settings.algorithm, Algorithm::Quick);
        assert_eq!(settings.input, "3,2,1");
        assert_eq!(settings.speed, Some(4000));
        assert_eq!(settings.log_filter, "debug");
    }

    #[test]
    fn app_prefixed_env_wins_over_sortviz_prefix() {
        let mut settings = Settings::default();
        apply_env(
            &mut settings,
            vars(&[
                ("SORTVIZ_ALGORITHM", "merge"),
                ("APP__ALGORITHM", "selection"),
                ("SORTVIZ_SPEED", "800"),
            ]),
        );
        assert_eq!(settings.algorithm, Algorithm::Selection);
        assert_eq!(settings.speed, Some(800));
    }

    #[test]
    fn unparsable_values_are_ignored() {
        let mut settings = Settings::default();
        apply_env(
            &mut settings,
            vars(&[("APP__ALGORITHM", "bogo"), ("APP__SETTLE_GAP_MS", "soon")]),
        );
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn timing_uses_slider_when_configured() {
        let settings = Settings {
            speed: Some(3200),
            sweep_interval_ms: 10,
            ..Settings::default()
        };
        let timing = settings.timing();
        assert_eq!(timing.animation, Duration::from_millis(1400));
        assert_eq!(timing.sweep_interval, Duration::from_millis(10));
        assert_eq!(Settings::default().timing(), Timing::default());
    }
}
