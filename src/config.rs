use serde::{Deserialize, Serialize};

/// Embedded default policy tables.
const DEFAULT_POLICY: &str = include_str!("policy.default.toml");

// ── Final (merged) config types ──

#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub settings: Settings,
    #[serde(default)]
    pub allowlist: Allowlist,
    #[serde(default)]
    pub safe_read: SafeRead,
    #[serde(default)]
    pub dangerous: Dangerous,
    #[serde(default)]
    pub chain: Chain,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Paths under /home outside this directory count as dangerous.
    /// Tilde-expanded when the policy is compiled.
    #[serde(default = "default_project_home")]
    pub project_home: String,
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_project_home() -> String {
    "~".into()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            project_home: default_project_home(),
        }
    }
}

/// Exact/prefix command strings that are always allowed.
#[derive(Debug, Deserialize, Serialize, Default)]
pub struct Allowlist {
    #[serde(default)]
    pub prefixes: Vec<String>,
}

/// Anchored regexes for bounded read-only file inspection.
#[derive(Debug, Deserialize, Serialize, Default)]
pub struct SafeRead {
    #[serde(default)]
    pub patterns: Vec<String>,
}

/// Substring regexes for destructive or privilege-escalating operations.
#[derive(Debug, Deserialize, Serialize, Default)]
pub struct Dangerous {
    #[serde(default)]
    pub patterns: Vec<String>,
}

/// Command names considered read-only for pipe/chain analysis.
#[derive(Debug, Deserialize, Serialize, Default)]
pub struct Chain {
    #[serde(default)]
    pub read_only: Vec<String>,
}

// ── Overlay types (user config that merges with defaults) ──

#[derive(Debug, Deserialize, Default)]
struct ConfigOverlay {
    #[serde(default)]
    settings: SettingsOverlay,
    #[serde(default)]
    allowlist: AllowlistOverlay,
    #[serde(default)]
    safe_read: SafeReadOverlay,
    #[serde(default)]
    dangerous: DangerousOverlay,
    #[serde(default)]
    chain: ChainOverlay,
}

#[derive(Debug, Deserialize, Default)]
struct SettingsOverlay {
    timeout_secs: Option<u64>,
    project_home: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct AllowlistOverlay {
    #[serde(default)]
    replace: bool,
    #[serde(default)]
    prefixes: Vec<String>,
    #[serde(default)]
    remove_prefixes: Vec<String>,
}

#[derive(Debug, Deserialize, Default)]
struct SafeReadOverlay {
    #[serde(default)]
    replace: bool,
    #[serde(default)]
    patterns: Vec<String>,
    #[serde(default)]
    remove_patterns: Vec<String>,
}

#[derive(Debug, Deserialize, Default)]
struct DangerousOverlay {
    #[serde(default)]
    replace: bool,
    #[serde(default)]
    patterns: Vec<String>,
    #[serde(default)]
    remove_patterns: Vec<String>,
}

#[derive(Debug, Deserialize, Default)]
struct ChainOverlay {
    #[serde(default)]
    replace: bool,
    #[serde(default)]
    read_only: Vec<String>,
    #[serde(default)]
    remove_read_only: Vec<String>,
}

// ── Merge logic ──

/// Merge a user list into a default list.
/// In replace mode: user list replaces default entirely.
/// In merge mode: remove items first, then extend with additions (deduped).
fn merge_list(base: &mut Vec<String>, add: Vec<String>, remove: &[String], replace: bool) {
    if replace {
        *base = add;
    } else {
        base.retain(|item| !remove.contains(item));
        for item in add {
            if !base.contains(&item) {
                base.push(item);
            }
        }
    }
}

impl Config {
    /// Load the default embedded policy tables.
    pub fn default_config() -> Self {
        toml::from_str(DEFAULT_POLICY).expect("embedded default policy must parse")
    }

    /// Load configuration with resolution order:
    /// 1. Start with embedded defaults
    /// 2. Merge user overlay from ~/.config/shellgate/policy.toml (if exists)
    ///
    /// User config merges with defaults: lists extend, scalars override.
    /// Set `replace = true` in any section to replace its defaults entirely.
    /// Use `remove_<field>` lists to subtract specific items from defaults.
    pub fn load() -> Self {
        let mut config = Self::default_config();
        if let Some(overlay) = Self::load_overlay() {
            config.apply_overlay(overlay);
        }
        config
    }

    /// Try to load user overlay from ~/.config/shellgate/policy.toml.
    fn load_overlay() -> Option<ConfigOverlay> {
        let home = std::env::var_os("HOME")?;
        let path = std::path::Path::new(&home).join(".config/shellgate/policy.toml");
        let content = std::fs::read_to_string(path).ok()?;
        match toml::from_str(&content) {
            Ok(overlay) => Some(overlay),
            Err(e) => {
                eprintln!("shellgate: policy overlay parse error: {e}");
                None
            }
        }
    }

    /// Apply an overlay on top of this config (merge semantics).
    fn apply_overlay(&mut self, overlay: ConfigOverlay) {
        // Settings: scalar overrides
        if let Some(v) = overlay.settings.timeout_secs {
            self.settings.timeout_secs = v;
        }
        if let Some(v) = overlay.settings.project_home {
            self.settings.project_home = v;
        }

        // Allowlist
        let a = overlay.allowlist;
        merge_list(
            &mut self.allowlist.prefixes,
            a.prefixes,
            &a.remove_prefixes,
            a.replace,
        );

        // Safe-read patterns
        let s = overlay.safe_read;
        merge_list(
            &mut self.safe_read.patterns,
            s.patterns,
            &s.remove_patterns,
            s.replace,
        );

        // Dangerous patterns
        let d = overlay.dangerous;
        merge_list(
            &mut self.dangerous.patterns,
            d.patterns,
            &d.remove_patterns,
            d.replace,
        );

        // Chain read-only names
        let c = overlay.chain;
        merge_list(
            &mut self.chain.read_only,
            c.read_only,
            &c.remove_read_only,
            c.replace,
        );
    }

    /// Apply an overlay from a TOML string. Used for testing.
    #[cfg(test)]
    fn apply_overlay_str(&mut self, toml_str: &str) {
        let overlay: ConfigOverlay = toml::from_str(toml_str).unwrap();
        self.apply_overlay(overlay);
    }
}
