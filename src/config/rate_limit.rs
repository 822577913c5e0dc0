use super::parse_bool_env;
use std::env;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitRule {
    pub per_second: u64,
    pub burst_size: u32,
}

impl RateLimitRule {
    pub const fn new(per_second: u64, burst_size: u32) -> Self {
        Self {
            per_second,
            burst_size,
        }
    }
}

/// Per-IP limits, one rule for GETs and one for mutating requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    pub enabled: bool,
    pub read: RateLimitRule,
    pub write: RateLimitRule,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            read: RateLimitRule::new(30, 60),
            write: RateLimitRule::new(10, 20),
        }
    }
}

impl RateLimitConfig {
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        cfg.enabled = parse_bool_env("RATE_LIMIT_ENABLED", cfg.enabled);

        if let Ok(raw) = env::var("RATE_LIMIT_CONFIG") {
            match parse_rate_limit_config(&raw) {
                Ok(overrides) => cfg = overrides.apply_to(cfg),
                Err(err) => {
                    tracing::warn!("Invalid RATE_LIMIT_CONFIG '{}': {}", raw, err);
                }
            }
        }

        cfg
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct RuleOverrides {
    read: Option<RateLimitRule>,
    write: Option<RateLimitRule>,
}

impl RuleOverrides {
    fn apply_to(self, mut cfg: RateLimitConfig) -> RateLimitConfig {
        if let Some(rule) = self.read {
            cfg.read = rule;
        }
        if let Some(rule) = self.write {
            cfg.write = rule;
        }
        cfg
    }
}

/// Accepts either `"10:20"` (both groups) or `"read=30:60,write=10:20"`.
fn parse_rate_limit_config(raw: &str) -> Result<RuleOverrides, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err("empty value".to_string());
    }

    if !trimmed.contains('=') {
        let rule = parse_rule(trimmed)?;
        return Ok(RuleOverrides {
            read: Some(rule),
            write: Some(rule),
        });
    }

    let mut overrides = RuleOverrides::default();
    for item in trimmed.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let (name, raw_rule) = item
            .split_once('=')
            .ok_or_else(|| format!("invalid item '{}', expected name=per:burst", item))?;
        let rule = parse_rule(raw_rule.trim())?;
        match name.trim().to_ascii_lowercase().as_str() {
            "read" | "public" => overrides.read = Some(rule),
            "write" => overrides.write = Some(rule),
            other => {
                return Err(format!("unknown group '{}', expected read/write", other));
            }
        }
    }

    Ok(overrides)
}

fn parse_rule(raw: &str) -> Result<RateLimitRule, String> {
    let (per_second_raw, burst_raw) = raw
        .split_once(':')
        .ok_or_else(|| format!("invalid rule '{}', expected per:burst", raw))?;

    let per_second: u64 = per_second_raw
        .trim()
        .parse()
        .map_err(|_| format!("invalid per_second '{}'", per_second_raw.trim()))?;
    let burst_size: u32 = burst_raw
        .trim()
        .parse()
        .map_err(|_| format!("invalid burst_size '{}'", burst_raw.trim()))?;

    if per_second == 0 || burst_size == 0 {
        return Err("per_second and burst_size must be > 0".to_string());
    }

    Ok(RateLimitRule::new(per_second, burst_size))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_rule_applies_to_both_groups() {
        let cfg = parse_rate_limit_config("12:24")
            .unwrap()
            .apply_to(RateLimitConfig::default());
        assert_eq!(cfg.read, RateLimitRule::new(12, 24));
        assert_eq!(cfg.write, RateLimitRule::new(12, 24));
    }

    #[test]
    fn grouped_rules_override_only_named_group() {
        let cfg = parse_rate_limit_config("write=1:2")
            .unwrap()
            .apply_to(RateLimitConfig::default());
        assert_eq!(cfg.write, RateLimitRule::new(1, 2));
        assert_eq!(cfg.read, RateLimitConfig::default().read);
    }

    #[test]
    fn public_is_an_alias_for_read() {
        let parsed = parse_rate_limit_config("public=8:16").unwrap();
        assert_eq!(parsed.read, Some(RateLimitRule::new(8, 16)));
    }

    #[test]
    fn rejects_bad_rules() {
        assert!(parse_rate_limit_config("read=abc")
            .unwrap_err()
            .contains("invalid rule"));
        assert!(parse_rate_limit_config("0:5").is_err());
        assert!(parse_rate_limit_config("admin=1:1")
            .unwrap_err()
            .contains("unknown group"));
    }
}
