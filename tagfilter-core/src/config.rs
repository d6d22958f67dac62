//! Configuration management for `tagfilter-core`.
//!
//! Rule sets are stored as JSON or YAML documents, or as plain text with one
//! rule per line. This module defines the serialized record types, converts
//! them to validated rules and handles loading and saving.
//!
//! License: MIT OR Apache-2.0

use log::{debug, info};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::errors::{Result, TagFilterError};
use crate::factory::{create_filter, is_supported};
use crate::filters::replace::resolve_replacement;
use crate::patterns::{capture_references, PatternCache, PatternFlags, REPLACEMENT_DELIMITER};
use crate::rules::{AnyFilterRule, FilterRule, FilterType, GroupFilterRule};

pub const DEFAULT_CONFIG_VERSION: &str = "1.0";

fn default_version() -> String {
    DEFAULT_CONFIG_VERSION.to_string()
}

fn default_enabled() -> bool {
    true
}

/// A rule as it appears in a configuration document.
///
/// Single-tag rules carry `pattern`; `group` rules carry `patterns`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RuleRecord {
    pub filter_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patterns: Option<Vec<String>>,
    #[serde(default)]
    pub priority: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replacement: Option<String>,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl RuleRecord {
    /// A single-tag record with default priority and no description.
    pub fn single(filter_type: &str, pattern: &str) -> Self {
        Self {
            filter_type: filter_type.to_string(),
            pattern: Some(pattern.to_string()),
            patterns: None,
            priority: 0,
            replacement: None,
            enabled: true,
            description: None,
        }
    }

    pub fn group<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            filter_type: FilterType::Group.to_string(),
            pattern: None,
            patterns: Some(patterns.into_iter().map(Into::into).collect()),
            priority: 0,
            replacement: None,
            enabled: true,
            description: None,
        }
    }

    pub fn with_priority(mut self, priority: i64) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_replacement(mut self, replacement: impl Into<String>) -> Self {
        self.replacement = Some(replacement.into());
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Converts the record into a rule, checking everything that can be
    /// checked without running it.
    ///
    /// Patterns are compiled through the global pattern cache, so a later
    /// engine build over the same rules finds them already compiled.
    pub fn to_rule(&self) -> Result<AnyFilterRule> {
        let priority = u32::try_from(self.priority).map_err(|_| {
            TagFilterError::InvalidRule(format!(
                "Priority must be a non-negative 32-bit integer, got {}",
                self.priority
            ))
        })?;

        let kind = FilterType::from(self.filter_type.as_str());
        if !is_supported(&kind) {
            return Err(TagFilterError::UnknownFilterKind(self.filter_type.clone()));
        }

        let rule: AnyFilterRule = if kind == FilterType::Group {
            let patterns = self.patterns.as_ref().ok_or_else(|| {
                TagFilterError::InvalidRule("Group rule is missing the `patterns` field".to_string())
            })?;
            let mut group = GroupFilterRule::new(patterns.iter().cloned())?
                .with_priority(priority)
                .with_enabled(self.enabled);
            if let Some(description) = &self.description {
                group = group.with_description(description.clone());
            }
            group.into()
        } else {
            let pattern = self.pattern.as_deref().filter(|p| !p.is_empty()).ok_or_else(|| {
                TagFilterError::InvalidRule(format!(
                    "{} rule is missing a non-empty `pattern` field",
                    self.filter_type
                ))
            })?;
            let mut single = FilterRule::new(kind.clone(), pattern)
                .with_priority(priority)
                .with_enabled(self.enabled);
            if let Some(replacement) = &self.replacement {
                single = single.with_replacement(replacement.clone());
            }
            if let Some(description) = &self.description {
                single = single.with_description(description.clone());
            }
            if kind == FilterType::ReplaceCapture {
                check_capture_references(&single)?;
            }
            single.into()
        };

        // Building the filter surfaces malformed patterns.
        create_filter(&rule, &PatternCache::global())?;
        Ok(rule)
    }

    pub fn from_rule(rule: &AnyFilterRule) -> Self {
        match rule {
            AnyFilterRule::Single(single) => Self {
                filter_type: single.filter_type().to_string(),
                pattern: Some(single.pattern().to_string()),
                patterns: None,
                priority: i64::from(single.priority()),
                replacement: single.replacement().map(str::to_string),
                enabled: single.enabled(),
                description: single.description().map(str::to_string),
            },
            AnyFilterRule::Group(group) => Self {
                filter_type: group.filter_type().to_string(),
                pattern: None,
                patterns: Some(group.patterns().to_vec()),
                priority: i64::from(group.priority()),
                replacement: None,
                enabled: group.enabled(),
                description: group.description().map(str::to_string),
            },
        }
    }
}

/// Fails when the replacement refers to a capture group the source regex lacks.
fn check_capture_references(rule: &FilterRule) -> Result<()> {
    let (source, replacement) = resolve_replacement(rule)?;
    let regex = PatternCache::global().get_compiled_pattern(&source, PatternFlags::NONE)?;
    let groups = regex.captures_len().saturating_sub(1);
    for reference in capture_references(&replacement) {
        if reference > groups {
            return Err(TagFilterError::InvalidRule(format!(
                "Replacement '{}' references non-existent capture group '${}' ({} available)",
                replacement, reference, groups
            )));
        }
    }
    Ok(())
}

/// Top-level configuration document.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TagFilterConfig {
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub rules: Vec<RuleRecord>,
    /// Free-form settings carried alongside the rules.
    #[serde(default)]
    pub global_settings: BTreeMap<String, Value>,
}

impl Default for TagFilterConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            rules: Vec::new(),
            global_settings: BTreeMap::new(),
        }
    }
}

impl TagFilterConfig {
    pub fn new(rules: Vec<RuleRecord>) -> Self {
        Self {
            rules,
            ..Self::default()
        }
    }

    /// Converts every record, failing on the first invalid one.
    pub fn to_filter_rules(&self) -> Result<Vec<AnyFilterRule>> {
        self.rules.iter().map(RuleRecord::to_rule).collect()
    }

    pub fn enabled_rules(&self) -> Vec<&RuleRecord> {
        self.rules.iter().filter(|r| r.enabled).collect()
    }

    /// Records ordered by descending priority, ties kept in document order.
    pub fn rules_by_priority(&self) -> Vec<&RuleRecord> {
        let mut rules: Vec<&RuleRecord> = self.rules.iter().collect();
        rules.sort_by(|a, b| b.priority.cmp(&a.priority));
        rules
    }

    /// Checks the version and every record, reporting all problems at once.
    pub fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();
        if self.version.trim().is_empty() {
            errors.push("Version cannot be empty.".to_string());
        }
        for (index, record) in self.rules.iter().enumerate() {
            if let Err(e) = record.to_rule() {
                errors.push(format!("Rule {} ({}): {}", index + 1, record.filter_type, e));
            }
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(TagFilterError::Config(format!(
                "Rule validation failed:\n{}",
                errors.join("\n")
            )))
        }
    }

    /// A small configuration exercising every built-in rule kind.
    pub fn sample() -> Self {
        let rules = vec![
            RuleRecord::group(["steam", "sweat", "blush"])
                .with_priority(100)
                .with_description("Remove suggestive tag combinations"),
            RuleRecord::single("wildcard", "*_hair")
                .with_priority(50)
                .with_description("Remove all hair tags"),
            RuleRecord::single("replace_capture", "(.*)_hair||$1_bald")
                .with_priority(30)
                .with_enabled(false)
                .with_description("Turn hair tags into bald tags"),
            RuleRecord::single("plain_keyword", "nsfw")
                .with_priority(80)
                .with_description("Remove the nsfw keyword"),
            RuleRecord::single("regex", r"\b(nude|naked)\b")
                .with_priority(70)
                .with_description("Remove exact word matches"),
        ];
        let mut global_settings = BTreeMap::new();
        global_settings.insert("case_sensitive".to_string(), Value::from(false));
        global_settings.insert("default_priority".to_string(), Value::from(0));
        global_settings.insert("max_rules".to_string(), Value::from(100));
        Self {
            version: default_version(),
            rules,
            global_settings,
        }
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: TagFilterConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let config: TagFilterConfig = serde_yml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Parses the line-oriented text format.
    ///
    /// * blank lines and lines starting with `#` are ignored;
    /// * `source||replacement` becomes a `replace` rule;
    /// * `/expression/` becomes a `regex` rule;
    /// * anything else becomes a `plain_keyword` rule.
    pub fn from_text_str(text: &str, default_priority: u32) -> Result<Self> {
        let mut rules = Vec::new();
        for (index, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let record = parse_text_line(line, default_priority)
                .map_err(|reason| TagFilterError::Config(format!("Line {}: {}", index + 1, reason)))?;
            rules.push(record);
        }

        let mut global_settings = BTreeMap::new();
        global_settings.insert("source".to_string(), Value::from("text_file"));
        global_settings.insert("default_priority".to_string(), Value::from(default_priority));
        Ok(Self {
            version: default_version(),
            rules,
            global_settings,
        })
    }

    pub fn load_from_json<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading JSON rules from: {}", path.display());
        Self::from_json_str(&read_config(path)?)
    }

    pub fn load_from_yaml<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading YAML rules from: {}", path.display());
        Self::from_yaml_str(&read_config(path)?)
    }

    pub fn load_from_text<P: AsRef<Path>>(path: P, default_priority: u32) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading text rules from: {}", path.display());
        let mut config = Self::from_text_str(&read_config(path)?, default_priority)?;
        config
            .global_settings
            .insert("file_path".to_string(), Value::from(path.display().to_string()));
        debug!("Parsed {} rules from {}.", config.rules.len(), path.display());
        Ok(config)
    }

    /// Loads a configuration, choosing the format from the file extension.
    ///
    /// `default_priority` only applies to `.txt` files.
    pub fn load_from_file<P: AsRef<Path>>(path: P, default_priority: u32) -> Result<Self> {
        let path = path.as_ref();
        match extension(path).as_str() {
            "json" => Self::load_from_json(path),
            "yaml" | "yml" => Self::load_from_yaml(path),
            "txt" => Self::load_from_text(path, default_priority),
            other => Err(TagFilterError::Config(format!(
                "Unsupported file format: '.{}'. Supported formats: .json, .yaml, .yml, .txt",
                other
            ))),
        }
    }

    pub fn save_to_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        write_config(path, &serde_json::to_string_pretty(self)?)
    }

    pub fn save_to_yaml<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        write_config(path, &serde_yml::to_string(self)?)
    }

    /// Saves as JSON or YAML depending on the file extension.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        match extension(path).as_str() {
            "json" => self.save_to_json(path),
            "yaml" | "yml" => self.save_to_yaml(path),
            other => Err(TagFilterError::Config(format!(
                "Unsupported file format: '.{}'. Supported formats: .json, .yaml, .yml",
                other
            ))),
        }
    }
}

fn parse_text_line(line: &str, default_priority: u32) -> std::result::Result<RuleRecord, String> {
    let priority = i64::from(default_priority);

    if let Some((source, replacement)) = line.split_once(REPLACEMENT_DELIMITER) {
        let (source, replacement) = (source.trim(), replacement.trim());
        if source.is_empty() || replacement.is_empty() {
            return Err(format!("Empty pattern or replacement in: {}", line));
        }
        return Ok(RuleRecord::single("replace", source)
            .with_replacement(replacement)
            .with_priority(priority)
            .with_description(format!("Replace \"{}\" with \"{}\"", source, replacement)));
    }

    if line.len() >= 2 && line.starts_with('/') && line.ends_with('/') {
        let expression = &line[1..line.len() - 1];
        if expression.is_empty() {
            return Err(format!("Empty regex pattern: {}", line));
        }
        return Ok(RuleRecord::single("regex", expression)
            .with_priority(priority)
            .with_description(format!("Regex pattern: {}", expression)));
    }

    Ok(RuleRecord::single("plain_keyword", line)
        .with_priority(priority)
        .with_description(format!("Plain keyword: {}", line)))
}

fn extension(path: &Path) -> String {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default()
}

fn read_config(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| {
        TagFilterError::Config(format!("Failed to read config file {}: {}", path.display(), e))
    })
}

fn write_config(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, contents)?;
    info!("Saved configuration to {}.", path.display());
    Ok(())
}
