// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Switchyard model router.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};
use switchyard_core::types::{ModelDescriptor, QualityClass, SpeedClass, TaskType};

/// Top-level Switchyard configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SwitchyardConfig {
    /// Router identity and conversation settings.
    #[serde(default)]
    pub agent: AgentConfig,

    /// Candidate backend models, in registration order.
    #[serde(default = "default_models")]
    pub models: Vec<ModelConfig>,

    /// Model scoring weights.
    #[serde(default)]
    pub selector: SelectorConfig,

    /// Task execution settings.
    #[serde(default)]
    pub executor: ExecutorConfig,

    /// Interaction log settings.
    #[serde(default)]
    pub memory: MemoryConfig,

    /// Shell, file, search, and scanner collaborator settings.
    #[serde(default)]
    pub tools: ToolsConfig,

    /// Initial capability toggles.
    #[serde(default)]
    pub capabilities: CapabilitiesConfig,

    /// HTTP backend settings.
    #[serde(default)]
    pub backend: BackendConfig,
}

impl Default for SwitchyardConfig {
    fn default() -> Self {
        Self {
            agent: AgentConfig::default(),
            models: default_models(),
            selector: SelectorConfig::default(),
            executor: ExecutorConfig::default(),
            memory: MemoryConfig::default(),
            tools: ToolsConfig::default(),
            capabilities: CapabilitiesConfig::default(),
            backend: BackendConfig::default(),
        }
    }
}

/// Router identity and conversation configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// Display name used in the shell prompt and logs.
    #[serde(default = "default_agent_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Number of recent conversation turns passed as the conversational preamble.
    #[serde(default = "default_history_window")]
    pub history_window: usize,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            log_level: default_log_level(),
            history_window: default_history_window(),
        }
    }
}

fn default_agent_name() -> String {
    "switchyard".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_history_window() -> usize {
    6
}

/// One `[[models]]` entry.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ModelConfig {
    pub name: String,

    /// Provider tag used to find the backend instance.
    #[serde(default = "default_provider")]
    pub provider: String,

    #[serde(default)]
    pub capabilities: Vec<String>,

    #[serde(default = "default_model_max_tokens")]
    pub max_tokens: u32,

    #[serde(default)]
    pub cost_per_token: f64,

    #[serde(default = "default_speed")]
    pub speed: SpeedClass,

    #[serde(default = "default_quality")]
    pub quality: QualityClass,
}

impl ModelConfig {
    fn new(
        name: &str,
        capabilities: &[&str],
        cost_per_token: f64,
        speed: SpeedClass,
        quality: QualityClass,
    ) -> Self {
        Self {
            name: name.to_string(),
            provider: default_provider(),
            capabilities: capabilities.iter().map(|c| c.to_string()).collect(),
            max_tokens: default_model_max_tokens(),
            cost_per_token,
            speed,
            quality,
        }
    }
}

impl From<&ModelConfig> for ModelDescriptor {
    fn from(model: &ModelConfig) -> Self {
        ModelDescriptor {
            name: model.name.clone(),
            provider: model.provider.clone(),
            capabilities: model.capabilities.clone(),
            max_tokens: model.max_tokens,
            cost_per_token: model.cost_per_token,
            speed: model.speed,
            quality: model.quality,
        }
    }
}

fn default_provider() -> String {
    "openai".to_string()
}

fn default_model_max_tokens() -> u32 {
    4096
}

fn default_speed() -> SpeedClass {
    SpeedClass::Medium
}

fn default_quality() -> QualityClass {
    QualityClass::Medium
}

/// Default catalog. Costs are relative per-token figures, not vendor prices.
fn default_models() -> Vec<ModelConfig> {
    vec![
        ModelConfig::new(
            "gpt-4o",
            &["reasoning", "coding", "analysis"],
            0.000_03,
            SpeedClass::Medium,
            QualityClass::High,
        ),
        ModelConfig::new(
            "gpt-4o-mini",
            &["speed", "cost-effective", "general"],
            0.000_002,
            SpeedClass::Fast,
            QualityClass::Medium,
        ),
        ModelConfig::new(
            "claude-3-opus",
            &["creative", "analysis", "safety", "reasoning"],
            0.000_075,
            SpeedClass::Slow,
            QualityClass::High,
        ),
        ModelConfig::new(
            "claude-3-haiku",
            &["speed", "cost-effective", "general"],
            0.000_002_5,
            SpeedClass::Fast,
            QualityClass::Medium,
        ),
        ModelConfig::new(
            "gemini-pro",
            &["multimodal", "reasoning", "multilingual"],
            0.000_000_5,
            SpeedClass::Medium,
            QualityClass::Medium,
        ),
        ModelConfig::new(
            "gpt-3.5-turbo",
            &["speed", "cost-effective", "general"],
            0.000_002,
            SpeedClass::Fast,
            QualityClass::Low,
        ),
    ]
}

/// One `(task_type, tag) -> points` entry of the affinity weight table.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AffinityRule {
    pub task_type: TaskType,
    pub tag: String,
    pub points: i32,
}

impl AffinityRule {
    fn new(task_type: TaskType, tag: &str, points: i32) -> Self {
        Self {
            task_type,
            tag: tag.to_string(),
            points,
        }
    }
}

/// Model scoring configuration. Every factor is additive.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SelectorConfig {
    /// Task-type to capability-tag weight table.
    #[serde(default = "default_affinity")]
    pub affinity: Vec<AffinityRule>,

    /// Bonus for `cost-effective` models on simple tasks.
    #[serde(default = "default_simple_cost_bonus")]
    pub simple_cost_bonus: i32,

    /// Bonus for `speed` models on simple tasks.
    #[serde(default = "default_simple_speed_bonus")]
    pub simple_speed_bonus: i32,

    /// Bonus for high-quality models on complex tasks.
    #[serde(default = "default_complex_quality_bonus")]
    pub complex_quality_bonus: i32,

    /// Bonus for fast models on high-urgency tasks.
    #[serde(default = "default_urgency_speed_bonus")]
    pub urgency_speed_bonus: i32,

    /// Bonus for cheap models on low-urgency tasks.
    #[serde(default = "default_urgency_cost_bonus")]
    pub urgency_cost_bonus: i32,

    /// Cost-per-token at or below which a model counts as cheap.
    #[serde(default = "default_low_cost_threshold")]
    pub low_cost_threshold: f64,

    /// Bonus for `multilingual` models when a non-default language is requested.
    #[serde(default = "default_language_bonus")]
    pub language_bonus: i32,

    /// Bonus when the user's preference string is a substring of the model name.
    #[serde(default = "default_user_preference_bonus")]
    pub user_preference_bonus: i32,

    /// Average latency below which a used model earns `latency_bonus`.
    #[serde(default = "default_fast_latency_ms")]
    pub fast_latency_ms: f64,

    #[serde(default = "default_latency_bonus")]
    pub latency_bonus: i32,

    /// Request count above which a model earns `experience_bonus`.
    #[serde(default = "default_experience_requests")]
    pub experience_requests: u64,

    #[serde(default = "default_experience_bonus")]
    pub experience_bonus: i32,

    /// Models favoured by this deployment.
    #[serde(default)]
    pub preferred_models: Vec<String>,

    #[serde(default = "default_preferred_bonus")]
    pub preferred_bonus: i32,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            affinity: default_affinity(),
            simple_cost_bonus: default_simple_cost_bonus(),
            simple_speed_bonus: default_simple_speed_bonus(),
            complex_quality_bonus: default_complex_quality_bonus(),
            urgency_speed_bonus: default_urgency_speed_bonus(),
            urgency_cost_bonus: default_urgency_cost_bonus(),
            low_cost_threshold: default_low_cost_threshold(),
            language_bonus: default_language_bonus(),
            user_preference_bonus: default_user_preference_bonus(),
            fast_latency_ms: default_fast_latency_ms(),
            latency_bonus: default_latency_bonus(),
            experience_requests: default_experience_requests(),
            experience_bonus: default_experience_bonus(),
            preferred_models: Vec::new(),
            preferred_bonus: default_preferred_bonus(),
        }
    }
}

fn default_affinity() -> Vec<AffinityRule> {
    vec![
        AffinityRule::new(TaskType::Coding, "coding", 30),
        AffinityRule::new(TaskType::Coding, "reasoning", 20),
        AffinityRule::new(TaskType::Creative, "creative", 30),
        AffinityRule::new(TaskType::Analytical, "analysis", 30),
        AffinityRule::new(TaskType::Analytical, "reasoning", 20),
        AffinityRule::new(TaskType::Translation, "multilingual", 30),
        AffinityRule::new(TaskType::Summarization, "analysis", 15),
        AffinityRule::new(TaskType::Summarization, "speed", 10),
        AffinityRule::new(TaskType::Conversational, "general", 15),
        AffinityRule::new(TaskType::System, "speed", 15),
    ]
}

fn default_simple_cost_bonus() -> i32 {
    15
}

fn default_simple_speed_bonus() -> i32 {
    10
}

fn default_complex_quality_bonus() -> i32 {
    20
}

fn default_urgency_speed_bonus() -> i32 {
    15
}

fn default_urgency_cost_bonus() -> i32 {
    10
}

fn default_low_cost_threshold() -> f64 {
    0.000_005
}

fn default_language_bonus() -> i32 {
    30
}

fn default_user_preference_bonus() -> i32 {
    25
}

fn default_fast_latency_ms() -> f64 {
    2000.0
}

fn default_latency_bonus() -> i32 {
    5
}

fn default_experience_requests() -> u64 {
    10
}

fn default_experience_bonus() -> i32 {
    5
}

fn default_preferred_bonus() -> i32 {
    10
}

/// Task execution configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ExecutorConfig {
    /// Model retried once when the selected model fails. `None` disables fallback.
    #[serde(default = "default_fallback_model")]
    pub fallback_model: Option<String>,

    /// Upper bound on a single backend invocation.
    #[serde(default = "default_executor_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            fallback_model: default_fallback_model(),
            timeout_secs: default_executor_timeout_secs(),
        }
    }
}

fn default_fallback_model() -> Option<String> {
    Some("gpt-3.5-turbo".to_string())
}

fn default_executor_timeout_secs() -> u64 {
    60
}

/// Interaction log configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MemoryConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Maximum entries listed in a recall answer.
    #[serde(default = "default_recall_limit")]
    pub recall_limit: usize,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            recall_limit: default_recall_limit(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("switchyard").join("memory.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("switchyard-memory.db"))
        .to_string_lossy()
        .into_owned()
}

fn default_recall_limit() -> usize {
    5
}

/// Collaborator configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ToolsConfig {
    /// Upper bound on a single shell command.
    #[serde(default = "default_shell_timeout_secs")]
    pub shell_timeout_secs: u64,

    /// Command fragments that are refused without spawning.
    #[serde(default = "default_blocked_commands")]
    pub blocked_commands: Vec<String>,

    /// Working directory for shell commands. `None` uses the process cwd.
    #[serde(default)]
    pub working_dir: Option<String>,

    /// Instant-answer search endpoint.
    #[serde(default = "default_search_endpoint")]
    pub search_endpoint: String,

    #[serde(default = "default_max_search_results")]
    pub max_search_results: usize,

    /// Tavily API key. `None` falls back to `TAVILY_API_KEY`; with no key the
    /// provider is left out.
    #[serde(default)]
    pub tavily_api_key: Option<String>,

    #[serde(default = "default_tavily_endpoint")]
    pub tavily_endpoint: String,

    /// SerpAPI key. `None` falls back to `SERPAPI_API_KEY`; with no key the
    /// provider is left out.
    #[serde(default)]
    pub serpapi_api_key: Option<String>,

    #[serde(default = "default_serpapi_endpoint")]
    pub serpapi_endpoint: String,

    /// Maximum files returned by a project scan.
    #[serde(default = "default_scan_max_files")]
    pub scan_max_files: usize,

    /// Per-file content limit for project scans.
    #[serde(default = "default_scan_max_bytes")]
    pub scan_max_bytes: usize,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            shell_timeout_secs: default_shell_timeout_secs(),
            blocked_commands: default_blocked_commands(),
            working_dir: None,
            search_endpoint: default_search_endpoint(),
            max_search_results: default_max_search_results(),
            tavily_api_key: None,
            tavily_endpoint: default_tavily_endpoint(),
            serpapi_api_key: None,
            serpapi_endpoint: default_serpapi_endpoint(),
            scan_max_files: default_scan_max_files(),
            scan_max_bytes: default_scan_max_bytes(),
        }
    }
}

fn default_shell_timeout_secs() -> u64 {
    30
}

fn default_blocked_commands() -> Vec<String> {
    ["rm -rf", "sudo rm", "del /f", "format", "shutdown", "reboot", "mkfs", ":(){"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_search_endpoint() -> String {
    "https://api.duckduckgo.com/".to_string()
}

fn default_tavily_endpoint() -> String {
    "https://api.tavily.com/search".to_string()
}

fn default_serpapi_endpoint() -> String {
    "https://serpapi.com/search".to_string()
}

fn default_max_search_results() -> usize {
    5
}

fn default_scan_max_files() -> usize {
    50
}

fn default_scan_max_bytes() -> usize {
    4096
}

/// Capability toggles applied at startup.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CapabilitiesConfig {
    /// Capability names that start disabled.
    #[serde(default)]
    pub disabled: Vec<String>,
}

/// OpenAI-compatible HTTP backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BackendConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// API key. `None` falls back to the `OPENAI_API_KEY` environment variable.
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_request_timeout_secs() -> u64 {
    120
}
