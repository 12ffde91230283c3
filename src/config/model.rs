// src/config/model.rs

use std::path::PathBuf;

use serde::Deserialize;

/// Top-level configuration as read from `.task_wrapup_skill_data.json`
/// (or an equivalent TOML file).
///
/// ```toml
/// project_name = "acme-api"
///
/// [communication.email]
/// enabled = true
/// recipients = [{ first_name = "Ada", last_name = "L", email = "ada@example.com" }]
///
/// [worklog]
/// prompt_for_duration = false
/// default_duration_minutes = 90
///
/// [execution]
/// max_parallel_workers = 5
/// ```
///
/// Every section is optional and defaults to the stock wrap-up settings.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawConfigFile {
    #[serde(default)]
    pub project_name: String,

    #[serde(default)]
    pub communication: CommunicationSection,

    #[serde(default)]
    pub worklog: WorklogConfig,

    #[serde(default)]
    pub documentation: DocumentationConfig,

    #[serde(default)]
    pub pull_request: PullRequestConfig,

    #[serde(default)]
    pub optional_actions: OptionalActions,

    #[serde(default)]
    pub execution: ExecutionSection,

    #[serde(default)]
    pub tools: ToolsSection,
}

/// Validated configuration. Only obtainable through
/// `ConfigFile::try_from(RawConfigFile)`, which runs the structural checks in
/// [`validate`](crate::config::validate).
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub project_name: String,
    pub communication: CommunicationSection,
    pub worklog: WorklogConfig,
    pub documentation: DocumentationConfig,
    pub pull_request: PullRequestConfig,
    pub optional_actions: OptionalActions,
    pub execution: ExecutionSection,
    pub tools: ToolsSection,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(raw: RawConfigFile) -> Self {
        Self {
            project_name: raw.project_name,
            communication: raw.communication,
            worklog: raw.worklog,
            documentation: raw.documentation,
            pull_request: raw.pull_request,
            optional_actions: raw.optional_actions,
            execution: raw.execution,
            tools: raw.tools,
        }
    }

    /// Project label, or `fallback` when none is configured.
    pub fn project_name_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        if self.project_name.trim().is_empty() {
            fallback
        } else {
            &self.project_name
        }
    }
}

/// `[communication]` section.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct CommunicationSection {
    #[serde(default)]
    pub email: EmailConfig,
    #[serde(default)]
    pub sms: SmsConfig,
    #[serde(default)]
    pub slack: SlackConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct EmailRecipient {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct SmsRecipient {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
}

impl SmsRecipient {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmailConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub recipients: Vec<EmailRecipient>,
    #[serde(default)]
    pub cc: Vec<EmailRecipient>,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            recipients: Vec::new(),
            cc: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SmsConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub recipients: Vec<SmsRecipient>,
    /// Per-message character cap. Longer content is cut to
    /// `max_length - 3` characters plus `"..."`.
    #[serde(default = "default_sms_max_length")]
    pub max_length: usize,
}

impl Default for SmsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            recipients: Vec::new(),
            max_length: default_sms_max_length(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct SlackConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub channel: String,
    #[serde(default)]
    pub mention_users: Vec<String>,
}

/// `[worklog]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct WorklogConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// When true the duration is expected from the caller (`--duration-minutes`);
    /// without one the entry falls back to `default_duration_minutes`.
    #[serde(default = "default_true")]
    pub prompt_for_duration: bool,

    #[serde(default)]
    pub default_duration_minutes: Option<u32>,
}

impl Default for WorklogConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            prompt_for_duration: true,
            default_duration_minutes: None,
        }
    }
}

/// `[documentation]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct DocumentationConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_true")]
    pub auto_update: bool,
    #[serde(default = "default_doc_paths")]
    pub paths: Vec<String>,
    #[serde(default = "default_doc_strategy")]
    pub strategy: String,
}

impl Default for DocumentationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            auto_update: true,
            paths: default_doc_paths(),
            strategy: default_doc_strategy(),
        }
    }
}

/// `[pull_request]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct PullRequestConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Reported when no usable session state exists.
    #[serde(default = "default_parent_branch")]
    pub default_parent_branch: String,

    #[serde(default = "default_true")]
    pub auto_checkout_parent: bool,

    #[serde(default = "default_true")]
    pub cleanup_session_state: bool,

    #[serde(default)]
    pub draft: bool,

    /// Supports `{issue_number}`, `{issue_title}`, `{feature_branch}` and
    /// `{parent_branch}` placeholders.
    #[serde(default)]
    pub title_template: Option<String>,

    /// Supports a `{summary}` placeholder.
    #[serde(default)]
    pub body_template: Option<String>,
}

impl Default for PullRequestConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            default_parent_branch: default_parent_branch(),
            auto_checkout_parent: true,
            cleanup_session_state: true,
            draft: false,
            title_template: None,
            body_template: None,
        }
    }
}

/// `[optional_actions]` section.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct OptionalActions {
    #[serde(default)]
    pub calendar: Toggle,
    #[serde(default)]
    pub github: Toggle,
}

/// A channel that only carries an enablement flag.
#[derive(Debug, Clone, Copy, Deserialize, Default)]
pub struct Toggle {
    #[serde(default)]
    pub enabled: bool,
}

/// `[execution]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ExecutionSection {
    #[serde(default = "default_true")]
    pub parallel_execution: bool,

    /// Size of the worker pool used in parallel mode.
    #[serde(default = "default_max_parallel_workers")]
    pub max_parallel_workers: usize,

    /// Upper bound for a whole dispatch; `None` waits for every task.
    #[serde(default)]
    pub dispatch_timeout_secs: Option<u64>,
}

impl Default for ExecutionSection {
    fn default() -> Self {
        Self {
            parallel_execution: true,
            max_parallel_workers: default_max_parallel_workers(),
            dispatch_timeout_secs: None,
        }
    }
}

/// `[tools]` section: locations of the external executables.
///
/// Unset entries resolve to the conventional skill install locations under
/// `~/.claude/skills/`.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ToolsSection {
    #[serde(default)]
    pub email_script: Option<PathBuf>,
    #[serde(default)]
    pub sms_script: Option<PathBuf>,
    #[serde(default)]
    pub worklog_script: Option<PathBuf>,
    #[serde(default)]
    pub pr_script: Option<PathBuf>,
}

impl ToolsSection {
    pub fn email_script(&self) -> PathBuf {
        resolve_tool(&self.email_script, "email/gmail_manager.rb")
    }

    pub fn sms_script(&self) -> PathBuf {
        resolve_tool(&self.sms_script, "text-message/scripts/send_message.sh")
    }

    pub fn worklog_script(&self) -> PathBuf {
        resolve_tool(&self.worklog_script, "worklog/scripts/worklog_manager.py")
    }

    pub fn pr_script(&self) -> PathBuf {
        resolve_tool(&self.pr_script, "task-wrapup/scripts/pr-workflow.sh")
    }
}

fn resolve_tool(configured: &Option<PathBuf>, default_rel: &str) -> PathBuf {
    if let Some(path) = configured {
        return path.clone();
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("~"))
        .join(".claude/skills")
        .join(default_rel)
}

fn default_true() -> bool {
    true
}

fn default_sms_max_length() -> usize {
    320
}

fn default_doc_paths() -> Vec<String> {
    vec!["README.md".to_string()]
}

fn default_doc_strategy() -> String {
    "smart_merge".to_string()
}

fn default_parent_branch() -> String {
    "develop".to_string()
}

fn default_max_parallel_workers() -> usize {
    5
}
