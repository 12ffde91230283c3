#![allow(dead_code)]

use std::path::PathBuf;

use wrapup::config::{ConfigFile, EmailRecipient, RawConfigFile, SmsRecipient};
use wrapup::summary::Summary;

/// Builder for `ConfigFile` to simplify test setup.
///
/// `new()` starts with every channel disabled so a test only turns on what it
/// exercises; `stock()` keeps the shipped defaults.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        let mut config = RawConfigFile::default();
        config.communication.email.enabled = false;
        config.communication.sms.enabled = false;
        config.communication.slack.enabled = false;
        config.worklog.enabled = false;
        config.documentation.enabled = false;
        config.pull_request.enabled = false;
        config.optional_actions.calendar.enabled = false;
        config.optional_actions.github.enabled = false;
        Self { config }
    }

    pub fn stock() -> Self {
        Self {
            config: RawConfigFile::default(),
        }
    }

    pub fn project_name(mut self, name: &str) -> Self {
        self.config.project_name = name.to_string();
        self
    }

    pub fn email_to(mut self, address: &str) -> Self {
        let email = &mut self.config.communication.email;
        email.enabled = true;
        email.recipients.push(email_recipient(address));
        self
    }

    pub fn email_cc(mut self, address: &str) -> Self {
        self.config
            .communication
            .email
            .cc
            .push(email_recipient(address));
        self
    }

    pub fn enable_email(mut self) -> Self {
        self.config.communication.email.enabled = true;
        self
    }

    pub fn sms_to(mut self, first_name: &str, phone: &str) -> Self {
        let sms = &mut self.config.communication.sms;
        sms.enabled = true;
        sms.recipients.push(SmsRecipient {
            first_name: first_name.to_string(),
            last_name: "Tester".to_string(),
            phone: phone.to_string(),
        });
        self
    }

    pub fn enable_sms(mut self) -> Self {
        self.config.communication.sms.enabled = true;
        self
    }

    pub fn sms_max_length(mut self, max_length: usize) -> Self {
        self.config.communication.sms.max_length = max_length;
        self
    }

    pub fn slack(mut self, channel: &str, mentions: &[&str]) -> Self {
        let slack = &mut self.config.communication.slack;
        slack.enabled = true;
        slack.channel = channel.to_string();
        slack.mention_users = mentions.iter().map(|m| m.to_string()).collect();
        self
    }

    pub fn enable_worklog(mut self) -> Self {
        self.config.worklog.enabled = true;
        self
    }

    pub fn worklog_duration(mut self, prompt_for_duration: bool, default_minutes: Option<u32>) -> Self {
        self.config.worklog.prompt_for_duration = prompt_for_duration;
        self.config.worklog.default_duration_minutes = default_minutes;
        self
    }

    pub fn enable_documentation(mut self) -> Self {
        self.config.documentation.enabled = true;
        self.config.documentation.auto_update = true;
        self
    }

    pub fn documentation_auto_update(mut self, auto_update: bool) -> Self {
        self.config.documentation.auto_update = auto_update;
        self
    }

    pub fn enable_pull_request(mut self) -> Self {
        self.config.pull_request.enabled = true;
        self
    }

    pub fn pr_steps(mut self, checkout: bool, cleanup: bool) -> Self {
        self.config.pull_request.auto_checkout_parent = checkout;
        self.config.pull_request.cleanup_session_state = cleanup;
        self
    }

    pub fn pr_draft(mut self, draft: bool) -> Self {
        self.config.pull_request.draft = draft;
        self
    }

    pub fn pr_title_template(mut self, template: &str) -> Self {
        self.config.pull_request.title_template = Some(template.to_string());
        self
    }

    pub fn default_parent_branch(mut self, branch: &str) -> Self {
        self.config.pull_request.default_parent_branch = branch.to_string();
        self
    }

    pub fn enable_calendar(mut self) -> Self {
        self.config.optional_actions.calendar.enabled = true;
        self
    }

    pub fn enable_github(mut self) -> Self {
        self.config.optional_actions.github.enabled = true;
        self
    }

    pub fn max_workers(mut self, workers: usize) -> Self {
        self.config.execution.max_parallel_workers = workers;
        self
    }

    pub fn sequential(mut self) -> Self {
        self.config.execution.parallel_execution = false;
        self
    }

    /// Point every external tool at a fixed, recognisable path.
    pub fn fake_tools(mut self) -> Self {
        let tools = &mut self.config.tools;
        tools.email_script = Some(PathBuf::from("/tools/gmail_manager.rb"));
        tools.sms_script = Some(PathBuf::from("/tools/send_message.sh"));
        tools.worklog_script = Some(PathBuf::from("/tools/worklog_manager.py"));
        tools.pr_script = Some(PathBuf::from("/tools/pr-workflow.sh"));
        self
    }

    pub fn raw(self) -> RawConfigFile {
        self.config
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn email_recipient(address: &str) -> EmailRecipient {
    let first_name = address.split('@').next().unwrap_or(address).to_string();
    EmailRecipient {
        first_name,
        last_name: "Tester".to_string(),
        email: address.to_string(),
    }
}

/// Builder for `Summary`.
pub struct SummaryBuilder {
    summary: Summary,
}

impl SummaryBuilder {
    pub fn new(full: &str, concise: &str) -> Self {
        Self {
            summary: Summary {
                full_summary: full.to_string(),
                concise_summary: concise.to_string(),
                ..Summary::default()
            },
        }
    }

    pub fn email(mut self, text: &str) -> Self {
        self.summary.email_summary = Some(text.to_string());
        self
    }

    pub fn sms(mut self, text: &str) -> Self {
        self.summary.sms_summary = Some(text.to_string());
        self
    }

    pub fn slack(mut self, text: &str) -> Self {
        self.summary.slack_summary = Some(text.to_string());
        self
    }

    pub fn worklog(mut self, text: &str) -> Self {
        self.summary.worklog_summary = Some(text.to_string());
        self
    }

    pub fn source(mut self, source: &str) -> Self {
        self.summary.sources_used.insert(source.to_string());
        self
    }

    pub fn build(self) -> Summary {
        self.summary
    }
}

impl Default for SummaryBuilder {
    fn default() -> Self {
        Self::new("Full summary of the session.", "Did X")
    }
}
