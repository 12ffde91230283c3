// src/types.rs

use std::fmt;

/// The fixed set of delivery channels a wrap-up dispatches to.
///
/// Declaration order is the canonical report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ChannelKind {
    Email,
    Sms,
    Slack,
    Worklog,
    Documentation,
    Calendar,
    Github,
    PullRequest,
}

impl ChannelKind {
    /// Every channel, delivery channels first and the pull request follow-up
    /// last.
    pub const ALL: [ChannelKind; 8] = [
        ChannelKind::Email,
        ChannelKind::Sms,
        ChannelKind::Slack,
        ChannelKind::Worklog,
        ChannelKind::Documentation,
        ChannelKind::Calendar,
        ChannelKind::Github,
        ChannelKind::PullRequest,
    ];

    /// Channels dispatched together as one batch and counted in the tally.
    pub const DELIVERY: [ChannelKind; 7] = [
        ChannelKind::Email,
        ChannelKind::Sms,
        ChannelKind::Slack,
        ChannelKind::Worklog,
        ChannelKind::Documentation,
        ChannelKind::Calendar,
        ChannelKind::Github,
    ];

    /// The pull request runs after the batch, as a follow-up step.
    pub fn is_follow_up(self) -> bool {
        self == ChannelKind::PullRequest
    }

    /// Key used in the outcome map and the JSON result.
    pub fn name(self) -> &'static str {
        match self {
            ChannelKind::Email => "email",
            ChannelKind::Sms => "sms",
            ChannelKind::Slack => "slack",
            ChannelKind::Worklog => "worklog",
            ChannelKind::Documentation => "documentation",
            ChannelKind::Calendar => "calendar",
            ChannelKind::Github => "github",
            ChannelKind::PullRequest => "pull_request",
        }
    }
}

impl fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How the coordinator schedules channel tasks.
///
/// - `Parallel`: bounded worker pool, completion order is arbitrary.
/// - `Sequential`: one task at a time in canonical order. Produces the same
///   outcome map as `Parallel`; only timing differs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DispatchMode {
    #[default]
    Parallel,
    Sequential,
}
