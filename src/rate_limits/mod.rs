//! Rate tiers and the pre-call pacing policy.
//!
//! Slack publishes a per-method rate tier. Rather than a token bucket, every
//! call sleeps for a fixed, tier-dependent duration before it is issued. The
//! sleep is local and deterministic; it is not an admission-control queue.

use crate::errors::ConfigurationError;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use tracing::debug;

/// Delay class applied before a call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RateTier {
    /// Tier 1 (about 1 request per minute)
    Tier1,
    /// Tier 2 (about 20 requests per minute)
    Tier2,
    /// Tier 3 (about 50 requests per minute)
    Tier3,
    /// Tier 4 (about 100 requests per minute)
    Tier4,
    /// Minimal pacing for unthrottled methods
    TierD,
}

impl RateTier {
    /// Sleep applied before a call in this tier
    pub fn delay(&self) -> Duration {
        match self {
            RateTier::Tier1 => Duration::from_secs(60),
            RateTier::Tier2 => Duration::from_secs(3),
            RateTier::Tier3 => Duration::from_millis(1200),
            RateTier::Tier4 => Duration::from_millis(600),
            RateTier::TierD => Duration::from_millis(50),
        }
    }

    /// Configuration name of the tier
    pub fn as_str(&self) -> &'static str {
        match self {
            RateTier::Tier1 => "tier_1",
            RateTier::Tier2 => "tier_2",
            RateTier::Tier3 => "tier_3",
            RateTier::Tier4 => "tier_4",
            RateTier::TierD => "tier_d",
        }
    }
}

impl fmt::Display for RateTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RateTier {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['_', '-', ' '], "");
        let level = normalized.strip_prefix("tier").unwrap_or(&normalized);
        match level {
            "1" => Ok(RateTier::Tier1),
            "2" => Ok(RateTier::Tier2),
            "3" => Ok(RateTier::Tier3),
            "4" => Ok(RateTier::Tier4),
            "d" => Ok(RateTier::TierD),
            _ => Err(ConfigurationError::InvalidRateTier(s.to_string())),
        }
    }
}

/// Maps method names to rate tiers.
///
/// Resolution order: explicit per-call tier, exact method override, longest
/// matching prefix, then the default tier.
#[derive(Debug, Clone, PartialEq)]
pub struct RateLimitPolicy {
    method_overrides: HashMap<String, RateTier>,
    prefix_rules: Vec<(String, RateTier)>,
    default_tier: RateTier,
}

impl Default for RateLimitPolicy {
    fn default() -> Self {
        Self::slack_default()
    }
}

impl RateLimitPolicy {
    /// Empty policy: every method resolves to the default tier
    pub fn new() -> Self {
        Self {
            method_overrides: HashMap::new(),
            prefix_rules: Vec::new(),
            default_tier: RateTier::Tier3,
        }
    }

    /// Tiers for the methods this crate calls
    pub fn slack_default() -> Self {
        Self::new()
            .method("conversations.history", RateTier::Tier3)
            .method("files.upload", RateTier::Tier2)
            .method("files.getUploadURLExternal", RateTier::Tier4)
            .method("files.info", RateTier::Tier4)
            .method("admin.users.list", RateTier::Tier4)
            .method("admin.teams.list", RateTier::Tier3)
            .method("admin.conversations.search", RateTier::Tier2)
            .method("team.info", RateTier::Tier3)
            .prefix("admin.", RateTier::Tier1)
            .prefix("discovery.", RateTier::Tier3)
            .prefix("scim.", RateTier::Tier2)
            .prefix("conversations.", RateTier::Tier3)
            .prefix("chat.", RateTier::Tier3)
            .prefix("files.", RateTier::Tier2)
            .prefix("users.", RateTier::Tier2)
            .prefix("usergroups.", RateTier::Tier2)
            .prefix("team.", RateTier::Tier2)
    }

    /// Add an exact method override
    pub fn method(mut self, method: impl Into<String>, tier: RateTier) -> Self {
        self.method_overrides.insert(method.into(), tier);
        self
    }

    /// Add a prefix rule
    pub fn prefix(mut self, prefix: impl Into<String>, tier: RateTier) -> Self {
        self.prefix_rules.push((prefix.into(), tier));
        self
    }

    /// Copy of this policy with a different fallback tier
    pub fn with_default(&self, tier: RateTier) -> Self {
        Self {
            default_tier: tier,
            ..self.clone()
        }
    }

    /// Fallback tier
    pub fn default_tier(&self) -> RateTier {
        self.default_tier
    }

    /// Resolve the tier for a method
    pub fn tier_for(&self, method: &str) -> RateTier {
        if let Some(tier) = self.method_overrides.get(method) {
            return *tier;
        }

        self.prefix_rules
            .iter()
            .filter(|(prefix, _)| method.starts_with(prefix.as_str()))
            .max_by_key(|(prefix, _)| prefix.len())
            .map(|(_, tier)| *tier)
            .unwrap_or(self.default_tier)
    }

    /// Resolve with an explicit per-call tier taking precedence
    pub fn resolve(&self, method: &str, explicit: Option<RateTier>) -> RateTier {
        explicit.unwrap_or_else(|| self.tier_for(method))
    }
}

/// Performs the pre-call sleep
#[derive(Debug, Clone)]
pub struct Pacer {
    policy: RateLimitPolicy,
}

impl Pacer {
    /// Create a pacer over a policy
    pub fn new(policy: RateLimitPolicy) -> Self {
        Self { policy }
    }

    /// The policy in use
    pub fn policy(&self) -> &RateLimitPolicy {
        &self.policy
    }

    /// Sleep for the tier resolved for `method`, returning that tier
    pub async fn pace(&self, method: &str, explicit: Option<RateTier>) -> RateTier {
        let tier = self.policy.resolve(method, explicit);
        let delay = tier.delay();
        debug!(method = %method, tier = %tier, delay_ms = delay.as_millis() as u64, "Pacing call");
        tokio::time::sleep(delay).await;
        tier
    }
}
