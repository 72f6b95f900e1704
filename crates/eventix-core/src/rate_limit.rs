//! Per-route-group rate-limit policies.

use std::time::Duration;

/// Request ceiling for one route group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitPolicy {
    /// Group name, also used to namespace shared-store keys.
    pub group: &'static str,
    pub max_requests: u32,
    pub window: Duration,
}

impl RateLimitPolicy {
    pub const fn new(group: &'static str, max_requests: u32, window_secs: u64) -> Self {
        Self {
            group,
            max_requests,
            window: Duration::from_secs(window_secs),
        }
    }

    /// Login and registration.
    pub const AUTH: Self = Self::new("auth", 50, 15 * 60);

    /// Event creation.
    pub const CREATE_EVENT: Self = Self::new("create-event", 20, 10 * 60);

    /// Like increments.
    pub const LIKE: Self = Self::new("like", 60, 60);

    /// Ticket issuance.
    pub const TICKETS: Self = Self::new("tickets", 30, 10 * 60);

    pub const ALL: [Self; 4] = [Self::AUTH, Self::CREATE_EVENT, Self::LIKE, Self::TICKETS];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_names_are_unique() {
        let mut names: Vec<_> = RateLimitPolicy::ALL.iter().map(|p| p.group).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), RateLimitPolicy::ALL.len());
    }

    #[test]
    fn test_auth_policy() {
        assert_eq!(RateLimitPolicy::AUTH.max_requests, 50);
        assert_eq!(RateLimitPolicy::AUTH.window, Duration::from_secs(900));
    }
}
