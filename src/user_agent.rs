//! Shared User-Agent string for verse service requests.

/// Project URL for User-Agent identification (good citizenship; RFC 9308).
const PROJECT_UA_URL: &str = "https://github.com/versebook/versebook";

/// Default User-Agent for verse service requests (identifies the tool).
#[must_use]
pub(crate) fn default_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("versebook/{version} (+{PROJECT_UA_URL})")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_agent_names_tool_version_and_url() {
        let ua = default_user_agent();
        assert!(ua.starts_with("versebook/"), "UA must start with tool name: {ua}");
        assert!(ua.contains(env!("CARGO_PKG_VERSION")), "UA must carry version: {ua}");
        assert!(ua.contains(PROJECT_UA_URL), "UA must contain project URL: {ua}");
    }
}
