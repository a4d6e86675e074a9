//! Canned prompts offered next to the chat input.

#[cfg(test)]
#[path = "quick_actions_test.rs"]
mod quick_actions_test;

/// A one-click prompt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QuickAction {
    pub id: &'static str,
    pub label: &'static str,
    pub message: &'static str,
    pub icon: &'static str,
}

pub static QUICK_ACTIONS: [QuickAction; 6] = [
    QuickAction {
        id: "find-scholarships",
        label: "Find Scholarships",
        message: "How can I find scholarships that match my profile?",
        icon: "🎓",
    },
    QuickAction {
        id: "application-tips",
        label: "Application Tips",
        message: "What are some tips for a strong scholarship application?",
        icon: "📝",
    },
    QuickAction {
        id: "essay-help",
        label: "Essay Writing",
        message: "How do I write a compelling scholarship essay?",
        icon: "✍️",
    },
    QuickAction {
        id: "deadlines",
        label: "Manage Deadlines",
        message: "How can I keep track of scholarship deadlines?",
        icon: "⏰",
    },
    QuickAction {
        id: "profile-help",
        label: "Profile Setup",
        message: "How do I optimize my profile for better scholarship matches?",
        icon: "👤",
    },
    QuickAction {
        id: "events",
        label: "Events & Workshops",
        message: "What educational events are available on the platform?",
        icon: "🎪",
    },
];

/// Look up an action by id.
#[must_use]
pub fn find(id: &str) -> Option<&'static QuickAction> {
    QUICK_ACTIONS.iter().find(|action| action.id == id)
}
