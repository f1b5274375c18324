//! Console output icons.

use std::fmt;

use console::{style, StyledObject};

use crate::analysis::{Notification, NotificationLevel};

/// A styled status marker for terminal output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Icon {
    /// Green ✓
    Ok,
    /// Cyan →
    Info,
    /// Yellow !
    Warn,
    /// Red ✗
    Fail,
    /// Dim → for secondary lines
    Detail,
    /// Dim •
    Bullet,
}

impl Icon {
    pub fn styled(self) -> StyledObject<&'static str> {
        match self {
            Icon::Ok => style("✓").green(),
            Icon::Info => style("→").cyan(),
            Icon::Warn => style("!").yellow(),
            Icon::Fail => style("✗").red(),
            Icon::Detail => style("→").dim(),
            Icon::Bullet => style("•").dim(),
        }
    }

    pub fn for_notification(note: &Notification) -> Self {
        match note.level {
            NotificationLevel::Info => Icon::Info,
            NotificationLevel::Error => Icon::Fail,
        }
    }
}

impl fmt::Display for Icon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.styled())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notification_icons() {
        let err = Notification::error("Analysis Failed", "x");
        assert_eq!(Icon::for_notification(&err), Icon::Fail);
        let ok = Notification::info("File loaded", "x");
        assert_eq!(Icon::for_notification(&ok), Icon::Info);
    }

    #[test]
    fn test_display_contains_glyph() {
        assert!(Icon::Ok.to_string().contains('✓'));
        assert!(Icon::Bullet.to_string().contains('•'));
    }
}
