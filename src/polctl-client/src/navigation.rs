// SPDX-FileCopyrightText: 2026 Stan Grams <sjg@haxx.space>
//
// SPDX-License-Identifier: BSD-2-Clause

use tokio::sync::mpsc;

/// Forced navigation requested by the client layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    /// Credentials are gone; the user has to log in again.
    Login,
}

/// Receiver of navigation signals (a UI router, a CLI prompt, ...).
pub trait Navigator: Send + Sync {
    fn navigate(&self, to: Navigation);
}

impl Navigator for mpsc::UnboundedSender<Navigation> {
    fn navigate(&self, to: Navigation) {
        // receiver gone means nobody is left to redirect
        let _ = self.send(to);
    }
}

/// Drops every signal.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopNavigator;

impl Navigator for NoopNavigator {
    fn navigate(&self, _to: Navigation) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_navigator_delivers() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        tx.navigate(Navigation::Login);
        assert_eq!(rx.try_recv().ok(), Some(Navigation::Login));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_channel_navigator_ignores_closed_receiver() {
        let (tx, rx) = mpsc::unbounded_channel::<Navigation>();
        drop(rx);
        tx.navigate(Navigation::Login);
    }
}
