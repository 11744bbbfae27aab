use std::cell::RefCell;
use std::rc::Rc;
use std::time::Instant;

use super::error::Result;
use super::progress::KeyValueStore;
use super::session::{FlipOutcome, GameSession, ResolutionTicket};

/// Hosts a session on the thread-default GLib main context and fires
/// resolutions from `timeout_add_local_once`.
pub struct GlibDriver<S> {
    session: Rc<RefCell<GameSession<S>>>,
}

impl<S: KeyValueStore + 'static> GlibDriver<S> {
    pub fn new(session: GameSession<S>) -> Self {
        Self {
            session: Rc::new(RefCell::new(session)),
        }
    }

    /// Shared handle for everything besides flipping.
    pub fn session(&self) -> &Rc<RefCell<GameSession<S>>> {
        &self.session
    }

    pub fn flip(&self, index: usize) -> Result<FlipOutcome> {
        let outcome = self.session.borrow_mut().flip(index)?;
        if let FlipOutcome::AwaitingResolution(ticket) = outcome {
            self.schedule(ticket);
        }
        Ok(outcome)
    }

    fn schedule(&self, ticket: ResolutionTicket) {
        let delay = ticket.deadline().saturating_duration_since(Instant::now());
        let session = self.session.clone();
        glib::timeout_add_local_once(delay, move || {
            session.borrow_mut().resolve(ticket);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::progress::MemoryStore;
    use crate::game::session::SessionConfig;
    use std::time::Duration;

    #[test]
    fn resolution_fires_on_main_context() {
        let ctx = glib::MainContext::new();
        ctx.with_thread_default(|| {
            let config = SessionConfig {
                resolve_delay: Duration::ZERO,
                seed: Some(3),
            };
            let driver = GlibDriver::new(GameSession::new(MemoryStore::new(), config).unwrap());
            driver.session().borrow_mut().start();

            driver.flip(0).unwrap();
            driver.flip(1).unwrap();
            assert!(driver.session().borrow().pending_ticket().is_some());

            ctx.iteration(true);

            assert!(driver.session().borrow().pending_ticket().is_none());
            assert_eq!(driver.session().borrow().attempts(), 1);
        })
        .unwrap();
    }
}
