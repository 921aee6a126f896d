//! Cancellable per-frame loop state
//!
//! A host scheduler (`requestAnimationFrame`, a tokio interval, a test loop)
//! calls back once per display refresh. Each scheduled callback carries the
//! [`FrameTicket`] it was issued with; [`FrameLoop::accept`] honours only the
//! ticket most recently handed out, so a callback already in flight when
//! [`FrameLoop::stop`] runs is ignored.

/// Handle for one pending frame callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameTicket {
    generation: u64,
    frame: u64,
}

impl FrameTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Frame number within its generation, starting at 0
    pub fn frame(&self) -> u64 {
        self.frame
    }
}

#[derive(Debug, Default)]
pub struct FrameLoop {
    generation: u64,
    pending: Option<FrameTicket>,
}

impl FrameLoop {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin a new generation and issue its first ticket.
    ///
    /// Tickets from any earlier run become stale.
    pub fn start(&mut self) -> FrameTicket {
        self.generation += 1;
        let ticket = FrameTicket { generation: self.generation, frame: 0 };
        self.pending = Some(ticket);
        ticket
    }

    /// Cancel the pending ticket. Idempotent.
    pub fn stop(&mut self) {
        self.pending = None;
    }

    pub fn is_running(&self) -> bool {
        self.pending.is_some()
    }

    /// Redeem a ticket. Returns the ticket for the next frame when `ticket`
    /// is the pending one, `None` when it is stale or the loop is stopped.
    pub fn accept(&mut self, ticket: FrameTicket) -> Option<FrameTicket> {
        if self.pending != Some(ticket) {
            return None;
        }
        let next = FrameTicket { generation: ticket.generation, frame: ticket.frame + 1 };
        self.pending = Some(next);
        Some(next)
    }

    pub fn pending(&self) -> Option<FrameTicket> {
        self.pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accept_chains_tickets() {
        let mut frames = FrameLoop::new();
        let first = frames.start();
        let second = frames.accept(first).unwrap();
        assert_eq!(second.frame(), 1);
        assert_eq!(frames.accept(first), None);
        assert!(frames.accept(second).is_some());
    }

    #[test]
    fn test_stop_rejects_in_flight_ticket() {
        let mut frames = FrameLoop::new();
        let ticket = frames.start();
        frames.stop();
        frames.stop();
        assert!(!frames.is_running());
        assert_eq!(frames.accept(ticket), None);
    }

    #[test]
    fn test_restart_invalidates_old_generation() {
        let mut frames = FrameLoop::new();
        let old = frames.start();
        frames.stop();
        let new = frames.start();
        assert_ne!(old.generation(), new.generation());
        assert_eq!(frames.accept(old), None);
        assert!(frames.accept(new).is_some());
    }
}
