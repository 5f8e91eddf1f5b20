//! Messages accepted by the sequencer task.

use tokio::sync::oneshot;

use trilemma_domain::error::TrilemmaError;
use trilemma_domain::id::SwitchKey;
use trilemma_domain::snapshot::BoardSnapshot;
use trilemma_domain::timer::TimerTicket;

pub(crate) type Reply<T> = oneshot::Sender<T>;

pub(crate) enum Command {
    Toggle {
        key: SwitchKey,
        reply: Reply<Result<BoardSnapshot, TrilemmaError>>,
    },
    Advance {
        reply: Reply<BoardSnapshot>,
    },
    Reset {
        reply: Reply<BoardSnapshot>,
    },
    Restart {
        reply: Reply<Result<BoardSnapshot, TrilemmaError>>,
    },
    Snapshot {
        reply: Reply<BoardSnapshot>,
    },
    PendingTimers {
        reply: Reply<usize>,
    },
    /// Sent by a timer task once its delay has elapsed.
    TimerFired(TimerTicket),
    Shutdown {
        reply: Reply<()>,
    },
}
