//! `sp-monitor` — real-time check-in validation and overdue detection.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                  |
//! |---------------|-----------------------------------------------------------|
//! | [`queue`]     | `CheckInQueue`, pending check-ins in time order          |
//! | [`validator`] | `ScanValidator`, `ScanEvent`, `ScanOutcome`, `Classification` |
//! | [`watchdog`]  | `Watchdog`, `TickOutcome`, polling task                   |
//! | [`monitor`]   | `ShiftMonitor` handle, `ShiftState`, `MonitorStatus`      |
//! | [`dispatch`]  | `Dispatcher`, `InboundEvent`                              |
//! | [`message`]   | `Message` envelope                                        |
//! | [`bus`]       | `MessageBus` trait                                        |
//! | [`topics`]    | Topic constants                                           |
//! | [`config`]    | `MonitorConfig`                                           |
//! | [`error`]     | `MonitorError`, `MonitorResult<T>`                        |
//!
//! # Concurrency
//!
//! A single task owns the queue and all shift state.  [`ShiftMonitor`] calls
//! and watchdog ticks are commands on one channel, applied in arrival order.
//!
//! ```text
//!  Dispatcher ─┐
//!              ├─► mpsc<Command> ─► monitor task ─► MessageBus
//!  watchdog ───┘    (tick)          (queue, alarm, shift)
//! ```

pub mod bus;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod message;
pub mod monitor;
pub mod queue;
pub mod topics;
pub mod validator;
pub mod watchdog;

mod actor;


pub use bus::MessageBus;
pub use config::MonitorConfig;
pub use dispatch::{Dispatcher, InboundEvent};
pub use error::{MonitorError, MonitorResult};
pub use message::{Liveness, Message, QOS_EXACTLY_ONCE};
pub use monitor::{Activation, MonitorStatus, ShiftMonitor, ShiftState};
pub use queue::{CardSet, CheckInQueue};
pub use validator::{Classification, ScanEvent, ScanOutcome, ScanValidator};
pub use watchdog::{TickOutcome, Watchdog};
