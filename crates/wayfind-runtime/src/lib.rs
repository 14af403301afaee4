#![forbid(unsafe_code)]

//! Host-driven scheduling primitives for Wayfind.
//!
//! Nothing here owns a thread or an event loop. The host (a browser animation
//! loop, or a test) asks for work to be scheduled and later reports that the
//! work is due:
//!
//! ```text
//! engine.sync(props)        → FrameScheduler::request_frame()
//! window scroll / resize    → FrameDebouncer::schedule()  (cancel + reschedule)
//! requestAnimationFrame(id) → engine.on_frame(id)         (stale ids ignored)
//! host clock tick           → OneShot::fire_if_due(now)
//! ```
//!
//! - [`frame`]: frame ids, the [`FrameScheduler`](frame::FrameScheduler) seam,
//!   and a deterministic manual scheduler.
//! - [`debounce`]: coalesce bursts into one callback per animation frame.
//! - [`timer`]: restartable one-shot deadlines and clocks.
//! - [`subscription`]: which window listeners should currently be attached.

pub mod debounce;
pub mod frame;
pub mod subscription;
pub mod timer;

pub use debounce::FrameDebouncer;
pub use frame::{FrameId, FrameScheduler, ManualFrameScheduler};
pub use subscription::{Subscription, SubscriptionDiff, SubscriptionSet};
pub use timer::{Clock, ManualClock, MonotonicClock, OneShot};
