// ============================================================================
// STATE MODULE - Rc<RefCell> state + notifications, composition root
// ============================================================================

pub mod app_state;
pub mod reactivity;

pub use app_state::AppContext;
pub use reactivity::{ReactiveState, SubscriptionId};
