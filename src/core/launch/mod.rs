pub mod event;
pub mod orchestrator;
pub mod session;
pub mod state;
pub mod view;

pub use event::{EngineEvent, EngineEvents, LaunchEngine, LaunchRequest};
pub use orchestrator::{LaunchOrchestrator, ABANDONED_EXIT_CODE};
pub use session::{LaunchSession, SessionHandle};
pub use state::{transition, LaunchState};
pub use view::LaunchView;
