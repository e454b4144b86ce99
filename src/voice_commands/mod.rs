// Voice commands module - intent resolution and action execution

pub mod executor;
pub mod interpreter;
pub mod matcher;
pub mod similarity;
pub mod types;
pub mod websites;

pub use executor::{ActionError, ActionErrorCode, ActionExecutor, ActionResult};
pub use interpreter::CommandInterpreter;
pub use types::{BrowserAction, BrowserActionKind};
