// Listening module - wake phrase gating of the transcript stream
// WakeWordSession is the pure state machine; ListeningPipeline drives it from
// an input channel and hands completed commands to the command service

mod pipeline;
mod session;

pub use pipeline::{
    ListeningHandle, ListeningInput, ListeningPipeline, PipelineError, INPUT_CHANNEL_CAPACITY,
    LISTENING_NOTIFICATION, WAKE_NOTIFICATION,
};
pub use session::{
    ListeningConfig, SessionEvent, SessionState, WakeWordSession, DEFAULT_COMMAND_TIMEOUT_MS,
    DEFAULT_TERMINATOR, DEFAULT_WAKE_PHRASE, POPUP_COMMAND_TIMEOUT_MS,
};
