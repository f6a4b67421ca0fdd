//! The transfer wizard: which page is visible, what it shows, and the
//! transitions between pages.

pub mod provider;
pub mod router;
pub mod state;

pub use provider::{
    ChannelQuery, ContentProvider, ErrorSink, LogErrorSink, Navigator,
    NoopNavigator, TopicContents,
};
pub use router::{
    Fetched, ImportSource, NavigationRequest, Outcome, PendingFetch,
    PseudoTransition, Router, Step, TopicTarget, Transition,
    DEFAULT_FETCH_TIMEOUT,
};
pub use state::{WizardContext, WizardPage, WizardState};
