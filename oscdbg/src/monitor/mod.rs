pub mod history;
pub mod ingest;
pub mod layout;
pub mod session;
pub mod state;

pub use history::History;
pub use ingest::IngestQueue;
pub use layout::{Layout, Rect, Viewport};
pub use session::{Frame, Input, Interrupt, Renderer, Session, SessionError};
pub use state::{Command, Redraw, UiState};
