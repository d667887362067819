mod session;

pub use session::{Session, SessionDraft};
pub(crate) use session::SessionRow;
