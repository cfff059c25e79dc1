//! Remote transport
//!
//! `SessionManager` owns the single shared session and serializes every
//! connect, reconnect and upload through one admission gate. The SFTP
//! connector is the production `Connector`.

mod session;
mod sftp;

pub use session::{SessionManager, SessionStatus};
pub use sftp::{SftpConnector, SftpCredentials, SftpSession, SftpSettings};
