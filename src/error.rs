//! CLI Error Types

use derive_more::{Display, Error};

pub type Error = exn::Exn<ErrorKind>;
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    #[display("invalid configuration")]
    Config,
    #[display("no data source configured; pass --source or set source.path")]
    NoSource,
    #[display("invalid data source")]
    Source,
    #[display("emoji store error")]
    Cache,
    #[display("synchronization failed")]
    Sync,
}
