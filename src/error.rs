use derive_more::{Display, Error};
use std::path::PathBuf;

pub type Error = exn::Exn<ErrorKind>;
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    #[display("could not load configuration")]
    Config,
    #[display("could not read the photo album")]
    Source,
    #[display("could not plan the upload")]
    Plan,
    #[display("could not copy into the destination folder")]
    Destination,
    #[display("could not write summary to {}", _0.display())]
    Output(#[error(not(source))] PathBuf),
}
