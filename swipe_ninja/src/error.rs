//! Front-end errors.

use snafu::Snafu;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    #[snafu(display("could not open the playfield window: {}", source))]
    Window { source: minifb::Error },

    #[snafu(display("could not install the logger: {}", source))]
    Logger { source: log::SetLoggerError },

    /// The fingertip source thread hung up; there are no more frames.
    #[snafu(display("fingertip source disconnected"))]
    SourceDisconnected,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
