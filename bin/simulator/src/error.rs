use std::fmt;

#[derive(Debug)]
pub enum Error {
    Ws(hub::WsError),
    Io(std::io::Error),
    EmptyFleet,
}

impl From<hub::WsError> for Error {
    fn from(err: hub::WsError) -> Self {
        Self::Ws(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ws(err) => write!(f, "websocket error: {err}"),
            Self::Io(err) => write!(f, "io error: {err}"),
            Self::EmptyFleet => write!(f, "no devices connected"),
        }
    }
}

impl std::error::Error for Error {}
