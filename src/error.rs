/// Converts a fallible fact lookup into an optional value, logging the failure.
///
/// Used wherever a response section is omitted rather than failing the request.
pub trait ResultOkLogExt<T, E> {
    fn ok_log(self, what: &str) -> Option<T>;
}

impl<T, E> ResultOkLogExt<T, E> for std::result::Result<T, E>
where
    E: std::error::Error,
{
    fn ok_log(self, what: &str) -> Option<T> {
        match self {
            Ok(ok) => Some(ok),
            Err(err) => {
                log::warn!("omitting {what}: {err}");
                None
            }
        }
    }
}

/// Errors that terminate the service.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Socket(#[from] crate::socket::Error),
    #[error("server terminated: {0}")]
    Serve(#[source] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
