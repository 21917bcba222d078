//! Terminal-driven authorization completer

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::debug;
use tunewire_common::auth::{parse_authorization_response, AuthorizationResponseError};
use tunewire_core::AuthorizationCompleter;
use tunewire_domain::{Result, TuneWireError};

type Input = Box<dyn BufRead + Send>;
type Output = Box<dyn Write + Send>;

/// Prints the authorize URL and reads the redirect back from the terminal.
///
/// The user may paste either the bare code or the whole redirect URL.
#[derive(Clone)]
pub struct ConsoleCompleter {
    input: Arc<Mutex<Input>>,
    output: Arc<Mutex<Output>>,
}

impl ConsoleCompleter {
    /// Prompt on stderr, read from stdin.
    pub fn new() -> Self {
        Self::with_io(io::BufReader::new(io::stdin()), io::stderr())
    }

    /// Prompt on `output`, read from `input`.
    pub fn with_io(
        input: impl BufRead + Send + 'static,
        output: impl Write + Send + 'static,
    ) -> Self {
        Self {
            input: Arc::new(Mutex::new(Box::new(input))),
            output: Arc::new(Mutex::new(Box::new(output))),
        }
    }

    fn prompt_blocking(&self, authorize_url: &str) -> io::Result<String> {
        {
            let mut output = self.output.lock();
            writeln!(output, "Open this URL in your browser and approve access:")?;
            writeln!(output, "\n    {authorize_url}\n")?;
            write!(output, "Paste the URL you were redirected to (or just the code): ")?;
            output.flush()?;
        }

        let mut line = String::new();
        self.input.lock().read_line(&mut line)?;
        Ok(line)
    }
}

impl Default for ConsoleCompleter {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ConsoleCompleter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsoleCompleter").finish_non_exhaustive()
    }
}

#[async_trait]
impl AuthorizationCompleter for ConsoleCompleter {
    async fn authorization_code(&self, authorize_url: &str) -> Result<String> {
        let completer = self.clone();
        let url = authorize_url.to_string();

        let line = tokio::task::spawn_blocking(move || completer.prompt_blocking(&url))
            .await
            .map_err(|err| TuneWireError::Internal(format!("console prompt task failed: {err}")))?
            .map_err(|err| TuneWireError::Auth(format!("failed to read authorization code: {err}")))?;

        debug!("Read authorization response from console");
        parse_authorization_response(&line).map_err(|err| match err {
            AuthorizationResponseError::Denied(reason) => {
                TuneWireError::Auth(format!("authorization denied: {reason}"))
            }
            other => TuneWireError::Auth(other.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn prints_url_and_reads_redirect() {
        let output = SharedBuffer::default();
        let completer = ConsoleCompleter::with_io(
            Cursor::new(b"http://localhost:8888/callback?code=XYZ&state=1\n".to_vec()),
            output.clone(),
        );

        let code = completer.authorization_code("https://accounts.test/authorize?x=1").await.unwrap();

        assert_eq!(code, "XYZ");
        let printed = String::from_utf8(output.0.lock().clone()).unwrap();
        assert!(printed.contains("https://accounts.test/authorize?x=1"));
    }

    #[tokio::test]
    async fn accepts_bare_code() {
        let completer =
            ConsoleCompleter::with_io(Cursor::new(b"  AQC123  \n".to_vec()), io::sink());

        assert_eq!(completer.authorization_code("u").await.unwrap(), "AQC123");
    }

    #[tokio::test]
    async fn denied_redirect_is_auth_error() {
        let completer = ConsoleCompleter::with_io(
            Cursor::new(b"http://localhost/callback?error=access_denied\n".to_vec()),
            io::sink(),
        );

        let err = completer.authorization_code("u").await.unwrap_err();

        assert_eq!(err, TuneWireError::Auth("authorization denied: access_denied".into()));
    }

    #[tokio::test]
    async fn end_of_input_is_auth_error() {
        let completer = ConsoleCompleter::with_io(Cursor::new(Vec::new()), io::sink());

        let err = completer.authorization_code("u").await.unwrap_err();

        assert!(matches!(err, TuneWireError::Auth(_)));
    }
}
